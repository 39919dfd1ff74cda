//! Keyed colour palette for the colorization colour picker.
//!
//! 216 colours from six levels per channel, keyed `A1` to `X9`: 24 letter
//! rows of 9 digits each. The first colour is replaced with white so an
//! area can be reset to paper colour.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::error::OverlayError;

/// Channel levels combined into palette colours.
const LEVELS: [u8; 6] = [0x33, 0x55, 0x88, 0xAA, 0xCC, 0xEE];

/// Number of letter rows.
pub const ROWS: usize = 24;

/// Colours per letter row.
pub const COLUMNS: usize = 9;

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([0xFF, 0xFF, 0xFF]);

    /// CSS hex notation, `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.0;
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// The keyed palette.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    pub fn new() -> Self {
        let mut colors = Vec::with_capacity(ROWS * COLUMNS);
        for r in LEVELS {
            for g in LEVELS {
                for b in LEVELS {
                    colors.push(Rgb([r, g, b]));
                }
            }
        }
        colors[0] = Rgb::WHITE;
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    /// Key of the colour at `index`, e.g. `C5`.
    pub fn label(index: usize) -> Option<String> {
        if index >= ROWS * COLUMNS {
            return None;
        }
        let letter = char::from(b'A' + (index / COLUMNS) as u8);
        let digit = char::from(b'1' + (index % COLUMNS) as u8);
        Some(format!("{}{}", letter, digit))
    }

    /// Index of the colour keyed `label`; letters are case-insensitive.
    pub fn index_of(label: &str) -> Option<usize> {
        let mut chars = label.trim().chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let digit = chars.next()?;
        if chars.next().is_some() || !letter.is_ascii_uppercase() {
            return None;
        }
        let row = (letter as u8 - b'A') as usize;
        let column = digit.to_digit(10)?.checked_sub(1)? as usize;
        (row < ROWS && column < COLUMNS).then_some(row * COLUMNS + column)
    }

    /// Colours of one letter row.
    pub fn row(&self, row: usize) -> &[Rgb] {
        let start = (row * COLUMNS).min(self.colors.len());
        let end = (start + COLUMNS).min(self.colors.len());
        &self.colors[start..end]
    }
}

/// Colour picker state: the palette and the currently chosen colour.
#[derive(Debug, Clone, Default)]
pub struct ColorPicker {
    palette: Palette,
    current: usize,
}

impl ColorPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_color(&self) -> Rgb {
        self.palette.get(self.current).unwrap_or(Rgb::WHITE)
    }

    /// Choose the colour keyed `label`.
    pub fn select_label(&mut self, label: &str) -> Result<Rgb, OverlayError> {
        let index = Palette::index_of(label).ok_or_else(|| OverlayError::unknown_color(label))?;
        self.current = index;
        log::debug!("Picked colour {} ({})", label, self.current_color().to_hex());
        Ok(self.current_color())
    }

    /// Choose the colour at `index`; out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.palette.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Swatch grid markup, one row per letter, the current colour marked.
    pub fn to_html(&self) -> Result<String, OverlayError> {
        let mut writer = Writer::new(Vec::new());
        let mut start = |writer: &mut Writer<Vec<u8>>, name: &str, attrs: &[(&str, &str)]| {
            let mut elem = BytesStart::new(name);
            for attr in attrs {
                elem.push_attribute(*attr);
            }
            writer
                .write_event(Event::Start(elem))
                .map_err(|e| OverlayError::Xml(e.into()))
        };
        let end = |writer: &mut Writer<Vec<u8>>, name: &str| {
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| OverlayError::Xml(e.into()))
        };

        start(&mut writer, "div", &[("class", "colpalette")])?;
        for row in 0..ROWS {
            start(&mut writer, "div", &[("class", "colrow")])?;
            for (column, color) in self.palette.row(row).iter().enumerate() {
                let index = row * COLUMNS + column;
                let label = Palette::label(index).unwrap_or_default();
                let style = format!("background-color: {};", color.to_hex());
                let class = if index == self.current {
                    "colswatch cur"
                } else {
                    "colswatch"
                };
                start(
                    &mut writer,
                    "span",
                    &[
                        ("class", class),
                        ("data-label", label.as_str()),
                        ("title", label.as_str()),
                        ("style", style.as_str()),
                    ],
                )?;
                end(&mut writer, "span")?;
            }
            end(&mut writer, "div")?;
        }
        end(&mut writer, "div")?;

        Ok(String::from_utf8(writer.into_inner())?)
    }
}
