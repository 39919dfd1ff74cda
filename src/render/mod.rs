//! Panel overlay rendering.
//!
//! Turns one panel's text slots into the HTML fragment shown over the
//! scanned panel image:
//! - one highlight `<div>` per placed slot, used for hit-testing,
//! - one `<svg>` holding each slot's bubble outline and its text.
//!
//! Rendering is a pure function of its inputs, so identical slots always
//! produce byte-identical markup.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::bubble::{BubblePlacer, TieBreak};
use crate::config::{AppConfig, RenderSettings};
use crate::constants::SLOT_COLOR_CLASSES;
use crate::error::OverlayError;
use crate::fields::FieldFocus;
use crate::markup::{InlineMarkup, Span};
use crate::model::{Panel, Point, PointerKind, TextBox, TextSlot};

#[cfg(test)]
mod tests;

/// Which language each slot shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Project languages; the first is the last-resort fallback.
    pub langs: Vec<String>,
    /// Index into `langs` of the language shown by default.
    pub primary_lang: usize,
    /// The text field currently being edited, if any.
    pub focus: Option<FieldFocus>,
}

impl RenderContext {
    pub fn new(langs: Vec<String>, primary_lang: usize) -> Self {
        Self {
            langs,
            primary_lang,
            focus: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.langs.clone(), config.primary_lang)
    }

    pub fn with_focus(mut self, focus: Option<FieldFocus>) -> Self {
        self.focus = focus;
        self
    }

    /// Text to show for `slot` of panel `panel`.
    ///
    /// The focused field wins while it holds text, then the primary
    /// language, then the first language.
    pub fn text_for<'s>(&self, panel: usize, slot: &'s TextSlot) -> Option<&'s str> {
        self.focus
            .as_ref()
            .filter(|focus| focus.panel == panel && focus.slot == slot.index)
            .and_then(|focus| slot.text(&focus.lang))
            .or_else(|| {
                self.langs
                    .get(self.primary_lang)
                    .and_then(|lang| slot.text(lang))
            })
            .or_else(|| self.langs.first().and_then(|lang| slot.text(lang)))
    }
}

/// Renders panel overlays with fixed settings.
#[derive(Debug, Clone)]
pub struct PanelRenderer {
    settings: RenderSettings,
    markup: InlineMarkup,
    placer: BubblePlacer,
}

impl PanelRenderer {
    pub fn new(settings: RenderSettings, tie_break: TieBreak) -> Self {
        let markup = InlineMarkup::new(&settings.tspan_sub_tag_styles);
        let placer = BubblePlacer::new(settings.stroke_px(), settings.notch_px(), tie_break);
        Self {
            settings,
            markup,
            placer,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.render.clone(), config.tie_break)
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render the overlay fragment for `panel`.
    ///
    /// Slots without a placed box are left out entirely. A panel without any
    /// placed slot renders as an empty string.
    pub fn render_panel(&self, panel: &Panel, ctx: &RenderContext) -> Result<String, OverlayError> {
        if !panel.rect.in_range() {
            log::debug!("Panel {}: bounds {:?} out of range", panel.index, panel.rect);
            return Ok(String::new());
        }
        let origin = panel.origin();
        let placed: Vec<(&TextSlot, TextBox)> = panel.placed_slots().collect();
        if placed.len() < panel.slots.len() {
            log::debug!(
                "Panel {}: skipping {} unplaced slot(s)",
                panel.index,
                panel.slots.len() - placed.len()
            );
        }
        if placed.is_empty() {
            return Ok(String::new());
        }

        let mut w = MarkupWriter::new();

        for (slot, rect) in &placed {
            let local = rect.translated(origin);
            let class = format!("panelrect col{}", slot.index % SLOT_COLOR_CLASSES);
            let style = format!(
                "left:{}px; top:{}px; width:{}px; height:{}px;",
                local.x, local.y, local.width, local.height
            );
            let index = slot.index.to_string();
            w.start(
                "div",
                &[
                    ("class", class.as_str()),
                    ("data-slot", index.as_str()),
                    ("style", style.as_str()),
                ],
            )?;
            w.end("div")?;
        }

        let (pw, ph) = (panel.rect.width.to_string(), panel.rect.height.to_string());
        let view_box = format!("0 0 {} {}", pw, ph);
        w.start(
            "svg",
            &[
                ("class", "paneltexts"),
                ("viewBox", view_box.as_str()),
                ("width", pw.as_str()),
                ("height", ph.as_str()),
            ],
        )?;
        for (slot, rect) in &placed {
            self.write_slot(&mut w, panel.index, slot, rect, origin, ctx)?;
        }
        w.end("svg")?;

        w.finish()
    }

    fn write_slot(
        &self,
        w: &mut MarkupWriter,
        panel_index: usize,
        slot: &TextSlot,
        rect: &TextBox,
        origin: Point,
        ctx: &RenderContext,
    ) -> Result<(), OverlayError> {
        let kind = slot.pointer_kind();
        let outlined = kind.has_outline();

        if outlined {
            let poly = self.placer.place(rect, slot.pointer, origin);
            let cls = &self.settings.cls_box_poly;
            let class = match kind {
                PointerKind::Balloon(_) => format!("{} {}b", cls, cls),
                _ => cls.clone(),
            };
            let stroke = format!("{}px", self.settings.stroke_px());
            let points = poly.to_svg_points();
            w.empty(
                "polygon",
                &[
                    ("points", points.as_str()),
                    ("class", class.as_str()),
                    ("stroke-width", stroke.as_str()),
                ],
            )?;
        }

        let Some(text) = ctx.text_for(panel_index, slot) else {
            return Ok(());
        };

        let local = rect.translated(origin);
        let (x, y) = (local.x.to_string(), local.y.to_string());
        let mut attrs = vec![("x", x.as_str()), ("y", y.as_str())];
        if outlined {
            attrs.push(("class", "ptbf"));
        }
        w.start("svg", &attrs)?;
        self.write_text(w, slot, text, outlined)?;
        w.end("svg")
    }

    fn write_text(
        &self,
        w: &mut MarkupWriter,
        slot: &TextSlot,
        text: &str,
        outlined: bool,
    ) -> Result<(), OverlayError> {
        let top = format!("{}px", self.settings.box_poly_top_px);
        let font = format!("font-size: {}px;", self.settings.font_px());
        let transform = single_line(&slot.transform);

        let mut text_attrs = Vec::new();
        if outlined {
            text_attrs.push(("y", top.as_str()));
        }
        text_attrs.push(("style", font.as_str()));
        if !transform.is_empty() {
            text_attrs.push(("transform", transform.as_str()));
        }
        w.start("text", &text_attrs)?;

        let (style, extra_classes) = slot.tspan_style_and_classes();
        let style = single_line(style);
        let std_class = if slot.is_story_title() || style.contains("font-family") {
            ""
        } else {
            "std"
        };
        w.start("tspan", &[("style", style.as_str()), ("class", std_class)])?;

        let mut classes: Vec<&str> = Vec::new();
        if !self.settings.tspan_css_cls.is_empty() {
            classes.push(&self.settings.tspan_css_cls);
        }
        classes.extend(extra_classes);
        let line_css = self.inline_css(&classes);
        let line_class = classes.join(" ");
        let dy = self.settings.line_px(slot.is_story_title()).to_string();
        let indent = if outlined {
            self.settings.line_indent_px()
        } else {
            0
        };
        let x = indent.to_string();

        for line in self.markup.lines(text) {
            let mut attrs = vec![("dy", dy.as_str()), ("x", x.as_str())];
            if !line_css.is_empty() {
                attrs.push(("style", line_css.as_str()));
            }
            if !line_class.is_empty() {
                attrs.push(("class", line_class.as_str()));
            }
            w.start("tspan", &attrs)?;
            for span in &line {
                match span {
                    Span::Open(tag) => {
                        let tag_attrs: Vec<(&str, &str)> = self
                            .markup
                            .attributes(tag)
                            .unwrap_or_default()
                            .iter()
                            .map(|(k, v)| (k.as_str(), v.as_str()))
                            .collect();
                        w.start("tspan", &tag_attrs)?;
                    }
                    Span::Close => w.end("tspan")?,
                    Span::Text(t) => w.text(t)?,
                }
            }
            w.end("tspan")?;
        }

        w.end("tspan")?;
        w.end("text")
    }

    /// CSS declarations configured for `classes`, concatenated.
    fn inline_css(&self, classes: &[&str]) -> String {
        classes
            .iter()
            .filter_map(|cls| self.settings.css.get(&format!(".{}", cls)))
            .flat_map(|decls| decls.iter())
            .map(|(k, v)| format!("{}:{};", k, v))
            .collect()
    }
}

/// Attribute values must not break across lines.
fn single_line(s: &str) -> String {
    s.replace('\n', " ").trim().to_string()
}

/// Thin wrapper over the XML writer for attribute-list elements.
struct MarkupWriter {
    writer: Writer<Vec<u8>>,
}

impl MarkupWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        elem
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), OverlayError> {
        self.writer
            .write_event(Event::Start(Self::element(name, attrs)))
            .map_err(|e| OverlayError::Xml(e.into()))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), OverlayError> {
        self.writer
            .write_event(Event::Empty(Self::element(name, attrs)))
            .map_err(|e| OverlayError::Xml(e.into()))
    }

    fn end(&mut self, name: &str) -> Result<(), OverlayError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(|e| OverlayError::Xml(e.into()))
    }

    fn text(&mut self, text: &str) -> Result<(), OverlayError> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| OverlayError::Xml(e.into()))
    }

    fn finish(self) -> Result<String, OverlayError> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}
