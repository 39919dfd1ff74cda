//! Typed access to the page's text slot form fields.
//!
//! Every slot of every panel is edited through a fixed set of form fields
//! whose ids follow `p<panel>t<slot><suffix>`:
//!
//! | suffix       | content                         |
//! |--------------|---------------------------------|
//! | `rxy`        | box top-left, `"x,y"`           |
//! | `rwh`        | box size, `"w,h"`               |
//! | `rpxy`       | bubble pointer, `"px,py"`       |
//! | `<lang>`     | slot text in that language      |
//! | `_transform` | SVG transform of the text       |
//! | `_style`     | style of the text's tspan       |
//!
//! [`FieldSource`] and [`FieldSink`] abstract over where the values live, so
//! the same reading and placement code runs against the DOM and against a
//! plain map in tests.

use std::collections::HashMap;

use crate::error::OverlayError;
use crate::model::{Panel, Point, TextBox, TextSlot};

/// Hidden field that tells the server which control triggered a post-back.
pub const FOCUS_FIELD: &str = "main_focus_id";

/// The form submitted on post-back.
pub const FORM_ID: &str = "main_form";

/// Read access to field values by id.
pub trait FieldSource {
    /// Current value of the field, or `None` if there is no such field.
    fn field_value(&self, id: &str) -> Option<String>;
}

/// Write access to field values by id.
pub trait FieldSink {
    fn set_field_value(&mut self, id: &str, value: &str) -> Result<(), OverlayError>;
}

impl FieldSource for HashMap<String, String> {
    fn field_value(&self, id: &str) -> Option<String> {
        self.get(id).cloned()
    }
}

impl FieldSink for HashMap<String, String> {
    fn set_field_value(&mut self, id: &str, value: &str) -> Result<(), OverlayError> {
        self.insert(id.to_string(), value.to_string());
        Ok(())
    }
}

/// Id of the element whose markup holds a panel's overlay.
pub fn overlay_container_id(panel: usize) -> String {
    format!("p{}rects", panel)
}

/// Field ids of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFields {
    prefix: String,
}

impl SlotFields {
    pub fn new(panel: usize, slot: usize) -> Self {
        Self {
            prefix: format!("p{}t{}", panel, slot),
        }
    }

    pub fn position(&self) -> String {
        format!("{}rxy", self.prefix)
    }

    pub fn size(&self) -> String {
        format!("{}rwh", self.prefix)
    }

    pub fn pointer(&self) -> String {
        format!("{}rpxy", self.prefix)
    }

    pub fn text(&self, lang: &str) -> String {
        format!("{}{}", self.prefix, lang)
    }

    pub fn transform(&self) -> String {
        format!("{}_transform", self.prefix)
    }

    pub fn style(&self) -> String {
        format!("{}_style", self.prefix)
    }

    /// Read the slot's current values.
    ///
    /// Coordinate pairs that fail to parse leave the box or pointer unset.
    pub fn read(&self, source: &impl FieldSource, index: usize, langs: &[String]) -> TextSlot {
        let pair = |id: String| source.field_value(&id).and_then(|v| Point::parse_pair(&v));

        let rect = match (pair(self.position()), pair(self.size())) {
            (Some(position), Some(size)) => Some(TextBox::from_position_size(position, size)),
            _ => None,
        };

        let mut slot = TextSlot::new(index);
        slot.rect = rect;
        slot.pointer = pair(self.pointer());
        for lang in langs {
            if let Some(text) = source.field_value(&self.text(lang)) {
                slot.texts.insert(lang.clone(), text.trim_end().to_string());
            }
        }
        slot.transform = source.field_value(&self.transform()).unwrap_or_default();
        slot.tspan_style = source.field_value(&self.style()).unwrap_or_default();
        slot
    }

    /// Write a box into the position and size fields.
    pub fn write_rect(&self, sink: &mut impl FieldSink, rect: &TextBox) -> Result<(), OverlayError> {
        sink.set_field_value(&self.position(), &rect.top_left().to_pair())?;
        sink.set_field_value(&self.size(), &rect.size().to_pair())
    }
}

/// Read all `max_slots` slots of a panel.
pub fn read_panel(
    source: &impl FieldSource,
    index: usize,
    rect: TextBox,
    max_slots: usize,
    langs: &[String],
) -> Panel {
    let mut panel = Panel::new(index, rect);
    panel.slots = (0..max_slots)
        .map(|slot| SlotFields::new(index, slot).read(source, slot, langs))
        .collect();
    panel
}

/// The slot text field that currently has input focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFocus {
    pub panel: usize,
    pub slot: usize,
    pub lang: String,
}

impl FieldFocus {
    /// Recognize a slot text field id such as `p2t0en`.
    ///
    /// Ids of other fields (coordinates, transform, style) are not text
    /// fields and yield `None`.
    pub fn parse(id: &str, langs: &[String]) -> Option<Self> {
        let rest = id.strip_prefix('p')?;
        let (panel, rest) = split_number(rest)?;
        let rest = rest.strip_prefix('t')?;
        let (slot, lang) = split_number(rest)?;
        langs.iter().find(|l| l.as_str() == lang).map(|lang| Self {
            panel,
            slot,
            lang: lang.clone(),
        })
    }
}

fn split_number(s: &str) -> Option<(usize, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let n = s[..end].parse().ok()?;
    Some((n, &s[end..]))
}

/// Record which control triggered the post-back before the form is sent.
pub fn prepare_post_back(sink: &mut impl FieldSink, name: &str) -> Result<(), OverlayError> {
    log::debug!("Post-back from {}", name);
    sink.set_field_value(FOCUS_FIELD, name)
}
