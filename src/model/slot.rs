//! Text slots: the editable text boxes of a panel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::geometry::{Point, TextBox};

/// Style marker for story-title slots, which get taller line spacing.
pub const STORY_TITLE_STYLE: &str = "_storytitle";

/// How a slot's pointer field shapes its outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// No pointer: text only, no outline.
    None,
    /// Pointer set to the `(0, 0)` sentinel: filled box without a tail.
    Boxed,
    /// Speech bubble whose tail points at this page coordinate.
    Balloon(Point),
}

impl PointerKind {
    /// Whether an outline polygon is drawn at all.
    pub fn has_outline(&self) -> bool {
        !matches!(self, PointerKind::None)
    }
}

/// One text box within a panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSlot {
    /// Position of this slot within its panel.
    pub index: usize,
    /// Box geometry in page coordinates, if the fields parsed.
    #[serde(default)]
    pub rect: Option<TextBox>,
    /// Speech bubble pointer in page coordinates.
    #[serde(default)]
    pub pointer: Option<Point>,
    /// Text per language code.
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
    /// SVG `transform` attribute for the slot's `<text>`.
    #[serde(default)]
    pub transform: String,
    /// Style for the outer `<tspan>`, or a `.`-prefixed class list.
    #[serde(default)]
    pub tspan_style: String,
}

impl TextSlot {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn with_rect(mut self, rect: TextBox) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_pointer(mut self, pointer: Point) -> Self {
        self.pointer = Some(pointer);
        self
    }

    pub fn with_text(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(lang.into(), text.into());
        self
    }

    /// The box, but only once it has positive width and height.
    pub fn placed_rect(&self) -> Option<TextBox> {
        self.rect.filter(TextBox::is_placed)
    }

    pub fn pointer_kind(&self) -> PointerKind {
        match self.pointer {
            None => PointerKind::None,
            Some(p) if !p.in_range() => PointerKind::None,
            Some(p) if p.is_origin() => PointerKind::Boxed,
            Some(p) => PointerKind::Balloon(p),
        }
    }

    /// Text for `lang`, if it holds anything besides whitespace.
    pub fn text(&self, lang: &str) -> Option<&str> {
        self.texts
            .get(lang)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn is_story_title(&self) -> bool {
        self.tspan_style == STORY_TITLE_STYLE
    }

    /// Split the tspan style into (inline style, extra classes).
    ///
    /// `".shout.big"` yields no inline style and classes `shout`, `big`.
    /// The story-title marker is not a style and yields neither.
    pub fn tspan_style_and_classes(&self) -> (&str, Vec<&str>) {
        if self.is_story_title() {
            return ("", Vec::new());
        }
        match self.tspan_style.strip_prefix('.') {
            Some(classes) => (
                "",
                classes.split('.').filter(|c| !c.is_empty()).collect(),
            ),
            None => (self.tspan_style.as_str(), Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_kind() {
        let slot = TextSlot::new(0);
        assert_eq!(slot.pointer_kind(), PointerKind::None);
        assert!(!slot.pointer_kind().has_outline());

        let boxed = TextSlot::new(0).with_pointer(Point::ORIGIN);
        assert_eq!(boxed.pointer_kind(), PointerKind::Boxed);

        let balloon = TextSlot::new(0).with_pointer(Point::new(3, 4));
        assert_eq!(balloon.pointer_kind(), PointerKind::Balloon(Point::new(3, 4)));

        let wild = TextSlot::new(0).with_pointer(Point::new(i32::MIN, 4));
        assert_eq!(wild.pointer_kind(), PointerKind::None);
    }

    #[test]
    fn test_placed_rect_filters_empty_boxes() {
        let slot = TextSlot::new(0).with_rect(TextBox::new(10, 10, 0, 5));
        assert!(slot.placed_rect().is_none());
        let slot = TextSlot::new(0).with_rect(TextBox::new(10, 10, 3, 5));
        assert!(slot.placed_rect().is_some());
    }

    #[test]
    fn test_blank_text_is_none() {
        let slot = TextSlot::new(0).with_text("en", "  \n").with_text("de", "Hallo");
        assert_eq!(slot.text("en"), None);
        assert_eq!(slot.text("de"), Some("Hallo"));
        assert_eq!(slot.text("fr"), None);
    }

    #[test]
    fn test_tspan_classes() {
        let mut slot = TextSlot::new(0);
        slot.tspan_style = ".shout.big".to_string();
        assert_eq!(slot.tspan_style_and_classes(), ("", vec!["shout", "big"]));

        slot.tspan_style = STORY_TITLE_STYLE.to_string();
        assert_eq!(slot.tspan_style_and_classes(), ("", vec![]));

        slot.tspan_style = "font-weight: bold".to_string();
        assert_eq!(slot.tspan_style_and_classes(), ("font-weight: bold", vec![]));
    }
}
