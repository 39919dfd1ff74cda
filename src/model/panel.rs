//! Panels: rectangular regions of a scanned page holding text slots.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, TextBox};
use super::slot::TextSlot;

/// A panel of a scanned comic page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Panel {
    /// Position of this panel on its page.
    pub index: usize,
    /// Panel bounds in page coordinates.
    pub rect: TextBox,
    /// Text slots, in slot order.
    #[serde(default)]
    pub slots: Vec<TextSlot>,
}

impl Panel {
    pub fn new(index: usize, rect: TextBox) -> Self {
        Self {
            index,
            rect,
            slots: Vec::new(),
        }
    }

    pub fn with_slot(mut self, slot: TextSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Page coordinate of the panel's top-left corner.
    pub fn origin(&self) -> Point {
        self.rect.top_left()
    }

    /// Slots whose boxes are placed, in slot order.
    pub fn placed_slots(&self) -> impl Iterator<Item = (&TextSlot, TextBox)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.placed_rect().map(|rect| (slot, rect)))
    }
}
