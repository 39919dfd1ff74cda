//! Placing text boxes and bubble pointers with auxiliary clicks.
//!
//! Clicking into a panel with the auxiliary (middle) button places the next
//! unplaced slot: the first click anchors one corner, the second click the
//! opposite corner. A click with the pointer modifier held instead sets the
//! bubble pointer of the most recently placed slot.

use crate::error::OverlayError;
use crate::fields::{FieldSink, FieldSource, SlotFields};
use crate::model::{COORD_LIMIT, Point, TextBox};

/// Convert a click offset inside the (possibly zoomed) panel view to page
/// coordinates.
///
/// `zoom_div` undoes the view's zoom; results truncate toward zero and are
/// clamped to the accepted coordinate range.
pub fn click_to_page(origin: Point, offset_x: f64, offset_y: f64, zoom_div: f64) -> Point {
    let page = |o: i32, offset: f64| {
        ((f64::from(o) + offset * zoom_div) as i32).clamp(-COORD_LIMIT, COORD_LIMIT)
    };
    Point::new(page(origin.x, offset_x), page(origin.y, offset_y))
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// First corner of `slot` set.
    Anchored { slot: usize, at: Point },
    /// Box of `slot` completed.
    Placed { slot: usize, rect: TextBox },
    /// Second click on the anchor's row or column; the anchor is kept.
    Rejected { slot: usize },
    /// Bubble pointer of `slot` set.
    PointerSet { slot: usize, at: Point },
    /// Every slot already has a box, or none has one to point from.
    NoSlot,
}

/// Click placement state of one panel.
#[derive(Debug, Clone, Default)]
pub struct BoxPlacer {
    panel: usize,
    max_slots: usize,
    anchor: Option<(usize, Point)>,
    last_placed: Option<usize>,
}

impl BoxPlacer {
    pub fn new(panel: usize, max_slots: usize) -> Self {
        Self {
            panel,
            max_slots,
            anchor: None,
            last_placed: None,
        }
    }

    /// The anchored slot and corner awaiting a second click.
    pub fn pending(&self) -> Option<(usize, Point)> {
        self.anchor
    }

    pub fn cancel(&mut self) {
        self.anchor = None;
    }

    fn placed_rect(&self, fields: &impl FieldSource, slot: usize) -> Option<TextBox> {
        let names = SlotFields::new(self.panel, slot);
        let position = fields
            .field_value(&names.position())
            .and_then(|v| Point::parse_pair(&v))?;
        let size = fields
            .field_value(&names.size())
            .and_then(|v| Point::parse_pair(&v))?;
        Some(TextBox::from_position_size(position, size)).filter(TextBox::is_placed)
    }

    /// Handle a box placement click at page coordinate `at`.
    pub fn click<F>(&mut self, fields: &mut F, at: Point) -> Result<Placement, OverlayError>
    where
        F: FieldSource + FieldSink,
    {
        if let Some((slot, anchor)) = self.anchor {
            let width = at.x - anchor.x;
            let height = at.y - anchor.y;
            if width == 0 || height == 0 {
                log::warn!(
                    "Panel {} slot {}: box from {:?} to {:?} has no area",
                    self.panel,
                    slot,
                    anchor,
                    at
                );
                return Ok(Placement::Rejected { slot });
            }

            // Negative spans flip the corner so the stored box stays positive
            let rect = TextBox::from_corners(anchor, at);
            SlotFields::new(self.panel, slot).write_rect(fields, &rect)?;
            self.anchor = None;
            self.last_placed = Some(slot);
            log::debug!("Panel {} slot {}: placed {:?}", self.panel, slot, rect);
            return Ok(Placement::Placed { slot, rect });
        }

        let Some(slot) = (0..self.max_slots).find(|&s| self.placed_rect(&*fields, s).is_none())
        else {
            log::debug!("Panel {}: all {} slots placed", self.panel, self.max_slots);
            return Ok(Placement::NoSlot);
        };

        let names = SlotFields::new(self.panel, slot);
        fields.set_field_value(&names.position(), &at.to_pair())?;
        fields.set_field_value(&names.size(), &Point::ORIGIN.to_pair())?;
        self.anchor = Some((slot, at));
        Ok(Placement::Anchored { slot, at })
    }

    /// Set the bubble pointer of the most recently placed slot, or of the
    /// last slot with a box.
    pub fn point<F>(&mut self, fields: &mut F, at: Point) -> Result<Placement, OverlayError>
    where
        F: FieldSource + FieldSink,
    {
        let slot = self
            .last_placed
            .filter(|&s| self.placed_rect(&*fields, s).is_some())
            .or_else(|| {
                (0..self.max_slots)
                    .rev()
                    .find(|&s| self.placed_rect(&*fields, s).is_some())
            });
        let Some(slot) = slot else {
            return Ok(Placement::NoSlot);
        };

        fields.set_field_value(&SlotFields::new(self.panel, slot).pointer(), &at.to_pair())?;
        Ok(Placement::PointerSet { slot, at })
    }
}
