//! Data models for panels, text slots and their geometry.

mod geometry;
mod panel;
mod slot;

pub use geometry::{COORD_LIMIT, Point, Polygon, TextBox};
pub use panel::Panel;
pub use slot::{PointerKind, STORY_TITLE_STYLE, TextSlot};
