//! Scanlet - panel text overlays for scanned comic pages
//!
//! Renders editable text boxes and speech-bubble outlines over scanned
//! panels, places boxes with mouse clicks, and keeps the page's form fields
//! and overlay markup in sync. Runs natively as a preview renderer and in
//! the browser through wasm-bindgen.

pub mod bubble;
pub mod config;
pub mod constants;
pub mod error;
pub mod fields;
pub mod markup;
pub mod model;
pub mod overlay;
pub mod palette;
pub mod placement;
pub mod render;

pub use bubble::{BubbleCase, BubblePlacer, TieBreak};
pub use config::{AppConfig, ConfigError, LogLevel, RenderSettings};
pub use error::OverlayError;
pub use fields::{FieldFocus, FieldSink, FieldSource, SlotFields};
pub use model::{Panel, Point, PointerKind, Polygon, TextBox, TextSlot};
pub use overlay::{Overlay, OverlayTarget};
pub use palette::{ColorPicker, Palette, Rgb};
pub use placement::{BoxPlacer, Placement};
pub use render::{PanelRenderer, RenderContext};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
