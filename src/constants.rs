//! Default values for configuration and rendering.

/// Default scan resolution in pixels per centimetre (300 dpi).
pub const DEFAULT_PX_PER_CM: f64 = 118.11;

/// Default font size, in centimetres on an A4 page.
pub const DEFAULT_FONT_SIZE_CM_A4: f64 = 0.45;

/// Default distance between text lines, in centimetres on an A4 page.
pub const DEFAULT_PER_LINE_DY_CM_A4: f64 = 0.5;

/// Default bubble outline stroke width in centimetres.
pub const DEFAULT_BOX_POLY_STROKE_WIDTH_CM: f64 = 0.05;

/// Default line indent inside bubbles, in centimetres on an A4 page.
pub const DEFAULT_BOX_POLY_DX_CM_A4: f64 = 0.15;

/// Default CSS class of bubble outline polygons.
pub const DEFAULT_CLS_BOX_POLY: &str = "pt";

/// Default CSS class of per-line text spans.
pub const DEFAULT_TSPAN_CSS_CLS: &str = "std";

/// Font size correction so glyphs stay inside the measured box.
pub const FONT_SIZE_FACTOR: f64 = 0.995;

/// Line spacing factor for story-title slots.
pub const STORY_TITLE_LINE_FACTOR: f64 = 1.23;

/// Number of distinct slot highlight colour classes (`col0`..`col7`).
pub const SLOT_COLOR_CLASSES: usize = 8;

/// Default maximum number of text slots per panel.
pub const DEFAULT_MAX_SLOTS: usize = 8;

/// Default project languages.
pub const DEFAULT_LANGS: &[&str] = &["en", "de"];
