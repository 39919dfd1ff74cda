//! Error types for overlay rendering and the browser binding.

use thiserror::Error;

/// Errors that can occur while rendering or applying panel overlays.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// XML writer error while assembling markup
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Rendered markup was not valid UTF-8
    #[error("Rendered markup is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An element the page is expected to contain is missing
    #[error("Missing element: {id}")]
    MissingElement {
        /// DOM id that was looked up
        id: String,
    },

    /// Panel index outside the panels known to the page
    #[error("Unknown panel: {index}")]
    UnknownPanel {
        /// The panel index
        index: usize,
    },

    /// Colour label not present in the palette
    #[error("Unknown colour label: {label}")]
    UnknownColor {
        /// The label that was looked up
        label: String,
    },

    /// Error reported by the browser
    #[error("Browser error: {0}")]
    Browser(String),
}

impl OverlayError {
    /// Create a missing element error.
    pub fn missing_element(id: impl Into<String>) -> Self {
        Self::MissingElement { id: id.into() }
    }

    /// Create an unknown colour error.
    pub fn unknown_color(label: impl Into<String>) -> Self {
        Self::UnknownColor {
            label: label.into(),
        }
    }
}
