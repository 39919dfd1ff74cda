//! Writing rendered markup into overlay containers.
//!
//! A refresh runs on every keystroke, so the container is only touched when
//! the markup actually changed. Re-rendering the same fields is then free of
//! DOM writes and the browser does not reflow.

use crate::error::OverlayError;

/// An element whose inner markup shows a panel's overlay.
pub trait OverlayTarget {
    fn set_markup(&mut self, markup: &str) -> Result<(), OverlayError>;
}

/// Last markup written to one container.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    last: Option<String>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `markup` unless it equals what was last written.
    ///
    /// Returns whether the target was written.
    pub fn refresh(
        &mut self,
        target: &mut impl OverlayTarget,
        markup: String,
    ) -> Result<bool, OverlayError> {
        if self.last.as_deref() == Some(markup.as_str()) {
            log::trace!("Overlay unchanged, skipping write");
            return Ok(false);
        }
        target.set_markup(&markup)?;
        self.last = Some(markup);
        Ok(true)
    }

    /// Forget the last write, so the next refresh always writes.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

/// In-memory overlay target that counts writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget {
    pub markup: String,
    pub writes: usize,
}

impl OverlayTarget for MemoryTarget {
    fn set_markup(&mut self, markup: &str) -> Result<(), OverlayError> {
        self.markup = markup.to_string();
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_writes_once_for_same_markup() {
        let mut overlay = Overlay::new();
        let mut target = MemoryTarget::default();

        assert!(overlay.refresh(&mut target, "<div></div>".to_string()).unwrap());
        assert!(!overlay.refresh(&mut target, "<div></div>".to_string()).unwrap());
        assert_eq!(target.writes, 1);

        assert!(overlay.refresh(&mut target, "<p></p>".to_string()).unwrap());
        assert_eq!(target.writes, 2);
        assert_eq!(target.markup, "<p></p>");
    }

    #[test]
    fn test_first_empty_refresh_still_writes() {
        let mut overlay = Overlay::new();
        let mut target = MemoryTarget::default();
        assert!(overlay.refresh(&mut target, String::new()).unwrap());
        assert_eq!(overlay.last(), Some(""));
    }

    #[test]
    fn test_invalidate_forces_write() {
        let mut overlay = Overlay::new();
        let mut target = MemoryTarget::default();
        overlay.refresh(&mut target, "x".to_string()).unwrap();
        overlay.invalidate();
        assert!(overlay.refresh(&mut target, "x".to_string()).unwrap());
        assert_eq!(target.writes, 2);
    }
}
