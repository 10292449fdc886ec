//! Scroll-proximity trigger, decoupled from any concrete viewport.
//!
//! The trigger only sees a [`ViewportGeometry`] snapshot, so the same
//! predicate works for browser-style pixel geometry and for terminal rows,
//! and can be unit tested with synthetic values. Deduplicating redundant
//! fires during an in-flight load is the pagination guard's job, not ours.

/// Snapshot of scrollable geometry in abstract units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportGeometry {
    /// Distance scrolled from the top of the content.
    pub scroll_offset: u64,
    /// Visible extent of the viewport.
    pub viewport_height: u64,
    /// Total extent of the rendered content.
    pub content_height: u64,
}

/// Fires when the viewport bottom is within `threshold` units of the end of
/// the content: `scroll_offset + viewport_height >= content_height - threshold`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTrigger {
    threshold: u64,
}

impl ScrollTrigger {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    pub fn near_end(&self, geometry: &ViewportGeometry) -> bool {
        geometry.scroll_offset + geometry.viewport_height
            >= geometry.content_height.saturating_sub(self.threshold)
    }
}
