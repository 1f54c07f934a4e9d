//! Host element seams: the scrollable content viewport and the sheet surface.
//!
//! The controller only ever *reads* content scroll metrics and *writes* the
//! sheet's visual offset. Both sides are traits so the state machine stays
//! framework-agnostic; hosts adapt their DOM nodes, views, or test fakes.

use crate::gesture_constants::BOUNDARY_BUFFER;

/// Read-only scroll metrics of the content hosted inside the sheet.
///
/// Implementers must return *live* values on every call. The controller
/// re-reads them on each input event so that mid-gesture content mutation
/// (items loading in, keyboards resizing the viewport) is picked up
/// immediately; nothing is cached across events.
pub trait ContentViewport {
    /// Current scroll offset from the top, in logical pixels.
    fn scroll_top(&self) -> f32;

    /// Total height of the scrollable content, in logical pixels.
    fn scroll_height(&self) -> f32;

    /// Height of the visible content area, in logical pixels.
    fn client_height(&self) -> f32;
}

/// The draggable panel surface.
pub trait SheetSurface {
    /// Writes the panel's visual occupancy, as a percentage of the sheet
    /// viewport in `[0, 100]`. Called once per drag-move / animation frame
    /// and expected to be O(1) (a transform write, not a relayout).
    fn set_position(&self, percent: f32);

    /// Height of the area the sheet moves within, in logical pixels.
    /// Used for the pixel-to-percent conversion of drag deltas.
    fn height(&self) -> f32;
}

/// Snapshot of one viewport read, answering "can content scroll further?".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub max_scroll: f32,
    pub has_overflow: bool,
    pub at_top: bool,
    pub at_bottom: bool,
}

impl ScrollMetrics {
    /// Reads live metrics from a content viewport.
    pub fn read(viewport: &dyn ContentViewport) -> Self {
        let scroll_top = viewport.scroll_top();
        let scroll_height = viewport.scroll_height();
        let client_height = viewport.client_height();

        if !scroll_top.is_finite() || !scroll_height.is_finite() || !client_height.is_finite() {
            log::warn!(
                "content viewport reported non-finite metrics \
                 (scroll_top={scroll_top}, scroll_height={scroll_height}, \
                 client_height={client_height}); treating as non-scrollable"
            );
            return Self::no_overflow();
        }

        let max_scroll = (scroll_height - client_height).max(0.0);
        Self {
            scroll_top,
            max_scroll,
            has_overflow: max_scroll > 0.0,
            at_top: scroll_top <= BOUNDARY_BUFFER,
            at_bottom: scroll_top >= max_scroll - BOUNDARY_BUFFER,
        }
    }

    /// Metrics for absent or non-scrollable content.
    pub fn no_overflow() -> Self {
        Self {
            scroll_top: 0.0,
            max_scroll: 0.0,
            has_overflow: false,
            at_top: true,
            at_bottom: true,
        }
    }
}
