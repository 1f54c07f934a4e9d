//! Raw input event model.
//!
//! Hosts translate their platform events (DOM touch/pointer/wheel, winit,
//! test robots) into these shapes; the adapter reduces both the legacy
//! discrete-touch path and the unified-pointer path to the controller's
//! single `{y, time_ms}` sample representation.

pub type TouchId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One active touch point. Only the vertical coordinate participates in
/// sheet gestures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: TouchId,
    pub y: f32,
}

/// Where on the sheet an event stream originated.
///
/// The grab handle drives the panel unconditionally; the content area goes
/// through intent classification first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputRegion {
    Handle,
    Content,
}

/// A platform input event, already hit-tested to the sheet by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum SheetEvent {
    /// Legacy multi-touch stream; `points` holds the touches that changed
    /// in this event.
    Touch {
        phase: InputPhase,
        points: Vec<TouchPoint>,
    },
    /// Unified single-pointer stream.
    Pointer { phase: InputPhase, y: f32 },
    /// Discrete scroll tick. Positive `delta_y` scrolls content downward.
    Wheel { delta_y: f32 },
}
