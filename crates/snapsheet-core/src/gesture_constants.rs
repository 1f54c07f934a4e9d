//! Shared gesture thresholds for sheet-drag vs content-scroll disambiguation.
//!
//! These values are intentionally kept in one place: the classifier, the
//! boundary-lock handoff, and the wheel path must agree on them or gestures
//! develop "dead zones" where neither the sheet nor the content responds.
//!
//! # DPI Considerations
//!
//! All distances are in logical pixels. For very high-density touch screens,
//! consider scaling by the device's DPI factor. Current implementation uses
//! fixed values that work well for typical mobile/desktop displays.

/// Jitter buffer around content scroll edges, in logical pixels.
///
/// A viewport is considered "at" its top or bottom edge while within this
/// distance of it. Sub-pixel scroll positions and momentum overshoot on
/// mobile browsers make an exact `scroll_top == 0` test unreliable.
pub const BOUNDARY_BUFFER: f32 = 4.0;

/// Pull distance past an armed scroll boundary before ownership flips to
/// the sheet, in logical pixels.
///
/// Below this, a gesture that touched a boundary is still a content scroll;
/// ending it leaves the sheet untouched. Comparable to a touch slop
/// (Android's ViewConfiguration uses ~8dp), but a little larger since the
/// flip moves a whole panel rather than starting a scroll.
pub const FLIP_THRESHOLD: f32 = 12.0;

/// Accumulated downward pull required to collapse an expanded sheet whose
/// content has no scrollable overflow, in logical pixels.
pub const DISMISS_DISTANCE: f32 = 40.0;

/// Velocity required alongside [`DISMISS_DISTANCE`] for a touch/pointer
/// collapse of a non-scrollable expanded sheet, in px/ms.
///
/// Wheel input skips this check: a wheel tick is already a deliberate act.
pub const DISMISS_VELOCITY: f32 = 1.5;

/// Release velocity above which a gesture snaps to the adjacent point in
/// its direction of motion instead of the nearest one, in px/ms.
pub const FLING_THRESHOLD: f32 = 0.5;

/// Minimum wheel delta magnitude treated as a real scroll tick.
///
/// Trackpads emit sub-pixel inertial noise well below this.
pub const WHEEL_MIN_DELTA: f32 = 12.0;

/// Duration of the settle animation from release position to snap target,
/// in milliseconds.
pub const SETTLE_DURATION_MS: f64 = 220.0;
