//! Content-vs-sheet ownership resolution for vertical gestures.
//!
//! Ownership can change hands only exactly at a content scroll boundary,
//! never mid-scroll. This is what prevents scroll-chaining jumps: a list
//! being flicked through the middle of its range can never yank the panel.

use crate::gesture_constants::{DISMISS_DISTANCE, DISMISS_VELOCITY};
use crate::viewport::ScrollMetrics;

/// The shape of the input stream a gesture arrived on.
///
/// Wheel input is discrete-delta; touch and pointer are start/move/end
/// streams. The classifier is stricter with streams (they fire constantly)
/// and more permissive with wheel ticks (each one is deliberate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Touch,
    Pointer,
    Wheel,
}

/// Who a vertical delta belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GestureIntent {
    /// Inner content consumes the delta; the panel does not move.
    Content,
    /// The panel consumes the delta directly.
    Sheet,
    /// A top scroll boundary was hit; arm (or keep) the boundary lock.
    ArmTop,
    /// A bottom scroll boundary was hit with the lock already armed.
    ArmBottom,
    /// Nobody consumes it.
    Ignore,
}

/// Ownership verdict surfaced to hosts, so they can suppress native
/// content scrolling when the sheet consumed an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDecision {
    Content,
    Sheet,
    Ignore,
}

/// Classifies one vertical delta.
///
/// * `delta_y`: this event's delta, downward-positive (screen coords).
/// * `pull_y`: accumulated signed delta since the gesture began.
/// * `velocity`: current gesture speed magnitude, px/ms.
/// * `expanded`: whether the sheet rests at its fully expanded snap.
/// * `metrics`: a live read of the content viewport.
/// * `bottom_armed`: whether a bottom boundary lock is currently armed.
pub(crate) fn resolve_intent(
    delta_y: f32,
    pull_y: f32,
    velocity: f32,
    kind: GestureKind,
    expanded: bool,
    metrics: ScrollMetrics,
    bottom_armed: bool,
) -> GestureIntent {
    // Below the expanded snap the content is just peeking; any vertical
    // drag repositions the panel directly. Magnitude and velocity policy
    // is the snap resolver's job, not ours.
    if !expanded {
        return GestureIntent::Sheet;
    }

    if !metrics.has_overflow {
        // Nothing to scroll: only a deliberate downward pull collapses the
        // panel, everything else is noise against a static page.
        let deliberate = pull_y > DISMISS_DISTANCE
            && (velocity > DISMISS_VELOCITY || kind == GestureKind::Wheel);
        return if deliberate {
            GestureIntent::Sheet
        } else {
            GestureIntent::Ignore
        };
    }

    if delta_y > 0.0 && metrics.at_top {
        return GestureIntent::ArmTop;
    }

    if delta_y < 0.0 && metrics.at_bottom {
        // The panel is already fully expanded, so there is nowhere further
        // to go; stay conservative for streams. Wheel gets the lock once
        // it has knocked on the edge before.
        if kind == GestureKind::Wheel && bottom_armed {
            return GestureIntent::ArmBottom;
        }
        return GestureIntent::Content;
    }

    // Mid-scroll: content always wins.
    GestureIntent::Content
}
