//! Snap point configuration and end-of-gesture snap resolution.

use crate::gesture_constants::FLING_THRESHOLD;

/// The three allowed resting positions of the panel, as percentages of the
/// sheet viewport height. Strictly increasing, immutable per controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapPoints {
    collapsed: f32,
    half: f32,
    expanded: f32,
}

impl SnapPoints {
    /// Validates and builds a snap configuration.
    ///
    /// Returns `None` unless all three values are finite, within
    /// `[0, 100]`, and strictly increasing.
    pub fn new(collapsed: f32, half: f32, expanded: f32) -> Option<Self> {
        let in_range =
            |v: f32| v.is_finite() && (0.0..=100.0).contains(&v);
        if !(in_range(collapsed) && in_range(half) && in_range(expanded)) {
            return None;
        }
        if !(collapsed < half && half < expanded) {
            return None;
        }
        Some(Self {
            collapsed,
            half,
            expanded,
        })
    }

    /// The stock configuration used when a host supplies an invalid one.
    pub fn fallback() -> Self {
        Self {
            collapsed: 10.0,
            half: 50.0,
            expanded: 90.0,
        }
    }

    pub fn collapsed(&self) -> f32 {
        self.collapsed
    }

    pub fn half(&self) -> f32 {
        self.half
    }

    pub fn expanded(&self) -> f32 {
        self.expanded
    }

    pub fn as_array(&self) -> [f32; 3] {
        [self.collapsed, self.half, self.expanded]
    }

    /// Index of `value` within the configured points, if it is one of them.
    pub fn index_of(&self, value: f32) -> Option<usize> {
        self.as_array().iter().position(|&p| p == value)
    }

    /// The nearest snap point to `position` by absolute distance.
    /// Exact ties resolve toward the smaller point.
    pub fn nearest(&self, position: f32) -> f32 {
        let mut best = self.collapsed;
        let mut best_dist = (position - self.collapsed).abs();
        for &point in &[self.half, self.expanded] {
            let dist = (position - point).abs();
            if dist < best_dist {
                best = point;
                best_dist = dist;
            }
        }
        best
    }

    /// The smallest snap point strictly above `position`, or `expanded`
    /// when none is.
    pub fn neighbor_above(&self, position: f32) -> f32 {
        for &point in &self.as_array() {
            if point > position {
                return point;
            }
        }
        self.expanded
    }

    /// The largest snap point strictly below `position`, or `collapsed`
    /// when none is.
    pub fn neighbor_below(&self, position: f32) -> f32 {
        for &point in self.as_array().iter().rev() {
            if point < position {
                return point;
            }
        }
        self.collapsed
    }
}

/// Picks the landing snap point for a finished gesture.
///
/// `velocity_y` is the release velocity along the pointer's y axis in
/// px/ms: negative means the finger was moving up, which expands the sheet.
/// A fling past [`FLING_THRESHOLD`] snaps to the adjacent point in the
/// direction of motion, clamped at the extremes; anything slower snaps to
/// the nearest point.
pub fn resolve_snap(position: f32, velocity_y: f32, points: &SnapPoints) -> f32 {
    let position = if position.is_finite() {
        position.clamp(0.0, 100.0)
    } else {
        points.collapsed()
    };
    let velocity_y = if velocity_y.is_finite() { velocity_y } else { 0.0 };

    if velocity_y.abs() >= FLING_THRESHOLD {
        if velocity_y < 0.0 {
            points.neighbor_above(position)
        } else {
            points.neighbor_below(position)
        }
    } else {
        points.nearest(position)
    }
}
