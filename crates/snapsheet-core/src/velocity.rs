//! Velocity tracking for fling-based snap resolution.
//!
//! A fixed-size ring buffer of the trailing pointer samples of the active
//! gesture. Velocity is the time-weighted average slope across the window,
//! in px/ms; a long pause before release reads as zero velocity so a
//! hold-then-release never flings.

/// Ring buffer size for velocity tracking samples.
const HISTORY_SIZE: usize = 5;

/// If no movement for this duration, assume the pointer has stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

/// A vertical pointer reading with timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub time_ms: i64,
    pub y: f32,
}

/// Tracks the trailing samples of one gesture.
///
/// The buffer is reset at drag start and owned by the controller for the
/// lifetime of the gesture. Timestamps must not go backwards; an
/// out-of-order sample is dropped rather than applied after a later one.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: [Option<GestureSample>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Adds a sample at the given time (milliseconds).
    ///
    /// Non-finite readings and timestamps earlier than the newest sample
    /// are discarded.
    pub fn push(&mut self, time_ms: i64, y: f32) {
        if !y.is_finite() {
            return;
        }
        if let Some(last) = self.samples[self.index] {
            if time_ms < last.time_ms {
                log::trace!(
                    "ignoring sample with timestamp {time_ms} earlier than last {}",
                    last.time_ms
                );
                return;
            }
        }

        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(GestureSample { time_ms, y });
    }

    /// Returns the most recent sample, if any.
    pub fn last(&self) -> Option<GestureSample> {
        self.samples[self.index]
    }

    /// Computes the gesture velocity in px/ms.
    ///
    /// Returns 0.0 with fewer than two samples, or when the pointer sat
    /// still longer than [`ASSUME_STOPPED_MS`] before the newest sample.
    pub fn velocity(&self) -> f32 {
        let newest = match self.samples[self.index] {
            Some(sample) => sample,
            None => return 0.0,
        };

        let mut current_index = self.index;
        let mut oldest = newest;
        let mut previous = newest;
        let mut sample_count = 1;

        loop {
            let prev_index = if current_index == 0 {
                HISTORY_SIZE - 1
            } else {
                current_index - 1
            };
            if prev_index == self.index {
                break;
            }
            let Some(sample) = self.samples[prev_index] else {
                break;
            };

            // A gap wider than the stop threshold splits the gesture; only
            // the segment touching the newest sample counts.
            if previous.time_ms - sample.time_ms > ASSUME_STOPPED_MS {
                break;
            }

            oldest = sample;
            previous = sample;
            current_index = prev_index;
            sample_count += 1;
            if sample_count >= HISTORY_SIZE {
                break;
            }
        }

        if sample_count < 2 {
            return 0.0;
        }

        let total_time = (newest.time_ms - oldest.time_ms) as f32;
        if total_time <= 0.0 {
            return 0.0;
        }

        (newest.y - oldest.y) / total_time
    }

    /// Clears all tracked samples.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}
