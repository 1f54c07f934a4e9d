//! Routes raw platform events into the sheet controller.
//!
//! Owns the controller plus the bookkeeping the core deliberately does not
//! carry: the monotonic clock, the set of active touches, and which single
//! pointer is the primary one. Only the primary drives the controller;
//! concurrent extra touches are ignored, never merged.

use smallvec::SmallVec;
use web_time::Instant;

use snapsheet_core::{GestureKind, ScrollDecision, SheetController};

use crate::events::{InputPhase, InputRegion, SheetEvent, TouchId, TouchPoint};

/// The stream currently driving the controller.
#[derive(Clone, Copy, Debug)]
struct ActiveGesture {
    /// Touch identifier, or `None` for the unified pointer stream.
    id: Option<TouchId>,
    /// Region the gesture started in; it keeps that routing for its whole
    /// lifetime even if the pointer wanders.
    region: InputRegion,
    last_y: f32,
}

pub struct InputAdapter {
    controller: SheetController,
    epoch: Instant,
    /// Touch ids currently down, in arrival order.
    active_touches: SmallVec<[TouchId; 4]>,
    primary: Option<ActiveGesture>,
}

impl InputAdapter {
    pub fn new(controller: SheetController) -> Self {
        Self {
            controller,
            epoch: Instant::now(),
            active_touches: SmallVec::new(),
            primary: None,
        }
    }

    pub fn controller(&self) -> &SheetController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SheetController {
        &mut self.controller
    }

    fn now_ms(&self) -> i64 {
        self.epoch.elapsed().as_millis() as i64
    }

    /// Advances the settle animation; call once per host frame.
    pub fn tick(&mut self) {
        let now = self.now_ms();
        self.controller.tick(now);
    }

    /// Advances with an explicit timestamp, for hosts with their own
    /// frame clock and for tests.
    pub fn tick_at(&mut self, time_ms: i64) {
        self.controller.tick(time_ms);
    }

    /// Dispatches an event stamped with the adapter's own clock.
    pub fn dispatch(&mut self, region: InputRegion, event: SheetEvent) -> ScrollDecision {
        let now = self.now_ms();
        self.dispatch_at(region, event, now)
    }

    /// Dispatches with an explicit timestamp. Hosts with event timestamps
    /// (and tests) use this to keep velocity estimation exact.
    pub fn dispatch_at(
        &mut self,
        region: InputRegion,
        event: SheetEvent,
        time_ms: i64,
    ) -> ScrollDecision {
        match event {
            SheetEvent::Wheel { delta_y } => {
                self.controller
                    .handle_scroll_gesture(delta_y, GestureKind::Wheel, 0.0, time_ms)
            }
            SheetEvent::Pointer { phase, y } => self.on_pointer(region, phase, y, time_ms),
            SheetEvent::Touch { phase, points } => {
                self.on_touch(region, phase, &points, time_ms)
            }
        }
    }

    fn on_pointer(
        &mut self,
        region: InputRegion,
        phase: InputPhase,
        y: f32,
        time_ms: i64,
    ) -> ScrollDecision {
        match phase {
            InputPhase::Start => {
                if self.primary.is_some() {
                    // First gesture retains ownership.
                    return ScrollDecision::Ignore;
                }
                self.primary = Some(ActiveGesture {
                    id: None,
                    region,
                    last_y: y,
                });
                self.begin(region, y, time_ms)
            }
            InputPhase::Move => {
                let Some(gesture) = &mut self.primary else {
                    return ScrollDecision::Ignore;
                };
                if gesture.id.is_some() {
                    // A touch stream owns the controller right now.
                    return ScrollDecision::Ignore;
                }
                let delta_y = y - gesture.last_y;
                gesture.last_y = y;
                let region = gesture.region;
                self.step(region, delta_y, y, time_ms, GestureKind::Pointer)
            }
            InputPhase::End | InputPhase::Cancel => {
                let Some(gesture) = self.primary else {
                    return ScrollDecision::Ignore;
                };
                if gesture.id.is_some() {
                    return ScrollDecision::Ignore;
                }
                self.primary = None;
                self.finish(gesture.region, phase, time_ms)
            }
        }
    }

    fn on_touch(
        &mut self,
        region: InputRegion,
        phase: InputPhase,
        points: &[TouchPoint],
        time_ms: i64,
    ) -> ScrollDecision {
        match phase {
            InputPhase::Start => {
                for point in points {
                    if !self.active_touches.contains(&point.id) {
                        self.active_touches.push(point.id);
                    }
                }
                if self.primary.is_some() {
                    return ScrollDecision::Ignore;
                }
                let Some(first) = points.first() else {
                    return ScrollDecision::Ignore;
                };
                self.primary = Some(ActiveGesture {
                    id: Some(first.id),
                    region,
                    last_y: first.y,
                });
                self.begin(region, first.y, time_ms)
            }
            InputPhase::Move => {
                let Some(gesture) = &mut self.primary else {
                    return ScrollDecision::Ignore;
                };
                let Some(id) = gesture.id else {
                    return ScrollDecision::Ignore;
                };
                let Some(point) = points.iter().find(|p| p.id == id) else {
                    // Only secondary touches moved.
                    return ScrollDecision::Ignore;
                };
                let delta_y = point.y - gesture.last_y;
                gesture.last_y = point.y;
                let region = gesture.region;
                let y = point.y;
                self.step(region, delta_y, y, time_ms, GestureKind::Touch)
            }
            InputPhase::End | InputPhase::Cancel => {
                for point in points {
                    self.active_touches.retain(|id| *id != point.id);
                }
                let Some(gesture) = self.primary else {
                    return ScrollDecision::Ignore;
                };
                let Some(id) = gesture.id else {
                    return ScrollDecision::Ignore;
                };
                let primary_ended =
                    points.is_empty() || points.iter().any(|p| p.id == id);
                if !primary_ended {
                    return ScrollDecision::Ignore;
                }
                // Remaining secondary touches never inherit the gesture.
                self.primary = None;
                self.finish(gesture.region, phase, time_ms)
            }
        }
    }

    fn begin(&mut self, region: InputRegion, y: f32, time_ms: i64) -> ScrollDecision {
        match region {
            InputRegion::Handle => {
                self.controller.handle_drag_start(y, time_ms);
                if self.controller.is_dragging() {
                    ScrollDecision::Sheet
                } else {
                    ScrollDecision::Ignore
                }
            }
            InputRegion::Content => {
                self.controller.handle_content_scroll_start(y, time_ms);
                ScrollDecision::Content
            }
        }
    }

    fn step(
        &mut self,
        region: InputRegion,
        delta_y: f32,
        y: f32,
        time_ms: i64,
        kind: GestureKind,
    ) -> ScrollDecision {
        match region {
            InputRegion::Handle => {
                self.controller.handle_drag_move(y, time_ms);
                if self.controller.is_dragging() {
                    ScrollDecision::Sheet
                } else {
                    ScrollDecision::Ignore
                }
            }
            InputRegion::Content => self
                .controller
                .handle_content_scroll_intent(delta_y, y, time_ms, kind),
        }
    }

    fn finish(
        &mut self,
        region: InputRegion,
        phase: InputPhase,
        time_ms: i64,
    ) -> ScrollDecision {
        match region {
            InputRegion::Handle => {
                if phase == InputPhase::Cancel {
                    self.controller.handle_drag_cancel(time_ms);
                } else {
                    self.controller.handle_drag_end(time_ms);
                }
            }
            InputRegion::Content => self.controller.handle_content_scroll_end(time_ms),
        }
        ScrollDecision::Ignore
    }
}

impl Drop for InputAdapter {
    fn drop(&mut self) {
        // Host teardown mid-gesture: settle deterministically instead of
        // leaving the controller dangling in `Dragging`.
        if self.controller.is_dragging() {
            let now = self.now_ms();
            log::trace!("input adapter dropped mid-gesture; settling");
            self.controller.handle_drag_cancel(now);
        }
    }
}
