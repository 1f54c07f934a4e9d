//! The sheet drag state machine.
//!
//! Owns the panel position, the boundary lock, the sample buffer, and the
//! settle animation. All methods run synchronously inside the host's input
//! callbacks; the host drives settling by calling [`SheetController::tick`]
//! once per frame while [`ControllerState::Animating`].
//!
//! State graph: `Idle → Dragging → Animating → Idle`, with the alternate
//! handoff path `Idle ⇄ Armed → Dragging` when a gesture reaches a content
//! scroll boundary first.

use std::rc::Rc;

use crate::animation::SettleAnimation;
use crate::classify::{resolve_intent, GestureIntent, GestureKind, ScrollDecision};
use crate::gesture_constants::{FLIP_THRESHOLD, WHEEL_MIN_DELTA};
use crate::snap::{resolve_snap, SnapPoints};
use crate::velocity::VelocityTracker;
use crate::viewport::{ContentViewport, ScrollMetrics, SheetSurface};

/// Positions closer than this are the same position.
const POSITION_EPSILON: f32 = 0.001;

/// Index of the expanded snap point within [`SnapPoints`].
const EXPANDED_INDEX: usize = 2;

/// Which content scroll edge a gesture ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryEdge {
    Top,
    Bottom,
}

/// Recorded when a gesture first hits a scroll boundary. `arm_y` is the
/// pointer position at that instant; if the gesture later flips to a sheet
/// drag, the drag starts from here so the panel does not jump.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryLock {
    pub edge: BoundaryEdge,
    pub arm_y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControllerState {
    Idle,
    /// A boundary was hit but the pull hasn't crossed the flip threshold.
    Armed(BoundaryLock),
    Dragging,
    Animating,
}

/// Notified with the landing snap point once per completed gesture.
pub type SnapChangeListener = Rc<dyn Fn(f32)>;

/// Construction config for [`SheetController`].
pub struct SheetConfig {
    pub snap_points: SnapPoints,
    pub on_snap_change: Option<SnapChangeListener>,
}

impl SheetConfig {
    pub fn new(snap_points: SnapPoints) -> Self {
        Self {
            snap_points,
            on_snap_change: None,
        }
    }

    pub fn on_snap_change(mut self, listener: impl Fn(f32) + 'static) -> Self {
        self.on_snap_change = Some(Rc::new(listener));
        self
    }
}

pub struct SheetController {
    points: SnapPoints,
    on_snap_change: Option<SnapChangeListener>,
    surface: Option<Rc<dyn SheetSurface>>,
    content: Option<Rc<dyn ContentViewport>>,
    state: ControllerState,
    position: f32,
    snap_index: usize,
    start_y: f32,
    start_position: f32,
    /// Accumulated signed delta of the current content-region gesture.
    content_pull: f32,
    /// Timestamp of the last event or frame that wrote `position`. Events
    /// stamped earlier never overwrite a later write.
    last_applied_ms: i64,
    tracker: VelocityTracker,
    animation: Option<SettleAnimation>,
}

impl SheetController {
    pub fn new(config: SheetConfig) -> Self {
        let points = config.snap_points;
        Self {
            points,
            on_snap_change: config.on_snap_change,
            surface: None,
            content: None,
            state: ControllerState::Idle,
            position: points.collapsed(),
            snap_index: 0,
            start_y: 0.0,
            start_position: points.collapsed(),
            content_pull: 0.0,
            last_applied_ms: 0,
            tracker: VelocityTracker::new(),
            animation: None,
        }
    }

    /// Builds a controller from raw percentages, falling back to the stock
    /// configuration when the triple is invalid. Never panics: a broken UI
    /// affordance must not take the host down with it.
    pub fn with_points(collapsed: f32, half: f32, expanded: f32) -> Self {
        let points = SnapPoints::new(collapsed, half, expanded).unwrap_or_else(|| {
            log::warn!(
                "invalid snap points ({collapsed}, {half}, {expanded}); \
                 expected strictly increasing percentages in [0, 100], using fallback"
            );
            SnapPoints::fallback()
        });
        Self::new(SheetConfig::new(points))
    }

    // ------------------------------------------------------------------
    // Element attachment
    // ------------------------------------------------------------------

    /// Attaches the panel surface. Until this is called, drag and snap
    /// operations are no-ops.
    pub fn attach_surface(&mut self, surface: Rc<dyn SheetSurface>) {
        surface.set_position(self.position);
        self.surface = Some(surface);
    }

    /// Attaches the scrollable content viewport consulted by the
    /// classifier. Without one, content is treated as non-scrollable.
    pub fn attach_content(&mut self, content: Rc<dyn ContentViewport>) {
        self.content = Some(content);
    }

    pub fn detach_content(&mut self) {
        self.content = None;
    }

    // ------------------------------------------------------------------
    // Observability
    // ------------------------------------------------------------------

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Current vertical occupancy in `[0, 100]`.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// The active snap point. Always a member of the configured set;
    /// updates at gesture resolution, ahead of the settle animation.
    pub fn current_snap(&self) -> f32 {
        self.points.as_array()[self.snap_index]
    }

    pub fn is_dragging(&self) -> bool {
        self.state == ControllerState::Dragging
    }

    pub fn snap_points(&self) -> SnapPoints {
        self.points
    }

    // ------------------------------------------------------------------
    // Drag path (grab handle, or content after an ownership flip)
    // ------------------------------------------------------------------

    pub fn handle_drag_start(&mut self, y: f32, time_ms: i64) {
        if !y.is_finite() {
            return;
        }
        if self.surface.is_none() {
            log::trace!("drag start ignored: no sheet surface attached");
            return;
        }
        if self.state == ControllerState::Dragging {
            // The first gesture retains ownership; a second concurrent
            // stream is ignored, never merged.
            return;
        }
        self.adopt_animation_value(time_ms);
        self.start_y = y;
        self.start_position = self.position;
        self.last_applied_ms = time_ms;
        self.tracker.reset();
        self.tracker.push(time_ms, y);
        self.state = ControllerState::Dragging;
    }

    pub fn handle_drag_move(&mut self, y: f32, time_ms: i64) {
        if self.state != ControllerState::Dragging {
            return;
        }
        if !y.is_finite() {
            return;
        }
        if time_ms < self.last_applied_ms {
            // A late-delivered move must not roll the panel back behind
            // one that has already been applied.
            log::trace!(
                "ignoring move stamped {time_ms}, older than applied {}",
                self.last_applied_ms
            );
            return;
        }
        let Some(surface) = self.surface.clone() else {
            return;
        };
        let height = surface.height();
        if !height.is_finite() || height <= 0.0 {
            log::warn!("sheet surface reported unusable height {height}; dropping move");
            return;
        }
        let delta_percent = (self.start_y - y) / height * 100.0;
        self.position = (self.start_position + delta_percent).clamp(0.0, 100.0);
        self.last_applied_ms = time_ms;
        self.tracker.push(time_ms, y);
        surface.set_position(self.position);
    }

    pub fn handle_drag_end(&mut self, time_ms: i64) {
        self.content_pull = 0.0;
        if self.state != ControllerState::Dragging {
            if matches!(self.state, ControllerState::Armed(_)) {
                // Never pulled past the flip threshold: the gesture was a
                // pure content scroll and the panel stays put.
                self.state = ControllerState::Idle;
            }
            return;
        }
        // Account for idle time between the last move and the release, so
        // a hold-then-release doesn't inherit stale fling velocity.
        if let Some(last) = self.tracker.last() {
            self.tracker.push(time_ms, last.y);
        }
        let velocity = self.tracker.velocity();
        let target = resolve_snap(self.position, velocity, &self.points);
        self.settle_to(target, time_ms, true);
    }

    /// Pointer-cancel, a second concurrent pointer, or host teardown.
    /// Settles deterministically as an immediate drag end from the last
    /// known sample; gesture state is never silently dropped.
    pub fn handle_drag_cancel(&mut self, time_ms: i64) {
        self.handle_drag_end(time_ms);
    }

    // ------------------------------------------------------------------
    // Content-region path
    // ------------------------------------------------------------------

    /// Marks the start of a touch/pointer gesture on the scrollable
    /// content. Resets pull accumulation and seeds the sample buffer.
    pub fn handle_content_scroll_start(&mut self, y: f32, time_ms: i64) {
        if !y.is_finite() {
            return;
        }
        if self.state == ControllerState::Dragging {
            return;
        }
        self.adopt_animation_value(time_ms);
        self.content_pull = 0.0;
        self.last_applied_ms = time_ms;
        self.tracker.reset();
        self.tracker.push(time_ms, y);
    }

    /// Classifies one content-region move and routes it. Returns who
    /// consumed the event so the host can suppress native scrolling when
    /// the sheet took it.
    pub fn handle_content_scroll_intent(
        &mut self,
        delta_y: f32,
        y: f32,
        time_ms: i64,
        kind: GestureKind,
    ) -> ScrollDecision {
        if !delta_y.is_finite() || !y.is_finite() {
            return ScrollDecision::Ignore;
        }
        if self.state == ControllerState::Dragging {
            self.handle_drag_move(y, time_ms);
            return ScrollDecision::Sheet;
        }
        self.adopt_animation_value(time_ms);
        self.content_pull += delta_y;
        self.tracker.push(time_ms, y);

        let metrics = self.content_metrics();
        let expanded = self.snap_index == EXPANDED_INDEX;
        let bottom_armed = matches!(
            self.state,
            ControllerState::Armed(lock) if lock.edge == BoundaryEdge::Bottom
        );
        let velocity = self.tracker.velocity().abs();

        match resolve_intent(
            delta_y,
            self.content_pull,
            velocity,
            kind,
            expanded,
            metrics,
            bottom_armed,
        ) {
            GestureIntent::Content => {
                self.de_arm_if_left_boundary(metrics);
                ScrollDecision::Content
            }
            GestureIntent::Ignore => ScrollDecision::Ignore,
            GestureIntent::Sheet => {
                // Below expanded, or a deliberate pull against
                // non-scrollable content: the gesture drives the panel.
                // Start from where this event began so its delta counts.
                self.handle_drag_start(y - delta_y, time_ms);
                if self.state == ControllerState::Dragging {
                    self.handle_drag_move(y, time_ms);
                    ScrollDecision::Sheet
                } else {
                    ScrollDecision::Ignore
                }
            }
            GestureIntent::ArmTop => {
                self.advance_boundary_lock(BoundaryEdge::Top, y, time_ms, metrics)
            }
            GestureIntent::ArmBottom => {
                self.advance_boundary_lock(BoundaryEdge::Bottom, y, time_ms, metrics)
            }
        }
    }

    /// Marks the end of a content-region gesture.
    pub fn handle_content_scroll_end(&mut self, time_ms: i64) {
        match self.state {
            ControllerState::Dragging => self.handle_drag_end(time_ms),
            ControllerState::Armed(_) => {
                self.content_pull = 0.0;
                self.state = ControllerState::Idle;
            }
            _ => {
                self.content_pull = 0.0;
                // A gesture that cancelled a settle but stayed with the
                // content leaves the panel off-snap; finish the settle.
                if self.state == ControllerState::Idle
                    && (self.position - self.current_snap()).abs() > POSITION_EPSILON
                {
                    self.settle_to(self.current_snap(), time_ms, false);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Discrete wheel path
    // ------------------------------------------------------------------

    /// Routes one discrete scroll tick. Below the expanded snap, each
    /// qualifying tick snaps one step toward the adjacent point; while
    /// expanded, the same content-priority rules as the stream path apply.
    pub fn handle_scroll_gesture(
        &mut self,
        delta_y: f32,
        kind: GestureKind,
        velocity_hint: f32,
        time_ms: i64,
    ) -> ScrollDecision {
        if !delta_y.is_finite() {
            return ScrollDecision::Ignore;
        }
        if delta_y.abs() < WHEEL_MIN_DELTA {
            return ScrollDecision::Ignore;
        }
        if self.state == ControllerState::Dragging {
            // An active stream owns the panel; discrete ticks don't merge.
            return ScrollDecision::Ignore;
        }
        if self.surface.is_none() {
            return ScrollDecision::Ignore;
        }

        if self.snap_index != EXPANDED_INDEX {
            // Scrolling down is the same hand motion as an upward drag:
            // it expands the panel. One step per tick, no continuous drag.
            self.adopt_animation_value(time_ms);
            let target = if delta_y > 0.0 {
                self.points.neighbor_above(self.current_snap())
            } else {
                self.points.neighbor_below(self.current_snap())
            };
            if target == self.current_snap() {
                if (self.position - target).abs() <= POSITION_EPSILON {
                    return ScrollDecision::Ignore;
                }
                // An interrupted settle toward this snap resumes without
                // re-notifying the host.
                self.settle_to(target, time_ms, false);
                return ScrollDecision::Sheet;
            }
            self.settle_to(target, time_ms, true);
            return ScrollDecision::Sheet;
        }

        let metrics = self.content_metrics();
        let bottom_armed = matches!(
            self.state,
            ControllerState::Armed(lock) if lock.edge == BoundaryEdge::Bottom
        );
        let velocity = if velocity_hint.is_finite() {
            velocity_hint.abs()
        } else {
            0.0
        };
        // Wheel deltas carry content-scroll sign: positive scrolls content
        // down, which is the equivalent of an upward pull on the panel.
        let pull_equivalent = -delta_y;

        match resolve_intent(
            pull_equivalent,
            pull_equivalent,
            velocity,
            kind,
            true,
            metrics,
            bottom_armed,
        ) {
            GestureIntent::Content => {
                self.de_arm_if_left_boundary(metrics);
                // First up-tick against the bottom edge arms the lock; the
                // next tick finds it armed and takes ownership.
                if pull_equivalent < 0.0
                    && metrics.at_bottom
                    && matches!(
                        self.state,
                        ControllerState::Idle | ControllerState::Animating
                    )
                {
                    self.state = ControllerState::Armed(BoundaryLock {
                        edge: BoundaryEdge::Bottom,
                        arm_y: 0.0,
                    });
                }
                ScrollDecision::Content
            }
            GestureIntent::Ignore => ScrollDecision::Ignore,
            GestureIntent::Sheet => {
                self.adopt_animation_value(time_ms);
                let target = self.points.neighbor_below(self.current_snap());
                self.settle_to(target, time_ms, true);
                ScrollDecision::Sheet
            }
            GestureIntent::ArmTop => match self.state {
                ControllerState::Armed(lock) if lock.edge == BoundaryEdge::Top => {
                    // Second tick against the edge: take the panel down.
                    self.state = ControllerState::Idle;
                    self.adopt_animation_value(time_ms);
                    let target = self.points.neighbor_below(self.current_snap());
                    self.settle_to(target, time_ms, true);
                    ScrollDecision::Sheet
                }
                _ => {
                    self.state = ControllerState::Armed(BoundaryLock {
                        edge: BoundaryEdge::Top,
                        arm_y: 0.0,
                    });
                    ScrollDecision::Content
                }
            },
            GestureIntent::ArmBottom => {
                // The panel is already fully expanded, so there is no step
                // to take; consuming the tick stops it from chaining into
                // whatever sits behind the sheet.
                ScrollDecision::Sheet
            }
        }
    }

    // ------------------------------------------------------------------
    // Programmatic control
    // ------------------------------------------------------------------

    /// Animates to `target`, which must be one of the configured snap
    /// points; anything else is rejected with a warning. Repeated calls
    /// with the same valid target converge without restarting the settle.
    pub fn snap_to(&mut self, target: f32, now_ms: i64) {
        if self.points.index_of(target).is_none() {
            log::warn!("snap_to({target}) is not a configured snap point; ignoring");
            return;
        }
        if self.state == ControllerState::Dragging {
            log::trace!("snap_to({target}) ignored during active drag");
            return;
        }
        if self.surface.is_none() {
            log::trace!("snap_to({target}) ignored: no sheet surface attached");
            return;
        }
        if let Some(animation) = &self.animation {
            if animation.target() == target {
                return;
            }
        }
        self.adopt_animation_value(now_ms);
        if matches!(self.state, ControllerState::Armed(_)) {
            self.state = ControllerState::Idle;
        }
        if self.current_snap() == target && (self.position - target).abs() <= POSITION_EPSILON {
            return;
        }
        self.settle_to(target, now_ms, true);
    }

    /// Advances the settle animation. Call once per frame while
    /// [`ControllerState::Animating`]; a no-op otherwise.
    pub fn tick(&mut self, now_ms: i64) {
        let Some(animation) = self.animation else {
            return;
        };
        if now_ms < self.last_applied_ms {
            // A frame stamped behind an applied event would interpolate
            // the settle backward.
            return;
        }
        self.last_applied_ms = now_ms;
        self.position = animation.value_at(now_ms);
        if let Some(surface) = &self.surface {
            surface.set_position(self.position);
        }
        if animation.is_finished(now_ms) {
            self.position = animation.target();
            self.animation = None;
            // A boundary lock armed mid-settle survives the settle.
            if self.state == ControllerState::Animating {
                self.state = ControllerState::Idle;
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn content_metrics(&self) -> ScrollMetrics {
        match &self.content {
            Some(content) => ScrollMetrics::read(content.as_ref()),
            None => ScrollMetrics::no_overflow(),
        }
    }

    /// Cancels a running settle and resumes from its current interpolated
    /// value, so a new gesture picks the panel up exactly where it is.
    fn adopt_animation_value(&mut self, now_ms: i64) {
        if let Some(animation) = self.animation.take() {
            self.position = animation.value_at(now_ms);
        }
        if self.state == ControllerState::Animating {
            self.state = ControllerState::Idle;
        }
    }

    fn de_arm_if_left_boundary(&mut self, metrics: ScrollMetrics) {
        if let ControllerState::Armed(lock) = self.state {
            let still_at_edge = match lock.edge {
                BoundaryEdge::Top => metrics.at_top,
                BoundaryEdge::Bottom => metrics.at_bottom,
            };
            if !still_at_edge {
                self.state = ControllerState::Idle;
            }
        }
    }

    /// Arms a boundary lock, or checks an armed one against the flip
    /// threshold and hands ownership to the drag path once crossed.
    fn advance_boundary_lock(
        &mut self,
        edge: BoundaryEdge,
        y: f32,
        time_ms: i64,
        metrics: ScrollMetrics,
    ) -> ScrollDecision {
        // Boundary state is re-read every move: content growing back under
        // an armed lock de-arms it mid-gesture.
        let still_at_edge = match edge {
            BoundaryEdge::Top => metrics.at_top,
            BoundaryEdge::Bottom => metrics.at_bottom,
        };
        if !still_at_edge {
            if matches!(self.state, ControllerState::Armed(_)) {
                self.state = ControllerState::Idle;
            }
            return ScrollDecision::Content;
        }

        match self.state {
            ControllerState::Armed(lock) if lock.edge == edge => {
                let pull = (y - lock.arm_y).abs();
                if pull > FLIP_THRESHOLD {
                    // Flip ownership starting from the exact arm point so
                    // the panel begins moving with no visible jump.
                    self.handle_drag_start(lock.arm_y, time_ms);
                    if self.state == ControllerState::Dragging {
                        self.handle_drag_move(y, time_ms);
                        return ScrollDecision::Sheet;
                    }
                    return ScrollDecision::Ignore;
                }
                ScrollDecision::Content
            }
            _ => {
                self.state = ControllerState::Armed(BoundaryLock { edge, arm_y: y });
                ScrollDecision::Content
            }
        }
    }

    /// Resolves a gesture onto `target`: updates the active snap, starts
    /// the settle, and fires the outbound notification.
    fn settle_to(&mut self, target: f32, now_ms: i64, notify: bool) {
        if let Some(index) = self.points.index_of(target) {
            self.snap_index = index;
        }
        self.last_applied_ms = self.last_applied_ms.max(now_ms);
        if (self.position - target).abs() <= POSITION_EPSILON {
            self.position = target;
            self.animation = None;
            self.state = ControllerState::Idle;
            if let Some(surface) = &self.surface {
                surface.set_position(self.position);
            }
        } else {
            self.animation = Some(SettleAnimation::new(self.position, target, now_ms));
            self.state = ControllerState::Animating;
        }
        if notify {
            if let Some(listener) = &self.on_snap_change {
                listener(target);
            }
        }
    }
}
