//! Robot testing harness for the sheet controller.
//!
//! Drives the full adapter + controller stack with synthetic touch and
//! wheel streams against in-memory surface/viewport fakes, with a
//! deterministic clock. This is the sheet equivalent of an end-to-end UI
//! robot: tests script gestures and assert on observable state only.
//!
//! # Example
//!
//! ```
//! use snapsheet_testing::SheetRobot;
//!
//! let mut robot = SheetRobot::new(10.0, 50.0, 90.0);
//! robot.snap_to(50.0);
//! robot.drag_handle(450.0, 250.0, 8);
//! robot.settle();
//! assert_eq!(robot.current_snap(), 90.0);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use snapsheet_core::{
    ContentViewport, ControllerState, ScrollDecision, SheetConfig, SheetController,
    SheetSurface, SnapPoints,
};
use snapsheet_input::{InputAdapter, InputPhase, InputRegion, SheetEvent, TouchPoint};

/// Interval between synthetic frames and move events.
const FRAME_MS: i64 = 16;

/// In-memory stand-in for the panel surface.
pub struct FakeSurface {
    height: Cell<f32>,
    position: Cell<f32>,
}

impl FakeSurface {
    /// The last visual offset the controller wrote.
    pub fn position(&self) -> f32 {
        self.position.get()
    }

    pub fn set_height(&self, height: f32) {
        self.height.set(height);
    }
}

impl SheetSurface for FakeSurface {
    fn set_position(&self, percent: f32) {
        self.position.set(percent);
    }

    fn height(&self) -> f32 {
        self.height.get()
    }
}

/// In-memory stand-in for the scrollable content viewport.
pub struct FakeViewport {
    scroll_top: Cell<f32>,
    scroll_height: Cell<f32>,
    client_height: Cell<f32>,
}

impl FakeViewport {
    pub fn set_scroll_top(&self, value: f32) {
        self.scroll_top.set(value);
    }

    pub fn set_scroll_height(&self, value: f32) {
        self.scroll_height.set(value);
    }
}

impl ContentViewport for FakeViewport {
    fn scroll_top(&self) -> f32 {
        self.scroll_top.get()
    }

    fn scroll_height(&self) -> f32 {
        self.scroll_height.get()
    }

    fn client_height(&self) -> f32 {
        self.client_height.get()
    }
}

pub struct SheetRobot {
    adapter: InputAdapter,
    surface: Rc<FakeSurface>,
    viewport: Rc<FakeViewport>,
    snaps: Rc<RefCell<Vec<f32>>>,
    /// Every position observed after a move or frame, for range checks.
    samples: Vec<f32>,
    now_ms: i64,
    next_touch_id: u64,
}

impl SheetRobot {
    /// Builds a robot around a fresh controller with the given snap
    /// points, a 600 px surface, and no content attached.
    pub fn new(collapsed: f32, half: f32, expanded: f32) -> Self {
        let snaps = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&snaps);
        let points =
            SnapPoints::new(collapsed, half, expanded).unwrap_or_else(SnapPoints::fallback);
        let config =
            SheetConfig::new(points).on_snap_change(move |value| log.borrow_mut().push(value));
        let mut controller = SheetController::new(config);

        let surface = Rc::new(FakeSurface {
            height: Cell::new(600.0),
            position: Cell::new(0.0),
        });
        controller.attach_surface(surface.clone());

        let viewport = Rc::new(FakeViewport {
            scroll_top: Cell::new(0.0),
            scroll_height: Cell::new(900.0),
            client_height: Cell::new(300.0),
        });

        Self {
            adapter: InputAdapter::new(controller),
            surface,
            viewport,
            snaps,
            samples: Vec::new(),
            now_ms: 0,
            next_touch_id: 1,
        }
    }

    /// Attaches the fake scrollable viewport (900 px of content in a
    /// 300 px window) and returns a handle for mutating it mid-test.
    pub fn with_scrollable_content(mut self) -> Self {
        self.adapter
            .controller_mut()
            .attach_content(self.viewport.clone());
        self
    }

    // ------------------------------------------------------------------
    // Observability
    // ------------------------------------------------------------------

    pub fn position(&self) -> f32 {
        self.adapter.controller().position()
    }

    pub fn current_snap(&self) -> f32 {
        self.adapter.controller().current_snap()
    }

    pub fn state(&self) -> ControllerState {
        self.adapter.controller().state()
    }

    pub fn is_dragging(&self) -> bool {
        self.adapter.controller().is_dragging()
    }

    /// Snap change notifications observed so far, in order.
    pub fn snap_log(&self) -> Vec<f32> {
        self.snaps.borrow().clone()
    }

    /// All positions sampled after moves and frames.
    pub fn position_samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn surface(&self) -> &FakeSurface {
        &self.surface
    }

    pub fn viewport(&self) -> &FakeViewport {
        &self.viewport
    }

    /// Tears the host down mid-whatever, consuming the robot.
    pub fn unmount(self) {
        drop(self.adapter);
    }

    // ------------------------------------------------------------------
    // Scripted input
    // ------------------------------------------------------------------

    /// Snaps programmatically and settles.
    pub fn snap_to(&mut self, target: f32) {
        let now = self.now_ms;
        self.adapter.controller_mut().snap_to(target, now);
        self.settle();
        self.snaps.borrow_mut().clear();
        self.samples.clear();
    }

    /// Runs one full touch gesture on the grab handle, `steps` moves
    /// spaced one frame apart.
    pub fn drag_handle(&mut self, from_y: f32, to_y: f32, steps: usize) {
        self.touch_gesture(InputRegion::Handle, from_y, to_y, steps);
    }

    /// Runs one full touch gesture over the content area, returning the
    /// ownership decision of each move.
    pub fn drag_content(&mut self, from_y: f32, to_y: f32, steps: usize) -> Vec<ScrollDecision> {
        self.touch_gesture(InputRegion::Content, from_y, to_y, steps)
    }

    fn touch_gesture(
        &mut self,
        region: InputRegion,
        from_y: f32,
        to_y: f32,
        steps: usize,
    ) -> Vec<ScrollDecision> {
        let id = self.next_touch_id;
        self.next_touch_id += 1;
        let steps = steps.max(1);

        self.dispatch_touch(region, InputPhase::Start, id, from_y);
        let mut decisions = Vec::with_capacity(steps);
        for i in 1..=steps {
            self.now_ms += FRAME_MS;
            let t = i as f32 / steps as f32;
            let y = from_y + (to_y - from_y) * t;
            decisions.push(self.dispatch_touch(region, InputPhase::Move, id, y));
            self.samples.push(self.position());
        }
        self.now_ms += FRAME_MS;
        self.dispatch_touch(region, InputPhase::End, id, to_y);
        decisions
    }

    /// Starts a touch gesture and leaves it unfinished, for teardown and
    /// interruption tests. Returns the touch id.
    pub fn begin_drag_handle(&mut self, y: f32) -> u64 {
        let id = self.next_touch_id;
        self.next_touch_id += 1;
        self.dispatch_touch(InputRegion::Handle, InputPhase::Start, id, y);
        self.now_ms += FRAME_MS;
        self.dispatch_touch(InputRegion::Handle, InputPhase::Move, id, y - 30.0);
        id
    }

    /// Sends one wheel tick.
    pub fn wheel(&mut self, delta_y: f32) -> ScrollDecision {
        self.now_ms += FRAME_MS;
        let now = self.now_ms;
        self.adapter
            .dispatch_at(InputRegion::Content, SheetEvent::Wheel { delta_y }, now)
    }

    fn dispatch_touch(
        &mut self,
        region: InputRegion,
        phase: InputPhase,
        id: u64,
        y: f32,
    ) -> ScrollDecision {
        let now = self.now_ms;
        self.adapter.dispatch_at(
            region,
            SheetEvent::Touch {
                phase,
                points: vec![TouchPoint { id, y }],
            },
            now,
        )
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Advances one frame and ticks the animation.
    pub fn advance_frame(&mut self) {
        self.now_ms += FRAME_MS;
        self.adapter.tick_at(self.now_ms);
        self.samples.push(self.position());
    }

    /// Pumps frames until the settle animation finishes.
    ///
    /// Panics if it never does; a runaway animation is a bug worth
    /// failing loudly on.
    pub fn settle(&mut self) {
        for _ in 0..1000 {
            if self.state() != ControllerState::Animating {
                return;
            }
            self.advance_frame();
        }
        panic!("sheet never settled");
    }
}
