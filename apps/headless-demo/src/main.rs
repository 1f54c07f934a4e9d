//! Scripted walkthrough of the sheet controller without a windowing stack.
//!
//! Plays the gestures a map-dashboard host would forward (a handle drag,
//! a fling, a content scroll with boundary handoff, wheel ticks) and logs
//! what the map/navigation side observes through `on_snap_change`.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;

use snapsheet_core::{SheetConfig, SheetController, SheetSurface, SnapPoints};
use snapsheet_input::{InputAdapter, InputPhase, InputRegion, SheetEvent, TouchPoint};

/// Stand-in for the panel's DOM node / view.
struct DemoSurface {
    height: f32,
    offset: Cell<f32>,
}

impl SheetSurface for DemoSurface {
    fn set_position(&self, percent: f32) {
        self.offset.set(percent);
    }

    fn height(&self) -> f32 {
        self.height
    }
}

fn touch(phase: InputPhase, y: f32) -> SheetEvent {
    SheetEvent::Touch {
        phase,
        points: vec![TouchPoint { id: 1, y }],
    }
}

/// Runs one touch gesture and pumps the settle animation.
fn gesture(adapter: &mut InputAdapter, now: &mut i64, region: InputRegion, ys: &[f32]) {
    adapter.dispatch_at(region, touch(InputPhase::Start, ys[0]), *now);
    for &y in &ys[1..] {
        *now += 16;
        adapter.dispatch_at(region, touch(InputPhase::Move, y), *now);
    }
    *now += 16;
    adapter.dispatch_at(region, touch(InputPhase::End, ys[ys.len() - 1]), *now);
    settle(adapter, now);
}

fn settle(adapter: &mut InputAdapter, now: &mut i64) {
    for _ in 0..100 {
        *now += 16;
        adapter.tick_at(*now);
        if !matches!(
            adapter.controller().state(),
            snapsheet_core::ControllerState::Animating
        ) {
            break;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let points = SnapPoints::new(10.0, 50.0, 90.0)
        .ok_or_else(|| anyhow::anyhow!("demo snap points rejected"))?;
    let config = SheetConfig::new(points).on_snap_change(|snap| {
        // The host side: recenter the map for the new panel size.
        log::info!("map recenter requested for snap {snap}");
        println!("-> snapped to {snap}");
    });

    let mut controller = SheetController::new(config);
    controller.attach_surface(Rc::new(DemoSurface {
        height: 600.0,
        offset: Cell::new(0.0),
    }));

    let mut adapter = InputAdapter::new(controller);
    let mut now: i64 = 0;

    println!("sheet opens at {}%", adapter.controller().position());

    println!("\ndrag up from the grab handle:");
    gesture(
        &mut adapter,
        &mut now,
        InputRegion::Handle,
        &[500.0, 480.0, 460.0, 440.0, 420.0, 400.0, 390.0],
    );
    println!("   resting at {}%", adapter.controller().position());

    println!("\nfast upward fling:");
    gesture(
        &mut adapter,
        &mut now,
        InputRegion::Handle,
        &[400.0, 360.0, 320.0, 280.0],
    );
    println!("   resting at {}%", adapter.controller().position());

    println!("\ndeliberate pull down on the expanded panel:");
    gesture(
        &mut adapter,
        &mut now,
        InputRegion::Content,
        &[100.0, 130.0, 160.0, 190.0, 220.0],
    );
    println!("   resting at {}%", adapter.controller().position());

    println!("\nwheel ticks walk the panel down:");
    for delta in [-60.0, -60.0] {
        now += 16;
        adapter.dispatch_at(InputRegion::Content, SheetEvent::Wheel { delta_y: delta }, now);
        settle(&mut adapter, &mut now);
        println!("   resting at {}%", adapter.controller().position());
    }

    Ok(())
}
