//! Host loop example
//!
//! Shows how a toolkit drives a `ScrollController`: forward input, advance
//! the scheduler once per frame, and hand fired timers back.
//!
//! Run with: cargo run -p rebound_scroll --example host_loop

use std::cell::RefCell;
use std::rc::Rc;

use rebound_animation::{FrameScheduler, SharedTimers};
use rebound_core::{Axis, Point, PointerEvent, Rect};
use rebound_scroll::{ScrollConfig, ScrollController};

fn main() -> rebound_scroll::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let scheduler = Rc::new(RefCell::new(FrameScheduler::new()));
    let timers: SharedTimers = scheduler.clone();
    let mut controller = ScrollController::new(ScrollConfig::default(), timers)?;

    controller.set_viewport(Rect::new(0.0, 0.0, 320.0, 480.0));
    controller.set_bounds(Axis::Vertical, 0.0, 3000.0, 480.0);
    controller.on_value_changed(|axis, value| println!("{:?} -> {:.1}", axis, value));
    controller.on_overshoot_changed(|window| {
        if let Some(gap) = window.gap_y {
            println!("  overshoot gap {:.1} tall", gap.height());
        }
    });

    // quick flick toward the end
    controller.handle_pointer(&PointerEvent::press(Point::new(160.0, 400.0), 0.0));
    controller.handle_pointer(&PointerEvent::motion(Point::new(160.0, 340.0), 16.0));
    controller.handle_pointer(&PointerEvent::motion(Point::new(160.0, 260.0), 32.0));
    controller.handle_pointer(&PointerEvent::release(Point::new(160.0, 260.0), 48.0));

    let frame = controller.config().physics.frame_interval_ms;
    while controller.is_animating() {
        let fired = scheduler.borrow_mut().advance_by(frame);
        for id in fired {
            controller.on_timer(id);
        }
    }

    println!("resting at {:.1}", controller.value(Axis::Vertical));
    Ok(())
}
