//! Scripted gesture playback against a frame scheduler

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use clap::ValueEnum;
use rebound_animation::{FrameScheduler, SharedTimers, TimerService};
use rebound_core::{Axis, Point, PointerEvent, Rect, ScrollEvent};
use rebound_scroll::{FadePhase, ScrollConfig, ScrollController};

/// Canned input sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Drag upward at a steady speed and let go
    Flick,
    /// Pull the content down past its start and let go
    Overshoot,
    /// Three wheel clicks
    Wheel,
    /// Press and release in place
    Click,
}

/// One scripted input
#[derive(Debug, Clone, Copy)]
pub enum Input {
    Pointer(PointerEvent),
    Scroll(ScrollEvent),
}

impl Input {
    fn time_ms(&self) -> f64 {
        match self {
            Input::Pointer(event) => event.time_ms,
            Input::Scroll(event) => event.time_ms,
        }
    }
}

/// Controller state after one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub time_ms: f64,
    pub value: f64,
    pub overshoot: f64,
    pub opacity: f64,
    pub fade: FadePhase,
    pub animating: bool,
}

/// Build the input sequence for `scenario`
///
/// `velocity` is the flick speed in units per millisecond.
pub fn script(scenario: Scenario, velocity: f64) -> Vec<Input> {
    let at = |x: f64, y: f64| Point::new(x, y);
    match scenario {
        Scenario::Flick => {
            let mut inputs = vec![Input::Pointer(PointerEvent::press(at(150.0, 300.0), 0.0))];
            let mut y = 300.0;
            for step in 1..=4 {
                y -= velocity * 16.0;
                let time = 16.0 * f64::from(step);
                inputs.push(Input::Pointer(PointerEvent::motion(at(150.0, y), time)));
            }
            inputs.push(Input::Pointer(PointerEvent::release(at(150.0, y), 80.0)));
            inputs
        }
        Scenario::Overshoot => {
            let mut inputs = vec![Input::Pointer(PointerEvent::press(at(150.0, 100.0), 0.0))];
            for step in 1..=4 {
                let time = 16.0 * f64::from(step);
                let y = 100.0 + 20.0 * f64::from(step);
                inputs.push(Input::Pointer(PointerEvent::motion(at(150.0, y), time)));
            }
            inputs.push(Input::Pointer(PointerEvent::release(at(150.0, 180.0), 200.0)));
            inputs
        }
        Scenario::Wheel => [0.0, 100.0, 200.0]
            .into_iter()
            .map(|time| Input::Scroll(ScrollEvent::steps(0, 1, time)))
            .collect(),
        Scenario::Click => vec![
            Input::Pointer(PointerEvent::press(at(150.0, 150.0), 0.0)),
            Input::Pointer(PointerEvent::release(at(150.0, 150.0), 50.0)),
        ],
    }
}

/// A controller over a vertical list, driven frame by frame
pub struct Simulation {
    scheduler: Rc<RefCell<FrameScheduler>>,
    controller: ScrollController,
    frame_ms: f64,
}

impl Simulation {
    pub fn new(config: ScrollConfig, content: f64, page: f64, start: f64) -> Result<Self> {
        let frame_ms = config.physics.frame_interval_ms;
        let scheduler = Rc::new(RefCell::new(FrameScheduler::new()));
        let timers: SharedTimers = scheduler.clone();
        let mut controller = ScrollController::new(config, timers)?;

        controller.set_viewport(Rect::new(0.0, 0.0, 360.0, page));
        controller.set_bounds(Axis::Vertical, 0.0, content, page);
        controller.set_value(Axis::Vertical, start);
        controller.on_replay(|press| {
            tracing::info!("click replayed to content at {:?}", press.root);
        });

        Ok(Self {
            scheduler,
            controller,
            frame_ms,
        })
    }

    pub fn controller(&self) -> &ScrollController {
        &self.controller
    }

    fn now(&self) -> f64 {
        self.scheduler.borrow().now_ms()
    }

    fn deliver(&mut self, input: &Input) {
        let response = match input {
            Input::Pointer(event) => self.controller.handle_pointer(event),
            Input::Scroll(event) => self.controller.handle_scroll(event),
        };
        tracing::debug!("t={:.1}ms {:?} -> {:?}", self.now(), input, response);
    }

    fn frame(&self) -> Frame {
        Frame {
            time_ms: self.now(),
            value: self.controller.value(Axis::Vertical),
            overshoot: self.controller.overshoot(Axis::Vertical),
            opacity: self.controller.opacity(),
            fade: self.controller.fade_phase(),
            animating: self.controller.is_animating(),
        }
    }

    /// Play `inputs` and keep stepping until everything is idle or
    /// `duration_ms` passes, reporting each frame
    pub fn run(&mut self, inputs: Vec<Input>, duration_ms: f64, mut on_frame: impl FnMut(&Frame)) {
        let mut pending = inputs.into_iter().peekable();

        while self.now() < duration_ms {
            let now = self.now();
            while let Some(input) = pending.next_if(|input| input.time_ms() <= now) {
                self.deliver(&input);
            }

            let fired = self.scheduler.borrow_mut().advance_by(self.frame_ms);
            for id in fired {
                self.controller.on_timer(id);
            }

            let frame = self.frame();
            on_frame(&frame);

            let idle = !frame.animating
                && frame.fade == FadePhase::Hidden
                && !self.controller.has_grab();
            if idle && pending.peek().is_none() {
                tracing::debug!("idle at t={:.1}ms", frame.time_ms);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulate(scenario: Scenario, start: f64) -> (Simulation, Vec<Frame>) {
        let mut simulation = Simulation::new(ScrollConfig::default(), 2000.0, 400.0, start).unwrap();
        let mut frames = Vec::new();
        simulation.run(script(scenario, 2.0), 10_000.0, |frame| frames.push(*frame));
        (simulation, frames)
    }

    #[test]
    fn test_flick_coasts_and_stops() {
        let (simulation, frames) = simulate(Scenario::Flick, 0.0);
        let dragged = 4.0 * 2.0 * 16.0;

        assert!(simulation.controller().value(Axis::Vertical) > dragged);
        assert!(frames.iter().any(|frame| frame.animating));
        let last = frames.last().unwrap();
        assert!(!last.animating);
        assert_eq!(last.fade, FadePhase::Hidden);
    }

    #[test]
    fn test_overshoot_returns_to_start() {
        let (simulation, frames) = simulate(Scenario::Overshoot, 0.0);

        let deepest = frames
            .iter()
            .map(|frame| frame.overshoot)
            .fold(0.0, f64::min);
        assert_eq!(deepest, -50.0);
        assert_eq!(simulation.controller().overshoot(Axis::Vertical), 0.0);
        assert_eq!(simulation.controller().value(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_wheel_steps_accumulate() {
        let (simulation, _) = simulate(Scenario::Wheel, 0.0);
        let step = 400.0_f64.powf(2.0 / 3.0);
        let value = simulation.controller().value(Axis::Vertical);
        assert!((value - 3.0 * step).abs() < 1e-9);
    }

    #[test]
    fn test_click_does_not_scroll() {
        let (simulation, frames) = simulate(Scenario::Click, 100.0);
        assert_eq!(simulation.controller().value(Axis::Vertical), 100.0);
        assert!(frames.iter().all(|frame| !frame.animating));
    }
}
