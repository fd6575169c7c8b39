//! The fixed-timestep driver.
//!
//! One call to [`FixedStepLoop::run_frame`] is one outer iteration of the
//! game loop:
//!
//!   1. drain pending input and apply the resulting actions
//!   2. add the elapsed wall-clock time to the accumulator
//!   3. while more than one step is banked: drain input again, then tick
//!
//! Rendering happens after `run_frame` returns, at whatever rate the caller
//! manages. An exit request is checked at the start of every tick, so the loop
//! stops at most one step after the request was applied.

use std::time::Duration;

use crate::input::{translate, Action, EventSource};
use crate::time::TimeState;
use crate::world::World;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub steps: u32,
    /// Last frame index signalled during this outer iteration, if any.
    pub frame_changed: Option<usize>,
    pub arrivals: u32,
    /// Number of overlay toggle requests seen; odd means the overlay flips.
    pub overlay_toggles: u32,
    pub exit: bool,
}

pub struct FixedStepLoop {
    pub time: TimeState,
    running: bool,
}

impl FixedStepLoop {
    pub fn new() -> Self {
        Self {
            time: TimeState::new(),
            running: true,
        }
    }

    pub fn with_time(time: TimeState) -> Self {
        Self {
            time,
            running: true,
        }
    }

    /// Run one outer iteration using real wall-clock time.
    pub fn run_frame_realtime(
        &mut self,
        events: &mut impl EventSource,
        world: &mut World,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        drain_input(events, world, &mut report);
        self.time.begin_frame();
        self.step_banked(events, world, &mut report);
        report
    }

    /// Run one outer iteration with an explicit elapsed time.
    pub fn run_frame(
        &mut self,
        elapsed: Duration,
        events: &mut impl EventSource,
        world: &mut World,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        drain_input(events, world, &mut report);
        self.time.advance(elapsed);
        self.step_banked(events, world, &mut report);
        report
    }

    fn step_banked(
        &mut self,
        events: &mut impl EventSource,
        world: &mut World,
        report: &mut FrameReport,
    ) {
        if !self.running {
            report.exit = true;
            return;
        }
        while self.time.step_ready() {
            drain_input(events, world, report);
            if world.exit_requested() {
                self.running = false;
                report.exit = true;
                log::info!("Stopping after {} fixed steps", self.time.fixed_step_count);
                return;
            }
            self.time.consume_step();
            let tick = world.tick();
            report.steps += 1;
            if tick.frame_changed.is_some() {
                report.frame_changed = tick.frame_changed;
            }
            if tick.arrived {
                report.arrivals += 1;
            }
        }
    }
}

impl Default for FixedStepLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn drain_input(events: &mut impl EventSource, world: &mut World, report: &mut FrameReport) {
    while let Some(event) = events.poll_event() {
        match translate(&event) {
            Some(Action::ToggleOverlay) => report.overlay_toggles += 1,
            Some(action) => world.apply(action),
            None => {}
        }
    }
}
