//! Fixed-timestep clock.
//!
//! Wall-clock time is fed into an accumulator measured in integer microseconds,
//! so the number of simulation steps depends only on the total elapsed time and
//! never on how that time was split across rendered frames.
//!
//! A step is taken while the accumulator strictly exceeds one step; an
//! accumulator holding exactly one step waits for the next frame.
//!
//! Long frames are never truncated: a stall is caught up in full on the next
//! frame, and only logged.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

/// Frames longer than this are reported as stalls.
pub const STALL_WARN_US: u64 = 250_000;

/// One simulation step at 60 Hz.
pub const FIXED_DT_US: u64 = 16_667;

pub struct TimeState {
    pub fixed_dt_us: u64,
    accumulator_us: u64,
    pub total_time_us: u64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt_us: FIXED_DT_US,
            accumulator_us: 0,
            total_time_us: 0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure the wall-clock time since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant);
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Feed an explicit amount of elapsed time. Used by `begin_frame` and by
    /// replays, which supply their own timeline.
    pub fn advance(&mut self, elapsed: Duration) {
        let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        if elapsed_us > STALL_WARN_US {
            log::warn!(
                "Frame took {:.1}ms, catching up {} steps",
                elapsed_us as f64 / 1000.0,
                self.accumulator_us.saturating_add(elapsed_us) / self.fixed_dt_us.max(1)
            );
        }

        self.real_dt = elapsed_us as f64 / 1_000_000.0;
        self.accumulator_us = self.accumulator_us.saturating_add(elapsed_us);
        self.steps_this_frame = 0;
        self.frame_count += 1;

        // FPS smoothing
        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    /// True while more than one whole step is banked.
    pub fn step_ready(&self) -> bool {
        self.accumulator_us > self.fixed_dt_us
    }

    /// Take one step out of the accumulator. Call only after `step_ready`.
    pub fn consume_step(&mut self) {
        debug_assert!(self.step_ready());
        self.accumulator_us -= self.fixed_dt_us;
        self.total_time_us += self.fixed_dt_us;
        self.fixed_step_count += 1;
        self.steps_this_frame += 1;
    }

    pub fn accumulator_us(&self) -> u64 {
        self.accumulator_us
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
