//! Scripted input timelines for running the fixed-step loop without a window.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;

use crate::game_loop::FixedStepLoop;
use crate::input::{InputEvent, Key, MouseBtn};
use crate::time::{TimeState, FIXED_DT_US};
use crate::world::World;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt_us")]
    pub fixed_dt_us: u64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    /// Wall-clock time this outer iteration adds to the accumulator.
    pub elapsed_us: u64,
    #[serde(default)]
    pub events: Vec<ReplayEvent>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Close,
    Escape,
    ToggleOverlay,
    Click {
        #[serde(default)]
        button: ReplayButton,
        x: f32,
        y: f32,
    },
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplayButton {
    Left,
    Right,
    #[default]
    Middle,
}

impl From<ReplayEvent> for InputEvent {
    fn from(event: ReplayEvent) -> Self {
        match event {
            ReplayEvent::Close => InputEvent::Closed,
            ReplayEvent::Escape => InputEvent::KeyPressed(Key::Escape),
            ReplayEvent::ToggleOverlay => InputEvent::KeyPressed(Key::F3),
            ReplayEvent::Click { button, x, y } => InputEvent::MousePressed {
                button: match button {
                    ReplayButton::Left => MouseBtn::Left,
                    ReplayButton::Right => MouseBtn::Right,
                    ReplayButton::Middle => MouseBtn::Middle,
                },
                position: Vec2::new(x, y),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub steps: u64,
    pub arrivals: u32,
    pub exited: bool,
    /// Helicopter location after every rendered frame.
    pub locations: Vec<Vec2>,
    /// Sprite-sheet frame after every rendered frame.
    pub frame_indices: Vec<usize>,
}

impl ReplaySequence {
    /// One `(elapsed, events)` pair per outer iteration. A repeated frame only
    /// injects its events on the first repetition.
    pub fn expanded_frames(&self) -> Vec<(Duration, Vec<InputEvent>)> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                let events = if i == 0 {
                    frame.events.iter().copied().map(InputEvent::from).collect()
                } else {
                    Vec::new()
                };
                out.push((Duration::from_micros(frame.elapsed_us), events));
            }
        }
        out
    }

    /// Drive `world` through the whole timeline, stopping early on exit.
    pub fn run(&self, world: &mut World) -> ReplaySummary {
        let mut time = TimeState::new();
        time.fixed_dt_us = self.fixed_dt_us;
        let mut game = FixedStepLoop::with_time(time);
        let mut queue = VecDeque::new();
        let mut summary = ReplaySummary::default();

        for (elapsed, events) in self.expanded_frames() {
            queue.extend(events);
            let report = game.run_frame(elapsed, &mut queue, world);
            summary.arrivals += report.arrivals;
            summary.locations.push(world.helicopter.location);
            summary
                .frame_indices
                .push(world.helicopter.animation.frame_index());
            if report.exit {
                summary.exited = true;
                break;
            }
        }
        summary.steps = game.time.fixed_step_count;
        summary
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt_us == 0 {
        return Err("Replay validation failed: fixed_dt_us must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt_us() -> u64 {
    FIXED_DT_US
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Facing;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "aw_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "elapsed_us": 16668, "events": [{ "type": "click", "x": 600, "y": 300 }], "repeat": 3 },
                { "elapsed_us": 0, "events": [{ "type": "click", "button": "left", "x": 1, "y": 2 }, { "type": "escape" }] }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        assert_eq!(replay.fixed_dt_us, FIXED_DT_US);
        let expanded = replay.expanded_frames();
        assert_eq!(expanded.len(), 4);
        assert_eq!(expanded[0].1.len(), 1);
        assert!(expanded[1].1.is_empty());
        assert_eq!(
            expanded[3].1,
            vec![
                InputEvent::MousePressed {
                    button: MouseBtn::Left,
                    position: Vec2::new(1.0, 2.0)
                },
                InputEvent::KeyPressed(Key::Escape)
            ]
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_unknown_event() {
        let path = temp_file_path("unknown");
        fs::write(
            &path,
            r#"{ "frames": [{ "elapsed_us": 1, "events": [{ "type": "jump" }] }] }"#,
        )
        .expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("unknown event should fail");
        assert!(err.contains("Failed to parse replay JSON"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "fixed_dt_us": 16667,
              "frames": [
                { "elapsed_us": 9000, "events": [{ "type": "click", "x": 700, "y": 450 }], "repeat": 40 },
                { "elapsed_us": 33000, "events": [{ "type": "click", "x": 100, "y": 100 }], "repeat": 30 },
                { "elapsed_us": 16668, "repeat": 200 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let mut world_a = World::default();
        let mut world_b = World::default();
        let run_a = replay.run(&mut world_a);
        let run_b = replay.run(&mut world_b);

        assert_eq!(run_a, run_b);
        assert_eq!(run_a.locations.len(), 270);
        assert!(!run_a.exited);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_stops_on_escape() {
        let replay = ReplaySequence {
            fixed_dt_us: FIXED_DT_US,
            frames: vec![
                ReplayFrame {
                    elapsed_us: 16_668,
                    events: vec![ReplayEvent::Click {
                        button: ReplayButton::Middle,
                        x: 600.0,
                        y: 300.0,
                    }],
                    repeat: 10,
                },
                ReplayFrame {
                    elapsed_us: 16_668,
                    events: vec![ReplayEvent::Escape],
                    repeat: 10,
                },
            ],
        };
        let mut world = World::default();
        let summary = replay.run(&mut world);
        assert!(summary.exited);
        assert_eq!(summary.steps, 10);
        assert_eq!(summary.locations.len(), 11);
        // Ten steps of flight; the exit is seen before an eleventh.
        assert_eq!(world.helicopter.location.x, 430.0);
        assert_eq!(world.helicopter.facing(), Facing::Right);
    }
}
