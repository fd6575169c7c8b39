use crate::input::Action;
use crate::movement::{Helicopter, HelicopterConfig};

/// What one fixed step changed, for the render and audio side to pick up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// New sprite-sheet frame, only when it differs from the previous one.
    pub frame_changed: Option<usize>,
    pub arrived: bool,
}

/// All simulation state. Owned by the game loop's caller and passed by
/// reference into each update.
#[derive(Debug, Clone)]
pub struct World {
    pub helicopter: Helicopter,
    exit_requested: bool,
}

impl World {
    pub fn new(config: HelicopterConfig) -> Self {
        Self {
            helicopter: Helicopter::new(config),
            exit_requested: false,
        }
    }

    /// Apply an input action. `ToggleOverlay` has no simulation effect and is
    /// handled by the caller.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::RequestExit => {
                if !self.exit_requested {
                    log::info!("Exit requested");
                }
                self.exit_requested = true;
            }
            Action::SetMovementTarget(point) => {
                self.helicopter.set_target(point);
            }
            Action::ToggleOverlay => {}
        }
    }

    /// One fixed step: animation first, then movement.
    pub fn tick(&mut self) -> TickReport {
        let frame_changed = self.helicopter.animation.tick();
        let arrived = self.helicopter.step();
        TickReport {
            frame_changed,
            arrived,
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(HelicopterConfig::default())
    }
}
