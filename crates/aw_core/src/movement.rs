use glam::Vec2;

use crate::animation::FrameAnimation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Idle: no active movement.
    #[default]
    None,
    Left,
    Right,
}

impl Facing {
    /// Horizontal sprite flip for this heading. `None` keeps whatever flip
    /// the sprite already had.
    pub fn flip_x(self) -> Option<bool> {
        match self {
            Self::None => None,
            Self::Left => Some(true),
            Self::Right => Some(false),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "idle",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HelicopterConfig {
    pub start: Vec2,
    /// Displacement per fixed step while moving, in pixels.
    pub speed: f32,
    pub fast_frame_increment: f32,
    pub slow_frame_increment: f32,
    pub fast_pitch: f32,
    pub slow_pitch: f32,
}

impl Default for HelicopterConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(400.0, 300.0),
            speed: 3.0,
            fast_frame_increment: 0.5,
            slow_frame_increment: 0.25,
            fast_pitch: 1.0,
            slow_pitch: 0.5,
        }
    }
}

/// The flying sprite. Facing, velocity, animation speed and audio pitch only
/// ever change together, so moving always means a fast rotor and high pitch.
#[derive(Debug, Clone, Copy)]
pub struct Helicopter {
    pub location: Vec2,
    pub target: Vec2,
    velocity: Vec2,
    facing: Facing,
    flip_x: bool,
    pub animation: FrameAnimation,
    audio_pitch: f32,
    pub config: HelicopterConfig,
}

impl Helicopter {
    pub fn new(config: HelicopterConfig) -> Self {
        Self {
            location: config.start,
            target: config.start,
            velocity: Vec2::ZERO,
            facing: Facing::None,
            flip_x: false,
            animation: FrameAnimation::new(config.slow_frame_increment),
            audio_pitch: config.slow_pitch,
            config,
        }
    }

    /// Start flying toward `point`, replacing any movement in progress.
    /// Returns false, changing nothing, when `point` is the current location.
    pub fn set_target(&mut self, point: Vec2) -> bool {
        let displacement = point - self.location;
        let Some(direction) = displacement.try_normalize() else {
            log::debug!("Ignoring target {point} at current location");
            return false;
        };

        self.velocity = direction * self.config.speed;
        self.target = point;
        self.facing = if point.x > self.location.x {
            Facing::Right
        } else {
            Facing::Left
        };
        if let Some(flip) = self.facing.flip_x() {
            self.flip_x = flip;
        }
        self.animation.increment = self.config.fast_frame_increment;
        self.audio_pitch = self.config.fast_pitch;
        log::debug!(
            "Target {point}, heading {}, velocity {}",
            self.facing.label(),
            self.velocity
        );
        true
    }

    /// Advance one fixed step. Returns true on the step the helicopter arrives.
    ///
    /// Arrival is the first step on which `location.x` has passed `target.x`
    /// along the heading, so the helicopter may overshoot by up to one step.
    pub fn step(&mut self) -> bool {
        if self.facing == Facing::None {
            return false;
        }

        self.location += self.velocity;
        let arrived = match self.facing {
            Facing::Right => self.location.x > self.target.x,
            Facing::Left => self.location.x < self.target.x,
            Facing::None => false,
        };
        if arrived {
            self.facing = Facing::None;
            self.velocity = Vec2::ZERO;
            self.animation.increment = self.config.slow_frame_increment;
            self.audio_pitch = self.config.slow_pitch;
            log::debug!("Arrived at {}", self.location);
        }
        arrived
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the sprite is drawn mirrored. Idle keeps the last heading.
    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    pub fn audio_pitch(&self) -> f32 {
        self.audio_pitch
    }
}

impl Default for Helicopter {
    fn default() -> Self {
        Self::new(HelicopterConfig::default())
    }
}
