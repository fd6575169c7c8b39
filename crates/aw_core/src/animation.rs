//! Sprite-sheet frame cycling driven by a per-tick counter increment.
//!
//! The helicopter sheet holds four 180x64 frames stacked vertically. Each
//! fixed step adds `increment` to a fractional counter; the displayed frame is
//! `floor(counter) mod 4`. A faster increment spins the rotor faster.

/// Number of frames in the sprite sheet.
pub const FRAME_COUNT: usize = 4;
pub const FRAME_WIDTH: u32 = 180;
pub const FRAME_HEIGHT: u32 = 64;

/// Pixel rectangle of one frame inside the sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameRect {
    pub fn for_frame(index: usize) -> Self {
        Self {
            x: 0,
            y: FRAME_HEIGHT * (index % FRAME_COUNT) as u32,
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAnimation {
    counter: f32,
    frame_index: usize,
    pub increment: f32,
}

impl FrameAnimation {
    pub fn new(increment: f32) -> Self {
        Self {
            counter: 0.0,
            frame_index: 0,
            increment,
        }
    }

    /// Advance by one tick. Returns the new frame index only when it changed.
    pub fn tick(&mut self) -> Option<usize> {
        // Wrapping keeps f32 precision over long runs; floor(c mod 4) == floor(c) mod 4.
        self.counter = (self.counter + self.increment).rem_euclid(FRAME_COUNT as f32);
        let new_frame = (self.counter.floor() as usize) % FRAME_COUNT;
        if new_frame != self.frame_index {
            self.frame_index = new_frame;
            Some(new_frame)
        } else {
            None
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_rect(&self) -> FrameRect {
        FrameRect::for_frame(self.frame_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rects_stack_vertically() {
        assert_eq!(
            FrameRect::for_frame(0),
            FrameRect {
                x: 0,
                y: 0,
                width: 180,
                height: 64
            }
        );
        assert_eq!(FrameRect::for_frame(1).y, 64);
        assert_eq!(FrameRect::for_frame(3).y, 192);
    }

    #[test]
    fn half_increment_changes_frame_every_other_tick() {
        let mut anim = FrameAnimation::new(0.5);
        assert_eq!(anim.tick(), None);
        assert_eq!(anim.tick(), Some(1));
        assert_eq!(anim.tick(), None);
        assert_eq!(anim.tick(), Some(2));
        assert_eq!(anim.tick(), None);
        assert_eq!(anim.tick(), Some(3));
        assert_eq!(anim.tick(), None);
        assert_eq!(anim.tick(), Some(0));
    }

    #[test]
    fn quarter_increment_wraps_after_sixteen_ticks() {
        let mut anim = FrameAnimation::new(0.25);
        let changes: Vec<usize> = (0..16).filter_map(|_| anim.tick()).collect();
        assert_eq!(changes, vec![1, 2, 3, 0]);
        assert_eq!(anim.frame_index(), 0);
    }

    #[test]
    fn frame_index_matches_counter_for_many_increments() {
        for &increment in &[0.1_f32, 0.24, 0.25, 0.5, 0.75, 1.0, 1.3, 3.7] {
            let mut anim = FrameAnimation::new(increment);
            for _ in 0..1000 {
                anim.tick();
                assert!(anim.frame_index() < FRAME_COUNT);
                assert_eq!(anim.frame_index(), anim.counter.floor() as usize % FRAME_COUNT);
            }
        }
    }

    #[test]
    fn whole_cycle_increment_never_signals() {
        let mut anim = FrameAnimation::new(4.0);
        for _ in 0..20 {
            assert_eq!(anim.tick(), None);
        }
    }

    #[test]
    fn increment_change_takes_effect_next_tick() {
        let mut anim = FrameAnimation::new(0.25);
        anim.tick();
        anim.increment = 0.75;
        assert_eq!(anim.tick(), Some(1));
    }
}
