//! Render-side view of the helicopter: which sheet frame is shown, where, and
//! which way it faces.

use aw_core::animation::FrameRect;
use aw_core::movement::Helicopter;
use aw_render::texture::uv_rect;
use aw_render::vertex::{QuadSpec, SpriteVertex};
use glam::Vec2;

/// Pivot inside a frame, in pixels: the middle of the 180x64 frame.
pub const SPRITE_ORIGIN: Vec2 = Vec2::new(90.0, 32.0);
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelicopterSprite {
    pub texture_rect: FrameRect,
    pub position: Vec2,
    pub flip_x: bool,
}

impl HelicopterSprite {
    pub fn new(helicopter: &Helicopter) -> Self {
        Self {
            texture_rect: helicopter.animation.frame_rect(),
            position: helicopter.location,
            flip_x: helicopter.flip_x(),
        }
    }

    /// Switch the texture rectangle to a new sheet frame.
    pub fn set_frame(&mut self, frame_index: usize) {
        self.texture_rect = FrameRect::for_frame(frame_index);
    }

    /// Follow the helicopter's position and heading. Returns true when the
    /// sprite changed and its vertices need re-uploading.
    pub fn sync(&mut self, helicopter: &Helicopter) -> bool {
        let before = *self;
        self.position = helicopter.location;
        self.flip_x = helicopter.flip_x();
        *self != before
    }

    pub fn vertices(&self, texture_size: (u32, u32)) -> [SpriteVertex; 4] {
        let rect = self.texture_rect;
        SpriteVertex::quad(QuadSpec {
            position: self.position,
            origin: SPRITE_ORIGIN,
            size: Vec2::new(rect.width as f32, rect.height as f32),
            uv: uv_rect(texture_size, rect.x, rect.y, rect.width, rect.height),
            flip_x: self.flip_x,
            color: WHITE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::world::World;

    #[test]
    fn sprite_starts_on_first_frame_at_start_location() {
        let world = World::default();
        let sprite = HelicopterSprite::new(&world.helicopter);
        assert_eq!(sprite.texture_rect, FrameRect::for_frame(0));
        assert_eq!(sprite.position, Vec2::new(400.0, 300.0));
        assert!(!sprite.flip_x);
    }

    #[test]
    fn frame_change_selects_sheet_row() {
        let world = World::default();
        let mut sprite = HelicopterSprite::new(&world.helicopter);
        sprite.set_frame(3);
        let verts = sprite.vertices((180, 256));
        assert_eq!(verts[0].tex_coords, [0.0, 0.75]);
        assert_eq!(verts[2].tex_coords, [1.0, 1.0]);
    }

    #[test]
    fn sync_reports_movement_and_flip() {
        let mut world = World::default();
        let mut sprite = HelicopterSprite::new(&world.helicopter);
        assert!(!sprite.sync(&world.helicopter));

        world.helicopter.set_target(Vec2::new(100.0, 300.0));
        assert!(sprite.sync(&world.helicopter));
        assert!(sprite.flip_x);

        world.tick();
        assert!(sprite.sync(&world.helicopter));
        assert_eq!(sprite.position, world.helicopter.location);
    }

    #[test]
    fn flipped_sprite_stays_centered_on_location() {
        let mut world = World::default();
        world.helicopter.set_target(Vec2::new(100.0, 300.0));
        let mut sprite = HelicopterSprite::new(&world.helicopter);
        sprite.sync(&world.helicopter);
        let verts = sprite.vertices((180, 256));
        let center_x = (verts[0].position[0] + verts[1].position[0]) * 0.5;
        assert_eq!(center_x, 400.0);
        assert!(verts[0].position[0] > verts[1].position[0]);
    }
}
