use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Orthographic camera over a fixed world rectangle with y pointing down, the
/// way window pixel coordinates run. The world view is stretched to fill the
/// window, so resizing never changes what is visible.
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    pub viewport: (u32, u32),
}

impl Camera2D {
    /// Camera showing `(0, 0)..(width, height)`.
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::new(viewport_width as f32 * 0.5, viewport_height as f32 * 0.5),
            zoom: 1.0,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let half_w = (self.viewport.0 as f32) / (2.0 * self.zoom);
        let half_h = (self.viewport.1 as f32) / (2.0 * self.zoom);

        // bottom > top flips the y axis so +y runs down the screen.
        let proj = Mat4::orthographic_rh(
            self.position.x - half_w,
            self.position.x + half_w,
            self.position.y + half_h,
            self.position.y - half_h,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }

    /// Map a cursor position in physical window pixels to world coordinates.
    pub fn screen_to_world(&self, screen: (f64, f64), surface_size: (u32, u32)) -> Vec2 {
        let width = surface_size.0.max(1) as f32;
        let height = surface_size.1.max(1) as f32;
        let half_w = (self.viewport.0 as f32) / (2.0 * self.zoom);
        let half_h = (self.viewport.1 as f32) / (2.0 * self.zoom);
        let u = screen.0 as f32 / width;
        let v = screen.1 as f32 / height;
        Vec2::new(
            self.position.x - half_w + u * half_w * 2.0,
            self.position.y - half_h + v * half_h * 2.0,
        )
    }
}
