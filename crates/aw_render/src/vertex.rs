use glam::Vec2;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

/// Two triangles over the four corners emitted by [`SpriteVertex::quad`].
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Placement of one textured quad in world space.
#[derive(Debug, Clone, Copy)]
pub struct QuadSpec {
    pub position: Vec2,
    /// Point inside the quad, in pixels from its top-left, placed at `position`.
    pub origin: Vec2,
    pub size: Vec2,
    /// Texture coordinates as `[u0, v0, u1, v1]`.
    pub uv: [f32; 4],
    pub flip_x: bool,
    pub color: [f32; 4],
}

impl SpriteVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Corners in top-left, top-right, bottom-right, bottom-left order (y down).
    /// Flipping mirrors the quad around `position`, so the origin stays put.
    pub fn quad(spec: QuadSpec) -> [SpriteVertex; 4] {
        let sign = if spec.flip_x { -1.0 } else { 1.0 };
        let left = spec.position.x - spec.origin.x * sign;
        let right = left + spec.size.x * sign;
        let top = spec.position.y - spec.origin.y;
        let bottom = top + spec.size.y;
        let [u0, v0, u1, v1] = spec.uv;

        [
            SpriteVertex {
                position: [left, top],
                tex_coords: [u0, v0],
                color: spec.color,
            },
            SpriteVertex {
                position: [right, top],
                tex_coords: [u1, v0],
                color: spec.color,
            },
            SpriteVertex {
                position: [right, bottom],
                tex_coords: [u1, v1],
                color: spec.color,
            },
            SpriteVertex {
                position: [left, bottom],
                tex_coords: [u0, v1],
                color: spec.color,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(flip_x: bool) -> QuadSpec {
        QuadSpec {
            position: Vec2::new(400.0, 300.0),
            origin: Vec2::new(90.0, 32.0),
            size: Vec2::new(180.0, 64.0),
            uv: [0.0, 0.25, 1.0, 0.5],
            flip_x,
            color: [1.0; 4],
        }
    }

    #[test]
    fn quad_is_centered_on_origin() {
        let quad = SpriteVertex::quad(spec(false));
        assert_eq!(quad[0].position, [310.0, 268.0]);
        assert_eq!(quad[2].position, [490.0, 332.0]);
        assert_eq!(quad[0].tex_coords, [0.0, 0.25]);
        assert_eq!(quad[2].tex_coords, [1.0, 0.5]);
    }

    #[test]
    fn flipped_quad_mirrors_around_position() {
        let quad = SpriteVertex::quad(spec(true));
        assert_eq!(quad[0].position, [490.0, 268.0]);
        assert_eq!(quad[1].position, [310.0, 268.0]);
        // Texture coordinates stay attached to the same corners, so the image mirrors.
        assert_eq!(quad[0].tex_coords, [0.0, 0.25]);
    }

    #[test]
    fn layout_stride_matches_struct() {
        assert_eq!(SpriteVertex::layout().array_stride, 32);
    }
}
