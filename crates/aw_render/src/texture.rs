use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image is {width}x{height}, device allows at most {max}x{max}")]
    TooLarge { width: u32, height: u32, max: u32 },
    #[error("image has no pixels")]
    Empty,
}

/// A sampled RGBA texture on the GPU together with its pixel size.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Decode an encoded image (PNG) and upload it.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self, TextureError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        check_dimensions(width, height, device.limits().max_texture_dimension_2d)?;
        Ok(Self::upload(device, queue, &rgba, width, height, label))
    }

    /// A single transparent pixel, used when the real texture failed to load.
    pub fn blank(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::upload(device, queue, &[0, 0, 0, 0], 1, 1, "blank")
    }

    // Callers guarantee 0 < width, height <= max_texture_dimension_2d.
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Pixel art: nearest filtering, and clamp so frame edges never bleed.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }
}

fn check_dimensions(width: u32, height: u32, max: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::Empty);
    }
    if width > max || height > max {
        return Err(TextureError::TooLarge { width, height, max });
    }
    Ok(())
}

/// Normalized `[u0, v0, u1, v1]` for a pixel rectangle inside a texture.
pub fn uv_rect(texture_size: (u32, u32), x: u32, y: u32, width: u32, height: u32) -> [f32; 4] {
    let tw = texture_size.0.max(1) as f32;
    let th = texture_size.1.max(1) as f32;
    [
        x as f32 / tw,
        y as f32 / th,
        (x + width) as f32 / tw,
        (y + height) as f32 / th,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_rect_for_second_frame_of_sheet() {
        let uv = uv_rect((180, 256), 0, 64, 180, 64);
        assert_eq!(uv, [0.0, 0.25, 1.0, 0.5]);
    }

    #[test]
    fn sheet_within_limits_is_accepted() {
        assert!(check_dimensions(180, 256, 2048).is_ok());
        assert!(check_dimensions(2048, 2048, 2048).is_ok());
    }

    #[test]
    fn oversized_image_is_rejected() {
        let err = check_dimensions(180, 4096, 2048).unwrap_err();
        assert!(matches!(
            err,
            TextureError::TooLarge {
                width: 180,
                height: 4096,
                max: 2048
            }
        ));
        assert_eq!(
            err.to_string(),
            "image is 180x4096, device allows at most 2048x2048"
        );
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        assert!(matches!(check_dimensions(0, 64, 2048), Err(TextureError::Empty)));
    }

    #[test]
    fn undecodable_bytes_become_decode_errors() {
        let err = image::load_from_memory(b"not a png")
            .map_err(TextureError::from)
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to decode image"));
    }

    #[test]
    fn uv_rect_handles_empty_texture() {
        let uv = uv_rect((0, 0), 0, 0, 1, 1);
        assert!(uv.iter().all(|c| c.is_finite()));
    }
}
