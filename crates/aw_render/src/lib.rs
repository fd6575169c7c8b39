pub mod camera;
pub mod gpu_context;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::{Camera2D, CameraUniform};
pub use gpu_context::{GpuContext, GpuError};
pub use sprite_pipeline::SpritePipeline;
pub use texture::{Texture, TextureError};
pub use vertex::SpriteVertex;
