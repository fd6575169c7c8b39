pub mod font;
pub mod overlay;

pub use overlay::Overlay;
