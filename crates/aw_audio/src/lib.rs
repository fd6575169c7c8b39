//! Looping sound playback with adjustable pitch.
//!
//! [`SoundBuffer`] decodes a file into stereo frames, [`Voice`] walks a buffer
//! at a pitch-scaled rate, and [`Sound`] feeds a voice to the default output
//! device. Without an output device a `Sound` accepts every call and stays
//! silent.

mod buffer;
mod error;
mod output;
mod voice;

pub use buffer::{Frame, SoundBuffer};
pub use error::AudioError;
pub use output::Sound;
pub use voice::Voice;
