use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use parking_lot::Mutex;

use crate::buffer::SoundBuffer;
use crate::error::AudioError;
use crate::voice::Voice;

/// A voice connected to the default output device.
///
/// The device callback runs on cpal's audio thread and locks the voice for
/// each buffer it fills; every setter here is a short lock on the caller's
/// thread.
pub struct Sound {
    voice: Arc<Mutex<Voice>>,
    // Dropping the stream stops playback, so it lives as long as the sound.
    stream: Option<cpal::Stream>,
}

impl Sound {
    /// Open the default output device. Falls back to a silent sound when no
    /// device can be opened.
    pub fn new() -> Self {
        let voice = Arc::new(Mutex::new(Voice::new()));
        match open_stream(voice.clone()) {
            Ok(stream) => Self {
                voice,
                stream: Some(stream),
            },
            Err(err) => {
                log::error!("Audio output unavailable, continuing silently: {err}");
                Self::silent()
            }
        }
    }

    /// A sound that never opens a device.
    pub fn silent() -> Self {
        Self {
            voice: Arc::new(Mutex::new(Voice::new())),
            stream: None,
        }
    }

    pub fn set_buffer(&self, buffer: SoundBuffer) {
        self.voice.lock().set_buffer(buffer);
    }

    pub fn set_loop(&self, looping: bool) {
        self.voice.lock().set_loop(looping);
    }

    pub fn set_pitch(&self, pitch: f32) {
        self.voice.lock().set_pitch(pitch);
    }

    pub fn pitch(&self) -> f32 {
        self.voice.lock().pitch()
    }

    pub fn play(&self) {
        self.voice.lock().play();
    }

    pub fn has_output(&self) -> bool {
        self.stream.is_some()
    }
}

impl Default for Sound {
    fn default() -> Self {
        Self::new()
    }
}

fn open_stream(voice: Arc<Mutex<Voice>>) -> Result<cpal::Stream, AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
    let supported = device.default_output_config()?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    log::info!(
        "Audio output: {} channel(s) at {} Hz, {:?}",
        config.channels,
        config.sample_rate.0,
        sample_format
    );

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, voice)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, voice)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, voice)?,
        other => return Err(AudioError::SampleFormat(other)),
    };
    stream.play()?;
    Ok(stream)
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    voice: Arc<Mutex<Voice>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = usize::from(config.channels);
    let sample_rate = config.sample_rate.0;
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut voice = voice.lock();
            write_data(data, channels, sample_rate, &mut voice);
        },
        |err| log::error!("Audio stream error: {err}"),
        None,
    )
}

fn write_data<T>(output: &mut [T], channels: usize, sample_rate: u32, voice: &mut Voice)
where
    T: Sample + FromSample<f32>,
{
    for samples in output.chunks_mut(channels.max(1)) {
        let frame = voice.next_frame(sample_rate);
        let left = frame.left.clamp(-1.0, 1.0);
        let right = frame.right.clamp(-1.0, 1.0);
        match samples {
            [mono] => *mono = T::from_sample((left + right) * 0.5),
            [l, r, rest @ ..] => {
                *l = T::from_sample(left);
                *r = T::from_sample(right);
                for extra in rest {
                    *extra = T::EQUILIBRIUM;
                }
            }
            [] => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Frame;

    fn playing_voice(frames: Vec<Frame>, looping: bool) -> Voice {
        let mut voice = Voice::new();
        voice.set_buffer(SoundBuffer::from_frames(frames, 48_000));
        voice.set_loop(looping);
        voice.play();
        voice
    }

    #[test]
    fn stereo_output_interleaves_channels() {
        let mut voice = playing_voice(
            vec![
                Frame {
                    left: 0.25,
                    right: -0.25,
                },
                Frame {
                    left: 0.5,
                    right: -0.5,
                },
            ],
            false,
        );
        let mut out = [1.0f32; 6];
        write_data(&mut out, 2, 48_000, &mut voice);
        assert_eq!(out, [0.25, -0.25, 0.5, -0.5, 0.0, 0.0]);
    }

    #[test]
    fn mono_output_averages() {
        let mut voice = playing_voice(
            vec![Frame {
                left: 0.5,
                right: 0.25,
            }],
            true,
        );
        let mut out = [0.0f32; 2];
        write_data(&mut out, 1, 48_000, &mut voice);
        assert_eq!(out, [0.375, 0.375]);
    }

    #[test]
    fn extra_channels_are_silent() {
        let mut voice = playing_voice(
            vec![Frame {
                left: 0.5,
                right: 0.5,
            }],
            true,
        );
        let mut out = [1.0f32; 4];
        write_data(&mut out, 4, 48_000, &mut voice);
        assert_eq!(out, [0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn integer_output_is_clamped() {
        let mut voice = playing_voice(
            vec![Frame {
                left: 2.0,
                right: -2.0,
            }],
            true,
        );
        let mut out = [0i16; 2];
        write_data(&mut out, 2, 48_000, &mut voice);
        assert!(out[0] > 32_000);
        assert!(out[1] < -32_000);
    }

    #[test]
    fn silent_sound_accepts_every_call() {
        let sound = Sound::silent();
        assert!(!sound.has_output());
        sound.set_buffer(SoundBuffer::from_frames(vec![Frame::EQUILIBRIUM], 44_100));
        sound.set_loop(true);
        sound.set_pitch(0.5);
        sound.play();
        assert_eq!(sound.pitch(), 0.5);
    }
}
