use std::fs::File;
use std::ops::{Add, Mul};
use std::path::Path;
use std::sync::Arc;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use crate::error::AudioError;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub right: f32,
}

impl Frame {
    pub const EQUILIBRIUM: Self = Self {
        left: 0.0,
        right: 0.0,
    };
}

impl Add for Frame {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            left: self.left + rhs.left,
            right: self.right + rhs.right,
        }
    }
}

impl Mul<f32> for Frame {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            left: self.left * rhs,
            right: self.right * rhs,
        }
    }
}

/// Decoded audio held in memory. Cloning shares the samples.
#[derive(Clone, Debug)]
pub struct SoundBuffer {
    frames: Arc<[Frame]>,
    sample_rate: u32,
}

impl SoundBuffer {
    pub fn from_frames(frames: Vec<Frame>, sample_rate: u32) -> Self {
        Self {
            frames: frames.into(),
            sample_rate: sample_rate.max(1),
        }
    }

    /// Decode a whole file. Packets that fail to decode are skipped.
    pub fn from_file<P>(path: P) -> Result<Self, AudioError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let media_source = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_owned(),
            source,
        })?;
        let decode_err = |source| AudioError::Decode {
            path: path.to_owned(),
            source,
        };

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let codecs = symphonia::default::get_codecs();
        let probe = symphonia::default::get_probe();
        let mss = MediaSourceStream::new(Box::new(media_source), Default::default());

        let mut format_reader = probe
            .format(&hint, mss, &Default::default(), &Default::default())
            .map_err(decode_err)?
            .format;

        let track = format_reader
            .default_track()
            .ok_or_else(|| AudioError::NoTrack {
                path: path.to_owned(),
            })?;
        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AudioError::NoTrack {
                path: path.to_owned(),
            })?;

        let mut decoder = codecs
            .make(&track.codec_params, &Default::default())
            .map_err(decode_err)?;
        let mut frames = vec![];

        loop {
            let packet = match format_reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(err))
                    if err.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(err) => return Err(decode_err(err)),
            };
            if packet.track_id() != track_id {
                continue;
            }
            match decoder.decode(&packet) {
                Ok(buffer) => frames.extend(copy_frames_from_buffer_ref(&buffer)),
                Err(SymphoniaError::DecodeError(reason)) => {
                    log::warn!("Skipping bad packet in '{}': {reason}", path.display());
                }
                Err(err) => return Err(decode_err(err)),
            }
        }

        if frames.is_empty() {
            return Err(AudioError::NoTrack {
                path: path.to_owned(),
            });
        }

        log::info!(
            "Decoded '{}': {} frames at {} Hz",
            path.display(),
            frames.len(),
            sample_rate
        );
        Ok(Self::from_frames(frames, sample_rate))
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

fn copy_frames_from_buffer_ref(src: &AudioBufferRef<'_>) -> Vec<Frame> {
    match src {
        AudioBufferRef::U8(buf) => copy_frames_from_buffer(buf),
        AudioBufferRef::U16(buf) => copy_frames_from_buffer(buf),
        AudioBufferRef::U24(buf) => copy_frames_from_buffer(buf),
        AudioBufferRef::U32(buf) => copy_frames_from_buffer(buf),
        AudioBufferRef::S8(buf) => copy_frames_from_buffer(buf),
        AudioBufferRef::S16(buf) => copy_frames_from_buffer(buf),
        AudioBufferRef::S24(buf) => copy_frames_from_buffer(buf),
        AudioBufferRef::S32(buf) => copy_frames_from_buffer(buf),
        AudioBufferRef::F32(buf) => copy_frames_from_buffer(buf),
        AudioBufferRef::F64(buf) => copy_frames_from_buffer(buf),
    }
}

/// Mono is duplicated to both sides; anything wider keeps its first two channels.
fn copy_frames_from_buffer<T>(src: &AudioBuffer<T>) -> Vec<Frame>
where
    f32: FromSample<T>,
    T: Sample,
{
    match src.spec().channels.count() {
        0 => Vec::new(),
        1 => src
            .chan(0)
            .iter()
            .map(|sample| Frame {
                left: f32::from_sample(*sample),
                right: f32::from_sample(*sample),
            })
            .collect(),
        _ => src
            .chan(0)
            .iter()
            .zip(src.chan(1).iter())
            .map(|(left, right)| Frame {
                left: f32::from_sample(*left),
                right: f32::from_sample(*right),
            })
            .collect(),
    }
}
