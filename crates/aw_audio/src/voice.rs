use crate::buffer::{Frame, SoundBuffer};

/// Playback state for one buffer: position, loop flag and pitch.
///
/// Pitch scales the playback rate, so 0.5 plays an octave down at half speed.
#[derive(Debug, Clone)]
pub struct Voice {
    buffer: Option<SoundBuffer>,
    cursor: f64,
    looping: bool,
    pitch: f32,
    playing: bool,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            buffer: None,
            cursor: 0.0,
            looping: false,
            pitch: 1.0,
            playing: false,
        }
    }

    /// Replace the buffer and rewind.
    pub fn set_buffer(&mut self, buffer: SoundBuffer) {
        self.buffer = Some(buffer);
        self.cursor = 0.0;
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.max(0.0);
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn play(&mut self) {
        if !self.playing {
            self.cursor = 0.0;
        }
        self.playing = true;
    }

    /// Produce the next output frame for a device running at `output_rate` Hz.
    pub fn next_frame(&mut self, output_rate: u32) -> Frame {
        if !self.playing {
            return Frame::EQUILIBRIUM;
        }
        let Some(buffer) = &self.buffer else {
            return Frame::EQUILIBRIUM;
        };
        let frames = buffer.frames();
        let len = frames.len();
        if len == 0 {
            return Frame::EQUILIBRIUM;
        }

        if self.cursor >= len as f64 {
            if self.looping {
                self.cursor %= len as f64;
            } else {
                self.playing = false;
                return Frame::EQUILIBRIUM;
            }
        }

        let index = self.cursor as usize;
        let frac = (self.cursor - index as f64) as f32;
        let current = frames[index];
        let next = match frames.get(index + 1) {
            Some(frame) => *frame,
            None if self.looping => frames[0],
            None => current,
        };

        let step = f64::from(self.pitch) * f64::from(buffer.sample_rate())
            / f64::from(output_rate.max(1));
        self.cursor += step;

        current * (1.0 - frac) + next * frac
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> SoundBuffer {
        let frames = (0..len)
            .map(|i| Frame {
                left: i as f32,
                right: -(i as f32),
            })
            .collect();
        SoundBuffer::from_frames(frames, 100)
    }

    #[test]
    fn silent_until_played() {
        let mut voice = Voice::new();
        voice.set_buffer(ramp(4));
        assert_eq!(voice.next_frame(100), Frame::EQUILIBRIUM);
        voice.play();
        voice.next_frame(100);
        assert_eq!(voice.next_frame(100).left, 1.0);
    }

    #[test]
    fn silent_without_buffer() {
        let mut voice = Voice::new();
        voice.play();
        assert_eq!(voice.next_frame(44_100), Frame::EQUILIBRIUM);
    }

    #[test]
    fn one_shot_stops_at_end() {
        let mut voice = Voice::new();
        voice.set_buffer(ramp(3));
        voice.play();
        let out: Vec<Frame> = (0..5).map(|_| voice.next_frame(100)).collect();
        assert_eq!(out[2].left, 2.0);
        assert_eq!(out[3], Frame::EQUILIBRIUM);
        assert!(!voice.playing);
    }

    #[test]
    fn looping_wraps_around() {
        let mut voice = Voice::new();
        voice.set_buffer(ramp(3));
        voice.set_loop(true);
        voice.play();
        let lefts: Vec<f32> = (0..7).map(|_| voice.next_frame(100).left).collect();
        assert_eq!(lefts, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0]);
        assert!(voice.playing);
    }

    #[test]
    fn half_pitch_interpolates_between_frames() {
        let mut voice = Voice::new();
        voice.set_buffer(ramp(4));
        voice.set_pitch(0.5);
        voice.play();
        let lefts: Vec<f32> = (0..4).map(|_| voice.next_frame(100).left).collect();
        assert_eq!(lefts, vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn device_rate_scales_step() {
        let mut voice = Voice::new();
        voice.set_buffer(ramp(8));
        voice.play();
        // Buffer at 100 Hz on a 50 Hz device skips every other frame.
        let lefts: Vec<f32> = (0..3).map(|_| voice.next_frame(50).left).collect();
        assert_eq!(lefts, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn negative_pitch_is_clamped() {
        let mut voice = Voice::new();
        voice.set_pitch(-2.0);
        assert_eq!(voice.pitch(), 0.0);
    }
}
