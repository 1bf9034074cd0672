//! External interfaces: audio buffers, MIDI bytes and their conversion to
//! synth messages.

pub mod converter;
pub mod midi;

/// Planar multi-channel audio block, one `Vec` per channel.
#[derive(Debug, Default, Clone)]
pub struct AudioBuffer {
    pub buffers: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Silent buffer of `channels` × `frames`.
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; frames]; channels],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.buffers.len()
    }

    /// Frames every channel can hold (the shortest channel wins).
    pub fn num_frames(&self) -> usize {
        self.buffers.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.buffers.get(index).map(Vec::as_slice)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        self.buffers.get_mut(index).map(Vec::as_mut_slice)
    }

    pub fn clear(&mut self) {
        for channel in &mut self.buffers {
            channel.fill(0.0);
        }
    }

    /// Write the first `frames` frames as interleaved samples into `out`.
    ///
    /// Output channels beyond `num_channels()` repeat the last channel.
    pub fn write_interleaved(&self, out: &mut [f32], out_channels: usize, frames: usize) {
        if out_channels == 0 || self.buffers.is_empty() {
            out.fill(0.0);
            return;
        }
        let frames = frames.min(self.num_frames()).min(out.len() / out_channels);
        let last = self.buffers.len() - 1;

        for (frame, chunk) in out.chunks_mut(out_channels).take(frames).enumerate() {
            for (ch, sample) in chunk.iter_mut().enumerate() {
                *sample = self.buffers[ch.min(last)][frame];
            }
        }
        out[frames * out_channels..].fill(0.0);
    }

    /// Peak absolute sample across all channels.
    pub fn peak(&self) -> f32 {
        self.buffers
            .iter()
            .flat_map(|ch| ch.iter())
            .fold(0.0f32, |acc, &s| acc.max(s.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_silent() {
        let buffer = AudioBuffer::new(2, 64);
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.num_frames(), 64);
        assert_eq!(buffer.peak(), 0.0);
    }

    #[test]
    fn test_write_interleaved_duplicates_mono() {
        let mut buffer = AudioBuffer::new(1, 3);
        buffer.buffers[0].copy_from_slice(&[0.1, 0.2, 0.3]);

        let mut out = vec![9.0; 8];
        buffer.write_interleaved(&mut out, 2, 3);
        assert_eq!(out, vec![0.1, 0.1, 0.2, 0.2, 0.3, 0.3, 0.0, 0.0]);
    }

    #[test]
    fn test_num_frames_uses_shortest_channel() {
        let buffer = AudioBuffer {
            buffers: vec![vec![0.0; 10], vec![0.0; 4]],
        };
        assert_eq!(buffer.num_frames(), 4);
    }
}
