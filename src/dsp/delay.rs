//! Recirculating feedback delay.
//!
//! A fixed ring of `capacity` samples. The dry input is always present in the
//! output; each pass around the ring scales the stored signal by `feedback`:
//!
//! ```text
//! out      = in + ring[pos]
//! ring[pos] = (ring[pos] + in) * feedback
//! pos      = (pos + 1) % capacity
//! ```
//!
//! With feedback 0 the delay is transparent. With feedback 1 echoes repeat
//! forever, so the engine clamps it to [0, 1].

pub struct FeedbackDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    feedback: f32,
}

impl FeedbackDelay {
    /// Allocates `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_pos: 0,
            feedback: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 1.0);
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let stored = self.buffer[self.write_pos];
        let out = sample + stored;
        self.buffer[self.write_pos] = (stored + sample) * self.feedback;

        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }

        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
