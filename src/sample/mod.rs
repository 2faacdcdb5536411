//! Sample-based pulsaret source.
//!
//! One mono buffer (up to one second at 48 kHz) can replace the table
//! pulsaret. It is filled out-of-band by a loader; the audio path trusts
//! only the reported frames-loaded count, never the buffer contents beyond
//! it. While a load is in flight the buffer is owned by the loader, the
//! loaded count reads zero, and the engine falls back to table synthesis.

#[cfg(feature = "rtrb")]
pub mod loader;

/// Capacity of the sample buffer in mono frames.
pub const SAMPLE_BUFFER_CAPACITY: usize = 48_000;

/// Owned frame storage, allocated once and exchanged with the loader by
/// ownership transfer so the audio thread never observes a torn write.
#[derive(Debug)]
pub struct SampleBuffer {
    frames: Box<[f32]>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            frames: vec![0.0; SAMPLE_BUFFER_CAPACITY].into_boxed_slice(),
        }
    }

    pub fn frames(&self) -> &[f32] {
        &self.frames
    }

    /// Writable view for the loader.
    pub fn frames_mut(&mut self) -> &mut [f32] {
        &mut self.frames
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine-side sample state: the buffer (when not out on loan) and the
/// trusted frame count.
pub struct SampleBank {
    buffer: Option<SampleBuffer>,
    loaded_frames: usize,
}

impl SampleBank {
    pub fn new() -> Self {
        Self {
            buffer: Some(SampleBuffer::new()),
            loaded_frames: 0,
        }
    }

    /// Number of valid frames. Zero while a load is in flight.
    #[inline]
    pub fn loaded_frames(&self) -> usize {
        if self.buffer.is_some() {
            self.loaded_frames
        } else {
            0
        }
    }

    /// True while the buffer is out with the loader.
    #[inline]
    pub fn load_pending(&self) -> bool {
        self.buffer.is_none()
    }

    /// Take the buffer to hand to the loader. Returns `None` when a load is
    /// already pending; the caller must drop the request, which is the
    /// system's only backpressure.
    pub fn begin_load(&mut self) -> Option<SampleBuffer> {
        self.buffer.take()
    }

    /// Put the buffer back untouched when a request could not be issued.
    /// The previously loaded frames stay valid.
    pub fn cancel_load(&mut self, buffer: SampleBuffer) {
        self.buffer = Some(buffer);
    }

    /// Return the buffer from the loader with the number of frames it
    /// actually filled. A failed load reports zero frames, which disables
    /// the sample source rather than playing stale data.
    pub fn finish_load(&mut self, buffer: SampleBuffer, frames_loaded: usize) {
        self.loaded_frames = frames_loaded.min(SAMPLE_BUFFER_CAPACITY);
        self.buffer = Some(buffer);
    }

    /// Linear-interpolated read at a fractional frame position.
    ///
    /// Callers gate on `loaded_frames() >= 2`; the index is clamped to the
    /// valid range regardless.
    #[inline]
    pub fn read(&self, pos: f32) -> f32 {
        let frames = self.loaded_frames();
        let Some(buffer) = &self.buffer else {
            return 0.0;
        };
        if frames < 2 {
            return 0.0;
        }
        let idx = pos as i32;
        let frac = pos - idx as f32;
        let idx = (idx.max(0) as usize).min(frames - 2);
        let data = buffer.frames();
        data[idx] + frac * (data[idx + 1] - data[idx])
    }
}

impl Default for SampleBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_ramp(bank: &mut SampleBank, frames: usize) {
        let mut buffer = bank.begin_load().expect("no load pending");
        for (i, frame) in buffer.frames_mut()[..frames].iter_mut().enumerate() {
            *frame = i as f32;
        }
        bank.finish_load(buffer, frames);
    }

    #[test]
    fn second_load_request_is_dropped_while_pending() {
        let mut bank = SampleBank::new();
        let held = bank.begin_load().expect("first request should succeed");
        assert!(bank.load_pending());
        assert!(bank.begin_load().is_none(), "in-flight load must block new requests");
        bank.finish_load(held, 100);
        assert!(!bank.load_pending());
    }

    #[test]
    fn loaded_frames_reads_zero_during_flight() {
        let mut bank = SampleBank::new();
        load_ramp(&mut bank, 1_000);
        assert_eq!(bank.loaded_frames(), 1_000);

        let held = bank.begin_load().expect("buffer available");
        assert_eq!(bank.loaded_frames(), 0);
        assert_eq!(bank.read(10.0), 0.0);
        bank.finish_load(held, 1_000);
        assert_eq!(bank.loaded_frames(), 1_000);
    }

    #[test]
    fn failed_load_disables_sample_source() {
        let mut bank = SampleBank::new();
        load_ramp(&mut bank, 1_000);
        let held = bank.begin_load().expect("buffer available");
        bank.finish_load(held, 0);
        assert_eq!(bank.loaded_frames(), 0);
        assert_eq!(bank.read(5.0), 0.0);
    }

    #[test]
    fn read_interpolates_and_clamps() {
        let mut bank = SampleBank::new();
        load_ramp(&mut bank, 10);

        assert_eq!(bank.read(3.0), 3.0);
        assert!((bank.read(3.5) - 3.5).abs() < 1e-6);
        // Past the end: clamps to the last valid pair
        let tail = bank.read(100.0);
        assert!(tail >= 8.0 && tail.is_finite());
        // Negative positions clamp to the start
        assert!(bank.read(-1.0).is_finite());
    }

    #[test]
    fn frame_count_clamped_to_capacity() {
        let mut bank = SampleBank::new();
        let held = bank.begin_load().expect("buffer available");
        bank.finish_load(held, SAMPLE_BUFFER_CAPACITY * 2);
        assert_eq!(bank.loaded_frames(), SAMPLE_BUFFER_CAPACITY);
    }
}
