//! DC-blocking highpass filter.
//!
//! Gated pulsaret trains carry a DC offset whenever the window is
//! asymmetric, so each output channel runs the classic leaky differentiator
//!
//!   y[n] = x[n] - x[n-1] + coeff * y[n-1]
//!
//! with the coefficient set once from a ~25 Hz target cutoff at the active
//! sample rate.

use core::f32::consts::TAU;

/// Cutoff the blocker is tuned for.
const CUTOFF_HZ: f32 = 25.0;

pub struct DcBlocker {
    x1: f32,
    y1: f32,
    coeff: f32,
}

impl DcBlocker {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            coeff: 1.0 - TAU * CUTOFF_HZ / sample_rate,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = x - self.x1 + self.coeff * self.y1;
        self.x1 = x;
        self.y1 = y;
        y
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_input_converges_to_zero() {
        let mut blocker = DcBlocker::new(48_000.0);
        let mut y = 0.0;
        for _ in 0..48_000 {
            y = blocker.process(1.0);
        }
        assert!(y.abs() < 1e-3, "DC residue {y} after one second");
    }

    #[test]
    fn passes_audio_band_signal() {
        let mut blocker = DcBlocker::new(48_000.0);
        // 1 kHz sine, well above the 25 Hz cutoff
        let mut peak = 0.0f32;
        for n in 0..4_800 {
            let x = (TAU * 1_000.0 * n as f32 / 48_000.0).sin();
            let y = blocker.process(x);
            if n > 480 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak > 0.95, "1 kHz attenuated to {peak}");
    }

    #[test]
    fn reset_clears_state() {
        let mut blocker = DcBlocker::new(48_000.0);
        for _ in 0..100 {
            blocker.process(0.7);
        }
        blocker.reset();
        // First sample after reset behaves like a fresh filter
        assert_eq!(blocker.process(0.5), 0.5);
    }
}
