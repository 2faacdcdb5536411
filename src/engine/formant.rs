//! Per-formant voice state.
//!
//! Each of the up to three formants carries its own frequency, pan
//! position, duty cycle, and smoothed mask gain. The heavy lifting (table
//! reads, gating) happens in the engine's sample loop; this module owns the
//! state and the block-rate precomputation.

use core::f32::consts::FRAC_PI_4;

/// Constant-power pan gains for a position in [-1, 1].
///
/// Maps pan to an angle in [0, π/2]; left = cos, right = sin, so power
/// L² + R² is 1 at every position.
#[inline]
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let angle = (pan + 1.0) * FRAC_PI_4;
    (angle.cos(), angle.sin())
}

pub struct FormantVoice {
    /// Formant frequency in Hz (before the formant-CV multiplier).
    pub frequency_hz: f32,
    /// Pan position in [-1, 1].
    pub pan: f32,
    /// Mask gain target for the current cycle (0 or 1).
    pub mask_target: f32,
    /// Mask gain smoothed toward the target every sample.
    pub mask_gain: f32,
    /// Duty cycle for the current block, clamped to [0.01, 1].
    pub duty: f32,
    /// Cached 1/duty for the pulsaret phase rescale.
    pub inv_duty: f32,
    /// Pan gains for the current block.
    pub gain_l: f32,
    pub gain_r: f32,
}

impl FormantVoice {
    pub fn new(frequency_hz: f32, pan: f32) -> Self {
        let (gain_l, gain_r) = pan_gains(pan);
        Self {
            frequency_hz,
            pan,
            mask_target: 1.0,
            mask_gain: 1.0,
            duty: 0.5,
            inv_duty: 2.0,
            gain_l,
            gain_r,
        }
    }

    /// Fix the duty cycle for a block. Clamps to [0.01, 1], which also
    /// keeps `inv_duty` finite when the caller derives duty from a zero
    /// fundamental.
    #[inline]
    pub fn set_duty(&mut self, duty: f32) {
        self.duty = duty.clamp(0.01, 1.0);
        self.inv_duty = 1.0 / self.duty;
    }

    /// Refresh the cached pan gains (block rate).
    #[inline]
    pub fn update_pan(&mut self) {
        let (l, r) = pan_gains(self.pan);
        self.gain_l = l;
        self.gain_r = r;
    }

    /// One-pole step of the mask gain toward its target (every sample).
    #[inline]
    pub fn smooth_mask(&mut self, coeff: f32) {
        self.mask_gain = self.mask_target + coeff * (self.mask_gain - self.mask_target);
    }
}
