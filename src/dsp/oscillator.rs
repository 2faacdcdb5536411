//! Master phase oscillator with glide.
//!
//! One sawtooth phase accumulator in [0, 1) is shared by every formant; its
//! wrap marks the start of a new pulsaret cycle. Frequency follows a target
//! through a one-pole lag (portamento). The per-sample recursion is
//! stateful, so samples must be advanced strictly in order.

use crate::dsp::approx::coeff_from_ms;

pub struct MasterOscillator {
    phase: f32,
    fundamental_hz: f32,
    target_hz: f32,
    glide_coeff: f32,
    inv_sample_rate: f32,
}

impl MasterOscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            fundamental_hz: 0.0,
            target_hz: 0.0,
            glide_coeff: 0.0,
            inv_sample_rate: 1.0 / sample_rate,
        }
    }

    /// Set the glide time. A time of zero snaps instantly.
    pub fn set_glide_ms(&mut self, ms: f32, sample_rate: f32) {
        self.glide_coeff = coeff_from_ms(ms, sample_rate);
    }

    /// Override the glide coefficient directly (used by the glide CV input).
    pub fn set_glide_coeff(&mut self, coeff: f32) {
        self.glide_coeff = coeff;
    }

    /// Set a new target frequency. Snaps immediately when `snap` is true
    /// (no glide configured, or no previous note to glide from).
    pub fn set_target_hz(&mut self, hz: f32, snap: bool) {
        self.target_hz = hz;
        if snap || self.fundamental_hz <= 0.0 {
            self.fundamental_hz = hz;
        }
    }

    /// Current (glide-smoothed) fundamental frequency in Hz.
    #[inline]
    pub fn fundamental_hz(&self) -> f32 {
        self.fundamental_hz
    }

    #[inline]
    pub fn glide_coeff(&self) -> f32 {
        self.glide_coeff
    }

    /// Advance one sample.
    ///
    /// `pitch_mul` multiplies the instantaneous frequency (1.0 when no pitch
    /// CV is connected). Returns the phase for this sample and whether the
    /// accumulator wrapped, which raises exactly one pulse per cycle. The
    /// phase increment is clamped to [0, 0.5] as a runaway-pitch bound.
    #[inline]
    pub fn tick(&mut self, pitch_mul: f32) -> (f32, bool) {
        self.fundamental_hz =
            self.target_hz + self.glide_coeff * (self.fundamental_hz - self.target_hz);

        let freq_hz = self.fundamental_hz * pitch_mul;
        let phase_inc = (freq_hz * self.inv_sample_rate).clamp(0.0, 0.5);

        self.phase += phase_inc;
        let mut new_pulse = false;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
            new_pulse = true;
        }
        debug_assert!((0.0..1.0).contains(&self.phase));

        (self.phase, new_pulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn wraps_once_per_period() {
        let mut osc = MasterOscillator::new(SAMPLE_RATE);
        osc.set_target_hz(440.0, true);

        let mut pulses = 0;
        for _ in 0..48_000 {
            if osc.tick(1.0).1 {
                pulses += 1;
            }
        }
        // 440 Hz for one second: 439 or 440 wraps depending on start phase
        assert!(
            (439..=441).contains(&pulses),
            "expected ~440 pulses, got {pulses}"
        );
    }

    #[test]
    fn phase_stays_in_unit_interval() {
        let mut osc = MasterOscillator::new(SAMPLE_RATE);
        osc.set_target_hz(8_000.0, true);
        for _ in 0..10_000 {
            let (phase, _) = osc.tick(2.0);
            assert!((0.0..1.0).contains(&phase));
        }
    }

    #[test]
    fn increment_clamp_bounds_runaway_pitch() {
        let mut osc = MasterOscillator::new(SAMPLE_RATE);
        osc.set_target_hz(1.0e9, true);
        // Even at an absurd frequency the phase advances at most 0.5/sample,
        // so a wrap can occur at most every other sample.
        let mut last_pulse = false;
        for _ in 0..100 {
            let (_, pulse) = osc.tick(1.0);
            assert!(!(pulse && last_pulse), "wrapped twice in a row");
            last_pulse = pulse;
        }
    }

    #[test]
    fn glide_approaches_target_exponentially() {
        let mut osc = MasterOscillator::new(SAMPLE_RATE);
        osc.set_target_hz(220.0, true);
        osc.set_glide_ms(10.0, SAMPLE_RATE);
        osc.set_target_hz(440.0, false);

        // After one time constant the gap closes to ~1/e
        for _ in 0..480 {
            osc.tick(1.0);
        }
        let gap = (440.0 - osc.fundamental_hz()) / 220.0;
        assert!(
            (gap - (-1.0f32).exp()).abs() < 0.01,
            "gap after one tau was {gap}"
        );

        for _ in 0..48_000 {
            osc.tick(1.0);
        }
        assert!((osc.fundamental_hz() - 440.0).abs() < 0.01);
    }

    #[test]
    fn zero_glide_snaps() {
        let mut osc = MasterOscillator::new(SAMPLE_RATE);
        osc.set_target_hz(220.0, true);
        osc.set_target_hz(880.0, true);
        assert_eq!(osc.fundamental_hz(), 880.0);
    }
}
