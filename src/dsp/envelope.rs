//! One-pole ASR (attack/sustain/release) envelope.
//!
//! The envelope is a single exponential smoother chasing a target of 1.0
//! while the gate is held and 0.0 after release, with separate attack and
//! release coefficients. Given coefficients in (0,1) and targets in {0,1}
//! the level is always bounded in [0,1].

use crate::dsp::approx::coeff_from_ms;

pub struct AsrEnvelope {
    level: f32,
    target: f32,
    attack_coeff: f32,
    release_coeff: f32,
    gate: bool,
}

impl AsrEnvelope {
    pub fn new(attack_ms: f32, release_ms: f32, sample_rate: f32) -> Self {
        Self {
            level: 0.0,
            target: 0.0,
            attack_coeff: coeff_from_ms(attack_ms, sample_rate),
            release_coeff: coeff_from_ms(release_ms, sample_rate),
            gate: false,
        }
    }

    pub fn set_attack_ms(&mut self, ms: f32, sample_rate: f32) {
        self.attack_coeff = coeff_from_ms(ms, sample_rate);
    }

    pub fn set_release_ms(&mut self, ms: f32, sample_rate: f32) {
        self.release_coeff = coeff_from_ms(ms, sample_rate);
    }

    /// Gate high: chase 1.0 with the attack coefficient.
    pub fn gate_on(&mut self) {
        self.gate = true;
        self.target = 1.0;
    }

    /// Gate low: chase 0.0 with the release coefficient, from wherever the
    /// level currently is.
    pub fn gate_off(&mut self) {
        self.gate = false;
        self.target = 0.0;
    }

    /// Advance one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let coeff = if self.gate {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.level = self.target + coeff * (self.level - self.target);
        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    #[inline]
    pub fn gate(&self) -> bool {
        self.gate
    }
}
