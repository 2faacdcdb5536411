/*
Pulsaret Masking
================

Masking mutes whole pulsaret cycles to turn a steady particle train into a
rhythmic or stochastic one. A single decision is made per master-oscillator
cycle and shared by all formants, so the whole particle train breathes
together.

  Off         every cycle sounds.

  Stochastic  each cycle is muted with probability `amount`, drawn from a
              deterministic linear-congruential generator. Same seed, same
              sequence, so runs are reproducible.

  Burst       a repeating pattern of `burst_on` sounding cycles followed by
              `burst_off` muted ones, e.g. on=4 off=4:
              [1 1 1 1 0 0 0 0 1 1 1 1 ...]

The decision is a hard 0/1 target; the engine smooths each formant's gain
toward it with a ~3 ms one-pole so mute transitions never click.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskMode {
    #[default]
    Off,
    Stochastic,
    Burst,
}

/// Per-cycle mute/sound decision engine.
pub struct MaskGenerator {
    prng_state: u32,
    burst_counter: u32,
}

const PRNG_SEED: u32 = 48_271;

impl MaskGenerator {
    pub fn new() -> Self {
        Self {
            prng_state: PRNG_SEED,
            burst_counter: 0,
        }
    }

    /// Decide the gain target (0.0 or 1.0) for a new pulse cycle.
    ///
    /// Call exactly once per master-oscillator wrap; stochastic mode
    /// advances the PRNG and burst mode steps its pattern counter, so
    /// calling at any other rate changes the audible pattern.
    pub fn decide(&mut self, mode: MaskMode, amount: f32, burst_on: u32, burst_off: u32) -> f32 {
        match mode {
            MaskMode::Off => 1.0,
            MaskMode::Stochastic => {
                self.prng_state = self
                    .prng_state
                    .wrapping_mul(1_664_525)
                    .wrapping_add(1_013_904_223);
                let rnd = (self.prng_state >> 8) as f32 / 16_777_216.0;
                if rnd < amount {
                    0.0
                } else {
                    1.0
                }
            }
            MaskMode::Burst => {
                let total = burst_on + burst_off;
                if total == 0 {
                    return 1.0;
                }
                let gain = if self.burst_counter < burst_on { 1.0 } else { 0.0 };
                self.burst_counter = (self.burst_counter + 1) % total;
                gain
            }
        }
    }
}

impl Default for MaskGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_mode_never_mutes() {
        let mut gen = MaskGenerator::new();
        for _ in 0..64 {
            assert_eq!(gen.decide(MaskMode::Off, 1.0, 4, 4), 1.0);
        }
    }

    #[test]
    fn stochastic_sequence_is_reproducible() {
        let mut a = MaskGenerator::new();
        let mut b = MaskGenerator::new();
        let seq_a: Vec<f32> = (0..256)
            .map(|_| a.decide(MaskMode::Stochastic, 0.5, 0, 0))
            .collect();
        let seq_b: Vec<f32> = (0..256)
            .map(|_| b.decide(MaskMode::Stochastic, 0.5, 0, 0))
            .collect();
        assert_eq!(seq_a, seq_b, "fixed seed must reproduce the decision sequence");
        // With amount 0.5 both outcomes should actually occur
        assert!(seq_a.contains(&0.0));
        assert!(seq_a.contains(&1.0));
    }

    #[test]
    fn stochastic_extremes() {
        let mut gen = MaskGenerator::new();
        for _ in 0..64 {
            assert_eq!(gen.decide(MaskMode::Stochastic, 0.0, 0, 0), 1.0);
        }
        for _ in 0..64 {
            assert_eq!(gen.decide(MaskMode::Stochastic, 1.0, 0, 0), 0.0);
        }
    }

    #[test]
    fn burst_four_four_pattern() {
        let mut gen = MaskGenerator::new();
        let seq: Vec<f32> = (0..16).map(|_| gen.decide(MaskMode::Burst, 0.0, 4, 4)).collect();
        let expect = [
            1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, //
            1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0,
        ];
        assert_eq!(seq, expect);
    }

    #[test]
    fn burst_with_no_off_cycles_is_always_on() {
        let mut gen = MaskGenerator::new();
        for _ in 0..32 {
            assert_eq!(gen.decide(MaskMode::Burst, 0.0, 3, 0), 1.0);
        }
    }
}
