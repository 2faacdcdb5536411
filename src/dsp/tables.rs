/*
Pulsaret and Window Lookup Tables
=================================

Pulsar synthesis reads every waveform out of pre-computed tables, so the
audio path never calls sin/exp. The bank is generated once at construction
and never mutated again.

Pulsaret waveforms (10 tables, normalized to roughly ±1):

  0: sine          pure sine wave
  1: sine x2       2nd harmonic sine
  2: sine x3       3rd harmonic sine
  3: sinc          sinc(8*pi*(p-0.5)), band-limited impulse
  4: triangle
  5: saw           rising ramp
  6: square        50% duty
  7: formant       sine x3 with exponential decay, a vowel-like burst
  8: pulse         narrow Gaussian spike at center
  9: noise         deterministic pseudo-random noise (LCG, fixed seed)

Window functions (5 tables, 0.0 to 1.0):

  0: rectangular   flat 1.0
  1: gaussian      sigma 0.3, centered
  2: hann
  3: exp decay     exp(-4p), sharp attack with gradual fade
  4: linear decay

Phase conventions differ on purpose: pulsaret tables use the exclusive
endpoint p = i/N so they loop seamlessly, while window tables use the
inclusive endpoint p = i/(N−1) so the window reaches its exact edge values.

A continuous morph index crossfades the two nearest integer-indexed tables,
clamped at the bank boundaries (no wraparound).
*/

use core::f32::consts::TAU;

/// Samples per table. Must be a power of two for the bitmask wrap.
pub const TABLE_SIZE: usize = 2048;
/// Number of pulsaret waveform tables.
pub const NUM_PULSARETS: usize = 10;
/// Number of window function tables.
pub const NUM_WINDOWS: usize = 5;

/// Fixed seed for the noise table. Regeneration must be bit-identical.
const NOISE_SEED: u32 = 12345;

/// Immutable bank of pulsaret and window lookup tables.
pub struct TableBank {
    pulsarets: Box<[[f32; TABLE_SIZE]; NUM_PULSARETS]>,
    windows: Box<[[f32; TABLE_SIZE]; NUM_WINDOWS]>,
}

impl TableBank {
    /// Generate the full bank. Pure function of the table size; calling it
    /// twice produces bit-identical contents.
    pub fn new() -> Self {
        let mut pulsarets = Box::new([[0.0f32; TABLE_SIZE]; NUM_PULSARETS]);
        let mut windows = Box::new([[0.0f32; TABLE_SIZE]; NUM_WINDOWS]);

        for i in 0..TABLE_SIZE {
            // Exclusive endpoint: tables loop seamlessly
            let p = i as f32 / TABLE_SIZE as f32;
            let two_pi_p = TAU * p;

            pulsarets[0][i] = two_pi_p.sin();
            pulsarets[1][i] = (2.0 * two_pi_p).sin();
            pulsarets[2][i] = (3.0 * two_pi_p).sin();

            // Band-limited impulse
            let x = (p - 0.5) * 8.0 * core::f32::consts::PI;
            pulsarets[3][i] = if x.abs() < 1e-4 { 1.0 } else { x.sin() / x };

            let t = 4.0 * p;
            pulsarets[4][i] = if p < 0.25 {
                t
            } else if p < 0.75 {
                2.0 - t
            } else {
                t - 4.0
            };

            pulsarets[5][i] = 2.0 * p - 1.0;
            pulsarets[6][i] = if p < 0.5 { 1.0 } else { -1.0 };
            pulsarets[7][i] = (two_pi_p * 3.0).sin() * (-3.0 * p).exp();

            let spike = (p - 0.5) * 20.0;
            pulsarets[8][i] = (-spike * spike).exp();
        }

        // Noise table, filled separately so the LCG sequence is contiguous
        let mut state = NOISE_SEED;
        for slot in pulsarets[9].iter_mut() {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *slot = state as i32 as f32 / 2_147_483_648.0;
        }

        for i in 0..TABLE_SIZE {
            // Inclusive endpoint: windows hit their exact edge values
            let p = i as f32 / (TABLE_SIZE - 1) as f32;

            windows[0][i] = 1.0;

            let x = (p - 0.5) / 0.3;
            windows[1][i] = (-0.5 * x * x).exp();

            windows[2][i] = 0.5 * (1.0 - (TAU * p).cos());
            windows[3][i] = (-4.0 * p).exp();
            windows[4][i] = 1.0 - p;
        }

        Self { pulsarets, windows }
    }

    /// Morphed read from the pulsaret bank. `index` in [0, 9], `phase` in [0, 1).
    #[inline]
    pub fn pulsaret(&self, index: f32, phase: f32) -> f32 {
        morph(&*self.pulsarets, index, phase)
    }

    /// Morphed read from the window bank. `index` in [0, 4], `phase` in [0, 1).
    #[inline]
    pub fn window(&self, index: f32, phase: f32) -> f32 {
        morph(&*self.windows, index, phase)
    }
}

impl Default for TableBank {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one table with linear interpolation.
///
/// `phase` is 0.0–1.0; indices wrap with a bitmask, which requires the
/// power-of-two table size.
#[inline]
pub fn read_lerp(table: &[f32; TABLE_SIZE], phase: f32) -> f32 {
    let pos = phase * TABLE_SIZE as f32;
    let idx = pos as i32;
    let frac = pos - idx as f32;
    let i0 = idx as usize & (TABLE_SIZE - 1);
    let i1 = (i0 + 1) & (TABLE_SIZE - 1);
    table[i0] + frac * (table[i1] - table[i0])
}

/// Crossfade the two tables nearest a continuous index.
///
/// Integer part selects adjacent tables, fractional part blends them. The
/// index is clamped to the bank range, so an exact integer index returns
/// that table's value with no contribution from its neighbor.
#[inline]
fn morph<const N: usize>(tables: &[[f32; TABLE_SIZE]; N], index: f32, phase: f32) -> f32 {
    let mut idx0 = index as i32;
    let mut frac = index - idx0 as f32;
    if idx0 < 0 {
        idx0 = 0;
        frac = 0.0;
    }
    if idx0 as usize >= N - 1 {
        idx0 = N as i32 - 2;
        frac = 1.0;
    }
    let s0 = read_lerp(&tables[idx0 as usize], phase);
    let s1 = read_lerp(&tables[idx0 as usize + 1], phase);
    s0 + frac * (s1 - s0)
}
