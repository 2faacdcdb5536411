//! Control-voltage modulation mapping.
//!
//! All CV inputs except pitch are averaged once per block and folded into
//! the cached parameters for that block. Pitch is the exception: it drives
//! continuous phase accumulation, where block-rate updates would produce
//! audible stepping, so the engine reads it per sample. Voltages follow the
//! modular conventions: bipolar inputs are ±5 V, unipolar 0–10 V.

/// Optional CV input buses for one block. Slices must all cover the block.
#[derive(Default)]
pub struct CvInputs<'a> {
    /// 1 V/oct pitch, read per sample.
    pub pitch: Option<&'a [f32]>,
    /// Bipolar ±5 V → ±50% multiplier on all formant frequencies.
    pub formant: Option<&'a [f32]>,
    /// Bipolar ±5 V → ±20% absolute offset on duty.
    pub duty: Option<&'a [f32]>,
    /// Unipolar 0–10 V → [0,1]; overrides the stochastic mask amount.
    pub mask: Option<&'a [f32]>,
    /// Bipolar ±5 V → full-range offset on the pulsaret morph index.
    pub pulsaret: Option<&'a [f32]>,
    /// Bipolar ±5 V → full-range offset on the window morph index.
    pub window: Option<&'a [f32]>,
    /// Unipolar 0–10 V → [0, 2000] ms; overrides the glide parameter.
    pub glide: Option<&'a [f32]>,
    /// Bipolar ±5 V → up to ±2x offset on the sample-rate ratio.
    pub sample_rate: Option<&'a [f32]>,
    /// Unipolar 0–10 V → [0,1] amplitude multiplier.
    pub amplitude: Option<&'a [f32]>,
}

/// Block-rate modulation values derived from the CV inputs.
///
/// Unconnected inputs resolve to their identity (multiplier 1, offset 0,
/// `None` for the overrides).
pub struct BlockCv {
    pub formant_mul: f32,
    pub duty_offset: f32,
    pub mask_amount: Option<f32>,
    pub pulsaret_offset: f32,
    pub window_offset: f32,
    pub glide_ms: Option<f32>,
    pub sample_rate_offset: f32,
    pub amp_mul: f32,
}

impl BlockCv {
    /// Single pass over each connected bus, then range mapping.
    pub fn measure(cv: &CvInputs) -> Self {
        Self {
            formant_mul: 1.0 + avg(cv.formant) * 0.1,
            duty_offset: avg(cv.duty) * 0.04,
            mask_amount: cv.mask.map(|b| (avg(Some(b)) * 0.1).clamp(0.0, 1.0)),
            pulsaret_offset: avg(cv.pulsaret) * 0.9,
            window_offset: avg(cv.window) * 0.4,
            glide_ms: cv.glide.map(|b| (avg(Some(b)) * 200.0).clamp(0.0, 2000.0)),
            sample_rate_offset: avg(cv.sample_rate) * 0.4,
            amp_mul: match cv.amplitude {
                Some(b) => (avg(Some(b)) * 0.1).clamp(0.0, 1.0),
                None => 1.0,
            },
        }
    }
}

fn avg(bus: Option<&[f32]>) -> f32 {
    match bus {
        Some(samples) if !samples.is_empty() => {
            samples.iter().sum::<f32>() / samples.len() as f32
        }
        _ => 0.0,
    }
}
