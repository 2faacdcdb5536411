//! Enumerated parameter store.
//!
//! Every control the engine exposes is an integer parameter with a defined
//! range, default, display scale, and (for mode switches) an enumerated
//! string set. The host owns range enforcement; the engine assumes values
//! arrive pre-clamped and converts them to the float/enum working values
//! cached in [`crate::engine::PulsarEngine`]. Time-based parameters
//! (attack, release, glide) recompute their one-pole coefficients the
//! moment they change, never mid-block.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::MaskMode;

/// How a formant's duty cycle is derived.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DutyMode {
    /// Use the global Duty Cycle parameter (plus duty CV offset).
    #[default]
    Manual,
    /// Derive duty from `fundamental / formant_hz`, so higher formants get
    /// proportionally shorter pulsarets.
    FormantDerived,
}

/// What opens and closes the amplitude gate.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateMode {
    /// Gate and pitch follow note input.
    #[default]
    Midi,
    /// Gate held open, full velocity, pitch from the Base Pitch parameter.
    FreeRun,
}

/// How a channel writes into its output bus.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Add,
    Replace,
}

/// Display unit for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    None,
    Percent,
    Hz,
    Ms,
    Enum,
    MidiNote,
    /// CV/audio bus selector; 0 means unconnected.
    Bus,
}

/// Display scale factor applied to the raw integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    None,
    /// Raw value is in tenths (e.g. raw 100 displays as 10.0).
    Ten,
}

/// Static description of one parameter.
pub struct ParamSpec {
    pub name: &'static str,
    pub min: i16,
    pub max: i16,
    pub default: i16,
    pub unit: Unit,
    pub scaling: Scaling,
    pub enum_strings: Option<&'static [&'static str]>,
}

const DUTY_MODE_STRINGS: &[&str] = &["Manual", "Formant"];
const MASK_MODE_STRINGS: &[&str] = &["Off", "Stochastic", "Burst"];
const USE_SAMPLE_STRINGS: &[&str] = &["Off", "On"];
const GATE_MODE_STRINGS: &[&str] = &["MIDI", "Free Run"];
const OUTPUT_MODE_STRINGS: &[&str] = &["Add", "Replace"];

/// Every engine parameter. `as usize` gives the store index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum ParamId {
    // Synthesis
    Pulsaret,
    Window,
    DutyCycle,
    DutyMode,
    // Formants
    FormantCount,
    Formant1Hz,
    Formant2Hz,
    Formant3Hz,
    // Masking
    MaskMode,
    MaskAmount,
    BurstOn,
    BurstOff,
    // Envelope
    Attack,
    Release,
    Amplitude,
    Glide,
    // Panning
    Pan1,
    Pan2,
    Pan3,
    // Sample
    UseSample,
    SampleFolder,
    SampleFile,
    SampleRate,
    // CV inputs
    PitchCv,
    FormantCv,
    DutyCv,
    MaskCv,
    PulsaretCv,
    WindowCv,
    GlideCv,
    SampleRateCv,
    AmplitudeCv,
    // Routing
    GateMode,
    BasePitch,
    MidiChannel,
    OutputL,
    OutputLMode,
    OutputR,
    OutputRMode,
}

pub const PARAM_COUNT: usize = 39;

impl ParamId {
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::Pulsaret,
        ParamId::Window,
        ParamId::DutyCycle,
        ParamId::DutyMode,
        ParamId::FormantCount,
        ParamId::Formant1Hz,
        ParamId::Formant2Hz,
        ParamId::Formant3Hz,
        ParamId::MaskMode,
        ParamId::MaskAmount,
        ParamId::BurstOn,
        ParamId::BurstOff,
        ParamId::Attack,
        ParamId::Release,
        ParamId::Amplitude,
        ParamId::Glide,
        ParamId::Pan1,
        ParamId::Pan2,
        ParamId::Pan3,
        ParamId::UseSample,
        ParamId::SampleFolder,
        ParamId::SampleFile,
        ParamId::SampleRate,
        ParamId::PitchCv,
        ParamId::FormantCv,
        ParamId::DutyCv,
        ParamId::MaskCv,
        ParamId::PulsaretCv,
        ParamId::WindowCv,
        ParamId::GlideCv,
        ParamId::SampleRateCv,
        ParamId::AmplitudeCv,
        ParamId::GateMode,
        ParamId::BasePitch,
        ParamId::MidiChannel,
        ParamId::OutputL,
        ParamId::OutputLMode,
        ParamId::OutputR,
        ParamId::OutputRMode,
    ];

    pub fn spec(self) -> ParamSpec {
        use ParamId::*;
        match self {
            Pulsaret => spec("Pulsaret", 0, 90, 0, Unit::None, Scaling::Ten, None),
            Window => spec("Window", 0, 40, 20, Unit::None, Scaling::Ten, None),
            DutyCycle => spec("Duty Cycle", 1, 100, 50, Unit::Percent, Scaling::None, None),
            DutyMode => spec(
                "Duty Mode",
                0,
                1,
                0,
                Unit::Enum,
                Scaling::None,
                Some(DUTY_MODE_STRINGS),
            ),
            FormantCount => spec("Formant Count", 1, 3, 1, Unit::None, Scaling::None, None),
            Formant1Hz => spec("Formant 1 Hz", 20, 8000, 440, Unit::Hz, Scaling::None, None),
            Formant2Hz => spec("Formant 2 Hz", 20, 8000, 880, Unit::Hz, Scaling::None, None),
            Formant3Hz => spec("Formant 3 Hz", 20, 8000, 1320, Unit::Hz, Scaling::None, None),
            MaskMode => spec(
                "Mask Mode",
                0,
                2,
                0,
                Unit::Enum,
                Scaling::None,
                Some(MASK_MODE_STRINGS),
            ),
            MaskAmount => spec("Mask Amount", 0, 100, 50, Unit::Percent, Scaling::None, None),
            BurstOn => spec("Burst On", 1, 16, 4, Unit::None, Scaling::None, None),
            BurstOff => spec("Burst Off", 0, 16, 4, Unit::None, Scaling::None, None),
            Attack => spec("Attack", 1, 20000, 100, Unit::Ms, Scaling::Ten, None),
            Release => spec("Release", 10, 32000, 2000, Unit::Ms, Scaling::Ten, None),
            Amplitude => spec("Amplitude", 0, 100, 80, Unit::Percent, Scaling::None, None),
            Glide => spec("Glide", 0, 20000, 0, Unit::Ms, Scaling::Ten, None),
            Pan1 => spec("Pan 1", -100, 100, 0, Unit::Percent, Scaling::None, None),
            Pan2 => spec("Pan 2", -100, 100, -50, Unit::Percent, Scaling::None, None),
            Pan3 => spec("Pan 3", -100, 100, 50, Unit::Percent, Scaling::None, None),
            UseSample => spec(
                "Use Sample",
                0,
                1,
                0,
                Unit::Enum,
                Scaling::None,
                Some(USE_SAMPLE_STRINGS),
            ),
            SampleFolder => spec("Folder", 0, 32767, 0, Unit::None, Scaling::None, None),
            SampleFile => spec("File", 0, 32767, 0, Unit::None, Scaling::None, None),
            SampleRate => spec("Sample Rate", 25, 400, 100, Unit::Percent, Scaling::None, None),
            PitchCv => spec("Pitch CV", 0, 28, 0, Unit::Bus, Scaling::None, None),
            FormantCv => spec("Formant CV", 0, 28, 0, Unit::Bus, Scaling::None, None),
            DutyCv => spec("Duty CV", 0, 28, 0, Unit::Bus, Scaling::None, None),
            MaskCv => spec("Mask CV", 0, 28, 0, Unit::Bus, Scaling::None, None),
            PulsaretCv => spec("Pulsaret CV", 0, 28, 0, Unit::Bus, Scaling::None, None),
            WindowCv => spec("Window CV", 0, 28, 0, Unit::Bus, Scaling::None, None),
            GlideCv => spec("Glide CV", 0, 28, 0, Unit::Bus, Scaling::None, None),
            SampleRateCv => spec("Sample Rate CV", 0, 28, 0, Unit::Bus, Scaling::None, None),
            AmplitudeCv => spec("Amplitude CV", 0, 28, 0, Unit::Bus, Scaling::None, None),
            GateMode => spec(
                "Gate Mode",
                0,
                1,
                0,
                Unit::Enum,
                Scaling::None,
                Some(GATE_MODE_STRINGS),
            ),
            BasePitch => spec("Base Pitch", 0, 127, 69, Unit::MidiNote, Scaling::None, None),
            MidiChannel => spec("MIDI Ch", 1, 16, 1, Unit::None, Scaling::None, None),
            OutputL => spec("Output L", 1, 28, 13, Unit::Bus, Scaling::None, None),
            OutputLMode => spec(
                "Output L Mode",
                0,
                1,
                0,
                Unit::Enum,
                Scaling::None,
                Some(OUTPUT_MODE_STRINGS),
            ),
            OutputR => spec("Output R", 1, 28, 14, Unit::Bus, Scaling::None, None),
            OutputRMode => spec(
                "Output R Mode",
                0,
                1,
                0,
                Unit::Enum,
                Scaling::None,
                Some(OUTPUT_MODE_STRINGS),
            ),
        }
    }
}

const fn spec(
    name: &'static str,
    min: i16,
    max: i16,
    default: i16,
    unit: Unit,
    scaling: Scaling,
    enum_strings: Option<&'static [&'static str]>,
) -> ParamSpec {
    ParamSpec {
        name,
        min,
        max,
        default,
        unit,
        scaling,
        enum_strings,
    }
}

/// Raw integer values for every parameter.
pub struct ParamStore {
    values: [i16; PARAM_COUNT],
}

impl ParamStore {
    pub fn new() -> Self {
        let mut values = [0i16; PARAM_COUNT];
        for id in ParamId::ALL {
            values[id as usize] = id.spec().default;
        }
        Self { values }
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> i16 {
        self.values[id as usize]
    }

    /// Store a raw value. The host's range contract means no independent
    /// validation happens here.
    #[inline]
    pub fn set(&mut self, id: ParamId, value: i16) {
        self.values[id as usize] = value;
    }

    /// Value with the display scale factor applied.
    pub fn display_value(&self, id: ParamId) -> f32 {
        let raw = self.get(id) as f32;
        match id.spec().scaling {
            Scaling::None => raw,
            Scaling::Ten => raw / 10.0,
        }
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn duty_mode_from_raw(raw: i16) -> DutyMode {
    match raw {
        1 => DutyMode::FormantDerived,
        _ => DutyMode::Manual,
    }
}

pub fn mask_mode_from_raw(raw: i16) -> MaskMode {
    match raw {
        1 => MaskMode::Stochastic,
        2 => MaskMode::Burst,
        _ => MaskMode::Off,
    }
}

pub fn gate_mode_from_raw(raw: i16) -> GateMode {
    match raw {
        1 => GateMode::FreeRun,
        _ => GateMode::Midi,
    }
}

pub fn output_mode_from_raw(raw: i16) -> OutputMode {
    match raw {
        1 => OutputMode::Replace,
        _ => OutputMode::Add,
    }
}
