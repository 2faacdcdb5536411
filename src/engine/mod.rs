/*
Pulsar Engine
=============

One monophonic pulsar-synthesis voice with a stereo output. The signal
path per sample:

  master phase (glide, pitch CV)
    → pulse trigger on wrap → mask decision, shared across formants
    → per formant: duty gate, pulsaret (table morph or sample) × window
    → constant-power pan, sum, normalize by formant count
    → ASR envelope × amplitude × velocity × amplitude CV
    → DC blocker → soft clip → output (add or replace)

Control flow is split by rate. Parameter changes convert raw integers to
cached working values (and derived coefficients) the moment they arrive,
never mid-block. CV inputs except pitch are averaged per block; pitch is
read per sample because it drives phase accumulation directly. Note
messages are drained at block boundaries.

`process_block` allocates nothing and takes bounded time, so it is safe
on the audio thread.
*/

pub mod cv;
pub mod formant;
pub mod message;
pub mod params;

pub use cv::{BlockCv, CvInputs};
pub use message::{EngineMessage, MessageReceiver};
pub use params::{DutyMode, GateMode, OutputMode, ParamId, ParamStore};

use crate::dsp::approx::{coeff_from_ms, fast_exp2, fast_tanh};
use crate::dsp::dc_blocker::DcBlocker;
use crate::dsp::mask::MaskGenerator;
use crate::dsp::oscillator::MasterOscillator;
use crate::dsp::tables::{NUM_PULSARETS, NUM_WINDOWS};
use crate::dsp::{AsrEnvelope, MaskMode, TableBank};
use crate::sample::SampleBank;

#[cfg(feature = "rtrb")]
use crate::sample::loader::{LoadRequest, LoaderClient};

use formant::FormantVoice;
use params::{
    duty_mode_from_raw, gate_mode_from_raw, mask_mode_from_raw, output_mode_from_raw,
};

pub const MAX_FORMANTS: usize = 3;

/// Time constant for de-clicking mask transitions.
const MASK_SMOOTH_MS: f32 = 3.0;

/// Output and CV buses for one block. The host resolves its bus routing
/// to slices; both outputs must be the same length, and every connected
/// CV bus must cover at least that many samples.
pub struct EngineIo<'a> {
    pub out_l: &'a mut [f32],
    pub out_r: &'a mut [f32],
    pub cv: CvInputs<'a>,
}

pub struct PulsarEngine {
    sample_rate: f32,
    tables: TableBank,
    oscillator: MasterOscillator,
    mask: MaskGenerator,
    formants: [FormantVoice; MAX_FORMANTS],
    envelope: AsrEnvelope,
    dc_l: DcBlocker,
    dc_r: DcBlocker,
    sample: SampleBank,
    #[cfg(feature = "rtrb")]
    loader: Option<LoaderClient>,
    params: ParamStore,

    // Cached working values, refreshed in set_param
    pulsaret_index: f32,
    window_index: f32,
    duty_cycle: f32,
    duty_mode: DutyMode,
    formant_count: usize,
    mask_mode: MaskMode,
    mask_amount: f32,
    burst_on: u32,
    burst_off: u32,
    amplitude: f32,
    glide_ms: f32,
    use_sample: bool,
    sample_rate_ratio: f32,
    gate_mode: GateMode,
    base_pitch_hz: f32,
    output_l_mode: OutputMode,
    output_r_mode: OutputMode,
    mask_smooth_coeff: f32,

    current_note: u8,
    velocity: u8,
}

impl PulsarEngine {
    pub fn new(sample_rate: f32) -> Self {
        let mut engine = Self {
            sample_rate,
            tables: TableBank::new(),
            oscillator: MasterOscillator::new(sample_rate),
            mask: MaskGenerator::new(),
            formants: [
                FormantVoice::new(440.0, 0.0),
                FormantVoice::new(880.0, -0.5),
                FormantVoice::new(1320.0, 0.5),
            ],
            envelope: AsrEnvelope::new(10.0, 200.0, sample_rate),
            dc_l: DcBlocker::new(sample_rate),
            dc_r: DcBlocker::new(sample_rate),
            sample: SampleBank::new(),
            #[cfg(feature = "rtrb")]
            loader: None,
            params: ParamStore::new(),
            pulsaret_index: 0.0,
            window_index: 2.0,
            duty_cycle: 0.5,
            duty_mode: DutyMode::Manual,
            formant_count: 1,
            mask_mode: MaskMode::Off,
            mask_amount: 0.5,
            burst_on: 4,
            burst_off: 4,
            amplitude: 0.8,
            glide_ms: 0.0,
            use_sample: false,
            sample_rate_ratio: 1.0,
            gate_mode: GateMode::Midi,
            base_pitch_hz: 440.0,
            output_l_mode: OutputMode::Add,
            output_r_mode: OutputMode::Add,
            mask_smooth_coeff: coeff_from_ms(MASK_SMOOTH_MS, sample_rate),
            current_note: 0,
            velocity: 0,
        };
        // Derive every cached value from the parameter defaults
        for id in ParamId::ALL {
            engine.apply_param(id);
        }
        engine
    }

    /// Store a new raw parameter value and refresh the derived state.
    /// Values are assumed pre-clamped to the parameter's range.
    pub fn set_param(&mut self, id: ParamId, raw: i16) {
        self.params.set(id, raw);
        self.apply_param(id);
    }

    #[inline]
    pub fn param(&self, id: ParamId) -> i16 {
        self.params.get(id)
    }

    fn apply_param(&mut self, id: ParamId) {
        let raw = self.params.get(id);
        match id {
            ParamId::Pulsaret => self.pulsaret_index = raw as f32 / 10.0,
            ParamId::Window => self.window_index = raw as f32 / 10.0,
            ParamId::DutyCycle => self.duty_cycle = raw as f32 / 100.0,
            ParamId::DutyMode => self.duty_mode = duty_mode_from_raw(raw),
            ParamId::FormantCount => {
                self.formant_count = (raw.clamp(1, MAX_FORMANTS as i16)) as usize;
            }
            ParamId::Formant1Hz => self.formants[0].frequency_hz = raw as f32,
            ParamId::Formant2Hz => self.formants[1].frequency_hz = raw as f32,
            ParamId::Formant3Hz => self.formants[2].frequency_hz = raw as f32,
            ParamId::MaskMode => self.mask_mode = mask_mode_from_raw(raw),
            ParamId::MaskAmount => self.mask_amount = raw as f32 / 100.0,
            ParamId::BurstOn => self.burst_on = raw.max(0) as u32,
            ParamId::BurstOff => self.burst_off = raw.max(0) as u32,
            ParamId::Attack => {
                self.envelope.set_attack_ms(raw as f32 / 10.0, self.sample_rate);
            }
            ParamId::Release => {
                self.envelope.set_release_ms(raw as f32 / 10.0, self.sample_rate);
            }
            ParamId::Amplitude => self.amplitude = raw as f32 / 100.0,
            ParamId::Glide => {
                self.glide_ms = raw as f32 / 10.0;
                self.oscillator.set_glide_ms(self.glide_ms, self.sample_rate);
            }
            ParamId::Pan1 => {
                self.formants[0].pan = raw as f32 / 100.0;
                self.formants[0].update_pan();
            }
            ParamId::Pan2 => {
                self.formants[1].pan = raw as f32 / 100.0;
                self.formants[1].update_pan();
            }
            ParamId::Pan3 => {
                self.formants[2].pan = raw as f32 / 100.0;
                self.formants[2].update_pan();
            }
            ParamId::UseSample => self.use_sample = raw != 0,
            ParamId::SampleFolder => {}
            ParamId::SampleFile => {
                #[cfg(feature = "rtrb")]
                self.request_sample_load();
            }
            ParamId::SampleRate => self.sample_rate_ratio = raw as f32 / 100.0,
            ParamId::GateMode => {
                self.gate_mode = gate_mode_from_raw(raw);
                match self.gate_mode {
                    GateMode::FreeRun => {
                        self.envelope.gate_on();
                        self.velocity = 127;
                        self.oscillator
                            .set_target_hz(self.base_pitch_hz, self.glide_ms <= 0.0);
                    }
                    GateMode::Midi => self.envelope.gate_off(),
                }
            }
            ParamId::BasePitch => {
                self.base_pitch_hz = note_to_hz(raw as u8);
                if self.gate_mode == GateMode::FreeRun {
                    self.oscillator
                        .set_target_hz(self.base_pitch_hz, self.glide_ms <= 0.0);
                }
            }
            ParamId::OutputLMode => self.output_l_mode = output_mode_from_raw(raw),
            ParamId::OutputRMode => self.output_r_mode = output_mode_from_raw(raw),
            // Bus selectors and the MIDI channel are host-side routing
            ParamId::PitchCv
            | ParamId::FormantCv
            | ParamId::DutyCv
            | ParamId::MaskCv
            | ParamId::PulsaretCv
            | ParamId::WindowCv
            | ParamId::GlideCv
            | ParamId::SampleRateCv
            | ParamId::AmplitudeCv
            | ParamId::MidiChannel
            | ParamId::OutputL
            | ParamId::OutputR => {}
        }
    }

    /// Begin a note. Velocity 0 is treated as a note off, per convention.
    /// Ignored in free-run mode, where the gate is parameter-driven.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        if self.gate_mode == GateMode::FreeRun {
            return;
        }
        if velocity == 0 {
            self.note_off(note);
            return;
        }
        self.current_note = note;
        self.velocity = velocity;
        self.envelope.gate_on();
        self.oscillator
            .set_target_hz(note_to_hz(note), self.glide_ms <= 0.0);
    }

    /// Release the gate, but only for the most recent note: a stale note
    /// off after a legato retrigger must not cut the new note.
    pub fn note_off(&mut self, note: u8) {
        if self.gate_mode == GateMode::FreeRun {
            return;
        }
        if note == self.current_note {
            self.envelope.gate_off();
        }
    }

    pub fn all_notes_off(&mut self) {
        if self.gate_mode != GateMode::FreeRun {
            self.envelope.gate_off();
        }
    }

    /// Drain pending control messages. Call once per block, before
    /// [`Self::process_block`].
    pub fn drain_messages<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(msg) = rx.pop() {
            match msg {
                EngineMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
                EngineMessage::NoteOff { note } => self.note_off(note),
                EngineMessage::AllNotesOff => self.all_notes_off(),
            }
        }
    }

    /// Attach the loader endpoints created by
    /// [`crate::sample::loader::loader_channel`].
    #[cfg(feature = "rtrb")]
    pub fn set_loader(&mut self, client: LoaderClient) {
        self.loader = Some(client);
    }

    /// Collect a finished sample load, if one came back. Cheap; call once
    /// per block.
    #[cfg(feature = "rtrb")]
    pub fn poll_loader(&mut self) {
        if let Some(loader) = self.loader.as_mut() {
            if let Some(result) = loader.poll() {
                self.sample.finish_load(result.buffer, result.frames_loaded);
            }
        }
    }

    /// Ship the sample buffer to the loader for the currently selected
    /// folder/file. Silently dropped while a load is already in flight.
    #[cfg(feature = "rtrb")]
    fn request_sample_load(&mut self) {
        if !self.use_sample {
            return;
        }
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        let Some(buffer) = self.sample.begin_load() else {
            return;
        };
        let request = LoadRequest {
            folder: self.params.get(ParamId::SampleFolder).max(0) as u16,
            file: self.params.get(ParamId::SampleFile).max(0) as u16,
            buffer,
        };
        if let Err(buffer) = loader.request(request) {
            self.sample.cancel_load(buffer);
        }
    }

    /// Render one block into `io`.
    pub fn process_block(&mut self, io: &mut EngineIo) {
        let block_len = io.out_l.len();
        debug_assert_eq!(block_len, io.out_r.len());
        debug_assert!(block_len <= crate::MAX_BLOCK_SIZE);
        if block_len == 0 {
            return;
        }

        // Free-run safety net: the gate must never be observed closed
        if self.gate_mode == GateMode::FreeRun {
            if !self.envelope.gate() {
                self.envelope.gate_on();
            }
            if self.velocity == 0 {
                self.velocity = 127;
            }
        }

        let cv = BlockCv::measure(&io.cv);

        let pulsaret_idx =
            (self.pulsaret_index + cv.pulsaret_offset).clamp(0.0, (NUM_PULSARETS - 1) as f32);
        let window_idx =
            (self.window_index + cv.window_offset).clamp(0.0, (NUM_WINDOWS - 1) as f32);

        if let Some(glide_ms) = cv.glide_ms {
            self.oscillator
                .set_glide_coeff(coeff_from_ms(glide_ms, self.sample_rate));
        }

        let rate_ratio = (self.sample_rate_ratio + cv.sample_rate_offset).clamp(0.25, 4.0);

        // Block-rate formant state: duty, pan gains
        let count = self.formant_count;
        let fundamental = self.oscillator.fundamental_hz();
        for voice in &mut self.formants[..count] {
            let duty = match self.duty_mode {
                DutyMode::FormantDerived if fundamental > 0.0 => {
                    // Duty tracks pitch so every formant keeps its bandwidth
                    let f_hz = (voice.frequency_hz * cv.formant_mul).max(20.0);
                    (fundamental / f_hz).min(1.0)
                }
                _ => self.duty_cycle + cv.duty_offset,
            };
            voice.set_duty(duty);
            voice.update_pan();
        }

        // Without pitch CV the fundamental moves only by glide, slowly
        // enough that the formant ratio can be fixed for the block.
        let has_pitch_cv = io.cv.pitch.is_some();
        let mut ratio_precomp = [0.0f32; MAX_FORMANTS];
        if !has_pitch_cv {
            let inv_fund = 1.0 / fundamental.max(0.1);
            for (ratio, voice) in ratio_precomp.iter_mut().zip(&self.formants[..count]) {
                *ratio = voice.frequency_hz * cv.formant_mul * inv_fund;
            }
        }

        let inv_count = 1.0 / count as f32;
        let vel_gain = self.velocity as f32 * (1.0 / 127.0);
        let loaded = self.sample.loaded_frames();
        let sample_source = self.use_sample && loaded >= 2;
        let mask_amount = cv.mask_amount.unwrap_or(self.mask_amount);

        for i in 0..block_len {
            let pitch_mul = match io.cv.pitch {
                Some(bus) => fast_exp2(bus[i]),
                None => 1.0,
            };
            let (phase, new_pulse) = self.oscillator.tick(pitch_mul);

            // One mask decision per cycle, shared by every formant
            if new_pulse && self.mask_mode != MaskMode::Off {
                let gain =
                    self.mask
                        .decide(self.mask_mode, mask_amount, self.burst_on, self.burst_off);
                for voice in &mut self.formants[..count] {
                    voice.mask_target = gain;
                }
            }
            for voice in &mut self.formants[..count] {
                voice.smooth_mask(self.mask_smooth_coeff);
            }

            let fund_now = self.oscillator.fundamental_hz();
            let mut sum_l = 0.0;
            let mut sum_r = 0.0;
            for (f, voice) in self.formants[..count].iter().enumerate() {
                // The pulsaret only sounds for the duty fraction of the
                // cycle; the rest is silence between particles.
                if phase < voice.duty {
                    let pulsaret_phase = phase * voice.inv_duty;

                    let sample = if sample_source {
                        let pos = pulsaret_phase * (loaded - 1) as f32 * rate_ratio;
                        self.sample.read(pos)
                    } else {
                        let ratio = if has_pitch_cv {
                            voice.frequency_hz * cv.formant_mul / fund_now.max(0.1)
                        } else {
                            ratio_precomp[f]
                        };
                        let mut table_phase = pulsaret_phase * ratio;
                        table_phase -= table_phase.floor();
                        self.tables.pulsaret(pulsaret_idx, table_phase)
                    };

                    let window = self.tables.window(window_idx, pulsaret_phase);
                    let s = sample * window * voice.mask_gain;
                    sum_l += s * voice.gain_l;
                    sum_r += s * voice.gain_r;
                }
            }

            sum_l *= inv_count;
            sum_r *= inv_count;

            let gain = self.envelope.next_sample() * self.amplitude * vel_gain * cv.amp_mul;
            sum_l *= gain;
            sum_r *= gain;

            let l = fast_tanh(self.dc_l.process(sum_l));
            let r = fast_tanh(self.dc_r.process(sum_r));

            match self.output_l_mode {
                OutputMode::Add => io.out_l[i] += l,
                OutputMode::Replace => io.out_l[i] = l,
            }
            match self.output_r_mode {
                OutputMode::Add => io.out_r[i] += r,
                OutputMode::Replace => io.out_r[i] = r,
            }
        }
    }

    // Read-only state for displays and tests

    #[inline]
    pub fn fundamental_hz(&self) -> f32 {
        self.oscillator.fundamental_hz()
    }

    #[inline]
    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    #[inline]
    pub fn gate(&self) -> bool {
        self.envelope.gate()
    }

    #[inline]
    pub fn current_note(&self) -> u8 {
        self.current_note
    }

    #[inline]
    pub fn sample_frames_loaded(&self) -> usize {
        self.sample.loaded_frames()
    }
}

/// Equal-tempered A440 note-to-frequency conversion.
#[inline]
pub fn note_to_hz(note: u8) -> f32 {
    440.0 * ((note as f32 - 69.0) / 12.0).exp2()
}
