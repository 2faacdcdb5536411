//! Low-level DSP primitives used by the pulsar engine.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! run inside the host's audio callback. They intentionally stay focused on
//! the signal-processing math so the engine layer can handle parameters,
//! CV routing, and orchestration.

/// Fast numeric approximations and one-pole coefficient math.
pub mod approx;
/// Single-pole DC-blocking highpass filter.
pub mod dc_blocker;
/// One-pole attack/sustain/release envelope.
pub mod envelope;
/// Per-cycle mask decision generator (stochastic and burst).
pub mod mask;
/// Master phase accumulator with glide and pulse triggers.
pub mod oscillator;
/// Pulsaret and window lookup tables with morphing.
pub mod tables;

pub use envelope::AsrEnvelope;
pub use mask::MaskMode;
pub use tables::TableBank;
