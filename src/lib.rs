pub mod dsp;
pub mod engine; // Parameter store, CV mapping, per-block synthesis loop
pub mod io;
pub mod patch; // Persisted preset fields
pub mod sample; // Sample buffer and asynchronous loader handshake

pub use engine::{CvInputs, EngineIo, PulsarEngine};

pub const MAX_BLOCK_SIZE: usize = 2048;
