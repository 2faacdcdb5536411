//! Persisted preset state.
//!
//! Most of the engine's state round-trips through the integer parameter
//! store, which the host serializes itself. The sample selection is the
//! exception: it must survive preset save/load so the host can re-issue
//! the load on restore.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::{ParamId, PulsarEngine};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplePatch {
    pub use_sample: bool,
    pub folder: u16,
    pub file: u16,
}

impl SamplePatch {
    /// Snapshot the engine's current sample selection.
    pub fn capture(engine: &PulsarEngine) -> Self {
        Self {
            use_sample: engine.param(ParamId::UseSample) != 0,
            folder: engine.param(ParamId::SampleFolder).max(0) as u16,
            file: engine.param(ParamId::SampleFile).max(0) as u16,
        }
    }

    /// Restore the selection. Setting the file parameter last re-issues
    /// the sample load when a loader is attached.
    pub fn apply(&self, engine: &mut PulsarEngine) {
        engine.set_param(ParamId::UseSample, self.use_sample as i16);
        engine.set_param(ParamId::SampleFolder, self.folder.min(i16::MAX as u16) as i16);
        engine.set_param(ParamId::SampleFile, self.file.min(i16::MAX as u16) as i16);
    }
}
