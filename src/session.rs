//! Run-wide state threaded through every operation: the warning sink and
//! the random number generator. One `Session` corresponds to one
//! interpreter run; call sites are owned separately by their occurrence.

use crate::rng::Xoshiro256StarStar;
use crate::value::{Warning, WarningKind};

pub struct Session {
    warnings: Vec<Warning>,
    pub(crate) rng: Xoshiro256StarStar,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            rng: Xoshiro256StarStar::from_time(),
        }
    }

    /// Reseed the RNG so sampling draws are reproducible.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Xoshiro256StarStar::from_seed(seed);
    }

    pub(crate) fn warn(&mut self, kind: WarningKind, message: &str) {
        self.warnings.push(Warning::new(kind, message));
    }

    /// Accumulated warnings, in emission order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Drain the warning sink, e.g. after reporting at top level.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}
