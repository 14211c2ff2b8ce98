//! The recycling engine: one output-length rule and one index-wrap rule
//! shared by essentially every element-wise operation.
//!
//! `out_len` is 0 if any input is empty, otherwise the maximum input
//! length. `index(k, i) = i mod lengths[k]`. When the longest length is
//! not a multiple of some shorter (non-scalar) length, the combination has
//! a fringe and the operation emits one warning per call.

use crate::session::Session;
use crate::trace::trace_log;
use crate::value::{WarningKind, MSG_RECYCLE_FRINGE};

#[derive(Debug, Clone)]
pub struct RecyclePlan {
    lengths: Vec<usize>,
    out_len: usize,
    fringe: bool,
}

impl RecyclePlan {
    pub fn new(lengths: &[usize]) -> Self {
        let out_len = if lengths.iter().any(|&n| n == 0) {
            0
        } else {
            lengths.iter().copied().max().unwrap_or(0)
        };
        let fringe = out_len > 0
            && lengths
                .iter()
                .any(|&n| n > 1 && out_len % n != 0);
        if fringe {
            trace_log!("recycle", "fringe combining lengths {:?}", lengths);
        }
        Self {
            lengths: lengths.to_vec(),
            out_len,
            fringe,
        }
    }

    pub fn out_len(&self) -> usize {
        self.out_len
    }

    /// Wrapped index into input `k` for output position `i`.
    pub fn index(&self, k: usize, i: usize) -> usize {
        i % self.lengths[k]
    }

    pub fn has_fringe(&self) -> bool {
        self.fringe
    }

    /// Emit the fringe warning, once. Callers invoke this once per call,
    /// not per element.
    pub fn warn_fringe(&self, session: &mut Session) {
        if self.fringe {
            session.warn(WarningKind::RecycleLength, MSG_RECYCLE_FRINGE);
        }
    }
}

/// Step `j` forward through a vector of length `len`, wrapping at the end.
/// Cheaper than a modulo in the inner loops that walk one input linearly.
#[inline]
pub(crate) fn inc_mod(j: usize, len: usize) -> usize {
    let j = j + 1;
    if j == len {
        0
    } else {
        j
    }
}
