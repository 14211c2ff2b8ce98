//! Typed element storage behind an [`RVector`](super::RVector).
//!
//! Integer and Double vectors have two concrete representations: the
//! materialized array and a compact arithmetic sequence `{start, stride,
//! len}`. A sequence is always complete and attribute-free at creation;
//! any mutation materializes it first. Guards may key on the concrete
//! representation, so `repr()` must be cheap and stable.

use std::sync::Arc;

use super::{Complex, RVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Raw,
    Logical,
    Integer,
    Double,
    Complex,
    Character,
    List,
}

impl Kind {
    fn rank(self) -> u8 {
        match self {
            Kind::Null => 0,
            Kind::Raw => 1,
            Kind::Logical => 2,
            Kind::Integer => 3,
            Kind::Double => 4,
            Kind::Complex => 5,
            Kind::Character => 6,
            Kind::List => 7,
        }
    }

    /// Result kind for mixed-kind element-wise combination:
    /// Logical < Integer < Double < Complex < Character.
    pub fn promote(self, other: Kind) -> Kind {
        if self.rank() >= other.rank() {
            self
        } else {
            other
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Kind::Logical | Kind::Integer | Kind::Double | Kind::Complex
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "NULL",
            Kind::Raw => "raw",
            Kind::Logical => "logical",
            Kind::Integer => "integer",
            Kind::Double => "double",
            Kind::Complex => "complex",
            Kind::Character => "character",
            Kind::List => "list",
        }
    }
}

/// Concrete representation, distinguishable by guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repr {
    Materialized,
    Sequence,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum VectorData {
    Null,
    Raw(Arc<Vec<u8>>),
    Logical(Arc<Vec<i8>>),
    Int(Arc<Vec<i32>>),
    IntSeq {
        start: i32,
        stride: i32,
        len: usize,
    },
    Double(Arc<Vec<f64>>),
    DoubleSeq {
        start: f64,
        stride: f64,
        len: usize,
    },
    Complex(Arc<Vec<Complex>>),
    Character(Arc<Vec<Option<String>>>),
    List(Arc<Vec<RVector>>),
}

impl VectorData {
    pub(crate) fn kind(&self) -> Kind {
        match self {
            VectorData::Null => Kind::Null,
            VectorData::Raw(_) => Kind::Raw,
            VectorData::Logical(_) => Kind::Logical,
            VectorData::Int(_) | VectorData::IntSeq { .. } => Kind::Integer,
            VectorData::Double(_) | VectorData::DoubleSeq { .. } => Kind::Double,
            VectorData::Complex(_) => Kind::Complex,
            VectorData::Character(_) => Kind::Character,
            VectorData::List(_) => Kind::List,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            VectorData::Null => 0,
            VectorData::Raw(v) => v.len(),
            VectorData::Logical(v) => v.len(),
            VectorData::Int(v) => v.len(),
            VectorData::IntSeq { len, .. } => *len,
            VectorData::Double(v) => v.len(),
            VectorData::DoubleSeq { len, .. } => *len,
            VectorData::Complex(v) => v.len(),
            VectorData::Character(v) => v.len(),
            VectorData::List(v) => v.len(),
        }
    }

    pub(crate) fn repr(&self) -> Repr {
        match self {
            VectorData::IntSeq { .. } | VectorData::DoubleSeq { .. } => Repr::Sequence,
            _ => Repr::Materialized,
        }
    }

    pub(crate) fn int_seq_at(start: i32, stride: i32, i: usize) -> i32 {
        start.wrapping_add(stride.wrapping_mul(i as i32))
    }

    pub(crate) fn double_seq_at(start: f64, stride: f64, i: usize) -> f64 {
        start + stride * i as f64
    }

    /// Rewrite a compact sequence as its materialized array. No-op for
    /// already materialized data.
    pub(crate) fn materialize(&mut self) {
        match *self {
            VectorData::IntSeq { start, stride, len } => {
                let v: Vec<i32> = (0..len).map(|i| Self::int_seq_at(start, stride, i)).collect();
                *self = VectorData::Int(Arc::new(v));
            }
            VectorData::DoubleSeq { start, stride, len } => {
                let v: Vec<f64> = (0..len)
                    .map(|i| Self::double_seq_at(start, stride, i))
                    .collect();
                *self = VectorData::Double(Arc::new(v));
            }
            _ => {}
        }
    }
}
