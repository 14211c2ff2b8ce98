//! The vector value model: a uniform element container with a kind, a
//! length, a completeness flag and an optional attribute table.
//!
//! Vectors are logically immutable. Cloning is cheap (element storage is
//! `Arc`-shared); any mutation goes through `Arc::make_mut`, so an aliased
//! payload is copied first and a uniquely owned one is updated in place.
//! The `complete` flag is optimistic: `true` means no missing element has
//! been observed. It may be pessimistically cleared, never incorrectly left
//! `true`.

use std::sync::Arc;

mod access;
mod attrib;
mod data;
mod display;
mod error;
pub mod na;

pub use attrib::AttrTable;
pub use data::{Kind, Repr};
pub use error::{ErrorCode, RuntimeError, Warning, WarningKind};

pub(crate) use data::VectorData;
pub(crate) use error::{MSG_INTEGER_OVERFLOW, MSG_INVALID_CODE_POINT, MSG_RECYCLE_FRINGE};

use crate::symbol::Symbol;
use na::{is_na_complex, is_na_double, is_na_int, is_na_logical};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

/// One element lifted out of (or written into) a vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Raw(u8),
    Logical(i8),
    Int(i32),
    Double(f64),
    Complex(Complex),
    Character(Option<String>),
    Vector(RVector),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RVector {
    data: VectorData,
    complete: bool,
    attrs: Option<Arc<AttrTable>>,
}

impl RVector {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn null() -> Self {
        Self {
            data: VectorData::Null,
            complete: true,
            attrs: None,
        }
    }

    /// Allocate a vector of `len` elements of the kind's zero value.
    pub fn alloc(kind: Kind, len: usize, complete: bool) -> Self {
        let data = match kind {
            Kind::Null => VectorData::Null,
            Kind::Raw => VectorData::Raw(Arc::new(vec![0; len])),
            Kind::Logical => VectorData::Logical(Arc::new(vec![na::LOGICAL_FALSE; len])),
            Kind::Integer => VectorData::Int(Arc::new(vec![0; len])),
            Kind::Double => VectorData::Double(Arc::new(vec![0.0; len])),
            Kind::Complex => VectorData::Complex(Arc::new(vec![Complex::new(0.0, 0.0); len])),
            Kind::Character => VectorData::Character(Arc::new(vec![Some(String::new()); len])),
            Kind::List => VectorData::List(Arc::new(vec![RVector::null(); len])),
        };
        Self {
            data,
            complete,
            attrs: None,
        }
    }

    /// Allocate a vector of `len` missing elements. Raw has no missing
    /// sentinel and fills with zero instead.
    pub fn alloc_na(kind: Kind, len: usize) -> Self {
        let data = match kind {
            Kind::Null => VectorData::Null,
            Kind::Raw => VectorData::Raw(Arc::new(vec![0; len])),
            Kind::Logical => VectorData::Logical(Arc::new(vec![na::LOGICAL_NA; len])),
            Kind::Integer => VectorData::Int(Arc::new(vec![na::INT_NA; len])),
            Kind::Double => VectorData::Double(Arc::new(vec![na::double_na(); len])),
            Kind::Complex => VectorData::Complex(Arc::new(vec![na::complex_na(); len])),
            Kind::Character => VectorData::Character(Arc::new(vec![None; len])),
            Kind::List => VectorData::List(Arc::new(vec![RVector::null(); len])),
        };
        Self {
            data,
            complete: len == 0 || matches!(kind, Kind::Raw | Kind::Null),
            attrs: None,
        }
    }

    pub fn int(data: Vec<i32>, complete: bool) -> Self {
        Self {
            data: VectorData::Int(Arc::new(data)),
            complete,
            attrs: None,
        }
    }

    pub fn double(data: Vec<f64>, complete: bool) -> Self {
        Self {
            data: VectorData::Double(Arc::new(data)),
            complete,
            attrs: None,
        }
    }

    pub fn logical(data: Vec<i8>, complete: bool) -> Self {
        Self {
            data: VectorData::Logical(Arc::new(data)),
            complete,
            attrs: None,
        }
    }

    pub fn complex(data: Vec<Complex>, complete: bool) -> Self {
        Self {
            data: VectorData::Complex(Arc::new(data)),
            complete,
            attrs: None,
        }
    }

    pub fn character(data: Vec<Option<String>>, complete: bool) -> Self {
        Self {
            data: VectorData::Character(Arc::new(data)),
            complete,
            attrs: None,
        }
    }

    pub fn raw(data: Vec<u8>) -> Self {
        Self {
            data: VectorData::Raw(Arc::new(data)),
            complete: true,
            attrs: None,
        }
    }

    pub fn list(data: Vec<RVector>) -> Self {
        Self {
            data: VectorData::List(Arc::new(data)),
            complete: true,
            attrs: None,
        }
    }

    /// Build with a scan for missing elements instead of a caller-supplied flag.
    pub fn from_ints(data: Vec<i32>) -> Self {
        let complete = !data.iter().any(|&x| is_na_int(x));
        Self::int(data, complete)
    }

    pub fn from_doubles(data: Vec<f64>) -> Self {
        let complete = !data.iter().any(|&x| is_na_double(x));
        Self::double(data, complete)
    }

    pub fn from_logicals(data: Vec<i8>) -> Self {
        let complete = !data.iter().any(|&x| is_na_logical(x));
        Self::logical(data, complete)
    }

    pub fn from_bools(data: Vec<bool>) -> Self {
        Self::logical(data.into_iter().map(na::logical_from_bool).collect(), true)
    }

    pub fn from_complexes(data: Vec<Complex>) -> Self {
        let complete = !data.iter().any(|&x| is_na_complex(x));
        Self::complex(data, complete)
    }

    pub fn from_strings(data: Vec<Option<String>>) -> Self {
        let complete = !data.iter().any(|x| x.is_none());
        Self::character(data, complete)
    }

    pub fn scalar_int(x: i32) -> Self {
        Self::int(vec![x], !is_na_int(x))
    }

    pub fn scalar_double(x: f64) -> Self {
        Self::double(vec![x], !is_na_double(x))
    }

    pub fn scalar_logical(b: bool) -> Self {
        Self::logical(vec![na::logical_from_bool(b)], true)
    }

    pub fn logical_na() -> Self {
        Self::logical(vec![na::LOGICAL_NA], false)
    }

    pub fn scalar_string(s: impl Into<String>) -> Self {
        Self::character(vec![Some(s.into())], true)
    }

    /// Compact arithmetic sequence `start, start+stride, ...` of `len`
    /// elements. Always complete and attribute-free at creation.
    pub fn int_seq(start: i32, stride: i32, len: usize) -> Self {
        Self {
            data: VectorData::IntSeq { start, stride, len },
            complete: true,
            attrs: None,
        }
    }

    pub fn double_seq(start: f64, stride: f64, len: usize) -> Self {
        Self {
            data: VectorData::DoubleSeq { start, stride, len },
            complete: true,
            attrs: None,
        }
    }

    /// `1..=n` as a compact Integer sequence.
    pub fn iota(n: usize) -> Self {
        Self::int_seq(1, 1, n)
    }

    // ── Structure ────────────────────────────────────────────────────

    pub fn kind(&self) -> Kind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_scalar(&self) -> bool {
        self.len() == 1
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn repr(&self) -> Repr {
        self.data.repr()
    }

    pub(crate) fn data(&self) -> &VectorData {
        &self.data
    }

    /// Pessimistically clear or restore the completeness flag. The caller
    /// is responsible for never setting `true` on a vector that holds a
    /// missing element.
    pub(crate) fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    // ── Element access ───────────────────────────────────────────────

    fn check_bounds(&self, i: usize) -> Result<(), RuntimeError> {
        if i >= self.len() {
            Err(RuntimeError::index(i, self.len()))
        } else {
            Ok(())
        }
    }

    pub fn get(&self, i: usize) -> Result<Scalar, RuntimeError> {
        self.check_bounds(i)?;
        Ok(match &self.data {
            VectorData::Null => unreachable!("Null has length 0"),
            VectorData::Raw(v) => Scalar::Raw(v[i]),
            VectorData::Logical(v) => Scalar::Logical(v[i]),
            VectorData::Int(v) => Scalar::Int(v[i]),
            VectorData::IntSeq { start, stride, .. } => {
                Scalar::Int(VectorData::int_seq_at(*start, *stride, i))
            }
            VectorData::Double(v) => Scalar::Double(v[i]),
            VectorData::DoubleSeq { start, stride, .. } => {
                Scalar::Double(VectorData::double_seq_at(*start, *stride, i))
            }
            VectorData::Complex(v) => Scalar::Complex(v[i]),
            VectorData::Character(v) => Scalar::Character(v[i].clone()),
            VectorData::List(v) => Scalar::Vector(v[i].clone()),
        })
    }

    /// Bounds-checked element write. Copies the payload first when it is
    /// aliased; a compact sequence is materialized. Writing a missing
    /// element clears `complete`.
    pub fn set(&mut self, i: usize, value: Scalar) -> Result<(), RuntimeError> {
        self.check_bounds(i)?;
        self.data.materialize();
        match (&mut self.data, value) {
            (VectorData::Raw(v), Scalar::Raw(x)) => {
                Arc::make_mut(v)[i] = x;
            }
            (VectorData::Logical(v), Scalar::Logical(x)) => {
                Arc::make_mut(v)[i] = x;
                if is_na_logical(x) {
                    self.complete = false;
                }
            }
            (VectorData::Int(v), Scalar::Int(x)) => {
                Arc::make_mut(v)[i] = x;
                if is_na_int(x) {
                    self.complete = false;
                }
            }
            (VectorData::Double(v), Scalar::Double(x)) => {
                Arc::make_mut(v)[i] = x;
                if is_na_double(x) {
                    self.complete = false;
                }
            }
            (VectorData::Complex(v), Scalar::Complex(x)) => {
                Arc::make_mut(v)[i] = x;
                if is_na_complex(x) {
                    self.complete = false;
                }
            }
            (VectorData::Character(v), Scalar::Character(x)) => {
                let missing = x.is_none();
                Arc::make_mut(v)[i] = x;
                if missing {
                    self.complete = false;
                }
            }
            (VectorData::List(v), Scalar::Vector(x)) => {
                Arc::make_mut(v)[i] = x;
            }
            (data, value) => {
                return Err(RuntimeError::argument(format!(
                    "cannot store {:?} in a {} vector",
                    value,
                    data.kind().name()
                )));
            }
        }
        Ok(())
    }

    // ── Attributes ───────────────────────────────────────────────────

    pub fn attrs(&self) -> Option<&AttrTable> {
        self.attrs.as_deref()
    }

    pub fn has_attributes(&self) -> bool {
        self.attrs.as_ref().map_or(false, |t| !t.is_empty())
    }

    pub fn attr(&self, name: Symbol) -> Option<&RVector> {
        self.attrs.as_deref().and_then(|t| t.get(name))
    }

    pub fn names(&self) -> Option<&RVector> {
        self.attr(crate::symbol::sym_names())
    }

    /// Unvalidated attribute write. The attribute-update operation layers
    /// names/dim validation on top of this.
    pub(crate) fn set_attr_raw(&mut self, name: Symbol, value: RVector) {
        match &mut self.attrs {
            Some(table) => Arc::make_mut(table).set(name, value),
            None => {
                let mut table = AttrTable::new();
                table.set(name, value);
                self.attrs = Some(Arc::new(table));
            }
        }
    }

    pub(crate) fn remove_attr(&mut self, name: Symbol) {
        if let Some(table) = &mut self.attrs {
            Arc::make_mut(table).remove(name);
            if table.is_empty() {
                self.attrs = None;
            }
        }
    }

    pub(crate) fn copy_attrs_of(&mut self, source: &RVector) {
        self.attrs = source.attrs.clone();
    }

    /// Copy the listed attribute entries from `source` by value. Entries
    /// absent on the source are skipped.
    pub fn with_attributes_from(mut self, source: &RVector, keys: &[Symbol]) -> RVector {
        for &key in keys {
            if let Some(value) = source.attr(key) {
                self.set_attr_raw(key, value.clone());
            }
        }
        self
    }

    /// Attribute-free copy. Cheap: the element payload stays shared.
    pub fn drop_attributes(&self) -> RVector {
        RVector {
            data: self.data.clone(),
            complete: self.complete,
            attrs: None,
        }
    }

    // ── Comparison ───────────────────────────────────────────────────

    /// Structural equality of data, completeness flag and attributes.
    /// Double elements compare by bit pattern, so NA == NA and 0.0 != -0.0;
    /// this is what the cache-transparency contract needs.
    pub fn identical(&self, other: &RVector) -> bool {
        if self.kind() != other.kind()
            || self.len() != other.len()
            || self.complete != other.complete
        {
            return false;
        }
        for i in 0..self.len() {
            let same = match (self.get(i), other.get(i)) {
                (Ok(Scalar::Double(a)), Ok(Scalar::Double(b))) => a.to_bits() == b.to_bits(),
                (Ok(Scalar::Complex(a)), Ok(Scalar::Complex(b))) => {
                    a.re.to_bits() == b.re.to_bits() && a.im.to_bits() == b.im.to_bits()
                }
                (Ok(Scalar::Vector(a)), Ok(Scalar::Vector(b))) => a.identical(&b),
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            };
            if !same {
                return false;
            }
        }
        let empty = AttrTable::new();
        let mine = self.attrs().unwrap_or(&empty);
        let theirs = other.attrs().unwrap_or(&empty);
        if mine.len() != theirs.len() {
            return false;
        }
        let same_attrs = mine.iter().all(|(sym, v)| {
            theirs.get(sym).map_or(false, |w| v.identical(w))
        });
        same_attrs
    }
}
