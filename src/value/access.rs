//! Generic element accessors: get-as-int/double/complex/string plus
//! is-missing, defined for every kind combination the promotion order
//! allows. This single interface is the body of every `Generalized`
//! fallback loop; specialized fast paths bypass it with direct typed
//! access.
//!
//! All `*_at` methods assume the index is in range (the caller has a
//! recycling plan that guarantees it) and only debug-assert.

use num_traits::ToPrimitive;

use super::data::VectorData;
use super::na::{
    self, int_to_double, is_na_complex, is_na_double, is_na_int, is_na_logical,
    logical_to_double, logical_to_int, INT_NA,
};
use super::{Complex, RVector};

impl RVector {
    /// Missing predicate for the element at `i`, per the vector's own kind.
    /// Raw and List have no missing sentinel and always return `false`.
    pub fn is_na_at(&self, i: usize) -> bool {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Null => false,
            VectorData::Raw(_) => false,
            VectorData::Logical(v) => is_na_logical(v[i]),
            VectorData::Int(v) => is_na_int(v[i]),
            VectorData::IntSeq { .. } => false,
            VectorData::Double(v) => is_na_double(v[i]),
            VectorData::DoubleSeq { .. } => false,
            VectorData::Complex(v) => is_na_complex(v[i]),
            VectorData::Character(v) => v[i].is_none(),
            VectorData::List(_) => false,
        }
    }

    // ── Same-kind typed access ───────────────────────────────────────

    pub fn int_at(&self, i: usize) -> i32 {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Int(v) => v[i],
            VectorData::IntSeq { start, stride, .. } => {
                VectorData::int_seq_at(*start, *stride, i)
            }
            _ => panic!("int_at on a {} vector", self.kind().name()),
        }
    }

    pub fn double_at(&self, i: usize) -> f64 {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Double(v) => v[i],
            VectorData::DoubleSeq { start, stride, .. } => {
                VectorData::double_seq_at(*start, *stride, i)
            }
            _ => panic!("double_at on a {} vector", self.kind().name()),
        }
    }

    pub fn logical_at(&self, i: usize) -> i8 {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Logical(v) => v[i],
            _ => panic!("logical_at on a {} vector", self.kind().name()),
        }
    }

    pub fn complex_at(&self, i: usize) -> Complex {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Complex(v) => v[i],
            _ => panic!("complex_at on a {} vector", self.kind().name()),
        }
    }

    pub fn raw_at(&self, i: usize) -> u8 {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Raw(v) => v[i],
            _ => panic!("raw_at on a {} vector", self.kind().name()),
        }
    }

    pub fn string_at(&self, i: usize) -> Option<&str> {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Character(v) => v[i].as_deref(),
            _ => panic!("string_at on a {} vector", self.kind().name()),
        }
    }

    // ── Converting access (NA maps to NA) ────────────────────────────

    /// Element as Integer: Logical widens 0/1, Double narrows when the
    /// value is integral and representable, NA otherwise.
    pub fn as_int_at(&self, i: usize) -> i32 {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Logical(v) => logical_to_int(v[i]),
            VectorData::Int(_) | VectorData::IntSeq { .. } => self.int_at(i),
            VectorData::Double(_) | VectorData::DoubleSeq { .. } => {
                let x = self.double_at(i);
                if na::is_na_or_nan(x) {
                    return INT_NA;
                }
                match x.to_i32() {
                    Some(n) if n as f64 == x && n != INT_NA => n,
                    _ => INT_NA,
                }
            }
            _ => panic!("as_int_at on a {} vector", self.kind().name()),
        }
    }

    pub fn as_double_at(&self, i: usize) -> f64 {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Logical(v) => logical_to_double(v[i]),
            VectorData::Int(_) | VectorData::IntSeq { .. } => int_to_double(self.int_at(i)),
            VectorData::Double(_) | VectorData::DoubleSeq { .. } => self.double_at(i),
            _ => panic!("as_double_at on a {} vector", self.kind().name()),
        }
    }

    pub fn as_complex_at(&self, i: usize) -> Complex {
        debug_assert!(i < self.len());
        match self.data() {
            VectorData::Complex(v) => v[i],
            _ => {
                if self.is_na_at(i) {
                    na::complex_na()
                } else {
                    Complex::new(self.as_double_at(i), 0.0)
                }
            }
        }
    }

    /// Element formatted as a string; `None` for a missing element of any
    /// kind.
    pub fn as_string_at(&self, i: usize) -> Option<String> {
        debug_assert!(i < self.len());
        if self.is_na_at(i) {
            return None;
        }
        Some(match self.data() {
            VectorData::Null => unreachable!("Null has length 0"),
            VectorData::Raw(v) => format!("{:02x}", v[i]),
            VectorData::Logical(v) => {
                if v[i] == na::LOGICAL_TRUE {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
            VectorData::Int(_) | VectorData::IntSeq { .. } => self.int_at(i).to_string(),
            VectorData::Double(_) | VectorData::DoubleSeq { .. } => {
                format_double(self.double_at(i))
            }
            VectorData::Complex(v) => {
                let c = v[i];
                if c.im < 0.0 || (c.im == 0.0 && c.im.is_sign_negative()) {
                    format!("{}-{}i", format_double(c.re), format_double(-c.im))
                } else {
                    format!("{}+{}i", format_double(c.re), format_double(c.im))
                }
            }
            VectorData::Character(v) => v[i].clone().unwrap_or_default(),
            VectorData::List(v) => format!("{}", v[i]),
        })
    }
}

pub(crate) fn format_double(x: f64) -> String {
    if is_na_double(x) {
        return "NA".to_string();
    }
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    if x == x.trunc() && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{}", x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::na::{double_na, INT_NA, LOGICAL_NA, LOGICAL_TRUE};

    #[test]
    fn is_na_at_per_kind() {
        let v = RVector::from_ints(vec![1, INT_NA]);
        assert!(!v.is_na_at(0));
        assert!(v.is_na_at(1));
        let d = RVector::from_doubles(vec![double_na(), f64::NAN]);
        assert!(d.is_na_at(0));
        assert!(!d.is_na_at(1)); // plain NaN is not NA
        let s = RVector::from_strings(vec![None, Some("x".into())]);
        assert!(s.is_na_at(0));
        assert!(!s.is_na_at(1));
    }

    #[test]
    fn sequences_are_never_missing() {
        let v = RVector::iota(3);
        assert!(!v.is_na_at(0));
        assert_eq!(v.as_int_at(2), 3);
    }

    #[test]
    fn converting_access_widens() {
        let l = RVector::logical(vec![LOGICAL_TRUE, LOGICAL_NA], false);
        assert_eq!(l.as_int_at(0), 1);
        assert_eq!(l.as_int_at(1), INT_NA);
        assert_eq!(l.as_double_at(0), 1.0);
        assert!(is_na_double(l.as_double_at(1)));

        let i = RVector::from_ints(vec![7, INT_NA]);
        assert_eq!(i.as_double_at(0), 7.0);
        assert!(is_na_double(i.as_double_at(1)));
        let c = i.as_complex_at(0);
        assert_eq!((c.re, c.im), (7.0, 0.0));
        assert!(is_na_complex(i.as_complex_at(1)));
    }

    #[test]
    fn narrowing_double_to_int() {
        let d = RVector::from_doubles(vec![3.0, 3.5, 1e100, double_na()]);
        assert_eq!(d.as_int_at(0), 3);
        assert_eq!(d.as_int_at(1), INT_NA);
        assert_eq!(d.as_int_at(2), INT_NA);
        assert_eq!(d.as_int_at(3), INT_NA);
    }

    #[test]
    fn string_access_formats() {
        let d = RVector::from_doubles(vec![2.0, 2.5]);
        assert_eq!(d.as_string_at(0).unwrap(), "2");
        assert_eq!(d.as_string_at(1).unwrap(), "2.5");
        let l = RVector::from_logicals(vec![LOGICAL_TRUE]);
        assert_eq!(l.as_string_at(0).unwrap(), "TRUE");
        let i = RVector::from_ints(vec![INT_NA]);
        assert_eq!(i.as_string_at(0), None);
    }
}
