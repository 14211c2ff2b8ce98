//! Per-kind missing-value sentinels and predicates.
//!
//! Every kind except Raw and List reserves one payload as "NA". The Double
//! sentinel is one fixed NaN bit pattern; `is_na_double` matches that exact
//! payload while `is_na_or_nan` matches the whole NaN family. The two are
//! never interchangeable: ordering treats any NaN like NA, arithmetic
//! poisoning writes the exact sentinel.

use super::Complex;

pub const INT_NA: i32 = i32::MIN;

pub const LOGICAL_TRUE: i8 = 1;
pub const LOGICAL_FALSE: i8 = 0;
pub const LOGICAL_NA: i8 = i8::MIN;

const DOUBLE_NA_BITS: u64 = 0x7FF0_0000_0000_07A2;

pub fn double_na() -> f64 {
    f64::from_bits(DOUBLE_NA_BITS)
}

pub fn complex_na() -> Complex {
    Complex {
        re: double_na(),
        im: double_na(),
    }
}

pub fn is_na_int(x: i32) -> bool {
    x == INT_NA
}

pub fn is_na_logical(x: i8) -> bool {
    x == LOGICAL_NA
}

/// The exact missing payload only. NaN produced by arithmetic is not NA.
pub fn is_na_double(x: f64) -> bool {
    x.to_bits() == DOUBLE_NA_BITS
}

/// Any NaN-family payload, the missing sentinel included.
pub fn is_na_or_nan(x: f64) -> bool {
    x.is_nan()
}

/// A complex element is missing if either part carries the Double sentinel.
pub fn is_na_complex(x: Complex) -> bool {
    is_na_double(x.re) || is_na_double(x.im)
}

pub fn logical_from_bool(b: bool) -> i8 {
    if b {
        LOGICAL_TRUE
    } else {
        LOGICAL_FALSE
    }
}

// Kind-to-kind element conversions used by the generic accessor layer.
// NA maps to NA; everything else converts by value.

pub(crate) fn logical_to_int(x: i8) -> i32 {
    if is_na_logical(x) {
        INT_NA
    } else {
        x as i32
    }
}

pub(crate) fn logical_to_double(x: i8) -> f64 {
    if is_na_logical(x) {
        double_na()
    } else {
        x as f64
    }
}

pub(crate) fn int_to_double(x: i32) -> f64 {
    if is_na_int(x) {
        double_na()
    } else {
        x as f64
    }
}

/// Running "saw a missing element" flag: ops track one bit per call instead
/// of re-scanning the output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaTracker {
    seen_na: bool,
}

impl NaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one element's missing status.
    pub fn note(&mut self, is_na: bool) {
        self.seen_na |= is_na;
    }

    /// Record and branch in one step.
    pub fn check(&mut self, is_na: bool) -> bool {
        self.seen_na |= is_na;
        is_na
    }

    /// The completeness flag for the assembled result.
    pub fn complete(&self) -> bool {
        !self.seen_na
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_na_is_nan_but_not_every_nan_is_na() {
        assert!(double_na().is_nan());
        assert!(is_na_double(double_na()));
        assert!(is_na_or_nan(double_na()));
        let plain_nan = f64::NAN;
        assert!(is_na_or_nan(plain_nan));
        assert!(!is_na_double(plain_nan));
    }

    #[test]
    fn double_na_survives_copy() {
        let x = double_na();
        let y = x;
        assert!(is_na_double(y));
    }

    #[test]
    fn complex_na_either_part() {
        assert!(is_na_complex(complex_na()));
        assert!(is_na_complex(Complex { re: double_na(), im: 0.0 }));
        assert!(is_na_complex(Complex { re: 0.0, im: double_na() }));
        assert!(!is_na_complex(Complex { re: f64::NAN, im: 0.0 }));
    }

    #[test]
    fn tracker_accumulates() {
        let mut t = NaTracker::new();
        assert!(t.complete());
        assert!(!t.check(is_na_int(5)));
        assert!(t.check(is_na_int(INT_NA)));
        assert!(!t.complete());
        // once dirty, stays dirty
        t.note(false);
        assert!(!t.complete());
        let mut u = NaTracker::new();
        u.note(true);
        assert!(!u.complete());
    }

    #[test]
    fn conversions_map_na_to_na() {
        assert_eq!(logical_to_int(LOGICAL_NA), INT_NA);
        assert_eq!(logical_to_int(LOGICAL_TRUE), 1);
        assert!(is_na_double(int_to_double(INT_NA)));
        assert_eq!(int_to_double(3), 3.0);
        assert!(is_na_double(logical_to_double(LOGICAL_NA)));
    }
}
