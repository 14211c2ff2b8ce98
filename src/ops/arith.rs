//! Binary and unary arithmetic with recycling, NA poisoning and the
//! integer overflow policy: integer `+`, `-`, `*` are computed in 64-bit
//! and a result outside the representable `i32` range becomes NA, clears
//! the completeness flag and emits one warning per call. Division always
//! produces Double. Mixed kinds promote; Logical operands behave as
//! Integer 0/1.

use crate::dispatch::{CallArgs, Guard, OpDescriptor, OpImpl, Predicate, SpecEntry};
use crate::recycle::RecyclePlan;
use crate::session::Session;
use crate::value::na::{self, NaTracker, INT_NA};
use crate::value::{Complex, Kind, RVector, RuntimeError, WarningKind, MSG_INTEGER_OVERFLOW};

use super::{propagate_binary_attrs, MSG_NON_NUMERIC};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
}

// Largest magnitude an integer result may take; `i32::MIN` itself is the
// missing sentinel.
const INT_MIN_VALUE: i64 = -(i32::MAX as i64);
const INT_MAX_VALUE: i64 = i32::MAX as i64;

enum IntResult {
    Value(i32),
    Overflow,
    Na,
}

fn int_kernel(op: ArithOp, a: i32, b: i32) -> IntResult {
    let (a, b) = (a as i64, b as i64);
    match op {
        ArithOp::Add | ArithOp::Sub | ArithOp::Mul => {
            let r = match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                _ => a * b,
            };
            if (INT_MIN_VALUE..=INT_MAX_VALUE).contains(&r) {
                IntResult::Value(r as i32)
            } else {
                IntResult::Overflow
            }
        }
        ArithOp::IntDiv => {
            if b == 0 {
                IntResult::Na
            } else {
                IntResult::Value(floor_div(a, b) as i32)
            }
        }
        ArithOp::Mod => {
            if b == 0 {
                IntResult::Na
            } else {
                IntResult::Value((a - floor_div(a, b) * b) as i32)
            }
        }
        ArithOp::Div => unreachable!("integer division produces Double"),
    }
}

fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn dbl_kernel(op: ArithOp, a: f64, b: f64) -> f64 {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        ArithOp::IntDiv => (a / b).floor(),
        ArithOp::Mod => a - (a / b).floor() * b,
    }
}

fn complex_kernel(op: ArithOp, a: Complex, b: Complex) -> Complex {
    match op {
        ArithOp::Add => Complex::new(a.re + b.re, a.im + b.im),
        ArithOp::Sub => Complex::new(a.re - b.re, a.im - b.im),
        ArithOp::Mul => Complex::new(a.re * b.re - a.im * b.im, a.re * b.im + a.im * b.re),
        ArithOp::Div => {
            let den = b.re * b.re + b.im * b.im;
            Complex::new(
                (a.re * b.re + a.im * b.im) / den,
                (a.im * b.re - a.re * b.im) / den,
            )
        }
        ArithOp::IntDiv | ArithOp::Mod => unreachable!("rejected before the loop"),
    }
}

fn result_kind(op: ArithOp, lhs: Kind, rhs: Kind) -> Result<Kind, RuntimeError> {
    if !lhs.is_numeric() || !rhs.is_numeric() {
        return Err(RuntimeError::argument(MSG_NON_NUMERIC));
    }
    let mut kind = lhs.promote(rhs);
    if kind == Kind::Logical {
        kind = Kind::Integer;
    }
    if kind == Kind::Complex && matches!(op, ArithOp::IntDiv | ArithOp::Mod) {
        return Err(RuntimeError::argument("unimplemented complex operation"));
    }
    if op == ArithOp::Div {
        kind = kind.promote(Kind::Double);
    }
    Ok(kind)
}

// ── Generic fallback ─────────────────────────────────────────────────

fn binary(
    session: &mut Session,
    op: ArithOp,
    lhs: &RVector,
    rhs: &RVector,
) -> Result<RVector, RuntimeError> {
    let kind = result_kind(op, lhs.kind(), rhs.kind())?;
    let plan = RecyclePlan::new(&[lhs.len(), rhs.len()]);
    plan.warn_fringe(session);
    let n = plan.out_len();

    let mut out = match kind {
        Kind::Integer => {
            let mut data = Vec::with_capacity(n);
            let mut tracker = NaTracker::new();
            let mut warned_overflow = false;
            for i in 0..n {
                let (li, ri) = (plan.index(0, i), plan.index(1, i));
                if tracker.check(lhs.is_na_at(li) || rhs.is_na_at(ri)) {
                    data.push(INT_NA);
                    continue;
                }
                match int_kernel(op, lhs.as_int_at(li), rhs.as_int_at(ri)) {
                    IntResult::Value(v) => data.push(v),
                    IntResult::Overflow => {
                        data.push(INT_NA);
                        tracker.note(true);
                        if !warned_overflow {
                            session.warn(WarningKind::IntegerOverflow, MSG_INTEGER_OVERFLOW);
                            warned_overflow = true;
                        }
                    }
                    IntResult::Na => {
                        data.push(INT_NA);
                        tracker.note(true);
                    }
                }
            }
            RVector::int(data, tracker.complete())
        }
        Kind::Double => {
            let mut data = Vec::with_capacity(n);
            let mut tracker = NaTracker::new();
            for i in 0..n {
                let (li, ri) = (plan.index(0, i), plan.index(1, i));
                if tracker.check(lhs.is_na_at(li) || rhs.is_na_at(ri)) {
                    data.push(na::double_na());
                } else {
                    data.push(dbl_kernel(op, lhs.as_double_at(li), rhs.as_double_at(ri)));
                }
            }
            RVector::double(data, tracker.complete())
        }
        Kind::Complex => {
            let mut data = Vec::with_capacity(n);
            let mut tracker = NaTracker::new();
            for i in 0..n {
                let (li, ri) = (plan.index(0, i), plan.index(1, i));
                if tracker.check(lhs.is_na_at(li) || rhs.is_na_at(ri)) {
                    data.push(na::complex_na());
                } else {
                    data.push(complex_kernel(op, lhs.as_complex_at(li), rhs.as_complex_at(ri)));
                }
            }
            RVector::complex(data, tracker.complete())
        }
        _ => unreachable!("result_kind returns a numeric kind"),
    };
    propagate_binary_attrs(&mut out, lhs, rhs);
    Ok(out)
}

/// Unary negation. Logical negates as Integer; the missing sentinel stays
/// the sentinel. Attributes are carried over from the operand.
pub fn neg(_session: &mut Session, x: &RVector) -> Result<RVector, RuntimeError> {
    if !x.kind().is_numeric() {
        return Err(RuntimeError::argument(MSG_NON_NUMERIC));
    }
    let n = x.len();
    let mut out = match x.kind() {
        Kind::Logical | Kind::Integer => {
            let mut data = Vec::with_capacity(n);
            let mut tracker = NaTracker::new();
            for i in 0..n {
                if tracker.check(x.is_na_at(i)) {
                    data.push(INT_NA);
                } else {
                    data.push(-x.as_int_at(i));
                }
            }
            RVector::int(data, tracker.complete())
        }
        Kind::Double => {
            let mut data = Vec::with_capacity(n);
            let mut tracker = NaTracker::new();
            for i in 0..n {
                if tracker.check(x.is_na_at(i)) {
                    data.push(na::double_na());
                } else {
                    data.push(-x.double_at(i));
                }
            }
            RVector::double(data, tracker.complete())
        }
        Kind::Complex => {
            let mut data = Vec::with_capacity(n);
            let mut tracker = NaTracker::new();
            for i in 0..n {
                if tracker.check(x.is_na_at(i)) {
                    data.push(na::complex_na());
                } else {
                    let c = x.complex_at(i);
                    data.push(Complex::new(-c.re, -c.im));
                }
            }
            RVector::complex(data, tracker.complete())
        }
        _ => unreachable!(),
    };
    if x.has_attributes() {
        out.copy_attrs_of(x);
    }
    Ok(out)
}

// ── Public entry points (the fallback bodies) ────────────────────────

pub fn add(session: &mut Session, lhs: &RVector, rhs: &RVector) -> Result<RVector, RuntimeError> {
    binary(session, ArithOp::Add, lhs, rhs)
}

pub fn sub(session: &mut Session, lhs: &RVector, rhs: &RVector) -> Result<RVector, RuntimeError> {
    binary(session, ArithOp::Sub, lhs, rhs)
}

pub fn mul(session: &mut Session, lhs: &RVector, rhs: &RVector) -> Result<RVector, RuntimeError> {
    binary(session, ArithOp::Mul, lhs, rhs)
}

pub fn div(session: &mut Session, lhs: &RVector, rhs: &RVector) -> Result<RVector, RuntimeError> {
    binary(session, ArithOp::Div, lhs, rhs)
}

pub fn int_div(
    session: &mut Session,
    lhs: &RVector,
    rhs: &RVector,
) -> Result<RVector, RuntimeError> {
    binary(session, ArithOp::IntDiv, lhs, rhs)
}

pub fn modulo(
    session: &mut Session,
    lhs: &RVector,
    rhs: &RVector,
) -> Result<RVector, RuntimeError> {
    binary(session, ArithOp::Mod, lhs, rhs)
}

// ── Specialized fast paths ───────────────────────────────────────────
//
// Same kind, same length, attribute-free, complete operands: a direct
// typed loop with no per-element NA checks. Overflow handling stays, so
// the output is identical to the fallback's.

fn int_fast(session: &mut Session, args: &CallArgs, op: ArithOp) -> Result<RVector, RuntimeError> {
    let (lhs, rhs) = (args.arg(0), args.arg(1));
    let n = lhs.len();
    let mut data = Vec::with_capacity(n);
    let mut tracker = NaTracker::new();
    let mut warned_overflow = false;
    for i in 0..n {
        match int_kernel(op, lhs.int_at(i), rhs.int_at(i)) {
            IntResult::Value(v) => data.push(v),
            IntResult::Overflow => {
                data.push(INT_NA);
                tracker.note(true);
                if !warned_overflow {
                    session.warn(WarningKind::IntegerOverflow, MSG_INTEGER_OVERFLOW);
                    warned_overflow = true;
                }
            }
            IntResult::Na => {
                data.push(INT_NA);
                tracker.note(true);
            }
        }
    }
    Ok(RVector::int(data, tracker.complete()))
}

fn dbl_fast(_session: &mut Session, args: &CallArgs, op: ArithOp) -> Result<RVector, RuntimeError> {
    let (lhs, rhs) = (args.arg(0), args.arg(1));
    let n = lhs.len();
    let mut data = Vec::with_capacity(n);
    for i in 0..n {
        data.push(dbl_kernel(op, lhs.double_at(i), rhs.double_at(i)));
    }
    Ok(RVector::double(data, true))
}

fn same_kind_fast_guard(args: &CallArgs, kind: Kind) -> Guard {
    Guard::new([
        Predicate::KindIs(0, kind),
        Predicate::KindIs(1, kind),
        Predicate::SameLength(0, 1),
        Predicate::AttrFree(0),
        Predicate::AttrFree(1),
        Predicate::IsComplete(0),
        Predicate::IsComplete(1),
        Predicate::ReprIs(0, args.arg(0).repr()),
        Predicate::ReprIs(1, args.arg(1).repr()),
    ])
}

fn specialize_binary(args: &CallArgs, int_imp: Option<OpImpl>, dbl_imp: OpImpl) -> Option<SpecEntry> {
    let (lhs, rhs) = (args.arg(0), args.arg(1));
    let fast_shape = lhs.len() == rhs.len()
        && !lhs.has_attributes()
        && !rhs.has_attributes()
        && lhs.is_complete()
        && rhs.is_complete();
    if !fast_shape {
        return None;
    }
    match (lhs.kind(), rhs.kind()) {
        (Kind::Integer, Kind::Integer) => int_imp.map(|imp| SpecEntry {
            guard: same_kind_fast_guard(args, Kind::Integer),
            imp,
        }),
        (Kind::Double, Kind::Double) => Some(SpecEntry {
            guard: same_kind_fast_guard(args, Kind::Double),
            imp: dbl_imp,
        }),
        _ => None,
    }
}

fn no_specialize(_args: &CallArgs) -> Option<SpecEntry> {
    None
}

macro_rules! arith_descriptor {
    ($static_name:ident, $display:expr, $op:expr, $entry:ident,
     $fallback:ident, $spec:ident, $int_fast:ident, $dbl_fast:ident,
     int_fast: $has_int:expr) => {
        fn $fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
            $entry(session, args.arg(0), args.arg(1))
        }

        fn $int_fast(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
            int_fast(session, args, $op)
        }

        fn $dbl_fast(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
            dbl_fast(session, args, $op)
        }

        fn $spec(args: &CallArgs) -> Option<SpecEntry> {
            let int_imp: Option<OpImpl> = if $has_int { Some($int_fast) } else { None };
            specialize_binary(args, int_imp, $dbl_fast)
        }

        pub static $static_name: OpDescriptor = OpDescriptor {
            name: $display,
            specialize: $spec,
            fallback: $fallback,
        };
    };
}

arith_descriptor!(ADD, "+", ArithOp::Add, add, add_fallback, add_spec, add_int_fast, add_dbl_fast, int_fast: true);
arith_descriptor!(SUB, "-", ArithOp::Sub, sub, sub_fallback, sub_spec, sub_int_fast, sub_dbl_fast, int_fast: true);
arith_descriptor!(MUL, "*", ArithOp::Mul, mul, mul_fallback, mul_spec, mul_int_fast, mul_dbl_fast, int_fast: true);
arith_descriptor!(DIV, "/", ArithOp::Div, div, div_fallback, div_spec, div_int_fast, div_dbl_fast, int_fast: false);

fn int_div_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    int_div(session, args.arg(0), args.arg(1))
}

pub static INT_DIV: OpDescriptor = OpDescriptor {
    name: "%/%",
    specialize: no_specialize,
    fallback: int_div_fallback,
};

fn modulo_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    modulo(session, args.arg(0), args.arg(1))
}

pub static MODULO: OpDescriptor = OpDescriptor {
    name: "%%",
    specialize: no_specialize,
    fallback: modulo_fallback,
};

fn neg_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    neg(session, args.arg(0))
}

pub static NEG: OpDescriptor = OpDescriptor {
    name: "u-",
    specialize: no_specialize,
    fallback: neg_fallback,
};
