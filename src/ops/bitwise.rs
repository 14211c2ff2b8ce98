//! Bitwise operations on Integer vectors: and/or/xor with recycling and
//! NA poisoning, unary not, and shifts with recycled shift counts. A
//! shift amount outside [0, 31] produces NA by domain rule: the element
//! becomes the sentinel and the completeness flag is cleared, without a
//! warning. The cast layer guarantees Integer inputs; anything else is an
//! argument error.

use crate::dispatch::{CallArgs, Guard, OpDescriptor, Predicate, SpecEntry};
use crate::recycle::RecyclePlan;
use crate::session::Session;
use crate::value::na::{NaTracker, INT_NA};
use crate::value::{Kind, RVector, RuntimeError};

use super::require_kind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BitOp {
    And,
    Or,
    Xor,
    ShiftL,
    ShiftR,
}

fn bit_kernel(op: BitOp, a: i32, b: i32) -> i32 {
    match op {
        BitOp::And => a & b,
        BitOp::Or => a | b,
        BitOp::Xor => a ^ b,
        // shift range was checked by the caller
        BitOp::ShiftL => ((a as u32) << b) as i32,
        BitOp::ShiftR => ((a as u32) >> b) as i32,
    }
}

fn is_shift(op: BitOp) -> bool {
    matches!(op, BitOp::ShiftL | BitOp::ShiftR)
}

fn binary(
    session: &mut Session,
    op: BitOp,
    lhs: &RVector,
    rhs: &RVector,
) -> Result<RVector, RuntimeError> {
    require_kind(lhs, Kind::Integer, "bitwise")?;
    require_kind(rhs, Kind::Integer, if is_shift(op) { "shift" } else { "bitwise" })?;
    let plan = RecyclePlan::new(&[lhs.len(), rhs.len()]);
    plan.warn_fringe(session);
    let n = plan.out_len();

    let mut data = Vec::with_capacity(n);
    let mut tracker = NaTracker::new();
    for i in 0..n {
        let (li, ri) = (plan.index(0, i), plan.index(1, i));
        if tracker.check(lhs.is_na_at(li) || rhs.is_na_at(ri)) {
            data.push(INT_NA);
            continue;
        }
        let (a, b) = (lhs.int_at(li), rhs.int_at(ri));
        if is_shift(op) && !(0..=31).contains(&b) {
            // domain rule, no warning
            data.push(INT_NA);
            tracker.note(true);
            continue;
        }
        let v = bit_kernel(op, a, b);
        // the computed bits may happen to be the sentinel; the element
        // reads as missing, so the flag must say so
        tracker.note(v == INT_NA);
        data.push(v);
    }
    Ok(RVector::int(data, tracker.complete()))
}

pub fn bitw_and(
    session: &mut Session,
    lhs: &RVector,
    rhs: &RVector,
) -> Result<RVector, RuntimeError> {
    binary(session, BitOp::And, lhs, rhs)
}

pub fn bitw_or(
    session: &mut Session,
    lhs: &RVector,
    rhs: &RVector,
) -> Result<RVector, RuntimeError> {
    binary(session, BitOp::Or, lhs, rhs)
}

pub fn bitw_xor(
    session: &mut Session,
    lhs: &RVector,
    rhs: &RVector,
) -> Result<RVector, RuntimeError> {
    binary(session, BitOp::Xor, lhs, rhs)
}

pub fn bitw_shift_l(
    session: &mut Session,
    lhs: &RVector,
    rhs: &RVector,
) -> Result<RVector, RuntimeError> {
    binary(session, BitOp::ShiftL, lhs, rhs)
}

pub fn bitw_shift_r(
    session: &mut Session,
    lhs: &RVector,
    rhs: &RVector,
) -> Result<RVector, RuntimeError> {
    binary(session, BitOp::ShiftR, lhs, rhs)
}

pub fn bitw_not(_session: &mut Session, x: &RVector) -> Result<RVector, RuntimeError> {
    require_kind(x, Kind::Integer, "bitwise")?;
    let mut data = Vec::with_capacity(x.len());
    let mut tracker = NaTracker::new();
    for i in 0..x.len() {
        if tracker.check(x.is_na_at(i)) {
            data.push(INT_NA);
        } else {
            data.push(!x.int_at(i));
        }
    }
    Ok(RVector::int(data, tracker.complete()))
}

// ── Fast path: complete same-length operands, no NA or range checks
// needed for and/or/xor ────────────────────────────────────────────────

fn fast_guard(args: &CallArgs) -> Guard {
    Guard::new([
        Predicate::KindIs(0, Kind::Integer),
        Predicate::KindIs(1, Kind::Integer),
        Predicate::SameLength(0, 1),
        Predicate::IsComplete(0),
        Predicate::IsComplete(1),
        Predicate::ReprIs(0, args.arg(0).repr()),
        Predicate::ReprIs(1, args.arg(1).repr()),
    ])
}

fn fast_loop(args: &CallArgs, op: BitOp) -> RVector {
    let (lhs, rhs) = (args.arg(0), args.arg(1));
    let n = lhs.len();
    let mut data = Vec::with_capacity(n);
    let mut tracker = NaTracker::new();
    for i in 0..n {
        let v = bit_kernel(op, lhs.int_at(i), rhs.int_at(i));
        tracker.note(v == INT_NA);
        data.push(v);
    }
    RVector::int(data, tracker.complete())
}

macro_rules! bit_descriptor {
    ($static_name:ident, $display:expr, $op:expr, $entry:ident, $fallback:ident, $spec:ident) => {
        fn $fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
            $entry(session, args.arg(0), args.arg(1))
        }

        fn $spec(args: &CallArgs) -> Option<SpecEntry> {
            let (lhs, rhs) = (args.arg(0), args.arg(1));
            if lhs.kind() == Kind::Integer
                && rhs.kind() == Kind::Integer
                && lhs.len() == rhs.len()
                && lhs.is_complete()
                && rhs.is_complete()
            {
                Some(SpecEntry {
                    guard: fast_guard(args),
                    imp: |_session, args| Ok(fast_loop(args, $op)),
                })
            } else {
                None
            }
        }

        pub static $static_name: OpDescriptor = OpDescriptor {
            name: $display,
            specialize: $spec,
            fallback: $fallback,
        };
    };
}

bit_descriptor!(BITW_AND, "bitwAnd", BitOp::And, bitw_and, and_fallback, and_spec);
bit_descriptor!(BITW_OR, "bitwOr", BitOp::Or, bitw_or, or_fallback, or_spec);
bit_descriptor!(BITW_XOR, "bitwXor", BitOp::Xor, bitw_xor, xor_fallback, xor_spec);

fn shift_l_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    bitw_shift_l(session, args.arg(0), args.arg(1))
}

fn shift_r_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    bitw_shift_r(session, args.arg(0), args.arg(1))
}

fn no_specialize(_args: &CallArgs) -> Option<SpecEntry> {
    None
}

pub static BITW_SHIFT_L: OpDescriptor = OpDescriptor {
    name: "bitwShiftL",
    specialize: no_specialize,
    fallback: shift_l_fallback,
};

pub static BITW_SHIFT_R: OpDescriptor = OpDescriptor {
    name: "bitwShiftR",
    specialize: no_specialize,
    fallback: shift_r_fallback,
};

fn not_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    bitw_not(session, args.arg(0))
}

pub static BITW_NOT: OpDescriptor = OpDescriptor {
    name: "bitwNot",
    specialize: no_specialize,
    fallback: not_fallback,
};
