//! Replication. Three knobs applied in a fixed order: `each` inflates
//! every element first; then `length_out`, when given, cycles or truncates
//! the inflated sequence to an exact length and `times` is ignored;
//! otherwise `times` replicates the whole sequence (scalar) or gives a
//! per-element count (vector, which must match the post-`each` length).
//! `names` travel through the same index plan; all other attributes are
//! dropped.

use crate::dispatch::{CallArgs, Guard, OpDescriptor, Predicate, SpecEntry};
use crate::recycle::inc_mod;
use crate::session::Session;
use crate::symbol::sym_names;
use crate::value::{Kind, RVector, RuntimeError};

use super::require_kind;

const MSG_INVALID_TIMES: &str = "invalid 'times' argument";
const MSG_INVALID_EACH: &str = "invalid 'each' argument";
const MSG_INVALID_LENGTH_OUT: &str = "invalid 'length.out' argument";

/// Source-index plan for the replication. Every output element is a copy
/// of `x[plan[i]]`.
fn build_plan(
    x_len: usize,
    times: &RVector,
    length_out: Option<usize>,
    each: usize,
) -> Result<Vec<usize>, RuntimeError> {
    let mut base = Vec::with_capacity(x_len * each);
    for i in 0..x_len {
        for _ in 0..each {
            base.push(i);
        }
    }

    if let Some(n) = length_out {
        let mut out = Vec::with_capacity(n);
        let mut j = 0;
        for _ in 0..n {
            out.push(base[j]);
            j = inc_mod(j, base.len());
        }
        return Ok(out);
    }

    if times.len() == 1 {
        let t = times_count(times, 0)?;
        let mut out = Vec::with_capacity(base.len() * t);
        for _ in 0..t {
            out.extend_from_slice(&base);
        }
        Ok(out)
    } else {
        if times.len() != base.len() {
            return Err(RuntimeError::argument(MSG_INVALID_TIMES));
        }
        let mut out = Vec::new();
        for (j, &src) in base.iter().enumerate() {
            let t = times_count(times, j)?;
            for _ in 0..t {
                out.push(src);
            }
        }
        Ok(out)
    }
}

fn times_count(times: &RVector, i: usize) -> Result<usize, RuntimeError> {
    if times.is_na_at(i) || times.int_at(i) < 0 {
        return Err(RuntimeError::argument(MSG_INVALID_TIMES));
    }
    Ok(times.int_at(i) as usize)
}

fn gather(x: &RVector, plan: &[usize]) -> Result<RVector, RuntimeError> {
    let mut out = RVector::alloc(x.kind(), plan.len(), x.is_complete() || plan.is_empty());
    for (i, &src) in plan.iter().enumerate() {
        out.set(i, x.get(src)?)?;
    }
    Ok(out)
}

pub fn rep(
    _session: &mut Session,
    x: &RVector,
    times: &RVector,
    length_out: Option<usize>,
    each: usize,
) -> Result<RVector, RuntimeError> {
    if x.kind() == Kind::Null {
        return Ok(RVector::null());
    }
    require_kind(times, Kind::Integer, "times")?;
    if let Some(n) = length_out {
        // cycling an empty inflated source pads with the missing sentinel
        if x.len() * each == 0 && n > 0 {
            return Ok(RVector::alloc_na(x.kind(), n));
        }
    }
    let plan = build_plan(x.len(), times, length_out, each)?;
    let mut out = gather(x, &plan)?;
    if let Some(names) = x.names() {
        out.set_attr_raw(sym_names(), gather(names, &plan)?);
    }
    Ok(out)
}

// ── Descriptor ───────────────────────────────────────────────────────
//
// Arguments: x, times (Integer vector), length.out (Integer scalar, NA
// when absent), each (Integer scalar).

fn length_out_arg(arg: &RVector) -> Result<Option<usize>, RuntimeError> {
    require_kind(arg, Kind::Integer, "length.out")?;
    if arg.is_empty() {
        return Err(RuntimeError::argument(MSG_INVALID_LENGTH_OUT));
    }
    if arg.is_na_at(0) {
        return Ok(None);
    }
    let n = arg.int_at(0);
    if n < 0 {
        return Err(RuntimeError::argument(MSG_INVALID_LENGTH_OUT));
    }
    Ok(Some(n as usize))
}

fn each_arg(arg: &RVector) -> Result<usize, RuntimeError> {
    require_kind(arg, Kind::Integer, "each")?;
    if arg.is_empty() || arg.is_na_at(0) || arg.int_at(0) < 0 {
        return Err(RuntimeError::argument(MSG_INVALID_EACH));
    }
    Ok(arg.int_at(0) as usize)
}

fn rep_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    let length_out = length_out_arg(args.arg(2))?;
    let each = each_arg(args.arg(3))?;
    rep(session, args.arg(0), args.arg(1), length_out, each)
}

/// The two cached families split on whether `length.out` was supplied:
/// its slot is a complete scalar when given and the NA scalar when not.
fn rep_specialize(args: &CallArgs) -> Option<SpecEntry> {
    let x = args.arg(0);
    let scalar_int =
        |a: &RVector| a.kind() == Kind::Integer && a.len() == 1 && a.is_complete();
    if !(x.kind() == Kind::Integer
        && x.is_complete()
        && !x.has_attributes()
        && scalar_int(args.arg(1))
        && args.arg(2).kind() == Kind::Integer
        && args.arg(2).len() == 1
        && scalar_int(args.arg(3)))
    {
        return None;
    }
    let base = Guard::new([
        Predicate::KindIs(0, Kind::Integer),
        Predicate::IsComplete(0),
        Predicate::AttrFree(0),
        Predicate::KindIs(1, Kind::Integer),
        Predicate::IsScalar(1),
        Predicate::IsComplete(1),
        Predicate::KindIs(2, Kind::Integer),
        Predicate::IsScalar(2),
        Predicate::KindIs(3, Kind::Integer),
        Predicate::IsScalar(3),
        Predicate::IsComplete(3),
    ]);
    if args.arg(2).is_complete() {
        Some(SpecEntry {
            guard: base.and(Predicate::IsComplete(2)),
            imp: |session, args| {
                let length_out = length_out_arg(args.arg(2))?;
                let each = each_arg(args.arg(3))?;
                rep(session, args.arg(0), args.arg(1), length_out, each)
            },
        })
    } else {
        Some(SpecEntry {
            guard: base.and(Predicate::IsNotComplete(2)),
            imp: |session, args| {
                let each = each_arg(args.arg(3))?;
                rep(session, args.arg(0), args.arg(1), None, each)
            },
        })
    }
}

pub static REP: OpDescriptor = OpDescriptor {
    name: "rep",
    specialize: rep_specialize,
    fallback: rep_fallback,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::na::INT_NA;
    use crate::value::ErrorCode;

    fn ints(v: &RVector) -> Vec<i32> {
        (0..v.len()).map(|i| v.int_at(i)).collect()
    }

    fn one() -> RVector {
        RVector::scalar_int(1)
    }

    #[test]
    fn scalar_times_replicates_whole_sequence() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![1, 2]);
        let r = rep(&mut s, &x, &RVector::scalar_int(3), None, 1).unwrap();
        assert_eq!(ints(&r), vec![1, 2, 1, 2, 1, 2]);
    }

    #[test]
    fn each_applies_before_times() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![1, 2]);
        let r = rep(&mut s, &x, &RVector::scalar_int(3), None, 2).unwrap();
        assert_eq!(ints(&r), vec![1, 1, 2, 2, 1, 1, 2, 2, 1, 1, 2, 2]);
    }

    #[test]
    fn length_out_truncates_and_ignores_times() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![1, 2, 3]);
        let r = rep(&mut s, &x, &RVector::scalar_int(100), Some(2), 1).unwrap();
        assert_eq!(ints(&r), vec![1, 2]);
    }

    #[test]
    fn length_out_pads_by_cycling() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![1, 2]);
        let r = rep(&mut s, &x, &one(), Some(5), 1).unwrap();
        assert_eq!(ints(&r), vec![1, 2, 1, 2, 1]);
    }

    #[test]
    fn vector_times_matches_post_each_length() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![7, 8]);
        let times = RVector::from_ints(vec![2, 0, 1, 3]);
        let r = rep(&mut s, &x, &times, None, 2).unwrap();
        assert_eq!(ints(&r), vec![7, 7, 8, 8, 8, 8]);

        let wrong = RVector::from_ints(vec![1, 2, 3]);
        let err = rep(&mut s, &x, &wrong, None, 2).unwrap_err();
        assert_eq!(err.message, MSG_INVALID_TIMES);
    }

    #[test]
    fn negative_or_na_times_is_error() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![1]);
        let err = rep(&mut s, &x, &RVector::scalar_int(-1), None, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::Argument);
        let err = rep(&mut s, &x, &RVector::int(vec![INT_NA], false), None, 1).unwrap_err();
        assert_eq!(err.message, MSG_INVALID_TIMES);
    }

    #[test]
    fn names_travel_with_the_plan() {
        let mut s = Session::new();
        let mut x = RVector::from_ints(vec![1, 2]);
        x.set_attr_raw(
            sym_names(),
            RVector::from_strings(vec![Some("a".into()), Some("b".into())]),
        );
        let r = rep(&mut s, &x, &RVector::scalar_int(2), None, 1).unwrap();
        let names = r.names().unwrap();
        let got: Vec<_> = (0..names.len()).map(|i| names.string_at(i)).collect();
        assert_eq!(got, vec![Some("a"), Some("b"), Some("a"), Some("b")]);
    }

    #[test]
    fn non_name_attributes_are_dropped() {
        let mut s = Session::new();
        let mut x = RVector::from_ints(vec![1, 2]);
        x.set_attr_raw(crate::symbol::sym_class(), RVector::scalar_string("myclass"));
        let r = rep(&mut s, &x, &RVector::scalar_int(2), None, 1).unwrap();
        assert!(!r.has_attributes());
    }

    #[test]
    fn empty_source_with_length_out_pads_missing() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![]);
        let r = rep(&mut s, &x, &one(), Some(3), 1).unwrap();
        assert_eq!(r.len(), 3);
        assert!(r.is_na_at(0) && r.is_na_at(2));
        assert!(!r.is_complete());
    }

    #[test]
    fn null_stays_null() {
        let mut s = Session::new();
        let r = rep(&mut s, &RVector::null(), &one(), None, 1).unwrap();
        assert_eq!(r.kind(), Kind::Null);
    }

    #[test]
    fn list_elements_replicate() {
        let mut s = Session::new();
        let x = RVector::list(vec![RVector::scalar_int(1), RVector::scalar_double(2.5)]);
        let r = rep(&mut s, &x, &RVector::scalar_int(2), None, 1).unwrap();
        assert_eq!(r.len(), 4);
        assert_eq!(r.kind(), Kind::List);
    }
}
