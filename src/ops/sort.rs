//! Ordering and sorting. `order` produces the 1-based permutation that
//! stably sorts its input, using a shell sort over an index array with a
//! fixed increment table; ties keep the lower original index first.
//! Missing elements (and NaN for Double, which sorts just below NA) are
//! moved to the end when `na_last` is true, to the front when false, and
//! dropped from the permutation when `na_last` is itself NA. `sort`
//! returns the values themselves with missing elements removed and no
//! attributes.

use std::cmp::Ordering;

use crate::dispatch::{CallArgs, Guard, OpDescriptor, Predicate, SpecEntry};
use crate::session::Session;
use crate::value::na::LOGICAL_TRUE;
use crate::value::{Kind, RVector, RuntimeError};

use super::{flag_arg, require_kind};

// shell sort increments, descending, zero-terminated
const SINCS: [usize; 17] = [
    1073790977, 268460033, 67121153, 16783361, 4197377, 1050113, 262913, 65921, 16577, 4193,
    1073, 281, 77, 23, 8, 1, 0,
];

fn check_orderable(x: &RVector) -> Result<(), RuntimeError> {
    match x.kind() {
        Kind::Null | Kind::List => Err(RuntimeError::argument(format!(
            "unimplemented type '{}' in 'order'",
            x.kind().name()
        ))),
        _ => Ok(()),
    }
}

/// 0 for an orderable value, 1 for non-missing NaN, 2 for the missing
/// sentinel. NaN sorts just below NA within the moved group.
fn na_rank(x: &RVector, i: usize) -> u8 {
    if x.is_na_at(i) {
        return 2;
    }
    if x.kind() == Kind::Double && x.double_at(i).is_nan() {
        return 1;
    }
    0
}

fn compare_elements(x: &RVector, a: usize, b: usize) -> Ordering {
    match x.kind() {
        Kind::Logical => (x.logical_at(a) as i32).cmp(&(x.logical_at(b) as i32)),
        Kind::Integer => x.int_at(a).cmp(&x.int_at(b)),
        Kind::Raw => x.raw_at(a).cmp(&x.raw_at(b)),
        Kind::Double => x
            .double_at(a)
            .partial_cmp(&x.double_at(b))
            .unwrap_or(Ordering::Equal),
        Kind::Character => x.string_at(a).cmp(&x.string_at(b)),
        Kind::Complex => {
            let (p, q) = (x.complex_at(a), x.complex_at(b));
            match p.re.partial_cmp(&q.re).unwrap_or(Ordering::Equal) {
                Ordering::Equal => p.im.partial_cmp(&q.im).unwrap_or(Ordering::Equal),
                ord => ord,
            }
        }
        Kind::Null | Kind::List => Ordering::Equal,
    }
}

/// Shell sort of the index array. `greater(a, b)` decides whether the
/// element at original index `a` must move past the one at `b`; ties must
/// answer false so equal elements keep their original order.
fn shell_sort(indx: &mut [usize], mut greater: impl FnMut(usize, usize) -> bool) {
    let n = indx.len();
    if n < 2 {
        return;
    }
    let mut t = 0;
    while SINCS[t] > n {
        t += 1;
    }
    while SINCS[t] > 0 {
        let h = SINCS[t];
        for i in h..n {
            let itmp = indx[i];
            let mut j = i;
            while j >= h && greater(indx[j - h], itmp) {
                indx[j] = indx[j - h];
                j -= h;
            }
            indx[j] = itmp;
        }
        t += 1;
    }
}

fn sort_indices(x: &RVector, indx: &mut [usize], decreasing: bool) {
    shell_sort(indx, |a, b| {
        match compare_elements(x, a, b) {
            Ordering::Equal => a > b,
            ord => (ord == Ordering::Less) == decreasing,
        }
    });
}

/// 1-based permutation that stably sorts `x`.
pub fn order(
    _session: &mut Session,
    x: &RVector,
    na_last: Option<bool>,
    decreasing: bool,
) -> Result<RVector, RuntimeError> {
    check_orderable(x)?;
    let n = x.len();
    let mut normal = Vec::with_capacity(n);
    let mut missing: Vec<usize> = Vec::new();
    for i in 0..n {
        if na_rank(x, i) == 0 {
            normal.push(i);
        } else {
            missing.push(i);
        }
    }
    sort_indices(x, &mut normal, decreasing);
    // NaN before NA within the moved group, original order within each
    missing.sort_by_key(|&i| na_rank(x, i));

    let mut out = Vec::with_capacity(n);
    let push = |out: &mut Vec<i32>, idx: &[usize]| {
        out.extend(idx.iter().map(|&i| i as i32 + 1));
    };
    match na_last {
        Some(true) => {
            push(&mut out, &normal);
            push(&mut out, &missing);
        }
        Some(false) => {
            push(&mut out, &missing);
            push(&mut out, &normal);
        }
        None => push(&mut out, &normal),
    }
    Ok(RVector::int(out, true))
}

/// Values of `x` in sorted order, with missing elements (and NaN for
/// Double) removed. The result carries no attributes.
pub fn sort(
    session: &mut Session,
    x: &RVector,
    decreasing: bool,
) -> Result<RVector, RuntimeError> {
    let perm = order(session, x, None, decreasing)?;
    let n = perm.len();
    let mut out = RVector::alloc(x.kind(), n, true);
    for i in 0..n {
        let src = (perm.int_at(i) - 1) as usize;
        out.set(i, x.get(src)?)?;
    }
    Ok(out)
}

// ── Descriptors ──────────────────────────────────────────────────────
//
// `na_last` arrives as a Logical scalar where NA is meaningful, so it is
// parsed by hand rather than through `flag_arg`.

fn na_last_arg(arg: &RVector) -> Result<Option<bool>, RuntimeError> {
    require_kind(arg, Kind::Logical, "na.last")?;
    if arg.is_empty() {
        return Err(RuntimeError::argument("invalid 'na.last' value"));
    }
    if arg.is_na_at(0) {
        return Ok(None);
    }
    Ok(Some(arg.logical_at(0) == LOGICAL_TRUE))
}

fn order_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    let na_last = na_last_arg(args.arg(1))?;
    let decreasing = flag_arg(args.arg(2), "decreasing")?;
    order(session, args.arg(0), na_last, decreasing)
}

fn order_specialize(args: &CallArgs) -> Option<SpecEntry> {
    // complete Integer input cannot contain the sentinel, so the rank
    // scan and group split can be skipped outright
    let x = args.arg(0);
    if x.kind() == Kind::Integer
        && x.is_complete()
        && args.arg(1).kind() == Kind::Logical
        && args.arg(1).len() == 1
        && args.arg(2).kind() == Kind::Logical
        && args.arg(2).len() == 1
    {
        Some(SpecEntry {
            guard: Guard::new([
                Predicate::KindIs(0, Kind::Integer),
                Predicate::IsComplete(0),
                Predicate::KindIs(1, Kind::Logical),
                Predicate::IsScalar(1),
                Predicate::KindIs(2, Kind::Logical),
                Predicate::IsScalar(2),
            ]),
            imp: |_session, args| {
                let x = args.arg(0);
                let decreasing = flag_arg(args.arg(2), "decreasing")?;
                let mut indx: Vec<usize> = (0..x.len()).collect();
                sort_indices(x, &mut indx, decreasing);
                Ok(RVector::int(
                    indx.into_iter().map(|i| i as i32 + 1).collect(),
                    true,
                ))
            },
        })
    } else {
        None
    }
}

pub static ORDER: OpDescriptor = OpDescriptor {
    name: "order",
    specialize: order_specialize,
    fallback: order_fallback,
};

fn sort_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    let decreasing = flag_arg(args.arg(1), "decreasing")?;
    sort(session, args.arg(0), decreasing)
}

fn no_specialize(_args: &CallArgs) -> Option<SpecEntry> {
    None
}

pub static SORT: OpDescriptor = OpDescriptor {
    name: "sort",
    specialize: no_specialize,
    fallback: sort_fallback,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::na::{double_na, INT_NA};
    use crate::value::ErrorCode;

    fn ints(v: &RVector) -> Vec<i32> {
        (0..v.len()).map(|i| v.int_at(i)).collect()
    }

    #[test]
    fn order_integers_ascending() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![30, 10, 20]);
        let r = order(&mut s, &x, Some(true), false).unwrap();
        assert_eq!(ints(&r), vec![2, 3, 1]);
        assert!(r.is_complete());
    }

    #[test]
    fn order_is_stable_on_ties() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![5, 1, 5, 1]);
        let asc = order(&mut s, &x, Some(true), false).unwrap();
        assert_eq!(ints(&asc), vec![2, 4, 1, 3]);
        let desc = order(&mut s, &x, Some(true), true).unwrap();
        assert_eq!(ints(&desc), vec![1, 3, 2, 4]);
    }

    #[test]
    fn na_placement_follows_na_last() {
        let mut s = Session::new();
        let x = RVector::int(vec![3, INT_NA, 1], false);
        let last = order(&mut s, &x, Some(true), false).unwrap();
        assert_eq!(ints(&last), vec![3, 1, 2]);
        let first = order(&mut s, &x, Some(false), false).unwrap();
        assert_eq!(ints(&first), vec![2, 3, 1]);
        let dropped = order(&mut s, &x, None, false).unwrap();
        assert_eq!(ints(&dropped), vec![3, 1]);
    }

    #[test]
    fn nan_sorts_just_below_na() {
        let mut s = Session::new();
        let x = RVector::double(vec![double_na(), 2.0, f64::NAN, 1.0], false);
        let r = order(&mut s, &x, Some(true), false).unwrap();
        assert_eq!(ints(&r), vec![4, 2, 3, 1]);
    }

    #[test]
    fn order_strings() {
        let mut s = Session::new();
        let x = RVector::from_strings(vec![
            Some("pear".into()),
            Some("apple".into()),
            Some("fig".into()),
        ]);
        let r = order(&mut s, &x, Some(true), false).unwrap();
        assert_eq!(ints(&r), vec![2, 3, 1]);
    }

    #[test]
    fn order_complex_by_real_then_imaginary() {
        let mut s = Session::new();
        let x = RVector::from_complexes(vec![
            crate::value::Complex { re: 1.0, im: 2.0 },
            crate::value::Complex { re: 1.0, im: 1.0 },
            crate::value::Complex { re: 0.0, im: 9.0 },
        ]);
        let r = order(&mut s, &x, Some(true), false).unwrap();
        assert_eq!(ints(&r), vec![3, 2, 1]);
    }

    #[test]
    fn sort_drops_missing_and_attributes() {
        let mut s = Session::new();
        let mut x = RVector::double(vec![3.0, double_na(), 1.0, f64::NAN], false);
        x.set_attr_raw(
            crate::symbol::sym_names(),
            RVector::from_strings(vec![
                Some("a".into()),
                Some("b".into()),
                Some("c".into()),
                Some("d".into()),
            ]),
        );
        let r = sort(&mut s, &x, false).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.double_at(0), 1.0);
        assert_eq!(r.double_at(1), 3.0);
        assert!(r.is_complete());
        assert!(!r.has_attributes());
    }

    #[test]
    fn sort_decreasing() {
        let mut s = Session::new();
        let x = RVector::from_ints(vec![2, 9, 4]);
        let r = sort(&mut s, &x, true).unwrap();
        assert_eq!(ints(&r), vec![9, 4, 2]);
    }

    #[test]
    fn list_and_null_are_argument_errors() {
        let mut s = Session::new();
        let err = order(&mut s, &RVector::null(), Some(true), false).unwrap_err();
        assert_eq!(err.code, ErrorCode::Argument);
        let err = sort(&mut s, &RVector::list(vec![]), false).unwrap_err();
        assert_eq!(err.code, ErrorCode::Argument);
    }

    #[test]
    fn empty_and_singleton() {
        let mut s = Session::new();
        let r = order(&mut s, &RVector::from_ints(vec![]), Some(true), false).unwrap();
        assert_eq!(r.len(), 0);
        let r = order(&mut s, &RVector::from_ints(vec![7]), Some(true), true).unwrap();
        assert_eq!(ints(&r), vec![1]);
    }
}
