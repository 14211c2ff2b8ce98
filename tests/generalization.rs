//! Shape-bound behavior: a call site tolerates a fixed number of distinct
//! argument shapes, then collapses to the single generic implementation
//! for good.

use ravel::ops::arith::ADD;
use ravel::value::Kind;
use ravel::{CallSite, RVector, Session, SiteState};

fn operand(kind: Kind, scalar: bool) -> RVector {
    let len = if scalar { 1 } else { 2 };
    match kind {
        Kind::Logical => RVector::from_logicals(vec![1; len]),
        Kind::Integer => RVector::from_ints(vec![7; len]),
        Kind::Double => RVector::from_doubles(vec![1.5; len]),
        Kind::Complex => RVector::from_complexes(vec![
            ravel::Complex::new(1.0, 1.0);
            len
        ]),
        _ => unreachable!(),
    }
}

/// 20 pairwise distinct shape combinations over the numeric kinds.
fn shapes() -> Vec<(RVector, RVector)> {
    use Kind::{Complex, Double, Integer, Logical};
    let kinds = [Logical, Integer, Double, Complex];
    let mut out = Vec::new();
    for &a in &kinds {
        for &b in &kinds {
            out.push((operand(a, false), operand(b, false)));
        }
    }
    out.push((operand(Integer, true), operand(Integer, false)));
    out.push((operand(Integer, false), operand(Integer, true)));
    out.push((operand(Double, true), operand(Double, false)));
    out.push((operand(Double, false), operand(Double, true)));
    out
}

#[test]
fn twelfth_distinct_shape_generalizes_permanently() {
    let mut session = Session::new();
    let mut site = CallSite::new(&ADD);
    let shapes = shapes();
    assert_eq!(shapes.len(), 20);

    for (i, (a, b)) in shapes.iter().enumerate() {
        site.call(&mut session, &[a, b]).unwrap();
        let seen = i + 1;
        if seen < 12 {
            assert_eq!(site.state(), SiteState::Specializing, "after shape {}", seen);
            assert_eq!(site.entry_count(), seen, "after shape {}", seen);
        } else {
            assert_eq!(site.state(), SiteState::Generalized, "after shape {}", seen);
            assert_eq!(site.entry_count(), 1, "after shape {}", seen);
        }
    }
}

#[test]
fn repeated_shapes_do_not_count_twice() {
    let mut session = Session::new();
    let mut site = CallSite::new(&ADD);
    let a = RVector::from_ints(vec![1, 2]);
    let b = RVector::from_ints(vec![3, 4]);
    for _ in 0..100 {
        site.call(&mut session, &[&a, &b]).unwrap();
    }
    assert_eq!(site.state(), SiteState::Specializing);
    assert_eq!(site.entry_count(), 1);
}

#[test]
fn generalized_results_stay_correct() {
    let mut session = Session::new();
    let mut site = CallSite::new(&ADD);
    for (a, b) in shapes() {
        site.call(&mut session, &[&a, &b]).unwrap();
    }
    assert_eq!(site.state(), SiteState::Generalized);
    let a = RVector::from_ints(vec![1, 2, 3]);
    let b = RVector::from_ints(vec![10, 20, 30]);
    let r = site.call(&mut session, &[&a, &b]).unwrap();
    let got: Vec<i32> = (0..r.len()).map(|i| r.int_at(i)).collect();
    assert_eq!(got, vec![11, 22, 33]);
}
