//! Attribute propagation, the copy-on-write discipline, and the
//! identity-guarded attribute call site.

use ravel::ops::arith;
use ravel::ops::attributes::{get_attr, set_attr, GET_ATTR, SET_ATTR};
use ravel::symbol::{sym_dim, sym_names};
use ravel::value::Kind;
use ravel::{CallSite, RVector, Session, SiteConfig, SiteState};

fn named(s: &mut Session, data: Vec<i32>, names: Vec<&str>) -> RVector {
    let names = RVector::from_strings(names.into_iter().map(|n| Some(n.to_owned())).collect());
    set_attr(s, &RVector::from_ints(data), sym_names(), &names).unwrap()
}

#[test]
fn copy_then_drop_roundtrip_is_idempotent() {
    let mut s = Session::new();
    let v = named(&mut s, vec![1, 2], vec!["a", "b"]);

    let copied = RVector::alloc(Kind::Integer, 2, true).with_attributes_from(&v, &[sym_names()]);
    assert!(copied.names().is_some());

    let bare = copied.drop_attributes();
    assert!(!bare.has_attributes());
    let bare_again = bare.drop_attributes();
    assert!(!bare_again.has_attributes());
    assert!(bare.identical(&bare_again));

    // re-applying from the same source restores the same table
    let recopied = bare.with_attributes_from(&v, &[sym_names()]);
    assert!(recopied.identical(&copied));
}

#[test]
fn binary_result_takes_longer_operands_attributes() {
    let mut s = Session::new();
    let long = named(&mut s, vec![1, 2, 3, 4], vec!["p", "q", "r", "s"]);
    let short = RVector::from_ints(vec![10, 20]);
    let r = arith::add(&mut s, &short, &long).unwrap();
    let names = r.names().unwrap();
    assert_eq!(names.string_at(0), Some("p"));

    // tie goes to the left operand
    let left = named(&mut s, vec![1, 2], vec!["l1", "l2"]);
    let right = named(&mut s, vec![3, 4], vec!["r1", "r2"]);
    let r = arith::add(&mut s, &left, &right).unwrap();
    assert_eq!(r.names().unwrap().string_at(0), Some("l1"));
}

#[test]
fn unary_negation_keeps_attributes() {
    let mut s = Session::new();
    let v = named(&mut s, vec![1, 2], vec!["a", "b"]);
    let r = arith::neg(&mut s, &v).unwrap();
    assert_eq!(r.int_at(0), -1);
    assert_eq!(r.names().unwrap().string_at(1), Some("b"));
}

#[test]
fn writes_never_leak_into_aliases() {
    let mut s = Session::new();
    let original = named(&mut s, vec![1, 2], vec!["a", "b"]);
    let alias = original.clone();
    let redone = set_attr(
        &mut s,
        &alias,
        sym_names(),
        &RVector::from_strings(vec![Some("x".into()), Some("y".into())]),
    )
    .unwrap();
    assert_eq!(original.names().unwrap().string_at(0), Some("a"));
    assert_eq!(redone.names().unwrap().string_at(0), Some("x"));
}

#[test]
fn stable_name_site_stays_specialized() {
    let mut session = Session::new();
    let mut site = CallSite::new(&GET_ATTR);
    let v = named(&mut session, vec![1, 2], vec!["a", "b"]);
    let name = RVector::scalar_string("names");
    for _ in 0..200 {
        let r = site.call(&mut session, &[&v, &name]).unwrap();
        assert_eq!(r.len(), 2);
    }
    assert_eq!(site.state(), SiteState::Specializing);
    assert_eq!(site.entry_count(), 1);
}

#[test]
fn name_churn_trips_the_instability_limit() {
    let mut session = Session::new();
    // a roomy shape bound isolates the instability path
    let mut site = CallSite::with_config(
        &SET_ATTR,
        SiteConfig {
            max_shapes: 100,
            instability_limit: 8,
        },
    );
    let x = RVector::from_ints(vec![1]);
    let value = RVector::scalar_int(42);

    // first name matches its entry once, making the entry eligible for
    // miss tracking
    let first = RVector::scalar_string("attr0");
    site.call(&mut session, &[&x, &first, &value]).unwrap();
    site.call(&mut session, &[&x, &first, &value]).unwrap();
    assert_eq!(site.state(), SiteState::Specializing);

    // every subsequent call uses a fresh name, missing that entry
    for i in 1.. {
        let name = RVector::scalar_string(format!("attr{}", i));
        site.call(&mut session, &[&x, &name, &value]).unwrap();
        if site.state() == SiteState::Generalized {
            break;
        }
        assert!(i < 20, "site never generalized");
    }
    assert_eq!(site.entry_count(), 1);

    // still correct afterwards
    let named = site
        .call(&mut session, &[&x, &RVector::scalar_string("names"), &RVector::scalar_string("z")])
        .unwrap();
    assert_eq!(named.names().unwrap().string_at(0), Some("z"));
}

#[test]
fn dim_validation_applies_through_the_site() {
    let mut session = Session::new();
    let mut site = CallSite::new(&SET_ATTR);
    let x = RVector::from_ints(vec![1, 2, 3, 4]);
    let name = RVector::scalar_string("dim");
    let good = site
        .call(&mut session, &[&x, &name, &RVector::from_ints(vec![2, 2])])
        .unwrap();
    assert!(good.attr(sym_dim()).is_some());

    let err = site
        .call(&mut session, &[&x, &name, &RVector::from_ints(vec![3, 2])])
        .unwrap_err();
    assert_eq!(err.message, "dims [product 6] do not match the length of object [4]");
}

#[test]
fn get_attr_on_missing_name_is_null() {
    let mut s = Session::new();
    let v = RVector::from_ints(vec![1]);
    assert_eq!(get_attr(&mut s, &v, sym_dim()).kind(), Kind::Null);
}
