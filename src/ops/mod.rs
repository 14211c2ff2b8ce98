//! The builtin operation library. Each operation exposes a plain function
//! (its generic fallback) and an [`OpDescriptor`](crate::dispatch::OpDescriptor)
//! so call sites can cache guarded fast paths for it.

pub mod arith;
pub mod attributes;
pub mod bitwise;
pub mod encode;
pub mod rep;
pub mod sample;
pub mod sort;

use crate::value::{Kind, RVector, RuntimeError};

pub(crate) const MSG_NON_NUMERIC: &str = "non-numeric argument to binary operator";

pub(crate) fn require_kind(arg: &RVector, kind: Kind, what: &str) -> Result<(), RuntimeError> {
    if arg.kind() != kind {
        return Err(RuntimeError::argument(format!(
            "invalid {} argument: expected {}, got {}",
            what,
            kind.name(),
            arg.kind().name()
        )));
    }
    Ok(())
}

/// First element of a Logical vector as a bool; NA and empty are argument
/// errors. Used for flag parameters (`replace`, `decreasing`, ...), which
/// the cast layer delivers as logical vectors.
pub(crate) fn flag_arg(arg: &RVector, what: &str) -> Result<bool, RuntimeError> {
    require_kind(arg, Kind::Logical, what)?;
    if arg.is_empty() || arg.is_na_at(0) {
        return Err(RuntimeError::argument(format!("invalid '{}' value", what)));
    }
    Ok(arg.logical_at(0) == crate::value::na::LOGICAL_TRUE)
}

/// First element of an Integer vector; NA and empty are argument errors.
pub(crate) fn int_arg(arg: &RVector, what: &str) -> Result<i32, RuntimeError> {
    require_kind(arg, Kind::Integer, what)?;
    if arg.is_empty() || arg.is_na_at(0) {
        return Err(RuntimeError::argument(format!("invalid '{}' value", what)));
    }
    Ok(arg.int_at(0))
}

/// Attribute propagation rule for binary element-wise results: the longer
/// operand's attributes are copied by value; on equal lengths the left
/// operand wins.
pub(crate) fn propagate_binary_attrs(out: &mut RVector, lhs: &RVector, rhs: &RVector) {
    let source = if rhs.len() > lhs.len() { rhs } else { lhs };
    if source.has_attributes() && source.len() == out.len() {
        out.copy_attrs_of(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::sym_names;
    use crate::value::ErrorCode;

    #[test]
    fn flag_arg_rejects_na() {
        let na = RVector::logical_na();
        let err = flag_arg(&na, "replace").unwrap_err();
        assert_eq!(err.code, ErrorCode::Argument);
        assert!(flag_arg(&RVector::scalar_logical(true), "replace").unwrap());
    }

    #[test]
    fn binary_attrs_longer_wins_left_on_tie() {
        let mut lhs = RVector::from_ints(vec![1, 2]);
        lhs.set_attr_raw(
            sym_names(),
            RVector::from_strings(vec![Some("l1".into()), Some("l2".into())]),
        );
        let mut rhs = RVector::from_ints(vec![3, 4]);
        rhs.set_attr_raw(
            sym_names(),
            RVector::from_strings(vec![Some("r1".into()), Some("r2".into())]),
        );

        let mut out = RVector::from_ints(vec![4, 6]);
        propagate_binary_attrs(&mut out, &lhs, &rhs);
        assert_eq!(out.names().unwrap().string_at(0), Some("l1"));

        let short = RVector::scalar_int(1);
        let mut out2 = RVector::from_ints(vec![4, 5]);
        propagate_binary_attrs(&mut out2, &short, &rhs);
        assert_eq!(out2.names().unwrap().string_at(0), Some("r1"));
    }
}
