//! Attribute updates. `set_attr` validates the special attributes
//! (`names` must fit the vector length after NA-padding, `dim` must be a
//! complete non-negative Integer vector whose product is the length,
//! `dimnames` needs a `dim` to match against) and
//! writes through the copy-on-write attribute table, so an aliased vector
//! gets a defensive copy and a uniquely owned one is updated in place.
//! Setting Null removes the attribute.
//!
//! The call-site fast path for these operations is guarded on the interned
//! attribute-name symbol itself. That guard is an identity predicate, and
//! a site fed a different name on every call will trip the instability
//! limit and generalize.

use crate::dispatch::{CallArgs, Guard, OpDescriptor, Predicate, SpecEntry};
use crate::session::Session;
use crate::symbol::{sym_dim, sym_dimnames, sym_names, Symbol};
use crate::value::{Kind, RVector, RuntimeError, Scalar};

use super::require_kind;

/// `x` with the attribute set (or removed, when `value` is Null).
pub fn set_attr(
    _session: &mut Session,
    x: &RVector,
    name: Symbol,
    value: &RVector,
) -> Result<RVector, RuntimeError> {
    let mut out = x.clone();
    if value.kind() == Kind::Null {
        out.remove_attr(name);
        return Ok(out);
    }
    let value = if name == sym_names() {
        checked_names(x, value)?
    } else if name == sym_dim() {
        checked_dim(x, value)?
    } else if name == sym_dimnames() {
        checked_dimnames(x, value)?
    } else {
        value.clone()
    };
    out.set_attr_raw(name, value);
    Ok(out)
}

/// The attribute value, or Null when absent.
pub fn get_attr(_session: &mut Session, x: &RVector, name: Symbol) -> RVector {
    x.attr(name).cloned().unwrap_or_else(RVector::null)
}

fn checked_names(x: &RVector, value: &RVector) -> Result<RVector, RuntimeError> {
    require_kind(value, Kind::Character, "names")?;
    if value.len() > x.len() {
        return Err(RuntimeError::argument(format!(
            "'names' attribute [{}] must be the same length as the vector [{}]",
            value.len(),
            x.len()
        )));
    }
    if value.len() == x.len() {
        return Ok(value.clone());
    }
    // shorter names are padded with the missing sentinel
    let mut padded: Vec<Option<String>> = (0..value.len())
        .map(|i| value.string_at(i).map(str::to_owned))
        .collect();
    padded.resize(x.len(), None);
    Ok(RVector::character(padded, false))
}

fn checked_dim(x: &RVector, value: &RVector) -> Result<RVector, RuntimeError> {
    require_kind(value, Kind::Integer, "dim")?;
    let mut product: i64 = 1;
    for i in 0..value.len() {
        if value.is_na_at(i) {
            return Err(RuntimeError::argument("the dims contain missing values"));
        }
        let d = value.int_at(i);
        if d < 0 {
            return Err(RuntimeError::argument("the dims contain negative values"));
        }
        product = product.saturating_mul(d as i64);
    }
    if value.is_empty() || product != x.len() as i64 {
        return Err(RuntimeError::argument(format!(
            "dims [product {}] do not match the length of object [{}]",
            product,
            x.len()
        )));
    }
    Ok(value.drop_attributes())
}

/// One Null-or-Character entry per dimension, each matching its extent.
fn checked_dimnames(x: &RVector, value: &RVector) -> Result<RVector, RuntimeError> {
    require_kind(value, Kind::List, "dimnames")?;
    let dim = x
        .attr(sym_dim())
        .ok_or_else(|| RuntimeError::argument("'dimnames' applied to non-array"))?;
    if value.len() != dim.len() {
        return Err(RuntimeError::argument(format!(
            "length of 'dimnames' [{}] must match that of 'dims' [{}]",
            value.len(),
            dim.len()
        )));
    }
    for i in 0..value.len() {
        if let Scalar::Vector(entry) = value.get(i)? {
            if entry.kind() == Kind::Null {
                continue;
            }
            require_kind(&entry, Kind::Character, "dimnames")?;
            if entry.len() != dim.int_at(i) as usize {
                return Err(RuntimeError::argument(format!(
                    "length of 'dimnames' [{}] not equal to array extent",
                    i + 1
                )));
            }
        }
    }
    Ok(value.drop_attributes())
}

// ── Descriptors ──────────────────────────────────────────────────────
//
// Arguments: x, name (Character scalar), value. The cached entry pins
// the interned name symbol so the validation branch is resolved once.

fn name_arg(arg: &RVector) -> Result<Symbol, RuntimeError> {
    require_kind(arg, Kind::Character, "name")?;
    if arg.len() != 1 {
        return Err(RuntimeError::argument("exactly one attribute name must be given"));
    }
    match arg.string_at(0) {
        Some(s) if !s.is_empty() => Ok(Symbol::intern(s)),
        _ => Err(RuntimeError::argument("invalid attribute name")),
    }
}

fn set_attr_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    let name = name_arg(args.arg(1))?;
    set_attr(session, args.arg(0), name, args.arg(2))
}

fn set_attr_specialize(args: &CallArgs) -> Option<SpecEntry> {
    let name = name_arg(args.arg(1)).ok()?;
    Some(SpecEntry {
        guard: Guard::new([
            Predicate::KindIs(0, args.arg(0).kind()),
            Predicate::AttrNameIs(1, name),
            Predicate::KindIs(2, args.arg(2).kind()),
        ]),
        imp: |session, args| {
            // the guard pinned a valid interned name
            let name = name_arg(args.arg(1))?;
            set_attr(session, args.arg(0), name, args.arg(2))
        },
    })
}

pub static SET_ATTR: OpDescriptor = OpDescriptor {
    name: "setAttr",
    specialize: set_attr_specialize,
    fallback: set_attr_fallback,
};

fn get_attr_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    let name = name_arg(args.arg(1))?;
    Ok(get_attr(session, args.arg(0), name))
}

fn get_attr_specialize(args: &CallArgs) -> Option<SpecEntry> {
    let name = name_arg(args.arg(1)).ok()?;
    Some(SpecEntry {
        guard: Guard::new([
            Predicate::KindIs(0, args.arg(0).kind()),
            Predicate::AttrNameIs(1, name),
        ]),
        imp: |session, args| {
            let name = name_arg(args.arg(1))?;
            Ok(get_attr(session, args.arg(0), name))
        },
    })
}

pub static GET_ATTR: OpDescriptor = OpDescriptor {
    name: "getAttr",
    specialize: get_attr_specialize,
    fallback: get_attr_fallback,
};
