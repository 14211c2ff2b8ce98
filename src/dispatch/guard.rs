//! Guard predicates: cheap, side-effect-free facts about the current
//! arguments that decide whether a cached fast path applies.
//!
//! A guard must be reproducible verbatim on every call for the lifetime of
//! its cache entry. Predicates therefore read only the arguments handed to
//! the call, never mutable external state. The one special family is the
//! identity predicate over interned attribute-name symbols, synthesized by
//! argument-matching-style caches; it is flagged so the call site can
//! watch it for instability.

use smallvec::SmallVec;

use crate::symbol::Symbol;
use crate::value::{Kind, RVector, Repr};

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Argument `slot` has this kind.
    KindIs(usize, Kind),
    /// Argument `slot` has length 1.
    IsScalar(usize),
    /// Argument `slot` has length != 1.
    IsNotScalar(usize),
    /// Argument `slot` carries no attribute map.
    AttrFree(usize),
    /// Argument `slot` carries at least one attribute.
    HasAttrs(usize),
    /// Argument `slot` has this exact concrete representation
    /// (materialized array vs. compact sequence).
    ReprIs(usize, Repr),
    /// Argument `slot` has its completeness flag set.
    IsComplete(usize),
    /// Argument `slot` has its completeness flag cleared.
    IsNotComplete(usize),
    /// Arguments `a` and `b` have equal lengths.
    SameLength(usize, usize),
    /// Argument `slot` is a character scalar naming exactly this interned
    /// symbol. Identity-stability predicate.
    AttrNameIs(usize, Symbol),
}

impl Predicate {
    pub fn holds(&self, args: &[&RVector]) -> bool {
        match *self {
            Predicate::KindIs(slot, kind) => args.get(slot).is_some_and(|a| a.kind() == kind),
            Predicate::IsScalar(slot) => args.get(slot).is_some_and(|a| a.len() == 1),
            Predicate::IsNotScalar(slot) => args.get(slot).is_some_and(|a| a.len() != 1),
            Predicate::AttrFree(slot) => args.get(slot).is_some_and(|a| !a.has_attributes()),
            Predicate::HasAttrs(slot) => args.get(slot).is_some_and(|a| a.has_attributes()),
            Predicate::ReprIs(slot, repr) => args.get(slot).is_some_and(|a| a.repr() == repr),
            Predicate::IsComplete(slot) => args.get(slot).is_some_and(|a| a.is_complete()),
            Predicate::IsNotComplete(slot) => args.get(slot).is_some_and(|a| !a.is_complete()),
            Predicate::SameLength(a, b) => match (args.get(a), args.get(b)) {
                (Some(x), Some(y)) => x.len() == y.len(),
                _ => false,
            },
            Predicate::AttrNameIs(slot, sym) => args.get(slot).is_some_and(|a| {
                a.kind() == Kind::Character
                    && a.len() == 1
                    && a.string_at(0).map(Symbol::intern) == Some(sym)
            }),
        }
    }

    fn is_identity(&self) -> bool {
        matches!(self, Predicate::AttrNameIs(..))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Guard {
    preds: SmallVec<[Predicate; 8]>,
}

impl Guard {
    pub fn new(preds: impl IntoIterator<Item = Predicate>) -> Self {
        Self {
            preds: preds.into_iter().collect(),
        }
    }

    /// The generic shape guard for the current arguments: per slot, kind,
    /// scalar-ness, attribute presence and concrete representation. Two
    /// calls have the same shape iff the guard synthesized for one matches
    /// the arguments of the other.
    pub fn for_shapes(args: &[&RVector]) -> Self {
        let mut preds = SmallVec::new();
        for (slot, arg) in args.iter().enumerate() {
            preds.push(Predicate::KindIs(slot, arg.kind()));
            preds.push(if arg.len() == 1 {
                Predicate::IsScalar(slot)
            } else {
                Predicate::IsNotScalar(slot)
            });
            preds.push(if arg.has_attributes() {
                Predicate::HasAttrs(slot)
            } else {
                Predicate::AttrFree(slot)
            });
            preds.push(Predicate::ReprIs(slot, arg.repr()));
        }
        Self { preds }
    }

    pub fn and(mut self, pred: Predicate) -> Self {
        self.preds.push(pred);
        self
    }

    pub fn matches(&self, args: &[&RVector]) -> bool {
        self.preds.iter().all(|p| p.holds(args))
    }

    /// Whether any predicate depends on argument identity rather than
    /// shape. The call site watches such entries for instability.
    pub fn has_identity_predicate(&self) -> bool {
        self.preds.iter().any(|p| p.is_identity())
    }
}
