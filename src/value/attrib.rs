//! Ordered attribute table.
//!
//! Attribute maps are small (names, dim, dimnames, class and rarely much
//! more), so entries live in an inline-capacity vector and keep insertion
//! order. Lookup compares interned symbols, one word each.

use smallvec::SmallVec;

use crate::symbol::Symbol;

use super::RVector;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrTable {
    entries: SmallVec<[(Symbol, RVector); 4]>,
}

impl AttrTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: Symbol) -> Option<&RVector> {
        self.entries
            .iter()
            .find(|(sym, _)| *sym == name)
            .map(|(_, v)| v)
    }

    /// Insert or overwrite, keeping the position of an existing entry.
    pub fn set(&mut self, name: Symbol, value: RVector) {
        for (sym, slot) in self.entries.iter_mut() {
            if *sym == name {
                *slot = value;
                return;
            }
        }
        self.entries.push((name, value));
    }

    pub fn remove(&mut self, name: Symbol) -> Option<RVector> {
        let pos = self.entries.iter().position(|(sym, _)| *sym == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &RVector)> {
        self.entries.iter().map(|(sym, v)| (*sym, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{sym_dim, sym_names};

    #[test]
    fn set_get_remove() {
        let mut t = AttrTable::new();
        assert!(t.is_empty());
        t.set(sym_names(), RVector::from_strings(vec![Some("a".into())]));
        t.set(sym_dim(), RVector::from_ints(vec![1]));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(sym_names()).unwrap().len(), 1);
        assert!(t.remove(sym_names()).is_some());
        assert!(t.get(sym_names()).is_none());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut t = AttrTable::new();
        t.set(sym_names(), RVector::from_ints(vec![1]));
        t.set(sym_dim(), RVector::from_ints(vec![1]));
        t.set(sym_names(), RVector::from_ints(vec![2]));
        let order: Vec<Symbol> = t.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec![sym_names(), sym_dim()]);
    }
}
