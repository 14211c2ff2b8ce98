//! Adaptive specialization dispatch.
//!
//! Every builtin call site owns one [`CallSite`]: an ordered list of
//! guarded fast-path entries plus the operation's generic fallback. The
//! site starts empty, grows one entry per distinct argument shape, and
//! collapses permanently to the fallback once a bounded number of shapes
//! has been seen or a previously matching guard proves unstable.
//!
//! The cache changes latency only. For any call sequence the results,
//! completeness flags, attributes and warnings are identical to running
//! the fallback every time; synthesized fast paths are obliged to uphold
//! that, and a specialized path unsure of its applicability must fail its
//! guard instead of raising an error the fallback would not raise.

mod guard;

pub use guard::{Guard, Predicate};

use crate::session::Session;
use crate::trace::trace_log;
use crate::value::{RVector, RuntimeError};

/// Arguments at one invocation. Operations with non-vector parameters
/// (counts, flags, probabilities) receive them as vectors too, which is
/// what makes one guard vocabulary serve every operation.
pub struct CallArgs<'a> {
    pub args: &'a [&'a RVector],
}

impl<'a> CallArgs<'a> {
    pub fn new(args: &'a [&'a RVector]) -> Self {
        Self { args }
    }

    pub fn arg(&self, i: usize) -> &RVector {
        self.args[i]
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

pub type OpImpl = fn(&mut Session, &CallArgs) -> Result<RVector, RuntimeError>;

/// A guard/implementation pair produced by an operation's specializer.
/// The two are built together so an implementation can never be cached
/// under a guard that admits shapes it does not handle.
pub struct SpecEntry {
    pub guard: Guard,
    pub imp: OpImpl,
}

/// A builtin operation: its specializer (may decline) and its generic
/// fallback (never declines).
pub struct OpDescriptor {
    pub name: &'static str,
    pub specialize: fn(&CallArgs) -> Option<SpecEntry>,
    pub fallback: OpImpl,
}

#[derive(Debug, Clone, Copy)]
pub struct SiteConfig {
    /// Distinct call shapes tolerated before the site generalizes. The
    /// cache holds at most `max_shapes - 1` guarded entries; the
    /// `max_shapes`-th distinct shape installs the fallback.
    pub max_shapes: usize,
    /// Consecutive misses of a previously matching identity guard before
    /// the site is declared unstable and generalizes.
    pub instability_limit: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            max_shapes: 12,
            instability_limit: 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteState {
    Unspecialized,
    Specializing,
    Generalized,
}

struct Entry {
    guard: Guard,
    imp: OpImpl,
    hits: u64,
    miss_streak: u32,
}

/// One occurrence of one operation. Owned by the caller and passed by
/// `&mut`, never shared between call sites.
pub struct CallSite {
    op: &'static OpDescriptor,
    config: SiteConfig,
    state: SiteState,
    entries: Vec<Entry>,
}

impl CallSite {
    pub fn new(op: &'static OpDescriptor) -> Self {
        Self::with_config(op, SiteConfig::default())
    }

    pub fn with_config(op: &'static OpDescriptor, config: SiteConfig) -> Self {
        Self {
            op,
            config,
            state: SiteState::Unspecialized,
            entries: Vec::new(),
        }
    }

    pub fn state(&self) -> SiteState {
        self.state
    }

    /// Live entries: the guarded fast paths, or one once generalized.
    pub fn entry_count(&self) -> usize {
        match self.state {
            SiteState::Generalized => 1,
            _ => self.entries.len(),
        }
    }

    pub fn op_name(&self) -> &'static str {
        self.op.name
    }

    pub fn call(
        &mut self,
        session: &mut Session,
        args: &[&RVector],
    ) -> Result<RVector, RuntimeError> {
        let call_args = CallArgs::new(args);
        if self.state == SiteState::Generalized {
            return (self.op.fallback)(session, &call_args);
        }

        // Entries are tried in insertion order; the first whose guard
        // holds wins.
        let mut matched = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.guard.matches(args) {
                matched = Some(idx);
                break;
            }
        }

        match matched {
            Some(idx) => {
                if self.note_misses(idx) {
                    return self.generalize_and_run(session, &call_args, "unstable guard");
                }
                let entry = &mut self.entries[idx];
                entry.hits += 1;
                entry.miss_streak = 0;
                (entry.imp)(session, &call_args)
            }
            None => {
                if self.note_misses(self.entries.len()) {
                    return self.generalize_and_run(session, &call_args, "unstable guard");
                }
                if self.entries.len() + 1 >= self.config.max_shapes {
                    return self.generalize_and_run(session, &call_args, "shape bound reached");
                }
                self.append_entry(session, &call_args)
            }
        }
    }

    /// Record a miss for every identity-guarded entry that was evaluated
    /// before position `upto` and had matched before. Returns true when
    /// some streak crossed the instability limit.
    fn note_misses(&mut self, upto: usize) -> bool {
        let mut unstable = false;
        for entry in self.entries.iter_mut().take(upto) {
            if entry.hits > 0 && entry.guard.has_identity_predicate() {
                entry.miss_streak += 1;
                if entry.miss_streak >= self.config.instability_limit {
                    unstable = true;
                }
            }
        }
        unstable
    }

    fn append_entry(
        &mut self,
        session: &mut Session,
        call_args: &CallArgs,
    ) -> Result<RVector, RuntimeError> {
        let entry = match (self.op.specialize)(call_args) {
            Some(spec) => Entry {
                guard: spec.guard,
                imp: spec.imp,
                hits: 1,
                miss_streak: 0,
            },
            // No fast path for this shape: cache the fallback under the
            // generic shape guard so the shape still counts toward the
            // bound and later identical calls skip the specializer.
            None => Entry {
                guard: Guard::for_shapes(call_args.args),
                imp: self.op.fallback,
                hits: 1,
                miss_streak: 0,
            },
        };
        trace_log!(
            "dispatch",
            "{}: new entry #{} for current shapes",
            self.op.name,
            self.entries.len()
        );
        let imp = entry.imp;
        self.entries.push(entry);
        self.state = SiteState::Specializing;
        imp(session, call_args)
    }

    fn generalize_and_run(
        &mut self,
        session: &mut Session,
        call_args: &CallArgs,
        reason: &str,
    ) -> Result<RVector, RuntimeError> {
        trace_log!(
            "dispatch",
            "{}: generalizing after {} entries ({})",
            self.op.name,
            self.entries.len(),
            reason
        );
        self.entries.clear();
        self.state = SiteState::Generalized;
        (self.op.fallback)(session, call_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;

    // A toy operation: length of the first argument, as an integer scalar.
    fn toy_fallback(_session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
        Ok(RVector::scalar_int(args.arg(0).len() as i32))
    }

    fn toy_specialize(args: &CallArgs) -> Option<SpecEntry> {
        if args.arg(0).kind() == Kind::Integer {
            Some(SpecEntry {
                guard: Guard::for_shapes(args.args),
                imp: toy_fallback,
            })
        } else {
            None
        }
    }

    static TOY: OpDescriptor = OpDescriptor {
        name: "toy",
        specialize: toy_specialize,
        fallback: toy_fallback,
    };

    #[test]
    fn site_starts_unspecialized_and_grows() {
        let mut session = Session::new();
        let mut site = CallSite::new(&TOY);
        assert_eq!(site.state(), SiteState::Unspecialized);

        let a = RVector::from_ints(vec![1, 2]);
        site.call(&mut session, &[&a]).unwrap();
        assert_eq!(site.state(), SiteState::Specializing);
        assert_eq!(site.entry_count(), 1);

        // Same shape: no growth.
        let b = RVector::from_ints(vec![3, 4]);
        site.call(&mut session, &[&b]).unwrap();
        assert_eq!(site.entry_count(), 1);

        // New shape: one more entry.
        let c = RVector::from_doubles(vec![1.0]);
        site.call(&mut session, &[&c]).unwrap();
        assert_eq!(site.entry_count(), 2);
    }

    #[test]
    fn kth_distinct_shape_generalizes() {
        let mut session = Session::new();
        let mut site = CallSite::with_config(
            &TOY,
            SiteConfig {
                max_shapes: 3,
                instability_limit: 64,
            },
        );
        let a = RVector::from_ints(vec![1, 2]);
        let b = RVector::from_doubles(vec![1.0, 2.0]);
        let c = RVector::from_logicals(vec![1, 0]);
        site.call(&mut session, &[&a]).unwrap();
        site.call(&mut session, &[&b]).unwrap();
        assert_eq!(site.state(), SiteState::Specializing);
        site.call(&mut session, &[&c]).unwrap();
        assert_eq!(site.state(), SiteState::Generalized);
        assert_eq!(site.entry_count(), 1);
        // Terminal: later shapes do not grow it.
        site.call(&mut session, &[&a]).unwrap();
        assert_eq!(site.state(), SiteState::Generalized);
        assert_eq!(site.entry_count(), 1);
    }

    #[test]
    fn results_match_fallback_for_every_state() {
        let mut session = Session::new();
        let mut site = CallSite::new(&TOY);
        let shapes = [
            RVector::from_ints(vec![1, 2, 3]),
            RVector::from_doubles(vec![1.0]),
            RVector::from_ints(vec![9]),
        ];
        for v in &shapes {
            let cached = site.call(&mut session, &[v]).unwrap();
            let direct = toy_fallback(&mut session, &CallArgs::new(&[v])).unwrap();
            assert!(cached.identical(&direct));
        }
    }
}
