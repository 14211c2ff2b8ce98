//! Sampling: uniform draws from `1..=n` with and without replacement, and
//! weighted variants driven by a probability vector. Weighted draws sort a
//! parallel permutation array by weight with a binary min-heap, then draw
//! by cumulative mass; drawing without replacement removes the drawn mass
//! and compacts. Results are 1-based Integer vectors, always complete.

use crate::dispatch::{CallArgs, Guard, OpDescriptor, Predicate, SpecEntry};
use crate::session::Session;
use crate::trace::trace_log;
use crate::value::na::is_na_int;
use crate::value::{Kind, RVector, RuntimeError};

use super::require_kind;

const MSG_INVALID_FIRST: &str = "invalid first argument";
const MSG_INVALID_SIZE: &str = "invalid 'size' argument";
const MSG_LARGER_THAN_POPULATION: &str =
    "cannot take a sample larger than the population when 'replace = FALSE'";
const MSG_INCORRECT_NUM_PROB: &str = "incorrect number of probabilities";
const MSG_NA_IN_PROB: &str = "NA in probability vector";
const MSG_NEGATIVE_PROB: &str = "non-positive probability";
const MSG_TOO_FEW_POSITIVE: &str = "too few positive probabilities";

fn check_common(n: i32, size: i32, replace: bool) -> Result<(), RuntimeError> {
    if is_na_int(n) || n < 0 || (size > 0 && n == 0) {
        return Err(RuntimeError::argument(MSG_INVALID_FIRST));
    }
    if is_na_int(size) || size < 0 {
        return Err(RuntimeError::argument(MSG_INVALID_SIZE));
    }
    if !replace && size > n {
        return Err(RuntimeError::argument(MSG_LARGER_THAN_POPULATION));
    }
    Ok(())
}

/// Uniform sampling of `size` values from `1..=n`.
pub fn sample(
    session: &mut Session,
    n: i32,
    size: i32,
    replace: bool,
) -> Result<RVector, RuntimeError> {
    check_common(n, size, replace)?;
    trace_log!("sample", "uniform n={} size={} replace={}", n, size, replace);
    let size = size as usize;
    let mut result = Vec::with_capacity(size);
    if replace || size < 2 {
        // independent draws; no scratch array needed for a single sample
        for _ in 0..size {
            result.push((n as f64 * session.rng.unif_rand()) as i32 + 1);
        }
    } else {
        // partial Fisher-Yates over a scratch index array
        let mut ix: Vec<i32> = (0..n).collect();
        let mut remaining = n as usize;
        for _ in 0..size {
            let j = session.rng.unif_index(remaining);
            result.push(ix[j] + 1);
            remaining -= 1;
            ix[j] = ix[remaining];
        }
    }
    Ok(RVector::int(result, true))
}

/// Validate and normalize a probability array in place.
fn fixup_probability(
    prob: &mut [f64],
    size: i32,
    replace: bool,
) -> Result<(), RuntimeError> {
    let mut positive = 0usize;
    let mut sum = 0.0;
    for &p in prob.iter() {
        if !p.is_finite() {
            return Err(RuntimeError::argument(MSG_NA_IN_PROB));
        }
        if p < 0.0 {
            return Err(RuntimeError::argument(MSG_NEGATIVE_PROB));
        }
        if p > 0.0 {
            sum += p;
            positive += 1;
        }
    }
    if positive == 0 || (!replace && size as usize > positive) {
        return Err(RuntimeError::argument(MSG_TOO_FEW_POSITIVE));
    }
    for p in prob.iter_mut() {
        *p /= sum;
    }
    Ok(())
}

/// Weighted sampling of `size` values from `1..=n` with weight vector
/// `prob` of length `n`.
pub fn sample_prob(
    session: &mut Session,
    n: i32,
    size: i32,
    replace: bool,
    prob: &RVector,
) -> Result<RVector, RuntimeError> {
    check_common(n, size, replace)?;
    require_kind(prob, Kind::Double, "prob")?;
    if prob.len() != n as usize {
        return Err(RuntimeError::argument(MSG_INCORRECT_NUM_PROB));
    }
    let mut weights: Vec<f64> = (0..prob.len()).map(|i| prob.as_double_at(i)).collect();
    fixup_probability(&mut weights, size, replace)?;
    trace_log!("sample", "weighted n={} size={} replace={}", n, size, replace);
    let result = if replace {
        prob_sample_replace(session, &mut weights, size as usize)
    } else {
        prob_sample_without_replace(session, &mut weights, size as usize)
    };
    Ok(RVector::int(result, true))
}

/// First index carrying any mass. Ascending order puts zero weights in a
/// prefix; the cumulative scan must start past it, or a draw of exactly
/// 0.0 would land on an index with no mass.
fn zero_prefix(prob: &[f64]) -> usize {
    prob.iter().position(|&p| p > 0.0).unwrap_or(0)
}

fn prob_sample_replace(session: &mut Session, prob: &mut [f64], size: usize) -> Vec<i32> {
    let n = prob.len();
    let mut perm: Vec<i32> = (1..=n as i32).collect();
    heap_sort(&mut perm, prob);
    let first = zero_prefix(prob);
    for i in 1..n {
        prob[i] += prob[i - 1];
    }
    let mut result = Vec::with_capacity(size);
    for _ in 0..size {
        let r_u = session.rng.unif_rand();
        let mut j = first;
        while j < n - 1 && r_u > prob[j] {
            j += 1;
        }
        result.push(perm[j]);
    }
    result
}

fn prob_sample_without_replace(
    session: &mut Session,
    prob: &mut [f64],
    size: usize,
) -> Vec<i32> {
    let n = prob.len();
    let mut perm: Vec<i32> = (1..=n as i32).collect();
    heap_sort(&mut perm, prob);
    let mut total_mass = 1.0;
    let mut result = Vec::with_capacity(size);
    let mut live = n;
    for _ in 0..size {
        let r_t = total_mass * session.rng.unif_rand();
        let mut j = zero_prefix(&prob[..live]);
        let mut mass = prob[j];
        while j < live - 1 && r_t > mass {
            j += 1;
            mass += prob[j];
        }
        result.push(perm[j]);
        total_mass -= prob[j];
        // remove the drawn mass and compact
        for k in j..live - 1 {
            prob[k] = prob[k + 1];
            perm[k] = perm[k + 1];
        }
        live -= 1;
    }
    result
}

// ── Binary min-heap over the weight array with a parallel permutation
// array: O(N log N) construction, O(log N) per sift ───────────────────

fn heap_sort(values: &mut [i32], keys: &mut [f64]) {
    build_heap(keys, values);
    for i in (1..keys.len()).rev() {
        exchange(keys, values, 0, i);
        min_heapify(keys, values, 0, i);
    }
    // successive minima landed at the back; ascending order wants them first
    keys.reverse();
    values.reverse();
}

fn build_heap(keys: &mut [f64], values: &mut [i32]) {
    for i in (0..=(keys.len() >> 1)).rev() {
        min_heapify(keys, values, i, keys.len());
    }
}

fn min_heapify(keys: &mut [f64], values: &mut [i32], current: usize, heap_size: usize) {
    let left = current << 1;
    let right = left + 1;
    let mut lowest = current;
    if left < heap_size && keys[left] < keys[lowest] {
        lowest = left;
    }
    if right < heap_size && keys[right] < keys[lowest] {
        lowest = right;
    }
    if lowest != current {
        exchange(keys, values, current, lowest);
        min_heapify(keys, values, lowest, heap_size);
    }
}

fn exchange(keys: &mut [f64], values: &mut [i32], i: usize, j: usize) {
    keys.swap(i, j);
    values.swap(i, j);
}

// ── Descriptor ───────────────────────────────────────────────────────
//
// Arguments arrive as vectors: n, size (Integer scalars), replace
// (Logical scalar), prob (Double vector or Null).

fn scalar_int_raw(arg: &RVector, what: &str) -> Result<i32, RuntimeError> {
    require_kind(arg, Kind::Integer, what)?;
    if arg.is_empty() {
        return Err(RuntimeError::argument(format!("invalid '{}' value", what)));
    }
    Ok(arg.int_at(0))
}

fn scalar_replace(arg: &RVector) -> Result<bool, RuntimeError> {
    require_kind(arg, Kind::Logical, "replace")?;
    if arg.is_empty() || arg.is_na_at(0) {
        return Err(RuntimeError::argument("invalid 'replace' value"));
    }
    Ok(arg.logical_at(0) == crate::value::na::LOGICAL_TRUE)
}

fn sample_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    // NA in n or size is diagnosed by check_common, not here
    let n = scalar_int_raw(args.arg(0), "x")?;
    let size = scalar_int_raw(args.arg(1), "size")?;
    let replace = scalar_replace(args.arg(2))?;
    let prob = args.arg(3);
    match prob.kind() {
        Kind::Null => sample(session, n, size, replace),
        _ => sample_prob(session, n, size, replace, prob),
    }
}

fn sample_specialize(args: &CallArgs) -> Option<SpecEntry> {
    let scalar_ok = |a: &RVector, kind: Kind| a.kind() == kind && a.len() == 1 && a.is_complete();
    if scalar_ok(args.arg(0), Kind::Integer)
        && scalar_ok(args.arg(1), Kind::Integer)
        && scalar_ok(args.arg(2), Kind::Logical)
        && args.arg(3).kind() == Kind::Null
    {
        // uniform path: skip the probability machinery entirely
        Some(SpecEntry {
            guard: Guard::new([
                Predicate::KindIs(0, Kind::Integer),
                Predicate::IsScalar(0),
                Predicate::IsComplete(0),
                Predicate::KindIs(1, Kind::Integer),
                Predicate::IsScalar(1),
                Predicate::IsComplete(1),
                Predicate::KindIs(2, Kind::Logical),
                Predicate::IsScalar(2),
                Predicate::IsComplete(2),
                Predicate::KindIs(3, Kind::Null),
            ]),
            imp: |session, args| {
                let n = args.arg(0).int_at(0);
                let size = args.arg(1).int_at(0);
                let replace =
                    args.arg(2).logical_at(0) == crate::value::na::LOGICAL_TRUE;
                sample(session, n, size, replace)
            },
        })
    } else {
        None
    }
}

pub static SAMPLE: OpDescriptor = OpDescriptor {
    name: "sample",
    specialize: sample_specialize,
    fallback: sample_fallback,
};
