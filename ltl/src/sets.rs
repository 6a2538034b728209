//! Elementary-set enumeration (spec.md §4.2): the maximal consistent subsets
//! of the closure of the formula, i.e. the candidate GNBA states.

use std::collections::BTreeSet;

use itertools::Itertools;

use bitset::{StateSet, TriggerSet};

use crate::error::{Error, Result};
use crate::formula::{Fid, FormulaKind, Formulas};

/// A bit-vector of length `M` (the number of formulas), indexed
/// negation-aware per spec.md §3.3: `set[id] = ¬set[original(id)]` for a
/// negative id, with `TRUE`/`FALSE` hard-wired.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementarySet {
    bits: StateSet,
}

impl ElementarySet {
    pub fn new(num_formulas: usize) -> Self {
        ElementarySet {
            bits: StateSet::new(num_formulas),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Direct, non-negation-aware read of formula index `i`.
    pub fn get_index(&self, i: usize) -> bool {
        self.bits.get(i)
    }

    pub fn set_index(&mut self, i: usize, value: bool) {
        self.bits.set(i, value);
    }

    /// Negation-aware read by [`Fid`].
    pub fn get(&self, f: Fid) -> bool {
        if f == Fid::TRUE {
            return true;
        }
        if f == Fid::FALSE {
            return false;
        }
        if f.is_negation() {
            !self.get_index(f.original())
        } else {
            self.get_index(f.original())
        }
    }

    /// Project onto the first `num_ap` bits, masked to the atomic
    /// propositions the formula actually uses — the automaton trigger for
    /// this set (spec.md §4.3).
    pub fn trigger(&self, num_ap: usize, used_ap_mask: &TriggerSet) -> TriggerSet {
        self.bits.prefix(num_ap) & *used_ap_mask
    }

    pub fn as_state_set(&self) -> &StateSet {
        &self.bits
    }
}

/// Result of enumerating the elementary sets of a formula's closure.
pub struct ElementarySets {
    pub sets: Vec<ElementarySet>,
    pub used_ap_mask: TriggerSet,
}

/// Enumeration cap from spec.md §4.2/§9: a practical bound, not a semantic
/// one. Formulas whose free/uncertain index count reaches this fail fast
/// with a user-facing error rather than silently taking exponential time.
const MAX_ENUMERATED_INDICES: usize = 32;

/// Enumerate the elementary sets of `formulas`' closure (spec.md §4.2).
///
/// `root` is the (possibly negated) formula the closure is being built for.
/// Every non-atomic formula's atomic operands are reachable by scanning
/// `formulas[num_ap..]`, since the DAG only ever contains what is reachable
/// from some root — except when the root itself is a bare atomic (or its
/// negation), which then never appears as anyone else's operand. `root` is
/// seeded explicitly to cover that case.
pub fn build_elementary_sets(formulas: &Formulas, root: Fid) -> Result<ElementarySets> {
    let num_ap = formulas.num_ap();
    let m = formulas.len();

    let mut used_ap = TriggerSet::new(num_ap);
    let mut indices: BTreeSet<usize> = BTreeSet::new();

    let mut note_ap = |fid: Fid, used_ap: &mut TriggerSet, indices: &mut BTreeSet<usize>| {
        let n = fid.original();
        if n < num_ap {
            used_ap.set(n, true);
            indices.insert(n);
        }
    };

    note_ap(root, &mut used_ap, &mut indices);

    for i in num_ap..m {
        let f = formulas.get(i);
        note_ap(f.lhs().expect("non-atomic formula has an operand"), &mut used_ap, &mut indices);
        if let Some(rhs) = f.rhs() {
            note_ap(rhs, &mut used_ap, &mut indices);
        }
        if f.is_uncertain() {
            indices.insert(i);
        }
    }

    let indices: Vec<usize> = indices.into_iter().collect();
    if indices.len() >= MAX_ENUMERATED_INDICES {
        return Err(Error::TooManyIndices(indices.len()));
    }

    let mut sets = Vec::new();
    let total: usize = 1 << indices.len();
    for subset in indices.iter().copied().powerset() {
        let mut candidate = ElementarySet::new(m);
        for idx in subset {
            candidate.set_index(idx, true);
        }
        if propagate_and_check(formulas, num_ap, &mut candidate) {
            sets.push(candidate);
        }
    }

    log::debug!(
        "elementary-set enumeration: {} free indices, {} consistent sets out of {}",
        indices.len(),
        sets.len(),
        total
    );

    Ok(ElementarySets {
        sets,
        used_ap_mask: used_ap,
    })
}

/// Traverse `formulas` in increasing index order, deriving `CONJ` bits and
/// checking the two `UNTIL` consistency conditions from spec.md §3.3.
/// Returns `false` (reject the candidate assignment) on the first violation.
fn propagate_and_check(formulas: &Formulas, num_ap: usize, set: &mut ElementarySet) -> bool {
    for i in num_ap..formulas.len() {
        match formulas.get(i) {
            FormulaKind::Conj(a, b) => {
                let value = set.get(*a) && set.get(*b);
                set.set_index(i, value);
            }
            FormulaKind::Until(a, b) => {
                let cur = set.get_index(i);
                let lhs = set.get(*a);
                let rhs = set.get(*b);
                if !cur && rhs {
                    return false;
                }
                if cur && !lhs && !rhs {
                    return false;
                }
            }
            FormulaKind::Atomic(_) | FormulaKind::Next(_) => {
                // Freely chosen by the enumeration; no local constraint.
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Collector;
    use crate::parse_tree::Node;
    use std::collections::HashMap;

    fn ap(names: &[&str]) -> HashMap<String, usize> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), i))
            .collect()
    }

    #[test]
    fn conjunction_elementary_sets() {
        let names = ap(&["a", "b"]);
        let root = Node::parse("a & b").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let result = build_elementary_sets(&formulas, root_id).unwrap();

        // a, b, and (a & b) are all free-or-derived over {a, b}: exactly the
        // four combinations of a and b survive, each with the conjunction
        // bit fixed by propagation.
        assert_eq!(result.sets.len(), 4);
        for s in &result.sets {
            let expect_conj = s.get(Fid::atomic(0)) && s.get(Fid::atomic(1));
            assert_eq!(s.get(root_id), expect_conj);
        }
    }

    #[test]
    fn until_consistency_is_enforced() {
        let names = ap(&["a", "b"]);
        let root = Node::parse("a U b").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let result = build_elementary_sets(&formulas, root_id).unwrap();

        for s in &result.sets {
            let until_true = s.get(root_id);
            let a = s.get(Fid::atomic(0));
            let b = s.get(Fid::atomic(1));
            // ¬(¬until ∧ b) and ¬(until ∧ ¬a ∧ ¬b)
            assert!(!(!until_true && b));
            assert!(!(until_true && !a && !b));
        }
    }

    #[test]
    fn used_ap_mask_only_covers_referenced_atomics() {
        // `b` never appears in the formula even though it might be part of a
        // larger AP universe handed in by the transition system.
        let names = ap(&["a", "b"]);
        let root = Node::parse("a").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let result = build_elementary_sets(&formulas, root_id).unwrap();
        assert!(result.used_ap_mask.get(0));
        assert!(!result.used_ap_mask.get(1));
    }

    #[test]
    fn too_many_indices_is_rejected() {
        let names: HashMap<String, usize> = (0..40)
            .map(|i| (format!("p{i}"), i))
            .collect();
        let conj_all = (0..40)
            .map(|i| Node::Atomic(format!("p{i}")))
            .reduce(|a, b| a.conj(b))
            .unwrap();
        let (formulas, root_id) = Collector::collect(&conj_all, &names).unwrap();
        assert!(matches!(
            build_elementary_sets(&formulas, root_id),
            Err(Error::TooManyIndices(_))
        ));
    }
}
