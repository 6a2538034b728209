//! Generalized Büchi automaton construction from an LTL formula DAG
//! (spec.md §4.3), following the Vardi-Wolper tableau: states are the
//! elementary sets of the formula's closure, and a state's own elementary
//! set also serves as the trigger (AP label) that must hold for the
//! transition-system step the state is matched against.

use bitset::{StateSet, TriggerSet};
use ltl::{build_elementary_sets, ElementarySet, Fid, FormulaKind, Formulas};

/// A state's single outgoing edge: the trigger it requires of the current
/// transition-system step, and the set of states it may move to.
#[derive(Clone, Debug)]
pub struct Edge {
    pub trigger: TriggerSet,
    pub targets: StateSet,
}

/// A generalized non-deterministic Büchi automaton: like an NBA but with
/// zero or more acceptance sets, all of which must be visited infinitely
/// often for a run to be accepting (spec.md §4.3/§4.4).
#[derive(Clone, Debug)]
pub struct Gnba {
    pub num_states: usize,
    pub num_triggers: usize,
    pub initial_states: StateSet,
    pub transitions: Vec<Edge>,
    pub used_ap_mask: TriggerSet,
    pub final_states_list: Vec<StateSet>,
}

impl Gnba {
    /// Build the GNBA for `root` (or its negation, when `negate` is set —
    /// the nested-DFS emptiness check verifies a transition system against
    /// `¬φ`, not `φ`, per spec.md §4.6) over `formulas`. Fails with
    /// [`ltl::Error::TooManyIndices`] if the closure has too many free
    /// indices to enumerate.
    pub fn build(formulas: &Formulas, root: Fid, negate: bool) -> ltl::Result<Gnba> {
        let root = if negate { !root } else { root };

        let elementary = build_elementary_sets(formulas, root)?;
        let sets = elementary.sets;
        let used_ap_mask = elementary.used_ap_mask;
        let size = sets.len();
        let num_ap = formulas.num_ap();

        log::debug!("GNBA construction: {} states, {} atomic propositions", size, num_ap);

        let initial_states: StateSet = sets.iter().map(|s| s.get(root)).collect_state_set(size);

        let transitions: Vec<Edge> = (0..size)
            .map(|i| {
                let trigger = sets[i].trigger(num_ap, &used_ap_mask);
                let visit = VisitHelper::build(formulas, num_ap, &sets[i]);
                let mut targets = StateSet::new(size);
                if !visit.always_reject() {
                    for j in 0..size {
                        if visit.accept(&sets[j]) {
                            targets.set(j, true);
                        }
                    }
                }
                debug_assert!(
                    (0..size).all(|j| can_visit(formulas, num_ap, &sets[i], &sets[j]) == targets.get(j)),
                    "transition construction disagrees with can_visit"
                );
                Edge { trigger, targets }
            })
            .collect();

        let final_states_list = (num_ap..formulas.len())
            .filter_map(|i| match formulas.get(i) {
                FormulaKind::Until(_, rhs) => {
                    let rhs = *rhs;
                    let mut final_set = StateSet::new(size);
                    for j in 0..size {
                        if !sets[j].get_index(i) || sets[j].get(rhs) {
                            final_set.set(j, true);
                        }
                    }
                    Some(final_set)
                }
                _ => None,
            })
            .collect();

        Ok(Gnba {
            num_states: size,
            num_triggers: num_ap,
            initial_states,
            transitions,
            used_ap_mask,
            final_states_list,
        })
    }
}

trait CollectStateSet {
    fn collect_state_set(self, len: usize) -> StateSet;
}

impl<I: Iterator<Item = bool>> CollectStateSet for I {
    fn collect_state_set(self, len: usize) -> StateSet {
        let mut out = StateSet::new(len);
        for (i, value) in self.enumerate() {
            out.set(i, value);
        }
        out
    }
}

/// A debug-only, directly-legible restatement of `VisitHelper`'s NEXT/UNTIL
/// logic, used to cross-check the (faster) requirement-bitset construction.
fn can_visit(formulas: &Formulas, num_ap: usize, x: &ElementarySet, y: &ElementarySet) -> bool {
    for i in num_ap..formulas.len() {
        match formulas.get(i) {
            FormulaKind::Next(a) => {
                if x.get_index(i) != y.get(*a) {
                    return false;
                }
            }
            FormulaKind::Until(a, b) => {
                if x.get(*b) {
                    continue;
                }
                if x.get_index(i) {
                    debug_assert!(x.get(*a), "until consistency violated: lhs must hold");
                    if !y.get_index(i) {
                        return false;
                    }
                    continue;
                }
                if x.get(*a) && y.get_index(i) {
                    return false;
                }
            }
            FormulaKind::Atomic(_) | FormulaKind::Conj(_, _) => {}
        }
    }
    true
}

/// Computes, for a given elementary set `x`, the requirements a successor
/// set must satisfy on its NEXT/UNTIL bits.
struct VisitHelper {
    require: StateSet,
    indices: StateSet,
    early_reject: bool,
}

impl VisitHelper {
    fn build(formulas: &Formulas, num_ap: usize, x: &ElementarySet) -> Self {
        let m = formulas.len();
        let mut require = StateSet::new(m);
        let mut indices = StateSet::new(m);
        let mut early_reject = false;

        for i in num_ap..m {
            if early_reject {
                break;
            }
            match formulas.get(i) {
                FormulaKind::Next(a) => {
                    if *a == Fid::TRUE {
                        continue;
                    }
                    if *a == Fid::FALSE {
                        early_reject = true;
                        continue;
                    }
                    let value = a.is_negation() ^ x.get_index(i);
                    insert(&mut indices, &mut require, &mut early_reject, a.original(), value);
                }
                FormulaKind::Until(a, b) => {
                    if x.get(*b) {
                        continue;
                    }
                    if x.get_index(i) {
                        debug_assert!(x.get(*a), "until consistency violated: lhs must hold");
                        insert(&mut indices, &mut require, &mut early_reject, i, true);
                        continue;
                    }
                    if x.get(*a) {
                        insert(&mut indices, &mut require, &mut early_reject, i, false);
                    }
                }
                FormulaKind::Atomic(_) | FormulaKind::Conj(_, _) => {}
            }
        }

        VisitHelper { require, indices, early_reject }
    }

    fn always_reject(&self) -> bool {
        self.early_reject
    }

    fn accept(&self, y: &ElementarySet) -> bool {
        if self.early_reject {
            return false;
        }
        (0..self.indices.len()).all(|i| !self.indices.get(i) || y.get_index(i) == self.require.get(i))
    }
}

fn insert(indices: &mut StateSet, require: &mut StateSet, early_reject: &mut bool, idx: usize, value: bool) {
    if indices.get(idx) && require.get(idx) != value {
        *early_reject = true;
    } else {
        indices.set(idx, true);
        require.set(idx, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ltl::{Collector, Node};
    use std::collections::HashMap;

    fn ap(names: &[&str]) -> HashMap<String, usize> {
        names.iter().enumerate().map(|(i, n)| (n.to_string(), i)).collect()
    }

    #[test]
    fn single_atomic_has_two_states() {
        let names = ap(&["a"]);
        let root = Node::parse("a").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let gnba = Gnba::build(&formulas, root_id, false).unwrap();
        assert_eq!(gnba.num_states, 2);
        assert_eq!(gnba.initial_states.count_ones(), 1);
    }

    #[test]
    fn negated_root_flips_initial_states() {
        let names = ap(&["a"]);
        let root = Node::parse("a").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let positive = Gnba::build(&formulas, root_id, false).unwrap();
        let negated = Gnba::build(&formulas, root_id, true).unwrap();
        assert_ne!(positive.initial_states, negated.initial_states);
    }

    #[test]
    fn globally_true_has_one_acceptance_set() {
        let names = ap(&["a"]);
        let root = Node::parse("G a").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let gnba = Gnba::build(&formulas, root_id, false).unwrap();
        // G a = !(true U !a) folds to one UNTIL formula, hence one acceptance set.
        assert_eq!(gnba.final_states_list.len(), 1);
    }

    #[test]
    fn eventually_acceptance_set_excludes_states_still_waiting() {
        let names = ap(&["a"]);
        let root = Node::parse("F a").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let gnba = Gnba::build(&formulas, root_id, false).unwrap();
        assert_eq!(gnba.final_states_list.len(), 1);
        let final_set = &gnba.final_states_list[0];
        // a state where "F a" holds but "a" does not (still waiting) must
        // not be in the acceptance set.
        let elementary = build_elementary_sets(&formulas, root_id).unwrap();
        for (j, set) in elementary.sets.iter().enumerate() {
            let waiting = set.get(root_id) && !set.get(Fid::atomic(0));
            assert_eq!(final_set.get(j), !waiting);
        }
    }
}
