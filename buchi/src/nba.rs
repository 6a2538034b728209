//! Degeneralization: collapse a GNBA's `k` acceptance sets into a single
//! one by laying out `k` copies of the state space and routing each copy's
//! accepting states to the next copy (spec.md §4.4).

use bitset::{StateSet, TriggerSet};

use crate::gnba::{Edge, Gnba};

#[derive(Clone, Debug)]
pub struct Nba {
    pub num_states: usize,
    pub num_triggers: usize,
    pub initial_states: StateSet,
    pub transitions: Vec<Edge>,
    pub used_ap_mask: TriggerSet,
    pub final_state: StateSet,
}

impl Nba {
    /// Degeneralize `gnba`. A GNBA with zero acceptance sets places no
    /// constraint on which runs are accepting — spec.md §8 resolves this by
    /// treating every state as accepting, rather than rejecting the input as
    /// the reference implementation's stub does.
    pub fn from_gnba(gnba: &Gnba) -> Nba {
        let old_size = gnba.num_states;

        let final_states_list: Vec<StateSet> = if gnba.final_states_list.is_empty() {
            vec![StateSet::with_all(old_size, true)]
        } else {
            gnba.final_states_list.clone()
        };
        let num_final = final_states_list.len();
        let new_size = old_size * num_final;

        log::debug!(
            "NBA degeneralization: {} acceptance sets, {} -> {} states",
            num_final,
            old_size,
            new_size
        );

        let mut initial_states = StateSet::new(new_size);
        initial_states.shift_overlay(0, &gnba.initial_states);

        let mut final_state = StateSet::new(new_size);
        final_state.shift_overlay(0, &final_states_list[0]);

        let mut transitions = vec![
            Edge {
                trigger: TriggerSet::new(gnba.num_triggers),
                targets: StateSet::new(new_size),
            };
            new_size
        ];

        for (j, accepting) in final_states_list.iter().enumerate() {
            for i in 0..old_size {
                let offset = ((j + accepting.get(i) as usize) % num_final) * old_size;
                let mut targets = StateSet::new(new_size);
                targets.shift_overlay(offset, &gnba.transitions[i].targets);
                transitions[j * old_size + i] = Edge {
                    trigger: gnba.transitions[i].trigger,
                    targets,
                };
            }
        }

        Nba {
            num_states: new_size,
            num_triggers: gnba.num_triggers,
            initial_states,
            transitions,
            used_ap_mask: gnba.used_ap_mask,
            final_state,
        }
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
    fn single_acceptance_set_keeps_state_count() {
        let names = ap(&["a"]);
        let root = Node::parse("F a").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let gnba = Gnba::build(&formulas, root_id, false).unwrap();
        let nba = Nba::from_gnba(&gnba);
        assert_eq!(gnba.final_states_list.len(), 1);
        assert_eq!(nba.num_states, gnba.num_states);
    }

    #[test]
    fn two_acceptance_sets_double_state_count() {
        let names = ap(&["a", "b"]);
        // Two distinct UNTIL subformulas, hence two acceptance sets.
        let root = Node::parse("(F a) & (F b)").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let gnba = Gnba::build(&formulas, root_id, false).unwrap();
        assert_eq!(gnba.final_states_list.len(), 2);
        let nba = Nba::from_gnba(&gnba);
        assert_eq!(nba.num_states, gnba.num_states * 2);
    }

    #[test]
    fn no_acceptance_sets_means_every_state_accepts() {
        let names = ap(&["a"]);
        let root = Node::parse("a").unwrap();
        let (formulas, root_id) = Collector::collect(&root, &names).unwrap();
        let gnba = Gnba::build(&formulas, root_id, false).unwrap();
        assert!(gnba.final_states_list.is_empty());
        let nba = Nba::from_gnba(&gnba);
        assert_eq!(nba.num_states, gnba.num_states);
        assert_eq!(nba.final_state.count_ones(), nba.num_states);
    }
}
