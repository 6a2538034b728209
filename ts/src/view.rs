//! The read-only view of a [`TsGraph`] the verifier actually consumes
//! (spec.md §5): a plain Kripke structure, with the initial-state set
//! optionally overridden so the same graph can be re-checked from a
//! different starting point without re-parsing.

use bitset::StateSet;

use crate::graph::TsGraph;

pub struct TsView<'a> {
    pub num_states: usize,
    pub num_atomics: usize,
    pub initial_set: StateSet,
    pub transitions: &'a [StateSet],
    pub atomics: &'a [StateSet],
}

impl<'a> TsView<'a> {
    pub fn new(graph: &'a TsGraph) -> Self {
        TsView {
            num_states: graph.num_states(),
            num_atomics: graph.num_atomics(),
            initial_set: graph.initial_set().clone(),
            transitions: graph.transition_list(),
            atomics: graph.ap_sets(),
        }
    }

    pub fn with_initial(graph: &'a TsGraph, initial_set: StateSet) -> Self {
        assert_eq!(
            initial_set.len(),
            graph.num_states(),
            "initial set length must match the graph's state count"
        );
        TsView {
            num_states: graph.num_states(),
            num_atomics: graph.num_atomics(),
            initial_set,
            transitions: graph.transition_list(),
            atomics: graph.ap_sets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TsGraph;

    #[test]
    fn default_view_uses_the_graph_initial_set() {
        let graph = TsGraph::parse("1 1\n0\na\np\n0 0 0\n-1\n").unwrap();
        let view = TsView::new(&graph);
        assert!(view.initial_set.get(0));
    }

    #[test]
    fn overridden_initial_set_replaces_the_default() {
        let graph = TsGraph::parse("2 2\n0\na\np\n0 0 1\n1 0 0\n-1\n-1\n").unwrap();
        let mut custom = StateSet::new(2);
        custom.set(1, true);
        let view = TsView::with_initial(&graph, custom);
        assert!(!view.initial_set.get(0));
        assert!(view.initial_set.get(1));
    }
}
