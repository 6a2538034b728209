//! The textual transition-system format (spec.md §5 / §6): a line-based
//! encoding of a finite Kripke structure, read in its entirety and then
//! validated once so the rest of the crate can assume a well-formed graph.

use std::collections::HashMap;

use bitset::StateSet;

use crate::error::{Error, Result};

/// A raw `from -> into` edge labelled with an action index. The action only
/// exists for diagnostics — the model checker never branches on it, since an
/// LTL trigger is matched against a *state's* atomic propositions, not the
/// action that led there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub action: usize,
    pub into: usize,
}

/// A parsed, validated transition system.
#[derive(Clone, Debug)]
pub struct TsGraph {
    num_states: usize,
    num_transitions: usize,
    initial_set: StateSet,
    action_map: Vec<String>,
    atomic_map: Vec<String>,
    atomic_rev_map: HashMap<String, usize>,
    transitions: Vec<Transition>,
    ap_sets: Vec<StateSet>,
    transition_list: Vec<StateSet>,
}

impl TsGraph {
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_transitions(&self) -> usize {
        self.num_transitions
    }

    pub fn num_atomics(&self) -> usize {
        self.atomic_map.len()
    }

    pub fn initial_set(&self) -> &StateSet {
        &self.initial_set
    }

    pub fn action_map(&self) -> &[String] {
        &self.action_map
    }

    pub fn atomic_map(&self) -> &[String] {
        &self.atomic_map
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn ap_sets(&self) -> &[StateSet] {
        &self.ap_sets
    }

    pub fn transition_list(&self) -> &[StateSet] {
        &self.transition_list
    }

    /// Resolve an atomic proposition's name to its index, shared with the
    /// `ltl` crate's own name table when building the product automaton.
    pub fn map_atomic(&self, name: &str) -> Result<usize> {
        self.atomic_rev_map
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownAtomic(name.to_string()))
    }

    pub fn atomic_index(&self) -> HashMap<String, usize> {
        self.atomic_rev_map.clone()
    }

    /// Parse the textual format:
    /// ```text
    /// <num_states> <num_transitions>
    /// <initial state indices, or a lone -1 for "all states">
    /// <action names>
    /// <atomic proposition names>
    /// <num_transitions lines of "from action into">
    /// <num_states lines of atomic-proposition-set indices, or a lone -1 for "all">
    /// ```
    pub fn parse(input: &str) -> Result<TsGraph> {
        let mut lines = input.lines().enumerate();

        let (lineno, header) = lines.next().ok_or(Error::UnexpectedEof("header"))?;
        let mut header_tokens = header.split_whitespace();
        let num_states = parse_usize(header_tokens.next(), "num_states", lineno)?;
        let num_transitions = parse_usize(header_tokens.next(), "num_transitions", lineno)?;

        let (lineno, initial_line) = lines.next().ok_or(Error::UnexpectedEof("initial set"))?;
        let initial_set = parse_state_set(initial_line, num_states, lineno)?;

        let (_, action_line) = lines.next().ok_or(Error::UnexpectedEof("action map"))?;
        let action_map: Vec<String> = action_line.split_whitespace().map(String::from).collect();

        let (_, atomic_line) = lines.next().ok_or(Error::UnexpectedEof("atomic map"))?;
        let atomic_map: Vec<String> = atomic_line.split_whitespace().map(String::from).collect();
        let num_ap = atomic_map.len();

        let mut transitions = Vec::with_capacity(num_transitions);
        for _ in 0..num_transitions {
            let (lineno, line) = lines.next().ok_or(Error::UnexpectedEof("transition"))?;
            let mut tokens = line.split_whitespace();
            let from = parse_usize(tokens.next(), "transition.from", lineno)?;
            let action = parse_usize(tokens.next(), "transition.action", lineno)?;
            let into = parse_usize(tokens.next(), "transition.into", lineno)?;
            if from >= num_states || into >= num_states || action >= action_map.len() {
                return Err(Error::TransitionOutOfRange(from, action, into));
            }
            transitions.push(Transition { from, action, into });
        }

        let mut ap_sets = Vec::with_capacity(num_states);
        for _ in 0..num_states {
            let (lineno, line) = lines.next().ok_or(Error::UnexpectedEof("atomic proposition set"))?;
            ap_sets.push(parse_state_set(line, num_ap, lineno)?);
        }

        let mut atomic_rev_map = HashMap::with_capacity(atomic_map.len());
        for (i, name) in atomic_map.iter().enumerate() {
            atomic_rev_map.insert(name.clone(), i);
        }

        let mut transition_list = vec![StateSet::new(num_states); num_states];
        for t in &transitions {
            transition_list[t.from].set(t.into, true);
        }

        for (state, adjacency) in transition_list.iter().enumerate() {
            if adjacency.none() {
                return Err(Error::Deadlock(state));
            }
        }

        log::debug!(
            "parsed transition system: {} states, {} transitions, {} atomic propositions",
            num_states,
            num_transitions,
            num_ap
        );

        Ok(TsGraph {
            num_states,
            num_transitions,
            initial_set,
            action_map,
            atomic_map,
            atomic_rev_map,
            transitions,
            ap_sets,
            transition_list,
        })
    }
}

fn parse_usize(tok: Option<&str>, what: &'static str, lineno: usize) -> Result<usize> {
    let s = tok.ok_or(Error::UnexpectedEof(what))?;
    s.parse().map_err(|_| Error::Malformed(s.to_string(), what, lineno))
}

/// A line of whitespace-separated indices, with a lone `-1` meaning "every
/// member of the universe of size `len`" (spec.md §6's sentinel convention).
fn parse_state_set(line: &str, len: usize, lineno: usize) -> Result<StateSet> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() == 1 && tokens[0] == "-1" {
        return Ok(StateSet::with_all(len, true));
    }
    let mut set = StateSet::new(len);
    for tok in tokens {
        let idx: usize = tok
            .parse()
            .map_err(|_| Error::Malformed(tok.to_string(), "index", lineno))?;
        if idx >= len {
            return Err(Error::IndexOutOfRange(idx, len, lineno));
        }
        set.set(idx, true);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> &'static str {
        "2 2\n\
         0\n\
         a\n\
         p q\n\
         0 0 1\n\
         1 0 0\n\
         0\n\
         1\n"
    }

    #[test]
    fn parses_a_small_graph() {
        let graph = TsGraph::parse(sample()).unwrap();
        assert_eq!(graph.num_states(), 2);
        assert_eq!(graph.num_transitions(), 2);
        assert!(graph.initial_set().get(0));
        assert!(!graph.initial_set().get(1));
        assert_eq!(graph.map_atomic("p").unwrap(), 0);
        assert_eq!(graph.map_atomic("q").unwrap(), 1);
        assert!(graph.ap_sets()[0].get(0));
        assert!(!graph.ap_sets()[0].get(1));
        assert!(graph.ap_sets()[1].get(1));
    }

    #[test]
    fn all_states_sentinel() {
        let input = "1 1\n-1\na\np\n0 0 0\n-1\n";
        let graph = TsGraph::parse(input).unwrap();
        assert!(graph.initial_set().get(0));
        assert!(graph.ap_sets()[0].get(0));
    }

    #[test]
    fn deadlock_is_rejected() {
        let input = "2 1\n0\na\np\n0 0 1\n0\n0\n";
        assert!(matches!(TsGraph::parse(input), Err(Error::Deadlock(1))));
    }

    #[test]
    fn unknown_atomic_is_rejected() {
        let graph = TsGraph::parse(sample()).unwrap();
        assert!(matches!(
            graph.map_atomic("r"),
            Err(Error::UnknownAtomic(_))
        ));
    }

    #[test]
    fn transition_out_of_range_is_rejected() {
        let input = "1 1\n0\na\np\n0 0 5\n0\n";
        assert!(matches!(
            TsGraph::parse(input),
            Err(Error::TransitionOutOfRange(0, 0, 5))
        ));
    }
}
