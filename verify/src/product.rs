//! The synchronous product of a transition system and an NBA, and the
//! nested-DFS Büchi-emptiness check over it (spec.md §4.5).

use std::collections::HashSet;

use buchi::Nba;
use ts::TsView;

/// `(t, q)` with `t = None` standing for the pre-initial placeholder `⊥`
/// (spec.md §9): it lets the outer search start at an NBA-initial state
/// before committing to any particular TS-initial state.
type ProductState = (Option<usize>, usize);

fn post_image(ts: &TsView, nba: &Nba, state: ProductState) -> Vec<ProductState> {
    let (t, q) = state;
    let successors: Vec<usize> = match t {
        None => ts.initial_set.iter_ones().collect(),
        Some(t) => ts.transitions[t].iter_ones().collect(),
    };

    let edge = &nba.transitions[q];
    let mut out = Vec::new();
    for t_prime in successors {
        let trigger = ts.atomics[t_prime].prefix(ts.num_atomics) & nba.used_ap_mask;
        if trigger == edge.trigger {
            for q_prime in edge.targets.iter_ones() {
                out.push((Some(t_prime), q_prime));
            }
        }
    }
    out
}

/// Returns `true` iff the product of `ts` and `nba` admits no accepting run
/// — i.e. the language of `nba` restricted to `ts`'s traces is empty.
pub fn product_is_empty(ts: &TsView, nba: &Nba) -> bool {
    let mut visited: HashSet<ProductState> = HashSet::new();

    for q0 in nba.initial_states.iter_ones() {
        let start = (None, q0);
        if visited.contains(&start) {
            continue;
        }
        if outer_dfs(ts, nba, start, &mut visited) {
            return false;
        }
    }
    true
}

/// Reachability search (the outer half of Courcoubetis-Vardi-Wolper):
/// explores every reachable product state and, as each is popped in
/// post-order, runs the inner cycle check from it.
fn outer_dfs(ts: &TsView, nba: &Nba, start: ProductState, visited: &mut HashSet<ProductState>) -> bool {
    let mut stack: Vec<(ProductState, std::vec::IntoIter<ProductState>)> = Vec::new();
    visited.insert(start);
    stack.push((start, post_image(ts, nba, start).into_iter()));

    while let Some((node, successors)) = stack.last_mut() {
        let node = *node;
        match successors.next() {
            Some(next) => {
                if visited.insert(next) {
                    let image = post_image(ts, nba, next);
                    stack.push((next, image.into_iter()));
                }
            }
            None => {
                stack.pop();
                if cycle_check(ts, nba, node) {
                    return true;
                }
            }
        }
    }
    false
}

/// Searches for a path from `start`'s post-image back to `start` itself —
/// an accepting cycle — provided `start` is itself an accepting product
/// state (`t ≠ ⊥` and `q` final).
fn cycle_check(ts: &TsView, nba: &Nba, start: ProductState) -> bool {
    let (t, q) = start;
    if t.is_none() || !nba.final_state.get(q) {
        return false;
    }

    let mut visited: HashSet<ProductState> = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        for successor in post_image(ts, nba, node) {
            if successor == start {
                return true;
            }
            if visited.insert(successor) {
                stack.push(successor);
            }
        }
    }
    false
}
