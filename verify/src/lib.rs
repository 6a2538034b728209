//! Ties the `ltl`, `buchi` and `ts` crates together into the model
//! checker's entry point, `verify_ltl` (spec.md §4.6).

pub mod error;
pub mod product;

pub use error::{Error, Result};

use buchi::{Gnba, Nba};
use ltl::Collector;
use ts::{TsGraph, TsView};

/// Checks whether `graph` satisfies `formula`.
///
/// Builds the GNBA for `¬formula`, degeneralizes it to an NBA, and returns
/// `true` iff the synchronous product with `graph` is empty — i.e. no run of
/// the transition system violates the property.
pub fn verify_ltl(formula: &ltl::Node, graph: &TsGraph) -> Result<bool> {
    let ap_index = graph.atomic_index();
    let (formulas, root) = Collector::collect(formula, &ap_index)?;

    let gnba = Gnba::build(&formulas, root, true)?;
    let nba = Nba::from_gnba(&gnba);
    let view = TsView::new(graph);

    let empty = product::product_is_empty(&view, &nba);
    log::debug!("verify_ltl: product {}", if empty { "empty" } else { "non-empty" });
    Ok(empty)
}
