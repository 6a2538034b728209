//! Generalized and degeneralized Büchi automata built from an LTL formula
//! DAG (spec.md §4.3/§4.4).

pub mod gnba;
pub mod nba;

pub use gnba::{Edge, Gnba};
pub use nba::Nba;
