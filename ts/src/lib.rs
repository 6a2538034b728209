//! Transition-system parsing and the `TsView` the verifier operates over
//! (spec.md §5/§6).

pub mod error;
pub mod graph;
pub mod view;

pub use error::{Error, Result};
pub use graph::{TsGraph, Transition};
pub use view::TsView;
