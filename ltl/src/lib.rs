//! LTL formula parsing, the hash-consed formula DAG and elementary-set
//! enumeration that feed the GNBA builder in the `buchi` crate.

pub mod error;
pub mod formula;
pub mod parse_tree;
pub mod sets;

pub use error::{Error, Result};
pub use formula::{Collector, Fid, FormulaKind, Formulas};
pub use parse_tree::Node;
pub use sets::{build_elementary_sets, ElementarySet, ElementarySets};
