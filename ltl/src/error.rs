use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// User input errors. Programmer/invariant violations (a malformed DAG, an
/// operand index out of range) are not represented here — they fail fast via
/// `assert!`/`debug_assert!` at the point of construction instead, since they
/// indicate a bug in the core rather than something a caller can recover
/// from.
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not parse entire formula '{0}'")]
    Incomplete(String),
    #[error("error while parsing formula: '{0}'")]
    Parsing(String),
    #[error("unparsed input left over after formula '{0}': '{1}'")]
    Leftover(String, String),
    #[error("unknown atomic proposition '{0}'")]
    UnknownAtomic(String),
    #[error("formula has no atomic propositions")]
    NoAtomicPropositions,
    #[error("too many uncertain/atomic indices to enumerate ({0} >= 32)")]
    TooManyIndices(usize),
}
