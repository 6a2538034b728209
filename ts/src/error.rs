use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// User-facing errors from reading a transition-system file. Internal
/// consistency violations (an index this crate computes itself going out of
/// range) fail fast via `assert!`/`debug_assert!` instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("expected more lines in transition-system file ({0})")]
    UnexpectedEof(&'static str),
    #[error("could not parse '{0}' as {1} on line {2}")]
    Malformed(String, &'static str, usize),
    #[error("index {0} out of range (size {1}) on line {2}")]
    IndexOutOfRange(usize, usize, usize),
    #[error("transition (from={0}, action={1}, into={2}) references a state or action out of range")]
    TransitionOutOfRange(usize, usize, usize),
    #[error("unknown atomic proposition '{0}'")]
    UnknownAtomic(String),
    #[error("state {0} has no outgoing transitions (deadlock)")]
    Deadlock(usize),
}
