//! Bit-vector utilities used throughout the model checker.
//!
//! Two flavours, matching the two shapes the checker actually needs:
//! [`TriggerSet`] is a fixed-width (at most 64 bits) set over atomic
//! propositions, and [`StateSet`] is an arbitrary-length set over states
//! (GNBA/NBA states, transition-system states, or positions in the formula
//! DAG). Both treat their declared length as part of their identity: two
//! sets of different length are never equal, even with the same bits set.

mod state;
mod trigger;

pub use state::StateSet;
pub use trigger::TriggerSet;
