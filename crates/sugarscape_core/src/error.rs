//! Error types for the simulation engine.
//!
//! Every mutation that could produce an invalid state is validated at the
//! point of mutation; callers are expected to pre-filter rather than
//! catch-and-retry, so all variants are treated as fatal to the operation
//! that raised them.

use sugarscape_data::Coord;
use thiserror::Error;
use uuid::Uuid;

/// Main error type for simulation state transitions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A mutation would have produced an invalid state (negative resource
    /// amounts, capacity above the environment ceiling, reserve above the
    /// population ceiling, non-positive metabolism or vision).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A movement rule selected a cell that already holds an agent.
    /// Candidates are supposed to be pre-filtered for vacancy, so this
    /// signals a logic bug in the rule, not a recoverable condition.
    #[error("cell {target} is already occupied")]
    OccupiedTarget { target: Coord },

    /// An operation referenced an agent that is not in the population.
    #[error("no live agent with id {0}")]
    UnknownAgent(Uuid),
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new invariant-violation error.
    #[must_use]
    pub fn invariant<S: Into<String>>(msg: S) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
