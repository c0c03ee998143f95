//! Engine error kinds.
//!
//! Malformed actions and invariant violations are rejected with a typed
//! error before any state is committed; there is no partially-applied
//! damage split. The documented exception is the resolver's missing-target
//! leniency: a dangling reference inside an otherwise valid attack degrades
//! to zero damage rather than aborting the action.

use thiserror::Error;

use super::ids::{DroneId, PlayerId};
use super::phase::TurnPhase;

/// Errors surfaced by the coordinator and validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The referenced drone or section could not be located.
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// A phase transition outside the adjacency table was requested.
    #[error("illegal phase transition: {from:?} -> {to:?}")]
    IllegalPhaseTransition { from: TurnPhase, to: TurnPhase },

    /// The action is not legal in the current phase.
    #[error("action not allowed in phase {0:?}")]
    WrongPhase(TurnPhase),

    /// A committed-state invariant would be broken.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The same drone id appeared more than once across both boards.
    #[error("duplicate drone id: {0}")]
    DuplicateDroneId(DroneId),

    /// Energy or deployment budget would go negative.
    #[error("{player} would have negative {resource}")]
    NegativeResource { player: PlayerId, resource: &'static str },

    /// An exhausted drone was chosen as attacker.
    #[error("attacker {0} is exhausted")]
    ExhaustedAttacker(DroneId),

    /// The drone name is not in the static registry.
    #[error("unknown drone definition: {0}")]
    UnknownDrone(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
