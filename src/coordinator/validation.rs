//! Post-mutation invariant validation.
//!
//! Runs on every candidate state before it becomes authoritative. A
//! failure rejects the whole action atomically; committed state never
//! holds a negative resource, a duplicate drone id, or a drone with no
//! hull left.

use rustc_hash::FxHashSet;

use crate::core::{EngineError, EngineResult, GameState, Lane, TurnPhase};

/// Validate a candidate state against the committed-state invariants.
pub fn validate_state(state: &GameState) -> EngineResult<()> {
    let mut seen_ids = FxHashSet::default();

    for (player, ps) in state.players.iter() {
        if ps.energy < 0 {
            return Err(EngineError::NegativeResource {
                player,
                resource: "energy",
            });
        }
        if ps.deployment_budget < 0 {
            return Err(EngineError::NegativeResource {
                player,
                resource: "deploymentBudget",
            });
        }

        for lane in Lane::ALL {
            for drone in ps.drones_on_board[lane].iter() {
                if !seen_ids.insert(drone.id) {
                    return Err(EngineError::DuplicateDroneId(drone.id));
                }
                if drone.hull <= 0 {
                    return Err(EngineError::InvariantViolation(format!(
                        "{} committed with no hull remaining",
                        drone.id
                    )));
                }
                if drone.current_shields > drone.max_shields {
                    return Err(EngineError::InvariantViolation(format!(
                        "{} shields exceed maximum",
                        drone.id
                    )));
                }
            }
        }

        for (kind, section) in ps.ship_sections.iter() {
            if section.hull < 0 {
                return Err(EngineError::InvariantViolation(format!(
                    "{kind} committed with negative hull"
                )));
            }
            if section.allocated_shields > section.max_shields {
                return Err(EngineError::InvariantViolation(format!(
                    "{kind} shields exceed allocation"
                )));
            }
        }
    }

    Ok(())
}

/// Validate a requested phase transition against the adjacency table.
pub fn validate_transition(from: TurnPhase, to: TurnPhase) -> EngineResult<()> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(EngineError::IllegalPhaseTransition { from, to })
    }
}
