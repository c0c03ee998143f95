//! Turn phases and the legal-transition table.
//!
//! Phase flow is a fixed graph, checked on every transition request. A
//! transition outside the table is rejected atomically by the coordinator.

use serde::{Deserialize, Serialize};

/// The phases a match moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    PreGame,
    DroneSelection,
    DeckSelection,
    Placement,
    InitialDraw,
    Deployment,
    Action,
    RoundEnd,
    GameEnd,
}

impl TurnPhase {
    /// Phases reachable from this one.
    ///
    /// `GameEnd` is terminal.
    #[must_use]
    pub const fn successors(self) -> &'static [TurnPhase] {
        match self {
            TurnPhase::PreGame => &[TurnPhase::DroneSelection, TurnPhase::DeckSelection],
            TurnPhase::DroneSelection => &[TurnPhase::DeckSelection],
            TurnPhase::DeckSelection => &[TurnPhase::Placement],
            TurnPhase::Placement => &[TurnPhase::InitialDraw, TurnPhase::Deployment],
            TurnPhase::InitialDraw => &[TurnPhase::Deployment],
            TurnPhase::Deployment => &[TurnPhase::Action, TurnPhase::RoundEnd],
            TurnPhase::Action => &[
                TurnPhase::Deployment,
                TurnPhase::RoundEnd,
                TurnPhase::GameEnd,
            ],
            TurnPhase::RoundEnd => &[TurnPhase::Deployment, TurnPhase::GameEnd],
            TurnPhase::GameEnd => &[],
        }
    }

    /// Whether `self -> to` is in the adjacency table.
    #[must_use]
    pub fn can_transition(self, to: TurnPhase) -> bool {
        self.successors().contains(&to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        assert!(TurnPhase::PreGame.can_transition(TurnPhase::DroneSelection));
        assert!(TurnPhase::PreGame.can_transition(TurnPhase::DeckSelection));
        assert!(TurnPhase::Placement.can_transition(TurnPhase::Deployment));
        assert!(TurnPhase::Action.can_transition(TurnPhase::GameEnd));
        assert!(TurnPhase::RoundEnd.can_transition(TurnPhase::Deployment));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!TurnPhase::PreGame.can_transition(TurnPhase::Action));
        assert!(!TurnPhase::Deployment.can_transition(TurnPhase::Placement));
        assert!(!TurnPhase::Action.can_transition(TurnPhase::Action));
    }

    #[test]
    fn test_game_end_is_terminal() {
        for phase in [
            TurnPhase::PreGame,
            TurnPhase::DroneSelection,
            TurnPhase::DeckSelection,
            TurnPhase::Placement,
            TurnPhase::InitialDraw,
            TurnPhase::Deployment,
            TurnPhase::Action,
            TurnPhase::RoundEnd,
        ] {
            assert!(!TurnPhase::GameEnd.can_transition(phase));
        }
    }
}
