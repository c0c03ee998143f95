//! Action types for the single-flight queue.
//!
//! Every mutation enters the engine as a `GameAction`. The coordinator
//! executes them strictly one at a time in submission order; a re-entrant
//! submission parks in the queue and runs after the in-flight action's
//! commit completes.

use serde::{Deserialize, Serialize};

use crate::combat::{AttackDetails, AttackResult};
use crate::core::{CardInstanceId, Lane, PlayerId, TurnPhase};
use crate::effects::{EffectDescriptor, EffectResult};
use crate::events::{AnimationEvent, TargetRef};

/// Payload of one queued action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionPayload {
    /// A drone attack (optionally intercepted).
    Attack(AttackDetails),
    /// Play a card: spend energy, run its effect descriptor.
    PlayCard {
        effect: EffectDescriptor,
        target: TargetRef,
        target_player: PlayerId,
        source_card: Option<CardInstanceId>,
        energy_cost: i32,
    },
    /// Deploy a drone from the static registry into a lane.
    Deploy { drone: String, lane: Lane },
    /// Move to an adjacent phase.
    AdvancePhase { to: TurnPhase },
    /// Pass the action to the opponent.
    EndTurn,
}

/// One submitted action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameAction {
    pub player: PlayerId,
    pub payload: ActionPayload,
}

impl GameAction {
    /// Create an action.
    #[must_use]
    pub fn new(player: PlayerId, payload: ActionPayload) -> Self {
        Self { player, payload }
    }

    /// Short label for notifications and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.payload {
            ActionPayload::Attack(_) => "attack",
            ActionPayload::PlayCard { .. } => "playCard",
            ActionPayload::Deploy { .. } => "deploy",
            ActionPayload::AdvancePhase { .. } => "advancePhase",
            ActionPayload::EndTurn => "endTurn",
        }
    }
}

/// What a completed action produced.
#[derive(Clone, Debug, Default)]
pub struct CompletedAction {
    pub events: Vec<AnimationEvent>,
    pub attack_result: Option<AttackResult>,
    pub effect_result: Option<EffectResult>,
}

/// How a submission was handled.
#[derive(Clone, Debug)]
pub enum SubmitOutcome {
    /// The action (and anything it queued) ran to completion.
    Completed(CompletedAction),
    /// Another action is in flight; this one parked in the queue and will
    /// run after the in-flight commit completes.
    Queued,
}
