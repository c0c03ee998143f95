//! Action queue / state coordinator.
//!
//! `GameCoordinator` owns the only authoritative `GameState`. Every
//! mutation is an action flowing through a single-flight queue: one action
//! resolves and commits before the next is dequeued, so no action ever
//! observes another's intermediate state. The commit path is private to
//! the queue executor — nothing else in the crate can reach it, which is
//! the structural replacement for runtime race detection.
//!
//! The coordinator is constructed per match and passed by reference; there
//! is no ambient global. Commit notifications go out over bounded
//! channels; a lagging subscriber misses notifications rather than
//! blocking the engine.

pub mod queue;
pub mod validation;

use std::collections::VecDeque;
use std::hash::Hasher;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

use log::warn;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::combat::{resolve_attack, AttackDetails};
use crate::combat_log::LogEntry;
use crate::core::{
    DroneId, EngineError, EngineResult, GameState, Lane, LaneMap, PlayerId, SectionKind,
    TurnPhase,
};
use crate::defs::DroneRegistry;
use crate::effects::{self, EffectContext, EffectDescriptor};
use crate::events::{AnimationEvent, TargetRef};

pub use queue::{ActionPayload, CompletedAction, GameAction, SubmitOutcome};
pub use validation::{validate_state, validate_transition};

/// Energy granted to each player at the start of a new round.
pub const ENERGY_PER_ROUND: i32 = 3;

/// Capacity of each subscriber's notification channel.
const NOTIFY_CAPACITY: usize = 64;

/// How this process relates to the authoritative state.
///
/// State is always keyed by absolute player id; the role only changes the
/// read-time projection of "local" and "opponent".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionRole {
    /// Authoritative host; plays as player one.
    Host,
    /// Forwarding guest; plays as player two.
    Guest,
    /// Single local session; plays as player one.
    Local,
}

/// Why a notification was published.
#[derive(Clone, Debug, PartialEq)]
pub enum NotificationKind {
    /// An action committed.
    ActionCommitted { action: String, player: PlayerId },
    /// The consumer toggled the input-blocking flag.
    AnimationBlocking { blocked: bool },
}

/// One commit notification delivered to subscribers.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Ordered animation events of the committed action.
    pub events: Vec<AnimationEvent>,
    /// Digest of the committed state, for host/guest consistency probes.
    pub digest: u64,
    /// Whether the consumer currently wants input blocked.
    pub input_blocked: bool,
}

/// Owner of the authoritative match state and the single-flight queue.
pub struct GameCoordinator {
    state: GameState,
    registry: DroneRegistry,
    role: SessionRole,
    pending: VecDeque<GameAction>,
    processing: bool,
    subscribers: Vec<SyncSender<Notification>>,
    log_sink: Box<dyn FnMut(LogEntry)>,
    input_blocked: bool,
    next_drone_id: u32,
}

impl GameCoordinator {
    /// Create a coordinator with the stock drone roster.
    #[must_use]
    pub fn new(role: SessionRole) -> Self {
        Self::with_registry(role, DroneRegistry::builtin())
    }

    /// Create a coordinator with a custom registry.
    #[must_use]
    pub fn with_registry(role: SessionRole, registry: DroneRegistry) -> Self {
        Self {
            state: GameState::new(),
            registry,
            role,
            pending: VecDeque::new(),
            processing: false,
            subscribers: Vec::new(),
            log_sink: Box::new(|_| {}),
            input_blocked: false,
            next_drone_id: 1,
        }
    }

    /// Install the structured combat-log callback.
    pub fn set_log_sink(&mut self, sink: impl FnMut(LogEntry) + 'static) {
        self.log_sink = Box::new(sink);
    }

    // === Queue ===

    /// Submit an action. If the queue is idle it drains immediately and
    /// the submitted action's outcome is returned; if an action is already
    /// in flight the submission parks and `Queued` comes back.
    ///
    /// Actions execute strictly in submission order. Rejected actions
    /// leave no trace in committed state.
    pub fn queue_action(&mut self, action: GameAction) -> EngineResult<SubmitOutcome> {
        self.pending.push_back(action);
        if self.processing {
            return Ok(SubmitOutcome::Queued);
        }

        self.processing = true;
        let submitted_pop = self.pending.len();
        let mut pops = 0usize;
        let mut submitted: Option<EngineResult<CompletedAction>> = None;

        while let Some(next) = self.pending.pop_front() {
            pops += 1;
            let result = self.execute_action(&next);
            if let Err(err) = &result {
                warn!("action {} rejected: {err}", next.label());
            }
            if pops == submitted_pop {
                submitted = Some(result);
            }
        }
        self.processing = false;

        match submitted {
            Some(Ok(done)) => Ok(SubmitOutcome::Completed(done)),
            Some(Err(err)) => Err(err),
            None => Ok(SubmitOutcome::Queued),
        }
    }

    /// Park an action without draining the queue.
    pub fn enqueue(&mut self, action: GameAction) {
        self.pending.push_back(action);
    }

    /// Drain every parked action in submission order. Returns how many
    /// were processed; rejections are reported through the `log` facade
    /// and skipped.
    pub fn run_queue(&mut self) -> usize {
        if self.processing {
            return 0;
        }
        self.processing = true;
        let mut processed = 0;
        while let Some(next) = self.pending.pop_front() {
            processed += 1;
            if let Err(err) = self.execute_action(&next) {
                warn!("action {} rejected: {err}", next.label());
            }
        }
        self.processing = false;
        processed
    }

    // === Execution (the only path to commit) ===

    fn execute_action(&mut self, action: &GameAction) -> EngineResult<CompletedAction> {
        match &action.payload {
            ActionPayload::Attack(details) => self.execute_attack(action.player, details),
            ActionPayload::PlayCard {
                effect,
                target,
                target_player,
                source_card,
                energy_cost,
            } => self.execute_play_card(
                action.player,
                effect,
                *target,
                *target_player,
                *source_card,
                *energy_cost,
            ),
            ActionPayload::Deploy { drone, lane } => {
                self.execute_deploy(action.player, drone, *lane)
            }
            ActionPayload::AdvancePhase { to } => self.execute_advance_phase(action.player, *to),
            ActionPayload::EndTurn => self.execute_end_turn(action.player),
        }
    }

    fn execute_attack(
        &mut self,
        player: PlayerId,
        details: &AttackDetails,
    ) -> EngineResult<CompletedAction> {
        if self.state.phase != TurnPhase::Action {
            return Err(EngineError::WrongPhase(self.state.phase));
        }
        if let Some(attacker_id) = details.attacker {
            let (_, attacker) = self.state.players[details.attacking_player]
                .find_drone(attacker_id)
                .ok_or_else(|| EngineError::TargetNotFound(attacker_id.to_string()))?;
            if attacker.is_exhausted {
                return Err(EngineError::ExhaustedAttacker(attacker_id));
            }
        }

        let outcome = resolve_attack(
            details,
            &self.state.players,
            &self.state.placed_sections,
            &mut *self.log_sink,
        );

        let mut candidate = self.state.clone();
        candidate.players = outcome.players;
        if outcome.should_end_turn {
            candidate.active_player = candidate.active_player.opponent();
        }
        self.commit(candidate, "attack", player, &outcome.events)?;

        Ok(CompletedAction {
            events: outcome.events,
            attack_result: Some(outcome.result),
            effect_result: None,
        })
    }

    fn execute_play_card(
        &mut self,
        player: PlayerId,
        effect: &EffectDescriptor,
        target: TargetRef,
        target_player: PlayerId,
        source_card: Option<crate::core::CardInstanceId>,
        energy_cost: i32,
    ) -> EngineResult<CompletedAction> {
        if self.state.phase != TurnPhase::Action {
            return Err(EngineError::WrongPhase(self.state.phase));
        }
        if self.state.players[player].energy < energy_cost {
            return Err(EngineError::NegativeResource {
                player,
                resource: "energy",
            });
        }
        if let TargetRef::Drone(id) = target {
            if self.state.players[target_player].find_drone(id).is_none() {
                return Err(EngineError::TargetNotFound(id.to_string()));
            }
        }

        let mut working = self.state.players.clone();
        working[player].energy -= energy_cost;

        let ctx = EffectContext {
            target,
            target_player,
            acting_player: player,
            players: &working,
            placed: &self.state.placed_sections,
            source_card,
        };
        let outcome = effects::process(effect, &ctx, &mut *self.log_sink);

        let mut candidate = self.state.clone();
        candidate.players = outcome.players;
        if outcome.should_end_turn {
            candidate.active_player = candidate.active_player.opponent();
        }
        self.commit(candidate, "playCard", player, &outcome.events)?;

        Ok(CompletedAction {
            events: outcome.events,
            attack_result: None,
            effect_result: outcome.result,
        })
    }

    fn execute_deploy(
        &mut self,
        player: PlayerId,
        name: &str,
        lane: Lane,
    ) -> EngineResult<CompletedAction> {
        if self.state.phase != TurnPhase::Deployment {
            return Err(EngineError::WrongPhase(self.state.phase));
        }
        let def = self
            .registry
            .get(name)
            .ok_or_else(|| EngineError::UnknownDrone(name.to_string()))?
            .clone();

        let id = DroneId::new(self.next_drone_id);
        let mut candidate = self.state.clone();
        let board = &mut candidate.players[player];
        board.deployment_budget -= def.deployment_cost;
        board.add_drone(lane, def.spawn(id, player));

        self.commit(candidate, "deploy", player, &[])?;
        self.next_drone_id += 1;

        Ok(CompletedAction::default())
    }

    fn execute_advance_phase(
        &mut self,
        player: PlayerId,
        to: TurnPhase,
    ) -> EngineResult<CompletedAction> {
        validate_transition(self.state.phase, to)?;

        let from = self.state.phase;
        let mut candidate = self.state.clone();
        candidate.phase = to;

        // Entering Deployment from late phases starts a new round.
        if to == TurnPhase::Deployment
            && matches!(from, TurnPhase::Action | TurnPhase::RoundEnd)
        {
            candidate.round += 1;
            for (_, board) in candidate.players.iter_mut() {
                board.end_round();
                board.energy += ENERGY_PER_ROUND;
            }
        }

        self.commit(candidate, "advancePhase", player, &[])?;
        Ok(CompletedAction::default())
    }

    fn execute_end_turn(&mut self, player: PlayerId) -> EngineResult<CompletedAction> {
        if self.state.phase != TurnPhase::Action {
            return Err(EngineError::WrongPhase(self.state.phase));
        }
        let mut candidate = self.state.clone();
        candidate.active_player = candidate.active_player.opponent();
        self.commit(candidate, "endTurn", player, &[])?;
        Ok(CompletedAction::default())
    }

    /// Validate and commit a candidate state, then notify subscribers.
    ///
    /// Private to the queue executor: rejection leaves the previous state
    /// untouched.
    fn commit(
        &mut self,
        candidate: GameState,
        label: &str,
        player: PlayerId,
        events: &[AnimationEvent],
    ) -> EngineResult<()> {
        validate_state(&candidate)?;
        self.state = candidate;

        let digest = self.state_digest();
        self.publish(Notification {
            kind: NotificationKind::ActionCommitted {
                action: label.to_string(),
                player,
            },
            events: events.to_vec(),
            digest,
            input_blocked: self.input_blocked,
        });
        Ok(())
    }

    // === Notifications ===

    /// Subscribe to commit notifications over a bounded channel.
    pub fn subscribe(&mut self) -> Receiver<Notification> {
        let (tx, rx) = sync_channel(NOTIFY_CAPACITY);
        self.subscribers.push(tx);
        rx
    }

    /// Consumer-toggled input-blocking flag; echoed on every notification.
    pub fn set_animation_blocking(&mut self, blocked: bool) {
        self.input_blocked = blocked;
        let digest = self.state_digest();
        self.publish(Notification {
            kind: NotificationKind::AnimationBlocking { blocked },
            events: Vec::new(),
            digest,
            input_blocked: blocked,
        });
    }

    fn publish(&mut self, notification: Notification) {
        self.subscribers.retain(|tx| {
            match tx.try_send(notification.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    warn!("subscriber lagging; notification dropped");
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            }
        });
    }

    // === Queries ===

    /// The committed authoritative state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The drone definition registry.
    #[must_use]
    pub fn registry(&self) -> &DroneRegistry {
        &self.registry
    }

    /// This session's role.
    #[must_use]
    pub fn role(&self) -> SessionRole {
        self.role
    }

    /// Absolute id of the local player under the session role.
    #[must_use]
    pub fn local_player_id(&self) -> PlayerId {
        match self.role {
            SessionRole::Host | SessionRole::Local => PlayerId::One,
            SessionRole::Guest => PlayerId::Two,
        }
    }

    /// Absolute id of the opponent under the session role.
    #[must_use]
    pub fn opponent_player_id(&self) -> PlayerId {
        self.local_player_id().opponent()
    }

    /// The local player's lane-to-section placement.
    #[must_use]
    pub fn local_placed_sections(&self) -> &LaneMap<SectionKind> {
        &self.state.placed_sections[self.local_player_id()]
    }

    /// Whether an action is currently resolving.
    #[must_use]
    pub fn is_action_in_progress(&self) -> bool {
        self.processing
    }

    /// Number of parked actions.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.pending.len()
    }

    /// FxHash digest of the bincode-serialized committed state.
    ///
    /// Hosts and guests that applied the same action sequence hold the
    /// same digest; a mismatch means a desync.
    #[must_use]
    pub fn state_digest(&self) -> u64 {
        match bincode::serialize(&self.state) {
            Ok(bytes) => {
                let mut hasher = FxHasher::default();
                hasher.write(&bytes);
                hasher.finish()
            }
            Err(err) => {
                warn!("state digest unavailable: {err}");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_projection() {
        let host = GameCoordinator::new(SessionRole::Host);
        assert_eq!(host.local_player_id(), PlayerId::One);
        assert_eq!(host.opponent_player_id(), PlayerId::Two);

        let guest = GameCoordinator::new(SessionRole::Guest);
        assert_eq!(guest.local_player_id(), PlayerId::Two);
        assert_eq!(guest.opponent_player_id(), PlayerId::One);

        let local = GameCoordinator::new(SessionRole::Local);
        assert_eq!(local.local_player_id(), PlayerId::One);
    }

    #[test]
    fn test_illegal_phase_transition_rejected() {
        let mut coordinator = GameCoordinator::new(SessionRole::Local);
        let result = coordinator.queue_action(GameAction::new(
            PlayerId::One,
            ActionPayload::AdvancePhase {
                to: TurnPhase::Action,
            },
        ));

        assert_eq!(
            result.unwrap_err(),
            EngineError::IllegalPhaseTransition {
                from: TurnPhase::PreGame,
                to: TurnPhase::Action,
            }
        );
        assert_eq!(coordinator.state().phase, TurnPhase::PreGame);
    }

    #[test]
    fn test_attack_outside_action_phase_rejected() {
        let mut coordinator = GameCoordinator::new(SessionRole::Local);
        let details = AttackDetails::ability(
            2,
            PlayerId::One,
            TargetRef::Section(SectionKind::Bridge),
            PlayerId::Two,
            Lane::Left,
        );
        let result = coordinator.queue_action(GameAction::new(
            PlayerId::One,
            ActionPayload::Attack(details),
        ));

        assert_eq!(
            result.unwrap_err(),
            EngineError::WrongPhase(TurnPhase::PreGame)
        );
    }

    #[test]
    fn test_digest_changes_on_commit() {
        let mut coordinator = GameCoordinator::new(SessionRole::Local);
        let before = coordinator.state_digest();

        coordinator
            .queue_action(GameAction::new(
                PlayerId::One,
                ActionPayload::AdvancePhase {
                    to: TurnPhase::DeckSelection,
                },
            ))
            .unwrap();

        assert_ne!(coordinator.state_digest(), before);
    }

    #[test]
    fn test_animation_blocking_notification() {
        let mut coordinator = GameCoordinator::new(SessionRole::Local);
        let rx = coordinator.subscribe();

        coordinator.set_animation_blocking(true);

        let notification = rx.try_recv().unwrap();
        assert_eq!(
            notification.kind,
            NotificationKind::AnimationBlocking { blocked: true }
        );
        assert!(notification.input_blocked);
    }
}
