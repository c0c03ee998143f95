//! Effect execution.
//!
//! The pipeline turns an `EffectDescriptor` into committed consequences by
//! delegating all damage math to the attack resolver and chaining
//! conditional follow-ups off the returned result. Input state is never
//! mutated; callers receive fresh copies plus one renumbered, coherent
//! animation-event sequence for the whole chain.

use log::warn;

use crate::combat::{resolve_attack, AttackDetails, DamageSplit};
use crate::combat_log::{LogEntry, LogSink};
use crate::core::{
    lane_for_section, CardInstanceId, DroneId, Lane, PlacedSections, PlayerId, PlayerPair,
    PlayerState,
};
use crate::events::{AnimationEvent, EventKind, EventLog, EventTarget, TargetRef};

use super::{EffectCondition, EffectDescriptor, EffectKind, FollowUpTarget, ScalingSource};

/// Everything an effect needs to resolve.
///
/// Bundles the target, the acting player, the full player-state map, and
/// the originating card. All references are read-only; mutation happens on
/// copies inside [`process`].
#[derive(Clone, Copy, Debug)]
pub struct EffectContext<'a> {
    pub target: TargetRef,
    pub target_player: PlayerId,
    pub acting_player: PlayerId,
    pub players: &'a PlayerPair<PlayerState>,
    pub placed: &'a PlacedSections,
    pub source_card: Option<CardInstanceId>,
}

/// Outcome of the primary effect, used for deterministic chaining.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectResult {
    pub target_id: TargetRef,
    pub was_destroyed: bool,
    pub damage_dealt: DamageSplit,
}

/// Everything [`process`] hands back.
#[derive(Debug)]
pub struct EffectOutcome {
    /// Fresh copies of both player states; the inputs are untouched.
    pub players: PlayerPair<PlayerState>,
    /// None only when the target could not be resolved to a board
    /// position. Zero damage dealt still returns a populated result.
    pub result: Option<EffectResult>,
    pub events: Vec<AnimationEvent>,
    pub should_end_turn: bool,
}

/// Execute one effect descriptor, including its conditional chain.
pub fn process(
    descriptor: &EffectDescriptor,
    ctx: &EffectContext<'_>,
    log_sink: &mut LogSink<'_>,
) -> EffectOutcome {
    // Resolve the target to a lane/board position first; an unresolvable
    // target skips the whole effect and reports `result: None`.
    let lane = match ctx.target {
        TargetRef::Drone(id) => ctx.players[ctx.target_player]
            .find_drone(id)
            .map(|(lane, _)| lane),
        TargetRef::Section(kind) => lane_for_section(&ctx.placed[ctx.target_player], kind),
    };
    let Some(lane) = lane else {
        warn!("effect target {} could not be resolved; skipped", ctx.target);
        return EffectOutcome {
            players: ctx.players.clone(),
            result: None,
            events: Vec::new(),
            should_end_turn: !descriptor.goes_again,
        };
    };

    let (players, events, result) = match &descriptor.kind {
        EffectKind::Damage { value, damage_type } => {
            let mut details = ability_details(ctx, lane, *value);
            details.damage_type = *damage_type;
            let outcome = resolve_attack(&details, ctx.players, ctx.placed, log_sink);
            let result = EffectResult {
                target_id: outcome.result.target,
                was_destroyed: outcome.result.was_destroyed,
                damage_dealt: outcome.result.damage,
            };
            (outcome.players, outcome.events, Some(result))
        }

        EffectKind::DamageScaling { base, per } => {
            let magnitude = base + scaling_count(*per, ctx, lane);
            let details = ability_details(ctx, lane, magnitude);
            let outcome = resolve_attack(&details, ctx.players, ctx.placed, log_sink);
            let result = EffectResult {
                target_id: outcome.result.target,
                was_destroyed: outcome.result.was_destroyed,
                damage_dealt: outcome.result.damage,
            };
            (outcome.players, outcome.events, Some(result))
        }

        EffectKind::SplashDamage { value, splash } => {
            let details = ability_details(ctx, lane, *value);
            let outcome = resolve_attack(&details, ctx.players, ctx.placed, log_sink);
            let result = EffectResult {
                target_id: outcome.result.target,
                was_destroyed: outcome.result.was_destroyed,
                damage_dealt: outcome.result.damage,
            };
            let mut players = outcome.players;
            let mut events = outcome.events;
            if let TargetRef::Drone(main_id) = ctx.target {
                apply_splash(
                    &mut players,
                    ctx.target_player,
                    lane,
                    main_id,
                    *splash,
                    ctx.source_card,
                    &mut events,
                );
            }
            (players, events, Some(result))
        }

        EffectKind::Mark => {
            let mut players = ctx.players.clone();
            if let TargetRef::Drone(id) = ctx.target {
                if let Some((_, drone)) = players[ctx.target_player].find_drone_mut(id) {
                    drone.is_marked = true;
                }
            }
            log_sink(
                LogEntry::new(
                    ctx.acting_player,
                    "cardEffect",
                    "mark",
                    ctx.target.to_string(),
                    "target marked",
                )
                .with_debug_source("effects::process"),
            );
            let result = EffectResult {
                target_id: ctx.target,
                was_destroyed: false,
                damage_dealt: DamageSplit::default(),
            };
            (players, Vec::new(), Some(result))
        }
    };

    let mut outcome = EffectOutcome {
        players,
        result,
        events,
        should_end_turn: !descriptor.goes_again,
    };

    // Conditional follow-up, keyed deterministically off the primary result.
    if let (Some(follow), Some(primary)) = (&descriptor.then, outcome.result.clone()) {
        let fired = match follow.condition {
            EffectCondition::OnDestroy => primary.was_destroyed,
            EffectCondition::OnDamage => primary.damage_dealt.total() > 0,
        };
        if fired {
            let follow_target = match follow.target {
                FollowUpTarget::SameTarget => ctx.target,
                FollowUpTarget::SectionBehind => {
                    TargetRef::Section(ctx.placed[ctx.target_player][lane])
                }
            };
            let sub_ctx = EffectContext {
                target: follow_target,
                target_player: ctx.target_player,
                acting_player: ctx.acting_player,
                players: &outcome.players,
                placed: ctx.placed,
                source_card: ctx.source_card,
            };
            let sub = process(&follow.effect, &sub_ctx, log_sink);
            outcome.players = sub.players;
            outcome.events.extend(sub.events);
        }
    }

    // Renumber the combined chain so consumers see one coherent order.
    for (i, event) in outcome.events.iter_mut().enumerate() {
        event.seq = i as u32;
    }

    outcome
}

/// Build the fixed-damage attack the resolver executes for this effect.
fn ability_details(ctx: &EffectContext<'_>, lane: Lane, magnitude: i32) -> AttackDetails {
    let mut details = AttackDetails::ability(
        magnitude,
        ctx.acting_player,
        ctx.target,
        ctx.target_player,
        lane,
    );
    details.source_card = ctx.source_card;
    details
}

/// Dynamic magnitude for scaling effects.
fn scaling_count(per: ScalingSource, ctx: &EffectContext<'_>, lane: Lane) -> i32 {
    match per {
        ScalingSource::ReadyDronesInLane => {
            ctx.players[ctx.acting_player].ready_drone_count(lane) as i32
        }
        ScalingSource::ExhaustedEnemiesInLane => ctx.players[ctx.target_player].drones_on_board
            [lane]
            .iter()
            .filter(|d| d.is_exhausted)
            .count() as i32,
    }
}

/// Splash the other drones in the target's lane.
fn apply_splash(
    players: &mut PlayerPair<PlayerState>,
    target_player: PlayerId,
    lane: Lane,
    main_target: DroneId,
    amount: i32,
    source_card: Option<CardInstanceId>,
    events: &mut Vec<AnimationEvent>,
) {
    if amount <= 0 {
        return;
    }
    let others: Vec<DroneId> = players[target_player].drones_on_board[lane]
        .iter()
        .filter(|d| d.id != main_target)
        .map(|d| d.id)
        .collect();

    let mut log = EventLog::new(source_card);
    for id in others {
        let state = &mut players[target_player];
        let Some((drone_lane, drone)) = state.find_drone_mut(id) else {
            continue;
        };
        let shield = drone.absorb_shields(amount);
        drone.take_hull_damage(amount - shield);
        let destroyed = drone.hull <= 0;

        let target_ref = EventTarget::drone(id, target_player, drone_lane);
        log.push(EventKind::SplashDamage {
            target: target_ref,
            amount,
        });
        if destroyed {
            log.push(EventKind::Destroyed { target: target_ref });
            state.remove_drone(id);
            state.recalculate_lane_auras();
        }
    }
    events.extend(log.into_events());
}
