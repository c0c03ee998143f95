//! Interception eligibility.
//!
//! A defending drone may redirect an incoming attack onto itself when it
//! shares the attacker's lane, is ready, and is at least as fast as the
//! attacker (speed ties favor the defender). These are pure functions over
//! the caller's state; nothing here mutates or commits.

use crate::core::{DroneId, GameRng, PlacedSections, PlayerState};

use super::resolver::AttackDetails;
use crate::events::TargetRef;

/// Probability the stock AI redirects an attack when it legally can.
const AI_INTERCEPT_CHANCE: f64 = 0.75;

/// Compute the drones that could legally intercept an attack by `attacker`.
///
/// Returns empty when the attacker is absent, exhausted, or cannot be
/// located in any lane.
#[must_use]
pub fn compute_interceptors(
    attacker: Option<DroneId>,
    attacker_state: &PlayerState,
    defender_state: &PlayerState,
    placed: &PlacedSections,
) -> Vec<DroneId> {
    let Some(attacker_id) = attacker else {
        return Vec::new();
    };
    let Some((lane, attacker_drone)) = attacker_state.find_drone(attacker_id) else {
        return Vec::new();
    };
    if attacker_drone.is_exhausted {
        return Vec::new();
    }

    let attacker_speed = attacker_drone
        .effective_speed(attacker_state.lane_status(lane, &placed[attacker_drone.owner]));

    defender_state.drones_on_board[lane]
        .iter()
        .filter(|d| !d.is_exhausted)
        .filter(|d| {
            let status = defender_state.lane_status(lane, &placed[d.owner]);
            d.effective_speed(status) >= attacker_speed
        })
        .map(|d| d.id)
        .collect()
}

/// Interception options computed for an AI defender.
#[derive(Clone, Debug)]
pub struct AiInterception {
    pub has_interceptors: bool,
    pub interceptors: Vec<DroneId>,
    pub attack_details: AttackDetails,
}

/// AI-facing interception query.
///
/// Same eligibility as [`compute_interceptors`], except the drone actually
/// being targeted is excluded — a drone cannot intercept an attack aimed at
/// itself. The pending attack is echoed back so the caller can attach its
/// chosen interceptor and submit.
#[must_use]
pub fn compute_ai_interception(
    pending: &AttackDetails,
    players: &crate::core::PlayerPair<PlayerState>,
    placed: &PlacedSections,
) -> AiInterception {
    let attacker_state = &players[pending.attacking_player];
    let defender_state = &players[pending.target_player];

    let mut interceptors =
        compute_interceptors(pending.attacker, attacker_state, defender_state, placed);

    if let TargetRef::Drone(target_id) = pending.target {
        interceptors.retain(|&id| id != target_id);
    }

    AiInterception {
        has_interceptors: !interceptors.is_empty(),
        interceptors,
        attack_details: pending.clone(),
    }
}

/// Stock AI interception choice: usually intercepts when it can, picking a
/// uniformly random eligible drone. Deterministic for a given RNG state.
#[must_use]
pub fn choose_interceptor(decision: &AiInterception, rng: &mut GameRng) -> Option<DroneId> {
    if decision.interceptors.is_empty() || !rng.chance(AI_INTERCEPT_CHANCE) {
        return None;
    }
    let pick = rng.gen_range(0..decision.interceptors.len());
    Some(decision.interceptors[pick])
}
