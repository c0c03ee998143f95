//! Attack resolution.
//!
//! `resolve_attack` is the central rule function: it computes damage,
//! applies the shield/hull split, decides destruction, runs the secondary
//! exchanges (overflow, retaliation, dogfight) and after-attack hooks, and
//! returns a structurally independent copy of both player states together
//! with the ordered animation events describing every visible consequence.
//!
//! ## Degraded resolutions
//!
//! A dangling target reference computes zero damage instead of aborting
//! the action. Callers are expected to submit valid references; the
//! leniency exists so a stale queued action cannot corrupt state. Each
//! degraded resolution is reported through the `log` facade.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::combat_log::{LogEntry, LogSink};
use crate::core::{
    lane_for_section, AfterAttack, CardInstanceId, DroneId, Keyword, Lane, ModDuration,
    ModSource, PlacedSections, PlayerId, PlayerPair, PlayerState, SectionKind, Stat, StatMod,
};
use crate::events::{AnimationEvent, EventKind, EventLog, EventTarget, TargetRef};

/// How damage interacts with shields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    /// Shields absorb first; hull takes the remainder.
    Normal,
    /// Shields are skipped entirely.
    Piercing,
}

/// Ephemeral description of one pending attack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackDetails {
    /// None for ability/card damage.
    pub attacker: Option<DroneId>,
    pub attacking_player: PlayerId,
    pub target: TargetRef,
    pub target_player: PlayerId,
    /// When set, replaces the target for all damage and event purposes.
    pub interceptor: Option<DroneId>,
    /// Fixed damage for ability/card sources; otherwise the attacker's
    /// effective attack is used.
    pub ability_damage: Option<i32>,
    /// Explicit override; wins over keyword-derived damage types.
    pub damage_type: Option<DamageType>,
    /// When set, resolving this attack does not end the turn.
    pub go_again: bool,
    pub lane: Lane,
    pub source_card: Option<CardInstanceId>,
}

impl AttackDetails {
    /// A plain drone attack.
    #[must_use]
    pub fn drone_attack(
        attacker: DroneId,
        attacking_player: PlayerId,
        target: TargetRef,
        target_player: PlayerId,
        lane: Lane,
    ) -> Self {
        Self {
            attacker: Some(attacker),
            attacking_player,
            target,
            target_player,
            interceptor: None,
            ability_damage: None,
            damage_type: None,
            go_again: false,
            lane,
            source_card: None,
        }
    }

    /// Fixed-value ability or card damage (no attacker).
    #[must_use]
    pub fn ability(
        value: i32,
        acting_player: PlayerId,
        target: TargetRef,
        target_player: PlayerId,
        lane: Lane,
    ) -> Self {
        Self {
            attacker: None,
            attacking_player: acting_player,
            target,
            target_player,
            interceptor: None,
            ability_damage: Some(value),
            damage_type: None,
            go_again: false,
            lane,
            source_card: None,
        }
    }

    /// Redirect the attack onto an interceptor (builder pattern).
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: DroneId) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Force a damage type (builder pattern).
    #[must_use]
    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = Some(damage_type);
        self
    }

    /// Keep the turn after resolution (builder pattern).
    #[must_use]
    pub fn with_go_again(mut self) -> Self {
        self.go_again = true;
        self
    }

    /// Correlate events with an originating card (builder pattern).
    #[must_use]
    pub fn with_source_card(mut self, card: CardInstanceId) -> Self {
        self.source_card = Some(card);
        self
    }
}

/// Shield/hull damage split actually dealt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSplit {
    pub shield: i32,
    pub hull: i32,
}

impl DamageSplit {
    /// Total damage dealt.
    #[must_use]
    pub fn total(&self) -> i32 {
        self.shield + self.hull
    }
}

/// Outcome of one resolved attack against its final target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    pub target: TargetRef,
    pub target_player: PlayerId,
    pub damage: DamageSplit,
    pub damage_type: DamageType,
    pub was_destroyed: bool,
}

/// Everything `resolve_attack` hands back.
#[derive(Debug)]
pub struct AttackOutcome {
    /// Fresh copies of both player states; the inputs are untouched.
    pub players: PlayerPair<PlayerState>,
    pub should_end_turn: bool,
    pub result: AttackResult,
    pub events: Vec<AnimationEvent>,
}

/// Secondary strikes against the attacker.
enum StrikeKind {
    Retaliate,
    Dogfight,
}

/// Resolve one attack to completion.
///
/// Input states are never mutated; both boards come back as structurally
/// independent copies with every consequence applied.
pub fn resolve_attack(
    details: &AttackDetails,
    players: &PlayerPair<PlayerState>,
    placed: &PlacedSections,
    log_sink: &mut LogSink<'_>,
) -> AttackOutcome {
    let mut next = players.clone();
    let mut events = EventLog::new(details.source_card);

    let attacker_player = details.attacking_player;
    let defender = details.target_player;
    let is_drone_attack = details.attacker.is_some() && details.ability_damage.is_none();

    // Snapshot the attacker before anything moves: lane, capabilities, and
    // effective attack all read from pre-resolution state.
    let attacker_info = details.attacker.and_then(|id| {
        let state = &next[attacker_player];
        state.find_drone(id).map(|(lane, d)| {
            let status = state.lane_status(lane, &placed[attacker_player]);
            (lane, d.clone(), d.effective_attack(status))
        })
    });
    if details.attacker.is_some() && attacker_info.is_none() {
        warn!(
            "attacker {:?} could not be located; damage degrades to 0",
            details.attacker
        );
    }

    // Step 1: an interceptor replaces the original target entirely.
    let final_target = match details.interceptor {
        Some(id) => TargetRef::Drone(id),
        None => details.target,
    };

    // Step 2: raw damage.
    let raw_damage = details
        .ability_damage
        .unwrap_or_else(|| attacker_info.as_ref().map_or(0, |(_, _, atk)| *atk))
        .max(0);

    let target_marked = match final_target {
        TargetRef::Drone(id) => next[defender]
            .find_drone(id)
            .map_or(false, |(_, d)| d.is_marked),
        TargetRef::Section(_) => false,
    };

    // Step 3: damage type, first match wins.
    let damage_type = details.damage_type.unwrap_or_else(|| match &attacker_info {
        Some((_, drone, _)) if drone.has_keyword(Keyword::Piercing) => DamageType::Piercing,
        Some((_, drone, _)) if drone.has_keyword(Keyword::Tracker) && target_marked => {
            DamageType::Piercing
        }
        _ => DamageType::Normal,
    });

    // Step 4: static bonus vs sections, plain drone attacks only.
    let siege_bonus = match (&final_target, &attacker_info) {
        (TargetRef::Section(_), Some((_, drone, _)))
            if is_drone_attack && drone.has_keyword(Keyword::Siege) =>
        {
            drone.siege_bonus
        }
        _ => 0,
    };
    let total_damage = raw_damage + siege_bonus;

    let mut result = AttackResult {
        target: final_target,
        target_player: defender,
        damage: DamageSplit::default(),
        damage_type,
        was_destroyed: false,
    };
    let mut target_survived = true;
    let mut outcome_text = String::from("no valid target; no damage dealt");

    // Steps 5-7: split, events, commit against the final target.
    match final_target {
        TargetRef::Drone(target_id) => {
            let located = next[defender]
                .find_drone(target_id)
                .map(|(lane, d)| (lane, d.clone()));

            if let Some((target_lane, target_before)) = located {
                let target_ref = EventTarget::drone(target_id, defender, target_lane);
                if let Some((atk_lane, atk, _)) = &attacker_info {
                    events.push(EventKind::AttackStart {
                        attacker: atk.id,
                        attacking_player: attacker_player,
                        lane: *atk_lane,
                        target: target_ref,
                    });
                }

                let shield_absorbed = if damage_type == DamageType::Piercing {
                    0
                } else {
                    total_damage.min(target_before.current_shields)
                };
                let remaining = total_damage - shield_absorbed;
                let hull_dealt = remaining.min(target_before.hull);
                let destroyed = target_before.hull - hull_dealt <= 0;

                if shield_absorbed > 0 {
                    events.push(EventKind::ShieldDamage {
                        target: target_ref,
                        amount: shield_absorbed,
                    });
                }

                if let Some((_, drone)) = next[defender].find_drone_mut(target_id) {
                    drone.absorb_shields(shield_absorbed);
                    drone.take_hull_damage(hull_dealt);
                }

                // Exactly one of Destroyed or HullDamage per target.
                if destroyed {
                    events.push(EventKind::Destroyed { target: target_ref });
                    next[defender].remove_drone(target_id);
                    next[defender].recalculate_lane_auras();
                    target_survived = false;
                } else if hull_dealt > 0 {
                    events.push(EventKind::HullDamage {
                        target: target_ref,
                        amount: hull_dealt,
                    });
                }

                result.damage = DamageSplit {
                    shield: shield_absorbed,
                    hull: hull_dealt,
                };
                result.was_destroyed = destroyed;
                outcome_text = if destroyed {
                    format!(
                        "dealt {shield_absorbed} shield and {hull_dealt} hull damage; {} destroyed",
                        target_before.name
                    )
                } else {
                    format!("dealt {shield_absorbed} shield and {hull_dealt} hull damage")
                };

                // Overflow: excess destruction damage carries to the section
                // behind the lane it happened in.
                if destroyed && is_drone_attack {
                    if let Some((_, atk, _)) = &attacker_info {
                        let excess = remaining - hull_dealt;
                        if atk.has_keyword(Keyword::Overflow) && excess > 0 {
                            let kind = placed[defender][target_lane];
                            events.push(EventKind::OverflowProjectile {
                                from: target_ref,
                                to: EventTarget::section(kind, defender, Some(target_lane)),
                                amount: excess,
                            });
                            apply_section_damage(
                                &mut next[defender],
                                defender,
                                kind,
                                Some(target_lane),
                                excess,
                                damage_type,
                                &mut events,
                            );
                        }
                    }
                }

                // Retaliation: a surviving defender that was actually hurt
                // strikes the attacker back with its own attack value.
                if !destroyed && is_drone_attack && result.damage.total() > 0 {
                    let retaliates = next[defender]
                        .find_drone(target_id)
                        .map_or(false, |(_, d)| d.has_keyword(Keyword::Retaliate));
                    if retaliates {
                        let amount = next[defender]
                            .effective_attack(target_id, &placed[defender])
                            .unwrap_or(0);
                        if amount > 0 {
                            if let Some((atk_lane, atk, _)) = &attacker_info {
                                strike_back(
                                    &mut next[attacker_player],
                                    attacker_player,
                                    atk.id,
                                    *atk_lane,
                                    amount,
                                    StrikeKind::Retaliate,
                                    &mut events,
                                );
                            }
                        }
                    }
                }
            } else {
                warn!("target {target_id} could not be located; damage degrades to 0");
            }
        }
        TargetRef::Section(kind) => {
            let lane = lane_for_section(&placed[defender], kind);
            let target_ref = EventTarget::section(kind, defender, lane);
            if let Some((atk_lane, atk, _)) = &attacker_info {
                events.push(EventKind::AttackStart {
                    attacker: atk.id,
                    attacking_player: attacker_player,
                    lane: *atk_lane,
                    target: target_ref,
                });
            }
            result.damage = apply_section_damage(
                &mut next[defender],
                defender,
                kind,
                lane,
                total_damage,
                damage_type,
                &mut events,
            );
            outcome_text = format!(
                "dealt {} shield and {} hull damage to {kind}",
                result.damage.shield, result.damage.hull
            );
        }
    }

    // Dogfight: a surviving Dogfighter interceptor hits the attacker during
    // the exchange.
    if let Some(interceptor_id) = details.interceptor {
        if is_drone_attack {
            let dogfights = next[defender]
                .find_drone(interceptor_id)
                .map_or(false, |(_, d)| d.has_keyword(Keyword::Dogfighter));
            if dogfights {
                let amount = next[defender]
                    .effective_attack(interceptor_id, &placed[defender])
                    .unwrap_or(0);
                if amount > 0 {
                    if let Some((atk_lane, atk, _)) = &attacker_info {
                        strike_back(
                            &mut next[attacker_player],
                            attacker_player,
                            atk.id,
                            *atk_lane,
                            amount,
                            StrikeKind::Dogfight,
                            &mut events,
                        );
                    }
                }
            }
        }
    }

    // Attacker returns only if both sides of the exchange still stand.
    if is_drone_attack && target_survived {
        if let Some((atk_lane, atk, _)) = &attacker_info {
            if next[attacker_player].find_drone(atk.id).is_some() {
                events.push(EventKind::DroneReturn {
                    drone: atk.id,
                    player: attacker_player,
                    lane: *atk_lane,
                });
            }
        }
    }

    // Step 8: attacker post-processing (plain drone attacks only).
    if is_drone_attack {
        if let Some((atk_lane, atk_snapshot, _)) = &attacker_info {
            if let Some((_, drone)) = next[attacker_player].find_drone_mut(atk_snapshot.id) {
                // ASSAULT's free attack is a one-shot; consume it.
                if drone.has_keyword(Keyword::Assault) && !drone.assault_used {
                    drone.assault_used = true;
                } else {
                    drone.is_exhausted = true;
                }
            }

            match atk_snapshot.after_attack {
                Some(AfterAttack::SelfDestruct) => {
                    if next[attacker_player].find_drone(atk_snapshot.id).is_some() {
                        events.push(EventKind::Destroyed {
                            target: EventTarget::drone(
                                atk_snapshot.id,
                                attacker_player,
                                *atk_lane,
                            ),
                        });
                        next[attacker_player].remove_drone(atk_snapshot.id);
                        next[attacker_player].recalculate_lane_auras();
                        log_sink(
                            LogEntry::new(
                                attacker_player,
                                "afterAttack",
                                atk_snapshot.name.clone(),
                                atk_snapshot.name.clone(),
                                "self-destructed after attacking",
                            )
                            .with_debug_source("resolve_attack"),
                        );
                    }
                }
                Some(AfterAttack::GainAttack(amount)) => {
                    if let Some((_, drone)) =
                        next[attacker_player].find_drone_mut(atk_snapshot.id)
                    {
                        drone.add_mod(StatMod {
                            stat: Stat::Attack,
                            amount,
                            duration: ModDuration::Permanent,
                            source: ModSource::Ability,
                        });
                    }
                }
                None => {}
            }
        }
    }

    // Step 9: interceptor exhaustion.
    if let Some(interceptor_id) = details.interceptor {
        if let Some((_, drone)) = next[defender].find_drone_mut(interceptor_id) {
            if !drone.has_keyword(Keyword::Defender) {
                drone.is_exhausted = true;
            }
        }
    }

    // Step 10: one structured log entry per resolution.
    let source_name = attacker_info
        .as_ref()
        .map_or_else(|| "ability".to_string(), |(_, d, _)| d.name.clone());
    log_sink(
        LogEntry::new(
            attacker_player,
            if is_drone_attack { "attack" } else { "abilityDamage" },
            source_name,
            final_target.to_string(),
            outcome_text,
        )
        .with_debug_source("resolve_attack"),
    );

    AttackOutcome {
        players: next,
        should_end_turn: !details.go_again,
        result,
        events: events.into_events(),
    }
}

/// Apply damage to a ship section, emitting shield and section events.
///
/// Sections clamp at zero hull and are never destroyed.
fn apply_section_damage(
    state: &mut PlayerState,
    owner: PlayerId,
    kind: SectionKind,
    lane: Option<Lane>,
    amount: i32,
    damage_type: DamageType,
    events: &mut EventLog,
) -> DamageSplit {
    let target_ref = EventTarget::section(kind, owner, lane);
    let section = &mut state.ship_sections[kind];

    let shield_absorbed = if damage_type == DamageType::Piercing {
        0
    } else {
        section.absorb_shields(amount)
    };
    let hull_dealt = section.take_hull_damage(amount - shield_absorbed);
    let status = section.status();

    if shield_absorbed > 0 {
        events.push(EventKind::ShieldDamage {
            target: target_ref,
            amount: shield_absorbed,
        });
    }
    if hull_dealt > 0 {
        events.push(EventKind::SectionDamaged {
            target: target_ref,
            amount: hull_dealt,
            status,
        });
    }

    DamageSplit {
        shield: shield_absorbed,
        hull: hull_dealt,
    }
}

/// Apply a retaliation or dogfight strike to the original attacker.
fn strike_back(
    state: &mut PlayerState,
    owner: PlayerId,
    drone_id: DroneId,
    lane: Lane,
    amount: i32,
    kind: StrikeKind,
    events: &mut EventLog,
) {
    let Some((_, drone)) = state.find_drone_mut(drone_id) else {
        return;
    };
    let shield = drone.absorb_shields(amount);
    drone.take_hull_damage(amount - shield);
    let destroyed = drone.hull <= 0;

    let target_ref = EventTarget::drone(drone_id, owner, lane);
    events.push(match kind {
        StrikeKind::Retaliate => EventKind::RetaliateDamage {
            target: target_ref,
            amount,
        },
        StrikeKind::Dogfight => EventKind::DogfightDamage {
            target: target_ref,
            amount,
        },
    });

    if destroyed {
        events.push(EventKind::Destroyed { target: target_ref });
        state.remove_drone(drone_id);
        state.recalculate_lane_auras();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DroneInstance, LaneMap, SectionStatus};

    fn placed() -> PlacedSections {
        PlayerPair::new(|_| LaneMap::new(|lane| SectionKind::ALL[lane.index()]))
    }

    fn drone(id: u32, owner: PlayerId, attack: i32, hull: i32, shields: i32) -> DroneInstance {
        DroneInstance::new(DroneId::new(id), format!("D{id}"), owner, attack, 2, hull, shields)
    }

    fn setup(attacker: DroneInstance, target: DroneInstance) -> PlayerPair<PlayerState> {
        let mut players: PlayerPair<PlayerState> = PlayerPair::with_default();
        players[PlayerId::One].add_drone(Lane::Left, attacker);
        players[PlayerId::Two].add_drone(Lane::Left, target);
        players
    }

    fn no_log() -> impl FnMut(LogEntry) {
        |_| {}
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let players = setup(
            drone(1, PlayerId::One, 3, 2, 1),
            drone(2, PlayerId::Two, 1, 2, 1),
        );
        let before = bincode::serialize(&players).unwrap();

        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let _ = resolve_attack(&details, &players, &placed(), &mut sink);

        assert_eq!(bincode::serialize(&players).unwrap(), before);
    }

    #[test]
    fn test_shield_then_hull_split() {
        let players = setup(
            drone(1, PlayerId::One, 3, 2, 0),
            drone(2, PlayerId::Two, 1, 3, 1),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert_eq!(outcome.result.damage, DamageSplit { shield: 1, hull: 2 });
        assert!(!outcome.result.was_destroyed);

        let survivor = outcome.players[PlayerId::Two]
            .find_drone(DroneId::new(2))
            .unwrap()
            .1;
        assert_eq!(survivor.current_shields, 0);
        assert_eq!(survivor.hull, 1);
    }

    #[test]
    fn test_piercing_skips_shields() {
        let players = setup(
            drone(1, PlayerId::One, 2, 2, 0).with_keyword(Keyword::Piercing),
            drone(2, PlayerId::Two, 1, 3, 2),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert_eq!(outcome.result.damage, DamageSplit { shield: 0, hull: 2 });
        let survivor = outcome.players[PlayerId::Two]
            .find_drone(DroneId::new(2))
            .unwrap()
            .1;
        assert_eq!(survivor.current_shields, 2);
        assert_eq!(survivor.hull, 1);
    }

    #[test]
    fn test_tracker_pierces_marked_targets_only() {
        let mut marked_target = drone(2, PlayerId::Two, 1, 3, 2);
        marked_target.is_marked = true;
        let players = setup(
            drone(1, PlayerId::One, 2, 2, 0).with_keyword(Keyword::Tracker),
            marked_target,
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);
        assert_eq!(outcome.result.damage_type, DamageType::Piercing);

        // Unmarked: normal damage.
        let players = setup(
            drone(1, PlayerId::One, 2, 2, 0).with_keyword(Keyword::Tracker),
            drone(2, PlayerId::Two, 1, 3, 2),
        );
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);
        assert_eq!(outcome.result.damage_type, DamageType::Normal);
    }

    #[test]
    fn test_explicit_damage_type_wins() {
        let players = setup(
            drone(1, PlayerId::One, 2, 2, 0).with_keyword(Keyword::Piercing),
            drone(2, PlayerId::Two, 1, 3, 2),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        )
        .with_damage_type(DamageType::Normal);
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert_eq!(outcome.result.damage_type, DamageType::Normal);
        assert_eq!(outcome.result.damage.shield, 2);
    }

    #[test]
    fn test_destruction_emits_destroyed_not_hull_damage() {
        let players = setup(
            drone(1, PlayerId::One, 4, 4, 1),
            drone(2, PlayerId::Two, 1, 1, 1),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert!(outcome.result.was_destroyed);
        assert_eq!(outcome.result.damage, DamageSplit { shield: 1, hull: 1 });
        assert!(outcome.players[PlayerId::Two]
            .find_drone(DroneId::new(2))
            .is_none());

        let has_destroyed = outcome
            .events
            .iter()
            .any(|e| matches!(e.kind, EventKind::Destroyed { .. }));
        let has_hull = outcome.events.iter().any(|e| {
            matches!(
                e.kind,
                EventKind::HullDamage {
                    target: EventTarget {
                        id: TargetRef::Drone(id),
                        ..
                    },
                    ..
                } if id == DroneId::new(2)
            )
        });
        assert!(has_destroyed);
        assert!(!has_hull);
    }

    #[test]
    fn test_event_causal_order() {
        let players = setup(
            drone(1, PlayerId::One, 2, 3, 0),
            drone(2, PlayerId::Two, 1, 3, 1),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        let kinds: Vec<&EventKind> = outcome.events.iter().map(|e| &e.kind).collect();
        assert!(matches!(kinds[0], EventKind::AttackStart { .. }));
        assert!(matches!(kinds[1], EventKind::ShieldDamage { .. }));
        assert!(matches!(kinds[2], EventKind::HullDamage { .. }));
        assert!(matches!(kinds[3], EventKind::DroneReturn { .. }));

        let seqs: Vec<u32> = outcome.events.iter().map(|e| e.seq).collect();
        let mut sorted = seqs.clone();
        sorted.sort_unstable();
        assert_eq!(seqs, sorted);
    }

    #[test]
    fn test_interceptor_replaces_target() {
        let mut players = setup(
            drone(1, PlayerId::One, 2, 2, 0),
            drone(2, PlayerId::Two, 1, 2, 1),
        );
        players[PlayerId::Two].add_drone(Lane::Left, drone(3, PlayerId::Two, 1, 2, 1));

        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        )
        .with_interceptor(DroneId::new(3));
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        // Original target untouched; interceptor took the hit and exhausted.
        let original = outcome.players[PlayerId::Two]
            .find_drone(DroneId::new(2))
            .unwrap()
            .1;
        assert_eq!(original.hull, 2);
        assert_eq!(original.current_shields, 1);

        let interceptor = outcome.players[PlayerId::Two]
            .find_drone(DroneId::new(3))
            .unwrap()
            .1;
        assert_eq!(interceptor.current_shields, 0);
        assert_eq!(interceptor.hull, 1);
        assert!(interceptor.is_exhausted);
    }

    #[test]
    fn test_defender_keyword_skips_interceptor_exhaustion() {
        let mut players = setup(
            drone(1, PlayerId::One, 1, 2, 0),
            drone(2, PlayerId::Two, 1, 2, 1),
        );
        players[PlayerId::Two].add_drone(
            Lane::Left,
            drone(3, PlayerId::Two, 1, 3, 1).with_keyword(Keyword::Defender),
        );

        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        )
        .with_interceptor(DroneId::new(3));
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert!(!outcome.players[PlayerId::Two]
            .find_drone(DroneId::new(3))
            .unwrap()
            .1
            .is_exhausted);
    }

    #[test]
    fn test_section_attack_with_siege_bonus() {
        let mut players: PlayerPair<PlayerState> = PlayerPair::with_default();
        players[PlayerId::One].add_drone(
            Lane::Left,
            drone(1, PlayerId::One, 4, 2, 1).with_siege_bonus(2),
        );

        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Section(SectionKind::Bridge),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        // 4 attack + 2 siege = 6: 2 to shields, 4 to hull.
        assert_eq!(outcome.result.damage, DamageSplit { shield: 2, hull: 4 });
        let section = &outcome.players[PlayerId::Two].ship_sections[SectionKind::Bridge];
        assert_eq!(section.allocated_shields, 0);
        assert_eq!(section.hull, 4);

        let shake = outcome.events.iter().any(|e| {
            matches!(
                e.kind,
                EventKind::SectionDamaged {
                    status: SectionStatus::Damaged,
                    ..
                }
            )
        });
        assert!(shake);
    }

    #[test]
    fn test_siege_bonus_not_applied_to_ability_damage() {
        let players: PlayerPair<PlayerState> = PlayerPair::with_default();
        let details = AttackDetails::ability(
            3,
            PlayerId::One,
            TargetRef::Section(SectionKind::Bridge),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert_eq!(outcome.result.damage.total(), 3);
    }

    #[test]
    fn test_overflow_carries_to_section() {
        let players = setup(
            drone(1, PlayerId::One, 4, 2, 0).with_keyword(Keyword::Overflow),
            drone(2, PlayerId::Two, 1, 1, 0),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert!(outcome.result.was_destroyed);
        let has_overflow = outcome
            .events
            .iter()
            .any(|e| matches!(e.kind, EventKind::OverflowProjectile { amount: 3, .. }));
        assert!(has_overflow);

        // 3 excess into the Left-lane section: 2 shields then 1 hull.
        let section = &outcome.players[PlayerId::Two].ship_sections[SectionKind::Bridge];
        assert_eq!(section.allocated_shields, 0);
        assert_eq!(section.hull, 7);
    }

    #[test]
    fn test_assault_one_shot_exhaustion() {
        let mut players = setup(
            drone(1, PlayerId::One, 1, 2, 0).with_keyword(Keyword::Assault),
            drone(2, PlayerId::Two, 0, 5, 5),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();

        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);
        let attacker = outcome.players[PlayerId::One]
            .find_drone(DroneId::new(1))
            .unwrap()
            .1;
        assert!(!attacker.is_exhausted);
        assert!(attacker.assault_used);

        // Second attack the same round exhausts.
        players = outcome.players;
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);
        assert!(outcome.players[PlayerId::One]
            .find_drone(DroneId::new(1))
            .unwrap()
            .1
            .is_exhausted);
    }

    #[test]
    fn test_self_destruct_hook() {
        let players = setup(
            drone(1, PlayerId::One, 2, 1, 0).with_after_attack(AfterAttack::SelfDestruct),
            drone(2, PlayerId::Two, 1, 5, 0),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut entries = Vec::new();
        let mut sink = |entry: LogEntry| entries.push(entry);
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert!(outcome.players[PlayerId::One]
            .find_drone(DroneId::new(1))
            .is_none());
        let destroyed_self = outcome.events.iter().any(|e| {
            matches!(
                e.kind,
                EventKind::Destroyed {
                    target: EventTarget {
                        id: TargetRef::Drone(id),
                        ..
                    }
                } if id == DroneId::new(1)
            )
        });
        assert!(destroyed_self);
        assert_eq!(entries.len(), 2); // hook entry + resolution entry
    }

    #[test]
    fn test_gain_attack_hook_is_permanent() {
        let players = setup(
            drone(1, PlayerId::One, 1, 2, 0).with_after_attack(AfterAttack::GainAttack(1)),
            drone(2, PlayerId::Two, 1, 5, 5),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        let attacker = outcome.players[PlayerId::One]
            .find_drone(DroneId::new(1))
            .unwrap()
            .1;
        assert_eq!(attacker.effective_attack(SectionStatus::Healthy), 2);
        assert_eq!(attacker.stat_mods[0].duration, ModDuration::Permanent);
    }

    #[test]
    fn test_missing_target_degrades_to_zero() {
        let mut players: PlayerPair<PlayerState> = PlayerPair::with_default();
        players[PlayerId::One].add_drone(Lane::Left, drone(1, PlayerId::One, 3, 2, 0));
        let before = bincode::serialize(&players[PlayerId::Two]).unwrap();

        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(99)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert_eq!(outcome.result.damage.total(), 0);
        assert!(!outcome.result.was_destroyed);
        assert_eq!(bincode::serialize(&outcome.players[PlayerId::Two]).unwrap(), before);
    }

    #[test]
    fn test_go_again_keeps_turn() {
        let players = setup(
            drone(1, PlayerId::One, 1, 2, 0),
            drone(2, PlayerId::Two, 1, 5, 5),
        );
        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        )
        .with_go_again();
        let mut sink = no_log();
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        assert!(!outcome.should_end_turn);
    }
}
