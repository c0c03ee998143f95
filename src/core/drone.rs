//! Drone instances: the live units on the board.
//!
//! A `DroneInstance` is the runtime state of one deployed drone. Static
//! numbers live in the definition registry; the instance carries everything
//! that changes during a match — hull, shields, exhaustion, one-shot flags,
//! and an ordered list of stat modifiers.
//!
//! ## Effective stats
//!
//! A drone's effective attack and speed are its base values plus every
//! applicable stat mod (auras included, since auras are materialized as
//! mods), minus the penalty of fighting in front of a critical section.
//! Effective stats never go below zero.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::{DroneId, PlayerId};
use super::ship::SectionStatus;

/// Stat penalty applied to drones whose lane section is critical.
pub const CRITICAL_SECTION_PENALTY: i32 = 1;

/// Derived capability keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// Damage bypasses shields entirely.
    Piercing,
    /// Does not exhaust when intercepting.
    Defender,
    /// First attack each round does not exhaust.
    Assault,
    /// Strikes the attacker back after surviving a drone attack.
    Retaliate,
    /// Piercing, but only against marked targets.
    Tracker,
    /// Bonus damage when attacking ship sections.
    Siege,
    /// Excess destruction damage carries to the section behind the lane.
    Overflow,
    /// Damages the attacker during an interception exchange.
    Dogfighter,
    /// Grants +1 attack to other drones in the same lane.
    CommandAura,
}

/// Which stat a modifier applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Attack,
    Speed,
}

/// How long a modifier lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModDuration {
    Permanent,
    ThisRound,
}

/// Where a modifier came from. Aura mods are cleared and rebuilt whenever
/// lane composition changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModSource {
    Ability,
    Upgrade,
    Aura(DroneId),
}

/// One temporary or permanent stat modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatMod {
    pub stat: Stat,
    pub amount: i32,
    pub duration: ModDuration,
    pub source: ModSource,
}

/// Hook that fires after a drone completes a real attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AfterAttack {
    /// The drone destroys itself once its attack resolves.
    SelfDestruct,
    /// The drone permanently gains attack.
    GainAttack(i32),
}

/// Runtime state of one deployed drone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DroneInstance {
    pub id: DroneId,
    /// Key into the static definition registry.
    pub name: String,
    pub owner: PlayerId,
    pub hull: i32,
    pub max_hull: i32,
    pub current_shields: i32,
    pub max_shields: i32,
    pub is_exhausted: bool,
    /// One-shot flag: set once the free Assault attack has been spent.
    pub assault_used: bool,
    /// Targeting beacon; Tracker attackers pierce marked targets.
    pub is_marked: bool,
    pub stat_mods: SmallVec<[StatMod; 4]>,
    pub keywords: FxHashSet<Keyword>,
    base_attack: i32,
    base_speed: i32,
    /// Flat bonus applied when a Siege drone attacks a ship section.
    pub siege_bonus: i32,
    pub after_attack: Option<AfterAttack>,
}

impl DroneInstance {
    /// Create an instance with explicit base stats.
    ///
    /// Deployment normally goes through `DroneDefinition::spawn`; this
    /// constructor is the low-level entry point it uses.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: DroneId,
        name: impl Into<String>,
        owner: PlayerId,
        attack: i32,
        speed: i32,
        hull: i32,
        shields: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            hull,
            max_hull: hull,
            current_shields: shields,
            max_shields: shields,
            is_exhausted: false,
            assault_used: false,
            is_marked: false,
            stat_mods: SmallVec::new(),
            keywords: FxHashSet::default(),
            base_attack: attack,
            base_speed: speed,
            siege_bonus: 0,
            after_attack: None,
        }
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    /// Set the siege bonus (builder pattern).
    #[must_use]
    pub fn with_siege_bonus(mut self, bonus: i32) -> Self {
        self.keywords.insert(Keyword::Siege);
        self.siege_bonus = bonus;
        self
    }

    /// Set the after-attack hook (builder pattern).
    #[must_use]
    pub fn with_after_attack(mut self, hook: AfterAttack) -> Self {
        self.after_attack = Some(hook);
        self
    }

    /// Base attack before mods.
    #[must_use]
    pub fn base_attack(&self) -> i32 {
        self.base_attack
    }

    /// Base speed before mods.
    #[must_use]
    pub fn base_speed(&self) -> i32 {
        self.base_speed
    }

    /// Whether the drone carries a keyword.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    /// Sum of mods for a stat.
    fn mod_total(&self, stat: Stat) -> i32 {
        self.stat_mods
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.amount)
            .sum()
    }

    /// Effective attack: base + mods − critical-lane penalty, floored at 0.
    #[must_use]
    pub fn effective_attack(&self, lane_status: SectionStatus) -> i32 {
        let penalty = if lane_status == SectionStatus::Critical {
            CRITICAL_SECTION_PENALTY
        } else {
            0
        };
        (self.base_attack + self.mod_total(Stat::Attack) - penalty).max(0)
    }

    /// Effective speed: base + mods − critical-lane penalty, floored at 0.
    #[must_use]
    pub fn effective_speed(&self, lane_status: SectionStatus) -> i32 {
        let penalty = if lane_status == SectionStatus::Critical {
            CRITICAL_SECTION_PENALTY
        } else {
            0
        };
        (self.base_speed + self.mod_total(Stat::Speed) - penalty).max(0)
    }

    /// Append a stat mod (order is preserved).
    pub fn add_mod(&mut self, stat_mod: StatMod) {
        self.stat_mods.push(stat_mod);
    }

    /// Drop every aura-sourced mod. Called before auras are rebuilt.
    pub fn clear_aura_mods(&mut self) {
        self.stat_mods
            .retain(|m| !matches!(m.source, ModSource::Aura(_)));
    }

    /// Drop round-scoped mods and reset round flags. Called at round end.
    pub fn end_round(&mut self) {
        self.stat_mods
            .retain(|m| m.duration != ModDuration::ThisRound);
        self.is_exhausted = false;
        self.assault_used = false;
    }

    /// Absorb shield damage, returning the amount actually absorbed.
    pub fn absorb_shields(&mut self, amount: i32) -> i32 {
        let absorbed = amount.min(self.current_shields).max(0);
        self.current_shields -= absorbed;
        absorbed
    }

    /// Take hull damage, clamped to remaining hull. Returns the amount dealt.
    ///
    /// The caller decides destruction: the instance is removed from the
    /// board when hull reaches zero, so committed hull is never negative.
    pub fn take_hull_damage(&mut self, amount: i32) -> i32 {
        let dealt = amount.min(self.hull).max(0);
        self.hull -= dealt;
        dealt
    }
}
