//! Declarative ability and card effects.
//!
//! Effects are data, not code: a card or drone ability is described by an
//! `EffectDescriptor`, and the pipeline in [`pipeline`] executes it. The
//! tag set is closed — the pipeline matches exhaustively, so an unhandled
//! effect kind is a compile error.

pub mod pipeline;

use serde::{Deserialize, Serialize};

use crate::combat::DamageType;

pub use pipeline::{process, EffectContext, EffectOutcome, EffectResult};

/// Dynamic magnitude sources for scaling effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingSource {
    /// Ready drones the acting player has in the target's lane.
    ReadyDronesInLane,
    /// Exhausted drones the target's owner has in the target's lane.
    ExhaustedEnemiesInLane,
}

/// The closed set of effect kinds this core executes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Fixed single-target damage.
    Damage {
        value: i32,
        /// Explicit override; None derives from the (absent) attacker,
        /// i.e. Normal.
        damage_type: Option<DamageType>,
    },
    /// Damage whose magnitude is computed at resolution time, then routed
    /// through the same single-target path as `Damage`.
    DamageScaling { base: i32, per: ScalingSource },
    /// Single-target damage plus reduced damage to every other drone in
    /// the target's lane.
    SplashDamage { value: i32, splash: i32 },
    /// Place a targeting beacon; Tracker attackers pierce marked drones.
    Mark,
}

/// What a conditional follow-up keys on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectCondition {
    /// The primary effect destroyed its target.
    OnDestroy,
    /// The primary effect dealt any damage.
    OnDamage,
}

/// Where a conditional follow-up is aimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUpTarget {
    /// The primary target (skipped if it no longer exists).
    SameTarget,
    /// The section placed behind the primary target's lane.
    SectionBehind,
}

/// A follow-up effect that chains off the primary result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionalEffect {
    pub condition: EffectCondition,
    pub target: FollowUpTarget,
    pub effect: EffectDescriptor,
}

/// One declarative effect, with optional conditional continuation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    /// When set, resolving this effect does not end the turn.
    pub goes_again: bool,
    pub then: Option<Box<ConditionalEffect>>,
}

impl EffectDescriptor {
    /// Fixed damage.
    #[must_use]
    pub fn damage(value: i32) -> Self {
        Self {
            kind: EffectKind::Damage {
                value,
                damage_type: None,
            },
            goes_again: false,
            then: None,
        }
    }

    /// Fixed piercing damage.
    #[must_use]
    pub fn piercing_damage(value: i32) -> Self {
        Self {
            kind: EffectKind::Damage {
                value,
                damage_type: Some(DamageType::Piercing),
            },
            goes_again: false,
            then: None,
        }
    }

    /// Scaling damage.
    #[must_use]
    pub fn scaling_damage(base: i32, per: ScalingSource) -> Self {
        Self {
            kind: EffectKind::DamageScaling { base, per },
            goes_again: false,
            then: None,
        }
    }

    /// Damage with lane splash.
    #[must_use]
    pub fn splash_damage(value: i32, splash: i32) -> Self {
        Self {
            kind: EffectKind::SplashDamage { value, splash },
            goes_again: false,
            then: None,
        }
    }

    /// Mark the target.
    #[must_use]
    pub fn mark() -> Self {
        Self {
            kind: EffectKind::Mark,
            goes_again: false,
            then: None,
        }
    }

    /// Attach a conditional follow-up (builder pattern).
    #[must_use]
    pub fn with_follow_up(
        mut self,
        condition: EffectCondition,
        target: FollowUpTarget,
        effect: EffectDescriptor,
    ) -> Self {
        self.then = Some(Box::new(ConditionalEffect {
            condition,
            target,
            effect,
        }));
        self
    }

    /// Keep the turn after resolution (builder pattern).
    #[must_use]
    pub fn with_go_again(mut self) -> Self {
        self.goes_again = true;
        self
    }
}
