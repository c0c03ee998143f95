//! Ship sections: the layered hull behind each lane.
//!
//! Sections take the damage that gets past (or through) the drone screen.
//! They are never destroyed; hull clamps at zero. Crossing the damaged or
//! critical hull thresholds degrades the section, and a critical section
//! penalizes the effective stats of the drones fighting in front of it.

use serde::{Deserialize, Serialize};

use super::ids::SectionKind;

/// Degradation state derived from hull thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionStatus {
    Healthy,
    Damaged,
    Critical,
}

/// One ship section of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSection {
    pub kind: SectionKind,
    pub hull: i32,
    pub max_hull: i32,
    pub allocated_shields: i32,
    pub max_shields: i32,
    /// Hull at or below this is Damaged.
    pub damaged_threshold: i32,
    /// Hull at or below this is Critical.
    pub critical_threshold: i32,
}

impl ShipSection {
    /// Create a section at full hull and shields.
    #[must_use]
    pub fn new(kind: SectionKind, max_hull: i32, max_shields: i32) -> Self {
        Self {
            kind,
            hull: max_hull,
            max_hull,
            allocated_shields: max_shields,
            max_shields,
            damaged_threshold: max_hull / 2,
            critical_threshold: max_hull / 4,
        }
    }

    /// Override the degradation thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, damaged: i32, critical: i32) -> Self {
        self.damaged_threshold = damaged;
        self.critical_threshold = critical;
        self
    }

    /// Current degradation status.
    #[must_use]
    pub fn status(&self) -> SectionStatus {
        if self.hull <= self.critical_threshold {
            SectionStatus::Critical
        } else if self.hull <= self.damaged_threshold {
            SectionStatus::Damaged
        } else {
            SectionStatus::Healthy
        }
    }

    /// Absorb shield damage, returning the amount actually absorbed.
    pub fn absorb_shields(&mut self, amount: i32) -> i32 {
        let absorbed = amount.min(self.allocated_shields).max(0);
        self.allocated_shields -= absorbed;
        absorbed
    }

    /// Take hull damage, clamped at zero. Returns the amount actually dealt.
    pub fn take_hull_damage(&mut self, amount: i32) -> i32 {
        let dealt = amount.min(self.hull).max(0);
        self.hull -= dealt;
        dealt
    }

    /// Restore shields up to the allocation cap.
    pub fn restore_shields(&mut self, amount: i32) {
        self.allocated_shields = (self.allocated_shields + amount.max(0)).min(self.max_shields);
    }
}
