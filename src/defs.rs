//! Static drone definitions.
//!
//! Definitions are read-only reference data: base stats, keywords, and
//! hooks. The engine never mutates them; deployment stamps a definition
//! into a fresh `DroneInstance`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{AfterAttack, DroneId, DroneInstance, Keyword, PlayerId};

/// Immutable properties of a drone type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DroneDefinition {
    pub name: String,
    pub attack: i32,
    pub speed: i32,
    pub hull: i32,
    pub shields: i32,
    pub deployment_cost: i32,
    pub keywords: Vec<Keyword>,
    pub siege_bonus: i32,
    pub after_attack: Option<AfterAttack>,
}

impl DroneDefinition {
    /// Create a definition with the given base stats.
    #[must_use]
    pub fn new(name: impl Into<String>, attack: i32, speed: i32, hull: i32, shields: i32) -> Self {
        Self {
            name: name.into(),
            attack,
            speed,
            hull,
            shields,
            deployment_cost: 1,
            keywords: Vec::new(),
            siege_bonus: 0,
            after_attack: None,
        }
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.push(keyword);
        self
    }

    /// Set the section-attack bonus and add the Siege keyword.
    #[must_use]
    pub fn with_siege_bonus(mut self, bonus: i32) -> Self {
        if !self.keywords.contains(&Keyword::Siege) {
            self.keywords.push(Keyword::Siege);
        }
        self.siege_bonus = bonus;
        self
    }

    /// Set the after-attack hook (builder pattern).
    #[must_use]
    pub fn with_after_attack(mut self, hook: AfterAttack) -> Self {
        self.after_attack = Some(hook);
        self
    }

    /// Set the deployment cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.deployment_cost = cost;
        self
    }

    /// Stamp this definition into a live instance.
    #[must_use]
    pub fn spawn(&self, id: DroneId, owner: PlayerId) -> DroneInstance {
        let mut drone = DroneInstance::new(
            id,
            self.name.clone(),
            owner,
            self.attack,
            self.speed,
            self.hull,
            self.shields,
        );
        for &keyword in &self.keywords {
            drone.keywords.insert(keyword);
        }
        drone.siege_bonus = self.siege_bonus;
        drone.after_attack = self.after_attack;
        drone
    }
}

/// Registry of drone definitions, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct DroneRegistry {
    defs: FxHashMap<String, DroneDefinition>,
}

impl DroneRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the stock roster.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for def in [
            DroneDefinition::new("Scout", 1, 4, 1, 1),
            DroneDefinition::new("Mammoth", 4, 1, 4, 1).with_cost(3),
            DroneDefinition::new("Lancer", 2, 3, 2, 1).with_keyword(Keyword::Piercing),
            DroneDefinition::new("Aegis", 1, 3, 3, 2).with_keyword(Keyword::Defender),
            DroneDefinition::new("Viper", 2, 4, 1, 1).with_keyword(Keyword::Assault),
            DroneDefinition::new("Bulwark", 2, 2, 3, 1).with_keyword(Keyword::Retaliate),
            DroneDefinition::new("Talon", 2, 3, 2, 0).with_keyword(Keyword::Dogfighter),
            DroneDefinition::new("Marauder", 3, 2, 2, 1)
                .with_keyword(Keyword::Overflow)
                .with_siege_bonus(2)
                .with_cost(2),
            DroneDefinition::new("Seeker", 2, 3, 1, 1).with_keyword(Keyword::Tracker),
            DroneDefinition::new("Warden", 1, 2, 3, 1)
                .with_keyword(Keyword::CommandAura)
                .with_cost(2),
            DroneDefinition::new("Firefly", 3, 3, 1, 0)
                .with_after_attack(AfterAttack::SelfDestruct),
            DroneDefinition::new("Ravager", 1, 3, 2, 1)
                .with_after_attack(AfterAttack::GainAttack(1)),
        ] {
            registry.register(def);
        }
        registry
    }

    /// Add or replace a definition.
    pub fn register(&mut self, def: DroneDefinition) {
        self.defs.insert(def.name.clone(), def);
    }

    /// Look up a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DroneDefinition> {
        self.defs.get(name)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roster() {
        let registry = DroneRegistry::builtin();

        let mammoth = registry.get("Mammoth").unwrap();
        assert_eq!(mammoth.attack, 4);
        assert_eq!(mammoth.deployment_cost, 3);

        assert!(registry.get("Nonexistent").is_none());
    }

    #[test]
    fn test_spawn_copies_capabilities() {
        let registry = DroneRegistry::builtin();
        let def = registry.get("Marauder").unwrap();

        let drone = def.spawn(DroneId::new(5), PlayerId::Two);

        assert_eq!(drone.id, DroneId::new(5));
        assert_eq!(drone.owner, PlayerId::Two);
        assert!(drone.has_keyword(Keyword::Overflow));
        assert!(drone.has_keyword(Keyword::Siege));
        assert_eq!(drone.siege_bonus, 2);
        assert_eq!(drone.hull, 2);
        assert_eq!(drone.current_shields, 1);
    }

    #[test]
    fn test_spawn_after_attack_hook() {
        let registry = DroneRegistry::builtin();
        let firefly = registry.get("Firefly").unwrap().spawn(DroneId::new(1), PlayerId::One);

        assert_eq!(firefly.after_attack, Some(AfterAttack::SelfDestruct));
    }
}
