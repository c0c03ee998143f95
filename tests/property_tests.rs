//! Property tests for the damage-split invariants.

use proptest::prelude::*;

use droneclash::core::{DroneInstance, PlayerState};
use droneclash::{
    resolve_attack, AttackDetails, DamageType, DroneId, Keyword, Lane, LaneMap, PlacedSections,
    PlayerId, PlayerPair, SectionKind, TargetRef,
};

fn placed() -> PlacedSections {
    PlayerPair::new(|_| LaneMap::new(|lane| SectionKind::ALL[lane.index()]))
}

proptest! {
    /// shield + hull dealt never exceeds the submitted damage, shields are
    /// untouched under piercing, and destruction matches the hull math
    /// exactly.
    #[test]
    fn damage_split_bounds(
        attack in 0i32..=10,
        shields in 0i32..=5,
        hull in 1i32..=8,
        piercing in any::<bool>(),
    ) {
        let mut attacker =
            DroneInstance::new(DroneId::new(1), "Attacker", PlayerId::One, attack, 2, 2, 0);
        if piercing {
            attacker.keywords.insert(Keyword::Piercing);
        }

        let mut players: PlayerPair<PlayerState> = PlayerPair::with_default();
        players[PlayerId::One].add_drone(Lane::Left, attacker);
        players[PlayerId::Two].add_drone(
            Lane::Left,
            DroneInstance::new(DroneId::new(2), "Target", PlayerId::Two, 1, 1, hull, shields),
        );

        let details = AttackDetails::drone_attack(
            DroneId::new(1),
            PlayerId::One,
            TargetRef::Drone(DroneId::new(2)),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = |_: droneclash::LogEntry| {};
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);
        let split = outcome.result.damage;

        prop_assert!(split.shield >= 0 && split.hull >= 0);
        prop_assert!(split.total() <= attack);

        if piercing {
            prop_assert_eq!(outcome.result.damage_type, DamageType::Piercing);
            prop_assert_eq!(split.shield, 0);
        }

        // Destroyed iff the hull damage consumed all prior hull, and the
        // board reflects it.
        prop_assert_eq!(outcome.result.was_destroyed, hull - split.hull <= 0);
        let still_there = outcome.players[PlayerId::Two]
            .find_drone(DroneId::new(2))
            .is_some();
        prop_assert_eq!(still_there, !outcome.result.was_destroyed);
    }

    /// Section damage clamps at zero hull and never reports destruction.
    #[test]
    fn section_damage_clamps(amount in 0i32..=30) {
        let players: PlayerPair<PlayerState> = PlayerPair::with_default();
        let details = AttackDetails::ability(
            amount,
            PlayerId::One,
            TargetRef::Section(SectionKind::Bridge),
            PlayerId::Two,
            Lane::Left,
        );
        let mut sink = |_: droneclash::LogEntry| {};
        let outcome = resolve_attack(&details, &players, &placed(), &mut sink);

        prop_assert!(!outcome.result.was_destroyed);
        prop_assert!(outcome.result.damage.total() <= amount);

        let section = &outcome.players[PlayerId::Two].ship_sections[SectionKind::Bridge];
        prop_assert!(section.hull >= 0);
        prop_assert!(section.allocated_shields >= 0);
    }
}
