//! Benchmark for the attack-resolver hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use droneclash::core::{DroneInstance, PlayerState};
use droneclash::{
    resolve_attack, AttackDetails, DroneId, Lane, LaneMap, LogEntry, PlacedSections, PlayerId,
    PlayerPair, SectionKind, TargetRef,
};

fn setup() -> (PlayerPair<PlayerState>, PlacedSections, AttackDetails) {
    let mut players: PlayerPair<PlayerState> = PlayerPair::with_default();
    for i in 0..6u32 {
        players[PlayerId::One].add_drone(
            Lane::ALL[(i % 3) as usize],
            DroneInstance::new(DroneId::new(i + 1), "Scout", PlayerId::One, 2, 3, 2, 1),
        );
        players[PlayerId::Two].add_drone(
            Lane::ALL[(i % 3) as usize],
            DroneInstance::new(DroneId::new(i + 100), "Scout", PlayerId::Two, 2, 3, 4, 2),
        );
    }
    let placed = PlayerPair::new(|_| LaneMap::new(|lane| SectionKind::ALL[lane.index()]));
    let details = AttackDetails::drone_attack(
        DroneId::new(1),
        PlayerId::One,
        TargetRef::Drone(DroneId::new(100)),
        PlayerId::Two,
        Lane::Left,
    );
    (players, placed, details)
}

fn bench_resolve_attack(c: &mut Criterion) {
    let (players, placed, details) = setup();

    c.bench_function("resolve_attack", |b| {
        b.iter(|| {
            let mut sink = |_: LogEntry| {};
            let outcome = resolve_attack(
                black_box(&details),
                black_box(&players),
                black_box(&placed),
                &mut sink,
            );
            black_box(outcome)
        })
    });
}

criterion_group!(benches, bench_resolve_attack);
criterion_main!(benches);
