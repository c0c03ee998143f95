//! Animation events: the ordered, replayable description of what happened.
//!
//! Every visible consequence of a rule is externalized as one immutable
//! event. The rendering collaborator maps each event to a visual and plays
//! them back in sequence order; nothing in here ever feeds back into rule
//! computation. The `seq` field is a logical timestamp for consumer-side
//! ordering only.

use serde::{Deserialize, Serialize};

use crate::core::{CardInstanceId, DroneId, Lane, PlayerId, SectionKind, SectionStatus};

/// What an event points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRef {
    Drone(DroneId),
    Section(SectionKind),
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetRef::Drone(id) => write!(f, "{id}"),
            TargetRef::Section(kind) => write!(f, "{kind}"),
        }
    }
}

/// A resolved event target: what, whose, and where.
///
/// `lane` is None for section-level targets that are not tied to a lane
/// position (e.g. a section hit chosen by card text rather than overflow).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTarget {
    pub id: TargetRef,
    pub player: PlayerId,
    pub lane: Option<Lane>,
}

impl EventTarget {
    /// Target a drone in a lane.
    #[must_use]
    pub fn drone(id: DroneId, player: PlayerId, lane: Lane) -> Self {
        Self {
            id: TargetRef::Drone(id),
            player,
            lane: Some(lane),
        }
    }

    /// Target a ship section.
    #[must_use]
    pub fn section(kind: SectionKind, player: PlayerId, lane: Option<Lane>) -> Self {
        Self {
            id: TargetRef::Section(kind),
            player,
            lane,
        }
    }
}

/// One visible consequence of a rule.
///
/// Closed set: consumers match exhaustively, so a missing handler is a
/// compile error rather than a silently dropped visual.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// An attack began (drone attacks only; ability damage has no attacker).
    AttackStart {
        attacker: DroneId,
        attacking_player: PlayerId,
        lane: Lane,
        target: EventTarget,
    },
    /// Shields absorbed damage.
    ShieldDamage { target: EventTarget, amount: i32 },
    /// Hull took damage and the target survived.
    HullDamage { target: EventTarget, amount: i32 },
    /// A drone was destroyed and removed from the board.
    Destroyed { target: EventTarget },
    /// A ship section took hull damage (sections shake, never die).
    SectionDamaged {
        target: EventTarget,
        amount: i32,
        status: SectionStatus,
    },
    /// The attacker returned to its lane position.
    DroneReturn {
        drone: DroneId,
        player: PlayerId,
        lane: Lane,
    },
    /// An interceptor struck the attacker during the exchange.
    DogfightDamage { target: EventTarget, amount: i32 },
    /// A surviving defender struck the attacker back.
    RetaliateDamage { target: EventTarget, amount: i32 },
    /// Excess destruction damage carried through to the section behind.
    OverflowProjectile {
        from: EventTarget,
        to: EventTarget,
        amount: i32,
    },
    /// Lane-adjacent splash from an ability.
    SplashDamage { target: EventTarget, amount: i32 },
}

/// An immutable, ordered animation event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationEvent {
    pub kind: EventKind,
    /// Logical timestamp; strictly increasing within one resolution.
    pub seq: u32,
    /// The card play this event traces back to, if any.
    pub source_card: Option<CardInstanceId>,
}

/// Ordered event accumulator used by the resolvers.
///
/// Assigns sequence numbers as events are pushed, so causal order in code
/// is causal order on the wire.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<AnimationEvent>,
    next_seq: u32,
    source_card: Option<CardInstanceId>,
}

impl EventLog {
    /// Create a log; all events it emits carry the given source card.
    #[must_use]
    pub fn new(source_card: Option<CardInstanceId>) -> Self {
        Self {
            events: Vec::new(),
            next_seq: 0,
            source_card,
        }
    }

    /// Append an event, assigning the next sequence number.
    pub fn push(&mut self, kind: EventKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(AnimationEvent {
            kind,
            seq,
            source_card: self.source_card,
        });
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Finish and take the ordered events.
    #[must_use]
    pub fn into_events(self) -> Vec<AnimationEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_strictly_increasing() {
        let mut log = EventLog::new(None);
        let target = EventTarget::drone(DroneId::new(1), PlayerId::Two, Lane::Left);

        log.push(EventKind::ShieldDamage { target, amount: 1 });
        log.push(EventKind::HullDamage { target, amount: 2 });
        log.push(EventKind::Destroyed { target });

        let events = log.into_events();
        let seqs: Vec<_> = events.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_source_card_is_stamped() {
        let card = CardInstanceId::new(9);
        let mut log = EventLog::new(Some(card));
        log.push(EventKind::ShieldDamage {
            target: EventTarget::drone(DroneId::new(1), PlayerId::One, Lane::Middle),
            amount: 1,
        });

        assert_eq!(log.into_events()[0].source_card, Some(card));
    }

    #[test]
    fn test_event_serialization() {
        let event = AnimationEvent {
            kind: EventKind::OverflowProjectile {
                from: EventTarget::drone(DroneId::new(1), PlayerId::Two, Lane::Right),
                to: EventTarget::section(SectionKind::Bridge, PlayerId::Two, Some(Lane::Right)),
                amount: 2,
            },
            seq: 4,
            source_card: None,
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: AnimationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
