//! Identifier types and fixed-size positional maps.
//!
//! The board topology is fixed: two players, three lanes, three ship
//! sections per player. Lanes and sections are closed enums rather than
//! opaque indices so that consumers match exhaustively.
//!
//! ## Absolute player ids
//!
//! State is always keyed by absolute `PlayerId` (`One`/`Two`). Whether a
//! process is the host, a guest, or a single local session only changes the
//! read-time projection in the coordinator, never how state is stored.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Absolute player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Both player ids, in storage order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Storage index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerId::One => write!(f, "player1"),
            PlayerId::Two => write!(f, "player2"),
        }
    }
}

/// One of the three parallel combat zones.
///
/// Attacks and interceptions are lane-scoped: an interceptor must share the
/// attacker's lane, and overflow damage carries to the section placed behind
/// the lane it happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Middle,
    Right,
}

impl Lane {
    /// All lanes, in board order.
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Middle, Lane::Right];

    /// Storage index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Middle => 1,
            Lane::Right => 2,
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lane::Left => write!(f, "lane1"),
            Lane::Middle => write!(f, "lane2"),
            Lane::Right => write!(f, "lane3"),
        }
    }
}

/// Ship section type. Each player places one of each behind their lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Bridge,
    PowerCell,
    DroneControl,
}

impl SectionKind {
    /// All section kinds, in storage order.
    pub const ALL: [SectionKind; 3] = [
        SectionKind::Bridge,
        SectionKind::PowerCell,
        SectionKind::DroneControl,
    ];

    /// Storage index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            SectionKind::Bridge => 0,
            SectionKind::PowerCell => 1,
            SectionKind::DroneControl => 2,
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionKind::Bridge => write!(f, "bridge"),
            SectionKind::PowerCell => write!(f, "powerCell"),
            SectionKind::DroneControl => write!(f, "droneControl"),
        }
    }
}

/// Unique identifier for a drone instance.
///
/// Stable for the lifetime of the instance; never reused within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DroneId(pub u32);

impl DroneId {
    /// Create a new drone ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DroneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Drone({})", self.0)
    }
}

/// Identifier of the card instance that originated an effect.
///
/// Carried through animation events so the consumer can correlate a visual
/// with the card play that caused it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstanceId(pub u32);

impl CardInstanceId {
    /// Create a new card instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CardInstance({})", self.0)
    }
}

/// Per-lane storage with O(1) access, indexable by `Lane`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneMap<T> {
    data: [T; 3],
}

impl<T> LaneMap<T> {
    /// Create a new LaneMap with values from a factory function.
    pub fn new(factory: impl Fn(Lane) -> T) -> Self {
        Self {
            data: [
                factory(Lane::Left),
                factory(Lane::Middle),
                factory(Lane::Right),
            ],
        }
    }

    /// Create a new LaneMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new LaneMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Iterate over (Lane, &T) pairs in board order.
    pub fn iter(&self) -> impl Iterator<Item = (Lane, &T)> {
        Lane::ALL.iter().map(move |&lane| (lane, &self.data[lane.index()]))
    }

    /// Iterate over (Lane, &mut T) pairs in board order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Lane, &mut T)> {
        Lane::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<Lane> for LaneMap<T> {
    type Output = T;

    fn index(&self, lane: Lane) -> &Self::Output {
        &self.data[lane.index()]
    }
}

impl<T> IndexMut<Lane> for LaneMap<T> {
    fn index_mut(&mut self, lane: Lane) -> &mut Self::Output {
        &mut self.data[lane.index()]
    }
}

/// Per-section storage with O(1) access, indexable by `SectionKind`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap<T> {
    data: [T; 3],
}

impl<T> SectionMap<T> {
    /// Create a new SectionMap with values from a factory function.
    pub fn new(factory: impl Fn(SectionKind) -> T) -> Self {
        Self {
            data: [
                factory(SectionKind::Bridge),
                factory(SectionKind::PowerCell),
                factory(SectionKind::DroneControl),
            ],
        }
    }

    /// Iterate over (SectionKind, &T) pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionKind, &T)> {
        SectionKind::ALL
            .iter()
            .map(move |&kind| (kind, &self.data[kind.index()]))
    }

    /// Iterate over (SectionKind, &mut T) pairs in storage order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SectionKind, &mut T)> {
        SectionKind::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<SectionKind> for SectionMap<T> {
    type Output = T;

    fn index(&self, kind: SectionKind) -> &Self::Output {
        &self.data[kind.index()]
    }
}

impl<T> IndexMut<SectionKind> for SectionMap<T> {
    fn index_mut(&mut self, kind: SectionKind) -> &mut Self::Output {
        &mut self.data[kind.index()]
    }
}
