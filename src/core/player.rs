//! Per-player data storage.
//!
//! `PlayerPair` holds one value per absolute player id. It is the only
//! shape player state travels in: resolvers take a `&PlayerPair<PlayerState>`
//! and return a fresh one, never a mutated alias of the caller's.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::ids::PlayerId;

/// Two-slot per-player storage with O(1) access.
///
/// ## Example
///
/// ```
/// use droneclash::core::{PlayerId, PlayerPair};
///
/// let mut energy: PlayerPair<i32> = PlayerPair::with_value(10);
/// energy[PlayerId::Two] -= 3;
///
/// assert_eq!(energy[PlayerId::One], 10);
/// assert_eq!(energy[PlayerId::Two], 7);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    data: [T; 2],
}

impl<T> PlayerPair<T> {
    /// Create a new pair with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::One), factory(PlayerId::Two)],
        }
    }

    /// Create a new pair with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new pair with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Iterate over (PlayerId, &T) pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL
            .iter()
            .map(move |&player| (player, &self.data[player.index()]))
    }

    /// Iterate over (PlayerId, &mut T) pairs in storage order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<PlayerId> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerPair<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}
