//! Player and game state.
//!
//! `PlayerState` is the whole of one player's mutable board: lanes of
//! drones, ship sections, and resources. The coordinator owns the only
//! authoritative copy; resolvers receive a reference and hand back a fresh
//! value. Lane lists are `im::Vector`, so that structural copy is O(1) and
//! the "never mutate the caller's data" contract costs nothing per action.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::drone::{DroneInstance, Keyword, ModSource, Stat, StatMod};
use super::ids::{DroneId, Lane, LaneMap, PlayerId, SectionKind, SectionMap};
use super::phase::TurnPhase;
use super::player::PlayerPair;
use super::ship::{SectionStatus, ShipSection};

/// Attack granted to lane mates by a CommandAura drone.
pub const COMMAND_AURA_BONUS: i32 = 1;

/// Which section each player placed behind each lane.
pub type PlacedSections = PlayerPair<LaneMap<SectionKind>>;

/// Find the lane a section kind was placed behind.
#[must_use]
pub fn lane_for_section(placed: &LaneMap<SectionKind>, kind: SectionKind) -> Option<Lane> {
    placed.iter().find(|(_, &k)| k == kind).map(|(lane, _)| lane)
}

/// One player's complete board state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Lane -> ordered drones. Order defines nothing but is preserved.
    pub drones_on_board: LaneMap<Vector<DroneInstance>>,
    pub ship_sections: SectionMap<ShipSection>,
    pub energy: i32,
    pub deployment_budget: i32,
    pub applied_upgrades: Vector<String>,
    /// Per-definition deployment counts for the whole match.
    pub deployed_drone_counts: FxHashMap<String, u32>,
}

impl PlayerState {
    /// Create a fresh board with full sections and the given resources.
    #[must_use]
    pub fn new(energy: i32, deployment_budget: i32) -> Self {
        Self {
            drones_on_board: LaneMap::with_default(),
            ship_sections: SectionMap::new(|kind| ShipSection::new(kind, 8, 2)),
            energy,
            deployment_budget,
            applied_upgrades: Vector::new(),
            deployed_drone_counts: FxHashMap::default(),
        }
    }

    /// Locate a drone by id.
    #[must_use]
    pub fn find_drone(&self, id: DroneId) -> Option<(Lane, &DroneInstance)> {
        for (lane, drones) in self.drones_on_board.iter() {
            if let Some(drone) = drones.iter().find(|d| d.id == id) {
                return Some((lane, drone));
            }
        }
        None
    }

    /// Locate a drone by id, mutably.
    pub fn find_drone_mut(&mut self, id: DroneId) -> Option<(Lane, &mut DroneInstance)> {
        for (lane, drones) in self.drones_on_board.iter_mut() {
            if let Some(drone) = drones.iter_mut().find(|d| d.id == id) {
                return Some((lane, drone));
            }
        }
        None
    }

    /// Remove a drone from the board. Does not recompute auras.
    pub fn remove_drone(&mut self, id: DroneId) -> Option<(Lane, DroneInstance)> {
        for (lane, drones) in self.drones_on_board.iter_mut() {
            if let Some(pos) = drones.iter().position(|d| d.id == id) {
                return Some((lane, drones.remove(pos)));
            }
        }
        None
    }

    /// Add a drone to a lane, bump its deployment count, and rebuild auras.
    pub fn add_drone(&mut self, lane: Lane, drone: DroneInstance) {
        *self
            .deployed_drone_counts
            .entry(drone.name.clone())
            .or_insert(0) += 1;
        self.drones_on_board[lane].push_back(drone);
        self.recalculate_lane_auras();
    }

    /// Degradation status of the section placed behind a lane.
    #[must_use]
    pub fn lane_status(&self, lane: Lane, placed: &LaneMap<SectionKind>) -> SectionStatus {
        self.ship_sections[placed[lane]].status()
    }

    /// Effective attack of a drone on this board, or None if not found.
    #[must_use]
    pub fn effective_attack(&self, id: DroneId, placed: &LaneMap<SectionKind>) -> Option<i32> {
        self.find_drone(id)
            .map(|(lane, drone)| drone.effective_attack(self.lane_status(lane, placed)))
    }

    /// Effective speed of a drone on this board, or None if not found.
    #[must_use]
    pub fn effective_speed(&self, id: DroneId, placed: &LaneMap<SectionKind>) -> Option<i32> {
        self.find_drone(id)
            .map(|(lane, drone)| drone.effective_speed(self.lane_status(lane, placed)))
    }

    /// Count of non-exhausted drones in a lane.
    #[must_use]
    pub fn ready_drone_count(&self, lane: Lane) -> usize {
        self.drones_on_board[lane]
            .iter()
            .filter(|d| !d.is_exhausted)
            .count()
    }

    /// Total drones on the board.
    #[must_use]
    pub fn total_drones(&self) -> usize {
        Lane::ALL
            .iter()
            .map(|&lane| self.drones_on_board[lane].len())
            .sum()
    }

    /// Rebuild every aura-sourced stat mod from the current lane
    /// composition. Called after any deployment or destruction.
    pub fn recalculate_lane_auras(&mut self) {
        for lane in Lane::ALL {
            let sources: Vec<DroneId> = self.drones_on_board[lane]
                .iter()
                .filter(|d| d.has_keyword(Keyword::CommandAura))
                .map(|d| d.id)
                .collect();

            for drone in self.drones_on_board[lane].iter_mut() {
                drone.clear_aura_mods();
                for &source in &sources {
                    if source != drone.id {
                        drone.add_mod(StatMod {
                            stat: Stat::Attack,
                            amount: COMMAND_AURA_BONUS,
                            duration: super::drone::ModDuration::Permanent,
                            source: ModSource::Aura(source),
                        });
                    }
                }
            }
        }
    }

    /// Round-end bookkeeping: readies drones, clears one-shot flags and
    /// round-scoped mods, restores section shields to their allocation.
    pub fn end_round(&mut self) {
        for (_, drones) in self.drones_on_board.iter_mut() {
            for drone in drones.iter_mut() {
                drone.end_round();
            }
        }
        for (_, section) in self.ship_sections.iter_mut() {
            section.restore_shields(section.max_shields);
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(10, 5)
    }
}

/// The complete authoritative match state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub players: PlayerPair<PlayerState>,
    pub placed_sections: PlacedSections,
    pub phase: TurnPhase,
    pub round: u32,
    /// Whose action it is during the Action phase.
    pub active_player: PlayerId,
}

impl GameState {
    /// Create a match in the PreGame phase with default placement
    /// (Bridge/PowerCell/DroneControl left to right for both players).
    #[must_use]
    pub fn new() -> Self {
        Self {
            players: PlayerPair::with_default(),
            placed_sections: PlayerPair::new(|_| {
                LaneMap::new(|lane| SectionKind::ALL[lane.index()])
            }),
            phase: TurnPhase::PreGame,
            round: 1,
            active_player: PlayerId::One,
        }
    }

    /// Locate a drone on either board.
    #[must_use]
    pub fn find_drone_anywhere(&self, id: DroneId) -> Option<(PlayerId, Lane, &DroneInstance)> {
        for (player, state) in self.players.iter() {
            if let Some((lane, drone)) = state.find_drone(id) {
                return Some((player, lane, drone));
            }
        }
        None
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
