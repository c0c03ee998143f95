//! Core state types: ids, players, drones, sections, phases, errors.

pub mod drone;
pub mod error;
pub mod ids;
pub mod phase;
pub mod player;
pub mod rng;
pub mod ship;
pub mod state;

pub use drone::{
    AfterAttack, DroneInstance, Keyword, ModDuration, ModSource, Stat, StatMod,
    CRITICAL_SECTION_PENALTY,
};
pub use error::{EngineError, EngineResult};
pub use ids::{CardInstanceId, DroneId, Lane, LaneMap, PlayerId, SectionKind, SectionMap};
pub use phase::TurnPhase;
pub use player::PlayerPair;
pub use rng::GameRng;
pub use ship::{SectionStatus, ShipSection};
pub use state::{
    lane_for_section, GameState, PlacedSections, PlayerState, COMMAND_AURA_BONUS,
};
