//! # droneclash
//!
//! A deterministic combat and effect resolution engine for lane-based
//! drone tactics games.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same state + same action = same outcome, same
//!    ordered animation events. The only randomness is the seeded AI
//!    interception chooser.
//!
//! 2. **Structural-Copy Discipline**: Resolvers never mutate their inputs.
//!    They receive references to player state and return fresh values;
//!    persistent data structures (`im`) make those copies O(1).
//!
//! 3. **Single-Flight Queue**: All mutation flows through the coordinator's
//!    queue, one action at a time. The commit path is private to the queue
//!    executor, so no other code can interleave a state change.
//!
//! 4. **Events Out, Never Back In**: Every visible consequence is emitted
//!    as a tagged animation event for the rendering collaborator. Playback
//!    completion never gates rule computation.
//!
//! ## Modules
//!
//! - `core`: ids, player/drone/section state, phases, errors, RNG
//! - `defs`: static drone definition registry
//! - `events`: the closed animation-event sum type and ordered log
//! - `combat`: interception eligibility and the attack resolver
//! - `effects`: declarative ability/card effects and the pipeline
//! - `coordinator`: authoritative state, action queue, notifications
//! - `combat_log`: structured combat-log records

pub mod combat;
pub mod combat_log;
pub mod coordinator;
pub mod core;
pub mod defs;
pub mod effects;
pub mod events;

// Re-export commonly used types
pub use crate::core::{
    CardInstanceId, DroneId, DroneInstance, EngineError, EngineResult, GameRng, GameState,
    Keyword, Lane, LaneMap, PlacedSections, PlayerId, PlayerPair, PlayerState, SectionKind,
    SectionMap, SectionStatus, ShipSection, TurnPhase,
};

pub use crate::combat::{
    choose_interceptor, compute_ai_interception, compute_interceptors, resolve_attack,
    AiInterception, AttackDetails, AttackOutcome, AttackResult, DamageSplit, DamageType,
};

pub use crate::effects::{
    process, EffectCondition, EffectContext, EffectDescriptor, EffectKind, EffectOutcome,
    EffectResult, FollowUpTarget, ScalingSource,
};

pub use crate::coordinator::{
    ActionPayload, CompletedAction, GameAction, GameCoordinator, Notification, NotificationKind,
    SessionRole, SubmitOutcome,
};

pub use crate::combat_log::{LogEntry, LogSink};
pub use crate::defs::{DroneDefinition, DroneRegistry};
pub use crate::events::{AnimationEvent, EventKind, EventLog, EventTarget, TargetRef};
