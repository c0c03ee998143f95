//! Combat resolution: interception eligibility and the attack resolver.

pub mod interception;
pub mod resolver;

pub use interception::{
    choose_interceptor, compute_ai_interception, compute_interceptors, AiInterception,
};
pub use resolver::{
    resolve_attack, AttackDetails, AttackOutcome, AttackResult, DamageSplit, DamageType,
};
