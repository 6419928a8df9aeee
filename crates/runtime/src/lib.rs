//! Runtime orchestration for the deterministic combat core.
//!
//! This crate wires the combat state, the oracle bundle, the enemy AI
//! seam, and the event log into a synchronous session API. Consumers
//! embed [`CombatSession`] to resolve attacks, move units, and drive the
//! turn loop; one session is one battle on one logical thread.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the orchestrator and its builder
//! - [`ai`] defines the opaque enemy-AI collaborator seam
//! - [`events`] is the append-only combat event log
//! - [`error`] carries session-level faults (never ordinary game flow)

pub mod ai;
pub mod error;
pub mod events;
pub mod session;

pub use ai::{AiError, EnemyAi, IdleAi};
pub use error::SessionError;
pub use events::{CombatEvent, EventLog};
pub use session::{CombatSession, CombatSessionBuilder, ThrowOutcome};
