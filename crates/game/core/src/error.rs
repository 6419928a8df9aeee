//! Common error infrastructure for tactics-core.
//!
//! This module provides shared types and traits used across all error types
//! in the crate. Domain-specific errors (e.g. `CombatError`, `PhaseError`)
//! are defined in their respective modules alongside the operations they
//! guard.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error type with specific variants
//! - **Rich Context**: Errors carry the unit and nonce that produced them
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Blocked ≠ Error**: Disallowed moves are `CombatResult` values, not errors

use crate::state::{Position, UnitId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: Temporary conditions; the caller may retry or pick an
///   alternative action
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that indicate a core bug
/// - **Fatal**: Unrecoverable; the session cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - session state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for diagnostics.
///
/// Captured at the point of error creation. The nonce correlates an error
/// with the exact RNG draw sequence of the session, which makes failures
/// reproducible from a seed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Unit that triggered the error (if applicable).
    pub unit: Option<UnitId>,

    /// Position where the error occurred (if applicable).
    pub position: Option<Position>,

    /// Session nonce at the time of error.
    pub nonce: u64,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context with the given nonce.
    #[must_use]
    pub const fn new(nonce: u64) -> Self {
        Self {
            unit: None,
            position: None,
            nonce,
            message: None,
        }
    }

    /// Attaches a unit to this context (builder pattern).
    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Attaches a position to this context (builder pattern).
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Common trait for all tactics-core errors.
///
/// Provides a uniform interface for error classification and context
/// retrieval across all error types in the crate.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impls
/// - Include `ErrorContext` in variants that need debugging info
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
