//! Success/failure algebra shared by repositories and services.
//!
//! # Responsibility
//! - Describe expected business failures as immutable values.
//! - Provide the `Outcome` alias returned by every data-access operation.
//!
//! # Invariants
//! - Expected failures never panic; they travel as `Err(ErrorDescriptor)`.
//! - Descriptors are `'static` and `Copy`; nothing mutates them after creation.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result of a data-access operation: `Ok` on success, a descriptor on failure.
pub type Outcome<V> = Result<V, ErrorDescriptor>;

/// Failure category used to branch without comparing codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Record absent or already soft-deleted.
    NotFound,
    /// Store rejected a write (uniqueness, foreign key).
    ConstraintViolation,
    /// Store round-trip failed unexpectedly.
    StoreUnavailable,
    /// Use-case level rejection that is not tied to the store.
    Rejected,
}

/// Immutable failure value handed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    #[serde(skip)]
    pub kind: ErrorKind,
    pub http_code: u16,
    pub code: &'static str,
    pub short_message: &'static str,
    pub message: &'static str,
}

impl ErrorDescriptor {
    pub const fn new(
        kind: ErrorKind,
        http_code: u16,
        code: &'static str,
        short_message: &'static str,
        message: &'static str,
    ) -> Self {
        Self {
            kind,
            http_code,
            code,
            short_message,
            message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl Display for ErrorDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.short_message, self.message)
    }
}

impl Error for ErrorDescriptor {}

/// Descriptors one entity kind reports from its repository operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCatalog {
    pub count: ErrorDescriptor,
    pub create: ErrorDescriptor,
    pub conflict: ErrorDescriptor,
    pub not_found: ErrorDescriptor,
    pub find_by: ErrorDescriptor,
    pub list: ErrorDescriptor,
    pub update: ErrorDescriptor,
    pub delete: ErrorDescriptor,
}

/// Wraps a value as a successful outcome.
pub fn ok<V>(value: V) -> Outcome<V> {
    Ok(value)
}

/// Wraps a descriptor as a failed outcome.
pub fn fail<V>(error: ErrorDescriptor) -> Outcome<V> {
    Err(error)
}

/// Predicate vocabulary for inspecting outcomes before unwrapping them.
pub trait OutcomeExt {
    fn is_success(&self) -> bool;
    fn is_failure(&self) -> bool;
}

impl<V, E> OutcomeExt for Result<V, E> {
    fn is_success(&self) -> bool {
        self.is_ok()
    }

    fn is_failure(&self) -> bool {
        self.is_err()
    }
}
