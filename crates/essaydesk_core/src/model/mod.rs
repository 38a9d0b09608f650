//! Domain records for users, essays and plannings.
//!
//! # Responsibility
//! - Define persisted record shapes, create/patch payloads and lookups.
//! - Provide explicit record-to-view mappings for public responses.
//!
//! # Invariants
//! - Timestamps (`created_at`, `updated_at`, `deleted_at`) are written by the
//!   repository only.
//! - Deletion is a soft-delete tombstone (`deleted_at`), never a hard delete.

pub mod entity;
pub mod essay;
pub mod planning;
pub mod stats;
pub mod user;
