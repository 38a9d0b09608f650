//! Pure query-building components.
//!
//! # Responsibility
//! - Compile loose filter/order input into store-neutral structures.
//! - Own the pagination arithmetic.
//!
//! # Invariants
//! - Nothing in this module performs I/O or fails at runtime; malformed
//!   input degrades to a permissive (non-filtering) result.

pub mod filter;
pub mod order;
pub mod pagination;
