//! Small pure helpers used by the query compilers and repositories.

pub mod caster;
pub mod id;
