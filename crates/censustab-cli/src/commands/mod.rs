//! CLI command implementations.

pub mod areas;
pub mod codes;
pub mod read;
pub mod segments;
