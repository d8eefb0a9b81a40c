//! Small helpers shared across crates.

pub mod text;
