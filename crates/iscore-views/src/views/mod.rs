//! Class-based views.

pub mod class_based;
