//! Shared helpers that are not tied to a single table concept.

/// Enumeration registries and their interning cache
pub mod enums;

pub use enums::{EnumRegistry, RegistryCache};
