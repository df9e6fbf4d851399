//! Enumeration registries for enumerated-integer and bitfield columns.
//!
//! A registry is an immutable, ordered, bidirectional mapping between symbolic names and small
//! integers. Registries built from declarative value lists assign the integers `0..N-1` in list
//! order and store the names uppercased.
//!
//! Two columns that declare the same value list can share one registry; [`RegistryCache`]
//! interns registries by their name list so a schema compile hands out the same
//! `Arc<EnumRegistry>` for identical lists.

use dashmap::DashMap;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

/// Ordered, bidirectional name <-> integer mapping.
///
/// # Examples
///
/// ```rust
/// use romtable::utils::EnumRegistry;
///
/// let registry = EnumRegistry::from_values(["small", "medium", "large"]);
/// assert_eq!(registry.value_of("medium"), Some(1));
/// assert_eq!(registry.value_of("LARGE"), Some(2));
/// assert_eq!(registry.name_of(0), Some("SMALL"));
/// assert_eq!(registry.name_of(3), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRegistry {
    names: BTreeMap<u64, String>,
    values: HashMap<String, u64>,
}

impl EnumRegistry {
    /// Builds a registry from an ordered value list.
    ///
    /// Names are uppercased and assigned `0..N-1` in list order. If a name appears more than
    /// once, only its last position is named; earlier positions stay unnamed.
    #[must_use]
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = EnumRegistry {
            names: BTreeMap::new(),
            values: HashMap::new(),
        };

        for (index, name) in values.into_iter().enumerate() {
            let name = name.as_ref().to_uppercase();
            if let Some(previous) = registry.values.insert(name.clone(), index as u64) {
                registry.names.remove(&previous);
            }
            registry.names.insert(index as u64, name);
        }

        registry
    }

    /// Builds a registry from explicit `(name, value)` pairs.
    ///
    /// Names are stored as given. Values need not be contiguous; when two entries share a
    /// value, the first one is used for reverse lookups.
    #[must_use]
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut registry = EnumRegistry {
            names: BTreeMap::new(),
            values: HashMap::new(),
        };

        for (name, value) in pairs {
            let name = name.into();
            registry.values.insert(name.clone(), value);
            registry.names.entry(value).or_insert(name);
        }

        registry
    }

    /// Resolves a symbolic name to its integer. Lookups are case-insensitive.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<u64> {
        self.values
            .get(name)
            .or_else(|| self.values.get(&name.to_uppercase()))
            .copied()
    }

    /// Resolves an integer to its symbolic name, if it has one.
    #[must_use]
    pub fn name_of(&self, value: u64) -> Option<&str> {
        self.names.get(&value).map(String::as_str)
    }

    /// Returns the number of distinct integers with a symbolic name.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the registry holds no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates `(value, name)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.names
            .iter()
            .map(|(value, name)| (*value, name.as_str()))
    }
}

/// Thread-safe interner handing out shared registries for identical value lists.
#[derive(Debug, Default)]
pub struct RegistryCache {
    registries: DashMap<Vec<String>, Arc<EnumRegistry>>,
}

impl RegistryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry for `values`, building it on first request.
    ///
    /// The cache key is the uppercased name list, so lists differing only in case share a
    /// registry.
    pub fn get_or_build<S: AsRef<str>>(&self, values: &[S]) -> Arc<EnumRegistry> {
        let key: Vec<String> = values
            .iter()
            .map(|name| name.as_ref().to_uppercase())
            .collect();

        self.registries
            .entry(key)
            .or_insert_with(|| Arc::new(EnumRegistry::from_values(values)))
            .value()
            .clone()
    }

    /// Number of distinct registries interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registries.len()
    }

    /// Returns `true` if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}
