//! Station registry for id to display name lookups

use crate::constants::KNMI_STATIONS;
use std::collections::HashMap;

/// Maps source station identifiers to leaderboard names
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    names: HashMap<String, String>,
}

impl StationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing the KNMI stations of the ranking
    pub fn knmi() -> Self {
        let mut registry = Self::new();
        for (id, name) in KNMI_STATIONS {
            registry.insert(*id, *name);
        }
        registry
    }

    /// Add or replace a station, returning the previous name if any
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) -> Option<String> {
        self.names.insert(id.into(), name.into())
    }

    /// Merge extra entries, replacing names for ids already present
    pub fn with_overrides<'a, I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (id, name) in entries {
            self.insert(id.clone(), name.clone());
        }
        self
    }

    /// Display name for a station id
    ///
    /// Ids are matched after trimming and stripping leading zeros, so KNMI
    /// exports using `"260"` or `" 0260"` resolve the same way.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        let trimmed = id.trim();
        self.names
            .get(trimmed)
            .or_else(|| self.names.get(trimmed.trim_start_matches('0')))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
