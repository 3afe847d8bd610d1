//! # Area Alias Resolver
//!
//! Maps free-text addresses to canonical area names.
//!
//! The geography catalog lists neighborhoods, each optionally carrying a
//! comma-separated alias list such as `"Salmiya, Salmiya Block 1, السالمية"`.
//! The first alias of an entry is the canonical name for every alias in it.
//!
//! Resolution is a linear scan in catalog order: the first alias contained
//! in the lowercased address wins. Overlapping aliases are therefore ranked
//! by catalog position, not by length.
//!
//! # Examples
//!
//! ```
//! use delivery_reports::domain::services::area_alias::{AreaAliasMap, CatalogEntry, UNKNOWN_AREA};
//!
//! let map = AreaAliasMap::build(&[
//!     CatalogEntry::with_aliases("Salmiya, Salmiya Block 1"),
//!     CatalogEntry::with_aliases("Hawally, Hawalli"),
//! ]);
//!
//! assert_eq!(map.resolve(Some("Street 5, HAWALLI")), "Hawally");
//! assert_eq!(map.resolve(Some("Jahra")), UNKNOWN_AREA);
//! assert_eq!(map.resolve(None), UNKNOWN_AREA);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name reported for addresses that match no alias.
pub const UNKNOWN_AREA: &str = "Unknown";

/// One neighborhood record from the geography catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name of the neighborhood.
    #[serde(default)]
    pub name: Option<String>,
    /// Comma-separated alias list; the first alias is canonical.
    #[serde(default)]
    pub aliases: Option<String>,
}

impl CatalogEntry {
    /// Creates an entry carrying only an alias list.
    #[must_use]
    pub fn with_aliases(aliases: impl Into<String>) -> Self {
        Self {
            name: None,
            aliases: Some(aliases.into()),
        }
    }
}

/// Lowercase alias → canonical area name, iterated in catalog order.
///
/// # Invariants
///
/// - Every alias maps to exactly one canonical name
/// - On collision the later catalog entry wins, but the alias keeps the
///   iteration position of its first appearance
/// - Keys are trimmed, lowercased and never empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaAliasMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl AreaAliasMap {
    /// Builds the map from catalog entries.
    ///
    /// Entries without an alias list, and blank aliases, are ignored.
    #[must_use]
    pub fn build(catalog: &[CatalogEntry]) -> Self {
        let mut map = Self::default();
        for entry in catalog {
            let Some(list) = entry.aliases.as_deref() else {
                continue;
            };
            let aliases: Vec<&str> = list
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .collect();
            let Some(canonical) = aliases.first() else {
                continue;
            };
            for alias in &aliases {
                map.insert(alias.to_lowercase(), (*canonical).to_string());
            }
        }
        map
    }

    fn insert(&mut self, alias: String, canonical: String) {
        match self.index.get(&alias) {
            Some(&pos) => {
                if let Some(slot) = self.entries.get_mut(pos) {
                    slot.1 = canonical;
                }
            }
            None => {
                self.index.insert(alias.clone(), self.entries.len());
                self.entries.push((alias, canonical));
            }
        }
    }

    /// Resolves an address to its canonical area.
    ///
    /// Returns [`UNKNOWN_AREA`] for missing or blank addresses and for
    /// addresses containing no known alias.
    #[must_use]
    pub fn resolve(&self, address: Option<&str>) -> &str {
        let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) else {
            return UNKNOWN_AREA;
        };
        let haystack = address.to_lowercase();
        self.entries
            .iter()
            .find(|(alias, _)| haystack.contains(alias.as_str()))
            .map_or(UNKNOWN_AREA, |(_, canonical)| canonical.as_str())
    }

    /// Canonical name for an exact alias, case-insensitive.
    #[must_use]
    pub fn canonical(&self, alias: &str) -> Option<&str> {
        self.index
            .get(&alias.trim().to_lowercase())
            .and_then(|&pos| self.entries.get(pos))
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Aliases in iteration order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(alias, _)| alias.as_str())
    }

    /// Number of aliases.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no aliases.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
