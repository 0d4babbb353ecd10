//! Region to delegation lookup.
//!
//! Regions are not stored on products; a product belongs to a region when
//! its delegation is one of the delegations the region covers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Resolves a region name to the delegation ids it covers.
pub trait RegionLookup {
    /// Delegation ids covered by `region`, or `None` for an unknown region.
    fn delegations(&self, region: &str) -> Option<&BTreeSet<String>>;

    /// Region names, in a stable order.
    fn regions(&self) -> Vec<&str>;

    /// The region covering a delegation, if any.
    fn region_of(&self, delegation_id: &str) -> Option<&str> {
        self.regions().into_iter().find(|region| {
            self.delegations(region)
                .is_some_and(|ids| ids.contains(delegation_id))
        })
    }
}

/// Static region table, usually loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionTable {
    regions: BTreeMap<String, BTreeSet<String>>,
}

impl RegionTable {
    /// An empty table. Every region lookup fails against it.
    pub fn empty() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    /// Add (or extend) a region with the given delegation ids.
    pub fn with_region<I, S>(mut self, region: impl Into<String>, delegation_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions
            .entry(region.into())
            .or_default()
            .extend(delegation_ids.into_iter().map(Into::into));
        self
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// The five Brazilian macro-regions with the delegations of the seed data.
impl Default for RegionTable {
    fn default() -> Self {
        Self::empty()
            .with_region("Sudeste", ["1", "2", "3"])
            .with_region("Sul", ["4"])
            .with_region("Nordeste", ["5"])
            .with_region("Centro-Oeste", ["6"])
            .with_region("Norte", ["7"])
    }
}

impl RegionLookup for RegionTable {
    fn delegations(&self, region: &str) -> Option<&BTreeSet<String>> {
        self.regions.get(region)
    }

    fn regions(&self) -> Vec<&str> {
        self.regions.keys().map(String::as_str).collect()
    }
}
