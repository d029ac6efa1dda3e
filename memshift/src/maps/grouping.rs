//! Order-preserving grouping of regions by normalized backing path

use std::collections::{HashMap, HashSet};

use super::normalize::{normalize_library_path, ANONYMOUS_KEY};
use crate::domain::Region;

/// Regions of one layout keyed by normalized path
///
/// Keys keep first-seen order and each key's regions keep listing order;
/// nothing is sorted.
#[derive(Debug, Default, Clone)]
pub struct RegionGroups {
    order: Vec<String>,
    groups: HashMap<String, Vec<Region>>,
}

impl RegionGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grouping key for a backing path
    #[must_use]
    pub fn key_for(path: &str) -> String {
        if path.is_empty() {
            ANONYMOUS_KEY.to_string()
        } else {
            normalize_library_path(path)
        }
    }

    /// Append a region to its group
    pub fn insert(&mut self, region: Region) {
        let key = Self::key_for(&region.path);
        if let Some(group) = self.groups.get_mut(&key) {
            group.push(region);
        } else {
            self.order.push(key.clone());
            self.groups.insert(key, vec![region]);
        }
    }

    /// Keys in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    #[must_use]
    pub fn key_set(&self) -> HashSet<&str> {
        self.keys().collect()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Region]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    /// `(key, regions)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Region])> {
        self.order.iter().map(|key| (key.as_str(), self.groups[key].as_slice()))
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Group regions by normalized path
#[must_use]
pub fn group_by_path(regions: &[Region]) -> RegionGroups {
    let mut groups = RegionGroups::new();
    for region in regions {
        groups.insert(region.clone());
    }
    groups
}
