use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a schedulable resource dimension.
///
/// `cpu` is measured in millicores, `memory` and `ephemeral-storage` in bytes.
/// Any other name is treated as an extended resource counted in whole units.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    pub const CPU: &'static str = "cpu";
    pub const MEMORY: &'static str = "memory";
    pub const EPHEMERAL_STORAGE: &'static str = "ephemeral-storage";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn cpu() -> Self {
        Self::new(Self::CPU)
    }

    pub fn memory() -> Self {
        Self::new(Self::MEMORY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Quantities per resource dimension. Missing dimensions read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ResourceList(BTreeMap<ResourceName, u64>);

impl ResourceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &ResourceName) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn set(&mut self, name: impl Into<ResourceName>, quantity: u64) {
        self.0.insert(name.into(), quantity);
    }

    /// Builder-style `set`, handy for fixtures.
    pub fn with(mut self, name: impl Into<ResourceName>, quantity: u64) -> Self {
        self.set(name, quantity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceName, u64)> {
        self.0.iter().map(|(name, q)| (name, *q))
    }

    /// Adds `other` into `self`, failing on the first dimension that overflows.
    /// `self` is left untouched on failure.
    pub fn checked_add(&mut self, other: &ResourceList) -> Result<(), ResourceName> {
        let mut sum = self.0.clone();
        for (name, q) in other.iter() {
            let entry = sum.entry(name.clone()).or_insert(0);
            *entry = entry.checked_add(q).ok_or_else(|| name.clone())?;
        }
        self.0 = sum;
        Ok(())
    }

    /// Saturating add, used where overflow can only come from corrupt input.
    pub fn add(&mut self, other: &ResourceList) {
        for (name, q) in other.iter() {
            let entry = self.0.entry(name.clone()).or_insert(0);
            *entry = entry.saturating_add(q);
        }
    }

    /// Raises every dimension of `self` to at least the value in `other`.
    pub fn set_max(&mut self, other: &ResourceList) {
        for (name, q) in other.iter() {
            let entry = self.0.entry(name.clone()).or_insert(0);
            *entry = (*entry).max(q);
        }
    }
}

impl<N: Into<ResourceName>> FromIterator<(N, u64)> for ResourceList {
    fn from_iter<I: IntoIterator<Item = (N, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, q)| (n.into(), q)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dimension_reads_zero() {
        let list = ResourceList::new().with("cpu", 500);
        assert_eq!(list.get(&ResourceName::cpu()), 500);
        assert_eq!(list.get(&ResourceName::memory()), 0);
    }

    #[test]
    fn checked_add_leaves_list_untouched_on_overflow() {
        let mut list = ResourceList::new().with("cpu", 10).with("memory", u64::MAX);
        let other = ResourceList::new().with("cpu", 5).with("memory", 1);

        let err = list.checked_add(&other).unwrap_err();
        assert_eq!(err, ResourceName::memory());
        assert_eq!(list.get(&ResourceName::cpu()), 10);
    }

    #[test]
    fn set_max_keeps_largest_per_dimension() {
        let mut list = ResourceList::new().with("cpu", 100).with("memory", 10);
        list.set_max(&ResourceList::new().with("cpu", 50).with("memory", 20).with("gpu", 1));

        assert_eq!(list.get(&ResourceName::cpu()), 100);
        assert_eq!(list.get(&ResourceName::memory()), 20);
        assert_eq!(list.get(&"gpu".into()), 1);
    }

    #[test]
    fn deserializes_from_plain_map() {
        let list: ResourceList = serde_json::from_str(r#"{"cpu": 250, "memory": 1024}"#).unwrap();
        assert_eq!(list.get(&ResourceName::cpu()), 250);
        assert_eq!(list.get(&ResourceName::memory()), 1024);
    }
}
