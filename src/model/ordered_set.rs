//! Insertion-ordered string set.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// How two entries are compared for membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Membership {
    /// Byte-for-byte equality
    #[default]
    Exact,
    /// Equality after lowercasing; the first-seen casing is kept
    CaseInsensitive,
}

/// A set of strings that remembers insertion order.
///
/// Serializes as a plain JSON array. Plain deserialization gives exact
/// membership; use [`OrderedSet::deserialize_case_insensitive`] for fields
/// that ignore case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
    membership: Membership,
}

impl OrderedSet {
    /// Create an empty set with exact membership.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set that ignores case.
    pub fn case_insensitive() -> Self {
        Self {
            membership: Membership::CaseInsensitive,
            ..Self::default()
        }
    }

    /// Deserialize a JSON array into a set that ignores case.
    pub fn deserialize_case_insensitive<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<String>::deserialize(deserializer)?;
        let mut set = Self::case_insensitive();
        set.extend(values);
        Ok(set)
    }

    fn key(&self, value: &str) -> String {
        match self.membership {
            Membership::Exact => value.to_string(),
            Membership::CaseInsensitive => value.to_lowercase(),
        }
    }

    /// Insert a value; returns `false` if an equivalent value is present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if !self.seen.insert(self.key(&value)) {
            return false;
        }
        self.items.push(value);
        true
    }

    /// Check membership under this set's comparison rule.
    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(&self.key(value))
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&String> {
        self.items.first()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl PartialEq for OrderedSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl From<Vec<String>> for OrderedSet {
    fn from(values: Vec<String>) -> Self {
        let mut set = OrderedSet::new();
        set.extend(values);
        set
    }
}

impl From<OrderedSet> for Vec<String> {
    fn from(set: OrderedSet) -> Self {
        set.items
    }
}

impl Extend<String> for OrderedSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a> IntoIterator for &'a OrderedSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
