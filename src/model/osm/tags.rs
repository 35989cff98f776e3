use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;

/// a single OSM key/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Tag {
        Tag {
            key: String::from(key),
            value: String::from(value),
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// an ordered list of tags, as found on a way, relation or assembled area.
/// order is preserved so that tag lists copied from a source object compare
/// equal to that source.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagList(Vec<Tag>);

impl TagList {
    pub fn new() -> TagList {
        TagList(Vec::new())
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.0.push(Tag::new(key, value));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    /// value of the first tag with the given key, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// the tags whose keys are not in the excluded set, as borrowed
    /// `(key, value)` pairs in list order
    pub fn filtered_pairs(&self, excluded: &HashSet<&str>) -> Vec<(&str, &str)> {
        self.0
            .iter()
            .filter(|t| !excluded.contains(t.key.as_str()))
            .map(|t| (t.key.as_str(), t.value.as_str()))
            .collect()
    }
}

impl From<Vec<(String, String)>> for TagList {
    fn from(pairs: Vec<(String, String)>) -> Self {
        TagList(
            pairs
                .into_iter()
                .map(|(key, value)| Tag { key, value })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
