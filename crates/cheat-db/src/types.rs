//! Core data types for titles, builds, and canonical cheat documents.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Top-level document key holding author credits instead of a build.
pub const ATTRIBUTION_KEY: &str = "attribution";

/// Length of every title and build identifier, in characters.
pub const ID_LEN: usize = 16;

/// True when `name` is exactly 16 ASCII hex digits (either case).
pub fn is_hex_id(name: &str) -> bool {
    name.len() == ID_LEN && name.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A 16-hex-digit title identifier, stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleId(String);

impl TitleId {
    /// Validate a folder or file name and upper-case it.
    pub fn parse(name: &str) -> CheatDbResult<Self> {
        if is_hex_id(name) {
            Ok(Self(name.to_ascii_uppercase()))
        } else {
            Err(CheatDbError::InvalidId(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the canonical document for this title.
    pub fn document_file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A build identifier taken from a cheat sheet's file stem, upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(String);

impl BuildId {
    pub fn parse(stem: &str) -> CheatDbResult<Self> {
        if is_hex_id(stem) {
            Ok(Self(stem.to_ascii_uppercase()))
        } else {
            Err(CheatDbError::InvalidId(stem.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An insertion-ordered string-keyed map.
///
/// Used for both cheat blocks (label → code text) and attribution
/// (author file → credit text). Lookups are linear; sections hold at most a
/// few hundred entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(std::marker::PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((k, v)) = access.next_entry::<String, V>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(std::marker::PhantomData))
    }
}

/// Cheat blocks of one build (label → code) or attribution (file → text).
pub type Section = OrderedMap<String>;

/// The canonical per-title document.
///
/// Top-level keys are build ids plus the optional `"attribution"` key and
/// always serialize in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleDocument {
    sections: BTreeMap<String, Section>,
}

impl TitleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Set the cheat blocks of a build, replacing any previous ones.
    pub fn insert_build(&mut self, build: &BuildId, blocks: Section) {
        self.sections.insert(build.as_str().to_string(), blocks);
    }

    pub fn set_attribution(&mut self, attribution: Section) {
        self.sections.insert(ATTRIBUTION_KEY.to_string(), attribution);
    }

    pub fn build(&self, build: &str) -> Option<&Section> {
        if build == ATTRIBUTION_KEY {
            return None;
        }
        self.sections.get(build)
    }

    pub fn attribution(&self) -> Option<&Section> {
        self.sections.get(ATTRIBUTION_KEY)
    }

    /// Builds in key order, skipping attribution.
    pub fn builds(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections
            .iter()
            .filter(|(k, _)| k.as_str() != ATTRIBUTION_KEY)
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn build_count(&self) -> usize {
        self.builds().count()
    }

    pub fn cheat_count(&self) -> usize {
        self.builds().map(|(_, blocks)| blocks.len()).sum()
    }

    /// All top-level keys in serialization order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub(crate) fn sections_mut(&mut self) -> &mut BTreeMap<String, Section> {
        &mut self.sections
    }

    pub(crate) fn into_sections(self) -> BTreeMap<String, Section> {
        self.sections
    }
}

/// Errors that can occur while building the cheat database.
#[derive(thiserror::Error, Debug)]
pub enum CheatDbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("Invalid version: {0:?}")]
    InvalidVersion(String),

    #[error("Layout error: {0}")]
    Layout(String),
}

/// Convenience result type.
pub type CheatDbResult<T> = Result<T, CheatDbError>;
