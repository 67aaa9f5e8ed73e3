//! Additive union merge between a recorded document and a fresh parse.
//!
//! Merging never removes keys. When both sides hold the same leaf key the
//! recorded text is kept, so repeated runs cannot rewrite cheats that were
//! already published.

use std::collections::BTreeMap;

use crate::types::{OrderedMap, TitleDocument};

/// Fold a newer value into an existing one.
pub trait Merge {
    fn merge_from(&mut self, newer: Self);
}

impl Merge for String {
    fn merge_from(&mut self, _newer: Self) {}
}

impl<V: Merge> Merge for OrderedMap<V> {
    fn merge_from(&mut self, newer: Self) {
        for (key, value) in newer {
            match self.get_mut(&key) {
                Some(existing) => existing.merge_from(value),
                None => {
                    self.insert(key, value);
                }
            }
        }
    }
}

impl<V: Merge> Merge for BTreeMap<String, V> {
    fn merge_from(&mut self, newer: Self) {
        for (key, value) in newer {
            match self.get_mut(&key) {
                Some(existing) => existing.merge_from(value),
                None => {
                    self.insert(key, value);
                }
            }
        }
    }
}

impl Merge for TitleDocument {
    fn merge_from(&mut self, newer: Self) {
        self.sections_mut().merge_from(newer.into_sections());
    }
}

/// Merge `parsed` into `recorded` and return the combined document.
pub fn merge_documents(mut recorded: TitleDocument, parsed: TitleDocument) -> TitleDocument {
    recorded.merge_from(parsed);
    recorded
}
