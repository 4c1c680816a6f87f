//! Name normalization and the resume index
//!
//! Already-resolved rows are read once and indexed by point-of-interest
//! identifier, so a batch can skip them without any network call. Names
//! never decide a skip; they are only compared to report renamed items.

use std::collections::{HashMap, HashSet};

use domain::entities::{PointOfInterest, ResolvedLocation};

use crate::ports::ExistingEntry;

/// Minimum token overlap for two names to count as the same place
pub const NAME_MATCH_THRESHOLD: f64 = 0.5;

/// Lowercase, strip punctuation and collapse whitespace
///
/// `"Tian  Tian Hainanese (Maxwell)"` becomes `"tian tian hainanese maxwell"`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Share of tokens the shorter name has in common with the longer one
///
/// Returns a value in `[0, 1]`; two blank names score 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a_norm = normalize_name(a);
    let b_norm = normalize_name(b);
    let a_tokens: HashSet<&str> = a_norm.split(' ').filter(|t| !t.is_empty()).collect();
    let b_tokens: HashSet<&str> = b_norm.split(' ').filter(|t| !t.is_empty()).collect();

    let smaller = a_tokens.len().min(b_tokens.len());
    if smaller == 0 {
        return 0.0;
    }

    let shared = a_tokens.intersection(&b_tokens).count();
    shared as f64 / smaller as f64
}

/// Whether a provider's display name plausibly refers to the same place
#[must_use]
pub fn names_match(expected: &str, reported: &str) -> bool {
    name_similarity(expected, reported) >= NAME_MATCH_THRESHOLD
}

/// Identifiers of already-resolved points of interest
///
/// Keeps the stored name of each row so a renamed input can be reported.
#[derive(Debug, Clone, Default)]
pub struct ResumeIndex {
    names_by_id: HashMap<String, String>,
}

impl ResumeIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from stored rows
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ExistingEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.insert(entry.poi_id, entry.poi_name);
        }
        index
    }

    /// Record a point of interest as resolved
    pub fn insert(&mut self, poi_id: impl Into<String>, poi_name: impl Into<String>) {
        self.names_by_id.insert(poi_id.into(), poi_name.into());
    }

    /// Record a freshly resolved location
    pub fn insert_resolved(&mut self, location: &ResolvedLocation) {
        self.insert(location.poi_id.clone(), location.poi_name.clone());
    }

    /// Whether a row with this identifier already exists
    #[must_use]
    pub fn contains(&self, poi: &PointOfInterest) -> bool {
        self.names_by_id.contains_key(&poi.id)
    }

    /// Stored name of this identifier when it no longer matches the input name
    #[must_use]
    pub fn renamed_from(&self, poi: &PointOfInterest) -> Option<&str> {
        self.names_by_id
            .get(&poi.id)
            .filter(|stored| normalize_name(stored) != normalize_name(&poi.name))
            .map(String::as_str)
    }

    /// Number of indexed identifiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.names_by_id.len()
    }

    /// Whether the index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names_by_id.is_empty()
    }
}
