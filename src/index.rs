//! Ordered in-memory membership index over normalized hash keys.
//!
//! The index is built once by the import loader and then only reachable
//! through shared references, so concurrent lookups need no locking.
//! `BTreeSet` keeps the keys in a balanced ordered structure that stays
//! predictable at tens of millions of entries.

use std::collections::BTreeSet;

/// Canonical upper-case form of a hash string.
///
/// Constructing one is the only way to put a key into the index or to
/// probe it, so every comparison happens in the same casing regardless
/// of how the surrounding source or request was written.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NormalizedHash(Box<str>);

impl NormalizedHash {
    /// Normalize a borrowed token.
    pub fn new(raw: &str) -> Self {
        let mut s = raw.to_owned();
        s.make_ascii_uppercase();
        NormalizedHash(s.into_boxed_str())
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NormalizedHash {
    /// Normalize an owned token in place.
    fn from(mut s: String) -> Self {
        s.make_ascii_uppercase();
        NormalizedHash(s.into_boxed_str())
    }
}

/// Ordered set of every hash known to the reference corpus.
///
/// Mutation is confined to the build phase: `insert` takes `&mut self`,
/// and consumer paths receive the finished index behind `Arc` or `&`.
#[derive(Debug, Default)]
pub struct CorpusIndex {
    keys: BTreeSet<NormalizedHash>,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }

    /// Insert a key. Idempotent: re-inserting a hash the corpus already
    /// knows leaves the set unchanged.
    pub fn insert(&mut self, key: NormalizedHash) {
        self.keys.insert(key);
    }

    /// Membership test against an already-normalized key.
    pub fn contains(&self, key: &NormalizedHash) -> bool {
        self.keys.contains(key)
    }

    /// Normalize `raw` and test membership. The caller keeps its own
    /// casing for display; only the probe is normalized.
    pub fn lookup(&self, raw: &str) -> bool {
        self.contains(&NormalizedHash::new(raw))
    }

    /// Number of distinct keys in the corpus.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
