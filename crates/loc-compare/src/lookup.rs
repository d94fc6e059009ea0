//! Identity-subset hash indexes over the PREVIOUS snapshot.
//!
//! Ten indexes are built in one O(n) pass — one per 2- or 3-element subset
//! of the identity quadruple (C(4,2) + C(4,3) = 6 + 4). Each maps a key
//! tuple to the **first** previous row carrying that tuple; later duplicates
//! are silently shadowed. A shadowed row is still reachable through the
//! other nine indexes, and flows to the deleted set if nothing ever claims
//! it.

use std::collections::HashMap;

use loc_core::casting::IdentityKey;

/// Separator that cannot appear in a normalized cell.
const SEP: char = '\u{1f}';

fn key2(a: &str, b: &str) -> String {
    format!("{a}{SEP}{b}")
}

fn key3(a: &str, b: &str, c: &str) -> String {
    format!("{a}{SEP}{b}{SEP}{c}")
}

// ---------------------------------------------------------------------------
// PreviousLookups
// ---------------------------------------------------------------------------

/// The ten identity-subset indexes, each mapping to a previous-row index.
#[derive(Debug, Default)]
pub struct PreviousLookups {
    seq_event_origin: HashMap<String, usize>,
    seq_event_casting: HashMap<String, usize>,
    seq_origin_casting: HashMap<String, usize>,
    event_origin_casting: HashMap<String, usize>,
    seq_event: HashMap<String, usize>,
    origin_casting: HashMap<String, usize>,
    event_casting: HashMap<String, usize>,
    seq_casting: HashMap<String, usize>,
    seq_origin: HashMap<String, usize>,
    event_origin: HashMap<String, usize>,
}

impl PreviousLookups {
    /// Build all ten indexes from the previous rows' identity keys.
    /// First occurrence wins on duplicate tuples.
    pub fn build(keys: &[IdentityKey]) -> Self {
        let mut lookups = Self::default();
        for (index, k) in keys.iter().enumerate() {
            lookups
                .seq_event_origin
                .entry(key3(&k.sequence, &k.event, &k.origin))
                .or_insert(index);
            lookups
                .seq_event_casting
                .entry(key3(&k.sequence, &k.event, &k.casting))
                .or_insert(index);
            lookups
                .seq_origin_casting
                .entry(key3(&k.sequence, &k.origin, &k.casting))
                .or_insert(index);
            lookups
                .event_origin_casting
                .entry(key3(&k.event, &k.origin, &k.casting))
                .or_insert(index);
            lookups
                .seq_event
                .entry(key2(&k.sequence, &k.event))
                .or_insert(index);
            lookups
                .origin_casting
                .entry(key2(&k.origin, &k.casting))
                .or_insert(index);
            lookups
                .event_casting
                .entry(key2(&k.event, &k.casting))
                .or_insert(index);
            lookups
                .seq_casting
                .entry(key2(&k.sequence, &k.casting))
                .or_insert(index);
            lookups
                .seq_origin
                .entry(key2(&k.sequence, &k.origin))
                .or_insert(index);
            lookups
                .event_origin
                .entry(key2(&k.event, &k.origin))
                .or_insert(index);
        }
        lookups
    }

    pub fn by_seq_event_origin(&self, k: &IdentityKey) -> Option<usize> {
        self.seq_event_origin
            .get(&key3(&k.sequence, &k.event, &k.origin))
            .copied()
    }

    pub fn by_seq_event_casting(&self, k: &IdentityKey) -> Option<usize> {
        self.seq_event_casting
            .get(&key3(&k.sequence, &k.event, &k.casting))
            .copied()
    }

    pub fn by_seq_origin_casting(&self, k: &IdentityKey) -> Option<usize> {
        self.seq_origin_casting
            .get(&key3(&k.sequence, &k.origin, &k.casting))
            .copied()
    }

    pub fn by_event_origin_casting(&self, k: &IdentityKey) -> Option<usize> {
        self.event_origin_casting
            .get(&key3(&k.event, &k.origin, &k.casting))
            .copied()
    }

    pub fn by_seq_event(&self, k: &IdentityKey) -> Option<usize> {
        self.seq_event.get(&key2(&k.sequence, &k.event)).copied()
    }

    pub fn by_origin_casting(&self, k: &IdentityKey) -> Option<usize> {
        self.origin_casting.get(&key2(&k.origin, &k.casting)).copied()
    }

    pub fn by_event_casting(&self, k: &IdentityKey) -> Option<usize> {
        self.event_casting.get(&key2(&k.event, &k.casting)).copied()
    }

    pub fn by_seq_casting(&self, k: &IdentityKey) -> Option<usize> {
        self.seq_casting.get(&key2(&k.sequence, &k.casting)).copied()
    }

    pub fn by_seq_origin(&self, k: &IdentityKey) -> Option<usize> {
        self.seq_origin.get(&key2(&k.sequence, &k.origin)).copied()
    }

    pub fn by_event_origin(&self, k: &IdentityKey) -> Option<usize> {
        self.event_origin.get(&key2(&k.event, &k.origin)).copied()
    }

    /// True when the quadruple hits at least one of the ten indexes.
    /// A row whose identity appears nowhere has no previous counterpart,
    /// even partially.
    pub fn appears_anywhere(&self, k: &IdentityKey) -> bool {
        self.by_seq_event_origin(k).is_some()
            || self.by_seq_event_casting(k).is_some()
            || self.by_seq_origin_casting(k).is_some()
            || self.by_event_origin_casting(k).is_some()
            || self.by_seq_event(k).is_some()
            || self.by_origin_casting(k).is_some()
            || self.by_event_casting(k).is_some()
            || self.by_seq_casting(k).is_some()
            || self.by_seq_origin(k).is_some()
            || self.by_event_origin(k).is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
