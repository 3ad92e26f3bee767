//! Insertion-ordered counting containers for rankings.
//!
//! Every aggregation call builds fresh counters; nothing is shared between
//! calls. `Counter` remembers first-seen order so that equal counts rank in
//! arrival order, and `RankedCounts` keeps that order through JSON.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A key → count accumulator that preserves first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the key with count 1, or bump an existing count.
    pub fn bump(&mut self, key: &str) {
        self.add(key, 1);
    }

    /// Insert the key with the given count, or add to an existing count.
    pub fn add(&mut self, key: &str, n: u64) {
        match self.counts.get_mut(key) {
            Some(count) => *count += n,
            None => {
                self.order.push(key.to_string());
                self.counts.insert(key.to_string(), n);
            }
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consume the counter into pairs sorted descending by count.
    /// The sort is stable on count only, so ties keep first-seen order.
    pub fn into_ranked(self) -> RankedCounts {
        let Counter { order, counts } = self;
        let mut pairs: Vec<(String, u64)> = order
            .into_iter()
            .map(|key| {
                let count = counts.get(&key).copied().unwrap_or(0);
                (key, count)
            })
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        RankedCounts(pairs)
    }

    /// Like `into_ranked`, truncated to the `k` highest-count keys.
    pub fn into_top(self, k: usize) -> RankedCounts {
        let mut ranked = self.into_ranked();
        ranked.0.truncate(k);
        ranked
    }
}

/// Ranked key → count pairs. Serializes as a JSON object whose keys appear
/// in rank order, the shape consumers of the reports expect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedCounts(pub Vec<(String, u64)>);

impl RankedCounts {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The highest-ranked pair, if any.
    pub fn first(&self) -> Option<(&str, u64)> {
        self.0.first().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

impl Serialize for RankedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RankedCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RankedVisitor;

        impl<'de> Visitor<'de> for RankedVisitor {
            type Value = RankedCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string keys to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, count)) = access.next_entry::<String, u64>()? {
                    pairs.push((key, count));
                }
                Ok(RankedCounts(pairs))
            }
        }

        deserializer.deserialize_map(RankedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_and_get() {
        let mut counter = Counter::new();
        counter.bump("GP");
        counter.bump("GP");
        counter.bump("iOS");
        assert_eq!(counter.get("GP"), 2);
        assert_eq!(counter.get("iOS"), 1);
        assert_eq!(counter.get("AMZ"), 0);
        assert_eq!(counter.len(), 2);
    }

    #[test]
    fn test_ranked_sorts_descending() {
        let mut counter = Counter::new();
        counter.add("low", 1);
        counter.add("high", 5);
        counter.add("mid", 3);
        let ranked = counter.into_ranked();
        let keys: Vec<&str> = ranked.keys().collect();
        assert_eq!(keys, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let mut counter = Counter::new();
        counter.add("b", 2);
        counter.add("a", 2);
        counter.add("c", 2);
        let ranked = counter.into_ranked();
        let keys: Vec<&str> = ranked.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_into_top_truncates() {
        let mut counter = Counter::new();
        for (key, n) in [("a", 4), ("b", 3), ("c", 2), ("d", 1)] {
            counter.add(key, n);
        }
        let top = counter.into_top(2);
        let keys: Vec<&str> = top.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_json_object_keeps_rank_order() {
        let mut counter = Counter::new();
        counter.add("second", 2);
        counter.add("first", 9);
        let ranked = counter.into_ranked();

        let json = serde_json::to_string(&ranked).unwrap();
        assert_eq!(json, r#"{"first":9,"second":2}"#);

        let back: RankedCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ranked);
    }

    #[test]
    fn test_empty_counter() {
        let ranked = Counter::new().into_ranked();
        assert!(ranked.is_empty());
        assert!(ranked.first().is_none());
        assert_eq!(serde_json::to_string(&ranked).unwrap(), "{}");
    }
}
