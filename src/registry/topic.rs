use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::paper::{PaperId, PaperRecord};

/// Insertion-ordered mapping from paper id to record for one topic.
///
/// Serializes as a single JSON object keyed by id, in insertion order.
/// At most one record per id; the first one inserted wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicRegistry {
    entries: Vec<(PaperId, PaperRecord)>,
    positions: HashMap<PaperId, usize>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the id is already present. Returns whether it was new.
    pub fn insert_if_absent(&mut self, id: PaperId, record: PaperRecord) -> bool {
        if self.positions.contains_key(&id) {
            return false;
        }
        self.positions.insert(id.clone(), self.entries.len());
        self.entries.push((id, record));
        true
    }

    pub fn get(&self, id: &PaperId) -> Option<&PaperRecord> {
        self.positions.get(id).map(|&ix| &self.entries[ix].1)
    }

    pub fn contains(&self, id: &PaperId) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PaperId, &PaperRecord)> {
        self.entries.iter().map(|(id, record)| (id, record))
    }

    pub fn ids(&self) -> impl Iterator<Item = &PaperId> {
        self.entries.iter().map(|(id, _)| id)
    }
}

impl Serialize for TopicRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TopicRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RegistryVisitor)
    }
}

struct RegistryVisitor;

impl<'de> Visitor<'de> for RegistryVisitor {
    type Value = TopicRegistry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of paper id to paper record")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut registry = TopicRegistry::new();
        while let Some((id, record)) = access.next_entry::<PaperId, PaperRecord>()? {
            // Duplicate keys in a hand-edited file: keep the first.
            registry.insert_if_absent(id, record);
        }
        Ok(registry)
    }
}
