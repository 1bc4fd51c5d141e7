//! Drop pools: designer-curated, rarity-tagged item lists.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{LootError, LootResult};
use crate::rarity::Rarity;

/// Stable identifier of an item definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of item rarities, keyed by item id.
pub trait ItemCatalog {
    /// The catalogued rarity of `item`, or `None` if the item is unknown.
    fn rarity_of(&self, item: &ItemId) -> Option<Rarity>;
}

impl ItemCatalog for HashMap<ItemId, Rarity> {
    fn rarity_of(&self, item: &ItemId) -> Option<Rarity> {
        self.get(item).copied()
    }
}

impl ItemCatalog for BTreeMap<ItemId, Rarity> {
    fn rarity_of(&self, item: &ItemId) -> Option<Rarity> {
        self.get(item).copied()
    }
}

/// One candidate item in a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropEntry {
    /// The item.
    pub item: ItemId,
    /// The item's catalogued rarity.
    pub rarity: Rarity,
}

impl DropEntry {
    /// Create an entry.
    pub fn new(item: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            item: ItemId::new(item),
            rarity,
        }
    }
}

/// A named, ordered list of candidate items.
///
/// The rarity partition used by sampling is built once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DropPool {
    name: String,
    entries: Vec<DropEntry>,
    by_rarity: [Vec<usize>; Rarity::COUNT],
}

impl DropPool {
    /// Build a pool from entries, in order.
    pub fn new(name: impl Into<String>, entries: Vec<DropEntry>) -> Self {
        let mut by_rarity: [Vec<usize>; Rarity::COUNT] = Default::default();
        for (i, entry) in entries.iter().enumerate() {
            by_rarity[entry.rarity.index()].push(i);
        }
        Self {
            name: name.into(),
            entries,
            by_rarity,
        }
    }

    /// An empty pool.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Build a pool from item ids, taking each rarity from `catalog`.
    pub fn from_catalog<C: ItemCatalog + ?Sized>(
        name: impl Into<String>,
        items: &[ItemId],
        catalog: &C,
    ) -> LootResult<Self> {
        let name = name.into();
        let entries = items
            .iter()
            .map(|item| {
                catalog
                    .rarity_of(item)
                    .map(|rarity| DropEntry {
                        item: item.clone(),
                        rarity,
                    })
                    .ok_or_else(|| LootError::UnknownItem {
                        item: item.to_string(),
                        context: format!("pool '{name}'"),
                    })
            })
            .collect::<LootResult<Vec<_>>>()?;
        Ok(Self::new(name, entries))
    }

    /// The pool's name, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries in authored order.
    pub fn entries(&self) -> &[DropEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the pool has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at an index.
    pub fn get(&self, index: usize) -> Option<&DropEntry> {
        self.entries.get(index)
    }

    /// Indices (into [`DropPool::entries`]) of the entries with exactly this rarity.
    pub fn partition(&self, rarity: Rarity) -> &[usize] {
        &self.by_rarity[rarity.index()]
    }

    /// Entries whose rarity is at or above `minimum`, in authored order.
    pub fn at_least(&self, minimum: Rarity) -> Vec<&DropEntry> {
        self.entries
            .iter()
            .filter(|e| e.rarity.is_at_least(minimum))
            .collect()
    }
}

#[derive(Serialize, Deserialize)]
struct DropPoolRepr {
    name: String,
    entries: Vec<DropEntry>,
}

impl Serialize for DropPool {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DropPoolRepr {
            name: self.name.clone(),
            entries: self.entries.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DropPool {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = DropPoolRepr::deserialize(deserializer)?;
        Ok(Self::new(repr.name, repr.entries))
    }
}
