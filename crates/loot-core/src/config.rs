//! Authored loot configuration: a JSON document bundling the item catalog,
//! named loot tables and set-piece configs.
//!
//! Tables and sets reference items by id; [`LootConfig::table`] and
//! [`LootConfig::set`] resolve those ids against the catalog into runtime
//! [`LootTable`] and [`SetPieceConfig`] values.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LootError, LootResult};
use crate::planner::TierRow;
use crate::pool::{DropPool, ItemId};
use crate::rarity::Rarity;
use crate::set_piece::{PityConfig, SetPieceConfig, SetTierRow};
use crate::table::{BossOverrides, LootTable, PoolKind};
use crate::threat::ThreatScaling;
use crate::tier::TierTable;

/// Item ids making up each of a table's pools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolIds {
    /// General pool items.
    pub general: Vec<ItemId>,
    /// Materials pool items.
    pub materials: Vec<ItemId>,
    /// Boss uniques.
    pub uniques: Vec<ItemId>,
}

impl PoolIds {
    /// Ids for one pool kind.
    pub fn ids(&self, kind: PoolKind) -> &[ItemId] {
        match kind {
            PoolKind::General => &self.general,
            PoolKind::Materials => &self.materials,
            PoolKind::Uniques => &self.uniques,
        }
    }
}

/// An authored loot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSpec {
    /// Pool contents.
    pub pools: PoolIds,
    /// Per-tier rows.
    pub tiers: TierTable<TierRow>,
    /// When off, no tier rolls materials.
    pub roll_materials: bool,
    /// Boss kill augmentation.
    pub boss: BossOverrides,
    /// Threat bands.
    pub threat: ThreatScaling,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            pools: PoolIds::default(),
            tiers: TierTable::new(),
            roll_materials: true,
            boss: BossOverrides::default(),
            threat: ThreatScaling::new(),
        }
    }
}

/// An authored item set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetSpec {
    /// Piece item ids.
    pub pieces: Vec<ItemId>,
    /// Row for trash and normal kills.
    pub trash: SetTierRow,
    /// Row for elite and mini-boss kills.
    pub elite: SetTierRow,
    /// Row for boss kills.
    pub boss: SetTierRow,
    /// Boss pity.
    pub pity: PityConfig,
}

/// The whole authored loot economy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Item catalog: id to rarity.
    pub items: BTreeMap<ItemId, Rarity>,
    /// Loot tables by name.
    pub tables: BTreeMap<String, TableSpec>,
    /// Item sets by id.
    pub sets: BTreeMap<String, SetSpec>,
}

impl LootConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(json: &str) -> LootResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> LootResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> LootResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LootError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Write this config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> LootResult<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| LootError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Names of the configured tables, sorted.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Ids of the configured sets, sorted.
    pub fn set_ids(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Resolve a named table against the catalog.
    pub fn table(&self, name: &str) -> LootResult<LootTable> {
        let def = self
            .tables
            .get(name)
            .ok_or_else(|| LootError::UnknownTable(name.to_string()))?;

        let mut table = LootTable::new(name)
            .with_roll_materials(def.roll_materials)
            .with_boss(def.boss.clone())
            .with_threat(def.threat.clone());
        table.tiers = def.tiers.clone();
        for kind in [PoolKind::General, PoolKind::Materials, PoolKind::Uniques] {
            let pool =
                DropPool::from_catalog(format!("{name}.{kind}"), def.pools.ids(kind), &self.items)?;
            table = table.with_pool(kind, pool);
        }
        Ok(table)
    }

    /// Resolve a named set against the catalog.
    pub fn set(&self, id: &str) -> LootResult<SetPieceConfig> {
        let def = self
            .sets
            .get(id)
            .ok_or_else(|| LootError::UnknownSet(id.to_string()))?;
        let pieces = DropPool::from_catalog(format!("set {id}"), &def.pieces, &self.items)?;
        Ok(SetPieceConfig {
            set_id: id.to_string(),
            pieces,
            trash: def.trash,
            elite: def.elite,
            boss: def.boss,
            pity: def.pity,
        })
    }
}
