//! Enemy difficulty tiers and per-tier lookup tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical enemy difficulty class, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyTier {
    /// Fodder enemies.
    Trash,
    /// Regular enemies.
    Normal,
    /// Elite enemies.
    Elite,
    /// Mini-bosses (not the zone boss).
    MiniBoss,
    /// Zone bosses. The only tier that triggers boss overrides and pity.
    Boss,
}

impl EnemyTier {
    /// All tiers from weakest to strongest.
    pub const ALL: [EnemyTier; 5] = [
        Self::Trash,
        Self::Normal,
        Self::Elite,
        Self::MiniBoss,
        Self::Boss,
    ];

    /// Parse a tier name such as "trash", "mini-boss" or "Boss".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "trash" => Some(Self::Trash),
            "normal" => Some(Self::Normal),
            "elite" => Some(Self::Elite),
            "miniboss" => Some(Self::MiniBoss),
            "boss" => Some(Self::Boss),
            _ => None,
        }
    }

    /// True for kills that receive boss overrides and guaranteed drops.
    pub fn is_boss(self) -> bool {
        self == Self::Boss
    }
}

impl std::fmt::Display for EnemyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trash => write!(f, "Trash"),
            Self::Normal => write!(f, "Normal"),
            Self::Elite => write!(f, "Elite"),
            Self::MiniBoss => write!(f, "MiniBoss"),
            Self::Boss => write!(f, "Boss"),
        }
    }
}

/// Per-tier rows with a documented default.
///
/// A tier without its own row resolves to the [`EnemyTier::Normal`] row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable<T> {
    rows: BTreeMap<EnemyTier, T>,
}

impl<T> Default for TierTable<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T> TierTable<T> {
    /// The tier whose row is used when a tier has none of its own.
    pub const DEFAULT_TIER: EnemyTier = EnemyTier::Normal;

    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row for a tier.
    pub fn with(mut self, tier: EnemyTier, row: T) -> Self {
        self.rows.insert(tier, row);
        self
    }

    /// Set the row for a tier in place.
    pub fn insert(&mut self, tier: EnemyTier, row: T) {
        self.rows.insert(tier, row);
    }

    /// Row for `tier`, falling back to the Normal row.
    pub fn resolve(&self, tier: EnemyTier) -> Option<&T> {
        self.rows
            .get(&tier)
            .or_else(|| self.rows.get(&Self::DEFAULT_TIER))
    }

    /// The row configured for exactly this tier, without fallback.
    pub fn get(&self, tier: EnemyTier) -> Option<&T> {
        self.rows.get(&tier)
    }

    /// Iterate over configured rows in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (EnemyTier, &T)> {
        self.rows.iter().map(|(tier, row)| (*tier, row))
    }

    /// Number of configured rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no rows are configured.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
