//! Per-tier roll counts and rarity profiles.

use serde::{Deserialize, Serialize};

use crate::rarity::RarityWeights;
use crate::tier::{EnemyTier, TierTable};

/// Resolved number of rolls against each pool for one kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RollCounts {
    /// Rolls against the general pool.
    pub general: u32,
    /// Rolls against the materials pool.
    pub materials: u32,
}

impl RollCounts {
    /// Resolve configured counts, clamping negatives to zero.
    pub fn clamped(general: i32, materials: i32) -> Self {
        Self {
            general: clamp_count(general),
            materials: clamp_count(materials),
        }
    }

    /// Total rolls across both pools.
    pub fn total(&self) -> u32 {
        self.general.saturating_add(self.materials)
    }
}

/// Clamp a configured (possibly negative) roll count.
pub(crate) fn clamp_count(configured: i32) -> u32 {
    u32::try_from(configured).unwrap_or(0)
}

/// One tier's tuning: rarity profile and configured roll counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TierRow {
    /// Rarity weights for each roll.
    pub weights: RarityWeights,
    /// Configured rolls against the general pool. Negative means zero.
    pub general_rolls: i32,
    /// Configured rolls against the materials pool. Negative means zero.
    pub materials_rolls: i32,
}

impl TierRow {
    /// Create a row.
    pub fn new(weights: RarityWeights, general_rolls: i32, materials_rolls: i32) -> Self {
        Self {
            weights,
            general_rolls,
            materials_rolls,
        }
    }
}

/// Resolves roll counts and rarity profiles per tier.
#[derive(Debug, Clone, Copy)]
pub struct RollPlanner<'a> {
    rows: &'a TierTable<TierRow>,
    roll_materials: bool,
}

impl<'a> RollPlanner<'a> {
    /// Plan over a table's tier rows. With `roll_materials` off, every tier
    /// gets zero materials rolls.
    pub fn new(rows: &'a TierTable<TierRow>, roll_materials: bool) -> Self {
        Self {
            rows,
            roll_materials,
        }
    }

    /// Roll counts for a tier; unmapped tiers use the Normal row, and a
    /// table with no Normal row yields zero rolls.
    pub fn roll_counts(&self, tier: EnemyTier) -> RollCounts {
        let Some(row) = self.rows.resolve(tier) else {
            return RollCounts::default();
        };
        let materials = if self.roll_materials {
            row.materials_rolls
        } else {
            0
        };
        RollCounts::clamped(row.general_rolls, materials)
    }

    /// Rarity profile for a tier, with the same fallback as [`Self::roll_counts`].
    pub fn weights(&self, tier: EnemyTier) -> RarityWeights {
        self.rows
            .resolve(tier)
            .map(|row| row.weights)
            .unwrap_or_default()
    }
}
