//! Threat-based loot scaling.
//!
//! A table can carry bands keyed by a minimum threat level. On a kill at a
//! given threat, the band with the highest `min_threat` at or below it
//! rescales the tier's rarity weights and may add gated bonus rolls against
//! the general pool. Kills rolled without a threat level are unaffected.

use serde::{Deserialize, Serialize};

use crate::engine::{RollResult, roll_pool};
use crate::planner::clamp_count;
use crate::pool::DropPool;
use crate::rarity::{RarityMultipliers, RarityWeights};
use crate::rng::LootRng;

/// One threat band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatBand {
    /// Lowest threat at which this band applies.
    pub min_threat: f64,
    /// Factors applied to the tier's rarity weights.
    pub multipliers: RarityMultipliers,
    /// Extra general rolls offered per kill. Negatives count as zero.
    pub bonus_rolls: i32,
    /// Chance in `[0, 1]` that each offered bonus roll happens.
    pub bonus_roll_chance: f64,
}

impl Default for ThreatBand {
    fn default() -> Self {
        Self {
            min_threat: 0.0,
            multipliers: RarityMultipliers::default(),
            bonus_rolls: 0,
            bonus_roll_chance: 0.0,
        }
    }
}

impl ThreatBand {
    /// A band starting at `min_threat` that changes nothing yet.
    pub fn new(min_threat: f64) -> Self {
        Self {
            min_threat,
            ..Self::default()
        }
    }

    /// Set the weight multipliers.
    pub fn with_multipliers(mut self, multipliers: RarityMultipliers) -> Self {
        self.multipliers = multipliers;
        self
    }

    /// Set the bonus roll count and per-roll chance.
    pub fn with_bonus(mut self, rolls: i32, chance: f64) -> Self {
        self.bonus_rolls = rolls;
        self.bonus_roll_chance = chance;
        self
    }

    /// Bonus roll chance clamped to `[0, 1]`; NaN counts as 0.
    pub fn bonus_chance(&self) -> f64 {
        if self.bonus_roll_chance.is_nan() {
            0.0
        } else {
            self.bonus_roll_chance.clamp(0.0, 1.0)
        }
    }

    /// Apply this band's multipliers to a profile.
    pub fn scale(&self, weights: &RarityWeights) -> RarityWeights {
        weights.scaled(&self.multipliers)
    }

    /// Offer the band's bonus rolls against `pool`.
    ///
    /// Each offered roll costs one uniform draw for its gate; a roll that
    /// passes is a normal rarity-then-item roll with `weights`. Returns how
    /// many gates passed.
    pub fn roll_bonus<R: LootRng + ?Sized>(
        &self,
        pool: &DropPool,
        weights: &RarityWeights,
        rng: &mut R,
        out: &mut RollResult,
    ) -> u32 {
        let chance = self.bonus_chance();
        let mut passed = 0;
        for _ in 0..clamp_count(self.bonus_rolls) {
            if rng.uniform01() < chance {
                roll_pool(pool, weights, 1, rng, out);
                passed += 1;
            }
        }
        passed
    }
}

/// A table's threat bands. Band order does not matter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatScaling {
    /// The bands.
    pub bands: Vec<ThreatBand>,
}

impl ThreatScaling {
    /// No bands: threat never changes a roll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a band.
    pub fn with_band(mut self, band: ThreatBand) -> Self {
        self.bands.push(band);
        self
    }

    /// True if there are no bands.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// The band for `threat`: the highest `min_threat` not above it. On a
    /// tie the earlier band wins. NaN threat matches nothing.
    pub fn band_for(&self, threat: f64) -> Option<&ThreatBand> {
        if threat.is_nan() {
            return None;
        }
        let mut best: Option<&ThreatBand> = None;
        for band in self.bands.iter().filter(|b| b.min_threat <= threat) {
            if best.is_none_or(|b| band.min_threat > b.min_threat) {
                best = Some(band);
            }
        }
        best
    }
}
