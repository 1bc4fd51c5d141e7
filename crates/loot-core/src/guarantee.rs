//! Guaranteed minimum rarity for elevated kills.
//!
//! If a boss roll came up short, items are drawn straight from the
//! eligible part of the source pool. The retry bound is on draws from a
//! pool known to contain qualifying items, so it terminates no matter how
//! unlikely the target rarity is under the tier's weights.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::engine::RollResult;
use crate::pool::DropPool;
use crate::rarity::Rarity;
use crate::rng::LootRng;
use crate::table::PoolKind;
use crate::tier::EnemyTier;

/// Configuration of the guaranteed-minimum-rarity rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuaranteedRule {
    /// Whether the rule runs at all.
    pub enabled: bool,
    /// The rarity at least one drop must reach.
    pub minimum_rarity: Rarity,
    /// Upper bound on items appended by one application. Values below 1
    /// behave as 1.
    pub max_attempts: u32,
    /// Which of the table's pools supplies guaranteed items.
    pub source: PoolKind,
}

impl Default for GuaranteedRule {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_rarity: Rarity::Rare,
            max_attempts: 12,
            source: PoolKind::General,
        }
    }
}

/// What an application of the rule did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuaranteeOutcome {
    /// The rule is disabled; nothing was checked.
    Disabled,
    /// The result already met the minimum; nothing was appended.
    AlreadySatisfied,
    /// Items were appended until the minimum was met.
    Granted {
        /// Number of items appended.
        appended: u32,
    },
    /// The source pool has nothing eligible; a diagnostic was reported.
    NoEligibleItems,
}

impl GuaranteedRule {
    /// A disabled rule.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the minimum rarity.
    pub fn with_minimum(mut self, minimum: Rarity) -> Self {
        self.minimum_rarity = minimum;
        self
    }

    /// Set the attempt bound.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the source pool.
    pub fn with_source(mut self, source: PoolKind) -> Self {
        self.source = source;
        self
    }

    /// The effective attempt bound (at least 1).
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Enforce the guarantee on `result`, drawing from `source`.
    ///
    /// Never removes drops. Appends at most [`Self::attempts`] items and
    /// stops as soon as one qualifies. With no eligible items in `source`,
    /// reports exactly one diagnostic and leaves `result` untouched.
    pub fn apply<R, D>(
        &self,
        source: &DropPool,
        result: &mut RollResult,
        tier: EnemyTier,
        rng: &mut R,
        diagnostics: &mut D,
    ) -> GuaranteeOutcome
    where
        R: LootRng + ?Sized,
        D: Diagnostics + ?Sized,
    {
        if !self.enabled {
            return GuaranteeOutcome::Disabled;
        }
        let minimum = self.minimum_rarity;
        if result.has_at_least(minimum) {
            return GuaranteeOutcome::AlreadySatisfied;
        }

        let eligible = source.at_least(minimum);
        if eligible.is_empty() {
            diagnostics.report(Diagnostic::NoEligibleItems {
                pool: source.name().to_string(),
                tier,
                minimum,
            });
            return GuaranteeOutcome::NoEligibleItems;
        }

        let mut appended = 0;
        for _ in 0..self.attempts() {
            let pick = eligible[rng.pick(eligible.len())];
            result.push(pick.clone());
            appended += 1;
            if pick.rarity.is_at_least(minimum) {
                break;
            }
        }
        GuaranteeOutcome::Granted { appended }
    }
}
