//! Loot tables: pools, per-tier rows and boss overrides bundled together.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::engine::{KillPools, RollResult, roll_for_kill, roll_pool};
use crate::guarantee::{GuaranteeOutcome, GuaranteedRule};
use crate::planner::{RollPlanner, TierRow, clamp_count};
use crate::pool::DropPool;
use crate::rarity::RarityWeights;
use crate::rng::LootRng;
use crate::sampler::sample_any;
use crate::threat::ThreatScaling;
use crate::tier::{EnemyTier, TierTable};

/// Which of a table's pools a roll draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Zone-wide item pool.
    #[default]
    General,
    /// Crafting materials.
    Materials,
    /// Boss-only unique items.
    Uniques,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PoolKind::General => "general",
            PoolKind::Materials => "materials",
            PoolKind::Uniques => "uniques",
        };
        f.write_str(name)
    }
}

/// Extra rolls and the guarantee applied on boss kills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossOverrides {
    /// Disabling the block also disables the guarantee.
    pub enabled: bool,
    /// Rarity profile for the extra rolls.
    pub weights: RarityWeights,
    /// Extra rolls against the general pool.
    pub general_rolls: i32,
    /// Extra rolls against the materials pool.
    pub materials_rolls: i32,
    /// Extra uniform rolls against the uniques pool.
    pub unique_rolls: i32,
    /// Guaranteed minimum rarity for the whole kill.
    pub guarantee: GuaranteedRule,
}

impl Default for BossOverrides {
    fn default() -> Self {
        Self {
            enabled: true,
            weights: RarityWeights {
                common: 0.08,
                uncommon: 0.045,
                magic: 0.035,
                rare: 0.03,
                epic: 0.015,
                legendary: 0.004,
                set: 0.015,
                radiant: 0.0004,
            },
            general_rolls: 3,
            materials_rolls: 3,
            unique_rolls: 1,
            guarantee: GuaranteedRule::default(),
        }
    }
}

impl BossOverrides {
    /// A disabled block: boss kills roll like any other tier.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the extra-roll weight profile.
    pub fn with_weights(mut self, weights: RarityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the extra roll counts.
    pub fn with_rolls(mut self, general: i32, materials: i32, uniques: i32) -> Self {
        self.general_rolls = general;
        self.materials_rolls = materials;
        self.unique_rolls = uniques;
        self
    }

    /// Set the guaranteed rule.
    pub fn with_guarantee(mut self, guarantee: GuaranteedRule) -> Self {
        self.guarantee = guarantee;
        self
    }
}

/// A kill's drops plus what the guarantee and threat bands did, for tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KillRoll {
    /// Everything that dropped, in roll order.
    pub drops: RollResult,
    /// Guarantee outcome; `None` when the kill was not a boss kill or the
    /// boss block is disabled.
    pub guarantee: Option<GuaranteeOutcome>,
    /// Threat bonus rolls that passed their gate.
    pub bonus_rolls: u32,
}

/// A resolved loot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    /// Table name.
    pub name: String,
    /// Zone-wide pool.
    pub general: DropPool,
    /// Materials pool.
    pub materials: DropPool,
    /// Boss uniques pool.
    pub uniques: DropPool,
    /// Per-tier weights and roll counts.
    pub tiers: TierTable<TierRow>,
    /// When off, no tier rolls materials.
    pub roll_materials: bool,
    /// Boss kill augmentation.
    pub boss: BossOverrides,
    /// Threat bands; only kills rolled with a threat level use them.
    #[serde(default)]
    pub threat: ThreatScaling,
}

impl LootTable {
    /// A table with empty pools, no tier rows and default boss overrides.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            general: DropPool::empty(format!("{name}.general")),
            materials: DropPool::empty(format!("{name}.materials")),
            uniques: DropPool::empty(format!("{name}.uniques")),
            name,
            tiers: TierTable::new(),
            roll_materials: true,
            boss: BossOverrides::default(),
            threat: ThreatScaling::new(),
        }
    }

    /// Replace one pool.
    pub fn with_pool(mut self, kind: PoolKind, pool: DropPool) -> Self {
        match kind {
            PoolKind::General => self.general = pool,
            PoolKind::Materials => self.materials = pool,
            PoolKind::Uniques => self.uniques = pool,
        }
        self
    }

    /// Add or replace a tier row.
    pub fn with_tier(mut self, tier: EnemyTier, row: TierRow) -> Self {
        self.tiers.insert(tier, row);
        self
    }

    /// Toggle materials rolls.
    pub fn with_roll_materials(mut self, on: bool) -> Self {
        self.roll_materials = on;
        self
    }

    /// Replace the boss block.
    pub fn with_boss(mut self, boss: BossOverrides) -> Self {
        self.boss = boss;
        self
    }

    /// Replace the threat bands.
    pub fn with_threat(mut self, threat: ThreatScaling) -> Self {
        self.threat = threat;
        self
    }

    /// The pool of the given kind.
    pub fn pool(&self, kind: PoolKind) -> &DropPool {
        match kind {
            PoolKind::General => &self.general,
            PoolKind::Materials => &self.materials,
            PoolKind::Uniques => &self.uniques,
        }
    }

    /// Planner over this table's rows.
    pub fn planner(&self) -> RollPlanner<'_> {
        RollPlanner::new(&self.tiers, self.roll_materials)
    }

    /// Roll one kill.
    pub fn roll_kill<R, D>(&self, tier: EnemyTier, rng: &mut R, diagnostics: &mut D) -> RollResult
    where
        R: LootRng + ?Sized,
        D: Diagnostics + ?Sized,
    {
        self.roll_kill_detailed(tier, rng, diagnostics).drops
    }

    /// Roll one kill, reporting the guarantee outcome alongside the drops.
    pub fn roll_kill_detailed<R, D>(
        &self,
        tier: EnemyTier,
        rng: &mut R,
        diagnostics: &mut D,
    ) -> KillRoll
    where
        R: LootRng + ?Sized,
        D: Diagnostics + ?Sized,
    {
        self.resolve_kill(tier, None, rng, diagnostics)
    }

    /// Roll one kill at a threat level.
    ///
    /// The matching threat band rescales the tier's weights and offers its
    /// bonus rolls before boss overrides and the guarantee run.
    pub fn roll_kill_at_threat<R, D>(
        &self,
        tier: EnemyTier,
        threat: f64,
        rng: &mut R,
        diagnostics: &mut D,
    ) -> KillRoll
    where
        R: LootRng + ?Sized,
        D: Diagnostics + ?Sized,
    {
        self.resolve_kill(tier, Some(threat), rng, diagnostics)
    }

    fn resolve_kill<R, D>(
        &self,
        tier: EnemyTier,
        threat: Option<f64>,
        rng: &mut R,
        diagnostics: &mut D,
    ) -> KillRoll
    where
        R: LootRng + ?Sized,
        D: Diagnostics + ?Sized,
    {
        let band = threat.and_then(|t| self.threat.band_for(t));
        let planner = self.planner();
        let weights = match band {
            Some(band) => band.scale(&planner.weights(tier)),
            None => planner.weights(tier),
        };
        let pools = KillPools {
            general: Some(&self.general),
            materials: Some(&self.materials),
        };
        let mut drops = roll_for_kill(pools, &weights, planner.roll_counts(tier), rng);
        let bonus_rolls =
            band.map_or(0, |b| b.roll_bonus(&self.general, &weights, rng, &mut drops));

        let guarantee = if tier.is_boss() && self.boss.enabled {
            Some(self.apply_boss_overrides(&mut drops, rng, diagnostics))
        } else {
            None
        };
        tracing::debug!(
            table = %self.name,
            %tier,
            ?threat,
            bonus_rolls,
            drops = drops.len(),
            ?guarantee,
            "kill rolled"
        );
        KillRoll {
            drops,
            guarantee,
            bonus_rolls,
        }
    }

    /// Append the boss block's extra rolls to `drops`, then enforce its
    /// guarantee.
    pub fn apply_boss_overrides<R, D>(
        &self,
        drops: &mut RollResult,
        rng: &mut R,
        diagnostics: &mut D,
    ) -> GuaranteeOutcome
    where
        R: LootRng + ?Sized,
        D: Diagnostics + ?Sized,
    {
        let boss = &self.boss;
        roll_pool(
            &self.general,
            &boss.weights,
            clamp_count(boss.general_rolls),
            rng,
            drops,
        );
        if self.roll_materials {
            roll_pool(
                &self.materials,
                &boss.weights,
                clamp_count(boss.materials_rolls),
                rng,
                drops,
            );
        }
        for _ in 0..clamp_count(boss.unique_rolls) {
            if let Some(entry) = sample_any(&self.uniques, rng) {
                drops.push(entry.clone());
            }
        }
        boss.guarantee.apply(
            self.pool(boss.guarantee.source),
            drops,
            EnemyTier::Boss,
            rng,
            diagnostics,
        )
    }

    /// True if the boss guarantee can ever be satisfied from its source pool.
    pub fn guarantee_satisfiable(&self) -> bool {
        let rule = &self.boss.guarantee;
        !rule.enabled || !self.pool(rule.source).at_least(rule.minimum_rarity).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectedDiagnostics;
    use crate::pool::DropEntry;
    use crate::rarity::{Rarity, RarityMultipliers};
    use crate::rng::SeededRng;
    use crate::rng::testing::ScriptedRng;
    use crate::threat::ThreatBand;

    fn commons_only() -> RarityWeights {
        RarityWeights::none().with(Rarity::Common, 1.0)
    }

    fn table() -> LootTable {
        LootTable::new("test")
            .with_pool(
                PoolKind::General,
                DropPool::new(
                    "test.general",
                    vec![
                        DropEntry::new("rag", Rarity::Common),
                        DropEntry::new("blade", Rarity::Rare),
                    ],
                ),
            )
            .with_pool(
                PoolKind::Materials,
                DropPool::new("test.materials", vec![DropEntry::new("ore", Rarity::Common)]),
            )
            .with_pool(
                PoolKind::Uniques,
                DropPool::new("test.uniques", vec![DropEntry::new("crown", Rarity::Legendary)]),
            )
            .with_tier(EnemyTier::Normal, TierRow::new(commons_only(), 1, 0))
            .with_tier(EnemyTier::Elite, TierRow::new(commons_only(), 1, 1))
            .with_boss(
                BossOverrides::default()
                    .with_weights(commons_only())
                    .with_rolls(2, 1, 1)
                    .with_guarantee(GuaranteedRule::default().with_source(PoolKind::General)),
            )
    }

    #[test]
    fn normal_kill_rolls_general_only() {
        let t = table();
        let mut rng = SeededRng::new(1);
        let mut diags = CollectedDiagnostics::new();
        let roll = t.roll_kill_detailed(EnemyTier::Normal, &mut rng, &mut diags);
        assert_eq!(roll.drops.len(), 1);
        assert_eq!(roll.drops.drops()[0].item.as_str(), "rag");
        assert_eq!(roll.guarantee, None);
    }

    #[test]
    fn unmapped_tier_uses_normal_row() {
        let t = table();
        let mut rng = SeededRng::new(1);
        let drops = t.roll_kill(EnemyTier::Trash, &mut rng, &mut CollectedDiagnostics::new());
        assert_eq!(drops.len(), 1);
    }

    #[test]
    fn boss_kill_gets_overrides_and_guarantee() {
        let t = table();
        let mut rng = SeededRng::new(9);
        let mut diags = CollectedDiagnostics::new();
        let roll = t.roll_kill_detailed(EnemyTier::Boss, &mut rng, &mut diags);
        // base Normal row (1) + 2 general + 1 materials + 1 unique, then the crown satisfies Rare.
        let ids: Vec<&str> = roll.drops.item_ids().iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["rag", "rag", "rag", "ore", "crown"]);
        assert_eq!(roll.guarantee, Some(GuaranteeOutcome::AlreadySatisfied));
        assert!(diags.is_empty());
    }

    #[test]
    fn boss_guarantee_fills_from_source_pool() {
        let t = table().with_pool(PoolKind::Uniques, DropPool::empty("test.uniques"));
        let mut rng = SeededRng::new(4);
        let roll =
            t.roll_kill_detailed(EnemyTier::Boss, &mut rng, &mut CollectedDiagnostics::new());
        assert_eq!(roll.guarantee, Some(GuaranteeOutcome::Granted { appended: 1 }));
        assert_eq!(roll.drops.drops().last().unwrap().item.as_str(), "blade");
    }

    #[test]
    fn disabled_boss_block_rolls_like_normal() {
        let t = table().with_boss(BossOverrides::disabled());
        let mut rng = SeededRng::new(4);
        let roll =
            t.roll_kill_detailed(EnemyTier::Boss, &mut rng, &mut CollectedDiagnostics::new());
        assert_eq!(roll.drops.len(), 1);
        assert_eq!(roll.guarantee, None);
    }

    #[test]
    fn miniboss_is_not_elevated() {
        let t = table().with_tier(EnemyTier::MiniBoss, TierRow::new(commons_only(), 2, 0));
        let mut rng = SeededRng::new(4);
        let roll =
            t.roll_kill_detailed(EnemyTier::MiniBoss, &mut rng, &mut CollectedDiagnostics::new());
        assert_eq!(roll.drops.len(), 2);
        assert!(!roll.drops.has_at_least(Rarity::Rare));
        assert_eq!(roll.guarantee, None);
    }

    #[test]
    fn materials_switch_covers_boss_block() {
        let t = table().with_roll_materials(false);
        let mut rng = SeededRng::new(2);
        let drops = t.roll_kill(EnemyTier::Boss, &mut rng, &mut CollectedDiagnostics::new());
        assert!(drops.item_ids().iter().all(|i| i.as_str() != "ore"));
    }

    #[test]
    fn unsatisfiable_guarantee_is_reported() {
        let t = table()
            .with_pool(PoolKind::Uniques, DropPool::empty("test.uniques"))
            .with_pool(
                PoolKind::General,
                DropPool::new("test.general", vec![DropEntry::new("rag", Rarity::Common)]),
            );
        assert!(!t.guarantee_satisfiable());
        let mut rng = SeededRng::new(2);
        let mut diags = CollectedDiagnostics::new();
        let roll = t.roll_kill_detailed(EnemyTier::Boss, &mut rng, &mut diags);
        assert_eq!(roll.guarantee, Some(GuaranteeOutcome::NoEligibleItems));
        assert_eq!(diags.len(), 1);
    }

    fn threat_table() -> LootTable {
        let even = RarityWeights::none()
            .with(Rarity::Common, 1.0)
            .with(Rarity::Rare, 1.0);
        table()
            .with_tier(EnemyTier::Normal, TierRow::new(even, 1, 0))
            .with_threat(
                ThreatScaling::new()
                    .with_band(
                        ThreatBand::new(10.0).with_multipliers(
                            RarityMultipliers::default().with(Rarity::Common, 0.0),
                        ),
                    )
                    .with_band(ThreatBand::new(50.0).with_bonus(2, 1.0)),
            )
    }

    #[test]
    fn kills_without_threat_ignore_bands() {
        let t = threat_table();
        let mut rng = ScriptedRng::constant(0.0, 0);
        let roll =
            t.roll_kill_detailed(EnemyTier::Normal, &mut rng, &mut CollectedDiagnostics::new());
        assert_eq!(roll.drops.item_ids()[0].as_str(), "rag");
        assert_eq!(roll.bonus_rolls, 0);
    }

    #[test]
    fn threat_band_rescales_tier_weights() {
        let t = threat_table();
        let mut diags = CollectedDiagnostics::new();

        // Below every band: a 0.0 draw still lands on Common.
        let mut rng = ScriptedRng::constant(0.0, 0);
        let low = t.roll_kill_at_threat(EnemyTier::Normal, 5.0, &mut rng, &mut diags);
        assert_eq!(low.drops.item_ids()[0].as_str(), "rag");

        // The 10+ band zeroes Common, so the same draw lands on Rare.
        let mut rng = ScriptedRng::constant(0.0, 0);
        let high = t.roll_kill_at_threat(EnemyTier::Normal, 12.0, &mut rng, &mut diags);
        assert_eq!(high.drops.item_ids()[0].as_str(), "blade");
        assert_eq!(high.bonus_rolls, 0);
    }

    #[test]
    fn threat_bonus_rolls_add_general_drops() {
        let t = threat_table();
        let mut rng = SeededRng::new(8);
        let roll = t.roll_kill_at_threat(
            EnemyTier::Normal,
            80.0,
            &mut rng,
            &mut CollectedDiagnostics::new(),
        );
        assert_eq!(roll.bonus_rolls, 2);
        assert_eq!(roll.drops.len(), 3);
    }

    #[test]
    fn guarantee_sees_threat_bonus_drops() {
        let t = threat_table();
        let mut rng = SeededRng::new(3);
        let roll = t.roll_kill_at_threat(
            EnemyTier::Boss,
            80.0,
            &mut rng,
            &mut CollectedDiagnostics::new(),
        );
        // Normal row (1) + 2 bonus + 2 general + 1 materials + 1 unique.
        assert!(roll.drops.len() >= 7);
        assert_eq!(roll.bonus_rolls, 2);
        assert!(roll.drops.has_at_least(Rarity::Rare));
    }
}
