//! The built-in zone-1 loot economy.
//!
//! Produces the same [`LootConfig`] a designer would author by hand, so the
//! CLI and simulations have something to run against without a config file.

use std::collections::BTreeMap;

use crate::config::{LootConfig, PoolIds, SetSpec, TableSpec};
use crate::planner::TierRow;
use crate::pool::ItemId;
use crate::rarity::{Rarity, RarityMultipliers, RarityWeights};
use crate::set_piece::{PityConfig, SetTierRow};
use crate::table::BossOverrides;
use crate::threat::{ThreatBand, ThreatScaling};
use crate::tier::{EnemyTier, TierTable};

/// Name of the zone-1 loot table.
pub const ZONE1_TABLE: &str = "zone1";

/// Id of the zone-1 item set.
pub const ZONE1_SET: &str = "abyssal_initiate";

/// Zone 1: five enemy tiers, boss uniques, and the Abyssal Initiate set.
pub fn zone1() -> LootConfig {
    let items: BTreeMap<ItemId, Rarity> = [
        ("frayed_wrap", Rarity::Common),
        ("chipped_dagger", Rarity::Common),
        ("worn_sandals", Rarity::Common),
        ("leather_cap", Rarity::Uncommon),
        ("iron_shortsword", Rarity::Uncommon),
        ("glowing_ring", Rarity::Magic),
        ("runed_buckler", Rarity::Magic),
        ("duskwoven_cloak", Rarity::Rare),
        ("abyssal_edge", Rarity::Rare),
        ("voidglass_amulet", Rarity::Epic),
        ("maw_of_the_deep", Rarity::Legendary),
        ("starfall_sigil", Rarity::Radiant),
        ("abyss_shard", Rarity::Common),
        ("gloom_thread", Rarity::Common),
        ("tidestone", Rarity::Uncommon),
        ("warden_crown", Rarity::Epic),
        ("warden_heart", Rarity::Legendary),
        ("initiate_helm", Rarity::Set),
        ("initiate_chest", Rarity::Set),
        ("initiate_legs", Rarity::Set),
    ]
    .into_iter()
    .map(|(id, rarity)| (ItemId::from(id), rarity))
    .collect();

    let ids = |names: &[&str]| names.iter().map(|n| ItemId::from(*n)).collect::<Vec<_>>();

    let table = TableSpec {
        pools: PoolIds {
            general: ids(&[
                "frayed_wrap",
                "chipped_dagger",
                "worn_sandals",
                "leather_cap",
                "iron_shortsword",
                "glowing_ring",
                "runed_buckler",
                "duskwoven_cloak",
                "abyssal_edge",
                "voidglass_amulet",
                "maw_of_the_deep",
                "starfall_sigil",
            ]),
            materials: ids(&["abyss_shard", "gloom_thread", "tidestone"]),
            uniques: ids(&["warden_crown", "warden_heart"]),
        },
        tiers: TierTable::new()
            .with(EnemyTier::Trash, TierRow::new(trash_weights(), 1, 0))
            .with(EnemyTier::Normal, TierRow::new(normal_weights(), 1, 0))
            .with(EnemyTier::Elite, TierRow::new(elite_weights(), 1, 1))
            .with(EnemyTier::MiniBoss, TierRow::new(miniboss_weights(), 2, 2)),
        roll_materials: true,
        boss: BossOverrides::default().with_weights(miniboss_weights()),
        threat: threat_bands(),
    };

    let set = SetSpec {
        pieces: ids(&["initiate_helm", "initiate_chest", "initiate_legs"]),
        trash: SetTierRow::new(0.5, 1),
        elite: SetTierRow::new(2.0, 1),
        boss: SetTierRow::new(6.0, 1),
        pity: PityConfig {
            enabled: true,
            threshold_kills: 10,
            guarantee_one_piece: true,
        },
    };

    LootConfig {
        items,
        tables: BTreeMap::from([(ZONE1_TABLE.to_string(), table)]),
        sets: BTreeMap::from([(ZONE1_SET.to_string(), set)]),
    }
}

fn weights(w: [f64; Rarity::COUNT]) -> RarityWeights {
    Rarity::ALL
        .iter()
        .zip(w)
        .fold(RarityWeights::none(), |acc, (rarity, weight)| acc.with(*rarity, weight))
}

/// Zone-1 threat bands: deeper runs trade commons for rarer drops and
/// start offering bonus rolls.
pub fn threat_bands() -> ThreatScaling {
    let richer = |common: f64, rare_up: f64| {
        RarityMultipliers::default()
            .with(Rarity::Common, common)
            .with(Rarity::Rare, rare_up)
            .with(Rarity::Epic, rare_up)
            .with(Rarity::Legendary, rare_up)
    };
    ThreatScaling::new()
        .with_band(ThreatBand::new(25.0).with_multipliers(richer(1.0, 1.25)))
        .with_band(
            ThreatBand::new(50.0)
                .with_multipliers(richer(0.85, 1.5))
                .with_bonus(1, 0.25),
        )
        .with_band(
            ThreatBand::new(100.0)
                .with_multipliers(richer(0.7, 2.0))
                .with_bonus(2, 0.35),
        )
}

/// Trash-tier rarity chances.
pub fn trash_weights() -> RarityWeights {
    weights([0.05, 0.03, 0.02, 0.015, 0.005, 0.001, 0.0085, 0.0001])
}

/// Normal-tier rarity chances.
pub fn normal_weights() -> RarityWeights {
    weights([0.06, 0.035, 0.025, 0.02, 0.0075, 0.0015, 0.01, 0.00012])
}

/// Elite-tier rarity chances.
pub fn elite_weights() -> RarityWeights {
    weights([0.07, 0.04, 0.03, 0.025, 0.01, 0.0025, 0.0125, 0.0002])
}

/// Mini-boss rarity chances, also used for boss extra rolls.
pub fn miniboss_weights() -> RarityWeights {
    weights([0.08, 0.045, 0.035, 0.03, 0.015, 0.004, 0.015, 0.0004])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_config;

    #[test]
    fn zone1_resolves() {
        let config = zone1();
        let table = config.table(ZONE1_TABLE).unwrap();
        assert_eq!(table.general.len(), 12);
        assert!(table.guarantee_satisfiable());
        let set = config.set(ZONE1_SET).unwrap();
        assert_eq!(set.pieces.len(), 3);
        assert_eq!(set.pity.threshold(), 10);
    }

    #[test]
    fn zone1_is_clean() {
        let issues = validate_config(&zone1());
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn boss_weights_match_miniboss() {
        assert_eq!(BossOverrides::default().weights, miniboss_weights());
    }

    #[test]
    fn threat_bands_escalate() {
        let bands = threat_bands();
        assert!(bands.band_for(10.0).is_none());
        let mid = bands.band_for(60.0).unwrap();
        assert_eq!(mid.min_threat, 50.0);
        let deep = bands.band_for(250.0).unwrap();
        assert!(deep.bonus_rolls > mid.bonus_rolls);
        let elite = elite_weights();
        assert!(deep.scale(&elite).weight(Rarity::Rare) > mid.scale(&elite).weight(Rarity::Rare));
    }

    #[test]
    fn tiers_get_richer() {
        assert!(trash_weights().total() < normal_weights().total());
        assert!(normal_weights().total() < elite_weights().total());
        assert!(elite_weights().total() < miniboss_weights().total());
    }
}
