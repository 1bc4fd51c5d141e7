//! The per-kill roll: weighted rarity, then an item of that rarity.

use serde::{Deserialize, Serialize};

use crate::planner::RollCounts;
use crate::pool::{DropEntry, DropPool, ItemId};
use crate::rarity::{Rarity, RarityWeights};
use crate::rng::LootRng;
use crate::sampler::sample;
use crate::selector::select_rarity;

/// Ordered drops produced by a roll. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollResult {
    drops: Vec<DropEntry>,
}

impl RollResult {
    /// An empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a drop.
    pub fn push(&mut self, drop: DropEntry) {
        self.drops.push(drop);
    }

    /// Append every drop of another result, keeping order.
    pub fn extend(&mut self, other: RollResult) {
        self.drops.extend(other.drops);
    }

    /// Drops in roll order.
    pub fn drops(&self) -> &[DropEntry] {
        &self.drops
    }

    /// Item ids in roll order.
    pub fn item_ids(&self) -> Vec<&ItemId> {
        self.drops.iter().map(|d| &d.item).collect()
    }

    /// Consume the result, keeping only the item ids.
    pub fn into_item_ids(self) -> Vec<ItemId> {
        self.drops.into_iter().map(|d| d.item).collect()
    }

    /// True if any drop is at or above `minimum`.
    pub fn has_at_least(&self, minimum: Rarity) -> bool {
        self.drops.iter().any(|d| d.rarity.is_at_least(minimum))
    }

    /// Number of drops.
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    /// True if nothing dropped.
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }
}

impl From<Vec<DropEntry>> for RollResult {
    fn from(drops: Vec<DropEntry>) -> Self {
        Self { drops }
    }
}

/// The pools a normal kill rolls against. Either may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct KillPools<'a> {
    /// The general (zone-wide) pool.
    pub general: Option<&'a DropPool>,
    /// The materials pool.
    pub materials: Option<&'a DropPool>,
}

/// Roll a normal kill: general rolls first, then materials rolls.
///
/// Each roll is independent: select a rarity, then sample that rarity
/// from the pool. Missing pools, empty profiles and zero counts
/// contribute nothing.
pub fn roll_for_kill<R: LootRng + ?Sized>(
    pools: KillPools<'_>,
    weights: &RarityWeights,
    counts: RollCounts,
    rng: &mut R,
) -> RollResult {
    let mut result = RollResult::new();
    if let Some(general) = pools.general {
        roll_pool(general, weights, counts.general, rng, &mut result);
    }
    if let Some(materials) = pools.materials {
        roll_pool(materials, weights, counts.materials, rng, &mut result);
    }
    result
}

/// Perform `rolls` independent rarity-then-item rolls against one pool.
pub fn roll_pool<R: LootRng + ?Sized>(
    pool: &DropPool,
    weights: &RarityWeights,
    rolls: u32,
    rng: &mut R,
    out: &mut RollResult,
) {
    for _ in 0..rolls {
        let Some(rarity) = select_rarity(weights, rng) else {
            continue;
        };
        if let Some(entry) = sample(pool, rarity, rng) {
            out.push(entry.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use crate::rng::testing::ScriptedRng;

    fn pool() -> DropPool {
        DropPool::new(
            "zone",
            vec![
                DropEntry::new("A", Rarity::Common),
                DropEntry::new("B", Rarity::Rare),
            ],
        )
    }

    fn even_weights() -> RarityWeights {
        RarityWeights::none()
            .with(Rarity::Common, 1.0)
            .with(Rarity::Rare, 1.0)
    }

    #[test]
    fn single_trash_roll_with_zero_draws() {
        let p = pool();
        let mut rng = ScriptedRng::constant(0.0, 0);
        let pools = KillPools {
            general: Some(&p),
            materials: None,
        };
        let result = roll_for_kill(pools, &even_weights(), RollCounts::clamped(1, 0), &mut rng);
        let ids: Vec<&str> = result.item_ids().iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["A"]);
    }

    #[test]
    fn general_rolls_precede_materials() {
        let general = pool();
        let materials = DropPool::new("mats", vec![DropEntry::new("ore", Rarity::Common)]);
        let mut rng = ScriptedRng::constant(0.0, 0);
        let pools = KillPools {
            general: Some(&general),
            materials: Some(&materials),
        };
        let result = roll_for_kill(pools, &even_weights(), RollCounts::clamped(2, 1), &mut rng);
        let ids: Vec<&str> = result.item_ids().iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["A", "A", "ore"]);
    }

    #[test]
    fn nothing_to_roll_is_silent() {
        let p = pool();
        let mut rng = ScriptedRng::constant(0.0, 0);
        let full = KillPools {
            general: Some(&p),
            materials: Some(&p),
        };
        let none = RarityWeights::none();
        assert!(roll_for_kill(full, &none, RollCounts::clamped(3, 3), &mut rng).is_empty());
        assert!(roll_for_kill(full, &even_weights(), RollCounts::default(), &mut rng).is_empty());
        let five = RollCounts::clamped(5, 5);
        assert!(roll_for_kill(KillPools::default(), &even_weights(), five, &mut rng).is_empty());
        let empty = DropPool::empty("e");
        let empty_pools = KillPools {
            general: Some(&empty),
            materials: None,
        };
        let counts = RollCounts::clamped(4, 0);
        assert!(roll_for_kill(empty_pools, &even_weights(), counts, &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_sequence() {
        let p = pool();
        let pools = KillPools {
            general: Some(&p),
            materials: Some(&p),
        };
        let run = |seed| {
            let mut rng = SeededRng::new(seed);
            let counts = RollCounts::clamped(2, 1);
            (0..500)
                .flat_map(|_| {
                    roll_for_kill(pools, &even_weights(), counts, &mut rng).into_item_ids()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(77), run(77));
        assert_ne!(run(77), run(78));
    }

    #[test]
    fn every_roll_counts_when_profile_is_full() {
        let p = pool();
        let pools = KillPools {
            general: Some(&p),
            materials: None,
        };
        let mut rng = SeededRng::new(1);
        let result = roll_for_kill(pools, &even_weights(), RollCounts::clamped(6, 0), &mut rng);
        assert_eq!(result.len(), 6);
    }

    #[test]
    fn result_helpers() {
        let mut r = RollResult::new();
        assert!(!r.has_at_least(Rarity::Common));
        r.push(DropEntry::new("x", Rarity::Magic));
        r.extend(RollResult::from(vec![DropEntry::new("y", Rarity::Epic)]));
        assert!(r.has_at_least(Rarity::Rare));
        assert!(!r.has_at_least(Rarity::Legendary));
        assert_eq!(r.len(), 2);
        assert_eq!(r.drops()[1].item.as_str(), "y");
    }
}
