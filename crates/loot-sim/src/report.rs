use std::collections::BTreeMap;

use serde::Serialize;

use loot_core::{DropEntry, EnemyTier, GuaranteeOutcome, ItemId, Rarity};

/// Drops of one rarity across a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RarityCount {
    /// The rarity.
    pub rarity: Rarity,
    /// Items of this rarity that dropped.
    pub count: u64,
    /// Share of all dropped items, in percent.
    pub percent: f64,
}

/// Drops of one item across a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemCount {
    /// The item.
    pub item: ItemId,
    /// The item's rarity.
    pub rarity: Rarity,
    /// Times it dropped.
    pub count: u64,
}

/// How often each guarantee outcome occurred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GuaranteeCounts {
    /// Kills that met the minimum on their own.
    pub already_satisfied: u64,
    /// Kills where the guarantee had to add items.
    pub granted: u64,
    /// Items added by the guarantee in total.
    pub appended: u64,
    /// Kills where the source pool had nothing eligible.
    pub no_eligible_items: u64,
}

impl GuaranteeCounts {
    pub(crate) fn record(&mut self, outcome: GuaranteeOutcome) {
        match outcome {
            GuaranteeOutcome::Disabled => {}
            GuaranteeOutcome::AlreadySatisfied => self.already_satisfied += 1,
            GuaranteeOutcome::Granted { appended } => {
                self.granted += 1;
                self.appended += u64::from(appended);
            }
            GuaranteeOutcome::NoEligibleItems => self.no_eligible_items += 1,
        }
    }
}

/// Result of simulating many kills against one loot table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropReport {
    /// Table name.
    pub table: String,
    /// Tier of every simulated kill.
    pub tier: EnemyTier,
    /// Seed used.
    pub seed: u64,
    /// Kills simulated.
    pub kills: u64,
    /// Items dropped in total.
    pub total_items: u64,
    /// Kills that dropped nothing.
    pub empty_kills: u64,
    /// Per-rarity counts in rarity order, including zero rows.
    pub rarities: Vec<RarityCount>,
    /// Most frequent items, most common first.
    pub top_items: Vec<ItemCount>,
    /// Misconfiguration diagnostics raised during the run.
    pub diagnostics: u64,
    /// Guarantee outcomes (boss kills only).
    pub guarantee: GuaranteeCounts,
    /// Threat level the kills were rolled at, if any.
    pub threat: Option<f64>,
    /// Threat bonus rolls that passed their gate.
    pub bonus_rolls: u64,
}

impl DropReport {
    /// Average items per kill.
    pub fn items_per_kill(&self) -> f64 {
        if self.kills == 0 {
            0.0
        } else {
            self.total_items as f64 / self.kills as f64
        }
    }

    /// Count for one rarity.
    pub fn count(&self, rarity: Rarity) -> u64 {
        self.rarities
            .iter()
            .find(|r| r.rarity == rarity)
            .map_or(0, |r| r.count)
    }
}

/// Result of simulating many kills against one item set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetReport {
    /// Set id.
    pub set_id: String,
    /// Tier of every simulated kill.
    pub tier: EnemyTier,
    /// Seed the set stream was derived from.
    pub seed: u64,
    /// Kills simulated.
    pub kills: u64,
    /// Kills that dropped at least one piece.
    pub hits: u64,
    /// Hits forced by pity.
    pub forced_hits: u64,
    /// Pieces dropped in total.
    pub pieces: u64,
    /// Per-piece counts in set order.
    pub per_piece: Vec<ItemCount>,
    /// Longest run of consecutive kills without a drop.
    pub longest_drought: u64,
}

impl SetReport {
    /// Share of kills that dropped a piece, in percent.
    pub fn hit_rate_percent(&self) -> f64 {
        if self.kills == 0 {
            0.0
        } else {
            self.hits as f64 * 100.0 / self.kills as f64
        }
    }
}

/// Running per-item tally.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    items: BTreeMap<ItemId, (Rarity, u64)>,
    rarities: [u64; Rarity::COUNT],
    total: u64,
}

impl Tally {
    pub(crate) fn add(&mut self, drop: &DropEntry) {
        let slot = self
            .items
            .entry(drop.item.clone())
            .or_insert((drop.rarity, 0));
        slot.1 += 1;
        self.rarities[drop.rarity.index()] += 1;
        self.total += 1;
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    pub(crate) fn count_of(&self, item: &ItemId) -> u64 {
        self.items.get(item).map_or(0, |(_, n)| *n)
    }

    pub(crate) fn rarity_counts(&self) -> Vec<RarityCount> {
        Rarity::ALL
            .iter()
            .map(|rarity| {
                let count = self.rarities[rarity.index()];
                let percent = if self.total == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / self.total as f64
                };
                RarityCount {
                    rarity: *rarity,
                    count,
                    percent,
                }
            })
            .collect()
    }

    /// The `n` most frequent items; ties break by item id.
    pub(crate) fn top(&self, n: usize) -> Vec<ItemCount> {
        let mut all: Vec<ItemCount> = self
            .items
            .iter()
            .map(|(item, (rarity, count))| ItemCount {
                item: item.clone(),
                rarity: *rarity,
                count: *count,
            })
            .collect();
        all.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.item.cmp(&b.item)));
        all.truncate(n);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_orders_top_items() {
        let mut tally = Tally::default();
        for (id, times) in [("b", 2), ("a", 2), ("c", 5)] {
            for _ in 0..times {
                tally.add(&DropEntry::new(id, Rarity::Common));
            }
        }
        let top_items = tally.top(2);
        let top: Vec<&str> = top_items.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(top, vec!["c", "a"]);
        assert_eq!(tally.total(), 9);
        assert!(tally.top(0).is_empty());
    }

    #[test]
    fn rarity_percentages_sum_to_hundred() {
        let mut tally = Tally::default();
        tally.add(&DropEntry::new("x", Rarity::Common));
        tally.add(&DropEntry::new("y", Rarity::Rare));
        tally.add(&DropEntry::new("y", Rarity::Rare));
        tally.add(&DropEntry::new("z", Rarity::Epic));
        let counts = tally.rarity_counts();
        assert_eq!(counts.len(), Rarity::COUNT);
        let sum: f64 = counts.iter().map(|c| c.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(counts[Rarity::Rare.index()].count, 2);
    }

    #[test]
    fn empty_tally_has_zero_percentages() {
        let tally = Tally::default();
        assert!(tally.rarity_counts().iter().all(|c| c.percent == 0.0));
    }

    #[test]
    fn guarantee_counts_record() {
        let mut counts = GuaranteeCounts::default();
        counts.record(GuaranteeOutcome::Granted { appended: 2 });
        counts.record(GuaranteeOutcome::Granted { appended: 1 });
        counts.record(GuaranteeOutcome::AlreadySatisfied);
        counts.record(GuaranteeOutcome::Disabled);
        assert_eq!(counts.granted, 2);
        assert_eq!(counts.appended, 3);
        assert_eq!(counts.already_satisfied, 1);
    }
}
