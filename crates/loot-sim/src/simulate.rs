use loot_core::rng::SET_PIECE_SALT;
use loot_core::{
    Diagnostic, EnemyTier, LootTable, PityLedger, SeededRng, SetPieceConfig, try_roll_set_pieces,
};

use crate::config::SimConfig;
use crate::report::{DropReport, GuaranteeCounts, ItemCount, SetReport, Tally};

/// Roll `config.iterations` kills of one tier against a table.
pub fn simulate_table(table: &LootTable, tier: EnemyTier, config: &SimConfig) -> DropReport {
    let mut rng = SeededRng::new(config.seed);
    let mut diagnostics = 0u64;
    let mut count_diagnostic = |_: &Diagnostic| diagnostics += 1;

    let mut tally = Tally::default();
    let mut guarantee = GuaranteeCounts::default();
    let mut empty_kills = 0;
    let mut bonus_rolls = 0u64;

    for _ in 0..config.iterations {
        let roll = match config.threat {
            Some(threat) => {
                table.roll_kill_at_threat(tier, threat, &mut rng, &mut count_diagnostic)
            }
            None => table.roll_kill_detailed(tier, &mut rng, &mut count_diagnostic),
        };
        bonus_rolls += u64::from(roll.bonus_rolls);
        if roll.drops.is_empty() {
            empty_kills += 1;
        }
        for drop in roll.drops.drops() {
            tally.add(drop);
        }
        if let Some(outcome) = roll.guarantee {
            guarantee.record(outcome);
        }
    }

    tracing::debug!(
        table = %table.name,
        %tier,
        kills = config.iterations,
        threat = ?config.threat,
        items = tally.total(),
        "table simulation finished"
    );

    DropReport {
        table: table.name.clone(),
        tier,
        seed: config.seed,
        kills: config.iterations,
        total_items: tally.total(),
        empty_kills,
        rarities: tally.rarity_counts(),
        top_items: tally.top(config.top_items),
        diagnostics,
        guarantee,
        threat: config.threat,
        bonus_rolls,
    }
}

/// Roll `config.iterations` set-piece checks of one tier with a fresh pity
/// ledger.
///
/// The set stream is seeded from `derive_seed(config.seed, SET_PIECE_SALT)`
/// so it never mirrors a table simulation run with the same seed.
pub fn simulate_set(set: &SetPieceConfig, tier: EnemyTier, config: &SimConfig) -> SetReport {
    let mut rng = SeededRng::derived(config.seed, SET_PIECE_SALT);
    let mut ledger = PityLedger::new();
    let mut tally = Tally::default();

    let mut hits = 0;
    let mut forced_hits = 0;
    let mut drought = 0u64;
    let mut longest_drought = 0u64;

    for _ in 0..config.iterations {
        let roll = try_roll_set_pieces(set, tier, &mut ledger, &mut rng);
        if roll.hit {
            hits += 1;
            if roll.forced_by_pity {
                forced_hits += 1;
            }
            drought = 0;
        } else {
            drought += 1;
            longest_drought = longest_drought.max(drought);
        }
        for drop in roll.drops.drops() {
            tally.add(drop);
        }
    }

    let per_piece = set
        .pieces
        .entries()
        .iter()
        .map(|entry| ItemCount {
            item: entry.item.clone(),
            rarity: entry.rarity,
            count: tally.count_of(&entry.item),
        })
        .collect();

    SetReport {
        set_id: set.set_id.clone(),
        tier,
        seed: config.seed,
        kills: config.iterations,
        hits,
        forced_hits,
        pieces: tally.total(),
        per_piece,
        longest_drought,
    }
}
