use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use loot_core::rng::SET_PIECE_SALT;
use loot_core::{
    EnemyTier, GuaranteeOutcome, LiveRng, LootRng, PityLedger, SeededRng, TracingDiagnostics,
    try_roll_set_pieces,
};

pub fn run(
    config_path: Option<&Path>,
    table_name: &str,
    tier: EnemyTier,
    kills: u32,
    seed: Option<u64>,
    threat: Option<f64>,
    with_sets: bool,
) -> Result<(), String> {
    let config = super::load_config(config_path)?;
    let table = super::load_table(&config, table_name)?;
    let sets = if with_sets {
        config
            .set_ids()
            .map(|id| config.set(id))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.to_string())?
    } else {
        Vec::new()
    };

    // Set pieces use their own stream so they don't shift the main rolls.
    let (mut rng, mut set_rng): (Box<dyn LootRng>, Box<dyn LootRng>) = match seed {
        Some(seed) => (
            Box::new(SeededRng::new(seed)),
            Box::new(SeededRng::derived(seed, SET_PIECE_SALT)),
        ),
        None => (Box::new(LiveRng::new()), Box::new(LiveRng::new())),
    };
    let mut ledger = PityLedger::new();
    let mut diagnostics = TracingDiagnostics;

    let seed_label = seed.map_or_else(|| "random".to_string(), |s| s.to_string());
    let threat_label = threat.map(|t| format!(", threat={t}")).unwrap_or_default();
    let plural = if kills == 1 { "" } else { "s" };
    println!(
        "  {} '{}' {}",
        "Loot".bold(),
        table.name,
        format!("({kills} {tier} kill{plural}, seed={seed_label}{threat_label})").dimmed()
    );
    println!();

    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["Kill", "Item", "Rarity", "Source"]);

    let mut total = 0usize;
    let mut granted = 0u32;
    let mut unsatisfied = 0u32;
    let mut forced = 0u32;
    let mut bonus = 0u32;

    for kill in 1..=kills {
        let roll = match threat {
            Some(threat) => {
                table.roll_kill_at_threat(tier, threat, rng.as_mut(), &mut diagnostics)
            }
            None => table.roll_kill_detailed(tier, rng.as_mut(), &mut diagnostics),
        };
        bonus += roll.bonus_rolls;
        for drop in roll.drops.drops() {
            out.add_row(vec![
                kill.to_string(),
                drop.item.to_string(),
                super::rarity_label(drop.rarity).to_string(),
                "loot".to_string(),
            ]);
        }
        total += roll.drops.len();
        match roll.guarantee {
            Some(GuaranteeOutcome::Granted { appended }) => granted += appended,
            Some(GuaranteeOutcome::NoEligibleItems) => unsatisfied += 1,
            _ => {}
        }

        for set in &sets {
            let set_roll = try_roll_set_pieces(set, tier, &mut ledger, set_rng.as_mut());
            let source = if set_roll.forced_by_pity {
                format!("set {} (pity)", set.set_id)
            } else {
                format!("set {}", set.set_id)
            };
            for drop in set_roll.drops.drops() {
                out.add_row(vec![
                    kill.to_string(),
                    drop.item.to_string(),
                    super::rarity_label(drop.rarity).to_string(),
                    source.clone(),
                ]);
            }
            total += set_roll.drops.len();
            if set_roll.forced_by_pity {
                forced += 1;
            }
        }
    }

    if total == 0 {
        println!("  {}", "(nothing dropped)".dimmed());
    } else {
        println!("{out}");
    }
    println!();
    println!("  {total} item{} dropped", if total == 1 { "" } else { "s" });
    if bonus > 0 {
        println!(
            "  {} threat bonus rolled {bonus} time{}",
            "+".green().bold(),
            if bonus == 1 { "" } else { "s" }
        );
    }
    if granted > 0 {
        println!(
            "  {} guarantee added {granted} item{}",
            "+".green().bold(),
            if granted == 1 { "" } else { "s" }
        );
    }
    if unsatisfied > 0 {
        println!(
            "  {} guarantee could not be met on {unsatisfied} kill{} (no eligible items)",
            "WARN".yellow().bold(),
            if unsatisfied == 1 { "" } else { "s" }
        );
    }
    if forced > 0 {
        println!(
            "  {} pity forced {forced} set piece{}",
            "+".green().bold(),
            if forced == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
