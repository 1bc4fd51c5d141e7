use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use loot_core::{EnemyTier, SetPieceTier};
use loot_sim::{SimConfig, simulate_set};

pub fn run(
    config_path: Option<&Path>,
    set_id: &str,
    tier: EnemyTier,
    iterations: u64,
    seed: u64,
    json: bool,
) -> Result<(), String> {
    let config = super::load_config(config_path)?;
    let set = config.set(set_id).map_err(|e| e.to_string())?;

    let sim = SimConfig::default()
        .with_seed(seed)
        .with_iterations(iterations);
    let report = simulate_set(&set, tier, &sim);

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("cannot serialize report: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    let set_tier = SetPieceTier::from(tier);
    println!(
        "  {} '{}' {}",
        "Set drops".bold(),
        report.set_id,
        format!("({} {tier} kills, seed={seed})", report.kills).dimmed()
    );
    println!(
        "  chance {:.2}% per kill, {} piece{} per hit",
        set.chance(set_tier) * 100.0,
        set.pieces_to_roll(set_tier),
        if set.pieces_to_roll(set_tier) == 1 { "" } else { "s" }
    );
    if set_tier == SetPieceTier::Boss && set.pity.enabled {
        println!("  pity after {} boss kills", set.pity.threshold());
    }
    println!();

    println!(
        "  {} hits ({:.3}%), {} forced by pity, {} pieces",
        report.hits,
        report.hit_rate_percent(),
        report.forced_hits,
        report.pieces
    );
    println!("  longest drought: {} kills", report.longest_drought);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Piece", "Rarity", "Count"]);
    for piece in &report.per_piece {
        table.add_row(vec![
            piece.item.to_string(),
            super::rarity_label(piece.rarity).to_string(),
            piece.count.to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}
