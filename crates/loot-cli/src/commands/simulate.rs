use std::path::Path;

use colored::Colorize;
use comfy_table::{CellAlignment, ContentArrangement, Table};

use loot_core::EnemyTier;
use loot_sim::{SimConfig, simulate_table};

pub fn run(
    config_path: Option<&Path>,
    table_name: &str,
    tier: EnemyTier,
    sim: &SimConfig,
    json: bool,
) -> Result<(), String> {
    let config = super::load_config(config_path)?;
    let table = super::load_table(&config, table_name)?;
    let report = simulate_table(&table, tier, sim);

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("cannot serialize report: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    let threat_label = report.threat.map(|t| format!(", threat={t}")).unwrap_or_default();
    println!(
        "  {} '{}' {}",
        "Simulation".bold(),
        report.table,
        format!("({} {tier} kills, seed={}{threat_label})", report.kills, report.seed).dimmed()
    );
    println!(
        "  {} items dropped, {:.3} per kill, {} empty kills",
        report.total_items,
        report.items_per_kill(),
        report.empty_kills
    );
    if report.threat.is_some() {
        println!("  {} threat bonus rolls", report.bonus_rolls);
    }
    println!();

    println!("  {}", "Rarity Distribution".bold().underline());
    println!();
    let mut rarities = Table::new();
    rarities.set_content_arrangement(ContentArrangement::Dynamic);
    rarities.set_header(vec!["Rarity", "Count", "Share"]);
    for row in &report.rarities {
        rarities.add_row(vec![
            super::rarity_label(row.rarity).to_string(),
            row.count.to_string(),
            format!("{:.3}%", row.percent),
        ]);
    }
    for i in 1..3 {
        if let Some(column) = rarities.column_mut(i) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{rarities}");
    println!();

    if !report.top_items.is_empty() {
        let heading = format!("Top {} Items", report.top_items.len());
        println!("  {}", heading.bold().underline());
        println!();
        let mut items = Table::new();
        items.set_content_arrangement(ContentArrangement::Dynamic);
        items.set_header(vec!["Item", "Rarity", "Count"]);
        for item in &report.top_items {
            items.add_row(vec![
                item.item.to_string(),
                super::rarity_label(item.rarity).to_string(),
                item.count.to_string(),
            ]);
        }
        println!("{items}");
        println!();
    }

    let g = report.guarantee;
    if tier.is_boss() && g.already_satisfied + g.granted + g.no_eligible_items > 0 {
        println!("  {}", "Boss Guarantee".bold().underline());
        println!("  met by the roll:  {}", g.already_satisfied);
        println!("  granted:          {} ({} items added)", g.granted, g.appended);
        if g.no_eligible_items > 0 {
            println!(
                "  {} {} kills had no eligible items",
                "WARN".yellow().bold(),
                g.no_eligible_items
            );
        }
        println!();
    }

    if report.diagnostics > 0 {
        println!(
            "  {} {} misconfiguration diagnostic{} (run `loot check`)",
            "WARN".yellow().bold(),
            report.diagnostics,
            if report.diagnostics == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
