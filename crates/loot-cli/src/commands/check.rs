use std::path::Path;

use colored::Colorize;
use loot_core::validate_config;

pub fn run(config_path: Option<&Path>) -> Result<(), String> {
    let config = super::load_config(config_path)?;
    let issues = validate_config(&config);

    for issue in &issues {
        if issue.is_error {
            eprintln!("  {} {}: {}", "error".red().bold(), issue.subject, issue.message);
        } else {
            eprintln!("  {} {}: {}", "warning".yellow().bold(), issue.subject, issue.message);
        }
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        return Err(format!(
            "{errors} error{}, {warnings} warning{}",
            if errors == 1 { "" } else { "s" },
            if warnings == 1 { "" } else { "s" },
        ));
    }

    println!("  All checks passed for {}.", super::source_label(config_path));
    println!(
        "  {} tables, {} sets, {} items, {} warning{}",
        config.tables.len(),
        config.sets.len(),
        config.items.len(),
        warnings,
        if warnings == 1 { "" } else { "s" },
    );

    Ok(())
}
