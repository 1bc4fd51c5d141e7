pub mod check;
pub mod init;
pub mod roll;
pub mod sets;
pub mod simulate;

use std::path::Path;

use colored::{ColoredString, Colorize};
use loot_core::{LootConfig, LootError, LootTable, Rarity};

/// Load a config file, or the built-in zone-1 preset when no path is given.
fn load_config(path: Option<&Path>) -> Result<LootConfig, String> {
    match path {
        Some(path) => LootConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(loot_core::preset::zone1()),
    }
}

/// Resolve a table, listing the configured names when it is unknown.
fn load_table(config: &LootConfig, name: &str) -> Result<LootTable, String> {
    config.table(name).map_err(|e| match e {
        LootError::UnknownTable(_) => {
            let known: Vec<&str> = config.table_names().collect();
            if known.is_empty() {
                format!("{e} (config defines no tables)")
            } else {
                format!("{e} (available: {})", known.join(", "))
            }
        }
        other => other.to_string(),
    })
}

/// Human-readable source label for headers.
fn source_label(path: Option<&Path>) -> String {
    path.map_or_else(|| "built-in zone1".to_string(), |p| p.display().to_string())
}

/// Rarity name colored by tier.
fn rarity_label(rarity: Rarity) -> ColoredString {
    let name = rarity.to_string();
    match rarity {
        Rarity::Common => name.normal(),
        Rarity::Uncommon => name.green(),
        Rarity::Magic => name.blue(),
        Rarity::Rare => name.yellow(),
        Rarity::Epic => name.magenta(),
        Rarity::Legendary => name.red().bold(),
        Rarity::Set => name.bright_green().bold(),
        Rarity::Radiant => name.bright_cyan().bold(),
    }
}
