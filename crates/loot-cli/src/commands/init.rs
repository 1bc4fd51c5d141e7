use std::path::Path;

use loot_core::preset;

pub fn run(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let config = preset::zone1();
    config.save(path).map_err(|e| e.to_string())?;

    println!("Created loot config {}", path.display());
    println!(
        "  {} tables, {} sets, {} items",
        config.tables.len(),
        config.sets.len(),
        config.items.len()
    );
    println!();
    println!("Get started:");
    println!("  loot check -c {}", path.display());
    println!("  loot roll -c {} --tier boss --seed 1", path.display());
    println!("  loot simulate -c {} --tier elite", path.display());

    Ok(())
}
