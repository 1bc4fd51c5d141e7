//! Offline drop-rate simulation for loot tables and item sets.
//!
//! Rolls a table or set many times with a seeded source and summarizes the
//! results (rarity distribution, most frequent items, guarantee and pity
//! activity) so tuning changes can be checked before they ship.

/// Configuration types for simulation runs.
pub mod config;
/// Report types produced by simulation runs.
pub mod report;
/// Simulation entry points.
pub mod simulate;

/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-exports of the report types.
pub use report::{DropReport, GuaranteeCounts, ItemCount, RarityCount, SetReport};
/// Re-exports of [`simulate::simulate_table`] and [`simulate::simulate_set`].
pub use simulate::{simulate_set, simulate_table};
