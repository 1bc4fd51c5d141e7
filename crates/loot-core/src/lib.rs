//! Tiered loot-roll engine.
//!
//! Provides weighted rarity selection, rarity-partitioned drop pools,
//! per-tier roll planning, a bounded guaranteed-minimum-rarity rule for
//! boss kills, threat bands that rescale weights and add bonus rolls, and an
//! independent set-piece roller with a boss pity timer.
//! Randomness and pity state are always passed in by the caller, so the
//! same seed and configuration reproduce the same drops.

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod guarantee;
pub mod planner;
pub mod pool;
pub mod preset;
pub mod rarity;
pub mod rng;
pub mod sampler;
pub mod selector;
pub mod set_piece;
pub mod table;
pub mod threat;
pub mod tier;
pub mod validate;

pub use config::{LootConfig, PoolIds, SetSpec, TableSpec};
pub use diagnostics::{CollectedDiagnostics, Diagnostic, Diagnostics, TracingDiagnostics};
pub use engine::{KillPools, RollResult, roll_for_kill};
pub use error::{LootError, LootResult};
pub use guarantee::{GuaranteeOutcome, GuaranteedRule};
pub use planner::{RollCounts, RollPlanner, TierRow};
pub use pool::{DropEntry, DropPool, ItemCatalog, ItemId};
pub use rarity::{Rarity, RarityMultipliers, RarityWeights};
pub use rng::{LiveRng, LootRng, SeededRng};
pub use sampler::{sample, sample_any};
pub use selector::select_rarity;
pub use set_piece::{
    PityConfig, PityLedger, PityState, PityStore, SetPieceConfig, SetPieceRoll, SetPieceTier,
    SetTierRow, try_roll_set_pieces,
};
pub use table::{BossOverrides, KillRoll, LootTable, PoolKind};
pub use threat::{ThreatBand, ThreatScaling};
pub use tier::{EnemyTier, TierTable};
pub use validate::{ValidationIssue, validate_config};
