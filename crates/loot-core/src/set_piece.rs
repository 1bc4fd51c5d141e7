//! Set-piece drops with a boss pity timer.
//!
//! Runs independently of the main loot roll. Every kill gets one chance
//! check against the set's small piece pool. Boss kills also advance a pity
//! counter per set that forces a single piece once the threshold is reached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::RollResult;
use crate::pool::DropPool;
use crate::rng::LootRng;
use crate::sampler::sample_any;
use crate::tier::EnemyTier;

/// The set-piece engine's own tier rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetPieceTier {
    /// Trash and normal kills.
    Trash,
    /// Elite and mini-boss kills.
    Elite,
    /// Boss kills; the only tier with pity.
    Boss,
}

impl From<EnemyTier> for SetPieceTier {
    fn from(tier: EnemyTier) -> Self {
        match tier {
            EnemyTier::Trash | EnemyTier::Normal => Self::Trash,
            EnemyTier::Elite | EnemyTier::MiniBoss => Self::Elite,
            EnemyTier::Boss => Self::Boss,
        }
    }
}

/// Chance and piece count for one set-piece tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetTierRow {
    /// Drop chance in percent (0 to 100).
    pub chance_percent: f64,
    /// Pieces drawn on a natural hit. Values below 1 behave as 1.
    pub pieces_to_roll: u32,
}

impl Default for SetTierRow {
    fn default() -> Self {
        Self {
            chance_percent: 0.0,
            pieces_to_roll: 1,
        }
    }
}

impl SetTierRow {
    /// Create a row.
    pub fn new(chance_percent: f64, pieces_to_roll: u32) -> Self {
        Self {
            chance_percent,
            pieces_to_roll,
        }
    }
}

/// Boss pity settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PityConfig {
    /// Whether boss kills track pity at all.
    pub enabled: bool,
    /// Boss kills without a drop before one is forced. Values below 1
    /// behave as 1.
    pub threshold_kills: u32,
    /// Force a single piece once the threshold is reached.
    pub guarantee_one_piece: bool,
}

impl Default for PityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_kills: 10,
            guarantee_one_piece: true,
        }
    }
}

impl PityConfig {
    /// Pity turned off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// The effective threshold (at least 1).
    pub fn threshold(&self) -> u32 {
        self.threshold_kills.max(1)
    }
}

/// Tuning for one item set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPieceConfig {
    /// Set identifier; also the pity key.
    pub set_id: String,
    /// The set's pieces.
    pub pieces: DropPool,
    /// Row for trash and normal kills.
    pub trash: SetTierRow,
    /// Row for elite and mini-boss kills.
    pub elite: SetTierRow,
    /// Row for boss kills.
    pub boss: SetTierRow,
    /// Boss pity.
    pub pity: PityConfig,
}

impl SetPieceConfig {
    /// A set with the given pieces, zero chances and default pity.
    pub fn new(set_id: impl Into<String>, pieces: DropPool) -> Self {
        Self {
            set_id: set_id.into(),
            pieces,
            trash: SetTierRow::default(),
            elite: SetTierRow::default(),
            boss: SetTierRow::default(),
            pity: PityConfig::default(),
        }
    }

    /// Set the row for a tier.
    pub fn with_row(mut self, tier: SetPieceTier, row: SetTierRow) -> Self {
        *self.row_mut(tier) = row;
        self
    }

    /// Set the pity config.
    pub fn with_pity(mut self, pity: PityConfig) -> Self {
        self.pity = pity;
        self
    }

    /// The configured row for a tier.
    pub fn row(&self, tier: SetPieceTier) -> &SetTierRow {
        match tier {
            SetPieceTier::Trash => &self.trash,
            SetPieceTier::Elite => &self.elite,
            SetPieceTier::Boss => &self.boss,
        }
    }

    fn row_mut(&mut self, tier: SetPieceTier) -> &mut SetTierRow {
        match tier {
            SetPieceTier::Trash => &mut self.trash,
            SetPieceTier::Elite => &mut self.elite,
            SetPieceTier::Boss => &mut self.boss,
        }
    }

    /// Hit probability in [0, 1] for a tier.
    pub fn chance(&self, tier: SetPieceTier) -> f64 {
        let p = self.row(tier).chance_percent / 100.0;
        if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
    }

    /// Pieces drawn on a natural hit (at least 1).
    pub fn pieces_to_roll(&self, tier: SetPieceTier) -> u32 {
        self.row(tier).pieces_to_roll.max(1)
    }
}

/// Pity counter for one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PityState {
    /// Boss kills since the last set-piece drop.
    pub kills_since_last_drop: u32,
}

/// Keyed storage for pity counters, owned by the caller.
pub trait PityStore {
    /// Current state for a set, if it has one yet.
    fn state(&self, set_id: &str) -> Option<PityState>;

    /// Mutable state for a set, created at zero on first access.
    fn state_mut(&mut self, set_id: &str) -> &mut PityState;
}

/// In-memory pity store. Serializable so a host can persist it.
///
/// Set ids are matched case-insensitively; keys are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, PityState>",
    into = "BTreeMap<String, PityState>"
)]
pub struct PityLedger {
    counters: BTreeMap<String, PityState>,
}

fn ledger_key(set_id: &str) -> String {
    set_id.to_lowercase()
}

impl From<BTreeMap<String, PityState>> for PityLedger {
    fn from(raw: BTreeMap<String, PityState>) -> Self {
        let mut counters = BTreeMap::new();
        for (id, state) in raw {
            let entry: &mut PityState = counters.entry(ledger_key(&id)).or_default();
            entry.kills_since_last_drop =
                entry.kills_since_last_drop.max(state.kills_since_last_drop);
        }
        Self { counters }
    }
}

impl From<PityLedger> for BTreeMap<String, PityState> {
    fn from(ledger: PityLedger) -> Self {
        ledger.counters
    }
}

impl PityLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every counter.
    pub fn reset(&mut self) {
        self.counters.clear();
    }

    /// Forget one set's counter.
    pub fn reset_set(&mut self, set_id: &str) {
        self.counters.remove(&ledger_key(set_id));
    }

    /// Number of sets with a counter.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// True if no set has a counter yet.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

impl PityStore for PityLedger {
    fn state(&self, set_id: &str) -> Option<PityState> {
        self.counters.get(&ledger_key(set_id)).copied()
    }

    fn state_mut(&mut self, set_id: &str) -> &mut PityState {
        self.counters.entry(ledger_key(set_id)).or_default()
    }
}

/// Result of one set-piece check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetPieceRoll {
    /// Pieces that dropped.
    pub drops: RollResult,
    /// True on a natural or forced hit.
    pub hit: bool,
    /// True when pity forced the hit.
    pub forced_by_pity: bool,
}

/// Roll the set-piece check for one kill.
///
/// Non-boss tiers never read or touch `pity`. An empty piece list returns
/// immediately without drawing.
pub fn try_roll_set_pieces<R, P>(
    config: &SetPieceConfig,
    tier: EnemyTier,
    pity: &mut P,
    rng: &mut R,
) -> SetPieceRoll
where
    R: LootRng + ?Sized,
    P: PityStore + ?Sized,
{
    if config.pieces.is_empty() {
        return SetPieceRoll::default();
    }

    let set_tier = SetPieceTier::from(tier);
    let mut hit = rng.uniform01() < config.chance(set_tier);
    let mut count = config.pieces_to_roll(set_tier);
    let mut forced_by_pity = false;

    let tracks_pity = set_tier == SetPieceTier::Boss && config.pity.enabled;
    if tracks_pity {
        let state = pity.state_mut(&config.set_id);
        state.kills_since_last_drop = state.kills_since_last_drop.saturating_add(1);
        if !hit
            && config.pity.guarantee_one_piece
            && state.kills_since_last_drop >= config.pity.threshold()
        {
            tracing::debug!(
                set = %config.set_id,
                kills = state.kills_since_last_drop,
                "pity forced a set piece"
            );
            hit = true;
            forced_by_pity = true;
            count = 1;
        }
        if hit {
            state.kills_since_last_drop = 0;
        }
    }

    let mut drops = RollResult::new();
    if hit {
        for _ in 0..count {
            if let Some(entry) = sample_any(&config.pieces, rng) {
                drops.push(entry.clone());
            }
        }
    }
    SetPieceRoll {
        drops,
        hit,
        forced_by_pity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DropEntry;
    use crate::rarity::Rarity;
    use crate::rng::SeededRng;
    use crate::rng::testing::ScriptedRng;

    fn pieces() -> DropPool {
        DropPool::new(
            "initiate",
            vec![
                DropEntry::new("helm", Rarity::Set),
                DropEntry::new("chest", Rarity::Set),
                DropEntry::new("boots", Rarity::Set),
            ],
        )
    }

    fn config() -> SetPieceConfig {
        SetPieceConfig::new("initiate", pieces())
            .with_row(SetPieceTier::Trash, SetTierRow::new(0.5, 1))
            .with_row(SetPieceTier::Elite, SetTierRow::new(2.0, 1))
            .with_row(SetPieceTier::Boss, SetTierRow::new(6.0, 1))
    }

    #[test]
    fn tier_mapping() {
        assert_eq!(SetPieceTier::from(EnemyTier::Trash), SetPieceTier::Trash);
        assert_eq!(SetPieceTier::from(EnemyTier::Normal), SetPieceTier::Trash);
        assert_eq!(SetPieceTier::from(EnemyTier::Elite), SetPieceTier::Elite);
        assert_eq!(SetPieceTier::from(EnemyTier::MiniBoss), SetPieceTier::Elite);
        assert_eq!(SetPieceTier::from(EnemyTier::Boss), SetPieceTier::Boss);
    }

    #[test]
    fn pity_forces_drop_on_threshold_kill() {
        let cfg = config().with_row(SetPieceTier::Boss, SetTierRow::new(0.0, 3));
        let mut ledger = PityLedger::new();
        let mut rng = SeededRng::new(11);
        for kill in 1..=10 {
            let roll = try_roll_set_pieces(&cfg, EnemyTier::Boss, &mut ledger, &mut rng);
            if kill < 10 {
                assert!(!roll.hit, "unexpected drop on kill {kill}");
                assert_eq!(ledger.state("initiate").unwrap().kills_since_last_drop, kill);
            } else {
                assert!(roll.hit && roll.forced_by_pity);
                assert_eq!(roll.drops.len(), 1);
            }
        }
        assert_eq!(ledger.state("initiate").unwrap().kills_since_last_drop, 0);
    }

    #[test]
    fn pity_overrides_a_miss_at_the_threshold() {
        let mut ledger = PityLedger::new();
        ledger.state_mut("initiate").kills_since_last_drop = 9;
        let mut rng = ScriptedRng::constant(0.10, 0);
        let roll = try_roll_set_pieces(&config(), EnemyTier::Boss, &mut ledger, &mut rng);
        assert!(roll.hit);
        assert!(roll.forced_by_pity);
        assert_eq!(roll.drops.len(), 1);
        assert_eq!(ledger.state("initiate").unwrap().kills_since_last_drop, 0);
    }

    #[test]
    fn counter_past_threshold_still_forces() {
        let mut ledger = PityLedger::new();
        ledger.state_mut("initiate").kills_since_last_drop = 10;
        let mut rng = ScriptedRng::constant(0.10, 2);
        let roll = try_roll_set_pieces(&config(), EnemyTier::Boss, &mut ledger, &mut rng);
        assert_eq!(roll.drops.item_ids()[0].as_str(), "boots");
        assert_eq!(ledger.state("initiate").unwrap().kills_since_last_drop, 0);
    }

    #[test]
    fn natural_hit_rolls_full_count_and_resets() {
        let cfg = config().with_row(SetPieceTier::Boss, SetTierRow::new(6.0, 2));
        let mut ledger = PityLedger::new();
        ledger.state_mut("initiate").kills_since_last_drop = 4;
        let mut rng = ScriptedRng::constant(0.01, 0);
        let roll = try_roll_set_pieces(&cfg, EnemyTier::Boss, &mut ledger, &mut rng);
        assert!(roll.hit && !roll.forced_by_pity);
        assert_eq!(roll.drops.len(), 2);
        assert_eq!(ledger.state("initiate").unwrap().kills_since_last_drop, 0);
    }

    #[test]
    fn non_boss_tiers_never_touch_pity() {
        let mut ledger = PityLedger::new();
        let mut rng = ScriptedRng::constant(0.0, 0);
        for tier in [EnemyTier::Trash, EnemyTier::Normal, EnemyTier::Elite, EnemyTier::MiniBoss] {
            let roll = try_roll_set_pieces(&config(), tier, &mut ledger, &mut rng);
            assert!(roll.hit);
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn empty_piece_list_does_nothing() {
        let cfg = SetPieceConfig::new("empty", DropPool::empty("empty"))
            .with_row(SetPieceTier::Boss, SetTierRow::new(100.0, 1));
        let mut ledger = PityLedger::new();
        let mut rng = ScriptedRng::constant(0.0, 0);
        let roll = try_roll_set_pieces(&cfg, EnemyTier::Boss, &mut ledger, &mut rng);
        assert_eq!(roll, SetPieceRoll::default());
        assert_eq!(rng.uniform_draws, 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn disabled_pity_leaves_ledger_alone() {
        let cfg = config()
            .with_row(SetPieceTier::Boss, SetTierRow::new(0.0, 1))
            .with_pity(PityConfig::disabled());
        let mut ledger = PityLedger::new();
        let mut rng = SeededRng::new(1);
        for _ in 0..50 {
            assert!(!try_roll_set_pieces(&cfg, EnemyTier::Boss, &mut ledger, &mut rng).hit);
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn chance_is_clamped() {
        let cfg = config()
            .with_row(SetPieceTier::Trash, SetTierRow::new(f64::NAN, 0))
            .with_row(SetPieceTier::Elite, SetTierRow::new(250.0, 1))
            .with_row(SetPieceTier::Boss, SetTierRow::new(-3.0, 1));
        assert_eq!(cfg.chance(SetPieceTier::Trash), 0.0);
        assert_eq!(cfg.chance(SetPieceTier::Elite), 1.0);
        assert_eq!(cfg.chance(SetPieceTier::Boss), 0.0);
        assert_eq!(cfg.pieces_to_roll(SetPieceTier::Trash), 1);
    }

    #[test]
    fn zero_threshold_behaves_as_one() {
        let cfg = config()
            .with_row(SetPieceTier::Boss, SetTierRow::new(0.0, 1))
            .with_pity(PityConfig {
                threshold_kills: 0,
                ..PityConfig::default()
            });
        let mut ledger = PityLedger::new();
        let mut rng = SeededRng::new(5);
        assert!(try_roll_set_pieces(&cfg, EnemyTier::Boss, &mut ledger, &mut rng).forced_by_pity);
    }

    #[test]
    fn ledger_reset() {
        let mut ledger = PityLedger::new();
        ledger.state_mut("a").kills_since_last_drop = 3;
        ledger.state_mut("b").kills_since_last_drop = 1;
        ledger.reset_set("a");
        assert_eq!(ledger.state("a"), None);
        assert_eq!(ledger.len(), 1);
        ledger.reset();
        assert!(ledger.is_empty());
    }

    #[test]
    fn ledger_ignores_set_id_case() {
        let mut ledger = PityLedger::new();
        ledger.state_mut("Abyssal_Initiate").kills_since_last_drop = 4;
        ledger.state_mut("abyssal_initiate").kills_since_last_drop += 1;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.state("ABYSSAL_INITIATE").unwrap().kills_since_last_drop, 5);
        ledger.reset_set("abyssal_INITIATE");
        assert!(ledger.is_empty());
    }

    #[test]
    fn loaded_ledger_merges_case_variants() {
        let json = r#"{
            "Initiate": { "kills_since_last_drop": 2 },
            "initiate": { "kills_since_last_drop": 7 }
        }"#;
        let ledger: PityLedger = serde_json::from_str(json).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.state("initiate").unwrap().kills_since_last_drop, 7);
    }
}
