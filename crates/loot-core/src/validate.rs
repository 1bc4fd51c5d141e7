//! Validation of authored loot configuration.
//!
//! Rolls never fail on bad content, they just produce less loot. These
//! checks surface the problems to content authors up front instead.

use crate::config::{LootConfig, SetSpec, TableSpec};
use crate::pool::ItemId;
use crate::set_piece::SetTierRow;
use crate::rarity::Rarity;
use crate::table::PoolKind;
use crate::threat::ThreatScaling;
use crate::tier::EnemyTier;

/// A warning or error found during config validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// What the issue is about, e.g. `table 'zone1'`.
    pub subject: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}

/// Validate every table and set in a config.
///
/// Errors are problems that make a table or set fail to resolve or a
/// guarantee impossible to satisfy. Warnings are content that silently
/// produces nothing.
pub fn validate_config(config: &LootConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if config.tables.is_empty() && config.sets.is_empty() {
        issues.push(ValidationIssue::warning(
            "config",
            "no loot tables or sets defined",
        ));
    }

    for (name, def) in &config.tables {
        validate_table(config, name, def, &mut issues);
    }
    for (id, def) in &config.sets {
        validate_set(config, id, def, &mut issues);
    }

    issues
}

fn validate_table(
    config: &LootConfig,
    name: &str,
    def: &TableSpec,
    issues: &mut Vec<ValidationIssue>,
) {
    let subject = format!("table '{name}'");

    for kind in [PoolKind::General, PoolKind::Materials, PoolKind::Uniques] {
        check_items(config, &subject, &format!("{kind} pool"), def.pools.ids(kind), issues);
    }
    if def.pools.general.is_empty() {
        issues.push(ValidationIssue::warning(&subject, "general pool is empty"));
    }

    if def.tiers.get(EnemyTier::Normal).is_none() {
        issues.push(ValidationIssue::warning(
            &subject,
            "no normal row; tiers without their own row will drop nothing",
        ));
    }

    for (tier, row) in def.tiers.iter() {
        if row.general_rolls < 0 || row.materials_rolls < 0 {
            issues.push(ValidationIssue::warning(
                &subject,
                format!("{tier} row has negative roll counts (treated as zero)"),
            ));
        }
        if (row.general_rolls > 0 || row.materials_rolls > 0) && row.weights.total() <= 0.0 {
            issues.push(ValidationIssue::warning(
                &subject,
                format!("{tier} row has rolls but no positive rarity weight"),
            ));
        }
    }

    check_threat(&subject, &def.threat, issues);

    let boss = &def.boss;
    if !boss.enabled {
        return;
    }
    if boss.general_rolls < 0 || boss.materials_rolls < 0 || boss.unique_rolls < 0 {
        issues.push(ValidationIssue::warning(
            &subject,
            "boss overrides have negative roll counts (treated as zero)",
        ));
    }
    if (boss.general_rolls > 0 || boss.materials_rolls > 0) && boss.weights.total() <= 0.0 {
        issues.push(ValidationIssue::warning(
            &subject,
            "boss overrides have rolls but no positive rarity weight",
        ));
    }

    let rule = &boss.guarantee;
    if rule.enabled {
        let minimum = rule.minimum_rarity;
        let eligible = def
            .pools
            .ids(rule.source)
            .iter()
            .filter_map(|id| config.items.get(id))
            .any(|rarity| rarity.is_at_least(minimum));
        if !eligible {
            issues.push(ValidationIssue::error(
                &subject,
                format!(
                    "boss guarantee needs {minimum} or better but the {} pool has no such item",
                    rule.source
                ),
            ));
        }
        if rule.max_attempts == 0 {
            issues.push(ValidationIssue::warning(
                &subject,
                "boss guarantee max_attempts is 0 (treated as 1)",
            ));
        }
    }
}

fn validate_set(config: &LootConfig, id: &str, def: &SetSpec, issues: &mut Vec<ValidationIssue>) {
    let subject = format!("set '{id}'");

    if def.pieces.is_empty() {
        issues.push(ValidationIssue::warning(&subject, "no pieces; the set never drops"));
    }
    check_items(config, &subject, "pieces", &def.pieces, issues);

    for (label, row) in [("trash", &def.trash), ("elite", &def.elite), ("boss", &def.boss)] {
        check_chance(&subject, label, row, issues);
    }

    if def.pity.enabled && def.pity.threshold_kills == 0 {
        issues.push(ValidationIssue::warning(
            &subject,
            "pity threshold is 0 (treated as 1)",
        ));
    }
}

fn check_threat(subject: &str, threat: &ThreatScaling, issues: &mut Vec<ValidationIssue>) {
    for (i, band) in threat.bands.iter().enumerate() {
        let label = format!("threat band {i}");
        if !band.min_threat.is_finite() || band.min_threat < 0.0 {
            issues.push(ValidationIssue::warning(
                subject,
                format!("{label} has invalid min_threat {}", band.min_threat),
            ));
        }
        for rarity in Rarity::ALL {
            let factor = band.multipliers.get(rarity);
            if !factor.is_finite() || factor < 0.0 {
                issues.push(ValidationIssue::warning(
                    subject,
                    format!("{label} {rarity} multiplier {factor} is invalid (weight becomes 0)"),
                ));
            }
        }
        if band.bonus_rolls < 0 {
            issues.push(ValidationIssue::warning(
                subject,
                format!("{label} has negative bonus_rolls (treated as zero)"),
            ));
        }
        if !(0.0..=1.0).contains(&band.bonus_roll_chance) {
            issues.push(ValidationIssue::warning(
                subject,
                format!(
                    "{label} bonus_roll_chance {} is outside 0..=1 (clamped)",
                    band.bonus_roll_chance
                ),
            ));
        }
    }

    let sorted = threat
        .bands
        .windows(2)
        .all(|pair| pair[0].min_threat < pair[1].min_threat);
    if !sorted {
        issues.push(ValidationIssue::warning(
            subject,
            "threat bands are not in strictly ascending min_threat order",
        ));
    }
}

fn check_items(
    config: &LootConfig,
    subject: &str,
    context: &str,
    ids: &[ItemId],
    issues: &mut Vec<ValidationIssue>,
) {
    for id in ids {
        if !config.items.contains_key(id) {
            issues.push(ValidationIssue::error(
                subject,
                format!("{context} references unknown item '{id}'"),
            ));
        }
    }
}

fn check_chance(subject: &str, label: &str, row: &SetTierRow, issues: &mut Vec<ValidationIssue>) {
    let chance = row.chance_percent;
    if !(0.0..=100.0).contains(&chance) {
        issues.push(ValidationIssue::warning(
            subject,
            format!("{label} chance {chance}% is outside 0..=100 (clamped)"),
        ));
    }
    if row.pieces_to_roll == 0 {
        issues.push(ValidationIssue::warning(
            subject,
            format!("{label} pieces_to_roll is 0 (treated as 1)"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::TierRow;
    use crate::rarity::{RarityMultipliers, RarityWeights};
    use crate::set_piece::SetTierRow;
    use crate::threat::ThreatBand;
    use crate::tier::TierTable;

    fn base() -> LootConfig {
        let mut config = LootConfig::default();
        config.items.insert(ItemId::from("rag"), Rarity::Common);
        config.items.insert(ItemId::from("blade"), Rarity::Rare);
        let mut table = TableSpec::default();
        table.pools.general = vec![ItemId::from("rag"), ItemId::from("blade")];
        table.tiers = TierTable::new().with(
            EnemyTier::Normal,
            TierRow::new(RarityWeights::none().with(Rarity::Common, 1.0), 1, 0),
        );
        config.tables.insert("crypt".to_string(), table);
        config
    }

    #[test]
    fn clean_config_has_no_issues() {
        assert!(validate_config(&base()).is_empty());
    }

    #[test]
    fn empty_config_warns() {
        let issues = validate_config(&LootConfig::default());
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error);
    }

    #[test]
    fn unknown_item_is_error() {
        let mut config = base();
        config.tables.get_mut("crypt").unwrap().pools.materials.push(ItemId::from("ghost"));
        let issues = validate_config(&config);
        assert!(issues.iter().any(|i| i.is_error && i.message.contains("ghost")));
    }

    #[test]
    fn unsatisfiable_guarantee_is_error() {
        let mut config = base();
        config.tables.get_mut("crypt").unwrap().pools.general = vec![ItemId::from("rag")];
        let issues = validate_config(&config);
        assert!(issues.iter().any(|i| i.is_error && i.message.contains("boss guarantee")));
    }

    #[test]
    fn missing_normal_row_and_zero_weights_warn() {
        let mut config = base();
        let table = config.tables.get_mut("crypt").unwrap();
        table.tiers =
            TierTable::new().with(EnemyTier::Elite, TierRow::new(RarityWeights::none(), 2, -1));
        let issues = validate_config(&config);
        assert!(issues.iter().any(|i| i.message.contains("no normal row")));
        assert!(issues.iter().any(|i| i.message.contains("negative roll counts")));
        assert!(issues.iter().any(|i| i.message.contains("no positive rarity weight")));
        assert!(issues.iter().all(|i| !i.is_error));
    }

    #[test]
    fn set_problems_warn() {
        let mut config = base();
        config.sets.insert(
            "empty".to_string(),
            SetSpec {
                boss: SetTierRow::new(140.0, 0),
                ..SetSpec::default()
            },
        );
        let issues = validate_config(&config);
        let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
        assert!(messages.iter().any(|m| m.contains("no pieces")));
        assert!(messages.iter().any(|m| m.contains("outside 0..=100")));
        assert!(messages.iter().any(|m| m.contains("boss pieces_to_roll")));
    }

    #[test]
    fn threat_band_problems_warn() {
        let mut config = base();
        config.tables.get_mut("crypt").unwrap().threat = ThreatScaling::new()
            .with_band(ThreatBand::new(50.0).with_bonus(-1, 0.5))
            .with_band(
                ThreatBand::new(-5.0)
                    .with_bonus(1, 1.5)
                    .with_multipliers(RarityMultipliers::default().with(Rarity::Epic, -2.0)),
            );
        let issues = validate_config(&config);
        let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
        assert!(messages.iter().any(|m| m.contains("invalid min_threat -5")));
        assert!(messages.iter().any(|m| m.contains("Epic multiplier -2")));
        assert!(messages.iter().any(|m| m.contains("negative bonus_rolls")));
        assert!(messages.iter().any(|m| m.contains("outside 0..=1")));
        assert!(messages.iter().any(|m| m.contains("ascending min_threat")));
        assert!(issues.iter().all(|i| !i.is_error));
    }

    #[test]
    fn sorted_threat_bands_are_clean() {
        let mut config = base();
        config.tables.get_mut("crypt").unwrap().threat = ThreatScaling::new()
            .with_band(ThreatBand::new(0.0))
            .with_band(ThreatBand::new(25.0).with_bonus(1, 0.25));
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn display_format() {
        let issue = ValidationIssue::error("table 'x'", "broken");
        assert_eq!(issue.to_string(), "error: table 'x': broken");
    }
}
