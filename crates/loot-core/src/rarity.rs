//! Item rarity and per-tier rarity weight profiles.
//!
//! [`Rarity`] is an ordered ladder. Its declaration order is the single
//! source of truth for "at least this rare" comparisons; new tiers are
//! inserted here and nowhere else.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Item rarity, ordered from least to most desirable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Rarity {
    /// Baseline drops.
    #[default]
    Common,
    /// Slightly better than common.
    Uncommon,
    /// First enchanted tier.
    Magic,
    /// The usual boss guarantee threshold.
    Rare,
    /// High-end gear.
    Epic,
    /// Named chase items.
    Legendary,
    /// Pieces of a named item set.
    Set,
    /// The rarest tier.
    Radiant,
}

impl Rarity {
    /// Number of rarity tiers.
    pub const COUNT: usize = 8;

    /// All rarities in canonical ascending order.
    pub const ALL: [Rarity; Self::COUNT] = [
        Self::Common,
        Self::Uncommon,
        Self::Magic,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
        Self::Set,
        Self::Radiant,
    ];

    /// Position of this rarity in [`Rarity::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Common => 0,
            Self::Uncommon => 1,
            Self::Magic => 2,
            Self::Rare => 3,
            Self::Epic => 4,
            Self::Legendary => 5,
            Self::Set => 6,
            Self::Radiant => 7,
        }
    }

    /// Look up a rarity by ordinal, or `None` if out of range.
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Look up a rarity by ordinal, normalizing out-of-range values to
    /// [`Rarity::Common`].
    pub fn from_index_lossy(index: i64) -> Self {
        Self::from_index(index).unwrap_or_else(|| {
            tracing::warn!(index, "rarity ordinal out of range, using common");
            Self::Common
        })
    }

    /// Parse a rarity name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "common" => Some(Self::Common),
            "uncommon" => Some(Self::Uncommon),
            "magic" => Some(Self::Magic),
            "rare" => Some(Self::Rare),
            "epic" => Some(Self::Epic),
            "legendary" => Some(Self::Legendary),
            "set" => Some(Self::Set),
            "radiant" => Some(Self::Radiant),
            _ => None,
        }
    }

    /// Parse a rarity name, normalizing unknown names to [`Rarity::Common`].
    pub fn parse_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(name = s, "unknown rarity name, using common");
            Self::Common
        })
    }

    /// Lowercase name used in config files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Magic => "magic",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
            Self::Set => "set",
            Self::Radiant => "radiant",
        }
    }

    /// True if this rarity is at or above `minimum`.
    pub fn is_at_least(self, minimum: Rarity) -> bool {
        self >= minimum
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Magic => "Magic",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Set => "Set",
            Self::Radiant => "Radiant",
        };
        f.write_str(label)
    }
}

impl Serialize for Rarity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Accepts a rarity name or a legacy numeric ordinal. Anything else
/// normalizes to [`Rarity::Common`].
struct RarityVisitor;

impl RarityVisitor {
    fn fallback(what: &str) -> Rarity {
        tracing::warn!(value = what, "unrecognized rarity value, using common");
        Rarity::Common
    }
}

impl<'de> Visitor<'de> for RarityVisitor {
    type Value = Rarity;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a rarity name or ordinal")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Rarity, E> {
        Ok(Rarity::parse_lossy(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rarity, E> {
        Ok(Rarity::from_index_lossy(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rarity, E> {
        Ok(Rarity::from_index_lossy(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Rarity, E> {
        if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
            Ok(Rarity::from_index_lossy(v as i64))
        } else {
            Ok(Self::fallback(&v.to_string()))
        }
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Rarity, E> {
        Ok(Self::fallback(if v { "true" } else { "false" }))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Rarity, E> {
        Ok(Self::fallback("null"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Rarity, E> {
        Ok(Self::fallback("null"))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Rarity, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for Rarity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RarityVisitor)
    }
}

/// Relative drop weights per rarity for one enemy tier.
///
/// Weights need not sum to 1; a draw is scaled by the total. Negative and
/// non-finite weights count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityWeights {
    /// Weight for [`Rarity::Common`].
    pub common: f64,
    /// Weight for [`Rarity::Uncommon`].
    pub uncommon: f64,
    /// Weight for [`Rarity::Magic`].
    pub magic: f64,
    /// Weight for [`Rarity::Rare`].
    pub rare: f64,
    /// Weight for [`Rarity::Epic`].
    pub epic: f64,
    /// Weight for [`Rarity::Legendary`].
    pub legendary: f64,
    /// Weight for [`Rarity::Set`].
    pub set: f64,
    /// Weight for [`Rarity::Radiant`].
    pub radiant: f64,
}

impl RarityWeights {
    /// A profile with every weight at zero (never selects anything).
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the weight for one rarity.
    pub fn with(mut self, rarity: Rarity, weight: f64) -> Self {
        *self.slot_mut(rarity) = weight;
        self
    }

    /// Effective weight for a rarity, with invalid values clamped to zero.
    pub fn weight(&self, rarity: Rarity) -> f64 {
        let raw = match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Magic => self.magic,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
            Rarity::Set => self.set,
            Rarity::Radiant => self.radiant,
        };
        if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
    }

    /// Sum of effective weights.
    pub fn total(&self) -> f64 {
        Rarity::ALL.iter().map(|r| self.weight(*r)).sum()
    }

    /// Multiply each weight by its rarity's factor. Products that come out
    /// negative or non-finite become zero.
    pub fn scaled(&self, multipliers: &RarityMultipliers) -> Self {
        Rarity::ALL.iter().fold(Self::none(), |acc, rarity| {
            let product = self.weight(*rarity) * multipliers.get(*rarity);
            let weight = if product.is_finite() { product.max(0.0) } else { 0.0 };
            acc.with(*rarity, weight)
        })
    }

    fn slot_mut(&mut self, rarity: Rarity) -> &mut f64 {
        match rarity {
            Rarity::Common => &mut self.common,
            Rarity::Uncommon => &mut self.uncommon,
            Rarity::Magic => &mut self.magic,
            Rarity::Rare => &mut self.rare,
            Rarity::Epic => &mut self.epic,
            Rarity::Legendary => &mut self.legendary,
            Rarity::Set => &mut self.set,
            Rarity::Radiant => &mut self.radiant,
        }
    }
}

/// Per-rarity factors applied to a [`RarityWeights`] profile.
///
/// Missing fields default to 1 (no change).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityMultipliers {
    /// Factor for [`Rarity::Common`].
    pub common: f64,
    /// Factor for [`Rarity::Uncommon`].
    pub uncommon: f64,
    /// Factor for [`Rarity::Magic`].
    pub magic: f64,
    /// Factor for [`Rarity::Rare`].
    pub rare: f64,
    /// Factor for [`Rarity::Epic`].
    pub epic: f64,
    /// Factor for [`Rarity::Legendary`].
    pub legendary: f64,
    /// Factor for [`Rarity::Set`].
    pub set: f64,
    /// Factor for [`Rarity::Radiant`].
    pub radiant: f64,
}

impl Default for RarityMultipliers {
    fn default() -> Self {
        Self {
            common: 1.0,
            uncommon: 1.0,
            magic: 1.0,
            rare: 1.0,
            epic: 1.0,
            legendary: 1.0,
            set: 1.0,
            radiant: 1.0,
        }
    }
}

impl RarityMultipliers {
    /// Set the factor for one rarity.
    pub fn with(mut self, rarity: Rarity, factor: f64) -> Self {
        let slot = match rarity {
            Rarity::Common => &mut self.common,
            Rarity::Uncommon => &mut self.uncommon,
            Rarity::Magic => &mut self.magic,
            Rarity::Rare => &mut self.rare,
            Rarity::Epic => &mut self.epic,
            Rarity::Legendary => &mut self.legendary,
            Rarity::Set => &mut self.set,
            Rarity::Radiant => &mut self.radiant,
        };
        *slot = factor;
        self
    }

    /// Raw factor for one rarity.
    pub fn get(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Magic => self.magic,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
            Rarity::Set => self.set,
            Rarity::Radiant => self.radiant,
        }
    }
}
