//! Reporting of non-fatal content misconfiguration.
//!
//! The engine never fails a roll because of bad content. When a problem is
//! worth a content author's attention it is handed to a [`Diagnostics`] sink
//! and the roll carries on.

use crate::rarity::Rarity;
use crate::tier::EnemyTier;

/// A misconfiguration observed during a roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A guaranteed-minimum-rarity rule is enabled, but its source pool has
    /// nothing at or above the minimum.
    NoEligibleItems {
        /// Name of the source pool.
        pool: String,
        /// Tier of the kill being resolved.
        tier: EnemyTier,
        /// The rule's minimum rarity.
        minimum: Rarity,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEligibleItems {
                pool,
                tier,
                minimum,
            } => write!(
                f,
                "guaranteed rule enabled but no eligible items in pool '{pool}' \
                 for tier {tier} at minimum rarity {minimum}"
            ),
        }
    }
}

/// A sink for [`Diagnostic`]s.
pub trait Diagnostics {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<F: FnMut(&Diagnostic)> Diagnostics for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(&diagnostic);
    }
}

/// Forwards diagnostics to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(target: "loot::config", "{diagnostic}");
    }
}

/// Keeps every diagnostic for later inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectedDiagnostics {
    entries: Vec<Diagnostic>,
}

impl CollectedDiagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics in the order they were reported.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of diagnostics collected.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}
