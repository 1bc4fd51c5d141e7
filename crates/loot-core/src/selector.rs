//! Weighted rarity selection.

use crate::rarity::{Rarity, RarityWeights};
use crate::rng::LootRng;

/// Draw one rarity from a weight profile.
///
/// Returns `None` only when the profile's total weight is zero. Consumes
/// exactly one uniform draw otherwise.
pub fn select_rarity<R: LootRng + ?Sized>(
    weights: &RarityWeights,
    rng: &mut R,
) -> Option<Rarity> {
    let total = weights.total().max(0.0);
    if total <= 0.0 {
        return None;
    }

    let mut remaining = rng.uniform01() * total;
    let mut last = None;
    for rarity in Rarity::ALL {
        let weight = weights.weight(rarity);
        if weight <= 0.0 {
            continue;
        }
        last = Some(rarity);
        remaining -= weight;
        if remaining <= 0.0 {
            return Some(rarity);
        }
    }

    // Float drift can leave a sliver above zero after the last weight.
    last
}
