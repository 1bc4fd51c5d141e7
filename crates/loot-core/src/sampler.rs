//! Item selection within a pool.

use crate::pool::{DropEntry, DropPool};
use crate::rarity::Rarity;
use crate::rng::LootRng;

/// Draw one entry of the given rarity from `pool`.
///
/// If the pool has nothing of that rarity, draws from the whole pool
/// instead. Returns `None` only for an empty pool, without drawing.
pub fn sample<'a, R: LootRng + ?Sized>(
    pool: &'a DropPool,
    rarity: Rarity,
    rng: &mut R,
) -> Option<&'a DropEntry> {
    let partition = pool.partition(rarity);
    if partition.is_empty() {
        return sample_any(pool, rng);
    }
    let slot = partition[rng.pick(partition.len())];
    pool.get(slot)
}

/// Draw one entry uniformly from `pool`, ignoring rarity.
pub fn sample_any<'a, R: LootRng + ?Sized>(
    pool: &'a DropPool,
    rng: &mut R,
) -> Option<&'a DropEntry> {
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.pick(pool.len()))
}
