//! Day-by-day quantity spreading
//!
//! A month's requested quantity for an item is spread across the days of
//! the sale range: every day receives the floor share and the remainder
//! is handed out one unit at a time, so day quantities never differ by
//! more than one. The filled sequence is then shuffled so the extra
//! units do not visibly pile up at the start of the range.

use rand::seq::SliceRandom;
use rand::Rng;

/// Spreads `total_qty` units across `days` slots
///
/// The result always has exactly `days` entries and sums to `total_qty`;
/// the shuffle permutes which day gets which share but never the shares
/// themselves.
///
/// # Arguments
///
/// * `total_qty` - Requested units for the whole range
/// * `days` - Number of days in the range; zero yields an empty sequence
/// * `rng` - Randomness source for the permutation
pub fn distribute_quantity<R: Rng + ?Sized>(total_qty: u32, days: u32, rng: &mut R) -> Vec<u32> {
    if days == 0 {
        return Vec::new();
    }

    let base = total_qty / days;
    let remainder = (total_qty % days) as usize;

    let mut shares = vec![base; days as usize];
    for share in shares.iter_mut().take(remainder) {
        *share += 1;
    }

    shares.shuffle(rng);
    shares
}
