//! Drawing the resolved quantity of pods

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::UnitRef;

/// Take `k` pods out of the ordered `candidates`.
///
/// With `random`, `k` distinct pods are drawn uniformly without replacement
/// and returned in draw order. Otherwise the first `k` pods are returned.
/// `k` larger than the pool is capped to the pool size.
pub fn sample<R>(candidates: Vec<UnitRef>, k: usize, random: bool, rng: &mut R) -> Vec<UnitRef>
where
    R: Rng + ?Sized,
{
    let k = k.min(candidates.len());

    if random {
        candidates.choose_multiple(rng, k).cloned().collect()
    } else {
        let mut candidates = candidates;
        candidates.truncate(k);
        candidates
    }
}
