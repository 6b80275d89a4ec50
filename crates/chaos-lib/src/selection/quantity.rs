//! Quantity resolution

use crate::models::{SelectionCriteria, SelectionMode};

/// Concrete number of pods to pick out of `available` candidates.
///
/// Always within `[0, available]`. Percentages round up, so any non-zero
/// percentage of a non-empty pool yields at least one pod.
pub fn resolve(criteria: &SelectionCriteria, available: usize) -> usize {
    if criteria.all {
        return available;
    }

    // Negative quantities are refused by validation; clamp anyway
    let quantity = u64::try_from(criteria.quantity).unwrap_or(0);
    let n = available as u64;

    let wanted = match criteria.mode {
        SelectionMode::Fixed => quantity,
        SelectionMode::Percentage => quantity.saturating_mul(n).div_ceil(100),
    };

    wanted.min(n) as usize
}
