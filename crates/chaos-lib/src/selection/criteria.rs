//! Criteria validation

use crate::error::{ChaosError, Result};
use crate::models::SelectionCriteria;

/// Reject criteria that must never reach the cluster.
///
/// Mode and order are closed enums, so a bad string has already been
/// refused when it was parsed; what remains is the quantity bound.
pub fn validate(criteria: &SelectionCriteria) -> Result<()> {
    if criteria.quantity < 0 {
        return Err(ChaosError::InvalidCriteria(format!(
            "quantity '{}' is negative",
            criteria.quantity
        )));
    }

    if criteria.namespace.is_empty() {
        return Err(ChaosError::InvalidCriteria(
            "namespace must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SelectionMode, SelectionOrder};

    #[test]
    fn test_negative_quantity_rejected_for_every_combination() {
        for mode in [SelectionMode::Fixed, SelectionMode::Percentage] {
            for order in [SelectionOrder::Alphabetic, SelectionOrder::Oldest] {
                for (all, random) in [(false, false), (true, false), (false, true), (true, true)] {
                    let criteria = SelectionCriteria::new("default")
                        .mode(mode)
                        .order(order)
                        .all(all)
                        .random(random)
                        .quantity(-1);
                    let err = validate(&criteria).unwrap_err();
                    assert!(matches!(err, ChaosError::InvalidCriteria(_)));
                    assert!(err.is_validation());
                }
            }
        }
    }

    #[test]
    fn test_zero_quantity_is_valid() {
        assert!(validate(&SelectionCriteria::new("default").quantity(0)).is_ok());
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let err = validate(&SelectionCriteria::new("")).unwrap_err();
        assert!(matches!(err, ChaosError::InvalidCriteria(_)));
    }
}
