//! Candidate ordering

use crate::models::{SelectionOrder, UnitRef};

/// Arrange candidates for sampling.
///
/// `Alphabetic` keeps the fetch order untouched. It does not sort by name;
/// the listing order of the API server is used as is.
pub fn arrange(mut candidates: Vec<UnitRef>, order: SelectionOrder) -> Vec<UnitRef> {
    match order {
        SelectionOrder::Alphabetic => candidates,
        SelectionOrder::Oldest => {
            // Stable: equal timestamps keep fetch order. Pods without a
            // timestamp sort first.
            candidates.sort_by_key(|unit| unit.creation_timestamp);
            candidates
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn unit(name: &str, secs: i64) -> UnitRef {
        UnitRef::new(name, "default").created_at(Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn test_alphabetic_keeps_fetch_order() {
        let pods = vec![unit("zeta", 3), unit("alpha", 1), unit("mid", 2)];
        let arranged = arrange(pods.clone(), SelectionOrder::Alphabetic);
        assert_eq!(arranged, pods);
    }

    #[test]
    fn test_oldest_first() {
        let pods = vec![unit("c", 30), unit("a", 10), unit("b", 20)];
        let arranged = arrange(pods, SelectionOrder::Oldest);
        let names: Vec<_> = arranged.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_oldest_ties_keep_fetch_order() {
        let pods = vec![unit("late", 50), unit("x", 10), unit("y", 10), unit("z", 10)];
        let arranged = arrange(pods, SelectionOrder::Oldest);
        let names: Vec<_> = arranged.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "z", "late"]);
    }

    #[test]
    fn test_missing_timestamp_sorts_first() {
        let pods = vec![unit("a", 10), UnitRef::new("pending", "default")];
        let arranged = arrange(pods, SelectionOrder::Oldest);
        assert_eq!(arranged[0].name, "pending");
    }
}
