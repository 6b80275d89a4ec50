//! Name filtering

use regex::Regex;
use tracing::debug;

use crate::error::{ChaosError, Result};
use crate::models::UnitRef;

/// Keeps pods whose name matches a pattern anchored at the start of the name.
///
/// `web` matches `web-1` but not `notweb`; the end of the name is not
/// anchored, so `web` also matches `webserver`.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    pattern: Option<Regex>,
}

impl NameFilter {
    /// Compile `pattern`; `None` builds a pass-through filter
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let pattern = match pattern {
            Some(p) => Some(Regex::new(&format!("^(?:{})", p)).map_err(|source| {
                ChaosError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Self { pattern })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.as_ref().map_or(true, |re| re.is_match(name))
    }

    pub fn apply(&self, candidates: Vec<UnitRef>) -> Vec<UnitRef> {
        let Some(re) = &self.pattern else {
            return candidates;
        };

        let total = candidates.len();
        let kept: Vec<UnitRef> = candidates
            .into_iter()
            .filter(|unit| re.is_match(&unit.name))
            .collect();

        debug!(
            pattern = %re.as_str(),
            matched = kept.len(),
            total = total,
            "Filtered pods by name"
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(names: &[&str]) -> Vec<UnitRef> {
        names.iter().map(|n| UnitRef::new(*n, "default")).collect()
    }

    fn names(units: &[UnitRef]) -> Vec<&str> {
        units.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn test_no_pattern_passes_everything() {
        let filter = NameFilter::new(None).unwrap();
        let kept = filter.apply(units(&["b", "a", "c"]));
        assert_eq!(names(&kept), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_explicit_anchor() {
        let filter = NameFilter::new(Some("^web-")).unwrap();
        let kept = filter.apply(units(&["web-1", "web-2", "db-1"]));
        assert_eq!(names(&kept), vec!["web-1", "web-2"]);
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        let filter = NameFilter::new(Some("web")).unwrap();
        let kept = filter.apply(units(&["web-1", "notweb"]));
        assert_eq!(names(&kept), vec!["web-1"]);
    }

    #[test]
    fn test_match_is_not_anchored_at_end() {
        let filter = NameFilter::new(Some("foo")).unwrap();
        assert!(filter.matches("foobar"));
        assert!(!filter.matches("barfoo"));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        // Without grouping, `^a|b` would let `b` match anywhere
        let filter = NameFilter::new(Some("api|web")).unwrap();
        let kept = filter.apply(units(&["api-0", "web-0", "old-web-0"]));
        assert_eq!(names(&kept), vec!["api-0", "web-0"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = NameFilter::new(Some("web-(")).unwrap_err();
        match err {
            ChaosError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "web-("),
            other => panic!("unexpected error: {other}"),
        }
    }
}
