//! Error taxonomy for selection, disruption and probes

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChaosError {
    /// Malformed selection parameters, detected before any cluster call
    #[error("invalid selection criteria: {0}")]
    InvalidCriteria(String),

    #[error("invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("deployment '{name}' is not healthy: {available}/{desired} replicas available")]
    Unhealthy {
        name: String,
        desired: i32,
        available: i32,
    },

    #[error("pod '{pod}' is not scheduled on any node")]
    Unschedulable { pod: String },

    #[error("cluster request failed: {0}")]
    Cluster(#[from] kube::Error),

    #[error("{failed} of {attempted} disruptions failed")]
    PartialFailure { failed: usize, attempted: usize },
}

impl ChaosError {
    /// True for errors raised locally before anything reached the cluster
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ChaosError::InvalidCriteria(_) | ChaosError::InvalidPattern { .. }
        )
    }
}

pub type Result<T, E = ChaosError> = std::result::Result<T, E>;
