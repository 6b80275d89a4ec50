//! Shared setup for tests running against [`MockClusterApi`]

pub use super::MockClusterApi;
use crate::error::ChaosError;
use crate::models::UnitRef;

/// An API server error as `kube` reports it
pub fn api_error(code: u16, reason: &str) -> ChaosError {
    ChaosError::Cluster(kube::Error::Api(kube::error::ErrorResponse {
        status: "Failure".to_string(),
        message: format!("{} ({})", reason, code),
        reason: reason.to_string(),
        code,
    }))
}

/// A cluster whose pod listing always returns `pods`
pub fn listing(pods: Vec<UnitRef>) -> MockClusterApi {
    let mut cluster = MockClusterApi::new();
    cluster
        .expect_list_pods()
        .returning(move |_, _| Ok(pods.clone()));
    cluster
}
