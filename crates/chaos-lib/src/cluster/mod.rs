//! Cluster access boundary
//!
//! Everything the selection engine and the dispatcher need from the API
//! server goes through [`ClusterApi`], injected as `Arc<dyn ClusterApi>`.

mod live;

#[cfg(test)]
pub(crate) mod testing;

pub use live::KubeCluster;

use crate::error::Result;
use crate::models::{DeploymentHealth, UnitRef};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
#[cfg(test)]
use mockall::automock;

/// Operations consumed from the cluster. Failures are returned as
/// [`ChaosError::Cluster`](crate::ChaosError::Cluster) and never retried.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List pods in `namespace`, optionally restricted by a label selector.
    /// The returned order is the listing order of the API server.
    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<String>,
    ) -> Result<Vec<UnitRef>>;

    /// Delete one pod. `None` leaves the grace period to the cluster.
    async fn delete_pod(
        &self,
        name: &str,
        namespace: &str,
        grace_period_seconds: Option<u32>,
    ) -> Result<()>;

    /// Create a pod, returning the name the server assigned
    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<String>;

    async fn list_deployments(
        &self,
        namespace: &str,
        label_selector: Option<String>,
    ) -> Result<Vec<DeploymentHealth>>;
}
