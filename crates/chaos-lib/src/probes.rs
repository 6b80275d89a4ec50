//! Read-and-compare health probes
//!
//! Used around an experiment to check that the workload came back.

use tracing::debug;

use crate::cluster::ClusterApi;
use crate::error::{ChaosError, Result};

/// Selector template used when the caller gives none; `{name}` is replaced
/// with the deployment name.
pub const DEFAULT_DEPLOYMENT_SELECTOR: &str = "name in ({name})";

/// Check that every deployment matched by `label_selector` has all of its
/// desired replicas available.
///
/// No match is [`ChaosError::NotFound`]; a replica mismatch is
/// [`ChaosError::Unhealthy`].
pub async fn deployment_available_and_healthy(
    cluster: &dyn ClusterApi,
    name: &str,
    namespace: &str,
    label_selector: Option<&str>,
) -> Result<bool> {
    let selector = label_selector
        .unwrap_or(DEFAULT_DEPLOYMENT_SELECTOR)
        .replace("{name}", name);
    let selector = (!selector.is_empty()).then_some(selector);

    let deployments = cluster
        .list_deployments(namespace, selector)
        .await?;

    debug!(
        count = deployments.len(),
        deployment = %name,
        namespace = %namespace,
        "Found deployments"
    );

    if deployments.is_empty() {
        return Err(ChaosError::NotFound(format!(
            "deployment '{}' was not found",
            name
        )));
    }

    for deployment in &deployments {
        debug!(
            deployment = %deployment.name,
            available = deployment.available_replicas,
            desired = deployment.desired_replicas,
            "Deployment replicas"
        );

        if !deployment.is_healthy() {
            return Err(ChaosError::Unhealthy {
                name: deployment.name.clone(),
                desired: deployment.desired_replicas,
                available: deployment.available_replicas,
            });
        }
    }

    Ok(true)
}
