//! Steady-state probes

use anyhow::Result;
use chaos_lib::probes::deployment_available_and_healthy;
use serde::Serialize;

use super::Context;
use crate::output::{print_json, print_success, OutputFormat};

#[derive(Serialize)]
struct ProbeResult<'a> {
    deployment: &'a str,
    namespace: &'a str,
    healthy: bool,
}

/// Check that a deployment has all of its replicas available.
///
/// A missing or unhealthy deployment is returned as an error so that the
/// process exits non-zero.
pub async fn probe_deployment(
    ctx: &Context,
    name: &str,
    namespace: Option<String>,
    label_selector: Option<String>,
) -> Result<()> {
    let namespace = namespace
        .or_else(|| ctx.config.namespace.clone())
        .unwrap_or_else(|| super::DEFAULT_NAMESPACE.to_string());

    let healthy = deployment_available_and_healthy(
        ctx.cluster.as_ref(),
        name,
        &namespace,
        label_selector.as_deref(),
    )
    .await?;

    match ctx.format {
        OutputFormat::Json => print_json(&ProbeResult {
            deployment: name,
            namespace: &namespace,
            healthy,
        }),
        OutputFormat::Table => print_success(&format!(
            "Deployment {}/{} is available and healthy",
            namespace, name
        )),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, MockCluster};
    use chaos_lib::{ChaosError, DeploymentHealth};

    fn serving(deployments: Vec<DeploymentHealth>) -> MockCluster {
        let mut cluster = MockCluster::new();
        cluster
            .expect_list_deployments()
            .withf(|namespace, _| namespace == "default")
            .returning(move |_, _| Ok(deployments.clone()));
        cluster
    }

    #[tokio::test]
    async fn test_probe_healthy_deployment() {
        let cluster = serving(vec![DeploymentHealth {
            name: "web".to_string(),
            namespace: "default".to_string(),
            desired_replicas: 2,
            available_replicas: 2,
        }]);

        let result = probe_deployment(&context(cluster), "web", None, None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_probe_missing_deployment_fails() {
        let err = probe_deployment(&context(serving(vec![])), "web", None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChaosError>(),
            Some(ChaosError::NotFound(_))
        ));
    }
}
