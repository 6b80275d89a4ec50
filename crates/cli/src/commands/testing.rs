//! Mock cluster for command tests

use std::sync::Arc;

use chaos_lib::{ClusterApi, DeploymentHealth, Result, UnitRef};
use k8s_openapi::api::core::v1::Pod;
use mockall::mock;

use super::Context;
use crate::config::Config;
use crate::output::OutputFormat;

mock! {
    pub Cluster {}

    #[async_trait::async_trait]
    impl ClusterApi for Cluster {
        async fn list_pods(
            &self,
            namespace: &str,
            label_selector: Option<String>,
        ) -> Result<Vec<UnitRef>>;
        async fn delete_pod(
            &self,
            name: &str,
            namespace: &str,
            grace_period_seconds: Option<u32>,
        ) -> Result<()>;
        async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<String>;
        async fn list_deployments(
            &self,
            namespace: &str,
            label_selector: Option<String>,
        ) -> Result<Vec<DeploymentHealth>>;
    }
}

pub fn context(cluster: MockCluster) -> Context {
    Context {
        cluster: Arc::new(cluster),
        config: Config::default(),
        format: OutputFormat::Json,
    }
}
