//! [`ClusterApi`] over a live API server

use super::ClusterApi;
use crate::error::Result;
use crate::models::{DeploymentHealth, UnitRef};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::{Client, ResourceExt};
use std::collections::BTreeMap;
use tracing::debug;

/// Cluster access through a configured `kube::Client`
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn list_params(label_selector: Option<&str>) -> ListParams {
        match label_selector {
            Some(selector) => ListParams::default().labels(selector),
            None => ListParams::default(),
        }
    }
}

impl From<&Pod> for UnitRef {
    fn from(pod: &Pod) -> Self {
        UnitRef {
            name: pod.name_any(),
            namespace: pod.namespace().unwrap_or_default(),
            node_name: pod
                .spec
                .as_ref()
                .and_then(|spec| spec.node_name.clone())
                .unwrap_or_default(),
            creation_timestamp: pod.metadata.creation_timestamp.as_ref().map(|t| t.0),
            labels: pod.metadata.labels.clone().unwrap_or_else(BTreeMap::new),
        }
    }
}

impl From<&Deployment> for DeploymentHealth {
    fn from(deployment: &Deployment) -> Self {
        DeploymentHealth {
            name: deployment.name_any(),
            namespace: deployment.namespace().unwrap_or_default(),
            // The API server defaults spec.replicas to 1
            desired_replicas: deployment
                .spec
                .as_ref()
                .and_then(|spec| spec.replicas)
                .unwrap_or(1),
            available_replicas: deployment
                .status
                .as_ref()
                .and_then(|status| status.available_replicas)
                .unwrap_or(0),
        }
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<String>,
    ) -> Result<Vec<UnitRef>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pods = api.list(&Self::list_params(label_selector.as_deref())).await?;
        Ok(pods.items.iter().map(UnitRef::from).collect())
    }

    async fn delete_pod(
        &self,
        name: &str,
        namespace: &str,
        grace_period_seconds: Option<u32>,
    ) -> Result<()> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = DeleteParams {
            grace_period_seconds,
            ..DeleteParams::default()
        };
        api.delete(name, &params).await?;
        debug!(pod = %name, namespace = %namespace, "Delete request accepted");
        Ok(())
    }

    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<String> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let created = api.create(&PostParams::default(), pod).await?;
        Ok(created.name_any())
    }

    async fn list_deployments(
        &self,
        namespace: &str,
        label_selector: Option<String>,
    ) -> Result<Vec<DeploymentHealth>> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let deployments = api.list(&Self::list_params(label_selector.as_deref())).await?;
        Ok(deployments.items.iter().map(DeploymentHealth::from).collect())
    }
}
