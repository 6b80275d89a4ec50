//! Integration tests for selection and dispatch through the public API

use chaos_lib::{
    deployment_available_and_healthy, Action, ChaosError, ClusterApi, DeploymentHealth,
    DisruptionSpec, Disruptor, FailurePolicy, GracePeriod, Result, SelectionCriteria,
    SelectionMode, SelectionOrder, Selector, UnitRef,
};
use chrono::{TimeZone, Utc};
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use mockall::mock;
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};

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

fn fleet() -> Vec<UnitRef> {
    (0..10)
        .map(|i| {
            UnitRef::new(format!("web-{}", i), "shop")
                .on_node(format!("node-{}", i % 3))
                .created_at(Utc.timestamp_opt(1_700_000_000 - i * 60, 0).unwrap())
                .with_label("app", "web")
        })
        .chain([UnitRef::new("db-0", "shop")
            .on_node("node-0")
            .with_label("app", "db")])
        .collect()
}

/// Cluster serving `fleet()`, honouring `app=<value>` selectors
fn fleet_cluster() -> MockCluster {
    let mut cluster = MockCluster::new();
    cluster
        .expect_list_pods()
        .withf(|namespace, _| namespace == "shop")
        .returning(|_, selector| {
            let wanted = selector.as_deref().and_then(|s| s.strip_prefix("app="));
            Ok(fleet()
                .into_iter()
                .filter(|unit| wanted.map_or(true, |app| unit.labels["app"] == app))
                .collect())
        });
    cluster
}

fn server_error() -> ChaosError {
    ChaosError::Cluster(kube::Error::Api(kube::error::ErrorResponse {
        status: "Failure".to_string(),
        message: "etcdserver: request timed out".to_string(),
        reason: "InternalError".to_string(),
        code: 500,
    }))
}

#[tokio::test]
async fn test_select_half_of_web_tier_oldest_first() {
    let selector = Selector::new(Arc::new(fleet_cluster()));

    let criteria = SelectionCriteria::new("shop")
        .with_label_selector("app=web")
        .mode(SelectionMode::Percentage)
        .quantity(50)
        .order(SelectionOrder::Oldest);

    let selected = assert_ok!(selector.select_units(&criteria).await);
    let names: Vec<_> = selected.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["web-9", "web-8", "web-7", "web-6", "web-5"]);
}

#[tokio::test]
async fn test_terminate_then_check_deployment() {
    let mut cluster = fleet_cluster();
    let deleted = Arc::new(Mutex::new(Vec::new()));
    let sink = deleted.clone();
    cluster
        .expect_delete_pod()
        .withf(|_, namespace, grace| namespace == "shop" && *grace == Some(0))
        .times(3)
        .returning(move |name, _, _| {
            sink.lock().unwrap().push(name.to_string());
            Ok(())
        });
    cluster
        .expect_list_deployments()
        .withf(|_, selector| selector.as_deref() == Some("name in (web)"))
        .returning(|namespace, _| {
            Ok(vec![DeploymentHealth {
                name: "web".to_string(),
                namespace: namespace.to_string(),
                desired_replicas: 10,
                available_replicas: 10,
            }])
        });
    let cluster = Arc::new(cluster);
    let disruptor = Disruptor::new(cluster.clone());

    let criteria = SelectionCriteria::new("shop")
        .with_name_pattern("web-")
        .quantity(3);
    let report = assert_ok!(disruptor.terminate_units(&criteria, GracePeriod::Seconds(0)).await);

    assert_eq!(report.action, Action::Terminate);
    assert!(report.is_success());
    assert_eq!(*deleted.lock().unwrap(), vec!["web-0", "web-1", "web-2"]);

    let healthy = deployment_available_and_healthy(cluster.as_ref(), "web", "shop", None).await;
    assert!(assert_ok!(healthy));
}

#[tokio::test]
async fn test_kill_main_process_one_companion_per_pod() {
    let mut cluster = fleet_cluster();
    cluster.expect_delete_pod().times(0);
    let created = Arc::new(Mutex::new(Vec::new()));
    let sink = created.clone();
    cluster.expect_create_pod().returning(move |_, pod| {
        sink.lock().unwrap().push(pod.clone());
        Ok(pod.name_any())
    });
    let disruptor = Disruptor::new(Arc::new(cluster));

    let criteria = SelectionCriteria::new("shop")
        .with_label_selector("app=web")
        .random(true)
        .quantity(4);
    let spec = DisruptionSpec::default()
        .with_signal("SIGTERM")
        .with_container("nginx");
    let report = assert_ok!(disruptor.kill_main_process(&criteria, &spec).await);

    assert_eq!(report.action, Action::KillMainProcess);
    assert_eq!(report.companions.len(), 4);

    let created = created.lock().unwrap();
    assert_eq!(created.len(), 4);
    for (companion, target) in created.iter().zip(&report.succeeded) {
        let spec = companion.spec.as_ref().unwrap();
        assert_eq!(spec.node_name.as_deref(), Some(target.node_name.as_str()));
    }
}

#[tokio::test]
async fn test_empty_selection_is_a_successful_noop() {
    let mut cluster = fleet_cluster();
    cluster.expect_delete_pod().times(0);
    let disruptor = Disruptor::new(Arc::new(cluster));

    let criteria = SelectionCriteria::new("shop").with_name_pattern("cache-");
    let report = assert_ok!(
        disruptor
            .terminate_units(&criteria, GracePeriod::ClusterDefault)
            .await
    );

    assert_eq!(report.attempted(), 0);
}

#[tokio::test]
async fn test_bad_pattern_is_validation_error() {
    let mut cluster = MockCluster::new();
    cluster.expect_list_pods().times(0);
    let disruptor = Disruptor::new(Arc::new(cluster));

    let criteria = SelectionCriteria::new("shop").with_name_pattern("web-(");
    let err = assert_err!(
        disruptor
            .terminate_units(&criteria, GracePeriod::ClusterDefault)
            .await
    );

    assert!(matches!(err, ChaosError::InvalidPattern { .. }));
}

#[tokio::test]
async fn test_listing_failure_surfaces_cluster_error() {
    let mut cluster = MockCluster::new();
    cluster
        .expect_list_pods()
        .returning(|_, _| Err(server_error()));
    cluster.expect_create_pod().times(0);
    let disruptor = Disruptor::new(Arc::new(cluster));

    let err = assert_err!(
        disruptor
            .kill_main_process(&SelectionCriteria::new("shop"), &DisruptionSpec::default())
            .await
    );
    assert!(matches!(err, ChaosError::Cluster(_)));
}

#[tokio::test]
async fn test_best_effort_report_lists_failures() {
    let mut cluster = fleet_cluster();
    cluster
        .expect_delete_pod()
        .times(3)
        .returning(|name, _, _| match name {
            "web-1" => Err(server_error()),
            _ => Ok(()),
        });
    let disruptor =
        Disruptor::new(Arc::new(cluster)).with_failure_policy(FailurePolicy::BestEffort);

    let criteria = SelectionCriteria::new("shop")
        .with_name_pattern("web-")
        .quantity(3);
    let report = assert_ok!(
        disruptor
            .terminate_units(&criteria, GracePeriod::ClusterDefault)
            .await
    );

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.failed.len(), 1);
    assert_err!(report.ensure_success());
}
