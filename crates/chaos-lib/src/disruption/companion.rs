//! Companion pods that kill a target container's main process
//!
//! A companion runs the disruption agent on the target's node with the
//! container runtime socket mounted, and signals every runtime container
//! whose name matches `k8s_<container>_<pod>_<namespace>_`. That naming
//! convention is shared with the agent and must not change.

use k8s_openapi::api::core::v1::{
    Container, HostPathVolumeSource, Pod, PodSpec, ResourceRequirements, SecurityContext, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use rand::Rng;
use std::collections::BTreeMap;

use crate::models::{DisruptionSpec, UnitRef, ALL_CONTAINERS};

pub const COMPANION_CONTAINER: &str = "pumba";
const SOCKET_VOLUME: &str = "dockersocket";

/// Labels put on every companion pod
pub mod labels {
    pub const APP: &str = "app";
    pub const AGENT: &str = "com.gaiaadm.pumba";
    pub const CONTAINER: &str = "container";
    pub const POD: &str = "pod";
    pub const NAMESPACE: &str = "namespace";
}

/// Annotations put on every companion pod
pub mod annotations {
    /// Full target pod name, which may not fit in a label value
    pub const POD: &str = "pod";
}

/// Longest value the API server accepts for a label
const MAX_LABEL_VALUE_LEN: usize = 63;

/// Same alphabet the API server uses for `generateName` suffixes
const RUN_ID_ALPHABET: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";
const RUN_ID_LEN: usize = 5;

/// Short random id tying together the pods and log lines of one run
pub fn new_run_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..RUN_ID_LEN)
        .map(|_| RUN_ID_ALPHABET[rng.gen_range(0..RUN_ID_ALPHABET.len())] as char)
        .collect()
}

/// Agent argument selecting the runtime containers of `pod`.
///
/// Container names are DNS labels and never contain `_`, so the wildcard
/// matches exactly one name segment.
pub fn container_pattern(container: &str, pod: &str, namespace: &str) -> String {
    let container = if container == ALL_CONTAINERS {
        "[^_]+".to_string()
    } else {
        regex::escape(container)
    };
    format!(
        "re2:^k8s_{}_{}_{}_",
        container,
        regex::escape(pod),
        regex::escape(namespace)
    )
}

/// Hands out companion names unique within one invocation and, through the
/// random run id, across invocations.
#[derive(Debug, Clone)]
pub struct CompanionNamer {
    prefix: String,
    run_id: String,
    next: usize,
}

impl CompanionNamer {
    pub fn new<R: Rng + ?Sized>(prefix: impl Into<String>, rng: &mut R) -> Self {
        Self::with_run_id(prefix, new_run_id(rng))
    }

    pub fn with_run_id(prefix: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            run_id: run_id.into(),
            next: 0,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn next_name(&mut self) -> String {
        let name = format!("{}-{}-{}", self.prefix, self.run_id, self.next);
        self.next += 1;
        name
    }
}

fn container_label(container: &str) -> String {
    // `*` is not a legal label value
    if container == ALL_CONTAINERS {
        "all".to_string()
    } else {
        container.to_string()
    }
}

/// Cut `value` down to a legal label value; it must still end with an
/// alphanumeric character.
fn label_value(value: &str) -> String {
    if value.len() <= MAX_LABEL_VALUE_LEN {
        return value.to_string();
    }
    value
        .chars()
        .take(MAX_LABEL_VALUE_LEN)
        .collect::<String>()
        .trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_string()
}

/// Build the companion pod for `target`. The caller must make sure the
/// target is scheduled.
pub fn companion_pod(name: String, target: &UnitRef, spec: &DisruptionSpec) -> Pod {
    let labels = BTreeMap::from([
        (labels::APP.to_string(), COMPANION_CONTAINER.to_string()),
        (labels::AGENT.to_string(), "true".to_string()),
        (labels::CONTAINER.to_string(), container_label(&spec.container)),
        (labels::POD.to_string(), label_value(&target.name)),
        (labels::NAMESPACE.to_string(), target.namespace.clone()),
    ]);

    let resources = ResourceRequirements {
        requests: Some(BTreeMap::from([
            ("cpu".to_string(), Quantity("10m".to_string())),
            ("memory".to_string(), Quantity("5M".to_string())),
        ])),
        limits: Some(BTreeMap::from([
            ("cpu".to_string(), Quantity("100m".to_string())),
            ("memory".to_string(), Quantity("20M".to_string())),
        ])),
        ..ResourceRequirements::default()
    };

    let container = Container {
        name: COMPANION_CONTAINER.to_string(),
        image: Some(spec.companion_image.clone()),
        image_pull_policy: Some("Always".to_string()),
        args: Some(vec![
            "--log-level".to_string(),
            "debug".to_string(),
            "kill".to_string(),
            "--signal".to_string(),
            spec.signal.clone(),
            container_pattern(&spec.container, &target.name, &target.namespace),
        ]),
        resources: Some(resources),
        volume_mounts: Some(vec![VolumeMount {
            name: SOCKET_VOLUME.to_string(),
            mount_path: spec.runtime_socket.clone(),
            ..VolumeMount::default()
        }]),
        security_context: spec.privileged.then(|| SecurityContext {
            privileged: Some(true),
            ..SecurityContext::default()
        }),
        ..Container::default()
    };

    Pod {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(target.namespace.clone()),
            labels: Some(labels),
            annotations: Some(BTreeMap::from([(
                annotations::POD.to_string(),
                target.name.clone(),
            )])),
            ..ObjectMeta::default()
        },
        spec: Some(PodSpec {
            containers: vec![container],
            node_name: Some(target.node_name.clone()),
            restart_policy: Some("Never".to_string()),
            volumes: Some(vec![Volume {
                name: SOCKET_VOLUME.to_string(),
                host_path: Some(HostPathVolumeSource {
                    path: spec.runtime_socket.clone(),
                    type_: None,
                }),
                ..Volume::default()
            }]),
            ..PodSpec::default()
        }),
        ..Pod::default()
    }
}
