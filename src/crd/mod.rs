//! # Custom Resource Definitions
//!
//! CRD types for the LokiStack resource whose status conditions this crate manages.
//!
//! Only the parts of the schema the condition reconciler touches are modelled
//! in detail. The spec carries a handful of fields so the type is usable with
//! `kube::Api`, but the status sub-resource is the contract that matters here.

mod status;

pub use status::*;

use serde::{Deserialize, Serialize};

/// LokiStack Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: loki.grafana.com/v1
/// kind: LokiStack
/// metadata:
///   name: lokistack-dev
///   namespace: openshift-logging
/// spec:
///   size: 1x.small
///   storage:
///     secret:
///       name: lokistack-dev-s3
///       type: s3
///   storageClassName: gp3-csi
/// status:
///   conditions:
///     - type: Ready
///       status: "True"
///       reason: ReadyComponents
///       message: All components ready
///       lastTransitionTime: "2024-05-02T10:15:00Z"
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "LokiStack",
    group = "loki.grafana.com",
    version = "v1",
    namespaced,
    status = "LokiStackStatus",
    shortname = "ls",
    printcolumn = r#"{"name":"Size", "type":"string", "jsonPath":".spec.size"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct LokiStackSpec {
    /// T-shirt size of the deployment (e.g. `1x.extra-small`, `1x.small`)
    pub size: String,
    /// Object storage configuration
    pub storage: ObjectStorageSpec,
    /// Storage class used for the persistent volume claims of every component
    pub storage_class_name: String,
    /// Replication settings, defaults are derived from `size` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<ReplicationSpec>,
}

/// Object storage settings
#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStorageSpec {
    /// Secret holding the object storage credentials
    pub secret: ObjectStorageSecretSpec,
}

/// Reference to the object storage secret
#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStorageSecretSpec {
    /// Name of the secret in the LokiStack namespace
    pub name: String,
    /// Storage backend type: s3, gcs, azure, swift, alibabacloud
    pub r#type: String,
}

/// Replication settings
#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationSpec {
    /// Number of replicas per stream
    pub factor: i32,
}
