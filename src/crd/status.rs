//! # LokiStack Status
//!
//! Status types for the LokiStack resource: the condition ledger and the
//! closed vocabularies used to populate it.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of the LokiStack resource
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LokiStackStatus {
    /// Conditions of the LokiStack, at most one entry per condition type.
    /// At most one entry is `True` at any time.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Condition represents a condition of a resource
///
/// The wire shape matches the Kubernetes `metav1.Condition` so existing
/// dashboards and `kubectl wait --for=condition=Ready` keep working.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition, one of [`ConditionType`] for entries written here
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,
    /// Generation the condition was computed for, if another writer set it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    /// Last time the condition was rewritten
    #[serde(with = "rfc3339_seconds")]
    #[schemars(with = "String")]
    pub last_transition_time: DateTime<Utc>,
    /// Machine-readable reason code
    pub reason: String,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

impl Condition {
    /// Whether this entry is the active one
    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }
}

/// Condition types written by the condition reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionType {
    /// All components are running and ready
    Ready,
    /// At least one component failed
    Failed,
    /// At least one component is waiting on a dependency
    Pending,
    /// The configuration is invalid or a required dependency is broken
    Degraded,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::Ready => "Ready",
            ConditionType::Failed => "Failed",
            ConditionType::Pending => "Pending",
            ConditionType::Degraded => "Degraded",
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Tri-state condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        };
        f.pad(s)
    }
}

/// Reason codes attached to LokiStack conditions
///
/// The fixed conditions (Ready, Failed, Pending) each have exactly one reason.
/// Degraded conditions carry whichever reason the caller detected; codes that
/// are not part of the known set travel as [`ConditionReason::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionReason {
    /// All components are ready
    ReadyComponents,
    /// At least one component failed
    FailedComponents,
    /// At least one component is pending on dependencies
    PendingComponents,
    /// The object storage secret does not exist
    MissingObjectStorageSecret,
    /// The object storage secret is missing required keys
    InvalidObjectStorageSecret,
    /// The storage schema configuration is invalid
    InvalidObjectStorageSchema,
    /// The object storage CA config map does not exist
    MissingObjectStorageCAConfigMap,
    /// The object storage CA config map is missing the CA bundle
    InvalidObjectStorageCAConfigMap,
    /// The replication factor is larger than the number of zones
    InvalidReplicationConfiguration,
    /// A gateway tenant secret does not exist
    MissingGatewayTenantSecret,
    /// A gateway tenant secret is missing required keys
    InvalidGatewayTenantSecret,
    /// The tenants configuration is invalid for the selected mode
    InvalidTenantsConfiguration,
    /// The cluster base domain could not be determined
    MissingGatewayOpenShiftBaseDomain,
    /// Rotating certificates failed
    FailedCertificateRotation,
    /// The query timeout could not be parsed
    QueryTimeoutInvalid,
    /// Any other caller-supplied reason code
    Other(String),
}

impl ConditionReason {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionReason::ReadyComponents => "ReadyComponents",
            ConditionReason::FailedComponents => "FailedComponents",
            ConditionReason::PendingComponents => "PendingComponents",
            ConditionReason::MissingObjectStorageSecret => "MissingObjectStorageSecret",
            ConditionReason::InvalidObjectStorageSecret => "InvalidObjectStorageSecret",
            ConditionReason::InvalidObjectStorageSchema => "InvalidObjectStorageSchema",
            ConditionReason::MissingObjectStorageCAConfigMap => "MissingObjectStorageCAConfigMap",
            ConditionReason::InvalidObjectStorageCAConfigMap => "InvalidObjectStorageCAConfigMap",
            ConditionReason::InvalidReplicationConfiguration => "InvalidReplicationConfiguration",
            ConditionReason::MissingGatewayTenantSecret => "MissingGatewayTenantSecret",
            ConditionReason::InvalidGatewayTenantSecret => "InvalidGatewayTenantSecret",
            ConditionReason::InvalidTenantsConfiguration => "InvalidTenantsConfiguration",
            ConditionReason::MissingGatewayOpenShiftBaseDomain => {
                "MissingGatewayOpenShiftBaseDomain"
            }
            ConditionReason::FailedCertificateRotation => "FailedCertificateRotation",
            ConditionReason::QueryTimeoutInvalid => "QueryTimeoutInvalid",
            ConditionReason::Other(reason) => reason,
        }
    }
}

impl From<&str> for ConditionReason {
    fn from(value: &str) -> Self {
        match value {
            "ReadyComponents" => ConditionReason::ReadyComponents,
            "FailedComponents" => ConditionReason::FailedComponents,
            "PendingComponents" => ConditionReason::PendingComponents,
            "MissingObjectStorageSecret" => ConditionReason::MissingObjectStorageSecret,
            "InvalidObjectStorageSecret" => ConditionReason::InvalidObjectStorageSecret,
            "InvalidObjectStorageSchema" => ConditionReason::InvalidObjectStorageSchema,
            "MissingObjectStorageCAConfigMap" => ConditionReason::MissingObjectStorageCAConfigMap,
            "InvalidObjectStorageCAConfigMap" => ConditionReason::InvalidObjectStorageCAConfigMap,
            "InvalidReplicationConfiguration" => ConditionReason::InvalidReplicationConfiguration,
            "MissingGatewayTenantSecret" => ConditionReason::MissingGatewayTenantSecret,
            "InvalidGatewayTenantSecret" => ConditionReason::InvalidGatewayTenantSecret,
            "InvalidTenantsConfiguration" => ConditionReason::InvalidTenantsConfiguration,
            "MissingGatewayOpenShiftBaseDomain" => {
                ConditionReason::MissingGatewayOpenShiftBaseDomain
            }
            "FailedCertificateRotation" => ConditionReason::FailedCertificateRotation,
            "QueryTimeoutInvalid" => ConditionReason::QueryTimeoutInvalid,
            other => ConditionReason::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ConditionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// `metav1.Time` serializes with second precision and a `Z` suffix
mod rfc3339_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
