use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Metadata, Resource, ToOneRelationship};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    /// Unique per app, e.g. `web` or `worker`.
    #[serde(rename = "type")]
    pub process_type: String,
    /// `None` means the buildpack-detected or Procfile command is used.
    pub command: Option<String>,
    pub instances: u32,
    pub memory_in_mb: u64,
    pub disk_in_mb: u64,
    #[serde(default)]
    pub log_rate_limit_in_bytes_per_second: i64,
    pub health_check: ProcessHealthCheck,
    #[serde(rename = "readiness_health_check", default)]
    pub readiness_check: ProcessReadinessCheck,
    pub relationships: ProcessRelationships,
    pub metadata: Option<Metadata>,
    #[serde(flatten)]
    pub resource: Resource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRelationships {
    pub app: ToOneRelationship,
    #[serde(default)]
    pub revision: ToOneRelationship,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessHealthCheck {
    /// `http`, `port` or `process`.
    #[serde(rename = "type")]
    pub check_type: String,
    #[serde(default)]
    pub data: ProcessHealthCheckData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessHealthCheckData {
    /// Seconds health checks may fail before the process is restarted.
    #[serde(default)]
    pub timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Only present for `http` checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReadinessCheck {
    #[serde(rename = "type")]
    pub check_type: String,
    #[serde(default)]
    pub data: ProcessReadinessCheckData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReadinessCheckData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Body for `PATCH /v3/processes/:guid`.
///
/// `command` is always sent; `None` serializes as `null` and reverts to the
/// detected start command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessUpdate {
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<ProcessHealthCheck>,
    #[serde(
        rename = "readiness_health_check",
        skip_serializing_if = "Option::is_none"
    )]
    pub readiness_check: Option<ProcessReadinessCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ProcessUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn health_check_mut(&mut self) -> &mut ProcessHealthCheck {
        self.health_check.get_or_insert_with(Default::default)
    }

    fn readiness_check_mut(&mut self) -> &mut ProcessReadinessCheck {
        self.readiness_check.get_or_insert_with(Default::default)
    }

    pub fn with_health_check_type(mut self, check_type: impl Into<String>) -> Self {
        self.health_check_mut().check_type = check_type.into();
        self
    }

    pub fn with_health_check_timeout(mut self, timeout: u32) -> Self {
        self.health_check_mut().data.timeout = Some(timeout);
        self
    }

    pub fn with_health_check_invocation_timeout(mut self, timeout: u32) -> Self {
        self.health_check_mut().data.invocation_timeout = Some(timeout);
        self
    }

    pub fn with_health_check_interval(mut self, interval: u32) -> Self {
        self.health_check_mut().data.interval = Some(interval);
        self
    }

    pub fn with_health_check_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.health_check_mut().data.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_readiness_check_type(mut self, check_type: impl Into<String>) -> Self {
        self.readiness_check_mut().check_type = check_type.into();
        self
    }

    pub fn with_readiness_check_invocation_timeout(mut self, timeout: u32) -> Self {
        self.readiness_check_mut().data.invocation_timeout = Some(timeout);
        self
    }

    pub fn with_readiness_check_interval(mut self, interval: u32) -> Self {
        self.readiness_check_mut().data.interval = Some(interval);
        self
    }

    pub fn with_readiness_check_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.readiness_check_mut().data.endpoint = Some(endpoint.into());
        self
    }
}

/// Body for `POST /v3/processes/:guid/actions/scale`. Unset fields are left as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessScale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_in_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_in_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_rate_limit_in_bytes_per_second: Option<i64>,
}

impl ProcessScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instances(mut self, count: u32) -> Self {
        self.instances = Some(count);
        self
    }

    pub fn with_memory_in_mb(mut self, mb: u64) -> Self {
        self.memory_in_mb = Some(mb);
        self
    }

    pub fn with_disk_in_mb(mut self, mb: u64) -> Self {
        self.disk_in_mb = Some(mb);
        self
    }

    pub fn with_log_rate_limit_in_bytes_per_second(mut self, rate: i64) -> Self {
        self.log_rate_limit_in_bytes_per_second = Some(rate);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessStats {
    #[serde(rename = "resources")]
    pub stats: Vec<ProcessStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStat {
    #[serde(rename = "type")]
    pub process_type: String,
    /// Zero-based index of the running instance.
    pub index: u32,
    /// RUNNING, CRASHED, STARTING or DOWN.
    pub state: String,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub instance_ports: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub uptime: u64,
    #[serde(rename = "mem_quota", default)]
    pub memory_quota: Option<u64>,
    #[serde(default)]
    pub disk_quota: Option<u64>,
    #[serde(rename = "fds_quota", default)]
    pub file_descriptor_quota: Option<u64>,
    #[serde(default)]
    pub isolation_segment: Option<String>,
    /// Placement errors, if any.
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub time: DateTime<Utc>,
    pub cpu: f64,
    #[serde(default)]
    pub cpu_entitlement: f64,
    #[serde(rename = "mem")]
    pub memory: u64,
    pub disk: u64,
    #[serde(default)]
    pub log_rate: u64,
}
