use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AppRelationship, Lifecycle, Metadata, Relationship, Resource};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildState {
    Staging,
    Staged,
    Failed,
}

impl BuildState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildState::Staging => "STAGING",
            BuildState::Staged => "STAGED",
            BuildState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub state: BuildState,
    pub error: Option<String>,
    #[serde(default)]
    pub staging_memory_in_mb: u64,
    #[serde(default)]
    pub staging_disk_in_mb: u64,
    #[serde(default)]
    pub staging_log_rate_limit_bytes_per_second: i64,
    pub lifecycle: Lifecycle,
    pub package: Relationship,
    pub droplet: Option<Relationship>,
    pub created_by: CreatedBy,
    pub relationships: AppRelationship,
    pub metadata: Option<Metadata>,
    #[serde(flatten)]
    pub resource: Resource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBy {
    pub guid: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCreate {
    pub package: Relationship,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Lifecycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_memory_in_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_disk_in_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_log_rate_limit_bytes_per_second: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl BuildCreate {
    pub fn new(package_guid: impl Into<String>) -> Self {
        Self {
            package: Relationship::new(package_guid),
            ..Default::default()
        }
    }

    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn with_staging_memory_in_mb(mut self, mb: u64) -> Self {
        self.staging_memory_in_mb = Some(mb);
        self
    }

    pub fn with_staging_disk_in_mb(mut self, mb: u64) -> Self {
        self.staging_disk_in_mb = Some(mb);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Lifecycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<BuildState>,
}

impl BuildUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_state(mut self, state: BuildState) -> Self {
        self.state = Some(state);
        self
    }
}
