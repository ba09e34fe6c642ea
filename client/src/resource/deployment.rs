use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AppRelationship, Metadata, Relationship, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub status: DeploymentStatus,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub droplet: Option<Relationship>,
    #[serde(default)]
    pub previous_droplet: Option<Relationship>,
    #[serde(default)]
    pub new_processes: Vec<ProcessReference>,
    #[serde(default)]
    pub revision: Option<DeploymentRevision>,
    pub metadata: Option<Metadata>,
    pub relationships: AppRelationship,
    #[serde(flatten)]
    pub resource: Resource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    pub value: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRevision {
    pub guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReference {
    pub guid: String,
    #[serde(rename = "type")]
    pub process_type: String,
}

/// Create a deployment for an app. With neither droplet nor revision set the
/// server deploys the app's current droplet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentCreate {
    pub relationships: AppRelationship,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub droplet: Option<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<DeploymentRevision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl DeploymentCreate {
    pub fn new(app_guid: impl Into<String>) -> Self {
        Self {
            relationships: AppRelationship::for_app(app_guid),
            ..Default::default()
        }
    }

    pub fn with_droplet(mut self, droplet_guid: impl Into<String>) -> Self {
        self.droplet = Some(Relationship::new(droplet_guid));
        self
    }

    pub fn with_revision(mut self, revision_guid: impl Into<String>) -> Self {
        self.revision = Some(DeploymentRevision {
            guid: revision_guid.into(),
            version: None,
        });
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentUpdate {
    pub metadata: Option<Metadata>,
}
