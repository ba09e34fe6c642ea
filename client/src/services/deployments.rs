use anyhow::Result;

use crate::client::Client;
use crate::options::{DeploymentListOptions, ListQuery};
use crate::resource::{Deployment, DeploymentCreate, DeploymentUpdate, ListResponse};

pub struct DeploymentClient<'a> {
    client: &'a Client,
}

impl<'a> DeploymentClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, guid: &str) -> Result<Deployment> {
        self.client.get(&format!("/v3/deployments/{}", guid)).await
    }

    pub async fn list(&self, opts: &DeploymentListOptions) -> Result<ListResponse<Deployment>> {
        self.client
            .list_page("/v3/deployments", &opts.to_query_values()?)
            .await
    }

    pub async fn list_all(&self, opts: &DeploymentListOptions) -> Result<Vec<Deployment>> {
        self.client
            .list_all("/v3/deployments", &opts.to_query_values()?)
            .await
    }

    pub async fn create(&self, deployment: &DeploymentCreate) -> Result<Deployment> {
        self.client.post("/v3/deployments", deployment).await
    }

    pub async fn update(&self, guid: &str, update: &DeploymentUpdate) -> Result<Deployment> {
        self.client
            .patch(&format!("/v3/deployments/{}", guid), update)
            .await
    }

    /// Stop an in-flight deployment and roll back to the previous droplet.
    pub async fn cancel(&self, guid: &str) -> Result<()> {
        tracing::info!("Cancelling deployment {}", guid);
        self.client
            .post_action(&format!("/v3/deployments/{}/actions/cancel", guid))
            .await
    }
}
