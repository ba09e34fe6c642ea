use anyhow::Result;

use crate::client::Client;
use crate::options::{BuildListOptions, ListQuery};
use crate::resource::{Build, BuildCreate, BuildUpdate, ListResponse};

pub struct BuildClient<'a> {
    client: &'a Client,
}

impl<'a> BuildClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, guid: &str) -> Result<Build> {
        self.client.get(&format!("/v3/builds/{}", guid)).await
    }

    /// One page of builds matching `opts`.
    pub async fn list(&self, opts: &BuildListOptions) -> Result<ListResponse<Build>> {
        self.client
            .list_page("/v3/builds", &opts.to_query_values()?)
            .await
    }

    /// Every build matching `opts`, across all pages.
    pub async fn list_all(&self, opts: &BuildListOptions) -> Result<Vec<Build>> {
        self.client
            .list_all("/v3/builds", &opts.to_query_values()?)
            .await
    }

    /// One page of builds for an app. `opts.app_guids` is ignored by the server here.
    pub async fn list_for_app(
        &self,
        app_guid: &str,
        opts: &BuildListOptions,
    ) -> Result<ListResponse<Build>> {
        self.client
            .list_page(
                &format!("/v3/apps/{}/builds", app_guid),
                &opts.to_query_values()?,
            )
            .await
    }

    /// Stage a package.
    pub async fn create(&self, build: &BuildCreate) -> Result<Build> {
        self.client.post("/v3/builds", build).await
    }

    pub async fn update(&self, guid: &str, update: &BuildUpdate) -> Result<Build> {
        self.client
            .patch(&format!("/v3/builds/{}", guid), update)
            .await
    }
}
