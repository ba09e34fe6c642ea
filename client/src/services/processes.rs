use anyhow::Result;

use crate::client::Client;
use crate::options::{ListQuery, ProcessListOptions};
use crate::resource::{ListResponse, Process, ProcessScale, ProcessStats, ProcessUpdate};

pub struct ProcessClient<'a> {
    client: &'a Client,
}

impl<'a> ProcessClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, guid: &str) -> Result<Process> {
        self.client.get(&format!("/v3/processes/{}", guid)).await
    }

    pub async fn list(&self, opts: &ProcessListOptions) -> Result<ListResponse<Process>> {
        self.client
            .list_page("/v3/processes", &opts.to_query_values()?)
            .await
    }

    pub async fn list_all(&self, opts: &ProcessListOptions) -> Result<Vec<Process>> {
        self.client
            .list_all("/v3/processes", &opts.to_query_values()?)
            .await
    }

    pub async fn list_for_app(
        &self,
        app_guid: &str,
        opts: &ProcessListOptions,
    ) -> Result<ListResponse<Process>> {
        self.client
            .list_page(
                &format!("/v3/apps/{}/processes", app_guid),
                &opts.to_query_values()?,
            )
            .await
    }

    pub async fn update(&self, guid: &str, update: &ProcessUpdate) -> Result<Process> {
        self.client
            .patch(&format!("/v3/processes/{}", guid), update)
            .await
    }

    pub async fn scale(&self, guid: &str, scale: &ProcessScale) -> Result<Process> {
        tracing::info!("Scaling process {}: {:?}", guid, scale);
        self.client
            .post(&format!("/v3/processes/{}/actions/scale", guid), scale)
            .await
    }

    /// Per-instance runtime stats.
    pub async fn stats(&self, guid: &str) -> Result<ProcessStats> {
        self.client
            .get(&format!("/v3/processes/{}/stats", guid))
            .await
    }

    /// Stop one instance; the platform restarts it.
    pub async fn terminate_instance(&self, guid: &str, index: u32) -> Result<()> {
        self.client
            .delete(&format!("/v3/processes/{}/instances/{}", guid, index))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ClientConfig;
    use crate::resource::{ProcessScale, ProcessUpdate};
    use crate::test_fixtures::{paged_body, process_json};
    use crate::{Client, ProcessListOptions};
    use mockito::{Matcher, Server};

    fn test_client(server_url: &str) -> Client {
        Client::new(&ClientConfig::new(server_url)).unwrap()
    }

    #[tokio::test]
    async fn test_get_process() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/processes/p1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(process_json("p1", "web", 2))
            .create_async()
            .await;

        let process = test_client(&server.url())
            .processes()
            .get("p1")
            .await
            .unwrap();
        assert_eq!(process.process_type, "web");
        assert_eq!(process.instances, 2);
        assert_eq!(process.health_check.check_type, "port");
        assert_eq!(
            process.relationships.revision.guid(),
            Some("885735b5-aea4-4cf5-8e44-961af0e41920")
        );
    }

    #[tokio::test]
    async fn test_list_processes_for_app_with_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v3/apps/app-1/processes")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("types".into(), "web,worker".into()),
                Matcher::UrlEncoded("label_selector".into(), "team=payments".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(paged_body(
                &[process_json("p1", "web", 1), process_json("p2", "worker", 3)],
                None,
            ))
            .create_async()
            .await;

        let mut opts = ProcessListOptions::new();
        opts.types.equal_to(["web", "worker"]);
        opts.list.label_selector.equal_to("team", ["payments"]);
        let page = test_client(&server.url())
            .processes()
            .list_for_app("app-1", &opts)
            .await
            .unwrap();
        assert_eq!(page.resources.len(), 2);
        assert_eq!(page.resources[1].instances, 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_scale_process() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v3/processes/p1/actions/scale")
            .match_body(Matcher::Json(serde_json::json!({
                "instances": 5,
                "disk_in_mb": 2048
            })))
            .with_status(202)
            .with_header("content-type", "application/json")
            .with_body(process_json("p1", "web", 5))
            .create_async()
            .await;

        let scale = ProcessScale::new().with_instances(5).with_disk_in_mb(2048);
        let process = test_client(&server.url())
            .processes()
            .scale("p1", &scale)
            .await
            .unwrap();
        assert_eq!(process.instances, 5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_process_command() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/v3/processes/p1")
            .match_body(Matcher::Json(serde_json::json!({
                "command": "bundle exec rackup"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(process_json("p1", "web", 1))
            .create_async()
            .await;

        test_client(&server.url())
            .processes()
            .update("p1", &ProcessUpdate::new().with_command("bundle exec rackup"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_process_stats() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/processes/p1/stats")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"resources":[{"type":"web","index":0,"state":"RUNNING","usage":null,"host":"10.0.0.1","uptime":10},{"type":"web","index":1,"state":"CRASHED"}]}"#,
            )
            .create_async()
            .await;

        let stats = test_client(&server.url())
            .processes()
            .stats("p1")
            .await
            .unwrap();
        let states: Vec<_> = stats.stats.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(states, vec!["RUNNING", "CRASHED"]);
    }

    #[tokio::test]
    async fn test_terminate_instance() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/v3/processes/p1/instances/2")
            .with_status(204)
            .create_async()
            .await;

        test_client(&server.url())
            .processes()
            .terminate_instance("p1", 2)
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
