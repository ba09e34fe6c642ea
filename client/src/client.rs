use std::collections::HashSet;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, AUTHORIZATION, LOCATION};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::query::QueryValues;
use crate::resource::ListResponse;
use crate::services::{BuildClient, DeploymentClient, ProcessClient};

/// Client for the V3 API. Issues exactly one HTTP request per call.
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    per_page: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

/// Turn a V3 `{"errors": [...]}` body into `title: detail; ...`, or return the raw body.
fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.title, e.detail))
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.to_string(),
    }
}

/// GUID of the async job referenced by a `Location: .../v3/jobs/<guid>` header.
fn job_guid(headers: &HeaderMap) -> Option<String> {
    let location = headers.get(LOCATION)?.to_str().ok()?;
    let (_, guid) = location.trim_end_matches('/').rsplit_once("/jobs/")?;
    Some(guid.to_string())
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.endpoint().to_string(),
            token: config.token.clone(),
            per_page: config.per_page,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn builds(&self) -> BuildClient<'_> {
        BuildClient::new(self)
    }

    pub fn deployments(&self) -> DeploymentClient<'_> {
        DeploymentClient::new(self)
    }

    pub fn processes(&self) -> ProcessClient<'_> {
        ProcessClient::new(self)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("bearer {}", token)),
            None => builder,
        }
    }

    /// Send the request and return headers and body of a 2xx response.
    async fn execute(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
    ) -> Result<(HeaderMap, String)> {
        tracing::debug!("{} {}", method, path);

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to {} {}", method, path))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            bail!(
                "HTTP {} for {} {}: {}",
                status,
                method,
                path,
                describe_error_body(&body)
            );
        }

        Ok((headers, body))
    }

    fn decode<T: DeserializeOwned>(method: &Method, path: &str, body: &str) -> Result<T> {
        serde_json::from_str(body).with_context(|| {
            format!(
                "Failed to deserialize response from {} {}: {}",
                method, path, body
            )
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &QueryValues::new()).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryValues,
    ) -> Result<T> {
        let url = if query.is_empty() {
            format!("{}{}", self.endpoint, path)
        } else {
            format!("{}{}?{}", self.endpoint, path, query.encode())
        };
        let builder = self.request(Method::GET, &url);
        let (_, body) = self.execute(builder, &Method::GET, path).await?;
        Self::decode(&Method::GET, path, &body)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.endpoint, path);
        let builder = self.request(Method::POST, &url).json(body);
        let (_, response_body) = self.execute(builder, &Method::POST, path).await?;
        Self::decode(&Method::POST, path, &response_body)
    }

    /// POST without a request body, ignoring any response body.
    pub(crate) async fn post_action(&self, path: &str) -> Result<()> {
        let url = format!("{}{}", self.endpoint, path);
        let builder = self.request(Method::POST, &url);
        self.execute(builder, &Method::POST, path).await?;
        Ok(())
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.endpoint, path);
        let builder = self.request(Method::PATCH, &url).json(body);
        let (_, response_body) = self.execute(builder, &Method::PATCH, path).await?;
        Self::decode(&Method::PATCH, path, &response_body)
    }

    /// DELETE; returns the job GUID when the server answers with an async job.
    pub(crate) async fn delete(&self, path: &str) -> Result<Option<String>> {
        let url = format!("{}{}", self.endpoint, path);
        let builder = self.request(Method::DELETE, &url);
        let (headers, _) = self.execute(builder, &Method::DELETE, path).await?;
        Ok(job_guid(&headers))
    }

    /// Fetch one page of `path`, filling in the configured page size if unset.
    pub(crate) async fn list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryValues,
    ) -> Result<ListResponse<T>> {
        let mut query = query.clone();
        if !query.contains("per_page") {
            query.add("per_page", self.per_page.to_string());
        }
        self.get_with_query(path, &query).await
    }

    /// Fetch every page of `path`, following `pagination.next` links in order.
    pub(crate) async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryValues,
    ) -> Result<Vec<T>> {
        let mut page: ListResponse<T> = self.list_page(path, query).await?;
        let total = page.pagination.total_results;
        let mut resources = std::mem::take(&mut page.resources);
        let mut seen = HashSet::new();

        while let Some(next) = page.pagination.next.take() {
            if !seen.insert(next.href.clone()) {
                bail!(
                    "Pagination loop on {}: next link {} was already fetched",
                    path,
                    next.href
                );
            }
            tracing::debug!(
                "Fetched {}/{} resources from {}, following {}",
                resources.len(),
                total,
                path,
                next.href
            );
            let builder = self.request(Method::GET, &next.href);
            let (_, body) = self.execute(builder, &Method::GET, &next.href).await?;
            page = Self::decode(&Method::GET, &next.href, &body)?;
            resources.append(&mut page.resources);
        }

        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::paged_body;
    use mockito::{Matcher, Server};
    use reqwest::header::HeaderValue;
    use serde_json::Value;

    fn test_client(server_url: &str) -> Client {
        Client::new(&ClientConfig::new(server_url).with_token("test-token")).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(Client::new(&ClientConfig::new("ftp://example.org")).is_err());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = Client::new(&ClientConfig::new("https://api.example.org/")).unwrap();
        assert_eq!(client.endpoint(), "https://api.example.org");
    }

    #[test]
    fn test_job_guid_from_location() {
        let mut headers = HeaderMap::new();
        assert_eq!(job_guid(&headers), None);
        headers.insert(
            LOCATION,
            HeaderValue::from_static(
                "https://api.example.org/v3/jobs/af5c57f6-8769-41fa-a499-2c84ed896788",
            ),
        );
        assert_eq!(
            job_guid(&headers).as_deref(),
            Some("af5c57f6-8769-41fa-a499-2c84ed896788")
        );
    }

    #[test]
    fn test_describe_error_body() {
        let body = r#"{"errors":[{"code":10010,"title":"CF-ResourceNotFound","detail":"Build not found"}]}"#;
        assert_eq!(
            describe_error_body(body),
            "CF-ResourceNotFound: Build not found"
        );
        assert_eq!(describe_error_body("gateway timeout"), "gateway timeout");
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v3/info")
            .match_header("authorization", "bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"cf"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let info: Value = client.get("/v3/info").await.unwrap();
        assert_eq!(info["name"], "cf");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_includes_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/builds/missing")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"errors":[{"code":10010,"title":"CF-ResourceNotFound","detail":"Build not found"}]}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .get::<Value>("/v3/builds/missing")
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("404"));
        assert!(err.contains("GET /v3/builds/missing"));
        assert!(err.contains("CF-ResourceNotFound: Build not found"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/info")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.get::<Value>("/v3/info").await.unwrap_err();
        assert!(err.to_string().contains("Failed to deserialize response"));
    }

    #[tokio::test]
    async fn test_list_page_adds_default_per_page() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v3/things")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("names".into(), "a,b".into()),
                Matcher::UrlEncoded("per_page".into(), "50".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(paged_body(&[r#"{"n":1}"#], None))
            .create_async()
            .await;

        let mut query = QueryValues::new();
        query.add("names", "a,b");
        let client = test_client(&server.url());
        let page: ListResponse<Value> = client.list_page("/v3/things", &query).await.unwrap();
        assert_eq!(page.resources.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_all_follows_next_links() {
        let mut server = Server::new_async().await;
        let next = format!("{}/v3/things?page=2&per_page=1", server.url());
        let first = server
            .mock("GET", "/v3/things")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(paged_body(&[r#"{"n":1}"#], Some(&next)))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/v3/things")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .match_header("authorization", "bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(paged_body(&[r#"{"n":2}"#, r#"{"n":3}"#], None))
            .create_async()
            .await;

        let mut query = QueryValues::new();
        query.add("page", "1");
        query.add("per_page", "1");
        let client = test_client(&server.url());
        let all: Vec<Value> = client.list_all("/v3/things", &query).await.unwrap();
        let ns: Vec<i64> = all.iter().map(|v| v["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![1, 2, 3]);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_string_matches_encode() {
        let mut server = Server::new_async().await;
        let mut query = QueryValues::new();
        query.add("label_selector", "env in (prod,dev)");
        query.add("per_page", "2");
        let mock = server
            .mock("GET", "/v3/things")
            .match_query(Matcher::Exact(query.encode()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(paged_body(&[r#"{"n":1}"#], None))
            .create_async()
            .await;

        let client = test_client(&server.url());
        let page: ListResponse<Value> = client.list_page("/v3/things", &query).await.unwrap();
        assert_eq!(page.resources.len(), 1);
        assert_eq!(
            query.encode(),
            "label_selector=env%20in%20%28prod%2Cdev%29&per_page=2"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_all_stops_on_repeated_next_link() {
        let mut server = Server::new_async().await;
        let next = format!("{}/v3/things?page=2", server.url());
        let _first = server
            .mock("GET", "/v3/things")
            .match_query(Matcher::UrlEncoded("per_page".into(), "50".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(paged_body(&[r#"{"n":1}"#], Some(&next)))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/v3/things")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(paged_body(&[r#"{"n":2}"#], Some(&next)))
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .list_all::<Value>("/v3/things", &QueryValues::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Pagination loop"));
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_returns_job_guid() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/v3/things/abc")
            .with_status(202)
            .with_header(
                "location",
                "https://api.example.org/v3/jobs/af5c57f6-8769-41fa-a499-2c84ed896788",
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let job = client.delete("/v3/things/abc").await.unwrap();
        assert_eq!(job.as_deref(), Some("af5c57f6-8769-41fa-a499-2c84ed896788"));
    }
}
