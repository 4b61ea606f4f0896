// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! HTTP(S) agent client built on `reqwest`.
//!
//! One `reqwest::Client` (and so one connection pool) is shared by every
//! agent of a run. Failures are classified into [`TransportError`] and logged
//! here, once, with the level their class deserves.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{
    AgentInfo, ProcessingRequest, ProcessingResponse, Processor, ProcessorsRequest,
    ProcessorsResponse,
};
use crate::config::ResolvedSettings;
use crate::errors::TransportError;
use crate::observability::messages::transport::{ProcessorSkipped, RequestSent, TransportFailure};
use crate::observability::messages::StructuredLog;
use crate::traits::Agent;

const BODY_PREVIEW_LIMIT: usize = 256;

/// `/processors` body decoded one processor at a time, so a definition this
/// client cannot read only costs that processor.
#[derive(Debug, Deserialize)]
struct ProcessorListing {
    #[serde(default)]
    processors: Vec<Value>,
}

impl ProcessorListing {
    fn into_response(self, agent: &str) -> ProcessorsResponse {
        let processors = self
            .processors
            .into_iter()
            .filter_map(|raw| {
                let name = raw
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("<unnamed>")
                    .to_string();
                match serde_json::from_value::<Processor>(raw) {
                    Ok(processor) => Some(processor),
                    Err(error) => {
                        ProcessorSkipped {
                            agent,
                            processor: &name,
                            error: &error,
                        }
                        .log();
                        None
                    }
                }
            })
            .collect();
        ProcessorsResponse { processors }
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Clone)]
pub struct HttpAgent {
    base_url: String,
    http: reqwest::Client,
    credentials: Option<Credentials>,
}

impl HttpAgent {
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            credentials: None,
        }
    }

    /// Send HTTP basic auth with every request.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Build one agent per configured base URL, sharing a single client.
    pub fn from_settings(settings: &ResolvedSettings) -> Result<Vec<Arc<dyn Agent>>, TransportError> {
        let http = build_client(settings.timeout)?;
        Ok(settings
            .agents
            .iter()
            .map(|url| {
                let agent = HttpAgent::new(url.clone(), http.clone());
                let agent = match &settings.password {
                    Some(password) => agent.with_basic_auth(settings.username.clone(), password.clone()),
                    None => agent,
                };
                Arc::new(agent) as Arc<dyn Agent>
            })
            .collect())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(c) => req.basic_auth(&c.username, Some(&c.password)),
            None => req,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = self.endpoint(path);
        RequestSent { method: "GET", url: &url }.log();
        let req = self.authorize(self.http.get(&url));
        self.send(req, &url).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let url = self.endpoint(path);
        RequestSent { method: "POST", url: &url }.log();
        let req = self.authorize(self.http.post(&url).json(body));
        self.send(req, &url).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<T, TransportError> {
        let result = self.exchange(req, url).await;
        if let Err(error) = &result {
            TransportFailure { error }.log();
        }
        result
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<T, TransportError> {
        let resp = req.send().await.map_err(|err| classify(err, url))?;
        let status = resp.status();

        if !status.is_success() {
            return Err(TransportError::Status {
                url: self.base_url.clone(),
                code: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        let body = resp.text().await.map_err(|err| classify(err, url))?;
        serde_json::from_str(&body).map_err(|err| TransportError::Decode {
            url: url.to_string(),
            message: format!("{} | body={}", err, preview_body(&body)),
        })
    }
}

#[async_trait]
impl Agent for HttpAgent {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn info(&self) -> Result<AgentInfo, TransportError> {
        self.get("info").await
    }

    async fn processors(&self, search: Option<&str>) -> Result<ProcessorsResponse, TransportError> {
        let body = ProcessorsRequest {
            search: search.map(str::to_string),
        };
        let listing: ProcessorListing = self.post("processors", &body).await?;
        Ok(listing.into_response(&self.base_url))
    }

    async fn process(&self, processor: &Processor) -> Result<ProcessingResponse, TransportError> {
        let body = ProcessingRequest {
            processor: processor.clone(),
        };
        self.post("process", &body).await
    }
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, TransportError> {
    let builder = reqwest::Client::builder();
    let builder = match timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };
    builder.build().map_err(|err| TransportError::Client {
        message: err.to_string(),
    })
}

fn classify(err: reqwest::Error, url: &str) -> TransportError {
    let url = url.to_string();
    let message = err.to_string();
    if err.is_timeout() {
        TransportError::Timeout { url }
    } else if err.is_connect() {
        TransportError::Unreachable { url, message }
    } else if err.is_decode() {
        TransportError::Decode { url, message }
    } else {
        TransportError::Disconnected { url, message }
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut preview: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ArgKind, ProcessorArg};
    use mockito::{Matcher, Server};

    fn client() -> reqwest::Client {
        build_client(Some(Duration::from_secs(2))).unwrap()
    }

    #[tokio::test]
    async fn test_processors_sends_search_and_decodes() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/processors")
            .match_body(Matcher::Json(serde_json::json!({ "search": "tar" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"processors": [{"name": "untar", "docstring": "Unpack.", "args": [{"name": "archive", "type": "path", "required": true}]}]}"#,
            )
            .create_async()
            .await;

        let agent = HttpAgent::new(server.url(), client());
        let resp = agent.processors(Some("tar")).await.unwrap();

        assert_eq!(resp.processors.len(), 1);
        assert_eq!(resp.processors[0].name, "untar");
        assert_eq!(resp.processors[0].args[0].kind, ArgKind::Path);
    }

    #[tokio::test]
    async fn test_unreadable_processor_does_not_hide_the_others() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/processors")
            .with_status(200)
            .with_body(
                r#"{"processors": [
                    {"name": "untar", "docstring": "Unpack.", "args": [{"name": "archive", "type": "path", "required": true}]},
                    {"name": "hash", "docstring": "Digest.", "args": [{"name": "files", "type": "list"}]},
                    {"docstring": "No name at all."}
                ]}"#,
            )
            .create_async()
            .await;

        let agent = HttpAgent::new(server.url(), client());
        let resp = agent.processors(None).await.unwrap();
        let names: Vec<&str> = resp.processors.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["untar"]);

        let agents: Vec<Arc<dyn Agent>> = vec![Arc::new(agent)];
        let catalog = crate::engine::ProcessorCatalog::build(&agents).await;
        assert!(catalog.contains("untar"));
        assert!(!catalog.contains("hash"));
        assert_eq!(catalog.selector("untar").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_process_posts_bound_processor() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/process")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(serde_json::json!({ "processor": { "name": "untar" } })),
                Matcher::Regex(r#""value":"/a.tar""#.to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"result": {"status": true, "files": 3}}"#)
            .create_async()
            .await;

        let mut processor = Processor::new(
            "untar",
            "",
            vec![ProcessorArg::new("archive", ArgKind::Path, true)],
        );
        processor.get_arg_mut("archive").unwrap().set_value("/a.tar").unwrap();

        let agent = HttpAgent::new(format!("{}/", server.url()), client());
        let resp = agent.process(&processor).await.unwrap();

        assert!(resp.result.status);
        assert_eq!(resp.result.details["files"], 3);
    }

    #[tokio::test]
    async fn test_basic_auth_header_is_sent() {
        let mut server = Server::new_async().await;
        // "user:secret" in base64
        let _m = server
            .mock("GET", "/info")
            .match_header("authorization", "Basic dXNlcjpzZWNyZXQ=")
            .with_status(200)
            .with_body(r#"{"version": "1.0"}"#)
            .create_async()
            .await;

        let agent = HttpAgent::new(server.url(), client()).with_basic_auth("user", "secret");
        let info = agent.info().await.unwrap();
        assert_eq!(info["version"], "1.0");
    }

    #[tokio::test]
    async fn test_non_success_status_is_classified() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/process")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let agent = HttpAgent::new(server.url(), client());
        let processor = Processor::new("p", "", vec![]);
        let err = agent.process(&processor).await.unwrap_err();

        match err {
            TransportError::Status { code, url, .. } => {
                assert_eq!(code, 503);
                assert_eq!(url, server.url());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_garbage_body_is_a_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/info")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let agent = HttpAgent::new(server.url(), client());
        let err = agent.info().await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let agent = HttpAgent::new(format!("http://127.0.0.1:{}", port), client());

        let err = agent.info().await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Unreachable { .. } | TransportError::Timeout { .. }
        ));
    }

    #[test]
    fn test_from_settings_builds_one_agent_per_url() {
        let settings = ResolvedSettings {
            agents: vec!["http://a:1".to_string(), "http://b:1".to_string()],
            username: "user".to_string(),
            password: None,
            timeout: None,
            worker_count: 2,
        };
        let agents = HttpAgent::from_settings(&settings).unwrap();
        let urls: Vec<&str> = agents.iter().map(|a| a.base_url()).collect();
        assert_eq!(urls, vec!["http://a:1", "http://b:1"]);
    }

    #[test]
    fn test_preview_body_truncates() {
        assert_eq!(preview_body("  "), "<empty body>");
        let preview = preview_body(&"a".repeat(BODY_PREVIEW_LIMIT + 10));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.len(), BODY_PREVIEW_LIMIT + 3);
    }
}
