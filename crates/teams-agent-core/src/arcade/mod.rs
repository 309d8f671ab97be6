//! Arcade platform client
//!
//! Arcade hosts the Microsoft Teams tools, runs them on behalf of a user and
//! brokers the OAuth grants they need. This module wraps the small part of
//! its HTTP API the agent uses:
//!
//! - `GET  /v1/tools`            list a toolkit's tool definitions
//! - `GET  /v1/tools/{name}`     fetch one tool definition
//! - `POST /v1/tools/authorize`  start (or check) the OAuth grant for a tool
//! - `GET  /v1/auth/status`      long-poll an authorization
//! - `POST /v1/tools/execute`    run a tool

mod types;

pub use types::{
    AuthorizationResponse, AuthorizationStatus, ExecuteToolResponse, ToolCallError, ToolCallOutput,
    ToolDefinition, ToolInput, ToolList, ToolParameter, ToolRequirements, ToolkitInfo, ValueSchema,
};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::config::ArcadeConfig;
use crate::error::{Error, Result};
use types::{AuthorizeToolRequest, ExecuteToolRequest};

/// Seconds the platform may hold an auth status request open
const AUTH_STATUS_WAIT_SECS: u64 = 59;

/// Shortest time between two auth status requests
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Runs tools and checks their authorization on the platform
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Check (and start if needed) the user's authorization for a tool
    async fn authorize(&self, tool_name: &str, user_id: &str) -> Result<AuthorizationResponse>;

    /// Execute a tool with the given input
    async fn execute(&self, tool_name: &str, input: Value, user_id: &str) -> Result<ExecuteToolResponse>;
}

/// Blocks until a pending authorization reaches a final state
#[async_trait]
pub trait AuthWaiter: Send + Sync {
    async fn wait_for_completion(&self, authorization_id: &str) -> Result<AuthorizationResponse>;
}

/// HTTP client for the Arcade API
#[derive(Clone)]
pub struct ArcadeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ArcadeClient {
    /// Request timeout; must outlast the auth status long-poll
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(config: &ArcadeConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid Arcade base URL '{}': {}", config.base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.bearer_auth(&self.api_key).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Arcade {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(response.json().await?)
    }

    /// List the tools of one toolkit
    pub async fn list_tools(&self, toolkit: &str, limit: usize, user_id: &str) -> Result<Vec<ToolDefinition>> {
        debug!(toolkit, limit = limit, "Listing Arcade tools");
        let limit = limit.to_string();
        let request = self.http.get(self.endpoint("v1/tools")).query(&[
            ("toolkit", toolkit),
            ("limit", limit.as_str()),
            ("user_id", user_id),
        ]);
        let page: ToolList = self.send(request).await?;
        Ok(page.items)
    }

    /// Fetch a single tool by qualified name (`Toolkit.Tool`)
    pub async fn get_tool(&self, name: &str, user_id: &str) -> Result<ToolDefinition> {
        debug!(tool = name, "Fetching Arcade tool");
        let request = self
            .http
            .get(self.endpoint(&format!("v1/tools/{}", name)))
            .query(&[("user_id", user_id)]);
        self.send(request).await
    }

    /// Start or check the authorization a tool needs
    pub async fn authorize(&self, tool_name: &str, user_id: &str) -> Result<AuthorizationResponse> {
        let request = self
            .http
            .post(self.endpoint("v1/tools/authorize"))
            .json(&AuthorizeToolRequest { tool_name, user_id });
        let response: AuthorizationResponse = self.send(request).await?;
        debug!(tool = tool_name, status = ?response.status, "Authorization checked");
        Ok(response)
    }

    /// Current status of an authorization, optionally long-polling for `wait` seconds
    pub async fn auth_status(&self, authorization_id: &str, wait: Option<u64>) -> Result<AuthorizationResponse> {
        let mut query = vec![("id", authorization_id.to_string())];
        if let Some(wait) = wait {
            query.push(("wait", wait.to_string()));
        }
        let request = self.http.get(self.endpoint("v1/auth/status")).query(&query);
        self.send(request).await
    }

    /// Long-poll until the authorization completes
    ///
    /// `failed` and any status other than `pending` end the wait with an
    /// error. A pending answer returned early is followed by a short pause
    /// before the next poll.
    pub async fn wait_for_completion(&self, authorization_id: &str) -> Result<AuthorizationResponse> {
        loop {
            let started = Instant::now();
            let response = self.auth_status(authorization_id, Some(AUTH_STATUS_WAIT_SECS)).await?;
            match response.status {
                AuthorizationStatus::Completed => {
                    info!(authorization_id, "Authorization completed");
                    return Ok(response);
                }
                AuthorizationStatus::Pending => {
                    debug!(authorization_id, "Authorization still pending");
                    let elapsed = started.elapsed();
                    if elapsed < MIN_POLL_INTERVAL {
                        tokio::time::sleep(MIN_POLL_INTERVAL - elapsed).await;
                    }
                }
                AuthorizationStatus::Failed => {
                    return Err(Error::Authorization(format!(
                        "authorization {} failed",
                        authorization_id
                    )));
                }
                status => {
                    return Err(Error::Authorization(format!(
                        "authorization {} ended with status {:?}",
                        authorization_id, status
                    )));
                }
            }
        }
    }

    /// Execute a tool on behalf of the user
    pub async fn execute(&self, tool_name: &str, input: Value, user_id: &str) -> Result<ExecuteToolResponse> {
        debug!(tool = tool_name, "Executing Arcade tool");
        let request = self.http.post(self.endpoint("v1/tools/execute")).json(&ExecuteToolRequest {
            tool_name,
            input: &input,
            user_id,
        });
        self.send(request).await
    }
}

#[async_trait]
impl ToolExecutor for ArcadeClient {
    async fn authorize(&self, tool_name: &str, user_id: &str) -> Result<AuthorizationResponse> {
        ArcadeClient::authorize(self, tool_name, user_id).await
    }

    async fn execute(&self, tool_name: &str, input: Value, user_id: &str) -> Result<ExecuteToolResponse> {
        ArcadeClient::execute(self, tool_name, input, user_id).await
    }
}

#[async_trait]
impl AuthWaiter for ArcadeClient {
    async fn wait_for_completion(&self, authorization_id: &str) -> Result<AuthorizationResponse> {
        ArcadeClient::wait_for_completion(self, authorization_id).await
    }
}

/// Pull a readable message out of an error body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
