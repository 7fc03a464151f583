pub mod types;

use crate::cli::ProbeRequest;
use crate::config::ProbeConfig;
use crate::error::ProbeError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use types::{RpcFault, RpcRequest};

/// JSON-RPC client for one cluster endpoint. Every call is a single POST with
/// no retry.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: Client,
    endpoint: String,
    host: String,
    username: String,
    password: String,
}

impl RpcClient {
    pub fn new(request: &ProbeRequest, cfg: &ProbeConfig) -> Result<Self, ProbeError> {
        let endpoint = format!(
            "https://{}:{}/json-rpc/{}",
            request.host, request.port, cfg.api_version
        );
        Self::with_endpoint(
            endpoint,
            &request.host,
            &request.username,
            &request.password,
            cfg.request_timeout(),
        )
    }

    pub fn with_endpoint(
        endpoint: String,
        host: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, ProbeError> {
        // Cluster management endpoints ship with self-signed certificates.
        let http = Client::builder()
            .user_agent(concat!("sfcheck/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()
            .map_err(ProbeError::Client)?;

        Ok(Self {
            http,
            endpoint,
            host: host.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, ProbeError> {
        let body = self.call_raw(method, params).await?;
        let payload = match body {
            Value::Object(mut map) if map.contains_key("result") => {
                map.remove("result").unwrap_or(Value::Null)
            }
            other => other,
        };

        serde_json::from_value(payload).map_err(|err| self.malformed(method, err.to_string()))
    }

    async fn call_raw(&self, method: &'static str, params: Value) -> Result<Value, ProbeError> {
        debug!(host = %self.host, method, "sending rpc request");
        let request = RpcRequest {
            method,
            params,
            id: 1,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(&request)
            .send()
            .await
            .map_err(|source| ProbeError::Transport {
                host: self.host.clone(),
                method,
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProbeError::HttpStatus {
                host: self.host.clone(),
                method,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ProbeError::Transport {
                host: self.host.clone(),
                method,
                source,
            })?;
        let body: Value =
            serde_json::from_slice(&bytes).map_err(|err| self.malformed(method, err.to_string()))?;

        if let Some(fault) = body.get("error").filter(|e| !e.is_null()) {
            let fault: RpcFault =
                serde_json::from_value(fault.clone()).unwrap_or_else(|_| RpcFault {
                    name: None,
                    message: Some(fault.to_string()),
                });
            let message = match (fault.name, fault.message) {
                (Some(name), Some(message)) => format!("{name}: {message}"),
                (Some(text), None) | (None, Some(text)) => text,
                (None, None) => "unspecified error".to_string(),
            };
            return Err(ProbeError::Api {
                host: self.host.clone(),
                method,
                message,
            });
        }

        debug!(host = %self.host, method, status = status.as_u16(), "rpc response received");
        Ok(body)
    }

    pub(crate) fn malformed(&self, method: &'static str, detail: String) -> ProbeError {
        ProbeError::MalformedResponse {
            host: self.host.clone(),
            method,
            detail,
        }
    }
}
