//! `AptosConnection` over the node REST API.

use crate::advanced::payloads::ViewRequest;
use crate::core::config::ClientConfig;
use crate::core::connection::AptosConnection;
use crate::error::{PermissionSdkError, Result};
use crate::types::{RawEvent, TransactionReceipt};
use crate::utils;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

// VM status code the node reports for a Move abort
const VM_ABORTED: u64 = 4016;

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    vm_error_code: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct LedgerInfo {
    ledger_timestamp: String,
}

#[derive(Debug, Deserialize)]
struct TransactionJson {
    #[serde(rename = "type")]
    kind: String,
    hash: String,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
    #[serde(default)]
    gas_used: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    events: Vec<RawEvent>,
}

/// REST client for one node endpoint
#[derive(Debug, Clone)]
pub struct RestConnection {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl RestConnection {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_client(
            config.node_url()?,
            config.api_key.clone(),
            reqwest::Client::new(),
        ))
    }

    pub fn with_client(base_url: impl Into<String>, api_key: Option<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn post_view(&self, request: &ViewRequest) -> Result<Vec<Value>> {
        let response = self
            .authorize(self.client.post(format!("{}/view", self.base_url)))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(map_http_error(status, &body, PermissionSdkError::ViewCall));
        }

        let values: Vec<Value> = serde_json::from_str(&body)?;
        Ok(values)
    }
}

/// Map a non-success response to the SDK taxonomy.
///
/// Aborts and server-side outages map the same for every endpoint. Any other
/// rejection is built by `rejected`.
fn map_http_error(
    status: StatusCode,
    body: &str,
    rejected: impl FnOnce(String) -> PermissionSdkError,
) -> PermissionSdkError {
    let api: Option<ApiError> = serde_json::from_str(body).ok();
    let message = api
        .as_ref()
        .map(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    let is_abort = api
        .as_ref()
        .and_then(|e| e.vm_error_code)
        .map_or(false, |code| code == VM_ABORTED)
        || message.to_ascii_lowercase().contains("move abort");

    if is_abort {
        return PermissionSdkError::ExecutionAbort {
            code: utils::parse_abort_code(&message),
            vm_status: message,
        };
    }

    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return PermissionSdkError::NetworkUnavailable(format!("{}: {}", status, message));
    }

    let code = api.and_then(|e| e.error_code).unwrap_or_default();
    rejected(format!("{} {}: {}", status, code, message))
}

fn parse_optional_u64(field: &str, value: Option<String>) -> Result<Option<u64>> {
    value
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| PermissionSdkError::ViewDecode(format!("invalid {}: {}", field, v)))
        })
        .transpose()
}

#[async_trait]
impl AptosConnection for RestConnection {
    async fn call_view(&self, request: &ViewRequest) -> Result<Vec<Value>> {
        debug!(function = %request.function, args = request.arguments.len(), "view call");

        // Transport failures and outages surface as view failures, like node rejections
        self.post_view(request).await.map_err(|err| match err {
            PermissionSdkError::NetworkUnavailable(m) => PermissionSdkError::ViewCall(m),
            other => other,
        })
    }

    async fn get_transaction(&self, hash: &str) -> Result<Option<TransactionReceipt>> {
        let response = self
            .authorize(
                self.client
                    .get(format!("{}/transactions/by_hash/{}", self.base_url, hash)),
            )
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(map_http_error(status, &body, PermissionSdkError::Submission));
        }

        let tx: TransactionJson = serde_json::from_str(&body)?;
        if tx.kind == "pending_transaction" {
            return Ok(None);
        }

        let vm_status = tx.vm_status.unwrap_or_default();
        let success = tx.success.unwrap_or(false);
        let abort_code = if success {
            None
        } else {
            utils::parse_abort_code(&vm_status)
        };

        Ok(Some(TransactionReceipt {
            hash: tx.hash,
            success,
            abort_code,
            vm_status,
            gas_used: parse_optional_u64("gas_used", tx.gas_used)?,
            version: parse_optional_u64("version", tx.version)?,
            events: tx.events,
        }))
    }

    async fn ledger_timestamp(&self) -> Result<u64> {
        let response = self
            .authorize(self.client.get(self.base_url.clone()))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(map_http_error(status, &body, PermissionSdkError::ViewCall));
        }

        let info: LedgerInfo = serde_json::from_str(&body)?;
        let micros = info.ledger_timestamp.parse::<u64>().map_err(|_| {
            PermissionSdkError::ViewDecode(format!("invalid ledger_timestamp: {}", info.ledger_timestamp))
        })?;
        Ok(micros / 1_000_000)
    }
}
