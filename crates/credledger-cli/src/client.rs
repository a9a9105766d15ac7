//! Thin HTTP client for the node's invoke/query API.

use serde::{Deserialize, Serialize};

/// Default node API endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:7051";

#[derive(Serialize)]
struct InvokeRequest<'a> {
    function: &'a str,
    args: &'a [String],
}

/// Successful reply from `/api/v1/invoke` or `/api/v1/query`.
#[derive(Debug, Deserialize)]
pub struct InvokeResult {
    pub tx_id: String,
    pub committed: bool,
    #[serde(default)]
    pub event: Option<String>,
    pub result: serde_json::Value,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

pub struct NodeClient {
    endpoint: String,
    http: reqwest::Client,
}

impl NodeClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Run a state-changing operation.
    pub async fn invoke(&self, function: &str, args: &[String]) -> anyhow::Result<InvokeResult> {
        self.call("/api/v1/invoke", function, args).await
    }

    /// Run a read-only operation.
    pub async fn query(&self, function: &str, args: &[String]) -> anyhow::Result<InvokeResult> {
        self.call("/api/v1/query", function, args).await
    }

    async fn call(&self, path: &str, function: &str, args: &[String]) -> anyhow::Result<InvokeResult> {
        let url = self.url(path);
        let resp = self
            .http
            .post(&url)
            .json(&InvokeRequest { function, args })
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("could not reach node at {}: {}", self.endpoint, e))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        if let Ok(err) = resp.json::<ErrorResponse>().await {
            anyhow::bail!("{} failed (HTTP {}, {}): {}", function, status, err.code, err.error);
        } else {
            anyhow::bail!("{} failed (HTTP {})", function, status);
        }
    }

    /// GET a JSON document from the node.
    pub async fn get_json(&self, path: &str) -> anyhow::Result<serde_json::Value> {
        let url = self.url(path);
        let resp = reqwest::get(&url)
            .await
            .map_err(|e| anyhow::anyhow!("could not reach node at {}: {}", self.endpoint, e))?;
        if !resp.status().is_success() {
            anyhow::bail!("node returned HTTP {}", resp.status());
        }
        Ok(resp.json().await?)
    }
}
