use serde_json::{json, Value};

use nexus_console_core::{ChainIdPort, PortError};

use crate::eip1193::{json_chain_id_to_u64, rpc_result};
use crate::NexusAdapterConfig;

/// Read-only JSON-RPC client for the configured public endpoint.
#[derive(Debug, Clone)]
pub struct PublicRpcAdapter {
    url: String,
    client: reqwest::Client,
}

impl PublicRpcAdapter {
    pub fn new(config: &NexusAdapterConfig) -> Result<Self, PortError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_millis(config.rpc_timeout_ms));
        let client = builder
            .build()
            .map_err(|e| PortError::Transport(format!("failed to build RPC client: {e}")))?;
        Ok(Self {
            url: config.public_rpc_url.clone(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("rpc request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Transport(format!("rpc status {status}")));
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("rpc json decode failed: {e}")))?;
        rpc_result(body)
    }
}

impl ChainIdPort for PublicRpcAdapter {
    async fn chain_id(&self) -> Result<u64, PortError> {
        let result = self.call("eth_chainId", json!([])).await?;
        let chain_id = json_chain_id_to_u64(&result)?;
        tracing::debug!(chain_id, url = %self.url, "public RPC chain id");
        Ok(chain_id)
    }
}
