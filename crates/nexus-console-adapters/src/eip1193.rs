use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{address, Address};
use serde_json::Value;

use nexus_console_core::{PortError, ProviderPort};

use crate::NexusAdapterConfig;

/// EIP-1193 wallet access: the injected browser provider on wasm32, a JSON-RPC
/// proxy or an in-process deterministic wallet on native.
#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser,
}

#[derive(Debug, Clone)]
#[cfg(not(target_arch = "wasm32"))]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Clone)]
struct ProviderState {
    accounts: Vec<Address>,
    chain_id: u64,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            accounts: vec![address!("1000000000000000000000000000000000000001")],
            chain_id: 1,
        }
    }
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(NexusAdapterConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: NexusAdapterConfig) -> Self {
        // The provider is looked up per request: extensions may inject it after load.
        #[cfg(target_arch = "wasm32")]
        let mode = {
            let _ = &config;
            ProviderMode::Browser
        };

        #[cfg(not(target_arch = "wasm32"))]
        let mode = if let Some(ref base_url) = config.eip1193_proxy_url {
            let timeout = std::time::Duration::from_millis(config.rpc_timeout_ms);
            match reqwest::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) if config.strict_runtime_required() => ProviderMode::Disabled(format!(
                    "failed to initialize EIP-1193 proxy client in production profile: {e}"
                )),
                Err(e) => {
                    tracing::warn!(error = %e, "EIP-1193 proxy client unavailable, using deterministic wallet");
                    ProviderMode::Deterministic
                }
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        tracing::debug!(mode = mode.label(), "EIP-1193 adapter ready");
        Self {
            mode,
            state: Arc::new(Mutex::new(ProviderState::default())),
        }
    }

    /// An adapter that never leaves the process, whatever the environment says.
    pub fn deterministic() -> Self {
        Self {
            mode: ProviderMode::Deterministic,
            state: Arc::new(Mutex::new(ProviderState::default())),
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            mode: ProviderMode::Disabled(reason.into()),
            state: Arc::new(Mutex::new(ProviderState::default())),
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self.mode, ProviderMode::Deterministic)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.mode, ProviderMode::Disabled(_))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn is_browser(&self) -> bool {
        matches!(self.mode, ProviderMode::Browser)
    }

    /// Replaces the accounts the deterministic wallet hands out.
    pub fn set_deterministic_accounts(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        self.lock_state()?.accounts = accounts;
        Ok(())
    }

    /// Accounts last returned by the provider.
    pub fn known_accounts(&self) -> Result<Vec<Address>, PortError> {
        Ok(self.lock_state()?.accounts.clone())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        match &self.mode {
            ProviderMode::Disabled(reason) => Err(PortError::Policy(reason.clone())),
            ProviderMode::Deterministic => Err(PortError::NotImplemented(
                "deterministic wallet has no RPC transport",
            )),
            #[cfg(not(target_arch = "wasm32"))]
            ProviderMode::Proxy(proxy) => proxy_call(proxy, method, params).await,
            #[cfg(target_arch = "wasm32")]
            ProviderMode::Browser => wasm_request(method, params).await,
        }
    }
}

impl ProviderMode {
    fn label(&self) -> &'static str {
        match self {
            ProviderMode::Disabled(_) => "disabled",
            ProviderMode::Deterministic => "deterministic",
            #[cfg(not(target_arch = "wasm32"))]
            ProviderMode::Proxy(_) => "proxy",
            #[cfg(target_arch = "wasm32")]
            ProviderMode::Browser => "browser",
        }
    }
}

impl ProviderPort for Eip1193Adapter {
    async fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;
        if self.is_deterministic() {
            return self.known_accounts();
        }

        let result = self.request("eth_requestAccounts", serde_json::json!([])).await?;
        let accounts = parse_accounts(&result)?;
        tracing::debug!(count = accounts.len(), "eth_requestAccounts answered");
        self.lock_state()?.accounts = accounts.clone();
        Ok(accounts)
    }

    async fn chain_id(&self) -> Result<u64, PortError> {
        self.check_mode()?;
        if self.is_deterministic() {
            return Ok(self.lock_state()?.chain_id);
        }

        let result = self.request("eth_chainId", serde_json::json!([])).await?;
        let chain_id = json_chain_id_to_u64(&result)?;
        self.lock_state()?.chain_id = chain_id;
        Ok(chain_id)
    }
}

fn parse_accounts(result: &Value) -> Result<Vec<Address>, PortError> {
    let arr = result
        .as_array()
        .ok_or_else(|| PortError::Transport("eth_requestAccounts: array expected".to_owned()))?;
    arr.iter()
        .map(|item| {
            let raw = item.as_str().ok_or_else(|| {
                PortError::Transport("eth_requestAccounts: string expected".to_owned())
            })?;
            raw.parse::<Address>()
                .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))
        })
        .collect()
}

#[cfg(not(target_arch = "wasm32"))]
async fn proxy_call(proxy: &ProxyRuntime, method: &str, params: Value) -> Result<Value, PortError> {
    let payload = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });
    let response = proxy
        .client
        .post(&proxy.base_url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
    if !status.is_success() {
        return Err(PortError::Transport(format!(
            "eip1193 proxy status {status}: {body}"
        )));
    }
    rpc_result(body)
}

/// Unwraps a JSON-RPC envelope. Code 4001 is the EIP-1193 user rejection.
pub(crate) fn rpc_result(body: Value) -> Result<Value, PortError> {
    if let Some(err) = body.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| err.to_string());
        if err.get("code").and_then(Value::as_i64) == Some(4001) {
            return Err(PortError::Rejected(message));
        }
        return Err(PortError::Transport(message));
    }
    body.get("result")
        .cloned()
        .ok_or_else(|| PortError::Transport("JSON-RPC response missing result".to_owned()))
}

pub(crate) fn json_chain_id_to_u64(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let s = value
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    parse_chain_id_str(s)
}

fn parse_chain_id_str(raw: &str) -> Result<u64, PortError> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
            .map_err(|e| PortError::Validation(format!("invalid hex chain id: {e}")))
    } else {
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid chain id: {e}")))
    }
}

#[cfg(target_arch = "wasm32")]
async fn wasm_request(method: &str, params: Value) -> Result<Value, PortError> {
    use wasm_bindgen::JsCast;

    let provider = browser_provider()?;
    let request_fn = get_prop(&provider, "request")
        .ok()
        .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
        .ok_or(PortError::NotImplemented(
            "window.ethereum.request is unavailable",
        ))?;

    let request = serde_json::json!({
        "method": method,
        "params": params,
    });
    let request_js = crate::js::to_js(&request)?;
    let promise_js = request_fn
        .call1(&provider, &request_js)
        .map_err(|e| PortError::Transport(format!("provider request dispatch failed: {e:?}")))?;
    let result_js = crate::js::await_promise(promise_js).await?;
    crate::js::from_js(result_js)
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn browser_provider() -> Result<wasm_bindgen::JsValue, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
    let provider = get_prop(&window.into(), "ethereum")?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::NotFound("window.ethereum missing".to_owned()));
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn get_prop(
    target: &wasm_bindgen::JsValue,
    key: &str,
) -> Result<wasm_bindgen::JsValue, PortError> {
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .map_err(|e| PortError::Transport(format!("read property {key} failed: {e:?}")))
}
