use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::Address;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use nexus_console_core::{
    chain_display_name, AllowanceHook, AllowanceRequest, AllowanceResponse, BalanceAsset,
    BridgeParams, IntentDecision, IntentHook, IntentRequest, NexusSdkPort, PortError,
    ProviderPort, TransferParams,
};

use crate::fallback;
use crate::{Eip1193Adapter, NexusAdapterConfig};

/// The cross-chain SDK behind [`NexusSdkPort`].
///
/// In the browser this drives the JS SDK found under `window[sdk_global]`.
/// Elsewhere, or when that global is missing outside the production profile,
/// a deterministic in-process ledger stands in so every flow stays usable.
#[derive(Debug, Clone)]
pub struct NexusSdkAdapter {
    mode: SdkMode,
    provider: Eip1193Adapter,
    state: Arc<Mutex<SdkState>>,
}

#[derive(Debug, Clone)]
enum SdkMode {
    Disabled(String),
    Deterministic,
    #[cfg(target_arch = "wasm32")]
    Browser { global: String, network: String },
}

#[derive(Default)]
struct SdkState {
    initialized: bool,
    accounts: Vec<Address>,
    balances: Vec<BalanceAsset>,
    allowance_hook: Option<AllowanceHook>,
    intent_hook: Option<IntentHook>,
    nonce: u64,
    #[cfg(target_arch = "wasm32")]
    instance: Option<wasm_bindgen::JsValue>,
    #[cfg(target_arch = "wasm32")]
    closures: Vec<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
}

impl std::fmt::Debug for SdkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkState")
            .field("initialized", &self.initialized)
            .field("accounts", &self.accounts)
            .field("assets", &self.balances.len())
            .field("allowance_hook", &self.allowance_hook.is_some())
            .field("intent_hook", &self.intent_hook.is_some())
            .finish()
    }
}

impl NexusSdkAdapter {
    pub fn new(provider: Eip1193Adapter, config: &NexusAdapterConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        let browser_mode = browser::sdk_available(&config.sdk_global).then(|| SdkMode::Browser {
            global: config.sdk_global.clone(),
            network: config.network.as_str().to_owned(),
        });
        #[cfg(not(target_arch = "wasm32"))]
        let browser_mode = None;

        let mode = if provider.is_disabled() {
            SdkMode::Disabled("wallet provider is disabled".to_owned())
        } else if let Some(mode) = browser_mode {
            mode
        } else if config.strict_runtime_required() {
            SdkMode::Disabled(format!(
                "Nexus SDK global `{}` not found in production runtime profile",
                config.sdk_global
            ))
        } else {
            tracing::warn!("Nexus SDK runtime not found, using deterministic fallback");
            SdkMode::Deterministic
        };

        Self {
            mode,
            provider,
            state: Arc::new(Mutex::new(SdkState::default())),
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self.mode, SdkMode::Deterministic)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, SdkState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("sdk lock poisoned: {e}")))
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let SdkMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), PortError> {
        self.check_mode()?;
        if !self.lock_state()?.initialized {
            return Err(PortError::Policy("Nexus SDK not initialized".to_owned()));
        }
        Ok(())
    }

    fn next_nonce(&self) -> Result<u64, PortError> {
        let mut g = self.lock_state()?;
        g.nonce = g.nonce.saturating_add(1);
        Ok(g.nonce)
    }

    /// Runs the registered allowance hook and waits for its answer. Without a
    /// hook the minimum is assumed, as the SDK does.
    async fn ask_allowance(&self, sources: Vec<Value>) -> Result<(), PortError> {
        let Some(hook) = self.lock_state()?.allowance_hook.clone() else {
            return Ok(());
        };
        let (tx, rx) = oneshot::channel();
        hook(AllowanceRequest::new(
            sources,
            Box::new(move |response: AllowanceResponse| {
                let _ = tx.send(response);
            }),
        ));
        match rx.await {
            Ok(AllowanceResponse::Allow(choices)) => {
                tracing::debug!(?choices, "allowance granted");
                Ok(())
            }
            Ok(AllowanceResponse::Deny) | Err(_) => {
                Err(PortError::Rejected("Allowance approval denied".to_owned()))
            }
        }
    }

    async fn ask_intent(&self, intent: Value) -> Result<(), PortError> {
        let Some(hook) = self.lock_state()?.intent_hook.clone() else {
            return Ok(());
        };
        let (tx, rx) = oneshot::channel();
        hook(IntentRequest::new(
            intent,
            Box::new(move |decision: IntentDecision| {
                let _ = tx.send(decision);
            }),
        ));
        match rx.await {
            Ok(IntentDecision::Allow) => Ok(()),
            Ok(IntentDecision::Deny) | Err(_) => {
                Err(PortError::Rejected("User rejected the intent".to_owned()))
            }
        }
    }

    fn fallback_simulation(
        &self,
        kind: &str,
        params: Value,
        funds: Result<(), PortError>,
    ) -> Value {
        json!({
            "kind": kind,
            "params": params,
            "sufficientBalance": funds.is_ok(),
            "fees": { "protocol": "0", "gasSupplied": "0.0001", "solver": "0" },
            "note": fallback::NOTE,
        })
    }
}

impl NexusSdkPort for NexusSdkAdapter {
    async fn initialize(&self) -> Result<(), PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if let SdkMode::Browser { global, network } = &self.mode {
            let instance = browser::construct(global, network)?;
            let provider = crate::eip1193::browser_provider()?;
            browser::call(&instance, "initialize", &[provider]).await?;
            self.lock_state()?.instance = Some(instance);
            self.lock_state()?.initialized = true;
            tracing::info!(sdk = %global, "Nexus SDK initialized");
            return Ok(());
        }

        let accounts = self.provider.request_accounts().await?;
        if accounts.is_empty() {
            return Err(PortError::Rejected("Wallet returned no accounts".to_owned()));
        }
        let chain_id = self.provider.chain_id().await?;
        let first = accounts[0];
        let mut g = self.lock_state()?;
        g.accounts = accounts;
        g.balances = fallback::seed_balances();
        g.initialized = true;
        tracing::info!(
            account = %first,
            chain = chain_display_name(Some(chain_id)),
            "deterministic Nexus SDK initialized"
        );
        Ok(())
    }

    async fn deinit(&self) -> Result<(), PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, SdkMode::Browser { .. }) {
            let instance = self.lock_state()?.instance.clone();
            if let Some(instance) = instance {
                browser::call(&instance, "deinit", &[]).await?;
            }
        }

        let mut g = self.lock_state()?;
        let nonce = g.nonce;
        *g = SdkState {
            nonce,
            ..SdkState::default()
        };
        tracing::info!("Nexus SDK deinitialized");
        Ok(())
    }

    fn remove_all_listeners(&self) -> Result<(), PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, SdkMode::Browser { .. }) {
            let instance = self.lock_state()?.instance.clone();
            if let Some(instance) = instance {
                browser::call_sync(&instance, "removeAllListeners", &[])?;
            }
        }

        let mut g = self.lock_state()?;
        g.allowance_hook = None;
        g.intent_hook = None;
        Ok(())
    }

    async fn get_unified_balances(&self) -> Result<Vec<BalanceAsset>, PortError> {
        self.ensure_ready()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, SdkMode::Browser { .. }) {
            let value = browser::call(&browser::instance(self)?, "getUnifiedBalances", &[]).await?;
            return crate::js::from_js(value);
        }

        Ok(self.lock_state()?.balances.clone())
    }

    async fn transfer(&self, params: &TransferParams) -> Result<Value, PortError> {
        self.ensure_ready()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, SdkMode::Browser { .. }) {
            return browser::call_json(self, "transfer", params).await;
        }

        fallback::debit(&mut self.lock_state()?.balances, params.token, &params.amount)?;
        let hash = fallback::receipt_hash("transfer", params, self.next_nonce()?)?;
        tracing::info!(%hash, "deterministic transfer recorded");
        Ok(json!({
            "success": true,
            "transactionHash": hash,
            "chainId": params.chain_id,
            "note": fallback::NOTE,
        }))
    }

    async fn simulate_transfer(&self, params: &TransferParams) -> Result<Value, PortError> {
        self.ensure_ready()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, SdkMode::Browser { .. }) {
            return browser::call_json(self, "simulateTransfer", params).await;
        }

        let funds = fallback::check_funds(&self.lock_state()?.balances, params.token, &params.amount);
        let params = serde_json::to_value(params)
            .map_err(|e| PortError::Validation(format!("params serialization failed: {e}")))?;
        Ok(self.fallback_simulation("transfer", params, funds))
    }

    async fn bridge(&self, params: &BridgeParams) -> Result<Value, PortError> {
        self.ensure_ready()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, SdkMode::Browser { .. }) {
            return browser::call_json(self, "bridge", params).await;
        }

        let sources = {
            let g = self.lock_state()?;
            fallback::check_funds(&g.balances, params.token, &params.amount)?;
            fallback::bridge_sources(&g.balances, params.token, params.chain_id)
        };
        self.ask_allowance(sources.clone()).await?;
        self.ask_intent(json!({
            "token": params.token,
            "amount": params.amount,
            "destination": {
                "chainID": params.chain_id,
                "name": chain_display_name(Some(params.chain_id)),
            },
            "sources": sources,
            "fees": { "protocol": "0", "gasSupplied": "0.0001", "solver": "0" },
        }))
        .await?;

        fallback::debit(&mut self.lock_state()?.balances, params.token, &params.amount)?;
        let hash = fallback::receipt_hash("bridge", params, self.next_nonce()?)?;
        tracing::info!(%hash, chain = params.chain_id, "deterministic bridge recorded");
        Ok(json!({
            "success": true,
            "transactionHash": hash,
            "chainId": params.chain_id,
            "note": fallback::NOTE,
        }))
    }

    async fn simulate_bridge(&self, params: &BridgeParams) -> Result<Value, PortError> {
        self.ensure_ready()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, SdkMode::Browser { .. }) {
            return browser::call_json(self, "simulateBridge", params).await;
        }

        let (funds, sources) = {
            let g = self.lock_state()?;
            (
                fallback::check_funds(&g.balances, params.token, &params.amount),
                fallback::bridge_sources(&g.balances, params.token, params.chain_id),
            )
        };
        let mut params = serde_json::to_value(params)
            .map_err(|e| PortError::Validation(format!("params serialization failed: {e}")))?;
        params["sources"] = Value::Array(sources);
        Ok(self.fallback_simulation("bridge", params, funds))
    }

    fn set_on_allowance_hook(&self, hook: AllowanceHook) -> Result<(), PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, SdkMode::Browser { .. }) {
            browser::register_allowance_hook(self, hook.clone())?;
        }

        self.lock_state()?.allowance_hook = Some(hook);
        Ok(())
    }

    fn set_on_intent_hook(&self, hook: IntentHook) -> Result<(), PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, SdkMode::Browser { .. }) {
            browser::register_intent_hook(self, hook.clone())?;
        }

        self.lock_state()?.intent_hook = Some(hook);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use serde::Serialize;
    use serde_json::Value;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    use nexus_console_core::{
        AllowanceHook, AllowanceRequest, AllowanceResponse, IntentDecision,
        IntentHook, IntentRequest, PortError,
    };

    use super::NexusSdkAdapter;
    use crate::eip1193::get_prop;
    use crate::js::{await_promise, from_js, js_error_message, method, to_js};

    pub(super) fn sdk_available(global: &str) -> bool {
        web_sys::window()
            .and_then(|w| get_prop(&w.into(), global).ok())
            .is_some_and(|v| v.is_function())
    }

    pub(super) fn construct(global: &str, network: &str) -> Result<JsValue, PortError> {
        let window =
            web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
        let ctor = get_prop(&window.into(), global)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| PortError::NotFound(format!("window.{global} is not a constructor")))?;
        let options = to_js(&serde_json::json!({ "network": network }))?;
        js_sys::Reflect::construct(&ctor, &js_sys::Array::of1(&options))
            .map_err(|e| PortError::Rejected(js_error_message(&e)))
    }

    pub(super) fn instance(adapter: &NexusSdkAdapter) -> Result<JsValue, PortError> {
        adapter
            .lock_state()?
            .instance
            .clone()
            .ok_or_else(|| PortError::Policy("Nexus SDK not initialized".to_owned()))
    }

    pub(super) fn call_sync(
        instance: &JsValue,
        name: &str,
        args: &[JsValue],
    ) -> Result<JsValue, PortError> {
        let args: js_sys::Array = args.iter().collect();
        method(instance, name)?
            .apply(instance, &args)
            .map_err(|e| PortError::Rejected(js_error_message(&e)))
    }

    pub(super) async fn call(
        instance: &JsValue,
        name: &str,
        args: &[JsValue],
    ) -> Result<JsValue, PortError> {
        tracing::debug!(method = name, "calling Nexus SDK");
        await_promise(call_sync(instance, name, args)?).await
    }

    pub(super) async fn call_json<P: Serialize>(
        adapter: &NexusSdkAdapter,
        name: &str,
        params: &P,
    ) -> Result<Value, PortError> {
        let instance = instance(adapter)?;
        let result = call(&instance, name, &[to_js(params)?]).await?;
        if result.is_undefined() {
            return Ok(Value::Null);
        }
        from_js(result)
    }

    fn optional_fn(target: &JsValue, name: &str) -> Option<js_sys::Function> {
        get_prop(target, name).ok()?.dyn_into::<js_sys::Function>().ok()
    }

    fn log_call(result: Result<JsValue, JsValue>, what: &str) {
        if let Err(e) = result {
            tracing::warn!(error = %js_error_message(&e), "{what} callback threw");
        }
    }

    fn store(
        adapter: &NexusSdkAdapter,
        setter: &str,
        closure: Closure<dyn FnMut(JsValue)>,
    ) -> Result<(), PortError> {
        let instance = instance(adapter)?;
        call_sync(&instance, setter, &[closure.as_ref().clone()])?;
        adapter.lock_state()?.closures.push(closure);
        Ok(())
    }

    pub(super) fn register_allowance_hook(
        adapter: &NexusSdkAdapter,
        hook: AllowanceHook,
    ) -> Result<(), PortError> {
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |data: JsValue| {
            let sources: Vec<Value> = get_prop(&data, "sources")
                .ok()
                .and_then(|v| from_js(v).ok())
                .unwrap_or_default();
            let allow = optional_fn(&data, "allow");
            let deny = optional_fn(&data, "deny");
            hook(AllowanceRequest::new(
                sources,
                Box::new(move |response: AllowanceResponse| match response {
                    AllowanceResponse::Allow(choices) => {
                        let choices = to_js(&choices);
                        if let (Some(allow), Ok(choices)) = (allow, choices) {
                            log_call(allow.call1(&JsValue::NULL, &choices), "allow");
                        }
                    }
                    AllowanceResponse::Deny => {
                        if let Some(deny) = deny {
                            log_call(deny.call0(&JsValue::NULL), "deny");
                        }
                    }
                }),
            ));
        });
        store(adapter, "setOnAllowanceHook", closure)
    }

    pub(super) fn register_intent_hook(
        adapter: &NexusSdkAdapter,
        hook: IntentHook,
    ) -> Result<(), PortError> {
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |data: JsValue| {
            let intent: Value = get_prop(&data, "intent")
                .ok()
                .and_then(|v| from_js(v).ok())
                .unwrap_or(Value::Null);
            let allow = optional_fn(&data, "allow");
            let deny = optional_fn(&data, "deny");
            hook(IntentRequest::new(
                intent,
                Box::new(move |decision: IntentDecision| {
                    let callback = match decision {
                        IntentDecision::Allow => allow,
                        IntentDecision::Deny => deny,
                    };
                    if let Some(callback) = callback {
                        log_call(callback.call0(&JsValue::NULL), "intent");
                    }
                }),
            ));
        });
        store(adapter, "setOnIntentHook", closure)
    }
}
