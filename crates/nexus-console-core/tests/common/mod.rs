#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{mpsc, Arc, Mutex};

use alloy::primitives::Address;
use serde_json::{json, Value};

use nexus_console_core::{
    AllowanceHook, AllowanceRequest, AllowanceResponse, BalanceAsset, BridgeParams, ChainInfo,
    IntentDecision, IntentHook, IntentRequest, NexusSdkPort, PortError, ProviderPort,
    TokenBreakdown, TransferParams,
};

#[derive(Default)]
pub struct MockSdkState {
    pub calls: Vec<&'static str>,
    pub failing: HashSet<&'static str>,
    pub balances: Vec<BalanceAsset>,
    pub allowance_hook: Option<AllowanceHook>,
    pub intent_hook: Option<IntentHook>,
    pub allowance_registrations: usize,
    pub intent_registrations: usize,
}

/// Scriptable stand-in for the SDK. Clones share state so tests can keep a
/// handle after the session holder takes ownership.
#[derive(Clone, Default)]
pub struct MockSdk {
    state: Arc<Mutex<MockSdkState>>,
}

impl MockSdk {
    pub fn with_balances(balances: Vec<BalanceAsset>) -> Self {
        let sdk = Self::default();
        sdk.state.lock().expect("mock lock").balances = balances;
        sdk
    }

    pub fn fail_on(&self, method: &'static str) {
        self.state.lock().expect("mock lock").failing.insert(method);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().expect("mock lock").calls.clone()
    }

    pub fn registrations(&self) -> (usize, usize) {
        let g = self.state.lock().expect("mock lock");
        (g.allowance_registrations, g.intent_registrations)
    }

    fn record(&self, method: &'static str) -> Result<(), PortError> {
        let mut g = self.state.lock().expect("mock lock");
        g.calls.push(method);
        if g.failing.contains(method) {
            return Err(PortError::Rejected(format!("{method} rejected by mock")));
        }
        Ok(())
    }

    /// Invokes the registered allowance hook the way the SDK would and returns
    /// the answer if one was given synchronously.
    pub fn fire_allowance(&self, sources: Vec<Value>) -> Option<AllowanceResponse> {
        let hook = self
            .state
            .lock()
            .expect("mock lock")
            .allowance_hook
            .clone()
            .expect("allowance hook registered");
        let (tx, rx) = mpsc::channel();
        hook(AllowanceRequest::new(
            sources,
            Box::new(move |r: AllowanceResponse| {
                let _ = tx.send(r);
            }),
        ));
        rx.try_recv().ok()
    }

    /// Invokes the registered intent hook; the receiver yields the user's decision.
    pub fn fire_intent(&self, intent: Value) -> mpsc::Receiver<IntentDecision> {
        let hook = self
            .state
            .lock()
            .expect("mock lock")
            .intent_hook
            .clone()
            .expect("intent hook registered");
        let (tx, rx) = mpsc::channel();
        hook(IntentRequest::new(
            intent,
            Box::new(move |d: IntentDecision| {
                let _ = tx.send(d);
            }),
        ));
        rx
    }
}

impl NexusSdkPort for MockSdk {
    async fn initialize(&self) -> Result<(), PortError> {
        self.record("initialize")
    }

    async fn deinit(&self) -> Result<(), PortError> {
        self.record("deinit")
    }

    fn remove_all_listeners(&self) -> Result<(), PortError> {
        self.record("remove_all_listeners")
    }

    async fn get_unified_balances(&self) -> Result<Vec<BalanceAsset>, PortError> {
        self.record("get_unified_balances")?;
        Ok(self.state.lock().expect("mock lock").balances.clone())
    }

    async fn transfer(&self, params: &TransferParams) -> Result<Value, PortError> {
        self.record("transfer")?;
        Ok(json!({ "success": true, "params": params }))
    }

    async fn simulate_transfer(&self, params: &TransferParams) -> Result<Value, PortError> {
        self.record("simulate_transfer")?;
        Ok(json!({ "fees": "0.0001", "params": params }))
    }

    async fn bridge(&self, params: &BridgeParams) -> Result<Value, PortError> {
        self.record("bridge")?;
        Ok(json!({ "success": true, "params": params }))
    }

    async fn simulate_bridge(&self, params: &BridgeParams) -> Result<Value, PortError> {
        self.record("simulate_bridge")?;
        Ok(json!({ "fees": "0.0002", "params": params }))
    }

    fn set_on_allowance_hook(&self, hook: AllowanceHook) -> Result<(), PortError> {
        self.record("set_on_allowance_hook")?;
        let mut g = self.state.lock().expect("mock lock");
        g.allowance_hook = Some(hook);
        g.allowance_registrations += 1;
        Ok(())
    }

    fn set_on_intent_hook(&self, hook: IntentHook) -> Result<(), PortError> {
        self.record("set_on_intent_hook")?;
        let mut g = self.state.lock().expect("mock lock");
        g.intent_hook = Some(hook);
        g.intent_registrations += 1;
        Ok(())
    }
}

pub enum MockProvider {
    Missing,
    Rejecting,
    Accounts(Vec<Address>),
}

impl ProviderPort for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        match self {
            MockProvider::Missing => Err(PortError::NotFound("window.ethereum missing".to_owned())),
            MockProvider::Rejecting => Err(PortError::Rejected(
                "User rejected the request.".to_owned(),
            )),
            MockProvider::Accounts(accounts) => Ok(accounts.clone()),
        }
    }

    async fn chain_id(&self) -> Result<u64, PortError> {
        match self {
            MockProvider::Accounts(_) => Ok(8453),
            _ => Err(PortError::NotFound("window.ethereum missing".to_owned())),
        }
    }
}

pub fn account(seed: u8) -> Address {
    Address::repeat_byte(seed)
}

pub fn recipient() -> String {
    "0x000000000000000000000000000000000000CAFE".to_owned()
}

pub fn asset(symbol: &str, fiat: f64, chains: &[(u64, &str, &str, f64)]) -> BalanceAsset {
    BalanceAsset {
        symbol: symbol.to_owned(),
        balance: chains
            .iter()
            .map(|(_, _, balance, _)| balance.parse::<f64>().unwrap_or(0.0))
            .sum::<f64>()
            .to_string(),
        balance_in_fiat: fiat,
        breakdown: chains
            .iter()
            .map(|(id, name, balance, chain_fiat)| TokenBreakdown {
                balance: (*balance).to_owned(),
                balance_in_fiat: *chain_fiat,
                chain: ChainInfo {
                    id: *id,
                    name: (*name).to_owned(),
                    logo: String::new(),
                },
                contract_address: "0x0000000000000000000000000000000000000000".to_owned(),
                decimals: 18,
                universe: 0,
            })
            .collect(),
        decimals: 18,
        icon: String::new(),
        abstracted: true,
    }
}
