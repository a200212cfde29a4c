use alloy::primitives::Address;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{BalanceAsset, BridgeParams, TransferParams};
use crate::hooks::{AllowanceHook, IntentHook};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
    /// The wallet or SDK refused the request; the message is shown to the user as-is.
    #[error("{0}")]
    Rejected(String),
}

/// Injected EIP-1193 wallet provider.
#[allow(async_fn_in_trait)]
pub trait ProviderPort {
    async fn request_accounts(&self) -> Result<Vec<Address>, PortError>;
    async fn chain_id(&self) -> Result<u64, PortError>;
}

/// The cross-chain liquidity SDK surface the console drives.
#[allow(async_fn_in_trait)]
pub trait NexusSdkPort {
    async fn initialize(&self) -> Result<(), PortError>;
    async fn deinit(&self) -> Result<(), PortError>;
    fn remove_all_listeners(&self) -> Result<(), PortError>;
    async fn get_unified_balances(&self) -> Result<Vec<BalanceAsset>, PortError>;
    async fn transfer(&self, params: &TransferParams) -> Result<Value, PortError>;
    async fn simulate_transfer(&self, params: &TransferParams) -> Result<Value, PortError>;
    async fn bridge(&self, params: &BridgeParams) -> Result<Value, PortError>;
    async fn simulate_bridge(&self, params: &BridgeParams) -> Result<Value, PortError>;
    fn set_on_allowance_hook(&self, hook: AllowanceHook) -> Result<(), PortError>;
    fn set_on_intent_hook(&self, hook: IntentHook) -> Result<(), PortError>;
}

/// Read-only chain id lookup against a public RPC endpoint.
#[allow(async_fn_in_trait)]
pub trait ChainIdPort {
    async fn chain_id(&self) -> Result<u64, PortError>;
}
