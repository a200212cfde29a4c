//! Bridge between the egui shell and the Nexus workspace crates.
//! The shell reaches wallet, SDK and RPC adapters only through here.

use alloy::primitives::Address;
use eyre::WrapErr;

use nexus_console_adapters::{
    Eip1193Adapter, NexusAdapterConfig, NexusSdkAdapter, PublicRpcAdapter,
};
use nexus_console_core::{initialize_session, ChainIdPort, PortError, ProviderPort};

pub type Sdk = NexusSdkAdapter;

#[derive(Debug, Clone)]
pub struct SdkBridge {
    config: NexusAdapterConfig,
    provider: Eip1193Adapter,
}

impl SdkBridge {
    pub fn new(config: NexusAdapterConfig) -> Self {
        tracing::info!(
            profile = ?config.runtime_profile,
            network = config.network.as_str(),
            rpc = %config.public_rpc_url,
            "adapter configuration loaded"
        );
        Self {
            provider: Eip1193Adapter::with_config(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &NexusAdapterConfig {
        &self.config
    }

    /// Shown next to the session controls when no real SDK runtime is bound.
    pub fn runtime_note(&self) -> Option<&'static str> {
        if self.provider.is_disabled() {
            Some("Wallet runtime disabled by the production profile")
        } else if self.provider.is_deterministic() {
            Some("Deterministic wallet and SDK (no browser runtime)")
        } else {
            None
        }
    }

    pub fn connect_wallet(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Address>, PortError>> + 'static {
        let provider = self.provider.clone();
        async move { provider.request_accounts().await }
    }

    /// Builds a fresh SDK instance and initializes it. Each session gets its
    /// own instance so a torn-down one can never be reused.
    pub fn start_session(
        &self,
    ) -> impl std::future::Future<Output = Result<Sdk, PortError>> + 'static {
        let sdk = NexusSdkAdapter::new(self.provider.clone(), &self.config);
        initialize_session(sdk)
    }

    pub fn fetch_chain_id(&self) -> impl std::future::Future<Output = eyre::Result<u64>> + 'static {
        let config = self.config.clone();
        async move {
            let rpc = PublicRpcAdapter::new(&config)
                .wrap_err_with(|| format!("cannot reach {}", config.public_rpc_url))?;
            rpc.chain_id()
                .await
                .wrap_err_with(|| format!("eth_chainId against {} failed", rpc.url()))
        }
    }
}

impl Default for SdkBridge {
    fn default() -> Self {
        Self::new(NexusAdapterConfig::from_env())
    }
}
