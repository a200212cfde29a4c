/// Decides which runtime the adapters bind to when the preferred one is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeProfile {
    /// Missing runtimes fall back to the deterministic in-process adapters.
    Development,
    /// Missing runtimes are a hard policy error.
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NexusNetwork {
    Mainnet,
    Testnet,
}

impl NexusNetwork {
    pub fn as_str(self) -> &'static str {
        match self {
            NexusNetwork::Mainnet => "mainnet",
            NexusNetwork::Testnet => "testnet",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NexusAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub network: NexusNetwork,
    pub public_rpc_url: String,
    pub rpc_timeout_ms: u64,
    /// Global constructor name of the SDK in the browser (`window[sdk_global]`).
    pub sdk_global: String,
    /// JSON-RPC endpoint that forwards EIP-1193 calls to a wallet, native only.
    pub eip1193_proxy_url: Option<String>,
}

impl Default for NexusAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            network: NexusNetwork::Mainnet,
            public_rpc_url: "https://mainnet.base.org".to_owned(),
            rpc_timeout_ms: 15_000,
            sdk_global: "NexusSDK".to_owned(),
            eip1193_proxy_url: None,
        }
    }
}

macro_rules! env_value {
    ($name:literal) => {{
        #[cfg(not(target_arch = "wasm32"))]
        let value = std::env::var($name).ok();
        #[cfg(target_arch = "wasm32")]
        let value = option_env!($name).map(str::to_owned);
        value
    }};
}

impl NexusAdapterConfig {
    /// Reads `NEXUS_*` variables; on wasm32 they are baked in at compile time.
    pub fn from_env() -> Self {
        let vars = [
            ("NEXUS_RUNTIME_PROFILE", env_value!("NEXUS_RUNTIME_PROFILE")),
            ("NEXUS_NETWORK", env_value!("NEXUS_NETWORK")),
            ("NEXUS_PUBLIC_RPC_URL", env_value!("NEXUS_PUBLIC_RPC_URL")),
            ("NEXUS_RPC_TIMEOUT_MS", env_value!("NEXUS_RPC_TIMEOUT_MS")),
            ("NEXUS_SDK_GLOBAL", env_value!("NEXUS_SDK_GLOBAL")),
            ("NEXUS_EIP1193_PROXY_URL", env_value!("NEXUS_EIP1193_PROXY_URL")),
        ];
        Self::from_lookup(|key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .and_then(|(_, value)| value.clone())
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        if let Some(raw) = get("NEXUS_RUNTIME_PROFILE") {
            match raw.to_ascii_lowercase().as_str() {
                "production" | "prod" => config.runtime_profile = RuntimeProfile::Production,
                "development" | "dev" => config.runtime_profile = RuntimeProfile::Development,
                other => tracing::warn!(value = other, "unknown NEXUS_RUNTIME_PROFILE, using default"),
            }
        }
        if let Some(raw) = get("NEXUS_NETWORK") {
            match raw.to_ascii_lowercase().as_str() {
                "mainnet" => config.network = NexusNetwork::Mainnet,
                "testnet" => config.network = NexusNetwork::Testnet,
                other => tracing::warn!(value = other, "unknown NEXUS_NETWORK, using default"),
            }
        }
        if let Some(url) = get("NEXUS_PUBLIC_RPC_URL") {
            config.public_rpc_url = url;
        }
        if let Some(raw) = get("NEXUS_RPC_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => config.rpc_timeout_ms = ms,
                Err(e) => tracing::warn!(value = %raw, error = %e, "invalid NEXUS_RPC_TIMEOUT_MS"),
            }
        }
        if let Some(name) = get("NEXUS_SDK_GLOBAL") {
            config.sdk_global = name;
        }
        config.eip1193_proxy_url = get("NEXUS_EIP1193_PROXY_URL");
        config
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }
}
