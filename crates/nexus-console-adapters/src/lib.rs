pub mod config;
pub mod eip1193;
mod fallback;
#[cfg(target_arch = "wasm32")]
mod js;
pub mod nexus;
pub mod rpc;

pub use config::{NexusAdapterConfig, NexusNetwork, RuntimeProfile};
pub use eip1193::Eip1193Adapter;
pub use nexus::NexusSdkAdapter;
pub use rpc::PublicRpcAdapter;
