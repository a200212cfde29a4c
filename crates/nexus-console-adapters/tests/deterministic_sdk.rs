mod common;

use std::time::Duration;

use alloy::primitives::Address;

use nexus_console_adapters::{Eip1193Adapter, NexusAdapterConfig, NexusSdkAdapter};
use nexus_console_core::{
    BridgePanel, BridgeParams, NexusSdkPort, PortError, SupportedChain, Token, TransferParams,
};

use common::{ready_sdk, unified_balance};

fn bridge_params(amount: &str, chain: SupportedChain) -> BridgeParams {
    BridgeParams {
        token: Token::Eth,
        amount: amount.to_owned(),
        chain_id: chain.id(),
    }
}

#[tokio::test]
async fn calls_before_initialize_are_refused() {
    let sdk = NexusSdkAdapter::new(Eip1193Adapter::deterministic(), &NexusAdapterConfig::default());
    assert!(matches!(
        sdk.get_unified_balances().await,
        Err(PortError::Policy(_))
    ));
}

#[tokio::test]
async fn initialize_requires_an_account() {
    let provider = Eip1193Adapter::deterministic();
    provider.set_deterministic_accounts(Vec::new()).expect("accounts");
    let sdk = NexusSdkAdapter::new(provider, &NexusAdapterConfig::default());

    let err = sdk.initialize().await.unwrap_err();
    assert_eq!(err.to_string(), "Wallet returned no accounts");
}

#[tokio::test]
async fn transfer_debits_unified_balance() {
    let sdk = ready_sdk().await;
    let params = TransferParams {
        token: Token::Usdc,
        amount: "20.5".to_owned(),
        chain_id: SupportedChain::Base.id(),
        recipient: Address::repeat_byte(0xca),
    };

    let simulation = sdk.simulate_transfer(&params).await.expect("simulate");
    assert_eq!(simulation["sufficientBalance"], true);

    let receipt = sdk.transfer(&params).await.expect("transfer");
    assert_eq!(receipt["success"], true);
    assert!(receipt["transactionHash"].as_str().is_some());

    let balances = sdk.get_unified_balances().await.expect("balances");
    assert_eq!(unified_balance(&balances, "USDC"), "140");
}

#[tokio::test]
async fn overdraft_transfer_is_rejected() {
    let sdk = ready_sdk().await;
    let params = TransferParams {
        token: Token::Usdt,
        amount: "1000".to_owned(),
        chain_id: SupportedChain::Ethereum.id(),
        recipient: Address::repeat_byte(0xca),
    };

    let simulation = sdk.simulate_transfer(&params).await.expect("simulate");
    assert_eq!(simulation["sufficientBalance"], false);
    assert!(matches!(sdk.transfer(&params).await, Err(PortError::Rejected(_))));
}

#[tokio::test]
async fn bridge_without_hooks_completes() {
    let sdk = ready_sdk().await;
    sdk.bridge(&bridge_params("0.05", SupportedChain::Optimism))
        .await
        .expect("bridge");
    let balances = sdk.get_unified_balances().await.expect("balances");
    assert_eq!(unified_balance(&balances, "ETH"), "0.8");
}

#[tokio::test]
async fn bridge_waits_for_accepted_intent() {
    let sdk = ready_sdk().await;
    let mut panel = BridgePanel::default();
    assert!(panel.ensure_hooks(&sdk, 1).expect("hooks"));

    let inbox = panel.intents().clone();
    let accept = async {
        while inbox.is_empty() {
            tokio::task::yield_now().await;
        }
        inbox.accept_front()
    };
    let params = bridge_params("0.3", SupportedChain::Base);
    let (result, accepted) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(sdk.bridge(&params), accept)
    })
    .await
    .expect("bridge settles");

    assert!(accepted);
    assert_eq!(result.expect("bridge")["success"], true);

    let activity = panel.activity();
    assert_eq!(activity.allowance_sources.map(|s| s.len()), Some(2));
    let intent = activity.intent.expect("intent recorded");
    assert_eq!(intent["destination"]["name"], "Base");

    let balances = sdk.get_unified_balances().await.expect("balances");
    assert_eq!(unified_balance(&balances, "ETH"), "0.55");
}

#[tokio::test]
async fn rejected_intent_fails_bridge_and_keeps_funds() {
    let sdk = ready_sdk().await;
    let mut panel = BridgePanel::default();
    panel.ensure_hooks(&sdk, 1).expect("hooks");

    let inbox = panel.intents().clone();
    let reject = async {
        while inbox.is_empty() {
            tokio::task::yield_now().await;
        }
        inbox.reject_front()
    };
    let params = bridge_params("0.3", SupportedChain::Base);
    let (result, rejected) = tokio::join!(sdk.bridge(&params), reject);

    assert!(rejected);
    assert_eq!(result.unwrap_err().to_string(), "User rejected the intent");
    let balances = sdk.get_unified_balances().await.expect("balances");
    assert_eq!(unified_balance(&balances, "ETH"), "0.85");
}

#[tokio::test]
async fn deinit_drops_hooks_and_session() {
    let sdk = ready_sdk().await;
    let mut panel = BridgePanel::default();
    panel.ensure_hooks(&sdk, 1).expect("hooks");

    sdk.remove_all_listeners().expect("remove listeners");
    sdk.deinit().await.expect("deinit");

    assert!(matches!(
        sdk.bridge(&bridge_params("0.1", SupportedChain::Base)).await,
        Err(PortError::Policy(_))
    ));
    sdk.initialize().await.expect("re-initialize");
    sdk.bridge(&bridge_params("0.1", SupportedChain::Base))
        .await
        .expect("bridge runs without hooks");
    assert!(panel.intents().is_empty());
}
