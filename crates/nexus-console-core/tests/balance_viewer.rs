mod common;

use nexus_console_core::{unified_total_fiat, BalanceViewer, NexusSdkPort, PortError};

use common::{asset, MockSdk};

#[tokio::test]
async fn total_is_sum_of_fiat_values() {
    let balances = vec![
        asset("ETH", 3120.55, &[(1, "Ethereum", "1.0", 3120.55)]),
        asset(
            "USDC",
            250.25,
            &[(10, "Optimism", "200.25", 200.25), (8453, "Base", "50", 50.0)],
        ),
        asset("USDT", 0.0, &[]),
    ];
    let sdk = MockSdk::with_balances(balances.clone());
    let mut viewer = BalanceViewer::default();

    assert!(viewer.needs_fetch(Some(1)));
    viewer.begin_fetch(1).expect("begin");
    assert!(viewer.is_loading());
    assert!(!viewer.needs_fetch(Some(1)));

    let outcome = sdk.get_unified_balances().await;
    viewer.finish_fetch(1, outcome).expect("finish");

    let expected: f64 = balances.iter().map(|b| b.balance_in_fiat).sum();
    assert!((viewer.total_fiat() - expected).abs() < 1e-9);
    assert!((unified_total_fiat(&balances) - 3370.8).abs() < 1e-9);
    assert_eq!(viewer.balances().len(), 3);
    assert!(!viewer.needs_fetch(Some(1)));
}

#[test]
fn failure_shows_generic_message() {
    let mut viewer = BalanceViewer::default();
    viewer.begin_fetch(1).expect("begin");
    viewer
        .finish_fetch(1, Err(PortError::Transport("rpc down".to_owned())))
        .expect("finish");
    assert_eq!(viewer.error(), Some("Failed to fetch balances"));
    assert!(viewer.balances().is_empty());
    assert!(!viewer.is_empty());
}

#[test]
fn fetches_once_per_session_until_refresh() {
    let mut viewer = BalanceViewer::default();
    assert!(!viewer.needs_fetch(None));
    viewer.begin_fetch(1).expect("begin");
    viewer.finish_fetch(1, Ok(vec![])).expect("finish");
    assert!(viewer.is_empty());
    assert!(!viewer.needs_fetch(Some(1)));
    assert!(viewer.needs_fetch(Some(2)));

    viewer.request_refresh();
    assert!(viewer.needs_fetch(Some(1)));
}

#[test]
fn stale_response_from_old_session_is_dropped() {
    let mut viewer = BalanceViewer::default();
    viewer.begin_fetch(1).expect("begin");
    viewer.reset();
    viewer.begin_fetch(2).expect("begin for new session");
    viewer
        .finish_fetch(1, Ok(vec![asset("ETH", 10.0, &[])]))
        .expect("stale finish");
    assert!(viewer.is_loading());
    assert!(viewer.balances().is_empty());
}

#[test]
fn zero_chain_balances_are_hidden() {
    let eth = asset(
        "ETH",
        10.0,
        &[(1, "Ethereum", "0", 0.0), (8453, "Base", "0.004", 10.0)],
    );
    let rows: Vec<_> = eth.non_zero_breakdown().map(|b| b.chain.id).collect();
    assert_eq!(rows, vec![8453]);
}
