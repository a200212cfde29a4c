mod common;

use serde_json::json;

use nexus_console_core::{
    AllowanceChoice, AllowanceResponse, BridgePanel, IntentDecision, NexusSdkPort, RequestStatus,
};

use common::MockSdk;

#[test]
fn allowance_hook_grants_minimum_without_prompting() {
    let sdk = MockSdk::default();
    let mut panel = BridgePanel::default();
    assert!(panel.ensure_hooks(&sdk, 1).expect("register hooks"));

    let sources = vec![
        json!({"chainID": 10, "token": "USDC"}),
        json!({"chainID": 8453, "token": "USDC"}),
    ];
    let response = sdk
        .fire_allowance(sources.clone())
        .expect("answered without user interaction");
    assert_eq!(
        response,
        AllowanceResponse::Allow(vec![AllowanceChoice::Min, AllowanceChoice::Min])
    );
    assert!(panel.intents().is_empty());
    assert_eq!(panel.activity().allowance_sources, Some(sources));
}

#[test]
fn intent_waits_for_user_decision() {
    let sdk = MockSdk::default();
    let mut panel = BridgePanel::default();
    panel.ensure_hooks(&sdk, 1).expect("register hooks");

    let intent = json!({"sources": [{"chainID": 10}], "destination": {"chainID": 1}});
    let decision = sdk.fire_intent(intent.clone());
    assert!(decision.try_recv().is_err(), "must block until the user answers");
    assert_eq!(panel.intents().front_intent(), Some(intent.clone()));
    assert_eq!(panel.activity().intent, Some(intent));

    assert!(panel.intents().accept_front());
    assert_eq!(decision.recv().expect("decision"), IntentDecision::Allow);
}

#[test]
fn rejected_intent_is_denied() {
    let sdk = MockSdk::default();
    let mut panel = BridgePanel::default();
    panel.ensure_hooks(&sdk, 1).expect("register hooks");
    let decision = sdk.fire_intent(json!({"id": "abc"}));
    assert!(panel.intents().reject_front());
    assert_eq!(decision.recv().expect("decision"), IntentDecision::Deny);
}

#[test]
fn hooks_register_once_per_session() {
    let sdk = MockSdk::default();
    let mut panel = BridgePanel::default();
    assert!(panel.ensure_hooks(&sdk, 1).expect("first"));
    assert!(!panel.ensure_hooks(&sdk, 1).expect("same session"));
    assert_eq!(sdk.registrations(), (1, 1));

    let replacement = MockSdk::default();
    assert!(panel.ensure_hooks(&replacement, 2).expect("new session"));
    assert_eq!(replacement.registrations(), (1, 1));
    assert_eq!(panel.hooks_epoch(), Some(2));
}

#[test]
fn reset_denies_pending_intents_and_forgets_hooks() {
    let sdk = MockSdk::default();
    let mut panel = BridgePanel::default();
    panel.ensure_hooks(&sdk, 1).expect("register");
    let decision = sdk.fire_intent(json!({"id": 1}));
    panel.reset();
    assert_eq!(decision.recv().expect("decision"), IntentDecision::Deny);
    assert_eq!(panel.hooks_epoch(), None);
    assert!(panel.activity().intent.is_none());
}

#[tokio::test]
async fn bridge_simulate_and_execute_are_independent() {
    let sdk = MockSdk::default();
    sdk.fail_on("simulate_bridge");
    let mut panel = BridgePanel::default();
    panel.form.amount = "0.5".to_owned();

    let params = panel.begin_simulate(true).expect("params");
    let outcome = sdk.simulate_bridge(&params).await;
    panel.finish_simulate(outcome).expect("finish simulate");
    assert_eq!(panel.simulation().status(), RequestStatus::Failed);

    let params = panel.begin_execute(true).expect("params");
    assert_eq!(panel.status(), Some("Bridging..."));
    let outcome = sdk.bridge(&params).await;
    panel.finish_execute(outcome).expect("finish execute");
    assert_eq!(panel.execution().status(), RequestStatus::Succeeded);
    assert_eq!(panel.status(), Some("Bridge sent!"));
    assert_eq!(panel.form.amount, "0.5");
}

#[test]
fn bridge_requires_amount() {
    let mut panel = BridgePanel::default();
    assert!(!panel.can_simulate(true));
    assert!(!panel.can_execute(true));
    assert_eq!(
        panel.begin_execute(true).expect_err("no amount"),
        "Amount required"
    );
}
