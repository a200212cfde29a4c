mod common;

use nexus_console_core::{NexusSdkPort, RequestStatus, Token, TransferPanel};

use common::{recipient, MockSdk};

fn filled_panel() -> TransferPanel {
    let mut panel = TransferPanel::default();
    panel.form.recipient = recipient();
    panel.form.amount = "0.015".to_owned();
    panel.form.token = Token::Usdc;
    panel
}

#[test]
fn missing_recipient_or_amount_blocks_both_actions() {
    let mut panel = filled_panel();
    panel.form.recipient.clear();
    assert!(!panel.can_simulate(true));
    assert!(!panel.can_execute(true));
    assert_eq!(
        panel.begin_simulate(true).expect_err("no recipient"),
        "Recipient address required"
    );

    let mut panel = filled_panel();
    panel.form.amount = "   ".to_owned();
    assert!(!panel.can_simulate(true));
    assert!(!panel.can_execute(true));
    assert_eq!(
        panel.begin_execute(true).expect_err("no amount"),
        "Amount required"
    );
    assert_eq!(panel.execution().error(), Some("Amount required"));
    assert_eq!(panel.execution().status(), RequestStatus::Failed);
}

#[test]
fn session_and_chain_are_required() {
    let mut panel = filled_panel();
    assert!(!panel.can_submit(false));
    assert_eq!(
        panel.begin_simulate(false).expect_err("no session"),
        "Nexus SDK not initialized!"
    );
    panel.form.destination_chain = None;
    assert_eq!(
        panel.missing_input(true),
        Some("No destination chain selected")
    );
}

#[test]
fn malformed_inputs_are_rejected_before_dispatch() {
    let mut panel = filled_panel();
    panel.form.recipient = "0xnot-an-address".to_owned();
    assert!(panel.can_submit(true));
    let err = panel.begin_simulate(true).expect_err("bad recipient");
    assert!(err.starts_with("Invalid recipient address"));

    let mut panel = filled_panel();
    panel.form.amount = "1e3".to_owned();
    let err = panel.begin_execute(true).expect_err("bad amount");
    assert!(err.starts_with("Invalid amount"));
}

#[tokio::test]
async fn simulate_failure_does_not_affect_execute() {
    let sdk = MockSdk::default();
    sdk.fail_on("simulate_transfer");
    let mut panel = filled_panel();

    let params = panel.begin_simulate(true).expect("simulate params");
    assert_eq!(params.amount, "0.015");
    assert_eq!(params.chain_id, 1);
    let outcome = sdk.simulate_transfer(&params).await;
    panel.finish_simulate(outcome).expect("finish simulate");
    assert_eq!(panel.simulation().status(), RequestStatus::Failed);
    assert_eq!(
        panel.simulation().error(),
        Some("simulate_transfer rejected by mock")
    );

    assert!(panel.can_execute(true));
    let params = panel.begin_execute(true).expect("execute params");
    assert_eq!(panel.status(), Some("Sending transfer..."));
    let outcome = sdk.transfer(&params).await;
    panel.finish_execute(outcome).expect("finish execute");

    assert_eq!(panel.execution().status(), RequestStatus::Succeeded);
    assert!(panel.execution().error().is_none());
    assert_eq!(panel.status(), Some("Transfer successful!"));
    assert_eq!(
        panel.simulation().error(),
        Some("simulate_transfer rejected by mock")
    );
    assert_eq!(sdk.calls(), vec!["simulate_transfer", "transfer"]);
}

#[tokio::test]
async fn successful_transfer_clears_inputs() {
    let sdk = MockSdk::default();
    let mut panel = filled_panel();
    let params = panel.begin_execute(true).expect("params");
    let outcome = sdk.transfer(&params).await;
    panel.finish_execute(outcome).expect("finish");

    assert!(panel.form.recipient.is_empty());
    assert!(panel.form.amount.is_empty());
    assert_eq!(panel.form.token, Token::Usdc);
    let result = panel.execution().result().expect("result kept");
    assert_eq!(result["params"]["amount"], "0.015");
    assert_eq!(result["params"]["token"], "USDC");
    assert_eq!(result["params"]["chainId"], 1);
}

#[tokio::test]
async fn failed_transfer_keeps_inputs() {
    let sdk = MockSdk::default();
    sdk.fail_on("transfer");
    let mut panel = filled_panel();
    let params = panel.begin_execute(true).expect("params");
    let outcome = sdk.transfer(&params).await;
    panel.finish_execute(outcome).expect("finish");

    assert_eq!(panel.form.amount, "0.015");
    assert!(panel.status().is_none());
    assert_eq!(panel.execution().error(), Some("transfer rejected by mock"));
}

#[test]
fn simulate_cannot_overlap_itself() {
    let mut panel = filled_panel();
    panel.begin_simulate(true).expect("first");
    assert!(!panel.can_simulate(true));
    assert!(panel.can_execute(true));
    assert!(panel.begin_simulate(true).is_err());
}
