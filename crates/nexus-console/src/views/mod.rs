//! Per-panel views. Each view draws one controller and reports what the user
//! asked for; the app performs it.

pub mod balance;
pub mod bridge;
pub mod session;
pub mod transfer;

use eframe::egui;
use serde_json::Value;

use nexus_console_core::{RequestSlot, SupportedChain, Token};

use crate::ui;

/// Simulate/execute request raised by the transfer and bridge panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    Simulate,
    Execute,
}

fn token_select(ui: &mut egui::Ui, id: &str, token: &mut Token) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(token.symbol())
        .show_ui(ui, |ui| {
            for option in Token::ALL {
                ui.selectable_value(token, option, option.symbol());
            }
        });
}

fn chain_select(ui: &mut egui::Ui, id: &str, chain: &mut Option<SupportedChain>) {
    let selected = chain.map(SupportedChain::name).unwrap_or("Select chain");
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for option in SupportedChain::ALL {
                ui.selectable_value(chain, Some(option), option.name());
            }
        });
}

/// Simulate and execute buttons side by side.
fn action_row(
    ui: &mut egui::Ui,
    execute_label: &str,
    can_simulate: bool,
    can_execute: bool,
) -> Option<PanelCommand> {
    let mut command = None;
    ui.horizontal(|ui| {
        if ui::secondary_button_enabled(ui, "Simulate", can_simulate).clicked() {
            command = Some(PanelCommand::Simulate);
        }
        if ui::primary_button_enabled(ui, execute_label, can_execute).clicked() {
            command = Some(PanelCommand::Execute);
        }
    });
    command
}

/// Spinner, error or JSON result of one request slot.
fn request_result(ui: &mut egui::Ui, id: &str, title: &str, slot: &RequestSlot<Value>) {
    if slot.is_in_flight() {
        ui::loading_spinner(ui, &format!("{title}..."));
    } else if let Some(error) = slot.error() {
        ui::error_message(ui, error);
    } else if let Some(result) = slot.result() {
        ui::json_view(ui, id, title, result);
    }
}

/// Explorer link for an execution result. Prefers the SDK's own `explorerUrl`,
/// else builds one from the transaction hash and the result's chain.
fn tx_link(ui: &mut egui::Ui, fallback_chain: Option<SupportedChain>, slot: &RequestSlot<Value>) {
    let Some(result) = slot.result() else {
        return;
    };
    let hash = ui::result_tx_hash(result);
    let chain_id = result
        .get("chainId")
        .and_then(Value::as_u64)
        .or(fallback_chain.map(SupportedChain::id));
    let url = match (result.get("explorerUrl").and_then(Value::as_str), hash, chain_id) {
        (Some(url), _, _) => url.to_owned(),
        (None, Some(hash), Some(chain_id)) => ui::explorer_tx_url(chain_id, hash),
        _ => return,
    };
    ui.horizontal(|ui| {
        if ui.link("View on explorer").clicked() {
            ui::open_url_new_tab(&url);
        }
        if let Some(hash) = hash {
            ui::copy_button(ui, hash);
        }
    });
}
