use eframe::egui;

use nexus_console_core::{BridgePanel, IntentInbox};

use super::{action_row, chain_select, request_result, token_select, tx_link, PanelCommand};
use crate::ui;

pub fn show(
    ui: &mut egui::Ui,
    panel: &mut BridgePanel,
    has_session: bool,
    recipient: Option<&str>,
) -> Option<PanelCommand> {
    ui::section_header(ui, "Bridge");

    let mut command = None;
    ui::card(ui, |ui| {
        egui::Grid::new("bridge_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Amount:");
                ui.horizontal(|ui| {
                    ui::amount_input(ui, &mut panel.form.amount);
                    token_select(ui, "bridge_token", &mut panel.form.token);
                });
                ui.end_row();

                ui.label("Destination:");
                chain_select(ui, "bridge_chain", &mut panel.form.destination_chain);
                ui.end_row();

                ui.label("Recipient:");
                ui.label(egui::RichText::new(recipient.unwrap_or("Connected wallet")).monospace().weak());
                ui.end_row();
            });

        ui.add_space(8.0);
        command = action_row(
            ui,
            "Bridge",
            panel.can_simulate(has_session),
            panel.can_execute(has_session),
        );
        if let Some(missing) = panel.missing_input(has_session) {
            ui::info_message(ui, missing);
        }

        if let Some(status) = panel.status() {
            if panel.execution().is_in_flight() {
                ui::loading_spinner(ui, status);
            } else {
                ui::success_message(ui, status);
            }
        }
        request_result(ui, "bridge_simulation", "Simulation", panel.simulation());
        request_result(ui, "bridge_execution", "Bridge result", panel.execution());
        tx_link(ui, panel.form.destination_chain, panel.execution());

        let activity = panel.activity();
        if activity.allowance_sources.is_some() || activity.intent.is_some() {
            ui.collapsing("SDK hook activity", |ui| {
                if let Some(sources) = activity.allowance_sources {
                    ui::json_view(
                        ui,
                        "bridge_allowance",
                        "Allowance sources (minimum granted)",
                        &serde_json::Value::Array(sources),
                    );
                }
                if let Some(intent) = &activity.intent {
                    ui::json_view(ui, "bridge_intent", "Last intent", intent);
                }
            });
        }
    });

    command
}

/// Modal confirmation for the oldest pending bridge intent. The SDK stays
/// suspended until Accept or Reject is clicked.
pub fn intent_modal(ctx: &egui::Context, inbox: &IntentInbox) {
    let Some(intent) = inbox.front_intent() else {
        return;
    };
    let waiting = inbox.len();

    egui::Window::new("Confirm bridge intent")
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(520.0)
        .show(ctx, |ui| {
            ui.label("Review the intent the SDK is about to submit.");
            if waiting > 1 {
                ui::info_message(ui, &format!("{} more waiting", waiting - 1));
            }
            ui.add_space(6.0);
            ui::json_view(ui, "intent_modal_json", "Intent", &intent);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui::primary_button_enabled(ui, "Accept", true).clicked() {
                    inbox.accept_front();
                }
                if ui::secondary_button_enabled(ui, "Reject", true).clicked() {
                    inbox.reject_front();
                }
            });
        });
}
