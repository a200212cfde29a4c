use eframe::egui;

use nexus_console_core::TransferPanel;

use super::{action_row, chain_select, request_result, token_select, tx_link, PanelCommand};
use crate::ui;

pub fn show(ui: &mut egui::Ui, panel: &mut TransferPanel, has_session: bool) -> Option<PanelCommand> {
    ui::section_header(ui, "Transfer");

    let mut command = None;
    ui::card(ui, |ui| {
        egui::Grid::new("transfer_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Recipient:");
                ui::address_input(ui, &mut panel.form.recipient);
                ui.end_row();

                ui.label("Amount:");
                ui.horizontal(|ui| {
                    ui::amount_input(ui, &mut panel.form.amount);
                    token_select(ui, "transfer_token", &mut panel.form.token);
                });
                ui.end_row();

                ui.label("Destination:");
                chain_select(ui, "transfer_chain", &mut panel.form.destination_chain);
                ui.end_row();
            });

        ui.add_space(8.0);
        command = action_row(
            ui,
            "Transfer",
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
        request_result(ui, "transfer_simulation", "Simulation", panel.simulation());
        request_result(ui, "transfer_execution", "Transfer result", panel.execution());
        tx_link(ui, panel.form.destination_chain, panel.execution());
    });

    command
}
