use eframe::egui;

use nexus_console_core::{format_fiat, format_token_amount, BalanceViewer};

use crate::ui;

/// Returns true when the user asked for a refresh.
pub fn show(ui: &mut egui::Ui, viewer: &mut BalanceViewer, has_session: bool) -> bool {
    let mut refresh = false;

    ui::section_header(ui, "Unified Balance");
    if !has_session {
        ui::info_message(ui, "Initialize Nexus to see your unified balance.");
        return false;
    }

    ui::card(ui, |ui| {
        ui.horizontal(|ui| {
            let headline = format!("Unified Balance: {}", format_fiat(viewer.total_fiat()));
            let arrow = if viewer.expanded { "▼" } else { "▶" };
            if ui
                .button(egui::RichText::new(format!("{arrow} {headline}")).strong().size(15.0))
                .clicked()
            {
                viewer.expanded = !viewer.expanded;
            }
            let idle = !viewer.is_loading();
            if ui::secondary_button_enabled(ui, "Refresh", idle).clicked() {
                refresh = true;
            }
        });

        if viewer.is_loading() {
            ui::loading_spinner(ui, "Loading balances...");
        }
        if let Some(error) = viewer.error() {
            ui::error_message(ui, error);
        }
        if !viewer.expanded {
            return;
        }

        ui.add_space(6.0);
        ui.label(egui::RichText::new("Portfolio Breakdown").strong());
        if viewer.is_empty() {
            ui::info_message(ui, "No balances found.");
        }
        for asset in viewer.balances() {
            ui.separator();
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&asset.symbol).strong().monospace());
                ui.label(format_token_amount(&asset.balance));
                ui.label(egui::RichText::new(format_fiat(asset.balance_in_fiat)).weak());
            });
            egui::Grid::new(format!("breakdown_{}", asset.symbol))
                .num_columns(3)
                .spacing([16.0, 2.0])
                .show(ui, |ui| {
                    for row in asset.non_zero_breakdown() {
                        ui.label(format!("  {}", row.chain.name));
                        ui.label(egui::RichText::new(format_token_amount(&row.balance)).monospace());
                        ui.label(egui::RichText::new(format_fiat(row.balance_in_fiat)).weak());
                        ui.end_row();
                    }
                });
        }
    });

    refresh
}
