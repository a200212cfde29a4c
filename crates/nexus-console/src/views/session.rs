use eframe::egui;

use nexus_console_core::{chain_display_name, RequestSlot, SessionHolder, WalletConnector};

use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    ConnectWallet,
    Initialize,
    Teardown,
    RefreshChain,
}

pub struct SessionView<'a, S> {
    pub wallet: &'a WalletConnector,
    pub session: &'a SessionHolder<S>,
    pub chain: &'a RequestSlot<u64>,
    pub runtime_note: Option<&'static str>,
}

impl<S> SessionView<'_, S> {
    pub fn show(&self, ui: &mut egui::Ui) -> Option<SessionCommand> {
        let mut command = None;

        ui::section_header(ui, "Nexus SDK Initialization");
        ui::card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Network:");
                if self.chain.is_in_flight() {
                    ui.spinner();
                } else {
                    let name = chain_display_name(self.chain.result().copied());
                    ui.label(egui::RichText::new(name).strong())
                        .on_hover_text(self.chain.error().unwrap_or("Chain reported by the public RPC"));
                }
                if ui.small_button("🔄").on_hover_text("Re-read chain id").clicked() {
                    command = Some(SessionCommand::RefreshChain);
                }
            });
            if let Some(note) = self.runtime_note {
                ui::info_message(ui, note);
            }
            ui.add_space(6.0);

            if let Some(error) = self.wallet.error() {
                ui::error_message(ui, error);
            }
            if let Some(error) = self.session.last_error() {
                ui::error_message(ui, error);
            }

            match (self.wallet.address(), self.wallet.display_address()) {
                (Some(address), Some(short)) => {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new("Connected:")
                                .color(egui::Color32::from_rgb(80, 200, 120)),
                        );
                        let chain_id = self.chain.result().copied().unwrap_or(1);
                        ui::address_link(ui, chain_id, &short, &address.to_string());
                    });
                    ui.add_space(4.0);
                    let label = self.session.init_button_label();
                    if ui::primary_button_enabled(ui, label, self.session.can_init()).clicked() {
                        command = Some(SessionCommand::Initialize);
                    }
                    if self.session.is_initializing() {
                        ui::loading_spinner(ui, "Initializing...");
                    }
                }
                _ => {
                    let label = if self.wallet.is_connecting() {
                        "Connecting..."
                    } else {
                        "Connect Wallet"
                    };
                    if ui::primary_button_enabled(ui, label, !self.wallet.is_connecting())
                        .clicked()
                    {
                        command = Some(SessionCommand::ConnectWallet);
                    }
                }
            }

            ui.add_space(4.0);
            let kill_label = if self.session.can_teardown() {
                "Kill Nexus"
            } else {
                "Nexus Not Initialized"
            };
            if ui::secondary_button_enabled(ui, kill_label, self.session.can_teardown()).clicked() {
                command = Some(SessionCommand::Teardown);
            }
        });

        command
    }
}
