//! Main application state and update loop

use std::sync::Arc;

use alloy::primitives::Address;
use eframe::egui;
use serde_json::Value;

use nexus_console_core::{
    teardown_session, BalanceAsset, BalanceViewer, BridgePanel, NexusSdkPort, PortError,
    RequestSlot, SessionHolder, TransferPanel, WalletConnector,
};

use crate::sdk_bridge::{Sdk, SdkBridge};
use crate::tasks::{self, Slot, Spawner};
use crate::views::{self, session::SessionCommand, session::SessionView, PanelCommand};

/// An SDK outcome tagged with the session epoch it was issued under.
type Tagged<T> = (u64, Result<T, PortError>);

/// Background call results, drained once per frame.
struct Pending {
    connect: Slot<Result<Vec<Address>, PortError>>,
    init: Slot<Result<Sdk, PortError>>,
    teardown: Slot<Result<(), PortError>>,
    chain: Slot<Result<u64, String>>,
    balances: Slot<Tagged<Vec<BalanceAsset>>>,
    transfer_simulation: Slot<Tagged<Value>>,
    transfer_execution: Slot<Tagged<Value>>,
    bridge_simulation: Slot<Tagged<Value>>,
    bridge_execution: Slot<Tagged<Value>>,
}

impl Default for Pending {
    fn default() -> Self {
        Self {
            connect: tasks::slot(),
            init: tasks::slot(),
            teardown: tasks::slot(),
            chain: tasks::slot(),
            balances: tasks::slot(),
            transfer_simulation: tasks::slot(),
            transfer_execution: tasks::slot(),
            bridge_simulation: tasks::slot(),
            bridge_execution: tasks::slot(),
        }
    }
}

pub struct App {
    bridge: SdkBridge,
    spawner: Spawner,
    pending: Pending,
    wallet: WalletConnector,
    session: SessionHolder<Sdk>,
    balances: BalanceViewer,
    transfer: TransferPanel,
    bridge_panel: BridgePanel,
    /// Display-only chain of the public RPC endpoint.
    chain: RequestSlot<u64>,
    /// Epoch whose hook registration failed; not retried until the session changes.
    hooks_failed_epoch: Option<u64>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>) -> eyre::Result<Self> {
        let mut app = Self {
            bridge: SdkBridge::default(),
            spawner: Spawner::new()?,
            pending: Pending::default(),
            wallet: WalletConnector::default(),
            session: SessionHolder::default(),
            balances: BalanceViewer::default(),
            transfer: TransferPanel::default(),
            bridge_panel: BridgePanel::default(),
            chain: RequestSlot::default(),
            hooks_failed_epoch: None,
        };
        app.refresh_chain(&cc.egui_ctx);
        Ok(app)
    }

    fn has_session(&self) -> bool {
        self.session.live_epoch().is_some()
    }

    /// Live session handle with its epoch.
    fn live(&self) -> Option<(Arc<Sdk>, u64)> {
        Some((self.session.current()?, self.session.live_epoch()?))
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    fn connect_wallet(&mut self, ctx: &egui::Context) {
        if let Err(e) = self.wallet.begin_connect() {
            tracing::debug!(error = %e, "connect ignored");
            return;
        }
        let bridge = self.bridge.clone();
        self.spawner
            .spawn(ctx, &self.pending.connect, move || bridge.connect_wallet());
    }

    fn initialize(&mut self, ctx: &egui::Context) {
        if let Err(e) = self.session.begin_init() {
            tracing::debug!(error = %e, "initialize ignored");
            return;
        }
        let bridge = self.bridge.clone();
        self.spawner
            .spawn(ctx, &self.pending.init, move || bridge.start_session());
    }

    fn teardown(&mut self, ctx: &egui::Context) {
        let sdk = match self.session.take_for_teardown() {
            Ok(sdk) => sdk,
            Err(e) => {
                tracing::debug!(error = %e, "teardown ignored");
                return;
            }
        };
        self.balances.reset();
        self.transfer.reset();
        self.bridge_panel.reset();
        self.hooks_failed_epoch = None;
        self.spawner.spawn(ctx, &self.pending.teardown, move || async move {
            teardown_session(sdk.as_ref()).await
        });
    }

    fn refresh_chain(&mut self, ctx: &egui::Context) {
        if self.chain.start().is_err() {
            return;
        }
        let bridge = self.bridge.clone();
        self.spawner.spawn(ctx, &self.pending.chain, move || async move {
            bridge.fetch_chain_id().await.map_err(|e| format!("{e:#}"))
        });
    }

    fn fetch_balances(&mut self, ctx: &egui::Context) {
        let Some((sdk, epoch)) = self.live() else {
            return;
        };
        if let Err(e) = self.balances.begin_fetch(epoch) {
            tracing::debug!(error = %e, "balance fetch ignored");
            return;
        }
        self.spawner.spawn(ctx, &self.pending.balances, move || async move {
            (epoch, sdk.get_unified_balances().await)
        });
    }

    fn transfer_command(&mut self, ctx: &egui::Context, command: PanelCommand) {
        let live = self.live();
        let has_session = live.is_some();
        match command {
            PanelCommand::Simulate => {
                let Ok(params) = self.transfer.begin_simulate(has_session) else {
                    return;
                };
                let Some((sdk, epoch)) = live else { return };
                self.spawner.spawn(ctx, &self.pending.transfer_simulation, move || async move {
                    (epoch, sdk.simulate_transfer(&params).await)
                });
            }
            PanelCommand::Execute => {
                let Ok(params) = self.transfer.begin_execute(has_session) else {
                    return;
                };
                let Some((sdk, epoch)) = live else { return };
                self.spawner.spawn(ctx, &self.pending.transfer_execution, move || async move {
                    (epoch, sdk.transfer(&params).await)
                });
            }
        }
    }

    fn bridge_command(&mut self, ctx: &egui::Context, command: PanelCommand) {
        let live = self.live();
        let has_session = live.is_some();
        match command {
            PanelCommand::Simulate => {
                let Ok(params) = self.bridge_panel.begin_simulate(has_session) else {
                    return;
                };
                let Some((sdk, epoch)) = live else { return };
                self.spawner.spawn(ctx, &self.pending.bridge_simulation, move || async move {
                    (epoch, sdk.simulate_bridge(&params).await)
                });
            }
            PanelCommand::Execute => {
                let Ok(params) = self.bridge_panel.begin_execute(has_session) else {
                    return;
                };
                let Some((sdk, epoch)) = live else { return };
                self.spawner.spawn(ctx, &self.pending.bridge_execution, move || async move {
                    (epoch, sdk.bridge(&params).await)
                });
            }
        }
    }

    // =========================================================================
    // RESULTS
    // =========================================================================

    fn check_results(&mut self) {
        if let Some(outcome) = tasks::take(&self.pending.connect) {
            log_late(self.wallet.finish_connect(outcome));
        }
        if let Some(outcome) = tasks::take(&self.pending.init) {
            if let Err(e) = self.session.complete_init(outcome) {
                tracing::warn!(error = %e, "init result dropped");
            }
        }
        if let Some(Err(e)) = tasks::take(&self.pending.teardown) {
            self.session.record_teardown_failure(&e);
        }
        if let Some(outcome) = tasks::take(&self.pending.chain) {
            log_late(match outcome {
                Ok(chain_id) => self.chain.succeed(chain_id),
                Err(e) => {
                    tracing::warn!(error = %e, "chain id lookup failed");
                    self.chain.fail(e)
                }
            });
        }
        if let Some((epoch, outcome)) = tasks::take(&self.pending.balances) {
            log_late(self.balances.finish_fetch(epoch, outcome));
        }

        let live = self.session.live_epoch();
        if let Some(outcome) = current(live, tasks::take(&self.pending.transfer_simulation)) {
            log_late(self.transfer.finish_simulate(outcome));
        }
        if let Some(outcome) = current(live, tasks::take(&self.pending.transfer_execution)) {
            log_late(self.transfer.finish_execute(outcome));
        }
        if let Some(outcome) = current(live, tasks::take(&self.pending.bridge_simulation)) {
            log_late(self.bridge_panel.finish_simulate(outcome));
        }
        if let Some(outcome) = current(live, tasks::take(&self.pending.bridge_execution)) {
            log_late(self.bridge_panel.finish_execute(outcome));
        }
    }

    /// Per-session work: one balance fetch per epoch and hook registration.
    fn sync_session(&mut self, ctx: &egui::Context) {
        let Some((sdk, epoch)) = self.live() else {
            return;
        };
        if self.balances.needs_fetch(Some(epoch)) {
            self.fetch_balances(ctx);
        }
        if self.hooks_failed_epoch != Some(epoch) {
            if let Err(e) = self.bridge_panel.ensure_hooks(sdk.as_ref(), epoch) {
                tracing::error!(error = %e, epoch, "failed to register bridge hooks");
                self.hooks_failed_epoch = Some(epoch);
            }
        }
    }
}

/// Keeps an outcome only if it belongs to the live session.
fn current<T>(live: Option<u64>, tagged: Option<Tagged<T>>) -> Option<Result<T, PortError>> {
    let (epoch, outcome) = tagged?;
    if live == Some(epoch) {
        Some(outcome)
    } else {
        tracing::debug!(epoch, ?live, "dropping result from a previous session");
        None
    }
}

fn log_late<E: std::fmt::Display>(applied: Result<(), E>) {
    if let Err(e) = applied {
        tracing::debug!(error = %e, "late result ignored");
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        self.check_results();
        self.sync_session(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(
                    egui::RichText::new("🌐 Nexus Console")
                        .size(22.0)
                        .color(egui::Color32::from_rgb(0, 212, 170)),
                );
                ui.add_space(20.0);
                ui.label(
                    egui::RichText::new(format!("network: {}", self.bridge.config().network.as_str()))
                        .weak(),
                );
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "v{} · {} · built {}",
                        env!("CARGO_PKG_VERSION"),
                        env!("GIT_HASH"),
                        env!("BUILD_TIME")
                    ))
                    .weak()
                    .small(),
                );
            });
        });

        let has_session = self.has_session();
        let mut session_command = None;
        let mut refresh_balances = false;
        let mut transfer_command = None;
        let mut bridge_command = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                session_command = SessionView {
                    wallet: &self.wallet,
                    session: &self.session,
                    chain: &self.chain,
                    runtime_note: self.bridge.runtime_note(),
                }
                .show(ui);

                refresh_balances = views::balance::show(ui, &mut self.balances, has_session);
                transfer_command = views::transfer::show(ui, &mut self.transfer, has_session);

                let recipient = self.wallet.display_address();
                bridge_command = views::bridge::show(
                    ui,
                    &mut self.bridge_panel,
                    has_session,
                    recipient.as_deref(),
                );
                ui.add_space(20.0);
            });
        });

        views::bridge::intent_modal(ctx, self.bridge_panel.intents());

        match session_command {
            Some(SessionCommand::ConnectWallet) => self.connect_wallet(ctx),
            Some(SessionCommand::Initialize) => self.initialize(ctx),
            Some(SessionCommand::Teardown) => self.teardown(ctx),
            Some(SessionCommand::RefreshChain) => self.refresh_chain(ctx),
            None => {}
        }
        if refresh_balances {
            self.balances.request_refresh();
            self.fetch_balances(ctx);
        }
        if let Some(command) = transfer_command {
            self.transfer_command(ctx, command);
        }
        if let Some(command) = bridge_command {
            self.bridge_command(ctx, command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_from_old_sessions_are_dropped() {
        let old: Option<Tagged<u32>> = Some((1, Ok(5)));
        assert!(current(Some(2), old).is_none());

        let live: Option<Tagged<u32>> = Some((2, Ok(5)));
        assert!(matches!(current(Some(2), live), Some(Ok(5))));

        let after_teardown: Option<Tagged<u32>> = Some((2, Ok(5)));
        assert!(current(None, after_teardown).is_none());
    }
}
