use crate::domain::{unified_total_fiat, BalanceAsset};
use crate::ports::PortError;
use crate::state_machine::{RequestSlot, TransitionError};

pub const BALANCE_FETCH_FAILED: &str = "Failed to fetch balances";

/// Unified balance snapshot for the live session. Fetched once per session
/// epoch or on explicit refresh; never polled.
#[derive(Debug, Default)]
pub struct BalanceViewer {
    slot: RequestSlot<Vec<BalanceAsset>>,
    fetched_epoch: Option<u64>,
    pub expanded: bool,
}

impl BalanceViewer {
    pub fn needs_fetch(&self, live_epoch: Option<u64>) -> bool {
        match live_epoch {
            Some(epoch) => self.fetched_epoch != Some(epoch) && !self.slot.is_in_flight(),
            None => false,
        }
    }

    pub fn begin_fetch(&mut self, epoch: u64) -> Result<(), TransitionError> {
        self.slot.start()?;
        self.fetched_epoch = Some(epoch);
        Ok(())
    }

    /// Applies a fetch outcome. Outcomes for a session other than the one the
    /// fetch was started for are dropped.
    pub fn finish_fetch(
        &mut self,
        epoch: u64,
        outcome: Result<Vec<BalanceAsset>, PortError>,
    ) -> Result<(), TransitionError> {
        if self.fetched_epoch != Some(epoch) || !self.slot.is_in_flight() {
            tracing::debug!(epoch, "dropping stale balance response");
            return Ok(());
        }
        match outcome {
            Ok(assets) => {
                tracing::debug!(assets = assets.len(), "unified balances received");
                self.slot.succeed(assets)
            }
            Err(e) => {
                tracing::warn!(error = %e, "unified balance fetch failed");
                self.slot.fail(BALANCE_FETCH_FAILED)
            }
        }
    }

    /// Forces one more fetch for the current session.
    pub fn request_refresh(&mut self) {
        if !self.slot.is_in_flight() {
            self.fetched_epoch = None;
        }
    }

    pub fn reset(&mut self) {
        self.slot.reset();
        self.fetched_epoch = None;
        self.expanded = false;
    }

    pub fn balances(&self) -> &[BalanceAsset] {
        self.slot.result().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_fiat(&self) -> f64 {
        unified_total_fiat(self.balances())
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_in_flight()
    }

    pub fn error(&self) -> Option<&str> {
        self.slot.error()
    }

    /// True when a fetch succeeded but returned nothing.
    pub fn is_empty(&self) -> bool {
        self.slot.result().is_some_and(Vec::is_empty)
    }
}
