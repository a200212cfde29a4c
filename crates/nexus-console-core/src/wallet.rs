use alloy::primitives::Address;

use crate::domain::truncate_address;
use crate::ports::PortError;
use crate::state_machine::{RequestSlot, TransitionError};

pub const NO_WALLET_MESSAGE: &str =
    "No EVM wallet found. Please install MetaMask or another wallet.";

/// Requests account access once per click and remembers the first account.
#[derive(Debug, Default)]
pub struct WalletConnector {
    slot: RequestSlot<Address>,
}

impl WalletConnector {
    pub fn begin_connect(&mut self) -> Result<(), TransitionError> {
        self.slot.start()
    }

    pub fn finish_connect(
        &mut self,
        outcome: Result<Vec<Address>, PortError>,
    ) -> Result<(), TransitionError> {
        match outcome {
            Ok(accounts) => match accounts.first() {
                Some(first) => {
                    tracing::info!(account = %first, "wallet connected");
                    self.slot.succeed(*first)
                }
                None => self.slot.fail("Wallet returned no accounts"),
            },
            Err(PortError::NotFound(detail)) => {
                tracing::warn!(%detail, "no injected wallet provider");
                self.slot.fail(NO_WALLET_MESSAGE)
            }
            Err(e) => {
                tracing::warn!(error = %e, "wallet connection failed");
                self.slot.fail(format!("Error connecting wallet: {e}"))
            }
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.slot.result().copied()
    }

    pub fn display_address(&self) -> Option<String> {
        self.address().map(|a| truncate_address(&a.to_string()))
    }

    pub fn is_connecting(&self) -> bool {
        self.slot.is_in_flight()
    }

    pub fn error(&self) -> Option<&str> {
        self.slot.error()
    }
}

