use alloy::primitives::Address;
use serde_json::Value;

use crate::domain::{parse_decimal_amount, SupportedChain, Token, TransferParams};
use crate::ports::PortError;
use crate::state_machine::{RequestSlot, TransitionError};

pub const SDK_NOT_INITIALIZED: &str = "Nexus SDK not initialized!";
pub const NO_DESTINATION_CHAIN: &str = "No destination chain selected";
pub const RECIPIENT_REQUIRED: &str = "Recipient address required";
pub const AMOUNT_REQUIRED: &str = "Amount required";

#[derive(Debug, Clone)]
pub struct TransferForm {
    pub recipient: String,
    pub amount: String,
    pub token: Token,
    pub destination_chain: Option<SupportedChain>,
}

impl Default for TransferForm {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            amount: String::new(),
            token: Token::Eth,
            destination_chain: Some(SupportedChain::Ethereum),
        }
    }
}

#[derive(Debug, Default)]
pub struct TransferPanel {
    pub form: TransferForm,
    simulation: RequestSlot<Value>,
    execution: RequestSlot<Value>,
    status: Option<String>,
}

impl TransferPanel {
    /// First missing precondition, in the order the user is told about them.
    pub fn missing_input(&self, has_session: bool) -> Option<&'static str> {
        if !has_session {
            Some(SDK_NOT_INITIALIZED)
        } else if self.form.destination_chain.is_none() {
            Some(NO_DESTINATION_CHAIN)
        } else if self.form.recipient.trim().is_empty() {
            Some(RECIPIENT_REQUIRED)
        } else if self.form.amount.trim().is_empty() {
            Some(AMOUNT_REQUIRED)
        } else {
            None
        }
    }

    pub fn can_submit(&self, has_session: bool) -> bool {
        self.missing_input(has_session).is_none()
    }

    pub fn can_simulate(&self, has_session: bool) -> bool {
        self.can_submit(has_session) && !self.simulation.is_in_flight()
    }

    pub fn can_execute(&self, has_session: bool) -> bool {
        self.can_submit(has_session) && !self.execution.is_in_flight()
    }

    fn build_params(&self, has_session: bool) -> Result<TransferParams, String> {
        if let Some(missing) = self.missing_input(has_session) {
            return Err(missing.to_owned());
        }
        let chain = self
            .form
            .destination_chain
            .ok_or_else(|| NO_DESTINATION_CHAIN.to_owned())?;
        let recipient: Address = self
            .form
            .recipient
            .trim()
            .parse()
            .map_err(|e| format!("Invalid recipient address: {e}"))?;
        let amount =
            parse_decimal_amount(&self.form.amount).map_err(|e| format!("Invalid amount: {e}"))?;
        Ok(TransferParams {
            token: self.form.token,
            amount,
            chain_id: chain.id(),
            recipient,
        })
    }

    pub fn begin_simulate(&mut self, has_session: bool) -> Result<TransferParams, String> {
        match self.build_params(has_session) {
            Ok(params) => {
                self.simulation.start().map_err(|e| e.to_string())?;
                tracing::debug!(?params, "simulating transfer");
                Ok(params)
            }
            Err(message) => {
                self.simulation
                    .reject(message.clone())
                    .map_err(|e| e.to_string())?;
                Err(message)
            }
        }
    }

    pub fn finish_simulate(
        &mut self,
        outcome: Result<Value, PortError>,
    ) -> Result<(), TransitionError> {
        match outcome {
            Ok(result) => self.simulation.succeed(result),
            Err(e) => {
                tracing::warn!(error = %e, "transfer simulation failed");
                self.simulation.fail(failure_text(&e, "Simulation failed"))
            }
        }
    }

    pub fn begin_execute(&mut self, has_session: bool) -> Result<TransferParams, String> {
        self.status = None;
        match self.build_params(has_session) {
            Ok(params) => {
                self.execution.start().map_err(|e| e.to_string())?;
                self.status = Some("Sending transfer...".to_owned());
                tracing::info!(?params, "sending transfer");
                Ok(params)
            }
            Err(message) => {
                self.execution
                    .reject(message.clone())
                    .map_err(|e| e.to_string())?;
                Err(message)
            }
        }
    }

    pub fn finish_execute(
        &mut self,
        outcome: Result<Value, PortError>,
    ) -> Result<(), TransitionError> {
        match outcome {
            Ok(result) => {
                self.execution.succeed(result)?;
                self.status = Some("Transfer successful!".to_owned());
                self.form.amount.clear();
                self.form.recipient.clear();
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "transfer failed");
                self.status = None;
                self.execution.fail(failure_text(&e, "Transfer failed"))
            }
        }
    }

    pub fn reset(&mut self) {
        self.simulation.reset();
        self.execution.reset();
        self.status = None;
    }

    pub fn simulation(&self) -> &RequestSlot<Value> {
        &self.simulation
    }

    pub fn execution(&self) -> &RequestSlot<Value> {
        &self.execution
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Error text for a failed SDK call, falling back when the SDK gave no message.
pub(crate) fn failure_text(error: &PortError, fallback: &str) -> String {
    let text = error.to_string();
    if text.trim().is_empty() {
        fallback.to_owned()
    } else {
        text
    }
}
