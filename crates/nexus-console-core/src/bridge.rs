use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::domain::{parse_decimal_amount, BridgeParams, SupportedChain, Token};
use crate::hooks::{
    approve_minimum_allowance, AllowanceHook, AllowanceRequest, IntentHook, IntentInbox,
    IntentRequest,
};
use crate::ports::{NexusSdkPort, PortError};
use crate::state_machine::{RequestSlot, TransitionError};
use crate::transfer::{failure_text, AMOUNT_REQUIRED, NO_DESTINATION_CHAIN, SDK_NOT_INITIALIZED};

#[derive(Debug, Clone)]
pub struct BridgeForm {
    pub amount: String,
    pub token: Token,
    pub destination_chain: Option<SupportedChain>,
}

impl Default for BridgeForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            token: Token::Eth,
            destination_chain: Some(SupportedChain::Ethereum),
        }
    }
}

/// What the SDK last asked for through the hooks, kept for display.
#[derive(Debug, Clone, Default)]
pub struct HookActivity {
    pub allowance_sources: Option<Vec<Value>>,
    pub intent: Option<Value>,
}

#[derive(Debug, Default)]
pub struct BridgePanel {
    pub form: BridgeForm,
    simulation: RequestSlot<Value>,
    execution: RequestSlot<Value>,
    status: Option<String>,
    hooks_epoch: Option<u64>,
    intents: IntentInbox,
    activity: Arc<Mutex<HookActivity>>,
}

impl BridgePanel {
    /// Registers the allowance and intent hooks on `sdk` unless they are
    /// already registered for this session epoch. Returns whether it registered.
    pub fn ensure_hooks<S: NexusSdkPort>(
        &mut self,
        sdk: &S,
        epoch: u64,
    ) -> Result<bool, PortError> {
        if self.hooks_epoch == Some(epoch) {
            return Ok(false);
        }

        let activity = Arc::clone(&self.activity);
        let allowance_hook: AllowanceHook = Arc::new(move |request: AllowanceRequest| {
            lock_activity(&activity).allowance_sources = Some(request.sources().to_vec());
            approve_minimum_allowance(request);
        });

        let activity = Arc::clone(&self.activity);
        let inbox = self.intents.clone();
        let intent_hook: IntentHook = Arc::new(move |request: IntentRequest| {
            tracing::info!("bridge intent awaiting confirmation");
            lock_activity(&activity).intent = Some(request.intent().clone());
            inbox.push(request);
        });

        sdk.set_on_allowance_hook(allowance_hook)?;
        sdk.set_on_intent_hook(intent_hook)?;
        self.hooks_epoch = Some(epoch);
        tracing::debug!(epoch, "bridge hooks registered");
        Ok(true)
    }

    pub fn hooks_epoch(&self) -> Option<u64> {
        self.hooks_epoch
    }

    pub fn intents(&self) -> &IntentInbox {
        &self.intents
    }

    pub fn activity(&self) -> HookActivity {
        lock_activity(&self.activity).clone()
    }

    pub fn missing_input(&self, has_session: bool) -> Option<&'static str> {
        if !has_session {
            Some(SDK_NOT_INITIALIZED)
        } else if self.form.destination_chain.is_none() {
            Some(NO_DESTINATION_CHAIN)
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

    fn build_params(&self, has_session: bool) -> Result<BridgeParams, String> {
        if let Some(missing) = self.missing_input(has_session) {
            return Err(missing.to_owned());
        }
        let chain = self
            .form
            .destination_chain
            .ok_or_else(|| NO_DESTINATION_CHAIN.to_owned())?;
        let amount =
            parse_decimal_amount(&self.form.amount).map_err(|e| format!("Invalid amount: {e}"))?;
        Ok(BridgeParams {
            token: self.form.token,
            amount,
            chain_id: chain.id(),
        })
    }

    pub fn begin_simulate(&mut self, has_session: bool) -> Result<BridgeParams, String> {
        match self.build_params(has_session) {
            Ok(params) => {
                self.simulation.start().map_err(|e| e.to_string())?;
                tracing::debug!(?params, "simulating bridge");
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
                tracing::warn!(error = %e, "bridge simulation failed");
                self.simulation.fail(failure_text(&e, "Simulation failed"))
            }
        }
    }

    pub fn begin_execute(&mut self, has_session: bool) -> Result<BridgeParams, String> {
        self.status = None;
        match self.build_params(has_session) {
            Ok(params) => {
                self.execution.start().map_err(|e| e.to_string())?;
                self.status = Some("Bridging...".to_owned());
                tracing::info!(?params, "bridging");
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
                tracing::info!(%result, "bridge sent");
                self.execution.succeed(result)?;
                self.status = Some("Bridge sent!".to_owned());
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "bridge failed");
                self.status = None;
                self.execution.fail(failure_text(&e, "Bridge failed"))
            }
        }
    }

    /// Forgets hook registration and denies pending intents. Called when the
    /// session goes away.
    pub fn reset(&mut self) {
        self.simulation.reset();
        self.execution.reset();
        self.status = None;
        self.hooks_epoch = None;
        self.intents.clear();
        *lock_activity(&self.activity) = HookActivity::default();
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

fn lock_activity(activity: &Mutex<HookActivity>) -> MutexGuard<'_, HookActivity> {
    activity.lock().unwrap_or_else(|e| e.into_inner())
}
