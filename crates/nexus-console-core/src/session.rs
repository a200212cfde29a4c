use std::sync::Arc;

use thiserror::Error;

use crate::ports::{NexusSdkPort, PortError};
use crate::state_machine::{session_transition, SessionAction, SessionStatus, TransitionError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Nexus SDK initialization already in progress")]
    InitInFlight,
    #[error("Nexus SDK already initialized")]
    AlreadyInitialized,
    #[error("Nexus SDK not initialized")]
    NotInitialized,
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Owns the single live SDK session of this tab.
///
/// The handle is only ever replaced wholesale. `epoch` increases on every
/// successful init so consumers can tell a new session from the old one.
#[derive(Debug)]
pub struct SessionHolder<S> {
    status: SessionStatus,
    session: Option<Arc<S>>,
    epoch: u64,
    last_error: Option<String>,
}

impl<S> Default for SessionHolder<S> {
    fn default() -> Self {
        Self {
            status: SessionStatus::Uninitialized,
            session: None,
            epoch: 0,
            last_error: None,
        }
    }
}

impl<S> SessionHolder<S> {
    fn apply(&mut self, action: SessionAction) -> Result<(), SessionError> {
        let (to, transition) = session_transition(self.status, action)?;
        tracing::debug!(from = ?transition.from, to = ?transition.to, reason = transition.reason);
        self.status = to;
        Ok(())
    }

    pub fn begin_init(&mut self) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Initializing => return Err(SessionError::InitInFlight),
            SessionStatus::Ready => return Err(SessionError::AlreadyInitialized),
            SessionStatus::Uninitialized => {}
        }
        self.apply(SessionAction::BeginInit)?;
        self.last_error = None;
        Ok(())
    }

    pub fn complete_init(&mut self, outcome: Result<S, PortError>) -> Result<(), SessionError> {
        match outcome {
            Ok(sdk) => {
                self.apply(SessionAction::InitSucceeded)?;
                self.epoch = self.epoch.saturating_add(1);
                self.session = Some(Arc::new(sdk));
                tracing::info!(epoch = self.epoch, "Nexus SDK initialized");
            }
            Err(e) => {
                self.apply(SessionAction::InitFailed)?;
                tracing::error!(error = %e, "Nexus SDK initialization failed");
                self.last_error = Some(format!("Failed to initialize Nexus SDK: {e}"));
            }
        }
        Ok(())
    }

    /// Detaches the live session so it can be torn down with [`teardown_session`].
    pub fn take_for_teardown(&mut self) -> Result<Arc<S>, SessionError> {
        if self.status != SessionStatus::Ready {
            return Err(SessionError::NotInitialized);
        }
        self.apply(SessionAction::Teardown)?;
        let session = self.session.take().ok_or(SessionError::NotInitialized)?;
        tracing::info!(epoch = self.epoch, "Nexus SDK session detached");
        Ok(session)
    }

    pub fn record_teardown_failure(&mut self, error: &PortError) {
        tracing::warn!(error = %error, "Nexus SDK deinit failed");
        self.last_error = Some(format!("Failed to deinitialize Nexus SDK: {error}"));
    }

    pub fn current(&self) -> Option<Arc<S>> {
        self.session.clone()
    }

    /// Epoch of the live session, if any.
    pub fn live_epoch(&self) -> Option<u64> {
        self.session.as_ref().map(|_| self.epoch)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == SessionStatus::Ready
    }

    pub fn is_initializing(&self) -> bool {
        self.status == SessionStatus::Initializing
    }

    pub fn can_init(&self) -> bool {
        self.status == SessionStatus::Uninitialized
    }

    pub fn can_teardown(&self) -> bool {
        self.is_ready()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn init_button_label(&self) -> &'static str {
        match self.status {
            SessionStatus::Initializing => "Initializing...",
            SessionStatus::Ready => "Nexus Initialized",
            SessionStatus::Uninitialized => "Initialize Nexus",
        }
    }
}

pub async fn initialize_session<S: NexusSdkPort>(sdk: S) -> Result<S, PortError> {
    tracing::info!("initializing Nexus SDK");
    sdk.initialize().await?;
    Ok(sdk)
}

/// Releases SDK event subscriptions, then deinitializes.
pub async fn teardown_session<S: NexusSdkPort>(sdk: &S) -> Result<(), PortError> {
    sdk.remove_all_listeners()?;
    sdk.deinit().await
}
