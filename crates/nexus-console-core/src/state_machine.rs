use thiserror::Error;

/// Lifecycle of a single button-triggered request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Start,
    Succeed,
    Fail,
    /// Input rejected before anything was sent.
    Reject,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    BeginInit,
    InitSucceeded,
    InitFailed,
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition<S> {
    pub from: S,
    pub to: S,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("illegal request transition: {from:?} on {action:?}")]
    Request {
        from: RequestStatus,
        action: RequestAction,
    },
    #[error("illegal session transition: {from:?} on {action:?}")]
    Session {
        from: SessionStatus,
        action: SessionAction,
    },
}

pub fn request_transition(
    from: RequestStatus,
    action: RequestAction,
) -> Result<(RequestStatus, StateTransition<RequestStatus>), TransitionError> {
    use RequestAction as A;
    use RequestStatus as S;

    let (to, reason) = match (from, action) {
        (_, A::Reset) => (S::Idle, "reset"),
        (S::Idle | S::Succeeded | S::Failed, A::Start) => (S::InFlight, "request dispatched"),
        (S::Idle | S::Succeeded | S::Failed, A::Reject) => (S::Failed, "input rejected"),
        (S::InFlight, A::Succeed) => (S::Succeeded, "response received"),
        (S::InFlight, A::Fail) => (S::Failed, "request failed"),
        _ => return Err(TransitionError::Request { from, action }),
    };
    Ok((to, StateTransition { from, to, reason }))
}

pub fn session_transition(
    from: SessionStatus,
    action: SessionAction,
) -> Result<(SessionStatus, StateTransition<SessionStatus>), TransitionError> {
    use SessionAction as A;
    use SessionStatus as S;

    let (to, reason) = match (from, action) {
        (S::Uninitialized, A::BeginInit) => (S::Initializing, "init requested"),
        (S::Initializing, A::InitSucceeded) => (S::Ready, "sdk initialized"),
        (S::Initializing, A::InitFailed) => (S::Uninitialized, "sdk init failed"),
        (S::Ready, A::Teardown) => (S::Uninitialized, "session torn down"),
        _ => return Err(TransitionError::Session { from, action }),
    };
    Ok((to, StateTransition { from, to, reason }))
}

/// Status plus the last outcome of one request kind. Each panel button owns
/// its own slot so outcomes never overwrite each other.
#[derive(Debug, Clone)]
pub struct RequestSlot<T> {
    status: RequestStatus,
    result: Option<T>,
    error: Option<String>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            status: RequestStatus::Idle,
            result: None,
            error: None,
        }
    }
}

impl<T> RequestSlot<T> {
    fn apply(&mut self, action: RequestAction) -> Result<(), TransitionError> {
        let (to, transition) = request_transition(self.status, action)?;
        tracing::trace!(from = ?transition.from, to = ?transition.to, reason = transition.reason);
        self.status = to;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.apply(RequestAction::Start)?;
        self.result = None;
        self.error = None;
        Ok(())
    }

    pub fn succeed(&mut self, value: T) -> Result<(), TransitionError> {
        self.apply(RequestAction::Succeed)?;
        self.result = Some(value);
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.apply(RequestAction::Fail)?;
        self.error = Some(message.into());
        Ok(())
    }

    pub fn reject(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.apply(RequestAction::Reject)?;
        self.result = None;
        self.error = Some(message.into());
        Ok(())
    }

    pub fn reset(&mut self) {
        self.status = RequestStatus::Idle;
        self.result = None;
        self.error = None;
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == RequestStatus::InFlight
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
