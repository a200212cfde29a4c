//! Callbacks the SDK invokes in the middle of a bridge.
//!
//! Each request carries a one-shot responder that resumes the SDK's suspended
//! continuation. A request dropped without an answer is denied, so an SDK call
//! can never stay parked on a prompt nobody will see.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(not(target_arch = "wasm32"))]
pub type Responder<T> = Box<dyn FnOnce(T) + Send>;
#[cfg(target_arch = "wasm32")]
pub type Responder<T> = Box<dyn FnOnce(T)>;

#[cfg(not(target_arch = "wasm32"))]
pub type AllowanceHook = Arc<dyn Fn(AllowanceRequest) + Send + Sync>;
#[cfg(target_arch = "wasm32")]
pub type AllowanceHook = Arc<dyn Fn(AllowanceRequest)>;

#[cfg(not(target_arch = "wasm32"))]
pub type IntentHook = Arc<dyn Fn(IntentRequest) + Send + Sync>;
#[cfg(target_arch = "wasm32")]
pub type IntentHook = Arc<dyn Fn(IntentRequest)>;

/// Allowance amount granted for one source. Encodes to the SDK's wire values
/// (`"min"`, `"max"` or a decimal string).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceChoice {
    Min,
    Max,
    Exact(String),
}

impl Serialize for AllowanceChoice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AllowanceChoice::Min => serializer.serialize_str("min"),
            AllowanceChoice::Max => serializer.serialize_str("max"),
            AllowanceChoice::Exact(amount) => serializer.serialize_str(amount),
        }
    }
}

impl<'de> Deserialize<'de> for AllowanceChoice {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "min" => AllowanceChoice::Min,
            "max" => AllowanceChoice::Max,
            _ => AllowanceChoice::Exact(raw),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceResponse {
    Allow(Vec<AllowanceChoice>),
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentDecision {
    Allow,
    Deny,
}

pub struct AllowanceRequest {
    sources: Vec<Value>,
    responder: Option<Responder<AllowanceResponse>>,
}

impl AllowanceRequest {
    pub fn new(sources: Vec<Value>, responder: Responder<AllowanceResponse>) -> Self {
        Self {
            sources,
            responder: Some(responder),
        }
    }

    pub fn sources(&self) -> &[Value] {
        &self.sources
    }

    pub fn allow(mut self, choices: Vec<AllowanceChoice>) {
        self.respond(AllowanceResponse::Allow(choices));
    }

    pub fn deny(mut self) {
        self.respond(AllowanceResponse::Deny);
    }

    fn respond(&mut self, response: AllowanceResponse) {
        if let Some(responder) = self.responder.take() {
            responder(response);
        }
    }
}

impl Drop for AllowanceRequest {
    fn drop(&mut self) {
        self.respond(AllowanceResponse::Deny);
    }
}

impl std::fmt::Debug for AllowanceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllowanceRequest")
            .field("sources", &self.sources)
            .field("answered", &self.responder.is_none())
            .finish()
    }
}

pub struct IntentRequest {
    intent: Value,
    responder: Option<Responder<IntentDecision>>,
}

impl IntentRequest {
    pub fn new(intent: Value, responder: Responder<IntentDecision>) -> Self {
        Self {
            intent,
            responder: Some(responder),
        }
    }

    /// SDK-defined payload; its shape is not documented and is never inspected.
    pub fn intent(&self) -> &Value {
        &self.intent
    }

    pub fn allow(mut self) {
        self.respond(IntentDecision::Allow);
    }

    pub fn deny(mut self) {
        self.respond(IntentDecision::Deny);
    }

    fn respond(&mut self, decision: IntentDecision) {
        if let Some(responder) = self.responder.take() {
            responder(decision);
        }
    }
}

impl Drop for IntentRequest {
    fn drop(&mut self) {
        self.respond(IntentDecision::Deny);
    }
}

impl std::fmt::Debug for IntentRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRequest")
            .field("intent", &self.intent)
            .field("answered", &self.responder.is_none())
            .finish()
    }
}

/// Grants the minimum required allowance for every source, without prompting.
pub fn approve_minimum_allowance(request: AllowanceRequest) {
    let count = request.sources().len().max(1);
    tracing::info!(sources = request.sources().len(), "approving minimum allowance");
    request.allow(vec![AllowanceChoice::Min; count]);
}

/// Intents waiting for the user's accept/reject, oldest first.
#[derive(Debug, Clone, Default)]
pub struct IntentInbox {
    pending: Arc<Mutex<VecDeque<IntentRequest>>>,
}

impl IntentInbox {
    fn lock(&self) -> MutexGuard<'_, VecDeque<IntentRequest>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, request: IntentRequest) {
        self.lock().push_back(request);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Payload of the intent currently awaiting a decision.
    pub fn front_intent(&self) -> Option<Value> {
        self.lock().front().map(|r| r.intent().clone())
    }

    pub fn accept_front(&self) -> bool {
        let request = self.lock().pop_front();
        match request {
            Some(request) => {
                tracing::info!("bridge intent accepted");
                request.allow();
                true
            }
            None => false,
        }
    }

    pub fn reject_front(&self) -> bool {
        let request = self.lock().pop_front();
        match request {
            Some(request) => {
                tracing::info!("bridge intent rejected");
                request.deny();
                true
            }
            None => false,
        }
    }

    /// Denies everything still pending.
    pub fn clear(&self) {
        let drained: Vec<IntentRequest> = self.lock().drain(..).collect();
        drop(drained);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn dropped_intent_is_denied() {
        let (tx, rx) = mpsc::channel();
        let request = IntentRequest::new(
            serde_json::json!({"id": 1}),
            Box::new(move |d: IntentDecision| tx.send(d).expect("send decision")),
        );
        drop(request);
        assert_eq!(rx.recv().expect("decision"), IntentDecision::Deny);
    }

    #[test]
    fn allowance_choices_use_sdk_wire_values() {
        let encoded = serde_json::to_value(vec![
            AllowanceChoice::Min,
            AllowanceChoice::Max,
            AllowanceChoice::Exact("1000".to_owned()),
        ])
        .expect("encode");
        assert_eq!(encoded, serde_json::json!(["min", "max", "1000"]));
    }

    #[test]
    fn inbox_answers_in_arrival_order() {
        let inbox = IntentInbox::default();
        let (tx, rx) = mpsc::channel();
        for id in 0..2 {
            let tx = tx.clone();
            inbox.push(IntentRequest::new(
                serde_json::json!({ "id": id }),
                Box::new(move |d: IntentDecision| tx.send((id, d)).expect("send")),
            ));
        }
        assert_eq!(inbox.front_intent(), Some(serde_json::json!({"id": 0})));
        assert!(inbox.accept_front());
        assert!(inbox.reject_front());
        assert!(!inbox.accept_front());
        assert_eq!(rx.recv().expect("first"), (0, IntentDecision::Allow));
        assert_eq!(rx.recv().expect("second"), (1, IntentDecision::Deny));
    }
}
