//! Glue between serde values and the browser's JS objects.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

use nexus_console_core::PortError;

/// Encodes maps as plain objects rather than `Map`, which the SDK expects.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, PortError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| PortError::Transport(format!("failed to encode JS value: {e}")))
}

pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, PortError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| PortError::Transport(format!("failed to decode JS value: {e}")))
}

/// Awaits a promise-returning call. A plain value is returned as-is.
pub(crate) async fn await_promise(value: JsValue) -> Result<JsValue, PortError> {
    match value.dyn_into::<js_sys::Promise>() {
        Ok(promise) => wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| PortError::Rejected(js_error_message(&e))),
        Err(plain) => Ok(plain),
    }
}

/// Message of a thrown JS error, or its debug rendering when it has none.
pub(crate) fn js_error_message(error: &JsValue) -> String {
    js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{error:?}"))
}

pub(crate) fn method(target: &JsValue, name: &str) -> Result<js_sys::Function, PortError> {
    crate::eip1193::get_prop(target, name)?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| PortError::NotImplemented("SDK method is not a function"))
}
