#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};
use tiny_http::{Response, Server, StatusCode};

use nexus_console_adapters::{Eip1193Adapter, NexusAdapterConfig, NexusSdkAdapter};
use nexus_console_core::NexusSdkPort;

pub async fn ready_sdk() -> NexusSdkAdapter {
    let sdk = NexusSdkAdapter::new(Eip1193Adapter::deterministic(), &NexusAdapterConfig::default());
    sdk.initialize().await.expect("initialize deterministic sdk");
    sdk
}

pub fn unified_balance(assets: &[nexus_console_core::BalanceAsset], symbol: &str) -> String {
    assets
        .iter()
        .find(|a| a.symbol == symbol)
        .map(|a| a.balance.clone())
        .expect("asset present")
}

/// Serves JSON-RPC on a random port. `answer` maps a method name to the full
/// response envelope; unknown methods get a -32601 error.
pub fn spawn_rpc_server<F>(answer: F) -> (String, Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str) -> Option<Value> + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);

    thread::spawn(move || {
        for _ in 0..16 {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let mut body = String::new();
            let _ = req.as_reader().read_to_string(&mut body);
            let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            let method = request["method"].as_str().unwrap_or_default().to_owned();
            seen.lock().expect("calls lock").push(method.clone());

            let payload = answer(&method).unwrap_or_else(|| {
                json!({
                    "jsonrpc": "2.0",
                    "id": request["id"],
                    "error": { "code": -32601, "message": "method not found" }
                })
            });
            let response =
                Response::from_string(payload.to_string()).with_status_code(StatusCode(200));
            let _ = req.respond(response);
        }
    });

    (addr, calls)
}

pub fn rpc_ok(result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result })
}
