use crate::client::ReportClient;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "backendUrl": state.backend.as_ref().map(|c| c.base_url().to_string())
        }),
    )
}

/// One externally supplied base URL for the report service. Replaces the
/// per-call hardcoded endpoints the original form used.
fn handle_backend_configure(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(url) = req.params.get("url").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.url", None);
    };
    if url.trim().is_empty() {
        return err(&req.id, "bad_params", "params.url must be non-empty", None);
    }
    let client = ReportClient::new(url);
    let base_url = client.base_url().to_string();
    state.backend = Some(client);
    ok(&req.id, json!({ "backendUrl": base_url }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "backend.configure" => Some(handle_backend_configure(state, req)),
        _ => None,
    }
}
