//! JSON message bridge for out-of-process callers
//!
//! A host that cannot share memory with the worker sends one
//! [`WireMessage::RpcRequest`] per line and receives exactly one
//! [`WireMessage::RpcResponse`] back, even for malformed input.

use serde_json::Value;

use crate::error::{WorkerError, WorkerResult};
use crate::protocol::{RpcRequest, RpcResponse, WireMessage};
use crate::registry::HandlerRegistry;

/// Dispatches serialized requests against a registry
#[derive(Debug, Clone)]
pub struct WireBridge {
    registry: HandlerRegistry,
}

impl WireBridge {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Handle one serialized message and return the serialized response
    pub fn handle_message(&self, message: &str) -> String {
        let response = match serde_json::from_str::<WireMessage>(message) {
            Ok(WireMessage::RpcRequest { id, operation, payload }) => self.registry.dispatch(RpcRequest {
                id,
                operation,
                payload,
            }),
            Ok(WireMessage::RpcResponse { id, .. }) => RpcResponse::error(
                id,
                WorkerError::Wire("expected an rpc-request, got an rpc-response".to_string()),
            ),
            Err(e) => {
                let id = recover_id(message);
                log::warn!("handle_message: rejecting malformed request {}: {}", id, e);
                RpcResponse::error(id, WorkerError::Wire(e.to_string()))
            }
        };

        let id = response.id;
        serde_json::to_string(&WireMessage::from(response)).unwrap_or_else(|e| {
            log::error!("handle_message: failed to encode response {}: {}", id, e);
            serde_json::json!({
                "type": "rpc-response",
                "id": id,
                "error": WorkerError::Wire(e.to_string()).to_string(),
            })
            .to_string()
        })
    }
}

/// Best-effort id from a message that did not parse as a request
fn recover_id(message: &str) -> u64 {
    serde_json::from_str::<Value>(message)
        .ok()
        .and_then(|value| value.get("id").and_then(Value::as_u64))
        .unwrap_or(0)
}

/// Serialize a request for a remote worker
pub fn encode_request(request: &RpcRequest) -> WorkerResult<String> {
    serde_json::to_string(&WireMessage::from(request.clone())).map_err(|e| WorkerError::Wire(e.to_string()))
}

/// Parse a remote worker's response
///
/// Remote error strings come back as [`WorkerError::Remote`].
pub fn decode_response(message: &str) -> WorkerResult<RpcResponse> {
    match serde_json::from_str::<WireMessage>(message).map_err(|e| WorkerError::Wire(e.to_string()))? {
        WireMessage::RpcResponse { id, result, error } => {
            let outcome = match (result, error) {
                (_, Some(error)) => Err(WorkerError::Remote(error)),
                (Some(result), None) => Ok(result),
                (None, None) => Err(WorkerError::Wire(format!("response {} has neither result nor error", id))),
            };
            Ok(RpcResponse { id, outcome })
        }
        WireMessage::RpcRequest { id, .. } => Err(WorkerError::Wire(format!(
            "expected an rpc-response, got request {}",
            id
        ))),
    }
}
