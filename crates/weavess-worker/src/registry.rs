//! Operation name to handler mapping
//!
//! Handlers are registered on a [`RegistryBuilder`] while a worker context is
//! being set up. [`RegistryBuilder::build`] freezes the map into a
//! [`HandlerRegistry`], which is shared between worker threads through an
//! `Arc` and never mutated again, so lookups need no locking.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::{WorkerError, WorkerResult};
use crate::protocol::{RpcPayload, RpcRequest, RpcResponse, RpcResult, WorkerOperation};

/// A registered operation handler
pub type RpcHandler = Arc<dyn Fn(RpcPayload) -> WorkerResult<RpcResult> + Send + Sync>;

/// Mutable registration phase of a handler registry
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<String, RpcHandler>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `operation`
    ///
    /// Registering a name twice replaces the earlier handler and logs a
    /// warning.
    pub fn register_rpc_handler<F>(&mut self, operation: impl Into<WorkerOperation>, handler: F) -> &mut Self
    where
        F: Fn(RpcPayload) -> WorkerResult<RpcResult> + Send + Sync + 'static,
    {
        let name = String::from(operation.into());
        if self.handlers.insert(name.clone(), Arc::new(handler)).is_some() {
            log::warn!("register_rpc_handler: replacing existing handler for {}", name);
        } else {
            log::debug!("register_rpc_handler: registered {}", name);
        }
        self
    }

    /// Freeze the registry
    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: Arc::new(self.handlers),
        }
    }
}

/// Read-only handler lookup shared by every worker of a context
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Arc<HashMap<String, RpcHandler>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("operations", &self.operations())
            .finish()
    }
}

impl HandlerRegistry {
    pub fn contains(&self, operation: &str) -> bool {
        self.handlers.contains_key(operation)
    }

    /// Registered operation names, sorted
    pub fn operations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the handler for `request` and wrap its outcome
    ///
    /// Always returns a response with the request's id. Unknown operations,
    /// handler errors and handler panics all become error responses.
    pub fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let RpcRequest { id, operation, payload } = request;

        let Some(handler) = self.handlers.get(operation.name()) else {
            log::warn!("dispatch: no handler for operation {} (request {})", operation, id);
            return RpcResponse::error(id, WorkerError::UnknownOperation(operation.to_string()));
        };

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| handler(payload))) {
            Ok(outcome) => outcome,
            Err(panic_payload) => {
                let message = panic_message(panic_payload.as_ref());
                log::error!("dispatch: handler for {} panicked on request {}: {}", operation, id, message);
                Err(WorkerError::HandlerPanicked {
                    operation: operation.to_string(),
                    message,
                })
            }
        };

        RpcResponse { id, outcome }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(payload: RpcPayload) -> WorkerResult<RpcResult> {
        match payload {
            RpcPayload::Json(value) => Ok(RpcResult::Json(value)),
            _ => Err(WorkerError::PayloadMismatch {
                operation: "echo".to_string(),
                expected: "json",
            }),
        }
    }

    fn request(id: u64, operation: &str) -> RpcRequest {
        RpcRequest {
            id,
            operation: operation.into(),
            payload: RpcPayload::Json(serde_json::json!(id)),
        }
    }

    #[test]
    fn test_dispatch_to_registered_handler() {
        let mut builder = RegistryBuilder::new();
        builder.register_rpc_handler("echo", echo);
        let registry = builder.build();

        let response = registry.dispatch(request(1, "echo"));
        assert_eq!(response.id, 1);
        assert_eq!(response.outcome, Ok(RpcResult::Json(serde_json::json!(1))));
    }

    #[test]
    fn test_reregistration_last_write_wins() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_rpc_handler("op", |_| Ok(RpcResult::Json(serde_json::json!("first"))))
            .register_rpc_handler("op", |_| Ok(RpcResult::Json(serde_json::json!("second"))));
        let registry = builder.build();

        assert_eq!(registry.operations(), vec!["op"]);
        let response = registry.dispatch(request(2, "op"));
        assert_eq!(response.outcome, Ok(RpcResult::Json(serde_json::json!("second"))));
    }

    #[test]
    fn test_unknown_operation_is_error_response() {
        let registry = RegistryBuilder::new().build();
        let response = registry.dispatch(request(5, "missing"));
        assert_eq!(response.id, 5);
        assert_eq!(response.outcome, Err(WorkerError::UnknownOperation("missing".to_string())));
    }

    #[test]
    fn test_handler_panic_is_contained() {
        let mut builder = RegistryBuilder::new();
        builder.register_rpc_handler("boom", |_| panic!("buffer exploded"));
        builder.register_rpc_handler("echo", echo);
        let registry = builder.build();

        let response = registry.dispatch(request(8, "boom"));
        assert_eq!(
            response.outcome,
            Err(WorkerError::HandlerPanicked {
                operation: "boom".to_string(),
                message: "buffer exploded".to_string(),
            })
        );

        // Registry keeps serving after a panic
        assert!(registry.dispatch(request(9, "echo")).outcome.is_ok());
    }

    #[test]
    fn test_handler_error_passes_through() {
        let mut builder = RegistryBuilder::new();
        builder.register_rpc_handler("echo", echo);
        let registry = builder.build();

        let response = registry.dispatch(RpcRequest {
            id: 4,
            operation: "echo".into(),
            payload: RpcPayload::RecordSection(weavess_core::buffer::RecordSectionParams {
                traces: vec![],
                scale: weavess_core::buffer::TimeToGlScale::with_default_range(
                    weavess_core::types::TimeRange::new(0.0, 1.0),
                ),
                amplitude_scale: 1.0,
                baseline: Default::default(),
            }),
        });
        assert!(matches!(response.outcome, Err(WorkerError::PayloadMismatch { .. })));
    }
}
