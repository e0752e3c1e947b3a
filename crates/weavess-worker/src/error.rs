//! Worker dispatch error types

use thiserror::Error;

/// Errors delivered to the requester of a worker operation
///
/// None of these terminate the worker: every request still gets exactly one
/// response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkerError {
    /// No handler registered under this operation name
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Handler received a payload variant it does not accept
    #[error("Operation {operation} expected a {expected} payload")]
    PayloadMismatch {
        operation: String,
        expected: &'static str,
    },

    /// Handler panicked; the panic was contained at the dispatch boundary
    #[error("Operation {operation} panicked: {message}")]
    HandlerPanicked { operation: String, message: String },

    /// Worker thread could not be started
    #[error("Failed to spawn worker {name}: {message}")]
    Spawn { name: String, message: String },

    /// Worker thread has stopped or dropped the request
    #[error("Worker {0} is not running")]
    Disconnected(String),

    /// No response arrived in time
    #[error("Request {0} timed out")]
    Timeout(u64),

    /// Response carried an unexpected id
    #[error("Response id {actual} does not match request {expected}")]
    MismatchedResponse { expected: u64, actual: u64 },

    /// Serialized message could not be encoded or decoded
    #[error("Malformed wire message: {0}")]
    Wire(String),

    /// Error reported by the remote side of a serialized transport
    #[error("Remote worker error: {0}")]
    Remote(String),
}

/// Result type for worker operations
pub type WorkerResult<T> = Result<T, WorkerError>;
