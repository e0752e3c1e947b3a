//! Request/response types for worker dispatch
//!
//! In-process transports move [`RpcRequest`] and [`RpcResponse`] values
//! directly, so result buffers change owner without being copied. Serialized
//! transports use [`WireMessage`]:
//!
//! ```text
//! {"type":"rpc-request","id":7,"operation":"createPositionBuffer","payload":{...}}
//! {"type":"rpc-response","id":7,"result":{...}}
//! {"type":"rpc-response","id":7,"error":"Unknown operation: foo"}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use weavess_core::buffer::{PositionBuffer, PositionBufferParams, RecordSectionParams, StationPositionBuffer};
use weavess_core::types::SegmentData;

use crate::error::{WorkerError, WorkerResult};

/// Operation name for single-series buffer creation
pub const CREATE_POSITION_BUFFER: &str = "createPositionBuffer";

/// Operation name for multi-station record section buffer creation
pub const CREATE_RECORD_SECTION_POSITION_BUFFER: &str = "createRecordSectionPositionBuffer";

/// String-keyed operation identifier
///
/// The two built-in names have their own variants; anything else registered
/// at runtime is `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkerOperation {
    CreatePositionBuffer,
    CreateRecordSectionPositionBuffer,
    Custom(String),
}

impl WorkerOperation {
    pub fn name(&self) -> &str {
        match self {
            WorkerOperation::CreatePositionBuffer => CREATE_POSITION_BUFFER,
            WorkerOperation::CreateRecordSectionPositionBuffer => CREATE_RECORD_SECTION_POSITION_BUFFER,
            WorkerOperation::Custom(name) => name,
        }
    }
}

impl From<String> for WorkerOperation {
    fn from(name: String) -> Self {
        match name.as_str() {
            CREATE_POSITION_BUFFER => WorkerOperation::CreatePositionBuffer,
            CREATE_RECORD_SECTION_POSITION_BUFFER => WorkerOperation::CreateRecordSectionPositionBuffer,
            _ => WorkerOperation::Custom(name),
        }
    }
}

impl From<&str> for WorkerOperation {
    fn from(name: &str) -> Self {
        WorkerOperation::from(name.to_string())
    }
}

impl From<WorkerOperation> for String {
    fn from(operation: WorkerOperation) -> Self {
        match operation {
            WorkerOperation::Custom(name) => name,
            other => other.name().to_string(),
        }
    }
}

impl fmt::Display for WorkerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input for [`CREATE_POSITION_BUFFER`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionBufferRequest {
    pub data: SegmentData,
    pub params: PositionBufferParams,
}

/// Request body, one variant per payload shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "camelCase")]
pub enum RpcPayload {
    PositionBuffer(PositionBufferRequest),
    RecordSection(RecordSectionParams),
    /// Free-form body for custom operations
    Json(serde_json::Value),
}

impl RpcPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            RpcPayload::PositionBuffer(_) => "positionBuffer",
            RpcPayload::RecordSection(_) => "recordSection",
            RpcPayload::Json(_) => "json",
        }
    }
}

/// Response body, one variant per result shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "camelCase")]
pub enum RpcResult {
    PositionBuffer(PositionBuffer),
    RecordSection(Vec<StationPositionBuffer>),
    Json(serde_json::Value),
}

impl RpcResult {
    /// Unwrap a single-series buffer
    pub fn into_position_buffer(self) -> Option<PositionBuffer> {
        match self {
            RpcResult::PositionBuffer(buffer) => Some(buffer),
            _ => None,
        }
    }

    /// Unwrap record section buffers
    pub fn into_record_section(self) -> Option<Vec<StationPositionBuffer>> {
        match self {
            RpcResult::RecordSection(buffers) => Some(buffers),
            _ => None,
        }
    }
}

/// A request addressed to a named operation
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub id: u64,
    pub operation: WorkerOperation,
    pub payload: RpcPayload,
}

/// Exactly one per request, carrying the request's id
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub id: u64,
    pub outcome: WorkerResult<RpcResult>,
}

impl RpcResponse {
    pub fn error(id: u64, error: WorkerError) -> Self {
        Self { id, outcome: Err(error) }
    }
}

/// Serialized message envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WireMessage {
    RpcRequest {
        id: u64,
        operation: WorkerOperation,
        payload: RpcPayload,
    },
    RpcResponse {
        id: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<RpcResult>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl From<RpcRequest> for WireMessage {
    fn from(request: RpcRequest) -> Self {
        WireMessage::RpcRequest {
            id: request.id,
            operation: request.operation,
            payload: request.payload,
        }
    }
}

impl From<RpcResponse> for WireMessage {
    fn from(response: RpcResponse) -> Self {
        let (result, error) = match response.outcome {
            Ok(result) => (Some(result), None),
            Err(e) => (None, Some(e.to_string())),
        };
        WireMessage::RpcResponse {
            id: response.id,
            result,
            error,
        }
    }
}
