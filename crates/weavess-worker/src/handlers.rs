//! Built-in buffer building operations

use weavess_core::buffer::{create_position_buffer, create_record_section_position_buffer};

use crate::error::{WorkerError, WorkerResult};
use crate::protocol::{
    RpcPayload, RpcResult, WorkerOperation, CREATE_POSITION_BUFFER, CREATE_RECORD_SECTION_POSITION_BUFFER,
};
use crate::registry::{HandlerRegistry, RegistryBuilder};

/// Bind the two built-in operation names to the core buffer builders
pub fn register_default_handlers(builder: &mut RegistryBuilder) -> &mut RegistryBuilder {
    builder
        .register_rpc_handler(WorkerOperation::CreatePositionBuffer, create_position_buffer_handler)
        .register_rpc_handler(
            WorkerOperation::CreateRecordSectionPositionBuffer,
            create_record_section_handler,
        )
}

/// Registry holding only the built-in operations
pub fn default_registry() -> HandlerRegistry {
    let mut builder = RegistryBuilder::new();
    register_default_handlers(&mut builder);
    builder.build()
}

fn create_position_buffer_handler(payload: RpcPayload) -> WorkerResult<RpcResult> {
    match payload {
        RpcPayload::PositionBuffer(request) => Ok(RpcResult::PositionBuffer(create_position_buffer(
            &request.data,
            &request.params,
        ))),
        _ => Err(WorkerError::PayloadMismatch {
            operation: CREATE_POSITION_BUFFER.to_string(),
            expected: "positionBuffer",
        }),
    }
}

fn create_record_section_handler(payload: RpcPayload) -> WorkerResult<RpcResult> {
    match payload {
        RpcPayload::RecordSection(params) => Ok(RpcResult::RecordSection(
            create_record_section_position_buffer(&params),
        )),
        _ => Err(WorkerError::PayloadMismatch {
            operation: CREATE_RECORD_SECTION_POSITION_BUFFER.to_string(),
            expected: "recordSection",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PositionBufferRequest, RpcRequest};
    use weavess_core::buffer::{
        BaselineMode, PositionBufferParams, RecordSectionParams, RecordSectionTrace, TimeToGlScale,
    };
    use weavess_core::types::{DataBySampleRate, SegmentData, TimeRange};

    fn scale() -> TimeToGlScale {
        TimeToGlScale::with_default_range(TimeRange::new(0.0, 2.0))
    }

    #[test]
    fn test_default_registry_operations() {
        let registry = default_registry();
        assert_eq!(
            registry.operations(),
            vec![CREATE_POSITION_BUFFER, CREATE_RECORD_SECTION_POSITION_BUFFER]
        );
    }

    #[test]
    fn test_position_buffer_operation() {
        let response = default_registry().dispatch(RpcRequest {
            id: 1,
            operation: WorkerOperation::CreatePositionBuffer,
            payload: RpcPayload::PositionBuffer(PositionBufferRequest {
                data: SegmentData::BySampleRate(DataBySampleRate {
                    start_time_secs: 0.0,
                    end_time_secs: 2.0,
                    sample_rate: 1.0,
                    values: vec![4.0, 8.0].into(),
                }),
                params: PositionBufferParams::new(scale()),
            }),
        });

        let buffer = response.outcome.unwrap().into_position_buffer().unwrap();
        assert_eq!(buffer.as_slice(), &[0.0, 4.0, 50.0, 8.0]);
    }

    #[test]
    fn test_record_section_operation_with_no_traces() {
        let response = default_registry().dispatch(RpcRequest {
            id: 2,
            operation: WorkerOperation::CreateRecordSectionPositionBuffer,
            payload: RpcPayload::RecordSection(RecordSectionParams {
                traces: vec![],
                scale: scale(),
                amplitude_scale: 1.0,
                baseline: Default::default(),
            }),
        });
        assert_eq!(response.outcome.unwrap().into_record_section(), Some(vec![]));
    }

    #[test]
    fn test_record_section_operation_keeps_order_and_baselines() {
        let trace = |id: &str, distance: Option<f64>| RecordSectionTrace {
            station_id: id.to_string(),
            distance,
            time_offset_secs: 0.0,
            data: DataBySampleRate {
                start_time_secs: 0.0,
                end_time_secs: 2.0,
                sample_rate: 1.0,
                values: vec![1.0, -1.0].into(),
            },
        };

        let response = default_registry().dispatch(RpcRequest {
            id: 4,
            operation: WorkerOperation::CreateRecordSectionPositionBuffer,
            payload: RpcPayload::RecordSection(RecordSectionParams {
                traces: vec![trace("FAR", Some(60.0)), trace("NEAR", Some(10.0)), trace("NODIST", None)],
                scale: scale(),
                amplitude_scale: 2.0,
                baseline: BaselineMode::Distance { units_per_distance: 0.5 },
            }),
        });

        let section = response.outcome.unwrap().into_record_section().unwrap();
        let ids: Vec<&str> = section.iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, ["FAR", "NEAR", "NODIST"]);

        // Without a distance the trace falls back to its index
        let baselines: Vec<f32> = section.iter().map(|s| s.baseline).collect();
        assert_eq!(baselines, [30.0, 5.0, 1.0]);

        assert_eq!(section[0].buffer.as_slice(), &[0.0, 32.0, 50.0, 28.0]);
        assert_eq!(section[1].buffer.as_slice(), &[0.0, 7.0, 50.0, 3.0]);
    }

    #[test]
    fn test_wrong_payload_is_rejected() {
        let response = default_registry().dispatch(RpcRequest {
            id: 3,
            operation: WorkerOperation::CreatePositionBuffer,
            payload: RpcPayload::Json(serde_json::Value::Null),
        });
        assert_eq!(
            response.outcome,
            Err(WorkerError::PayloadMismatch {
                operation: CREATE_POSITION_BUFFER.to_string(),
                expected: "positionBuffer",
            })
        );
    }
}
