//! WorkerService - one background thread executing buffer operations
//!
//! Requests are queued on an unbounded crossbeam channel and handled strictly
//! in arrival order. Each request carries a oneshot sender for its response,
//! so the caller never blocks on submission.
//!
//! ```text
//! ┌─────────────┐   WorkerCommand::Execute   ┌───────────────┐
//! │   UI Thread │ ─────────────────────────► │ WorkerService │
//! │             │ ◄───────────────────────── │  (registry)   │
//! └─────────────┘   oneshot RpcResponse      └───────────────┘
//! ```

use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam::channel::{Receiver, SendError, Sender};
use tokio::sync::oneshot;

use crate::error::{WorkerError, WorkerResult};
use crate::protocol::{RpcRequest, RpcResponse};
use crate::registry::HandlerRegistry;

/// Commands accepted by a worker thread
pub enum WorkerCommand {
    /// Run one request and reply on `reply`
    Execute {
        request: RpcRequest,
        reply: oneshot::Sender<RpcResponse>,
    },

    /// Finish queued work and stop
    Shutdown,
}

/// Owner's handle on a running worker thread
///
/// Dropping the handle shuts the worker down and joins it.
pub struct ServiceHandle {
    name: String,
    command_tx: Sender<WorkerCommand>,
    thread_handle: Option<JoinHandle<()>>,
}

impl ServiceHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue a command for the worker
    pub fn send(&self, cmd: WorkerCommand) -> Result<(), SendError<WorkerCommand>> {
        self.command_tx.send(cmd)
    }

    /// Sender clients use to reach this worker
    pub(crate) fn command_sender(&self) -> Sender<WorkerCommand> {
        self.command_tx.clone()
    }

    /// Check if the worker thread is still running
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Stop the worker after it drains its queue, then join it
    pub fn shutdown(&mut self) {
        let Some(handle) = self.thread_handle.take() else {
            return;
        };
        let _ = self.command_tx.send(WorkerCommand::Shutdown);
        if handle.join().is_err() {
            log::error!("{}: worker thread panicked during shutdown", self.name);
        }
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Executes requests against a frozen handler registry
pub struct WorkerService {
    name: String,
    registry: HandlerRegistry,
    command_rx: Receiver<WorkerCommand>,
}

impl WorkerService {
    /// Spawn a new worker thread named `name`
    pub fn spawn(name: impl Into<String>, registry: HandlerRegistry) -> WorkerResult<ServiceHandle> {
        let name = name.into();
        let (command_tx, command_rx) = crossbeam::channel::unbounded();

        let service = WorkerService {
            name: name.clone(),
            registry,
            command_rx,
        };

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || service.run())
            .map_err(|e| WorkerError::Spawn {
                name: name.clone(),
                message: e.to_string(),
            })?;

        Ok(ServiceHandle {
            name,
            command_tx,
            thread_handle: Some(handle),
        })
    }

    /// Main worker loop
    fn run(self) {
        log::info!("{}: WorkerService started ({:?})", self.name, self.registry);

        while let Ok(cmd) = self.command_rx.recv() {
            match cmd {
                WorkerCommand::Execute { request, reply } => self.execute(request, reply),
                WorkerCommand::Shutdown => {
                    log::info!("{}: WorkerService shutting down", self.name);
                    break;
                }
            }
        }

        log::info!("{}: WorkerService stopped", self.name);
    }

    fn execute(&self, request: RpcRequest, reply: oneshot::Sender<RpcResponse>) {
        let id = request.id;
        let operation = request.operation.clone();
        let start_time = Instant::now();

        let response = self.registry.dispatch(request);

        log::debug!(
            "{}: {} request {} finished in {:?} (ok={})",
            self.name,
            operation,
            id,
            start_time.elapsed(),
            response.outcome.is_ok()
        );

        // The result moves to the requester; nothing is copied
        if reply.send(response).is_err() {
            log::debug!("{}: requester dropped request {} before completion", self.name, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{RpcPayload, RpcResult};
    use crate::registry::RegistryBuilder;

    fn registry() -> HandlerRegistry {
        let mut builder = RegistryBuilder::new();
        builder.register_rpc_handler("echo", |payload| match payload {
            RpcPayload::Json(value) => Ok(RpcResult::Json(value)),
            _ => Ok(RpcResult::Json(serde_json::Value::Null)),
        });
        builder.build()
    }

    fn execute(handle: &ServiceHandle, id: u64) -> oneshot::Receiver<RpcResponse> {
        let (reply, rx) = oneshot::channel();
        handle
            .send(WorkerCommand::Execute {
                request: RpcRequest {
                    id,
                    operation: "echo".into(),
                    payload: RpcPayload::Json(serde_json::json!(id)),
                },
                reply,
            })
            .unwrap();
        rx
    }

    #[test]
    fn test_worker_answers_in_fifo_order() {
        let handle = WorkerService::spawn("test-worker", registry()).unwrap();
        assert!(handle.is_running());

        let receivers: Vec<_> = (0..20).map(|id| execute(&handle, id)).collect();
        for (id, rx) in receivers.into_iter().enumerate() {
            let response = rx.blocking_recv().unwrap();
            assert_eq!(response.id, id as u64);
            assert_eq!(response.outcome, Ok(RpcResult::Json(serde_json::json!(id))));
        }
    }

    #[test]
    fn test_unknown_operation_keeps_worker_alive() {
        let handle = WorkerService::spawn("test-worker", registry()).unwrap();
        let (reply, rx) = oneshot::channel();
        handle
            .send(WorkerCommand::Execute {
                request: RpcRequest {
                    id: 1,
                    operation: "missing".into(),
                    payload: RpcPayload::Json(serde_json::Value::Null),
                },
                reply,
            })
            .unwrap();

        let response = rx.blocking_recv().unwrap();
        assert_eq!(response.outcome, Err(WorkerError::UnknownOperation("missing".to_string())));

        let next = execute(&handle, 2).blocking_recv().unwrap();
        assert!(next.outcome.is_ok());
        assert!(handle.is_running());
    }

    #[test]
    fn test_shutdown_joins_thread() {
        let mut handle = WorkerService::spawn("test-worker", registry()).unwrap();
        handle.shutdown();
        assert!(!handle.is_running());
        assert!(handle.send(WorkerCommand::Shutdown).is_err());
    }
}
