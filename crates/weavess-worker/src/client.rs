//! Request submission and pending-result handles
//!
//! Every submitted request moves through
//! `Sent -> Pending -> Resolved | Rejected`. The handle can be polled from a
//! UI tick (`try_result`), awaited as a future, or waited on from a plain
//! thread (`wait`). There is no cancellation: dropping a handle only discards
//! the result, the worker still runs the request to completion.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use crossbeam::channel::{SendError, Sender};
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::error::{WorkerError, WorkerResult};
use crate::protocol::{RpcPayload, RpcRequest, RpcResponse, RpcResult, WorkerOperation};
use crate::service::{ServiceHandle, WorkerCommand};

/// Lifecycle of a submitted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Queued, not yet observed
    Sent,
    /// Observed without a response yet
    Pending,
    /// Completed successfully
    Resolved,
    /// Completed with an error
    Rejected,
}

impl RequestState {
    pub fn is_finished(&self) -> bool {
        matches!(self, RequestState::Resolved | RequestState::Rejected)
    }
}

/// Handle on one in-flight request
#[derive(Debug)]
pub struct PendingRequest {
    id: u64,
    worker: String,
    operation: WorkerOperation,
    rx: oneshot::Receiver<RpcResponse>,
    state: RequestState,
}

impl PendingRequest {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn operation(&self) -> &WorkerOperation {
        &self.operation
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Check for a response without blocking
    ///
    /// Returns the outcome once, the first time it is available; afterwards
    /// the request is finished and this returns `None`.
    pub fn try_result(&mut self) -> Option<WorkerResult<RpcResult>> {
        if self.state.is_finished() {
            return None;
        }
        match self.rx.try_recv() {
            Ok(response) => Some(self.finish(Ok(response))),
            Err(TryRecvError::Empty) => {
                self.state = RequestState::Pending;
                None
            }
            Err(TryRecvError::Closed) => Some(self.finish(Err(()))),
        }
    }

    /// Block the current thread until the response arrives
    ///
    /// Must not be called from inside an async runtime; `.await` the request
    /// there instead.
    pub fn wait(mut self) -> WorkerResult<RpcResult> {
        let received = std::mem::replace(&mut self.rx, closed_receiver()).blocking_recv();
        self.finish(received.map_err(|_| ()))
    }

    /// Await the response, failing with [`WorkerError::Timeout`] after `timeout`
    ///
    /// Requires a tokio runtime with the time driver enabled.
    pub async fn with_timeout(self, timeout: Duration) -> WorkerResult<RpcResult> {
        let id = self.id;
        match tokio::time::timeout(timeout, self).await {
            Ok(outcome) => outcome,
            Err(_) => Err(WorkerError::Timeout(id)),
        }
    }

    fn finish(&mut self, received: Result<RpcResponse, ()>) -> WorkerResult<RpcResult> {
        let outcome = match received {
            Ok(response) if response.id == self.id => response.outcome,
            Ok(response) => Err(WorkerError::MismatchedResponse {
                expected: self.id,
                actual: response.id,
            }),
            Err(()) => Err(WorkerError::Disconnected(self.worker.clone())),
        };
        self.state = if outcome.is_ok() {
            RequestState::Resolved
        } else {
            RequestState::Rejected
        };
        outcome
    }
}

impl Future for PendingRequest {
    type Output = WorkerResult<RpcResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(received) => Poll::Ready(this.finish(received.map_err(|_| ()))),
            Poll::Pending => {
                this.state = RequestState::Pending;
                Poll::Pending
            }
        }
    }
}

/// A receiver whose sender is already gone
fn closed_receiver() -> oneshot::Receiver<RpcResponse> {
    let (_, rx) = oneshot::channel();
    rx
}

/// Submits requests to one worker
///
/// Cloning shares the request id counter, so ids stay unique across clones.
#[derive(Clone)]
pub struct WorkerClient {
    worker: String,
    command_tx: Sender<WorkerCommand>,
    next_id: Arc<AtomicU64>,
}

impl WorkerClient {
    /// Create a client with its own id sequence
    pub fn new(handle: &ServiceHandle) -> Self {
        Self::with_id_counter(handle, Arc::new(AtomicU64::new(1)))
    }

    /// Create a client drawing ids from a shared counter
    pub(crate) fn with_id_counter(handle: &ServiceHandle, next_id: Arc<AtomicU64>) -> Self {
        Self {
            worker: handle.name().to_string(),
            command_tx: handle.command_sender(),
            next_id,
        }
    }

    /// Queue `operation` on the worker without blocking
    ///
    /// If the worker has stopped, the returned handle is already rejected
    /// with [`WorkerError::Disconnected`].
    pub fn submit(&self, operation: impl Into<WorkerOperation>, payload: RpcPayload) -> PendingRequest {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let operation = operation.into();
        let (reply, rx) = oneshot::channel();

        let command = WorkerCommand::Execute {
            request: RpcRequest {
                id,
                operation: operation.clone(),
                payload,
            },
            reply,
        };

        if let Err(SendError(WorkerCommand::Execute { reply, .. })) = self.command_tx.send(command) {
            log::warn!("{}: worker is gone, rejecting request {}", self.worker, id);
            let _ = reply.send(RpcResponse::error(id, WorkerError::Disconnected(self.worker.clone())));
        }

        PendingRequest {
            id,
            worker: self.worker.clone(),
            operation,
            rx,
            state: RequestState::Sent,
        }
    }
}
