//! A fixed set of workers sharing one handler registry
//!
//! Requests are spread round-robin. Each worker is FIFO, so two requests
//! pinned to the same worker with [`WorkerPool::submit_to`] resolve in send
//! order; nothing is promised across workers.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::client::{PendingRequest, WorkerClient};
use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::protocol::{RpcPayload, WorkerOperation};
use crate::registry::HandlerRegistry;
use crate::service::{ServiceHandle, WorkerService};

pub struct WorkerPool {
    workers: Vec<ServiceHandle>,
    clients: Vec<WorkerClient>,
    next_worker: AtomicUsize,
}

impl WorkerPool {
    /// Spawn `config.worker_count` workers (at least one)
    pub fn new(config: &WorkerConfig, registry: HandlerRegistry) -> WorkerResult<Self> {
        let count = config.worker_count.max(1);
        let next_id = Arc::new(AtomicU64::new(1));

        let mut workers = Vec::with_capacity(count);
        for index in 0..count {
            let name = format!("{}-{}", config.thread_name_prefix, index);
            workers.push(WorkerService::spawn(name, registry.clone())?);
        }

        let clients = workers
            .iter()
            .map(|handle| WorkerClient::with_id_counter(handle, next_id.clone()))
            .collect();

        log::info!("WorkerPool started with {} workers", count);

        Ok(Self {
            workers,
            clients,
            next_worker: AtomicUsize::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Submit to the next worker in rotation
    pub fn submit(&self, operation: impl Into<WorkerOperation>, payload: RpcPayload) -> PendingRequest {
        let index = self.next_worker.fetch_add(1, Ordering::Relaxed);
        self.submit_to(index, operation, payload)
    }

    /// Submit to worker `index % len()`
    pub fn submit_to(
        &self,
        index: usize,
        operation: impl Into<WorkerOperation>,
        payload: RpcPayload,
    ) -> PendingRequest {
        self.clients[index % self.clients.len()].submit(operation, payload)
    }

    /// Number of worker threads still alive
    pub fn running_workers(&self) -> usize {
        self.workers.iter().filter(|w| w.is_running()).count()
    }

    /// Drain and join every worker
    pub fn shutdown(&mut self) {
        for worker in &mut self.workers {
            worker.shutdown();
        }
        log::info!("WorkerPool shut down");
    }
}
