//! Weavess Worker - run buffer builders off the calling thread
//!
//! Callers submit named operations with a payload and get back a
//! [`PendingRequest`] that resolves to exactly one result or error. Handlers
//! live in a [`HandlerRegistry`] frozen before the workers start.
//!
//! ```text
//! WorkerPool ──round-robin──► WorkerService (FIFO) ──► HandlerRegistry::dispatch
//!     ▲                                                        │
//!     └──────────────── oneshot RpcResponse ◄──────────────────┘
//! ```
//!
//! [`wire::WireBridge`] exposes the same registry to hosts that can only
//! exchange JSON strings.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod pool;
pub mod protocol;
pub mod registry;
pub mod service;
pub mod wire;

pub use client::{PendingRequest, RequestState, WorkerClient};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use handlers::{default_registry, register_default_handlers};
pub use pool::WorkerPool;
pub use protocol::{RpcPayload, RpcRequest, RpcResponse, RpcResult, WorkerOperation};
pub use registry::{HandlerRegistry, RegistryBuilder};
pub use service::{ServiceHandle, WorkerService};
pub use wire::WireBridge;
