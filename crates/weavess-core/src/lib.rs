//! Weavess Core - waveform data model and render-buffer preparation
//!
//! Everything in this crate is synchronous and side-effect free apart from
//! config file I/O. The worker crate wraps the buffer builders so they can run
//! off the UI thread.

pub mod buffer;
pub mod config;
pub mod error;
pub mod segment;
pub mod types;
pub mod util;

pub use error::{WaveformError, WaveformResult};
pub use types::*;
