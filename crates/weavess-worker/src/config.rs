//! Worker pool configuration

use serde::{Deserialize, Serialize};

/// Settings for a [`crate::WorkerPool`]
///
/// Loaded from YAML with `weavess_core::config::load_config`; every field has
/// a default so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of worker threads, at least one
    pub worker_count: usize,
    /// Worker threads are named `{prefix}-{index}`
    pub thread_name_prefix: String,
    /// Async callers give up on a response after this long
    pub request_timeout_ms: Option<u64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        let worker_count = std::thread::available_parallelism()
            .map(|n| n.get().min(4))
            .unwrap_or(2);
        Self {
            worker_count,
            thread_name_prefix: "weavess-worker".to_string(),
            request_timeout_ms: Some(10_000),
        }
    }
}

impl WorkerConfig {
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        self.request_timeout_ms.map(std::time::Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: WorkerConfig = serde_yaml::from_str("worker_count: 8\n").unwrap();
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.thread_name_prefix, "weavess-worker");
        assert_eq!(config.request_timeout(), Some(std::time::Duration::from_secs(10)));
    }

    #[test]
    fn test_default_has_workers() {
        let config = WorkerConfig::default();
        assert!((1..=4).contains(&config.worker_count));
    }
}
