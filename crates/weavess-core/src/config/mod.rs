//! Configuration for weavess render preparation
//!
//! - Generic YAML config loading/saving
//! - Standard config locations
//! - Render settings shared by the buffer builders and the worker crate
//!
//! # Usage
//!
//! ```ignore
//! use weavess_core::config::{load_config, default_config_path, RenderConfig};
//!
//! let config: RenderConfig = load_config(&default_config_path("render.yaml"));
//! let params = config.position_buffer_params(display_range, channel.time_offset());
//! ```

mod io;
mod paths;
mod render;

pub use io::{load_config, save_config, try_load_config};
pub use paths::{default_config_dir, default_config_path};
pub use render::{RecordSectionConfig, RenderConfig};
