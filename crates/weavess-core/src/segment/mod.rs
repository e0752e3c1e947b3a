//! Channel segment helpers
//!
//! Synthetic segments (flat lines, dummy waveforms) for placeholders and
//! demos, plus amplitude boundary calculation for y-axis scaling.

mod boundaries;
mod dummy;
mod flat_line;

pub use boundaries::calculate_channel_segment_boundaries;
pub use dummy::{create_dummy_waveform, DummyWaveformParams};
pub use flat_line::{create_flat_line_channel_segment, create_flat_line_data_segment, FlatLineOptions};
