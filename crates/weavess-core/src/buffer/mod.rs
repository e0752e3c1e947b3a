//! Render-ready position buffers
//!
//! Converts sample series into flat `f32` coordinate arrays the renderer can
//! upload as vertex buffers without further processing.
//!
//! ## Coordinate convention
//!
//! Each vertex is an interleaved `(x, y)` pair. `x` is time mapped into gl
//! units through a [`TimeToGlScale`]; `y` is the sample value passed through an
//! [`AmplitudeTransform`]. Record section buffers add a per-station baseline to
//! `y` so several stations share one coordinate space.
//!
//! Degenerate inputs (no samples, non-positive sample rate, empty display
//! window) produce an empty buffer: nothing to draw is a valid state.

mod position_buffer;
mod record_section;

pub use position_buffer::{
    create_position_buffer, create_position_buffer_for_data_by_sample_rate,
    create_position_buffer_for_data_by_time, AmplitudeTransform, PositionBuffer,
    PositionBufferParams, TimeToGlScale, Vertex, COMPONENTS_PER_VERTEX, DEFAULT_GL_MAX,
    DEFAULT_GL_MIN,
};
pub use record_section::{
    create_record_section_position_buffer, BaselineMode, RecordSectionParams,
    RecordSectionTrace, StationPositionBuffer,
};
