//! Single-series position buffer construction

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::types::{DataBySampleRate, DataByTime, SegmentData, TimeRange};
use crate::util::create_step_points;

/// Floats per vertex in every position buffer
pub const COMPONENTS_PER_VERTEX: usize = 2;

/// Default left edge of the gl coordinate space
pub const DEFAULT_GL_MIN: f32 = 0.0;

/// Default right edge of the gl coordinate space
pub const DEFAULT_GL_MAX: f32 = 100.0;

/// One interleaved vertex, layout-compatible with the flat buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

/// Flat interleaved `(x, y)` coordinates for one series
///
/// Created fresh per render request and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionBuffer {
    data: Vec<f32>,
}

impl PositionBuffer {
    /// An empty buffer, returned for degenerate inputs
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_points<I>(points: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        let mut data = Vec::with_capacity(capacity * COMPONENTS_PER_VERTEX);
        for (x, y) in points {
            data.push(x);
            data.push(y);
        }
        Self { data }
    }

    /// Number of floats in the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.data.len() / COMPONENTS_PER_VERTEX
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Typed view of the vertices
    pub fn vertices(&self) -> &[Vertex] {
        // A deserialized buffer may carry a dangling component
        bytemuck::cast_slice(&self.data[..self.vertex_count() * COMPONENTS_PER_VERTEX])
    }

    /// Raw bytes for direct GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Take ownership of the underlying floats without copying
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Linear map from a display time window onto the gl x range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeToGlScale {
    pub domain: TimeRange,
    pub gl_min: f32,
    pub gl_max: f32,
}

impl TimeToGlScale {
    pub fn new(domain: TimeRange, gl_min: f32, gl_max: f32) -> Self {
        Self {
            domain,
            gl_min,
            gl_max,
        }
    }

    /// Scale onto the default `0..100` gl range
    pub fn with_default_range(domain: TimeRange) -> Self {
        Self::new(domain, DEFAULT_GL_MIN, DEFAULT_GL_MAX)
    }

    pub fn is_valid(&self) -> bool {
        self.domain.is_valid() && self.gl_min.is_finite() && self.gl_max.is_finite()
    }

    /// Map an epoch time to gl units
    ///
    /// The subtraction happens in `f64` so epoch-second magnitudes keep their
    /// sub-sample precision before narrowing.
    pub fn scale(&self, time_secs: f64) -> f32 {
        let fraction = (time_secs - self.domain.start_time_secs) / self.domain.duration_secs();
        (self.gl_min as f64 + fraction * (self.gl_max - self.gl_min) as f64) as f32
    }
}

/// `y = value * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmplitudeTransform {
    pub scale: f32,
    pub offset: f32,
}

impl Default for AmplitudeTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

impl AmplitudeTransform {
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        value * self.scale + self.offset
    }
}

/// Everything a builder needs besides the samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionBufferParams {
    pub scale: TimeToGlScale,
    #[serde(default)]
    pub amplitude: AmplitudeTransform,
    /// Channel time offset added to every sample time
    #[serde(default)]
    pub time_offset_secs: f64,
    /// Render as a staircase instead of a polyline
    #[serde(default)]
    pub step: bool,
}

impl PositionBufferParams {
    pub fn new(scale: TimeToGlScale) -> Self {
        Self {
            scale,
            amplitude: AmplitudeTransform::default(),
            time_offset_secs: 0.0,
            step: false,
        }
    }

    pub fn with_amplitude(mut self, amplitude: AmplitudeTransform) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_time_offset(mut self, seconds: f64) -> Self {
        self.time_offset_secs = seconds;
        self
    }

    pub fn with_step(mut self, step: bool) -> Self {
        self.step = step;
        self
    }

    /// Map `(time, value)` points into gl coordinates
    fn project<I>(&self, points: I, count: usize) -> PositionBuffer
    where
        I: Iterator<Item = (f64, f32)>,
    {
        if self.step {
            let raw: Vec<(f64, f64)> = points.map(|(t, v)| (t, v as f64)).collect();
            let stepped = create_step_points(&raw);
            let len = stepped.len();
            PositionBuffer::from_points(
                stepped
                    .into_iter()
                    .map(|(t, v)| (self.scale.scale(t), self.amplitude.apply(v as f32))),
                len,
            )
        } else {
            PositionBuffer::from_points(
                points.map(|(t, v)| (self.scale.scale(t), self.amplitude.apply(v))),
                count,
            )
        }
    }
}

/// Build a buffer for evenly sampled data
///
/// Vertex `i` sits at `start + i / sample_rate (+ time offset)`. Non-finite
/// samples are skipped and leave a gap, so without step rendering the buffer
/// holds `2 * finite_sample_count` floats. Returns an
/// empty buffer when the sample rate is not a positive finite number, there
/// are no samples, or the display window is degenerate.
pub fn create_position_buffer_for_data_by_sample_rate(
    data: &DataBySampleRate,
    params: &PositionBufferParams,
) -> PositionBuffer {
    let rate = data.sample_rate;
    if !(rate.is_finite() && rate > 0.0) || data.values.is_empty() || !params.scale.is_valid() {
        log::debug!(
            "create_position_buffer: degenerate input (rate={}, samples={}), returning empty buffer",
            rate,
            data.values.len()
        );
        return PositionBuffer::empty();
    }

    let start = data.start_time_secs + params.time_offset_secs;
    let points = data
        .values
        .iter()
        .enumerate()
        .map(|(i, &value)| (start + i as f64 / rate, value))
        .filter(|&(_, value)| value.is_finite());

    params.project(points, data.values.len())
}

/// Build a buffer for data carrying its own timestamps
///
/// Pairs with a non-finite time or value are skipped.
pub fn create_position_buffer_for_data_by_time(
    data: &DataByTime,
    params: &PositionBufferParams,
) -> PositionBuffer {
    if data.values.is_empty() || !params.scale.is_valid() {
        return PositionBuffer::empty();
    }

    let points = data
        .values
        .iter()
        .map(|pair| (pair.time_secs + params.time_offset_secs, pair.value))
        .filter(|&(time, value)| time.is_finite() && value.is_finite());

    params.project(points, data.values.len())
}

/// Build a buffer for either kind of segment data
pub fn create_position_buffer(data: &SegmentData, params: &PositionBufferParams) -> PositionBuffer {
    match data {
        SegmentData::BySampleRate(data) => create_position_buffer_for_data_by_sample_rate(data, params),
        SegmentData::ByTime(data) => create_position_buffer_for_data_by_time(data, params),
    }
}
