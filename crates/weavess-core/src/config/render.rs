//! Render settings for position buffer construction

use serde::{Deserialize, Serialize};

use crate::buffer::{
    AmplitudeTransform, BaselineMode, PositionBufferParams, RecordSectionParams, RecordSectionTrace,
    TimeToGlScale, DEFAULT_GL_MAX, DEFAULT_GL_MIN,
};
use crate::types::TimeRange;

/// Record section layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSectionConfig {
    pub baseline: BaselineMode,
    pub amplitude_scale: f32,
}

impl Default for RecordSectionConfig {
    fn default() -> Self {
        Self {
            baseline: BaselineMode::Distance {
                units_per_distance: 1.0,
            },
            amplitude_scale: 1.0,
        }
    }
}

/// Settings applied to every buffer built for a display
///
/// Every field has a default so partial YAML files load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub gl_min: f32,
    pub gl_max: f32,
    pub amplitude: AmplitudeTransform,
    /// Draw sample data as a staircase
    pub step: bool,
    pub record_section: RecordSectionConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gl_min: DEFAULT_GL_MIN,
            gl_max: DEFAULT_GL_MAX,
            amplitude: AmplitudeTransform::default(),
            step: false,
            record_section: RecordSectionConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn time_scale(&self, display: TimeRange) -> TimeToGlScale {
        TimeToGlScale::new(display, self.gl_min, self.gl_max)
    }

    /// Builder parameters for a channel shown over `display`
    pub fn position_buffer_params(&self, display: TimeRange, time_offset_secs: f64) -> PositionBufferParams {
        PositionBufferParams::new(self.time_scale(display))
            .with_amplitude(self.amplitude)
            .with_time_offset(time_offset_secs)
            .with_step(self.step)
    }

    /// Record section request for `traces` shown over `display`
    pub fn record_section_params(&self, display: TimeRange, traces: Vec<RecordSectionTrace>) -> RecordSectionParams {
        RecordSectionParams {
            traces,
            scale: self.time_scale(display),
            amplitude_scale: self.record_section.amplitude_scale,
            baseline: self.record_section.baseline,
        }
    }
}
