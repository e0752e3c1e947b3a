//! Common types for Weavess
//!
//! The station/channel hierarchy handed over by the display layer, the sample
//! series each channel may own, and the segment types used to describe what a
//! channel draws.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{WaveformError, WaveformResult};

/// Filter id used for channel segments that carry raw, unfiltered data
pub const UNFILTERED: &str = "unfiltered";

/// How a data segment is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayType {
    Line,
    Scatter,
}

/// Units for station distance labels and record section baselines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnits {
    #[default]
    Degrees,
    Km,
}

/// A closed time window in epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_time_secs: f64,
    pub end_time_secs: f64,
}

impl TimeRange {
    pub fn new(start_time_secs: f64, end_time_secs: f64) -> Self {
        Self {
            start_time_secs,
            end_time_secs,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.end_time_secs - self.start_time_secs
    }

    /// True when both bounds are finite and the window has positive width
    pub fn is_valid(&self) -> bool {
        self.start_time_secs.is_finite()
            && self.end_time_secs.is_finite()
            && self.end_time_secs > self.start_time_secs
    }
}

/// An evenly sampled series of amplitude values
///
/// `sample_count()` is always `samples.len()`; constructors reject an end
/// time before the start time. Samples live in a shared allocation so
/// segment data and worker requests built from a waveform never copy them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waveform {
    start_time_secs: f64,
    end_time_secs: f64,
    sample_rate: f64,
    #[serde(with = "sample_values")]
    samples: Arc<[f32]>,
}

impl Waveform {
    /// Create a waveform with an explicit time window
    pub fn new(
        start_time_secs: f64,
        end_time_secs: f64,
        sample_rate: f64,
        samples: impl Into<Arc<[f32]>>,
    ) -> WaveformResult<Self> {
        if end_time_secs < start_time_secs {
            return Err(WaveformError::InvalidTimeRange {
                start: start_time_secs,
                end: end_time_secs,
            });
        }
        Ok(Self {
            start_time_secs,
            end_time_secs,
            sample_rate,
            samples: samples.into(),
        })
    }

    /// Create a waveform whose end time is derived from the sample count
    pub fn from_samples(
        start_time_secs: f64,
        sample_rate: f64,
        samples: impl Into<Arc<[f32]>>,
    ) -> WaveformResult<Self> {
        let samples = samples.into();
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(WaveformError::InvalidSampleRate(sample_rate));
        }
        let end_time_secs = start_time_secs + samples.len() as f64 / sample_rate;
        Self::new(start_time_secs, end_time_secs, sample_rate, samples)
    }

    pub fn start_time_secs(&self) -> f64 {
        self.start_time_secs
    }

    pub fn end_time_secs(&self) -> f64 {
        self.end_time_secs
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// The shared sample allocation
    pub fn shared_samples(&self) -> &Arc<[f32]> {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time_secs, self.end_time_secs)
    }

    /// View this waveform as by-sample-rate segment data
    ///
    /// The result shares this waveform's samples.
    pub fn to_data(&self) -> DataBySampleRate {
        DataBySampleRate {
            start_time_secs: self.start_time_secs,
            end_time_secs: self.end_time_secs,
            sample_rate: self.sample_rate,
            values: Arc::clone(&self.samples),
        }
    }
}

/// A single sensor trace
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Hierarchical identifier, e.g. `NET.STA.CHAN`
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
    /// Temporal shift applied at render time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_offset_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waveform: Option<Waveform>,
}

impl Channel {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Default::default()
        }
    }

    pub fn with_time_offset(mut self, seconds: f64) -> Self {
        self.time_offset_seconds = Some(seconds);
        self
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = Some(waveform);
        self
    }

    /// Offset in seconds, zero when unset
    pub fn time_offset(&self) -> f64 {
        self.time_offset_seconds.unwrap_or(0.0)
    }
}

/// A named group of channels sharing a sensor site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    pub default_channel: Channel,
    /// Display order is insertion order
    #[serde(default)]
    pub non_default_channels: Vec<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default)]
    pub distance_units: DistanceUnits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azimuth: Option<f64>,
}

impl Station {
    pub fn new(id: impl Into<String>, default_channel: Channel) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            default_channel,
            non_default_channels: Vec::new(),
            distance: None,
            distance_units: DistanceUnits::default(),
            azimuth: None,
        }
    }

    pub fn with_channels(mut self, channels: Vec<Channel>) -> Self {
        self.non_default_channels = channels;
        self
    }

    pub fn with_distance(mut self, distance: f64, units: DistanceUnits) -> Self {
        self.distance = Some(distance);
        self.distance_units = units;
        self
    }

    /// All channels in display order, default channel first
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        std::iter::once(&self.default_channel).chain(self.non_default_channels.iter())
    }
}

/// Samples laid out at a fixed rate from `start_time_secs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBySampleRate {
    pub start_time_secs: f64,
    pub end_time_secs: f64,
    pub sample_rate: f64,
    #[serde(with = "sample_values")]
    pub values: Arc<[f32]>,
}

/// One irregularly timed sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeValuePair {
    pub time_secs: f64,
    #[serde(with = "sample_value")]
    pub value: f32,
}

/// Samples carrying their own timestamps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataByTime {
    pub values: Vec<TimeValuePair>,
}

/// The payload of a data segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SegmentData {
    BySampleRate(DataBySampleRate),
    ByTime(DataByTime),
}

impl SegmentData {
    pub fn sample_count(&self) -> usize {
        match self {
            SegmentData::BySampleRate(data) => data.values.len(),
            SegmentData::ByTime(data) => data.values.len(),
        }
    }

    /// Iterate over the raw amplitude values
    pub fn values(&self) -> Box<dyn Iterator<Item = f32> + '_> {
        match self {
            SegmentData::BySampleRate(data) => Box::new(data.values.iter().copied()),
            SegmentData::ByTime(data) => Box::new(data.values.iter().map(|pair| pair.value)),
        }
    }
}

/// Drawing style shared by data segments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<Vec<DisplayType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_size: Option<u32>,
}

/// A run of samples plus how to draw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSegment {
    #[serde(flatten)]
    pub style: SegmentStyle,
    pub data: SegmentData,
}

/// Amplitude extents of a channel segment, used for y-axis scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSegmentBoundaries {
    pub top_max: f32,
    pub bottom_max: f32,
    pub channel_avg: f32,
    pub offset: f32,
    pub samples_count: usize,
}

/// All data segments for one channel under one filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSegment {
    pub channel_name: String,
    pub wf_filter_id: String,
    #[serde(default)]
    pub is_selected: bool,
    pub data_segments: Vec<DataSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_label_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<ChannelSegmentBoundaries>,
}

/// Sample encoding for formats without NaN
///
/// serde_json writes non-finite floats as `null`; reading `null` back as NaN
/// keeps a gap in the series instead of rejecting the whole message.
mod sample_values {
    use std::sync::Arc;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &Arc<[f32]>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<[f32]>, D::Error> {
        let values = Vec::<Option<f32>>::deserialize(deserializer)?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f32::NAN)).collect())
    }
}

mod sample_value {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
    }
}
