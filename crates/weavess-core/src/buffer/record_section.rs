//! Record section buffers
//!
//! A record section overlays many stations in one plot, each trace lifted to
//! its own baseline (usually proportional to epicentral distance) so the
//! traces do not overlap.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::position_buffer::{
    create_position_buffer_for_data_by_sample_rate, AmplitudeTransform, PositionBuffer,
    PositionBufferParams, TimeToGlScale,
};
use crate::types::{DataBySampleRate, Station};

/// How each station's vertical baseline is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum BaselineMode {
    /// `distance * units_per_distance`; stations without a distance use
    /// their index in place of the distance
    #[serde(rename_all = "camelCase")]
    Distance { units_per_distance: f64 },
    /// `index * spacing`
    Index { spacing: f64 },
}

impl Default for BaselineMode {
    fn default() -> Self {
        BaselineMode::Index { spacing: 1.0 }
    }
}

impl BaselineMode {
    pub fn baseline(&self, index: usize, distance: Option<f64>) -> f32 {
        let value = match *self {
            BaselineMode::Distance { units_per_distance } => {
                distance.filter(|d| d.is_finite()).unwrap_or(index as f64) * units_per_distance
            }
            BaselineMode::Index { spacing } => index as f64 * spacing,
        };
        value as f32
    }
}

/// One station's contribution to a record section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSectionTrace {
    pub station_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default)]
    pub time_offset_secs: f64,
    pub data: DataBySampleRate,
}

impl RecordSectionTrace {
    /// Trace for a station's default channel, `None` when nothing is loaded
    pub fn from_station(station: &Station) -> Option<Self> {
        let channel = &station.default_channel;
        channel.waveform.as_ref().map(|waveform| Self {
            station_id: station.id.clone(),
            distance: station.distance,
            time_offset_secs: channel.time_offset(),
            data: waveform.to_data(),
        })
    }
}

/// Request for a multi-station record section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSectionParams {
    pub traces: Vec<RecordSectionTrace>,
    pub scale: TimeToGlScale,
    #[serde(default = "default_amplitude_scale")]
    pub amplitude_scale: f32,
    #[serde(default)]
    pub baseline: BaselineMode,
}

fn default_amplitude_scale() -> f32 {
    1.0
}

/// A station's buffer already lifted to its baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationPositionBuffer {
    pub station_id: String,
    pub baseline: f32,
    pub buffer: PositionBuffer,
}

/// Build per-station buffers for a record section
///
/// Output order matches `params.traces`. A trace with degenerate data keeps
/// its slot with an empty buffer. Stations are built in parallel.
pub fn create_record_section_position_buffer(params: &RecordSectionParams) -> Vec<StationPositionBuffer> {
    params
        .traces
        .par_iter()
        .enumerate()
        .map(|(index, trace)| {
            let baseline = params.baseline.baseline(index, trace.distance);
            let buffer_params = PositionBufferParams::new(params.scale)
                .with_amplitude(AmplitudeTransform {
                    scale: params.amplitude_scale,
                    offset: baseline,
                })
                .with_time_offset(trace.time_offset_secs);

            StationPositionBuffer {
                station_id: trace.station_id.clone(),
                baseline,
                buffer: create_position_buffer_for_data_by_sample_rate(&trace.data, &buffer_params),
            }
        })
        .collect()
}
