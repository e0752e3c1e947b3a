//! Synthetic waveforms for demos and load testing

use rand::Rng;

use crate::error::{WaveformError, WaveformResult};
use crate::types::{Channel, Station, Waveform};

/// Shape of a generated dummy waveform
#[derive(Debug, Clone, PartialEq)]
pub struct DummyWaveformParams {
    pub start_time_secs: f64,
    pub end_time_secs: f64,
    pub sample_rate: f64,
    /// Peak amplitude of the single event burst
    pub event_amplitude: f32,
    /// Half-width of the uniform background noise
    pub noise_amplitude: f32,
}

/// Event burst length as a fraction of the window
const EVENT_FRACTION: f64 = 0.05;

/// Oscillations across one event burst
const EVENT_CYCLES: f64 = 12.0;

/// A station whose default channel holds noise plus one decaying event
///
/// The station id is the channel id up to its first `.`.
pub fn create_dummy_waveform<R: Rng>(
    channel_id: &str,
    params: &DummyWaveformParams,
    rng: &mut R,
) -> WaveformResult<Station> {
    let DummyWaveformParams {
        start_time_secs,
        end_time_secs,
        sample_rate,
        event_amplitude,
        noise_amplitude,
    } = *params;

    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(WaveformError::InvalidSampleRate(sample_rate));
    }
    if !(end_time_secs >= start_time_secs) {
        return Err(WaveformError::InvalidTimeRange {
            start: start_time_secs,
            end: end_time_secs,
        });
    }

    let count = ((end_time_secs - start_time_secs) * sample_rate).round() as usize;
    let noise = noise_amplitude.abs();
    let mut samples: Vec<f32> = (0..count)
        .map(|_| if noise > 0.0 { rng.gen_range(-noise..=noise) } else { 0.0 })
        .collect();

    let event_len = ((count as f64 * EVENT_FRACTION) as usize).max(1);
    if count > event_len {
        // Keep the burst away from the window edges
        let event_start = rng.gen_range(count / 4..=(count * 3 / 4).min(count - event_len));
        for (i, sample) in samples[event_start..event_start + event_len].iter_mut().enumerate() {
            let phase = i as f64 / event_len as f64;
            let envelope = (-4.0 * phase).exp();
            let carrier = (2.0 * std::f64::consts::PI * EVENT_CYCLES * phase).sin();
            *sample += (event_amplitude as f64 * envelope * carrier) as f32;
        }
    }

    let waveform = Waveform::new(start_time_secs, end_time_secs, sample_rate, samples)?;
    let station_id = channel_id.split('.').next().unwrap_or(channel_id);

    log::debug!(
        "create_dummy_waveform: {} samples for {} at {} Hz",
        count,
        channel_id,
        sample_rate
    );

    Ok(Station::new(station_id, Channel::new(channel_id).with_waveform(waveform)))
}
