//! Constant-amplitude segments

use crate::error::{WaveformError, WaveformResult};
use crate::types::{ChannelSegment, DataBySampleRate, DataSegment, SegmentData, SegmentStyle, UNFILTERED};

/// Sample rate used when the caller does not pick one
const DEFAULT_FLAT_LINE_SAMPLE_RATE: f64 = 1.0;

/// Optional settings for flat-line segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatLineOptions {
    pub style: SegmentStyle,
    /// Defaults to 1 Hz
    pub sample_rate: Option<f64>,
    /// Defaults to [`UNFILTERED`]
    pub wf_filter_id: Option<String>,
    pub description: Option<String>,
    pub description_label_color: Option<String>,
}

/// A data segment holding `(end - start) * sample_rate` copies of `amplitude`
pub fn create_flat_line_data_segment(
    start_time_secs: f64,
    end_time_secs: f64,
    amplitude: f32,
    style: SegmentStyle,
    sample_rate: Option<f64>,
) -> WaveformResult<DataSegment> {
    if !(end_time_secs >= start_time_secs) {
        return Err(WaveformError::InvalidTimeRange {
            start: start_time_secs,
            end: end_time_secs,
        });
    }
    let sample_rate = sample_rate.unwrap_or(DEFAULT_FLAT_LINE_SAMPLE_RATE);
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(WaveformError::InvalidSampleRate(sample_rate));
    }

    let count = ((end_time_secs - start_time_secs) * sample_rate).round() as usize;

    Ok(DataSegment {
        style,
        data: SegmentData::BySampleRate(DataBySampleRate {
            start_time_secs,
            end_time_secs,
            sample_rate,
            values: vec![amplitude; count].into(),
        }),
    })
}

/// A channel segment wrapping a single flat-line data segment
pub fn create_flat_line_channel_segment(
    channel_name: impl Into<String>,
    start_time_secs: f64,
    end_time_secs: f64,
    amplitude: f32,
    options: FlatLineOptions,
) -> WaveformResult<ChannelSegment> {
    let FlatLineOptions {
        style,
        sample_rate,
        wf_filter_id,
        description,
        description_label_color,
    } = options;

    let data_segment =
        create_flat_line_data_segment(start_time_secs, end_time_secs, amplitude, style, sample_rate)?;

    Ok(ChannelSegment {
        channel_name: channel_name.into(),
        wf_filter_id: wf_filter_id.unwrap_or_else(|| UNFILTERED.to_string()),
        is_selected: false,
        data_segments: vec![data_segment],
        description,
        description_label_color,
        boundaries: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DisplayType;

    const START: f64 = 1_527_868_426.0;
    const END: f64 = START + 3000.0;

    fn values(segment: &DataSegment) -> &DataBySampleRate {
        match &segment.data {
            SegmentData::BySampleRate(data) => data,
            SegmentData::ByTime(_) => panic!("flat lines are sampled by rate"),
        }
    }

    #[test]
    fn test_flat_line_rejects_bad_inputs() {
        assert!(matches!(
            create_flat_line_data_segment(1.0, 0.0, 5.0, SegmentStyle::default(), None),
            Err(WaveformError::InvalidTimeRange { .. })
        ));
        assert_eq!(
            create_flat_line_data_segment(0.0, 5.0, 5.0, SegmentStyle::default(), Some(-1.0)),
            Err(WaveformError::InvalidSampleRate(-1.0))
        );
    }

    #[test]
    fn test_flat_line_default_sample_rate() {
        let segment = create_flat_line_data_segment(START, END, 5.0, SegmentStyle::default(), None).unwrap();
        let data = values(&segment);

        assert_eq!(data.start_time_secs, START);
        assert_eq!(data.values.len(), 3000);
        assert!(data.values.iter().all(|&v| v == 5.0));
        assert_eq!(START + data.values.len() as f64 / data.sample_rate, END);
        assert_eq!(segment.style, SegmentStyle::default());
    }

    #[test]
    fn test_flat_line_with_style_and_rate() {
        let style = SegmentStyle {
            color: Some("green".to_string()),
            display_type: Some(vec![DisplayType::Scatter, DisplayType::Line]),
            point_size: Some(7),
        };
        let segment = create_flat_line_data_segment(START, END, 3.0, style.clone(), Some(20.0)).unwrap();
        assert_eq!(values(&segment).values.len(), 3000 * 20);
        assert_eq!(segment.style, style);

        let sparse = create_flat_line_data_segment(START, END, 3.0, SegmentStyle::default(), Some(0.01)).unwrap();
        assert_eq!(values(&sparse).values.len(), 30);
    }

    #[test]
    fn test_flat_line_channel_segment() {
        let options = FlatLineOptions {
            sample_rate: Some(40.0),
            description: Some("sample flat line".to_string()),
            description_label_color: Some("purple".to_string()),
            ..Default::default()
        };
        let segment = create_flat_line_channel_segment("AAK.AAK.BHZ", START, END, 3.0, options).unwrap();

        assert_eq!(segment.channel_name, "AAK.AAK.BHZ");
        assert_eq!(segment.wf_filter_id, UNFILTERED);
        assert_eq!(segment.data_segments.len(), 1);
        assert_eq!(values(&segment.data_segments[0]).values.len(), 3000 * 40);
        assert_eq!(segment.description.as_deref(), Some("sample flat line"));
        assert_eq!(segment.description_label_color.as_deref(), Some("purple"));
    }

    #[test]
    fn test_flat_line_channel_segment_propagates_errors() {
        let result = create_flat_line_channel_segment("AAK.AAK.BHZ", 1.0, 0.0, 5.0, FlatLineOptions::default());
        assert!(result.is_err());
    }
}
