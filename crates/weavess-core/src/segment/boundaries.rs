//! Amplitude boundaries for y-axis scaling

use crate::types::{ChannelSegment, ChannelSegmentBoundaries};

/// Extents and mean over every finite sample of a channel segment
///
/// `offset` is the larger magnitude of the two extents so an axis centred on
/// zero fits the whole segment. Returns `None` when there is nothing to
/// measure.
pub fn calculate_channel_segment_boundaries(segment: &ChannelSegment) -> Option<ChannelSegmentBoundaries> {
    let mut top_max = f32::NEG_INFINITY;
    let mut bottom_max = f32::INFINITY;
    let mut sum = 0.0f64;
    let mut samples_count = 0usize;

    for value in segment
        .data_segments
        .iter()
        .flat_map(|data_segment| data_segment.data.values())
        .filter(|value| value.is_finite())
    {
        top_max = top_max.max(value);
        bottom_max = bottom_max.min(value);
        sum += value as f64;
        samples_count += 1;
    }

    if samples_count == 0 {
        return None;
    }

    Some(ChannelSegmentBoundaries {
        top_max,
        bottom_max,
        channel_avg: (sum / samples_count as f64) as f32,
        offset: top_max.abs().max(bottom_max.abs()),
        samples_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataByTime, DataSegment, SegmentData, SegmentStyle, TimeValuePair, UNFILTERED};
    use crate::segment::create_flat_line_data_segment;

    fn segment(data_segments: Vec<DataSegment>) -> ChannelSegment {
        ChannelSegment {
            channel_name: "AAK.AAK.BHZ".to_string(),
            wf_filter_id: UNFILTERED.to_string(),
            is_selected: false,
            data_segments,
            description: None,
            description_label_color: None,
            boundaries: None,
        }
    }

    #[test]
    fn test_boundaries_across_segments() {
        let flat = create_flat_line_data_segment(0.0, 4.0, 2.0, SegmentStyle::default(), None).unwrap();
        let by_time = DataSegment {
            style: SegmentStyle::default(),
            data: SegmentData::ByTime(DataByTime {
                values: vec![
                    TimeValuePair { time_secs: 5.0, value: -6.0 },
                    TimeValuePair { time_secs: 6.0, value: f32::NAN },
                ],
            }),
        };

        let boundaries = calculate_channel_segment_boundaries(&segment(vec![flat, by_time])).unwrap();
        assert_eq!(boundaries.top_max, 2.0);
        assert_eq!(boundaries.bottom_max, -6.0);
        assert_eq!(boundaries.samples_count, 5);
        assert_eq!(boundaries.channel_avg, 0.4);
        assert_eq!(boundaries.offset, 6.0);
    }

    #[test]
    fn test_boundaries_empty_segment() {
        assert!(calculate_channel_segment_boundaries(&segment(vec![])).is_none());
    }
}
