//! Time-offset extents across a station list
//!
//! The display widens its time axis by these bounds so that channels shifted
//! by `time_offset_seconds` stay inside the viewport.

use serde::{Deserialize, Serialize};

use crate::types::Station;

/// Smallest and largest channel time offset, clamped around zero
///
/// `min_offset <= 0.0 <= max_offset` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinMaxOffsets {
    pub min_offset: f64,
    pub max_offset: f64,
}

/// Compute the offset extents over every channel of every station
///
/// Channels without an offset count as zero. An empty list yields `{0, 0}`.
pub fn calculate_min_max_offsets(stations: &[Station]) -> MinMaxOffsets {
    stations
        .iter()
        .flat_map(Station::channels)
        .map(|channel| channel.time_offset())
        .filter(|offset| offset.is_finite())
        .fold(MinMaxOffsets::default(), |acc, offset| MinMaxOffsets {
            min_offset: acc.min_offset.min(offset),
            max_offset: acc.max_offset.max(offset),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Channel;

    fn station(id: &str, default_offset: Option<f64>, others: &[Option<f64>]) -> Station {
        let mut default_channel = Channel::new(format!("{id}.BHZ"));
        default_channel.time_offset_seconds = default_offset;
        let channels = others
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                let mut channel = Channel::new(format!("{id}.CH{i}"));
                channel.time_offset_seconds = *offset;
                channel
            })
            .collect();
        Station::new(id, default_channel).with_channels(channels)
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(calculate_min_max_offsets(&[]), MinMaxOffsets::default());
    }

    #[test]
    fn test_all_zero_or_missing_offsets() {
        let stations = vec![
            station("A", None, &[Some(0.0), None]),
            station("B", Some(0.0), &[]),
        ];
        let offsets = calculate_min_max_offsets(&stations);
        assert_eq!(offsets.min_offset, 0.0);
        assert_eq!(offsets.max_offset, 0.0);
    }

    #[test]
    fn test_mixed_offsets_across_stations() {
        let stations = vec![
            station("A", Some(-3.5), &[Some(1.0)]),
            station("B", Some(2.0), &[Some(7.25), Some(-1.0)]),
        ];
        let offsets = calculate_min_max_offsets(&stations);
        assert_eq!(offsets.min_offset, -3.5);
        assert_eq!(offsets.max_offset, 7.25);
    }

    #[test]
    fn test_positive_only_offsets_clamp_min_to_zero() {
        let stations = vec![station("A", Some(4.0), &[Some(2.0)])];
        let offsets = calculate_min_max_offsets(&stations);
        assert_eq!(offsets.min_offset, 0.0);
        assert_eq!(offsets.max_offset, 4.0);
    }

    #[test]
    fn test_negative_only_offsets_clamp_max_to_zero() {
        let stations = vec![station("A", Some(-4.0), &[]), station("B", Some(-0.5), &[])];
        let offsets = calculate_min_max_offsets(&stations);
        assert_eq!(offsets.min_offset, -4.0);
        assert_eq!(offsets.max_offset, 0.0);
    }
}
