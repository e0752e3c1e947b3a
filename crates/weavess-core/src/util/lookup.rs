//! Channel lookup over the station hierarchy
//!
//! Linear scans: station lists hold tens of entries and lookups happen at
//! interaction rate.

use crate::types::{Channel, Station};

/// Resolve a channel within one station
///
/// The station's own id resolves to its default channel; any other id is
/// matched against the non-default channels. `None` means not found.
pub fn find_channel_in_station<'a>(station: &'a Station, id: &str) -> Option<&'a Channel> {
    if station.id == id {
        return Some(&station.default_channel);
    }
    station
        .non_default_channels
        .iter()
        .find(|channel| channel.id == id)
}

/// Resolve a channel across stations, first match wins
pub fn find_channel_in_stations<'a>(stations: &'a [Station], id: &str) -> Option<&'a Channel> {
    stations
        .iter()
        .find_map(|station| find_channel_in_station(station, id))
}

/// Find the station whose subtree resolves `id`
pub fn find_station_for_channel<'a>(stations: &'a [Station], id: &str) -> Option<&'a Station> {
    stations
        .iter()
        .find(|station| find_channel_in_station(station, id).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stations() -> Vec<Station> {
        vec![
            Station::new("AAK", Channel::new("AAK.AAK.BHZ")).with_channels(vec![
                Channel::new("AAK.AAK.BHN"),
                Channel::new("AAK.AAK.BHE"),
            ]),
            Station::new("ASAR", Channel::new("ASAR.beam.SHZ"))
                .with_channels(vec![Channel::new("ASAR.AS01.SHZ")]),
        ]
    }

    #[test]
    fn test_station_id_resolves_default_channel() {
        let stations = stations();
        let found = find_channel_in_station(&stations[0], "AAK").unwrap();
        assert_eq!(found, &stations[0].default_channel);
    }

    #[test]
    fn test_non_default_channel_in_station() {
        let stations = stations();
        let found = find_channel_in_station(&stations[0], "AAK.AAK.BHE").unwrap();
        assert_eq!(found.id, "AAK.AAK.BHE");
    }

    #[test]
    fn test_missing_channel_in_station() {
        let stations = stations();
        assert!(find_channel_in_station(&stations[0], "nonexistent").is_none());
    }

    #[test]
    fn test_stations_search_matches_first_containing_station() {
        let stations = stations();
        let found = find_channel_in_stations(&stations, "ASAR.AS01.SHZ");
        assert_eq!(found, find_channel_in_station(&stations[1], "ASAR.AS01.SHZ"));
        assert_eq!(found.map(|c| c.id.as_str()), Some("ASAR.AS01.SHZ"));
    }

    #[test]
    fn test_stations_search_miss() {
        let stations = stations();
        assert!(find_channel_in_stations(&stations, "FOO").is_none());
        assert!(find_channel_in_stations(&[], "AAK").is_none());
    }

    #[test]
    fn test_find_station_for_channel() {
        let stations = stations();
        let station = find_station_for_channel(&stations, "AAK.AAK.BHN").unwrap();
        assert_eq!(station.id, "AAK");
        assert!(find_station_for_channel(&stations, "FOO").is_none());
    }
}
