//! Pure helpers over the station hierarchy and point lists

mod lookup;
mod offsets;
mod step;

pub use lookup::{find_channel_in_station, find_channel_in_stations, find_station_for_channel};
pub use offsets::{calculate_min_max_offsets, MinMaxOffsets};
pub use step::create_step_points;
