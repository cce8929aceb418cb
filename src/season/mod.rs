//! Season aggregation
//!
//! Pure derivation logic: raw race, qualifying and standings documents in,
//! season-wide statistics views out. Nothing here touches the network or
//! storage, which keeps every rule unit-testable on fixture data.

mod countries;
mod head_to_head;
mod stats;
mod table;

pub use countries::country_code_for_race;
pub use head_to_head::{HeadToHead, compute_head_to_head};
pub use stats::{compute_constructor_standings, compute_driver_season_stats};
pub use table::{
    RaceColumn, RoundCell, RoundPosition, build_race_by_round_map, build_race_columns,
    shorten_race_name,
};
