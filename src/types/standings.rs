//! Season standings structures
//!
//! Standings rows as reported by the provider, and the enriched per-season
//! statistics views the aggregator derives from them.

use serde::{Deserialize, Serialize};

use super::{ConstructorRef, DriverRef};

/// One driver's championship standing as reported by the standings endpoint.
///
/// Position, points and wins are authoritative here. The constructor is the
/// driver's association in the standings snapshot, which for a mid-season
/// transfer is the latest team, not a per-stint attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStanding {
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub driver: DriverRef,
    pub constructor: ConstructorRef,
}

/// One constructor's championship standing as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorStanding {
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub constructor: ConstructorRef,
}

/// Per-driver season statistics.
///
/// Standings fields merged with derived counts: poles and podiums are not
/// exposed by any standings endpoint and are scanned out of the season's
/// qualifying and race results instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSeasonStats {
    pub driver: DriverRef,
    pub constructor: ConstructorRef,
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub poles: u32,
    pub podiums: u32,
}

/// Per-constructor season statistics with derived pole/podium counts summed
/// over the constructor's standings-listed drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorSeasonStats {
    pub constructor: ConstructorRef,
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub poles: u32,
    pub podiums: u32,
}
