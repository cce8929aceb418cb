//! Race weekend structures
//!
//! Races, circuits and per-driver session results. All of these are
//! ephemeral: re-derived from the remote provider on each request and only
//! ever held through the response cache.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A championship season as listed by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    /// Four-digit year, kept as a string to match the provider's identifier.
    pub year: String,
    /// Reference URL for the season.
    pub url: String,
}

/// Reference to a driver (identifier plus display-name snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverRef {
    pub id: String,
    pub name: String,
}

/// Reference to a constructor (identifier plus display-name snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructorRef {
    pub id: String,
    pub name: String,
}

/// Circuit a race is held at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub id: String,
    pub name: String,
    pub locality: String,
    pub country: String,
}

/// One race weekend within a season.
///
/// Depending on the endpoint a race was fetched from, `results` holds main
/// race rows, sprint rows, or is empty (schedule fetch), and `qualifying`
/// holds the qualifying classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub season: String,
    /// 1-based round number. Sequential but not necessarily gapless.
    pub round: u32,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub circuit: Circuit,
    pub results: Vec<RaceResult>,
    pub qualifying: Vec<QualifyingResult>,
}

impl Race {
    /// Scheduled start as a UTC timestamp. Falls back to midnight when the
    /// provider supplies only a date.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        let date = self.date?;
        let time = self.time.unwrap_or(NaiveTime::MIN);
        Some(date.and_time(time).and_utc())
    }

    /// Whether the race has already been held as of `now`.
    ///
    /// Derived and time-varying: flips from false to true as the wall clock
    /// crosses the scheduled start. Races without a date are never completed.
    pub fn is_completed_at(&self, now: DateTime<Utc>) -> bool {
        self.start_time().is_some_and(|start| start < now)
    }
}

/// One classification row of a race or sprint session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub driver: DriverRef,
    pub constructor: ConstructorRef,
    /// Finishing position. `None` is the sole encoding for "not classified"
    /// (retired, disqualified, excluded, withdrew, failed to qualify).
    pub position: Option<u32>,
    /// Championship points scored, zero for non-scorers.
    pub points: f64,
    /// Grid (starting) position, when the provider reports one.
    pub grid: Option<u32>,
    /// Free-text status: "Finished", "+1 Lap", "Collision", ...
    pub status: String,
}

impl RaceResult {
    /// Whether the driver was classified at the finish.
    pub fn is_classified(&self) -> bool {
        self.position.is_some()
    }

    /// Whether this row is a podium finish (positions 1 through 3).
    pub fn is_podium(&self) -> bool {
        matches!(self.position, Some(p) if (1..=3).contains(&p))
    }
}

/// One row of a qualifying classification.
///
/// Qualifying position is always assigned when the row exists; there is no
/// not-classified encoding here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingResult {
    pub driver: DriverRef,
    pub constructor: ConstructorRef,
    pub position: u32,
}
