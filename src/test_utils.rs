//! Test utilities: scripted transport and provider-document builders
//!
//! Keeps unit tests free of hand-written envelope JSON. The scripted
//! transport replays queued responses per endpoint; once a queue is down to
//! its last response, that response repeats, which is what retry tests want
//! from a persistently rate-limited endpoint.

#![cfg(test)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::{Value, json};

use crate::client::transport::{HttpResponse, Transport};
use crate::error::{Result, StatsError};

/// Transport double that serves queued responses keyed by URL fragment.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for every URL containing `fragment`. The last queued
    /// response for a fragment repeats indefinitely.
    pub fn enqueue(&self, fragment: &str, status: u16, body: impl Into<String>) {
        let mut routes = self.routes.lock().unwrap();
        routes
            .entry(fragment.to_string())
            .or_default()
            .push_back(HttpResponse { status, body: body.into() });
    }

    /// Number of requests whose URL contains `fragment`.
    pub fn call_count(&self, fragment: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|url| url.contains(fragment)).count()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        let mut routes = self.routes.lock().unwrap();
        for (fragment, queue) in routes.iter_mut() {
            if !url.contains(fragment.as_str()) {
                continue;
            }
            let response = if queue.len() > 1 {
                queue.pop_front().expect("non-empty queue")
            } else {
                queue.front().cloned().expect("scripted response queue is empty")
            };
            return Ok(response);
        }
        Err(StatsError::fetch_failed(url, "no scripted response"))
    }
}

/// One race result row, names derived from the identifiers.
pub fn result_json(
    driver_id: &str,
    constructor_id: &str,
    position_text: &str,
    points: &str,
    grid: &str,
    status: &str,
) -> Value {
    json!({
        "position": position_text,
        "positionText": position_text,
        "points": points,
        "grid": grid,
        "status": status,
        "Driver": {"driverId": driver_id, "givenName": driver_id, "familyName": "Driver"},
        "Constructor": {"constructorId": constructor_id, "name": constructor_id},
    })
}

/// One race carrying main-race result rows.
pub fn race_json(round: u32, name: &str, date: &str, results: Vec<Value>) -> Value {
    json!({
        "season": "2024",
        "round": round.to_string(),
        "raceName": name,
        "date": date,
        "time": "15:00:00Z",
        "Circuit": {
            "circuitId": "circuit",
            "circuitName": "Circuit",
            "Location": {"locality": "Town", "country": "Country"},
        },
        "Results": results,
    })
}

/// Race-table envelope page.
pub fn races_envelope(total: usize, offset: usize, races: Vec<Value>) -> String {
    json!({
        "MRData": {
            "limit": "100",
            "offset": offset.to_string(),
            "total": total.to_string(),
            "RaceTable": {"season": "2024", "Races": races},
        }
    })
    .to_string()
}

/// One driver standings row.
pub fn driver_standing_json(
    position: &str,
    points: &str,
    wins: &str,
    driver_id: &str,
    constructor_id: &str,
) -> Value {
    json!({
        "position": position,
        "points": points,
        "wins": wins,
        "Driver": {"driverId": driver_id, "givenName": driver_id, "familyName": "Driver"},
        "Constructors": [{"constructorId": constructor_id, "name": constructor_id}],
    })
}

/// Driver standings envelope.
pub fn driver_standings_envelope(rows: Vec<Value>) -> String {
    json!({
        "MRData": {
            "total": rows.len().to_string(),
            "StandingsTable": {
                "season": "2024",
                "StandingsLists": [{"season": "2024", "round": "24", "DriverStandings": rows}],
            },
        }
    })
    .to_string()
}

/// One constructor standings row.
pub fn constructor_standing_json(
    position: &str,
    points: &str,
    wins: &str,
    constructor_id: &str,
) -> Value {
    json!({
        "position": position,
        "points": points,
        "wins": wins,
        "Constructor": {"constructorId": constructor_id, "name": constructor_id},
    })
}

/// Constructor standings envelope.
pub fn constructor_standings_envelope(rows: Vec<Value>) -> String {
    json!({
        "MRData": {
            "total": rows.len().to_string(),
            "StandingsTable": {
                "season": "2024",
                "StandingsLists": [{"season": "2024", "round": "24", "ConstructorStandings": rows}],
            },
        }
    })
    .to_string()
}
