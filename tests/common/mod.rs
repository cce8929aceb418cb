//! Shared harness for integration tests: a scripted transport and
//! provider-document builders.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use gridbook::{
    ApiClient, ClientConfig, Gridbook, HttpResponse, KeyValueStore, MemoryStore, Result,
    StatsError, Transport,
};

/// Transport double serving queued responses per URL fragment. The last
/// response queued for a fragment repeats, so a persistently rate-limited
/// endpoint is scripted with a single 429.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<(u16, String)>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, fragment: &str, status: u16, body: impl Into<String>) {
        let mut routes = self.routes.lock().unwrap();
        routes.entry(fragment.to_string()).or_default().push_back((status, body.into()));
    }

    pub fn call_count(&self, fragment: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|url| url.contains(fragment)).count()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        let mut routes = self.routes.lock().unwrap();
        for (fragment, queue) in routes.iter_mut() {
            if !url.contains(fragment.as_str()) {
                continue;
            }
            let (status, body) = if queue.len() > 1 {
                queue.pop_front().expect("non-empty queue")
            } else {
                queue.front().cloned().expect("scripted response queue is empty")
            };
            return Ok(HttpResponse { status, body });
        }
        Err(StatsError::fetch_failed(url, "no scripted response"))
    }
}

/// Initialize test logging once; respects `RUST_LOG`.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Wire a `Gridbook` over a scripted transport and in-memory store.
pub fn gridbook_with(transport: Arc<ScriptedTransport>) -> Gridbook {
    init_tracing();
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = ClientConfig { base_url: "https://stats.test/f1".to_string(), ..Default::default() };
    let client = ApiClient::with_transport(transport, Arc::clone(&store), config);
    Gridbook::with_client(client, store)
}

pub fn result_row(driver_id: &str, constructor_id: &str, position_text: &str, points: &str) -> Value {
    json!({
        "position": position_text,
        "positionText": position_text,
        "points": points,
        "grid": "1",
        "status": if position_text.chars().all(|c| c.is_ascii_digit()) { "Finished" } else { "Retired" },
        "Driver": {"driverId": driver_id, "givenName": driver_id, "familyName": "Driver"},
        "Constructor": {"constructorId": constructor_id, "name": constructor_id},
    })
}

pub fn quali_row(driver_id: &str, constructor_id: &str, position: &str) -> Value {
    json!({
        "position": position,
        "Driver": {"driverId": driver_id, "givenName": driver_id, "familyName": "Driver"},
        "Constructor": {"constructorId": constructor_id, "name": constructor_id},
    })
}

pub fn race(round: u32, name: &str, date: &str, key: &str, rows: Vec<Value>) -> Value {
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
        key: rows,
    })
}

pub fn races_envelope(races: Vec<Value>) -> String {
    json!({
        "MRData": {
            "limit": "100",
            "offset": "0",
            "total": races.len().to_string(),
            "RaceTable": {"season": "2024", "Races": races},
        }
    })
    .to_string()
}

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

pub fn driver_standing(position: &str, points: &str, wins: &str, driver_id: &str, constructor_id: &str) -> Value {
    json!({
        "position": position,
        "points": points,
        "wins": wins,
        "Driver": {"driverId": driver_id, "givenName": driver_id, "familyName": "Driver"},
        "Constructors": [{"constructorId": constructor_id, "name": constructor_id}],
    })
}

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

pub fn constructor_standing(position: &str, points: &str, wins: &str, constructor_id: &str) -> Value {
    json!({
        "position": position,
        "points": points,
        "wins": wins,
        "Constructor": {"constructorId": constructor_id, "name": constructor_id},
    })
}
