//! Ratings export/import
//!
//! A season's full ratings bundle round-trips through a versioned JSON
//! document. Only the `season` field is required on import; the version
//! marker and export timestamp are informational.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::types::{DriverRating, SeasonRatings};

/// Current export document version.
pub const EXPORT_VERSION: u32 = 1;

/// Wire shape of an exported ratings bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_ratings: Option<SeasonRatings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_ratings: Option<Vec<DriverRating>>,
}

/// A document that passed import validation: `season` is present.
#[derive(Debug, Clone)]
pub struct ValidatedDocument {
    pub season: String,
    pub race_ratings: Option<SeasonRatings>,
    pub quick_ratings: Option<Vec<DriverRating>>,
}

/// Structured import outcome with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub season: String,
    pub races_imported: usize,
    pub quick_ratings_imported: usize,
    pub message: String,
}

impl ImportSummary {
    pub(crate) fn new(season: String, races_imported: usize, quick_ratings_imported: usize) -> Self {
        let message = format!(
            "Imported {races_imported} rated race(s) and {quick_ratings_imported} quick rating(s) for season {season}"
        );
        Self { season, races_imported, quick_ratings_imported, message }
    }
}

/// Assemble the export document for a season.
pub(crate) fn export_document(
    season: &str,
    race_ratings: Option<SeasonRatings>,
    quick_ratings: Vec<DriverRating>,
    exported_at: DateTime<Utc>,
) -> RatingsDocument {
    RatingsDocument {
        version: Some(EXPORT_VERSION),
        exported_at: Some(exported_at),
        season: Some(season.to_string()),
        race_ratings,
        quick_ratings: if quick_ratings.is_empty() { None } else { Some(quick_ratings) },
    }
}

pub(crate) fn serialize_document(document: &RatingsDocument) -> Result<String> {
    serde_json::to_string_pretty(document)
        .map_err(|err| StatsError::parse_error("ratings export", err.to_string()))
}

/// Parse and validate user-supplied import text.
///
/// Rejects malformed JSON and documents without a `season` field before any
/// stored state is touched.
pub(crate) fn parse_document(json: &str) -> Result<ValidatedDocument> {
    let document: RatingsDocument = serde_json::from_str(json)
        .map_err(|err| StatsError::import_rejected(format!("not a valid ratings document: {err}")))?;
    let season = document
        .season
        .filter(|season| !season.is_empty())
        .ok_or_else(|| StatsError::import_rejected("missing required `season` field"))?;
    Ok(ValidatedDocument {
        season,
        race_ratings: document.race_ratings,
        quick_ratings: document.quick_ratings,
    })
}
