use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display format Genius uses for release dates (e.g., "October 28, 2002").
const RELEASE_DATE_FORMAT: &str = "%B %d, %Y";

/// The `{"meta": ..., "response": ...}` envelope wrapping every REST payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: T,
}

/// Payload of `GET /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// One search hit. Only hits with `type == "song"` carry a song result;
/// the result is kept raw so other hit types never fail decoding.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub kind: String,
    pub result: serde_json::Value,
}

/// Payload of `GET /songs/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SongResponse {
    pub song: SongDetails,
}

/// A song as returned inside search hits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SongHit {
    pub id: u64,
    pub path: String,
    pub artist_names: String,
    pub title: String,
    #[serde(default)]
    pub release_date_for_display: Option<String>,
}

/// A song as returned by the song-details endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SongDetails {
    #[serde(flatten)]
    pub song: SongHit,
    #[serde(default)]
    pub description: Option<Description>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Description {
    #[serde(default)]
    pub plain: String,
}

/// Caller-facing song record.
///
/// `path` is the page identifier accepted by the lyrics extractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: u64,
    pub path: String,
    pub artist_names: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<SongHit> for Song {
    fn from(hit: SongHit) -> Self {
        let release_date = hit
            .release_date_for_display
            .as_deref()
            .and_then(parse_release_date);

        Self {
            id: hit.id,
            path: hit.path,
            artist_names: hit.artist_names,
            title: hit.title,
            release_date,
            description: None,
        }
    }
}

impl From<SongDetails> for Song {
    fn from(details: SongDetails) -> Self {
        let mut song = Song::from(details.song);
        song.description = details
            .description
            .map(|d| d.plain)
            .filter(|d| !d.trim().is_empty() && d.trim() != "?");
        song
    }
}

/// Parse a display release date. Partial dates ("2002", "October 2002")
/// are not representable and yield `None`.
pub fn parse_release_date(display: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(display.trim(), RELEASE_DATE_FORMAT).ok()
}
