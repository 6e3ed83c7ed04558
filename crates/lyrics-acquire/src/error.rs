use std::time::Duration;
use thiserror::Error;

/// Why a page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid page identifier {0:?}")]
    InvalidIdentifier(String),

    #[error("invalid base URL {0:?}")]
    InvalidBaseUrl(String),

    #[error("invalid header value for {name}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("got error response: HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Terminal failure of one lyrics extraction.
///
/// Each variant belongs to exactly one pipeline stage, see [`LyricsError::stage`].
#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("failed to fetch {path:?}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: FetchError,
    },

    #[error("preloaded state script not found (no <script> contains {marker:?})")]
    StateNotFound { marker: String },

    #[error("failed to execute state script: {0}")]
    ScriptExecution(String),

    #[error("lyrics data has unexpected shape at `{path}`: {reason}")]
    UnexpectedShape { path: String, reason: String },

    #[error("failed to parse lyrics fragment: {0}")]
    Parse(String),

    #[error("state script did not finish within {0:?}")]
    Timeout(Duration),
}

impl LyricsError {
    pub(crate) fn fetch(path: &str, source: impl Into<FetchError>) -> Self {
        Self::Fetch {
            path: path.to_string(),
            source: source.into(),
        }
    }

    /// Name of the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::StateNotFound { .. } => "locate",
            Self::ScriptExecution(_) | Self::UnexpectedShape { .. } | Self::Timeout(_) => {
                "materialize"
            }
            Self::Parse(_) => "render",
        }
    }
}

/// Failure of the REST client or the OAuth code exchange.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("client is not initialized: no access token configured")]
    NotInitialized,

    #[error("base url is malformed: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("got error response: HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        let err = LyricsError::fetch("/x", FetchError::InvalidIdentifier("..".into()));
        assert_eq!(err.stage(), "fetch");
        assert_eq!(
            LyricsError::StateNotFound { marker: "m".into() }.stage(),
            "locate"
        );
        assert_eq!(LyricsError::Timeout(Duration::from_secs(1)).stage(), "materialize");
        assert_eq!(LyricsError::Parse("bad".into()).stage(), "render");
    }

    #[test]
    fn test_fetch_error_message_names_identifier() {
        let err = LyricsError::fetch(
            "/missing-lyrics",
            FetchError::Status(reqwest::StatusCode::NOT_FOUND),
        );
        let msg = err.to_string();
        assert!(msg.contains("/missing-lyrics"));
        assert!(msg.contains("404"));
    }
}
