use crate::config::ApiConfig;
use crate::error::ApiError;
use lyrics_model::{ApiEnvelope, SearchResponse, Song, SongHit, SongResponse};
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Client for the Genius REST API (search and song details).
#[derive(Debug, Clone)]
pub struct GeniusApi {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl GeniusApi {
    pub fn new(config: &ApiConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
        }
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    /// Search songs by title, artist, album, or lyrics, most relevant first.
    ///
    /// Non-song hits are dropped.
    pub async fn search(&self, query: &str) -> Result<Vec<Song>, ApiError> {
        let mut url = self.endpoint(&["search"])?;
        url.query_pairs_mut().append_pair("q", query);

        tracing::info!(query = %query, "Searching songs");
        let response: SearchResponse = self.get_json(url).await?;

        let mut songs = Vec::new();
        for hit in response.hits {
            if hit.kind != "song" {
                tracing::debug!(kind = %hit.kind, "Skipping non-song hit");
                continue;
            }
            let song: SongHit = serde_json::from_value(hit.result)?;
            songs.push(Song::from(song));
        }

        tracing::info!(songs = songs.len(), "Search complete");
        Ok(songs)
    }

    /// Fetch the full details of one song, including its plain-text description.
    pub async fn song(&self, id: u64) -> Result<Song, ApiError> {
        let mut url = self.endpoint(&["songs", &id.to_string()])?;
        url.query_pairs_mut().append_pair("text_format", "plain");

        tracing::info!(id, "Fetching song details");
        let response: SongResponse = self.get_json(url).await?;
        Ok(Song::from(response.song))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let token = self.access_token.as_deref().ok_or(ApiError::NotInitialized)?;

        let response = self.http.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let api = GeniusApi::new(&ApiConfig::default(), reqwest::Client::new());
        assert_eq!(
            api.endpoint(&["songs", "42"]).unwrap().as_str(),
            "https://api.genius.com/songs/42"
        );
    }

    #[tokio::test]
    async fn test_requires_access_token() {
        let api = GeniusApi::new(&ApiConfig::default(), reqwest::Client::new());
        let err = api.search("humble").await.unwrap_err();
        assert!(matches!(err, ApiError::NotInitialized));
    }
}
