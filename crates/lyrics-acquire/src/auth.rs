use crate::config::OAuthConfig;
use crate::error::ApiError;
use reqwest::Url;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// A random `state` value for one authorization round trip.
pub fn new_state() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl OAuthConfig {
    /// URL the user opens to grant access; Genius redirects back to
    /// `redirect_url` with `code` and `state` query parameters.
    pub fn authorize_url(&self, state: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.authorize_url)
            .map_err(|_| ApiError::InvalidUrl(self.authorize_url.clone()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("scope", "")
            .append_pair("state", state)
            .append_pair("response_type", "code");
        Ok(url)
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        http: &reqwest::Client,
        code: &str,
    ) -> Result<String, ApiError> {
        let form = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
            ("response_type", "code"),
            ("grant_type", "authorization_code"),
        ];

        tracing::info!(url = %self.token_url, "Exchanging authorization code");
        let response = http.post(&self.token_url).form(&form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(token.access_token)
    }
}
