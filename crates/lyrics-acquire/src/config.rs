use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://genius.com";
pub const DEFAULT_API_URL: &str = "https://api.genius.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Substring identifying the inline script that assigns the page state.
pub const STATE_MARKER: &str = "__PRELOADED_STATE__";

/// Settings for the lyrics page extractor.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Site root the page identifier is joined onto.
    pub base_url: String,
    pub user_agent: String,
    pub referer: String,
    /// Marker a `<script>` must contain to be treated as the state script.
    pub state_marker: String,
    /// Whole-request timeout for the page fetch. `None` keeps transport defaults.
    pub fetch_timeout: Option<Duration>,
    pub sandbox: SandboxLimits,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_BASE_URL.to_string(),
            state_marker: STATE_MARKER.to_string(),
            fetch_timeout: None,
            sandbox: SandboxLimits::default(),
        }
    }
}

impl ExtractorConfig {
    /// Point the extractor at another site root, keeping the referer in step.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.referer = self.base_url.clone();
        self
    }
}

/// Bounds applied to each sandboxed state-script evaluation.
#[derive(Debug, Clone)]
pub struct SandboxLimits {
    /// Wall-clock deadline enforced by the caller around the evaluation.
    pub deadline: Duration,
    /// Interpreter iteration budget per loop. Does not bound nested loops as a
    /// whole, so it only shortens how long an abandoned evaluation can run.
    pub loop_iterations: u64,
    pub recursion: usize,
}

impl Default for SandboxLimits {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(10),
            loop_iterations: 1_000_000,
            recursion: 512,
        }
    }
}

/// Settings for the Genius REST client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub access_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            access_token: None,
        }
    }
}

/// OAuth2 authorization-code settings for obtaining an API access token.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub authorize_url: String,
    pub token_url: String,
}

impl OAuthConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url: redirect_url.into(),
            authorize_url: format!("{DEFAULT_API_URL}/oauth/authorize"),
            token_url: format!("{DEFAULT_API_URL}/oauth/token"),
        }
    }
}
