use crate::config::{ExtractorConfig, SandboxLimits};
use crate::error::{FetchError, LyricsError};
use crate::fetch::{self, BrowserRequestConstructor, RequestConstructor};
use crate::locate::locate_state_script;
use crate::materialize::materialize_lyrics_html;
use crate::render::render_lyrics;
use std::sync::Arc;

/// Fetches song pages and extracts their lyrics.
///
/// Holds no per-extraction state; every call builds its own sandbox, so one
/// client can serve concurrent callers.
#[derive(Clone)]
pub struct LyricsClient {
    http: reqwest::Client,
    request_constructor: Arc<dyn RequestConstructor>,
    config: ExtractorConfig,
}

impl LyricsClient {
    pub fn new(
        config: ExtractorConfig,
        http: reqwest::Client,
        request_constructor: Arc<dyn RequestConstructor>,
    ) -> Self {
        Self {
            http,
            request_constructor,
            config,
        }
    }

    /// Client with the browser-impersonating request constructor.
    pub fn from_config(config: ExtractorConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.fetch_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        let constructor = BrowserRequestConstructor::new(&config)?;
        Ok(Self::new(config, http, Arc::new(constructor)))
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Fetch the page at `path` and return its lyrics as plain text.
    pub async fn get_lyrics(&self, path: &str) -> Result<String, LyricsError> {
        let request = self
            .request_constructor
            .construct(path)
            .map_err(|e| LyricsError::fetch(path, e))?;

        let html = fetch::fetch_page(&self.http, request)
            .await
            .map_err(|e| LyricsError::fetch(path, e))?;

        extract_lyrics(&html, &self.config).await
    }
}

/// Run the sandbox on a blocking thread and give up once the deadline passes.
///
/// The interpreter cannot be interrupted from outside, so an abandoned
/// evaluation keeps its blocking-pool thread until the script ends or trips a
/// loop or recursion limit; its result is discarded. The loop limit counts
/// iterations per loop, so nested loops can run well past the deadline.
async fn materialize_with_deadline(
    script: String,
    namespace: String,
    limits: SandboxLimits,
) -> Result<String, LyricsError> {
    let deadline = limits.deadline;
    let task = tokio::task::spawn_blocking(move || {
        materialize_lyrics_html(&script, &namespace, &limits)
    });

    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(LyricsError::ScriptExecution(format!(
            "sandbox task failed: {join_error}"
        ))),
        Err(_) => {
            tracing::warn!(?deadline, "State script exceeded deadline");
            Err(LyricsError::Timeout(deadline))
        }
    }
}

/// Locate, materialize, and render over an already-fetched page.
///
/// The network-free part of [`LyricsClient::get_lyrics`], under the same
/// script deadline.
pub async fn extract_lyrics(html: &str, config: &ExtractorConfig) -> Result<String, LyricsError> {
    let script = locate_state_script(html, &config.state_marker)?;
    tracing::info!(bytes = script.len(), "Located state script");

    let fragment = materialize_with_deadline(
        script,
        config.state_marker.clone(),
        config.sandbox.clone(),
    )
    .await?;
    tracing::info!(bytes = fragment.len(), "Materialized lyrics fragment");

    Ok(render_lyrics(&fragment))
}
