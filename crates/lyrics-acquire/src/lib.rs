//! Lyrics acquisition for Genius song pages.
//!
//! Genius does not expose lyrics through its public API; they live in the
//! page's preloaded client state, assigned by an inline `<script>`. Extraction
//! runs four stages, each short-circuiting on failure:
//!
//! 1. [`fetch`]: one browser-like GET for the song page
//! 2. [`locate`]: find the `<script>` carrying the state marker
//! 3. [`materialize`]: run it in a fresh sandbox and read the lyrics HTML
//! 4. [`render`]: flatten that fragment into plain-text lines
//!
//! [`api`] and [`auth`] cover the REST search/details endpoints and the
//! OAuth2 code exchange that yields their access token.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod locate;
pub mod materialize;
pub mod render;

pub use api::GeniusApi;
pub use client::{extract_lyrics, LyricsClient};
pub use config::{ApiConfig, ExtractorConfig, OAuthConfig, SandboxLimits};
pub use error::{ApiError, FetchError, LyricsError};
pub use fetch::{BrowserRequestConstructor, RequestConstructor};
pub use reqwest;
