use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lyrics_acquire::{auth, ApiConfig, ExtractorConfig, GeniusApi, LyricsClient, OAuthConfig};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "lyrics")]
#[command(about = "Genius song search, details, and lyrics extraction tool")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// Site root song page paths are resolved against
    #[arg(long, global = true, env = "GENIUS_BASE_URL", default_value = lyrics_acquire::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Genius REST API root
    #[arg(long, global = true, env = "GENIUS_API_URL", default_value = lyrics_acquire::config::DEFAULT_API_URL)]
    api_url: String,

    /// Access token for the REST API (obtain one with `lyrics auth`)
    #[arg(long, global = true, env = "GENIUS_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Seconds the page-state script may run before extraction is abandoned
    #[arg(long, global = true, default_value_t = 10)]
    script_timeout: u64,

    /// Seconds allowed for the page fetch (transport default when omitted)
    #[arg(long, global = true)]
    fetch_timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Get the lyrics of a song by its page path
    Lyrics {
        /// Song page path (e.g., "/Kendrick-lamar-humble-lyrics"), as returned by `search` or `song`
        path: String,
    },

    /// Extract lyrics from a song page already saved to disk
    Extract {
        /// Path to the saved HTML page
        file: String,
    },

    /// Find songs by title, artist, album, description, or lyrics (most relevant first)
    Search {
        /// Search query
        query: String,
    },

    /// Get details about a song by its ID
    Song {
        /// Song ID, as returned by `search`
        id: u64,
    },

    /// Obtain a REST API access token through the OAuth2 authorization-code flow
    Auth {
        /// OAuth client ID
        #[arg(long, env = "GENIUS_API_ID")]
        client_id: String,

        /// OAuth client secret
        #[arg(long, env = "GENIUS_API_SECRET", hide_env_values = true)]
        client_secret: String,

        /// Public host of the redirect endpoint; the callback is HOST/callback
        #[arg(long, env = "HOST", default_value = "http://localhost:8080")]
        host: String,

        /// Authorization code, or the full callback URL (read from stdin when omitted)
        #[arg(long)]
        code: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    // Logs go to stderr so stdout carries only command output
    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let mut extractor = ExtractorConfig::default().with_base_url(cli.base_url.clone());
    extractor.sandbox.deadline = Duration::from_secs(cli.script_timeout);
    extractor.fetch_timeout = cli.fetch_timeout.map(Duration::from_secs);

    let api_config = ApiConfig {
        base_url: cli.api_url.clone(),
        access_token: cli.access_token.clone(),
    };

    match cli.command {
        Commands::Lyrics { path } => {
            tracing::info!(path = %path, "Getting song lyrics");
            let client = LyricsClient::from_config(extractor)?;
            let lyrics = client.get_lyrics(&path).await.map_err(|e| {
                tracing::error!(stage = e.stage(), error = %e, "Lyrics extraction failed");
                e
            })?;
            println!("{lyrics}");
        }
        Commands::Extract { file } => {
            tracing::info!(file = %file, "Extracting lyrics from saved page");
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {file}"))?;
            let lyrics = lyrics_acquire::extract_lyrics(&html, &extractor).await?;
            println!("{lyrics}");
        }
        Commands::Search { query } => {
            let api = GeniusApi::new(&api_config, reqwest_client()?);
            let songs = api.search(&query).await?;
            println!("{}", serde_json::to_string_pretty(&songs)?);
        }
        Commands::Song { id } => {
            let api = GeniusApi::new(&api_config, reqwest_client()?);
            let song: lyrics_model::Song = api.song(id).await?;
            println!("{}", serde_json::to_string_pretty(&song)?);
        }
        Commands::Auth {
            client_id,
            client_secret,
            host,
            code,
        } => {
            let redirect_url = format!("{}/callback", host.trim_end_matches('/'));
            let oauth = OAuthConfig::new(client_id, client_secret, redirect_url);
            let state = auth::new_state();
            let authorize_url = oauth.authorize_url(&state)?;

            let input = match code {
                Some(code) => code,
                None => {
                    eprintln!("Open this URL in your browser:\n\n  {authorize_url}\n");
                    eprintln!("Then paste the code (or the full callback URL) here:");
                    let mut line = String::new();
                    std::io::stdin()
                        .read_line(&mut line)
                        .context("Failed to read authorization code")?;
                    line
                }
            };

            let code = parse_callback(input.trim(), &state)?;
            let token = oauth.exchange_code(&reqwest_client()?, &code).await?;
            tracing::info!("Received access token");
            println!("{token}");
        }
    }

    Ok(())
}

fn reqwest_client() -> Result<lyrics_acquire::reqwest::Client> {
    lyrics_acquire::reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")
}

/// Accept either a bare code or the callback URL Genius redirected to. For a
/// URL, the `state` parameter must match the one we generated.
fn parse_callback(input: &str, expected_state: &str) -> Result<String> {
    anyhow::ensure!(!input.is_empty(), "No authorization code given");

    let Ok(url) = lyrics_acquire::reqwest::Url::parse(input) else {
        return Ok(input.to_string());
    };

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    anyhow::ensure!(
        state.as_deref() == Some(expected_state),
        "Callback state does not match this authorization request"
    );
    code.context("Callback URL has no code parameter")
}
