use crate::config::ExtractorConfig;
use crate::error::FetchError;
use reqwest::header::{HeaderValue, REFERER, USER_AGENT};
use reqwest::{Method, Request, Url};

/// Maps a page identifier to a fully-formed outbound request.
///
/// Implemented for any `Fn(&str) -> Result<Request, FetchError>`, so tests can
/// substitute their own base URL or headers with a closure.
pub trait RequestConstructor: Send + Sync {
    fn construct(&self, path: &str) -> Result<Request, FetchError>;
}

impl<F> RequestConstructor for F
where
    F: Fn(&str) -> Result<Request, FetchError> + Send + Sync,
{
    fn construct(&self, path: &str) -> Result<Request, FetchError> {
        self(path)
    }
}

/// Default constructor: a GET against the site root that looks like a desktop
/// browser. The site serves blocked or different markup without these headers.
#[derive(Debug, Clone)]
pub struct BrowserRequestConstructor {
    base_url: Url,
    user_agent: HeaderValue,
    referer: HeaderValue,
}

impl BrowserRequestConstructor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| FetchError::InvalidBaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl(config.base_url.clone()));
        }

        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|source| {
            FetchError::InvalidHeader {
                name: "User-Agent",
                source,
            }
        })?;
        let referer = HeaderValue::from_str(&config.referer).map_err(|source| {
            FetchError::InvalidHeader {
                name: "Referer",
                source,
            }
        })?;

        Ok(Self {
            base_url,
            user_agent,
            referer,
        })
    }

    /// Join the identifier onto the base URL's path.
    ///
    /// The identifier is taken as already percent-escaped, so `%C3%A9` stays as
    /// is. Empty identifiers, dot segments (also in `%2e` form), and backslashes
    /// are rejected so the result always stays under the base URL.
    pub fn page_url(&self, path: &str) -> Result<Url, FetchError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() || segments.iter().any(|s| is_unsafe_segment(s)) {
            return Err(FetchError::InvalidIdentifier(path.to_string()));
        }

        let base_path = self.base_url.path().trim_end_matches('/');
        let mut url = self.base_url.clone();
        url.set_path(&format!("{base_path}/{}", segments.join("/")));
        Ok(url)
    }
}

fn is_unsafe_segment(segment: &str) -> bool {
    let decoded_dots = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded_dots == "." || decoded_dots == ".." || segment.contains('\\')
}

impl RequestConstructor for BrowserRequestConstructor {
    fn construct(&self, path: &str) -> Result<Request, FetchError> {
        let mut request = Request::new(Method::GET, self.page_url(path)?);
        let headers = request.headers_mut();
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(REFERER, self.referer.clone());
        Ok(request)
    }
}

/// Send one request and return the body text.
///
/// Exactly one round trip; a non-success status fails without reading the body.
pub async fn fetch_page(client: &reqwest::Client, request: Request) -> Result<String, FetchError> {
    let url = request.url().clone();
    tracing::info!(url = %url, "Fetching song page");

    let response = client.execute(request).await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url = %url, status = %status, "Song page request failed");
        return Err(FetchError::Status(status));
    }

    let html = response.text().await?;
    tracing::info!(bytes = html.len(), "Received HTML");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constructor() -> BrowserRequestConstructor {
        BrowserRequestConstructor::new(&ExtractorConfig::default()).unwrap()
    }

    #[test]
    fn test_page_url_joins_path() {
        let c = constructor();
        assert_eq!(
            c.page_url("/Kendrick-lamar-humble-lyrics").unwrap().as_str(),
            "https://genius.com/Kendrick-lamar-humble-lyrics"
        );
        assert_eq!(
            c.page_url("Kendrick-lamar-humble-lyrics").unwrap().as_str(),
            "https://genius.com/Kendrick-lamar-humble-lyrics"
        );
    }

    #[test]
    fn test_page_url_keeps_escaped_identifier() {
        let c = constructor();
        assert_eq!(
            c.page_url("/Beyonc%C3%A9-halo-lyrics").unwrap().as_str(),
            "https://genius.com/Beyonc%C3%A9-halo-lyrics"
        );
        assert_eq!(
            c.page_url("/a b?c").unwrap().as_str(),
            "https://genius.com/a%20b%3Fc"
        );
    }

    #[test]
    fn test_page_url_under_base_path() {
        let config = ExtractorConfig::default().with_base_url("http://localhost:9000/mirror/");
        let c = BrowserRequestConstructor::new(&config).unwrap();
        assert_eq!(
            c.page_url("/song-lyrics").unwrap().as_str(),
            "http://localhost:9000/mirror/song-lyrics"
        );
    }

    #[test]
    fn test_page_url_rejects_malformed_identifiers() {
        let c = constructor();
        assert!(matches!(c.page_url(""), Err(FetchError::InvalidIdentifier(_))));
        assert!(matches!(c.page_url("///"), Err(FetchError::InvalidIdentifier(_))));
        assert!(matches!(
            c.page_url("/../admin"),
            Err(FetchError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            c.page_url("/%2E%2e/admin"),
            Err(FetchError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            c.page_url("/a\\..\\admin"),
            Err(FetchError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_identifier_cannot_change_host() {
        let c = constructor();
        let url = c.page_url("//evil.example/lyrics").unwrap();
        assert_eq!(url.host_str(), Some("genius.com"));
    }

    #[test]
    fn test_construct_sets_browser_headers() {
        let request = constructor().construct("/a-b-lyrics").unwrap();
        assert_eq!(request.method(), Method::GET);
        assert!(request.headers()[USER_AGENT]
            .to_str()
            .unwrap()
            .starts_with("Mozilla/5.0"));
        assert_eq!(request.headers()[REFERER], "https://genius.com");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ExtractorConfig::default().with_base_url("not a url");
        assert!(matches!(
            BrowserRequestConstructor::new(&config),
            Err(FetchError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_closure_constructor() {
        let constructor = |path: &str| -> Result<Request, FetchError> {
            let url = Url::parse("http://localhost/")
                .unwrap()
                .join(path.trim_start_matches('/'))
                .unwrap();
            Ok(Request::new(Method::GET, url))
        };
        let request = constructor.construct("/x").unwrap();
        assert_eq!(request.url().as_str(), "http://localhost/x");
    }
}
