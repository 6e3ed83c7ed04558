use lyrics_acquire::{ApiConfig, ApiError, GeniusApi, OAuthConfig};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> GeniusApi {
    let config = ApiConfig {
        base_url: server.uri(),
        access_token: Some("token-123".into()),
    };
    GeniusApi::new(&config, reqwest::Client::new())
}

#[tokio::test]
async fn test_search_keeps_only_songs() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "meta": { "status": 200 },
        "response": {
            "hits": [
                {
                    "index": "song",
                    "type": "song",
                    "result": {
                        "id": 3039923,
                        "path": "/Kendrick-lamar-humble-lyrics",
                        "artist_names": "Kendrick Lamar",
                        "title": "HUMBLE.",
                        "release_date_for_display": "March 30, 2017"
                    }
                },
                {
                    "index": "album",
                    "type": "album",
                    "result": { "id": 1, "name": "DAMN." }
                }
            ]
        }
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "humble"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let songs = api_for(&server).search("humble").await.unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].id, 3039923);
    assert_eq!(songs[0].path, "/Kendrick-lamar-humble-lyrics");
    assert_eq!(songs[0].title, "HUMBLE.");
    assert!(songs[0].release_date.is_some());
}

#[tokio::test]
async fn test_song_details() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "meta": { "status": 200 },
        "response": {
            "song": {
                "id": 42,
                "path": "/Artist-title-lyrics",
                "artist_names": "Artist",
                "title": "Title",
                "release_date_for_display": "October 28, 2002",
                "description": { "plain": "Written in one night." }
            }
        }
    });

    Mock::given(method("GET"))
        .and(path("/songs/42"))
        .and(query_param("text_format", "plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let song = api_for(&server).song(42).await.unwrap();
    assert_eq!(song.title, "Title");
    assert_eq!(song.description.as_deref(), Some("Written in one night."));
    assert_eq!(song.release_date.unwrap().to_string(), "2002-10-28");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_token"))
        .mount(&server)
        .await;

    let err = api_for(&server).song(1).await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "invalid_token");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exchange_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh-token",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut oauth = OAuthConfig::new("id", "secret", "http://localhost:8080/callback");
    oauth.token_url = format!("{}/oauth/token", server.uri());

    let token = oauth
        .exchange_code(&reqwest::Client::new(), "the-code")
        .await
        .unwrap();
    assert_eq!(token, "fresh-token");
}
