use muzaklink::error::ResolveError;
use muzaklink::resolver::{OdesliResolver, Resolver};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = r#"{
    "entityUniqueId": "ITUNES_SONG::1443109064",
    "entitiesByUniqueId": {
        "ITUNES_SONG::1443109064": {"title": "Kitchen", "artistName": "Kid Cudi"}
    },
    "linksByPlatform": {
        "appleMusic": {"url": "https://music.apple.com/kitchen"},
        "spotify": {"url": "https://open.spotify.com/track/0Jcij1eWd5bDMU5iPbxe2i"},
        "youtube": {"url": "https://www.youtube.com/watch?v=w3LJ2bDvDJs"}
    }
}"#;

#[tokio::test]
async fn resolves_with_expected_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/links"))
        .and(query_param("url", "https://open.spotify.com/test"))
        .and(query_param("userCountry", "RU"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXTURE, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = OdesliResolver::with_base_url(&server.uri(), None, None);
    let response = resolver
        .resolve("https://open.spotify.com/test")
        .await
        .unwrap();

    assert_eq!(
        response.entity_unique_id.as_deref(),
        Some("ITUNES_SONG::1443109064")
    );
    let keys: Vec<&str> = response
        .links_by_platform
        .as_deref()
        .unwrap()
        .iter()
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(keys, ["appleMusic", "spotify", "youtube"]);
}

#[tokio::test]
async fn api_key_and_country_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/links"))
        .and(query_param("userCountry", "US"))
        .and(query_param("key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXTURE, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = OdesliResolver::with_base_url(
        &server.uri(),
        Some("secret-key".to_string()),
        Some("US".to_string()),
    );
    resolver
        .resolve("https://open.spotify.com/test")
        .await
        .unwrap();
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/links"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let resolver = OdesliResolver::with_base_url(&server.uri(), None, None);
    let err = resolver
        .resolve("https://open.spotify.com/test")
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Status { status: 503, .. }));
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/links"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let resolver = OdesliResolver::with_base_url(&server.uri(), None, None);
    let err = resolver
        .resolve("https://open.spotify.com/test")
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::MalformedResponse(_)));
}

#[tokio::test]
async fn unreachable_api_is_a_request_error() {
    // Nothing listens on this port.
    let resolver = OdesliResolver::with_base_url("http://127.0.0.1:9", None, None);
    let err = resolver
        .resolve("https://open.spotify.com/test")
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Request { .. }));
}
