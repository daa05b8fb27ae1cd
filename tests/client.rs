use async_trait::async_trait;
use camunda_api_client::{Client, ClientConfig, Error, OAuthConfig, ResponseHandler};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{basic_auth, bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(format!("{}/engine-rest", server.uri())).unwrap()
}

#[tokio::test]
async fn version_is_read_from_base_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "7.9.0" })))
        .expect(1)
        .mount(&server)
        .await;

    let version = client(&server).engine().version().await.unwrap();

    assert_eq!(version.version, "7.9.0");
}

#[tokio::test]
async fn engine_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/process-definition/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "type": "RestException",
            "message": "No matching definition with id missing"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .process_definitions()
        .by_id("missing")
        .get()
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|status| status.as_u16()), Some(404));
    match err {
        Error::Api(err) => {
            assert_eq!(err.error_type.as_deref(), Some("RestException"));
            assert_eq!(
                err.message.as_deref(),
                Some("No matching definition with id missing")
            );
            assert_eq!(err.reason.as_deref(), Some("Not Found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn non_json_error_bodies_are_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/engine"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client(&server).engine().list().await.unwrap_err();

    match err {
        Error::Api(err) => {
            assert_eq!(err.status.as_u16(), 503);
            assert_eq!(err.body, "maintenance");
            assert!(err.message.is_none());
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unexpected_bodies_are_json_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html/>"))
        .mount(&server)
        .await;

    let err = client(&server).engine().version().await.unwrap_err();

    assert!(matches!(err, Error::Json(_)));
}

#[derive(Clone, Debug, Default)]
struct CountingHandler {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ResponseHandler for CountingHandler {
    async fn handle(
        &self,
        response: reqwest::Response,
    ) -> camunda_api_client::Result<reqwest::Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if response.status().as_u16() == 401 {
            return Err(Error::Auth("rejected by engine".to_owned()));
        }
        Ok(response)
    }
}

#[tokio::test]
async fn custom_handler_sees_every_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "7.9.0" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/engine"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let handler = CountingHandler::default();
    let client =
        Client::with_handler(format!("{}/engine-rest", server.uri()), handler.clone()).unwrap();

    client.engine().version().await.unwrap();
    let err = client.engine().list().await.unwrap_err();

    assert!(matches!(err, Error::Auth(_)));
    assert_eq!(handler.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failures_surface_even_when_handler_passes_them_on() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/engine"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let handler = CountingHandler::default();
    let client =
        Client::with_handler(format!("{}/engine-rest", server.uri()), handler.clone()).unwrap();

    let err = client.engine().list().await.unwrap_err();

    assert_eq!(err.status().map(|status| status.as_u16()), Some(500));
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn basic_auth_is_sent_with_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/version"))
        .and(basic_auth("demo", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "7.9.0" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::with_host_url(format!("{}/engine-rest", server.uri()))
        .with_basic_auth("demo", Some("demo".to_owned()));
    let client = Client::from_config(config).unwrap();

    client.engine().version().await.unwrap();
}

#[tokio::test]
async fn oauth_token_is_requested_once_and_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-1",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/version"))
        .and(bearer_token("token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "7.9.0" })))
        .expect(2)
        .mount(&server)
        .await;

    let oauth = OAuthConfig::new("worker", "secret", format!("{}/oauth/token", server.uri()));
    let config =
        ClientConfig::with_host_url(format!("{}/engine-rest", server.uri())).with_oauth(oauth);
    let client = Client::from_config(config).unwrap();

    client.engine().version().await.unwrap();
    client.engine().version().await.unwrap();
}

#[tokio::test]
async fn http_client_can_be_supplied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/engine-rest/engine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "default" }])))
        .mount(&server)
        .await;

    let client = Client::from_http_client(
        reqwest::Client::new(),
        format!("{}/engine-rest", server.uri()),
    )
    .unwrap();

    let engines = client.engine().list().await.unwrap();

    assert_eq!(engines.len(), 1);
    assert_eq!(engines[0].name, "default");
}
