use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tool_library_push_core::config::PublisherConfig;
use tool_library_push_core::contract::{
    MockContentStore, MockCredentialSource, PublishRequest, ResourceName, StoreResponse,
};
use tool_library_push_core::publisher::RemoteJsonPublisher;
use tool_library_push_core::PublishError;

fn request(name: &str, content: &str) -> PublishRequest {
    PublishRequest {
        name: ResourceName::new(name).expect("valid name"),
        content: content.to_string(),
    }
}

fn credentials_with(token: Option<&'static str>) -> MockCredentialSource {
    let mut creds = MockCredentialSource::new();
    creds
        .expect_token()
        .returning(move || token.map(str::to_string));
    creds
        .expect_describe()
        .returning(|| "environment variable GITHUB_TOKEN".to_string());
    creds
}

fn ok(status: u16, body: &str) -> Result<StoreResponse, PublishError> {
    Ok(StoreResponse {
        status,
        body: body.to_string(),
    })
}

/// Store mock whose lookup answers `lookup` and whose write answers `write`,
/// recording every write payload it receives.
fn scripted_store(
    lookup: (u16, &'static str),
    write: (u16, &'static str),
    payloads: Arc<Mutex<Vec<String>>>,
) -> MockContentStore {
    let mut store = MockContentStore::new();
    store
        .expect_get_document()
        .times(1)
        .returning(move |_| ok(lookup.0, lookup.1));
    store
        .expect_put_document()
        .times(1)
        .returning(move |_, payload, _| {
            payloads.lock().unwrap().push(payload);
            ok(write.0, write.1)
        });
    store
}

#[tokio::test]
async fn publishes_with_the_observed_sha_and_exact_body() {
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let store = scripted_store(
        (200, r#"{"name":"MyLibrary.json","sha":"abc123"}"#),
        (200, r#"{"content":{"name":"MyLibrary.json","sha":"def456"}}"#),
        payloads.clone(),
    );
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("ghp_test")), PublisherConfig::default());

    let outcome = publisher
        .publish(request("MyLibrary", "{\"tools\":[]}"))
        .await
        .expect("publish should succeed");

    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.name, "MyLibrary");
    assert_eq!(outcome.sha.as_deref(), Some("def456"));
    assert_eq!(
        payloads.lock().unwrap().as_slice(),
        [r#"{"message":"tool library push","content":"eyJ0b29scyI6W119","sha":"abc123"}"#]
    );
}

#[tokio::test]
async fn write_content_decodes_to_the_original_bytes() {
    let content = "{\"tools\":[{\"description\":\"6mm flat end mill – Ø6\",\"flutes\":3}]}\n";
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let store = scripted_store((200, r#"{"sha":"s1"}"#), (201, "{}"), payloads.clone());
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("t")), PublisherConfig::default());

    publisher
        .publish(request("Mills", content))
        .await
        .expect("publish should succeed");

    let sent: serde_json::Value =
        serde_json::from_str(&payloads.lock().unwrap()[0]).expect("payload is JSON");
    let decoded = STANDARD
        .decode(sent["content"].as_str().expect("content is a string"))
        .expect("content is base64");
    assert_eq!(decoded, content.as_bytes());
    assert_eq!(sent["sha"], "s1");
}

#[tokio::test]
async fn uses_the_same_name_and_token_for_both_calls() {
    let mut store = MockContentStore::new();
    store
        .expect_get_document()
        .withf(|name| name.as_str() == "Walter Mills")
        .times(1)
        .returning(|_| ok(200, r#"{"sha":"abc"}"#));
    store
        .expect_put_document()
        .withf(|name, _, token| name.as_str() == "Walter Mills" && token.to_string() == "ghp_secret")
        .times(1)
        .returning(|_, _, _| ok(200, "{}"));
    let publisher = RemoteJsonPublisher::new(
        store,
        credentials_with(Some("ghp_secret")),
        PublisherConfig::default(),
    );

    publisher
        .publish(request("Walter Mills", "{}"))
        .await
        .expect("publish should succeed");
}

#[tokio::test]
async fn missing_document_is_created_without_sha_by_default() {
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let store = scripted_store(
        (404, r#"{"message":"Not Found"}"#),
        (201, r#"{"content":{"sha":"new1"}}"#),
        payloads.clone(),
    );
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("t")), PublisherConfig::default());

    let outcome = publisher
        .publish(request("Fresh", "{\"tools\":[]}"))
        .await
        .expect("creating a new document should succeed");

    assert_eq!(outcome.status, 201);
    assert_eq!(outcome.sha.as_deref(), Some("new1"));
    let sent: serde_json::Value = serde_json::from_str(&payloads.lock().unwrap()[0]).unwrap();
    assert!(sent.get("sha").is_none(), "create must omit sha, got {sent}");
}

#[tokio::test]
async fn missing_document_fails_when_creation_is_disabled() {
    let mut store = MockContentStore::new();
    store
        .expect_get_document()
        .times(1)
        .returning(|_| ok(404, r#"{"message":"Not Found"}"#));
    store.expect_put_document().never();
    let config = PublisherConfig {
        create_missing: false,
        ..PublisherConfig::default()
    };
    let publisher = RemoteJsonPublisher::new(store, credentials_with(Some("t")), config);

    let err = publisher.publish(request("Fresh", "{}")).await.unwrap_err();

    assert!(
        matches!(err, PublishError::LookupFailure { status: 404, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn other_lookup_statuses_abort_before_writing() {
    let mut store = MockContentStore::new();
    store
        .expect_get_document()
        .times(1)
        .returning(|_| ok(500, "upstream exploded"));
    store.expect_put_document().never();
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("t")), PublisherConfig::default());

    let err = publisher.publish(request("MyLibrary", "{}")).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.body(), Some("upstream exploded"));
    assert!(matches!(err, PublishError::LookupFailure { .. }));
}

#[tokio::test]
async fn lookup_without_sha_is_a_lookup_failure() {
    let mut store = MockContentStore::new();
    store
        .expect_get_document()
        .returning(|_| ok(200, r#"{"name":"MyLibrary.json"}"#));
    store.expect_put_document().never();
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("t")), PublisherConfig::default());

    let err = publisher.publish(request("MyLibrary", "{}")).await.unwrap_err();

    assert!(matches!(err, PublishError::LookupFailure { status: 200, .. }));
}

#[tokio::test]
async fn malformed_lookup_body_is_a_serialization_error() {
    let mut store = MockContentStore::new();
    store
        .expect_get_document()
        .returning(|_| ok(200, "<html>not json</html>"));
    store.expect_put_document().never();
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("t")), PublisherConfig::default());

    let err = publisher.publish(request("MyLibrary", "{}")).await.unwrap_err();

    assert!(matches!(
        err,
        PublishError::SerializationError {
            what: "lookup response",
            ..
        }
    ));
}

#[tokio::test]
async fn conflict_on_write_preserves_status_and_body() {
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let body = r#"{"message":"is at 111 but expected abc123"}"#;
    let store = scripted_store((200, r#"{"sha":"abc123"}"#), (409, body), payloads);
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("t")), PublisherConfig::default());

    let err = publisher
        .publish(request("MyLibrary", "{\"tools\":[]}"))
        .await
        .unwrap_err();

    match err {
        PublishError::WriteConflict { name, status, body: got } => {
            assert_eq!(name, "MyLibrary");
            assert_eq!(status, 409);
            assert_eq!(got, body);
        }
        other => panic!("expected WriteConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn unprocessable_write_is_a_conflict() {
    let store = scripted_store(
        (200, r#"{"sha":"abc"}"#),
        (422, r#"{"message":"\"sha\" wasn't supplied."}"#),
        Arc::new(Mutex::new(Vec::new())),
    );
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("t")), PublisherConfig::default());

    let err = publisher.publish(request("MyLibrary", "{}")).await.unwrap_err();

    assert!(matches!(err, PublishError::WriteConflict { status: 422, .. }));
}

#[tokio::test]
async fn rejected_credentials_are_an_auth_error() {
    let store = scripted_store(
        (200, r#"{"sha":"abc"}"#),
        (401, r#"{"message":"Bad credentials"}"#),
        Arc::new(Mutex::new(Vec::new())),
    );
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("expired")), PublisherConfig::default());

    let err = publisher.publish(request("MyLibrary", "{}")).await.unwrap_err();

    assert!(matches!(err, PublishError::AuthError { status: 401, .. }));
    assert_eq!(err.body(), Some(r#"{"message":"Bad credentials"}"#));
}

#[tokio::test]
async fn other_write_statuses_are_write_failures() {
    let store = scripted_store(
        (200, r#"{"sha":"abc"}"#),
        (502, "bad gateway"),
        Arc::new(Mutex::new(Vec::new())),
    );
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("t")), PublisherConfig::default());

    let err = publisher.publish(request("MyLibrary", "{}")).await.unwrap_err();

    assert!(matches!(err, PublishError::WriteFailure { status: 502, .. }));
}

#[tokio::test]
async fn missing_token_fails_fast_without_network_calls() {
    let mut store = MockContentStore::new();
    store.expect_get_document().never();
    store.expect_put_document().never();
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(None), PublisherConfig::default());

    let err = publisher.publish(request("MyLibrary", "{}")).await.unwrap_err();

    match err {
        PublishError::MissingCredential { source_name } => {
            assert!(source_name.contains("GITHUB_TOKEN"), "got {source_name}")
        }
        other => panic!("expected MissingCredential, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_token_is_treated_as_missing() {
    let mut store = MockContentStore::new();
    store.expect_get_document().never();
    store.expect_put_document().never();
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("")), PublisherConfig::default());

    let err = publisher.publish(request("MyLibrary", "{}")).await.unwrap_err();

    assert!(matches!(err, PublishError::MissingCredential { .. }));
}

#[tokio::test]
async fn custom_commit_message_is_used() {
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let store = scripted_store((200, r#"{"sha":"abc"}"#), (200, "{}"), payloads.clone());
    let config = PublisherConfig {
        commit_message: "sync mills from shop PC".to_string(),
        debug: true,
        ..PublisherConfig::default()
    };
    let publisher = RemoteJsonPublisher::new(store, credentials_with(Some("t")), config);

    let outcome = publisher.publish(request("Mills", "{}")).await.unwrap();

    let sent: serde_json::Value = serde_json::from_str(&payloads.lock().unwrap()[0]).unwrap();
    assert_eq!(sent["message"], "sync mills from shop PC");
    assert_eq!(outcome.sha, None);
}

#[tokio::test]
async fn non_json_success_body_is_kept_as_text() {
    let store = scripted_store(
        (200, r#"{"sha":"abc"}"#),
        (200, "ok"),
        Arc::new(Mutex::new(Vec::new())),
    );
    let publisher =
        RemoteJsonPublisher::new(store, credentials_with(Some("t")), PublisherConfig::default());

    let outcome = publisher.publish(request("Mills", "{}")).await.unwrap();

    assert_eq!(outcome.body, serde_json::Value::String("ok".to_string()));
}

#[test]
fn empty_names_are_rejected() {
    assert!(matches!(ResourceName::new(""), Err(PublishError::InvalidName)));
    assert!(matches!(ResourceName::new("  "), Err(PublishError::InvalidName)));
}

#[test]
fn file_name_is_the_unencoded_name() {
    let name = ResourceName::new("Mill #2?v2").unwrap();
    assert_eq!(name.file_name(), "Mill #2?v2.json");
}
