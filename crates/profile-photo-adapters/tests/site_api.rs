//! HTTP protocol tests for the live adapters against a mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use httpmock::prelude::*;
use profile_photo_adapters::{SiteClient, SiteProfileWriter, StorageEntityStore, VisionClient};
use profile_photo_core::domain::ENDPOINT_ENTITY;
use profile_photo_core::{
    AnalysisProvider, ConfigProvider, Credentials, Policy, ProfileWriter, PropertyUpdate,
    SessionContext, SubmissionOrchestrator,
};
use profile_photo_test_support::{
    MockConfigProvider, RecordingProfileWriter, SyntheticImageBuilder,
};
use secrecy::SecretString;
use serde_json::json;

fn site(server: &MockServer) -> SiteClient {
    SiteClient::new(
        &server.base_url(),
        Some(SecretString::from("site-token".to_string())),
    )
    .unwrap()
}

// === Storage entities ===

#[tokio::test]
async fn test_storage_entity_value() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path_contains("GetStorageEntity")
            .path_contains("azurekey")
            .header("authorization", "Bearer site-token");
        then.status(200).json_body(json!({ "Value": "secret-key" }));
    });

    let store = StorageEntityStore::new(site(&server));
    let value = store.resolve("azurekey").await.unwrap();

    assert_eq!(value.as_deref(), Some("secret-key"));
    mock.assert();
}

#[tokio::test]
async fn test_storage_entity_absent_forms() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path_contains("nullkey");
        then.status(200).json_body(json!({ "Value": null }));
    });
    server.mock(|when, then| {
        when.method(GET).path_contains("emptykey");
        then.status(200).json_body(json!({ "Value": "" }));
    });
    server.mock(|when, then| {
        when.method(GET).path_contains("novalue");
        then.status(200).json_body(json!({}));
    });
    server.mock(|when, then| {
        when.method(GET).path_contains("gone");
        then.status(404);
    });

    let store = StorageEntityStore::new(site(&server));
    for key in ["nullkey", "emptykey", "novalue", "gone"] {
        assert!(
            store.resolve(key).await.unwrap().is_none(),
            "{key} should be absent"
        );
    }
}

#[tokio::test]
async fn test_storage_entity_server_error() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path_contains("GetStorageEntity");
        then.status(500);
    });

    let store = StorageEntityStore::new(site(&server));
    assert!(store.resolve("azurekey").await.is_err());
}

// === Vision ===

#[tokio::test]
async fn test_vision_request_shape() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/vision/v3.2/analyze")
            .query_param(
                "visualFeatures",
                "Categories,Adult,Tags,Description,Faces,Color,ImageType,Objects",
            )
            .header("Ocp-Apim-Subscription-Key", "vision-key")
            .header("content-type", "application/octet-stream")
            .body("IMG");
        then.status(200).json_body(json!({
            "categories": [{ "name": "people_portrait", "score": 0.9 }],
            "faces": [{ "age": 41, "gender": "Male",
                        "faceRectangle": { "left": 1, "top": 2, "width": 3, "height": 4 } }],
            "imageType": { "clipArtType": 0, "lineDrawingType": 0 },
            "adult": { "isAdultContent": false, "isRacyContent": false,
                       "isGoryContent": false, "adultScore": 0.01 },
            "tags": [{ "name": "person", "confidence": 0.99 }],
            "description": { "tags": ["man"],
                             "captions": [{ "text": "a man", "confidence": 0.7 }] },
            "color": { "dominantColorForeground": "Black", "isBWImg": false },
            "requestId": "abc"
        }));
    });

    let client = VisionClient::new("v3.2").unwrap();
    let credentials = Credentials::new("vision-key", format!("{}/", server.base_url()));
    let analysis = client.analyze(b"IMG", &credentials).await.unwrap();

    mock.assert();
    assert!(analysis.is_portrait());
    assert_eq!(analysis.faces[0].age, 41);
    assert_eq!(analysis.caption(), Some("a man"));
    assert_eq!(analysis.request_id.as_deref(), Some("abc"));
    assert!(analysis.objects.is_empty());
}

#[tokio::test]
async fn test_vision_missing_sections_default() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/vision/v3.2/analyze");
        then.status(200).json_body(json!({ "tags": [] }));
    });

    let client = VisionClient::new("v3.2").unwrap();
    let credentials = Credentials::new("k", server.base_url());
    let analysis = client.analyze(b"IMG", &credentials).await.unwrap();

    assert!(analysis.faces.is_empty());
    assert!(!analysis.is_portrait());
}

#[tokio::test]
async fn test_vision_error_status() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/vision/v3.2/analyze");
        then.status(401).body("Access denied due to invalid subscription key");
    });

    let client = VisionClient::new("v3.2").unwrap();
    let credentials = Credentials::new("bad", server.base_url());
    let err = client.analyze(b"IMG", &credentials).await.unwrap_err();

    assert!(err.to_string().contains("401"), "unexpected error: {err:#}");
}

// === Profile ===

#[tokio::test]
async fn test_property_update_request() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/_api/SP.UserProfiles.PeopleManager/SetSingleValueProfileProperty")
            .header("content-type", "application/json;odata=verbose")
            .header("accept", "application/json;odata=nometadata")
            .header("authorization", "Bearer site-token")
            .body_contains(r#""accountName":"i:0#.f|membership|ada@contoso.example""#)
            .body_contains(r#""propertyName":"AboutMe""#)
            .body_contains(r#""propertyValue":"About Me "#);
        then.status(200);
    });

    let writer = SiteProfileWriter::new(site(&server), "ada@contoso.example");
    writer
        .update_property(&PropertyUpdate::default())
        .await
        .unwrap();

    mock.assert();
}

#[tokio::test]
async fn test_picture_upload_request() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/_api/SP.UserProfiles.PeopleManager/SetMyProfilePicture")
            .header("content-length", "5")
            .body("PNG!!");
        then.status(200);
    });

    let writer = SiteProfileWriter::new(site(&server), "ada@contoso.example");
    writer.upload_picture(b"PNG!!").await.unwrap();

    mock.assert();
}

#[tokio::test]
async fn test_profile_failure_is_error() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path_contains("PeopleManager");
        then.status(403);
    });

    let writer = SiteProfileWriter::new(site(&server), "ada@contoso.example");
    assert!(writer.update_property(&PropertyUpdate::default()).await.is_err());
    assert!(writer.upload_picture(b"x").await.is_err());
}

// === Secrets and timeouts ===

/// Submits through a live vision client whose endpoint is `endpoint` and
/// returns the failure text.
async fn vision_failure(endpoint: &str) -> String {
    let session = SessionContext::new(
        Arc::new(MockConfigProvider::complete().with(ENDPOINT_ENTITY, endpoint)),
        Arc::new(VisionClient::new("v3.2").unwrap()),
        Arc::new(RecordingProfileWriter::new()),
    );
    let mut orchestrator = SubmissionOrchestrator::new(session);
    let state = orchestrator
        .submit(SyntheticImageBuilder::submitted(32, 32), &Policy::strict())
        .await;
    assert_eq!(state.name(), "analysis_failed");
    state.failure().unwrap().to_string()
}

#[tokio::test]
async fn test_unreachable_vision_endpoint_not_in_failure() {
    let text = vision_failure("http://127.0.0.1:9/tenant-secret-endpoint/").await;

    assert!(text.contains("Vision request failed"), "{text}");
    assert!(!text.contains("tenant-secret-endpoint"), "{text}");
}

#[tokio::test]
async fn test_unreadable_analysis_hides_endpoint() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path_contains("/analyze");
        then.status(200).body("not json");
    });

    let endpoint = server.url("/tenant-secret-endpoint/");
    let text = vision_failure(&endpoint).await;

    assert!(text.contains("unreadable analysis"), "{text}");
    assert!(!text.contains("tenant-secret-endpoint"), "{text}");
}

#[tokio::test]
async fn test_slow_storage_entity_times_out() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path_contains("GetStorageEntity");
        then.status(200)
            .delay(Duration::from_secs(5))
            .json_body(json!({ "Value": "late" }));
    });

    let client =
        SiteClient::with_timeout(&server.base_url(), None, Duration::from_millis(100)).unwrap();
    let started = Instant::now();
    let result = StorageEntityStore::new(client).resolve("azurekey").await;

    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_slow_config_store_blocks_submission() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path_contains("GetStorageEntity");
        then.status(200)
            .delay(Duration::from_secs(5))
            .json_body(json!({ "Value": "late" }));
    });

    let session = SessionContext::new(
        Arc::new(StorageEntityStore::new(site(&server))),
        Arc::new(VisionClient::new("v3.2").unwrap()),
        Arc::new(RecordingProfileWriter::new()),
    );
    let mut orchestrator = SubmissionOrchestrator::new(session)
        .with_config_timeout(Duration::from_millis(50))
        .with_analysis_timeout(Duration::from_millis(50));

    let started = Instant::now();
    let state = orchestrator
        .submit(SyntheticImageBuilder::submitted(32, 32), &Policy::strict())
        .await;

    assert_eq!(state.name(), "blocked");
    assert!(started.elapsed() < Duration::from_secs(3));
}
