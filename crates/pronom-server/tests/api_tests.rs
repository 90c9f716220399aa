//! Integration tests for the stats API
//!
//! Each test builds the full router over an in-memory SQLite database and
//! drives it with `oneshot` requests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use pronom_common::auth::{digest_secret, AUTH_HEADER};
use pronom_common::{AggregateSummary, DescriptionStatus, RecordSummary, ReleaseSummary};
use pronom_server::{app, config::Config, store::SummaryStore};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

const SECRET: &str = "correct horse";
const CDN: &str = "https://cdn.nationalarchives.gov.uk/documents/";

async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SummaryStore::new(pool);
    store.migrate().await.unwrap();

    let config = Config {
        server_auth: SECRET.to_string(),
        ..Config::default()
    };
    app(store, &config)
}

fn record(
    name: &str,
    identifier: &str,
    description: DescriptionStatus,
    signature: bool,
    container: bool,
) -> RecordSummary {
    RecordSummary {
        name: name.to_string(),
        description,
        signature,
        identifier: identifier.to_string(),
        container_signature: container.then_some(true),
    }
}

fn summary(version: &str) -> AggregateSummary {
    let mut release = ReleaseSummary::new(
        NaiveDate::from_ymd_opt(2023, 11, 23).unwrap(),
        "fmt/1924",
        version,
        "https://www.nationalarchives.gov.uk/aboutapps/pronom/release-notes.xml",
    );
    release.derive_signature_file_url(CDN);
    release.derive_container_signature_url(CDN, NaiveDate::from_ymd_opt(2023, 11, 27).unwrap());

    let records = vec![
        record("Broadcast WAVE 0 Generic", "fmt/1", DescriptionStatus::Complete, true, false),
        record("Microsoft Word Document 97-2003", "fmt/40", DescriptionStatus::Complete, false, true),
        record("Outline Format", "fmt/1900", DescriptionStatus::Outline, false, false),
        record("Signed Outline", "fmt/1901", DescriptionStatus::Outline, true, false),
        record("Withdrawn Format", "x-fmt/9", DescriptionStatus::Deprecated, false, false),
    ];

    AggregateSummary::new(release, records)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn put_summary(app: &Router, auth: Option<&str>, body: impl Into<Body>) -> Response {
    let mut request = Request::builder()
        .method(Method::PUT)
        .uri("/pronom_summary")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        request = request.header(AUTH_HEADER, auth);
    }
    send(app, request.body(body.into()).unwrap()).await
}

async fn store(app: &Router, summary: &AggregateSummary) {
    let body = serde_json::to_vec(summary).unwrap();
    let response = put_summary(app, Some(&digest_secret(SECRET)), body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "status": "healthy", "database": "connected" })
    );
}

#[tokio::test]
async fn test_empty_store_returns_not_found() {
    let app = test_app().await;

    for uri in ["/pronom_summary", "/pronom_version", "/records_count", "/get_deprecated_hx"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_upload_requires_matching_digest() {
    let app = test_app().await;
    let body = serde_json::to_vec(&summary("V116")).unwrap();

    let response = put_summary(&app, None, body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = put_summary(&app, Some(&digest_secret("wrong")), body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The plain secret is not accepted either
    let response = put_summary(&app, Some(SECRET), body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(get(&app, "/pronom_summary").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejects_bad_bodies() {
    let app = test_app().await;
    let auth = digest_secret(SECRET);

    let response = put_summary(&app, Some(&auth), "not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_summary(&app, Some(&auth), r#"{"records": []}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_upload_and_read_back() {
    let app = test_app().await;
    let uploaded = summary("V116");

    let response =
        put_summary(&app, Some(&digest_secret(SECRET)), serde_json::to_vec(&uploaded).unwrap())
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "success" }));

    let body = body_json(get(&app, "/pronom_summary").await).await;
    assert_eq!(body["version"], "V116");
    let stored: AggregateSummary = serde_json::from_value(body["summary"].clone()).unwrap();
    assert_eq!(stored, uploaded);
}

#[tokio::test]
async fn test_latest_upload_wins() {
    let app = test_app().await;
    store(&app, &summary("V115")).await;
    store(&app, &summary("V116")).await;

    let response = get(&app, "/pronom_version").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));
    assert_eq!(body_text(response).await, "V116");
}

#[tokio::test]
async fn test_version_is_escaped() {
    let app = test_app().await;
    store(&app, &summary("V116<script>&")).await;

    let response = get(&app, "/pronom_version").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "V116&lt;script&gt;&amp;");
}

#[tokio::test]
async fn test_counts() {
    let app = test_app().await;
    store(&app, &summary("V116")).await;

    let expected = [
        ("/records_count", 5),
        ("/complete_description_count", 2),
        ("/incomplete_description_count", 2),
        ("/signature_count", 3),
        ("/requires_signature_count", 1),
        ("/get_deprecated_count", 1),
    ];

    for (uri, count) in expected {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert_eq!(body_json(response).await, json!(count), "{}", uri);
    }
}

#[tokio::test]
async fn test_reports() {
    let app = test_app().await;
    store(&app, &summary("V116")).await;

    let identifiers = |body: Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|r| r["identifier"].as_str().unwrap().to_string())
            .collect()
    };

    let body = body_json(get(&app, "/incomplete_descriptions").await).await;
    assert_eq!(identifiers(body), vec!["fmt/1900", "fmt/1901"]);

    let body = body_json(get(&app, "/requires_signatures").await).await;
    assert_eq!(identifiers(body), vec!["fmt/1900"]);

    let body = body_json(get(&app, "/get_deprecated").await).await;
    assert_eq!(identifiers(body.clone()), vec!["x-fmt/9"]);
    assert_eq!(body[0]["description"], "deprecated");
    assert!(body[0].get("container_signature").is_none());
}

#[tokio::test]
async fn test_htmx_fragments() {
    let app = test_app().await;
    store(&app, &summary("V116")).await;

    let response = get(&app, "/get_deprecated_hx").await;
    assert!(content_type(&response).starts_with("text/html"));
    assert_eq!(
        body_text(response).await,
        "Withdrawn Format (<a href='https://www.nationalarchives.gov.uk/PRONOM/x-fmt/9'>x-fmt/9</a>)<br>"
    );

    let body = body_text(get(&app, "/requires_signatures_hx").await).await;
    assert_eq!(body.matches("<br>").count(), 1);

    let body = body_text(get(&app, "/signature_files_hx").await).await;
    assert!(body.contains(
        "<a href='https://cdn.nationalarchives.gov.uk/documents/DROID_SignatureFile_V116.xml'>"
    ));
    assert!(body.contains("container-signature-20231127.xml"));
}

#[tokio::test]
async fn test_signature_files() {
    let app = test_app().await;
    store(&app, &summary("V116")).await;

    let body = body_json(get(&app, "/signature_files").await).await;
    assert_eq!(
        body,
        json!({
            "standard signature": "https://cdn.nationalarchives.gov.uk/documents/DROID_SignatureFile_V116.xml",
            "container signature": "https://cdn.nationalarchives.gov.uk/documents/container-signature-20231127.xml",
        })
    );
}

#[tokio::test]
async fn test_summary_csv() {
    let app = test_app().await;
    store(&app, &summary("V116")).await;

    let response = get(&app, "/pronom_summary_csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/csv"));

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "name,description,signature,identifier,container_signature");
    assert_eq!(lines[1], "Broadcast WAVE 0 Generic,complete,true,fmt/1,");
    assert_eq!(lines[2], "Microsoft Word Document 97-2003,complete,false,fmt/40,true");
    assert_eq!(lines.len(), 6);
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let app = test_app().await;

    let response = send(
        &app,
        Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://127.0.0.1:26001")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
