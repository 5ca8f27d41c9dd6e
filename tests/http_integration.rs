//! Integration tests for the HTTP service.
//!
//! These drive the full router against an in-memory SQLite database and a
//! recording mailer.

mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use support::{TestApp, admin_request, basic_auth, json_request};

const FEED_URL: &str = "https://www.linkedin.com/feed/update/urn:li:activity:7051234567890123456/";

fn request_body(url: &str) -> serde_json::Value {
    json!({
        "linkedin_post_url": url,
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "position": "Analyst",
        "company_college": "Analytical Engines Ltd"
    })
}

// ==================== Public request endpoint ====================

#[tokio::test]
async fn test_request_resource_end_to_end_success() {
    let app = TestApp::new().await;
    app.register(FEED_URL, "Rust Guide", "https://example.com/rust.pdf")
        .await;

    let (status, body) = app
        .call(json_request("POST", "/api/request-resource", &request_body(FEED_URL)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Success! The resource has been sent.");

    let submissions = app
        .store
        .list_submissions(&leadgate_core::SubmissionQuery::default())
        .await
        .unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].name, "Ada Lovelace");
    assert_eq!(
        submissions[0].requested_resource_name.as_deref(),
        Some("Rust Guide")
    );
    assert_eq!(
        submissions[0].company_college.as_deref(),
        Some("Analytical Engines Ltd")
    );

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_address, "ada@example.com");
    assert!(sent[0].body.contains("https://example.com/rust.pdf"));
    assert!(sent[0].body.ends_with("Jane Doe"));
}

#[tokio::test]
async fn test_request_resource_matches_other_url_shapes() {
    let app = TestApp::new().await;
    app.register(FEED_URL, "Rust Guide", "https://example.com/rust.pdf")
        .await;

    let slug = "https://www.linkedin.com/posts/jane-doe_rust-activity-7051234567890123456-AbCd?utm_source=share";
    let (status, _) = app
        .call(json_request("POST", "/api/request-resource", &request_body(slug)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_request_resource_unresolvable_url_is_client_error() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(json_request(
            "POST",
            "/api/request-resource",
            &request_body("https://www.linkedin.com/in/someone/"),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(app.submission_count().await, 0);
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_request_resource_missing_url_is_client_error() {
    let app = TestApp::new().await;

    let (status, _) = app
        .call(json_request(
            "POST",
            "/api/request-resource",
            &json!({ "name": "Ada", "email": "ada@example.com" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.submission_count().await, 0);
}

#[tokio::test]
async fn test_request_resource_non_string_url_is_invalid_url() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(json_request(
            "POST",
            "/api/request-resource",
            &json!({ "linkedin_post_url": 123, "name": "Ada", "email": "ada@example.com" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or unrecognized LinkedIn post URL.");
    assert_eq!(app.submission_count().await, 0);
}

#[tokio::test]
async fn test_request_resource_unregistered_post_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(json_request("POST", "/api/request-resource", &request_body(FEED_URL)))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Sorry, this LinkedIn post is not associated with a resource."
    );
    assert_eq!(app.submission_count().await, 0);
}

#[tokio::test]
async fn test_request_resource_requires_contact_details() {
    let app = TestApp::new().await;
    app.register(FEED_URL, "Rust Guide", "https://example.com/rust.pdf")
        .await;

    let (status, _) = app
        .call(json_request(
            "POST",
            "/api/request-resource",
            &json!({ "linkedin_post_url": FEED_URL, "name": "  ", "email": "ada@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(json_request(
            "POST",
            "/api/request-resource",
            &json!({ "linkedin_post_url": FEED_URL, "name": "Ada", "email": "not-an-email" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.submission_count().await, 0);
}

#[tokio::test]
async fn test_request_resource_rejects_non_json_body() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/request-resource")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.call(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_request_resource_mail_failure_keeps_submission() {
    let app = TestApp::new().await;
    app.register(FEED_URL, "Rust Guide", "https://example.com/rust.pdf")
        .await;
    app.mailer.fail_sends();

    let (status, body) = app
        .call(json_request("POST", "/api/request-resource", &request_body(FEED_URL)))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An error occurred while sending the email.");
    assert_eq!(app.submission_count().await, 1);
}

#[tokio::test]
async fn test_healthz() {
    let app = TestApp::new().await;
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let (status, bytes) = app.call_raw(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"ok");
}

// ==================== Admin authentication ====================

#[tokio::test]
async fn test_admin_requires_credentials() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/admin/resources")
        .body(Body::empty())
        .unwrap();
    let response_status = app.call_raw(request).await.0;
    assert_eq!(response_status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/admin/resources")
        .header(header::AUTHORIZATION, basic_auth("admin", "wrong"))
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = app.call_raw(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(bytes, b"Authentication Required");
}

#[tokio::test]
async fn test_admin_locked_without_configured_credentials() {
    use std::sync::Arc;

    use leadgate_core::{AppState, Database, Store, router};
    use tower::ServiceExt;

    let store = Store::new(Database::new_in_memory().await.unwrap());
    let state = AppState::new(Arc::new(store), Arc::new(support::RecordingMailer::default()));
    let response = router(state)
        .oneshot(support::admin_request("GET", "/admin/resources", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ==================== Admin CRUD ====================

#[tokio::test]
async fn test_admin_resource_lifecycle() {
    let app = TestApp::new().await;

    let (status, created) = app
        .call(admin_request(
            "POST",
            "/admin/resources",
            Some(&json!({
                "post_url": "https://www.linkedin.com/posts/me_deck-activity-99-x",
                "resource_name": "Deck",
                "resource_link": "https://example.com/deck.pdf"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["post_key"], "99");
    let id = created["id"].as_i64().unwrap();

    let (status, listed) = app.call(admin_request("GET", "/admin/resources", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, updated) = app
        .call(admin_request(
            "PUT",
            &format!("/admin/resources/{id}"),
            Some(&json!({
                "post_url": "urn:li:activity:99",
                "resource_name": "Deck v2",
                "resource_link": "https://example.com/deck-v2.pdf"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["resource_name"], "Deck v2");

    let (status, fetched) = app
        .call(admin_request("GET", &format!("/admin/resources/{id}"), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["resource_link"], "https://example.com/deck-v2.pdf");

    let (status, _) = app
        .call(admin_request("DELETE", &format!("/admin/resources/{id}"), None))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .call(admin_request("GET", &format!("/admin/resources/{id}"), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_create_rejects_invalid_and_duplicate() {
    let app = TestApp::new().await;
    app.register("urn:li:activity:5", "Existing", "https://example.com/e.pdf")
        .await;

    let (status, body) = app
        .call(admin_request(
            "POST",
            "/admin/resources",
            Some(&json!({
                "post_url": "https://www.linkedin.com/in/someone/",
                "resource_name": "Bad",
                "resource_link": "https://example.com/b.pdf"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("post_url"));

    let (status, _) = app
        .call(admin_request(
            "POST",
            "/admin/resources",
            Some(&json!({
                "post_url": "https://www.linkedin.com/posts/x-activity-5-y",
                "resource_name": "Dup",
                "resource_link": "https://example.com/d.pdf"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_lists_and_deletes_submissions() {
    let app = TestApp::new().await;
    app.register(FEED_URL, "Rust Guide", "https://example.com/rust.pdf")
        .await;
    for _ in 0..3 {
        let (status, _) = app
            .call(json_request("POST", "/api/request-resource", &request_body(FEED_URL)))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, page) = app
        .call(admin_request("GET", "/admin/submissions?limit=2", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    let page = page.as_array().cloned().unwrap();
    assert_eq!(page.len(), 2);
    let newest = page[0]["id"].as_i64().unwrap();

    let (status, _) = app
        .call(admin_request(
            "DELETE",
            &format!("/admin/submissions/{newest}"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.submission_count().await, 2);

    let (status, _) = app
        .call(admin_request(
            "DELETE",
            &format!("/admin/submissions/{newest}"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_malformed_input_gets_json_error_body() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(admin_request(
            "POST",
            "/admin/resources",
            Some(&json!({ "post_url": "urn:li:activity:1" })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    assert!(body["message"].is_string());

    let (status, body) = app
        .call(admin_request("GET", "/admin/resources/not-a-number", None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, body) = app
        .call(admin_request("GET", "/admin/submissions?limit=lots", None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_admin_rejects_unicode_digit_post_key() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(admin_request(
            "POST",
            "/admin/resources",
            Some(&json!({
                "post_url": "https://www.linkedin.com/feed/update/urn:li:activity:\u{661}\u{662}/",
                "resource_name": "Deck",
                "resource_link": "https://example.com/deck.pdf"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("post_url"));
}
