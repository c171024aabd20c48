use std::{collections::HashMap, time::Duration};

use axum::{
    Json, Router,
    body::Body,
    extract::Query,
    http::{Request, StatusCode, header},
    routing::{get, post},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use blockverify_web::{AppConfig, AppState, build_router};

// -- Mock backend -------------------------------------------------------------

async fn mock_login(Json(body): Json<Value>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body["password"] == "correct" {
        Ok(Json(json!({
            "token": "t1",
            "role": body["role"],
            "token_type": "bearer"
        })))
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid credentials"})),
        ))
    }
}

async fn mock_register(Json(body): Json<Value>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body["email"] == "taken@example.com" {
        Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Email already registered"})),
        ))
    } else {
        Ok(Json(json!({
            "message": "User registered successfully",
            "user_id": "u-1"
        })))
    }
}

async fn mock_documents() -> Json<Value> {
    Json(json!([
        {
            "_id": "64f0",
            "document_id": "d-1",
            "filename": "deed.pdf",
            "hash": "hash-one",
            "upload_date": "2024-01-01T00:00:00",
            "verified": true,
            "qrUrl": "/qr/d-1"
        },
        {
            "_id": "64f1",
            "document_id": "d-2",
            "filename": "certificate.pdf",
            "hash": "hash-two",
            "upload_date": "2024-02-01T00:00:00",
            "verified": false,
            "qrUrl": "/qr/d-2"
        }
    ]))
}

async fn mock_stats() -> Json<Value> {
    Json(json!({
        "totalDocuments": 10,
        "verifiedDocuments": 7,
        "pendingVerifications": 3
    }))
}

async fn mock_upload() -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Document uploaded successfully",
            "document_id": "d-3",
            "_id": "64f2",
            "filename": "report.pdf",
            "verified": false,
            "upload_date": "2024-03-01T00:00:00",
            "qrUrl": "/qr/d-3"
        })),
    )
}

async fn mock_verify_hash(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match params.get("document_hash").map(String::as_str) {
        Some("abc123") => Ok(Json(json!({
            "verified": false,
            "document_hash": "abc123",
            "filename": "report.pdf",
            "timestamp": "2024-01-01T00:00:00Z",
            "qr_code_url": null
        }))),
        Some("goodhash") => Ok(Json(json!({
            "verified": true,
            "document_hash": "goodhash",
            "filename": "deed.pdf",
            "timestamp": "2024-01-01T00:00:00Z",
            "qr_code_url": "https://qr.example/goodhash"
        }))),
        _ => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Document not found"})),
        )),
    }
}

fn mock_backend() -> Router {
    Router::new()
        .route("/login", post(mock_login))
        .route("/register", post(mock_register))
        .route("/documents", get(mock_documents))
        .route("/documents/stats", get(mock_stats))
        .route("/documents/upload", post(mock_upload))
        .route("/verify/hash", get(mock_verify_hash))
}

async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, mock_backend()).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port that nothing listens on, for transport-failure tests.
async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// -- Helpers ------------------------------------------------------------------

fn test_app(base_url: &str) -> Router {
    let config = AppConfig {
        port: 0,
        auth_base_url: base_url.to_string(),
        documents_base_url: base_url.to_string(),
        request_timeout: Duration::from_secs(5),
    };
    build_router(AppState::new(config).unwrap())
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get_request(uri: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::empty()).unwrap()
}

fn form_request(uri: &str, body: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn location(headers: &axum::http::HeaderMap) -> &str {
    headers
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

fn set_cookies(headers: &axum::http::HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}

// -- Tests --------------------------------------------------------------------

#[tokio::test]
async fn protected_routes_redirect_without_session() {
    let app = test_app(&dead_backend().await);

    for uri in ["/admin", "/user"] {
        let (status, headers, _) = send(&app, get_request(uri, None)).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&headers), "/login", "{uri}");
    }
}

#[tokio::test]
async fn wrong_role_redirects_to_login() {
    let app = test_app(&dead_backend().await);

    let (status, headers, _) =
        send(&app, get_request("/admin", Some("token=t1; role=user"))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/login");

    let (status, headers, _) =
        send(&app, get_request("/user", Some("token=t1; role=admin"))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/login");
}

#[tokio::test]
async fn unknown_paths_redirect_home() {
    let app = test_app(&dead_backend().await);

    let (status, headers, _) = send(&app, get_request("/no/such/page", None)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
}

#[tokio::test]
async fn home_page_renders_logged_out_without_backend() {
    let app = test_app(&dead_backend().await);

    let (status, _, body) = send(&app, get_request("/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Login"));
    assert!(body.contains("Verify a Document"));
}

#[tokio::test]
async fn login_routes_by_server_role_and_sets_cookies() {
    let app = test_app(&spawn_backend().await);

    let (status, headers, _) = send(
        &app,
        form_request(
            "/login",
            "email=a%40b.com&password=correct&role=admin",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/admin");
    let cookies = set_cookies(&headers);
    assert!(cookies.iter().any(|c| c.starts_with("token=t1")));
    assert!(cookies.iter().any(|c| c.starts_with("role=admin")));

    let (status, headers, _) = send(
        &app,
        form_request("/login", "email=a%40b.com&password=correct&role=user", None),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/user");
}

#[tokio::test]
async fn login_failure_shows_server_detail_inline() {
    let app = test_app(&spawn_backend().await);

    let (status, _, body) = send(
        &app,
        form_request("/login", "email=a%40b.com&password=wrong&role=user", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid credentials"));
}

#[tokio::test]
async fn login_transport_failure_shows_generic_message() {
    let app = test_app(&dead_backend().await);

    let (status, _, body) = send(
        &app,
        form_request("/login", "email=a%40b.com&password=x&role=user", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Login failed"));
}

#[tokio::test]
async fn register_validates_locally_before_calling_backend() {
    let app = test_app(&dead_backend().await);

    let (status, _, body) = send(
        &app,
        form_request(
            "/register",
            "name=John&email=a%40b.com&password=x&confirm_password=y&role=user",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Passwords must match"));
}

#[tokio::test]
async fn register_success_redirects_to_login() {
    let app = test_app(&spawn_backend().await);

    let (status, headers, _) = send(
        &app,
        form_request(
            "/register",
            "name=John&email=new%40b.com&password=x&confirm_password=x&role=user",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/login?status=registered");
}

#[tokio::test]
async fn register_surfaces_server_rejection() {
    let app = test_app(&spawn_backend().await);

    let (status, _, body) = send(
        &app,
        form_request(
            "/register",
            "name=John&email=taken%40example.com&password=x&confirm_password=x&role=user",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Email already registered"));
}

#[tokio::test]
async fn hash_verification_renders_backend_verdict() {
    let app = test_app(&spawn_backend().await);

    let (status, _, body) = send(
        &app,
        get_request("/verify/hash?document_hash=abc123&tab=hash", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Document Not Verified"));
    assert!(body.contains("report.pdf"));
    assert!(body.contains("abc123"));

    let (_, _, body) = send(
        &app,
        get_request("/verify/hash?document_hash=goodhash&tab=hash", None),
    )
    .await;
    assert!(body.contains("Document Verified"));
    assert!(body.contains("https://qr.example/goodhash"));
}

#[tokio::test]
async fn hash_verification_is_idempotent() {
    let app = test_app(&spawn_backend().await);

    let (_, _, first) = send(
        &app,
        get_request("/verify/hash?document_hash=abc123&tab=hash", None),
    )
    .await;
    let (_, _, second) = send(
        &app,
        get_request("/verify/hash?document_hash=abc123&tab=hash", None),
    )
    .await;
    assert!(first.contains("Document Not Verified"));
    assert!(second.contains("Document Not Verified"));
}

#[tokio::test]
async fn failed_verification_synthesizes_negative_result() {
    let app = test_app(&dead_backend().await);

    let (status, _, body) = send(
        &app,
        get_request("/verify/hash?document_hash=abc123&tab=hash", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Document Not Verified"));
    assert!(body.contains("abc123"));
    assert!(body.contains("Unknown"));
}

#[tokio::test]
async fn unknown_hash_renders_not_verified_with_fallback() {
    let app = test_app(&spawn_backend().await);

    let (status, _, body) = send(
        &app,
        get_request("/verify/hash?document_hash=missing&tab=hash", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Document Not Verified"));
    assert!(body.contains("missing"));
}

#[tokio::test]
async fn admin_dashboard_lists_documents_and_stats() {
    let app = test_app(&spawn_backend().await);

    let (status, _, body) = send(
        &app,
        get_request("/admin", Some("token=t1; role=admin")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("deed.pdf"));
    assert!(body.contains("certificate.pdf"));
    assert!(body.contains("Verified Documents"));
    assert!(body.contains("Mark Verified"));
    // Newest first: certificate.pdf was uploaded after deed.pdf.
    assert!(body.find("certificate.pdf").unwrap() < body.find("deed.pdf").unwrap());
}

#[tokio::test]
async fn admin_dashboard_tolerates_backend_outage() {
    let app = test_app(&dead_backend().await);

    let (status, _, body) = send(
        &app,
        get_request("/admin", Some("token=t1; role=admin")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No documents yet"));
    assert!(body.contains("Total Documents"));
}

#[tokio::test]
async fn admin_upload_shows_flash_with_new_document() {
    let app = test_app(&spawn_backend().await);

    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"report.pdf\"\r\nContent-Type: application/pdf\r\n\r\n%PDF-1.4 test content\r\n--{boundary}--\r\n"
    );
    let req = Request::builder()
        .method("POST")
        .uri("/admin/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::COOKIE, "token=t1; role=admin")
        .body(Body::from(body))
        .unwrap();

    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Uploaded report.pdf"));
}

#[tokio::test]
async fn admin_upload_rejects_unsupported_extension() {
    let app = test_app(&spawn_backend().await);

    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"malware.exe\"\r\nContent-Type: application/octet-stream\r\n\r\nMZ\r\n--{boundary}--\r\n"
    );
    let req = Request::builder()
        .method("POST")
        .uri("/admin/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::COOKIE, "token=t1; role=admin")
        .body(Body::from(body))
        .unwrap();

    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("not supported"));
}

#[tokio::test]
async fn user_dashboard_lists_documents_with_download_links() {
    let app = test_app(&spawn_backend().await);

    let (status, _, body) = send(&app, get_request("/user", Some("token=t1; role=user"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("deed.pdf"));
    assert!(body.contains("/documents/download/d-1"));
    assert!(body.contains("My Documents"));
}

#[tokio::test]
async fn logout_clears_both_cookies_and_redirects() {
    let app = test_app(&dead_backend().await);

    let (status, headers, _) =
        send(&app, form_request("/logout", "", Some("token=t1; role=admin"))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/?status=logged_out");

    let cookies = set_cookies(&headers);
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("token=") && c.contains("Max-Age=0"))
    );
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("role=") && c.contains("Max-Age=0"))
    );
}

#[tokio::test]
async fn healthz_and_robots_are_served() {
    let app = test_app(&dead_backend().await);

    let (status, _, _) = send(&app, get_request("/healthz", None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, get_request("/robots.txt", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("User-agent"));
}
