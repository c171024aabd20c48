use axum::{
    Router,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};

use crate::web::{AppState, admin, auth, pages, user, verify};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home_page))
        .route("/about", get(pages::about_page))
        .route("/guide", get(pages::guide_page))
        .route("/contact", get(pages::contact_page))
        .route("/login", get(auth::login_page).post(auth::process_login))
        .route(
            "/register",
            get(auth::register_page).post(auth::process_register),
        )
        .route("/logout", post(auth::logout))
        .route("/verify", get(verify::verify_page))
        .route("/verify/file", post(verify::verify_file))
        .route("/verify/hash", get(verify::verify_hash))
        .route("/admin", get(admin::dashboard))
        .route("/admin/upload", post(admin::upload_document))
        .route("/admin/documents/verify", post(admin::mark_verified))
        .route("/admin/documents/delete", post(admin::delete_document))
        .route("/user", get(user::dashboard))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .fallback(unknown_path)
        .with_state(state)
}

/// Unknown paths go home rather than 404, mirroring the catch-all route of
/// the original navigation.
async fn unknown_path() -> Redirect {
    Redirect::to("/")
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
