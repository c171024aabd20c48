use axum::{
    extract::{Form, Multipart, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{error, warn};

use crate::backend::{DocumentRecord, DocumentStats};
use crate::session::{Role, Session};
use crate::web::{
    AppState,
    auth::require_role,
    templates::{PageShell, escape_html, render_page},
    uploads,
    widgets::{
        self, DropzoneConfig, SidebarLink, StatTone, render_document_card, render_document_modal,
        render_sidebar, render_stat_tile,
    },
};

const UPLOAD_ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png"];

#[derive(Default, Deserialize)]
pub struct DashboardQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct DocumentAction {
    pub document_id: String,
}

enum Flash {
    Success(String),
    Error(String),
}

impl Flash {
    fn render(&self) -> String {
        match self {
            Flash::Success(message) => {
                format!(r#"<div class="flash success">{}</div>"#, escape_html(message))
            }
            Flash::Error(message) => {
                format!(r#"<div class="flash error">{}</div>"#, escape_html(message))
            }
        }
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<DashboardQuery>,
) -> Result<Html<String>, Redirect> {
    let session = require_role(&jar, Role::Admin)?;
    let flash = compose_dashboard_flash(&params);
    Ok(Html(render_dashboard(&state, &session, flash).await))
}

pub async fn upload_document(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Html<String>, Redirect> {
    let session = require_role(&jar, Role::Admin)?;

    let flash =
        match uploads::read_file_field(multipart, "file", UPLOAD_ALLOWED_EXTENSIONS).await {
            Ok(upload) => {
                let filename = upload.filename.clone();
                match state
                    .backend()
                    .upload_document(
                        &session.token,
                        &upload.filename,
                        &upload.content_type,
                        upload.bytes,
                    )
                    .await
                {
                    Ok(record) => Flash::Success(format!("Uploaded {}.", record.filename)),
                    Err(err) => {
                        error!(%err, %filename, "document upload failed");
                        match err.server_message() {
                            Some(message) => Flash::Error(format!("Upload failed: {message}")),
                            None => Flash::Error("Upload failed. Please try again.".to_string()),
                        }
                    }
                }
            }
            Err(err) => Flash::Error(err.message().to_string()),
        };

    // Re-render with a fresh listing and re-fetched stats so the new
    // document shows up first immediately.
    Ok(Html(render_dashboard(&state, &session, Some(flash)).await))
}

pub async fn mark_verified(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(action): Form<DocumentAction>,
) -> Result<Redirect, Redirect> {
    let session = require_role(&jar, Role::Admin)?;

    match state
        .backend()
        .mark_verified(&session.token, &action.document_id)
        .await
    {
        Ok(_) => Ok(Redirect::to("/admin?status=verified")),
        Err(err) => {
            error!(%err, document_id = %action.document_id, "failed to mark document verified");
            Ok(Redirect::to("/admin?error=verify_failed"))
        }
    }
}

pub async fn delete_document(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(action): Form<DocumentAction>,
) -> Result<Redirect, Redirect> {
    let session = require_role(&jar, Role::Admin)?;

    match state
        .backend()
        .delete_document(&session.token, &action.document_id)
        .await
    {
        Ok(_) => Ok(Redirect::to("/admin?status=deleted")),
        Err(err) => {
            error!(%err, document_id = %action.document_id, "failed to delete document");
            Ok(Redirect::to("/admin?error=delete_failed"))
        }
    }
}

fn compose_dashboard_flash(params: &DashboardQuery) -> Option<Flash> {
    if let Some(status) = params.status.as_deref() {
        let message = match status {
            "verified" => "Document marked as verified.",
            "deleted" => "Document deleted.",
            _ => return None,
        };
        return Some(Flash::Success(message.to_string()));
    }

    if let Some(error) = params.error.as_deref() {
        let message = match error {
            "verify_failed" => "Could not mark the document as verified.",
            "delete_failed" => "Could not delete the document.",
            _ => "Something went wrong. Please try again.",
        };
        return Some(Flash::Error(message.to_string()));
    }

    None
}

async fn render_dashboard(state: &AppState, session: &Session, flash: Option<Flash>) -> String {
    // Listing and stats populate disjoint state, so completion order does
    // not matter; both are awaited before rendering proceeds.
    let (documents, stats) = futures::join!(
        state.backend().documents(&session.token),
        state.backend().document_stats(&session.token),
    );

    let mut documents = match documents {
        Ok(documents) => documents,
        Err(err) => {
            error!(%err, "failed to fetch documents");
            Vec::new()
        }
    };
    // Newest first, matching the prepend-on-upload ordering users see.
    documents.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));

    let stats = match stats {
        Ok(stats) => stats,
        Err(err) => {
            // Tolerated partial failure: zeroed tiles, no banner.
            warn!(%err, "failed to fetch document stats, rendering zeroes");
            DocumentStats::default()
        }
    };

    let flash_html = flash.map(|flash| flash.render()).unwrap_or_default();
    let stats_html = render_stats(&stats);
    let upload_html = render_upload_panel();
    let documents_html = render_document_grid(&documents);

    let sidebar = render_sidebar(
        "Admin Console",
        &[
            SidebarLink {
                href: "/admin",
                label: "Documents",
                active: true,
            },
            SidebarLink {
                href: "/verify",
                label: "Verify Portal",
                active: false,
            },
        ],
    );

    let main = format!(
        r#"        <div class="dash">
            {sidebar}
            <div class="dash-main">
                <h1>Admin Dashboard</h1>
                <p class="muted">Manage documents and system settings.</p>
                {flash_html}
                {stats_html}
                {upload_html}
                <section class="panel">
                    <h2>Issued Documents</h2>
                    {documents_html}
                </section>
            </div>
        </div>
        {modal}"#,
        sidebar = sidebar,
        flash_html = flash_html,
        stats_html = stats_html,
        upload_html = upload_html,
        documents_html = documents_html,
        modal = render_document_modal(),
    );

    render_page(
        PageShell::new("Admin Dashboard — BlockVerify", "", Some(session))
            .with_styles(widgets::DASHBOARD_STYLES)
            .with_styles(widgets::UPLOAD_DROPZONE_STYLES)
            .with_script(widgets::UPLOAD_DROPZONE_SCRIPT)
            .with_script(widgets::FORM_BUSY_SCRIPT)
            .with_script(widgets::DOCUMENT_MODAL_SCRIPT)
            .with_main(main),
    )
}

fn render_stats(stats: &DocumentStats) -> String {
    let tiles = [
        render_stat_tile("Total Documents", stats.total_documents, StatTone::Neutral),
        render_stat_tile(
            "Verified Documents",
            stats.verified_documents,
            StatTone::Positive,
        ),
        render_stat_tile(
            "Pending Verifications",
            stats.pending_verifications,
            StatTone::Warning,
        ),
        render_stat_tile("Total Users", stats.total_users, StatTone::Neutral),
    ];
    format!(r#"<div class="stats-grid">{}</div>"#, tiles.join(""))
}

fn render_upload_panel() -> String {
    let dropzone = widgets::render_dropzone(&DropzoneConfig {
        input_id: "document-upload",
        field_name: "file",
        prompt: "The document is hashed and anchored by the backend on upload.",
        note: "Supports PDF, DOC, DOCX, JPG, PNG",
        accept: ".pdf,.doc,.docx,.jpg,.jpeg,.png",
    });

    format!(
        r#"<section class="panel">
            <h2>Upload New Document</h2>
            <form method="post" action="/admin/upload" enctype="multipart/form-data" data-busy-label="Uploading…">
                {dropzone}
                <button type="submit" style="margin-top: 1rem;">Upload Document</button>
            </form>
        </section>"#
    )
}

fn render_document_grid(documents: &[DocumentRecord]) -> String {
    if documents.is_empty() {
        return r#"<div class="empty-state"><h3>No documents yet</h3><p>Documents you upload will appear here with their verification status.</p></div>"#
            .to_string();
    }

    let cards = documents
        .iter()
        .map(|record| {
            let mut actions = String::new();
            if !record.verified {
                actions.push_str(&format!(
                    r#"<form method="post" action="/admin/documents/verify"><input type="hidden" name="document_id" value="{id}"><button type="submit" class="btn-sm">Mark Verified</button></form>"#,
                    id = escape_html(&record.document_id),
                ));
            }
            actions.push_str(&format!(
                r#"<form method="post" action="/admin/documents/delete" onsubmit="return confirm('Delete this document?');"><input type="hidden" name="document_id" value="{id}"><button type="submit" class="btn-sm btn-danger">Delete</button></form>"#,
                id = escape_html(&record.document_id),
            ));
            render_document_card(record, &actions)
        })
        .collect::<String>();

    format!(r#"<div class="doc-grid">{cards}</div>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_grid_renders_all_four_tiles() {
        let stats = DocumentStats {
            total_documents: 10,
            verified_documents: 7,
            pending_verifications: 3,
            total_users: 2,
        };
        let html = render_stats(&stats);
        assert!(html.contains("Total Documents"));
        assert!(html.contains("Pending Verifications"));
        assert!(html.contains("10"));
        assert!(html.contains("7"));
    }

    #[test]
    fn unverified_documents_get_a_mark_verified_action() {
        let record: DocumentRecord = serde_json::from_str(
            r#"{"document_id": "d-1", "filename": "a.pdf", "hash": "h", "upload_date": "2024-01-01T00:00:00", "verified": false}"#,
        )
        .unwrap();
        let html = render_document_grid(std::slice::from_ref(&record));
        assert!(html.contains("Mark Verified"));
        assert!(html.contains("Delete"));

        let verified: DocumentRecord = serde_json::from_str(
            r#"{"document_id": "d-2", "filename": "b.pdf", "hash": "h", "upload_date": "2024-01-01T00:00:00", "verified": true}"#,
        )
        .unwrap();
        let html = render_document_grid(std::slice::from_ref(&verified));
        assert!(!html.contains("Mark Verified"));
    }

    #[test]
    fn empty_grid_shows_empty_state() {
        assert!(render_document_grid(&[]).contains("No documents yet"));
    }
}
