use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, warn};

use crate::backend::{DocumentRecord, DocumentStats};
use crate::session::Role;
use crate::web::{
    AppState,
    auth::require_role,
    templates::{PageShell, escape_html, render_page},
    widgets::{
        self, SidebarLink, StatTone, render_document_card, render_document_modal, render_sidebar,
        render_stat_tile,
    },
};

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Redirect> {
    let session = require_role(&jar, Role::User)?;

    // Both fetches run concurrently and are joined before rendering; they
    // populate disjoint parts of the page.
    let (documents, stats) = futures::join!(
        state.backend().documents(&session.token),
        state.backend().document_stats(&session.token),
    );

    let mut documents = match documents {
        Ok(documents) => documents,
        Err(err) => {
            error!(%err, "failed to fetch user documents");
            Vec::new()
        }
    };
    documents.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));

    let stats = match stats {
        Ok(stats) => stats,
        Err(err) => {
            warn!(%err, "failed to fetch user stats, rendering zeroes");
            DocumentStats::default()
        }
    };

    let stats_html = format!(
        r#"<div class="stats-grid">{total}{verified}</div>"#,
        total = render_stat_tile("Total Documents", stats.total_documents, StatTone::Neutral),
        verified = render_stat_tile("Verified", stats.verified_documents, StatTone::Positive),
    );

    let documents_html = render_document_grid(&state, &documents);

    let sidebar = render_sidebar(
        "Document Verification System",
        &[
            SidebarLink {
                href: "/user",
                label: "My Documents",
                active: true,
            },
            SidebarLink {
                href: "/verify",
                label: "Verify a Document",
                active: false,
            },
        ],
    );

    let main = format!(
        r#"        <div class="dash">
            {sidebar}
            <div class="dash-main">
                <h1>My Documents</h1>
                <p class="muted">View and manage your verified documents.</p>
                {stats_html}
                <section class="panel">
                    {documents_html}
                </section>
            </div>
        </div>
        {modal}"#,
        sidebar = sidebar,
        stats_html = stats_html,
        documents_html = documents_html,
        modal = render_document_modal(),
    );

    Ok(Html(render_page(
        PageShell::new("My Documents — BlockVerify", "", Some(&session))
            .with_styles(widgets::DASHBOARD_STYLES)
            .with_script(widgets::DOCUMENT_MODAL_SCRIPT)
            .with_main(main),
    )))
}

fn render_document_grid(state: &AppState, documents: &[DocumentRecord]) -> String {
    if documents.is_empty() {
        return r#"<div class="empty-state"><h3>No documents found</h3><p>You haven't uploaded any documents yet. Documents shared with you will appear here.</p></div>"#
            .to_string();
    }

    let cards = documents
        .iter()
        .map(|record| {
            let actions = format!(
                r#"<a class="btn-sm" href="{url}">Download</a>"#,
                url = escape_html(&state.backend().download_url(&record.document_id)),
            );
            render_document_card(record, &actions)
        })
        .collect::<String>();

    format!(r#"<div class="doc-grid">{cards}</div>"#)
}
