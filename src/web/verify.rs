use axum::{
    extract::{Multipart, Query, State},
    response::Html,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::backend::{VerificationRecord, VerifyInput};
use crate::session::Session;
use crate::web::{
    AppState,
    templates::{PageShell, escape_html, format_timestamp, render_page},
    uploads,
    widgets::{self, DropzoneConfig},
};

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png"];

/// The three entry modes, selected by a query parameter so each render
/// shows exactly one of them.
#[derive(Clone, Copy, PartialEq, Eq)]
enum VerifyTab {
    File,
    Hash,
    Qr,
}

impl VerifyTab {
    fn parse(value: Option<&str>) -> VerifyTab {
        match value {
            Some("hash") => VerifyTab::Hash,
            Some("qr") => VerifyTab::Qr,
            _ => VerifyTab::File,
        }
    }
}

/// Transient outcome of one verification attempt, discarded on the next
/// attempt or navigation. `valid` always originates from the backend; on
/// any failure it is synthesized as `false` with best-effort metadata and
/// the current time — a fallback display state, not a retry.
pub struct VerificationOutcome {
    pub valid: bool,
    pub hash: String,
    pub filename: String,
    pub timestamp: String,
    pub qr_code_url: Option<String>,
}

impl VerificationOutcome {
    fn from_record(record: VerificationRecord) -> Self {
        Self {
            valid: record.verified,
            hash: record.document_hash,
            filename: record.filename,
            timestamp: record.timestamp,
            qr_code_url: record.qr_code_url,
        }
    }

    fn failure(fallback_name: &str, fallback_hash: &str) -> Self {
        let filename = if fallback_name.is_empty() {
            "Unknown"
        } else {
            fallback_name
        };
        Self {
            valid: false,
            hash: fallback_hash.to_string(),
            filename: filename.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            qr_code_url: None,
        }
    }
}

#[derive(Default, Deserialize)]
pub struct VerifyQuery {
    pub tab: Option<String>,
}

#[derive(Deserialize)]
pub struct HashQuery {
    #[serde(default)]
    pub document_hash: String,
    pub tab: Option<String>,
}

pub async fn verify_page(jar: CookieJar, Query(params): Query<VerifyQuery>) -> Html<String> {
    let session = Session::from_jar(&jar);
    let tab = VerifyTab::parse(params.tab.as_deref());
    Html(render_verify_page(session.as_ref(), tab, None, None, ""))
}

pub async fn verify_file(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Html<String> {
    let session = Session::from_jar(&jar);

    let upload = match uploads::read_file_field(multipart, "file", ALLOWED_EXTENSIONS).await {
        Ok(upload) => upload,
        Err(err) => {
            return Html(render_verify_page(
                session.as_ref(),
                VerifyTab::File,
                None,
                Some(err.message()),
                "",
            ));
        }
    };

    let input = VerifyInput::File {
        filename: upload.filename,
        content_type: upload.content_type,
        bytes: upload.bytes,
    };
    let outcome = run_verification(&state, input).await;

    Html(render_verify_page(
        session.as_ref(),
        VerifyTab::File,
        Some(&outcome),
        None,
        "",
    ))
}

pub async fn verify_hash(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<HashQuery>,
) -> Html<String> {
    let session = Session::from_jar(&jar);
    let tab = VerifyTab::parse(params.tab.as_deref());
    let hash = params.document_hash.trim().to_string();

    if hash.is_empty() {
        return Html(render_verify_page(
            session.as_ref(),
            VerifyTab::Hash,
            None,
            Some("Enter a document hash to verify."),
            "",
        ));
    }

    let input = match tab {
        VerifyTab::Qr => VerifyInput::QrScan(hash.clone()),
        _ => VerifyInput::Hash(hash.clone()),
    };
    let outcome = run_verification(&state, input).await;

    Html(render_verify_page(
        session.as_ref(),
        tab,
        Some(&outcome),
        None,
        &hash,
    ))
}

async fn run_verification(state: &AppState, input: VerifyInput) -> VerificationOutcome {
    let (fallback_name, fallback_hash) = {
        let (name, hash) = input.fallback_label();
        (name.to_string(), hash.to_string())
    };

    match state.backend().verify(input).await {
        Ok(record) => VerificationOutcome::from_record(record),
        Err(err) => {
            warn!(%err, "verification request failed, synthesizing negative result");
            VerificationOutcome::failure(&fallback_name, &fallback_hash)
        }
    }
}

const VERIFY_STYLES: &str = r#"
.verify-tabs { display: flex; gap: 0.5rem; margin-bottom: 1.5rem; flex-wrap: wrap; }
.verify-tabs a { padding: 0.6rem 1.2rem; border-radius: 999px; border: 1px solid #334155; color: #94a3b8; text-decoration: none; font-weight: 600; }
.verify-tabs a:hover { color: #e2e8f0; border-color: #60a5fa; }
.verify-tabs a.active { background: #2563eb; border-color: #2563eb; color: #ffffff; }
.verify-result { border-radius: 14px; padding: 1.5rem; margin-bottom: 2rem; border-left: 4px solid; }
.verify-result.valid { background: #052e1b66; border-color: #22c55e; }
.verify-result.invalid { background: #2d0a0a66; border-color: #ef4444; }
.verify-result h3 { margin: 0 0 0.3rem; font-size: 1.3rem; color: #f8fafc; }
.verify-result .verdict { margin: 0 0 1.2rem; font-weight: 600; }
.verify-result.valid .verdict { color: #4ade80; }
.verify-result.invalid .verdict { color: #f87171; }
.result-meta { display: grid; gap: 1rem; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); margin-bottom: 1rem; }
.result-meta p { margin: 0; }
.result-meta .meta-label { color: #94a3b8; font-size: 0.85rem; }
.result-meta .meta-value { color: #f8fafc; font-weight: 600; }
.result-qr { text-align: center; margin-top: 1rem; }
.result-qr img { width: 128px; height: 128px; background: #ffffff; border-radius: 8px; padding: 4px; }
"#;

fn render_verify_page(
    session: Option<&Session>,
    tab: VerifyTab,
    outcome: Option<&VerificationOutcome>,
    form_error: Option<&str>,
    hash_value: &str,
) -> String {
    let tabs = [
        (VerifyTab::File, "/verify?tab=file", "Upload File"),
        (VerifyTab::Hash, "/verify?tab=hash", "Paste Hash"),
        (VerifyTab::Qr, "/verify?tab=qr", "Scan QR Code"),
    ];
    let tab_html = tabs
        .iter()
        .map(|(key, href, label)| {
            let class = if *key == tab { " class=\"active\"" } else { "" };
            format!(r#"<a href="{href}"{class}>{label}</a>"#)
        })
        .collect::<String>();

    let error_html = form_error
        .map(|message| format!(r#"<div class="form-error">{}</div>"#, escape_html(message)))
        .unwrap_or_default();

    let panel = match tab {
        VerifyTab::File => {
            let dropzone = widgets::render_dropzone(&DropzoneConfig {
                input_id: "verify-file",
                field_name: "file",
                prompt: "The file is hashed by the verification service; it is not stored.",
                note: "Supports PDF, DOC, DOCX, JPG, PNG",
                accept: ".pdf,.doc,.docx,.jpg,.jpeg,.png",
            });
            format!(
                r#"<form method="post" action="/verify/file" enctype="multipart/form-data" data-busy-label="Verifying…">
                {dropzone}
                <button type="submit" style="margin-top: 1rem;">Verify Document</button>
            </form>"#
            )
        }
        VerifyTab::Hash => format!(
            r#"<form method="get" action="/verify/hash" data-busy-label="Verifying…">
                <input type="hidden" name="tab" value="hash">
                <div class="field">
                    <label for="document_hash">Document Hash</label>
                    <input id="document_hash" name="document_hash" type="text" value="{value}" placeholder="Paste the SHA-256 hash" required>
                </div>
                <button type="submit">Verify Hash</button>
            </form>"#,
            value = escape_html(hash_value),
        ),
        VerifyTab::Qr => widgets::render_qr_scanner(),
    };

    let result_html = outcome.map(render_result).unwrap_or_default();

    let main = format!(
        r#"        <h1>Document Verification</h1>
        <p class="muted">Verify document authenticity using blockchain technology.</p>
        <div class="verify-tabs">{tab_html}</div>
        <section class="panel">
            {error_html}
            {panel}
        </section>
        {result_html}"#,
    );

    let mut shell = PageShell::new("Verify — BlockVerify", "verify", session)
        .with_styles(VERIFY_STYLES)
        .with_styles(widgets::UPLOAD_DROPZONE_STYLES)
        .with_script(widgets::UPLOAD_DROPZONE_SCRIPT)
        .with_script(widgets::FORM_BUSY_SCRIPT)
        .with_main(main);

    if tab == VerifyTab::Qr {
        shell = shell.with_script(widgets::QR_SCANNER_SCRIPT);
    }

    render_page(shell)
}

fn render_result(outcome: &VerificationOutcome) -> String {
    let (class, heading, verdict) = if outcome.valid {
        (
            "valid",
            "Document Verified",
            "This document is authentic and verified on the blockchain.",
        )
    } else {
        (
            "invalid",
            "Document Not Verified",
            "This document could not be verified.",
        )
    };

    let qr_html = outcome
        .qr_code_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<div class="result-qr"><img src="{url}" alt="Document QR Code"></div>"#,
                url = escape_html(url)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<section class="verify-result {class}">
            <h3>{heading}</h3>
            <p class="verdict">{verdict}</p>
            <div class="result-meta">
                <div><p class="meta-label">Document Name</p><p class="meta-value">{filename}</p></div>
                <div><p class="meta-label">Verification Date</p><p class="meta-value">{timestamp}</p></div>
            </div>
            <p class="meta-label">Document Hash</p>
            <code class="hash">{hash}</code>
            {qr_html}
        </section>"#,
        class = class,
        heading = heading,
        verdict = verdict,
        filename = escape_html(&outcome.filename),
        timestamp = escape_html(&format_timestamp(&outcome.timestamp)),
        hash = escape_html(&outcome.hash),
        qr_html = qr_html,
    )
}
