use crate::backend::DocumentRecord;
use crate::web::templates::{escape_html, format_timestamp};

/// Styles for the dashboard chrome shared by the admin and user pages:
/// sidebar, stat tiles, document card grid, and the detail modal.
pub const DASHBOARD_STYLES: &str = r#"
.dash { display: flex; gap: 2rem; align-items: flex-start; }
.sidebar { width: 220px; flex-shrink: 0; background: #1e293bcc; border: 1px solid #33415580; border-radius: 14px; padding: 1.25rem 1rem; display: flex; flex-direction: column; gap: 0.25rem; }
.sidebar .sidebar-title { font-weight: 700; color: #f8fafc; padding: 0.5rem 0.75rem 1rem; }
.sidebar .sidebar-title small { display: block; font-weight: 400; color: #64748b; font-size: 0.75rem; }
.sidebar a { display: block; padding: 0.7rem 0.75rem; border-radius: 10px; color: #94a3b8; text-decoration: none; font-weight: 600; }
.sidebar a:hover { background: #33415566; color: #e2e8f0; }
.sidebar a.active { background: #1e3a5f; color: #60a5fa; }
.sidebar .logout-form { margin-top: 1.5rem; }
.sidebar .logout-form button { width: 100%; text-align: left; padding: 0.7rem 0.75rem; border-radius: 10px; border: none; background: none; color: #f87171; font-weight: 600; font-size: 1rem; cursor: pointer; }
.sidebar .logout-form button:hover { background: #7f1d1d33; }
.dash-main { flex: 1; min-width: 0; }
.stats-grid { display: grid; gap: 1.25rem; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); margin-bottom: 2rem; }
.stat-tile { background: #1e293bcc; border: 1px solid #33415580; border-radius: 14px; padding: 1.25rem; }
.stat-tile .stat-label { color: #94a3b8; font-size: 0.85rem; margin: 0 0 0.4rem; }
.stat-tile .stat-value { font-size: 1.9rem; font-weight: 700; margin: 0; color: #f8fafc; }
.stat-tile.positive .stat-value { color: #4ade80; }
.stat-tile.warning .stat-value { color: #facc15; }
.doc-grid { display: grid; gap: 1.25rem; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); }
.doc-card { background: #0f172a; border: 1px solid #334155; border-radius: 12px; padding: 1rem; cursor: pointer; }
.doc-card:hover { border-color: #60a5fa; }
.doc-card h3 { margin: 0 0 0.4rem; font-size: 1rem; color: #f8fafc; word-break: break-all; }
.doc-card .doc-date { color: #94a3b8; font-size: 0.85rem; margin: 0 0 0.4rem; }
.doc-card .doc-hash { color: #475569; font-family: monospace; font-size: 0.75rem; margin: 0 0 0.6rem; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.badge { display: inline-block; padding: 0.2rem 0.6rem; border-radius: 999px; font-size: 0.78rem; font-weight: 600; }
.badge.verified { background: #052e1b; color: #4ade80; }
.badge.pending { background: #3a2b05; color: #facc15; }
.doc-actions { margin-top: 0.75rem; display: flex; gap: 0.5rem; flex-wrap: wrap; }
.doc-actions form { display: inline; }
.doc-actions .btn-sm { padding: 0.35rem 0.7rem; border: 1px solid #334155; border-radius: 8px; background: none; color: #94a3b8; font-size: 0.82rem; font-weight: 600; cursor: pointer; text-decoration: none; }
.doc-actions .btn-sm:hover { color: #e2e8f0; border-color: #60a5fa; }
.doc-actions .btn-danger:hover { color: #f87171; border-color: #f87171; }
.empty-state { text-align: center; padding: 3rem 1rem; color: #94a3b8; }
.modal-backdrop { display: none; position: fixed; inset: 0; background: rgba(0, 0, 0, 0.6); z-index: 50; align-items: center; justify-content: center; }
.modal-backdrop.open { display: flex; }
.modal-box { background: #111c33; border: 1px solid #334155; border-radius: 14px; padding: 1.5rem; max-width: 460px; width: calc(100% - 2rem); position: relative; }
.modal-box h2 { margin-top: 0; color: #f8fafc; }
.modal-close { position: absolute; top: 0.6rem; right: 0.8rem; background: none; border: none; color: #94a3b8; font-size: 1.1rem; cursor: pointer; }
.modal-close:hover { color: #f8fafc; }
.modal-rows div { margin-bottom: 0.5rem; font-size: 0.92rem; color: #cbd5e1; word-break: break-all; }
.modal-rows strong { color: #f8fafc; }
@media (max-width: 900px) {
    .dash { flex-direction: column; }
    .sidebar { width: 100%; box-sizing: border-box; }
}
"#;

/// Opens the shared detail modal from a card's data attributes.
pub const DOCUMENT_MODAL_SCRIPT: &str = r#"<script>
(function() {
    const backdrop = document.querySelector('[data-document-modal]');
    if (!backdrop) {
        return;
    }

    const fields = ['document-id', 'filename', 'hash', 'upload-date', 'verified'];

    function openModal(card) {
        fields.forEach(field => {
            const target = backdrop.querySelector('[data-modal-' + field + ']');
            if (target) {
                target.textContent = card.dataset[field.replace(/-([a-z])/g, (_, c) => c.toUpperCase())] || '—';
            }
        });
        backdrop.classList.add('open');
    }

    document.querySelectorAll('.doc-card').forEach(card => {
        card.addEventListener('click', (event) => {
            if (event.target.closest('.doc-actions')) {
                return;
            }
            openModal(card);
        });
    });

    backdrop.addEventListener('click', (event) => {
        if (event.target === backdrop || event.target.closest('.modal-close')) {
            backdrop.classList.remove('open');
        }
    });

    document.addEventListener('keydown', (event) => {
        if (event.key === 'Escape') {
            backdrop.classList.remove('open');
        }
    });
})();
</script>"#;

pub struct SidebarLink<'a> {
    pub href: &'a str,
    pub label: &'a str,
    pub active: bool,
}

pub fn render_sidebar(subtitle: &str, links: &[SidebarLink<'_>]) -> String {
    let link_html = links
        .iter()
        .map(|link| {
            let class = if link.active { " class=\"active\"" } else { "" };
            format!(
                r#"<a href="{href}"{class}>{label}</a>"#,
                href = link.href,
                class = class,
                label = escape_html(link.label),
            )
        })
        .collect::<String>();

    format!(
        r#"<aside class="sidebar">
    <div class="sidebar-title">BlockVerify<small>{subtitle}</small></div>
    {link_html}
    <form class="logout-form" method="post" action="/logout"><button type="submit">Logout</button></form>
</aside>"#,
        subtitle = escape_html(subtitle),
        link_html = link_html,
    )
}

#[derive(Clone, Copy)]
pub enum StatTone {
    Neutral,
    Positive,
    Warning,
}

impl StatTone {
    fn class(self) -> &'static str {
        match self {
            StatTone::Neutral => "",
            StatTone::Positive => " positive",
            StatTone::Warning => " warning",
        }
    }
}

pub fn render_stat_tile(label: &str, value: u64, tone: StatTone) -> String {
    format!(
        r#"<div class="stat-tile{tone}"><p class="stat-label">{label}</p><p class="stat-value">{value}</p></div>"#,
        tone = tone.class(),
        label = escape_html(label),
        value = value,
    )
}

/// Card for one backend document record. `actions_html` is caller-supplied
/// so the admin grid can attach verify/delete forms and the user grid a
/// download link without the card knowing either.
pub fn render_document_card(record: &DocumentRecord, actions_html: &str) -> String {
    let badge = if record.verified {
        r#"<span class="badge verified">Verified</span>"#
    } else {
        r#"<span class="badge pending">Pending</span>"#
    };

    let actions = if actions_html.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="doc-actions">{actions_html}</div>"#)
    };

    format!(
        r#"<div class="doc-card" data-document-id="{document_id}" data-filename="{filename}" data-hash="{hash}" data-upload-date="{upload_date}" data-verified="{verified}">
    <h3>{filename}</h3>
    <p class="doc-date">Issued: {upload_date}</p>
    <p class="doc-hash" title="{hash}">{hash}</p>
    {badge}
    {actions}
</div>"#,
        document_id = escape_html(&record.document_id),
        filename = escape_html(&record.filename),
        hash = escape_html(&record.hash),
        upload_date = escape_html(&format_timestamp(&record.upload_date)),
        verified = if record.verified { "Yes" } else { "No" },
        badge = badge,
        actions = actions,
    )
}

pub fn render_document_modal() -> String {
    r#"<div class="modal-backdrop" data-document-modal>
    <div class="modal-box">
        <button type="button" class="modal-close" aria-label="Close">✖</button>
        <h2>Document Info</h2>
        <div class="modal-rows">
            <div><strong>Document ID:</strong> <span data-modal-document-id></span></div>
            <div><strong>Filename:</strong> <span data-modal-filename></span></div>
            <div><strong>Hash:</strong> <span data-modal-hash></span></div>
            <div><strong>Upload Date:</strong> <span data-modal-upload-date></span></div>
            <div><strong>Verified:</strong> <span data-modal-verified></span></div>
        </div>
    </div>
</div>"#
        .to_string()
}

/// Styles for the single-file dropzone used by the upload and verify forms.
pub const UPLOAD_DROPZONE_STYLES: &str = r#"
.bv-dropzone { border: 2px dashed #334155; border-radius: 12px; padding: 2rem; text-align: center; background: #0f172a; color: #94a3b8; cursor: pointer; }
.bv-dropzone strong { color: #60a5fa; }
.bv-dropzone[data-state="dragover"] { border-color: #2563eb; background: #1e3a5f33; }
.bv-dropzone-note { font-size: 0.85rem; color: #64748b; margin: 0.5rem 0 0; }
.bv-dropzone-input { display: none; }
.bv-dropzone-selected { min-height: 1.4rem; margin-top: 0.6rem; font-size: 0.92rem; color: #60a5fa; word-break: break-all; }
"#;

/// In-flight handling: once a form with `data-busy-label` submits, its
/// button is disabled and relabeled so a second submission cannot start
/// while the first is pending.
pub const FORM_BUSY_SCRIPT: &str = r#"<script>
(function() {
    document.querySelectorAll('form[data-busy-label]').forEach(form => {
        form.addEventListener('submit', () => {
            const button = form.querySelector('button[type="submit"]');
            if (button) {
                button.disabled = true;
                button.textContent = form.dataset.busyLabel;
            }
        });
    });
})();
</script>"#;

pub const UPLOAD_DROPZONE_SCRIPT: &str = r#"<script>
(function() {
    document.querySelectorAll('.bv-dropzone').forEach(dropzone => {
        const input = dropzone.querySelector('input[type="file"]');
        const selected = dropzone.parentElement.querySelector('[data-dropzone-selected]');
        if (!input) {
            return;
        }

        function showSelection() {
            if (selected) {
                selected.textContent = input.files.length > 0 ? input.files[0].name : '';
            }
        }

        dropzone.addEventListener('click', () => input.click());
        dropzone.addEventListener('dragenter', (event) => {
            event.preventDefault();
            dropzone.dataset.state = 'dragover';
        });
        dropzone.addEventListener('dragover', (event) => event.preventDefault());
        dropzone.addEventListener('dragleave', (event) => {
            event.preventDefault();
            if (!dropzone.contains(event.relatedTarget)) {
                delete dropzone.dataset.state;
            }
        });
        dropzone.addEventListener('drop', (event) => {
            event.preventDefault();
            delete dropzone.dataset.state;
            if (event.dataTransfer.files.length > 0) {
                const dt = new DataTransfer();
                dt.items.add(event.dataTransfer.files[0]);
                input.files = dt.files;
            }
            showSelection();
        });
        input.addEventListener('change', showSelection);
    });
})();
</script>"#;

pub struct DropzoneConfig<'a> {
    pub input_id: &'a str,
    pub field_name: &'a str,
    pub prompt: &'a str,
    pub note: &'a str,
    pub accept: &'a str,
}

pub fn render_dropzone(config: &DropzoneConfig<'_>) -> String {
    format!(
        r#"<div>
    <div class="bv-dropzone" data-state="">
        <p><strong>Click to select file</strong> or drag and drop</p>
        <p class="bv-dropzone-note">{note}</p>
        <input class="bv-dropzone-input" id="{input_id}" name="{field_name}" type="file" accept="{accept}">
    </div>
    <div class="bv-dropzone-selected" data-dropzone-selected></div>
    <p class="muted" style="font-size:0.85rem;">{prompt}</p>
</div>"#,
        note = escape_html(config.note),
        input_id = escape_html(config.input_id),
        field_name = escape_html(config.field_name),
        accept = escape_html(config.accept),
        prompt = escape_html(config.prompt),
    )
}

/// Camera QR scanner backed by the html5-qrcode library. Decoding stops the
/// camera, fills the adjacent hash form, and submits it; the pause keeps a
/// second decode from racing the in-flight verification.
pub const QR_SCANNER_SCRIPT: &str = r#"<script src="https://unpkg.com/html5-qrcode@2.3.8/html5-qrcode.min.js"></script>
<script>
(function() {
    const mount = document.getElementById('qr-reader');
    const form = document.getElementById('qr-scan-form');
    if (!mount || !form || typeof Html5Qrcode === 'undefined') {
        return;
    }

    const statusEl = document.getElementById('qr-scan-status');
    const scanner = new Html5Qrcode('qr-reader');
    let submitted = false;

    function onDecode(text) {
        if (submitted) {
            return;
        }
        submitted = true;
        if (statusEl) {
            statusEl.textContent = 'Code detected, verifying…';
        }
        scanner.stop().catch(() => {}).then(() => {
            form.querySelector('input[name="document_hash"]').value = text;
            form.submit();
        });
    }

    scanner.start({ facingMode: 'environment' }, { fps: 5, qrbox: 220 }, onDecode, () => {})
        .catch((err) => {
            if (statusEl) {
                statusEl.textContent = 'Camera unavailable: ' + err;
            }
        });
})();
</script>"#;

pub fn render_qr_scanner() -> String {
    r#"<div>
    <div id="qr-reader" style="max-width: 360px; margin: 0 auto; border: 1px solid #334155; border-radius: 12px; overflow: hidden;"></div>
    <p id="qr-scan-status" class="muted" style="text-align: center; margin-top: 0.75rem;">Point the camera at a document QR code.</p>
    <form id="qr-scan-form" method="get" action="/verify/hash">
        <input type="hidden" name="document_hash" value="">
        <input type="hidden" name="tab" value="qr">
    </form>
</div>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> DocumentRecord {
        serde_json::from_str(
            r#"{
                "_id": "64f0",
                "document_id": "d-1",
                "filename": "report <b>.pdf",
                "hash": "abc123",
                "upload_date": "2024-01-01T00:00:00",
                "verified": false,
                "qrUrl": "/qr/d-1"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn stat_tile_shows_label_and_value() {
        let html = render_stat_tile("Total Documents", 42, StatTone::Neutral);
        assert!(html.contains("Total Documents"));
        assert!(html.contains("42"));
    }

    #[test]
    fn document_card_escapes_filename_and_shows_badge() {
        let html = render_document_card(&sample_record(), "");
        assert!(html.contains("report &lt;b&gt;.pdf"));
        assert!(!html.contains("<b>.pdf"));
        assert!(html.contains("Pending"));
        assert!(html.contains("data-document-id=\"d-1\""));
    }

    #[test]
    fn sidebar_marks_active_link() {
        let html = render_sidebar(
            "Document Verification System",
            &[SidebarLink {
                href: "/user",
                label: "My Documents",
                active: true,
            }],
        );
        assert!(html.contains("class=\"active\""));
        assert!(html.contains("My Documents"));
    }
}
