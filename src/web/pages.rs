use axum::{extract::Query, response::Html};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::session::Session;
use crate::web::templates::{PageShell, compose_flash, render_page};

#[derive(Default, Deserialize)]
pub struct LandingQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

const HOME_STYLES: &str = r#"
.hero { text-align: center; padding: 3rem 1rem 2.5rem; }
.hero h1 { font-size: clamp(2.2rem, 5vw, 3.2rem); margin: 0 0 1rem; color: #f8fafc; }
.hero h1 span { color: #60a5fa; }
.hero p { color: #94a3b8; max-width: 640px; margin: 0 auto 2rem; font-size: 1.1rem; line-height: 1.7; }
.hero-actions { display: flex; gap: 1rem; justify-content: center; flex-wrap: wrap; }
.hero-actions a { text-decoration: none; }
.btn-ghost { padding: 0.85rem 1.2rem; border-radius: 8px; border: 1px solid #334155; color: #e2e8f0; font-weight: 600; }
.btn-ghost:hover { border-color: #60a5fa; }
.features-grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); margin-top: 1rem; }
.feature-card { background: #1e293bcc; border: 1px solid #33415580; border-radius: 14px; padding: 1.5rem; }
.feature-card h3 { margin: 0 0 0.6rem; color: #f8fafc; }
.feature-card p { margin: 0; color: #94a3b8; font-size: 0.95rem; line-height: 1.6; }
"#;

pub async fn home_page(jar: CookieJar, Query(params): Query<LandingQuery>) -> Html<String> {
    let session = Session::from_jar(&jar);
    let flash = compose_flash(params.status.as_deref(), params.error.as_deref());

    let features = [
        (
            "Immutable Records",
            "All document hashes are stored permanently on the blockchain.",
        ),
        (
            "Easy Verification",
            "Verify documents instantly with QR codes, file uploads, or a pasted hash.",
        ),
        (
            "Tamper-Proof",
            "Any alteration to a document is immediately detectable.",
        ),
        (
            "Secure Sharing",
            "Share verified documents without exposing sensitive data.",
        ),
    ];

    let feature_cards = features
        .iter()
        .map(|(title, description)| {
            format!(r#"<div class="feature-card"><h3>{title}</h3><p>{description}</p></div>"#)
        })
        .collect::<String>();

    let main = format!(
        r#"        {flash}
        <section class="hero">
            <h1>Verify Documents on the <span>Blockchain</span></h1>
            <p>BlockVerify anchors a fingerprint of every issued document on a public ledger. Anyone holding the document — or just its QR code — can confirm in seconds that it has not been altered since it was issued.</p>
            <div class="hero-actions">
                <a class="btn" href="/verify">Verify a Document</a>
                <a class="btn-ghost" href="/register">Create an Account</a>
            </div>
        </section>
        <section class="features-grid">
            {feature_cards}
        </section>"#,
    );

    Html(render_page(
        PageShell::new("BlockVerify — Blockchain Document Verification", "home", session.as_ref())
            .with_styles(HOME_STYLES)
            .with_main(main),
    ))
}

pub async fn about_page(jar: CookieJar) -> Html<String> {
    let session = Session::from_jar(&jar);

    let main = r#"        <section class="panel">
            <h2>About BlockVerify</h2>
            <p class="muted">BlockVerify is a document-verification service for institutions that issue certificates, deeds, and reports. When an administrator uploads a document, its cryptographic hash is recorded on a blockchain. From that point on, anyone can check a copy of the document against the anchored record — without trusting the issuer's servers, and without the document itself ever leaving their hands unencrypted.</p>
            <p class="muted">Verification happens against the hash alone. The service never needs the document contents to confirm authenticity, which keeps confidential material confidential while still making forgery detectable.</p>
        </section>
        <section class="panel">
            <h2>How it is built</h2>
            <p class="muted">This site is the presentation tier. Hashing, anchoring, and record keeping are performed by dedicated backend services; the pages here only collect input and display what those services report.</p>
        </section>"#;

    Html(render_page(
        PageShell::new("About — BlockVerify", "about", session.as_ref()).with_main(main),
    ))
}

pub async fn guide_page(jar: CookieJar) -> Html<String> {
    let session = Session::from_jar(&jar);

    let main = r#"        <section class="panel">
            <h2>Verifying a document</h2>
            <p class="muted">There are three ways to check a document, all available on the <a href="/verify">Verify</a> page:</p>
            <ol class="muted" style="line-height: 2;">
                <li><strong>Scan a QR code</strong> — point your camera at the QR code printed on the document. The embedded hash is checked automatically.</li>
                <li><strong>Upload the file</strong> — select the document itself. Its fingerprint is computed and compared against the anchored record.</li>
                <li><strong>Paste the hash</strong> — if you were given the document's hash directly, paste it in and submit.</li>
            </ol>
            <p class="muted">A green result means the document matches a record anchored on the blockchain. A red result means no matching record was found — the document may have been altered, or it was never issued through BlockVerify.</p>
        </section>
        <section class="panel">
            <h2>Issuing documents</h2>
            <p class="muted">Issuing requires an administrator account. After signing in, use the admin dashboard to upload documents; each upload is hashed and anchored, and appears in the document list with its verification status.</p>
        </section>"#;

    Html(render_page(
        PageShell::new("Guide — BlockVerify", "guide", session.as_ref()).with_main(main),
    ))
}

pub async fn contact_page(jar: CookieJar) -> Html<String> {
    let session = Session::from_jar(&jar);

    let main = r#"        <section class="panel">
            <h2>Contact</h2>
            <p class="muted">Questions about a verification result, or interested in issuing documents through BlockVerify?</p>
            <p class="muted">Email: <a href="mailto:support@blockverify.example">support@blockverify.example</a></p>
            <p class="muted">Institutions can request an administrator account by writing to <a href="mailto:onboarding@blockverify.example">onboarding@blockverify.example</a> from an institutional address.</p>
        </section>"#;

    Html(render_page(
        PageShell::new("Contact — BlockVerify", "contact", session.as_ref()).with_main(main),
    ))
}
