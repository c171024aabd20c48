use std::borrow::Cow;

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

use crate::session::Session;

/// Shared styling for every public-facing page. Dashboard-only widget
/// styles live next to the widgets that need them.
pub const BASE_STYLES: &str = r#"
        :root { color-scheme: dark; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #0f172a; color: #e2e8f0; min-height: 100vh; display: flex; flex-direction: column; }
        a { color: #60a5fa; }
        .topnav { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; padding: 1rem 1.5rem; background: #111c33; border-bottom: 1px solid #1e293b; }
        .topnav .brand { font-size: 1.2rem; font-weight: 700; color: #f8fafc; text-decoration: none; }
        .topnav .brand span { color: #60a5fa; }
        .topnav nav { display: flex; gap: 1rem; flex-wrap: wrap; align-items: center; }
        .topnav nav a { color: #94a3b8; text-decoration: none; font-weight: 600; padding: 0.35rem 0.6rem; border-radius: 8px; }
        .topnav nav a:hover { color: #e2e8f0; background: #1e293b; }
        .topnav nav a.active { color: #60a5fa; background: #1e3a5f; }
        .nav-cta { display: inline-flex; align-items: center; background: #2563eb; color: #ffffff !important; padding: 0.5rem 1rem; border-radius: 999px; }
        .nav-cta:hover { background: #1d4ed8 !important; }
        .logout-form { display: inline; }
        .logout-form button { background: none; border: 1px solid #334155; color: #f87171; padding: 0.45rem 0.9rem; border-radius: 999px; font-weight: 600; cursor: pointer; }
        .logout-form button:hover { background: #7f1d1d33; border-color: #f87171; }
        main { flex: 1; padding: 2rem 1.5rem; max-width: 1100px; margin: 0 auto; width: 100%; box-sizing: border-box; }
        .panel { background: #1e293bcc; border: 1px solid #33415580; border-radius: 14px; padding: 1.5rem; margin-bottom: 2rem; }
        .panel h2 { margin-top: 0; color: #f8fafc; }
        .muted { color: #94a3b8; }
        label { display: block; margin-bottom: 0.4rem; font-weight: 600; color: #cbd5e1; }
        input, select { width: 100%; padding: 0.75rem; border-radius: 8px; border: 1px solid #334155; background: #0f172a; color: #e2e8f0; box-sizing: border-box; font-size: 1rem; }
        input:focus, select:focus { outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.25); }
        button[type="submit"], .btn { padding: 0.85rem 1.2rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; font-size: 1rem; cursor: pointer; }
        button[type="submit"]:hover, .btn:hover { background: #1d4ed8; }
        button:disabled { opacity: 0.6; cursor: not-allowed; }
        .flash { padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; border: 1px solid transparent; }
        .flash.success { background: #052e1b; border-color: #166534; color: #4ade80; }
        .flash.error { background: #2d0a0a; border-color: #b91c1c; color: #f87171; }
        .form-error { padding: 0.75rem 1rem; border-radius: 8px; background: #2d0a0a; color: #fca5a5; font-size: 0.95rem; margin-bottom: 1rem; }
        .field { margin-bottom: 1.1rem; }
        .field-error { margin: 0.3rem 0 0; color: #f87171; font-size: 0.9rem; }
        .role-tabs { display: flex; background: #0f172a; border: 1px solid #334155; border-radius: 10px; padding: 0.25rem; margin-bottom: 1.1rem; }
        .role-tabs label { flex: 1; margin: 0; text-align: center; padding: 0.55rem; border-radius: 8px; cursor: pointer; color: #94a3b8; font-weight: 600; }
        .role-tabs input { display: none; }
        .role-tabs label:has(input:checked) { background: #2563eb; color: #ffffff; }
        .app-footer { text-align: center; font-size: 0.85rem; color: #475569; padding: 2rem 1rem; }
        code.hash { display: block; background: #0b1220; border: 1px solid #1e293b; border-radius: 8px; padding: 0.6rem; color: #60a5fa; font-family: "SFMono-Regular", Consolas, monospace; font-size: 0.85rem; overflow-x: auto; word-break: break-all; }
        @media (max-width: 768px) {
            .topnav { flex-direction: column; align-items: flex-start; }
            main { padding: 1.5rem 1rem; }
        }
"#;

pub struct PageShell<'a> {
    pub meta_title: &'a str,
    pub active_nav: &'a str,
    pub session: Option<&'a Session>,
    pub main_html: Cow<'a, str>,
    pub extra_style_blocks: Vec<Cow<'a, str>>,
    pub body_scripts: Vec<Cow<'a, str>>,
}

impl<'a> PageShell<'a> {
    pub fn new(meta_title: &'a str, active_nav: &'a str, session: Option<&'a Session>) -> Self {
        Self {
            meta_title,
            active_nav,
            session,
            main_html: Cow::Borrowed(""),
            extra_style_blocks: Vec::new(),
            body_scripts: Vec::new(),
        }
    }

    pub fn with_main(mut self, main_html: impl Into<Cow<'a, str>>) -> Self {
        self.main_html = main_html.into();
        self
    }

    pub fn with_styles(mut self, block: impl Into<Cow<'a, str>>) -> Self {
        self.extra_style_blocks.push(block.into());
        self
    }

    pub fn with_script(mut self, script: impl Into<Cow<'a, str>>) -> Self {
        self.body_scripts.push(script.into());
        self
    }
}

/// Standard page: top navigation, main column, footer.
pub fn render_page(shell: PageShell<'_>) -> String {
    let PageShell {
        meta_title,
        active_nav,
        session,
        main_html,
        extra_style_blocks,
        body_scripts,
    } = shell;

    let styles = std::iter::once(Cow::Borrowed(BASE_STYLES))
        .chain(extra_style_blocks.into_iter())
        .map(|block| block.into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    let scripts = body_scripts
        .into_iter()
        .map(|script| script.into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    let navbar = render_navbar(session, active_nav);
    let footer = render_footer();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
{styles}
    </style>
</head>
<body>
    {navbar}
    <main>
{main_html}
    </main>
    {footer}
{scripts}
</body>
</html>"#,
        meta_title = escape_html(meta_title),
        navbar = navbar,
        main_html = main_html,
        footer = footer,
        styles = styles,
        scripts = scripts,
    )
}

pub fn render_navbar(session: Option<&Session>, active_nav: &str) -> String {
    let links = [
        ("/", "home", "Home"),
        ("/verify", "verify", "Verify"),
        ("/guide", "guide", "Guide"),
        ("/about", "about", "About"),
        ("/contact", "contact", "Contact"),
    ];

    let link_html = links
        .iter()
        .map(|(href, key, label)| {
            let class = if *key == active_nav {
                " class=\"active\""
            } else {
                ""
            };
            format!(r#"<a href="{href}"{class}>{label}</a>"#)
        })
        .collect::<String>();

    let account_html = match session {
        Some(session) => format!(
            r#"<a class="nav-cta" href="{home}">Dashboard</a><form class="logout-form" method="post" action="/logout"><button type="submit">Logout</button></form>"#,
            home = session.role.home_path(),
        ),
        None => r#"<a href="/login">Login</a><a class="nav-cta" href="/register">Register</a>"#
            .to_string(),
    };

    format!(
        r#"<header class="topnav">
        <a class="brand" href="/">Block<span>Verify</span></a>
        <nav>{link_html}{account_html}</nav>
    </header>"#,
    )
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">© {year} BlockVerify — Blockchain Document Verification System</footer>"#,
        year = current_year
    )
}

/// Flash banner for codes carried in the query string after a redirect.
pub fn compose_flash(status: Option<&str>, error: Option<&str>) -> String {
    if let Some(status) = status {
        let message = match status {
            "logged_out" => Some("You have been logged out."),
            "registered" => Some("Account created. Please sign in."),
            _ => None,
        };
        if let Some(message) = message {
            return format!(r#"<div class="flash success">{message}</div>"#);
        }
    }

    if error.is_some() {
        return r#"<div class="flash error">Something went wrong. Please try again.</div>"#
            .to_string();
    }

    String::new()
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Backend timestamps arrive either with an offset or as a bare ISO local
/// time (the documents service stores `datetime.now().isoformat()`).
/// Unparseable input renders as-is.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}
