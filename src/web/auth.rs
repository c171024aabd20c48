use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::warn;

use crate::backend::BackendError;
use crate::session::{Role, Session};
use crate::web::{
    AppState,
    templates::{PageShell, compose_flash, escape_html, render_page},
};

/// Client-side route guard. Missing session or wrong role redirects to the
/// login page. This is a UX convenience only: the token is not validated
/// here, and every backend call independently rejects bad tokens.
pub fn require_role(jar: &CookieJar, role: Role) -> Result<Session, Redirect> {
    match Session::from_jar(jar) {
        Some(session) if session.role == role => Ok(session),
        _ => Err(Redirect::to("/login")),
    }
}

#[derive(Default, Deserialize)]
pub struct AuthQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub role: String,
}

pub async fn login_page(jar: CookieJar, Query(params): Query<AuthQuery>) -> Html<String> {
    let session = Session::from_jar(&jar);
    let flash = compose_flash(params.status.as_deref(), params.error.as_deref());
    Html(render_login_page(session.as_ref(), &flash, None, "", "user"))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    let email = form.email.trim();
    let role = if form.role.trim().is_empty() {
        "user"
    } else {
        form.role.trim()
    };

    match state.backend().login(email, &form.password, role).await {
        Ok(tokens) => {
            // The server's role decides the landing route; anything that is
            // not "admin" lands on the user dashboard.
            let granted = Role::parse(&tokens.role).unwrap_or(Role::User);
            let jar = Session::store(jar, &tokens.token, granted);
            Ok((jar, Redirect::to(granted.home_path())))
        }
        Err(err) => {
            warn!(%err, email, "login attempt failed");
            let message = err
                .server_message()
                .unwrap_or("Login failed. Please check your credentials and try again.")
                .to_string();
            Err((
                login_error_status(&err),
                Html(render_login_page(None, "", Some(&message), email, role)),
            ))
        }
    }
}

pub async fn register_page(jar: CookieJar) -> Html<String> {
    let session = Session::from_jar(&jar);
    Html(render_register_page(
        session.as_ref(),
        &RegisterForm::default(),
        &RegisterErrors::default(),
    ))
}

pub async fn process_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    let session = Session::from_jar(&jar);
    let mut errors = RegisterErrors::default();

    if form.name.trim().is_empty() {
        errors.name = Some("Name required");
    }
    if form.email.trim().is_empty() {
        errors.email = Some("Email required");
    }
    if form.password.is_empty() {
        errors.password = Some("Password required");
    }
    if form.password != form.confirm_password {
        errors.confirm_password = Some("Passwords must match");
    }

    if errors.any() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render_register_page(session.as_ref(), &form, &errors)),
        ));
    }

    let role = if form.role.trim().is_empty() {
        "user"
    } else {
        form.role.trim()
    };

    match state
        .backend()
        .register(form.name.trim(), form.email.trim(), &form.password, role)
        .await
    {
        Ok(_) => Ok(Redirect::to("/login?status=registered")),
        Err(err) => {
            warn!(%err, email = form.email.trim(), "registration failed");
            errors.server = Some(
                err.server_message()
                    .unwrap_or("Registration failed")
                    .to_string(),
            );
            Err((
                login_error_status(&err),
                Html(render_register_page(session.as_ref(), &form, &errors)),
            ))
        }
    }
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (Session::clear(jar), Redirect::to("/?status=logged_out"))
}

fn login_error_status(err: &BackendError) -> StatusCode {
    match err {
        BackendError::Status { status, .. } if status.is_client_error() => *status,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            role: "user".to_string(),
        }
    }
}

#[derive(Default)]
struct RegisterErrors {
    name: Option<&'static str>,
    email: Option<&'static str>,
    password: Option<&'static str>,
    confirm_password: Option<&'static str>,
    server: Option<String>,
}

impl RegisterErrors {
    fn any(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.password.is_some()
            || self.confirm_password.is_some()
    }
}

const AUTH_STYLES: &str = r#"
.auth-panel { max-width: 440px; margin: 2rem auto; background: #1e293bcc; border: 1px solid #33415580; border-radius: 18px; padding: 2.25rem; }
.auth-panel h1 { margin: 0 0 0.4rem; text-align: center; color: #f8fafc; }
.auth-panel .tagline { margin: 0 0 1.75rem; text-align: center; color: #94a3b8; font-size: 0.95rem; }
.auth-panel button[type="submit"] { width: 100%; margin-top: 0.5rem; }
.auth-alt { margin-top: 1.5rem; text-align: center; font-size: 0.9rem; color: #94a3b8; }
"#;

fn render_role_tabs(selected: &str) -> String {
    let roles = [("user", "User"), ("admin", "Admin")];
    let tabs = roles
        .iter()
        .map(|(value, label)| {
            let checked = if *value == selected { " checked" } else { "" };
            format!(
                r#"<label><input type="radio" name="role" value="{value}"{checked}><span>{label}</span></label>"#
            )
        })
        .collect::<String>();
    format!(r#"<div class="role-tabs">{tabs}</div>"#)
}

fn render_login_page(
    session: Option<&Session>,
    flash: &str,
    error: Option<&str>,
    email: &str,
    role: &str,
) -> String {
    let error_html = error
        .map(|message| format!(r#"<div class="form-error">{}</div>"#, escape_html(message)))
        .unwrap_or_default();

    let main = format!(
        r#"        <section class="auth-panel">
            <h1>Tamper Proof</h1>
            <p class="tagline">Blockchain Document Verification</p>
            {flash}
            {error_html}
            <form method="post" action="/login" data-busy-label="Authenticating…">
                <label>Login As</label>
                {role_tabs}
                <div class="field">
                    <label for="email">Email</label>
                    <input id="email" name="email" type="email" value="{email}" placeholder="your@email.com" required>
                </div>
                <div class="field">
                    <label for="password">Password</label>
                    <input id="password" name="password" type="password" placeholder="••••••••" required>
                </div>
                <button type="submit">Login</button>
            </form>
            <p class="auth-alt">No account yet? <a href="/register">Register</a></p>
        </section>"#,
        flash = flash,
        error_html = error_html,
        role_tabs = render_role_tabs(role),
        email = escape_html(email),
    );

    render_page(
        PageShell::new("Login — BlockVerify", "", session)
            .with_styles(AUTH_STYLES)
            .with_script(crate::web::widgets::FORM_BUSY_SCRIPT)
            .with_main(main),
    )
}

fn render_register_page(
    session: Option<&Session>,
    form: &RegisterForm,
    errors: &RegisterErrors,
) -> String {
    let server_error = errors
        .server
        .as_deref()
        .map(|message| format!(r#"<div class="form-error">{}</div>"#, escape_html(message)))
        .unwrap_or_default();

    let field_error = |message: Option<&'static str>| {
        message
            .map(|m| format!(r#"<p class="field-error">{m}</p>"#))
            .unwrap_or_default()
    };

    let role = if form.role.trim().is_empty() {
        "user"
    } else {
        form.role.trim()
    };

    let main = format!(
        r#"        <section class="auth-panel">
            <h1>Create Account</h1>
            <p class="tagline">Join the BlockVerify network</p>
            {server_error}
            <form method="post" action="/register" data-busy-label="Creating Account…">
                <label>Register As</label>
                {role_tabs}
                <div class="field">
                    <label for="name">Full Name</label>
                    <input id="name" name="name" type="text" value="{name}" placeholder="John Doe">
                    {name_error}
                </div>
                <div class="field">
                    <label for="email">Email</label>
                    <input id="email" name="email" type="email" value="{email}" placeholder="your@email.com">
                    {email_error}
                </div>
                <div class="field">
                    <label for="password">Password</label>
                    <input id="password" name="password" type="password" placeholder="••••••••">
                    {password_error}
                </div>
                <div class="field">
                    <label for="confirm_password">Confirm Password</label>
                    <input id="confirm_password" name="confirm_password" type="password" placeholder="••••••••">
                    {confirm_error}
                </div>
                <button type="submit">Register Now</button>
            </form>
            <p class="auth-alt">Already have an account? <a href="/login">Sign in</a></p>
        </section>"#,
        server_error = server_error,
        role_tabs = render_role_tabs(role),
        name = escape_html(&form.name),
        name_error = field_error(errors.name),
        email = escape_html(&form.email),
        email_error = field_error(errors.email),
        password_error = field_error(errors.password),
        confirm_error = field_error(errors.confirm_password),
    );

    render_page(
        PageShell::new("Register — BlockVerify", "", session)
            .with_styles(AUTH_STYLES)
            .with_script(crate::web::widgets::FORM_BUSY_SCRIPT)
            .with_main(main),
    )
}
