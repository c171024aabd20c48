use std::fmt;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration as CookieDuration;

pub const TOKEN_COOKIE: &str = "token";
pub const ROLE_COOKIE: &str = "role";
pub const SESSION_TTL_DAYS: i64 = 7;

/// Two-valued tag deciding which dashboard a session may reach.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Unknown role strings read as "no role", which downstream means
    /// logged out.
    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Landing route after a successful login with this role.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::User => "/user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-held proof of identity: the backend-issued token plus the role it
/// was issued for. The pair lives in two cookies and nowhere else; this tier
/// never inspects or validates the token. A stale or forged token is only
/// ever rejected by the backend.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub role: Role,
}

impl Session {
    /// Reads the session out of the cookie jar. Either cookie missing, an
    /// empty token, or an unknown role all read as logged out.
    pub fn from_jar(jar: &CookieJar) -> Option<Session> {
        let token = jar.get(TOKEN_COOKIE)?.value().to_string();
        if token.is_empty() {
            return None;
        }
        let role = Role::parse(jar.get(ROLE_COOKIE)?.value())?;
        Some(Session { token, role })
    }

    /// Returns a jar with both session cookies set. Pure transition: the
    /// input jar is consumed, no ambient state is touched.
    pub fn store(jar: CookieJar, token: &str, role: Role) -> CookieJar {
        jar.add(session_cookie(TOKEN_COOKIE, token.to_string()))
            .add(session_cookie(ROLE_COOKIE, role.as_str().to_string()))
    }

    /// Returns a jar with both session cookies removed.
    pub fn clear(jar: CookieJar) -> CookieJar {
        jar.remove(removal_cookie(TOKEN_COOKIE))
            .remove(removal_cookie(ROLE_COOKIE))
    }
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::days(SESSION_TTL_DAYS));
    cookie
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::seconds(0));
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" user "), Some(Role::User));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn store_then_read_roundtrips() {
        let jar = Session::store(CookieJar::new(), "t1", Role::Admin);
        let session = Session::from_jar(&jar).expect("session should be present");
        assert_eq!(session.token, "t1");
        assert_eq!(session.role, Role::Admin);
    }

    #[test]
    fn missing_either_cookie_reads_as_logged_out() {
        assert!(Session::from_jar(&CookieJar::new()).is_none());

        let token_only = CookieJar::new().add(session_cookie(TOKEN_COOKIE, "t1".to_string()));
        assert!(Session::from_jar(&token_only).is_none());

        let role_only = CookieJar::new().add(session_cookie(ROLE_COOKIE, "user".to_string()));
        assert!(Session::from_jar(&role_only).is_none());
    }

    #[test]
    fn empty_token_or_bad_role_reads_as_logged_out() {
        let empty_token = Session::store(CookieJar::new(), "", Role::User);
        assert!(Session::from_jar(&empty_token).is_none());

        let jar = CookieJar::new()
            .add(session_cookie(TOKEN_COOKIE, "t1".to_string()))
            .add(session_cookie(ROLE_COOKIE, "root".to_string()));
        assert!(Session::from_jar(&jar).is_none());
    }

    #[test]
    fn clear_removes_both_cookies() {
        let jar = Session::store(CookieJar::new(), "t1", Role::User);
        let cleared = Session::clear(jar);
        assert!(Session::from_jar(&cleared).is_none());
        assert!(cleared.get(TOKEN_COOKIE).is_none());
        assert!(cleared.get(ROLE_COOKIE).is_none());
    }
}
