use std::{env, time::Duration};

/// Runtime configuration, read once at startup.
///
/// The auth service and the documents service are separate deployments with
/// separate base URLs; both verification endpoints live on the documents
/// service.
pub struct AppConfig {
    pub port: u16,
    pub auth_base_url: String,
    pub documents_base_url: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            auth_base_url: normalize_base_url(
                env::var("AUTH_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
            ),
            documents_base_url: normalize_base_url(
                env::var("DOCUMENTS_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:8002".to_string()),
            ),
            request_timeout: Duration::from_secs(
                env::var("BACKEND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

fn normalize_base_url(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:8002/".to_string()),
            "http://localhost:8002"
        );
        assert_eq!(
            normalize_base_url(" http://auth.internal ".to_string()),
            "http://auth.internal"
        );
    }
}
