pub mod models;

use std::fmt;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, multipart};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;

pub use models::{AuthTokens, BackendMessage, DocumentRecord, DocumentStats, VerificationRecord};

/// Result type used by every backend call.
pub type BackendResult<T> = Result<T, BackendError>;

/// Failure surface of the REST backends. Call sites map these to inline
/// form errors, flash messages, or a synthesized negative verification
/// result; nothing propagates further.
#[derive(Debug)]
pub enum BackendError {
    /// The request never produced an HTTP response.
    Transport(reqwest::Error),
    /// The service answered with a non-success status, possibly with a
    /// human-readable message in the body.
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    /// The response arrived but its body did not match the expected shape.
    Payload(String),
}

impl BackendError {
    /// Server-reported wording, when the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BackendError::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(err) => write!(f, "transport failure: {err}"),
            BackendError::Status { status, message } => match message {
                Some(message) => write!(f, "backend returned {status}: {message}"),
                None => write!(f, "backend returned {status}"),
            },
            BackendError::Payload(detail) => write!(f, "unexpected backend payload: {detail}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// One verification attempt, tagged by how the hash (or the document) was
/// supplied. All three entry modes funnel into a single dispatch.
#[derive(Debug, Clone)]
pub enum VerifyInput {
    File {
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
    Hash(String),
    /// Decoded text from the QR scanner; may be a bare hash or a
    /// verification URL embedding one.
    QrScan(String),
}

impl VerifyInput {
    /// Best-effort identity used when the backend call fails and the
    /// result has to be synthesized locally.
    pub fn fallback_label(&self) -> (&str, &str) {
        match self {
            VerifyInput::File { filename, .. } => (filename, ""),
            VerifyInput::Hash(hash) => ("Unknown", hash),
            VerifyInput::QrScan(text) => ("Unknown", text),
        }
    }
}

/// Typed client over the two REST backends. Cheap to clone; the inner
/// reqwest client is shared. Every request carries the configured timeout
/// so a hung backend cannot hold a page render open indefinitely.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    auth_base: String,
    documents_base: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            auth_base: config.auth_base_url.clone(),
            documents_base: config.documents_base_url.clone(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}{}", self.auth_base, path)
    }

    fn documents_url(&self, path: &str) -> String {
        format!("{}{}", self.documents_base, path)
    }

    /// Direct link to the backend's download endpoint, rendered into pages
    /// rather than proxied through this process.
    pub fn download_url(&self, document_id: &str) -> String {
        self.documents_url(&format!("/documents/download/{document_id}"))
    }

    pub async fn login(&self, email: &str, password: &str, role: &str) -> BackendResult<AuthTokens> {
        let payload = serde_json::json!({
            "email": email,
            "password": password,
            "role": role,
        });

        let response = self
            .http
            .post(self.auth_url("/login"))
            .json(&payload)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        decode(response).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> BackendResult<BackendMessage> {
        let payload = serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
            "role": role,
        });

        let response = self
            .http
            .post(self.auth_url("/register"))
            .json(&payload)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        decode(response).await
    }

    pub async fn documents(&self, token: &str) -> BackendResult<Vec<DocumentRecord>> {
        let response = self
            .http
            .get(self.documents_url("/documents"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        decode(response).await
    }

    pub async fn document_stats(&self, token: &str) -> BackendResult<DocumentStats> {
        let response = self
            .http
            .get(self.documents_url("/documents/stats"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        decode(response).await
    }

    pub async fn upload_document(
        &self,
        token: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> BackendResult<DocumentRecord> {
        let form = multipart::Form::new().part("file", file_part(filename, content_type, bytes)?);

        let response = self
            .http
            .post(self.documents_url("/documents/upload"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        decode(response).await
    }

    /// Single dispatch for the three verification entry modes.
    pub async fn verify(&self, input: VerifyInput) -> BackendResult<VerificationRecord> {
        match input {
            VerifyInput::File {
                filename,
                content_type,
                bytes,
            } => {
                let form =
                    multipart::Form::new().part("file", file_part(&filename, &content_type, bytes)?);
                let response = self
                    .http
                    .post(self.documents_url("/verify/file"))
                    .multipart(form)
                    .send()
                    .await
                    .map_err(BackendError::Transport)?;
                decode(response).await
            }
            VerifyInput::Hash(hash) => self.verify_hash(&hash).await,
            VerifyInput::QrScan(text) => self.verify_hash(hash_from_scan(&text)).await,
        }
    }

    async fn verify_hash(&self, hash: &str) -> BackendResult<VerificationRecord> {
        let response = self
            .http
            .get(self.documents_url("/verify/hash"))
            .query(&[("document_hash", hash)])
            .send()
            .await
            .map_err(BackendError::Transport)?;
        decode(response).await
    }

    pub async fn mark_verified(
        &self,
        token: &str,
        document_id: &str,
    ) -> BackendResult<BackendMessage> {
        let response = self
            .http
            .patch(self.documents_url(&format!("/documents/{document_id}/verify")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        decode(response).await
    }

    pub async fn delete_document(
        &self,
        token: &str,
        document_id: &str,
    ) -> BackendResult<BackendMessage> {
        let response = self
            .http
            .delete(self.documents_url(&format!("/documents/{document_id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(BackendError::Transport)?;
        decode(response).await
    }
}

fn file_part(filename: &str, content_type: &str, bytes: Vec<u8>) -> BackendResult<multipart::Part> {
    multipart::Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str(content_type)
        .map_err(|_| BackendError::Payload(format!("invalid content type `{content_type}`")))
}

/// QR codes in the wild encode either the bare hash or a verification URL
/// whose last path segment is the hash. Both normalize to the hash.
pub fn hash_from_scan(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.contains("://") {
        trimmed
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(trimmed)
    } else {
        trimmed
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(BackendError::Transport)?;

    if !status.is_success() {
        let message = serde_json::from_str::<BackendMessage>(&body)
            .ok()
            .and_then(|payload| payload.text().map(str::to_string));
        return Err(BackendError::Status { status, message });
    }

    serde_json::from_str(&body).map_err(|err| {
        let preview = if body.len() > 200 {
            &body[..200]
        } else {
            body.as_str()
        };
        BackendError::Payload(format!("{err} (body: {preview})"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_text_passes_bare_hash_through() {
        assert_eq!(hash_from_scan("abc123"), "abc123");
        assert_eq!(hash_from_scan("  abc123\n"), "abc123");
    }

    #[test]
    fn scan_text_extracts_hash_from_verification_url() {
        assert_eq!(
            hash_from_scan("https://verify.example.com/verify/abc123"),
            "abc123"
        );
        assert_eq!(
            hash_from_scan("https://verify.example.com/verify/abc123/"),
            "abc123"
        );
    }

    #[test]
    fn fallback_labels_are_never_both_empty() {
        let hash_input = VerifyInput::Hash("abc123".to_string());
        let (name, hash) = hash_input.fallback_label();
        assert_eq!(name, "Unknown");
        assert_eq!(hash, "abc123");

        let file_input = VerifyInput::File {
            filename: "deed.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Vec::new(),
        };
        let (name, hash) = file_input.fallback_label();
        assert_eq!(name, "deed.pdf");
        assert_eq!(hash, "");
    }

    #[test]
    fn status_error_exposes_server_wording() {
        let err = BackendError::Status {
            status: StatusCode::NOT_FOUND,
            message: Some("Document not found".to_string()),
        };
        assert_eq!(err.server_message(), Some("Document not found"));
        assert!(err.to_string().contains("404"));

        let bare = BackendError::Status {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        };
        assert_eq!(bare.server_message(), None);
    }
}
