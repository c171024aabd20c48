use serde::Deserialize;

/// Document record as served by the documents service. The upload response
/// omits `hash`, and older deployments omit `_id`, so both default.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub document_id: String,
    pub filename: String,
    #[serde(default)]
    pub hash: String,
    pub upload_date: String,
    pub verified: bool,
    #[serde(rename = "qrUrl", default)]
    pub qr_url: Option<String>,
}

/// Aggregate counters, fetched fresh on every page render and never cached.
/// The service speaks camelCase here; missing counters default to zero,
/// which is also the value displayed when the fetch fails outright.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentStats {
    pub total_documents: u64,
    pub verified_documents: u64,
    pub pending_verifications: u64,
    pub total_users: u64,
}

/// Response of both verification endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRecord {
    pub verified: bool,
    pub document_hash: String,
    pub filename: String,
    pub timestamp: String,
    #[serde(default)]
    pub qr_code_url: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    pub token: String,
    pub role: String,
}

/// Message-bearing payload. The auth service reports errors under `detail`
/// (and registration success under `message`); the documents service uses
/// `message`. Both fields are optional so one type covers every call site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl BackendMessage {
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.detail.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_record_parses_listing_shape() {
        let raw = r#"{
            "_id": "64f0",
            "document_id": "d-1",
            "filename": "report.pdf",
            "hash": "abc123",
            "upload_date": "2024-01-01T00:00:00",
            "verified": true,
            "qrUrl": "/qr/d-1"
        }"#;
        let record: DocumentRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.filename, "report.pdf");
        assert_eq!(record.qr_url.as_deref(), Some("/qr/d-1"));
        assert!(record.verified);
    }

    #[test]
    fn document_record_parses_upload_response_without_hash() {
        let raw = r#"{
            "message": "Document uploaded successfully",
            "document_id": "d-2",
            "_id": "64f1",
            "filename": "deed.pdf",
            "verified": false,
            "upload_date": "2024-01-02T10:30:00",
            "qrUrl": "/qr/d-2"
        }"#;
        let record: DocumentRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.hash, "");
        assert!(!record.verified);
    }

    #[test]
    fn stats_parse_camel_case_and_default_missing_fields() {
        let stats: DocumentStats =
            serde_json::from_str(r#"{"totalDocuments": 5, "verifiedDocuments": 3}"#).unwrap();
        assert_eq!(stats.total_documents, 5);
        assert_eq!(stats.verified_documents, 3);
        assert_eq!(stats.pending_verifications, 0);
        assert_eq!(stats.total_users, 0);
    }

    #[test]
    fn backend_message_prefers_message_over_detail() {
        let both: BackendMessage =
            serde_json::from_str(r#"{"message": "ok", "detail": "other"}"#).unwrap();
        assert_eq!(both.text(), Some("ok"));

        let detail_only: BackendMessage =
            serde_json::from_str(r#"{"detail": "Invalid credentials"}"#).unwrap();
        assert_eq!(detail_only.text(), Some("Invalid credentials"));

        let blank: BackendMessage = serde_json::from_str(r#"{"message": "  "}"#).unwrap();
        assert_eq!(blank.text(), None);
    }
}
