use std::path::Path;

use axum::extract::Multipart;

/// Result type used by the multipart helpers.
pub type UploadResult<T> = Result<T, UploadError>;

/// Error returned when reading an uploaded file out of a form.
#[derive(Debug)]
pub struct UploadError {
    message: String,
}

impl UploadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UploadError {}

/// A file read fully into memory. Uploads are never written to disk here;
/// the bytes go straight back out in the multipart request to the backend.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Reads the first file carried under `field_name`, validating its
/// extension against `allowed_extensions` (lowercase, no dots). Text
/// fields are skipped; an empty allowlist accepts any extension.
pub async fn read_file_field(
    mut multipart: Multipart,
    field_name: &str,
    allowed_extensions: &[&str],
) -> UploadResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| UploadError::new(format!("failed to parse upload form: {err}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if name != field_name {
            return Err(UploadError::new(format!(
                "unsupported file field `{name}`"
            )));
        }

        let extension = Path::new(&original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !allowed_extensions.is_empty() && !allowed_extensions.contains(&extension.as_str()) {
            return Err(UploadError::new(format!(
                "`{extension}` files are not supported"
            )));
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

        let mut filename = sanitize_filename::sanitize(&original_name);
        if filename.is_empty() {
            filename = if extension.is_empty() {
                "upload.bin".to_string()
            } else {
                format!("upload.{extension}")
            };
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|err| UploadError::new(format!("failed to read upload data: {err}")))?
            .to_vec();

        if bytes.is_empty() {
            return Err(UploadError::new("the selected file is empty"));
        }

        return Ok(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    Err(UploadError::new("no file was selected"))
}
