//! Multipart form payloads.

use std::path::Path;

use crate::trait_::Result;

/// One file attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub field: String,

    /// File name sent to the server
    pub file_name: String,

    /// MIME type, if known
    pub content_type: Option<String>,

    /// File contents
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Create an attachment from memory.
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Set the MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read an attachment from disk. The file name is the path's last component.
    pub async fn from_path(field: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment")
            .to_string();
        let content_type = guess_content_type(&file_name);

        Ok(Self {
            field: field.into(),
            file_name,
            content_type: content_type.map(str::to_string),
            bytes,
        })
    }
}

fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "txt" => Some("text/plain"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        _ => None,
    }
}

/// A `multipart/form-data` body: text fields plus file attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// Text fields, in order
    pub fields: Vec<(String, String)>,

    /// Attachments
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add an attachment.
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    /// Whether at least one attachment is present.
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Convert into a `reqwest` form.
    pub fn into_reqwest(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type)?;
            }
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_builder() {
        let form = MultipartForm::new()
            .text("reason", "medical")
            .text("from", "2026-10-20");
        assert!(!form.has_files());

        let form = form.file(FilePart::new("file", "note.pdf", b"%PDF".to_vec()));
        assert!(form.has_files());
        assert_eq!(form.fields.len(), 2);
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("scan.PDF"), Some("application/pdf"));
        assert_eq!(guess_content_type("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(guess_content_type("README"), None);
        assert_eq!(guess_content_type("archive.zip"), None);
    }

    #[tokio::test]
    async fn test_file_part_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certificate.pdf");
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        let part = FilePart::from_path("file", &path).await.unwrap();
        assert_eq!(part.field, "file");
        assert_eq!(part.file_name, "certificate.pdf");
        assert_eq!(part.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(part.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_file_part_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FilePart::from_path("file", dir.path().join("nope.pdf")).await.unwrap_err();
        assert!(matches!(err, crate::ApiError::Io(_)));
    }

    #[test]
    fn test_into_reqwest_accepts_valid_mime() {
        let form = MultipartForm::new()
            .text("reason", "medical")
            .file(FilePart::new("file", "a.png", vec![1, 2, 3]).with_content_type("image/png"));
        assert!(form.into_reqwest().is_ok());
    }
}
