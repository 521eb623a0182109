//! Multipart form for the upload endpoints: `image` (single) or repeated `files`.

use crate::error::ClientError;
use reqwest::multipart::{Form, Part};

pub const IMAGE_FIELD: &str = "image";
pub const FILES_FIELD: &str = "files";

#[derive(Clone, Debug)]
pub struct UploadPart {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub struct UploadForm {
    parts: Vec<UploadPart>,
    text: Vec<(String, String)>,
}

impl UploadForm {
    pub fn new() -> Self {
        UploadForm::default()
    }

    pub fn image(self, file_name: impl Into<String>, bytes: Vec<u8>, mime: Option<&str>) -> Self {
        self.part(IMAGE_FIELD, file_name, bytes, mime)
    }

    /// Adds one more `files` part; call repeatedly for multiple files.
    pub fn file(self, file_name: impl Into<String>, bytes: Vec<u8>, mime: Option<&str>) -> Self {
        self.part(FILES_FIELD, file_name, bytes, mime)
    }

    pub fn part(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        mime: Option<&str>,
    ) -> Self {
        self.parts.push(UploadPart {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.map(str::to_string),
            bytes,
        });
        self
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.push((name.into(), value.into()));
        self
    }

    pub fn parts(&self) -> &[UploadPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.text.is_empty()
    }

    pub fn into_multipart(self) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for (name, value) in self.text {
            form = form.text(name, value);
        }
        for p in self.parts {
            let mut part = Part::bytes(p.bytes).file_name(p.file_name);
            if let Some(mime) = p.mime {
                part = part
                    .mime_str(&mime)
                    .map_err(|e| ClientError::InvalidPayload(format!("invalid mime type {}: {}", mime, e)))?;
            }
            form = form.part(p.field, part);
        }
        Ok(form)
    }
}
