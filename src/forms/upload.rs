//! Upload sub-flow: send one selected file ahead of the form submission and
//! hand back the stored reference.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use crate::api::{Endpoint, MultipartFile, Transport, UploadResponse};

/// Multipart field name the upload endpoint reads.
pub const UPLOAD_FIELD: &str = "myfile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = fs::read(path).map_err(|err| UploadError::Read(err.to_string()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| UploadError::Read(format!("{} has no file name", path.display())))?;
        Ok(Self::new(file_name, bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("could not read file: {0}")]
    Read(String),
    #[error("upload transport failed: {0}")]
    Transport(String),
    #[error("File upload failed (status {0})")]
    Status(u16),
    #[error("upload response was malformed: {0}")]
    Malformed(String),
}

/// Sends `file` as multipart form data and returns the stored reference.
pub fn upload_file<T: Transport + ?Sized>(
    transport: &T,
    file: SelectedFile,
) -> Result<String, UploadError> {
    let file_name = file.file_name.clone();
    let request = Endpoint::upload_file().request().with_file(MultipartFile {
        field: UPLOAD_FIELD,
        file_name: file.file_name,
        content_type: file.content_type,
        bytes: file.bytes,
    });

    let response = transport.send(&request).map_err(|err| {
        error!(file = %file_name, error = %err, "upload transport failure");
        UploadError::Transport(err.message)
    })?;

    if !response.is_ok() {
        error!(file = %file_name, status = response.status, "File upload failed");
        return Err(UploadError::Status(response.status));
    }

    let body: UploadResponse = response
        .json()
        .map_err(|err| UploadError::Malformed(err.to_string()))?;
    info!(file = %file_name, reference = %body.file_url, "file uploaded");
    Ok(body.file_url)
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
