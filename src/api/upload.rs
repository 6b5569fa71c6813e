use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::Multipart;
use log::warn;

use crate::core::TabconvError;

use super::error::ApiError;

/// A file part of the upload form with a non-empty client file name.
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// The fields of the conversion form.
#[derive(Default)]
pub struct ConvertForm {
    pub csv_file: Option<UploadedFile>,
    pub json_input_file: Option<UploadedFile>,
    pub skip_headers: bool,
    pub action: Option<String>,
}

impl ConvertForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = ConvertForm::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "csv_file" | "json_input_file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    let file = (!file_name.is_empty()).then_some(UploadedFile { file_name, bytes });
                    if name == "csv_file" {
                        form.csv_file = file;
                    } else {
                        form.json_input_file = file;
                    }
                }
                // Checkbox semantics: presence alone enables it.
                "skip_headers" => form.skip_headers = true,
                "action" => form.action = Some(field.text().await?),
                _ => {}
            }
        }
        Ok(form)
    }
}

/// Reduces a client-supplied file name to a safe single path component.
///
/// Separators become underscores, anything outside `[A-Za-z0-9._-]` is
/// dropped, and leading/trailing dots and underscores are stripped. Returns
/// `None` when nothing usable is left.
pub fn secure_filename(raw: &str) -> Option<String> {
    let spaced = raw.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Input files persisted for one conversion.
///
/// The files are deleted when this value is dropped, whichever way the
/// conversion ends. Deletion is best-effort: failures are logged only.
pub struct SavedUploads {
    pub csv_path: PathBuf,
    pub json_path: Option<PathBuf>,
}

impl SavedUploads {
    /// Writes the uploads into `dir`. Anything already written is removed
    /// again if a later write fails.
    pub fn save(
        dir: &Path,
        csv: &UploadedFile,
        json: Option<&UploadedFile>,
    ) -> Result<Self, TabconvError> {
        let csv_path = upload_path(dir, csv, "upload.csv");
        write_upload(&csv_path, csv)?;
        let mut saved = SavedUploads {
            csv_path,
            json_path: None,
        };
        if let Some(json) = json {
            let json_path = upload_path(dir, json, "upload.json");
            write_upload(&json_path, json)?;
            saved.json_path = Some(json_path);
        }
        Ok(saved)
    }
}

impl Drop for SavedUploads {
    fn drop(&mut self) {
        for path in std::iter::once(&self.csv_path).chain(self.json_path.as_ref()) {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("failed to delete upload {}: {}", path.display(), e),
            }
        }
    }
}

fn upload_path(dir: &Path, file: &UploadedFile, fallback: &str) -> PathBuf {
    dir.join(secure_filename(&file.file_name).unwrap_or_else(|| fallback.to_string()))
}

fn write_upload(path: &Path, file: &UploadedFile) -> Result<(), TabconvError> {
    std::fs::write(path, &file.bytes)
        .map_err(|e| TabconvError::IoError(format!("saving upload {}: {}", path.display(), e)))
}
