//! Reading uploads into memory before they are attached to a patient.
//!
//! Nothing here touches the database: files are read, size-checked, and
//! classified into a [`PendingAttachment`] that the caller passes into the
//! next `add_patient` / `update_patient` call.

use std::path::Path;

use printpdf::image_crate;

use crate::config;
use crate::error::ClinicError;
use crate::models::enums::FileType;
use crate::models::PendingAttachment;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];

/// Result of queueing several files at once.
#[derive(Debug, Default)]
pub struct QueuedFiles {
    pub queued: Vec<PendingAttachment>,
    /// Names of files rejected for size or read errors.
    pub skipped: Vec<String>,
}

/// Classify by extension first, then by guessed MIME type.
pub fn classify_file(path: &Path) -> FileType {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return FileType::Image;
    }
    if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
        return FileType::Document;
    }

    match mime_guess::from_path(path).first() {
        Some(mime) if mime.type_() == mime_guess::mime::IMAGE => FileType::Image,
        _ => FileType::Other,
    }
}

/// Read one file fully into memory. Files over the upload cap are rejected.
pub fn read_attachment(path: &Path) -> Result<PendingAttachment, ClinicError> {
    let file_name = display_name(path);
    let size = std::fs::metadata(path)
        .map_err(|e| ClinicError::validation(format!("Cannot read {file_name}: {e}")))?
        .len();
    if size > config::MAX_UPLOAD_BYTES {
        return Err(ClinicError::validation(format!(
            "{file_name} is larger than 8MB and was skipped."
        )));
    }

    let data = std::fs::read(path)
        .map_err(|e| ClinicError::validation(format!("Cannot read {file_name}: {e}")))?;

    Ok(PendingAttachment {
        file_type: classify_file(path),
        file_name,
        data,
    })
}

/// Queue many files, skipping the ones that cannot be attached.
pub fn read_attachments<P: AsRef<Path>>(paths: &[P]) -> QueuedFiles {
    let mut result = QueuedFiles::default();
    for path in paths {
        let path = path.as_ref();
        match read_attachment(path) {
            Ok(file) => result.queued.push(file),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Attachment skipped");
                result.skipped.push(display_name(path));
            }
        }
    }
    tracing::debug!(
        queued = result.queued.len(),
        skipped = result.skipped.len(),
        "Attachments queued"
    );
    result
}

/// Read a patient photo and check that it decodes as an image.
pub fn read_photo(path: &Path) -> Result<Vec<u8>, ClinicError> {
    let data = std::fs::read(path)
        .map_err(|e| ClinicError::validation(format!("Failed to load image: {e}")))?;
    image_crate::load_from_memory(&data)
        .map_err(|e| ClinicError::validation(format!("Failed to load image: {e}")))?;
    Ok(data)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
