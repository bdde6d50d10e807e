use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Clinic Records";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Printed at the top of every exported patient record.
pub const CLINIC_NAME: &str = "Dr. Abdulrahman Meawad";

pub const DATABASE_FILE_NAME: &str = "clinic.db";

/// Environment variable that relocates the data directory (portable installs, tests).
pub const DATA_DIR_ENV: &str = "CLINIC_DATA_DIR";

/// Timestamp format shared by visit dates, `last_visit`, and upload dates.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Per-file cap for queued attachments (8 MB).
pub const MAX_UPLOAD_BYTES: u64 = 8 * 1024 * 1024;

pub const DEFAULT_GENDER: &str = "Male";

/// Seeded on first run. Protected from deletion.
pub const DEFAULT_ADMIN_USERNAME: &str = "abdo";
pub const DEFAULT_ADMIN_PASSWORD: &str = "202300488";
pub const DEFAULT_ADMIN_ROLE: &str = "Admin";

/// Get the user's document directory.
/// `CLINIC_DATA_DIR` wins when set; otherwise the platform documents dir, then ~/Documents.
pub fn documents_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("Documents"))
}

/// Location of the single local database file.
pub fn database_path() -> PathBuf {
    documents_dir().join(DATABASE_FILE_NAME)
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,clinic_lib=debug"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_under_documents_dir() {
        let db = database_path();
        assert!(db.starts_with(documents_dir()));
        assert!(db.ends_with(DATABASE_FILE_NAME));
    }

    #[test]
    fn upload_cap_is_eight_megabytes() {
        assert_eq!(MAX_UPLOAD_BYTES, 8_388_608);
    }
}
