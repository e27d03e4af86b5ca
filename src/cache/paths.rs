// Cache path utilities.
// Resolves the on-disk cache directory and maps storage keys to file names.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/roster on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "roster").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the file backing `key` inside `dir`.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", encode_key(key)))
}

/// Encode a key as a file name.
///
/// Bytes outside `[A-Za-z0-9.-]` are percent-encoded, so distinct keys
/// always map to distinct names.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}
