use std::fs;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use tracing::{info, warn};

/// Loads the branding image as base64. A missing or unreadable logo only
/// degrades output, so every failure yields an empty string.
pub fn load_logo_base64(images_dir: &Path, logo_file: Option<&str>) -> String {
    let Some(name) = logo_file.filter(|n| !n.trim().is_empty()) else {
        return String::new();
    };
    let path = images_dir.join(name);
    match fs::read(&path) {
        Ok(bytes) => {
            info!("Loaded branding image {} ({} bytes)", path.display(), bytes.len());
            general_purpose::STANDARD.encode(bytes)
        }
        Err(e) => {
            warn!("Branding image {} not available: {e}", path.display());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_logo_is_base64_encoded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("logo.png"), b"\x89PNG").unwrap();
        assert_eq!(load_logo_base64(dir.path(), Some("logo.png")), "iVBORw==");
    }

    #[test]
    fn test_missing_logo_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_logo_base64(dir.path(), Some("absent.png")), "");
    }

    #[test]
    fn test_unconfigured_logo_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_logo_base64(dir.path(), None), "");
        assert_eq!(load_logo_base64(dir.path(), Some("  ")), "");
    }
}
