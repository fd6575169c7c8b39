//! Asset locations and the load-failure policy.
//!
//! Every asset is optional: a failed load is reported once through the log and
//! the caller carries on with an empty stand-in (blank texture, default font,
//! silent sound).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const FONT_PATH: &str = "ASSETS/FONTS/ariblk.ttf";
pub const HELICOPTER_TEXTURE_PATH: &str = "ASSETS/IMAGES/helicopter.png";
pub const HELICOPTER_SOUND_PATH: &str = "ASSETS/AUDIO/helicopter.wav";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Font,
    Texture,
    Audio,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Font => "font",
            Self::Texture => "texture",
            Self::Audio => "audio",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("problem loading {kind} '{}': {reason}", .path.display())]
pub struct AssetLoadError {
    pub kind: AssetKind,
    pub path: PathBuf,
    pub reason: String,
}

impl AssetLoadError {
    pub fn new(kind: AssetKind, path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Read an asset file into memory.
pub fn read_asset(kind: AssetKind, path: &Path) -> Result<Vec<u8>, AssetLoadError> {
    let bytes = fs::read(path).map_err(|e| AssetLoadError::new(kind, path, e))?;
    if bytes.is_empty() {
        return Err(AssetLoadError::new(kind, path, "file is empty"));
    }
    Ok(bytes)
}

/// Log a load failure and turn the result into an option.
pub fn load_or_report<T>(result: Result<T, AssetLoadError>) -> Option<T> {
    match result {
        Ok(asset) => Some(asset),
        Err(err) => {
            log::error!("{err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "aw_asset_test_{}_{}_{}.bin",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn missing_file_names_kind_and_path() {
        let path = temp_file_path("missing");
        let err = read_asset(AssetKind::Texture, &path).expect_err("file does not exist");
        assert_eq!(err.kind, AssetKind::Texture);
        let message = err.to_string();
        assert!(message.contains("texture"));
        assert!(message.contains("aw_asset_test_missing"));
    }

    #[test]
    fn empty_file_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, b"").expect("write temp file");
        let err = read_asset(AssetKind::Font, &path).expect_err("empty file should fail");
        assert!(err.reason.contains("empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn existing_file_is_read() {
        let path = temp_file_path("present");
        fs::write(&path, b"RIFF").expect("write temp file");
        let bytes = read_asset(AssetKind::Audio, &path).expect("should read");
        assert_eq!(bytes, b"RIFF");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_or_report_degrades_to_none() {
        let failed: Result<u32, _> = Err(AssetLoadError::new(AssetKind::Audio, "x.wav", "boom"));
        assert_eq!(load_or_report(failed), None);
        assert_eq!(load_or_report::<u32>(Ok(7)), Some(7));
    }
}
