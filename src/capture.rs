//! Screenshot persistence

use crate::{Error, Result};
use log::info;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, used to stamp output files.
pub fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// `<dir>/<prefix><stamp>.png`, with `-N` appended for the Nth collision.
pub fn output_path(dir: &Path, prefix: &str, stamp: u128, attempt: u32) -> PathBuf {
    if attempt == 0 {
        dir.join(format!("{prefix}{stamp}.png"))
    } else {
        dir.join(format!("{prefix}{stamp}-{attempt}.png"))
    }
}

/// Write `png` to a fresh timestamped file under `dir`, creating `dir` as
/// needed. Existing files are never overwritten.
pub fn save_screenshot(dir: &Path, prefix: &str, png: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|source| Error::IoWrite { path: dir.to_path_buf(), source })?;

    let stamp = timestamp_millis();
    let mut attempt = 0;
    loop {
        let path = output_path(dir, prefix, stamp, attempt);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(png).map_err(|source| Error::IoWrite { path: path.clone(), source })?;
                info!("Saved screenshot: {}", path.display());
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
            Err(source) => return Err(Error::IoWrite { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("canvas-replay-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn path_carries_prefix_and_stamp() {
        let p = output_path(Path::new("out"), "result", 1700000000123, 0);
        assert_eq!(p, PathBuf::from("out/result1700000000123.png"));
        let p = output_path(Path::new("out"), "result", 1700000000123, 2);
        assert_eq!(p, PathBuf::from("out/result1700000000123-2.png"));
    }

    #[test]
    fn creates_nested_directories() {
        let dir = scratch_dir("nested").join("a").join("b");
        let path = save_screenshot(&dir, "shot", b"\x89PNG").unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");
        std::fs::remove_dir_all(scratch_dir("nested")).ok();
    }

    #[test]
    fn never_overwrites_existing_files() {
        let dir = scratch_dir("collide");
        let a = save_screenshot(&dir, "shot", b"first").unwrap();
        let b = save_screenshot(&dir, "shot", b"second").unwrap();
        assert_ne!(a, b);
        assert_eq!(std::fs::read(&a).unwrap(), b"first");
        assert_eq!(std::fs::read(&b).unwrap(), b"second");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unwritable_target_is_io_write() {
        let dir = scratch_dir("blocked");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        let err = save_screenshot(&file.join("sub"), "shot", b"png").unwrap_err();
        assert!(matches!(err, Error::IoWrite { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }
}
