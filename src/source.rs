//! The filesystem boundary: where font files live and how they are read.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Filesystem access as the registry needs it.
///
/// [`SystemSource`](crate::SystemSource) is the implementation for the
/// running machine; tests substitute fixture-backed sources.
pub trait FontSource {
    /// The directories that may contain installed fonts.
    fn font_directories(&self) -> Vec<PathBuf>;

    /// Every file under `dir`, recursively.
    fn walk(&self, dir: &Path) -> Vec<PathBuf>;

    /// The full contents of one file.
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The conventional font locations of the running platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSource;

impl FontSource for SystemSource {
    fn font_directories(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        #[cfg(target_os = "linux")]
        {
            dirs.push(PathBuf::from("/usr/share/fonts"));
            dirs.push(PathBuf::from("/usr/local/share/fonts"));
            if let Some(home) = std::env::var_os("HOME") {
                let home = PathBuf::from(home);
                dirs.push(home.join(".local/share/fonts"));
                dirs.push(home.join(".fonts"));
            }
        }
        #[cfg(target_os = "macos")]
        {
            dirs.push(PathBuf::from("/System/Library/Fonts"));
            dirs.push(PathBuf::from("/Library/Fonts"));
            if let Some(home) = std::env::var_os("HOME") {
                dirs.push(PathBuf::from(home).join("Library/Fonts"));
            }
        }
        #[cfg(target_os = "windows")]
        {
            let windir = std::env::var_os("WINDIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("C:\\Windows"));
            dirs.push(windir.join("Fonts"));
            if let Some(local) = std::env::var_os("LOCALAPPDATA") {
                dirs.push(PathBuf::from(local).join("Microsoft\\Windows\\Fonts"));
            }
        }
        dirs
    }

    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
