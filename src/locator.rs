//! Resource locators: file paths plus the standard-stream designators.
//!
//! A `Locator` identifies exactly one readable or writable stream. Resolution
//! is pure and total: the same locator always opens the same stream, and the
//! POSIX stdin/stdout designators are usable wherever a path is.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// A readable or writable resource handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Standard input (POSIX fd 0)
    Stdin,
    /// Standard output (POSIX fd 1)
    Stdout,
    /// A filesystem path
    Path(PathBuf),
    /// The empty output of a write-suppressing codec
    Suppressed,
}

impl Locator {
    /// Create a path locator.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Locator::Path(path.into())
    }

    /// Human-readable rendering used only for observability messages.
    pub fn friendly(&self) -> Cow<'_, str> {
        match self {
            Locator::Stdin => "<stdin>".into(),
            Locator::Stdout => "<stdout>".into(),
            Locator::Suppressed => "<none>".into(),
            Locator::Path(p) => p.to_string_lossy(),
        }
    }

    /// Open a fresh readable stream positioned at the beginning.
    pub fn open_read(&self) -> io::Result<Box<dyn Read + Send>> {
        match self {
            Locator::Stdin => Ok(Box::new(io::stdin())),
            Locator::Path(p) => Ok(Box::new(File::open(p)?)),
            Locator::Stdout | Locator::Suppressed => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("{} is not readable", self.friendly()),
            )),
        }
    }

    /// Open a fresh writable stream, truncating an existing file.
    pub fn open_write(&self) -> io::Result<Box<dyn Write + Send>> {
        match self {
            Locator::Stdout => Ok(Box::new(io::stdout())),
            Locator::Path(p) => Ok(Box::new(File::create(p)?)),
            Locator::Stdin | Locator::Suppressed => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("{} is not writable", self.friendly()),
            )),
        }
    }

    /// Directory against which references inside this resource resolve.
    /// The current working directory for the standard streams.
    pub fn base_dir(&self) -> PathBuf {
        match self {
            Locator::Path(p) => p
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            _ => PathBuf::from("."),
        }
    }

    /// File extension including the leading dot, when this locator names a
    /// path with one.
    pub fn extension(&self) -> Option<String> {
        match self {
            Locator::Path(p) => p
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{ext}")),
            _ => None,
        }
    }
}

/// Strip the final extension from a path string, if any.
pub fn path_without_ext(name: &str) -> &str {
    match Path::new(name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => &name[..name.len() - ext.len() - 1],
        None => name,
    }
}
