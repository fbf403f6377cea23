//! On-disk body storage.
//!
//! Request and response bodies are written once at capture time to a stable
//! path derived from the record id, and read back lazily when a section is
//! rendered or a full transcript is exported. Reads are best-effort: an
//! unreadable or non-UTF-8 body surfaces as [`BodyError::Unavailable`] and
//! callers render a placeholder instead.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Which half of the exchange a body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySide {
    Request,
    Response,
}

impl BodySide {
    /// Capitalized label used in rendered sections.
    pub fn label(&self) -> &'static str {
        match self {
            BodySide::Request => "Request",
            BodySide::Response => "Response",
        }
    }

    fn file_prefix(&self) -> &'static str {
        match self {
            BodySide::Request => "nfx_request_",
            BodySide::Response => "nfx_response_",
        }
    }
}

/// Errors raised by body storage.
#[derive(Debug)]
pub enum BodyError {
    /// The body could not be read or is not valid UTF-8.
    Unavailable {
        /// Path that was read
        path: PathBuf,
        /// Why it could not be used
        reason: String,
    },

    /// Writing a body to disk failed.
    Io(std::io::Error),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::Unavailable { path, reason } => {
                write!(f, "Body at {} is unavailable: {}", path.display(), reason)
            }
            BodyError::Io(err) => write!(f, "Body storage error: {}", err),
        }
    }
}

impl std::error::Error for BodyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BodyError::Io(err) => Some(err),
            BodyError::Unavailable { .. } => None,
        }
    }
}

impl From<std::io::Error> for BodyError {
    fn from(err: std::io::Error) -> Self {
        BodyError::Io(err)
    }
}

/// Reads a stored body as UTF-8 text.
///
/// # Errors
///
/// Returns `BodyError::Unavailable` if the file is missing, unreadable or
/// not valid UTF-8.
pub fn read_body(path: &Path) -> Result<String, BodyError> {
    let bytes = fs::read(path).map_err(|e| BodyError::Unavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    String::from_utf8(bytes).map_err(|e| BodyError::Unavailable {
        path: path.to_path_buf(),
        reason: format!("invalid UTF-8: {}", e.utf8_error()),
    })
}

/// Directory-backed store of captured bodies, addressed by record id.
#[derive(Debug, Clone)]
pub struct BodyStore {
    dir: PathBuf,
}

impl BodyStore {
    /// Creates a store rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stable path of the body for `record_id` on `side`.
    pub fn path_for(&self, record_id: &str, side: BodySide) -> PathBuf {
        self.dir.join(format!("{}{}", side.file_prefix(), record_id))
    }

    /// Writes a body and returns its path and length.
    ///
    /// # Errors
    ///
    /// Returns `BodyError::Io` if the directory cannot be created or the file
    /// cannot be written. A partially written file is removed first.
    pub fn write(
        &self,
        record_id: &str,
        side: BodySide,
        bytes: &[u8],
    ) -> Result<(PathBuf, u64), BodyError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let path = self.path_for(record_id, side);
        let file = fs::File::create(&path)?;
        write_or_remove(&path, file, bytes)?;

        log::debug!("Stored {} bytes of {} body at {}", bytes.len(), side.label(), path.display());
        Ok((path, bytes.len() as u64))
    }

    /// Deletes both bodies of a record. Missing files are ignored.
    pub fn remove(&self, record_id: &str) {
        for side in [BodySide::Request, BodySide::Response] {
            remove_body_file(&self.path_for(record_id, side));
        }
    }
}

/// Writes `bytes` through `out`, deleting `path` if anything fails so no
/// truncated body outlives the error.
fn write_or_remove<W: Write>(path: &Path, mut out: W, bytes: &[u8]) -> std::io::Result<()> {
    let result = out.write_all(bytes).and_then(|_| out.flush());
    drop(out);

    if result.is_err() {
        remove_body_file(path);
    }
    result
}

/// Deletes a body file, logging anything other than "not found".
pub(crate) fn remove_body_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("Failed to remove body file {}: {}", path.display(), e);
        }
    }
}
