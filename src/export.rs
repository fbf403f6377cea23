//! Log transcripts and sharing.
//!
//! A transcript is the plain-text form of a record: the three formatted
//! sections under fixed headers, an attribution line and, on request, the
//! raw bodies. Transcripts are shared as a `.txt` file when one can be
//! written, or as raw text otherwise.

use crate::body::read_body;
use crate::formatter;
use crate::models::HttpLogRecord;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Attribution appended to every transcript.
pub const ATTRIBUTION: &str = "logged via netfox - [https://github.com/kasketis/netfox]";

/// Default name of the exported log file.
pub const DEFAULT_FILE_NAME: &str = "log.txt";

/// Errors that can occur while writing a transcript file.
#[derive(Debug)]
pub enum ExportError {
    /// The file could not be written.
    Io(std::io::Error),

    /// The text cannot be stored as a plain-text log.
    Encoding(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "Failed to write log file: {}", err),
            ExportError::Encoding(msg) => write!(f, "Log text cannot be encoded: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Encoding(_) => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

/// What to hand to the platform share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharePayload {
    /// A written log file.
    File {
        path: PathBuf,
        subject: String,
    },
    /// Raw text, used for curl exports and when no file could be written.
    Text {
        content: String,
        subject: String,
    },
}

/// Renders transcripts and writes them where the share sheet can pick
/// them up.
#[derive(Debug, Clone)]
pub struct LogExporter {
    export_dir: PathBuf,
    file_name: String,
}

impl Default for LogExporter {
    fn default() -> Self {
        Self::new(std::env::temp_dir(), DEFAULT_FILE_NAME)
    }
}

impl LogExporter {
    /// Creates an exporter writing `file_name` inside `export_dir`.
    ///
    /// # Arguments
    ///
    /// * `export_dir` - Directory the log file is written to; it must exist
    /// * `file_name` - Name of the log file, e.g. `log.txt`
    pub fn new(export_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            export_dir: export_dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Path the next transcript file is written to.
    pub fn file_path(&self) -> PathBuf {
        self.export_dir.join(&self.file_name)
    }

    /// Renders the transcript of one record.
    ///
    /// # Arguments
    ///
    /// * `record` - The record to render
    /// * `include_full_body` - Append the raw request and response bodies,
    ///   regardless of size
    ///
    /// # Returns
    ///
    /// The INFO, REQUEST and RESPONSE sections under their headers, followed
    /// by the attribution line and, when requested, the bodies. A body that
    /// cannot be read is skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use netfox::export::LogExporter;
    /// use netfox::models::HttpLogRecord;
    ///
    /// let record = HttpLogRecord::new("GET", "https://api.test/x");
    /// let transcript = LogExporter::default().render_transcript(&record, false);
    /// assert!(transcript.starts_with("** INFO **\n[URL]\nhttps://api.test/x"));
    /// assert!(transcript.contains("** RESPONSE **\nNo response\n"));
    /// ```
    pub fn render_transcript(&self, record: &HttpLogRecord, include_full_body: bool) -> String {
        // Sections as shown on the detail screens
        let mut transcript = format!(
            "** INFO **\n{}\n\n** REQUEST **\n{}\n\n** RESPONSE **\n{}\n\n{}\n",
            formatter::info(record).text,
            formatter::request(record).text,
            formatter::response(record).text,
            ATTRIBUTION
        );

        // Raw bodies go last so the simple transcript stays a prefix
        if include_full_body {
            if let Some(body) = full_body(record.request().body_path.as_deref()) {
                transcript.push_str(&body);
            }
            let response_path = record.response().and_then(|r| r.body_path.as_deref());
            if let Some(body) = full_body(response_path) {
                transcript.push_str(&body);
            }
        }

        transcript
    }

    /// Renders the transcripts of several records, separated by a blank
    /// line, without full bodies.
    pub fn render_session(&self, records: &[HttpLogRecord]) -> String {
        records
            .iter()
            .map(|record| self.render_transcript(record, false))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes `text` as UTF-8 to [`LogExporter::file_path`], replacing any
    /// previous export.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Encoding` if the text contains NUL characters
    /// and `ExportError::Io` if the directory is missing or unwritable.
    pub fn write_to_temporary_file(&self, text: &str) -> Result<PathBuf, ExportError> {
        if let Some(pos) = text.find('\0') {
            return Err(ExportError::Encoding(format!(
                "NUL character at byte {}",
                pos
            )));
        }

        let path = self.file_path();
        let mut file = fs::File::create(&path)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        log::debug!("Wrote {} bytes of log to {}", text.len(), path.display());
        Ok(path)
    }

    /// Builds the share payload for a record's transcript.
    ///
    /// # Returns
    ///
    /// `SharePayload::File` with subject `netfox log - <file name>` when the
    /// transcript could be written, otherwise `SharePayload::Text` carrying
    /// the transcript with subject `netfox log - <request URL>`.
    pub fn share(&self, record: &HttpLogRecord, include_full_body: bool) -> SharePayload {
        let transcript = self.render_transcript(record, include_full_body);

        match self.write_to_temporary_file(&transcript) {
            Ok(path) => {
                let subject = format!("netfox log - {}", file_name_of(&path));
                SharePayload::File { path, subject }
            }
            Err(e) => {
                log::warn!("{}; sharing log as text", e);
                SharePayload::Text {
                    content: transcript,
                    subject: format!("netfox log - {}", record.request().url),
                }
            }
        }
    }

    /// Share payload carrying the request as a curl command.
    pub fn share_curl(&self, record: &HttpLogRecord) -> SharePayload {
        SharePayload::Text {
            content: record.request_curl(),
            subject: format!("netfox log - {}", record.request().url),
        }
    }
}

fn full_body(path: Option<&Path>) -> Option<String> {
    let path = path?;
    match read_body(path) {
        Ok(body) => Some(body),
        Err(e) => {
            log::debug!("Omitting body from transcript: {}", e);
            None
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
