//! Test Reports
//!
//! Report files prepared for upload and the list of analyzed reports,
//! newest first.

use crate::client::{ApiClient, ApiResult};
use crate::responses::ReportAnalysis;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Status recorded for a report once the backend has answered
pub const STATUS_ANALYZED: &str = "analyzed";

/// Largest report accepted for upload (50 MiB)
pub const MAX_REPORT_BYTES: u64 = 50 * 1024 * 1024;

/// A file ready to be sent as multipart form data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ReportFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file, guessing its MIME type from the extension.
    ///
    /// Files over [`MAX_REPORT_BYTES`] are rejected before being read.
    pub async fn from_path(path: &Path) -> Result<Self, ReportError> {
        let read_error = |e: std::io::Error| ReportError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        };

        let size = tokio::fs::metadata(path).await.map_err(read_error)?.len();
        if size > MAX_REPORT_BYTES {
            return Err(ReportError::TooLarge {
                name: path.display().to_string(),
                size,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(read_error)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| ReportError::NoFileName(path.to_path_buf()))?;

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(name, content_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Reject files over [`MAX_REPORT_BYTES`]
    pub fn check_size(&self) -> Result<(), ReportError> {
        if self.size() > MAX_REPORT_BYTES {
            return Err(ReportError::TooLarge {
                name: self.name.clone(),
                size: self.size(),
            });
        }
        Ok(())
    }

    pub fn kind(&self) -> ReportKind {
        if self.content_type.contains("pdf") {
            ReportKind::PdfDocument
        } else {
            ReportKind::Image
        }
    }
}

/// Coarse document type shown next to a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    #[serde(rename = "PDF Document")]
    PdfDocument,
    Image,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::PdfDocument => write!(f, "PDF Document"),
            ReportKind::Image => write!(f, "Image"),
        }
    }
}

/// A report the backend has analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedReport {
    pub id: u64,
    pub name: String,
    /// Upload date, `YYYY-MM-DD` (UTC)
    pub date: String,
    pub kind: ReportKind,
    pub status: String,
    pub summary: String,
    pub abnormal_markers: Vec<String>,
}

/// Analyzed reports, newest first
#[derive(Debug, Default)]
pub struct ReportShelf {
    reports: Vec<AnalyzedReport>,
    next_id: u64,
}

impl ReportShelf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload `file` and record the analysis at the top of the shelf.
    ///
    /// Nothing is recorded when the upload fails.
    pub async fn upload(&mut self, client: &ApiClient, file: &ReportFile) -> ApiResult<&AnalyzedReport> {
        let payload = client.upload_report(file).await?;
        let analysis = ReportAnalysis::from_value(&payload);

        tracing::info!(
            report = %file.name(),
            abnormal_markers = analysis.abnormal_markers.len(),
            "Report analyzed"
        );

        Ok(self.record(file, analysis))
    }

    /// Insert an analysis at the top of the shelf
    pub fn record(&mut self, file: &ReportFile, analysis: ReportAnalysis) -> &AnalyzedReport {
        self.next_id += 1;
        let report = AnalyzedReport {
            id: self.next_id,
            name: file.name().to_string(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            kind: file.kind(),
            status: STATUS_ANALYZED.to_string(),
            summary: analysis.summary,
            abnormal_markers: analysis.abnormal_markers,
        };

        self.reports.insert(0, report);
        &self.reports[0]
    }

    pub fn reports(&self) -> &[AnalyzedReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Errors preparing a report for upload
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read report {path:?}: {error}")]
    Read { path: PathBuf, error: String },

    #[error("Report path has no file name: {0:?}")]
    NoFileName(PathBuf),

    #[error("File size exceeds 50MB limit.")]
    TooLarge { name: String, size: u64 },
}
