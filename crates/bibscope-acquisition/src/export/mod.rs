//! Multi-format export (spec §4.2, §6): JSON, BibTeX, RIS, CSV, written
//! under a per-job directory.

mod bibtex;
mod csv;
mod json;
mod ris;

use std::path::{Path, PathBuf};

use bibscope_common::types::{DuplicateReport, Publication};
use bibscope_common::{BibscopeError, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Bibtex,
    Ris,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "bibtex" | "bib" => Some(Self::Bibtex),
            "ris" => Some(Self::Ris),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Bibtex => "bibtex",
            Self::Ris => "ris",
            Self::Csv => "csv",
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            Self::Json => "unified.json",
            Self::Bibtex => "unified.bib",
            Self::Ris => "unified.ris",
            Self::Csv => "unified.csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Bibtex => "application/x-bibtex",
            Self::Ris => "application/x-research-info-systems",
            Self::Csv => "text/csv",
        }
    }

    fn render(&self, records: &[Publication]) -> Result<String> {
        match self {
            Self::Json => json::render(records),
            Self::Bibtex => Ok(bibtex::render(records)),
            Self::Ris => Ok(ris::render(records)),
            Self::Csv => Ok(csv::render(records)),
        }
    }
}

/// Per-job artifact directory layout (spec §6 "Persisted layout"):
/// `unified.json`, `unified.bib`, `unified.ris`, `unified.csv`,
/// `duplicates.json`, `summary.json`.
pub struct ArtifactWriter {
    job_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(base_dir: &Path, job_id: impl std::fmt::Display) -> Self {
        Self {
            job_dir: base_dir.join(job_id.to_string()),
        }
    }

    pub fn job_dir(&self) -> &Path {
        &self.job_dir
    }

    /// Write every requested format plus the duplicate report and summary.
    /// An I/O or encoding failure here is fatal to the job (spec §4.2
    /// "Failure semantics").
    pub async fn write_all(
        &self,
        records: &[Publication],
        duplicates: &DuplicateReport,
        summary: &serde_json::Value,
        formats: &[ExportFormat],
    ) -> Result<Vec<(ExportFormat, PathBuf)>> {
        tokio::fs::create_dir_all(&self.job_dir)
            .await
            .map_err(|e| BibscopeError::Export(e.to_string()))?;

        let mut written = Vec::new();
        for format in formats {
            let rendered = format.render(records)?;
            let path = self.job_dir.join(format.filename());
            tokio::fs::write(&path, rendered)
                .await
                .map_err(|e| BibscopeError::Export(e.to_string()))?;
            written.push((*format, path));
        }

        let duplicates_json =
            serde_json::to_string_pretty(duplicates).map_err(|e| BibscopeError::Export(e.to_string()))?;
        tokio::fs::write(self.job_dir.join("duplicates.json"), duplicates_json)
            .await
            .map_err(|e| BibscopeError::Export(e.to_string()))?;

        let summary_json = serde_json::to_string_pretty(summary).map_err(|e| BibscopeError::Export(e.to_string()))?;
        tokio::fs::write(self.job_dir.join("summary.json"), summary_json)
            .await
            .map_err(|e| BibscopeError::Export(e.to_string()))?;

        Ok(written)
    }

    /// Delete the job's artifact directory, used when a job is cancelled
    /// mid-export (spec §5 "must delete any partially-written export files").
    pub async fn delete_all(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.job_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BibscopeError::Export(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_format_names() {
        assert_eq!(ExportFormat::parse("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("bib"), Some(ExportFormat::Bibtex));
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("xml"), None);
    }

    #[tokio::test]
    async fn writes_every_requested_format_plus_sidecars() {
        let tmp = std::env::temp_dir().join(format!("bibscope-export-test-{}", uuid::Uuid::new_v4()));
        let writer = ArtifactWriter::new(&tmp, "job-1");
        let records = vec![Publication::new("A Title", "fixture")];
        let report = DuplicateReport::default();
        let summary = serde_json::json!({"downloaded": 1});

        let written = writer
            .write_all(&records, &report, &summary, &[ExportFormat::Json, ExportFormat::Csv])
            .await
            .unwrap();

        assert_eq!(written.len(), 2);
        assert!(tokio::fs::metadata(writer.job_dir().join("duplicates.json")).await.is_ok());
        assert!(tokio::fs::metadata(writer.job_dir().join("summary.json")).await.is_ok());

        writer.delete_all().await.unwrap();
        assert!(tokio::fs::metadata(writer.job_dir()).await.is_err());
    }
}
