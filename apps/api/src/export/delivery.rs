//! File delivery: filenames, `Content-Disposition` values, and the save-to-directory
//! collaborator the DOCX encoder hands finished documents to.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::models::resume::ResumeRecord;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PDF_MIME: &str = "application/pdf";

const FALLBACK_STEM: &str = "Resume";

#[async_trait]
pub trait FileDelivery: Send + Sync {
    /// Persists `bytes` under `filename` and returns where it ended up.
    async fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves every delivered file into one directory, overwriting same-named files.
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FileDelivery for DirectoryDelivery {
    async fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating export dir {}", self.dir.display()))?;

        let path = self.dir.join(sanitize_stem(filename));
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        info!(path = %path.display(), bytes = bytes.len(), "Export saved");
        Ok(path)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Filenames
// ────────────────────────────────────────────────────────────────────────────

/// `<name>.docx`, or `Resume.docx` when the record has no name.
pub fn default_docx_filename(record: &ResumeRecord) -> String {
    format!("{}.docx", file_stem(record))
}

/// `<name>_<YYYY-MM-DD>.pdf`, or `Resume_<date>.pdf` when the record has no name.
pub fn dated_pdf_filename(record: &ResumeRecord, date: NaiveDate) -> String {
    format!("{}_{}.pdf", file_stem(record), date.format("%Y-%m-%d"))
}

fn file_stem(record: &ResumeRecord) -> String {
    let name = record.personal_info.name.as_str();
    if name.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        sanitize_stem(name)
    }
}

/// Replaces characters that cannot appear in a filename on common platforms.
fn sanitize_stem(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Checks a caller-supplied filename. Returns the reason it is unusable, if any.
pub fn validate_filename(filename: &str) -> Result<(), String> {
    if filename.trim().is_empty() {
        return Err("filename cannot be empty".to_string());
    }
    if filename.len() > 200 {
        return Err("filename is longer than 200 bytes".to_string());
    }
    if filename == "." || filename == ".." {
        return Err("filename cannot be a directory reference".to_string());
    }
    if filename
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '"') || c.is_control())
    {
        return Err("filename contains a path separator, quote or control character".to_string());
    }
    Ok(())
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii.replace('"', "_"),
        percent_encode(filename)
    )
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::PersonalInfo;

    fn named(name: &str) -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                name: name.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_docx_filename_uses_name() {
        assert_eq!(default_docx_filename(&named("Asha Rao")), "Asha Rao.docx");
    }

    #[test]
    fn test_docx_filename_falls_back_to_resume() {
        assert_eq!(default_docx_filename(&ResumeRecord::default()), "Resume.docx");
    }

    #[test]
    fn test_docx_filename_strips_separators() {
        assert_eq!(default_docx_filename(&named("A/B: C")), "A_B_ C.docx");
        assert_eq!(default_docx_filename(&named("..")), "Resume.docx");
    }

    #[test]
    fn test_pdf_filename_has_date_suffix() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        assert_eq!(
            dated_pdf_filename(&named("Asha Rao"), date),
            "Asha Rao_2026-10-15.pdf"
        );
        assert_eq!(
            dated_pdf_filename(&ResumeRecord::default(), date),
            "Resume_2026-10-15.pdf"
        );
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("resume.pdf").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("../etc/passwd").is_err());
        assert!(validate_filename("a\"b.pdf").is_err());
        assert!(validate_filename("..").is_err());
    }

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("Asha Rao.docx"),
            "attachment; filename=\"Asha Rao.docx\"; filename*=UTF-8''Asha%20Rao.docx"
        );
    }

    #[test]
    fn test_content_disposition_non_ascii_is_header_safe() {
        let value = content_disposition("Zoë.pdf");
        assert!(value.is_ascii());
        assert!(value.contains("filename=\"Zo_.pdf\""));
        assert!(value.contains("Zo%C3%AB.pdf"));
    }

    #[tokio::test]
    async fn test_directory_delivery_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let delivery = DirectoryDelivery::new(dir.path().join("exports"));
        let path = delivery.deliver("Asha Rao.docx", b"PK").await.unwrap();
        assert_eq!(path, dir.path().join("exports").join("Asha Rao.docx"));
        assert_eq!(std::fs::read(path).unwrap(), b"PK");
    }
}
