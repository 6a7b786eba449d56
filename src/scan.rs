//! Metadata discovery and normalization.
//!
//! First stage of an archive build. Walks the archive directory, reads every
//! metadata record, and turns it into a normalized [`Document`].
//!
//! ## Directory Structure
//!
//! The archive layout is free-form; every file whose extension is exactly the
//! metadata extension is a record, at any depth, dot-directories included:
//!
//! ```text
//! archive/                         # archive_dir
//! ├── semaphore                    # Build trigger (see crate::trigger)
//! ├── 2022/
//! │   ├── 20220901B.json           # Metadata record
//! │   └── 20220901B.pdf            # Stored document (opaque to the build)
//! ├── 2023/
//! │   ├── 20230115A.json
//! │   ├── 20230115A.pdf
//! │   └── scans/
//! │       └── 20230301C.json       # Any depth is fine
//! └── .inbox/
//!     └── 20240102D.json           # Read like any other record
//! ```
//!
//! ## Record Format
//!
//! ```json
//! {
//!   "id": "20230115A",
//!   "title": "Stromrechnung Januar",
//!   "storage_location": "2023/20230115A.pdf",
//!   "keywords": ["Invoice", "Strom"]
//! }
//! ```
//!
//! ## Validation
//!
//! Every problem is fatal for the whole run:
//! - Unreadable file or malformed JSON
//! - Missing `id`, `title`, `storage_location`, or `keywords`
//! - Empty `id`
//! - The same `id` in two records

use crate::keyword::normalize_keywords;
use crate::types::{Document, DocumentRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot walk archive: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid metadata in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Empty document id in {0}")]
    EmptyId(PathBuf),
    #[error("Duplicate document id {id} in {first} and {second}")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },
}

/// Output of the scan stage: every document in discovery order.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub documents: Vec<Document>,
}

/// Scan `archive_dir` for metadata records with the given extension.
pub fn scan(archive_dir: &Path, extension: &str) -> Result<Manifest, ScanError> {
    let mut documents = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    for entry in WalkDir::new(archive_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(archive_dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .to_string();
        let record = read_record(entry.path())?;
        let document = normalize_record(record, rel_path, entry.path())?;

        if let Some(first) = seen.get(&document.id) {
            return Err(ScanError::DuplicateId {
                id: document.id,
                first: first.clone(),
                second: document.metadata_path,
            });
        }
        seen.insert(document.id.clone(), document.metadata_path.clone());

        tracing::debug!(id = %document.id, path = %document.metadata_path, "discovered document");
        documents.push(document);
    }

    Ok(Manifest { documents })
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|e| e == extension)
        .unwrap_or(false)
}

fn read_record(path: &Path) -> Result<DocumentRecord, ScanError> {
    let content = fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ScanError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Turn a raw record into a document fact.
fn normalize_record(
    record: DocumentRecord,
    metadata_path: String,
    source: &Path,
) -> Result<Document, ScanError> {
    if record.id.is_empty() {
        return Err(ScanError::EmptyId(source.to_path_buf()));
    }
    Ok(Document {
        keywords: normalize_keywords(&record.keywords),
        id: record.id,
        title: record.title,
        storage_location: record.storage_location,
        metadata_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn write_record(root: &Path, rel: &str, json: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, json).unwrap();
    }

    #[test]
    fn scan_finds_all_fixture_documents() {
        let tmp = setup_fixtures();
        let manifest = scan(&tmp.path().join("archive"), "json").unwrap();

        let mut ids = document_ids(&manifest);
        ids.sort();
        assert_eq!(ids, vec!["20220901B", "20230115A", "20230301C"]);
    }

    #[test]
    fn keywords_are_normalized() {
        let tmp = setup_fixtures();
        let manifest = scan(&tmp.path().join("archive"), "json").unwrap();

        let doc = find_document(&manifest, "20220901B");
        assert_eq!(doc.keywords, vec!["invoice", "tax"]);
        let doc = find_document(&manifest, "20230115A");
        assert_eq!(doc.keywords, vec!["invoice"]);
        let doc = find_document(&manifest, "20230301C");
        assert!(doc.keywords.is_empty());
    }

    #[test]
    fn manifest_serializes_documents() {
        let tmp = setup_fixtures();
        let manifest = scan(&tmp.path().join("archive"), "json").unwrap();
        let json = serde_json::to_value(&manifest).unwrap();
        let ids: Vec<&str> = json["documents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, document_ids(&manifest));
        assert_eq!(json["documents"][0]["keywords"], serde_json::json!(["invoice", "tax"]));
    }

    #[test]
    fn metadata_path_is_relative() {
        let tmp = setup_fixtures();
        let manifest = scan(&tmp.path().join("archive"), "json").unwrap();

        for doc in &manifest.documents {
            assert!(!doc.metadata_path.starts_with('/'));
            assert!(doc.metadata_path.ends_with(".json"));
        }
        let doc = find_document(&manifest, "20230115A");
        assert_eq!(
            Path::new(&doc.metadata_path),
            Path::new("2023").join("20230115A.json")
        );
    }

    #[test]
    fn records_in_dot_directories_are_read() {
        let tmp = TempDir::new().unwrap();
        write_record(
            tmp.path(),
            ".inbox/x.json",
            r#"{"id": "2024X", "title": "t", "storage_location": "s", "keywords": []}"#,
        );
        let manifest = scan(tmp.path(), "json").unwrap();
        assert_eq!(document_ids(&manifest), vec!["2024X"]);
    }

    #[test]
    fn malformed_record_in_dot_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), ".trash/broken.json", "{ nope");
        let result = scan(tmp.path(), "json");
        assert!(matches!(result, Err(ScanError::Json { ref path, .. }) if path.ends_with("broken.json")));
    }

    #[test]
    fn other_extensions_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "a.txt", "not a record");
        write_record(tmp.path(), "a.pdf", "%PDF");
        let manifest = scan(tmp.path(), "json").unwrap();
        assert!(manifest.documents.is_empty());
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "UPPER.JSON", "not a record");
        write_record(
            tmp.path(),
            "lower.json",
            r#"{"id": "2020X", "title": "t", "storage_location": "s", "keywords": []}"#,
        );
        let manifest = scan(tmp.path(), "json").unwrap();
        assert_eq!(document_ids(&manifest), vec!["2020X"]);
    }

    #[test]
    fn custom_extension() {
        let tmp = TempDir::new().unwrap();
        write_record(
            tmp.path(),
            "doc.meta",
            r#"{"id": "2020X", "title": "t", "storage_location": "s", "keywords": []}"#,
        );
        write_record(tmp.path(), "doc.json", "ignored");
        let manifest = scan(tmp.path(), "meta").unwrap();
        assert_eq!(document_ids(&manifest), vec!["2020X"]);
    }

    #[test]
    fn missing_field_is_error() {
        let tmp = TempDir::new().unwrap();
        write_record(
            tmp.path(),
            "2020/x.json",
            r#"{"id": "2020X", "storage_location": "s", "keywords": []}"#,
        );
        let result = scan(tmp.path(), "json");
        assert!(matches!(result, Err(ScanError::Json { .. })));
    }

    #[test]
    fn malformed_json_is_error() {
        let tmp = TempDir::new().unwrap();
        write_record(tmp.path(), "x.json", "{ not json");
        let err = scan(tmp.path(), "json").unwrap_err();
        assert!(err.to_string().contains("x.json"));
    }

    #[test]
    fn empty_id_is_error() {
        let tmp = TempDir::new().unwrap();
        write_record(
            tmp.path(),
            "x.json",
            r#"{"id": "", "title": "t", "storage_location": "s", "keywords": []}"#,
        );
        assert!(matches!(
            scan(tmp.path(), "json"),
            Err(ScanError::EmptyId(_))
        ));
    }

    #[test]
    fn duplicate_id_is_error() {
        let tmp = TempDir::new().unwrap();
        let json = r#"{"id": "2020X", "title": "t", "storage_location": "s", "keywords": []}"#;
        write_record(tmp.path(), "a/x.json", json);
        write_record(tmp.path(), "b/x.json", json);
        let result = scan(tmp.path(), "json");
        assert!(matches!(result, Err(ScanError::DuplicateId { ref id, .. }) if id == "2020X"));
    }

    #[test]
    fn non_digit_id_still_scans() {
        let tmp = TempDir::new().unwrap();
        write_record(
            tmp.path(),
            "x.json",
            r#"{"id": "abcd-1", "title": "t", "storage_location": "s", "keywords": []}"#,
        );
        let manifest = scan(tmp.path(), "json").unwrap();
        assert_eq!(manifest.documents[0].year(), "abcd");
    }

    #[test]
    fn missing_archive_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"), "json");
        assert!(matches!(result, Err(ScanError::Walk(_))));
    }
}
