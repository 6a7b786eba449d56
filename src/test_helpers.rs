//! Shared test utilities for the doc-archive test suite.
//!
//! Provides the fixture archive, document builders, and lookup helpers
//! that work with scan-phase data (`Manifest`, `Document`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = fixture_config(tmp.path());
//! let manifest = scan(&config.archive_dir, "json").unwrap();
//!
//! let doc = find_document(&manifest, "20220901B");
//! assert_eq!(doc.keywords, vec!["invoice", "tax"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::{AliasMode, ArchiveConfig};
use crate::generate::GenerationStamp;
use crate::scan::Manifest;
use crate::template::Templates;
use crate::types::Document;
use chrono::NaiveDate;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` (archive, templates, static) to a temp directory.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Config pointing at a fixture copy; output goes to `<root>/public`.
pub fn fixture_config(root: &Path) -> ArchiveConfig {
    ArchiveConfig {
        site_title: "Dokument-Archiv".to_string(),
        templates_dir: root.join("templates"),
        archive_dir: root.join("archive"),
        static_dir: root.join("static"),
        output_dir: root.join("public"),
        trigger_file: "semaphore".to_string(),
        metadata_extension: "json".to_string(),
        alias_mode: AliasMode::Symlink,
    }
}

/// The fixture templates, read in place.
pub fn fixture_templates() -> Templates {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/templates");
    Templates::load(&dir).unwrap()
}

/// 2024-03-09 07:05:02
pub fn test_stamp() -> GenerationStamp {
    let time = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(7, 5, 2)
        .unwrap();
    GenerationStamp::at(time)
}

// =========================================================================
// Document builders
// =========================================================================

/// A document with already-normalized keywords.
pub fn document(id: &str, keywords: &[&str]) -> Document {
    Document {
        id: id.to_string(),
        title: format!("Dokument {id}"),
        storage_location: format!("storage/{id}.pdf"),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        metadata_path: format!("{id}.json"),
    }
}

pub fn titled_document(id: &str, title: &str) -> Document {
    Document {
        title: title.to_string(),
        ..document(id, &[])
    }
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find a document by id. Panics if not found.
pub fn find_document<'a>(manifest: &'a Manifest, id: &str) -> &'a Document {
    manifest
        .documents
        .iter()
        .find(|d| d.id == id)
        .unwrap_or_else(|| {
            let ids = document_ids(manifest);
            panic!("document '{id}' not found. Available: {ids:?}")
        })
}

/// All document ids in scan order.
pub fn document_ids(manifest: &Manifest) -> Vec<&str> {
    manifest.documents.iter().map(|d| d.id.as_str()).collect()
}

// =========================================================================
// HTML assertions
// =========================================================================

/// Assert that every needle occurs in `html`, each after the previous one.
pub fn assert_in_order(html: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match html[from..].find(needle) {
            Some(pos) => from += pos + needle.len(),
            None => panic!("'{needle}' not found after offset {from} in:\n{html}"),
        }
    }
}
