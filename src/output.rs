//! CLI output formatting for `check` and `build`.
//!
//! Output is **information-centric, not file-centric**: every document leads
//! with its positional index, id, and title; the metadata file it came from is
//! secondary context on an indented `Source:` line.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Documents
//! 001 20220901B Steuerbescheid 2021
//!     Source: 2022/20220901B.json
//!     Stored: 2022/20220901B.pdf
//!     Keywords: invoice, tax
//!
//! Years
//!     2023 (2 documents)
//!     2022 (1 document)
//!
//! Keywords
//!     invoice (2 documents)
//!     tax (1 document)
//! ```
//!
//! ## Build
//!
//! ```text
//! Jahresübersicht → all_years.html (2 entries)
//!     Jahr 2023 → year_2023.html (2 entries)
//!     Jahr 2022 → year_2022.html (1 entry)
//! Schlagwortübersicht → all_keywords.html (2 entries)
//!     Schlagwort invoice → keyword_invoice.html (2 entries)
//!     Schlagwort tax → keyword_tax.html (1 entry)
//!
//! Aliases
//!     index.html → year_2023.html
//!     documents → /srv/archive
//!
//! Generated 3 documents, 2 year pages, 2 keyword pages at 09.03.2024 07:05:02
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::index::ArchiveIndex;
use crate::pipeline::{BuildReport, PageSummary};
use crate::tree::{DOCUMENTS_ALIAS, INDEX_ALIAS};
use crate::types::Document;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `1 document`, `2 documents`
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

fn page_line(page: &PageSummary) -> String {
    format!(
        "{} → {} ({})",
        page.title,
        page.file_name,
        count(page.entries, "entry", "entries")
    )
}

// ============================================================================
// check
// ============================================================================

/// Format the archive inventory: documents in scan order, then buckets.
pub fn format_check_output(documents: &[Document], index: &ArchiveIndex) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];
    for (i, doc) in documents.iter().enumerate() {
        lines.push(format!("{} {} {}", format_index(i + 1), doc.id, doc.title));
        lines.push(format!("    Source: {}", doc.metadata_path));
        lines.push(format!("    Stored: {}", doc.storage_location));
        if !doc.keywords.is_empty() {
            lines.push(format!("    Keywords: {}", doc.keywords.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push("Years".to_string());
    for year in index.years_descending() {
        let n = index.year_bucket(year).len();
        lines.push(format!("    {} ({})", year, count(n, "document", "documents")));
    }

    let keywords = index.keywords_ascending();
    if !keywords.is_empty() {
        lines.push(String::new());
        lines.push("Keywords".to_string());
        for keyword in keywords {
            let n = index.keyword_bucket(keyword).len();
            lines.push(format!("    {} ({})", keyword, count(n, "document", "documents")));
        }
    }

    lines
}

pub fn print_check_output(documents: &[Document], index: &ArchiveIndex) {
    for line in format_check_output(documents, index) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format the pages and aliases a build wrote.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![page_line(&report.all_years)];
    for page in &report.years {
        lines.push(format!("    {}", page_line(page)));
    }
    lines.push(page_line(&report.all_keywords));
    for page in &report.keywords {
        lines.push(format!("    {}", page_line(page)));
    }

    lines.push(String::new());
    lines.push("Aliases".to_string());
    lines.push(format!("    {} → {}", INDEX_ALIAS, report.tree.index_target));
    lines.push(format!(
        "    {} → {}",
        DOCUMENTS_ALIAS,
        report.tree.documents_target.display()
    ));

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {} at {}",
        count(report.documents, "document", "documents"),
        count(report.years.len(), "year page", "year pages"),
        count(report.keywords.len(), "keyword page", "keyword pages"),
        report.stamp.generated_human_readable
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}
