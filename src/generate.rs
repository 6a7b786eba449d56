//! Page assembly.
//!
//! Second stage of an archive build. Takes the [`ArchiveIndex`] and the
//! loaded [`Templates`] and renders every page of the site into memory.
//! Nothing here touches the filesystem; writing is [`crate::tree`]'s job, so
//! a render failure never leaves a half-replaced site behind.
//!
//! ## Generated Pages
//!
//! | File | Content | Stylesheet |
//! |------|---------|------------|
//! | `all_years.html` | one entry per year, newest first | `simplepage.css` |
//! | `year_<year>.html` | the year's documents, highest id first | `listpage.css` |
//! | `all_keywords.html` | one entry per keyword, alphabetical | `simplepage.css` |
//! | `keyword_<keyword>.html` | the keyword's documents, highest id first | `listpage.css` |
//!
//! ## Nesting
//!
//! Every page is three substitutions deep:
//!
//! ```text
//! page_template.html            TITLE, PAGESTYLE, stamp, CONTENT
//! └── listpage_template.html    PAGETITLE_ID, PAGETITLE, PAGECONTENT
//!     └── entries joined by "\n"
//!         ├── simpleitem_template.html   (overview pages)
//!         └── document snippet           (year and keyword pages)
//!             └── keyword_template.html entries joined by " | "
//! ```
//!
//! Document snippets are rendered once per document when the
//! [`BuildContext`] is created and reused on the year page and on every
//! keyword page the document appears on.

use crate::index::ArchiveIndex;
use crate::template::{
    DocumentItem, ItemList, KeywordLink, PageFrame, SimpleItem, TemplateError, Templates,
};
use crate::types::Document;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Render error: {0}")]
    Template(#[from] TemplateError),
    #[error("No rendered snippet for document {0}")]
    MissingSnippet(String),
}

pub const ALL_YEARS_FILE: &str = "all_years.html";
pub const ALL_KEYWORDS_FILE: &str = "all_keywords.html";

const OVERVIEW_STYLE: &str = "simplepage.css";
const LIST_STYLE: &str = "listpage.css";
const KEYWORD_SEPARATOR: &str = " | ";
const ENTRY_SEPARATOR: &str = "\n";

pub fn year_file_name(year: &str) -> String {
    format!("year_{year}.html")
}

pub fn keyword_file_name(keyword: &str) -> String {
    format!("keyword_{keyword}.html")
}

/// Build time, captured once and shown identically on every page of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationStamp {
    /// `%Y%m%d %H%M%S`
    pub generated: String,
    /// `%d.%m.%Y %H:%M:%S`
    pub generated_human_readable: String,
    /// `%Y`
    pub current_year: String,
}

impl GenerationStamp {
    /// Capture the local wall clock.
    pub fn capture() -> Self {
        Self::at(Local::now().naive_local())
    }

    pub fn at(time: NaiveDateTime) -> Self {
        Self {
            generated: time.format("%Y%m%d %H%M%S").to_string(),
            generated_human_readable: time.format("%d.%m.%Y %H:%M:%S").to_string(),
            current_year: time.format("%Y").to_string(),
        }
    }
}

/// A fully rendered page, ready to be written.
#[derive(Debug, Clone)]
pub struct Page {
    pub file_name: String,
    /// List heading (`Jahr 2023`, `Schlagwortübersicht`, ...)
    pub title: String,
    /// Number of list entries on the page.
    pub entries: usize,
    pub html: String,
}

/// Every page of the site, grouped in the order they are written.
#[derive(Debug)]
pub struct SitePages {
    pub all_years: Page,
    /// Newest year first.
    pub years: Vec<Page>,
    pub all_keywords: Page,
    /// Alphabetical.
    pub keywords: Vec<Page>,
}

/// State for one build run.
#[derive(Debug)]
pub struct BuildContext {
    site_title: String,
    stamp: GenerationStamp,
    templates: Templates,
    index: ArchiveIndex,
    snippets: HashMap<String, String>,
}

impl BuildContext {
    /// Create the context and render every document snippet.
    pub fn new(
        site_title: impl Into<String>,
        stamp: GenerationStamp,
        templates: Templates,
        index: ArchiveIndex,
    ) -> Result<Self, GenerateError> {
        let mut snippets = HashMap::with_capacity(index.document_count());
        for document in index.documents() {
            let snippet = render_document_snippet(&templates, document)?;
            snippets.insert(document.id.clone(), snippet);
        }
        Ok(Self {
            site_title: site_title.into(),
            stamp,
            templates,
            index,
            snippets,
        })
    }

    pub fn stamp(&self) -> &GenerationStamp {
        &self.stamp
    }

    /// Pre-rendered snippet for a document.
    pub fn snippet(&self, id: &str) -> Option<&str> {
        self.snippets.get(id).map(String::as_str)
    }

    /// Render all pages of the site.
    pub fn assemble(&self) -> Result<SitePages, GenerateError> {
        let years = self
            .index
            .years_descending()
            .into_iter()
            .map(|year| self.render_year_page(year))
            .collect::<Result<Vec<_>, _>>()?;
        let keywords = self
            .index
            .keywords_ascending()
            .into_iter()
            .map(|keyword| self.render_keyword_page(keyword))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SitePages {
            all_years: self.render_all_years()?,
            years,
            all_keywords: self.render_all_keywords()?,
            keywords,
        })
    }

    /// Overview of all years, newest first.
    pub fn render_all_years(&self) -> Result<Page, GenerateError> {
        let years = self.index.years_descending();
        let entries = years
            .iter()
            .map(|year| {
                self.templates.simple_item.render(&SimpleItem {
                    item_id: year.to_string(),
                    item_file_name: year_file_name(year),
                    item_title: year.to_string(),
                    number_items: self.index.year_bucket(year).len().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.render_page(
            ALL_YEARS_FILE.to_string(),
            OVERVIEW_STYLE,
            "jahresuebersicht".to_string(),
            "Jahresübersicht".to_string(),
            entries,
        )
    }

    /// Overview of all keywords, alphabetical.
    pub fn render_all_keywords(&self) -> Result<Page, GenerateError> {
        let keywords = self.index.keywords_ascending();
        let entries = keywords
            .iter()
            .map(|keyword| {
                self.templates.simple_item.render(&SimpleItem {
                    item_id: keyword.to_string(),
                    item_file_name: keyword_file_name(keyword),
                    item_title: keyword.to_string(),
                    number_items: self.index.keyword_bucket(keyword).len().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.render_page(
            ALL_KEYWORDS_FILE.to_string(),
            OVERVIEW_STYLE,
            "schlagwortuebersicht".to_string(),
            "Schlagwortübersicht".to_string(),
            entries,
        )
    }

    /// Documents of one year, highest id first.
    pub fn render_year_page(&self, year: &str) -> Result<Page, GenerateError> {
        let entries = self.snippets_for(&self.index.year_ids_descending(year))?;
        self.render_page(
            year_file_name(year),
            LIST_STYLE,
            format!("jahr_{year}"),
            format!("Jahr {year}"),
            entries,
        )
    }

    /// Documents carrying one keyword, highest id first.
    pub fn render_keyword_page(&self, keyword: &str) -> Result<Page, GenerateError> {
        let entries = self.snippets_for(&self.index.keyword_ids_descending(keyword))?;
        self.render_page(
            keyword_file_name(keyword),
            LIST_STYLE,
            format!("schlagwort_{keyword}"),
            format!("Schlagwort {keyword}"),
            entries,
        )
    }

    fn snippets_for(&self, ids: &[&str]) -> Result<Vec<String>, GenerateError> {
        ids.iter()
            .map(|id| {
                self.snippet(id)
                    .map(str::to_string)
                    .ok_or_else(|| GenerateError::MissingSnippet(id.to_string()))
            })
            .collect()
    }

    /// Wrap list entries in the list container and the page frame.
    fn render_page(
        &self,
        file_name: String,
        page_style: &str,
        page_title_id: String,
        page_title: String,
        entries: Vec<String>,
    ) -> Result<Page, GenerateError> {
        let count = entries.len();
        let list = self.templates.list.render(&ItemList {
            page_title_id,
            page_title: page_title.clone(),
            page_content: entries.join(ENTRY_SEPARATOR),
        })?;
        let html = self.templates.page.render(&PageFrame {
            title: self.site_title.clone(),
            page_style: page_style.to_string(),
            current_year: self.stamp.current_year.clone(),
            generated: self.stamp.generated.clone(),
            generated_human_readable: self.stamp.generated_human_readable.clone(),
            content: list,
        })?;
        Ok(Page {
            file_name,
            title: page_title,
            entries: count,
            html,
        })
    }
}

/// Render the list entry for one document, including its keyword links.
pub fn render_document_snippet(
    templates: &Templates,
    document: &Document,
) -> Result<String, TemplateError> {
    let keyword_links = document
        .keywords
        .iter()
        .map(|keyword| {
            templates.keyword.render(&KeywordLink {
                keyword: keyword.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    templates.document_item.render(&DocumentItem {
        document_id: document.id.clone(),
        document_title: document.title.clone(),
        document_storage_location: document.storage_location.clone(),
        document_keywords: keyword_links.join(KEYWORD_SEPARATOR),
    })
}
