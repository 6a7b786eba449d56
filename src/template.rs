//! Flat string-substitution templates.
//!
//! Every page is assembled from five small HTML templates read from the
//! templates directory at startup. A template is plain text with named
//! placeholders:
//!
//! ```text
//! <li id="{ITEMID}"><a href="{ITEMFILENAME}">{ITEMTITLE}</a> ({NUMBERITEMS})</li>
//! ```
//!
//! A literal brace is written doubled: `{{` and `}}`. That matters mostly for
//! inline CSS or JavaScript in the page frame.
//!
//! ## Typed Fields
//!
//! Each template kind has a fixed record of fields ([`PageFrame`],
//! [`ItemList`], [`SimpleItem`], [`DocumentItem`], [`KeywordLink`]). A
//! [`Template<F>`] can only be rendered with its own record type, so passing
//! the wrong set of values is a compile error. Placeholder names are checked
//! against the record's field names when the template is parsed, so a typo
//! in a template file fails the build before any document is read instead of
//! producing a half-substituted page.
//!
//! There is no escaping, no conditionals, no loops. Lists are built by
//! rendering one fragment per entry and substituting the joined fragments
//! into an outer template.

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Cannot read template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Syntax error in template {template} at byte {offset}: {message}")]
    Syntax {
        template: &'static str,
        offset: usize,
        message: &'static str,
    },
    #[error("Template {template} uses unknown placeholder {{{name}}}")]
    UnknownPlaceholder {
        template: &'static str,
        name: String,
    },
    #[error("No value for placeholder {{{name}}} in template {template}")]
    MissingValue {
        template: &'static str,
        name: String,
    },
}

/// A fixed set of named values for one template kind.
pub trait Fields {
    /// File name of the template inside the templates directory.
    const TEMPLATE_FILE: &'static str;
    /// Every placeholder name this record can fill.
    const NAMES: &'static [&'static str];

    fn get(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template bound to its field record type.
pub struct Template<F: Fields> {
    segments: Vec<Segment>,
    _fields: PhantomData<fn(&F)>,
}

impl<F: Fields> fmt::Debug for Template<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("file", &F::TEMPLATE_FILE)
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl<F: Fields> Template<F> {
    /// Parse template text and check its placeholders against `F::NAMES`.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let segments = parse_segments(text, F::TEMPLATE_FILE)?;
        for segment in &segments {
            if let Segment::Placeholder(name) = segment
                && !F::NAMES.iter().any(|known| *known == name.as_str())
            {
                return Err(TemplateError::UnknownPlaceholder {
                    template: F::TEMPLATE_FILE,
                    name: name.clone(),
                });
            }
        }
        Ok(Self {
            segments,
            _fields: PhantomData,
        })
    }

    /// Read `F::TEMPLATE_FILE` from `dir` and parse it.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let path = dir.join(F::TEMPLATE_FILE);
        let text = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        let template = Self::parse(&text)?;
        tracing::debug!(
            file = F::TEMPLATE_FILE,
            placeholders = template.placeholders().count(),
            "loaded template"
        );
        Ok(template)
    }

    /// Substitute every placeholder with the matching field value.
    pub fn render(&self, fields: &F) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = fields.get(name).ok_or_else(|| TemplateError::MissingValue {
                        template: F::TEMPLATE_FILE,
                        name: name.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

/// Split template text into literals and placeholders.
///
/// `{{`/`}}` are literal braces; a lone `}` or an unterminated `{` is an error.
fn parse_segments(text: &str, template: &'static str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '}' => {
                return Err(TemplateError::Syntax {
                    template,
                    offset,
                    message: "single '}' encountered",
                });
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    match n {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => {
                            return Err(TemplateError::Syntax {
                                template,
                                offset,
                                message: "'{' inside placeholder",
                            });
                        }
                        _ => name.push(n),
                    }
                }
                if !closed {
                    return Err(TemplateError::Syntax {
                        template,
                        offset,
                        message: "unterminated placeholder",
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name));
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

// ============================================================================
// Field records
// ============================================================================

/// Outermost page chrome shared by every page.
#[derive(Debug, Clone)]
pub struct PageFrame {
    pub title: String,
    pub page_style: String,
    pub current_year: String,
    pub generated: String,
    pub generated_human_readable: String,
    pub content: String,
}

impl Fields for PageFrame {
    const TEMPLATE_FILE: &'static str = "page_template.html";
    const NAMES: &'static [&'static str] = &[
        "TITLE",
        "PAGESTYLE",
        "CURRENT_YEAR",
        "WEB_PAGE_GENERATED",
        "WEB_PAGE_GENERATED_HUMAN_READABLE",
        "CONTENT",
    ];

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "TITLE" => Some(&self.title),
            "PAGESTYLE" => Some(&self.page_style),
            "CURRENT_YEAR" => Some(&self.current_year),
            "WEB_PAGE_GENERATED" => Some(&self.generated),
            "WEB_PAGE_GENERATED_HUMAN_READABLE" => Some(&self.generated_human_readable),
            "CONTENT" => Some(&self.content),
            _ => None,
        }
    }
}

/// Titled list container; becomes the frame's `CONTENT`.
#[derive(Debug, Clone)]
pub struct ItemList {
    pub page_title_id: String,
    pub page_title: String,
    pub page_content: String,
}

impl Fields for ItemList {
    const TEMPLATE_FILE: &'static str = "listpage_template.html";
    const NAMES: &'static [&'static str] = &["PAGETITLE_ID", "PAGETITLE", "PAGECONTENT"];

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "PAGETITLE_ID" => Some(&self.page_title_id),
            "PAGETITLE" => Some(&self.page_title),
            "PAGECONTENT" => Some(&self.page_content),
            _ => None,
        }
    }
}

/// One entry on an overview page (a year or a keyword).
#[derive(Debug, Clone)]
pub struct SimpleItem {
    pub item_id: String,
    pub item_file_name: String,
    pub item_title: String,
    pub number_items: String,
}

impl Fields for SimpleItem {
    const TEMPLATE_FILE: &'static str = "simpleitem_template.html";
    const NAMES: &'static [&'static str] = &["ITEMID", "ITEMFILENAME", "ITEMTITLE", "NUMBERITEMS"];

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "ITEMID" => Some(&self.item_id),
            "ITEMFILENAME" => Some(&self.item_file_name),
            "ITEMTITLE" => Some(&self.item_title),
            "NUMBERITEMS" => Some(&self.number_items),
            _ => None,
        }
    }
}

/// One document entry on a year or keyword page.
#[derive(Debug, Clone)]
pub struct DocumentItem {
    pub document_id: String,
    pub document_title: String,
    pub document_storage_location: String,
    pub document_keywords: String,
}

impl Fields for DocumentItem {
    const TEMPLATE_FILE: &'static str = "pageitem_template.html";
    const NAMES: &'static [&'static str] = &[
        "DOCUMENTID",
        "DOCUMENTTITLE",
        "DOCUMENTSTORAGELOCATION",
        "DOCUMENTKEYWORDS",
    ];

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "DOCUMENTID" => Some(&self.document_id),
            "DOCUMENTTITLE" => Some(&self.document_title),
            "DOCUMENTSTORAGELOCATION" => Some(&self.document_storage_location),
            "DOCUMENTKEYWORDS" => Some(&self.document_keywords),
            _ => None,
        }
    }
}

/// Link to a keyword page inside a document entry.
#[derive(Debug, Clone)]
pub struct KeywordLink {
    pub keyword: String,
}

impl Fields for KeywordLink {
    const TEMPLATE_FILE: &'static str = "keyword_template.html";
    const NAMES: &'static [&'static str] = &["KEYWORD"];

    fn get(&self, name: &str) -> Option<&str> {
        match name {
            "KEYWORD" => Some(&self.keyword),
            _ => None,
        }
    }
}

/// The five templates a build needs, loaded once per run.
#[derive(Debug)]
pub struct Templates {
    pub page: Template<PageFrame>,
    pub list: Template<ItemList>,
    pub simple_item: Template<SimpleItem>,
    pub document_item: Template<DocumentItem>,
    pub keyword: Template<KeywordLink>,
}

impl Templates {
    /// Load all five templates from `dir`. The first failure aborts.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        Ok(Self {
            page: Template::load(dir)?,
            list: Template::load(dir)?,
            simple_item: Template::load(dir)?,
            document_item: Template::load(dir)?,
            keyword: Template::load(dir)?,
        })
    }
}
