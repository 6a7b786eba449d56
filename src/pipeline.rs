//! Stitches the stages of an archive build together.
//!
//! ```text
//! templates ─┐
//! trigger? ──┼─► scan ─► index ─► BuildContext ─► assemble ─► write_tree ─► clear trigger
//! config ────┘
//! ```
//!
//! Templates are loaded before the trigger is checked, so a broken template
//! directory is reported on every run and not only when documents arrive.

use crate::config::{ArchiveConfig, ConfigError};
use crate::generate::{BuildContext, GenerateError, GenerationStamp, Page, SitePages};
use crate::index::ArchiveIndex;
use crate::scan::{self, Manifest, ScanError};
use crate::template::{TemplateError, Templates};
use crate::tree::{self, TreeError, TreeReport};
use crate::trigger::{Trigger, TriggerError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Trigger error: {0}")]
    Trigger(#[from] TriggerError),
    #[error("Metadata error: {0}")]
    Scan(#[from] ScanError),
    #[error("{0}")]
    Generate(#[from] GenerateError),
    #[error("Output error: {0}")]
    Tree(#[from] TreeError),
}

/// Result of a trigger-gated run.
#[derive(Debug)]
pub enum Outcome {
    Built(BuildReport),
    /// No trigger marker; nothing was touched.
    NothingToDo { trigger: PathBuf },
}

/// One written page, without its HTML.
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub file_name: String,
    pub title: String,
    pub entries: usize,
}

impl From<&Page> for PageSummary {
    fn from(page: &Page) -> Self {
        Self {
            file_name: page.file_name.clone(),
            title: page.title.clone(),
            entries: page.entries,
        }
    }
}

/// Everything a finished build produced.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub stamp: GenerationStamp,
    pub documents: usize,
    pub all_years: PageSummary,
    pub years: Vec<PageSummary>,
    pub all_keywords: PageSummary,
    pub keywords: Vec<PageSummary>,
    pub tree: TreeReport,
}

/// Scan result plus the index built from it, for `check`.
#[derive(Debug)]
pub struct Inventory {
    pub manifest: Manifest,
    pub index: ArchiveIndex,
}

/// Build if the trigger marker exists (or `force` is set), then clear it.
pub fn run(
    config: &ArchiveConfig,
    stamp: GenerationStamp,
    force: bool,
) -> Result<Outcome, BuildError> {
    let templates = Templates::load(&config.templates_dir)?;

    let trigger_path = config.trigger_path();
    let trigger = Trigger::find(&trigger_path)?;
    if trigger.is_none() && !force {
        info!(trigger = %trigger_path.display(), "no trigger, nothing to do");
        return Ok(Outcome::NothingToDo {
            trigger: trigger_path,
        });
    }

    let report = build(config, templates, stamp)?;

    if let Some(trigger) = trigger {
        info!(trigger = %trigger.path().display(), "clearing trigger");
        trigger.clear()?;
    }
    Ok(Outcome::Built(report))
}

/// Unconditional full rebuild.
pub fn build(
    config: &ArchiveConfig,
    templates: Templates,
    stamp: GenerationStamp,
) -> Result<BuildReport, BuildError> {
    info!(archive = %config.archive_dir.display(), "scanning");
    let manifest = scan::scan(&config.archive_dir, &config.metadata_extension)?;
    let documents = manifest.documents.len();
    info!(documents, "indexing");
    let index = ArchiveIndex::from_documents(manifest.documents);

    let context = BuildContext::new(config.site_title.clone(), stamp, templates, index)?;
    let pages = context.assemble()?;
    info!(
        years = pages.years.len(),
        keywords = pages.keywords.len(),
        "rendered pages"
    );

    let linker = config.alias_mode.linker();
    let tree = tree::write_tree(
        &config.output_dir,
        &config.static_dir,
        &config.archive_dir,
        &pages,
        linker.as_ref(),
    )?;
    info!(output = %tree.output_dir.display(), generated = %context.stamp().generated, "build complete");

    Ok(report(context.stamp().clone(), documents, &pages, tree))
}

/// Load templates and scan without writing anything.
pub fn check(config: &ArchiveConfig) -> Result<Inventory, BuildError> {
    Templates::load(&config.templates_dir)?;
    let manifest = scan::scan(&config.archive_dir, &config.metadata_extension)?;
    let index = ArchiveIndex::from_documents(manifest.documents.iter().cloned());
    Ok(Inventory { manifest, index })
}

fn report(
    stamp: GenerationStamp,
    documents: usize,
    pages: &SitePages,
    tree: TreeReport,
) -> BuildReport {
    BuildReport {
        stamp,
        documents,
        all_years: PageSummary::from(&pages.all_years),
        years: pages.years.iter().map(PageSummary::from).collect(),
        all_keywords: PageSummary::from(&pages.all_keywords),
        keywords: pages.keywords.iter().map(PageSummary::from).collect(),
        tree,
    }
}
