//! # Doc Archive
//!
//! A static HTML browser for a scanned-document archive. Every stored
//! document has a JSON metadata record; a build turns the records into one
//! page per year, one page per keyword, and two overview pages.
//!
//! # Architecture: Trigger-Gated Pipeline
//!
//! ```text
//! 0. Trigger   archive/semaphore present?       (otherwise: nothing to do)
//! 1. Scan      archive/*.json  →  Manifest      (records → normalized documents)
//! 2. Index     Manifest        →  ArchiveIndex  (year and keyword buckets)
//! 3. Generate  ArchiveIndex    →  SitePages     (template substitution, in memory)
//! 4. Tree      SitePages       →  public/       (wipe, copy static, write, alias)
//! ```
//!
//! Stages 1 to 3 never touch the output directory. A malformed record or a
//! broken template fails the run before the previous site is removed.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading and validation |
//! | [`trigger`] | Marker file that requests a build |
//! | [`scan`] | Walks the archive and reads metadata records |
//! | [`keyword`] | Keyword normalization (`Süßwasser-Kunde` → `suesswasser_kunde`) |
//! | [`types`] | `DocumentRecord` as stored, `Document` as normalized |
//! | [`index`] | Year and keyword buckets with display ordering |
//! | [`template`] | `{PLACEHOLDER}` templates with typed field records |
//! | [`generate`] | Renders every page into memory |
//! | [`tree`] | Writes the output directory and its aliases |
//! | [`pipeline`] | Runs the stages in order |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Templates Stay on Disk
//!
//! Page markup lives in five user-editable HTML files instead of Rust code,
//! so the archive's look can change without a rebuild of the binary. Each
//! template is bound to a field record (see [`template::Fields`]); a
//! placeholder the record cannot fill is a load error, not a blank on the
//! published page.
//!
//! ## Full Rebuild
//!
//! Every build starts from an empty output directory. Archives are small
//! enough that incremental bookkeeping is not worth its failure modes.

pub mod config;
pub mod generate;
pub mod index;
pub mod keyword;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod template;
pub mod tree;
pub mod trigger;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
