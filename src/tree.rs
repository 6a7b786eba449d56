//! Output tree construction.
//!
//! Final stage of an archive build. Replaces the output directory with a
//! fresh copy of the static assets plus the rendered pages, then adds two
//! aliases. The steps always run in this order:
//!
//! 1. Remove the existing output directory (it must be a directory)
//! 2. Copy the static directory to the output directory
//! 3. Write `all_years.html`
//! 4. Write every `year_<year>.html`
//! 5. Write `all_keywords.html`
//! 6. Write every `keyword_<keyword>.html`
//! 7. Alias `index.html` to the greatest `year_*.html` present on disk
//! 8. Alias `documents` to the archive root
//!
//! Any failure stops the run. The next run starts again from step 1, so a
//! half-written tree never survives a successful build.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── simplepage.css             # From static_dir
//! ├── listpage.css
//! ├── all_years.html
//! ├── year_2023.html
//! ├── year_2022.html
//! ├── all_keywords.html
//! ├── keyword_invoice.html
//! ├── keyword_tax.html
//! ├── index.html -> year_2023.html
//! └── documents -> /srv/archive
//! ```
//!
//! The `index.html` target is taken from a directory listing rather than from
//! the index, so a `year_*.html` shipped in the static directory counts too.

use crate::config::AliasMode;
use crate::generate::{Page, SitePages};
use maud::{DOCTYPE, html};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Output path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Cannot remove output directory {path}: {source}")]
    Clean { path: PathBuf, source: io::Error },
    #[error("Cannot copy static assets from {path}: {source}")]
    CopyStatic { path: PathBuf, source: io::Error },
    #[error("Cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Cannot list {path}: {source}")]
    List { path: PathBuf, source: io::Error },
    #[error("No year page in {0} to alias as index.html")]
    NoYearPage(PathBuf),
    #[error("Cannot create alias {path}: {source}")]
    Alias { path: PathBuf, source: io::Error },
}

pub const INDEX_ALIAS: &str = "index.html";
pub const DOCUMENTS_ALIAS: &str = "documents";

/// Creates the two aliases of the output tree.
///
/// Implementations must leave `alias` resolving to `target` through normal
/// file access, whether by link, redirect, or copy.
pub trait AliasLinker {
    /// Alias a page inside the output directory. `target` is a file name
    /// relative to the alias's directory.
    fn link_page(&self, target: &Path, alias: &Path) -> io::Result<()>;

    /// Alias a directory anywhere on disk. `target` is absolute.
    fn link_dir(&self, target: &Path, alias: &Path) -> io::Result<()>;
}

/// Symbolic links.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymlinkLinker;

impl AliasLinker for SymlinkLinker {
    fn link_page(&self, target: &Path, alias: &Path) -> io::Result<()> {
        symlink_file(target, alias)
    }

    fn link_dir(&self, target: &Path, alias: &Path) -> io::Result<()> {
        symlink_dir(target, alias)
    }
}

#[cfg(unix)]
fn symlink_file(target: &Path, alias: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, alias)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, alias: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, alias)
}

#[cfg(windows)]
fn symlink_file(target: &Path, alias: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, alias)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, alias: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, alias)
}

#[cfg(not(any(unix, windows)))]
fn symlink_file(_target: &Path, _alias: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported here; use alias_mode = \"redirect\"",
    ))
}

#[cfg(not(any(unix, windows)))]
fn symlink_dir(target: &Path, alias: &Path) -> io::Result<()> {
    symlink_file(target, alias)
}

/// For targets without symlinks: a meta-refresh page and a directory copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct RedirectLinker;

impl AliasLinker for RedirectLinker {
    fn link_page(&self, target: &Path, alias: &Path) -> io::Result<()> {
        fs::write(alias, redirect_page(&target.to_string_lossy()))
    }

    fn link_dir(&self, target: &Path, alias: &Path) -> io::Result<()> {
        fs::create_dir(alias)?;
        copy_dir_recursive(target, alias)
    }
}

fn redirect_page(target: &str) -> String {
    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta http-equiv="refresh" content={ "0; url=" (target) };
                link rel="canonical" href=(target);
            }
            body {
                a href=(target) { (target) }
            }
        }
    };
    markup.into_string()
}

impl AliasMode {
    pub fn linker(self) -> Box<dyn AliasLinker> {
        match self {
            AliasMode::Symlink => Box::new(SymlinkLinker),
            AliasMode::Redirect => Box::new(RedirectLinker),
        }
    }
}

/// What the tree builder wrote.
#[derive(Debug, Clone, Serialize)]
pub struct TreeReport {
    pub output_dir: PathBuf,
    /// Page files in write order.
    pub pages: Vec<String>,
    /// File `index.html` resolves to.
    pub index_target: String,
    /// Directory `documents` resolves to.
    pub documents_target: PathBuf,
}

/// Run all eight steps.
pub fn write_tree(
    output_dir: &Path,
    static_dir: &Path,
    archive_dir: &Path,
    pages: &SitePages,
    linker: &dyn AliasLinker,
) -> Result<TreeReport, TreeError> {
    clean_output(output_dir)?;

    tracing::debug!(from = %static_dir.display(), "copying static assets");
    copy_static(static_dir, output_dir)?;

    let mut written = Vec::new();
    write_page(output_dir, &pages.all_years, &mut written)?;
    for page in &pages.years {
        write_page(output_dir, page, &mut written)?;
    }
    write_page(output_dir, &pages.all_keywords, &mut written)?;
    for page in &pages.keywords {
        write_page(output_dir, page, &mut written)?;
    }

    let index_target = latest_year_page(output_dir)?;
    let alias = output_dir.join(INDEX_ALIAS);
    linker
        .link_page(Path::new(&index_target), &alias)
        .map_err(|source| TreeError::Alias {
            path: alias.clone(),
            source,
        })?;
    tracing::debug!(to = %index_target, "linked {}", INDEX_ALIAS);

    let alias = output_dir.join(DOCUMENTS_ALIAS);
    let documents_target =
        fs::canonicalize(archive_dir).map_err(|source| TreeError::Alias {
            path: alias.clone(),
            source,
        })?;
    linker
        .link_dir(&documents_target, &alias)
        .map_err(|source| TreeError::Alias {
            path: alias.clone(),
            source,
        })?;
    tracing::debug!(to = %documents_target.display(), "linked {}", DOCUMENTS_ALIAS);

    Ok(TreeReport {
        output_dir: output_dir.to_path_buf(),
        pages: written,
        index_target,
        documents_target,
    })
}

/// Step 1: remove a previous build.
///
/// `symlink_metadata` so that a symlink at the output path is rejected
/// rather than followed and its target wiped.
fn clean_output(output_dir: &Path) -> Result<(), TreeError> {
    match fs::symlink_metadata(output_dir) {
        Ok(meta) if meta.is_dir() => {
            tracing::debug!(path = %output_dir.display(), "removing previous build");
            fs::remove_dir_all(output_dir).map_err(|source| TreeError::Clean {
                path: output_dir.to_path_buf(),
                source,
            })
        }
        Ok(_) => Err(TreeError::NotADirectory(output_dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(TreeError::Clean {
            path: output_dir.to_path_buf(),
            source,
        }),
    }
}

/// Step 2: copy the static directory, creating the output directory.
fn copy_static(static_dir: &Path, output_dir: &Path) -> Result<(), TreeError> {
    let to_err = |source| TreeError::CopyStatic {
        path: static_dir.to_path_buf(),
        source,
    };
    if !static_dir.is_dir() {
        return Err(to_err(io::Error::new(
            io::ErrorKind::NotFound,
            "static directory does not exist",
        )));
    }
    if let Some(parent) = output_dir.parent() {
        fs::create_dir_all(parent).map_err(to_err)?;
    }
    fs::create_dir(output_dir).map_err(to_err)?;
    copy_dir_recursive(static_dir, output_dir).map_err(to_err)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

fn write_page(output_dir: &Path, page: &Page, written: &mut Vec<String>) -> Result<(), TreeError> {
    let path = output_dir.join(&page.file_name);
    fs::write(&path, &page.html).map_err(|source| TreeError::Write { path, source })?;
    written.push(page.file_name.clone());
    Ok(())
}

/// Step 7 target: the greatest `year_*.html` file name in `output_dir`.
pub fn latest_year_page(output_dir: &Path) -> Result<String, TreeError> {
    let to_err = |source| TreeError::List {
        path: output_dir.to_path_buf(),
        source,
    };
    let mut latest: Option<String> = None;
    for entry in fs::read_dir(output_dir).map_err(to_err)? {
        let name = entry.map_err(to_err)?.file_name().to_string_lossy().to_string();
        if name.starts_with("year_")
            && name.ends_with(".html")
            && latest.as_ref().is_none_or(|l| name > *l)
        {
            latest = Some(name);
        }
    }
    latest.ok_or_else(|| TreeError::NoYearPage(output_dir.to_path_buf()))
}
