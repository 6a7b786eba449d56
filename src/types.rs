//! Document types shared by the scan, index, and generate stages.

use serde::{Deserialize, Serialize};

/// One metadata record as stored on disk, before normalization.
///
/// All four fields are required; anything else in the file is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub storage_location: String,
    pub keywords: Vec<String>,
}

/// A normalized, immutable document fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Unique id, `YYYYMMDD...`; the first four characters are the year.
    pub id: String,
    pub title: String,
    /// Where the stored file lives, relative to the `documents` alias.
    pub storage_location: String,
    /// Normalized keywords in record order, without duplicates.
    pub keywords: Vec<String>,
    /// Metadata file this fact was read from, relative to the archive root.
    pub metadata_path: String,
}

impl Document {
    /// Year bucket key: the first four characters of the id, taken verbatim.
    ///
    /// Ids shorter than four characters use the whole id.
    pub fn year(&self) -> &str {
        match self.id.char_indices().nth(4) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }
}
