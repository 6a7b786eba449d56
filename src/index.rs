//! Year and keyword indices.
//!
//! The index is a pure accumulator: documents are inserted in discovery
//! order and each bucket keeps that order. Nothing is sorted on insert.
//! Readers go through the sorted views below, which apply three independent
//! orderings:
//!
//! | View | Order |
//! |------|-------|
//! | [`ArchiveIndex::years_descending`] | year keys, newest first |
//! | [`ArchiveIndex::keywords_ascending`] | keyword keys, alphabetical |
//! | [`ArchiveIndex::year_ids_descending`] / [`ArchiveIndex::keyword_ids_descending`] | ids within a bucket, highest first |
//!
//! Discovery order depends on the filesystem, so nothing downstream may rely
//! on raw bucket order.

use crate::types::Document;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ArchiveIndex {
    documents: HashMap<String, Document>,
    years: HashMap<String, Vec<String>>,
    keywords: HashMap<String, Vec<String>>,
}

impl ArchiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from documents in discovery order.
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut index = Self::new();
        for document in documents {
            index.insert(document);
        }
        index
    }

    /// Add one document to the year bucket and to each keyword bucket.
    ///
    /// Callers guarantee ids are unique per pass (see [`crate::scan`]).
    pub fn insert(&mut self, document: Document) {
        let id = document.id.clone();

        self.years
            .entry(document.year().to_string())
            .or_default()
            .push(id.clone());

        for keyword in &document.keywords {
            let bucket = self.keywords.entry(keyword.clone()).or_default();
            // Same keyword twice in one document
            if bucket.last() != Some(&id) {
                bucket.push(id.clone());
            }
        }

        self.documents.insert(id, document);
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Raw year bucket, in discovery order.
    pub fn year_bucket(&self, year: &str) -> &[String] {
        self.years.get(year).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Raw keyword bucket, in discovery order.
    pub fn keyword_bucket(&self, keyword: &str) -> &[String] {
        self.keywords.get(keyword).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Year keys, newest first.
    pub fn years_descending(&self) -> Vec<&str> {
        let mut years: Vec<&str> = self.years.keys().map(String::as_str).collect();
        years.sort();
        years.reverse();
        years
    }

    /// Keyword keys in alphabetical order.
    pub fn keywords_ascending(&self) -> Vec<&str> {
        let mut keywords: Vec<&str> = self.keywords.keys().map(String::as_str).collect();
        keywords.sort();
        keywords
    }

    /// Ids in a year bucket, highest id first.
    pub fn year_ids_descending(&self, year: &str) -> Vec<&str> {
        descending(self.year_bucket(year))
    }

    /// Ids in a keyword bucket, highest id first.
    pub fn keyword_ids_descending(&self, keyword: &str) -> Vec<&str> {
        descending(self.keyword_bucket(keyword))
    }
}

fn descending(bucket: &[String]) -> Vec<&str> {
    let mut ids: Vec<&str> = bucket.iter().map(String::as_str).collect();
    ids.sort();
    ids.reverse();
    ids
}
