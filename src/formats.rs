//! Format trait and implementations for reading headings out of documents.
//!
//! This module defines the `Format` trait which abstracts over heading-based document formats by
//! providing the tree-sitter grammar and heading query specific to each format, and the shared
//! extraction routine that turns a parsed document into a flat list of headings.

pub mod markdown;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Grammar and queries needed to find headings in one document format.
pub trait Format {
    /// Tree-sitter grammar for the format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing whole heading nodes.
    fn heading_query(&self) -> &str;
    /// Heading depth encoded by a marker node kind, if `kind` is a marker.
    fn marker_level(&self, kind: &str) -> Option<usize>;
    /// Node kind holding the heading text.
    fn content_kind(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
/// Failure to read headings from a document.
pub enum FormatError {
    /// The grammar could not be loaded.
    #[error("grammar error: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    /// The heading query does not compile against the grammar.
    #[error("query error: {0}")]
    Query(#[from] tree_sitter::QueryError),
    /// The parser gave up on the document.
    #[error("document could not be parsed")]
    Parse,
    /// Heading text was not valid UTF-8.
    #[error("heading text is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A heading as written in the source document.
pub struct Heading {
    /// Marker depth, 1 for `#`.
    pub depth: usize,
    /// Heading text without markup, trimmed.
    pub text: String,
}

/// Extracts every heading of `source` in document order.
///
/// # Errors
///
/// Returns an error if the grammar or query cannot be loaded, or the document cannot be parsed.
pub fn extract_headings<F: Format>(source: &str, format: &F) -> Result<Vec<Heading>, FormatError> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    let tree = parser.parse(source, None).ok_or(FormatError::Parse)?;
    let query = Query::new(&language, format.heading_query())?;

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
    let mut headings = Vec::new();

    while let Some(found) = matches.next() {
        for capture in found.captures {
            let node = capture.node;
            let mut depth = None;
            let mut text = String::new();
            let mut walker = node.walk();
            for child in node.children(&mut walker) {
                if let Some(level) = format.marker_level(child.kind()) {
                    depth = Some(level);
                } else if child.kind() == format.content_kind() {
                    text = child.utf8_text(source.as_bytes())?.trim().to_string();
                }
            }
            if let Some(depth) = depth {
                headings.push(Heading { depth, text });
            }
        }
    }

    Ok(headings)
}
