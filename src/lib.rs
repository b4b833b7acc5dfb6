//! toc-ideator: draft a document's table of contents with candidate titles per heading.
//!
//! The engine keeps a three-level outline under an optional document title. Every heading
//! carries a list of candidate wordings with one selected, and the outline projects into a
//! numbered preview, Markdown headings and a lenient JSON snapshot format.
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod drag;
pub mod formats;
pub mod node;
pub mod numbering;
pub mod outline;
pub mod persist;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod store;

use std::io;

#[derive(Debug, thiserror::Error)]
/// Any failure surfaced to the command line.
pub enum Error {
    /// A JSON import was rejected.
    #[error(transparent)]
    Import(#[from] snapshot::ImportError),
    /// A Markdown document could not be parsed.
    #[error(transparent)]
    Format(#[from] formats::FormatError),
    /// The working outline could not be saved or loaded.
    #[error(transparent)]
    Persist(#[from] persist::PersistError),
    /// The snapshot store refused a request.
    #[error(transparent)]
    Store(#[from] store::StoreError),
    /// Publishing did not produce a share link.
    #[error(transparent)]
    Publish(#[from] store::PublishError),
    /// Reading input or writing output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Serialising output failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// No node has the given id, or the node does not support the operation.
    #[error("no applicable node with id {0}")]
    UnknownNode(String),
}

/// Result alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
