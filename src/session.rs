//! The single owner of the working outline and everything that changes alongside it.
//!
//! A session holds the outline, the drag slot and the display preferences. Whole-tree
//! replacements (restore, import, reset) go through here so the drag slot is cancelled with
//! them, and the collaborators that leave the process (local persistence and publishing) get
//! the payload serialised before they are called.

use crate::drag::DragController;
use crate::formats::markdown::{outline_from_markdown, to_markdown};
use crate::formats::FormatError;
use crate::numbering::{number, render_preview, PreviewRow};
use crate::outline::Outline;
use crate::persist::{PersistError, Persister};
use crate::snapshot::{normalize, parse, records, ImportError, Snapshot};
use crate::store::{PublishError, Published, SnapshotSink};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug)]
#[must_use = "an import only takes effect once confirmed"]
/// A normalised outline waiting for the user to confirm that it may replace the current one.
pub struct PendingImport {
    outline: Outline,
}

impl PendingImport {
    #[must_use]
    /// The outline that confirming would install.
    pub fn outline(&self) -> &Outline {
        &self.outline
    }
}

#[derive(Debug)]
/// Editor session state.
pub struct Session {
    /// The working outline.
    pub outline: Outline,
    /// Drag slot; at most one drag is ever in flight.
    pub drag: DragController,
    /// Whether the preview shows dotted numbers.
    pub show_numbers: bool,
    /// Most recent user-facing notice.
    pub message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Outline::new())
    }
}

impl Session {
    #[must_use]
    /// A session over `outline` with numbers shown.
    pub fn new(outline: Outline) -> Self {
        Self {
            outline,
            drag: DragController::new(),
            show_numbers: true,
            message: None,
        }
    }

    #[must_use]
    /// Restores the saved outline, falling back to a fresh one when nothing usable is saved.
    pub fn restore(persister: &impl Persister) -> Self {
        let outline = match persister.load() {
            Ok(Some(text)) => match parse(&text) {
                Ok(outline) => outline,
                Err(e) => {
                    warn!("discarding unreadable saved outline: {e}");
                    Outline::new()
                }
            },
            Ok(None) => Outline::new(),
            Err(e) => {
                warn!("could not load saved outline: {e}");
                Outline::new()
            }
        };
        Self::new(outline)
    }

    #[must_use]
    /// Numbered preview rows of the current outline.
    pub fn preview_rows(&self) -> Vec<PreviewRow> {
        number(&self.outline)
    }

    #[must_use]
    /// Plain-text preview honouring the numbering preference.
    pub fn preview(&self, indent_width: usize) -> String {
        render_preview(&self.preview_rows(), self.show_numbers, indent_width)
    }

    #[must_use]
    /// Markdown rendering of the current outline.
    pub fn markdown(&self) -> String {
        to_markdown(&self.outline)
    }

    #[must_use]
    /// Export envelope of the current outline.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.outline)
    }

    /// Normalises an imported JSON value without touching the current outline.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Shape`] when the value holds no node array.
    pub fn stage_import(value: &Value) -> Result<PendingImport, ImportError> {
        normalize(value).map(|outline| PendingImport { outline })
    }

    /// Parses and normalises imported JSON text without touching the current outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or holds no node array.
    pub fn stage_import_text(text: &str) -> Result<PendingImport, ImportError> {
        let value: Value = serde_json::from_str(text)?;
        Self::stage_import(&value)
    }

    /// Reads a Markdown document's headings into a pending outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the Markdown grammar fails to load or parse.
    pub fn stage_markdown(source: &str) -> Result<PendingImport, FormatError> {
        outline_from_markdown(source).map(|outline| PendingImport { outline })
    }

    /// Replaces the outline with a confirmed import, cancelling any drag in flight.
    pub fn confirm_import(&mut self, pending: PendingImport) {
        self.drag.cancel();
        self.outline = pending.outline;
        info!(nodes = self.outline.len(), "import applied");
        self.message = Some("Imported".to_string());
    }

    /// Replaces the outline with a single default chapter.
    pub fn reset(&mut self) {
        self.drag.cancel();
        self.outline.reset();
        self.message = Some("Reset".to_string());
    }

    /// Saves the outline as a bare node array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or the write fails; the in-memory outline is
    /// unaffected either way.
    pub fn persist(&self, persister: &mut impl Persister) -> Result<(), PersistError> {
        let payload = serde_json::to_string(&records(&self.outline))?;
        persister.save(&payload)
    }

    /// Saves the outline, turning a failure into a notice instead of an error.
    pub fn autosave(&mut self, persister: &mut impl Persister) -> bool {
        match self.persist(persister) {
            Ok(()) => true,
            Err(e) => {
                warn!("autosave failed: {e}");
                self.message = Some(format!("Could not save: {e}"));
                false
            }
        }
    }

    /// Publishes the current outline and records the share link or the failure as a notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialised, the sink refuses it, or the sink
    /// answers without a usable link.
    pub fn publish(&mut self, sink: &impl SnapshotSink) -> Result<Published, PublishError> {
        let payload = self.snapshot().to_json()?;
        let outcome = sink.publish(&payload).and_then(|published| {
            if published.ok && !published.url.is_empty() {
                Ok(published)
            } else {
                Err(PublishError::MalformedResponse)
            }
        });
        match &outcome {
            Ok(published) => {
                info!(id = %published.id, "published snapshot");
                self.message = Some(format!("Share link: {}", published.url));
            }
            Err(e) => {
                warn!("publish failed: {e}");
                self.message = Some(format!("Share failed: {e}"));
            }
        }
        outcome
    }
}

#[cfg(test)]
#[path = "tests/session.rs"]
mod tests;
