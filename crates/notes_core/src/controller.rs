//! crates/notes_core/src/controller.rs
//!
//! The orchestration layer behind the notes UI: the note list snapshot, the
//! edit-form state, and the summary-dialog state machine. All persistence and
//! summarization goes through the ports, so the whole flow is testable with
//! in-memory fakes.

use std::sync::Arc;

use crate::domain::Note;
use crate::ports::{NoteStore, ServiceError, ServiceResult, SummarizationService};

/// The one message shown for any summarization failure. The underlying cause
/// stays in the server-side logs.
pub const SUMMARIZE_FAILED_MESSAGE: &str = "Failed to generate summary. Please try again.";

//=========================================================================================
// Form and Dialog State
//=========================================================================================

/// State of the add/edit note form.
///
/// `edit_target` identifies the note being form-edited. It is deliberately a
/// separate field from the summary dialog's target note, so editing one note
/// while a summary dialog is open for another can never misattribute a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub edit_target: Option<i64>,
}

/// The summarize-then-save dialog, as an explicit state machine:
/// `Idle -> Requesting -> {Succeeded, Failed} -> Idle`.
///
/// `Failed` intentionally carries no note id: after a failed request an
/// accidental Save has nothing to apply to, and retrying means clicking
/// Summarize on the note card again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryDialog {
    Idle,
    Requesting { note_id: i64, token: u64 },
    Succeeded { note_id: i64, summary: String },
    Failed { message: String },
}

impl SummaryDialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, SummaryDialog::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SummaryDialog::Requesting { .. })
    }

    /// The displayed summary text, once a request has succeeded.
    pub fn summary(&self) -> Option<&str> {
        match self {
            SummaryDialog::Succeeded { summary, .. } => Some(summary),
            _ => None,
        }
    }

    /// The displayed error text. Mutually exclusive with `summary`.
    pub fn error(&self) -> Option<&str> {
        match self {
            SummaryDialog::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// The note the in-flight or completed summary applies to.
    pub fn target_note(&self) -> Option<i64> {
        match self {
            SummaryDialog::Requesting { note_id, .. }
            | SummaryDialog::Succeeded { note_id, .. } => Some(*note_id),
            _ => None,
        }
    }
}

/// Handed out by [`NotesController::begin_summarize`]; carries everything the
/// caller needs to dispatch the request and hand the outcome back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeTicket {
    pub token: u64,
    pub note_id: i64,
    pub content: String,
}

//=========================================================================================
// The Controller
//=========================================================================================

pub struct NotesController {
    store: Arc<dyn NoteStore>,
    summarizer: Arc<dyn SummarizationService>,
    notes: Vec<Note>,
    form: NoteForm,
    dialog: SummaryDialog,
    next_token: u64,
    alert: Option<String>,
}

impl NotesController {
    pub fn new(store: Arc<dyn NoteStore>, summarizer: Arc<dyn SummarizationService>) -> Self {
        Self {
            store,
            summarizer,
            notes: Vec::new(),
            form: NoteForm::default(),
            dialog: SummaryDialog::Idle,
            next_token: 0,
            alert: None,
        }
    }

    // --- View accessors ---

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn form(&self) -> &NoteForm {
        &self.form
    }

    pub fn dialog(&self) -> &SummaryDialog {
        &self.dialog
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.form.content = content.into();
    }

    /// Hands the pending user-facing alert to the view layer, at most once.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    // --- Note list and form flow ---

    /// Reloads the note list from the store. On failure the current snapshot
    /// is kept ("show nothing new") and an alert is raised.
    pub async fn refresh(&mut self) {
        match self.store.list().await {
            Ok(notes) => self.notes = notes,
            Err(_) => {
                self.alert = Some("Could not load notes. Please try again.".to_string());
            }
        }
    }

    /// Submits the form: creates a new note, or updates the note named by
    /// `edit_target`. Empty-after-trim fields raise an alert without touching
    /// the store, leaving both the form and the list as they were.
    pub async fn submit_form(&mut self) {
        if self.form.title.trim().is_empty() || self.form.content.trim().is_empty() {
            self.alert = Some("Please fill in both title and content".to_string());
            return;
        }

        let result = match self.form.edit_target {
            Some(id) => self
                .store
                .update_content(id, &self.form.title, &self.form.content)
                .await
                .map(drop),
            None => self
                .store
                .create(&self.form.title, &self.form.content)
                .await
                .map(drop),
        };

        match result {
            Ok(()) => {
                self.form = NoteForm::default();
                self.refresh().await;
            }
            Err(ServiceError::NotFound(_)) => {
                // The note vanished under the edit; drop the stale form.
                self.alert = Some("Note no longer exists".to_string());
                self.form = NoteForm::default();
                self.refresh().await;
            }
            Err(e) => self.alert = Some(e.to_string()),
        }
    }

    /// Loads an existing note's fields into the form for editing.
    pub fn begin_edit(&mut self, note_id: i64) {
        if let Some(note) = self.notes.iter().find(|n| n.id == note_id) {
            self.form.title = note.title.clone();
            self.form.content = note.content.clone();
            self.form.edit_target = Some(note_id);
        }
    }

    /// Deletes a note and refreshes. A row that is already gone counts as
    /// deleted, so pressing Delete twice is harmless.
    pub async fn delete_note(&mut self, note_id: i64) {
        match self.store.delete(note_id).await {
            Ok(()) | Err(ServiceError::NotFound(_)) => {}
            Err(e) => {
                self.alert = Some(e.to_string());
                return;
            }
        }
        self.refresh().await;
    }

    // --- Summarize state machine ---

    /// Opens the dialog in `Requesting` for the given note and returns the
    /// dispatch ticket. Returns `None` when a request is already in flight
    /// (one at a time) or the note is not in the current snapshot.
    pub fn begin_summarize(&mut self, note_id: i64) -> Option<SummarizeTicket> {
        if self.dialog.is_loading() {
            return None;
        }
        let note = self.notes.iter().find(|n| n.id == note_id)?;
        let token = self.next_token;
        self.next_token += 1;
        self.dialog = SummaryDialog::Requesting { note_id, token };
        Some(SummarizeTicket {
            token,
            note_id,
            content: note.content.clone(),
        })
    }

    /// Applies a summarize outcome. The outcome is dropped unless the dialog
    /// is still `Requesting` with the same token, so responses that arrive
    /// after a close, or for a superseded request, change nothing.
    pub fn complete_summarize(&mut self, token: u64, outcome: ServiceResult<String>) {
        let (note_id, current) = match &self.dialog {
            SummaryDialog::Requesting { note_id, token } => (*note_id, *token),
            _ => return,
        };
        if current != token {
            return;
        }
        self.dialog = match outcome {
            Ok(summary) => SummaryDialog::Succeeded { note_id, summary },
            Err(_) => SummaryDialog::Failed {
                message: SUMMARIZE_FAILED_MESSAGE.to_string(),
            },
        };
    }

    /// The whole summarize round trip: open the dialog, call the gateway,
    /// apply the outcome through the token check.
    pub async fn summarize(&mut self, note_id: i64) {
        let Some(ticket) = self.begin_summarize(note_id) else {
            return;
        };
        let outcome = self.summarizer.summarize(&ticket.content).await;
        self.complete_summarize(ticket.token, outcome);
    }

    /// Persists the displayed summary onto its note. Only available from
    /// `Succeeded`; a store failure keeps the dialog open so Save can be
    /// retried.
    pub async fn save_summary(&mut self) {
        let (note_id, summary) = match &self.dialog {
            SummaryDialog::Succeeded { note_id, summary } => (*note_id, summary.clone()),
            _ => {
                self.alert = Some("Error: No note selected".to_string());
                return;
            }
        };
        if summary.trim().is_empty() {
            self.alert = Some("Summary cannot be empty".to_string());
            return;
        }

        match self.store.update_summary(note_id, &summary).await {
            Ok(()) => {
                self.dialog = SummaryDialog::Idle;
                self.refresh().await;
            }
            Err(ServiceError::NotFound(_)) => {
                self.alert = Some("Note no longer exists".to_string());
                self.dialog = SummaryDialog::Idle;
                self.refresh().await;
            }
            Err(_) => {
                self.alert = Some("Failed to save summary. Please try again.".to_string());
            }
        }
    }

    /// Closes the dialog from any state, discarding an unsaved summary. A
    /// response still in flight will fail the token check when it lands.
    pub fn close_dialog(&mut self) {
        self.dialog = SummaryDialog::Idle;
    }
}

//=========================================================================================
// Tests
//=========================================================================================
