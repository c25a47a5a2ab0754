pub mod controller;
pub mod domain;
pub mod ports;

pub use controller::{NoteForm, NotesController, SummarizeTicket, SummaryDialog};
pub use domain::Note;
pub use ports::{NoteStore, ServiceError, ServiceResult, SummarizationService};
