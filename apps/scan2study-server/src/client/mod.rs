//! Client-side flows
//!
//! The upload and study views as plain state machines. Network access goes
//! through [`StudyApi`] and persistence through [`DocumentStore`], so a UI
//! layer only has to render state and forward user actions.
//!
//! ```rust,ignore
//! let api = HttpStudyApi::new("http://localhost:3000");
//! let store = FileStore::new("scan2study.json");
//!
//! let mut upload = UploadFlow::new();
//! if let UploadOutcome::OpenStudy(_) = upload.select_and_parse(Some(file), &api, &store).await {
//!     if let StudyView::Ready(mut session) = StudyView::open(&store) {
//!         session.auto_summarize(&api).await;
//!         session.ask(&api, "What is the main argument?").await?;
//!     }
//! }
//! ```

mod api;
pub mod render;
mod storage;
mod study;
mod upload;

pub use api::{ClientError, HttpStudyApi, SelectedFile, StudyApi};
pub use storage::{
    DocumentStore, FileStore, MemoryStore, StorageError, StoredDocument, FILE_NAME_KEY, TEXT_KEY,
};
pub use study::{
    export_file_name, ChatMessage, PendingQuestion, Role, StudyError, StudySession, StudyView,
    SummaryState, TextExport, NOTHING_TO_SUMMARIZE,
};
pub use upload::{UploadFlow, UploadOutcome, UploadState, DEFAULT_FILE_NAME};
