//! Study view
//!
//! Chat-style session over a persisted document: a one-shot automatic
//! summary seeded into the transcript, an on-demand summary shown on its
//! own, questions answered one at a time, and plain-text export.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::api::{ClientError, StudyApi};
use super::storage::{DocumentStore, StoredDocument};

/// Export name used when the source file name is unknown
const DEFAULT_EXPORT_STEM: &str = "reading";

pub const NOTHING_TO_SUMMARIZE: &str = "No text available to summarize. Please upload a PDF first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
        }
    }
}

/// Progress of the automatic summary. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryState {
    NotStarted,
    InProgress,
    Done,
}

#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("Question is empty")]
    EmptyQuestion,

    #[error("A request is already in flight")]
    Busy,

    #[error("No text available to download. Please upload a PDF first.")]
    NothingToExport,

    #[error("No text available to summarize. Please upload a PDF first.")]
    NothingToSummarize,

    #[error("Failed to download file. Please try again.")]
    ExportFailed(#[from] std::io::Error),
}

/// What the study view shows after reading storage
#[derive(Debug)]
pub enum StudyView {
    /// Nothing persisted; offer a way back to the upload view
    NoDocument,
    Ready(StudySession),
}

impl StudyView {
    pub fn open(store: &dyn DocumentStore) -> Self {
        match StoredDocument::load(store) {
            Some(document) => Self::Ready(StudySession::new(document)),
            None => Self::NoDocument,
        }
    }
}

/// A question accepted by the session, waiting for its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    pub text: String,
    pub question: String,
}

/// Extracted text as a downloadable plain-text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextExport {
    pub file_name: String,
    pub contents: String,
}

impl TextExport {
    /// Write the export into `dir`, returning the written path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, StudyError> {
        // Only the final path component, never a path supplied by the upload
        let name = Path::new(&self.file_name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{DEFAULT_EXPORT_STEM}.txt")));
        let path = dir.join(name);
        std::fs::write(&path, self.contents.as_bytes())?;
        Ok(path)
    }
}

/// `reading.pdf` becomes `reading.txt`; only the last extension is replaced
pub fn export_file_name(source: &str) -> String {
    let stem = match source.rfind('.') {
        Some(dot) if dot + 1 < source.len() && !source[dot + 1..].contains('/') => &source[..dot],
        _ => source,
    };
    let stem = if source.is_empty() { DEFAULT_EXPORT_STEM } else { stem };
    format!("{stem}.txt")
}

#[derive(Debug)]
pub struct StudySession {
    document: StoredDocument,
    transcript: Vec<ChatMessage>,
    summary: SummaryState,
    question_in_flight: bool,
    /// Latest on-demand summary, kept apart from the transcript
    generated_summary: Option<String>,
    summarizing: bool,
    inline_error: Option<String>,
}

impl StudySession {
    pub fn new(document: StoredDocument) -> Self {
        Self {
            document,
            transcript: Vec::new(),
            summary: SummaryState::NotStarted,
            question_in_flight: false,
            generated_summary: None,
            summarizing: false,
            inline_error: None,
        }
    }

    pub fn document(&self) -> &StoredDocument {
        &self.document
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn summary_state(&self) -> SummaryState {
        self.summary
    }

    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.inline_error = None;
    }

    pub fn summary(&self) -> Option<&str> {
        self.generated_summary.as_deref()
    }

    pub fn is_summarizing(&self) -> bool {
        self.summarizing
    }

    /// A request of any kind is in flight
    fn busy(&self) -> bool {
        self.question_in_flight || self.summarizing || self.summary == SummaryState::InProgress
    }

    /// The question box is usable only when nothing is in flight
    pub fn input_enabled(&self) -> bool {
        !self.busy()
    }

    // ========================================================================
    // Summary
    // ========================================================================

    /// Claim the one-shot summary. Returns the text to summarize the first
    /// time only; every later call returns `None`, whatever the outcome was.
    /// While another request is in flight the claim is left for later.
    pub fn begin_summary(&mut self) -> Option<String> {
        if self.summary != SummaryState::NotStarted || self.busy() {
            return None;
        }
        self.summary = SummaryState::InProgress;
        Some(self.document.text.clone())
    }

    /// Seed the transcript with the summary, or with the error text on failure
    pub fn finish_summary(&mut self, result: Result<String, ClientError>) {
        let text = match result {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Summary failed: {}", e);
                e.user_message()
            }
        };
        self.transcript.push(ChatMessage::new(Role::Assistant, text));
        self.summary = SummaryState::Done;
    }

    /// Run the automatic summary if it has not been attempted yet.
    /// Returns whether a request was made.
    pub async fn auto_summarize(&mut self, api: &dyn StudyApi) -> bool {
        let Some(text) = self.begin_summary() else {
            return false;
        };
        let result = api.summarize(&text).await;
        self.finish_summary(result);
        true
    }

    pub fn summary_button_label(&self) -> &'static str {
        if self.summarizing {
            "Generating summary…"
        } else {
            "Generate summary"
        }
    }

    /// Start an on-demand summary. May be repeated once the previous one
    /// has finished; blank text is refused with an inline error.
    pub fn begin_generate_summary(&mut self) -> Result<String, StudyError> {
        if self.busy() {
            return Err(StudyError::Busy);
        }
        if self.document.text.trim().is_empty() {
            self.inline_error = Some(NOTHING_TO_SUMMARIZE.to_string());
            return Err(StudyError::NothingToSummarize);
        }
        self.inline_error = None;
        self.summarizing = true;
        Ok(self.document.text.clone())
    }

    /// Replace the shown summary, or keep it and set an inline error
    pub fn finish_generate_summary(&mut self, result: Result<String, ClientError>) {
        self.summarizing = false;
        match result {
            Ok(summary) => self.generated_summary = Some(summary),
            Err(e) => {
                tracing::warn!("Summary failed: {}", e);
                self.inline_error = Some(e.user_message());
            }
        }
    }

    pub async fn generate_summary(&mut self, api: &dyn StudyApi) -> Result<(), StudyError> {
        let text = self.begin_generate_summary()?;
        let result = api.summarize(&text).await;
        self.finish_generate_summary(result);
        Ok(())
    }

    // ========================================================================
    // Questions
    // ========================================================================

    /// Accept a question: append it to the transcript and lock the input
    pub fn begin_question(&mut self, question: &str) -> Result<PendingQuestion, StudyError> {
        if !self.input_enabled() {
            return Err(StudyError::Busy);
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(StudyError::EmptyQuestion);
        }

        self.inline_error = None;
        self.question_in_flight = true;
        self.transcript.push(ChatMessage::new(Role::User, question));

        Ok(PendingQuestion {
            text: self.document.text.clone(),
            question: question.to_string(),
        })
    }

    /// Append the answer, or set an inline error leaving the transcript as is
    pub fn finish_question(&mut self, result: Result<String, ClientError>) {
        self.question_in_flight = false;
        match result {
            Ok(answer) => self.transcript.push(ChatMessage::new(Role::Assistant, answer)),
            Err(e) => {
                tracing::warn!("Question failed: {}", e);
                self.inline_error = Some(e.user_message());
            }
        }
    }

    /// Ask one question and wait for the answer
    pub async fn ask(&mut self, api: &dyn StudyApi, question: &str) -> Result<(), StudyError> {
        let pending = self.begin_question(question)?;
        let result = api.ask(&pending.text, &pending.question).await;
        self.finish_question(result);
        Ok(())
    }

    // ========================================================================
    // Export
    // ========================================================================

    pub fn export(&self) -> Result<TextExport, StudyError> {
        if self.document.text.trim().is_empty() {
            return Err(StudyError::NothingToExport);
        }
        Ok(TextExport {
            file_name: export_file_name(&self.document.file_name),
            contents: self.document.text.clone(),
        })
    }

    /// Export into `dir`; failures land in the inline error
    pub fn download(&mut self, dir: &Path) -> Option<PathBuf> {
        match self.export().and_then(|export| export.write_to(dir)) {
            Ok(path) => Some(path),
            Err(e) => {
                self.inline_error = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::mock::ScriptedApi;
    use crate::client::storage::{MemoryStore, FILE_NAME_KEY, TEXT_KEY};

    const TEXT: &str = "Page1\n\nPage2 with ünïcode\n";

    fn session() -> StudySession {
        StudySession::new(StoredDocument {
            text: TEXT.to_string(),
            file_name: "reading.pdf".to_string(),
        })
    }

    #[test]
    fn test_open_without_document() {
        let store = MemoryStore::new();
        assert!(matches!(StudyView::open(&store), StudyView::NoDocument));

        store.set(TEXT_KEY, TEXT).unwrap();
        assert!(matches!(StudyView::open(&store), StudyView::NoDocument));

        store.set(FILE_NAME_KEY, "reading.pdf").unwrap();
        assert!(matches!(StudyView::open(&store), StudyView::Ready(_)));
    }

    #[tokio::test]
    async fn test_auto_summary_fires_once() {
        let api = ScriptedApi::default().text_reply(Ok("- Main idea"));
        let mut session = session();

        assert!(session.auto_summarize(&api).await);
        assert!(!session.auto_summarize(&api).await);

        assert_eq!(api.calls(), vec!["summary"]);
        assert_eq!(session.summary_state(), SummaryState::Done);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, Role::Assistant);
        assert_eq!(session.transcript()[0].text, "- Main idea");
    }

    #[tokio::test]
    async fn test_failed_summary_seeds_error_and_never_refires() {
        let api = ScriptedApi::default().text_reply(Err("Failed to generate summary."));
        let mut session = session();

        session.auto_summarize(&api).await;
        session.auto_summarize(&api).await;

        assert_eq!(api.calls().len(), 1);
        assert_eq!(session.transcript()[0].text, "Failed to generate summary.");
    }

    #[test]
    fn test_summary_claim_blocks_questions() {
        let mut session = session();
        assert_eq!(session.begin_summary().as_deref(), Some(TEXT));
        assert_eq!(session.begin_summary(), None);
        assert!(matches!(session.begin_question("Why?"), Err(StudyError::Busy)));

        session.finish_summary(Ok("s".into()));
        assert!(session.input_enabled());
    }

    #[test]
    fn test_pending_question_defers_auto_summary() {
        let mut session = session();

        session.begin_question("Why?").unwrap();
        assert_eq!(session.begin_summary(), None);
        assert_eq!(session.summary_state(), SummaryState::NotStarted);

        session.finish_question(Ok("Because.".into()));
        assert_eq!(session.begin_summary().as_deref(), Some(TEXT));
    }

    #[tokio::test]
    async fn test_generate_summary_on_demand() {
        let api = ScriptedApi::default()
            .text_reply(Ok("- First take"))
            .text_reply(Ok("- Second take"));
        let mut session = session();
        assert_eq!(session.summary(), None);
        assert_eq!(session.summary_button_label(), "Generate summary");

        session.generate_summary(&api).await.unwrap();
        assert_eq!(session.summary(), Some("- First take"));

        session.generate_summary(&api).await.unwrap();
        assert_eq!(session.summary(), Some("- Second take"));

        assert_eq!(api.calls(), vec!["summary", "summary"]);
        assert!(session.transcript().is_empty());
        assert_eq!(session.summary_state(), SummaryState::NotStarted);
    }

    #[test]
    fn test_generate_summary_locks_button_and_input() {
        let mut session = session();

        assert_eq!(session.begin_generate_summary().unwrap(), TEXT);
        assert!(session.is_summarizing());
        assert_eq!(session.summary_button_label(), "Generating summary…");
        assert!(!session.input_enabled());
        assert!(matches!(session.begin_generate_summary(), Err(StudyError::Busy)));
        assert!(matches!(session.begin_question("Why?"), Err(StudyError::Busy)));
        assert_eq!(session.begin_summary(), None);

        session.finish_generate_summary(Ok("s".into()));
        assert!(!session.is_summarizing());
        assert!(session.input_enabled());
    }

    #[tokio::test]
    async fn test_failed_generate_summary_keeps_previous() {
        let api = ScriptedApi::default()
            .text_reply(Ok("- Kept"))
            .text_reply(Err("Failed to generate summary."));
        let mut session = session();

        session.generate_summary(&api).await.unwrap();
        session.generate_summary(&api).await.unwrap();

        assert_eq!(session.summary(), Some("- Kept"));
        assert_eq!(session.inline_error(), Some("Failed to generate summary."));
        assert!(!session.is_summarizing());
    }

    #[tokio::test]
    async fn test_generate_summary_without_text() {
        let api = ScriptedApi::default();
        let mut session = StudySession::new(StoredDocument {
            text: "  \n".to_string(),
            file_name: "blank.pdf".to_string(),
        });

        assert!(matches!(
            session.generate_summary(&api).await,
            Err(StudyError::NothingToSummarize)
        ));
        assert_eq!(session.inline_error(), Some(NOTHING_TO_SUMMARIZE));
        assert!(api.calls().is_empty());
        assert!(!session.is_summarizing());
    }

    #[tokio::test]
    async fn test_question_round_trip() {
        let api = ScriptedApi::default().text_reply(Ok("Because."));
        let mut session = session();

        session.ask(&api, "  Why?  ").await.unwrap();

        let roles: Vec<_> = session.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(session.transcript()[0].text, "Why?");
        assert_eq!(session.transcript()[1].text, "Because.");
        assert_eq!(api.calls(), vec!["ask:Why?"]);
        assert!(session.input_enabled());
    }

    #[test]
    fn test_second_question_while_pending_is_refused() {
        let mut session = session();

        let pending = session.begin_question("First?").unwrap();
        assert_eq!(pending.question, "First?");
        assert!(!session.input_enabled());
        assert!(matches!(session.begin_question("Second?"), Err(StudyError::Busy)));
        assert_eq!(session.transcript().len(), 1);

        session.finish_question(Ok("Answer".into()));
        assert!(session.begin_question("Second?").is_ok());
    }

    #[tokio::test]
    async fn test_empty_question_makes_no_call() {
        let api = ScriptedApi::default();
        let mut session = session();

        assert!(matches!(
            session.ask(&api, " \n ").await,
            Err(StudyError::EmptyQuestion)
        ));
        assert!(api.calls().is_empty());
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_failed_answer_keeps_transcript() {
        let api = ScriptedApi::default()
            .text_reply(Ok("Summary"))
            .text_reply(Err("Failed to answer question."));
        let mut session = session();

        session.auto_summarize(&api).await;
        let before = session.transcript().to_vec();

        session.ask(&api, "Why?").await.unwrap();

        assert_eq!(&session.transcript()[..before.len()], &before[..]);
        assert_eq!(session.transcript().len(), before.len() + 1);
        assert_eq!(session.inline_error(), Some("Failed to answer question."));
        assert!(session.input_enabled());

        session.dismiss_error();
        assert_eq!(session.inline_error(), None);
    }

    #[test]
    fn test_export_file_names() {
        assert_eq!(export_file_name("reading.pdf"), "reading.txt");
        assert_eq!(export_file_name("week.3.notes.PDF"), "week.3.notes.txt");
        assert_eq!(export_file_name("noext"), "noext.txt");
        assert_eq!(export_file_name(""), "reading.txt");
    }

    #[test]
    fn test_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();

        let path = session.download(dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "reading.txt");
        assert_eq!(std::fs::read(&path).unwrap(), TEXT.as_bytes());
        assert_eq!(session.inline_error(), None);
    }

    #[test]
    fn test_export_failure_is_inline() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();

        let missing = dir.path().join("does-not-exist");
        assert!(session.download(&missing).is_none());
        assert_eq!(
            session.inline_error(),
            Some("Failed to download file. Please try again.")
        );
    }
}
