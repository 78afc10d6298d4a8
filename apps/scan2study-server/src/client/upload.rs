//! Upload view
//!
//! Picking a file validates it locally and, when it is a PDF, parses it
//! straight away. A successful parse persists the document and hands off to
//! the study view.

use super::api::{SelectedFile, StudyApi};
use super::storage::{DocumentStore, StoredDocument};

const NOT_A_PDF: &str = "Please upload a PDF file.";
const NO_TEXT: &str = "No text could be extracted from the PDF. Please try a different file.";
const UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

/// File name persisted when the server does not echo one back
pub const DEFAULT_FILE_NAME: &str = "document.pdf";

/// Upload view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    /// A PDF is picked and ready to parse
    Selected,
    /// A parse request is in flight
    Parsing,
    /// Last selection or parse failed, with the message to show
    Error(String),
}

/// Where to go after a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Document persisted, open the study view
    OpenStudy(StoredDocument),
    /// Stay on the upload view; the state holds the error
    Stay,
}

#[derive(Debug)]
pub struct UploadFlow {
    state: UploadState,
    selected: Option<SelectedFile>,
}

impl Default for UploadFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadFlow {
    pub fn new() -> Self {
        Self {
            state: UploadState::Idle,
            selected: None,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_parsing(&self) -> bool {
        self.state == UploadState::Parsing
    }

    /// Label of the action button, `None` when there is no file to act on
    pub fn action_label(&self) -> Option<&'static str> {
        self.selected.as_ref()?;
        Some(match self.state {
            UploadState::Parsing => "Parsing your PDF…",
            UploadState::Error(_) => "Retry",
            _ => "Continue",
        })
    }

    /// Pick a file, or clear the selection with `None`.
    /// Non-PDF files never reach the server.
    pub fn select(&mut self, file: Option<SelectedFile>) -> &UploadState {
        if self.is_parsing() {
            return &self.state;
        }

        match file {
            None => {
                self.selected = None;
                self.state = UploadState::Idle;
            }
            Some(file) if file.is_pdf() => {
                self.selected = Some(file);
                self.state = UploadState::Selected;
            }
            Some(file) => {
                tracing::debug!(name = %file.name, "Rejected non-PDF selection");
                self.selected = None;
                self.state = UploadState::Error(NOT_A_PDF.to_string());
            }
        }
        &self.state
    }

    /// Select a file and, if it is a valid PDF, parse it immediately
    pub async fn select_and_parse(
        &mut self,
        file: Option<SelectedFile>,
        api: &dyn StudyApi,
        store: &dyn DocumentStore,
    ) -> UploadOutcome {
        if self.select(file) == &UploadState::Selected {
            self.parse(api, store).await
        } else {
            UploadOutcome::Stay
        }
    }

    /// Parse the selected file. Also serves as retry after an error.
    pub async fn parse(&mut self, api: &dyn StudyApi, store: &dyn DocumentStore) -> UploadOutcome {
        if self.is_parsing() {
            return UploadOutcome::Stay;
        }
        let Some(file) = self.selected.clone() else {
            return UploadOutcome::Stay;
        };

        self.state = UploadState::Parsing;

        let response = match api.parse_pdf(&file).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(name = %file.name, "Parse failed: {}", e);
                return self.fail(e.user_message());
            }
        };

        if response.text.trim().is_empty() {
            return self.fail(NO_TEXT.to_string());
        }

        let document = StoredDocument {
            text: response.text,
            file_name: response
                .file_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        };

        if let Err(e) = document.save(store) {
            tracing::error!("Failed to persist document: {}", e);
            return self.fail(UNEXPECTED.to_string());
        }

        self.state = UploadState::Idle;
        self.selected = None;
        UploadOutcome::OpenStudy(document)
    }

    fn fail(&mut self, message: String) -> UploadOutcome {
        self.state = UploadState::Error(message);
        UploadOutcome::Stay
    }
}
