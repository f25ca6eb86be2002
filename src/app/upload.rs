//! Upload/extraction form: the only component that talks to the network on
//! its own (document processing and record creation), rather than routing
//! through the search controller.
//!
//! The form walks a small state machine:
//!
//! ```text
//! NoFile -> FileSelected -> Extracting -> DraftReady -> Saving -> Saved
//!                               |                          |
//!                               +--------> Failed <--------+
//! ```
//!
//! A failure after extraction keeps the selected file so processing can be
//! retried; a failure after saving keeps the draft so saving can be
//! retried without re-extracting.

use std::path::{Path, PathBuf};

use crate::api::ApiError;
use crate::models::{ExtractionSuggestions, NewParceria};

pub const MSG_SELECT_FILE: &str = "Por favor, selecione um arquivo PDF.";
pub const MSG_PROCESS_FAILED: &str = "Falha ao processar o documento.";
pub const MSG_SAVE_FAILED: &str = "Falha ao salvar a parceria.";
pub const MSG_SAVED: &str = "Parceria salva com sucesso!";

/// Where the form currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    NoFile,
    FileSelected,
    Extracting,
    DraftReady,
    Saving,
    /// Terminal success; equivalent to NoFile apart from the message.
    Saved,
    Failed,
}

/// Editable draft fields, all kept as text until save time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub organization: String,
    pub object_description: String,
    pub work_plan: String,
    pub tax_id: String,
    /// Free text in the form; coerced to integer-or-null on save.
    pub term_year: String,
}

/// One draft field, for single-field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Organization,
    ObjectDescription,
    WorkPlan,
    TaxId,
    TermYear,
}

impl Draft {
    fn from_suggestions(suggestions: ExtractionSuggestions) -> Self {
        Self {
            organization: suggestions.organization.unwrap_or_default(),
            object_description: suggestions.object_description.unwrap_or_default(),
            // Extraction never suggests a work plan; always starts empty.
            work_plan: String::new(),
            tax_id: suggestions.tax_id.unwrap_or_default(),
            term_year: suggestions.term_year.unwrap_or_default(),
        }
    }

    /// Build the creation payload, coercing the year text to an integer or
    /// null when it does not parse in full ("20x1" -> null).
    pub fn to_payload(&self) -> NewParceria {
        NewParceria {
            organization: self.organization.clone(),
            object_description: self.object_description.clone(),
            work_plan: self.work_plan.clone(),
            tax_id: self.tax_id.clone(),
            term_year: parse_year(&self.term_year),
        }
    }
}

/// Integer-or-null year coercion.
pub fn parse_year(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

/// The upload form state.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub state: UploadState,
    pub file: Option<PathBuf>,
    pub draft: Option<Draft>,
    /// Validation, failure, or success message.
    pub message: Option<String>,
}

impl UploadForm {
    /// User picked a file. Any previous draft and message are discarded.
    pub fn select_file(&mut self, path: PathBuf) {
        self.file = Some(path);
        self.draft = None;
        self.message = None;
        self.state = UploadState::FileSelected;
    }

    /// User triggered processing. Returns the file to submit, or `None`
    /// after setting a validation message when no file is selected.
    pub fn begin_extraction(&mut self) -> Option<&Path> {
        if self.file.is_none() {
            self.message = Some(MSG_SELECT_FILE.to_string());
            return None;
        }
        self.state = UploadState::Extracting;
        self.message = None;
        self.file.as_deref()
    }

    /// Extraction finished. Success populates the draft; failure keeps the
    /// file so the user can re-trigger processing.
    pub fn apply_extraction(&mut self, result: Result<ExtractionSuggestions, ApiError>) {
        match result {
            Ok(suggestions) => {
                self.draft = Some(Draft::from_suggestions(suggestions));
                self.state = UploadState::DraftReady;
            }
            Err(_) => {
                self.state = UploadState::Failed;
                self.message = Some(MSG_PROCESS_FAILED.to_string());
            }
        }
    }

    /// Edit exactly one draft field, leaving the others untouched.
    pub fn edit_field(&mut self, field: DraftField, value: String) {
        if let Some(draft) = self.draft.as_mut() {
            match field {
                DraftField::Organization => draft.organization = value,
                DraftField::ObjectDescription => draft.object_description = value,
                DraftField::WorkPlan => draft.work_plan = value,
                DraftField::TaxId => draft.tax_id = value,
                DraftField::TermYear => draft.term_year = value,
            }
        }
    }

    /// User triggered save. Returns the payload to POST, or `None` when no
    /// draft is ready.
    pub fn begin_save(&mut self) -> Option<NewParceria> {
        let draft = self.draft.as_ref()?;
        let payload = draft.to_payload();
        self.state = UploadState::Saving;
        self.message = None;
        Some(payload)
    }

    /// Save finished. Success clears the draft and file; failure preserves
    /// the draft so saving can be retried without re-extracting.
    pub fn apply_save(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.draft = None;
                self.file = None;
                self.state = UploadState::Saved;
                self.message = Some(MSG_SAVED.to_string());
            }
            Err(_) => {
                self.state = UploadState::Failed;
                self.message = Some(MSG_SAVE_FAILED.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestions() -> ExtractionSuggestions {
        ExtractionSuggestions {
            organization: Some("Instituto Aurora".to_string()),
            object_description: Some("Cooperação técnica".to_string()),
            tax_id: Some("21.154.877/0001-07".to_string()),
            term_year: Some("2024".to_string()),
        }
    }

    #[test]
    fn process_without_file_sets_validation_message_and_no_request() {
        let mut form = UploadForm::default();
        assert!(form.begin_extraction().is_none());
        assert_eq!(form.message.as_deref(), Some(MSG_SELECT_FILE));
        assert_eq!(form.state, UploadState::NoFile);
    }

    #[test]
    fn extraction_success_populates_draft_with_empty_work_plan() {
        let mut form = UploadForm::default();
        form.select_file(PathBuf::from("termo.pdf"));
        assert_eq!(form.state, UploadState::FileSelected);

        assert!(form.begin_extraction().is_some());
        assert_eq!(form.state, UploadState::Extracting);

        form.apply_extraction(Ok(suggestions()));
        assert_eq!(form.state, UploadState::DraftReady);
        let draft = form.draft.as_ref().unwrap();
        assert_eq!(draft.organization, "Instituto Aurora");
        assert_eq!(draft.term_year, "2024");
        assert!(draft.work_plan.is_empty());
    }

    #[test]
    fn extraction_failure_keeps_file_for_retry() {
        let mut form = UploadForm::default();
        form.select_file(PathBuf::from("termo.pdf"));
        form.begin_extraction();
        form.apply_extraction(Err(ApiError::Api("HTTP 500".into())));

        assert_eq!(form.state, UploadState::Failed);
        assert_eq!(form.message.as_deref(), Some(MSG_PROCESS_FAILED));
        assert!(form.file.is_some());

        // Manual retry goes straight back to Extracting.
        assert!(form.begin_extraction().is_some());
        assert_eq!(form.state, UploadState::Extracting);
    }

    #[test]
    fn edits_touch_exactly_one_field() {
        let mut form = UploadForm::default();
        form.select_file(PathBuf::from("termo.pdf"));
        form.begin_extraction();
        form.apply_extraction(Ok(suggestions()));

        form.edit_field(DraftField::WorkPlan, "Plano detalhado".to_string());
        let draft = form.draft.as_ref().unwrap();
        assert_eq!(draft.work_plan, "Plano detalhado");
        assert_eq!(draft.organization, "Instituto Aurora");
        assert_eq!(draft.tax_id, "21.154.877/0001-07");
    }

    #[test]
    fn unparseable_year_becomes_null_in_payload() {
        let mut form = UploadForm::default();
        form.select_file(PathBuf::from("termo.pdf"));
        form.begin_extraction();
        form.apply_extraction(Ok(suggestions()));
        form.edit_field(DraftField::TermYear, "20x1".to_string());

        let payload = form.begin_save().unwrap();
        assert_eq!(payload.term_year, None);
        assert_eq!(form.state, UploadState::Saving);
    }

    #[test]
    fn year_parsing_accepts_whole_numbers_only() {
        assert_eq!(parse_year("2024"), Some(2024));
        assert_eq!(parse_year(" 2024 "), Some(2024));
        assert_eq!(parse_year("20x1"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("2024/2025"), None);
    }

    #[test]
    fn save_success_resets_to_no_file_equivalent() {
        let mut form = UploadForm::default();
        form.select_file(PathBuf::from("termo.pdf"));
        form.begin_extraction();
        form.apply_extraction(Ok(suggestions()));
        form.begin_save().unwrap();
        form.apply_save(Ok(()));

        assert_eq!(form.state, UploadState::Saved);
        assert!(form.draft.is_none());
        assert!(form.file.is_none());
        assert_eq!(form.message.as_deref(), Some(MSG_SAVED));
    }

    #[test]
    fn save_failure_preserves_draft_for_retry() {
        let mut form = UploadForm::default();
        form.select_file(PathBuf::from("termo.pdf"));
        form.begin_extraction();
        form.apply_extraction(Ok(suggestions()));
        form.begin_save().unwrap();
        form.apply_save(Err(ApiError::Connection("refused".into())));

        assert_eq!(form.state, UploadState::Failed);
        assert_eq!(form.message.as_deref(), Some(MSG_SAVE_FAILED));
        assert!(form.draft.is_some());

        // Retry without re-extracting.
        assert!(form.begin_save().is_some());
        assert_eq!(form.state, UploadState::Saving);
    }
}
