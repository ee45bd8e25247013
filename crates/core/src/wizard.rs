//! Wizard step definitions and the linear step state machine.
//!
//! The wizard has three fixed steps: upload a photo, answer the
//! questionnaire, view recommendations. Forward transitions are gated on
//! validated input; backward transitions are always allowed.

use serde::{Deserialize, Serialize};

use crate::answers::AnswerForm;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The three steps of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Upload,
    Questionnaire,
    Recommendations,
}

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 3;

impl Step {
    /// Convert a 1-based step number to a `Step`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Upload),
            2 => Ok(Self::Questionnaire),
            3 => Ok(Self::Recommendations),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::Upload => 1,
            Self::Questionnaire => 2,
            Self::Recommendations => 3,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Questionnaire => "Questionnaire",
            Self::Recommendations => "Recommendations",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// A required input that blocks a forward transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Image,
    SkinType,
    Concerns,
    ProductType,
}

impl MissingField {
    /// Inline message shown next to the offending form section.
    pub fn message(self) -> &'static str {
        match self {
            Self::Image => "Please upload an image to continue",
            Self::SkinType => "Please select your skin type",
            Self::Concerns => "Please select at least one skin concern",
            Self::ProductType => "Please select a product type",
        }
    }
}

/// One or more required inputs are missing. All of them are reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {}", join_messages(.missing))]
pub struct ValidationFailed {
    pub missing: Vec<MissingField>,
}

impl ValidationFailed {
    pub fn new(missing: Vec<MissingField>) -> Self {
        Self { missing }
    }

    pub fn contains(&self, field: MissingField) -> bool {
        self.missing.contains(&field)
    }

    pub fn messages(&self) -> Vec<&'static str> {
        self.missing.iter().map(|f| f.message()).collect()
    }
}

fn join_messages(missing: &[MissingField]) -> String {
    missing
        .iter()
        .map(|f| f.message())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a forward transition was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Please wait for the image analysis to finish")]
    UploadInProgress,

    #[error(transparent)]
    ValidationFailed(#[from] ValidationFailed),
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Position and upload bookkeeping for one wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardState {
    current_step: Step,
    upload_complete: bool,
    upload_in_flight: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            current_step: Step::Upload,
            upload_complete: false,
            upload_in_flight: false,
        }
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn upload_complete(&self) -> bool {
        self.upload_complete
    }

    pub fn upload_in_flight(&self) -> bool {
        self.upload_in_flight
    }

    /// Progress indicator: a step is active once it has been reached.
    pub fn is_step_active(&self, step: Step) -> bool {
        step <= self.current_step
    }

    /// Mark an upload as started.
    pub fn begin_upload(&mut self) {
        self.upload_in_flight = true;
    }

    /// Mark the in-flight upload as finished.
    ///
    /// A failed upload also clears a previously completed one, so a
    /// rejected re-upload blocks progression again.
    pub fn finish_upload(&mut self, success: bool) {
        self.upload_in_flight = false;
        self.upload_complete = success;
    }

    /// Clear the in-flight flag for an attempt that never reached the
    /// service (rejected file, dropped duplicate). Completion is kept.
    pub fn abort_upload(&mut self) {
        self.upload_in_flight = false;
    }

    /// Whether the upload step's preconditions hold.
    pub fn check_upload(&self) -> Result<(), TransitionError> {
        if self.upload_in_flight {
            return Err(TransitionError::UploadInProgress);
        }
        if !self.upload_complete {
            return Err(ValidationFailed::new(vec![MissingField::Image]).into());
        }
        Ok(())
    }

    /// Advance one step if the current step's preconditions hold.
    ///
    /// On the last step this is a no-op. On rejection the state is
    /// unchanged.
    pub fn advance(&mut self, form: &AnswerForm) -> Result<Step, TransitionError> {
        let next = match self.current_step {
            Step::Upload => {
                self.check_upload()?;
                Step::Questionnaire
            }
            Step::Questionnaire => {
                let missing = form.missing_fields();
                if !missing.is_empty() {
                    return Err(ValidationFailed::new(missing).into());
                }
                Step::Recommendations
            }
            Step::Recommendations => Step::Recommendations,
        };
        self.current_step = next;
        Ok(next)
    }

    /// Go back one step. Always allowed; a no-op on the first step.
    pub fn back(&mut self) -> Step {
        self.current_step = match self.current_step {
            Step::Upload | Step::Questionnaire => Step::Upload,
            Step::Recommendations => Step::Questionnaire,
        };
        self.current_step
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::types::{Concern, ProductType, SkinType};

    fn complete_form() -> AnswerForm {
        let mut form = AnswerForm::new();
        form.select_skin_type(SkinType::Dry);
        form.toggle_concern(Concern::Dryness);
        form.select_product_type(ProductType::Serum);
        form
    }

    fn on_questionnaire() -> WizardState {
        let mut state = WizardState::new();
        state.begin_upload();
        state.finish_upload(true);
        state.advance(&AnswerForm::new()).unwrap();
        state
    }

    // -- Step --

    #[test]
    fn step_number_roundtrip() {
        for n in MIN_STEP..=MAX_STEP {
            assert_eq!(Step::from_number(n).unwrap().to_number(), n);
        }
    }

    #[test]
    fn step_from_number_invalid() {
        assert!(Step::from_number(0).is_err());
        assert!(Step::from_number(4).is_err());
    }

    #[test]
    fn step_labels_are_nonempty() {
        for n in MIN_STEP..=MAX_STEP {
            assert!(!Step::from_number(n).unwrap().label().is_empty());
        }
    }

    // -- upload gate --

    #[test]
    fn starts_on_upload_step() {
        let state = WizardState::new();
        assert_eq!(state.current_step(), Step::Upload);
        assert!(!state.upload_complete());
        assert!(!state.upload_in_flight());
    }

    #[test]
    fn cannot_leave_upload_without_image() {
        let mut state = WizardState::new();
        let err = state.advance(&complete_form()).unwrap_err();
        assert_matches!(err, TransitionError::ValidationFailed(ref v) if v.contains(MissingField::Image));
        assert_eq!(state.current_step(), Step::Upload);
    }

    #[test]
    fn cannot_leave_upload_while_in_flight() {
        let mut state = WizardState::new();
        state.begin_upload();
        assert_matches!(
            state.advance(&complete_form()),
            Err(TransitionError::UploadInProgress)
        );
        assert_eq!(state.current_step(), Step::Upload);
    }

    #[test]
    fn reupload_in_flight_blocks_even_after_previous_success() {
        let mut state = WizardState::new();
        state.begin_upload();
        state.finish_upload(true);
        state.begin_upload();
        assert_matches!(
            state.advance(&AnswerForm::new()),
            Err(TransitionError::UploadInProgress)
        );
    }

    #[test]
    fn failed_reupload_clears_completion() {
        let mut state = WizardState::new();
        state.begin_upload();
        state.finish_upload(true);
        state.begin_upload();
        state.finish_upload(false);
        assert!(!state.upload_complete());
        assert!(state.advance(&AnswerForm::new()).is_err());
    }

    #[test]
    fn aborted_attempt_keeps_previous_completion() {
        let mut state = WizardState::new();
        state.begin_upload();
        state.finish_upload(true);
        state.begin_upload();
        state.abort_upload();
        assert!(!state.upload_in_flight());
        assert!(state.upload_complete());
    }

    #[test]
    fn completed_upload_advances_to_questionnaire() {
        let state = on_questionnaire();
        assert_eq!(state.current_step(), Step::Questionnaire);
    }

    // -- questionnaire gate --

    #[test]
    fn questionnaire_reports_all_missing_fields_together() {
        let mut state = on_questionnaire();
        let err = state.advance(&AnswerForm::new()).unwrap_err();
        let TransitionError::ValidationFailed(failed) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(
            failed.missing,
            vec![
                MissingField::SkinType,
                MissingField::Concerns,
                MissingField::ProductType
            ]
        );
        assert_eq!(failed.messages().len(), 3);
        assert_eq!(state.current_step(), Step::Questionnaire);
    }

    #[test]
    fn questionnaire_reports_only_unmet_fields() {
        let mut state = on_questionnaire();
        let mut form = AnswerForm::new();
        form.select_skin_type(SkinType::Oily);
        let err = state.advance(&form).unwrap_err();
        assert_matches!(
            err,
            TransitionError::ValidationFailed(ref v)
                if v.missing == vec![MissingField::Concerns, MissingField::ProductType]
        );
    }

    #[test]
    fn complete_questionnaire_advances_to_recommendations() {
        let mut state = on_questionnaire();
        assert_eq!(state.advance(&complete_form()).unwrap(), Step::Recommendations);
    }

    #[test]
    fn advance_on_last_step_stays_put() {
        let mut state = on_questionnaire();
        state.advance(&complete_form()).unwrap();
        assert_eq!(state.advance(&complete_form()).unwrap(), Step::Recommendations);
    }

    // -- back navigation --

    #[test]
    fn back_is_unconditional_and_bounded() {
        let mut state = on_questionnaire();
        state.advance(&complete_form()).unwrap();
        assert_eq!(state.back(), Step::Questionnaire);
        assert_eq!(state.back(), Step::Upload);
        assert_eq!(state.back(), Step::Upload);
    }

    #[test]
    fn progress_marks_reached_steps_active() {
        let state = on_questionnaire();
        assert!(state.is_step_active(Step::Upload));
        assert!(state.is_step_active(Step::Questionnaire));
        assert!(!state.is_step_active(Step::Recommendations));
    }

    #[test]
    fn validation_error_display_lists_messages() {
        let failed = ValidationFailed::new(vec![MissingField::SkinType, MissingField::Concerns]);
        let text = failed.to_string();
        assert!(text.contains("skin type"));
        assert!(text.contains("skin concern"));
    }
}
