//! Wizard controller.
//!
//! [`WizardController`] owns one session's state: the step machine, the
//! questionnaire form, the last skin profile and the recommendation view.
//! Front ends feed it user events and read back what to display.
//!
//! The recommendation view is published on a [`tokio::sync::watch`]
//! channel so a renderer can show the loading placeholder while the
//! pacing delay runs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use skinwise_analysis::gateway::{Submission, UploadError, UploadGateway};
use skinwise_analysis::image_file::ImageFile;
use skinwise_core::answers::AnswerForm;
use skinwise_core::catalog::Catalog;
use skinwise_core::presentation::RecommendationView;
use skinwise_core::profile::SkinProfile;
use skinwise_core::recommendation::recommend;
use skinwise_core::wizard::{Step, TransitionError, WizardState};

/// Holds the wizard's upload-in-flight mark for one attempt.
///
/// An attempt dropped before it is settled (the upload future was
/// abandoned) counts as a failed upload.
struct UploadAttempt<'a> {
    state: Option<&'a mut WizardState>,
}

impl<'a> UploadAttempt<'a> {
    fn begin(state: &'a mut WizardState) -> Self {
        state.begin_upload();
        Self { state: Some(state) }
    }

    fn finish(mut self, success: bool) {
        if let Some(state) = self.state.take() {
            state.finish_upload(success);
        }
    }

    fn abort(mut self) {
        if let Some(state) = self.state.take() {
            state.abort_upload();
        }
    }
}

impl Drop for UploadAttempt<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::info!("Upload abandoned before completion");
            state.finish_upload(false);
        }
    }
}

pub struct WizardController {
    gateway: Arc<UploadGateway>,
    catalog: Catalog,
    recommendation_delay: Duration,
    state: WizardState,
    form: AnswerForm,
    profile: Option<SkinProfile>,
    upload_error: Option<UploadError>,
    view_tx: watch::Sender<Option<RecommendationView>>,
}

impl WizardController {
    pub fn new(gateway: Arc<UploadGateway>, catalog: Catalog, recommendation_delay: Duration) -> Self {
        let (view_tx, _) = watch::channel(None);
        Self {
            gateway,
            catalog,
            recommendation_delay,
            state: WizardState::new(),
            form: AnswerForm::new(),
            profile: None,
            upload_error: None,
            view_tx,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step()
    }

    pub fn form(&self) -> &AnswerForm {
        &self.form
    }

    /// Questionnaire edits go through here.
    pub fn form_mut(&mut self) -> &mut AnswerForm {
        &mut self.form
    }

    /// Profile from the last successful analysis.
    pub fn profile(&self) -> Option<&SkinProfile> {
        self.profile.as_ref()
    }

    /// Error from the last upload attempt, cleared when a new one starts.
    pub fn upload_error(&self) -> Option<&UploadError> {
        self.upload_error.as_ref()
    }

    /// Current recommendation view (`None` outside the last step).
    pub fn view(&self) -> Option<RecommendationView> {
        self.view_tx.borrow().clone()
    }

    /// Follow recommendation view changes.
    pub fn subscribe_view(&self) -> watch::Receiver<Option<RecommendationView>> {
        self.view_tx.subscribe()
    }

    /// Send an image for analysis and apply the resulting profile.
    ///
    /// On success the form's skin type and sensitivity are pre-selected.
    /// A failed analysis leaves the upload step incomplete. A rejected
    /// file type or a dropped duplicate leaves the previous upload status
    /// as it was. Dropping the returned future before it resolves counts
    /// as a failed upload.
    pub async fn upload_image(
        &mut self,
        file: &ImageFile,
        cancel: &CancellationToken,
    ) -> Result<Submission, UploadError> {
        self.upload_error = None;
        let attempt = UploadAttempt::begin(&mut self.state);

        let result = self.gateway.submit_image(file, cancel).await;

        match &result {
            Ok(Submission::Completed(profile)) => {
                attempt.finish(true);
                self.form.apply_profile(profile);
                self.profile = Some(profile.clone());
                tracing::info!(code = %profile.code, "Skin profile applied to questionnaire");
            }
            Ok(Submission::Dropped) => attempt.abort(),
            Err(e @ UploadError::InvalidFileType(_)) => {
                attempt.abort();
                self.upload_error = Some(e.clone());
            }
            Err(e) => {
                attempt.finish(false);
                self.profile = None;
                self.upload_error = Some(e.clone());
            }
        }

        result
    }

    /// Advance one step.
    ///
    /// Entering the recommendations step publishes
    /// [`RecommendationView::Loading`], waits the pacing delay, then
    /// computes and publishes the result.
    pub async fn next(&mut self) -> Result<Step, TransitionError> {
        let from = self.state.current_step();
        let step = match self.state.advance(&self.form) {
            Ok(step) => step,
            Err(e) => {
                tracing::info!(step = from.label(), error = %e, "Step transition rejected");
                return Err(e);
            }
        };

        if from != step {
            tracing::info!(from = from.label(), to = step.label(), "Advanced wizard step");
        }

        if from == Step::Questionnaire && step == Step::Recommendations {
            self.view_tx.send_replace(Some(RecommendationView::Loading));
            tokio::time::sleep(self.recommendation_delay).await;
            let view = self.compute_view()?;
            self.view_tx.send_replace(Some(view));
        }

        Ok(step)
    }

    /// Go back one step; always allowed.
    pub fn back(&mut self) -> Step {
        let from = self.state.current_step();
        let step = self.state.back();
        if from == Step::Recommendations {
            self.view_tx.send_replace(None);
        }
        tracing::info!(from = from.label(), to = step.label(), "Went back a wizard step");
        step
    }

    fn compute_view(&self) -> Result<RecommendationView, TransitionError> {
        let answers = self.form.current_answers()?;
        let products = recommend(&answers, &self.catalog);
        tracing::info!(
            product_type = %answers.product_type,
            skin_type = %answers.skin_type,
            concerns = answers.concerns.len(),
            allergies = answers.allergies.len(),
            matches = products.len(),
            "Computed recommendations",
        );
        Ok(RecommendationView::from_results(
            answers.product_type,
            &products,
        ))
    }
}
