//! Form controller: the only place where view state, draft storage and
//! downloads meet.

use std::sync::Arc;

use build_info_core::{
    BuildRecord, FieldName, checkbox_checked, generate_content, output_filename,
};
use build_info_download::{DownloadBackend, DownloadError, DownloadItem, DownloadRequest};
use build_info_storage::DraftStore;
use build_info_ui::{FormEvents, FormView, StatusKind, SubmitOutcome};

/// Status shown after a successful download.
pub const SUCCESS_MESSAGE: &str = "Build information generated and downloaded successfully!";
/// Status shown when rendering or downloading fails.
pub const ERROR_MESSAGE: &str = "Error generating build information. Please try again.";
/// Status shown after clearing the form.
pub const CLEARED_MESSAGE: &str = "Form cleared successfully!";

/// Owns the form lifecycle.
pub struct FormController {
    view: FormView,
    drafts: DraftStore,
    downloads: Arc<dyn DownloadBackend>,
}

impl FormController {
    /// Creates a controller around an empty form.
    pub fn new(
        drafts: DraftStore,
        downloads: Arc<dyn DownloadBackend>,
        status_display_ms: u64,
    ) -> Self {
        Self {
            view: FormView::with_status_duration(status_display_ms),
            drafts,
            downloads,
        }
    }

    /// Creates a controller and restores the saved draft, as when the popup
    /// opens.
    pub fn open(
        drafts: DraftStore,
        downloads: Arc<dyn DownloadBackend>,
        status_display_ms: u64,
    ) -> Self {
        let mut controller = Self::new(drafts, downloads, status_display_ms);
        controller.load_saved_data();
        controller
    }

    /// Current view state.
    pub fn view(&self) -> &FormView {
        &self.view
    }

    /// Renders the announcement for the current values without downloading.
    pub fn preview(&self) -> String {
        generate_content(&self.current_record())
    }

    /// Filename the next download would request.
    pub fn pending_filename(&self) -> String {
        output_filename(&self.current_record())
    }

    /// Validates, renders and downloads the current form.
    ///
    /// # Side effects
    /// At most one download request per call. A failing backend yields the
    /// generic error status; nothing is retried.
    pub fn handle_submit(&mut self, now_ms: u64) -> SubmitOutcome {
        if let Some(field) = self.view.missing_required() {
            tracing::warn!(
                stage = "form",
                action = "submit_blocked",
                field = %field,
                "required field is empty"
            );
            return SubmitOutcome::Blocked { field };
        }

        match self.generate_and_download() {
            Ok(item) => {
                self.show_status(SUCCESS_MESSAGE, StatusKind::Success, now_ms);
                SubmitOutcome::Downloaded {
                    filename: item.filename,
                }
            }
            Err(error) => {
                tracing::error!(
                    stage = "form",
                    action = "generate_failed",
                    error = %error,
                    "Error generating build info"
                );
                self.show_status(ERROR_MESSAGE, StatusKind::Error, now_ms);
                SubmitOutcome::Failed
            }
        }
    }

    /// Shows or hides clone options. Turning them off clears the previous
    /// link.
    pub fn toggle_clone_options(&mut self, is_clone: bool) {
        self.view.toggle_clone_options(is_clone);
    }

    /// Shows the design-shell options iff `value` selects a type.
    pub fn toggle_design_shell_options(&mut self, value: &str) {
        self.view.toggle_design_shell_options(value);
    }

    /// Persists the current form as the draft. Failures are logged only.
    pub fn save_form_data(&self) {
        if let Err(error) = self.drafts.save(&self.view.form_data()) {
            tracing::error!(
                stage = "storage",
                action = "save_failed",
                error = %error,
                "Error saving form data"
            );
        }
    }

    /// Restores the saved draft into the form. Failures are logged only.
    pub fn load_saved_data(&mut self) {
        match self.drafts.load() {
            Ok(Some(draft)) => {
                self.view.restore(&draft);
                tracing::info!(
                    stage = "storage",
                    action = "draft_restored",
                    fields = draft.len(),
                    "saved form data restored"
                );
            }
            Ok(None) => {}
            Err(error) => {
                tracing::error!(
                    stage = "storage",
                    action = "load_failed",
                    error = %error,
                    "Error loading saved data"
                );
            }
        }
    }

    /// Resets the form, hides both sections, confirms, and deletes the
    /// draft.
    pub fn clear_form(&mut self, now_ms: u64) {
        self.view.reset();
        self.show_status(CLEARED_MESSAGE, StatusKind::Success, now_ms);

        if let Err(error) = self.drafts.clear() {
            tracing::error!(
                stage = "storage",
                action = "clear_failed",
                error = %error,
                "Error clearing saved data"
            );
        }
    }

    /// Displays a transient status message.
    pub fn show_status(&mut self, message: &str, kind: StatusKind, now_ms: u64) {
        self.view.show_status(message, kind, now_ms);
    }

    /// Advances status timers.
    pub fn tick(&mut self, now_ms: u64) {
        self.view.on_tick(now_ms);
    }

    fn current_record(&self) -> BuildRecord {
        BuildRecord::from_form_data(&self.view.form_data())
    }

    fn generate_and_download(&self) -> Result<DownloadItem, DownloadError> {
        let record = self.current_record();
        let request = DownloadRequest::text(output_filename(&record), generate_content(&record));
        self.downloads.download(&request)
    }
}

impl FormEvents for FormController {
    fn on_submit(&mut self, now_ms: u64) -> SubmitOutcome {
        self.handle_submit(now_ms)
    }

    fn on_field_change(&mut self, field: FieldName, value: &str, now_ms: u64) {
        match field {
            FieldName::IsCloneBuild => self.on_toggle_clone(checkbox_checked(value), now_ms),
            FieldName::DesignShellType => self.on_toggle_design_shell(value, now_ms),
            _ => {
                self.view.set_value(field, value);
                self.save_form_data();
            }
        }
    }

    fn on_toggle_clone(&mut self, is_clone: bool, _now_ms: u64) {
        self.toggle_clone_options(is_clone);
        self.save_form_data();
    }

    fn on_toggle_design_shell(&mut self, value: &str, _now_ms: u64) {
        self.view.set_value(FieldName::DesignShellType, value);
        self.toggle_design_shell_options(value);
        self.save_form_data();
    }

    fn on_clear(&mut self, now_ms: u64) {
        self.clear_form(now_ms);
    }
}
