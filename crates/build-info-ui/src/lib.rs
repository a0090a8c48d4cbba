#![warn(missing_docs)]
//! # build-info-ui
//!
//! ## Purpose
//! Defines the view-state model of the build form.
//!
//! ## Responsibilities
//! - Hold current field values as a [`BuildRecord`].
//! - Track the two conditional sections (clone options, design-shell
//!   options) and the `required` state of the previous link.
//! - Drive the transient status line and its hide timers.
//! - Declare the [`FormEvents`] surface the form shell calls into.
//!
//! ## Data flow
//! Shell events -> controller -> [`FormView`] mutations -> shell re-renders
//! from the view's getters.
//!
//! ## Ownership and lifetimes
//! `FormView` owns all values; snapshots ([`FormView::form_data`]) are
//! detached copies handed to storage and rendering.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Constraint
//! violations are reported by [`FormView::missing_required`].

use build_info_core::{BuildRecord, FieldName, FormData};

/// Default time a status message stays visible.
pub const STATUS_DISPLAY_MS: u64 = 3_000;

/// Status message flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// One status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Display text.
    pub text: String,
    /// Message flavor.
    pub kind: StatusKind,
}

/// Result of one submit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The announcement was rendered and handed to the download backend.
    Downloaded {
        /// Final downloaded file name.
        filename: String,
    },
    /// A required field is empty; nothing was rendered.
    Blocked {
        /// First field failing its constraint.
        field: FieldName,
    },
    /// Rendering or downloading failed; an error status is showing.
    Failed,
}

/// Event surface of the build form.
pub trait FormEvents {
    /// Form submitted.
    fn on_submit(&mut self, now_ms: u64) -> SubmitOutcome;

    /// A field value changed through user input.
    fn on_field_change(&mut self, field: FieldName, value: &str, now_ms: u64);

    /// Clone-build checkbox flipped.
    fn on_toggle_clone(&mut self, is_clone: bool, now_ms: u64);

    /// Design-shell type selection changed.
    fn on_toggle_design_shell(&mut self, value: &str, now_ms: u64);

    /// Clear button pressed.
    fn on_clear(&mut self, now_ms: u64);
}

/// Aggregate form view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    record: BuildRecord,
    clone_options_visible: bool,
    previous_link_required: bool,
    design_shell_options_visible: bool,
    status: Option<StatusMessage>,
    status_visible: bool,
    pending_hides_at_ms: Vec<u64>,
    status_display_ms: u64,
}

impl FormView {
    /// Creates an empty form with the default status duration.
    pub fn new() -> Self {
        Self::with_status_duration(STATUS_DISPLAY_MS)
    }

    /// Creates an empty form whose status messages stay visible for
    /// `status_display_ms`.
    pub fn with_status_duration(status_display_ms: u64) -> Self {
        Self {
            record: BuildRecord::default(),
            clone_options_visible: false,
            previous_link_required: false,
            design_shell_options_visible: false,
            status: None,
            status_visible: false,
            pending_hides_at_ms: Vec::new(),
            status_display_ms,
        }
    }

    /// Current field values.
    pub fn record(&self) -> &BuildRecord {
        &self.record
    }

    /// Current value of one field.
    pub fn value(&self, field: FieldName) -> String {
        self.record.get(field)
    }

    /// Sets one field without running any visibility rule.
    pub fn set_value(&mut self, field: FieldName, value: &str) {
        self.record.set(field, value);
    }

    /// Snapshot of the form as submitted/persisted data.
    pub fn form_data(&self) -> FormData {
        self.record.to_form_data()
    }

    /// Shows or hides the clone options and flips the previous-link
    /// `required` state. Hiding clears the previous link.
    pub fn toggle_clone_options(&mut self, is_clone: bool) {
        self.record.is_clone_build = is_clone;
        self.apply_clone_visibility(is_clone);
        if !is_clone {
            self.record.previous_link.clear();
        }
    }

    /// Shows the design-shell options iff a type is selected.
    pub fn toggle_design_shell_options(&mut self, value: &str) {
        self.design_shell_options_visible = !value.is_empty();
    }

    /// Repopulates fields from a persisted draft and re-applies both
    /// visibility rules.
    ///
    /// Unknown keys are ignored. The checkbox is restored from its own
    /// marker; an absent checkbox key leaves it unchecked. Restoring never
    /// clears the previous link.
    pub fn restore(&mut self, draft: &FormData) {
        self.record.is_clone_build = false;
        for (key, value) in draft {
            if let Some(field) = FieldName::from_key(key) {
                self.record.set(field, value.as_str());
            }
        }

        let is_clone = self.record.is_clone_build;
        self.apply_clone_visibility(is_clone);
        let design_shell_type = self.record.design_shell_type.clone();
        self.toggle_design_shell_options(&design_shell_type);
    }

    /// Resets every field and hides both conditional sections.
    pub fn reset(&mut self) {
        self.record = BuildRecord::default();
        self.apply_clone_visibility(false);
        self.design_shell_options_visible = false;
    }

    /// First field violating its native constraint, if any.
    pub fn missing_required(&self) -> Option<FieldName> {
        (self.previous_link_required && self.record.previous_link.is_empty())
            .then_some(FieldName::PreviousLink)
    }

    /// Returns `true` when the clone options section is visible.
    pub fn clone_options_visible(&self) -> bool {
        self.clone_options_visible
    }

    /// Returns `true` when the previous link is required.
    pub fn previous_link_required(&self) -> bool {
        self.previous_link_required
    }

    /// Returns `true` when the design-shell options section is visible.
    pub fn design_shell_options_visible(&self) -> bool {
        self.design_shell_options_visible
    }

    /// Replaces the status line and schedules its hide.
    ///
    /// Earlier hide timers stay armed, so an older timer may hide this
    /// message before its own duration elapses.
    pub fn show_status(&mut self, text: impl Into<String>, kind: StatusKind, now_ms: u64) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
        self.status_visible = true;
        self.pending_hides_at_ms
            .push(now_ms.saturating_add(self.status_display_ms));
    }

    /// Fires every hide timer due at `now_ms`.
    pub fn on_tick(&mut self, now_ms: u64) {
        let before = self.pending_hides_at_ms.len();
        self.pending_hides_at_ms.retain(|due_ms| *due_ms > now_ms);
        if self.pending_hides_at_ms.len() != before {
            self.status_visible = false;
        }
    }

    /// Status line currently shown, if any.
    pub fn visible_status(&self) -> Option<&StatusMessage> {
        if self.status_visible {
            self.status.as_ref()
        } else {
            None
        }
    }

    /// Last status written, visible or not.
    pub fn last_status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    fn apply_clone_visibility(&mut self, is_clone: bool) {
        self.clone_options_visible = is_clone;
        self.previous_link_required = is_clone;
    }
}

impl Default for FormView {
    fn default() -> Self {
        Self::new()
    }
}
