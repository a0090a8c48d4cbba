//! Integration tests for write-through draft persistence.

mod common;

use std::sync::Arc;

use build_info_app::{CLEARED_MESSAGE, FormController};
use build_info_core::{DRAFT_STORAGE_KEY, FieldName};
use build_info_download::MemoryDownloadBackend;
use build_info_storage::{DraftStore, KeyValueStore};
use build_info_ui::FormEvents;
use serde_json::json;

#[test]
fn draft_persistence_tests_every_edit_is_written_through() {
    let mut harness = common::harness();
    harness
        .controller
        .on_field_change(FieldName::Client, "Acme Holdings", 0);

    let stored = harness
        .store
        .read(DRAFT_STORAGE_KEY)
        .expect("read should succeed")
        .expect("draft should exist");
    assert_eq!(stored["client"], json!("Acme Holdings"));
    assert!(stored.get("isCloneBuild").is_none());

    harness.controller.on_toggle_clone(true, 1);
    let stored = harness
        .store
        .read(DRAFT_STORAGE_KEY)
        .expect("read should succeed")
        .expect("draft should exist");
    assert_eq!(stored["isCloneBuild"], json!("on"));
}

#[test]
fn draft_persistence_tests_reopen_restores_values_and_sections() {
    let mut first = common::harness();
    first.controller.on_field_change(FieldName::Brand, "Acme", 0);
    first.controller.on_toggle_design_shell("custom", 0);
    first
        .controller
        .on_field_change(FieldName::DesignShellLink, "https://figma.example.test", 0);
    first.controller.on_field_change(FieldName::IsCloneBuild, "on", 0);
    first
        .controller
        .on_field_change(FieldName::PreviousLink, "https://old.example.test", 0);

    let reopened = common::harness_with_store(first.store.clone());
    let view = reopened.controller.view();
    assert_eq!(view.record(), first.controller.view().record());
    assert!(view.design_shell_options_visible());
    assert!(view.clone_options_visible());
    assert!(view.previous_link_required());
}

#[test]
fn draft_persistence_tests_unchecking_clone_clears_previous_link() {
    let mut harness = common::harness();
    harness.controller.on_toggle_clone(true, 0);
    harness
        .controller
        .on_field_change(FieldName::PreviousLink, "https://old.example.test", 0);
    harness.controller.on_toggle_clone(false, 0);

    let view = harness.controller.view();
    assert_eq!(view.value(FieldName::PreviousLink), "");
    assert!(!view.previous_link_required());
    assert!(!view.clone_options_visible());

    let stored = harness
        .store
        .read(DRAFT_STORAGE_KEY)
        .expect("read should succeed")
        .expect("draft should exist");
    assert_eq!(stored["previousLink"], json!(""));
    assert!(stored.get("isCloneBuild").is_none());
}

#[test]
fn draft_persistence_tests_clear_deletes_draft_and_confirms() {
    let mut harness = common::harness();
    harness.controller.on_field_change(FieldName::Brand, "Acme", 0);
    harness.controller.on_toggle_design_shell("custom", 0);

    harness.controller.on_clear(50);

    assert!(harness.store.is_empty());
    let view = harness.controller.view();
    assert_eq!(view.value(FieldName::Brand), "");
    assert!(!view.design_shell_options_visible());
    assert_eq!(
        view.visible_status().map(|status| status.text.as_str()),
        Some(CLEARED_MESSAGE)
    );
}

#[test]
fn draft_persistence_tests_storage_failures_are_swallowed() {
    let mut controller = FormController::open(
        DraftStore::new(Arc::new(common::BrokenStore)),
        Arc::new(MemoryDownloadBackend::new()),
        common::TEST_STATUS_MS,
    );

    controller.on_field_change(FieldName::Brand, "Acme", 0);
    assert_eq!(controller.view().value(FieldName::Brand), "Acme");

    controller.on_clear(1);
    assert_eq!(controller.view().value(FieldName::Brand), "");
    assert!(controller.view().visible_status().is_some());
}

#[test]
fn draft_persistence_tests_empty_design_shell_stays_hidden_after_load() {
    let mut first = common::harness();
    first.controller.on_toggle_design_shell("custom", 0);
    first.controller.on_toggle_design_shell("", 0);

    let reopened = common::harness_with_store(first.store.clone());
    assert!(!reopened.controller.view().design_shell_options_visible());
}
