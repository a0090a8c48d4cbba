//! Integration tests for restoring the form from a draft.

use build_info_core::{FieldName, FormData};
use build_info_ui::FormView;

fn draft(entries: &[(&str, &str)]) -> FormData {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn draft_restore_tests_empty_design_shell_keeps_options_hidden() {
    let mut view = FormView::new();
    view.restore(&draft(&[("designShellType", ""), ("brand", "Acme")]));

    assert!(!view.design_shell_options_visible());
    assert_eq!(view.value(FieldName::Brand), "Acme");
}

#[test]
fn draft_restore_tests_reapplies_visibility_rules() {
    let mut view = FormView::new();
    view.restore(&draft(&[
        ("designShellType", "custom"),
        ("isCloneBuild", "on"),
        ("previousLink", "https://old.example.test"),
    ]));

    assert!(view.design_shell_options_visible());
    assert!(view.clone_options_visible());
    assert!(view.previous_link_required());
    assert_eq!(view.missing_required(), None);
}

#[test]
fn draft_restore_tests_round_trips_form_data() {
    let mut original = FormView::new();
    original.set_value(FieldName::Client, "Acme Holdings");
    original.set_value(FieldName::ProgramUrls, "https://a.example.test\nhttps://b.example.test");
    original.toggle_clone_options(true);
    original.set_value(FieldName::PreviousLink, "https://old.example.test");

    let mut restored = FormView::new();
    restored.restore(&original.form_data());

    assert_eq!(restored.record(), original.record());
    assert_eq!(restored.form_data(), original.form_data());
    assert!(restored.clone_options_visible());
}

#[test]
fn draft_restore_tests_ignores_unknown_keys() {
    let mut view = FormView::new();
    view.restore(&draft(&[("retiredField", "x"), ("promoId", "P-9")]));

    assert_eq!(view.value(FieldName::PromoId), "P-9");
    assert!(!view.form_data().contains_key("retiredField"));
}
