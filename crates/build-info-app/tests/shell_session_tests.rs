//! Integration tests driving the shell with scripted input.

mod common;

use std::io::Cursor;

use build_info_app::shell;

fn run_script(harness: &mut common::Harness, script: &str) -> String {
    let mut output = Vec::new();
    let mut now_ms = 0_u64;
    shell::run(
        &mut harness.controller,
        Cursor::new(script.as_bytes().to_vec()),
        &mut output,
        || {
            now_ms += 100;
            now_ms
        },
    )
    .expect("shell should run");
    String::from_utf8(output).expect("output should be utf-8")
}

#[test]
fn shell_session_tests_scripted_submit_downloads_once() {
    let mut harness = common::harness();
    let output = run_script(
        &mut harness,
        "set brand Acme Co.\nset sfNumber SF-123.4\nset programUrls https://a.test\\nhttps://b.test\nsubmit\nquit\nsubmit\n",
    );

    assert!(output.contains("saved acme-co-sf-123.4.txt"));
    assert!(output.contains("[ok] Build information generated and downloaded successfully!"));

    let downloads = harness.downloads.downloads();
    assert_eq!(downloads.len(), 1);
    assert!(
        downloads[0]
            .content
            .contains("Program URLs: \nhttps://a.test\nhttps://b.test\n")
    );
}

#[test]
fn shell_session_tests_reports_blocked_submit_and_bad_input() {
    let mut harness = common::harness();
    let output = run_script(&mut harness, "clone on\nsubmit\nfrobnicate\nshow\n");

    assert!(output.contains("Please fill out Previous link [previousLink] before submitting."));
    assert!(output.contains("unknown command 'frobnicate'"));
    assert!(output.contains("Previous link [previousLink] *: "));
    assert!(harness.downloads.downloads().is_empty());
}

#[test]
fn shell_session_tests_preview_does_not_download() {
    let mut harness = common::harness();
    let output = run_script(&mut harness, "shell custom\npreview\n");

    assert!(output.contains("--- -.txt ---"));
    assert!(output.contains("Design Shell: custom"));
    assert!(harness.downloads.downloads().is_empty());
    assert!(harness.controller.view().design_shell_options_visible());
}
