//! Tests download filename derivation.

use build_info_core::{
    BuildRecord, FieldName, output_filename, sanitize_brand, sanitize_sf_number,
};

fn record(brand: &str, sf_number: &str) -> BuildRecord {
    let mut record = BuildRecord::default();
    record.set(FieldName::Brand, brand);
    record.set(FieldName::SfNumber, sf_number);
    record
}

#[test]
fn filename_sanitization_tests_matches_documented_scenario() {
    assert_eq!(
        output_filename(&record("Acme Co.", "SF-123.4")),
        "acme-co-sf-123.4.txt"
    );
}

#[test]
fn filename_sanitization_tests_replaces_each_brand_symbol() {
    assert_eq!(sanitize_brand("Big & Tall / Inc"), "big---tall---inc");
    assert_eq!(sanitize_brand("Café au lait"), "caf--au-lait");
    assert_eq!(sanitize_brand("A😀b"), "a-b");
}

#[test]
fn filename_sanitization_tests_trims_edge_punctuation() {
    assert_eq!(sanitize_brand("Acme Co."), "acme-co");
    assert_eq!(sanitize_brand("Big & Tall."), "big---tall");
    assert_eq!(sanitize_brand("...Café"), "caf");
    assert_eq!(sanitize_brand("!!!"), "");
    assert_eq!(
        output_filename(&record("Big & Tall.", "SF-9")),
        "big---tall-sf-9.txt"
    );
}

#[test]
fn filename_sanitization_tests_strips_sf_number_symbols() {
    assert_eq!(sanitize_sf_number("SF #42/7 (v1.2)"), "sf427v1.2");
}

#[test]
fn filename_sanitization_tests_is_idempotent() {
    for (brand, sf_number) in [
        ("Acme Co.", "SF-123.4"),
        ("Big & Tall.", "SF-9"),
        ("-Dash-", "-1-"),
        ("  spaced  brand ", "sf 9"),
        ("ÜBER/brand", "#1.2-3!"),
        ("", ""),
    ] {
        let brand_once = sanitize_brand(brand);
        let sf_once = sanitize_sf_number(sf_number);
        assert_eq!(sanitize_brand(&brand_once), brand_once);
        assert_eq!(sanitize_sf_number(&sf_once), sf_once);

        let first = output_filename(&record(brand, sf_number));
        let second = output_filename(&record(&brand_once, &sf_once));
        assert_eq!(first, second);
    }
}

#[test]
fn filename_sanitization_tests_handles_empty_fields() {
    assert_eq!(output_filename(&BuildRecord::default()), "-.txt");
}
