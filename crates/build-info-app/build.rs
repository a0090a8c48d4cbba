//! Bakes the workspace `VERSION` file into `BUILD_INFO_VERSION`.

use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let version_path = workspace_root(&manifest_dir).join("VERSION");
    println!("cargo:rerun-if-changed={}", version_path.display());

    let raw_version = fs::read_to_string(&version_path).expect("read VERSION file");
    let version = raw_version.trim().trim_start_matches('v');
    assert!(
        !version.is_empty()
            && version
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit())),
        "VERSION must hold a dotted numeric version, got '{}'",
        raw_version.trim()
    );

    println!("cargo:rustc-env=BUILD_INFO_VERSION={version}");
}

fn workspace_root(manifest_dir: &Path) -> &Path {
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .expect("crate lives under <root>/crates/")
}
