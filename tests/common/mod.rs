use std::path::PathBuf;

use lp_ranking::prelude::RawReport;

pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = PathBuf::from(manifest_dir)
        .join("tests/fixtures/arms")
        .join(name);
    assert!(path.exists(), "Test fixture missing: {}", path.display());
    path
}

pub fn load_fixture(name: &str) -> RawReport {
    RawReport::from_path(fixture_path(name)).expect("Failed to read fixture")
}
