//! Shared helpers for integration tests

use std::path::{Path, PathBuf};

pub use resume_screener::test_support::{BagOfWords, Unavailable};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// Copy fixtures into `dir` under new names.
pub fn copy_fixtures(dir: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(dir).unwrap();
    for (source, target) in files {
        std::fs::copy(fixture(source), dir.join(target)).unwrap();
    }
}
