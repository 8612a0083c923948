//! Directory probing helpers.

use std::path::{Path, PathBuf};

/// Lists file names in `dir` whose name ends with one of `exts` (dotted
/// extensions, e.g. `".json"`), sorted for deterministic iteration. A
/// missing or unreadable directory yields zero results, never an error.
pub fn find_files_with_ext(dir: &Path, exts: &[&str]) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| exts.iter().any(|ext| name.ends_with(ext)))
        .collect();
    names.sort();
    names
}

/// Counts files in `dir` with one of the given dotted extensions.
pub fn count_files_with_ext(dir: &Path, exts: &[&str]) -> usize {
    find_files_with_ext(dir, exts).len()
}

/// Finds an unused path in `dir` for the given file stem and dotted
/// extension, probing `stem_1`, `stem_2`, … while the name is taken.
pub fn find_unused_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let mut path = dir.join(format!("{stem}{ext}"));
    let mut attempts = 0;
    while path.exists() {
        attempts += 1;
        path = dir.join(format!("{stem}_{attempts}{ext}"));
    }
    path
}
