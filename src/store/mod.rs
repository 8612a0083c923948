//! On-disk workflow store with save-if-unique semantics.
//!
//! The host would otherwise persist a new file on every run, duplicating
//! identical graphs endlessly. The store canonicalizes the incoming workflow,
//! compares it against every workflow already saved in the target directory,
//! and writes only when no structurally equivalent file exists.

pub mod files;

use std::path::PathBuf;

use serde_json::Value;

use crate::canonical::stringify;
use crate::error::StoreError;
use crate::workflow::{are_sorted_workflows_equal, sort_workflow};

pub use files::{count_files_with_ext, find_files_with_ext, find_unused_path};

/// Extension used when saving a new workflow.
pub const SAVE_EXT: &str = ".json";

/// Files with these extensions are checked for duplicate workflows.
pub const WORKFLOW_EXTS: [&str; 1] = [".json"];

/// Parameters of a save operation.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    /// Sub-directory of the store's output directory; empty for the root.
    pub directory_name: String,
    /// File name stem for a newly saved workflow.
    pub file_name: String,
    /// Whether to append the count of pre-existing workflows to the stem.
    pub append_counter: bool,
    /// Node IDs of the incoming workflow whose inputs are excluded from the
    /// duplicate comparison.
    pub ignored_nodes: Vec<String>,
}

impl Default for SaveRequest {
    fn default() -> Self {
        Self {
            directory_name: String::new(),
            file_name: "workflow_".to_string(),
            append_counter: true,
            ignored_nodes: Vec::new(),
        }
    }
}

/// Result of a save operation. The rendered message is display-only and
/// never affects comparison outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No workflow to compare: the input was absent or not a graph object.
    Skipped { existing_count: usize },
    /// A structurally equivalent workflow already exists on disk.
    AlreadyExists { path: PathBuf, existing_count: usize },
    /// The workflow was unique and has been written.
    Saved { path: PathBuf, existing_count: usize },
}

impl SaveOutcome {
    /// Number of workflow files that existed in the directory beforehand.
    pub fn existing_count(&self) -> usize {
        match self {
            Self::Skipped { existing_count }
            | Self::AlreadyExists { existing_count, .. }
            | Self::Saved { existing_count, .. } => *existing_count,
        }
    }

    /// Human-readable outcome message for the UI.
    pub fn message(&self) -> String {
        match self {
            Self::Skipped { .. } => String::new(),
            Self::AlreadyExists { path, .. } => {
                format!("Workflow already exists at {}.", path.display())
            }
            Self::Saved { path, .. } => format!("Workflow exported to {}!", path.display()),
        }
    }
}

/// A directory-backed store of canonicalized workflow files.
pub struct WorkflowStore {
    output_dir: PathBuf,
}

impl WorkflowStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    /// Canonicalizes `workflow` and writes it to the target directory unless
    /// a structurally equivalent workflow is already saved there.
    ///
    /// Saved files are assumed to be already sorted; they are compared one at
    /// a time via [`are_sorted_workflows_equal`]. New files are written as
    /// compact canonical JSON, so a later reload and re-canonicalization
    /// reproduces the same bytes.
    pub fn save_if_unique(
        &self,
        workflow: Option<&Value>,
        request: &SaveRequest,
    ) -> Result<SaveOutcome, StoreError> {
        let target_dir = if request.directory_name.is_empty() {
            self.output_dir.clone()
        } else {
            self.output_dir.join(&request.directory_name)
        };

        let existing = find_files_with_ext(&target_dir, &WORKFLOW_EXTS);
        let existing_count = existing.len();
        std::fs::create_dir_all(&target_dir)?;

        let Some(workflow) = workflow else {
            return Ok(SaveOutcome::Skipped { existing_count });
        };

        let sorted = sort_workflow(workflow)?;
        if !sorted.is_object() {
            return Ok(SaveOutcome::Skipped { existing_count });
        }

        for file_name in &existing {
            let path = target_dir.join(file_name);
            let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            if are_sorted_workflows_equal(&sorted, &saved, &request.ignored_nodes)? {
                return Ok(SaveOutcome::AlreadyExists {
                    path,
                    existing_count,
                });
            }
        }

        let stem = if request.append_counter {
            format!("{}{}", request.file_name, existing_count)
        } else {
            request.file_name.clone()
        };
        let path = find_unused_path(&target_dir, &stem, SAVE_EXT);
        std::fs::write(&path, stringify(&sorted))?;
        log::debug!("saved unique workflow to {}", path.display());

        Ok(SaveOutcome::Saved {
            path,
            existing_count,
        })
    }
}
