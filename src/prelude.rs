//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and functions from the seiri
//! crate. Import this module to get the core functionality without importing
//! each item individually.

// Canonical JSON normalization
pub use crate::canonical::{FLOAT_COMPARISON_EPSILON, canonicalize, compare, normalize_float, stringify};

// Workflow canonicalization and comparison
pub use crate::workflow::{are_sorted_workflows_equal, remap_node_ids, sort_workflow, strip_metadata};

// Safe JSON navigation
pub use crate::json::{JsonOpt, parse_bool_str};

// Templating collaborator
pub use crate::template::{DisplayNameTable, parse_raw_link, search_and_replace};

// On-disk store
pub use crate::store::{SaveOutcome, SaveRequest, WorkflowStore};

// Error types
pub use crate::error::{StoreError, TemplateError, WorkflowError};
