//! # Seiri - Workflow Canonicalization and Deduplication Engine
//!
//! **Seiri** normalizes node-based workflow graphs into a canonical,
//! order-independent form and decides whether two graphs are structurally
//! equivalent up to node identity and floating-point noise.
//!
//! Visual authoring hosts assign graphs arbitrary, insertion-order node IDs
//! and widget floats that vary in insignificant digits; two functionally
//! identical graphs can arrive with different IDs, different declaration
//! order, and different rounding. Seiri strips the non-functional metadata,
//! canonicalizes every node payload, sorts nodes by canonical content, and
//! remaps cross-node references to sort-derived indices — after which
//! structural equality is plain byte equality of the serialized form. That is
//! what makes a safe save-if-unique policy possible.
//!
//! ## Core Workflow
//!
//! 1. **Parse**: deserialize the host's graph export into a
//!    `serde_json::Value` (a JSON object mapping node IDs to node objects).
//! 2. **Canonicalize**: [`workflow::sort_workflow`] strips metadata,
//!    normalizes floats, sorts object keys, and orders nodes by content.
//! 3. **Compare**: [`workflow::are_sorted_workflows_equal`] remaps node IDs
//!    positionally and compares the serialized results, optionally ignoring
//!    the inputs of caller-designated nodes.
//! 4. **Persist**: [`store::WorkflowStore`] writes the canonical form to disk
//!    only when no equivalent workflow is already saved.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seiri::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let raw = std::fs::read_to_string("current_graph.json")?;
//!     let graph: serde_json::Value = serde_json::from_str(&raw)?;
//!
//!     let store = WorkflowStore::new("output/workflows");
//!     let outcome = store.save_if_unique(Some(&graph), &SaveRequest::default())?;
//!     println!("{}", outcome.message());
//!     Ok(())
//! }
//! ```
//!
//! Known limitation: when two distinct nodes canonicalize to byte-identical
//! content, the canonical ordering between them is arbitrary (deterministic,
//! but not unique across graphs). Such nodes are indistinguishable by content
//! alone; general graph isomorphism is out of scope.

pub mod canonical;
pub mod error;
pub mod json;
pub mod prelude;
pub mod store;
pub mod template;
pub mod workflow;
