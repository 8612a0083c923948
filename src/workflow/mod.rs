//! Workflow canonicalization and structural equivalence.
//!
//! A workflow is a JSON object mapping node IDs to node objects, each of
//! which carries an `inputs` object. Input values are either plain JSON
//! values or references: 2-element arrays `[node_id, output_index]` pointing
//! at another node's output slot.
//!
//! The host assigns node IDs in insertion order and serializes widget floats
//! with encoding noise, so two functionally identical graphs can arrive with
//! different IDs, declaration order, and float rounding. This module strips
//! the non-functional parts, sorts nodes by canonical content, and rewrites
//! references against the sort-derived indices so that structurally identical
//! graphs produce byte-identical serializations.

use std::cmp::Ordering;

use ahash::AHashMap;
use itertools::Itertools;
use serde_json::{Map, Value};

use crate::canonical::{canonicalize, compare, stringify};
use crate::error::WorkflowError;

/// Key of a node object that holds its input parameters.
pub const INPUTS_KEY: &str = "inputs";

/// Length of an array that represents a reference to another node.
pub const REFERENCE_LENGTH: usize = 2;

/// Node fields that do not contribute to the workflow's execution.
pub const METADATA_KEYS: [&str; 2] = ["_meta", "is_changed"];

/// Input parameters that never participate in comparison, such as UI
/// display-text caches.
pub const IGNORED_INPUT_KEYS: [&str; 1] = ["_displayed_text"];

/// Strips non-functional metadata from every node in a workflow.
///
/// Removes the [`METADATA_KEYS`] fields from each node object and the
/// [`IGNORED_INPUT_KEYS`] entries from its `inputs`. Non-object node values
/// pass through untouched. A node object whose `inputs` is missing or not an
/// object is a schema error.
pub fn strip_metadata(workflow: &Map<String, Value>) -> Result<Map<String, Value>, WorkflowError> {
    let mut stripped = Map::with_capacity(workflow.len());

    for (node_id, node_obj) in workflow {
        let Value::Object(node) = node_obj else {
            stripped.insert(node_id.clone(), node_obj.clone());
            continue;
        };

        let mut new_node: Map<String, Value> = node
            .iter()
            .filter(|(key, _)| !METADATA_KEYS.contains(&key.as_str()) && key.as_str() != INPUTS_KEY)
            .map(|(key, val)| (key.clone(), val.clone()))
            .collect();

        let inputs = node_inputs(node_id, node)?;
        let kept: Map<String, Value> = inputs
            .iter()
            .filter(|(key, _)| !IGNORED_INPUT_KEYS.contains(&key.as_str()))
            .map(|(key, val)| (key.clone(), val.clone()))
            .collect();
        new_node.insert(INPUTS_KEY.to_string(), Value::Object(kept));

        stripped.insert(node_id.clone(), Value::Object(new_node));
    }

    Ok(stripped)
}

/// Remaps node IDs to sequential integers derived from the workflow map's
/// current iteration order, rewriting every input reference accordingly.
///
/// Returns the remapped node sequence plus the `node_id -> index` mapping, so
/// callers can translate externally supplied node IDs into the same index
/// space. The function trusts its caller's ordering: when called on a
/// [`sort_workflow`] result the indices are the canonical ones.
pub fn remap_node_ids(
    workflow: &Map<String, Value>,
) -> Result<(Vec<Value>, AHashMap<String, usize>), WorkflowError> {
    let id_mapping: AHashMap<String, usize> = workflow
        .keys()
        .enumerate()
        .map(|(index, key)| (key.clone(), index))
        .collect();

    let mut remapped = Vec::with_capacity(workflow.len());
    for (node_id, node_obj) in workflow {
        let Value::Object(node) = node_obj else {
            remapped.push(node_obj.clone());
            continue;
        };

        let inputs = node_inputs(node_id, node)?;
        let mut new_inputs = Map::with_capacity(inputs.len());
        for (name, value) in inputs {
            new_inputs.insert(name.clone(), remap_reference(node_id, value, &id_mapping)?);
        }

        let mut new_node = node.clone();
        new_node.insert(INPUTS_KEY.to_string(), Value::Object(new_inputs));
        remapped.push(Value::Object(new_node));
    }

    Ok((remapped, id_mapping))
}

/// Produces the canonical ordering of a workflow: metadata stripped, every
/// node canonicalized, and the node map re-sorted so iteration order is
/// ascending by the node's canonical serialization. Node IDs are kept;
/// references are not yet rewritten.
///
/// Non-object values pass through unchanged.
///
/// Two graphs built from the same multiset of distinct node contents and the
/// same reference topology iterate in matching order after this call. When
/// two distinct nodes canonicalize to byte-identical content the tie breaks
/// arbitrarily but deterministically (stable sort over the incoming order);
/// such graphs may produce different but equally valid sorted forms. This is
/// a known limitation, since the nodes are indistinguishable by content.
pub fn sort_workflow(workflow: &Value) -> Result<Value, WorkflowError> {
    let Value::Object(map) = workflow else {
        return Ok(workflow.clone());
    };

    let stripped = strip_metadata(map)?;

    let sorted: Map<String, Value> = stripped
        .into_iter()
        .map(|(node_id, node_obj)| {
            let canonical = canonicalize(&node_obj);
            (stringify(&canonical), node_id, canonical)
        })
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, node_id, canonical)| (node_id, canonical))
        .collect();

    Ok(Value::Object(sorted))
}

/// Compares two canonically sorted workflows, ignoring original node IDs.
///
/// Both arguments must already have passed through [`sort_workflow`] and must
/// be objects. `ignored_nodes` lists node IDs of `workflow` whose input
/// parameters are excluded from the comparison; after remapping, ignoring is
/// positional ("the Nth node in canonical order"), which is meaningful
/// precisely because both graphs were canonically sorted first.
pub fn are_sorted_workflows_equal(
    workflow: &Value,
    other_workflow: &Value,
    ignored_nodes: &[String],
) -> Result<bool, WorkflowError> {
    let (Value::Object(map), Value::Object(other_map)) = (workflow, other_workflow) else {
        return Err(WorkflowError::NotAnObject);
    };

    let (mut remapped, id_mapping) = remap_node_ids(map)?;

    // Translate the ignore list into the remapped index space.
    let ignored_indices: Vec<usize> = ignored_nodes
        .iter()
        .map(|node_id| {
            id_mapping
                .get(node_id)
                .copied()
                .ok_or_else(|| WorkflowError::UnknownIgnoredNode(node_id.clone()))
        })
        .collect::<Result<_, _>>()?;

    let (mut remapped_other, _) = remap_node_ids(other_map)?;

    for index in ignored_indices {
        clear_inputs(&mut remapped[index]);
        if index < remapped_other.len() {
            clear_inputs(&mut remapped_other[index]);
        }
    }

    let equal = compare(
        &Value::Array(remapped),
        &Value::Array(remapped_other),
    ) == Ordering::Equal;
    Ok(equal)
}

fn node_inputs<'a>(
    node_id: &str,
    node: &'a Map<String, Value>,
) -> Result<&'a Map<String, Value>, WorkflowError> {
    let inputs = node.get(INPUTS_KEY).ok_or_else(|| WorkflowError::MissingInputs {
        node_id: node_id.to_string(),
    })?;
    match inputs {
        Value::Object(map) => Ok(map),
        _ => Err(WorkflowError::InputsNotAnObject {
            node_id: node_id.to_string(),
        }),
    }
}

fn remap_reference(
    node_id: &str,
    value: &Value,
    id_mapping: &AHashMap<String, usize>,
) -> Result<Value, WorkflowError> {
    let Value::Array(items) = value else {
        return Ok(value.clone());
    };
    if items.len() != REFERENCE_LENGTH {
        return Ok(value.clone());
    }
    let Value::String(target) = &items[0] else {
        return Ok(value.clone());
    };

    let index = id_mapping
        .get(target)
        .ok_or_else(|| WorkflowError::DanglingReference {
            node_id: node_id.to_string(),
            target: target.clone(),
        })?;
    Ok(Value::Array(vec![
        Value::from(*index as u64),
        items[1].clone(),
    ]))
}

fn clear_inputs(node: &mut Value) {
    if let Value::Object(map) = node {
        map.insert(INPUTS_KEY.to_string(), Value::Object(Map::new()));
    }
}
