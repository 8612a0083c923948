//! Tests for workflow canonicalization and structural equivalence.
mod common;

use common::{renamed_graph, simple_graph, two_node_graph};
use seiri::prelude::*;
use serde_json::{Value, json};

#[test]
fn test_sort_workflow_strips_metadata() {
    let sorted = sort_workflow(&simple_graph()).unwrap();
    let nodes = sorted.as_object().unwrap();
    assert_eq!(nodes.len(), 3);

    for node in nodes.values() {
        let node = node.as_object().unwrap();
        assert!(!node.contains_key("_meta"));
        assert!(!node.contains_key("is_changed"));
        let inputs = node["inputs"].as_object().unwrap();
        assert!(!inputs.contains_key("_displayed_text"));
    }
}

#[test]
fn test_sort_workflow_orders_nodes_by_content() {
    let graph = json!({
        "1": {"inputs": {"z": 1}},
        "2": {"inputs": {"a": 1}}
    });
    let sorted = sort_workflow(&graph).unwrap();
    // Node "2" serializes lower than node "1", so it iterates first.
    let ids: Vec<&String> = sorted.as_object().unwrap().keys().collect();
    assert_eq!(ids, ["2", "1"]);
}

#[test]
fn test_sort_workflow_passes_non_objects_through() {
    let value = json!([1, 2, 3]);
    assert_eq!(sort_workflow(&value).unwrap(), value);
    assert_eq!(sort_workflow(&Value::Null).unwrap(), Value::Null);
}

#[test]
fn test_sort_workflow_rejects_missing_inputs() {
    let graph = json!({"1": {"class_type": "Sampler"}});
    assert!(matches!(
        sort_workflow(&graph),
        Err(WorkflowError::MissingInputs { .. })
    ));
}

#[test]
fn test_sort_workflow_rejects_non_object_inputs() {
    let graph = json!({"1": {"inputs": 5}});
    assert!(matches!(
        sort_workflow(&graph),
        Err(WorkflowError::InputsNotAnObject { .. })
    ));
}

#[test]
fn test_remap_rewrites_references_to_indices() {
    let graph = json!({
        "a": {"inputs": {}},
        "b": {"inputs": {"src": ["a", 0]}}
    });
    let (remapped, id_mapping) = remap_node_ids(graph.as_object().unwrap()).unwrap();

    assert_eq!(id_mapping["a"], 0);
    assert_eq!(id_mapping["b"], 1);
    assert_eq!(remapped[1]["inputs"]["src"], json!([0, 0]));
}

#[test]
fn test_remap_leaves_non_reference_arrays_alone() {
    // Arrays of the wrong length or with a non-string head are plain values.
    let graph = json!({
        "a": {"inputs": {"triple": ["a", 0, 1], "pair": [1, 2]}}
    });
    let (remapped, _) = remap_node_ids(graph.as_object().unwrap()).unwrap();
    assert_eq!(remapped[0]["inputs"]["triple"], json!(["a", 0, 1]));
    assert_eq!(remapped[0]["inputs"]["pair"], json!([1, 2]));
}

#[test]
fn test_remap_rejects_dangling_references() {
    let graph = json!({
        "x": {"inputs": {"src": ["missing-id", 0]}}
    });
    let err = remap_node_ids(graph.as_object().unwrap()).unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::DanglingReference { ref target, .. } if target == "missing-id"
    ));
}

#[test]
fn test_round_trip_equality() {
    let sorted = sort_workflow(&simple_graph()).unwrap();
    assert!(are_sorted_workflows_equal(&sorted, &sorted, &[]).unwrap());
}

#[test]
fn test_equality_is_independent_of_node_ids() {
    let a = sort_workflow(&simple_graph()).unwrap();
    let b = sort_workflow(&renamed_graph()).unwrap();
    assert!(are_sorted_workflows_equal(&a, &b, &[]).unwrap());
}

#[test]
fn test_differing_widget_values_are_not_equal() {
    let mut other = simple_graph();
    other["7"]["inputs"]["steps"] = json!(30);
    let a = sort_workflow(&simple_graph()).unwrap();
    let b = sort_workflow(&other).unwrap();
    assert!(!are_sorted_workflows_equal(&a, &b, &[]).unwrap());
}

#[test]
fn test_ignore_list_excludes_node_inputs() {
    let a = sort_workflow(&two_node_graph(5)).unwrap();
    let b = sort_workflow(&two_node_graph(999)).unwrap();

    let ignored = vec!["2".to_string()];
    assert!(are_sorted_workflows_equal(&a, &b, &ignored).unwrap());
    assert!(!are_sorted_workflows_equal(&a, &b, &[]).unwrap());
}

#[test]
fn test_unknown_ignored_node_is_an_error() {
    let sorted = sort_workflow(&two_node_graph(5)).unwrap();
    let err = are_sorted_workflows_equal(&sorted, &sorted, &["42".to_string()]).unwrap_err();
    assert_eq!(err, WorkflowError::UnknownIgnoredNode("42".to_string()));
}

#[test]
fn test_comparison_requires_objects() {
    let sorted = sort_workflow(&two_node_graph(5)).unwrap();
    assert_eq!(
        are_sorted_workflows_equal(&sorted, &json!([1, 2]), &[]).unwrap_err(),
        WorkflowError::NotAnObject
    );
    assert_eq!(
        are_sorted_workflows_equal(&Value::Null, &sorted, &[]).unwrap_err(),
        WorkflowError::NotAnObject
    );
}

#[test]
fn test_identical_node_contents_sort_deterministically() {
    // Two byte-identical nodes: their relative order is arbitrary but must
    // be stable across repeated sorts of the same input.
    let graph = json!({
        "5": {"inputs": {"v": 1}},
        "2": {"inputs": {"v": 1}}
    });
    let first = stringify(&sort_workflow(&graph).unwrap());
    let second = stringify(&sort_workflow(&graph).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_canonical_form_is_byte_stable_across_reload() {
    let sorted = sort_workflow(&simple_graph()).unwrap();
    let bytes = stringify(&sorted);

    let reloaded: Value = serde_json::from_str(&bytes).unwrap();
    let resorted = sort_workflow(&reloaded).unwrap();
    assert_eq!(stringify(&resorted), bytes);
}
