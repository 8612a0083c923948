//! Common test fixtures: small workflow graphs and graph exports.
use serde_json::{Value, json};

/// A three-node workflow the way the host exports it: insertion-order node
/// IDs, metadata fields, and float encoding noise in a widget value.
#[allow(dead_code)]
pub fn simple_graph() -> Value {
    json!({
        "3": {
            "class_type": "LoadModel",
            "_meta": {"title": "Load Model"},
            "inputs": {"model_name": "base_v1.safetensors"}
        },
        "7": {
            "class_type": "Sampler",
            "is_changed": true,
            "inputs": {
                "model": ["3", 0],
                "steps": 20,
                "cfg": 7.000000000000001
            }
        },
        "9": {
            "class_type": "SaveOutput",
            "inputs": {
                "samples": ["7", 0],
                "_displayed_text": "saved 1 file"
            }
        }
    })
}

/// The same workflow after the host renamed every node ID through a
/// bijection, reordered declarations, and re-rounded the widget float.
#[allow(dead_code)]
pub fn renamed_graph() -> Value {
    json!({
        "21": {
            "class_type": "SaveOutput",
            "inputs": {
                "samples": ["14", 0],
                "_displayed_text": ""
            }
        },
        "8": {
            "class_type": "LoadModel",
            "inputs": {"model_name": "base_v1.safetensors"}
        },
        "14": {
            "class_type": "Sampler",
            "inputs": {
                "steps": 20,
                "model": ["8", 0],
                "cfg": 7.0
            }
        }
    })
}

/// A minimal two-node graph with scalar inputs, for ignore-list scenarios.
#[allow(dead_code)]
pub fn two_node_graph(y: i64) -> Value {
    json!({
        "1": {"inputs": {"x": 1}},
        "2": {"inputs": {"y": y}}
    })
}

/// A host graph export with a `workflow.nodes` list, as consumed by the
/// templating collaborator.
#[allow(dead_code)]
pub fn graph_export() -> Value {
    json!({
        "workflow": {
            "nodes": [
                {"id": 3, "type": "LoadModel"},
                {
                    "id": 7,
                    "type": "Sampler",
                    "title": "Main Sampler",
                    "properties": {"Node name for S&R": "sampler"}
                },
                {"id": 9, "type": "SaveOutput"}
            ]
        }
    })
}

/// The prompt matching [`graph_export`]: the flat node-ID to node mapping.
#[allow(dead_code)]
pub fn prompt() -> Value {
    json!({
        "3": {"inputs": {"model_name": "base_v1.safetensors"}},
        "7": {"inputs": {"steps": 20, "cfg": 7.5, "note": ""}},
        "9": {"inputs": {"samples": ["7", 0]}}
    })
}
