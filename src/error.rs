use thiserror::Error;

/// Errors raised while canonicalizing or comparing workflow graphs.
///
/// A structural error is never converted into a `false` comparison result;
/// deduplication correctness depends on malformed input staying visible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Node '{node_id}' has no 'inputs' object")]
    MissingInputs { node_id: String },

    #[error("Node '{node_id}' has an 'inputs' field that is not an object")]
    InputsNotAnObject { node_id: String },

    #[error("Expected a workflow object, but the value is not a JSON object")]
    NotAnObject,

    #[error("Node '{node_id}' references node '{target}', which is absent from the workflow")]
    DanglingReference { node_id: String, target: String },

    #[error("Ignored node '{0}' is not present in the workflow")]
    UnknownIgnoredNode(String),
}

/// Errors raised by the `%node.widget%` templating collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Workflow graph node has a missing or empty 'id'")]
    MissingNodeId,

    #[error("Workflow graph node has a missing or empty 'type'")]
    MissingNodeType,

    #[error("Duplicate node ID '{0}' in the workflow graph export")]
    DuplicateNodeId(String),

    #[error("Ambiguous node key '{0}': multiple nodes share this name or type")]
    AmbiguousKey(String),

    #[error("No node with ID '{0}' found in the prompt")]
    NodeNotInPrompt(String),

    #[error("No input named '{widget}' found for node '{node_key}'")]
    WidgetNotFound { node_key: String, widget: String },

    #[error("Pattern '{0}' is not of the form 'node.widget'")]
    BadPattern(String),

    #[error("Unrecognized boolean string '{0}'")]
    InvalidBoolean(String),

    #[error("Invalid raw link: {0}")]
    InvalidRawLink(String),
}

/// Errors raised while persisting workflows to the on-disk store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse saved workflow JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}
