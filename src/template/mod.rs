//! `%node.widget%` placeholder substitution.
//!
//! Replaces `%date:PATTERN%` tags with the current time and `%key.widget%`
//! tags with widget values looked up from the parsed prompt. The `key` part
//! resolves, in order, to a literal node ID, a unique "Node name for S&R"
//! property, a unique display name, or a unique node type.

use std::sync::LazyLock;

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TemplateError;
use crate::json::JsonOpt;
use crate::workflow::{INPUTS_KEY, REFERENCE_LENGTH};

static PATTERN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([^%]+)%").expect("hard-coded pattern"));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%date:(.*?)%").expect("hard-coded pattern"));

/// Read-only lookup from internal node type names to user-facing display
/// names. Injected by the caller; the crate holds no process-wide registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayNameTable {
    names: AHashMap<String, String>,
}

impl DisplayNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_name: impl Into<String>, display_name: impl Into<String>) {
        self.names.insert(type_name.into(), display_name.into());
    }

    pub fn get(&self, type_name: &str) -> Option<&str> {
        self.names.get(type_name).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for DisplayNameTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Maps values to the single node ID carrying them; values seen more than
/// once move to the duplicate set and stop resolving.
#[derive(Default)]
struct UniqueIndex {
    by_value: AHashMap<String, String>,
    duplicates: AHashSet<String>,
}

impl UniqueIndex {
    fn record(&mut self, value: String, node_id: &str) {
        if self.duplicates.contains(&value) {
            return;
        }
        if self.by_value.remove(&value).is_some() {
            self.duplicates.insert(value);
        } else {
            self.by_value.insert(value, node_id.to_string());
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.by_value.get(key).map(String::as_str)
    }

    fn is_ambiguous(&self, key: &str) -> bool {
        self.duplicates.contains(key)
    }
}

/// Replaces date and `%node.widget%` tags in `text`.
///
/// `prompt` is the flat node-ID to node-object mapping the engine executes;
/// `workflow_info` is the host's graph export (an object with a
/// `workflow.nodes` list carrying `id`, `type`, optional `title` and
/// `properties`). When `text` is empty or either value is absent, the text
/// is returned unchanged.
///
/// An unknown node key logs a warning and leaves its pattern in place; an
/// ambiguous key, a duplicate node ID, or a missing widget is an error.
pub fn search_and_replace(
    text: &str,
    prompt: Option<&Value>,
    workflow_info: Option<&Value>,
    display_names: &DisplayNameTable,
) -> Result<String, TemplateError> {
    let (Some(prompt), Some(info)) = (prompt, workflow_info) else {
        return Ok(text.to_string());
    };
    if text.is_empty() {
        return Ok(text.to_string());
    }

    let mut text = expand_date_patterns(text);

    let nodes = JsonOpt::new(info).get("workflow").get("nodes").as_list();
    if nodes.is_empty() {
        return Ok(text);
    }

    let mut node_ids: AHashSet<String> = AHashSet::new();
    let mut display_index = UniqueIndex::default();
    let mut snr_index = UniqueIndex::default();
    let mut type_index = UniqueIndex::default();

    for node in &nodes {
        let node_id = find_node_id(*node)?;
        if !node_ids.insert(node_id.clone()) {
            return Err(TemplateError::DuplicateNodeId(node_id));
        }
        display_index.record(find_node_display_name(*node, display_names)?, &node_id);
        if let Some(snr) = find_node_snr(*node) {
            snr_index.record(snr, &node_id);
        }
        type_index.record(find_node_type(*node)?, &node_id);
    }

    let prompt_opt = JsonOpt::new(prompt);
    let patterns: Vec<String> = PATTERN_RE
        .captures_iter(&text)
        .map(|caps| caps[1].to_string())
        .collect();

    for pattern in patterns {
        let parts: Vec<&str> = pattern.splitn(3, '.').collect();
        let &[node_key, widget_name] = parts.as_slice() else {
            return Err(TemplateError::BadPattern(pattern));
        };

        if snr_index.is_ambiguous(node_key)
            || display_index.is_ambiguous(node_key)
            || type_index.is_ambiguous(node_key)
        {
            return Err(TemplateError::AmbiguousKey(node_key.to_string()));
        }

        // Resolution order: literal ID, S&R name, display name, type.
        let node_id = if node_ids.contains(node_key) {
            node_key
        } else if let Some(id) = snr_index.get(node_key) {
            id
        } else if let Some(id) = display_index.get(node_key) {
            id
        } else if let Some(id) = type_index.get(node_key) {
            id
        } else {
            log::warn!("No node with ID, or unique name, or unique type '{node_key}' found");
            continue;
        };

        let prompt_node = prompt_opt.get(node_id);
        if prompt_node.is_none() {
            return Err(TemplateError::NodeNotInPrompt(node_id.to_string()));
        }

        let widget_value = prompt_node.get(INPUTS_KEY).get(widget_name);
        if widget_value.is_none() {
            return Err(TemplateError::WidgetNotFound {
                node_key: node_key.to_string(),
                widget: widget_name.to_string(),
            });
        }

        let replace_value = match widget_value.as_string().filter(|s| !s.is_empty()) {
            Some(rendered) => rendered,
            None => {
                log::warn!("Search and replace value for '{pattern}' is falsy");
                String::new()
            }
        };
        text = text.replace(&format!("%{pattern}%"), &replace_value);
    }

    Ok(text)
}

/// Validates a host `rawLink` value: `[node_id, output_index]`.
pub fn parse_raw_link(value: &Value) -> Result<(String, i64), TemplateError> {
    let Value::Array(items) = value else {
        return Err(TemplateError::InvalidRawLink(
            "expected a 2-element array".to_string(),
        ));
    };
    if items.len() != REFERENCE_LENGTH {
        return Err(TemplateError::InvalidRawLink(format!(
            "expected {} elements, found {}",
            REFERENCE_LENGTH,
            items.len()
        )));
    }
    match (&items[0], &items[1]) {
        (Value::String(node_id), Value::Number(index)) => {
            let index = index.as_i64().ok_or_else(|| {
                TemplateError::InvalidRawLink(format!("output index {index} is not an integer"))
            })?;
            Ok((node_id.clone(), index))
        }
        _ => Err(TemplateError::InvalidRawLink(
            "expected [node_id: string, output_index: integer]".to_string(),
        )),
    }
}

fn find_node_id(node: JsonOpt<'_>) -> Result<String, TemplateError> {
    node.get("id")
        .as_string()
        .filter(|id| !id.is_empty())
        .ok_or(TemplateError::MissingNodeId)
}

fn find_node_type(node: JsonOpt<'_>) -> Result<String, TemplateError> {
    node.get("type")
        .as_string()
        .filter(|ty| !ty.is_empty())
        .ok_or(TemplateError::MissingNodeType)
}

/// A node's display name: its user-set title if present, otherwise the
/// registered display name for its type, otherwise the raw type name.
fn find_node_display_name(
    node: JsonOpt<'_>,
    display_names: &DisplayNameTable,
) -> Result<String, TemplateError> {
    if let Some(title) = node.get("title").as_string().filter(|t| !t.is_empty()) {
        return Ok(title);
    }
    let node_type = find_node_type(node)?;
    Ok(display_names
        .get(&node_type)
        .map(str::to_string)
        .unwrap_or(node_type))
}

/// A node's custom search-and-replace name, if the user set one.
fn find_node_snr(node: JsonOpt<'_>) -> Option<String> {
    node.get("properties")
        .get("Node name for S&R")
        .as_string()
        .filter(|snr| !snr.is_empty())
}

fn expand_date_patterns(text: &str) -> String {
    if !text.contains("%date:") {
        return text.to_string();
    }

    let now = Local::now();
    let mut out = text.to_string();
    for caps in DATE_RE.captures_iter(text) {
        let fmt = &caps[1];
        let rendered = render_date_pattern(fmt, &now);
        out = out.replace(&format!("%date:{fmt}%"), &rendered);
    }
    out
}

/// Expands a date pattern token by token, longest token first; characters
/// that match no token pass through verbatim.
fn render_date_pattern(fmt: &str, now: &DateTime<Local>) -> String {
    let month = now.format("%m").to_string();
    let day = now.format("%d").to_string();
    let hour = now.format("%H").to_string();
    let minute = now.format("%M").to_string();
    let second = now.format("%S").to_string();

    let tokens: [(&str, String); 12] = [
        ("yyyy", now.format("%Y").to_string()),
        ("yy", now.format("%y").to_string()),
        ("MM", month.clone()),
        ("dd", day.clone()),
        ("hh", hour.clone()),
        ("mm", minute.clone()),
        ("ss", second.clone()),
        ("M", trim_leading_zero(&month)),
        ("d", trim_leading_zero(&day)),
        ("h", trim_leading_zero(&hour)),
        ("m", trim_leading_zero(&minute)),
        ("s", trim_leading_zero(&second)),
    ];

    let mut out = String::new();
    let mut rest = fmt;
    'outer: while !rest.is_empty() {
        for (token, value) in &tokens {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(value);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}

fn trim_leading_zero(value: &str) -> String {
    value.trim_start_matches('0').to_string()
}
