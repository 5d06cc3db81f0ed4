//! Rendered element tree and its HTML serialization

use formgen_core::Props;
use serde_json::Value;
use std::fmt::Write;

/// Endpoint button activations are posted to
pub const ACTION_ENDPOINT: &str = "/api/actions";

/// Element the activation acknowledgement is swapped into
pub const NOTICE_TARGET: &str = "#notice";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    /// Position of the source descriptor in its description
    pub key: Option<usize>,
    /// Attributes under their prop names, in prop order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Props posted to the action endpoint when a button is activated
    pub activation: Option<Props>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            key: None,
            attributes: Vec::new(),
            children: Vec::new(),
            activation: None,
        }
    }

    pub fn with_key(mut self, key: usize) -> Self {
        self.key = Some(key);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == name)
    }

    /// Set or replace an attribute
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    fn is_void(&self) -> bool {
        matches!(self.tag, "input")
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if let Some(key) = self.key {
            let _ = write!(out, " data-key=\"{}\"", key);
        }
        for (name, value) in &self.attributes {
            let Some(html_name) = html_attr_name(name) else {
                tracing::debug!(attribute = %name, "dropping unsafe attribute name");
                continue;
            };
            let _ = write!(out, " {}=\"{}\"", html_name, escape_html(value));
        }
        if let Some(props) = &self.activation {
            let vals: serde_json::Map<String, Value> = props
                .iter()
                .filter_map(|(k, v)| prop_to_attr(v).map(|s| (k.clone(), Value::String(s))))
                .collect();
            let vals = Value::Object(vals).to_string();
            let _ = write!(
                out,
                " hx-post=\"{}\" hx-vals=\"{}\" hx-target=\"{}\" hx-swap=\"innerHTML\"",
                ACTION_ENDPOINT,
                escape_html(&vals),
                NOTICE_TARGET
            );
        }
        out.push('>');

        if self.is_void() {
            return;
        }
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_html(out),
                Node::Text(t) => out.push_str(&escape_html(t)),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(&e.children, out),
        }
    }
}

/// Attribute text for a prop value. `null` has none.
pub fn prop_to_attr(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(prop_to_attr)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// HTML attribute name for a prop key.
///
/// React-style names are mapped (`className` → `class`, `htmlFor` → `for`).
/// Keys that are not plain attribute names, inline event handlers and htmx
/// directives are refused so model output cannot script the page.
/// `data-key` is reserved for the descriptor index.
pub fn html_attr_name(prop: &str) -> Option<&str> {
    match prop {
        "className" => return Some("class"),
        "htmlFor" => return Some("for"),
        _ => {}
    }
    let plain = !prop.is_empty()
        && prop
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
    let lower = prop.to_ascii_lowercase();
    let reserved = lower == "data-key"
        || lower.starts_with("on")
        || lower.starts_with("hx-")
        || lower.starts_with("data-hx");
    if !plain || reserved {
        return None;
    }
    Some(prop)
}

/// HTML-escape text and attribute values
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
