//! Component descriptors
//!
//! A UI is a flat, ordered array of `{type, props}` records. Nothing nests;
//! the array index is the only identity an element has.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Props of a single descriptor, forwarded to the rendered element
pub type Props = serde_json::Map<String, Value>;

/// Component kinds the renderer knows how to draw.
///
/// Anything else is kept as `Unknown` so a description round-trips, and is
/// skipped at render time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DescriptorType {
    Text,
    Input,
    Textarea,
    Button,
    Select,
    Unknown(String),
}

impl DescriptorType {
    /// The five tags accepted in the `type` field
    pub const KNOWN: [DescriptorType; 5] = [
        DescriptorType::Text,
        DescriptorType::Input,
        DescriptorType::Textarea,
        DescriptorType::Button,
        DescriptorType::Select,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => DescriptorType::Text,
            "input" => DescriptorType::Input,
            "textarea" => DescriptorType::Textarea,
            "button" => DescriptorType::Button,
            "select" => DescriptorType::Select,
            other => DescriptorType::Unknown(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            DescriptorType::Text => "text",
            DescriptorType::Input => "input",
            DescriptorType::Textarea => "textarea",
            DescriptorType::Button => "button",
            DescriptorType::Select => "select",
            DescriptorType::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DescriptorType::Unknown(_))
    }
}

impl From<String> for DescriptorType {
    fn from(tag: String) -> Self {
        DescriptorType::from_tag(&tag)
    }
}

impl From<DescriptorType> for String {
    fn from(kind: DescriptorType) -> Self {
        kind.tag().to_string()
    }
}

impl fmt::Display for DescriptorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One `{type, props}` record.
///
/// Deserialization never fails for a JSON value: a missing or non-string
/// `type` becomes `Unknown`, a missing or non-object `props` becomes empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct ComponentDescriptor {
    #[serde(rename = "type")]
    pub kind: DescriptorType,
    pub props: Props,
}

impl ComponentDescriptor {
    pub fn new(kind: DescriptorType, props: Props) -> Self {
        Self { kind, props }
    }

    /// Build from a `json!` object literal; non-objects give empty props
    pub fn with_props(kind: DescriptorType, props: Value) -> Self {
        let props = match props {
            Value::Object(map) => map,
            _ => Props::new(),
        };
        Self { kind, props }
    }

    /// String-valued prop, if present
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for ComponentDescriptor {
    fn from(value: Value) -> Self {
        let kind = match value.get("type") {
            Some(Value::String(tag)) => DescriptorType::from_tag(tag),
            Some(other) => DescriptorType::Unknown(other.to_string()),
            None => DescriptorType::Unknown(String::new()),
        };
        let props = match value.get("props") {
            Some(Value::Object(map)) => map.clone(),
            _ => Props::new(),
        };
        Self { kind, props }
    }
}

/// Ordered descriptors making up one generated UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UiDescription(Vec<ComponentDescriptor>);

impl UiDescription {
    pub fn new(descriptors: Vec<ComponentDescriptor>) -> Self {
        Self(descriptors)
    }

    /// Placeholder UI shown before the first generation
    pub fn default_form() -> Self {
        Self(vec![
            ComponentDescriptor::with_props(
                DescriptorType::Input,
                json!({
                    "type": "text",
                    "name": "food",
                    "placeholder": "Food Item (e.g. Banana)",
                    "className": "border p-2 w-full mb-2"
                }),
            ),
            ComponentDescriptor::with_props(
                DescriptorType::Input,
                json!({
                    "type": "number",
                    "name": "calories",
                    "placeholder": "Calories",
                    "className": "border p-2 w-full mb-2"
                }),
            ),
            ComponentDescriptor::with_props(
                DescriptorType::Textarea,
                json!({
                    "name": "notes",
                    "placeholder": "Any notes (optional)",
                    "className": "border p-2 w-full mb-4"
                }),
            ),
            ComponentDescriptor::with_props(
                DescriptorType::Button,
                json!({
                    "text": "Add Entry",
                    "className": "bg-blue-600 text-white p-2 rounded"
                }),
            ),
        ])
    }

    pub fn descriptors(&self) -> &[ComponentDescriptor] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ComponentDescriptor> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Descriptors whose type the renderer will draw
    pub fn known_count(&self) -> usize {
        self.0.iter().filter(|d| d.kind.is_known()).count()
    }

    pub fn into_inner(self) -> Vec<ComponentDescriptor> {
        self.0
    }
}

impl From<Vec<ComponentDescriptor>> for UiDescription {
    fn from(descriptors: Vec<ComponentDescriptor>) -> Self {
        Self(descriptors)
    }
}

impl<'a> IntoIterator for &'a UiDescription {
    type Item = &'a ComponentDescriptor;
    type IntoIter = std::slice::Iter<'a, ComponentDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
