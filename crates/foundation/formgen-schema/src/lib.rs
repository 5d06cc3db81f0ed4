//! Descriptor schema
//!
//! Reads raw model text into a [`UiDescription`] and knows which props each
//! component kind is expected to carry. Validation stops at "is this a JSON
//! array"; per-descriptor gaps are reported, never rejected.

use formgen_core::{ComponentDescriptor, DescriptorType, Error, Result, UiDescription};
use serde_json::Value;

/// Props the prompt asks the model to supply for each kind
pub fn required_props(kind: &DescriptorType) -> &'static [&'static str] {
    match kind {
        DescriptorType::Text => &["text", "className"],
        DescriptorType::Input => &["type", "name", "placeholder", "className"],
        DescriptorType::Textarea => &["name", "placeholder", "className"],
        DescriptorType::Button => &["text", "action", "className"],
        DescriptorType::Select => &["name", "options", "className"],
        DescriptorType::Unknown(_) => &[],
    }
}

/// Required props absent from `descriptor`
pub fn missing_props(descriptor: &ComponentDescriptor) -> Vec<&'static str> {
    required_props(&descriptor.kind)
        .iter()
        .copied()
        .filter(|key| !descriptor.props.contains_key(*key))
        .collect()
}

/// A descriptor whose shape deviates from the prompt's contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNote {
    /// Index and tag of a descriptor the renderer will skip
    UnknownType { index: usize, tag: String },
    /// Index, kind and the required props it lacks
    MissingProps {
        index: usize,
        kind: String,
        missing: Vec<&'static str>,
    },
}

impl std::fmt::Display for SchemaNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaNote::UnknownType { index, tag } => {
                write!(f, "#{} unknown type {:?}, skipped", index, tag)
            }
            SchemaNote::MissingProps { index, kind, missing } => {
                write!(f, "#{} {} missing {}", index, kind, missing.join(", "))
            }
        }
    }
}

/// Collect every deviation in `ui`, in array order
pub fn inspect(ui: &UiDescription) -> Vec<SchemaNote> {
    ui.iter()
        .enumerate()
        .filter_map(|(index, d)| {
            if !d.kind.is_known() {
                return Some(SchemaNote::UnknownType {
                    index,
                    tag: d.kind.tag().to_string(),
                });
            }
            let missing = missing_props(d);
            if missing.is_empty() {
                None
            } else {
                Some(SchemaNote::MissingProps {
                    index,
                    kind: d.kind.tag().to_string(),
                    missing,
                })
            }
        })
        .collect()
}

/// Parse model output into a UI description.
///
/// Surrounding whitespace is trimmed; everything else must be a bare JSON
/// array. Markdown fences or prose around it are malformed output.
pub fn parse_ui_description(raw: &str) -> Result<UiDescription> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::MalformedOutput("empty completion".to_string()));
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| Error::MalformedOutput(e.to_string()))?;

    match value {
        Value::Array(items) => {
            let ui = UiDescription::new(items.into_iter().map(ComponentDescriptor::from).collect());
            for note in inspect(&ui) {
                match note {
                    SchemaNote::UnknownType { index, tag } => {
                        tracing::debug!(index, tag = %tag, "descriptor with unknown type will be skipped");
                    }
                    SchemaNote::MissingProps { index, kind, missing } => {
                        tracing::warn!(index, kind = %kind, ?missing, "descriptor missing required props");
                    }
                }
            }
            Ok(ui)
        }
        other => Err(Error::MalformedOutput(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
