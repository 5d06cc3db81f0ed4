//! # formgen renderer
//!
//! Maps each descriptor of a [`UiDescription`] onto an [`Element`] through a
//! closed dispatch over [`DescriptorType`]. Unknown types produce nothing.
//! Every prop is forwarded as an attribute; buttons are additionally wired
//! to the action endpoint with their full prop set.

pub mod actions;
pub mod element;

pub use actions::{dispatch, Acknowledgement, Action};
pub use element::{escape_html, Element, Node, ACTION_ENDPOINT, NOTICE_TARGET};

use element::prop_to_attr;
use formgen_core::{ComponentDescriptor, DescriptorType, Props, UiDescription};
use serde_json::Value;

/// One element per known-type descriptor, in array order
pub fn render(ui: &UiDescription) -> Vec<Element> {
    ui.iter()
        .enumerate()
        .filter_map(|(index, descriptor)| render_descriptor(index, descriptor))
        .collect()
}

/// Render a single descriptor found at `index`
pub fn render_descriptor(index: usize, descriptor: &ComponentDescriptor) -> Option<Element> {
    let props = &descriptor.props;
    let element = match &descriptor.kind {
        DescriptorType::Text => render_text(props),
        DescriptorType::Input => passthrough(Element::new("input"), props, &[]),
        DescriptorType::Textarea => passthrough(Element::new("textarea"), props, &[]),
        DescriptorType::Button => render_button(props),
        DescriptorType::Select => render_select(props),
        DescriptorType::Unknown(tag) => {
            tracing::debug!(index, tag = %tag, "skipping unknown descriptor type");
            return None;
        }
    };
    Some(element.with_key(index))
}

/// Serialize rendered elements back to back
pub fn to_html(elements: &[Element]) -> String {
    let mut out = String::new();
    for element in elements {
        element.write_html(&mut out);
    }
    out
}

/// `render` followed by `to_html`
pub fn render_html(ui: &UiDescription) -> String {
    to_html(&render(ui))
}

fn passthrough(mut element: Element, props: &Props, skip: &[&str]) -> Element {
    for (name, value) in props {
        if skip.contains(&name.as_str()) {
            continue;
        }
        if let Some(text) = prop_to_attr(value) {
            element.set_attr(name.as_str(), text);
        }
    }
    element
}

fn label(props: &Props) -> String {
    props.get("text").and_then(prop_to_attr).unwrap_or_default()
}

fn render_text(props: &Props) -> Element {
    let mut p = passthrough(Element::new("p"), props, &[]);
    p.push_text(label(props));
    p
}

fn render_button(props: &Props) -> Element {
    let mut button = passthrough(Element::new("button"), props, &[]);
    button.push_text(label(props));
    button.activation = Some(props.clone());
    button
}

fn render_select(props: &Props) -> Element {
    let mut select = passthrough(Element::new("select"), props, &["options"]);
    let options = props.get("options").and_then(Value::as_array);
    for option in options.into_iter().flatten().filter_map(Value::as_str) {
        let mut el = Element::new("option");
        el.set_attr("value", option);
        el.push_text(option);
        select.push_child(el);
    }
    select
}
