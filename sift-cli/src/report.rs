//! Describing matched nodes for terminal and JSON output.

use std::collections::BTreeMap;

use owo_colors::OwoColorize;
use serde::Serialize;
use sift_dom::{DomTree, ElementTree, NodeId};

/// One matched element, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Position in the result.
    pub index: usize,
    /// Tag name.
    pub tag: String,
    /// `id` attribute, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Class tokens.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// All attributes, sorted by name.
    pub attributes: BTreeMap<String, String>,
    /// Ancestor chain from the document element, e.g. `html > body > div#main`.
    pub path: String,
    /// Whitespace-collapsed text content.
    pub text: String,
}

impl MatchRecord {
    /// Describe `node`; `None` for non-element nodes.
    #[must_use]
    pub fn new(tree: &DomTree, index: usize, node: NodeId) -> Option<Self> {
        let element = tree.as_element(node)?;
        let attributes = element
            .attrs
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Some(Self {
            index,
            tag: element.tag_name.clone(),
            id: element.id().map(str::to_string),
            classes: element.classes().into_iter().map(str::to_string).collect(),
            attributes,
            path: element_path(tree, node),
            text: collapse_whitespace(&tree.text_content(node)),
        })
    }

    /// One terminal line; `color` enables ANSI styling.
    #[must_use]
    pub fn to_line(&self, color: bool) -> String {
        let index = format!("{:>3}", self.index);
        let text = if self.text.is_empty() {
            String::new()
        } else {
            format!("  \"{}\"", truncate(&self.text, 60))
        };
        if color {
            format!("{}  {}{}", index.dimmed(), self.path.cyan(), text.dimmed())
        } else {
            format!("{index}  {}{text}", self.path)
        }
    }
}

/// `tag#id.class1.class2` for a single element.
fn describe(tree: &DomTree, node: NodeId) -> Option<String> {
    let mut out = tree.tag_name(node)?.to_string();
    if let Some(id) = tree.id(node) {
        out.push('#');
        out.push_str(id);
    }
    for class in tree.class_list(node) {
        out.push('.');
        out.push_str(class);
    }
    Some(out)
}

fn element_path(tree: &DomTree, node: NodeId) -> String {
    let mut parts: Vec<String> = tree
        .ancestors(node)
        .filter_map(|ancestor| describe(tree, ancestor))
        .collect();
    parts.reverse();
    parts.extend(describe(tree, node));
    parts.join(" > ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
