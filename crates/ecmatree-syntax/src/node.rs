//! The normalized output schema.
//!
//! A [`NormalizedNode`] is a detached snapshot: every field is owned data,
//! nothing points back into the engine tree it was built from. Optional fields
//! are skipped when absent so the serialized shape depends only on the kind of
//! node and what that node actually carries.

use serde::{Deserialize, Serialize};

/// One node of the normalized tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedNode {
    pub kind: String,
    pub kind_number: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Box<NormalizedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<NormalizedNode>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Box<NormalizedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<Box<NormalizedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Box<NormalizedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<NormalizedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Box<NormalizedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<NormalizedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Vec<Modifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NormalizedNode>>,
}

impl NormalizedNode {
    /// A base record with no optional fields set.
    pub fn new(kind: impl Into<String>, kind_number: u16) -> Self {
        Self {
            kind: kind.into(),
            kind_number,
            pos: None,
            end: None,
            text: None,
            name: None,
            value: None,
            expression: None,
            arguments: None,
            ty: None,
            return_type: None,
            initializer: None,
            parameters: None,
            body: None,
            members: None,
            modifiers: None,
            children: None,
        }
    }

    /// Children, or an empty slice when there are none.
    pub fn children(&self) -> &[NormalizedNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// The identifier text of `name`, looking through a nested name node.
    pub fn name_text(&self) -> Option<&str> {
        match self.name.as_ref()? {
            Name::Text(text) => Some(text),
            Name::Node(node) => node.name_text(),
        }
    }

    /// Number of nodes in this subtree, counting only `children` edges.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(NormalizedNode::count).sum::<usize>()
    }
}

/// `name` is the identifier text on identifiers and a nested node elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Name {
    Text(String),
    Node(Box<NormalizedNode>),
}

/// A modifier keyword, kept as a flat tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    pub kind: String,
    pub kind_number: u16,
}
