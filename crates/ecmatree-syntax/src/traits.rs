//! Traits for grammar engines and the trees they produce.
//!
//! The normalizer never talks to a concrete parser. It reads engine trees
//! through [`SyntaxNode`] and resolves kind tags through [`KindTable`], so a
//! small in-memory tree is enough to exercise it.

use std::borrow::Cow;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::node::NormalizedNode;
use crate::offsets::OffsetUnit;

/// Error raised by an engine when source text violates its grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("syntax error at line {line}, column {column}: {detail}")]
    Syntax {
        line: usize,
        column: usize,
        detail: String,
    },

    #[error("parse error: {0}")]
    Engine(String),
}

/// Syntax categories that get kind-specific fields in the output.
///
/// Everything an engine does not map explicitly is [`SyntaxCategory::Other`]
/// and keeps only the base record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxCategory {
    Identifier,
    /// String, numeric and bigint literals.
    Literal,
    PropertyAccess,
    Call,
    VariableDeclaration,
    /// Function and method declarations.
    FunctionLike,
    Interface,
    PropertySignature,
    Other,
}

/// The role a child plays under its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Name,
    Type,
    Initializer,
    Expression,
    Arguments,
    Parameters,
    ReturnType,
    Body,
    Members,
}

/// Per-dialect lookup from numeric kind tags.
pub trait KindTable {
    /// Display name for a kind tag.
    fn kind_name(&self, kind: u16) -> &str;

    /// Category of a kind tag.
    fn category(&self, kind: u16) -> SyntaxCategory;
}

/// Read-only view of one engine node.
pub trait SyntaxNode: Sized {
    fn kind_id(&self) -> u16;

    /// Byte range in the source text.
    fn byte_range(&self) -> Range<usize>;

    /// Literal payload for leaf tokens (identifier text, cooked string value).
    fn text(&self) -> Option<Cow<'_, str>>;

    /// Single child in `role`, if the node has one.
    fn field(&self, role: Role) -> Option<Self>;

    /// Child sequence in `role`. `None` when the node has no such sequence.
    fn list(&self, role: Role) -> Option<Vec<Self>>;

    /// Kind tags of the node's modifier keywords, in source order.
    fn modifiers(&self) -> Vec<u16>;

    /// Call `f` once per direct child, left to right.
    fn for_each_child(&self, f: &mut dyn FnMut(Self));
}

/// Shape of the tree an engine emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeShape {
    /// The engine's own tree, passed through.
    #[default]
    Native,
    /// The same normalized schema the typed dialect gets.
    Normalized,
}

/// What the caller wants back from an engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseRequest {
    pub shape: TreeShape,
    pub offsets: OffsetUnit,
}

/// A converted tree, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Ast {
    Normalized(NormalizedNode),
    Native(serde_json::Value),
}

impl Ast {
    pub fn as_normalized(&self) -> Option<&NormalizedNode> {
        match self {
            Ast::Normalized(node) => Some(node),
            Ast::Native(_) => None,
        }
    }

    pub fn as_native(&self) -> Option<&serde_json::Value> {
        match self {
            Ast::Native(value) => Some(value),
            Ast::Normalized(_) => None,
        }
    }
}

/// A grammar engine for one dialect.
pub trait Engine: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Parse `source` and convert the result as `request` asks.
    fn parse(&self, source: &str, request: &ParseRequest) -> Result<Ast, ParseFailure>;
}
