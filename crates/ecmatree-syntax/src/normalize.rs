//! Engine tree -> normalized tree conversion.
//!
//! Every node gets the same base record (`kind`, `kindNumber`, `pos`, `end`,
//! optional `text`). A few syntax categories additionally expose a curated set
//! of role-named fields; what those fields are depends only on the category,
//! never on where the node sits in the tree. Children are converted first and
//! attached to their parent afterwards, so the result is built bottom-up.

use crate::node::{Modifier, Name, NormalizedNode};
use crate::offsets::OffsetMap;
use crate::traits::{KindTable, Role, SyntaxCategory, SyntaxNode};

/// Converts engine nodes using one dialect's kind table.
pub struct Normalizer<'a, T: KindTable + ?Sized> {
    table: &'a T,
    offsets: &'a OffsetMap,
}

impl<'a, T: KindTable + ?Sized> Normalizer<'a, T> {
    pub fn new(table: &'a T, offsets: &'a OffsetMap) -> Self {
        Self { table, offsets }
    }

    /// Convert `node` and its whole subtree. `None` means the optional child
    /// was not there, and converts to `None`.
    pub fn normalize<N: SyntaxNode>(&self, node: Option<N>) -> Option<NormalizedNode> {
        node.map(|node| self.convert(&node))
    }

    /// Convert a node that is known to be present.
    pub fn convert<N: SyntaxNode>(&self, node: &N) -> NormalizedNode {
        let kind = node.kind_id();
        let range = node.byte_range();

        let mut out = NormalizedNode::new(self.table.kind_name(kind), kind);
        out.pos = Some(self.offsets.offset(range.start));
        out.end = Some(self.offsets.offset(range.end));
        out.text = node.text().map(|text| text.into_owned());

        match self.table.category(kind) {
            SyntaxCategory::Identifier => {
                out.name = node.text().map(|text| Name::Text(text.into_owned()));
            }
            SyntaxCategory::Literal => {
                out.value = node.text().map(|text| text.into_owned());
            }
            SyntaxCategory::PropertyAccess => {
                out.expression = self.field(node, Role::Expression);
                out.name = self.name(node);
            }
            SyntaxCategory::Call => {
                out.expression = self.field(node, Role::Expression);
                out.arguments = Some(self.list(node, Role::Arguments).unwrap_or_default());
            }
            SyntaxCategory::VariableDeclaration => {
                out.name = self.name(node);
                out.ty = self.field(node, Role::Type);
                out.initializer = self.field(node, Role::Initializer);
            }
            SyntaxCategory::FunctionLike => {
                out.name = self.name(node);
                out.parameters = self.list(node, Role::Parameters);
                out.return_type = self.field(node, Role::ReturnType);
                out.body = self.field(node, Role::Body);
            }
            SyntaxCategory::Interface => {
                out.name = self.name(node);
                out.members = self.list(node, Role::Members);
            }
            SyntaxCategory::PropertySignature => {
                out.name = self.name(node);
                out.ty = self.field(node, Role::Type);
            }
            SyntaxCategory::Other => {}
        }

        let modifiers = node.modifiers();
        if !modifiers.is_empty() {
            out.modifiers = Some(
                modifiers
                    .into_iter()
                    .map(|kind| Modifier {
                        kind: self.table.kind_name(kind).to_string(),
                        kind_number: kind,
                    })
                    .collect(),
            );
        }

        let mut children = Vec::new();
        node.for_each_child(&mut |child: N| children.push(self.convert(&child)));
        if !children.is_empty() {
            out.children = Some(children);
        }

        out
    }

    fn field<N: SyntaxNode>(&self, node: &N, role: Role) -> Option<Box<NormalizedNode>> {
        self.normalize(node.field(role)).map(Box::new)
    }

    fn name<N: SyntaxNode>(&self, node: &N) -> Option<Name> {
        self.field(node, Role::Name).map(Name::Node)
    }

    fn list<N: SyntaxNode>(&self, node: &N, role: Role) -> Option<Vec<NormalizedNode>> {
        node.list(role)
            .map(|items| items.iter().map(|item| self.convert(item)).collect())
    }
}
