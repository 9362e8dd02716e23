//! Tree-sitter based TypeScript engine.

use tree_sitter::Language;

use super::grammar::TreeSitterEngine;
use crate::dialect::Dialect;
use crate::node::NormalizedNode;
use crate::offsets::OffsetUnit;
use crate::traits::ParseFailure;

/// Static instance of the TypeScript engine for the registry.
pub static TYPESCRIPT_ENGINE: TreeSitterEngine = TreeSitterEngine::new(Dialect::Typed, language);

fn language() -> Language {
    arborium_typescript::language().into()
}

/// Parse TypeScript source into a normalized tree with UTF-16 offsets.
pub fn read_typescript(source: &str) -> Result<NormalizedNode, ParseFailure> {
    TYPESCRIPT_ENGINE.normalize(source, OffsetUnit::Utf16)
}
