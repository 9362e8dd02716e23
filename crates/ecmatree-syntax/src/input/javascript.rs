//! Tree-sitter based JavaScript engine.

use serde_json::Value;
use tree_sitter::Language;

use super::grammar::TreeSitterEngine;
use crate::dialect::Dialect;
use crate::offsets::OffsetUnit;
use crate::traits::ParseFailure;

/// Static instance of the JavaScript engine for the registry.
pub static JAVASCRIPT_ENGINE: TreeSitterEngine = TreeSitterEngine::new(Dialect::Plain, language);

fn language() -> Language {
    arborium_javascript::language().into()
}

/// Parse JavaScript source into the engine's own tree with UTF-16 offsets.
pub fn read_javascript(source: &str) -> Result<Value, ParseFailure> {
    JAVASCRIPT_ENGINE.native(source, OffsetUnit::Utf16)
}
