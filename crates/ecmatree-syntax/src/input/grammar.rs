//! Tree-sitter plumbing shared by the TypeScript and JavaScript engines.
//!
//! Both grammars use the same ECMAScript node names, so one set of rules
//! maps them onto syntax categories. Kind ids differ per grammar; each engine
//! builds its own [`GrammarTable`] the first time it is used.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::str::Chars;
use std::sync::OnceLock;

use serde_json::{Map, Value};
use tree_sitter::{Language, Node, Parser, Tree};

use crate::dialect::Dialect;
use crate::node::NormalizedNode;
use crate::normalize::Normalizer;
use crate::offsets::{OffsetMap, OffsetUnit};
use crate::traits::{
    Ast, Engine, KindTable, ParseFailure, ParseRequest, Role, SyntaxCategory, SyntaxNode,
    TreeShape,
};

/// Nodes exposed as single tokens: they carry `text` and no children.
const OPAQUE_KINDS: &[&str] = &["string", "regex", "predefined_type"];

/// Keyword tokens reported as modifiers.
///
/// `export` and `default` land on the `export_statement` that wraps the
/// exported declaration. Keywords held by a grammar field (the `const` of a
/// lexical declaration) are never modifiers.
const MODIFIER_KEYWORDS: &[&str] = &[
    "static", "readonly", "async", "abstract", "declare", "accessor", "export", "default",
    "const",
];

/// Nodes whose leading keyword is what the node is, not a modifier on it.
const KEYWORD_OWNERS: &[&str] = &[
    "class_static_block",
    "switch_default",
    "as_expression",
    "readonly_type",
];

/// Named nodes wrapping a single modifier keyword.
const MODIFIER_WRAPPERS: &[&str] = &["accessibility_modifier", "override_modifier"];

/// Deepest tree the recursive walks are allowed to see.
pub const MAX_DEPTH: usize = 1000;

/// Keys of the native tree that a grammar field must not overwrite.
const NATIVE_RESERVED: &[&str] = &["type", "start", "end", "text", "children"];

fn category_for(kind: &str) -> SyntaxCategory {
    match kind {
        "identifier"
        | "property_identifier"
        | "type_identifier"
        | "shorthand_property_identifier"
        | "shorthand_property_identifier_pattern"
        | "private_property_identifier"
        | "statement_identifier" => SyntaxCategory::Identifier,
        "string" | "number" => SyntaxCategory::Literal,
        "member_expression" => SyntaxCategory::PropertyAccess,
        "call_expression" => SyntaxCategory::Call,
        "variable_declarator" => SyntaxCategory::VariableDeclaration,
        "function_declaration"
        | "generator_function_declaration"
        | "function_signature"
        | "method_definition" => SyntaxCategory::FunctionLike,
        "interface_declaration" => SyntaxCategory::Interface,
        "property_signature" => SyntaxCategory::PropertySignature,
        _ => SyntaxCategory::Other,
    }
}

/// Kind names and categories of one grammar, keyed by kind id.
pub struct GrammarTable {
    language: Language,
    categories: HashMap<u16, SyntaxCategory>,
    opaque: HashSet<u16>,
    annotations: HashSet<u16>,
    modifier_keywords: HashSet<u16>,
    modifier_wrappers: HashSet<u16>,
    keyword_owners: HashSet<u16>,
}

impl GrammarTable {
    pub fn new(language: Language) -> Self {
        let mut table = Self {
            categories: HashMap::new(),
            opaque: HashSet::new(),
            annotations: HashSet::new(),
            modifier_keywords: HashSet::new(),
            modifier_wrappers: HashSet::new(),
            keyword_owners: HashSet::new(),
            language,
        };

        // Aliased kinds can appear under several ids; every id gets an entry.
        for id in 0..table.language.node_kind_count() {
            let Ok(id) = u16::try_from(id) else { break };
            let Some(name) = table.language.node_kind_for_id(id) else {
                continue;
            };

            if !table.language.node_kind_is_named(id) {
                if MODIFIER_KEYWORDS.contains(&name) {
                    table.modifier_keywords.insert(id);
                }
                continue;
            }

            match category_for(name) {
                SyntaxCategory::Other => {}
                category => {
                    table.categories.insert(id, category);
                }
            }
            if OPAQUE_KINDS.contains(&name) {
                table.opaque.insert(id);
            }
            if MODIFIER_WRAPPERS.contains(&name) {
                table.modifier_wrappers.insert(id);
            }
            if KEYWORD_OWNERS.contains(&name) {
                table.keyword_owners.insert(id);
            }
            if name.ends_with("_annotation") {
                table.annotations.insert(id);
            }
        }

        table
    }

    pub fn language(&self) -> &Language {
        &self.language
    }
}

impl KindTable for GrammarTable {
    fn kind_name(&self, kind: u16) -> &str {
        self.language.node_kind_for_id(kind).unwrap_or("unknown")
    }

    fn category(&self, kind: u16) -> SyntaxCategory {
        self.categories
            .get(&kind)
            .copied()
            .unwrap_or(SyntaxCategory::Other)
    }
}

/// A tree-sitter node together with what is needed to read it.
#[derive(Clone, Copy)]
pub struct TreeNode<'t> {
    node: Node<'t>,
    source: &'t str,
    table: &'t GrammarTable,
}

impl<'t> TreeNode<'t> {
    pub fn new(node: Node<'t>, source: &'t str, table: &'t GrammarTable) -> Self {
        Self {
            node,
            source,
            table,
        }
    }

    fn wrap(&self, node: Node<'t>) -> Self {
        Self { node, ..*self }
    }

    fn slice(&self) -> &'t str {
        self.source.get(self.node.byte_range()).unwrap_or("")
    }

    fn is_opaque(&self) -> bool {
        self.table.opaque.contains(&self.node.kind_id())
    }

    /// Named children that are part of the syntax (comments excluded).
    fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .filter(|child| !child.is_extra())
            .map(|child| self.wrap(child))
            .collect()
    }

    /// Named children plus the anonymous tokens stored in a grammar field
    /// (`operator` of a binary expression, `kind` of a declaration).
    fn syntax_children(&self) -> Vec<Self> {
        let mut children = Vec::new();
        let mut cursor = self.node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                let keep = if child.is_named() {
                    !child.is_extra()
                } else {
                    cursor.field_name().is_some()
                };
                if keep {
                    children.push(self.wrap(child));
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        children
    }

    /// `: T` annotations stand in for the type they wrap.
    fn unwrap_annotation(self) -> Self {
        if !self.table.annotations.contains(&self.node.kind_id()) {
            return self;
        }
        self.named_children().into_iter().next().unwrap_or(self)
    }

    fn category(&self) -> SyntaxCategory {
        self.table.category(self.node.kind_id())
    }
}

impl<'t> SyntaxNode for TreeNode<'t> {
    fn kind_id(&self) -> u16 {
        self.node.kind_id()
    }

    fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        if self.category() == SyntaxCategory::Literal && self.node.kind() == "string" {
            return Some(Cow::Owned(cook_string(self.slice())));
        }
        if self.is_opaque() || self.node.child_count() == 0 {
            return Some(Cow::Borrowed(self.slice()));
        }
        None
    }

    fn field(&self, role: Role) -> Option<Self> {
        let field = match (self.category(), role) {
            (SyntaxCategory::PropertyAccess, Role::Expression) => "object",
            (SyntaxCategory::PropertyAccess, Role::Name) => "property",
            (SyntaxCategory::Call, Role::Expression) => "function",
            (_, Role::Name) => "name",
            (_, Role::Type) => "type",
            (_, Role::ReturnType) => "return_type",
            (_, Role::Initializer) => "value",
            (_, Role::Body) => "body",
            _ => return None,
        };

        let child = self.wrap(self.node.child_by_field_name(field)?);
        match role {
            Role::Type | Role::ReturnType => Some(child.unwrap_annotation()),
            _ => Some(child),
        }
    }

    fn list(&self, role: Role) -> Option<Vec<Self>> {
        let (field, holder_kind) = match role {
            Role::Arguments => ("arguments", Some("arguments")),
            Role::Parameters => ("parameters", None),
            Role::Members => ("body", None),
            _ => return None,
        };

        let holder = self.node.child_by_field_name(field)?;
        // Tagged templates keep a template string in the arguments slot.
        if holder_kind.is_some_and(|kind| holder.kind() != kind) {
            return None;
        }
        Some(self.wrap(holder).named_children())
    }

    fn modifiers(&self) -> Vec<u16> {
        let mut modifiers = Vec::new();
        if self.table.keyword_owners.contains(&self.node.kind_id()) {
            return modifiers;
        }

        let mut cursor = self.node.walk();
        if !cursor.goto_first_child() {
            return modifiers;
        }
        loop {
            let child = cursor.node();
            let kind = child.kind_id();
            if cursor.field_name().is_none() {
                if self.table.modifier_keywords.contains(&kind) {
                    modifiers.push(kind);
                } else if self.table.modifier_wrappers.contains(&kind) {
                    if let Some(keyword) = child.child(0) {
                        modifiers.push(keyword.kind_id());
                    }
                }
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        modifiers
    }

    fn for_each_child(&self, f: &mut dyn FnMut(Self)) {
        if self.is_opaque() {
            return;
        }
        for child in self.syntax_children() {
            f(child);
        }
    }
}

/// Render the engine's own tree as JSON: `type`, `start`, `end`, one key per
/// grammar field, `children` for the unlabelled rest, `text` on leaves.
pub fn native_tree(node: TreeNode<'_>, offsets: &OffsetMap) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), Value::from(node.node.kind()));
    map.insert("start".into(), Value::from(offsets.offset(node.node.start_byte())));
    map.insert("end".into(), Value::from(offsets.offset(node.node.end_byte())));

    if node.is_opaque() || node.node.named_child_count() == 0 {
        map.insert("text".into(), Value::from(node.slice()));
        return Value::Object(map);
    }

    let mut children = Vec::new();
    let mut cursor = node.node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            let field = cursor
                .field_name()
                .filter(|field| !NATIVE_RESERVED.contains(field));
            if child.is_named() && !child.is_extra() {
                let value = native_tree(node.wrap(child), offsets);
                match field {
                    Some(field) => insert_field(&mut map, field, value),
                    None => children.push(value),
                }
            } else if let Some(field) = field {
                // Field-held tokens: `"operator": "+"`, `"kind": "const"`.
                insert_field(&mut map, field, Value::from(node.wrap(child).slice()));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    if !children.is_empty() {
        map.insert("children".into(), Value::Array(children));
    }
    Value::Object(map)
}

/// A field that repeats becomes an array.
fn insert_field(map: &mut Map<String, Value>, field: &str, value: Value) {
    match map.get_mut(field) {
        None => {
            map.insert(field.to_string(), value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// Walk the whole tree without recursion, stopping at the first ERROR or
/// MISSING node in source order or at the first node deeper than `max_depth`.
fn check_tree(source: &str, tree: &Tree, max_depth: usize) -> Result<(), ParseFailure> {
    let mut cursor = tree.walk();
    let mut depth = 0usize;
    loop {
        if depth > max_depth {
            return Err(ParseFailure::Engine(format!(
                "nesting too deep (more than {max_depth} levels)"
            )));
        }
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Err(syntax_error(source, node));
        }

        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return Ok(());
            }
            depth -= 1;
        }
    }
}

fn syntax_error(source: &str, node: Node<'_>) -> ParseFailure {
    let start = node.start_byte().min(source.len());
    let line_start = source
        .get(..start)
        .and_then(|prefix| prefix.rfind('\n'))
        .map_or(0, |i| i + 1);
    let column = source
        .get(line_start..start)
        .map_or(0, |prefix| prefix.chars().count());

    let detail = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = source
            .get(node.byte_range())
            .unwrap_or("")
            .chars()
            .take(20)
            .collect();
        let snippet = snippet.trim();
        if snippet.is_empty() {
            "unexpected end of input".to_string()
        } else {
            format!("unexpected `{snippet}`")
        }
    };

    ParseFailure::Syntax {
        line: node.start_position().row + 1,
        column: column + 1,
        detail,
    }
}

/// A grammar engine backed by a tree-sitter language.
pub struct TreeSitterEngine {
    dialect: Dialect,
    language: fn() -> Language,
    table: OnceLock<GrammarTable>,
}

impl TreeSitterEngine {
    pub const fn new(dialect: Dialect, language: fn() -> Language) -> Self {
        Self {
            dialect,
            language,
            table: OnceLock::new(),
        }
    }

    pub fn table(&self) -> &GrammarTable {
        self.table.get_or_init(|| GrammarTable::new((self.language)()))
    }

    /// Parse `source`, failing on the first syntax error or on nesting deeper
    /// than [`MAX_DEPTH`].
    pub fn parse_tree(&self, source: &str) -> Result<Tree, ParseFailure> {
        let mut parser = Parser::new();
        parser
            .set_language(self.table().language())
            .map_err(|err| ParseFailure::Engine(err.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseFailure::Engine("failed to parse".into()))?;

        if let Err(failure) = check_tree(source, &tree, MAX_DEPTH) {
            tracing::debug!(dialect = %self.dialect, %failure, "rejected tree");
            return Err(failure);
        }
        Ok(tree)
    }

    /// Parse `source` into the normalized schema.
    pub fn normalize(
        &self,
        source: &str,
        unit: OffsetUnit,
    ) -> Result<NormalizedNode, ParseFailure> {
        let tree = self.parse_tree(source)?;
        let offsets = OffsetMap::new(source, unit);
        let root = TreeNode::new(tree.root_node(), source, self.table());
        let node = Normalizer::new(self.table(), &offsets).convert(&root);
        tracing::debug!(dialect = %self.dialect, nodes = node.count(), "normalized tree");
        Ok(node)
    }

    /// Parse `source` into the engine's own tree shape.
    pub fn native(&self, source: &str, unit: OffsetUnit) -> Result<Value, ParseFailure> {
        let tree = self.parse_tree(source)?;
        let offsets = OffsetMap::new(source, unit);
        let root = TreeNode::new(tree.root_node(), source, self.table());
        Ok(native_tree(root, &offsets))
    }
}

impl Engine for TreeSitterEngine {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn parse(&self, source: &str, request: &ParseRequest) -> Result<Ast, ParseFailure> {
        match request.shape {
            TreeShape::Normalized => self.normalize(source, request.offsets).map(Ast::Normalized),
            TreeShape::Native => self.native(source, request.offsets).map(Ast::Native),
        }
    }
}

/// Decode a quoted string literal into the value it denotes.
fn cook_string(raw: &str) -> String {
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => out.push(take_hex(&mut chars, 2).unwrap_or('\u{fffd}')),
            Some('u') => out.push(take_unicode(&mut chars).unwrap_or('\u{fffd}')),
            // Line continuations produce nothing.
            Some('\r') => {
                if chars.as_str().starts_with('\n') {
                    chars.next();
                }
            }
            Some('\n' | '\u{2028}' | '\u{2029}') => {}
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn hex_value(chars: &mut Chars<'_>, len: usize) -> Option<u32> {
    let digits = chars.as_str().get(..len)?;
    let value = u32::from_str_radix(digits, 16).ok()?;
    for _ in 0..len {
        chars.next();
    }
    Some(value)
}

fn take_hex(chars: &mut Chars<'_>, len: usize) -> Option<char> {
    char::from_u32(hex_value(chars, len)?)
}

/// `\u{1F600}`, `é`, or a `😀` surrogate pair.
fn take_unicode(chars: &mut Chars<'_>) -> Option<char> {
    if chars.as_str().starts_with('{') {
        let rest = chars.as_str();
        let close = rest.find('}')?;
        let value = u32::from_str_radix(&rest[1..close], 16).ok()?;
        for _ in 0..=close {
            chars.next();
        }
        return char::from_u32(value);
    }

    let high = hex_value(chars, 4)?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high);
    }
    let rest = chars.as_str();
    if let Some(low_digits) = rest.strip_prefix("\\u").and_then(|r| r.get(..4)) {
        if let Ok(low) = u32::from_str_radix(low_digits, 16) {
            if (0xDC00..0xE000).contains(&low) {
                for _ in 0..6 {
                    chars.next();
                }
                return char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00));
            }
        }
    }
    None
}
