//! Dialect sniffing and tree normalization for TypeScript and JavaScript.
//!
//! `ecmatree-syntax` takes a source text, guesses whether it is TypeScript or
//! plain JavaScript, parses it with the matching engine, and produces a tree
//! that serializes to JSON.
//!
//! # Architecture
//!
//! ```text
//!               ┌─> typed  ─> TreeSitterEngine ─> Normalizer ─> NormalizedNode
//! source ─> classify
//!               └─> plain  ─> TreeSitterEngine ─> native tree (serde_json::Value)
//! ```
//!
//! Classification is a lexical heuristic (`dialect.rs`): eight patterns that
//! only typed sources should contain. Anything the heuristic misses goes to
//! the plain engine, which then rejects it.
//!
//! # Example
//!
//! ```ignore
//! use ecmatree_syntax::{Options, Pipeline};
//!
//! let report = Pipeline::new(Options::default()).run("interface P { x: number }");
//! println!("{}", serde_json::to_string(&report)?);
//! // => {"parser":"typescript","ast":{"kind":"program",...}}
//! ```

pub mod dialect;
pub mod node;
pub mod normalize;
pub mod offsets;
pub mod pipeline;
pub mod registry;
pub mod traits;

pub mod input;

// Re-exports: classification
pub use dialect::{
    Classifier, Detection, Dialect, FixedClassifier, HeuristicClassifier, Trigger, UnknownDialect,
    classify, detect,
};

// Re-exports: trees
pub use node::{Modifier, Name, NormalizedNode};
pub use normalize::Normalizer;
pub use offsets::{OffsetMap, OffsetUnit};

// Re-exports: traits
pub use traits::{
    Ast, Engine, KindTable, ParseFailure, ParseRequest, Role, SyntaxCategory, SyntaxNode,
    TreeShape,
};

// Re-exports: pipeline
pub use pipeline::{Options, Pipeline, PipelineError, Report, Strategy};
pub use registry::{engine_for, engines};

// Re-exports: built-in engines
#[cfg(feature = "read-typescript")]
pub use input::{TYPESCRIPT_ENGINE, read_typescript};

#[cfg(feature = "read-javascript")]
pub use input::{JAVASCRIPT_ENGINE, read_javascript};
