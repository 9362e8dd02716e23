//! Grammar engines - parse source code into engine trees.

#[cfg(any(feature = "read-typescript", feature = "read-javascript"))]
pub mod grammar;

#[cfg(any(feature = "read-typescript", feature = "read-javascript"))]
pub use grammar::{GrammarTable, MAX_DEPTH, TreeNode, TreeSitterEngine};

#[cfg(feature = "read-typescript")]
pub mod typescript;

#[cfg(feature = "read-typescript")]
pub use typescript::{TYPESCRIPT_ENGINE, read_typescript};

#[cfg(feature = "read-javascript")]
pub mod javascript;

#[cfg(feature = "read-javascript")]
pub use javascript::{JAVASCRIPT_ENGINE, read_javascript};
