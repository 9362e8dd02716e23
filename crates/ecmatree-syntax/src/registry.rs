//! Built-in engines by dialect.

use crate::dialect::Dialect;
use crate::traits::Engine;

/// The compiled-in engine for `dialect`, if its feature is enabled.
pub fn engine_for(dialect: Dialect) -> Option<&'static dyn Engine> {
    match dialect {
        #[cfg(feature = "read-typescript")]
        Dialect::Typed => Some(&crate::input::typescript::TYPESCRIPT_ENGINE),
        #[cfg(feature = "read-javascript")]
        Dialect::Plain => Some(&crate::input::javascript::JAVASCRIPT_ENGINE),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// All compiled-in engines.
pub fn engines() -> Vec<&'static dyn Engine> {
    [Dialect::Typed, Dialect::Plain]
        .into_iter()
        .filter_map(engine_for)
        .collect()
}
