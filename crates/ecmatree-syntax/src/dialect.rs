//! Dialect sniffing.
//!
//! Decides whether source text is TypeScript or plain JavaScript by looking
//! for TypeScript surface syntax with a handful of regular expressions. This
//! is a heuristic: it only picks which grammar gets the first try, so a wrong
//! guess shows up as a parse error rather than a corrupted tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// Which grammar a source text is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// TypeScript.
    #[serde(rename = "typescript")]
    Typed,
    /// JavaScript.
    #[serde(rename = "javascript")]
    Plain,
}

impl Dialect {
    /// Name reported in the `parser` key of the output.
    pub fn parser_name(self) -> &'static str {
        match self {
            Dialect::Typed => "typescript",
            Dialect::Plain => "javascript",
        }
    }

    /// The dialect tried when this one fails under the fallback strategy.
    pub fn other(self) -> Dialect {
        match self {
            Dialect::Typed => Dialect::Plain,
            Dialect::Plain => Dialect::Typed,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.parser_name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown dialect `{0}` (expected `typescript` or `javascript`)")]
pub struct UnknownDialect(String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Ok(Dialect::Typed),
            "javascript" | "js" => Ok(Dialect::Plain),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// The TypeScript surface form that tipped the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    TypeAnnotation,
    Interface,
    TypeAlias,
    Enum,
    Generic,
    TypeAssertion,
    AccessModifier,
    Readonly,
}

/// Word characters are ASCII only, the way JavaScript regexes treat `\w`.
static TRIGGERS: LazyLock<Vec<(Trigger, Regex)>> = LazyLock::new(|| {
    [
        (
            Trigger::TypeAnnotation,
            r":\s*[[:word:]]+(\[\])?(\s*\|\s*[[:word:]]+)*\s*[=;,)]",
        ),
        (Trigger::Interface, r"interface\s+[[:word:]]+"),
        (Trigger::TypeAlias, r"type\s+[[:word:]]+\s*="),
        (Trigger::Enum, r"enum\s+[[:word:]]+"),
        (Trigger::Generic, r"<[[:word:]]+>"),
        (Trigger::TypeAssertion, r"as\s+[[:word:]]+"),
        (Trigger::AccessModifier, r"(public|private|protected)\s+"),
        (Trigger::Readonly, r"readonly\s+"),
    ]
    .into_iter()
    .map(|(trigger, pattern)| {
        let regex = Regex::new(pattern).expect("trigger patterns are valid");
        (trigger, regex)
    })
    .collect()
});

/// Outcome of sniffing a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub dialect: Dialect,
    /// First trigger that matched, if the verdict came from one.
    pub trigger: Option<Trigger>,
}

/// Sniff `source`, reporting which trigger matched first.
pub fn detect(source: &str) -> Detection {
    let trigger = TRIGGERS
        .iter()
        .find(|(_, regex)| regex.is_match(source))
        .map(|(trigger, _)| *trigger);

    Detection {
        dialect: if trigger.is_some() {
            Dialect::Typed
        } else {
            Dialect::Plain
        },
        trigger,
    }
}

/// Sniff `source` and return the verdict. Defaults to [`Dialect::Plain`].
pub fn classify(source: &str) -> Dialect {
    detect(source).dialect
}

/// Picks the dialect a source text should be parsed as.
pub trait Classifier: Send + Sync {
    fn classify(&self, source: &str) -> Dialect;
}

/// Regex sniffing over TypeScript surface syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

impl Classifier for HeuristicClassifier {
    fn classify(&self, source: &str) -> Dialect {
        let detection = detect(source);
        tracing::debug!(
            dialect = %detection.dialect,
            trigger = ?detection.trigger,
            "classified source"
        );
        detection.dialect
    }
}

/// Always answers with the same dialect.
#[derive(Debug, Clone, Copy)]
pub struct FixedClassifier(pub Dialect);

impl Classifier for FixedClassifier {
    fn classify(&self, _source: &str) -> Dialect {
        self.0
    }
}
