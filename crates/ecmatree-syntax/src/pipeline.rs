//! Classify -> parse -> convert, behind a single failure boundary.
//!
//! [`Pipeline::run`] never fails: whatever goes wrong becomes
//! [`Report::Failed`], and a successful run is always a full tree. There is no
//! partial output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dialect::{Classifier, Dialect, FixedClassifier, HeuristicClassifier};
use crate::offsets::OffsetUnit;
use crate::registry;
use crate::traits::{Ast, Engine, ParseFailure, ParseRequest, TreeShape};

/// How the dialect is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Trust the classifier.
    #[default]
    Heuristic,
    /// Trust the classifier, then try the other dialect if parsing fails.
    Fallback,
}

/// Knobs for one pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub strategy: Strategy,
    /// Skip classification and parse as this dialect.
    pub dialect: Option<Dialect>,
    /// Tree emitted for the plain dialect. The typed dialect is always
    /// normalized.
    pub plain_tree: TreeShape,
    pub offsets: OffsetUnit,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error("no engine available for {0}")]
    NoEngine(Dialect),
}

/// The single JSON document written for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Parsed { parser: Dialect, ast: Ast },
    Failed { error: String },
}

impl Report {
    pub fn failed(error: impl fmt::Display) -> Self {
        Report::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Report::Failed { .. })
    }
}

/// Runs classification and parsing with a fixed set of engines.
pub struct Pipeline<'a> {
    options: Options,
    classifier: Box<dyn Classifier + 'a>,
    typed: Option<&'a dyn Engine>,
    plain: Option<&'a dyn Engine>,
}

impl Pipeline<'static> {
    /// A pipeline over the compiled-in engines.
    pub fn new(options: Options) -> Self {
        let classifier: Box<dyn Classifier> = match options.dialect {
            Some(dialect) => Box::new(FixedClassifier(dialect)),
            None => Box::new(HeuristicClassifier),
        };
        Self {
            options,
            classifier,
            typed: registry::engine_for(Dialect::Typed),
            plain: registry::engine_for(Dialect::Plain),
        }
    }
}

impl<'a> Pipeline<'a> {
    /// Use `engine` for its dialect instead of the built-in one.
    pub fn with_engine(mut self, engine: &'a dyn Engine) -> Self {
        match engine.dialect() {
            Dialect::Typed => self.typed = Some(engine),
            Dialect::Plain => self.plain = Some(engine),
        }
        self
    }

    /// Replace the classifier.
    pub fn with_classifier(mut self, classifier: impl Classifier + 'a) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Parse `source`, turning any failure into [`Report::Failed`].
    pub fn run(&self, source: &str) -> Report {
        match self.parse(source) {
            Ok((parser, ast)) => Report::Parsed { parser, ast },
            Err(err) => Report::failed(err),
        }
    }

    /// Parse `source`, returning the dialect that succeeded and its tree.
    pub fn parse(&self, source: &str) -> Result<(Dialect, Ast), PipelineError> {
        let dialect = self.classifier.classify(source);
        match self.parse_as(dialect, source) {
            Ok(ast) => Ok((dialect, ast)),
            Err(first) if self.options.strategy == Strategy::Fallback => {
                let other = dialect.other();
                tracing::info!(from = %dialect, to = %other, error = %first, "retrying as other dialect");
                // The first failure is the one worth reporting.
                self.parse_as(other, source)
                    .map(|ast| (other, ast))
                    .map_err(|_| first)
            }
            Err(err) => Err(err),
        }
    }

    fn parse_as(&self, dialect: Dialect, source: &str) -> Result<Ast, PipelineError> {
        let engine = match dialect {
            Dialect::Typed => self.typed,
            Dialect::Plain => self.plain,
        }
        .ok_or(PipelineError::NoEngine(dialect))?;

        let request = ParseRequest {
            shape: match dialect {
                Dialect::Typed => TreeShape::Normalized,
                Dialect::Plain => self.options.plain_tree,
            },
            offsets: self.options.offsets,
        };
        tracing::debug!(%dialect, shape = ?request.shape, "parsing");
        Ok(engine.parse(source, &request)?)
    }
}
