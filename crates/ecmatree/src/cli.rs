//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use ecmatree_syntax::{OffsetUnit, Strategy, TreeShape};

use crate::config::{DetectConfig, DialectSetting, EcmatreeConfig, OutputConfig};

/// Parse TypeScript or JavaScript and print its syntax tree as JSON.
///
/// Prints `{"parser": ..., "ast": ...}` on success and `{"error": ...}` on
/// failure. Either way the exit status is 0.
#[derive(Debug, Parser)]
#[command(name = "ecmatree", version)]
pub struct Args {
    /// Source file to read (`-` or omitted: stdin)
    pub file: Option<PathBuf>,

    /// Parse as this dialect instead of guessing
    #[arg(long, value_enum)]
    pub dialect: Option<DialectSetting>,

    /// Retry with the other dialect when parsing fails
    #[arg(long)]
    pub fallback: bool,

    /// Tree to emit for plain JavaScript
    #[arg(long, value_enum)]
    pub plain_tree: Option<PlainTree>,

    /// Unit for node offsets
    #[arg(long, value_enum)]
    pub offsets: Option<Offsets>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Read configuration from this file only
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log more to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlainTree {
    Native,
    Normalized,
}

impl From<PlainTree> for TreeShape {
    fn from(value: PlainTree) -> Self {
        match value {
            PlainTree::Native => TreeShape::Native,
            PlainTree::Normalized => TreeShape::Normalized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Offsets {
    #[value(name = "utf16")]
    Utf16,
    #[value(name = "utf8")]
    Utf8,
    Chars,
}

impl From<Offsets> for OffsetUnit {
    fn from(value: Offsets) -> Self {
        match value {
            Offsets::Utf16 => OffsetUnit::Utf16,
            Offsets::Utf8 => OffsetUnit::Utf8,
            Offsets::Chars => OffsetUnit::Chars,
        }
    }
}

impl Args {
    /// The flags as a config layer, to merge over the files.
    pub fn overrides(&self) -> EcmatreeConfig {
        EcmatreeConfig {
            detect: DetectConfig {
                strategy: self.fallback.then_some(Strategy::Fallback),
                dialect: self.dialect,
            },
            output: OutputConfig {
                plain_tree: self.plain_tree.map(Into::into),
                offsets: self.offsets.map(Into::into),
                pretty: self.pretty.then_some(true),
            },
        }
    }

    /// The input path, or `None` for stdin.
    pub fn input(&self) -> Option<&std::path::Path> {
        self.file.as_deref().filter(|path| path.as_os_str() != "-")
    }
}
