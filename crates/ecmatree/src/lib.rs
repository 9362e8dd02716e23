//! The `ecmatree` command: read a source text, print one JSON report.
//!
//! All of the parsing lives in `ecmatree-syntax`. This crate only wires
//! input, configuration, and logging around [`Pipeline::run`].

pub mod cli;
pub mod config;
pub mod logging;

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use ecmatree_syntax::{Pipeline, Report};

pub use cli::Args;
pub use config::EcmatreeConfig;

/// Resolve configuration for `args` in the working directory.
pub fn resolve_config(args: &Args) -> EcmatreeConfig {
    let files = match &args.config {
        Some(path) => EcmatreeConfig::load_explicit(path),
        None => {
            let root = std::env::current_dir().unwrap_or_else(|_| ".".into());
            EcmatreeConfig::load(&root)
        }
    };
    files.merge(args.overrides())
}

/// Read the whole input. Invalid UTF-8 is replaced, not rejected.
pub fn read_source(path: Option<&Path>) -> anyhow::Result<String> {
    let bytes = match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut bytes = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            bytes
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Produce the report for `args`. Never fails; read errors become reports.
pub fn report(args: &Args, config: &EcmatreeConfig) -> Report {
    match read_source(args.input()) {
        Ok(source) => {
            tracing::debug!(bytes = source.len(), "read input");
            Pipeline::new(config.options()).run(&source)
        }
        Err(err) => Report::failed(format!("{err:#}")),
    }
}

/// Write `report` as one JSON document followed by a newline.
pub fn write_report(out: &mut impl Write, report: &Report, pretty: bool) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, report)?;
    } else {
        serde_json::to_writer(&mut *out, report)?;
    }
    writeln!(out)?;
    out.flush()
}

/// Run the command end to end, writing to `out`.
pub fn run(args: &Args, out: &mut impl Write) -> io::Result<()> {
    let config = resolve_config(args);
    let report = report(args, &config);
    if let Report::Failed { error } = &report {
        tracing::debug!(%error, "no tree produced");
    }
    write_report(out, &report, config.pretty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_report_is_one_line() {
        let mut out = Vec::new();
        write_report(&mut out, &Report::failed("boom"), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"error\":\"boom\"}\n");
    }

    #[test]
    fn test_pretty_report() {
        let mut out = Vec::new();
        write_report(&mut out, &Report::failed("boom"), true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"error\": \"boom\"\n}\n");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = read_source(Some(Path::new("/nonexistent/input.ts"))).unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to read /nonexistent/input.ts"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.js");
        std::fs::write(&path, b"let a = '\xff';").unwrap();
        let source = read_source(Some(&path)).unwrap();
        assert_eq!(source, "let a = '\u{fffd}';");
    }
}
