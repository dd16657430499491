//! Check wire protocol IDL documents: parse, validate, and report findings.
//!
//! Usage:
//!   check_idl [OPTIONS] [FILE.xml ...]
//!   check_idl < protocol.xml
//!
//! The default mode parses each document and prints one line per validation
//! finding. The conversion modes replace checking: --markdown and --json print
//! the converted document to stdout, and --format rewrites files in canonical
//! form (or prints the canonical form when reading stdin).
//!
//! Options:
//!   --strict, -s    Reject malformed numeric attributes instead of defaulting
//!   --markdown, -m  Print Markdown documentation
//!   --json, -j      Print the JSON model
//!   --format, -f    Rewrite files in canonical form
//!
//! If no files are given, reads from stdin.

use std::io::{self, Read, Write};
use std::path::Path;
use wireidl::{
    parse_with, serialize, to_markdown, validate_protocol, NumericPolicy, ParseOptions, Protocol,
    ValidationRule,
};

fn rule_id(rule: ValidationRule) -> &'static str {
    match rule {
        ValidationRule::MissingName => "missing-name",
        ValidationRule::InvalidVersion => "invalid-version",
        ValidationRule::DuplicateValueIndex => "duplicate-value-index",
        ValidationRule::InvalidDirection => "invalid-direction",
    }
}

#[derive(Clone, Copy)]
enum Mode {
    Check,
    Markdown,
    Json,
    Format,
}

fn take_flag(args: &mut Vec<String>, long: &str, short: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == long || a == short) {
        args.remove(pos);
        true
    } else {
        false
    }
}

/// Validate and print findings; returns the finding count.
fn check(protocol: &Protocol, display_path: &str) -> usize {
    let report = validate_protocol(protocol);
    for err in &report.errors {
        println!("{}: {} [{}]", display_path, err.message, rule_id(err.rule));
    }
    report.errors.len()
}

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let strict = take_flag(&mut args, "--strict", "-s");
    let markdown = take_flag(&mut args, "--markdown", "-m");
    let json = take_flag(&mut args, "--json", "-j");
    let format = take_flag(&mut args, "--format", "-f");
    if let Some(unknown) = args.iter().find(|a| a.starts_with('-')) {
        anyhow::bail!("unknown option: {}", unknown);
    }
    let mode = match (markdown, json, format) {
        (false, false, false) => Mode::Check,
        (true, false, false) => Mode::Markdown,
        (false, true, false) => Mode::Json,
        (false, false, true) => Mode::Format,
        _ => anyhow::bail!("--markdown, --json and --format are mutually exclusive"),
    };
    let options = ParseOptions {
        numeric: if strict {
            NumericPolicy::Strict
        } else {
            NumericPolicy::Lenient
        },
    };

    let mut has_error = false;
    let mut total_findings = 0usize;

    if args.is_empty() {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src)?;
        let protocol = match parse_with(&src, options) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("<stdin>: {:#}", anyhow::Error::new(e));
                std::process::exit(1);
            }
        };
        match mode {
            Mode::Check => {
                let findings = check(&protocol, "<stdin>");
                total_findings += findings;
                if findings > 0 {
                    has_error = true;
                }
            }
            Mode::Markdown => print!("{}", to_markdown(&protocol)),
            Mode::Json => println!("{}", protocol.to_json()?),
            Mode::Format => {
                let mut doc = serialize(&protocol);
                doc.push('\n');
                io::stdout().write_all(doc.as_bytes())?;
            }
        }
    } else {
        for path in &args {
            let path = Path::new(path);
            let display_path = path.display().to_string();
            let src = match std::fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{}: {}", display_path, e);
                    has_error = true;
                    continue;
                }
            };
            let protocol = match parse_with(&src, options) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("{}: {:#}", display_path, anyhow::Error::new(e));
                    has_error = true;
                    continue;
                }
            };
            match mode {
                Mode::Check => {
                    let findings = check(&protocol, &display_path);
                    total_findings += findings;
                    if findings > 0 {
                        has_error = true;
                    }
                }
                Mode::Markdown => print!("{}", to_markdown(&protocol)),
                Mode::Json => println!("{}", protocol.to_json()?),
                Mode::Format => {
                    let mut doc = serialize(&protocol);
                    doc.push('\n');
                    if doc != src {
                        if let Err(e) = std::fs::write(path, &doc) {
                            eprintln!("{}: write failed: {}", display_path, e);
                            has_error = true;
                            continue;
                        }
                        eprintln!("{}: formatted", display_path);
                    }
                }
            }
        }
    }

    if total_findings > 0 {
        eprintln!("check: {} error(s)", total_findings);
    }
    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
