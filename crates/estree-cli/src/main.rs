#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::needless_pass_by_value)]

mod logging;

use clap::Parser;
use estree_parser::{ParseError, ParserOptions, TokenClass, TokenEvent};
use miette::{IntoDiagnostic, NamedSource, Result, SourceSpan, WrapErr};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "esparse")]
#[command(author, version, about = "Parse JavaScript and print its ESTree syntax tree", long_about = None)]
struct Cli {
    /// Source file to parse (reads stdin when omitted or `-`)
    file: Option<PathBuf>,

    /// Parse with the module goal
    #[arg(long)]
    module: bool,

    /// Start in strict mode
    #[arg(long)]
    strict: bool,

    /// Reject Annex B web-compatibility syntax
    #[arg(long)]
    disable_web_compat: bool,

    /// Attach line/column locations to every node
    #[arg(long)]
    loc: bool,

    /// Enable staged syntax (import attributes, `import()` options)
    #[arg(long)]
    next: bool,

    /// Attach source text to literals
    #[arg(long)]
    raw: bool,

    /// Print the token stream instead of the tree
    #[arg(long)]
    tokens: bool,

    /// JSON file with parser options; flags given on the command line win
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write log lines as JSON
    #[arg(long)]
    log_json: bool,
}

/// A syntax error rendered against the source it was found in.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(esparse::syntax_error))]
struct SyntaxError {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
}

impl SyntaxError {
    fn new(err: &ParseError, name: &str, source: String) -> Self {
        let offset = (err.offset as usize).min(source.len());
        let len = source[offset..].chars().next().map_or(0, char::len_utf8);
        Self {
            message: err.to_string(),
            label: err.message(),
            src: NamedSource::new(name, source),
            span: SourceSpan::new(offset.into(), len),
        }
    }
}

/// Owned copy of a token event for printing after the parse.
#[derive(Debug, Serialize)]
struct TokenRecord {
    #[serde(rename = "type")]
    class: TokenClass,
    value: String,
    start: u32,
    end: u32,
}

impl From<TokenEvent<'_>> for TokenRecord {
    fn from(event: TokenEvent<'_>) -> Self {
        Self {
            class: event.class,
            value: event.value.to_string(),
            start: event.start,
            end: event.end,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let options = resolve_options(&cli)?;
    let (name, source) = read_source(cli.file.as_deref())?;
    info!(file = %name, goal = options.source_type().as_str(), "parsing");

    let json = if cli.tokens {
        let mut tokens = Vec::new();
        estree_parser::parse_with_tokens(&source, options, |event| tokens.push(TokenRecord::from(event)))
            .map_err(|err| SyntaxError::new(&err, &name, source.clone()))?;
        debug!(count = tokens.len(), "collected tokens");
        to_json(&tokens, cli.compact)?
    } else {
        let program = estree_parser::parse(&source, options)
            .map_err(|err| SyntaxError::new(&err, &name, source.clone()))?;
        to_json(&program, cli.compact)?
    };

    println!("{json}");
    Ok(())
}

/// Start from the config file (if any) and switch on every flag given.
fn resolve_options(cli: &Cli) -> Result<ParserOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<ParserOptions>(&text)
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid config {}", path.display()))?
        }
        None => ParserOptions::default(),
    };
    options.module |= cli.module;
    options.strict |= cli.strict;
    options.disable_web_compat |= cli.disable_web_compat;
    options.loc |= cli.loc;
    options.next |= cli.next;
    options.raw |= cli.raw;
    debug!(?options, "resolved parser options");
    Ok(options)
}

fn read_source(path: Option<&Path>) -> Result<(String, String)> {
    match path {
        Some(path) if path != Path::new("-") => {
            let source = std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            Ok((path.display().to_string(), source))
        }
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .into_diagnostic()
                .wrap_err("failed to read stdin")?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.into_diagnostic()
}
