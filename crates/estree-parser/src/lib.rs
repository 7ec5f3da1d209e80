//! estree-parser: ECMAScript parser producing ESTree syntax trees
//!
//! # Design Principles
//!
//! 1. **Single pass, fail fast**
//!    - Tokens are consumed once, nodes are built as their productions
//!      complete, and every early error is reported as soon as it is known
//!    - The first error aborts the parse; there is no partial tree
//!
//! 2. **Lexing on-demand**
//!    - The lexer is called during parsing, not upfront
//!    - The parser decides when `/` starts a regular expression and when
//!      `}` resumes a template
//!
//! 3. **Context passed by value**
//!    - Strictness, async/generator state, loop/switch nesting and class
//!      restrictions travel as a small bit set argument
//!    - Declarations go through an explicit scope stack
//!
//! 4. **Cover grammars**
//!    - Array/object literals and parenthesized lists are parsed as
//!      expressions and reinterpreted as patterns once `=` or `=>` shows up
//!
//! # Example
//!
//! ```
//! use estree_parser::{parse_script, ParserOptions, Statement};
//!
//! let program = parse_script("const x = 1 + 2;", ParserOptions::default()).unwrap();
//! assert!(matches!(program.body[0], Statement::Variable(_)));
//! ```

use tracing::debug;

mod ast;
mod class;
mod context;
mod error;
mod expression;
mod function;
mod lexer;
mod module;
mod options;
mod parser;
mod pattern;
mod scope;
mod span;
mod token;

// Re-exports
pub use ast::*;
pub use error::{ErrorCategory, ErrorKind, ParseError, Result};
pub use lexer::Lexer;
pub use options::{ParserOptions, SourceType};
pub use parser::Parser;
pub use span::{LineIndex, Position, SourceLocation, Span};
pub use token::{Token, TokenClass, TokenEvent, TokenKind};

/// Parse `source` with the goal selected by `options.module`.
pub fn parse(source: &str, options: ParserOptions) -> Result<Program> {
    run(source, options, Parser::new(source, options))
}

/// Parse `source` as a classic script.
pub fn parse_script(source: &str, options: ParserOptions) -> Result<Program> {
    parse(source, options.with_module(false))
}

/// Parse `source` as a module: strict, with import/export and top-level
/// `await`.
pub fn parse_module(source: &str, options: ParserOptions) -> Result<Program> {
    parse(source, options.with_module(true))
}

/// Parse `source`, calling `on_token` for each token as the parser consumes
/// it. Every token is reported exactly once, with its final classification
/// (a `/` that starts a regular expression is reported as the regex).
pub fn parse_with_tokens<F>(source: &str, options: ParserOptions, mut on_token: F) -> Result<Program>
where
    F: FnMut(TokenEvent<'_>),
{
    run(source, options, Parser::new(source, options).with_token_hook(&mut on_token))
}

fn run(source: &str, options: ParserOptions, parser: Parser<'_>) -> Result<Program> {
    debug!(goal = options.source_type().as_str(), bytes = source.len(), "parse started");
    match parser.parse() {
        Ok(program) => {
            debug!(statements = program.body.len(), "parse finished");
            Ok(program)
        }
        Err(err) => {
            debug!(error = %err, offset = err.offset, "parse failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_selection() {
        let program = parse_module("export const a = 1;", ParserOptions::default()).unwrap();
        assert_eq!(program.source_type, SourceType::Module);

        let err = parse_script("export const a = 1;", ParserOptions::module()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExportOutsideModule);
    }

    #[test]
    fn test_token_hook_sees_final_kinds() {
        let mut tokens = Vec::new();
        parse_with_tokens("x = /a/g", ParserOptions::default(), |event| {
            tokens.push((event.class, event.value.to_string()));
        })
        .unwrap();
        assert_eq!(
            tokens,
            vec![
                (TokenClass::Identifier, "x".to_string()),
                (TokenClass::Punctuator, "=".to_string()),
                (TokenClass::RegularExpression, "/a/g".to_string()),
                (TokenClass::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_error_position() {
        let err = parse("var a;\nvar a b;", ParserOptions::default()).unwrap_err();
        assert_eq!(err.offset, 13);
        assert_eq!((err.line, err.column), (2, 6));
        assert_eq!(err.to_string(), "[2:6]: Unexpected token 'b'");
    }
}
