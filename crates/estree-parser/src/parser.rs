//! ECMAScript parser.
//!
//! A recursive descent parser with precedence climbing for binary
//! expressions. Statement and declaration parsing lives here; expressions,
//! functions, classes and module items are further `impl Parser` blocks in
//! their own modules.
//!
//! Every routine takes the [`Context`] it runs in by value. Array and object
//! literals are parsed once as expressions and converted to patterns by
//! [`crate::pattern`] when a following `=`, `=>`, `in` or `of` shows they
//! were targets. Constructs that are only valid in such a pattern
//! (`{a = 1}`, duplicate `__proto__`) are remembered in [`CoverState`] until
//! the question is settled.

use std::mem;

use rustc_hash::FxHashSet;

use crate::ast::*;
use crate::class::PrivateScope;
use crate::context::Context;
use crate::error::{ErrorKind, ParseError, Result};
use crate::lexer::Lexer;
use crate::options::ParserOptions;
use crate::scope::{BindingKind, ScopeKind, ScopeStack};
use crate::span::{LineIndex, SourceLocation, Span};
use crate::token::{is_strict_reserved, keyword_from_str, Token, TokenEvent, TokenKind};

/// Pattern-only constructs seen while parsing a cover expression.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CoverState {
    /// `{a = 1}`: a shorthand property with an initializer.
    pub shorthand_init: Option<u32>,
    /// A second `__proto__: value` property in one object literal.
    pub double_proto: Option<u32>,
    /// `(a) = 1` or `[(a)] = 1`: a parenthesized assignment target, which
    /// rules the expression out as an arrow parameter.
    pub parenthesized_target: Option<u32>,
}

impl CoverState {
    /// Fail if a pattern-only construct at or after `from` ended up in an
    /// expression.
    pub fn check_expression(&self, from: u32) -> Result<()> {
        if let Some(offset) = self.shorthand_init.filter(|&offset| offset >= from) {
            return Err(ParseError::at(ErrorKind::InvalidCoverInitializedName, offset));
        }
        if let Some(offset) = self.double_proto.filter(|&offset| offset >= from) {
            return Err(ParseError::at(ErrorKind::DuplicateProto, offset));
        }
        Ok(())
    }

    /// Forget pattern-only constructs at or after `from`; they ended up in a
    /// pattern.
    /// Fail if the expressions are to become arrow parameters but one of
    /// them assigned to a parenthesized target.
    pub fn check_binding(&self) -> Result<()> {
        match self.parenthesized_target {
            Some(offset) => Err(ParseError::at(ErrorKind::ParenthesizedPattern, offset)),
            None => Ok(()),
        }
    }

    pub fn clear_from(&mut self, from: u32) {
        if self.shorthand_init.is_some_and(|offset| offset >= from) {
            self.shorthand_init = None;
        }
        if self.double_proto.is_some_and(|offset| offset >= from) {
            self.double_proto = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LabelKind {
    Loop,
    Switch,
    Other,
}

/// An active statement label.
#[derive(Debug, Clone)]
pub(crate) struct Label {
    pub name: String,
    pub kind: LabelKind,
    /// Start of the statement the label applies to. Labels in a chain
    /// (`a: b: while (x) ...`) all end up pointing at the loop.
    pub statement_start: u32,
}

/// Where a statement appears, for the function declaration and label rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementContext {
    /// Any position not listed below.
    Plain,
    /// Body of `if` or `else`.
    IfBody,
    /// Body of an iteration statement.
    LoopBody,
    /// Body of a labelled statement that may declare a function.
    Label,
    /// Body of a labelled statement under a loop or `if`.
    NestedLabel,
}

/// The parser.
pub struct Parser<'a> {
    /// The lexer.
    pub(crate) lexer: Lexer<'a>,
    /// Source code (for raw text and token callbacks).
    pub(crate) source: &'a str,
    pub(crate) options: ParserOptions,
    /// Current token.
    pub(crate) current: Token,
    /// End offset of the last consumed token.
    pub(crate) prev_end: u32,
    line_index: Option<LineIndex>,
    on_token: Option<&'a mut dyn FnMut(TokenEvent<'_>)>,
    pub(crate) scopes: ScopeStack,
    pub(crate) labels: Vec<Label>,
    pub(crate) cover: CoverState,
    /// Start of the innermost AssignmentExpression; only there may a
    /// parenthesized list or identifier turn into arrow parameters.
    pub(crate) potential_arrow_at: Option<u32>,
    /// First `yield` / `await` expression since the enclosing parenthesized
    /// list began; either makes that list invalid as arrow parameters.
    pub(crate) yield_pos: Option<u32>,
    pub(crate) await_pos: Option<u32>,
    /// First `await` used as an identifier; invalid in async arrow parameters.
    pub(crate) await_ident_pos: Option<u32>,
    pub(crate) private_scopes: Vec<PrivateScope>,
    /// Names exported so far.
    pub(crate) exported: FxHashSet<String>,
    /// Local names referenced by `export { ... }` without `from`.
    pub(crate) export_locals: Vec<(String, u32)>,
}

impl<'a> Parser<'a> {
    /// Create a new parser.
    pub fn new(source: &'a str, options: ParserOptions) -> Self {
        let lexer = Lexer::new(source).with_html_comments(!options.module && !options.disable_web_compat);
        Self {
            lexer,
            source,
            options,
            current: Token::new(TokenKind::Eof, Span::empty(0)),
            prev_end: 0,
            line_index: options.loc.then(|| LineIndex::new(source)),
            on_token: None,
            scopes: ScopeStack::new(options.module),
            labels: Vec::new(),
            cover: CoverState::default(),
            potential_arrow_at: None,
            yield_pos: None,
            await_pos: None,
            await_ident_pos: None,
            private_scopes: Vec::new(),
            exported: FxHashSet::default(),
            export_locals: Vec::new(),
        }
    }

    /// Report every consumed token to `hook`.
    #[must_use]
    pub fn with_token_hook(mut self, hook: &'a mut dyn FnMut(TokenEvent<'_>)) -> Self {
        self.on_token = Some(hook);
        self
    }

    /// Parse the entire source into a Program.
    pub fn parse(mut self) -> Result<Program> {
        let result = self.parse_program();
        result.map_err(|err| match &self.line_index {
            Some(index) => err.locate(index),
            None => err.locate(&LineIndex::new(self.source)),
        })
    }

    // =========================================================================
    // Token Handling
    // =========================================================================

    /// Advance to the next token and return the previous.
    pub(crate) fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        let prev = mem::replace(&mut self.current, next);
        self.prev_end = prev.span.end;
        self.report(&prev);
        Ok(prev)
    }

    fn report(&mut self, token: &Token) {
        let source = self.source;
        if let Some(hook) = self.on_token.as_mut() {
            let span = token.span;
            hook(TokenEvent {
                class: token.kind.class(),
                value: &source[span.start as usize..span.end as usize],
                start: span.start,
                end: span.end,
            });
        }
    }

    /// The token after the current one, without consuming anything.
    pub(crate) fn peek(&self) -> Result<Token> {
        self.lexer.clone().next_token()
    }

    /// Check if the current token matches the given kind.
    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current.kind) == mem::discriminant(kind)
    }

    /// Whether the current token is the unescaped contextual keyword `name`.
    pub(crate) fn at_contextual(&self, name: &str) -> bool {
        self.current.is_contextual(name)
    }

    /// Consume a token if it matches, returning true if consumed.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> Result<bool> {
        if self.at(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a token if it matches, otherwise return an error.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.at(kind) {
            return self.advance();
        }
        if self.at(&TokenKind::Eof) {
            return Err(self.unexpected());
        }
        Err(ParseError::at(
            ErrorKind::ExpectedToken {
                expected: token_str(kind).to_string(),
                found: self.token_text(&self.current).to_string(),
            },
            self.current.span.start,
        ))
    }

    pub(crate) fn expect_contextual(&mut self, name: &str) -> Result<()> {
        if self.at_contextual(name) {
            self.advance()?;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Source text of a token.
    pub(crate) fn token_text(&self, token: &Token) -> &'a str {
        &self.source[token.span.start as usize..token.span.end as usize]
    }

    /// An error for the current token.
    pub(crate) fn unexpected(&self) -> ParseError {
        self.unexpected_token(&self.current)
    }

    pub(crate) fn unexpected_token(&self, token: &Token) -> ParseError {
        let kind = match token.kind {
            TokenKind::Eof => ErrorKind::UnexpectedEof,
            _ => ErrorKind::UnexpectedToken(self.token_text(token).to_string()),
        };
        ParseError::at(kind, token.span.start)
    }

    pub(crate) fn error(&self, kind: ErrorKind, offset: u32) -> ParseError {
        ParseError::at(kind, offset)
    }

    /// Whether a semicolon may be inserted before the current token.
    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(self.current.kind, TokenKind::RBrace | TokenKind::Eof) || self.current.newline_before
    }

    /// Consume a semicolon (with ASI support).
    pub(crate) fn semicolon(&mut self) -> Result<()> {
        if self.eat(&TokenKind::Semicolon)? || self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // =========================================================================
    // Spans
    // =========================================================================

    pub(crate) fn start(&self) -> u32 {
        self.current.span.start
    }

    /// A span from `start` to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: u32) -> Span {
        self.make_span(start, self.prev_end)
    }

    /// A span with line/column information when locations are enabled.
    pub(crate) fn make_span(&self, start: u32, end: u32) -> Span {
        let mut span = Span::new(start, end);
        if let Some(index) = &self.line_index {
            span.loc = Some(SourceLocation { start: index.position(start), end: index.position(end) });
        }
        span
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Check a name used as an IdentifierReference or LabelIdentifier.
    pub(crate) fn check_identifier_reference(&mut self, name: &str, token: &Token, ctx: Context) -> Result<()> {
        let offset = token.span.start;
        if token.escaped && keyword_from_str(name).is_some() {
            return Err(self.error(ErrorKind::EscapedKeyword, offset));
        }
        match name {
            "yield" if ctx.contains(Context::YIELD) => {
                return Err(self.error(ErrorKind::ReservedWord(name.to_string()), offset));
            }
            "await" => {
                if ctx.intersects(Context::ASYNC | Context::MODULE | Context::IN_STATIC_BLOCK) {
                    return Err(self.error(ErrorKind::ReservedWord(name.to_string()), offset));
                }
                self.await_ident_pos.get_or_insert(offset);
            }
            "arguments" if ctx.contains(Context::IN_CLASS_FIELD) => {
                return Err(self.error(ErrorKind::ArgumentsInClassInit, offset));
            }
            _ => {}
        }
        if ctx.is_strict() && is_strict_reserved(name) {
            return Err(self.error(ErrorKind::StrictReservedWord(name.to_string()), offset));
        }
        Ok(())
    }

    /// Check a name used as a BindingIdentifier.
    pub(crate) fn check_binding_identifier(&mut self, name: &str, token: &Token, ctx: Context) -> Result<()> {
        if ctx.is_strict() && matches!(name, "eval" | "arguments") {
            return Err(self.error(ErrorKind::StrictEvalArguments, token.span.start));
        }
        self.check_identifier_reference(name, token, ctx - Context::IN_CLASS_FIELD)
    }

    /// Consume an IdentifierName: any identifier or reserved word.
    pub(crate) fn parse_identifier_name(&mut self) -> Result<Identifier> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => name.clone(),
            kind => match kind.keyword_str() {
                Some(word) => word.to_string(),
                None => return Err(self.unexpected()),
            },
        };
        let token = self.advance()?;
        Ok(Identifier { name, span: self.make_span(token.span.start, token.span.end) })
    }

    /// Consume an IdentifierReference.
    pub(crate) fn parse_identifier_reference(&mut self, ctx: Context) -> Result<Identifier> {
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.unexpected());
        };
        let name = name.clone();
        let token = self.current.clone();
        self.check_identifier_reference(&name, &token, ctx)?;
        self.advance()?;
        Ok(Identifier { name, span: self.make_span(token.span.start, token.span.end) })
    }

    /// Consume a BindingIdentifier.
    pub(crate) fn parse_binding_identifier(&mut self, ctx: Context) -> Result<Identifier> {
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.unexpected());
        };
        let name = name.clone();
        let token = self.current.clone();
        self.check_binding_identifier(&name, &token, ctx)?;
        self.advance()?;
        Ok(Identifier { name, span: self.make_span(token.span.start, token.span.end) })
    }

    /// Declare every name bound by `pattern` in the current scope.
    pub(crate) fn declare_pattern(&mut self, pattern: &Pattern, kind: BindingKind, ctx: Context) -> Result<()> {
        let mut names = Vec::new();
        pattern.bound_names(&mut names);
        for id in names {
            self.declare(&id.name, id.span.start, kind, ctx)?;
        }
        Ok(())
    }

    pub(crate) fn declare(&mut self, name: &str, offset: u32, kind: BindingKind, ctx: Context) -> Result<()> {
        self.scopes.declare(name, kind, ctx).map_err(|kind| ParseError::at(kind, offset))
    }

    // =========================================================================
    // Program Parsing
    // =========================================================================

    fn parse_program(&mut self) -> Result<Program> {
        self.current = self.lexer.next_token()?;
        let mut ctx = Context::for_program(&self.options);

        let (mut body, use_strict) = self.parse_directives(ctx)?;
        if use_strict.is_some() {
            ctx |= Context::STRICT;
        }
        self.parse_statement_list(ctx, &mut body, &TokenKind::Eof)?;

        if self.options.module {
            self.check_export_locals()?;
        }
        let eof = self.current.clone();
        self.report(&eof);

        Ok(Program {
            body,
            source_type: self.options.source_type(),
            span: self.make_span(0, self.source.len() as u32),
        })
    }

    /// Parse the directive prologue of a script or function body. Returns
    /// the statements parsed so far and the offset of a `"use strict"`
    /// directive, if any.
    pub(crate) fn parse_directives(&mut self, mut ctx: Context) -> Result<(Vec<Statement>, Option<u32>)> {
        let mut body = Vec::new();
        let mut use_strict = None;
        let mut octal: Option<u32> = None;

        while let TokenKind::String(_) = &self.current.kind {
            let token = self.current.clone();
            if token.legacy_octal {
                if ctx.is_strict() {
                    return Err(self.error(ErrorKind::StrictOctalEscape, token.span.start));
                }
                octal.get_or_insert(token.span.start);
            }

            let mut statement = self.parse_statement_list_item(ctx)?;
            let is_directive = match &statement {
                Statement::Expression(expr_stmt) => matches!(
                    &expr_stmt.expression,
                    Expression::Literal(lit) if lit.span.start == token.span.start && lit.span.end == token.span.end
                ),
                _ => false,
            };
            if !is_directive {
                body.push(statement);
                break;
            }

            let raw = &self.source[token.span.start as usize + 1..token.span.end as usize - 1];
            if let Statement::Expression(expr_stmt) = &mut statement {
                expr_stmt.directive = Some(raw.to_string());
            }
            if raw == "use strict" {
                if let Some(offset) = octal {
                    return Err(self.error(ErrorKind::StrictOctalEscape, offset));
                }
                use_strict.get_or_insert(token.span.start);
                ctx |= Context::STRICT;
            }
            body.push(statement);
        }
        Ok((body, use_strict))
    }

    /// Parse statement list items until `end`.
    pub(crate) fn parse_statement_list(&mut self, ctx: Context, body: &mut Vec<Statement>, end: &TokenKind) -> Result<()> {
        while !self.at(end) {
            if self.at(&TokenKind::Eof) {
                return Err(self.unexpected());
            }
            body.push(self.parse_statement_list_item(ctx)?);
        }
        Ok(())
    }

    // =========================================================================
    // Statement Parsing
    // =========================================================================

    /// Parse a StatementListItem: a statement or a declaration.
    pub(crate) fn parse_statement_list_item(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.start();
        match &self.current.kind {
            TokenKind::Function => {
                let function = self.parse_function_declaration(ctx, start, false)?;
                Ok(Statement::Function(Box::new(function)))
            }
            TokenKind::Class => {
                let class = self.parse_class(ctx, start, ClassKind::ClassDeclaration, true)?;
                Ok(Statement::Class(Box::new(class)))
            }
            TokenKind::Const => self.parse_lexical_statement(ctx, start, VariableKind::Const),
            TokenKind::Import if !self.at_import_call()? => self.parse_import_declaration(ctx),
            TokenKind::Export => self.parse_export_declaration(ctx),
            TokenKind::Identifier(_) if self.at_let_declaration(true)? => {
                self.parse_lexical_statement(ctx, start, VariableKind::Let)
            }
            TokenKind::Identifier(_) if self.at_async_function()? => {
                let function = self.parse_function_declaration(ctx, start, false)?;
                Ok(Statement::Function(Box::new(function)))
            }
            _ => self.parse_statement(ctx, StatementContext::Plain),
        }
    }

    /// Whether the current `let` starts a lexical declaration.
    pub(crate) fn at_let_declaration(&self, list_item: bool) -> Result<bool> {
        if !self.at_contextual("let") {
            return Ok(false);
        }
        let next = self.peek()?;
        Ok(match next.kind {
            TokenKind::LBracket => true,
            _ if !list_item => false,
            TokenKind::LBrace | TokenKind::Identifier(_) => true,
            _ => false,
        })
    }

    /// `async function` with no line break in between.
    pub(crate) fn at_async_function(&self) -> Result<bool> {
        if !self.at_contextual("async") {
            return Ok(false);
        }
        let next = self.peek()?;
        Ok(next.kind == TokenKind::Function && !next.newline_before)
    }

    /// `import(` or `import.` start an expression, not a declaration.
    fn at_import_call(&self) -> Result<bool> {
        let next = self.peek()?;
        Ok(matches!(next.kind, TokenKind::LParen | TokenKind::Dot))
    }

    /// Parse a statement.
    pub(crate) fn parse_statement(&mut self, ctx: Context, sctx: StatementContext) -> Result<Statement> {
        let ctx = ctx - Context::TOP_LEVEL;
        let start = self.start();
        match &self.current.kind {
            TokenKind::LBrace => Ok(Statement::Block(Box::new(self.parse_block(ctx)?))),
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(Statement::Empty(Box::new(EmptyStatement { span: self.span_from(start) })))
            }
            TokenKind::Var => {
                let decl = self.parse_variable_declaration(ctx | Context::ALLOW_IN, VariableKind::Var, false)?;
                self.semicolon()?;
                Ok(Statement::Variable(Box::new(VariableDeclaration { span: self.span_from(start), ..decl })))
            }
            TokenKind::If => self.parse_if_statement(ctx, start),
            TokenKind::For => self.parse_for_statement(ctx, start),
            TokenKind::While => self.parse_while_statement(ctx, start),
            TokenKind::Do => self.parse_do_while_statement(ctx, start),
            TokenKind::Continue => self.parse_continue_statement(ctx, start),
            TokenKind::Break => self.parse_break_statement(ctx, start),
            TokenKind::Return => self.parse_return_statement(ctx, start),
            TokenKind::With => self.parse_with_statement(ctx, start),
            TokenKind::Switch => self.parse_switch_statement(ctx, start),
            TokenKind::Throw => self.parse_throw_statement(ctx, start),
            TokenKind::Try => self.parse_try_statement(ctx, start),
            TokenKind::Debugger => {
                self.advance()?;
                self.semicolon()?;
                Ok(Statement::Debugger(Box::new(DebuggerStatement { span: self.span_from(start) })))
            }
            TokenKind::Function => self.parse_function_statement(ctx, sctx, start),
            TokenKind::Class => Err(self.unexpected()),
            TokenKind::Const => Err(self.error(ErrorKind::LexicalInSingleStatement, start)),
            TokenKind::Import if !self.at_import_call()? => {
                let kind = if ctx.is_module() { ErrorKind::ImportExportNotTopLevel } else { ErrorKind::ImportOutsideModule };
                Err(self.error(kind, start))
            }
            TokenKind::Export => {
                let kind = if ctx.is_module() { ErrorKind::ImportExportNotTopLevel } else { ErrorKind::ExportOutsideModule };
                Err(self.error(kind, start))
            }
            TokenKind::Identifier(_) if self.at_let_declaration(false)? => {
                Err(self.error(ErrorKind::LexicalInSingleStatement, start))
            }
            TokenKind::Identifier(_) if self.at_async_function()? => {
                let kind = if ctx.is_strict() { ErrorKind::StrictFunction } else { ErrorKind::SloppyFunction };
                Err(self.error(kind, start))
            }
            _ => self.parse_expression_or_labeled_statement(ctx, sctx, start),
        }
    }

    fn parse_expression_or_labeled_statement(&mut self, ctx: Context, sctx: StatementContext, start: u32) -> Result<Statement> {
        let first = self.current.clone();
        let expression = self.parse_expression(ctx | Context::ALLOW_IN)?;

        if let (TokenKind::Identifier(_), Expression::Identifier(id)) = (&first.kind, &expression) {
            if id.span.end == first.span.end && self.at(&TokenKind::Colon) {
                self.advance()?;
                let label = (**id).clone();
                return self.parse_labeled_statement(ctx, sctx, start, label);
            }
        }

        self.semicolon()?;
        Ok(Statement::Expression(Box::new(ExpressionStatement {
            expression,
            directive: None,
            span: self.span_from(start),
        })))
    }

    fn parse_labeled_statement(&mut self, ctx: Context, sctx: StatementContext, start: u32, label: Identifier) -> Result<Statement> {
        if self.labels.iter().any(|l| l.name == label.name) {
            return Err(self.error(ErrorKind::DuplicateLabel(label.name), label.span.start));
        }
        let kind = match self.current.kind {
            TokenKind::For | TokenKind::While | TokenKind::Do => LabelKind::Loop,
            TokenKind::Switch => LabelKind::Switch,
            _ => LabelKind::Other,
        };
        let body_start = self.start();
        for existing in self.labels.iter_mut().rev() {
            if existing.statement_start != start {
                break;
            }
            existing.statement_start = body_start;
            existing.kind = kind;
        }
        self.labels.push(Label { name: label.name.clone(), kind, statement_start: body_start });

        let body_sctx = match sctx {
            StatementContext::Plain | StatementContext::Label => StatementContext::Label,
            _ => StatementContext::NestedLabel,
        };
        let body = self.parse_statement(ctx, body_sctx);
        self.labels.pop();

        Ok(Statement::Labeled(Box::new(LabeledStatement { label, body: body?, span: self.span_from(start) })))
    }

    /// A function declaration where only a statement is expected. Only
    /// sloppy web-compatible code allows one, as the body of an `if` or of a
    /// labelled statement.
    fn parse_function_statement(&mut self, ctx: Context, sctx: StatementContext, start: u32) -> Result<Statement> {
        if ctx.is_strict() {
            return Err(self.error(ErrorKind::StrictFunction, start));
        }
        match sctx {
            StatementContext::NestedLabel => return Err(self.error(ErrorKind::IllegalLabeledFunction, start)),
            StatementContext::Label if !ctx.web_compat() => {
                return Err(self.error(ErrorKind::IllegalLabeledFunction, start));
            }
            StatementContext::IfBody | StatementContext::Label if ctx.web_compat() => {}
            _ => return Err(self.error(ErrorKind::SloppyFunction, start)),
        }
        if self.peek()?.kind == TokenKind::Star {
            return Err(self.error(ErrorKind::SloppyFunction, start));
        }

        if sctx == StatementContext::IfBody {
            // Behaves as if wrapped in a block.
            self.scopes.push(ScopeKind::Block);
            let function = self.parse_function_declaration(ctx, start, false);
            self.scopes.pop();
            return Ok(Statement::Function(Box::new(function?)));
        }
        let function = self.parse_function_declaration(ctx, start, false)?;
        Ok(Statement::Function(Box::new(function)))
    }

    /// Parse a block statement in a fresh block scope.
    pub(crate) fn parse_block(&mut self, ctx: Context) -> Result<BlockStatement> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;
        self.scopes.push(ScopeKind::Block);
        let mut body = Vec::new();
        let result = self.parse_statement_list(ctx, &mut body, &TokenKind::RBrace);
        self.scopes.pop();
        result?;
        self.expect(&TokenKind::RBrace)?;
        Ok(BlockStatement { body, span: self.span_from(start) })
    }

    fn parse_if_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        let test = self.parse_paren_expression(ctx)?;
        let consequent = self.parse_statement(ctx, StatementContext::IfBody)?;
        let alternate = if self.eat(&TokenKind::Else)? {
            Some(self.parse_statement(ctx, StatementContext::IfBody)?)
        } else {
            None
        };
        Ok(Statement::If(Box::new(IfStatement { test, consequent, alternate, span: self.span_from(start) })))
    }

    /// `( Expression )` as in `if`, `while`, `with` and `switch` heads.
    fn parse_paren_expression(&mut self, ctx: Context) -> Result<Expression> {
        self.expect(&TokenKind::LParen)?;
        let expr = self.parse_expression(ctx | Context::ALLOW_IN)?;
        self.expect(&TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_loop_body(&mut self, ctx: Context) -> Result<Statement> {
        self.parse_statement(ctx | Context::IN_ITERATION, StatementContext::LoopBody)
    }

    fn parse_while_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        let test = self.parse_paren_expression(ctx)?;
        let body = self.parse_loop_body(ctx)?;
        Ok(Statement::While(Box::new(WhileStatement { test, body, span: self.span_from(start) })))
    }

    fn parse_do_while_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        let body = self.parse_loop_body(ctx)?;
        self.expect(&TokenKind::While)?;
        let test = self.parse_paren_expression(ctx)?;
        // A semicolon is always insertable after `do ... while (x)`.
        self.eat(&TokenKind::Semicolon)?;
        Ok(Statement::DoWhile(Box::new(DoWhileStatement { body, test, span: self.span_from(start) })))
    }

    /// The optional label of `break` or `continue`.
    fn parse_jump_label(&mut self, ctx: Context) -> Result<Option<Identifier>> {
        if matches!(self.current.kind, TokenKind::Identifier(_)) && !self.current.newline_before {
            Ok(Some(self.parse_identifier_reference(ctx)?))
        } else {
            Ok(None)
        }
    }

    fn parse_break_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        let label = self.parse_jump_label(ctx)?;
        match &label {
            Some(label) => {
                if !self.labels.iter().any(|l| l.name == label.name) {
                    return Err(self.error(ErrorKind::UnknownLabel(label.name.clone()), label.span.start));
                }
            }
            None => {
                if !ctx.intersects(Context::IN_ITERATION | Context::IN_SWITCH) {
                    return Err(self.error(ErrorKind::IllegalBreak, start));
                }
            }
        }
        self.semicolon()?;
        Ok(Statement::Break(Box::new(BreakStatement { label, span: self.span_from(start) })))
    }

    fn parse_continue_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        let label = self.parse_jump_label(ctx)?;
        match &label {
            Some(label) => match self.labels.iter().find(|l| l.name == label.name) {
                None => return Err(self.error(ErrorKind::UnknownLabel(label.name.clone()), label.span.start)),
                Some(target) if target.kind != LabelKind::Loop => {
                    return Err(self.error(ErrorKind::IllegalContinueLabel(label.name.clone()), label.span.start));
                }
                Some(_) => {}
            },
            None => {
                if !ctx.contains(Context::IN_ITERATION) {
                    return Err(self.error(ErrorKind::IllegalContinue, start));
                }
            }
        }
        self.semicolon()?;
        Ok(Statement::Continue(Box::new(ContinueStatement { label, span: self.span_from(start) })))
    }

    fn parse_return_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        if !ctx.contains(Context::IN_FUNCTION_BODY) {
            return Err(self.error(ErrorKind::IllegalReturn, start));
        }
        self.advance()?;
        let argument = if self.eat(&TokenKind::Semicolon)? || self.can_insert_semicolon() {
            None
        } else {
            let argument = self.parse_expression(ctx | Context::ALLOW_IN)?;
            self.semicolon()?;
            Some(argument)
        };
        Ok(Statement::Return(Box::new(ReturnStatement { argument, span: self.span_from(start) })))
    }

    fn parse_with_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        if ctx.is_strict() {
            return Err(self.error(ErrorKind::StrictWith, start));
        }
        self.advance()?;
        let object = self.parse_paren_expression(ctx)?;
        let body = self.parse_statement(ctx, StatementContext::Plain)?;
        Ok(Statement::With(Box::new(WithStatement { object, body, span: self.span_from(start) })))
    }

    fn parse_switch_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        let discriminant = self.parse_paren_expression(ctx)?;
        self.expect(&TokenKind::LBrace)?;
        self.scopes.push(ScopeKind::Block);
        let cases = self.parse_switch_cases(ctx | Context::IN_SWITCH);
        self.scopes.pop();
        let cases = cases?;
        self.expect(&TokenKind::RBrace)?;
        Ok(Statement::Switch(Box::new(SwitchStatement { discriminant, cases, span: self.span_from(start) })))
    }

    fn parse_switch_cases(&mut self, ctx: Context) -> Result<Vec<SwitchCase>> {
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.at(&TokenKind::RBrace) {
            let start = self.start();
            let test = match self.current.kind {
                TokenKind::Case => {
                    self.advance()?;
                    Some(self.parse_expression(ctx | Context::ALLOW_IN)?)
                }
                TokenKind::Default => {
                    if seen_default {
                        return Err(self.error(ErrorKind::MultipleDefaults, start));
                    }
                    seen_default = true;
                    self.advance()?;
                    None
                }
                _ => return Err(self.unexpected()),
            };
            self.expect(&TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(self.current.kind, TokenKind::Case | TokenKind::Default | TokenKind::RBrace) {
                if self.at(&TokenKind::Eof) {
                    return Err(self.unexpected());
                }
                consequent.push(self.parse_statement_list_item(ctx)?);
            }
            cases.push(SwitchCase { test, consequent, span: self.span_from(start) });
        }
        Ok(cases)
    }

    fn parse_throw_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        if self.current.newline_before {
            return Err(self.error(ErrorKind::NewlineAfterThrow, self.prev_end));
        }
        let argument = self.parse_expression(ctx | Context::ALLOW_IN)?;
        self.semicolon()?;
        Ok(Statement::Throw(Box::new(ThrowStatement { argument, span: self.span_from(start) })))
    }

    fn parse_try_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        let block = self.parse_block(ctx)?;

        let handler = if self.at(&TokenKind::Catch) {
            Some(self.parse_catch_clause(ctx)?)
        } else {
            None
        };
        let finalizer = if self.eat(&TokenKind::Finally)? {
            Some(self.parse_block(ctx)?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error(ErrorKind::MissingCatchOrFinally, self.start()));
        }
        Ok(Statement::Try(Box::new(TryStatement { block, handler, finalizer, span: self.span_from(start) })))
    }

    fn parse_catch_clause(&mut self, ctx: Context) -> Result<CatchClause> {
        let start = self.start();
        self.advance()?;
        if !self.eat(&TokenKind::LParen)? {
            let body = self.parse_block(ctx)?;
            return Ok(CatchClause { param: None, body, span: self.span_from(start) });
        }

        self.scopes.push(ScopeKind::Catch);
        let result = self.parse_catch_parameter_and_body(ctx);
        self.scopes.pop();
        let (param, body) = result?;
        Ok(CatchClause { param: Some(param), body, span: self.span_from(start) })
    }

    fn parse_catch_parameter_and_body(&mut self, ctx: Context) -> Result<(Pattern, BlockStatement)> {
        let param = self.parse_binding_pattern(ctx)?;
        let kind = match param {
            Pattern::Identifier(_) => BindingKind::CatchParameter,
            _ => BindingKind::CatchPattern,
        };
        self.declare_pattern(&param, kind, ctx)?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block(ctx)?;
        Ok((param, body))
    }

    // =========================================================================
    // For Statements
    // =========================================================================

    fn parse_for_statement(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        let is_await = if self.at_contextual("await") {
            if !ctx.contains(Context::ASYNC) {
                return Err(self.error(ErrorKind::ForAwaitOutsideAsync, self.start()));
            }
            self.advance()?;
            true
        } else {
            false
        };
        self.expect(&TokenKind::LParen)?;

        let lexical = match self.current.kind {
            TokenKind::Const => Some(VariableKind::Const),
            TokenKind::Identifier(_) if self.at_contextual("let") => {
                let next = self.peek()?;
                matches!(next.kind, TokenKind::Identifier(_) | TokenKind::LBracket | TokenKind::LBrace)
                    .then_some(VariableKind::Let)
            }
            _ => None,
        };
        if lexical.is_some() {
            self.scopes.push(ScopeKind::ForHead);
        }
        let result = self.parse_for_rest(ctx, start, is_await, lexical);
        if lexical.is_some() {
            self.scopes.pop();
        }
        result
    }

    /// Everything after `for (`.
    fn parse_for_rest(&mut self, ctx: Context, start: u32, is_await: bool, lexical: Option<VariableKind>) -> Result<Statement> {
        let head_ctx = ctx - Context::ALLOW_IN;

        if self.at(&TokenKind::Semicolon) {
            if is_await {
                return Err(self.error(ErrorKind::ForAwaitNotOf, start));
            }
            return self.parse_for_loop(ctx, start, None);
        }

        let declaration_kind = match self.current.kind {
            TokenKind::Var => Some(VariableKind::Var),
            _ => lexical,
        };
        if let Some(kind) = declaration_kind {
            let decl = self.parse_variable_declaration(head_ctx, kind, true)?;
            return self.parse_for_after_declaration(ctx, start, is_await, decl);
        }

        // Expression or assignment target.
        let init_start = self.start();
        let starts_with_let = self.at_contextual("let");
        if !is_await && self.at_contextual("async") {
            let mut lookahead = self.lexer.clone();
            let next = lookahead.next_token()?;
            if next.is_contextual("of") && lookahead.next_token()?.kind != TokenKind::Arrow {
                return Err(self.error(ErrorKind::ForOfContextualKeyword("async"), init_start));
            }
        }
        let saved = mem::take(&mut self.cover);
        let init = self.parse_assign_expr_cover(head_ctx);
        let cover = mem::replace(&mut self.cover, saved);
        let init = init?;

        let is_of = self.at_contextual("of");
        if is_of || self.at(&TokenKind::In) {
            let word = if is_of { "of" } else { "in" };
            if is_of {
                if starts_with_let {
                    return Err(self.error(ErrorKind::ForOfContextualKeyword("let"), init_start));
                }
            } else if is_await {
                return Err(self.error(ErrorKind::ForAwaitNotOf, start));
            }
            let left = crate::pattern::to_assignment_target(init, ctx).map_err(|err| match err.kind {
                ErrorKind::InvalidAssignmentTarget => self.error(ErrorKind::InvalidForInOfTarget(word), err.offset),
                _ => err,
            })?;
            return self.parse_for_in_of(ctx, start, is_await, is_of, ForTarget::Pattern(left));
        }

        cover.check_expression(init_start)?;
        if is_await {
            return Err(self.error(ErrorKind::ForAwaitNotOf, start));
        }
        let init = self.parse_sequence_rest(head_ctx, init_start, init)?;
        self.parse_for_loop(ctx, start, Some(ForInit::Expression(init)))
    }

    fn parse_for_after_declaration(&mut self, ctx: Context, start: u32, is_await: bool, decl: VariableDeclaration) -> Result<Statement> {
        let is_of = self.at_contextual("of");
        if is_of || self.at(&TokenKind::In) {
            let word = if is_of { "of" } else { "in" };
            if !is_of && is_await {
                return Err(self.error(ErrorKind::ForAwaitNotOf, start));
            }
            if decl.declarations.len() != 1 {
                return Err(self.error(ErrorKind::ForInOfMultipleBindings(word), decl.span.start));
            }
            let declarator = &decl.declarations[0];
            if let Some(init) = &declarator.init {
                let legacy = !is_of
                    && decl.kind == VariableKind::Var
                    && ctx.web_compat()
                    && matches!(declarator.id, Pattern::Identifier(_));
                if !legacy {
                    return Err(self.error(ErrorKind::ForInOfInitializer(word), init.span().start));
                }
            }
            let binding = match (decl.kind, is_of) {
                (VariableKind::Var, true) => BindingKind::ForOfVar,
                (VariableKind::Var, false) => BindingKind::Var,
                (VariableKind::Let, _) => BindingKind::Let,
                (VariableKind::Const, _) => BindingKind::Const,
            };
            self.declare_pattern(&declarator.id, binding, ctx)?;
            return self.parse_for_in_of(ctx, start, is_await, is_of, ForTarget::Variable(Box::new(decl)));
        }

        if is_await {
            return Err(self.error(ErrorKind::ForAwaitNotOf, start));
        }
        let binding = match decl.kind {
            VariableKind::Var => BindingKind::Var,
            VariableKind::Let => BindingKind::Let,
            VariableKind::Const => BindingKind::Const,
        };
        for declarator in &decl.declarations {
            self.check_declarator_initializer(decl.kind, declarator)?;
            self.declare_pattern(&declarator.id, binding, ctx)?;
        }
        self.parse_for_loop(ctx, start, Some(ForInit::Variable(Box::new(decl))))
    }

    /// `; test ; update ) body` of a C-style `for`.
    fn parse_for_loop(&mut self, ctx: Context, start: u32, init: Option<ForInit>) -> Result<Statement> {
        self.expect(&TokenKind::Semicolon)?;
        let test = if self.at(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression(ctx | Context::ALLOW_IN)?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.at(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression(ctx | Context::ALLOW_IN)?)
        };
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_loop_body(ctx)?;
        Ok(Statement::For(Box::new(ForStatement { init, test, update, body, span: self.span_from(start) })))
    }

    /// `in right ) body` or `of right ) body`.
    fn parse_for_in_of(&mut self, ctx: Context, start: u32, is_await: bool, is_of: bool, left: ForTarget) -> Result<Statement> {
        self.advance()?;
        let right = if is_of {
            self.parse_assign_expr(ctx | Context::ALLOW_IN)?
        } else {
            self.parse_expression(ctx | Context::ALLOW_IN)?
        };
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_loop_body(ctx)?;
        let span = self.span_from(start);
        Ok(if is_of {
            Statement::ForOf(Box::new(ForOfStatement { is_await, left, right, body, span }))
        } else {
            Statement::ForIn(Box::new(ForInStatement { left, right, body, span }))
        })
    }

    // =========================================================================
    // Variable Declarations
    // =========================================================================

    pub(crate) fn parse_lexical_statement(&mut self, ctx: Context, start: u32, kind: VariableKind) -> Result<Statement> {
        let decl = self.parse_variable_declaration(ctx | Context::ALLOW_IN, kind, false)?;
        self.semicolon()?;
        Ok(Statement::Variable(Box::new(VariableDeclaration { span: self.span_from(start), ..decl })))
    }

    /// Parse `var`/`let`/`const` and its declarators. In a `for` head the
    /// names are declared by the caller once it knows the loop form.
    pub(crate) fn parse_variable_declaration(&mut self, ctx: Context, kind: VariableKind, in_for: bool) -> Result<VariableDeclaration> {
        let start = self.start();
        self.advance()?;
        let binding = match kind {
            VariableKind::Var => BindingKind::Var,
            VariableKind::Let => BindingKind::Let,
            VariableKind::Const => BindingKind::Const,
        };

        let mut declarations = Vec::new();
        loop {
            let decl_start = self.start();
            let id = self.parse_binding_pattern(ctx)?;
            if kind != VariableKind::Var {
                let mut names = Vec::new();
                id.bound_names(&mut names);
                if let Some(id) = names.iter().find(|id| id.name == "let") {
                    return Err(self.error(ErrorKind::LetInLexicalBinding, id.span.start));
                }
            }
            let init = if self.eat(&TokenKind::Eq)? {
                Some(self.parse_assign_expr(ctx)?)
            } else {
                None
            };
            let declarator = VariableDeclarator { id, init, span: self.span_from(decl_start) };
            if !in_for {
                self.check_declarator_initializer(kind, &declarator)?;
                self.declare_pattern(&declarator.id, binding, ctx)?;
            }
            declarations.push(declarator);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(VariableDeclaration { declarations, kind, span: self.span_from(start) })
    }

    fn check_declarator_initializer(&self, kind: VariableKind, declarator: &VariableDeclarator) -> Result<()> {
        if declarator.init.is_some() {
            return Ok(());
        }
        if kind == VariableKind::Const {
            return Err(self.error(ErrorKind::MissingConstInitializer, declarator.span.end));
        }
        if !matches!(declarator.id, Pattern::Identifier(_)) {
            return Err(self.error(ErrorKind::MissingDestructuringInitializer, declarator.span.end));
        }
        Ok(())
    }

    // =========================================================================
    // Binding Patterns
    // =========================================================================

    /// BindingIdentifier, ArrayBindingPattern or ObjectBindingPattern.
    pub(crate) fn parse_binding_pattern(&mut self, ctx: Context) -> Result<Pattern> {
        match self.current.kind {
            TokenKind::LBracket => self.parse_array_binding(ctx),
            TokenKind::LBrace => self.parse_object_binding(ctx),
            _ => Ok(Pattern::Identifier(Box::new(self.parse_binding_identifier(ctx)?))),
        }
    }

    /// A binding pattern with an optional default.
    pub(crate) fn parse_binding_element(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.start();
        let pattern = self.parse_binding_pattern(ctx)?;
        self.parse_binding_default(ctx, start, pattern)
    }

    fn parse_binding_default(&mut self, ctx: Context, start: u32, left: Pattern) -> Result<Pattern> {
        if !self.eat(&TokenKind::Eq)? {
            return Ok(left);
        }
        let right = self.parse_assign_expr(ctx | Context::ALLOW_IN)?;
        Ok(Pattern::Assignment(Box::new(AssignmentPattern { left, right, span: self.span_from(start) })))
    }

    /// `...pattern` followed by the closing bracket `end`.
    pub(crate) fn parse_binding_rest(&mut self, ctx: Context, end: &TokenKind) -> Result<Box<RestElement>> {
        let start = self.start();
        self.expect(&TokenKind::Spread)?;
        let argument = self.parse_binding_pattern(ctx)?;
        if self.at(&TokenKind::Eq) {
            return Err(self.error(ErrorKind::RestWithDefault, self.start()));
        }
        if self.at(&TokenKind::Comma) {
            let kind = if self.peek()?.kind == *end { ErrorKind::RestTrailingComma } else { ErrorKind::RestNotLast };
            return Err(self.error(kind, self.start()));
        }
        Ok(Box::new(RestElement { argument, span: self.span_from(start) }))
    }

    fn parse_array_binding(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.start();
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.at(&TokenKind::RBracket) {
            if self.eat(&TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            if self.at(&TokenKind::Spread) {
                elements.push(Some(Pattern::Rest(self.parse_binding_rest(ctx, &TokenKind::RBracket)?)));
                break;
            }
            elements.push(Some(self.parse_binding_element(ctx)?));
            if !self.at(&TokenKind::RBracket) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Pattern::Array(Box::new(ArrayPattern { elements, span: self.span_from(start) })))
    }

    fn parse_object_binding(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;
        let mut properties = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            if self.at(&TokenKind::Spread) {
                if !matches!(self.peek()?.kind, TokenKind::Identifier(_)) {
                    return Err(self.error(ErrorKind::InvalidObjectRest, self.peek()?.span.start));
                }
                properties.push(ObjectPatternProperty::Rest(self.parse_binding_rest(ctx, &TokenKind::RBrace)?));
                break;
            }

            let prop_start = self.start();
            let key_token = self.current.clone();
            let (key, computed) = self.parse_property_key(ctx)?;
            let (value, shorthand) = if self.eat(&TokenKind::Colon)? {
                (self.parse_binding_element(ctx)?, false)
            } else {
                let TokenKind::Identifier(name) = &key_token.kind else {
                    return Err(self.unexpected());
                };
                if computed {
                    return Err(self.unexpected());
                }
                self.check_binding_identifier(name, &key_token, ctx)?;
                let id = Identifier { name: name.clone(), span: key.span() };
                let value = self.parse_binding_default(ctx, prop_start, Pattern::Identifier(Box::new(id)))?;
                (value, true)
            };
            properties.push(ObjectPatternProperty::Property(Box::new(AssignmentProperty {
                key,
                value,
                kind: PropertyKind::Init,
                method: false,
                shorthand,
                computed,
                span: self.span_from(prop_start),
            })));
            if !self.at(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Pattern::Object(Box::new(ObjectPattern { properties, span: self.span_from(start) })))
    }
}

/// Spelling of a token kind for "expected" diagnostics.
pub(crate) fn token_str(kind: &TokenKind) -> &'static str {
    if let Some(word) = kind.keyword_str() {
        return word;
    }
    match kind {
        TokenKind::LParen => "(",
        TokenKind::RParen => ")",
        TokenKind::LBrace => "{",
        TokenKind::RBrace => "}",
        TokenKind::LBracket => "[",
        TokenKind::RBracket => "]",
        TokenKind::Semicolon => ";",
        TokenKind::Comma => ",",
        TokenKind::Colon => ":",
        TokenKind::Dot => ".",
        TokenKind::Arrow => "=>",
        TokenKind::Eq => "=",
        TokenKind::Star => "*",
        TokenKind::Spread => "...",
        TokenKind::Identifier(_) => "identifier",
        TokenKind::String(_) => "string",
        TokenKind::Template { .. } => "template",
        TokenKind::Eof => "end of input",
        _ => "token",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program> {
        Parser::new(source, ParserOptions::script()).parse()
    }

    fn parse_err(source: &str) -> ErrorKind {
        match parse(source) {
            Ok(_) => panic!("expected an error for {source:?}"),
            Err(err) => err.kind,
        }
    }

    #[test]
    fn test_variable_declaration() {
        let program = parse("var a = 1, b;").unwrap();
        let Statement::Variable(decl) = &program.body[0] else { panic!("not a declaration") };
        assert_eq!(decl.declarations.len(), 2);
        assert_eq!(decl.span, Span::new(0, 13));
    }

    #[test]
    fn test_asi() {
        assert_eq!(parse("a\nb").unwrap().body.len(), 2);
        assert_eq!(parse("{ a } b").unwrap().body.len(), 2);
        assert!(matches!(parse_err("a b"), ErrorKind::UnexpectedToken(_)));
        // `return` followed by a newline returns nothing.
        let program = parse("function f() { return\n1 }").unwrap();
        let Statement::Function(f) = &program.body[0] else { panic!() };
        assert_eq!(f.body.body.len(), 2);
    }

    #[test]
    fn test_directives() {
        let program = parse("'use strict'; 'other'; a").unwrap();
        let Statement::Expression(first) = &program.body[0] else { panic!() };
        assert_eq!(first.directive.as_deref(), Some("use strict"));
        let Statement::Expression(third) = &program.body[2] else { panic!() };
        assert_eq!(third.directive, None);
        assert_eq!(parse_err("'use strict'; with (a) {}"), ErrorKind::StrictWith);
        assert_eq!(parse_err("'\\07'; 'use strict'"), ErrorKind::StrictOctalEscape);
        // Parenthesized strings are not directives.
        parse("('use strict'); with (a) {}").unwrap();
    }

    #[test]
    fn test_labels() {
        parse("a: b: while (x) { continue a; }").unwrap();
        parse("a: { break a; }").unwrap();
        assert_eq!(parse_err("a: { continue a; }"), ErrorKind::IllegalContinueLabel("a".into()));
        assert_eq!(parse_err("a: a: ;"), ErrorKind::DuplicateLabel("a".into()));
        assert_eq!(parse_err("break b;"), ErrorKind::UnknownLabel("b".into()));
        assert_eq!(parse_err("break;"), ErrorKind::IllegalBreak);
        assert_eq!(parse_err("while (x) { function f() { continue; } }"), ErrorKind::IllegalContinue);
    }

    #[test]
    fn test_function_in_statement_position() {
        parse("if (a) function f() {}").unwrap();
        parse("l: function f() {}").unwrap();
        assert_eq!(parse_err("while (a) function f() {}"), ErrorKind::SloppyFunction);
        assert_eq!(parse_err("while (a) l: function f() {}"), ErrorKind::IllegalLabeledFunction);
        assert_eq!(parse_err("'use strict'; if (a) function f() {}"), ErrorKind::StrictFunction);
        assert_eq!(parse_err("if (a) function* g() {}"), ErrorKind::SloppyFunction);
    }

    #[test]
    fn test_for_heads() {
        parse("for (var i = 0; i < 1; i++) {}").unwrap();
        parse("for (let [a, b] of c) {}").unwrap();
        parse("for (var a = 1 in b) {}").unwrap();
        parse("for (let in x) {}").unwrap();
        parse("for (async of => {};;) break;").unwrap();
        parse("async function f() { for await (async of x) ; }").unwrap();
        assert_eq!(parse_err("for (let a = 1 of b) {}"), ErrorKind::ForInOfInitializer("of"));
        assert_eq!(parse_err("for (var a, b in c) {}"), ErrorKind::ForInOfMultipleBindings("in"));
        assert_eq!(parse_err("for (async of x) {}"), ErrorKind::ForOfContextualKeyword("async"));
        assert_eq!(parse_err("for (let.x of y) {}"), ErrorKind::ForOfContextualKeyword("let"));
        assert_eq!(parse_err("for (a + b in c) {}"), ErrorKind::InvalidForInOfTarget("in"));
        assert_eq!(parse_err("for (const a;;) {}"), ErrorKind::MissingConstInitializer);
        assert_eq!(parse_err("for (let i;;) { var i }"), ErrorKind::DuplicateBinding("i".into()));
    }

    #[test]
    fn test_catch_bindings() {
        parse("try {} catch (e) { var e }").unwrap();
        parse("try {} catch {}").unwrap();
        assert_eq!(parse_err("try {} catch (e) { let e }"), ErrorKind::DuplicateBinding("e".into()));
        assert_eq!(parse_err("try {} catch ([e]) { var e }"), ErrorKind::DuplicateBinding("e".into()));
        assert_eq!(parse_err("try {} catch (e) { for (var e of []) {} }"), ErrorKind::DuplicateBinding("e".into()));
        assert_eq!(parse_err("try {}"), ErrorKind::MissingCatchOrFinally);
    }

    #[test]
    fn test_lexical_declarations() {
        assert_eq!(parse_err("let let = 1"), ErrorKind::LetInLexicalBinding);
        assert_eq!(parse_err("if (a) let [b] = c"), ErrorKind::LexicalInSingleStatement);
        assert_eq!(parse_err("let [a];"), ErrorKind::MissingDestructuringInitializer);
        // `let` is an identifier in sloppy code.
        parse("let = 1; if (a) let\nb = 2").unwrap();
    }

    #[test]
    fn test_switch() {
        parse("switch (a) { case 1: let b; break; default: }").unwrap();
        assert_eq!(parse_err("switch (a) { default: default: }"), ErrorKind::MultipleDefaults);
        assert_eq!(parse_err("switch (a) { case 1: let b; case 2: let b; }"), ErrorKind::DuplicateBinding("b".into()));
    }

    #[test]
    fn test_throw_newline() {
        assert_eq!(parse_err("throw\nerr"), ErrorKind::NewlineAfterThrow);
    }
}
