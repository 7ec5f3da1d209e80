//! Functions, methods and arrow functions.
//!
//! Parameters are declared in their own scope with the body scope nested
//! inside it. Whether duplicate parameters and strict-only names are
//! allowed depends on the body's directive prologue, so those checks run
//! once the prologue has been read.

use std::mem;

use crate::ast::*;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::expression::FunctionFlavor;
use crate::parser::{Label, Parser};
use crate::scope::{BindingKind, ScopeKind};
use crate::token::{is_strict_reserved, TokenKind};

/// A parsed formal parameter list.
struct Parameters {
    params: Vec<Pattern>,
    /// Only plain identifiers, no defaults, patterns or rest.
    simple: bool,
    /// The first name bound twice.
    duplicate: Option<(String, u32)>,
    /// Duplicates are tolerated in sloppy mode (plain functions only).
    sloppy_duplicates: bool,
}

/// Parser state that does not cross a function boundary.
pub(crate) struct FunctionState {
    labels: Vec<Label>,
    yield_pos: Option<u32>,
    await_pos: Option<u32>,
    await_ident_pos: Option<u32>,
}

impl<'a> Parser<'a> {
    // =========================================================================
    // Function Declarations and Expressions
    // =========================================================================

    /// `[async] function [*] name (params) { body }`. The name is optional in
    /// `export default`.
    pub(crate) fn parse_function_declaration(&mut self, ctx: Context, start: u32, is_default_export: bool) -> Result<Function> {
        let is_async = self.eat_async()?;
        self.expect(&TokenKind::Function)?;
        let is_generator = self.eat(&TokenKind::Star)?;

        let id = if is_default_export && self.at(&TokenKind::LParen) {
            None
        } else {
            let id = self.parse_binding_identifier(ctx)?;
            let kind = self.function_binding_kind(!is_async && !is_generator);
            self.declare(&id.name, id.span.start, kind, ctx)?;
            Some(id)
        };

        self.parse_function_rest(
            ctx,
            start,
            FunctionKind::FunctionDeclaration,
            id,
            is_async,
            is_generator,
            FunctionFlavor::Plain,
        )
    }

    /// A function expression. Its name is bound inside the function, so it
    /// follows the function's own `yield`/`await` rules.
    pub(crate) fn parse_function_expression(&mut self, ctx: Context, start: u32) -> Result<Function> {
        let is_async = self.eat_async()?;
        self.expect(&TokenKind::Function)?;
        let is_generator = self.eat(&TokenKind::Star)?;

        let id = if self.at(&TokenKind::LParen) {
            None
        } else {
            Some(self.parse_binding_identifier(ctx.enter_function(is_async, is_generator))?)
        };

        self.parse_function_rest(
            ctx,
            start,
            FunctionKind::FunctionExpression,
            id,
            is_async,
            is_generator,
            FunctionFlavor::Plain,
        )
    }

    /// The function value of an object or class method, starting at `(`.
    pub(crate) fn parse_method_function(
        &mut self,
        ctx: Context,
        start: u32,
        is_async: bool,
        is_generator: bool,
        flavor: FunctionFlavor,
    ) -> Result<Function> {
        self.parse_function_rest(ctx, start, FunctionKind::FunctionExpression, None, is_async, is_generator, flavor)
    }

    fn eat_async(&mut self) -> Result<bool> {
        if self.at_contextual("async") && self.peek()?.kind == TokenKind::Function {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Functions at the top of a script or function body are var-scoped;
    /// elsewhere (blocks, module top level) they are lexical.
    fn function_binding_kind(&self, plain: bool) -> BindingKind {
        match self.scopes.current().kind {
            ScopeKind::Script | ScopeKind::FunctionBody | ScopeKind::StaticBlock => BindingKind::VarFunction,
            _ => BindingKind::Function { plain },
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_function_rest(
        &mut self,
        ctx: Context,
        start: u32,
        kind: FunctionKind,
        id: Option<Identifier>,
        is_async: bool,
        is_generator: bool,
        flavor: FunctionFlavor,
    ) -> Result<Function> {
        let mut inner = ctx.enter_function(is_async, is_generator);
        match flavor {
            FunctionFlavor::Plain => {}
            FunctionFlavor::Method | FunctionFlavor::Getter | FunctionFlavor::Setter => {
                inner |= Context::ALLOW_SUPER_PROPERTY;
            }
            FunctionFlavor::Constructor { derived } => {
                inner |= Context::ALLOW_SUPER_PROPERTY;
                inner = inner.with(Context::ALLOW_SUPER_CALL, derived);
            }
        }

        let saved = self.enter_function_state();
        self.scopes.push(ScopeKind::Parameters);

        let mut parameters = self.parse_formal_parameters(inner | Context::IN_PARAMETERS)?;
        parameters.sloppy_duplicates = flavor == FunctionFlavor::Plain && !is_async && !is_generator;
        self.check_accessor_parameters(flavor, start, &parameters.params)?;
        let body = self.parse_function_body(inner, &parameters, id.as_ref())?;

        self.scopes.pop();
        self.exit_function_state(saved);

        Ok(Function {
            kind,
            id,
            params: parameters.params,
            body,
            generator: is_generator,
            is_async,
            span: self.span_from(start),
        })
    }

    pub(crate) fn enter_function_state(&mut self) -> FunctionState {
        FunctionState {
            labels: mem::take(&mut self.labels),
            yield_pos: self.yield_pos.take(),
            await_pos: self.await_pos.take(),
            await_ident_pos: self.await_ident_pos.take(),
        }
    }

    pub(crate) fn exit_function_state(&mut self, saved: FunctionState) {
        self.labels = saved.labels;
        self.yield_pos = saved.yield_pos;
        self.await_pos = saved.await_pos;
        self.await_ident_pos = saved.await_ident_pos;
    }

    // =========================================================================
    // Parameters and Bodies
    // =========================================================================

    /// `( params )`, declaring every bound name in the current (parameter)
    /// scope.
    fn parse_formal_parameters(&mut self, ctx: Context) -> Result<Parameters> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        let mut simple = true;
        while !self.at(&TokenKind::RParen) {
            if self.at(&TokenKind::Spread) {
                params.push(Pattern::Rest(self.parse_binding_rest(ctx, &TokenKind::RParen)?));
                simple = false;
                break;
            }
            let param = self.parse_binding_element(ctx)?;
            simple &= matches!(param, Pattern::Identifier(_));
            params.push(param);
            if !self.at(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RParen)?;

        let duplicate = self.declare_parameters(&params);
        self.scopes.current_mut().simple_parameters = simple;
        Ok(Parameters { params, simple, duplicate, sloppy_duplicates: false })
    }

    /// Declare parameter names, returning the first duplicate.
    fn declare_parameters(&mut self, params: &[Pattern]) -> Option<(String, u32)> {
        let mut names = Vec::new();
        for param in params {
            param.bound_names(&mut names);
        }
        let mut duplicate = None;
        for id in names {
            if !self.scopes.declare_parameter(&id.name) && duplicate.is_none() {
                duplicate = Some((id.name.clone(), id.span.start));
            }
        }
        duplicate
    }

    fn check_accessor_parameters(&self, flavor: FunctionFlavor, start: u32, params: &[Pattern]) -> Result<()> {
        match flavor {
            FunctionFlavor::Getter if !params.is_empty() => Err(self.error(ErrorKind::GetterParameters, start)),
            FunctionFlavor::Setter => match params {
                [Pattern::Rest(rest)] => Err(self.error(ErrorKind::SetterRestParameter, rest.span.start)),
                [_] => Ok(()),
                _ => Err(self.error(ErrorKind::SetterParameters, start)),
            },
            _ => Ok(()),
        }
    }

    /// `{ body }` of a function or block-bodied arrow.
    fn parse_function_body(&mut self, ctx: Context, parameters: &Parameters, id: Option<&Identifier>) -> Result<BlockStatement> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;
        self.scopes.push(ScopeKind::FunctionBody);

        let mut ctx = ctx;
        let (mut body, use_strict) = self.parse_directives(ctx)?;
        if let Some(offset) = use_strict {
            if !parameters.simple {
                return Err(self.error(ErrorKind::IllegalUseStrict, offset));
            }
            if !ctx.is_strict() {
                ctx |= Context::STRICT;
                self.check_strict_head(id, &parameters.params)?;
            }
        }
        if let Some((name, offset)) = &parameters.duplicate {
            if ctx.is_strict() || !parameters.simple || !parameters.sloppy_duplicates {
                return Err(self.error(ErrorKind::DuplicateParameter(name.clone()), *offset));
            }
        }

        self.parse_statement_list(ctx, &mut body, &TokenKind::RBrace)?;
        self.scopes.pop();
        self.expect(&TokenKind::RBrace)?;
        Ok(BlockStatement { body, span: self.span_from(start) })
    }

    /// A function that turned strict through its own directive: its name and
    /// parameters were checked under sloppy rules and are checked again.
    fn check_strict_head(&self, id: Option<&Identifier>, params: &[Pattern]) -> Result<()> {
        let mut names = Vec::new();
        if let Some(id) = id {
            names.push(id);
        }
        for param in params {
            param.bound_names(&mut names);
        }
        for id in names {
            if matches!(id.name.as_str(), "eval" | "arguments") {
                return Err(self.error(ErrorKind::StrictEvalArguments, id.span.start));
            }
            if is_strict_reserved(&id.name) {
                return Err(self.error(ErrorKind::StrictReservedWord(id.name.clone()), id.span.start));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Arrow Functions
    // =========================================================================

    /// `params => body` once the parameters are known. The current token is
    /// `=>`.
    pub(crate) fn parse_arrow_function(&mut self, ctx: Context, start: u32, params: Vec<Pattern>, is_async: bool) -> Result<Expression> {
        self.expect(&TokenKind::Arrow)?;
        let inner = ctx.enter_arrow(is_async);

        let saved = self.enter_function_state();
        self.scopes.push(ScopeKind::Parameters);

        let simple = params.iter().all(|param| matches!(param, Pattern::Identifier(_)));
        if let Some((name, offset)) = self.declare_parameters(&params) {
            return Err(self.error(ErrorKind::DuplicateParameter(name), offset));
        }
        self.scopes.current_mut().simple_parameters = simple;

        let parameters = Parameters { params, simple, duplicate: None, sloppy_duplicates: false };
        let (body, expression) = if self.at(&TokenKind::LBrace) {
            let block = self.parse_function_body(inner, &parameters, None)?;
            (ArrowBody::Block(Box::new(block)), false)
        } else {
            let body_ctx = inner.with(Context::ALLOW_IN, ctx.contains(Context::ALLOW_IN));
            (ArrowBody::Expression(self.parse_assign_expr(body_ctx)?), true)
        };

        self.scopes.pop();
        self.exit_function_state(saved);

        Ok(Expression::Arrow(Box::new(ArrowFunctionExpression {
            id: None,
            params: parameters.params,
            body,
            expression,
            generator: false,
            is_async,
            span: self.span_from(start),
        })))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::error::ErrorKind;
    use crate::options::ParserOptions;
    use crate::parse;

    fn error(source: &str) -> ErrorKind {
        parse(source, ParserOptions::script()).unwrap_err().kind
    }

    fn ok(source: &str) -> Program {
        match parse(source, ParserOptions::script()) {
            Ok(program) => program,
            Err(err) => panic!("{source}: {err}"),
        }
    }

    #[test]
    fn test_declaration_shape() {
        let program = ok("async function* f(a, b = 1, ...c) {}");
        let Statement::Function(function) = &program.body[0] else { panic!() };
        assert_eq!(function.kind, FunctionKind::FunctionDeclaration);
        assert!(function.is_async && function.generator);
        assert_eq!(function.params.len(), 3);
        assert!(matches!(function.params[2], Pattern::Rest(_)));
    }

    #[test]
    fn test_duplicate_parameters() {
        ok("function f(a, a) {}");
        assert_eq!(error("'use strict'; function f(a, a) {}"), ErrorKind::DuplicateParameter("a".into()));
        assert_eq!(error("function f(a, a) { 'use strict' }"), ErrorKind::DuplicateParameter("a".into()));
        assert_eq!(error("function f(a, [a]) {}"), ErrorKind::DuplicateParameter("a".into()));
        assert_eq!(error("({ m(a, a) {} })"), ErrorKind::DuplicateParameter("a".into()));
        assert_eq!(error("function* g(a, a) {}"), ErrorKind::DuplicateParameter("a".into()));
        assert_eq!(error("async function f(a, a) {}"), ErrorKind::DuplicateParameter("a".into()));
        assert_eq!(error("(async function (a, a) {})"), ErrorKind::DuplicateParameter("a".into()));
    }

    #[test]
    fn test_use_strict_rechecks_head() {
        assert_eq!(error("function eval() { 'use strict' }"), ErrorKind::StrictEvalArguments);
        assert_eq!(error("function f(arguments) { 'use strict' }"), ErrorKind::StrictEvalArguments);
        assert_eq!(error("function f(interface) { 'use strict' }"), ErrorKind::StrictReservedWord("interface".into()));
        assert_eq!(error("function f(a = 1) { 'use strict' }"), ErrorKind::IllegalUseStrict);
        assert_eq!(error("(a = 1) => { 'use strict' }"), ErrorKind::IllegalUseStrict);
    }

    #[test]
    fn test_body_shadows_parameter() {
        ok("function f(a) { var a; }");
        assert_eq!(error("function f(a) { let a; }"), ErrorKind::DuplicateBinding("a".into()));
        ok("function f(a) { { let a; } }");
    }

    #[test]
    fn test_accessor_parameters() {
        ok("({ get a() {}, set a(v) {} })");
        assert_eq!(error("({ get a(x) {} })"), ErrorKind::GetterParameters);
        assert_eq!(error("({ set a() {} })"), ErrorKind::SetterParameters);
        assert_eq!(error("({ set a(...v) {} })"), ErrorKind::SetterRestParameter);
    }

    #[test]
    fn test_function_names() {
        ok("function* yield() {}");
        ok("async function await() {}");
        assert_eq!(error("(function* yield() {})"), ErrorKind::ReservedWord("yield".into()));
        assert_eq!(error("(async function await() {})"), ErrorKind::ReservedWord("await".into()));
    }

    #[test]
    fn test_labels_do_not_cross_functions() {
        assert_eq!(error("a: { function f() { break a; } }"), ErrorKind::UnknownLabel("a".into()));
        assert_eq!(error("while (1) { function f() { continue; } }"), ErrorKind::IllegalContinue);
    }

    #[test]
    fn test_arrow_concise_body_in_for_init() {
        ok("for (var f = () => { return a in b; }; ;) break;");
        let program = ok("x => y => x + y");
        let Statement::Expression(stmt) = &program.body[0] else { panic!() };
        let Expression::Arrow(outer) = &stmt.expression else { panic!() };
        assert!(matches!(outer.body, ArrowBody::Expression(Expression::Arrow(_))));
    }

    #[test]
    fn test_super_in_methods() {
        ok("({ m() { return super.x; } })");
        assert_eq!(error("function f() { super.x }"), ErrorKind::InvalidSuperProperty);
        assert_eq!(error("({ m() { super() } })"), ErrorKind::InvalidSuperCall);
    }
}
