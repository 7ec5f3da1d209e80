//! Expression parsing.

use std::mem;

use crate::ast::*;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::parser::Parser;
use crate::pattern;
use crate::token::{Token, TokenKind};

impl<'a> Parser<'a> {
    // =========================================================================
    // Expression Parsing
    // =========================================================================

    /// Expression: one or more comma-separated assignment expressions.
    pub(crate) fn parse_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        let first = self.parse_assign_expr(ctx)?;
        self.parse_sequence_rest(ctx, start, first)
    }

    /// Continue a sequence expression whose first element is `first`.
    pub(crate) fn parse_sequence_rest(&mut self, ctx: Context, start: u32, first: Expression) -> Result<Expression> {
        if !self.at(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(&TokenKind::Comma)? {
            expressions.push(self.parse_assign_expr(ctx)?);
        }
        Ok(Expression::Sequence(Box::new(SequenceExpression { expressions, span: self.span_from(start) })))
    }

    /// AssignmentExpression where the result is used as a value, so
    /// pattern-only syntax inside it is an error.
    pub(crate) fn parse_assign_expr(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        let saved = mem::take(&mut self.cover);
        let expr = self.parse_assign_expr_cover(ctx);
        let cover = mem::replace(&mut self.cover, saved);
        let expr = expr?;
        cover.check_expression(start)?;
        Ok(expr)
    }

    /// AssignmentExpression that may still turn out to be a pattern. Array
    /// and object literals leave their pattern-only constructs pending in
    /// `self.cover` for the caller to settle.
    pub(crate) fn parse_assign_expr_cover(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        if ctx.contains(Context::YIELD) && self.at_contextual("yield") {
            return self.parse_yield_expr(ctx);
        }

        self.potential_arrow_at = Some(start);
        let left = self.parse_conditional_expr(ctx)?;
        if matches!(left, Expression::Arrow(_)) {
            return Ok(left);
        }

        let Some(operator) = assignment_operator(&self.current.kind) else {
            if !matches!(left, Expression::Array(_) | Expression::Object(_)) {
                self.cover.check_expression(start)?;
            }
            return Ok(left);
        };

        let left = if operator == AssignmentOperator::Assign {
            if let Some(offset) = pattern::parenthesized_target(&left) {
                self.cover.parenthesized_target.get_or_insert(offset);
            }
            if matches!(left, Expression::Array(_) | Expression::Object(_)) {
                self.cover.clear_from(start);
            } else {
                self.cover.check_expression(start)?;
            }
            pattern::to_assignment_target(left, ctx)?
        } else {
            self.cover.check_expression(start)?;
            pattern::to_simple_target(left, ctx, ErrorKind::InvalidAssignmentTarget)?
        };
        self.advance()?;
        let right = self.parse_assign_expr(ctx)?;
        Ok(Expression::Assignment(Box::new(AssignmentExpression {
            operator,
            left,
            right,
            span: self.span_from(start),
        })))
    }

    fn parse_yield_expr(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        if ctx.contains(Context::IN_PARAMETERS) {
            return Err(self.error(ErrorKind::YieldInParameter, start));
        }
        self.yield_pos.get_or_insert(start);
        self.advance()?;

        let (argument, delegate) = if self.current.newline_before
            || !(self.at(&TokenKind::Star) || starts_expression(&self.current.kind))
        {
            (None, false)
        } else {
            let delegate = self.eat(&TokenKind::Star)?;
            (Some(self.parse_assign_expr(ctx)?), delegate)
        };
        Ok(Expression::Yield(Box::new(YieldExpression { argument, delegate, span: self.span_from(start) })))
    }

    fn parse_conditional_expr(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        let test = self.parse_binary_expr(ctx, 0)?;
        if matches!(test, Expression::Arrow(_)) || !self.eat(&TokenKind::Question)? {
            return Ok(test);
        }
        let consequent = self.parse_assign_expr(ctx | Context::ALLOW_IN)?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assign_expr(ctx)?;
        Ok(Expression::Conditional(Box::new(ConditionalExpression {
            test,
            consequent,
            alternate,
            span: self.span_from(start),
        })))
    }

    /// Precedence climbing over binary and logical operators.
    fn parse_binary_expr(&mut self, ctx: Context, min_prec: u8) -> Result<Expression> {
        let start = self.start();
        let mut left = if let TokenKind::PrivateName(_) = &self.current.kind {
            self.parse_private_in(ctx, min_prec)?
        } else {
            self.parse_unary_expr(ctx)?
        };
        if matches!(left, Expression::Arrow(_)) {
            return Ok(left);
        }

        loop {
            let kind = &self.current.kind;
            if *kind == TokenKind::In && !ctx.contains(Context::ALLOW_IN) {
                break;
            }
            let prec = match kind.binary_precedence() {
                Some(prec) if prec >= min_prec => prec,
                _ => break,
            };
            if *kind == TokenKind::StarStar && matches!(left, Expression::Unary(_) | Expression::Await(_)) {
                return Err(self.error(ErrorKind::UnaryBeforeExponent, self.start()));
            }
            let is_right_assoc = kind.is_right_associative();
            let op_token = self.advance()?;

            let next_prec = if is_right_assoc { prec } else { prec + 1 };
            let right = self.parse_binary_expr(ctx, next_prec)?;
            let span = self.span_from(start);

            left = match logical_operator(&op_token.kind) {
                Some(operator) => {
                    check_coalesce_mix(operator, &left, &right).map_err(|offset| self.error(ErrorKind::MixedCoalesce, offset))?;
                    Expression::Logical(Box::new(LogicalExpression { operator, left, right, span }))
                }
                None => {
                    let Some(operator) = binary_operator(&op_token.kind) else {
                        return Err(self.unexpected_token(&op_token));
                    };
                    Expression::Binary(Box::new(BinaryExpression { operator, left, right, span }))
                }
            };
        }

        Ok(left)
    }

    /// `#x in obj`: a private name may only start a binary operand when `in`
    /// follows.
    fn parse_private_in(&mut self, ctx: Context, min_prec: u8) -> Result<Expression> {
        let TokenKind::PrivateName(name) = &self.current.kind else {
            return Err(self.unexpected());
        };
        let name = name.clone();
        let token = self.advance()?;
        let in_prec = TokenKind::In.binary_precedence().unwrap_or(0);
        if !self.at(&TokenKind::In) || !ctx.contains(Context::ALLOW_IN) || in_prec < min_prec {
            return Err(self.unexpected_token(&token));
        }
        self.use_private_name(&name, token.span.start)?;
        Ok(Expression::PrivateIdentifier(Box::new(PrivateIdentifier {
            name,
            span: self.make_span(token.span.start, token.span.end),
        })))
    }

    pub(crate) fn parse_unary_expr(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        if ctx.contains(Context::ASYNC) && self.at_contextual("await") {
            return self.parse_await_expr(ctx);
        }

        if let Some(operator) = unary_operator(&self.current.kind) {
            self.advance()?;
            let argument = self.parse_unary_expr(ctx)?;
            if operator == UnaryOperator::Delete {
                if ctx.is_strict() && matches!(argument.without_parentheses(), Expression::Identifier(_)) {
                    return Err(self.error(ErrorKind::StrictDelete, start));
                }
                if is_private_member(&argument) {
                    return Err(self.error(ErrorKind::DeletePrivateField, start));
                }
            }
            return Ok(Expression::Unary(Box::new(UnaryExpression {
                operator,
                prefix: true,
                argument,
                span: self.span_from(start),
            })));
        }

        if let Some(operator) = update_operator(&self.current.kind) {
            self.advance()?;
            let argument = self.parse_unary_expr(ctx)?;
            pattern::check_simple_target(&argument, ctx, ErrorKind::InvalidUpdateTarget("prefix"))?;
            return Ok(Expression::Update(Box::new(UpdateExpression {
                operator,
                prefix: true,
                argument,
                span: self.span_from(start),
            })));
        }

        let expr = self.parse_lhs_expr(ctx)?;
        if matches!(expr, Expression::Arrow(_)) || self.current.newline_before {
            return Ok(expr);
        }
        match update_operator(&self.current.kind) {
            Some(operator) => {
                pattern::check_simple_target(&expr, ctx, ErrorKind::InvalidUpdateTarget("postfix"))?;
                self.advance()?;
                Ok(Expression::Update(Box::new(UpdateExpression {
                    operator,
                    prefix: false,
                    argument: expr,
                    span: self.span_from(start),
                })))
            }
            None => Ok(expr),
        }
    }

    fn parse_await_expr(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        if ctx.contains(Context::IN_PARAMETERS) {
            return Err(self.error(ErrorKind::AwaitInParameter, start));
        }
        self.await_pos.get_or_insert(start);
        self.advance()?;
        let argument = self.parse_unary_expr(ctx)?;
        Ok(Expression::Await(Box::new(AwaitExpression { argument, span: self.span_from(start) })))
    }

    // =========================================================================
    // Left-Hand-Side Expressions
    // =========================================================================

    /// LeftHandSideExpression: `new`, calls and member accesses.
    pub(crate) fn parse_lhs_expr(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        let can_be_arrow = self.potential_arrow_at == Some(start);

        let expr = if self.at(&TokenKind::New) {
            self.parse_new_expr(ctx)?
        } else {
            let first = self.current.clone();
            let expr = self.parse_primary_expr(ctx)?;
            if matches!(expr, Expression::Arrow(_)) {
                return Ok(expr);
            }
            let async_call = can_be_arrow
                && first.is_contextual("async")
                && expr.is_identifier("async")
                && self.at(&TokenKind::LParen)
                && !self.current.newline_before;
            if async_call {
                let Expression::Identifier(callee) = expr else {
                    return Err(self.unexpected());
                };
                let expr = self.parse_async_call_or_arrow(ctx, start, *callee)?;
                if matches!(expr, Expression::Arrow(_)) {
                    return Ok(expr);
                }
                expr
            } else {
                expr
            }
        };
        self.parse_subscripts(ctx, start, expr, false)
    }

    /// Member accesses, calls, tagged templates and optional chains after
    /// `base`. With `no_calls` (a `new` callee) argument lists and `?.` end
    /// the chain.
    fn parse_subscripts(&mut self, ctx: Context, start: u32, base: Expression, no_calls: bool) -> Result<Expression> {
        let mut expr = base;
        let mut in_chain = false;
        loop {
            match self.current.kind {
                TokenKind::Dot => {
                    self.advance()?;
                    let property = self.parse_member_property()?;
                    expr = self.member(start, expr, property, false, false);
                }
                TokenKind::QuestionDot => {
                    if no_calls {
                        return Err(self.error(ErrorKind::OptionalChainInNew, self.start()));
                    }
                    self.advance()?;
                    in_chain = true;
                    expr = match self.current.kind {
                        TokenKind::LParen => {
                            let arguments = self.parse_arguments(ctx)?;
                            self.call(start, expr, arguments, true)
                        }
                        TokenKind::LBracket => {
                            self.advance()?;
                            let property = self.parse_expression(ctx | Context::ALLOW_IN)?;
                            self.expect(&TokenKind::RBracket)?;
                            self.member(start, expr, property, true, true)
                        }
                        TokenKind::Template { .. } => {
                            return Err(self.error(ErrorKind::TaggedTemplateInOptionalChain, self.start()));
                        }
                        _ => {
                            let property = self.parse_member_property()?;
                            self.member(start, expr, property, false, true)
                        }
                    };
                }
                TokenKind::LBracket => {
                    self.advance()?;
                    let property = self.parse_expression(ctx | Context::ALLOW_IN)?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = self.member(start, expr, property, true, false);
                }
                TokenKind::LParen if !no_calls => {
                    let arguments = self.parse_arguments(ctx)?;
                    expr = self.call(start, expr, arguments, false);
                }
                TokenKind::Template { .. } => {
                    if in_chain {
                        return Err(self.error(ErrorKind::TaggedTemplateInOptionalChain, self.start()));
                    }
                    let quasi = self.parse_template(ctx, true)?;
                    expr = Expression::TaggedTemplate(Box::new(TaggedTemplateExpression {
                        tag: expr,
                        quasi,
                        span: self.span_from(start),
                    }));
                }
                _ => break,
            }
        }
        if in_chain {
            expr = Expression::Chain(Box::new(ChainExpression { expression: expr, span: self.span_from(start) }));
        }
        Ok(expr)
    }

    fn member(&self, start: u32, object: Expression, property: Expression, computed: bool, optional: bool) -> Expression {
        Expression::Member(Box::new(MemberExpression {
            object,
            property,
            computed,
            optional,
            span: self.span_from(start),
        }))
    }

    fn call(&self, start: u32, callee: Expression, arguments: Vec<ExpressionOrSpread>, optional: bool) -> Expression {
        Expression::Call(Box::new(CallExpression { callee, arguments, optional, span: self.span_from(start) }))
    }

    /// The name after `.` or `?.`: any IdentifierName or a private name.
    fn parse_member_property(&mut self) -> Result<Expression> {
        if let TokenKind::PrivateName(name) = &self.current.kind {
            let name = name.clone();
            let token = self.advance()?;
            self.use_private_name(&name, token.span.start)?;
            return Ok(Expression::PrivateIdentifier(Box::new(PrivateIdentifier {
                name,
                span: self.make_span(token.span.start, token.span.end),
            })));
        }
        Ok(Expression::Identifier(Box::new(self.parse_identifier_name()?)))
    }

    /// `( arguments )` of a call or `new`.
    fn parse_arguments(&mut self, ctx: Context) -> Result<Vec<ExpressionOrSpread>> {
        self.expect(&TokenKind::LParen)?;
        let mut arguments = Vec::new();
        while !self.at(&TokenKind::RParen) {
            if self.at(&TokenKind::Spread) {
                arguments.push(self.parse_spread_element(ctx, false)?);
            } else {
                arguments.push(ExpressionOrSpread::Expression(self.parse_assign_expr(ctx | Context::ALLOW_IN)?));
            }
            if !self.at(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(arguments)
    }

    /// `...expr` in an array literal or argument list. With `cover` the
    /// argument may still become a rest pattern.
    fn parse_spread_element(&mut self, ctx: Context, cover: bool) -> Result<ExpressionOrSpread> {
        let start = self.start();
        self.expect(&TokenKind::Spread)?;
        let argument = if cover {
            self.parse_assign_expr_cover(ctx | Context::ALLOW_IN)?
        } else {
            self.parse_assign_expr(ctx | Context::ALLOW_IN)?
        };
        Ok(ExpressionOrSpread::Spread(Box::new(SpreadElement { argument, span: self.span_from(start) })))
    }

    fn parse_new_expr(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        let new_token = self.advance()?;

        if self.eat(&TokenKind::Dot)? {
            let property_token = self.current.clone();
            let property = self.parse_identifier_name()?;
            if property.name != "target" || property_token.escaped {
                return Err(self.error(
                    ErrorKind::InvalidMetaProperty { meta: "new".to_string(), property: property.name },
                    property_token.span.start,
                ));
            }
            if !ctx.contains(Context::ALLOW_NEW_TARGET) {
                return Err(self.error(ErrorKind::NewTargetOutsideFunction, start));
            }
            let meta = Identifier {
                name: "new".to_string(),
                span: self.make_span(new_token.span.start, new_token.span.end),
            };
            return Ok(Expression::MetaProperty(Box::new(MetaProperty { meta, property, span: self.span_from(start) })));
        }
        if self.at(&TokenKind::Import) {
            return Err(self.error(ErrorKind::NewImport, self.start()));
        }

        let callee_start = self.start();
        let callee = if self.at(&TokenKind::New) {
            self.parse_new_expr(ctx)?
        } else {
            self.parse_primary_expr(ctx)?
        };
        let callee = self.parse_subscripts(ctx, callee_start, callee, true)?;
        if matches!(callee, Expression::Super(_)) {
            return Err(self.error(ErrorKind::InvalidSuperCall, callee_start));
        }
        let arguments = if self.at(&TokenKind::LParen) {
            self.parse_arguments(ctx)?
        } else {
            Vec::new()
        };
        Ok(Expression::New(Box::new(NewExpression { callee, arguments, span: self.span_from(start) })))
    }

    // =========================================================================
    // Primary Expressions
    // =========================================================================

    fn parse_primary_expr(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        let can_be_arrow = self.potential_arrow_at == Some(start);

        match &self.current.kind {
            TokenKind::Identifier(_) => {
                if self.at_async_function()? {
                    let function = self.parse_function_expression(ctx, start)?;
                    return Ok(Expression::Function(Box::new(function)));
                }
                if can_be_arrow && self.at_contextual("async") {
                    let next = self.peek()?;
                    if matches!(next.kind, TokenKind::Identifier(_)) && !next.newline_before {
                        return self.parse_async_identifier_arrow(ctx, start);
                    }
                }

                let token = self.current.clone();
                let id = self.parse_identifier_reference(ctx)?;
                if can_be_arrow && self.at(&TokenKind::Arrow) {
                    if self.current.newline_before {
                        return Err(self.error(ErrorKind::LineBreakBeforeArrow, self.start()));
                    }
                    self.check_binding_identifier(&id.name, &token, ctx)?;
                    return self.parse_arrow_function(ctx, start, vec![Pattern::Identifier(Box::new(id))], false);
                }
                Ok(Expression::Identifier(Box::new(id)))
            }
            TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::BigInt(_)
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False => Ok(Expression::Literal(Box::new(self.parse_literal(ctx)?))),
            TokenKind::Slash | TokenKind::SlashEq => {
                self.current = self.lexer.rescan_regex(&self.current)?;
                Ok(Expression::Literal(Box::new(self.parse_literal(ctx)?)))
            }
            TokenKind::This => {
                self.advance()?;
                Ok(Expression::This(Box::new(ThisExpression { span: self.span_from(start) })))
            }
            TokenKind::Super => self.parse_super(ctx),
            TokenKind::Import => self.parse_import_meta_or_call(ctx),
            TokenKind::LParen => self.parse_paren_or_arrow(ctx, can_be_arrow),
            TokenKind::LBracket => self.parse_array_literal(ctx),
            TokenKind::LBrace => self.parse_object_literal(ctx),
            TokenKind::Function => {
                let function = self.parse_function_expression(ctx, start)?;
                Ok(Expression::Function(Box::new(function)))
            }
            TokenKind::Class => {
                let class = self.parse_class(ctx, start, ClassKind::ClassExpression, false)?;
                Ok(Expression::Class(Box::new(class)))
            }
            TokenKind::Template { .. } => Ok(Expression::Template(Box::new(self.parse_template(ctx, false)?))),
            _ => Err(self.unexpected()),
        }
    }

    /// A literal token. Legacy octal numbers and escapes are rejected in
    /// strict code.
    pub(crate) fn parse_literal(&mut self, ctx: Context) -> Result<Literal> {
        if self.current.legacy_octal && ctx.is_strict() {
            let kind = match self.current.kind {
                TokenKind::Number(_) => ErrorKind::StrictOctalLiteral,
                _ => ErrorKind::StrictOctalEscape,
            };
            return Err(self.error(kind, self.start()));
        }
        let value = match &self.current.kind {
            TokenKind::Number(n) => LiteralValue::Number(*n),
            TokenKind::String(s) => LiteralValue::String(s.clone()),
            TokenKind::BigInt(digits) => LiteralValue::BigInt(digits.clone()),
            TokenKind::Regex { pattern, flags } => LiteralValue::RegExp { pattern: pattern.clone(), flags: flags.clone() },
            TokenKind::Null => LiteralValue::Null,
            TokenKind::True => LiteralValue::Boolean(true),
            TokenKind::False => LiteralValue::Boolean(false),
            _ => return Err(self.unexpected()),
        };
        let token = self.advance()?;
        Ok(self.literal_from(value, &token))
    }

    pub(crate) fn literal_from(&self, value: LiteralValue, token: &Token) -> Literal {
        Literal {
            value,
            raw: self.options.raw.then(|| self.token_text(token).to_string()),
            span: self.make_span(token.span.start, token.span.end),
        }
    }

    fn parse_super(&mut self, ctx: Context) -> Result<Expression> {
        let token = self.advance()?;
        match self.current.kind {
            TokenKind::LParen => {
                if !ctx.contains(Context::ALLOW_SUPER_CALL) {
                    return Err(self.error(ErrorKind::InvalidSuperCall, token.span.start));
                }
            }
            TokenKind::Dot | TokenKind::LBracket => {
                if !ctx.contains(Context::ALLOW_SUPER_PROPERTY) {
                    return Err(self.error(ErrorKind::InvalidSuperProperty, token.span.start));
                }
            }
            _ => return Err(self.unexpected_token(&token)),
        }
        Ok(Expression::Super(Box::new(Super { span: self.make_span(token.span.start, token.span.end) })))
    }

    /// `import.meta` or `import(source)`.
    fn parse_import_meta_or_call(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        let token = self.advance()?;

        if self.eat(&TokenKind::Dot)? {
            let property_token = self.current.clone();
            let property = self.parse_identifier_name()?;
            if property.name != "meta" || property_token.escaped {
                return Err(self.error(
                    ErrorKind::InvalidMetaProperty { meta: "import".to_string(), property: property.name },
                    property_token.span.start,
                ));
            }
            if !ctx.is_module() {
                return Err(self.error(ErrorKind::ImportMetaOutsideModule, start));
            }
            let meta = Identifier { name: "import".to_string(), span: self.make_span(token.span.start, token.span.end) };
            return Ok(Expression::MetaProperty(Box::new(MetaProperty { meta, property, span: self.span_from(start) })));
        }

        if !self.eat(&TokenKind::LParen)? {
            return Err(self.unexpected_token(&token));
        }
        let source = self.parse_assign_expr(ctx | Context::ALLOW_IN)?;
        let mut options = None;
        if self.at(&TokenKind::Comma) {
            if !self.options.next {
                return Err(self.error(ErrorKind::ImportCallArity, self.start()));
            }
            self.advance()?;
            if !self.at(&TokenKind::RParen) {
                options = Some(self.parse_assign_expr(ctx | Context::ALLOW_IN)?);
                self.eat(&TokenKind::Comma)?;
            }
        }
        if !self.at(&TokenKind::RParen) {
            return Err(self.error(ErrorKind::ImportCallArity, self.start()));
        }
        self.advance()?;
        Ok(Expression::Import(Box::new(ImportExpression { source, options, span: self.span_from(start) })))
    }

    // =========================================================================
    // Parentheses and Arrows
    // =========================================================================

    /// A parenthesized expression, or the parameter list of an arrow
    /// function when `=>` follows.
    fn parse_paren_or_arrow(&mut self, ctx: Context, can_be_arrow: bool) -> Result<Expression> {
        let start = self.start();
        self.expect(&TokenKind::LParen)?;

        let saved_cover = mem::take(&mut self.cover);
        let saved_yield = self.yield_pos.take();
        let saved_await = self.await_pos.take();

        let inner_start = self.start();
        let mut items = Vec::new();
        let mut rest = None;
        let mut trailing_comma = false;
        while !self.at(&TokenKind::RParen) {
            if self.at(&TokenKind::Spread) {
                rest = Some(self.parse_binding_rest(ctx, &TokenKind::RParen)?);
                break;
            }
            items.push(self.parse_assign_expr_cover(ctx | Context::ALLOW_IN)?);
            if self.at(&TokenKind::RParen) {
                break;
            }
            self.expect(&TokenKind::Comma)?;
            trailing_comma = self.at(&TokenKind::RParen);
        }
        let inner_end = self.prev_end;
        let close = self.expect(&TokenKind::RParen)?;

        if can_be_arrow && self.at(&TokenKind::Arrow) {
            if self.current.newline_before {
                return Err(self.error(ErrorKind::LineBreakBeforeArrow, self.start()));
            }
            if let Some(offset) = self.yield_pos {
                return Err(self.error(ErrorKind::YieldInParameter, offset));
            }
            if let Some(offset) = self.await_pos {
                return Err(self.error(ErrorKind::AwaitInParameter, offset));
            }
            self.cover.check_binding()?;
            let mut params = Vec::with_capacity(items.len() + 1);
            for item in items {
                params.push(pattern::to_binding_target(item, ctx)?);
            }
            if let Some(rest) = rest {
                params.push(Pattern::Rest(rest));
            }
            self.cover = saved_cover;
            self.yield_pos = saved_yield;
            self.await_pos = saved_await;
            return self.parse_arrow_function(ctx, start, params, false);
        }

        if items.is_empty() || rest.is_some() || trailing_comma {
            return Err(self.unexpected_token(&close));
        }
        self.cover.check_expression(inner_start)?;
        self.cover = saved_cover;
        self.yield_pos = saved_yield.or(self.yield_pos);
        self.await_pos = saved_await.or(self.await_pos);

        let expression = if items.len() == 1 {
            items.remove(0)
        } else {
            Expression::Sequence(Box::new(SequenceExpression {
                expressions: items,
                span: self.make_span(inner_start, inner_end),
            }))
        };
        Ok(Expression::Parenthesized(Box::new(ParenthesizedExpression { expression, span: self.span_from(start) })))
    }

    /// `async(...)`: a call, or the parameters of an async arrow function.
    fn parse_async_call_or_arrow(&mut self, ctx: Context, start: u32, callee: Identifier) -> Result<Expression> {
        let saved_cover = mem::take(&mut self.cover);
        let saved_yield = self.yield_pos.take();
        let saved_await = self.await_pos.take();
        let saved_await_ident = self.await_ident_pos.take();

        self.expect(&TokenKind::LParen)?;
        let mut arguments = Vec::new();
        let mut spread_comma = None;
        while !self.at(&TokenKind::RParen) {
            let argument = if self.at(&TokenKind::Spread) {
                self.parse_spread_element(ctx, true)?
            } else {
                ExpressionOrSpread::Expression(self.parse_assign_expr_cover(ctx | Context::ALLOW_IN)?)
            };
            let is_spread = matches!(argument, ExpressionOrSpread::Spread(_));
            arguments.push(argument);
            if self.at(&TokenKind::RParen) {
                break;
            }
            let comma = self.expect(&TokenKind::Comma)?;
            if is_spread && spread_comma.is_none() {
                spread_comma = Some(comma.span.start);
            }
        }
        self.expect(&TokenKind::RParen)?;

        if self.at(&TokenKind::Arrow) {
            if self.current.newline_before {
                return Err(self.error(ErrorKind::LineBreakBeforeArrow, self.start()));
            }
            if let Some(offset) = self.yield_pos {
                return Err(self.error(ErrorKind::YieldInParameter, offset));
            }
            if let Some(offset) = self.await_pos {
                return Err(self.error(ErrorKind::AwaitInParameter, offset));
            }
            if let Some(offset) = self.await_ident_pos {
                return Err(self.error(ErrorKind::ReservedWord("await".to_string()), offset));
            }
            self.cover.check_binding()?;
            let last = arguments.len().saturating_sub(1);
            let mut params = Vec::with_capacity(arguments.len());
            for (index, argument) in arguments.into_iter().enumerate() {
                params.push(match argument {
                    ExpressionOrSpread::Expression(expr) => pattern::to_binding_target(expr, ctx)?,
                    ExpressionOrSpread::Spread(spread) => {
                        if index != last {
                            return Err(self.error(ErrorKind::RestNotLast, spread.span.start));
                        }
                        if let Some(comma) = spread_comma {
                            return Err(self.error(ErrorKind::RestTrailingComma, comma));
                        }
                        Pattern::Rest(pattern::spread_to_binding_rest(*spread, ctx)?)
                    }
                });
            }
            self.cover = saved_cover;
            self.yield_pos = saved_yield;
            self.await_pos = saved_await;
            self.await_ident_pos = saved_await_ident;
            return self.parse_arrow_function(ctx, start, params, true);
        }

        self.cover.check_expression(start)?;
        self.cover = saved_cover;
        self.yield_pos = saved_yield.or(self.yield_pos);
        self.await_pos = saved_await.or(self.await_pos);
        self.await_ident_pos = saved_await_ident.or(self.await_ident_pos);
        Ok(self.call(start, Expression::Identifier(Box::new(callee)), arguments, false))
    }

    /// `async x => body`
    fn parse_async_identifier_arrow(&mut self, ctx: Context, start: u32) -> Result<Expression> {
        self.advance()?;
        let param = self.parse_binding_identifier(ctx | Context::ASYNC)?;
        if !self.at(&TokenKind::Arrow) {
            return Err(self.unexpected());
        }
        if self.current.newline_before {
            return Err(self.error(ErrorKind::LineBreakBeforeArrow, self.start()));
        }
        self.parse_arrow_function(ctx, start, vec![Pattern::Identifier(Box::new(param))], true)
    }

    // =========================================================================
    // Array and Object Literals
    // =========================================================================

    fn parse_array_literal(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        let mut trailing_comma = None;
        while !self.at(&TokenKind::RBracket) {
            if self.eat(&TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            let element = if self.at(&TokenKind::Spread) {
                self.parse_spread_element(ctx, true)?
            } else {
                ExpressionOrSpread::Expression(self.parse_assign_expr_cover(ctx | Context::ALLOW_IN)?)
            };
            let is_spread = matches!(element, ExpressionOrSpread::Spread(_));
            elements.push(Some(element));
            if self.at(&TokenKind::RBracket) {
                break;
            }
            let comma = self.expect(&TokenKind::Comma)?;
            if is_spread && self.at(&TokenKind::RBracket) {
                trailing_comma = Some(comma.span.start);
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Expression::Array(Box::new(ArrayExpression { elements, trailing_comma, span: self.span_from(start) })))
    }

    fn parse_object_literal(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;
        let mut properties = Vec::new();
        let mut trailing_comma = None;
        let mut has_proto = false;
        while !self.at(&TokenKind::RBrace) {
            let is_spread = self.at(&TokenKind::Spread);
            if is_spread {
                match self.parse_spread_element(ctx, true)? {
                    ExpressionOrSpread::Spread(spread) => properties.push(ObjectMember::Spread(spread)),
                    ExpressionOrSpread::Expression(_) => return Err(self.unexpected()),
                }
            } else {
                let property = self.parse_object_property(ctx, &mut has_proto)?;
                properties.push(ObjectMember::Property(Box::new(property)));
            }
            if self.at(&TokenKind::RBrace) {
                break;
            }
            let comma = self.expect(&TokenKind::Comma)?;
            if is_spread && self.at(&TokenKind::RBrace) {
                trailing_comma = Some(comma.span.start);
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Expression::Object(Box::new(ObjectExpression { properties, trailing_comma, span: self.span_from(start) })))
    }

    fn parse_object_property(&mut self, ctx: Context, has_proto: &mut bool) -> Result<Property> {
        let start = self.start();
        let mut is_async = false;
        let mut is_generator = false;
        let mut kind = PropertyKind::Init;

        if self.at_contextual("async") {
            let next = self.peek()?;
            if !next.newline_before && (next.kind == TokenKind::Star || starts_property_name(&next.kind)) {
                self.advance()?;
                is_async = true;
            }
        }
        if self.eat(&TokenKind::Star)? {
            is_generator = true;
        }
        if !is_async && !is_generator && (self.at_contextual("get") || self.at_contextual("set")) {
            let next = self.peek()?;
            if starts_property_name(&next.kind) {
                kind = if self.at_contextual("get") { PropertyKind::Get } else { PropertyKind::Set };
                self.advance()?;
            }
        }

        let key_token = self.current.clone();
        let (key, computed) = self.parse_property_key(ctx)?;

        if is_async || is_generator || kind != PropertyKind::Init || self.at(&TokenKind::LParen) {
            let flavor = match kind {
                PropertyKind::Get => FunctionFlavor::Getter,
                PropertyKind::Set => FunctionFlavor::Setter,
                PropertyKind::Init => FunctionFlavor::Method,
            };
            let value_start = self.start();
            let function = self.parse_method_function(ctx, value_start, is_async, is_generator, flavor)?;
            return Ok(Property {
                key,
                value: Expression::Function(Box::new(function)),
                kind,
                method: kind == PropertyKind::Init,
                shorthand: false,
                computed,
                span: self.span_from(start),
            });
        }

        if self.eat(&TokenKind::Colon)? {
            if !computed && is_proto_key(&key) {
                if *has_proto {
                    self.cover.double_proto.get_or_insert(key_token.span.start);
                }
                *has_proto = true;
            }
            let value = self.parse_assign_expr_cover(ctx | Context::ALLOW_IN)?;
            return Ok(Property {
                key,
                value,
                kind,
                method: false,
                shorthand: false,
                computed,
                span: self.span_from(start),
            });
        }

        // Shorthand `{a}` or, in a pattern, `{a = 1}`.
        let TokenKind::Identifier(name) = &key_token.kind else {
            return Err(self.unexpected());
        };
        if computed {
            return Err(self.unexpected());
        }
        self.check_identifier_reference(name, &key_token, ctx)?;
        let id = Identifier { name: name.clone(), span: key.span() };
        let value = if self.at(&TokenKind::Eq) {
            self.cover.shorthand_init.get_or_insert(self.start());
            self.advance()?;
            let right = self.parse_assign_expr(ctx | Context::ALLOW_IN)?;
            Expression::Assignment(Box::new(AssignmentExpression {
                operator: AssignmentOperator::Assign,
                left: Pattern::Identifier(Box::new(id)),
                right,
                span: self.span_from(start),
            }))
        } else {
            Expression::Identifier(Box::new(id))
        };
        Ok(Property { key, value, kind, method: false, shorthand: true, computed, span: self.span_from(start) })
    }

    /// A property name: identifier name, string, number, or `[computed]`.
    pub(crate) fn parse_property_key(&mut self, ctx: Context) -> Result<(Expression, bool)> {
        match self.current.kind {
            TokenKind::LBracket => {
                self.advance()?;
                let key = self.parse_assign_expr(ctx | Context::ALLOW_IN)?;
                self.expect(&TokenKind::RBracket)?;
                Ok((key, true))
            }
            TokenKind::String(_) | TokenKind::Number(_) | TokenKind::BigInt(_) => {
                Ok((Expression::Literal(Box::new(self.parse_literal(ctx)?)), false))
            }
            _ => Ok((Expression::Identifier(Box::new(self.parse_identifier_name()?)), false)),
        }
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// A template literal. Segments with escapes that are only legal in
    /// tagged templates are rejected unless `tagged`.
    pub(crate) fn parse_template(&mut self, ctx: Context, tagged: bool) -> Result<TemplateLiteral> {
        let start = self.start();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let TokenKind::Template { cooked, raw, tail } = &self.current.kind else {
                return Err(self.unexpected());
            };
            let (cooked, raw, tail) = (cooked.clone(), raw.clone(), *tail);
            if let Some(offset) = self.current.invalid_escape {
                if !tagged {
                    return Err(self.error(ErrorKind::InvalidTemplateEscape, offset));
                }
            }
            let token = self.advance()?;
            let end = token.span.end - if tail { 1 } else { 2 };
            quasis.push(TemplateElement {
                value: TemplateValue { raw, cooked },
                tail,
                span: self.make_span(token.span.start + 1, end),
            });
            if tail {
                break;
            }

            expressions.push(self.parse_expression(ctx | Context::ALLOW_IN)?);
            if !self.at(&TokenKind::RBrace) {
                return Err(self.unexpected());
            }
            self.current = self.lexer.rescan_template_continuation(&self.current)?;
        }
        Ok(TemplateLiteral { quasis, expressions, span: self.span_from(start) })
    }
}

/// Which kind of function body a method or function value gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FunctionFlavor {
    /// A function declaration or expression.
    Plain,
    /// An object or class method.
    Method,
    Getter,
    Setter,
    Constructor { derived: bool },
}

/// Whether a token can begin an expression (used after `yield`).
fn starts_expression(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::PrivateName(_)
            | TokenKind::String(_)
            | TokenKind::Number(_)
            | TokenKind::BigInt(_)
            | TokenKind::Regex { .. }
            | TokenKind::Template { .. }
            | TokenKind::Slash
            | TokenKind::SlashEq
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Bang
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::This
            | TokenKind::Super
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Function
            | TokenKind::Class
            | TokenKind::New
            | TokenKind::Import
            | TokenKind::Typeof
            | TokenKind::Void
            | TokenKind::Delete
    )
}

/// Whether a token can begin a property name (after `get`, `set`, `async`
/// or `static`).
pub(crate) fn starts_property_name(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::PrivateName(_)
            | TokenKind::String(_)
            | TokenKind::Number(_)
            | TokenKind::BigInt(_)
            | TokenKind::LBracket
    ) || kind.is_keyword()
}

/// `__proto__` as an identifier or string key.
fn is_proto_key(key: &Expression) -> bool {
    match key {
        Expression::Identifier(id) => id.name == "__proto__",
        Expression::Literal(lit) => matches!(&lit.value, LiteralValue::String(s) if s == "__proto__"),
        _ => false,
    }
}

/// `a.#x`, `(a.#x)` or `a?.#x`.
fn is_private_member(expr: &Expression) -> bool {
    let expr = match expr.without_parentheses() {
        Expression::Chain(chain) => &chain.expression,
        expr => expr,
    };
    matches!(expr, Expression::Member(member) if matches!(member.property, Expression::PrivateIdentifier(_)))
}

/// `??` may not be mixed with `||` or `&&` without parentheses. Returns the
/// offending operand's offset.
fn check_coalesce_mix(operator: LogicalOperator, left: &Expression, right: &Expression) -> std::result::Result<(), u32> {
    let conflicts = |expr: &Expression| match expr {
        Expression::Logical(logical) => (logical.operator == LogicalOperator::Coalesce) != (operator == LogicalOperator::Coalesce),
        _ => false,
    };
    if conflicts(left) {
        return Err(left.span().start);
    }
    if conflicts(right) {
        return Err(right.span().start);
    }
    Ok(())
}

fn unary_operator(kind: &TokenKind) -> Option<UnaryOperator> {
    Some(match kind {
        TokenKind::Minus => UnaryOperator::Minus,
        TokenKind::Plus => UnaryOperator::Plus,
        TokenKind::Bang => UnaryOperator::Not,
        TokenKind::Tilde => UnaryOperator::BitNot,
        TokenKind::Typeof => UnaryOperator::Typeof,
        TokenKind::Void => UnaryOperator::Void,
        TokenKind::Delete => UnaryOperator::Delete,
        _ => return None,
    })
}

fn update_operator(kind: &TokenKind) -> Option<UpdateOperator> {
    match kind {
        TokenKind::PlusPlus => Some(UpdateOperator::Increment),
        TokenKind::MinusMinus => Some(UpdateOperator::Decrement),
        _ => None,
    }
}

fn logical_operator(kind: &TokenKind) -> Option<LogicalOperator> {
    match kind {
        TokenKind::PipePipe => Some(LogicalOperator::Or),
        TokenKind::AmpAmp => Some(LogicalOperator::And),
        TokenKind::QuestionQuestion => Some(LogicalOperator::Coalesce),
        _ => None,
    }
}

fn binary_operator(kind: &TokenKind) -> Option<BinaryOperator> {
    Some(match kind {
        TokenKind::EqEq => BinaryOperator::Eq,
        TokenKind::BangEq => BinaryOperator::NotEq,
        TokenKind::EqEqEq => BinaryOperator::StrictEq,
        TokenKind::BangEqEq => BinaryOperator::StrictNotEq,
        TokenKind::Lt => BinaryOperator::Lt,
        TokenKind::LtEq => BinaryOperator::LtEq,
        TokenKind::Gt => BinaryOperator::Gt,
        TokenKind::GtEq => BinaryOperator::GtEq,
        TokenKind::LtLt => BinaryOperator::Shl,
        TokenKind::GtGt => BinaryOperator::Shr,
        TokenKind::GtGtGt => BinaryOperator::UShr,
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Sub,
        TokenKind::Star => BinaryOperator::Mul,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::Percent => BinaryOperator::Mod,
        TokenKind::StarStar => BinaryOperator::Exp,
        TokenKind::Pipe => BinaryOperator::BitOr,
        TokenKind::Caret => BinaryOperator::BitXor,
        TokenKind::Amp => BinaryOperator::BitAnd,
        TokenKind::In => BinaryOperator::In,
        TokenKind::Instanceof => BinaryOperator::Instanceof,
        _ => return None,
    })
}

fn assignment_operator(kind: &TokenKind) -> Option<AssignmentOperator> {
    Some(match kind {
        TokenKind::Eq => AssignmentOperator::Assign,
        TokenKind::PlusEq => AssignmentOperator::Add,
        TokenKind::MinusEq => AssignmentOperator::Sub,
        TokenKind::StarEq => AssignmentOperator::Mul,
        TokenKind::SlashEq => AssignmentOperator::Div,
        TokenKind::PercentEq => AssignmentOperator::Mod,
        TokenKind::StarStarEq => AssignmentOperator::Exp,
        TokenKind::LtLtEq => AssignmentOperator::Shl,
        TokenKind::GtGtEq => AssignmentOperator::Shr,
        TokenKind::GtGtGtEq => AssignmentOperator::UShr,
        TokenKind::PipeEq => AssignmentOperator::BitOr,
        TokenKind::CaretEq => AssignmentOperator::BitXor,
        TokenKind::AmpEq => AssignmentOperator::BitAnd,
        TokenKind::PipePipeEq => AssignmentOperator::Or,
        TokenKind::AmpAmpEq => AssignmentOperator::And,
        TokenKind::QuestionQuestionEq => AssignmentOperator::Coalesce,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::error::ErrorKind;
    use crate::options::ParserOptions;
    use crate::parse;

    fn expr(source: &str) -> Expression {
        let program = parse(source, ParserOptions::script()).unwrap();
        match program.body.into_iter().next() {
            Some(Statement::Expression(stmt)) => stmt.expression,
            other => panic!("not an expression statement: {other:?}"),
        }
    }

    fn error(source: &str) -> ErrorKind {
        parse(source, ParserOptions::script()).unwrap_err().kind
    }

    #[test]
    fn test_binary_precedence() {
        let Expression::Binary(add) = expr("1 + 2 * 3") else { panic!() };
        assert_eq!(add.operator, BinaryOperator::Add);
        assert!(matches!(add.right, Expression::Binary(ref mul) if mul.operator == BinaryOperator::Mul));

        let Expression::Binary(exp) = expr("2 ** 3 ** 2") else { panic!() };
        assert!(matches!(exp.right, Expression::Binary(_)));
    }

    #[test]
    fn test_exponent_operand() {
        assert_eq!(error("-a ** 2"), ErrorKind::UnaryBeforeExponent);
        expr("(-a) ** 2");
        expr("++a ** 2");
    }

    #[test]
    fn test_coalesce_mixing() {
        assert_eq!(error("a ?? b || c"), ErrorKind::MixedCoalesce);
        assert_eq!(error("a && b ?? c"), ErrorKind::MixedCoalesce);
        expr("(a ?? b) || c");
        expr("a ?? (b && c)");
    }

    #[test]
    fn test_optional_chain() {
        let Expression::Chain(chain) = expr("a?.b.c()") else { panic!() };
        let Expression::Call(call) = &chain.expression else { panic!() };
        assert!(!call.optional);
        assert_eq!(error("a?.b`x`"), ErrorKind::TaggedTemplateInOptionalChain);
        assert_eq!(error("new a?.b()"), ErrorKind::OptionalChainInNew);
    }

    #[test]
    fn test_arrows() {
        let Expression::Arrow(arrow) = expr("(a, [b], {c} = {}) => a") else { panic!() };
        assert_eq!(arrow.params.len(), 3);
        assert!(arrow.expression);

        let Expression::Arrow(arrow) = expr("async x => await x") else { panic!() };
        assert!(arrow.is_async);

        assert!(matches!(expr("async (a, ...b) => 0"), Expression::Arrow(_)));
        assert!(matches!(expr("async(a, ...b)"), Expression::Call(_)));

        assert_eq!(error("(a)\n=> a"), ErrorKind::LineBreakBeforeArrow);
        assert_eq!(error("((a)) => a"), ErrorKind::ParenthesizedPattern);
        assert_eq!(error("(a, a) => a"), ErrorKind::DuplicateParameter("a".into()));
        assert_eq!(error("async (await) => 0"), ErrorKind::ReservedWord("await".into()));
        assert_eq!(error("function* g() { (a = yield) => 0 }"), ErrorKind::YieldInParameter);
    }

    #[test]
    fn test_arrow_parameter_defaults() {
        let Expression::Arrow(arrow) = expr("(a = 1, b = a) => b") else { panic!() };
        assert!(arrow.params.iter().all(|param| matches!(param, Pattern::Assignment(_))));
        let Expression::Arrow(arrow) = expr("async ([x] = []) => x") else { panic!() };
        assert!(matches!(arrow.params[0], Pattern::Assignment(_)));

        assert_eq!(error("(a += 1) => 0"), ErrorKind::InvalidDestructuringTarget);
        assert_eq!(error("((b) = 1) => 0"), ErrorKind::ParenthesizedPattern);
        assert_eq!(error("({a: (b) = 1}) => 0"), ErrorKind::ParenthesizedPattern);
        assert_eq!(error("([(a)] = []) => 0"), ErrorKind::ParenthesizedPattern);
        assert_eq!(error("async ({a: (b) = 1}) => 0"), ErrorKind::ParenthesizedPattern);
        assert!(matches!(expr("({a: (b) = 1})"), Expression::Parenthesized(_)));
        assert!(matches!(expr("[(a)] = []"), Expression::Assignment(_)));
    }

    #[test]
    fn test_parenthesized_is_transparent() {
        let Expression::Parenthesized(paren) = expr("(a, b)") else { panic!() };
        assert!(matches!(paren.expression, Expression::Sequence(_)));
        assert_eq!(error("()"), ErrorKind::UnexpectedToken(")".into()));
    }

    #[test]
    fn test_cover_initialized_name() {
        expr("({a = 1} = b)");
        expr("[{a = 1}] = b");
        assert_eq!(error("({a = 1})"), ErrorKind::InvalidCoverInitializedName);
        assert_eq!(error("f({a = 1})"), ErrorKind::InvalidCoverInitializedName);
        assert_eq!(error("({__proto__: a, __proto__: b})"), ErrorKind::DuplicateProto);
        expr("({__proto__: a, __proto__: b} = c)");
        expr("({__proto__: a, __proto__})");
    }

    #[test]
    fn test_update_targets() {
        expr("a.b++");
        expr("--(a)");
        assert_eq!(error("a() ++"), ErrorKind::InvalidUpdateTarget("postfix"));
        assert_eq!(error("++a()"), ErrorKind::InvalidUpdateTarget("prefix"));
    }

    #[test]
    fn test_templates() {
        let Expression::Template(template) = expr("`a${b}c`") else { panic!() };
        assert_eq!(template.quasis.len(), 2);
        assert_eq!(template.quasis[0].span.start, 1);
        assert_eq!(template.quasis[0].span.end, 2);
        assert_eq!(template.quasis[1].span.start, 6);
        assert_eq!(template.quasis[1].span.end, 7);

        let Expression::TaggedTemplate(tagged) = expr("t`\\u{`") else { panic!() };
        assert_eq!(tagged.quasi.quasis[0].value.cooked, None);
        assert_eq!(error("`\\u{`"), ErrorKind::InvalidTemplateEscape);
    }

    #[test]
    fn test_regex_after_operator() {
        let Expression::Binary(bin) = expr("a / /b/g") else { panic!() };
        assert!(matches!(&bin.right, Expression::Literal(lit) if matches!(lit.value, LiteralValue::RegExp { .. })));
    }

    #[test]
    fn test_meta_properties() {
        assert_eq!(error("new.target"), ErrorKind::NewTargetOutsideFunction);
        parse("function f() { new.target }", ParserOptions::script()).unwrap();
        assert_eq!(error("import.meta"), ErrorKind::ImportMetaOutsideModule);
        assert_eq!(error("new import('a')"), ErrorKind::NewImport);
        assert_eq!(error("import(a, b)"), ErrorKind::ImportCallArity);
    }

    #[test]
    fn test_strict_delete() {
        expr("delete a");
        assert_eq!(error("'use strict'; delete a"), ErrorKind::StrictDelete);
        assert_eq!(error("'use strict'; delete ((a))"), ErrorKind::StrictDelete);
        assert_eq!(error("class A { #x; m() { delete this.#x } }"), ErrorKind::DeletePrivateField);
    }

    #[test]
    fn test_yield_and_await_as_identifiers() {
        expr("yield + await");
        assert_eq!(error("function* g() { var yield; }"), ErrorKind::ReservedWord("yield".into()));
        assert_eq!(error("async function f() { var await; }"), ErrorKind::ReservedWord("await".into()));
    }
}
