//! Reinterpreting cover expressions as patterns.
//!
//! Array and object literals, identifiers, member accesses and `=`
//! assignments are parsed as expressions first. When the parser reaches a
//! token that settles the question (`=` after the expression, `=>` after a
//! parenthesized list, `in`/`of` in a `for` head) it hands the expression
//! to one of the conversions here, which either produce the matching
//! [`Pattern`] or report the first subtree that cannot be a target.

use crate::ast::*;
use crate::context::Context;
use crate::error::{ErrorKind, ParseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// Left of `=` or in a `for-in`/`for-of` head: member accesses allowed.
    Assignment,
    /// Arrow parameters: identifiers and nested patterns only.
    Binding,
}

/// Convert the left side of `=` (or of a `for-in`/`for-of` head).
pub(crate) fn to_assignment_target(expr: Expression, ctx: Context) -> Result<Pattern> {
    Reinterpreter { target: Target::Assignment, ctx }.convert(expr, false)
}

/// Convert an arrow parameter.
pub(crate) fn to_binding_target(expr: Expression, ctx: Context) -> Result<Pattern> {
    Reinterpreter { target: Target::Binding, ctx }.convert(expr, false)
}

/// Convert the trailing `...x` argument of `async(...)` into a rest
/// parameter.
pub(crate) fn spread_to_binding_rest(spread: SpreadElement, ctx: Context) -> Result<Box<RestElement>> {
    Reinterpreter { target: Target::Binding, ctx }.convert_rest(spread)
}

/// Convert the target of a compound or logical assignment, which must be an
/// identifier or member access.
pub(crate) fn to_simple_target(expr: Expression, ctx: Context, error: ErrorKind) -> Result<Pattern> {
    let offset = expr.span().start;
    match peel(expr) {
        Expression::Identifier(id) => {
            check_identifier(&id, ctx)?;
            Ok(Pattern::Identifier(id))
        }
        Expression::Member(member) => Ok(Pattern::Member(member)),
        _ => Err(ParseError::at(error, offset)),
    }
}

/// Validate the operand of `++`/`--` without converting it.
pub(crate) fn check_simple_target(expr: &Expression, ctx: Context, error: ErrorKind) -> Result<()> {
    match expr.without_parentheses() {
        Expression::Identifier(id) => check_identifier(id, ctx),
        Expression::Member(_) => Ok(()),
        _ => Err(ParseError::at(error, expr.span().start)),
    }
}

/// Check that an already converted assignment pattern is also a valid
/// binding pattern (no member access leaves).
pub(crate) fn check_binding_pattern(pattern: &Pattern, ctx: Context) -> Result<()> {
    match pattern {
        Pattern::Identifier(id) => check_identifier(id, ctx),
        Pattern::Member(member) => Err(ParseError::at(ErrorKind::InvalidDestructuringTarget, member.span.start)),
        Pattern::Array(array) => array
            .elements
            .iter()
            .flatten()
            .try_for_each(|element| check_binding_pattern(element, ctx)),
        Pattern::Object(object) => object.properties.iter().try_for_each(|property| match property {
            ObjectPatternProperty::Property(prop) => check_binding_pattern(&prop.value, ctx),
            ObjectPatternProperty::Rest(rest) => check_binding_pattern(&rest.argument, ctx),
        }),
        Pattern::Assignment(assign) => check_binding_pattern(&assign.left, ctx),
        Pattern::Rest(rest) => check_binding_pattern(&rest.argument, ctx),
    }
}

/// Offset of the first parenthesized target directly inside the left side
/// of `=`. Such a target is fine for assignment but not for a binding, and
/// the parentheses are gone once the left side has been converted.
pub(crate) fn parenthesized_target(expr: &Expression) -> Option<u32> {
    match expr {
        Expression::Parenthesized(paren) => Some(paren.span.start),
        Expression::Array(array) => array.elements.iter().flatten().find_map(|element| match element {
            ExpressionOrSpread::Expression(expr) => parenthesized_target(expr),
            ExpressionOrSpread::Spread(spread) => parenthesized_target(&spread.argument),
        }),
        Expression::Object(object) => object.properties.iter().find_map(|member| match member {
            ObjectMember::Property(prop) if prop.kind == PropertyKind::Init && !prop.method => {
                parenthesized_target(&prop.value)
            }
            ObjectMember::Property(_) => None,
            ObjectMember::Spread(spread) => parenthesized_target(&spread.argument),
        }),
        _ => None,
    }
}

/// `eval` and `arguments` cannot be assigned or bound in strict code.
fn check_identifier(id: &Identifier, ctx: Context) -> Result<()> {
    if ctx.is_strict() && matches!(id.name.as_str(), "eval" | "arguments") {
        return Err(ParseError::at(ErrorKind::StrictEvalArguments, id.span.start));
    }
    Ok(())
}

/// Strip enclosing parentheses, keeping the innermost expression.
fn peel(mut expr: Expression) -> Expression {
    while let Expression::Parenthesized(paren) = expr {
        expr = paren.expression;
    }
    expr
}

struct Reinterpreter {
    target: Target,
    ctx: Context,
}

impl Reinterpreter {
    fn convert(&self, expr: Expression, nested: bool) -> Result<Pattern> {
        match expr {
            Expression::Identifier(id) => {
                check_identifier(&id, self.ctx)?;
                Ok(Pattern::Identifier(id))
            }
            Expression::Member(member) => match self.target {
                Target::Assignment => Ok(Pattern::Member(member)),
                Target::Binding => Err(ParseError::at(ErrorKind::InvalidDestructuringTarget, member.span.start)),
            },
            Expression::Array(array) => self.convert_array(*array),
            Expression::Object(object) => self.convert_object(*object),
            Expression::Assignment(assign) if nested || self.target == Target::Binding => {
                self.convert_default(*assign)
            }
            Expression::Parenthesized(paren) => self.convert_parenthesized(*paren, nested),
            other => Err(self.invalid(other.span().start, nested)),
        }
    }

    fn invalid(&self, offset: u32, nested: bool) -> ParseError {
        let kind = if nested || self.target == Target::Binding {
            ErrorKind::InvalidDestructuringTarget
        } else {
            ErrorKind::InvalidAssignmentTarget
        };
        ParseError::at(kind, offset)
    }

    /// `(a) = 1` and `[(a.b)] = 1` are fine; `({a}) = 1` and `((a)) => 1`
    /// are not.
    fn convert_parenthesized(&self, paren: ParenthesizedExpression, nested: bool) -> Result<Pattern> {
        let start = paren.span.start;
        if self.target == Target::Binding {
            return Err(ParseError::at(ErrorKind::ParenthesizedPattern, start));
        }
        match peel(paren.expression) {
            inner @ (Expression::Identifier(_) | Expression::Member(_)) => self.convert(inner, nested),
            Expression::Array(_) | Expression::Object(_) => {
                Err(ParseError::at(ErrorKind::ParenthesizedPattern, start))
            }
            _ => Err(self.invalid(start, nested)),
        }
    }

    fn convert_default(&self, assign: AssignmentExpression) -> Result<Pattern> {
        if assign.operator != AssignmentOperator::Assign {
            return Err(ParseError::at(ErrorKind::InvalidDestructuringTarget, assign.span.start));
        }
        if self.target == Target::Binding {
            check_binding_pattern(&assign.left, self.ctx)?;
        }
        Ok(Pattern::Assignment(Box::new(AssignmentPattern {
            left: assign.left,
            right: assign.right,
            span: assign.span,
        })))
    }

    /// Convert a rest argument; it may not carry a default.
    fn convert_rest(&self, spread: SpreadElement) -> Result<Box<RestElement>> {
        if let Expression::Assignment(assign) = &spread.argument {
            return Err(ParseError::at(ErrorKind::RestWithDefault, assign.span.start));
        }
        let argument = self.convert(spread.argument, true)?;
        Ok(Box::new(RestElement { argument, span: spread.span }))
    }

    fn convert_array(&self, array: ArrayExpression) -> Result<Pattern> {
        if let Some(comma) = array.trailing_comma {
            return Err(ParseError::at(ErrorKind::RestTrailingComma, comma));
        }
        let last = array.elements.len().saturating_sub(1);
        let mut elements = Vec::with_capacity(array.elements.len());
        for (index, element) in array.elements.into_iter().enumerate() {
            elements.push(match element {
                None => None,
                Some(ExpressionOrSpread::Spread(spread)) => {
                    if index != last {
                        return Err(ParseError::at(ErrorKind::RestNotLast, spread.span.start));
                    }
                    Some(Pattern::Rest(self.convert_rest(*spread)?))
                }
                Some(ExpressionOrSpread::Expression(expr)) => Some(self.convert(expr, true)?),
            });
        }
        Ok(Pattern::Array(Box::new(ArrayPattern { elements, span: array.span })))
    }

    fn convert_object(&self, object: ObjectExpression) -> Result<Pattern> {
        if let Some(comma) = object.trailing_comma {
            return Err(ParseError::at(ErrorKind::RestTrailingComma, comma));
        }
        let last = object.properties.len().saturating_sub(1);
        let mut properties = Vec::with_capacity(object.properties.len());
        for (index, member) in object.properties.into_iter().enumerate() {
            properties.push(match member {
                ObjectMember::Property(prop) => {
                    let prop = *prop;
                    if prop.kind != PropertyKind::Init || prop.method {
                        return Err(ParseError::at(ErrorKind::InvalidDestructuringTarget, prop.span.start));
                    }
                    let value = self.convert(prop.value, true)?;
                    ObjectPatternProperty::Property(Box::new(AssignmentProperty {
                        key: prop.key,
                        value,
                        kind: PropertyKind::Init,
                        method: false,
                        shorthand: prop.shorthand,
                        computed: prop.computed,
                        span: prop.span,
                    }))
                }
                ObjectMember::Spread(spread) => {
                    if index != last {
                        return Err(ParseError::at(ErrorKind::RestNotLast, spread.span.start));
                    }
                    let allowed = match spread.argument.without_parentheses() {
                        Expression::Identifier(_) => true,
                        Expression::Member(_) => self.target == Target::Assignment,
                        Expression::Assignment(_) => true,
                        _ => false,
                    };
                    if !allowed {
                        return Err(ParseError::at(ErrorKind::InvalidObjectRest, spread.argument.span().start));
                    }
                    ObjectPatternProperty::Rest(self.convert_rest(*spread)?)
                }
            });
        }
        Ok(Pattern::Object(Box::new(ObjectPattern { properties, span: object.span })))
    }
}
