//! Class declarations and expressions.

use std::mem;

use rustc_hash::FxHashMap;

use crate::ast::*;
use crate::context::Context;
use crate::error::{ErrorKind, ParseError, Result};
use crate::expression::{starts_property_name, FunctionFlavor};
use crate::parser::Parser;
use crate::scope::{BindingKind, ScopeKind};
use crate::token::TokenKind;

/// How a private name is declared in a class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrivateKind {
    Field,
    Method,
    Getter { is_static: bool },
    Setter { is_static: bool },
    /// A getter and a setter with the same name and placement.
    Accessors,
}

/// Private names of one class body. References may come before the
/// declaration, so they are resolved when the body closes.
#[derive(Debug, Default)]
pub(crate) struct PrivateScope {
    declared: FxHashMap<String, PrivateKind>,
    unresolved: Vec<(String, u32)>,
}

impl<'a> Parser<'a> {
    // =========================================================================
    // Classes
    // =========================================================================

    /// `class [name] [extends expr] { body }`. Declarations bind their name
    /// in the enclosing scope.
    pub(crate) fn parse_class(&mut self, ctx: Context, start: u32, kind: ClassKind, require_id: bool) -> Result<Class> {
        self.expect(&TokenKind::Class)?;
        let inner = ctx.enter_class();

        let id = if matches!(self.current.kind, TokenKind::Identifier(_)) {
            let id = self.parse_binding_identifier(inner)?;
            if kind == ClassKind::ClassDeclaration {
                self.declare(&id.name, id.span.start, BindingKind::Class, ctx)?;
            }
            Some(id)
        } else if require_id {
            return Err(self.unexpected());
        } else {
            None
        };

        let super_class = if self.eat(&TokenKind::Extends)? {
            let heritage_start = self.start();
            let saved = mem::take(&mut self.cover);
            let heritage = self.parse_lhs_expr(inner);
            let cover = mem::replace(&mut self.cover, saved);
            let heritage = heritage?;
            cover.check_expression(heritage_start)?;
            Some(heritage)
        } else {
            None
        };

        self.private_scopes.push(PrivateScope::default());
        let body = self.parse_class_body(inner, super_class.is_some())?;
        self.exit_private_scope()?;

        Ok(Class { kind, id, super_class, body, span: self.span_from(start) })
    }

    fn parse_class_body(&mut self, ctx: Context, derived: bool) -> Result<ClassBody> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        let mut has_constructor = false;
        while !self.at(&TokenKind::RBrace) {
            if self.eat(&TokenKind::Semicolon)? {
                continue;
            }
            body.push(self.parse_class_element(ctx, derived, &mut has_constructor)?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(ClassBody { body, span: self.span_from(start) })
    }

    fn parse_class_element(&mut self, ctx: Context, derived: bool, has_constructor: &mut bool) -> Result<ClassElement> {
        let start = self.start();

        let mut is_static = false;
        if self.at_contextual("static") {
            let next = self.peek()?;
            if next.kind == TokenKind::LBrace {
                self.advance()?;
                return self.parse_static_block(ctx, start);
            }
            if next.kind == TokenKind::Star || starts_property_name(&next.kind) {
                self.advance()?;
                is_static = true;
            }
        }

        let mut is_async = false;
        if self.at_contextual("async") {
            let next = self.peek()?;
            if !next.newline_before && (next.kind == TokenKind::Star || starts_property_name(&next.kind)) {
                self.advance()?;
                is_async = true;
            }
        }
        let is_generator = self.eat(&TokenKind::Star)?;

        let mut kind = MethodKind::Method;
        if !is_async && !is_generator && (self.at_contextual("get") || self.at_contextual("set")) {
            let next = self.peek()?;
            if starts_property_name(&next.kind) {
                kind = if self.at_contextual("get") { MethodKind::Get } else { MethodKind::Set };
                self.advance()?;
            }
        }

        let (key, computed, private) = self.parse_class_key(ctx)?;
        let is_method = is_async || is_generator || kind != MethodKind::Method || self.at(&TokenKind::LParen);

        if let Some((name, offset)) = private {
            let private_kind = match kind {
                _ if !is_method => PrivateKind::Field,
                MethodKind::Get => PrivateKind::Getter { is_static },
                MethodKind::Set => PrivateKind::Setter { is_static },
                _ => PrivateKind::Method,
            };
            self.declare_private_name(name, private_kind, offset)?;
        }

        if is_method {
            let is_constructor = !is_static && !computed && key_is(&key, "constructor");
            if is_constructor {
                let invalid = match kind {
                    MethodKind::Get => Some("getter"),
                    MethodKind::Set => Some("setter"),
                    _ if is_generator => Some("generator"),
                    _ if is_async => Some("async method"),
                    _ => None,
                };
                if let Some(what) = invalid {
                    return Err(self.error(ErrorKind::InvalidConstructor(what), key.span().start));
                }
                if mem::replace(has_constructor, true) {
                    return Err(self.error(ErrorKind::DuplicateConstructor, key.span().start));
                }
                kind = MethodKind::Constructor;
            }
            if is_static && !computed && key_is(&key, "prototype") {
                return Err(self.error(ErrorKind::StaticPrototype, key.span().start));
            }

            let flavor = match kind {
                MethodKind::Constructor => FunctionFlavor::Constructor { derived },
                MethodKind::Get => FunctionFlavor::Getter,
                MethodKind::Set => FunctionFlavor::Setter,
                MethodKind::Method => FunctionFlavor::Method,
            };
            let value_start = self.start();
            let value = self.parse_method_function(ctx, value_start, is_async, is_generator, flavor)?;
            return Ok(ClassElement::Method(Box::new(MethodDefinition {
                key,
                value: Box::new(value),
                kind,
                computed,
                is_static,
                span: self.span_from(start),
            })));
        }

        if !computed && key_is(&key, "constructor") {
            return Err(self.error(ErrorKind::FieldNamedConstructor, key.span().start));
        }
        if is_static && !computed && key_is(&key, "prototype") {
            return Err(self.error(ErrorKind::StaticPrototype, key.span().start));
        }
        let value = if self.eat(&TokenKind::Eq)? {
            let saved = self.enter_function_state();
            let value = self.parse_assign_expr(ctx.enter_class_initializer(false))?;
            self.exit_function_state(saved);
            Some(value)
        } else {
            None
        };
        self.semicolon()?;
        Ok(ClassElement::Property(Box::new(PropertyDefinition {
            key,
            value,
            computed,
            is_static,
            span: self.span_from(start),
        })))
    }

    /// A class element name. Private names are returned separately so the
    /// caller can declare them once the element kind is known.
    fn parse_class_key(&mut self, ctx: Context) -> Result<(Expression, bool, Option<(String, u32)>)> {
        if let TokenKind::PrivateName(name) = &self.current.kind {
            let name = name.clone();
            let token = self.advance()?;
            if name == "constructor" {
                return Err(self.error(ErrorKind::PrivateConstructor, token.span.start));
            }
            let key = Expression::PrivateIdentifier(Box::new(PrivateIdentifier {
                name: name.clone(),
                span: self.make_span(token.span.start, token.span.end),
            }));
            return Ok((key, false, Some((name, token.span.start))));
        }
        let (key, computed) = self.parse_property_key(ctx)?;
        Ok((key, computed, None))
    }

    /// `static { ... }`, after `static`.
    fn parse_static_block(&mut self, ctx: Context, start: u32) -> Result<ClassElement> {
        self.expect(&TokenKind::LBrace)?;
        let inner = ctx.enter_class_initializer(true);

        let saved = self.enter_function_state();
        self.scopes.push(ScopeKind::StaticBlock);
        let mut body = Vec::new();
        self.parse_statement_list(inner, &mut body, &TokenKind::RBrace)?;
        self.scopes.pop();
        self.exit_function_state(saved);

        self.expect(&TokenKind::RBrace)?;
        Ok(ClassElement::StaticBlock(Box::new(StaticBlock { body, span: self.span_from(start) })))
    }

    // =========================================================================
    // Private Names
    // =========================================================================

    fn declare_private_name(&mut self, name: String, kind: PrivateKind, offset: u32) -> Result<()> {
        let Some(scope) = self.private_scopes.last_mut() else {
            return Err(ParseError::at(ErrorKind::UndeclaredPrivateName(name), offset));
        };
        let merged = match (scope.declared.get(&name).copied(), kind) {
            (None, kind) => kind,
            (Some(PrivateKind::Getter { is_static }), PrivateKind::Setter { is_static: other })
            | (Some(PrivateKind::Setter { is_static }), PrivateKind::Getter { is_static: other })
                if is_static == other =>
            {
                PrivateKind::Accessors
            }
            _ => return Err(ParseError::at(ErrorKind::DuplicatePrivateName(name), offset)),
        };
        scope.declared.insert(name, merged);
        Ok(())
    }

    /// Record a reference to `#name`. Outside any class body it is an error
    /// right away.
    pub(crate) fn use_private_name(&mut self, name: &str, offset: u32) -> Result<()> {
        let Some(scope) = self.private_scopes.last_mut() else {
            return Err(ParseError::at(ErrorKind::UndeclaredPrivateName(name.to_string()), offset));
        };
        if !scope.declared.contains_key(name) {
            scope.unresolved.push((name.to_string(), offset));
        }
        Ok(())
    }

    /// Close the innermost class body. References it does not declare pass
    /// to the enclosing class, or fail at the outermost one.
    fn exit_private_scope(&mut self) -> Result<()> {
        let Some(scope) = self.private_scopes.pop() else {
            return Ok(());
        };
        for (name, offset) in scope.unresolved {
            if scope.declared.contains_key(&name) {
                continue;
            }
            match self.private_scopes.last_mut() {
                Some(parent) => parent.unresolved.push((name, offset)),
                None => return Err(ParseError::at(ErrorKind::UndeclaredPrivateName(name), offset)),
            }
        }
        Ok(())
    }
}

/// A non-computed key spelled `name`, as an identifier or a string.
fn key_is(key: &Expression, name: &str) -> bool {
    match key {
        Expression::Identifier(id) => id.name == name,
        Expression::Literal(lit) => matches!(&lit.value, LiteralValue::String(s) if s == name),
        _ => false,
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

    fn class(source: &str) -> Class {
        let program = match parse(source, ParserOptions::script()) {
            Ok(program) => program,
            Err(err) => panic!("{source}: {err}"),
        };
        match program.body.into_iter().next() {
            Some(Statement::Class(class)) => *class,
            other => panic!("not a class: {other:?}"),
        }
    }

    #[test]
    fn test_element_kinds() {
        let class = class("class A extends B { constructor() { super(); } static m() {} get x() {} set x(v) {} y = 1; static { this.z = 2; } }");
        assert!(class.super_class.is_some());
        let body = &class.body.body;
        assert_eq!(body.len(), 6);
        assert!(matches!(&body[0], ClassElement::Method(m) if m.kind == MethodKind::Constructor));
        assert!(matches!(&body[1], ClassElement::Method(m) if m.is_static));
        assert!(matches!(&body[2], ClassElement::Method(m) if m.kind == MethodKind::Get));
        assert!(matches!(&body[4], ClassElement::Property(p) if p.value.is_some()));
        assert!(matches!(&body[5], ClassElement::StaticBlock(_)));
    }

    #[test]
    fn test_contextual_keywords_as_names() {
        let class = class("class A { static; get; set; async; static static() {} 'constructor'() {} }");
        assert_eq!(class.body.body.len(), 6);
        assert!(matches!(&class.body.body[5], ClassElement::Method(m) if m.kind == MethodKind::Constructor));
    }

    #[test]
    fn test_constructor_rules() {
        assert_eq!(error("class A { constructor() {} constructor() {} }"), ErrorKind::DuplicateConstructor);
        assert_eq!(error("class A { get constructor() {} }"), ErrorKind::InvalidConstructor("getter"));
        assert_eq!(error("class A { *constructor() {} }"), ErrorKind::InvalidConstructor("generator"));
        assert_eq!(error("class A { async constructor() {} }"), ErrorKind::InvalidConstructor("async method"));
        assert_eq!(error("class A { constructor = 1 }"), ErrorKind::FieldNamedConstructor);
        assert_eq!(error("class A { static prototype() {} }"), ErrorKind::StaticPrototype);
        assert_eq!(error("class A { #constructor }"), ErrorKind::PrivateConstructor);
        class("class A { static constructor() {} }");
    }

    #[test]
    fn test_super_call_needs_derived_constructor() {
        class("class A extends B { constructor() { super(); } }");
        assert_eq!(error("class A { constructor() { super(); } }"), ErrorKind::InvalidSuperCall);
        assert_eq!(error("class A extends B { m() { super(); } }"), ErrorKind::InvalidSuperCall);
        class("class A { m() { return super.m(); } }");
    }

    #[test]
    fn test_private_names() {
        class("class A { #x; m() { return #x in this && this.#x; } }");
        assert_eq!(error("class A { #x; m() { return 1 + #x in this; } }"), ErrorKind::UnexpectedToken("#x".into()));
        class("class A { m() { return this.#y; } #y = 1; }");
        class("class A { get #z() {} set #z(v) {} }");
        class("class A { #x; m() { class B { n() { this.#x; } } } }");
        assert_eq!(error("class A { #x; #x; }"), ErrorKind::DuplicatePrivateName("x".into()));
        assert_eq!(error("class A { static get #z() {} set #z(v) {} }"), ErrorKind::DuplicatePrivateName("z".into()));
        assert_eq!(error("class A { m() { this.#y; } }"), ErrorKind::UndeclaredPrivateName("y".into()));
        assert_eq!(error("this.#y"), ErrorKind::UndeclaredPrivateName("y".into()));
    }

    #[test]
    fn test_class_body_is_strict() {
        assert_eq!(error("class A { m() { with (a) {} } }"), ErrorKind::StrictWith);
        assert_eq!(error("class let {}"), ErrorKind::StrictReservedWord("let".into()));
    }

    #[test]
    fn test_initializers() {
        assert_eq!(error("class A { x = arguments; }"), ErrorKind::ArgumentsInClassInit);
        class("class A { x = function () { return arguments; }; }");
        assert_eq!(error("class A { static { await; } }"), ErrorKind::ReservedWord("await".into()));
        assert_eq!(error("class A { static { return; } }"), ErrorKind::IllegalReturn);
        assert_eq!(error("function f() { class A { static { var a; let a; } } }"), ErrorKind::DuplicateBinding("a".into()));
    }

    #[test]
    fn test_class_binding() {
        assert_eq!(error("class A {} class A {}"), ErrorKind::DuplicateBinding("A".into()));
        assert_eq!(error("if (a) class A {}"), ErrorKind::UnexpectedToken("class".into()));
    }
}
