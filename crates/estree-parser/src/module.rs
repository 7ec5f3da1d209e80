//! Import and export declarations.

use std::mem;

use rustc_hash::FxHashSet;

use crate::ast::*;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::parser::Parser;
use crate::scope::BindingKind;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    // =========================================================================
    // Imports
    // =========================================================================

    /// Import and export are only allowed at the top level of a module.
    fn check_module_item(&self, ctx: Context, start: u32, outside_module: ErrorKind) -> Result<()> {
        if !ctx.is_module() {
            return Err(self.error(outside_module, start));
        }
        if !ctx.contains(Context::TOP_LEVEL) {
            return Err(self.error(ErrorKind::ImportExportNotTopLevel, start));
        }
        Ok(())
    }

    pub(crate) fn parse_import_declaration(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.start();
        self.check_module_item(ctx, start, ErrorKind::ImportOutsideModule)?;
        self.advance()?;

        let mut specifiers = Vec::new();
        if !matches!(self.current.kind, TokenKind::String(_)) {
            let mut more = true;
            if matches!(self.current.kind, TokenKind::Identifier(_)) {
                let local = self.parse_import_local(ctx)?;
                let span = local.span;
                specifiers.push(ImportDeclarationSpecifier::Default(Box::new(ImportDefaultSpecifier { local, span })));
                more = self.eat(&TokenKind::Comma)?;
            }
            if more {
                match self.current.kind {
                    TokenKind::Star => {
                        let spec_start = self.start();
                        self.advance()?;
                        self.expect_contextual("as")?;
                        let local = self.parse_import_local(ctx)?;
                        specifiers.push(ImportDeclarationSpecifier::Namespace(Box::new(ImportNamespaceSpecifier {
                            local,
                            span: self.span_from(spec_start),
                        })));
                    }
                    TokenKind::LBrace => {
                        self.advance()?;
                        while !self.at(&TokenKind::RBrace) {
                            let specifier = self.parse_import_specifier(ctx)?;
                            specifiers.push(ImportDeclarationSpecifier::Named(Box::new(specifier)));
                            if !self.at(&TokenKind::RBrace) {
                                self.expect(&TokenKind::Comma)?;
                            }
                        }
                        self.expect(&TokenKind::RBrace)?;
                    }
                    _ => return Err(self.unexpected()),
                }
            }
            self.expect_contextual("from")?;
        }

        let source = self.parse_module_source(ctx)?;
        let attributes = self.parse_import_attributes(ctx)?;
        self.semicolon()?;
        Ok(Statement::Import(Box::new(ImportDeclaration {
            specifiers,
            source,
            attributes,
            span: self.span_from(start),
        })))
    }

    /// `name`, `name as local` or `"string" as local`.
    fn parse_import_specifier(&mut self, ctx: Context) -> Result<ImportSpecifier> {
        let start = self.start();
        let token = self.current.clone();
        let imported = self.parse_module_export_name(ctx)?;

        let local = if self.at_contextual("as") {
            self.advance()?;
            self.parse_import_local(ctx)?
        } else {
            let ModuleExportName::Identifier(id) = &imported else {
                return Err(self.unexpected());
            };
            if token.kind.is_keyword() {
                return Err(self.error(ErrorKind::ReservedWord(id.name.clone()), id.span.start));
            }
            self.check_binding_identifier(&id.name, &token, ctx)?;
            self.declare(&id.name, id.span.start, BindingKind::Import, ctx)?;
            id.clone()
        };
        Ok(ImportSpecifier { imported, local, span: self.span_from(start) })
    }

    fn parse_import_local(&mut self, ctx: Context) -> Result<Identifier> {
        let local = self.parse_binding_identifier(ctx)?;
        self.declare(&local.name, local.span.start, BindingKind::Import, ctx)?;
        Ok(local)
    }

    /// An IdentifierName or string literal in an import or export list.
    fn parse_module_export_name(&mut self, ctx: Context) -> Result<ModuleExportName> {
        if matches!(self.current.kind, TokenKind::String(_)) {
            return Ok(ModuleExportName::String(self.parse_literal(ctx)?));
        }
        Ok(ModuleExportName::Identifier(self.parse_identifier_name()?))
    }

    fn parse_module_source(&mut self, ctx: Context) -> Result<Literal> {
        if !matches!(self.current.kind, TokenKind::String(_)) {
            return Err(self.unexpected());
        }
        self.parse_literal(ctx)
    }

    /// `with { key: "value", ... }` after a module source. Only parsed when
    /// staged syntax is enabled.
    fn parse_import_attributes(&mut self, ctx: Context) -> Result<Vec<ImportAttribute>> {
        if !self.options.next || !self.at(&TokenKind::With) {
            return Ok(Vec::new());
        }
        self.advance()?;
        self.expect(&TokenKind::LBrace)?;
        let mut attributes = Vec::new();
        let mut seen = FxHashSet::default();
        while !self.at(&TokenKind::RBrace) {
            let start = self.start();
            let key = self.parse_module_export_name(ctx)?;
            if !seen.insert(key.name().to_string()) {
                return Err(self.error(ErrorKind::DuplicateImportAttribute(key.name().to_string()), start));
            }
            self.expect(&TokenKind::Colon)?;
            if !matches!(self.current.kind, TokenKind::String(_)) {
                return Err(self.unexpected());
            }
            let value = self.parse_literal(ctx)?;
            attributes.push(ImportAttribute { key, value, span: self.span_from(start) });
            if !self.at(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(attributes)
    }

    // =========================================================================
    // Exports
    // =========================================================================

    pub(crate) fn parse_export_declaration(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.start();
        self.check_module_item(ctx, start, ErrorKind::ExportOutsideModule)?;
        self.advance()?;

        match self.current.kind {
            TokenKind::Star => self.parse_export_all(ctx, start),
            TokenKind::Default => self.parse_export_default(ctx, start),
            TokenKind::LBrace => self.parse_export_specifiers(ctx, start),
            _ => self.parse_export_named_declaration(ctx, start),
        }
    }

    /// `export * [as name] from "source"`
    fn parse_export_all(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.advance()?;
        let exported = if self.at_contextual("as") {
            self.advance()?;
            let exported = self.parse_module_export_name(ctx)?;
            self.add_export(exported.name(), exported.span().start)?;
            Some(exported)
        } else {
            None
        };
        self.expect_contextual("from")?;
        let source = self.parse_module_source(ctx)?;
        let attributes = self.parse_import_attributes(ctx)?;
        self.semicolon()?;
        Ok(Statement::ExportAll(Box::new(ExportAllDeclaration {
            exported,
            source,
            attributes,
            span: self.span_from(start),
        })))
    }

    fn parse_export_default(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        let default = self.advance()?;
        self.add_export("default", default.span.start)?;

        let decl_start = self.start();
        let declaration = if self.at(&TokenKind::Function) || self.at_async_function()? {
            ExportDefaultKind::Function(Box::new(self.parse_function_declaration(ctx, decl_start, true)?))
        } else if self.at(&TokenKind::Class) {
            ExportDefaultKind::Class(Box::new(self.parse_class(ctx, decl_start, ClassKind::ClassDeclaration, false)?))
        } else {
            let expression = self.parse_assign_expr(ctx | Context::ALLOW_IN)?;
            self.semicolon()?;
            ExportDefaultKind::Expression(expression)
        };
        Ok(Statement::ExportDefault(Box::new(ExportDefaultDeclaration { declaration, span: self.span_from(start) })))
    }

    /// `export { a, b as c } [from "source"]`
    fn parse_export_specifiers(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        self.expect(&TokenKind::LBrace)?;
        let mut specifiers = Vec::new();
        let mut local_tokens = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            let spec_start = self.start();
            local_tokens.push(self.current.clone());
            let local = self.parse_module_export_name(ctx)?;
            let exported = if self.at_contextual("as") {
                self.advance()?;
                self.parse_module_export_name(ctx)?
            } else {
                local.clone()
            };
            specifiers.push(ExportSpecifier { local, exported, span: self.span_from(spec_start) });
            if !self.at(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;

        let (source, attributes) = if self.at_contextual("from") {
            self.advance()?;
            let source = self.parse_module_source(ctx)?;
            (Some(source), self.parse_import_attributes(ctx)?)
        } else {
            // Without `from` each local must name a binding of this module.
            for (specifier, token) in specifiers.iter().zip(&local_tokens) {
                let ModuleExportName::Identifier(local) = &specifier.local else {
                    return Err(self.error(ErrorKind::StringExportWithoutFrom, specifier.local.span().start));
                };
                if token.kind.is_keyword() {
                    return Err(self.error(ErrorKind::ReservedWord(local.name.clone()), local.span.start));
                }
                self.check_identifier_reference(&local.name, token, ctx)?;
                self.export_locals.push((local.name.clone(), local.span.start));
            }
            (None, Vec::new())
        };
        for specifier in &specifiers {
            self.add_export(specifier.exported.name(), specifier.exported.span().start)?;
        }
        self.semicolon()?;

        Ok(Statement::ExportNamed(Box::new(ExportNamedDeclaration {
            declaration: None,
            specifiers,
            source,
            attributes,
            span: self.span_from(start),
        })))
    }

    /// `export var|let|const|function|class ...`
    fn parse_export_named_declaration(&mut self, ctx: Context, start: u32) -> Result<Statement> {
        let decl_start = self.start();
        let declaration = match self.current.kind {
            TokenKind::Var => self.parse_lexical_statement(ctx, decl_start, VariableKind::Var)?,
            TokenKind::Const => self.parse_lexical_statement(ctx, decl_start, VariableKind::Const)?,
            TokenKind::Identifier(_) if self.at_let_declaration(true)? => {
                self.parse_lexical_statement(ctx, decl_start, VariableKind::Let)?
            }
            TokenKind::Function => Statement::Function(Box::new(self.parse_function_declaration(ctx, decl_start, false)?)),
            TokenKind::Identifier(_) if self.at_async_function()? => {
                Statement::Function(Box::new(self.parse_function_declaration(ctx, decl_start, false)?))
            }
            TokenKind::Class => {
                Statement::Class(Box::new(self.parse_class(ctx, decl_start, ClassKind::ClassDeclaration, true)?))
            }
            _ => return Err(self.unexpected()),
        };

        let mut names = Vec::new();
        match &declaration {
            Statement::Variable(decl) => {
                for declarator in &decl.declarations {
                    declarator.id.bound_names(&mut names);
                }
            }
            Statement::Function(function) => names.extend(function.id.as_ref()),
            Statement::Class(class) => names.extend(class.id.as_ref()),
            _ => {}
        }
        let names: Vec<(String, u32)> = names.into_iter().map(|id| (id.name.clone(), id.span.start)).collect();
        for (name, offset) in names {
            self.add_export(&name, offset)?;
        }

        Ok(Statement::ExportNamed(Box::new(ExportNamedDeclaration {
            declaration: Some(declaration),
            specifiers: Vec::new(),
            source: None,
            attributes: Vec::new(),
            span: self.span_from(start),
        })))
    }

    fn add_export(&mut self, name: &str, offset: u32) -> Result<()> {
        if !self.exported.insert(name.to_string()) {
            return Err(self.error(ErrorKind::DuplicateExport(name.to_string()), offset));
        }
        Ok(())
    }

    /// Every `export { name }` without `from` must refer to a top-level
    /// binding, which may be declared after the export.
    pub(crate) fn check_export_locals(&mut self) -> Result<()> {
        for (name, offset) in mem::take(&mut self.export_locals) {
            if self.scopes.root().binding(&name).is_none() {
                return Err(self.error(ErrorKind::UndeclaredExport(name), offset));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::error::ErrorKind;
    use crate::options::ParserOptions;
    use crate::parse;

    fn module(source: &str) -> Program {
        match parse(source, ParserOptions::module()) {
            Ok(program) => program,
            Err(err) => panic!("{source}: {err}"),
        }
    }

    fn error(source: &str) -> ErrorKind {
        parse(source, ParserOptions::module()).unwrap_err().kind
    }

    #[test]
    fn test_import_forms() {
        let program = module("import a, * as b from 'm'; import c, {d, e as f, 'g h' as i, default as j} from 'n'; import 'o';");
        let Statement::Import(first) = &program.body[0] else { panic!() };
        assert!(matches!(first.specifiers[0], ImportDeclarationSpecifier::Default(_)));
        assert!(matches!(first.specifiers[1], ImportDeclarationSpecifier::Namespace(_)));
        let Statement::Import(second) = &program.body[1] else { panic!() };
        assert_eq!(second.specifiers.len(), 5);
        let Statement::Import(third) = &program.body[2] else { panic!() };
        assert!(third.specifiers.is_empty());
    }

    #[test]
    fn test_import_errors() {
        assert_eq!(error("import {a, a} from 'm'"), ErrorKind::DuplicateBinding("a".into()));
        assert_eq!(error("import {if} from 'm'"), ErrorKind::ReservedWord("if".into()));
        assert_eq!(error("import {'a'} from 'm'"), ErrorKind::UnexpectedToken("}".into()));
        assert_eq!(error("import a from 'm'; let a;"), ErrorKind::DuplicateBinding("a".into()));
        assert_eq!(error("{ import a from 'm'; }"), ErrorKind::ImportExportNotTopLevel);
        assert_eq!(
            parse("import a from 'm'", ParserOptions::script()).unwrap_err().kind,
            ErrorKind::ImportOutsideModule
        );
    }

    #[test]
    fn test_export_forms() {
        let program = module(
            "export var a = 1; export let [b] = c; export function f() {} export class C {} \
             export { a as d, f as 'e f' }; export * from 'm'; export * as ns from 'm'; export { x } from 'm';",
        );
        assert_eq!(program.body.len(), 8);
        assert!(matches!(&program.body[5], Statement::ExportAll(all) if all.exported.is_none()));
    }

    #[test]
    fn test_export_default() {
        let program = module("export default function () {}");
        let Statement::ExportDefault(decl) = &program.body[0] else { panic!() };
        assert!(matches!(&decl.declaration, ExportDefaultKind::Function(f) if f.id.is_none()));

        module("export default class {}");
        module("export default (1 + 2);");
        assert_eq!(error("export default 1; export default 2;"), ErrorKind::DuplicateExport("default".into()));
    }

    #[test]
    fn test_export_errors() {
        assert_eq!(error("var a; export {a, a}"), ErrorKind::DuplicateExport("a".into()));
        assert_eq!(error("export {a}"), ErrorKind::UndeclaredExport("a".into()));
        module("export {a}; var a;");
        assert_eq!(error("export {'a'}"), ErrorKind::StringExportWithoutFrom);
        assert_eq!(error("export {if}"), ErrorKind::ReservedWord("if".into()));
        assert_eq!(error("export function f() {} export {f}"), ErrorKind::DuplicateExport("f".into()));
        assert_eq!(error("function f() { export var a; }"), ErrorKind::ImportExportNotTopLevel);
    }

    #[test]
    fn test_import_attributes() {
        let next = ParserOptions::module().with_next(true);
        let program = crate::parse("import a from 'a.json' with { type: 'json' };", next).unwrap();
        let Statement::Import(import) = &program.body[0] else { panic!() };
        assert_eq!(import.attributes.len(), 1);
        assert_eq!(
            crate::parse("import a from 'a' with { type: 'x', type: 'y' };", next).unwrap_err().kind,
            ErrorKind::DuplicateImportAttribute("type".into())
        );
        assert!(parse("import a from 'a.json' with { type: 'json' };", ParserOptions::module()).is_err());
    }

    #[test]
    fn test_module_code_is_strict() {
        assert_eq!(error("with (a) {}"), ErrorKind::StrictWith);
        module("await 1;");
        assert_eq!(error("var await;"), ErrorKind::ReservedWord("await".into()));
    }
}
