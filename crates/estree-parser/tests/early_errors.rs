//! Early errors: each case must fail with the listed diagnostic, and the
//! sloppy-mode leniencies must keep parsing.

use estree_parser::{parse, ErrorCategory, ErrorKind, ParserOptions};

fn script() -> ParserOptions {
    ParserOptions::script()
}

fn module() -> ParserOptions {
    ParserOptions::module()
}

fn strict() -> ParserOptions {
    ParserOptions::script().with_strict(true)
}

fn no_web_compat() -> ParserOptions {
    ParserOptions::script().with_disable_web_compat(true)
}

fn assert_ok(source: &str, options: ParserOptions) {
    if let Err(err) = parse(source, options) {
        panic!("{source:?} should parse: {err}");
    }
}

fn error_kind(source: &str, options: ParserOptions) -> ErrorKind {
    match parse(source, options) {
        Ok(_) => panic!("{source:?} should fail"),
        Err(err) => err.kind,
    }
}

fn dup(name: &str) -> ErrorKind {
    ErrorKind::DuplicateBinding(name.to_string())
}

#[test]
fn test_use_strict_with_duplicate_parameters() {
    assert!(parse("function f(a, a) {\"use strict\"}", script()).is_err());
    assert_ok("function f(a, a) {}", script());
    assert_eq!(
        error_kind("function f(a, a) {}", strict()),
        ErrorKind::DuplicateParameter("a".into())
    );
    assert_eq!(
        error_kind("function f(a = 1) {'use strict'}", script()),
        ErrorKind::IllegalUseStrict
    );
    assert_eq!(
        error_kind("(a, a) => 1", script()),
        ErrorKind::DuplicateParameter("a".into())
    );
    assert_eq!(
        error_kind("({ m(a, a) {} })", script()),
        ErrorKind::DuplicateParameter("a".into())
    );
}

#[test]
fn test_duplicate_top_level_lexical_bindings() {
    for options in [script(), strict(), module(), no_web_compat()] {
        assert_eq!(error_kind("const a = 1; const a = 2", options), dup("a"));
        assert_eq!(error_kind("let a; var a;", options), dup("a"));
        assert_eq!(error_kind("class a {} let a;", options), dup("a"));
    }
    assert_ok("var a; var a; function a() {}", script());
}

#[test]
fn test_sibling_block_functions() {
    let source = "{ function f(){} function f(){} }";
    assert_ok(source, script());
    assert_eq!(error_kind(source, no_web_compat()), dup("f"));
    assert_eq!(error_kind(source, module()), dup("f"));
    assert_eq!(error_kind(source, strict()), dup("f"));
    assert_eq!(error_kind("{ function f(){} function* f(){} }", script()), dup("f"));
    assert_eq!(error_kind("{ async function f(){} function f(){} }", script()), dup("f"));
}

#[test]
fn test_invalid_destructuring_parameters() {
    assert!(parse("function a({x: {}.length}){}", script()).is_err());
    assert_eq!(
        error_kind("function test({...x = 1}) {}", script()),
        ErrorKind::RestWithDefault
    );
    assert_eq!(
        error_kind("function f([a], a) {}", script()),
        ErrorKind::DuplicateParameter("a".into())
    );
    assert_eq!(
        error_kind("function f({a}, {b: a}) {}", script()),
        ErrorKind::DuplicateParameter("a".into())
    );
    assert_eq!(
        error_kind("([a.b]) => 0", script()),
        ErrorKind::InvalidDestructuringTarget
    );
}

#[test]
fn test_import_call_arity() {
    assert_eq!(error_kind("import(x, y)", script()), ErrorKind::ImportCallArity);
    assert_ok("import(x, y)", script().with_next(true));
}

#[test]
fn test_strict_mode_restrictions() {
    assert_eq!(error_kind("with (a) {}", strict()), ErrorKind::StrictWith);
    assert_eq!(error_kind("delete x", strict()), ErrorKind::StrictDelete);
    assert_eq!(error_kind("010", strict()), ErrorKind::StrictOctalLiteral);
    assert_eq!(error_kind("'\\01'", strict()), ErrorKind::StrictOctalEscape);
    assert_eq!(error_kind("var eval;", strict()), ErrorKind::StrictEvalArguments);
    assert_eq!(error_kind("arguments = 1", strict()), ErrorKind::StrictEvalArguments);
    assert_eq!(
        error_kind("var interface;", strict()),
        ErrorKind::StrictReservedWord("interface".into())
    );
    assert_ok("with (a) {} delete x; 010; var eval, interface;", script());

    // A function's own directive makes its name and parameters strict.
    assert_eq!(
        error_kind("function eval() { 'use strict' }", script()),
        ErrorKind::StrictEvalArguments
    );
}

#[test]
fn test_module_goal_is_strict() {
    assert_eq!(error_kind("with (a) {}", module()), ErrorKind::StrictWith);
    assert_eq!(error_kind("var await;", module()), ErrorKind::ReservedWord("await".into()));
    assert_ok("var await;", script());
    assert_ok("await x;", module());
}

#[test]
fn test_html_comments_follow_web_compat() {
    let source = "x <!-- y\n--> z";
    assert_ok(source, script());
    // Without HTML comments the second line is `-- > z`.
    assert!(parse(source, module()).is_err());
    assert!(parse(source, no_web_compat()).is_err());
}

#[test]
fn test_labelled_function_follows_web_compat() {
    assert_ok("l: function f() {}", script());
    assert!(parse("l: function f() {}", strict()).is_err());
    assert!(parse("l: function f() {}", no_web_compat()).is_err());
}

#[test]
fn test_cover_grammar_leftovers() {
    assert_eq!(
        error_kind("({a = 1})", script()),
        ErrorKind::InvalidCoverInitializedName
    );
    assert_ok("({a = 1} = {})", script());
    assert_ok("({a = 1}) => a", script());
    assert_eq!(
        error_kind("({__proto__: 1, __proto__: 2})", script()),
        ErrorKind::DuplicateProto
    );
    assert_ok("({__proto__: a, __proto__: b} = {})", script());
    assert_eq!(error_kind("a + 1 = 2", script()), ErrorKind::InvalidAssignmentTarget);
    assert_eq!(error_kind("a?.b = 1", script()), ErrorKind::InvalidAssignmentTarget);
}

#[test]
fn test_operators() {
    assert_eq!(error_kind("-a ** 2", script()), ErrorKind::UnaryBeforeExponent);
    assert_ok("(-a) ** 2", script());
    assert_eq!(error_kind("a ?? b || c", script()), ErrorKind::MixedCoalesce);
    assert_ok("(a ?? b) || c", script());
    assert_eq!(error_kind("new a?.b()", script()), ErrorKind::OptionalChainInNew);
    assert_eq!(error_kind("a?.b`c`", script()), ErrorKind::TaggedTemplateInOptionalChain);
}

#[test]
fn test_function_context_errors() {
    assert_eq!(error_kind("return 1", script()), ErrorKind::IllegalReturn);
    assert_eq!(error_kind("new.target", script()), ErrorKind::NewTargetOutsideFunction);
    assert_ok("function f() { return () => new.target }", script());
    assert_eq!(error_kind("import.meta", script()), ErrorKind::ImportMetaOutsideModule);
    assert_ok("import.meta.url", module());
    assert_eq!(error_kind("function* g(a = yield) {}", script()), ErrorKind::YieldInParameter);
    assert_eq!(error_kind("async function f(a = await 1) {}", script()), ErrorKind::AwaitInParameter);
}

#[test]
fn test_error_positions_and_categories() {
    let err = parse("let a;\nlet a;", script()).unwrap_err();
    assert_eq!(err.kind, dup("a"));
    assert_eq!(err.offset, 11);
    assert_eq!((err.line, err.column), (2, 4));
    assert_eq!(err.kind.category(), ErrorCategory::Syntax);
    assert_eq!(err.message(), "Identifier 'a' has already been declared");

    let err = parse("x = 'abc", script()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnterminatedString);
    assert_eq!(err.kind.category(), ErrorCategory::Lexical);
    assert_eq!(err.offset, 4);
}

#[test]
fn test_generator_and_async_parameters_are_unique() {
    assert_eq!(
        error_kind("function* g(a, a) {}", script()),
        ErrorKind::DuplicateParameter("a".into())
    );
    assert_eq!(
        error_kind("async function f(a, a) {}", script()),
        ErrorKind::DuplicateParameter("a".into())
    );
    assert_eq!(
        error_kind("(async function* (a, a) {})", script()),
        ErrorKind::DuplicateParameter("a".into())
    );
    assert_ok("(function (a, a) {})", script());
}

#[test]
fn test_parenthesized_arrow_parameter_targets() {
    assert_eq!(error_kind("({a: (b) = 1}) => 0", script()), ErrorKind::ParenthesizedPattern);
    assert_eq!(error_kind("([(a)] = []) => 0", script()), ErrorKind::ParenthesizedPattern);
    assert_eq!(error_kind("((b) = 1) => 0", script()), ErrorKind::ParenthesizedPattern);
    assert_eq!(error_kind("async ([(a)] = []) => 0", script()), ErrorKind::ParenthesizedPattern);
    assert_ok("[(a)] = []; ({a: (b) = 1} = {});", script());
    assert_ok("((b) = 1, (c) => c)", script());
}

#[test]
fn test_for_of_cannot_start_with_async() {
    assert_eq!(
        error_kind("for (async of x) {}", script()),
        ErrorKind::ForOfContextualKeyword("async")
    );
    assert_ok("for (async of => {};;) break;", script());
    assert_ok("for (async in x) {}", script());
    assert_ok("async function f() { for await (async of x) ; }", script());
}
