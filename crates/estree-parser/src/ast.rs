//! AST node types, serialized as ESTree.
//!
//! Every node is a struct carrying its [`Span`] and serializes as an ESTree
//! object: `"type"` first, then the node's fields in camelCase, then `start`,
//! `end` and (when locations were requested) `loc`. The sum types
//! ([`Statement`], [`Expression`], [`Pattern`], ...) are untagged; each
//! variant boxes a node that names its own type.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::options::SourceType;
use crate::span::Span;

/// Access to a node's span.
pub trait GetSpan {
    fn span(&self) -> Span;
}

macro_rules! impl_get_span {
    ($($node:ty),* $(,)?) => {
        $(
            impl GetSpan for $node {
                #[inline]
                fn span(&self) -> Span {
                    self.span
                }
            }
        )*
    };
}

macro_rules! impl_get_span_enum {
    ($name:ident { $($variant:ident),* $(,)? }) => {
        impl GetSpan for $name {
            fn span(&self) -> Span {
                match self {
                    $($name::$variant(node) => node.span(),)*
                }
            }
        }
    };
}

/// The root node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Program", rename_all = "camelCase")]
pub struct Program {
    pub body: Vec<Statement>,
    pub source_type: SourceType,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Statements
// =============================================================================

/// A statement or declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statement {
    Expression(Box<ExpressionStatement>),
    Block(Box<BlockStatement>),
    Empty(Box<EmptyStatement>),
    Debugger(Box<DebuggerStatement>),
    With(Box<WithStatement>),
    Return(Box<ReturnStatement>),
    Labeled(Box<LabeledStatement>),
    Break(Box<BreakStatement>),
    Continue(Box<ContinueStatement>),
    If(Box<IfStatement>),
    Switch(Box<SwitchStatement>),
    Throw(Box<ThrowStatement>),
    Try(Box<TryStatement>),
    While(Box<WhileStatement>),
    DoWhile(Box<DoWhileStatement>),
    For(Box<ForStatement>),
    ForIn(Box<ForInStatement>),
    ForOf(Box<ForOfStatement>),
    Function(Box<Function>),
    Variable(Box<VariableDeclaration>),
    Class(Box<Class>),
    Import(Box<ImportDeclaration>),
    ExportNamed(Box<ExportNamedDeclaration>),
    ExportDefault(Box<ExportDefaultDeclaration>),
    ExportAll(Box<ExportAllDeclaration>),
}

impl_get_span_enum!(Statement {
    Expression, Block, Empty, Debugger, With, Return, Labeled, Break, Continue, If, Switch,
    Throw, Try, While, DoWhile, For, ForIn, ForOf, Function, Variable, Class, Import,
    ExportNamed, ExportDefault, ExportAll,
});

/// An expression statement, or a directive when `directive` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ExpressionStatement")]
pub struct ExpressionStatement {
    pub expression: Expression,
    /// The raw directive text without quotes, for directive prologue entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "BlockStatement")]
pub struct BlockStatement {
    pub body: Vec<Statement>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "EmptyStatement")]
pub struct EmptyStatement {
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "DebuggerStatement")]
pub struct DebuggerStatement {
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "WithStatement")]
pub struct WithStatement {
    pub object: Expression,
    pub body: Statement,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ReturnStatement")]
pub struct ReturnStatement {
    pub argument: Option<Expression>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "LabeledStatement")]
pub struct LabeledStatement {
    pub label: Identifier,
    pub body: Statement,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "BreakStatement")]
pub struct BreakStatement {
    pub label: Option<Identifier>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ContinueStatement")]
pub struct ContinueStatement {
    pub label: Option<Identifier>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "IfStatement")]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Statement,
    pub alternate: Option<Statement>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "SwitchStatement")]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
    #[serde(flatten)]
    pub span: Span,
}

/// `case test:` or, with no test, `default:`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "SwitchCase")]
pub struct SwitchCase {
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ThrowStatement")]
pub struct ThrowStatement {
    pub argument: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TryStatement")]
pub struct TryStatement {
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "CatchClause")]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: BlockStatement,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "WhileStatement")]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Statement,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "DoWhileStatement")]
pub struct DoWhileStatement {
    pub body: Statement,
    pub test: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ForStatement")]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Statement,
    #[serde(flatten)]
    pub span: Span,
}

/// The first clause of a C-style `for` head.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForInit {
    Variable(Box<VariableDeclaration>),
    Expression(Expression),
}

impl GetSpan for ForInit {
    fn span(&self) -> Span {
        match self {
            ForInit::Variable(decl) => decl.span,
            ForInit::Expression(expr) => expr.span(),
        }
    }
}

/// The left side of a `for-in` or `for-of` head.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForTarget {
    Variable(Box<VariableDeclaration>),
    Pattern(Pattern),
}

impl GetSpan for ForTarget {
    fn span(&self) -> Span {
        match self {
            ForTarget::Variable(decl) => decl.span,
            ForTarget::Pattern(pattern) => pattern.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ForInStatement")]
pub struct ForInStatement {
    pub left: ForTarget,
    pub right: Expression,
    pub body: Statement,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ForOfStatement")]
pub struct ForOfStatement {
    #[serde(rename = "await")]
    pub is_await: bool,
    pub left: ForTarget,
    pub right: Expression,
    pub body: Statement,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "VariableDeclaration")]
pub struct VariableDeclaration {
    pub declarations: Vec<VariableDeclarator>,
    pub kind: VariableKind,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "VariableDeclarator")]
pub struct VariableDeclarator {
    pub id: Pattern,
    pub init: Option<Expression>,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Functions and classes
// =============================================================================

/// Which ESTree node a [`Function`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionKind {
    FunctionDeclaration,
    FunctionExpression,
}

/// A function declaration, function expression or method value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    #[serde(rename = "type")]
    pub kind: FunctionKind,
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ArrowFunctionExpression")]
pub struct ArrowFunctionExpression {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: ArrowBody,
    /// The body is an expression rather than a block.
    pub expression: bool,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrowBody {
    Block(Box<BlockStatement>),
    Expression(Expression),
}

/// Which ESTree node a [`Class`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassKind {
    ClassDeclaration,
    ClassExpression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(rename = "type")]
    pub kind: ClassKind,
    pub id: Option<Identifier>,
    pub super_class: Option<Expression>,
    pub body: ClassBody,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ClassBody")]
pub struct ClassBody {
    pub body: Vec<ClassElement>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassElement {
    Method(Box<MethodDefinition>),
    Property(Box<PropertyDefinition>),
    StaticBlock(Box<StaticBlock>),
}

impl_get_span_enum!(ClassElement { Method, Property, StaticBlock });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "MethodDefinition")]
pub struct MethodDefinition {
    pub key: Expression,
    pub value: Box<Function>,
    pub kind: MethodKind,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "PropertyDefinition")]
pub struct PropertyDefinition {
    pub key: Expression,
    pub value: Option<Expression>,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "StaticBlock")]
pub struct StaticBlock {
    pub body: Vec<Statement>,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Modules
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportDeclaration")]
pub struct ImportDeclaration {
    pub specifiers: Vec<ImportDeclarationSpecifier>,
    pub source: Literal,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ImportAttribute>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportDeclarationSpecifier {
    Named(Box<ImportSpecifier>),
    Default(Box<ImportDefaultSpecifier>),
    Namespace(Box<ImportNamespaceSpecifier>),
}

impl_get_span_enum!(ImportDeclarationSpecifier { Named, Default, Namespace });

/// `imported as local`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportSpecifier")]
pub struct ImportSpecifier {
    pub imported: ModuleExportName,
    pub local: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportDefaultSpecifier")]
pub struct ImportDefaultSpecifier {
    pub local: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportNamespaceSpecifier")]
pub struct ImportNamespaceSpecifier {
    pub local: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

/// `with { type: "json" }` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportAttribute")]
pub struct ImportAttribute {
    pub key: ModuleExportName,
    pub value: Literal,
    #[serde(flatten)]
    pub span: Span,
}

/// An identifier or string literal naming an import or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleExportName {
    Identifier(Identifier),
    String(Literal),
}

impl ModuleExportName {
    /// The name as a string value.
    pub fn name(&self) -> &str {
        match self {
            ModuleExportName::Identifier(id) => &id.name,
            ModuleExportName::String(lit) => match &lit.value {
                LiteralValue::String(s) => s,
                _ => "",
            },
        }
    }
}

impl GetSpan for ModuleExportName {
    fn span(&self) -> Span {
        match self {
            ModuleExportName::Identifier(id) => id.span,
            ModuleExportName::String(lit) => lit.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ExportNamedDeclaration")]
pub struct ExportNamedDeclaration {
    pub declaration: Option<Statement>,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<Literal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ImportAttribute>,
    #[serde(flatten)]
    pub span: Span,
}

/// `local as exported`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ExportSpecifier")]
pub struct ExportSpecifier {
    pub local: ModuleExportName,
    pub exported: ModuleExportName,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ExportDefaultDeclaration")]
pub struct ExportDefaultDeclaration {
    pub declaration: ExportDefaultKind,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportDefaultKind {
    Function(Box<Function>),
    Class(Box<Class>),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ExportAllDeclaration")]
pub struct ExportAllDeclaration {
    pub exported: Option<ModuleExportName>,
    pub source: Literal,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ImportAttribute>,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Expressions
// =============================================================================

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expression {
    Identifier(Box<Identifier>),
    /// `#x` as a class element key, member property, or left of `in`.
    PrivateIdentifier(Box<PrivateIdentifier>),
    Literal(Box<Literal>),
    This(Box<ThisExpression>),
    Super(Box<Super>),
    Array(Box<ArrayExpression>),
    Object(Box<ObjectExpression>),
    Function(Box<Function>),
    Arrow(Box<ArrowFunctionExpression>),
    Class(Box<Class>),
    Template(Box<TemplateLiteral>),
    TaggedTemplate(Box<TaggedTemplateExpression>),
    Member(Box<MemberExpression>),
    Call(Box<CallExpression>),
    New(Box<NewExpression>),
    Chain(Box<ChainExpression>),
    Update(Box<UpdateExpression>),
    Unary(Box<UnaryExpression>),
    Binary(Box<BinaryExpression>),
    Logical(Box<LogicalExpression>),
    Conditional(Box<ConditionalExpression>),
    Assignment(Box<AssignmentExpression>),
    Sequence(Box<SequenceExpression>),
    Yield(Box<YieldExpression>),
    Await(Box<AwaitExpression>),
    Import(Box<ImportExpression>),
    MetaProperty(Box<MetaProperty>),
    /// Kept for the cover grammar; serialized as the inner expression.
    Parenthesized(Box<ParenthesizedExpression>),
}

impl_get_span_enum!(Expression {
    Identifier, PrivateIdentifier, Literal, This, Super, Array, Object, Function, Arrow, Class,
    Template, TaggedTemplate, Member, Call, New, Chain, Update, Unary, Binary, Logical,
    Conditional, Assignment, Sequence, Yield, Await, Import, MetaProperty, Parenthesized,
});

impl Expression {
    /// Strip any number of enclosing parentheses.
    pub fn without_parentheses(&self) -> &Expression {
        let mut expr = self;
        while let Expression::Parenthesized(paren) = expr {
            expr = &paren.expression;
        }
        expr
    }

    /// Returns `true` if this is the identifier `name` (not parenthesized).
    pub fn is_identifier(&self, name: &str) -> bool {
        matches!(self, Expression::Identifier(id) if id.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "Identifier")]
pub struct Identifier {
    pub name: String,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "PrivateIdentifier")]
pub struct PrivateIdentifier {
    pub name: String,
    #[serde(flatten)]
    pub span: Span,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    /// Source text, attached when the `raw` option is set.
    pub raw: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    /// Digits without the `n` suffix.
    BigInt(String),
    RegExp { pattern: String, flags: String },
}

#[derive(Serialize)]
struct RegExpValue<'a> {
    pattern: &'a str,
    flags: &'a str,
}

/// Numbers that are integral and exactly representable print as integers.
fn serialize_number<M: SerializeMap>(map: &mut M, value: f64) -> Result<(), M::Error> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE && !(value == 0.0 && value.is_sign_negative()) {
        map.serialize_entry("value", &(value as i64))
    } else {
        map.serialize_entry("value", &value)
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "Literal")?;
        match &self.value {
            LiteralValue::Null => map.serialize_entry("value", &())?,
            LiteralValue::Boolean(b) => map.serialize_entry("value", b)?,
            LiteralValue::Number(n) => serialize_number(&mut map, *n)?,
            LiteralValue::String(s) => map.serialize_entry("value", s)?,
            LiteralValue::BigInt(digits) => {
                map.serialize_entry("value", &())?;
                map.serialize_entry("bigint", digits)?;
            }
            LiteralValue::RegExp { pattern, flags } => {
                map.serialize_entry("value", &())?;
                map.serialize_entry("regex", &RegExpValue { pattern, flags })?;
            }
        }
        if let Some(raw) = &self.raw {
            map.serialize_entry("raw", raw)?;
        }
        map.serialize_entry("start", &self.span.start)?;
        map.serialize_entry("end", &self.span.end)?;
        if let Some(loc) = &self.span.loc {
            map.serialize_entry("loc", loc)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ThisExpression")]
pub struct ThisExpression {
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Super")]
pub struct Super {
    #[serde(flatten)]
    pub span: Span,
}

/// `[a, , ...b]`; holes are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ArrayExpression")]
pub struct ArrayExpression {
    pub elements: Vec<Option<ExpressionOrSpread>>,
    /// Offset of a comma directly after a final spread element. Such a
    /// literal can never become a pattern.
    #[serde(skip)]
    pub trailing_comma: Option<u32>,
    #[serde(flatten)]
    pub span: Span,
}

/// An array element or call argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExpressionOrSpread {
    Expression(Expression),
    Spread(Box<SpreadElement>),
}

impl GetSpan for ExpressionOrSpread {
    fn span(&self) -> Span {
        match self {
            ExpressionOrSpread::Expression(expr) => expr.span(),
            ExpressionOrSpread::Spread(spread) => spread.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "SpreadElement")]
pub struct SpreadElement {
    pub argument: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ObjectExpression")]
pub struct ObjectExpression {
    pub properties: Vec<ObjectMember>,
    /// Offset of a comma directly after a final spread property.
    #[serde(skip)]
    pub trailing_comma: Option<u32>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectMember {
    Property(Box<Property>),
    Spread(Box<SpreadElement>),
}

impl_get_span_enum!(ObjectMember { Property, Spread });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// An object literal property. A shorthand with an initializer (`{a = 1}`)
/// is only valid once the object is reinterpreted as a pattern; until then
/// its value is the assignment `a = 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Property")]
pub struct Property {
    pub key: Expression,
    pub value: Expression,
    pub kind: PropertyKind,
    pub method: bool,
    pub shorthand: bool,
    pub computed: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TemplateLiteral")]
pub struct TemplateLiteral {
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expression>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TemplateElement")]
pub struct TemplateElement {
    pub value: TemplateValue,
    pub tail: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateValue {
    pub raw: String,
    /// `None` for a tagged template segment holding an invalid escape.
    pub cooked: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TaggedTemplateExpression")]
pub struct TaggedTemplateExpression {
    pub tag: Expression,
    pub quasi: TemplateLiteral,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "MemberExpression")]
pub struct MemberExpression {
    pub object: Expression,
    pub property: Expression,
    pub computed: bool,
    pub optional: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "CallExpression")]
pub struct CallExpression {
    pub callee: Expression,
    pub arguments: Vec<ExpressionOrSpread>,
    pub optional: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "NewExpression")]
pub struct NewExpression {
    pub callee: Expression,
    pub arguments: Vec<ExpressionOrSpread>,
    #[serde(flatten)]
    pub span: Span,
}

/// Wraps an optional chain `a?.b.c()` at its outermost link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ChainExpression")]
pub struct ChainExpression {
    pub expression: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "UpdateExpression")]
pub struct UpdateExpression {
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "UnaryExpression")]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub prefix: bool,
    pub argument: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "BinaryExpression")]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Expression,
    pub right: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "LogicalExpression")]
pub struct LogicalExpression {
    pub operator: LogicalOperator,
    pub left: Expression,
    pub right: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ConditionalExpression")]
pub struct ConditionalExpression {
    pub test: Expression,
    pub consequent: Expression,
    pub alternate: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "AssignmentExpression")]
pub struct AssignmentExpression {
    pub operator: AssignmentOperator,
    pub left: Pattern,
    pub right: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "SequenceExpression")]
pub struct SequenceExpression {
    pub expressions: Vec<Expression>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "YieldExpression")]
pub struct YieldExpression {
    pub argument: Option<Expression>,
    pub delegate: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "AwaitExpression")]
pub struct AwaitExpression {
    pub argument: Expression,
    #[serde(flatten)]
    pub span: Span,
}

/// `import(source)` or, with staged grammar, `import(source, options)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportExpression")]
pub struct ImportExpression {
    pub source: Expression,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Expression>,
    #[serde(flatten)]
    pub span: Span,
}

/// `new.target` or `import.meta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "MetaProperty")]
pub struct MetaProperty {
    pub meta: Identifier,
    pub property: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

/// `( expression )`. ESTree has no such node, so this serializes as the
/// inner expression; the parser keeps it to tell `(a) = 1` from `({a}) = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpression {
    pub expression: Expression,
    pub span: Span,
}

impl Serialize for ParenthesizedExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.expression.serialize(serializer)
    }
}

// =============================================================================
// Patterns
// =============================================================================

/// A binding or assignment target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Pattern {
    Identifier(Box<Identifier>),
    /// Only valid as an assignment target, never as a binding.
    Member(Box<MemberExpression>),
    Array(Box<ArrayPattern>),
    Object(Box<ObjectPattern>),
    Assignment(Box<AssignmentPattern>),
    Rest(Box<RestElement>),
}

impl_get_span_enum!(Pattern { Identifier, Member, Array, Object, Assignment, Rest });

impl Pattern {
    /// Collect the names bound by this pattern, in source order.
    pub fn bound_names<'a>(&'a self, out: &mut Vec<&'a Identifier>) {
        match self {
            Pattern::Identifier(id) => out.push(id),
            Pattern::Member(_) => {}
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    element.bound_names(out);
                }
            }
            Pattern::Object(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPatternProperty::Property(prop) => prop.value.bound_names(out),
                        ObjectPatternProperty::Rest(rest) => rest.argument.bound_names(out),
                    }
                }
            }
            Pattern::Assignment(assign) => assign.left.bound_names(out),
            Pattern::Rest(rest) => rest.argument.bound_names(out),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ArrayPattern")]
pub struct ArrayPattern {
    pub elements: Vec<Option<Pattern>>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ObjectPattern")]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectPatternProperty {
    Property(Box<AssignmentProperty>),
    Rest(Box<RestElement>),
}

impl_get_span_enum!(ObjectPatternProperty { Property, Rest });

/// A property inside an object pattern; ESTree calls it `Property` with
/// `kind: "init"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Property")]
pub struct AssignmentProperty {
    pub key: Expression,
    pub value: Pattern,
    pub kind: PropertyKind,
    pub method: bool,
    pub shorthand: bool,
    pub computed: bool,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "AssignmentPattern")]
pub struct AssignmentPattern {
    pub left: Pattern,
    pub right: Expression,
    #[serde(flatten)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "RestElement")]
pub struct RestElement {
    pub argument: Pattern,
    #[serde(flatten)]
    pub span: Span,
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "~")]
    BitNot,
    #[serde(rename = "typeof")]
    Typeof,
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "delete")]
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateOperator {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "===")]
    StrictEq,
    #[serde(rename = "!==")]
    StrictNotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<<")]
    Shl,
    #[serde(rename = ">>")]
    Shr,
    #[serde(rename = ">>>")]
    UShr,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "**")]
    Exp,
    #[serde(rename = "|")]
    BitOr,
    #[serde(rename = "^")]
    BitXor,
    #[serde(rename = "&")]
    BitAnd,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    Instanceof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOperator {
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "??")]
    Coalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignmentOperator {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    Add,
    #[serde(rename = "-=")]
    Sub,
    #[serde(rename = "*=")]
    Mul,
    #[serde(rename = "/=")]
    Div,
    #[serde(rename = "%=")]
    Mod,
    #[serde(rename = "**=")]
    Exp,
    #[serde(rename = "<<=")]
    Shl,
    #[serde(rename = ">>=")]
    Shr,
    #[serde(rename = ">>>=")]
    UShr,
    #[serde(rename = "|=")]
    BitOr,
    #[serde(rename = "^=")]
    BitXor,
    #[serde(rename = "&=")]
    BitAnd,
    #[serde(rename = "||=")]
    Or,
    #[serde(rename = "&&=")]
    And,
    #[serde(rename = "??=")]
    Coalesce,
}

impl_get_span!(
    Program,
    ExpressionStatement,
    BlockStatement,
    EmptyStatement,
    DebuggerStatement,
    WithStatement,
    ReturnStatement,
    LabeledStatement,
    BreakStatement,
    ContinueStatement,
    IfStatement,
    SwitchStatement,
    SwitchCase,
    ThrowStatement,
    TryStatement,
    CatchClause,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    VariableDeclaration,
    VariableDeclarator,
    Function,
    ArrowFunctionExpression,
    Class,
    ClassBody,
    MethodDefinition,
    PropertyDefinition,
    StaticBlock,
    ImportDeclaration,
    ImportSpecifier,
    ImportDefaultSpecifier,
    ImportNamespaceSpecifier,
    ImportAttribute,
    ExportNamedDeclaration,
    ExportSpecifier,
    ExportDefaultDeclaration,
    ExportAllDeclaration,
    Identifier,
    PrivateIdentifier,
    Literal,
    ThisExpression,
    Super,
    ArrayExpression,
    SpreadElement,
    ObjectExpression,
    Property,
    TemplateLiteral,
    TemplateElement,
    TaggedTemplateExpression,
    MemberExpression,
    CallExpression,
    NewExpression,
    ChainExpression,
    UpdateExpression,
    UnaryExpression,
    BinaryExpression,
    LogicalExpression,
    ConditionalExpression,
    AssignmentExpression,
    SequenceExpression,
    YieldExpression,
    AwaitExpression,
    ImportExpression,
    MetaProperty,
    ParenthesizedExpression,
    ArrayPattern,
    ObjectPattern,
    AssignmentProperty,
    AssignmentPattern,
    RestElement,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Position, SourceLocation};
    use serde_json::json;

    fn ident(name: &str, start: u32) -> Identifier {
        Identifier { name: name.into(), span: Span::new(start, start + name.len() as u32) }
    }

    fn number(value: f64, start: u32, end: u32) -> Literal {
        Literal { value: LiteralValue::Number(value), raw: None, span: Span::new(start, end) }
    }

    #[test]
    fn test_identifier_shape() {
        assert_eq!(
            serde_json::to_value(ident("arg", 11)).unwrap(),
            json!({"type": "Identifier", "name": "arg", "start": 11, "end": 14})
        );
    }

    #[test]
    fn test_integral_numbers_print_as_integers() {
        let value = serde_json::to_value(number(42.0, 0, 2)).unwrap();
        assert_eq!(value["value"], json!(42));
        let value = serde_json::to_value(number(0.5, 0, 3)).unwrap();
        assert_eq!(value["value"], json!(0.5));
    }

    #[test]
    fn test_regex_and_bigint_literals() {
        let regex = Literal {
            value: LiteralValue::RegExp { pattern: "a+".into(), flags: "g".into() },
            raw: Some("/a+/g".into()),
            span: Span::new(0, 5),
        };
        assert_eq!(
            serde_json::to_value(regex).unwrap(),
            json!({
                "type": "Literal",
                "value": null,
                "regex": {"pattern": "a+", "flags": "g"},
                "raw": "/a+/g",
                "start": 0,
                "end": 5,
            })
        );

        let bigint = Literal {
            value: LiteralValue::BigInt("10".into()),
            raw: None,
            span: Span::new(0, 3),
        };
        let value = serde_json::to_value(bigint).unwrap();
        assert_eq!(value["value"], json!(null));
        assert_eq!(value["bigint"], json!("10"));
    }

    #[test]
    fn test_parenthesized_is_transparent() {
        let inner = Expression::Identifier(Box::new(ident("a", 1)));
        let paren = Expression::Parenthesized(Box::new(ParenthesizedExpression {
            expression: inner.clone(),
            span: Span::new(0, 3),
        }));
        assert_eq!(serde_json::to_value(&paren).unwrap(), serde_json::to_value(&inner).unwrap());
        assert_eq!(paren.span(), Span::new(0, 3));
        assert_eq!(paren.without_parentheses(), &inner);
    }

    #[test]
    fn test_loc_is_emitted_only_when_present() {
        let mut id = ident("x", 0);
        assert!(serde_json::to_value(&id).unwrap().get("loc").is_none());
        id.span.loc = Some(SourceLocation { start: Position::new(1, 0), end: Position::new(1, 1) });
        assert_eq!(
            serde_json::to_value(&id).unwrap()["loc"],
            json!({"start": {"line": 1, "column": 0}, "end": {"line": 1, "column": 1}})
        );
    }

    #[test]
    fn test_function_type_comes_from_kind() {
        let function = Function {
            kind: FunctionKind::FunctionDeclaration,
            id: Some(ident("f", 9)),
            params: vec![],
            body: BlockStatement { body: vec![], span: Span::new(13, 15) },
            generator: false,
            is_async: false,
            span: Span::new(0, 15),
        };
        let value = serde_json::to_value(function).unwrap();
        assert_eq!(value["type"], json!("FunctionDeclaration"));
        assert_eq!(value["async"], json!(false));
        assert_eq!(value["body"]["type"], json!("BlockStatement"));
    }

    #[test]
    fn test_operators_serialize_as_source_text() {
        assert_eq!(serde_json::to_value(BinaryOperator::UShr).unwrap(), json!(">>>"));
        assert_eq!(serde_json::to_value(AssignmentOperator::Coalesce).unwrap(), json!("??="));
        assert_eq!(serde_json::to_value(UnaryOperator::Typeof).unwrap(), json!("typeof"));
    }

    #[test]
    fn test_bound_names() {
        let pattern = Pattern::Array(Box::new(ArrayPattern {
            elements: vec![
                Some(Pattern::Identifier(Box::new(ident("a", 1)))),
                None,
                Some(Pattern::Rest(Box::new(RestElement {
                    argument: Pattern::Identifier(Box::new(ident("b", 8))),
                    span: Span::new(5, 9),
                }))),
            ],
            span: Span::new(0, 10),
        }));
        let mut names = Vec::new();
        pattern.bound_names(&mut names);
        let names: Vec<&str> = names.iter().map(|id| id.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
