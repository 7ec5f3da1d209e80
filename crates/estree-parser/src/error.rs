//! Parse errors.
//!
//! Parsing is fail-fast: the first violation aborts with exactly one
//! [`ParseError`]. Each diagnostic has its own [`ErrorKind`] variant so callers
//! and tests can match on what went wrong instead of comparing strings.

use thiserror::Error;

use crate::span::LineIndex;

/// Broad classification of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A malformed token.
    Lexical,
    /// A grammar or static-semantics violation.
    Syntax,
}

/// What went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // === Lexical ===
    #[error("Invalid or unexpected token")]
    InvalidCharacter,
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated template literal")]
    UnterminatedTemplate,
    #[error("Unterminated regular expression")]
    UnterminatedRegExp,
    #[error("Unterminated comment")]
    UnterminatedComment,
    #[error("Invalid hexadecimal escape sequence")]
    InvalidHexEscape,
    #[error("Invalid Unicode escape sequence")]
    InvalidUnicodeEscape,
    #[error("Undefined Unicode code-point")]
    UnicodeEscapeOutOfRange,
    #[error("Invalid Unicode escape sequence in identifier")]
    InvalidIdentifierEscape,
    #[error("Invalid escape sequence in template")]
    InvalidTemplateEscape,
    #[error("Invalid numeric literal")]
    InvalidNumber,
    #[error("Numeric separators are not allowed here")]
    InvalidNumericSeparator,
    #[error("Identifier starts immediately after numeric literal")]
    IdentifierAfterNumber,
    #[error("Invalid BigInt syntax")]
    InvalidBigInt,
    #[error("Invalid regular expression flag '{0}'")]
    InvalidRegExpFlag(char),
    #[error("Duplicate regular expression flag '{0}'")]
    DuplicateRegExpFlag(char),
    #[error("Invalid character after '#'")]
    InvalidPrivateName,

    // === Tokens and grammar ===
    #[error("Unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Expected '{expected}', found '{found}'")]
    ExpectedToken { expected: String, found: String },
    #[error("Keywords cannot contain escaped characters")]
    EscapedKeyword,
    #[error("Unexpected reserved word '{0}'")]
    ReservedWord(String),
    #[error("Unexpected strict mode reserved word '{0}'")]
    StrictReservedWord(String),
    #[error("Unexpected eval or arguments in strict mode")]
    StrictEvalArguments,
    #[error("Octal literals are not allowed in strict mode")]
    StrictOctalLiteral,
    #[error("Octal escape sequences are not allowed in strict mode")]
    StrictOctalEscape,
    #[error("Strict mode code may not include a with statement")]
    StrictWith,
    #[error("Delete of an unqualified identifier in strict mode")]
    StrictDelete,
    #[error("In strict mode code, functions can only be declared at top level or inside a block")]
    StrictFunction,
    #[error("In non-strict mode code, functions can only be declared at top level, inside a block, or as the body of an if statement")]
    SloppyFunction,
    #[error("Illegal 'use strict' directive in function with non-simple parameter list")]
    IllegalUseStrict,
    #[error("Unary operator used immediately before exponentiation expression; parentheses are required")]
    UnaryBeforeExponent,
    #[error("Nullish coalescing operator (??) requires parentheses when mixed with '||' or '&&'")]
    MixedCoalesce,

    // === Bindings and scopes ===
    #[error("Identifier '{0}' has already been declared")]
    DuplicateBinding(String),
    #[error("Duplicate parameter name '{0}' not allowed in this context")]
    DuplicateParameter(String),
    #[error("'let' is disallowed as a lexically bound name")]
    LetInLexicalBinding,
    #[error("Lexical declaration cannot appear in a single-statement context")]
    LexicalInSingleStatement,
    #[error("Missing initializer in const declaration")]
    MissingConstInitializer,
    #[error("Missing initializer in destructuring declaration")]
    MissingDestructuringInitializer,

    // === Patterns and assignment targets ===
    #[error("Invalid left-hand side in assignment")]
    InvalidAssignmentTarget,
    #[error("Invalid left-hand side expression in {0} operation")]
    InvalidUpdateTarget(&'static str),
    #[error("Invalid destructuring assignment target")]
    InvalidDestructuringTarget,
    #[error("Invalid shorthand property initializer")]
    InvalidCoverInitializedName,
    #[error("Rest element may not have a trailing comma")]
    RestTrailingComma,
    #[error("Rest element must be last element")]
    RestNotLast,
    #[error("Rest element may not have a default initializer")]
    RestWithDefault,
    #[error("Object rest element must be an identifier or member expression")]
    InvalidObjectRest,
    #[error("Parenthesized pattern is not a valid destructuring target")]
    ParenthesizedPattern,
    #[error("Invalid arrow function parameter list")]
    InvalidArrowParameters,
    #[error("No line break is allowed before '=>'")]
    LineBreakBeforeArrow,
    #[error("'await' expressions are not allowed in formal parameters")]
    AwaitInParameter,
    #[error("'yield' expressions are not allowed in formal parameters")]
    YieldInParameter,
    #[error("Duplicate __proto__ fields are not allowed in object literals")]
    DuplicateProto,

    // === Statements ===
    #[error("Illegal return statement")]
    IllegalReturn,
    #[error("Illegal break statement")]
    IllegalBreak,
    #[error("Illegal continue statement: no surrounding iteration statement")]
    IllegalContinue,
    #[error("Illegal continue statement: '{0}' does not denote an iteration statement")]
    IllegalContinueLabel(String),
    #[error("Undefined label '{0}'")]
    UnknownLabel(String),
    #[error("Label '{0}' has already been declared")]
    DuplicateLabel(String),
    #[error("Labelled function declarations are not allowed here")]
    IllegalLabeledFunction,
    #[error("Illegal newline after throw")]
    NewlineAfterThrow,
    #[error("More than one default clause in switch statement")]
    MultipleDefaults,
    #[error("Missing catch or finally after try")]
    MissingCatchOrFinally,
    #[error("for-{0} loop variable declaration may not have an initializer")]
    ForInOfInitializer(&'static str),
    #[error("Invalid left-hand side in for-{0} loop: must have a single binding")]
    ForInOfMultipleBindings(&'static str),
    #[error("Invalid left-hand side in for-{0} loop")]
    InvalidForInOfTarget(&'static str),
    #[error("The left-hand side of a for-of loop may not be '{0}'")]
    ForOfContextualKeyword(&'static str),
    #[error("'for await' is only valid in async functions and at the top level of modules")]
    ForAwaitOutsideAsync,
    #[error("'for await' requires an 'of' loop")]
    ForAwaitNotOf,

    // === Functions and classes ===
    #[error("'await' is only valid in async functions and at the top level of modules")]
    AwaitOutsideAsync,
    #[error("new.target expression is not allowed here")]
    NewTargetOutsideFunction,
    #[error("'{meta}.{property}' is not a valid meta property")]
    InvalidMetaProperty { meta: String, property: String },
    #[error("'super' keyword unexpected here")]
    InvalidSuperProperty,
    #[error("'super' call is only valid in derived class constructors")]
    InvalidSuperCall,
    #[error("A class may only have one constructor")]
    DuplicateConstructor,
    #[error("Class constructor may not be a {0}")]
    InvalidConstructor(&'static str),
    #[error("Classes may not have a field named 'constructor'")]
    FieldNamedConstructor,
    #[error("Classes may not have a static property named 'prototype'")]
    StaticPrototype,
    #[error("Classes may not have a private element named '#constructor'")]
    PrivateConstructor,
    #[error("Private field '#{0}' has already been declared")]
    DuplicatePrivateName(String),
    #[error("Private field '#{0}' must be declared in an enclosing class")]
    UndeclaredPrivateName(String),
    #[error("Private fields can not be deleted")]
    DeletePrivateField,
    #[error("'arguments' is not allowed in class field initializers or static initialization blocks")]
    ArgumentsInClassInit,
    #[error("Getter must not have any formal parameters")]
    GetterParameters,
    #[error("Setter must have exactly one formal parameter")]
    SetterParameters,
    #[error("Setter function argument must not be a rest parameter")]
    SetterRestParameter,

    // === Optional chaining ===
    #[error("Invalid tagged template on optional chain")]
    TaggedTemplateInOptionalChain,
    #[error("Invalid optional chain from new expression")]
    OptionalChainInNew,

    // === Modules ===
    #[error("Cannot use import statement outside a module")]
    ImportOutsideModule,
    #[error("Cannot use export statement outside a module")]
    ExportOutsideModule,
    #[error("'import' and 'export' may only appear at the top level")]
    ImportExportNotTopLevel,
    #[error("Cannot use 'import.meta' outside a module")]
    ImportMetaOutsideModule,
    #[error("Duplicate export of '{0}'")]
    DuplicateExport(String),
    #[error("Export '{0}' is not defined in module")]
    UndeclaredExport(String),
    #[error("A string literal cannot be used as an exported binding without 'from'")]
    StringExportWithoutFrom,
    #[error("import() requires exactly one argument")]
    ImportCallArity,
    #[error("Cannot use new with import")]
    NewImport,
    #[error("Import attribute has duplicate key '{0}'")]
    DuplicateImportAttribute(String),
}

impl ErrorKind {
    /// Whether this diagnostic concerns a malformed token or the grammar.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCharacter
            | Self::UnterminatedString
            | Self::UnterminatedTemplate
            | Self::UnterminatedRegExp
            | Self::UnterminatedComment
            | Self::InvalidHexEscape
            | Self::InvalidUnicodeEscape
            | Self::UnicodeEscapeOutOfRange
            | Self::InvalidIdentifierEscape
            | Self::InvalidTemplateEscape
            | Self::InvalidNumber
            | Self::InvalidNumericSeparator
            | Self::IdentifierAfterNumber
            | Self::InvalidBigInt
            | Self::InvalidRegExpFlag(_)
            | Self::DuplicateRegExpFlag(_)
            | Self::InvalidPrivateName => ErrorCategory::Lexical,
            _ => ErrorCategory::Syntax,
        }
    }
}

/// A positioned, terminal parse failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{line}:{column}]: {kind}")]
pub struct ParseError {
    pub kind: ErrorKind,
    /// Byte offset of the offending source text.
    pub offset: u32,
    /// 1-based line of `offset`.
    pub line: u32,
    /// 0-based column of `offset`.
    pub column: u32,
}

impl ParseError {
    pub fn new(kind: ErrorKind, offset: u32, line: u32, column: u32) -> Self {
        Self { kind, offset, line, column }
    }

    /// An error at `offset` whose line and column are filled in later by
    /// [`ParseError::locate`].
    pub fn at(kind: ErrorKind, offset: u32) -> Self {
        Self { kind, offset, line: 0, column: 0 }
    }

    /// Resolve `line`/`column` from the offset.
    pub fn locate(mut self, index: &LineIndex) -> Self {
        let position = index.position(self.offset);
        self.line = position.line;
        self.column = position.column;
        self
    }

    /// The diagnostic text without the position prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
