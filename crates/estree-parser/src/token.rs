//! Token types for ECMAScript.
//!
//! Only reserved words get their own variants. Contextual words (`let`,
//! `static`, `yield`, `await`, `async`, `of`, `get`, `set`, `from`, `as`, ...)
//! are scanned as [`TokenKind::Identifier`] and interpreted by the parser.

use serde::Serialize;

use crate::span::Span;

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator appeared between the previous token and this one.
    pub newline_before: bool,
    /// The identifier was spelled with `\u` escapes. An escaped word never
    /// acts as a keyword or contextual keyword.
    pub escaped: bool,
    /// Legacy octal numeric literal (`017`, `08`), or a string containing an
    /// octal (`\012`) or `\8`/`\9` escape. Rejected in strict code.
    pub legacy_octal: bool,
    /// Offset of the first escape in a template segment that is only legal in
    /// tagged templates.
    pub invalid_escape: Option<u32>,
}

impl Token {
    /// Create a new token.
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            newline_before: false,
            escaped: false,
            legacy_octal: false,
            invalid_escape: None,
        }
    }

    /// Whether this token is the (unescaped) identifier `name`.
    #[inline]
    pub fn is_contextual(&self, name: &str) -> bool {
        !self.escaped && matches!(&self.kind, TokenKind::Identifier(id) if id == name)
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// Identifier or contextual keyword: `foo`, `let`, `async`
    Identifier(String),
    /// Private name: `#foo` (the name excludes `#`)
    PrivateName(String),
    /// String literal with escapes decoded
    String(String),
    /// Number literal: `42`, `3.14`, `0xff`, `017`
    Number(f64),
    /// BigInt literal `42n`; holds the digits without separators or suffix
    BigInt(String),
    /// Regular expression: `/pattern/flags`
    Regex { pattern: String, flags: String },
    /// A template segment. `cooked` is `None` when the segment holds an escape
    /// that is only legal in tagged templates. `tail` is set when the segment
    /// ends with a back-tick rather than `${`.
    Template {
        cooked: Option<String>,
        raw: String,
        tail: bool,
    },

    // === Keywords ===
    // Declarations
    Var,
    Const,
    Function,
    Class,
    Enum,

    // Control flow
    If,
    Else,
    Switch,
    Case,
    Default,
    For,
    While,
    Do,
    Break,
    Continue,
    Return,

    // Exception handling
    Try,
    Catch,
    Finally,
    Throw,

    // Operators as keywords
    New,
    Delete,
    Typeof,
    Void,
    In,
    Instanceof,

    // Values
    This,
    Super,
    Null,
    True,
    False,

    // Modules
    Import,
    Export,

    // Other
    Extends,
    With,
    Debugger,

    // === Punctuation ===
    // Brackets
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]

    // Delimiters
    Semicolon,  // ;
    Comma,      // ,
    Colon,      // :
    Dot,        // .
    Question,   // ?

    // Arrows and spreads
    Arrow,      // =>
    Spread,     // ...

    // Optional chaining
    QuestionDot, // ?.

    // === Operators ===
    // Assignment
    Eq,         // =
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    StarStarEq, // **=
    AmpEq,      // &=
    PipeEq,     // |=
    CaretEq,    // ^=
    LtLtEq,     // <<=
    GtGtEq,     // >>=
    GtGtGtEq,   // >>>=
    AmpAmpEq,   // &&=
    PipePipeEq, // ||=
    QuestionQuestionEq, // ??=

    // Comparison
    EqEq,       // ==
    EqEqEq,     // ===
    BangEq,     // !=
    BangEqEq,   // !==
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=

    // Arithmetic
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    StarStar,   // **
    PlusPlus,   // ++
    MinusMinus, // --

    // Bitwise
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    Tilde,      // ~
    LtLt,       // <<
    GtGt,       // >>
    GtGtGt,     // >>>

    // Logical
    AmpAmp,     // &&
    PipePipe,   // ||
    Bang,       // !
    QuestionQuestion, // ??

    // === Special ===
    /// End of file
    Eof,
}

/// The coarse token class reported to `onToken` callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenClass {
    Keyword,
    Identifier,
    PrivateName,
    Punctuator,
    Numeric,
    BigInt,
    String,
    Template,
    RegularExpression,
    Boolean,
    Null,
    #[serde(rename = "EOF")]
    Eof,
}

/// A consumed token as reported to `onToken` callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenEvent<'s> {
    #[serde(rename = "type")]
    pub class: TokenClass,
    /// The token's source text.
    pub value: &'s str,
    pub start: u32,
    pub end: u32,
}

impl TokenKind {
    /// Check if this is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.keyword_str().is_some()
    }

    /// The spelling of a reserved keyword, used where any IdentifierName is
    /// accepted (property keys, member names, export names).
    pub fn keyword_str(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Var => "var",
            TokenKind::Const => "const",
            TokenKind::Function => "function",
            TokenKind::Class => "class",
            TokenKind::Enum => "enum",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Return => "return",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Throw => "throw",
            TokenKind::New => "new",
            TokenKind::Delete => "delete",
            TokenKind::Typeof => "typeof",
            TokenKind::Void => "void",
            TokenKind::In => "in",
            TokenKind::Instanceof => "instanceof",
            TokenKind::This => "this",
            TokenKind::Super => "super",
            TokenKind::Null => "null",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Import => "import",
            TokenKind::Export => "export",
            TokenKind::Extends => "extends",
            TokenKind::With => "with",
            TokenKind::Debugger => "debugger",
            _ => return None,
        })
    }

    /// Check if this is an assignment operator.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::StarStarEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
                | TokenKind::LtLtEq
                | TokenKind::GtGtEq
                | TokenKind::GtGtGtEq
                | TokenKind::AmpAmpEq
                | TokenKind::PipePipeEq
                | TokenKind::QuestionQuestionEq
        )
    }

    /// Get the precedence of a binary operator (higher = binds tighter).
    /// Returns None if not a binary operator.
    pub fn binary_precedence(&self) -> Option<u8> {
        match self {
            TokenKind::QuestionQuestion => Some(1),
            TokenKind::PipePipe => Some(2),
            TokenKind::AmpAmp => Some(3),
            TokenKind::Pipe => Some(4),
            TokenKind::Caret => Some(5),
            TokenKind::Amp => Some(6),
            TokenKind::EqEq | TokenKind::EqEqEq | TokenKind::BangEq | TokenKind::BangEqEq => Some(7),
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq
            | TokenKind::In | TokenKind::Instanceof => Some(8),
            TokenKind::LtLt | TokenKind::GtGt | TokenKind::GtGtGt => Some(9),
            TokenKind::Plus | TokenKind::Minus => Some(10),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(11),
            TokenKind::StarStar => Some(12), // Right associative
            _ => None,
        }
    }

    /// Check if this binary operator is right associative.
    pub fn is_right_associative(&self) -> bool {
        matches!(self, TokenKind::StarStar)
    }

    /// The class reported to token callbacks.
    pub fn class(&self) -> TokenClass {
        match self {
            TokenKind::Identifier(_) => TokenClass::Identifier,
            TokenKind::PrivateName(_) => TokenClass::PrivateName,
            TokenKind::String(_) => TokenClass::String,
            TokenKind::Number(_) => TokenClass::Numeric,
            TokenKind::BigInt(_) => TokenClass::BigInt,
            TokenKind::Regex { .. } => TokenClass::RegularExpression,
            TokenKind::Template { .. } => TokenClass::Template,
            TokenKind::True | TokenKind::False => TokenClass::Boolean,
            TokenKind::Null => TokenClass::Null,
            TokenKind::Eof => TokenClass::Eof,
            kind if kind.is_keyword() => TokenClass::Keyword,
            _ => TokenClass::Punctuator,
        }
    }
}

/// Look up a reserved keyword from an identifier string.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "var" => Some(TokenKind::Var),
        "const" => Some(TokenKind::Const),
        "function" => Some(TokenKind::Function),
        "class" => Some(TokenKind::Class),
        "enum" => Some(TokenKind::Enum),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "switch" => Some(TokenKind::Switch),
        "case" => Some(TokenKind::Case),
        "default" => Some(TokenKind::Default),
        "for" => Some(TokenKind::For),
        "while" => Some(TokenKind::While),
        "do" => Some(TokenKind::Do),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "return" => Some(TokenKind::Return),
        "try" => Some(TokenKind::Try),
        "catch" => Some(TokenKind::Catch),
        "finally" => Some(TokenKind::Finally),
        "throw" => Some(TokenKind::Throw),
        "new" => Some(TokenKind::New),
        "delete" => Some(TokenKind::Delete),
        "typeof" => Some(TokenKind::Typeof),
        "void" => Some(TokenKind::Void),
        "in" => Some(TokenKind::In),
        "instanceof" => Some(TokenKind::Instanceof),
        "this" => Some(TokenKind::This),
        "super" => Some(TokenKind::Super),
        "null" => Some(TokenKind::Null),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "import" => Some(TokenKind::Import),
        "export" => Some(TokenKind::Export),
        "extends" => Some(TokenKind::Extends),
        "with" => Some(TokenKind::With),
        "debugger" => Some(TokenKind::Debugger),
        _ => None,
    }
}

/// Words that are reserved only in strict mode code.
pub fn is_strict_reserved(s: &str) -> bool {
    matches!(
        s,
        "implements"
            | "interface"
            | "let"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "static"
            | "yield"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contextual_words_are_not_keywords() {
        for word in ["let", "static", "yield", "await", "async", "of", "get", "set", "from", "as"] {
            assert_eq!(keyword_from_str(word), None, "{word}");
        }
        assert_eq!(keyword_from_str("enum"), Some(TokenKind::Enum));
    }

    #[test]
    fn test_token_classes() {
        assert_eq!(TokenKind::True.class(), TokenClass::Boolean);
        assert_eq!(TokenKind::Typeof.class(), TokenClass::Keyword);
        assert_eq!(TokenKind::Identifier("let".into()).class(), TokenClass::Identifier);
        assert_eq!(TokenKind::QuestionDot.class(), TokenClass::Punctuator);
    }

    #[test]
    fn test_escaped_identifier_is_not_contextual() {
        let mut token = Token::new(TokenKind::Identifier("async".into()), Span::new(0, 10));
        assert!(token.is_contextual("async"));
        token.escaped = true;
        assert!(!token.is_contextual("async"));
    }
}
