//! Lexer (tokenizer) for ECMAScript.
//!
//! The lexer converts source text into a stream of tokens. It's called
//! on-demand by the parser, not upfront, which enables context-sensitive
//! tokenization: `/` is always scanned as division and the parser asks for
//! [`Lexer::rescan_regex`] when it sits at the start of an expression, and a
//! `}` that closes a template substitution is rescanned with
//! [`Lexer::rescan_template_continuation`].

use unicode_ident::{is_xid_continue, is_xid_start};

use crate::error::{ErrorKind, ParseError, Result};
use crate::span::Span;
use crate::token::{keyword_from_str, Token, TokenKind};

/// The lexer state.
#[derive(Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    /// Source code as bytes (for fast indexing).
    bytes: &'a [u8],
    /// Current byte position.
    pos: usize,
    /// Start position of the current token.
    token_start: usize,
    /// Recognise `<!--` and `-->` comments (script goal with web compat).
    html_comments: bool,
    /// Whether any token has been produced yet.
    seen_token: bool,

    // Per-token flags, reset before each scan.
    newline_before: bool,
    escaped: bool,
    legacy_octal: bool,
    invalid_escape: Option<u32>,
}

/// A decoded escape sequence.
enum Escape {
    /// A code point, possibly a lone surrogate half.
    CodePoint(u32),
    /// Octal escape (`\012`, `\0` followed by a digit) or `\8` / `\9`.
    Legacy(u32),
    /// Backslash followed by a line terminator.
    LineContinuation,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            token_start: 0,
            html_comments: false,
            seen_token: false,
            newline_before: false,
            escaped: false,
            legacy_octal: false,
            invalid_escape: None,
        }
    }

    /// Enable HTML-like comments.
    #[must_use]
    pub fn with_html_comments(mut self, enabled: bool) -> Self {
        self.html_comments = enabled;
        self
    }

    /// Get the current byte position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The source text being scanned.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.reset_token_flags();
        self.skip_trivia()?;
        self.token_start = self.pos;

        if self.is_eof() {
            return Ok(self.make_token(TokenKind::Eof));
        }

        let ch = self.current();
        let kind = match ch {
            // Identifiers and keywords
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | b'\\' => self.scan_identifier_or_keyword()?,

            // Numbers
            b'0'..=b'9' => self.scan_number()?,

            // Strings
            b'"' | b'\'' => self.scan_string(ch)?,

            // Template literals
            b'`' => {
                self.advance();
                self.scan_template_segment()?
            }

            // Private names
            b'#' => self.scan_private_name()?,

            // Punctuation and operators
            b'(' => { self.advance(); TokenKind::LParen }
            b')' => { self.advance(); TokenKind::RParen }
            b'{' => { self.advance(); TokenKind::LBrace }
            b'}' => { self.advance(); TokenKind::RBrace }
            b'[' => { self.advance(); TokenKind::LBracket }
            b']' => { self.advance(); TokenKind::RBracket }
            b';' => { self.advance(); TokenKind::Semicolon }
            b',' => { self.advance(); TokenKind::Comma }
            b':' => { self.advance(); TokenKind::Colon }
            b'~' => { self.advance(); TokenKind::Tilde }

            b'.' => self.scan_dot()?,
            b'?' => self.scan_question(),
            b'+' => self.scan_plus(),
            b'-' => self.scan_minus(),
            b'*' => self.scan_star(),
            b'/' => self.scan_slash(),
            b'%' => self.scan_percent(),
            b'=' => self.scan_equals(),
            b'!' => self.scan_bang(),
            b'<' => self.scan_less_than(),
            b'>' => self.scan_greater_than(),
            b'&' => self.scan_ampersand(),
            b'|' => self.scan_pipe(),
            b'^' => self.scan_caret(),

            _ if ch >= 0x80 && is_id_start(self.current_char()) => self.scan_identifier_or_keyword()?,

            _ => return Err(self.error(ErrorKind::InvalidCharacter, self.pos)),
        };

        Ok(self.make_token(kind))
    }

    /// Rescan a `/` or `/=` token as a regular expression literal.
    pub fn rescan_regex(&mut self, token: &Token) -> Result<Token> {
        self.reset_token_flags();
        self.newline_before = token.newline_before;
        self.token_start = token.span.start as usize;
        self.pos = self.token_start + 1;

        let mut in_class = false;
        loop {
            if self.is_eof() {
                return Err(self.error(ErrorKind::UnterminatedRegExp, self.token_start));
            }
            let c = self.current_char();
            if is_line_terminator(c) {
                return Err(self.error(ErrorKind::UnterminatedRegExp, self.token_start));
            }
            self.pos += c.len_utf8();
            match c {
                '\\' => {
                    if self.is_eof() || is_line_terminator(self.current_char()) {
                        return Err(self.error(ErrorKind::UnterminatedRegExp, self.token_start));
                    }
                    self.pos += self.current_char().len_utf8();
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        let pattern = self.slice(self.token_start + 1, self.pos - 1).to_string();

        // Scan flags
        let flags_start = self.pos;
        let mut seen = [false; 8];
        while !self.is_eof() {
            let c = self.current_char();
            if c == '\\' {
                return Err(self.error(ErrorKind::InvalidRegExpFlag(c), self.pos));
            }
            if !is_id_continue(c) {
                break;
            }
            let Some(index) = "dgimsuyv".find(c) else {
                return Err(self.error(ErrorKind::InvalidRegExpFlag(c), self.pos));
            };
            if seen[index] {
                return Err(self.error(ErrorKind::DuplicateRegExpFlag(c), self.pos));
            }
            seen[index] = true;
            self.pos += c.len_utf8();
        }
        // `u` and `v` are mutually exclusive
        if seen[5] && seen[7] {
            return Err(self.error(ErrorKind::InvalidRegExpFlag('v'), flags_start));
        }
        let flags = self.slice(flags_start, self.pos).to_string();

        Ok(self.make_token(TokenKind::Regex { pattern, flags }))
    }

    /// Scan template middle or tail, starting at the `}` that closed a
    /// substitution.
    pub fn rescan_template_continuation(&mut self, rbrace: &Token) -> Result<Token> {
        self.reset_token_flags();
        self.newline_before = rbrace.newline_before;
        self.token_start = rbrace.span.start as usize;
        self.pos = self.token_start + 1;
        let kind = self.scan_template_segment()?;
        Ok(self.make_token(kind))
    }

    // === Helper methods ===

    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn current(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_char(&self) -> u8 {
        self.bytes.get(self.pos + 1).copied().unwrap_or(0)
    }

    /// The (possibly multi-byte) character at the cursor.
    fn current_char(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    fn starts_with(&self, s: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(s)
    }

    fn reset_token_flags(&mut self) {
        self.newline_before = false;
        self.escaped = false;
        self.legacy_octal = false;
        self.invalid_escape = None;
    }

    fn make_token(&mut self, kind: TokenKind) -> Token {
        self.seen_token = true;
        Token {
            kind,
            span: Span::new(self.token_start as u32, self.pos as u32),
            newline_before: self.newline_before,
            escaped: self.escaped,
            legacy_octal: self.legacy_octal,
            invalid_escape: self.invalid_escape,
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    fn error(&self, kind: ErrorKind, offset: usize) -> ParseError {
        ParseError::at(kind, offset as u32)
    }

    // === Whitespace and comments ===

    fn skip_trivia(&mut self) -> Result<()> {
        if self.pos == 0 && self.starts_with(b"#!") {
            self.skip_line_comment(2);
        }
        loop {
            match self.current() {
                b' ' | b'\t' | 0x0B | 0x0C => self.advance(),
                b'\n' | b'\r' => {
                    self.advance();
                    self.newline_before = true;
                }
                b'/' if self.peek_char() == b'/' => self.skip_line_comment(2),
                b'/' if self.peek_char() == b'*' => self.skip_block_comment()?,
                b'<' if self.html_comments && self.starts_with(b"<!--") => self.skip_line_comment(4),
                b'-' if self.html_comments
                    && (self.newline_before || !self.seen_token)
                    && self.starts_with(b"-->") =>
                {
                    self.skip_line_comment(3)
                }
                b if b >= 0x80 => {
                    let c = self.current_char();
                    if is_line_terminator(c) {
                        self.newline_before = true;
                    } else if !is_whitespace(c) {
                        break;
                    }
                    self.advance_n(c.len_utf8());
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self, opener: usize) {
        self.advance_n(opener);
        while !self.is_eof() {
            match self.current() {
                b'\n' | b'\r' => return,
                0xE2 if self.starts_with("\u{2028}".as_bytes()) || self.starts_with("\u{2029}".as_bytes()) => return,
                _ => self.advance(),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let start = self.pos;
        self.advance_n(2); // Skip /*
        while !self.is_eof() {
            match self.current() {
                b'*' if self.peek_char() == b'/' => {
                    self.advance_n(2);
                    return Ok(());
                }
                b'\n' | b'\r' => self.newline_before = true,
                0xE2 if self.starts_with("\u{2028}".as_bytes()) || self.starts_with("\u{2029}".as_bytes()) => {
                    self.newline_before = true
                }
                _ => {}
            }
            self.advance();
        }
        Err(self.error(ErrorKind::UnterminatedComment, start))
    }

    // === Token scanning ===

    fn scan_identifier_or_keyword(&mut self) -> Result<TokenKind> {
        let name = self.scan_identifier_name()?;
        if self.escaped {
            // An escaped reserved word is still an IdentifierName; the parser
            // rejects it wherever a keyword or binding is required.
            return Ok(TokenKind::Identifier(name));
        }
        Ok(keyword_from_str(&name).unwrap_or(TokenKind::Identifier(name)))
    }

    fn scan_identifier_name(&mut self) -> Result<String> {
        let mut name = String::new();
        let mut first = true;
        loop {
            let b = self.current();
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => {
                    name.push(b as char);
                    self.advance();
                }
                b'0'..=b'9' if !first => {
                    name.push(b as char);
                    self.advance();
                }
                b'\\' => {
                    let escape_start = self.pos;
                    if self.peek_char() != b'u' {
                        return Err(self.error(ErrorKind::InvalidIdentifierEscape, escape_start));
                    }
                    self.advance_n(2);
                    let c = self
                        .read_code_point()
                        .ok()
                        .and_then(char::from_u32)
                        .filter(|&c| if first { is_id_start(c) } else { is_id_continue(c) })
                        .ok_or_else(|| self.error(ErrorKind::InvalidIdentifierEscape, escape_start))?;
                    name.push(c);
                    self.escaped = true;
                }
                _ if b >= 0x80 => {
                    let c = self.current_char();
                    let valid = if first { is_id_start(c) } else { is_id_continue(c) };
                    if !valid {
                        break;
                    }
                    name.push(c);
                    self.advance_n(c.len_utf8());
                }
                _ => break,
            }
            first = false;
        }
        Ok(name)
    }

    fn scan_private_name(&mut self) -> Result<TokenKind> {
        self.advance(); // Skip #
        let starts_identifier = match self.current() {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | b'\\' => true,
            b if b >= 0x80 => is_id_start(self.current_char()),
            _ => false,
        };
        if !starts_identifier {
            return Err(self.error(ErrorKind::InvalidPrivateName, self.token_start));
        }
        let name = self.scan_identifier_name()?;
        self.escaped = false;
        Ok(TokenKind::PrivateName(name))
    }

    fn scan_number(&mut self) -> Result<TokenKind> {
        let kind = if self.current() == b'0' {
            match self.peek_char() {
                b'x' | b'X' => self.scan_radix_number(16)?,
                b'o' | b'O' => self.scan_radix_number(8)?,
                b'b' | b'B' => self.scan_radix_number(2)?,
                b'0'..=b'9' => self.scan_legacy_octal()?,
                b'_' => return Err(self.error(ErrorKind::InvalidNumericSeparator, self.pos + 1)),
                _ => self.scan_decimal()?,
            }
        } else {
            self.scan_decimal()?
        };

        // The source character immediately following a numeric literal must
        // not be an identifier start or a digit.
        match self.current() {
            b'0'..=b'9' => return Err(self.error(ErrorKind::InvalidNumber, self.pos)),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | b'\\' => {
                return Err(self.error(ErrorKind::IdentifierAfterNumber, self.pos))
            }
            b if b >= 0x80 && is_id_start(self.current_char()) => {
                return Err(self.error(ErrorKind::IdentifierAfterNumber, self.pos))
            }
            _ => {}
        }
        Ok(kind)
    }

    /// Scan a run of digits in `radix`, with `_` separators allowed only
    /// between two digits. Returns the number of digits read.
    fn scan_digits(&mut self, radix: u32, out: &mut String) -> Result<usize> {
        let mut count = 0;
        let mut after_separator = false;
        loop {
            let b = self.current();
            if b == b'_' {
                if count == 0 || after_separator {
                    return Err(self.error(ErrorKind::InvalidNumericSeparator, self.pos));
                }
                after_separator = true;
                self.advance();
                continue;
            }
            if !(b as char).is_digit(radix) {
                break;
            }
            out.push(b as char);
            count += 1;
            after_separator = false;
            self.advance();
        }
        if after_separator {
            return Err(self.error(ErrorKind::InvalidNumericSeparator, self.pos - 1));
        }
        Ok(count)
    }

    fn scan_radix_number(&mut self, radix: u32) -> Result<TokenKind> {
        let start = self.pos;
        self.advance_n(2); // Skip 0x / 0o / 0b

        let mut digits = String::new();
        if self.scan_digits(radix, &mut digits)? == 0 {
            return Err(self.error(ErrorKind::InvalidNumber, self.pos));
        }

        if self.current() == b'n' {
            self.advance();
            let text = self.slice(start, self.pos - 1).replace('_', "");
            return Ok(TokenKind::BigInt(text));
        }

        Ok(TokenKind::Number(digits_to_f64(&digits, radix)))
    }

    /// `017` (legacy octal) or `08`/`09.5` (decimal with a leading zero).
    fn scan_legacy_octal(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        self.legacy_octal = true;
        let mut octal = true;
        while self.current().is_ascii_digit() {
            if self.current() >= b'8' {
                octal = false;
            }
            self.advance();
        }
        match self.current() {
            b'_' => return Err(self.error(ErrorKind::InvalidNumericSeparator, self.pos)),
            b'n' => return Err(self.error(ErrorKind::InvalidBigInt, start)),
            _ => {}
        }
        if octal {
            return Ok(TokenKind::Number(digits_to_f64(self.slice(start + 1, self.pos), 8)));
        }
        let integer = self.slice(start, self.pos).to_string();
        self.scan_decimal_tail(start, integer)
    }

    fn scan_decimal(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        let mut integer = String::new();
        if self.current() != b'.' {
            self.scan_digits(10, &mut integer)?;
        }
        self.scan_decimal_tail(start, integer)
    }

    fn scan_decimal_tail(&mut self, start: usize, mut text: String) -> Result<TokenKind> {
        let mut integral = true;
        if text.is_empty() {
            text.push('0');
        }

        // Decimal part
        if self.current() == b'.' {
            integral = false;
            self.advance();
            let mut fraction = String::new();
            if self.scan_digits(10, &mut fraction)? > 0 {
                text.push('.');
                text.push_str(&fraction);
            }
        }

        // Exponent part
        if matches!(self.current(), b'e' | b'E') {
            integral = false;
            self.advance();
            text.push('e');
            if matches!(self.current(), b'+' | b'-') {
                text.push(self.current() as char);
                self.advance();
            }
            if self.scan_digits(10, &mut text)? == 0 {
                return Err(self.error(ErrorKind::InvalidNumber, self.pos));
            }
        }

        // BigInt suffix
        if self.current() == b'n' {
            if !integral || self.legacy_octal {
                return Err(self.error(ErrorKind::InvalidBigInt, start));
            }
            self.advance();
            return Ok(TokenKind::BigInt(text));
        }

        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| self.error(ErrorKind::InvalidNumber, start))
    }

    fn scan_string(&mut self, quote: u8) -> Result<TokenKind> {
        self.advance(); // Skip opening quote

        let mut value = String::new();
        loop {
            let run_start = self.pos;
            while !self.is_eof() && !matches!(self.current(), b'\\' | b'\n' | b'\r') && self.current() != quote {
                self.advance();
            }
            value.push_str(self.slice(run_start, self.pos));

            if self.is_eof() {
                return Err(self.error(ErrorKind::UnterminatedString, self.token_start));
            }
            match self.current() {
                b'\\' => {
                    if self.pos + 1 >= self.bytes.len() {
                        return Err(self.error(ErrorKind::UnterminatedString, self.token_start));
                    }
                    match self.read_escape() {
                        Ok(Escape::CodePoint(cp)) => push_code_point(&mut value, cp),
                        Ok(Escape::Legacy(cp)) => {
                            self.legacy_octal = true;
                            push_code_point(&mut value, cp);
                        }
                        Ok(Escape::LineContinuation) => {}
                        Err((kind, offset)) => return Err(self.error(kind, offset)),
                    }
                }
                b if b == quote => {
                    self.advance(); // Skip closing quote
                    return Ok(TokenKind::String(value));
                }
                _ => return Err(self.error(ErrorKind::UnterminatedString, self.token_start)),
            }
        }
    }

    /// Decode the escape sequence at the cursor (which sits on the backslash).
    fn read_escape(&mut self) -> std::result::Result<Escape, (ErrorKind, usize)> {
        let escape_start = self.pos;
        self.advance(); // Skip backslash
        let c = self.current_char();
        self.advance_n(c.len_utf8());

        Ok(match c {
            'n' => Escape::CodePoint(0x0A),
            't' => Escape::CodePoint(0x09),
            'r' => Escape::CodePoint(0x0D),
            'b' => Escape::CodePoint(0x08),
            'f' => Escape::CodePoint(0x0C),
            'v' => Escape::CodePoint(0x0B),
            '0' if !self.current().is_ascii_digit() => Escape::CodePoint(0),
            '0'..='7' => {
                let mut value = c as u32 - '0' as u32;
                let max_digits = if c <= '3' { 2 } else { 1 };
                for _ in 0..max_digits {
                    match self.current() {
                        d @ b'0'..=b'7' => {
                            value = value * 8 + u32::from(d - b'0');
                            self.advance();
                        }
                        _ => break,
                    }
                }
                Escape::Legacy(value)
            }
            '8' | '9' => Escape::Legacy(c as u32),
            'x' => {
                let mut value = 0;
                for _ in 0..2 {
                    let digit = (self.current() as char)
                        .to_digit(16)
                        .ok_or((ErrorKind::InvalidHexEscape, escape_start))?;
                    value = value * 16 + digit;
                    self.advance();
                }
                Escape::CodePoint(value)
            }
            'u' => {
                let cp = self.read_code_point().map_err(|kind| (kind, escape_start))?;
                Escape::CodePoint(self.combine_surrogates(cp))
            }
            '\r' => {
                if self.current() == b'\n' {
                    self.advance();
                }
                Escape::LineContinuation
            }
            '\n' | '\u{2028}' | '\u{2029}' => Escape::LineContinuation,
            other => Escape::CodePoint(other as u32),
        })
    }

    /// Read the body of a `\u` escape: `XXXX` or `{X...}`.
    fn read_code_point(&mut self) -> std::result::Result<u32, ErrorKind> {
        if self.current() == b'{' {
            self.advance();
            let mut value: u32 = 0;
            let mut digits = 0;
            while let Some(digit) = (self.current() as char).to_digit(16) {
                value = value * 16 + digit;
                if value > 0x10FFFF {
                    return Err(ErrorKind::UnicodeEscapeOutOfRange);
                }
                digits += 1;
                self.advance();
            }
            if digits == 0 || self.current() != b'}' {
                return Err(ErrorKind::InvalidUnicodeEscape);
            }
            self.advance();
            Ok(value)
        } else {
            let mut value = 0;
            for _ in 0..4 {
                let digit = (self.current() as char)
                    .to_digit(16)
                    .ok_or(ErrorKind::InvalidUnicodeEscape)?;
                value = value * 16 + digit;
                self.advance();
            }
            Ok(value)
        }
    }

    /// Join a `\uD83D\uDE00` surrogate pair into one code point. A lone half
    /// is returned as is.
    fn combine_surrogates(&mut self, high: u32) -> u32 {
        if !(0xD800..=0xDBFF).contains(&high) || !self.starts_with(b"\\u") {
            return high;
        }
        let saved = self.pos;
        self.advance_n(2);
        match self.read_code_point() {
            Ok(low) if (0xDC00..=0xDFFF).contains(&low) => 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00),
            _ => {
                self.pos = saved;
                high
            }
        }
    }

    /// Scan a template segment; the cursor sits just after `` ` `` or `}`.
    fn scan_template_segment(&mut self) -> Result<TokenKind> {
        let mut cooked = Some(String::new());
        let mut raw = String::new();
        loop {
            if self.is_eof() {
                return Err(self.error(ErrorKind::UnterminatedTemplate, self.token_start));
            }
            match self.current() {
                b'`' => {
                    self.advance();
                    return Ok(TokenKind::Template { cooked, raw, tail: true });
                }
                b'$' if self.peek_char() == b'{' => {
                    self.advance_n(2);
                    return Ok(TokenKind::Template { cooked, raw, tail: false });
                }
                b'\\' => {
                    let escape_start = self.pos;
                    if self.pos + 1 >= self.bytes.len() {
                        return Err(self.error(ErrorKind::UnterminatedTemplate, self.token_start));
                    }
                    let escape = self.read_escape();
                    raw.push_str(&normalize_line_endings(self.slice(escape_start, self.pos)));
                    match escape {
                        Ok(Escape::CodePoint(cp)) => {
                            if let Some(cooked) = cooked.as_mut() {
                                push_code_point(cooked, cp);
                            }
                        }
                        Ok(Escape::LineContinuation) => {}
                        Ok(Escape::Legacy(_)) | Err(_) => {
                            cooked = None;
                            self.invalid_escape.get_or_insert(escape_start as u32);
                        }
                    }
                }
                b'\r' => {
                    self.advance();
                    if self.current() == b'\n' {
                        self.advance();
                    }
                    raw.push('\n');
                    if let Some(cooked) = cooked.as_mut() {
                        cooked.push('\n');
                    }
                }
                _ => {
                    let c = self.current_char();
                    self.advance_n(c.len_utf8());
                    raw.push(c);
                    if let Some(cooked) = cooked.as_mut() {
                        cooked.push(c);
                    }
                }
            }
        }
    }

    // === Multi-character operators ===

    fn scan_dot(&mut self) -> Result<TokenKind> {
        if self.peek_char().is_ascii_digit() {
            // Number starting with .
            return self.scan_number();
        }
        self.advance();
        if self.current() == b'.' && self.peek_char() == b'.' {
            self.advance_n(2);
            Ok(TokenKind::Spread)
        } else {
            Ok(TokenKind::Dot)
        }
    }

    fn scan_question(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'?' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::QuestionQuestionEq
                } else {
                    TokenKind::QuestionQuestion
                }
            }
            // `a?.5:b` is a conditional, not an optional chain
            b'.' if !self.peek_char().is_ascii_digit() => {
                self.advance();
                TokenKind::QuestionDot
            }
            _ => TokenKind::Question,
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'+' => { self.advance(); TokenKind::PlusPlus }
            b'=' => { self.advance(); TokenKind::PlusEq }
            _ => TokenKind::Plus,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'-' => { self.advance(); TokenKind::MinusMinus }
            b'=' => { self.advance(); TokenKind::MinusEq }
            _ => TokenKind::Minus,
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'*' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::StarStarEq
                } else {
                    TokenKind::StarStar
                }
            }
            b'=' => { self.advance(); TokenKind::StarEq }
            _ => TokenKind::Star,
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => { self.advance(); TokenKind::SlashEq }
            _ => TokenKind::Slash,
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::PercentEq
        } else {
            TokenKind::Percent
        }
    }

    fn scan_equals(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::EqEqEq
                } else {
                    TokenKind::EqEq
                }
            }
            b'>' => { self.advance(); TokenKind::Arrow }
            _ => TokenKind::Eq,
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::BangEqEq
                } else {
                    TokenKind::BangEq
                }
            }
            _ => TokenKind::Bang,
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'<' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::LtLtEq
                } else {
                    TokenKind::LtLt
                }
            }
            b'=' => { self.advance(); TokenKind::LtEq }
            _ => TokenKind::Lt,
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'>' => {
                self.advance();
                match self.current() {
                    b'>' => {
                        self.advance();
                        if self.current() == b'=' {
                            self.advance();
                            TokenKind::GtGtGtEq
                        } else {
                            TokenKind::GtGtGt
                        }
                    }
                    b'=' => { self.advance(); TokenKind::GtGtEq }
                    _ => TokenKind::GtGt,
                }
            }
            b'=' => { self.advance(); TokenKind::GtEq }
            _ => TokenKind::Gt,
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'&' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::AmpAmpEq
                } else {
                    TokenKind::AmpAmp
                }
            }
            b'=' => { self.advance(); TokenKind::AmpEq }
            _ => TokenKind::Amp,
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'|' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::PipePipeEq
                } else {
                    TokenKind::PipePipe
                }
            }
            b'=' => { self.advance(); TokenKind::PipeEq }
            _ => TokenKind::Pipe,
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::CaretEq
        } else {
            TokenKind::Caret
        }
    }
}

// === Character classes ===

pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\u{0B}'
            | '\u{0C}'
            | ' '
            | '\u{A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

pub(crate) fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || is_xid_start(c)
}

pub(crate) fn is_id_continue(c: char) -> bool {
    c == '$' || c == '\u{200C}' || c == '\u{200D}' || is_xid_continue(c)
}

fn push_code_point(out: &mut String, cp: u32) {
    out.push(char::from_u32(cp).unwrap_or('\u{FFFD}'));
}

fn digits_to_f64(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
}

/// Template raw values normalise CRLF and CR to LF.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if matches!(token.kind, TokenKind::Eof) {
                break;
            }
            tokens.push(token.kind);
        }
        tokens
    }

    fn first_token(source: &str) -> Token {
        Lexer::new(source).next_token().unwrap()
    }

    fn lex_error(source: &str) -> ErrorKind {
        let mut lexer = Lexer::new(source);
        loop {
            match lexer.next_token() {
                Ok(token) if token.kind == TokenKind::Eof => panic!("expected an error for {source:?}"),
                Ok(_) => {}
                Err(err) => return err.kind,
            }
        }
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            tokenize("foo bar _baz $qux café naïve"),
            vec![
                TokenKind::Identifier("foo".into()),
                TokenKind::Identifier("bar".into()),
                TokenKind::Identifier("_baz".into()),
                TokenKind::Identifier("$qux".into()),
                TokenKind::Identifier("café".into()),
                TokenKind::Identifier("naïve".into()),
            ]
        );
    }

    #[test]
    fn test_keywords_and_contextual_words() {
        assert_eq!(
            tokenize("const let var function yield"),
            vec![
                TokenKind::Const,
                TokenKind::Identifier("let".into()),
                TokenKind::Var,
                TokenKind::Function,
                TokenKind::Identifier("yield".into()),
            ]
        );
    }

    #[test]
    fn test_escaped_identifiers() {
        let token = first_token(r"\u0076ar");
        assert_eq!(token.kind, TokenKind::Identifier("var".into()));
        assert!(token.escaped);

        let token = first_token(r"a\u{62}c");
        assert_eq!(token.kind, TokenKind::Identifier("abc".into()));

        assert_eq!(lex_error(r"\u0030abc"), ErrorKind::InvalidIdentifierEscape);
        assert_eq!(lex_error(r"a\x41"), ErrorKind::InvalidIdentifierEscape);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokenize("42 3.14 0xff 0b101 0o77 .5 1. 1e3 2E-2 1_000_000"),
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.14),
                TokenKind::Number(255.0),
                TokenKind::Number(5.0),
                TokenKind::Number(63.0),
                TokenKind::Number(0.5),
                TokenKind::Number(1.0),
                TokenKind::Number(1000.0),
                TokenKind::Number(0.02),
                TokenKind::Number(1_000_000.0),
            ]
        );
    }

    #[test]
    fn test_legacy_octal() {
        let token = first_token("017");
        assert_eq!(token.kind, TokenKind::Number(15.0));
        assert!(token.legacy_octal);

        let token = first_token("08.5");
        assert_eq!(token.kind, TokenKind::Number(8.5));
        assert!(token.legacy_octal);

        assert!(!first_token("0").legacy_octal);
        assert!(!first_token("0.5").legacy_octal);
    }

    #[test]
    fn test_bigint() {
        assert_eq!(
            tokenize("10n 0x1_Fn"),
            vec![TokenKind::BigInt("10".into()), TokenKind::BigInt("0x1F".into())]
        );
        assert_eq!(lex_error("1.5n"), ErrorKind::InvalidBigInt);
        assert_eq!(lex_error("017n"), ErrorKind::InvalidBigInt);
    }

    #[test]
    fn test_numeric_errors() {
        assert_eq!(lex_error("1__0"), ErrorKind::InvalidNumericSeparator);
        assert_eq!(lex_error("1_"), ErrorKind::InvalidNumericSeparator);
        assert_eq!(lex_error("0_1"), ErrorKind::InvalidNumericSeparator);
        assert_eq!(lex_error("1._5"), ErrorKind::InvalidNumericSeparator);
        assert_eq!(lex_error("0x"), ErrorKind::InvalidNumber);
        assert_eq!(lex_error("1e"), ErrorKind::InvalidNumber);
        assert_eq!(lex_error("3in x"), ErrorKind::IdentifierAfterNumber);
        assert_eq!(lex_error("0b12"), ErrorKind::InvalidNumber);
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokenize(r#""hello" 'world' "a\nb" '\x41B\u{43}' "😀""#),
            vec![
                TokenKind::String("hello".into()),
                TokenKind::String("world".into()),
                TokenKind::String("a\nb".into()),
                TokenKind::String("ABC".into()),
                TokenKind::String("😀".into()),
            ]
        );
    }

    #[test]
    fn test_string_line_continuation() {
        assert_eq!(tokenize("'a\\\r\nb'"), vec![TokenKind::String("ab".into())]);
        assert_eq!(tokenize("'a\u{2028}b'"), vec![TokenKind::String("a\u{2028}b".into())]);
    }

    #[test]
    fn test_string_octal_escapes() {
        let token = first_token(r"'\012'");
        assert_eq!(token.kind, TokenKind::String("\n".into()));
        assert!(token.legacy_octal);

        let token = first_token(r"'\8'");
        assert_eq!(token.kind, TokenKind::String("8".into()));
        assert!(token.legacy_octal);

        assert!(!first_token(r"'\0'").legacy_octal);
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(lex_error("'abc"), ErrorKind::UnterminatedString);
        assert_eq!(lex_error("'ab\ncd'"), ErrorKind::UnterminatedString);
        assert_eq!(lex_error(r"'\x4'"), ErrorKind::InvalidHexEscape);
        assert_eq!(lex_error(r"'\u12'"), ErrorKind::InvalidUnicodeEscape);
        assert_eq!(lex_error(r"'\u{110000}'"), ErrorKind::UnicodeEscapeOutOfRange);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokenize("+ - * / % ** ++ -- ?. ?? ??= &&= ||= **= >>>= ..."),
            vec![
                TokenKind::Plus, TokenKind::Minus, TokenKind::Star, TokenKind::Slash,
                TokenKind::Percent, TokenKind::StarStar, TokenKind::PlusPlus, TokenKind::MinusMinus,
                TokenKind::QuestionDot, TokenKind::QuestionQuestion, TokenKind::QuestionQuestionEq,
                TokenKind::AmpAmpEq, TokenKind::PipePipeEq, TokenKind::StarStarEq,
                TokenKind::GtGtGtEq, TokenKind::Spread,
            ]
        );
    }

    #[test]
    fn test_question_dot_before_digit() {
        assert_eq!(
            tokenize("a?.5:b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Question,
                TokenKind::Number(0.5),
                TokenKind::Colon,
                TokenKind::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines() {
        let mut lexer = Lexer::new("a // line comment\nb /* block */ c /*\n*/ d");
        let a = lexer.next_token().unwrap();
        let b = lexer.next_token().unwrap();
        let c = lexer.next_token().unwrap();
        let d = lexer.next_token().unwrap();
        assert!(!a.newline_before);
        assert!(b.newline_before);
        assert!(!c.newline_before);
        assert!(d.newline_before);
        assert_eq!(lex_error("/* open"), ErrorKind::UnterminatedComment);
    }

    #[test]
    fn test_unicode_line_terminators() {
        let mut lexer = Lexer::new("a\u{2028}b");
        lexer.next_token().unwrap();
        assert!(lexer.next_token().unwrap().newline_before);
    }

    #[test]
    fn test_hashbang() {
        assert_eq!(tokenize("#!/usr/bin/env node\nx"), vec![TokenKind::Identifier("x".into())]);
    }

    #[test]
    fn test_html_comments() {
        let source = "a <!-- comment\n--> also comment\nb";
        let mut lexer = Lexer::new(source).with_html_comments(true);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier("a".into()));
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier("b".into()));

        // Without web compat `<!--` is just `<`, `!`, `--`.
        assert_eq!(
            tokenize("a <!-- b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Lt,
                TokenKind::Bang,
                TokenKind::MinusMinus,
                TokenKind::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn test_html_close_comment_needs_line_start() {
        let mut lexer = Lexer::new("a --> b").with_html_comments(true);
        lexer.next_token().unwrap();
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::MinusMinus);
    }

    #[test]
    fn test_private_name() {
        assert_eq!(tokenize("#foo"), vec![TokenKind::PrivateName("foo".into())]);
        assert_eq!(lex_error("# foo"), ErrorKind::InvalidPrivateName);
    }

    #[test]
    fn test_template_literal_no_sub() {
        assert_eq!(
            tokenize("`hello world`"),
            vec![TokenKind::Template {
                cooked: Some("hello world".into()),
                raw: "hello world".into(),
                tail: true,
            }]
        );
    }

    #[test]
    fn test_template_continuation() {
        let mut lexer = Lexer::new("`a${x}b\\n\r\nc`");
        let head = lexer.next_token().unwrap();
        assert_eq!(
            head.kind,
            TokenKind::Template { cooked: Some("a".into()), raw: "a".into(), tail: false }
        );
        lexer.next_token().unwrap();
        let rbrace = lexer.next_token().unwrap();
        assert_eq!(rbrace.kind, TokenKind::RBrace);
        let tail = lexer.rescan_template_continuation(&rbrace).unwrap();
        assert_eq!(
            tail.kind,
            TokenKind::Template {
                cooked: Some("b\n\nc".into()),
                raw: "b\\n\nc".into(),
                tail: true,
            }
        );
        assert_eq!(tail.span, Span::new(5, 13));
    }

    #[test]
    fn test_template_invalid_escape() {
        let token = first_token(r"`\unicode and \01`");
        match token.kind {
            TokenKind::Template { cooked, raw, .. } => {
                assert_eq!(cooked, None);
                assert_eq!(raw, r"\unicode and \01");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(token.invalid_escape, Some(1));
        assert_eq!(lex_error("`abc"), ErrorKind::UnterminatedTemplate);
    }

    #[test]
    fn test_regex_rescan() {
        let mut lexer = Lexer::new("/[/]\\//gi.test");
        let slash = lexer.next_token().unwrap();
        assert_eq!(slash.kind, TokenKind::Slash);
        let regex = lexer.rescan_regex(&slash).unwrap();
        assert_eq!(
            regex.kind,
            TokenKind::Regex { pattern: "[/]\\/".into(), flags: "gi".into() }
        );
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Dot);
    }

    #[test]
    fn test_regex_errors() {
        let rescan = |source: &str| {
            let mut lexer = Lexer::new(source);
            let slash = lexer.next_token().unwrap();
            lexer.rescan_regex(&slash).unwrap_err().kind
        };
        assert_eq!(rescan("/abc"), ErrorKind::UnterminatedRegExp);
        assert_eq!(rescan("/a\n/"), ErrorKind::UnterminatedRegExp);
        assert_eq!(rescan("/a/x"), ErrorKind::InvalidRegExpFlag('x'));
        assert_eq!(rescan("/a/gg"), ErrorKind::DuplicateRegExpFlag('g'));
        assert_eq!(rescan("/a/uv"), ErrorKind::InvalidRegExpFlag('v'));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(lex_error("a @ b"), ErrorKind::InvalidCharacter);
    }

    #[test]
    fn test_spans() {
        let mut lexer = Lexer::new("  foo  'x'");
        assert_eq!(lexer.next_token().unwrap().span, Span::new(2, 5));
        assert_eq!(lexer.next_token().unwrap().span, Span::new(7, 10));
    }
}
