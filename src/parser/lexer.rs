//! Logos-based lexer for Elm
//!
//! Fast tokenization using the logos crate. Every byte of the input ends up
//! in exactly one token, so the CST built from these tokens is lossless.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// Byte offset just past the end of this token
    pub fn end(&self) -> TextSize {
        self.offset + TextSize::of(self.text)
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Consume a (possibly nested) `{- ... -}` comment after its opening `{-`.
///
/// An unterminated comment runs to the end of the input.
fn block_comment(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(b"{-") {
            depth += 1;
            i += 2;
        } else if bytes[i..].starts_with(b"-}") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return true;
            }
        } else {
            i += 1;
        }
    }
    lex.bump(bytes.len());
    true
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"--[^\n]*")]
    LineComment,

    #[token("{-", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-z][a-zA-Z0-9_]*")]
    LowerIdent,

    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    UpperIdent,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"0x[0-9a-fA-F]+")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#""""([^"\\]|\\.|"[^"]|""[^"])*""""#)]
    String,

    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    Char,

    #[regex(r"[+\-*/<>=&|^!?%:.$#~@]+")]
    Operator,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token("|", priority = 10)]
    Pipe,

    #[token("=", priority = 10)]
    Eq,

    #[token(":", priority = 10)]
    Colon,

    #[token("->")]
    Arrow,

    #[token("\\")]
    Backslash,

    #[token(".", priority = 10)]
    Dot,

    #[token("..")]
    DotDot,

    #[token("_")]
    Underscore,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("module")]
    Module,

    #[token("port")]
    Port,

    #[token("exposing")]
    Exposing,

    #[token("import")]
    Import,

    #[token("as")]
    As,

    #[token("type")]
    Type,

    #[token("alias")]
    Alias,

    #[token("case")]
    Case,

    #[token("of")]
    Of,

    #[token("if")]
    If,

    #[token("then")]
    Then,

    #[token("else")]
    Else,

    #[token("let")]
    Let,

    #[token("in")]
    In,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            LogosToken::LowerIdent => SyntaxKind::LOWER_IDENT,
            LogosToken::UpperIdent => SyntaxKind::UPPER_IDENT,
            LogosToken::Number => SyntaxKind::NUMBER,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::Char => SyntaxKind::CHAR,
            LogosToken::Operator => SyntaxKind::OPERATOR_IDENT,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Arrow => SyntaxKind::ARROW,
            LogosToken::Backslash => SyntaxKind::BACKSLASH,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::DotDot => SyntaxKind::DOT_DOT,
            LogosToken::Underscore => SyntaxKind::UNDERSCORE,
            LogosToken::Module => SyntaxKind::MODULE_KW,
            LogosToken::Port => SyntaxKind::PORT_KW,
            LogosToken::Exposing => SyntaxKind::EXPOSING_KW,
            LogosToken::Import => SyntaxKind::IMPORT_KW,
            LogosToken::As => SyntaxKind::AS_KW,
            LogosToken::Type => SyntaxKind::TYPE_KW,
            LogosToken::Alias => SyntaxKind::ALIAS_KW,
            LogosToken::Case => SyntaxKind::CASE_KW,
            LogosToken::Of => SyntaxKind::OF_KW,
            LogosToken::If => SyntaxKind::IF_KW,
            LogosToken::Then => SyntaxKind::THEN_KW,
            LogosToken::Else => SyntaxKind::ELSE_KW,
            LogosToken::Let => SyntaxKind::LET_KW,
            LogosToken::In => SyntaxKind::IN_KW,
        }
    }
}
