use std::{iter::Peekable, str::Chars};

use log::{debug, trace};
use thiserror::Error;

use crate::diagnostics::{DiagnosticSink, Diagnostics};
use crate::token::{Literal, Token, TokenType};

#[derive(Debug, Error, PartialEq)]
pub enum LexerError {
    #[error("Unexpected character.")]
    UnexpectedCharacter { line: u32, character: char },
    #[error("Unterminated string.")]
    UnterminatedString { line: u32 },
    #[error("{msg}")]
    InternalError { msg: String, line: u32 },
}

impl LexerError {
    pub fn line(&self) -> u32 {
        match self {
            LexerError::UnexpectedCharacter { line, .. } => *line,
            LexerError::UnterminatedString { line } => *line,
            LexerError::InternalError { line, .. } => *line,
        }
    }

    pub fn location(&self) -> String {
        match self {
            LexerError::UnexpectedCharacter { character, .. } => format!("at '{}'", character.escape_debug()),
            _ => String::new(),
        }
    }
}

/// Tokens of one scan together with everything reported while producing them.
#[derive(Debug)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

/// Scans `source` with a fresh collector.
pub fn scan(source: &str) -> ScanResult {
    let mut diagnostics = Diagnostics::new();
    let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
    ScanResult { tokens, diagnostics }
}

/// Single-pass tokenizer. `start` and `current_index` are byte offsets into
/// `source`, and `current_index` always sits on a char boundary.
pub struct Scanner<'a> {
    source: &'a str,
    source_iterator: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current_index: usize,
    start_line: u32,
    line: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            source_iterator: source.chars().peekable(),
            tokens: Vec::new(),
            start: 0,
            current_index: 0,
            start_line: 1,
            line: 1,
        }
    }

    /// Consumes the scanner and returns every token of the source, always
    /// terminated by a single EOF token. Lexical errors go to `sink` and
    /// scanning carries on past them.
    pub fn scan_tokens(mut self, sink: &mut dyn DiagnosticSink) -> Vec<Token> {
        debug!("==== Scan {} bytes ====", self.source.len());

        while !self.is_at_end() {
            self.start = self.current_index;
            self.start_line = self.line;
            self.scan_token(sink);
        }

        self.tokens.push(Token::eof(self.line));
        debug!("==== Scanned {} tokens ====", self.tokens.len());
        self.tokens
    }

    fn scan_token(&mut self, sink: &mut dyn DiagnosticSink) {
        let c = self.advance();
        match c {
            // Single-character
            '(' => self.add_token(TokenType::LeftParen, None),
            ')' => self.add_token(TokenType::RightParen, None),
            '{' => self.add_token(TokenType::LeftBrace, None),
            '}' => self.add_token(TokenType::RightBrace, None),
            ',' => self.add_token(TokenType::Comma, None),
            '.' => self.add_token(TokenType::Dot, None),
            '-' => self.add_token(TokenType::Minus, None),
            '+' => self.add_token(TokenType::Plus, None),
            ';' => self.add_token(TokenType::Semicolon, None),
            '*' => self.add_token(TokenType::Star, None),

            // One or two character tokens
            '!' => {
                let token_type = if self.match_char('=') { TokenType::BangEqual } else { TokenType::Bang };
                self.add_token(token_type, None);
            },
            '=' => {
                let token_type = if self.match_char('=') { TokenType::EqualEqual } else { TokenType::Equal };
                self.add_token(token_type, None);
            },
            '<' => {
                let token_type = if self.match_char('=') { TokenType::LessEqual } else { TokenType::Less };
                self.add_token(token_type, None);
            },
            '>' => {
                let token_type = if self.match_char('=') { TokenType::GreaterEqual } else { TokenType::Greater };
                self.add_token(token_type, None);
            },

            '/' => {
                if self.match_char('/') { // Single line comment
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash, None);
                }
            },

            ' ' | '\r' | '\t' => {},
            '\n' => self.line += 1,

            // Literals
            '"' => self.string(sink),
            c if c.is_ascii_digit() => self.number(sink),
            c if is_alpha(c) => self.identifier(),

            _ => self.error(sink, LexerError::UnexpectedCharacter { line: self.line, character: c }),
        }
    }

    fn string(&mut self, sink: &mut dyn DiagnosticSink) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.error(sink, LexerError::UnterminatedString { line: self.line });
            return;
        }

        // Closing quote
        self.advance();

        // Omit surrounding quotes
        let value = self.source[(self.start + 1)..(self.current_index - 1)].to_owned();
        self.add_token(TokenType::String, Some(Literal::String(value)));
    }

    fn number(&mut self, sink: &mut dyn DiagnosticSink) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // A trailing '.' without digits is left for the next token
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let source = self.source;
        let lexeme = &source[self.start..self.current_index];
        match lexeme.parse::<f64>() {
            Ok(value) => self.add_token(TokenType::Number, Some(Literal::Number(value))),
            Err(err) => self.error(
                sink,
                LexerError::InternalError { msg: format!("Could not parse number '{}': {}", lexeme, err), line: self.line },
            ),
        }
    }

    fn identifier(&mut self) {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let source = self.source;
        let lexeme = &source[self.start..self.current_index];
        let token_type = TokenType::keyword(lexeme).unwrap_or(TokenType::Identifier);
        self.add_token(token_type, None);
    }

    fn error(&mut self, sink: &mut dyn DiagnosticSink, err: LexerError) {
        debug!("{:?}", err);
        sink.report(err.line(), &err.location(), &err.to_string());
    }

    fn add_token(&mut self, token_type: TokenType, literal: Option<Literal>) {
        let token = Token::new(token_type, &self.source[self.start..self.current_index], literal, self.start_line);
        trace!("{:?}", token);
        self.tokens.push(token);
    }

    /// Consumes the current character, or yields `'\0'` once the input is exhausted.
    fn advance(&mut self) -> char {
        match self.source_iterator.next() {
            Some(c) => {
                self.current_index += c.len_utf8();
                c
            },
            None => '\0',
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() != expected || self.is_at_end() {
            return false;
        }
        self.advance();
        true
    }

    fn peek(&mut self) -> char {
        self.source_iterator.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source[self.current_index..].chars().nth(1).unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.current_index >= self.source.len()
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alpha_numeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}
