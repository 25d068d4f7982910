//! Scanner for the Lox scripting language: turns source text into the
//! token sequence a parser consumes, reporting lexical errors to a caller
//! supplied [`DiagnosticSink`].

pub mod diagnostics;
pub mod lexer;
pub mod token;

pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics};
pub use lexer::{scan, LexerError, ScanResult, Scanner};
pub use token::{Literal, Token, TokenType};
