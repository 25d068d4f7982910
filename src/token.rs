use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

static KEYWORDS: OnceLock<HashMap<&'static str, TokenType>> = OnceLock::new();

fn keywords() -> &'static HashMap<&'static str, TokenType> {
    KEYWORDS.get_or_init(|| {
        HashMap::from([
            ("and", TokenType::And),
            ("class", TokenType::Class),
            ("else", TokenType::Else),
            ("false", TokenType::False),
            ("for", TokenType::For),
            ("fun", TokenType::Fun),
            ("if", TokenType::If),
            ("nil", TokenType::Nil),
            ("or", TokenType::Or),
            ("print", TokenType::Print),
            ("return", TokenType::Return),
            ("super", TokenType::Super),
            ("this", TokenType::This),
            ("true", TokenType::True),
            ("var", TokenType::Var),
            ("while", TokenType::While),
        ])
    })
}

impl TokenType {
    /// Resolves a fully scanned identifier to its reserved word, if it is one.
    pub fn keyword(text: &str) -> Option<TokenType> {
        keywords().get(text).copied()
    }

    pub fn is_keyword(&self) -> bool {
        keywords().values().any(|token_type| token_type == self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenType::LeftParen =>     "LEFT_PAREN",
            TokenType::RightParen =>    "RIGHT_PAREN",
            TokenType::LeftBrace =>     "LEFT_BRACE",
            TokenType::RightBrace =>    "RIGHT_BRACE",
            TokenType::Comma =>         "COMMA",
            TokenType::Dot =>           "DOT",
            TokenType::Minus =>         "MINUS",
            TokenType::Plus =>          "PLUS",
            TokenType::Semicolon =>     "SEMICOLON",
            TokenType::Slash =>         "SLASH",
            TokenType::Star =>          "STAR",

            TokenType::Bang =>          "BANG",
            TokenType::BangEqual =>     "BANG_EQUAL",
            TokenType::Equal =>         "EQUAL",
            TokenType::EqualEqual =>    "EQUAL_EQUAL",
            TokenType::Greater =>       "GREATER",
            TokenType::GreaterEqual =>  "GREATER_EQUAL",
            TokenType::Less =>          "LESS",
            TokenType::LessEqual =>     "LESS_EQUAL",

            TokenType::Identifier =>    "IDENTIFIER",
            TokenType::String =>        "STRING",
            TokenType::Number =>        "NUMBER",

            TokenType::And =>           "AND",
            TokenType::Class =>         "CLASS",
            TokenType::Else =>          "ELSE",
            TokenType::False =>         "FALSE",
            TokenType::Fun =>           "FUN",
            TokenType::For =>           "FOR",
            TokenType::If =>            "IF",
            TokenType::Nil =>           "NIL",
            TokenType::Or =>            "OR",
            TokenType::Print =>         "PRINT",
            TokenType::Return =>        "RETURN",
            TokenType::Super =>         "SUPER",
            TokenType::This =>          "THIS",
            TokenType::True =>          "TRUE",
            TokenType::Var =>           "VAR",
            TokenType::While =>         "WHILE",

            TokenType::Eof =>           "EOF",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded value of a string or number token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(value) => f.write_str(value),
            Literal::Number(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: u32,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: &str, literal: Option<Literal>, line: u32) -> Token {
        Token {
            token_type,
            lexeme: lexeme.to_owned(),
            literal,
            line,
        }
    }

    pub fn eof(line: u32) -> Token {
        Token::new(TokenType::Eof, "", None, line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{} {} {}", self.token_type, self.lexeme, literal),
            None => write!(f, "{} {} null", self.token_type, self.lexeme),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolves_reserved_words() {
        assert_eq!(TokenType::keyword("class"), Some(TokenType::Class));
        assert_eq!(TokenType::keyword("fun"), Some(TokenType::Fun));
        assert_eq!(TokenType::keyword("while"), Some(TokenType::While));
        assert_eq!(TokenType::keyword("classify"), None);
        assert_eq!(TokenType::keyword("Class"), None);
        assert_eq!(TokenType::keyword(""), None);
    }

    #[test]
    fn keyword_classification() {
        assert!(TokenType::Print.is_keyword());
        assert!(TokenType::Nil.is_keyword());
        assert!(!TokenType::Identifier.is_keyword());
        assert!(!TokenType::Eof.is_keyword());
    }

    #[test]
    fn formats_token_types() {
        assert_eq!(TokenType::LeftParen.to_string(), "LEFT_PAREN");
        assert_eq!(TokenType::GreaterEqual.to_string(), "GREATER_EQUAL");
        assert_eq!(TokenType::Identifier.to_string(), "IDENTIFIER");
        assert_eq!(TokenType::Eof.to_string(), "EOF");
    }

    #[test]
    fn formats_tokens() {
        let token = Token::new(TokenType::String, "\"JSLox\"", Some(Literal::String("JSLox".to_owned())), 1);
        assert_eq!(token.to_string(), "STRING \"JSLox\" JSLox");

        let token = Token::new(TokenType::Number, "100.0", Some(Literal::Number(100.0)), 1);
        assert_eq!(token.to_string(), "NUMBER 100.0 100");

        let token = Token::new(TokenType::Number, "9.999", Some(Literal::Number(9.999)), 1);
        assert_eq!(token.to_string(), "NUMBER 9.999 9.999");

        let token = Token::new(TokenType::Var, "var", None, 3);
        assert_eq!(token.to_string(), "VAR var null");

        assert_eq!(Token::eof(2).to_string(), "EOF  null");
    }
}
