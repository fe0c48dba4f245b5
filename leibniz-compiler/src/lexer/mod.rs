use anyhow::Result;
use thiserror::Error;

use crate::source::SourceFile;

#[derive(Debug, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct LexerError {
    message: String,
    line: usize,
    column: usize,
}

impl LexerError {
    fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme,
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier,
    IntegerLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    BooleanLiteral(bool),
    Keyword(Keyword),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
    Semicolon,
    Equal,
    DoubleEqual,
    Bang,
    BangEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Plus,
    PlusPlus,
    Minus,
    MinusMinus,
    Star,
    StarStar,
    Slash,
    Percent,
    Hash,
    AmpersandAmpersand,
    PipePipe,
    FatArrow, // =>
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Let,
    Const,
    Fnc,
    Obj,
    Print,
    If,
    Else,
    While,
    For,
    In,
    Break,
    Return,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Let => "let",
            Keyword::Const => "const",
            Keyword::Fnc => "fnc",
            Keyword::Obj => "obj",
            Keyword::Print => "print",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::For => "for",
            Keyword::In => "in",
            Keyword::Break => "break",
            Keyword::Return => "return",
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceFile) -> Self {
        Self {
            input: &source.contents,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance_char();
                }
                '/' if self.peek_next_char() == Some('/') => {
                    self.skip_comment();
                }
                '"' => tokens.push(self.lex_string()?),
                '0'..='9' => tokens.push(self.lex_number()?),
                'a'..='z' | 'A'..='Z' | '_' | 'π' => tokens.push(self.lex_identifier_or_keyword()),
                '(' => tokens.push(self.simple_token(TokenKind::LParen)),
                ')' => tokens.push(self.simple_token(TokenKind::RParen)),
                '{' => tokens.push(self.simple_token(TokenKind::LBrace)),
                '}' => tokens.push(self.simple_token(TokenKind::RBrace)),
                '[' => tokens.push(self.simple_token(TokenKind::LBracket)),
                ']' => tokens.push(self.simple_token(TokenKind::RBracket)),
                ',' => tokens.push(self.simple_token(TokenKind::Comma)),
                ';' => tokens.push(self.simple_token(TokenKind::Semicolon)),
                ':' => tokens.push(self.simple_token(TokenKind::Colon)),
                '.' => tokens.push(self.simple_token(TokenKind::Dot)),
                '#' => tokens.push(self.simple_token(TokenKind::Hash)),
                '/' => tokens.push(self.simple_token(TokenKind::Slash)),
                '%' => tokens.push(self.simple_token(TokenKind::Percent)),
                '=' => {
                    let token = match self.peek_next_char() {
                        Some('=') => self.compound_token(TokenKind::DoubleEqual),
                        Some('>') => self.compound_token(TokenKind::FatArrow),
                        _ => self.simple_token(TokenKind::Equal),
                    };
                    tokens.push(token);
                }
                '!' => tokens.push(self.one_or_two('=', TokenKind::BangEqual, TokenKind::Bang)),
                '>' => tokens.push(self.one_or_two(
                    '=',
                    TokenKind::GreaterEqual,
                    TokenKind::Greater,
                )),
                '<' => tokens.push(self.one_or_two('=', TokenKind::LessEqual, TokenKind::Less)),
                '+' => tokens.push(self.one_or_two('+', TokenKind::PlusPlus, TokenKind::Plus)),
                '-' => tokens.push(self.one_or_two('-', TokenKind::MinusMinus, TokenKind::Minus)),
                '*' => tokens.push(self.one_or_two('*', TokenKind::StarStar, TokenKind::Star)),
                '&' if self.peek_next_char() == Some('&') => {
                    tokens.push(self.compound_token(TokenKind::AmpersandAmpersand))
                }
                '|' if self.peek_next_char() == Some('|') => {
                    tokens.push(self.compound_token(TokenKind::PipePipe))
                }
                other => {
                    return Err(LexerError::new(
                        format!("Unexpected character '{other}'"),
                        self.line,
                        self.column,
                    )
                    .into());
                }
            }
        }

        tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            self.line,
            self.column,
        ));

        Ok(tokens)
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.advance_char();
        }
    }

    fn lex_string(&mut self) -> Result<Token> {
        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;
        self.advance_char(); // consume opening quote

        let mut value = String::new();
        while let Some(ch) = self.peek_char() {
            match ch {
                '"' => {
                    self.advance_char(); // consume closing quote
                    let lexeme = self.slice(start, self.position);
                    return Ok(Token::new(
                        TokenKind::StringLiteral(value),
                        lexeme.to_string(),
                        start_line,
                        start_column,
                    ));
                }
                '\\' => {
                    self.advance_char();
                    let escaped = self.peek_char().ok_or_else(|| {
                        LexerError::new(
                            "Unterminated escape sequence in string literal",
                            self.line,
                            self.column,
                        )
                    })?;
                    let escaped_char = match escaped {
                        '"' => '"',
                        '\\' => '\\',
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    };
                    value.push(escaped_char);
                    self.advance_char();
                }
                '\n' => break,
                _ => {
                    value.push(ch);
                    self.advance_char();
                }
            }
        }

        Err(LexerError::new("Unterminated string literal", start_line, start_column).into())
    }

    fn lex_number(&mut self) -> Result<Token> {
        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;
        let mut is_float = false;

        self.consume_digits();

        // A fraction needs a digit after the dot, so `5.area()` stays an integer.
        if self.peek_char() == Some('.') && self.peek_next_char().is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.advance_char();
            self.consume_digits();
        }

        if matches!(self.peek_char(), Some('e' | 'E')) && self.exponent_follows() {
            is_float = true;
            self.advance_char();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.advance_char();
            }
            self.consume_digits();
        }

        let lexeme = self.slice(start, self.position).to_string();
        if is_float {
            let value = lexeme.parse::<f64>().map_err(|_| {
                LexerError::new(
                    format!("Invalid float literal '{lexeme}'"),
                    start_line,
                    start_column,
                )
            })?;
            Ok(Token::new(
                TokenKind::FloatLiteral(value),
                lexeme,
                start_line,
                start_column,
            ))
        } else {
            let value = lexeme.parse::<i64>().map_err(|_| {
                LexerError::new(
                    format!("Integer literal '{lexeme}' is out of range"),
                    start_line,
                    start_column,
                )
            })?;
            Ok(Token::new(
                TokenKind::IntegerLiteral(value),
                lexeme,
                start_line,
                start_column,
            ))
        }
    }

    fn consume_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance_char();
        }
    }

    /// True when the `e`/`E` under the cursor starts an exponent rather than an identifier.
    fn exponent_follows(&self) -> bool {
        let mut rest = self.input[self.position..].chars().skip(1);
        match rest.next() {
            Some('+' | '-') => rest.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    fn lex_identifier_or_keyword(&mut self) -> Token {
        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;
        let first = self.advance_char();

        if first != Some('π') {
            while let Some(ch) = self.peek_char() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    self.advance_char();
                } else {
                    break;
                }
            }
        }

        let lexeme = self.slice(start, self.position).to_string();
        let kind = match lexeme.as_str() {
            "true" => TokenKind::BooleanLiteral(true),
            "false" => TokenKind::BooleanLiteral(false),
            other => keyword_from_lexeme(other)
                .map(TokenKind::Keyword)
                .unwrap_or(TokenKind::Identifier),
        };
        Token::new(kind, lexeme, start_line, start_column)
    }

    fn one_or_two(&mut self, second: char, double: TokenKind, single: TokenKind) -> Token {
        if self.peek_next_char() == Some(second) {
            self.compound_token(double)
        } else {
            self.simple_token(single)
        }
    }

    fn compound_token(&mut self, kind: TokenKind) -> Token {
        let start_line = self.line;
        let start_column = self.column;
        let start = self.position;
        self.advance_char();
        self.advance_char();
        Token::new(
            kind,
            self.slice(start, self.position).to_string(),
            start_line,
            start_column,
        )
    }

    fn simple_token(&mut self, kind: TokenKind) -> Token {
        let start_line = self.line;
        let start_column = self.column;
        let start = self.position;
        self.advance_char();
        Token::new(
            kind,
            self.slice(start, self.position).to_string(),
            start_line,
            start_column,
        )
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.input[self.position..].chars();
        iter.next()?;
        iter.next()
    }

    fn advance_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        &self.input[start..end]
    }
}

fn keyword_from_lexeme(lexeme: &str) -> Option<Keyword> {
    match lexeme {
        "let" => Some(Keyword::Let),
        "const" => Some(Keyword::Const),
        "fnc" => Some(Keyword::Fnc),
        "obj" => Some(Keyword::Obj),
        "print" => Some(Keyword::Print),
        "if" => Some(Keyword::If),
        "else" => Some(Keyword::Else),
        "while" => Some(Keyword::While),
        "for" => Some(Keyword::For),
        "in" => Some(Keyword::In),
        "break" => Some(Keyword::Break),
        "return" => Some(Keyword::Return),
        _ => None,
    }
}
