//! DOT tokenizer.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Equals,
    Semicolon,
    Comma,
    Colon,
    /// `->`
    Arrow,
    /// `--`
    Line,
    /// Identifier or numeral.
    Ident(String),
    /// Double-quoted string, `\"` and `\\` resolved and `+` pieces joined.
    Quoted(String),
    /// `<...>` string without the outer brackets.
    Html(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    src: &'a str,
    line: usize,
    column: usize,
    at_line_start: bool,
}

/// Split DOT source into tokens.
///
/// # Errors
///
/// Returns [`Error::DotSyntax`] on unterminated strings or comments and on
/// characters that cannot start a token.
pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer {
        chars: src.char_indices().peekable(),
        src,
        line: 1,
        column: 1,
        at_line_start: true,
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

const fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

impl Lexer<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
            if !c.is_whitespace() {
                self.at_line_start = false;
            }
        }
        Some(c)
    }

    fn error(&self, line: usize, column: usize, message: impl Into<String>) -> Error {
        Error::DotSyntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') if self.at_line_start => {
                    // preprocessor output line
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(self.error(line, column, "unterminated comment")),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_trivia()?;
        let (line, column) = (self.line, self.column);
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = match c {
            '{' | '}' | '[' | ']' | '=' | ';' | ',' | ':' => {
                self.bump();
                match c {
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '=' => TokenKind::Equals,
                    ';' => TokenKind::Semicolon,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Colon,
                }
            }
            '-' => match self.peek_second() {
                Some('>') => {
                    self.bump();
                    self.bump();
                    TokenKind::Arrow
                }
                Some('-') => {
                    self.bump();
                    self.bump();
                    TokenKind::Line
                }
                Some(d) if d.is_ascii_digit() || d == '.' => TokenKind::Ident(self.numeral()),
                _ => return Err(self.error(line, column, "unexpected `-`")),
            },
            '"' => TokenKind::Quoted(self.quoted(line, column)?),
            '<' => TokenKind::Html(self.html(line, column)?),
            c if c.is_ascii_digit() || c == '.' => TokenKind::Ident(self.numeral()),
            c if is_ident_start(c) => {
                let mut text = String::new();
                while let Some(c) = self.peek().filter(|&c| is_ident_char(c)) {
                    text.push(c);
                    self.bump();
                }
                TokenKind::Ident(text)
            }
            other => return Err(self.error(line, column, format!("unexpected character `{other}`"))),
        };

        Ok(Some(Token { kind, line, column }))
    }

    fn numeral(&mut self) -> String {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || (c == '.' && !seen_dot) {
                seen_dot |= c == '.';
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        text
    }

    /// A quoted string plus any `+ "..."` continuations.
    fn quoted(&mut self, line: usize, column: usize) -> Result<String> {
        let mut text = self.quoted_piece(line, column)?;
        loop {
            let checkpoint = (self.chars.clone(), self.line, self.column, self.at_line_start);
            self.skip_trivia()?;
            if self.peek() == Some('+') {
                self.bump();
                self.skip_trivia()?;
                let (l, c) = (self.line, self.column);
                if self.peek() != Some('"') {
                    return Err(self.error(l, c, "expected a quoted string after `+`"));
                }
                text.push_str(&self.quoted_piece(l, c)?);
            } else {
                (self.chars, self.line, self.column, self.at_line_start) = checkpoint;
                return Ok(text);
            }
        }
    }

    fn quoted_piece(&mut self, line: usize, column: usize) -> Result<String> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => match self.peek() {
                    Some(c @ ('"' | '\\')) => {
                        self.bump();
                        text.push(c);
                    }
                    Some('\n') => {
                        self.bump();
                    }
                    Some('\r') if self.peek_second() == Some('\n') => {
                        self.bump();
                        self.bump();
                    }
                    _ => text.push('\\'),
                },
                Some(c) => text.push(c),
                None => return Err(self.error(line, column, "unterminated string")),
            }
        }
    }

    fn html(&mut self, line: usize, column: usize) -> Result<String> {
        self.bump();
        let start = self.offset();
        let mut depth = 1usize;
        loop {
            match self.peek() {
                Some('<') => depth += 1,
                Some('>') => {
                    depth -= 1;
                    if depth == 0 {
                        let end = self.offset();
                        let text = self.src[start..end].to_string();
                        self.bump();
                        return Ok(text);
                    }
                }
                Some(_) => {}
                None => return Err(self.error(line, column, "unterminated HTML string")),
            }
            self.bump();
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |&(i, _)| i)
    }
}
