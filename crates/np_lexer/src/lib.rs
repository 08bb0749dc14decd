//! Literal-aware scanner for named-parameter Go.
//!
//! One left-to-right pass splits the source into tagged tokens so later
//! stages never look at raw characters inside comments or literals:
//!
//! - `// ...` and `/* ... */` comments
//! - `"..."` strings, `'...'` runes (escaped pairs included), `` `...` `` raw strings
//! - brackets, `,`, `:`, `:=`, words, whitespace runs, other punctuation
//!
//! [`tag_depths`] builds on the token stream and replaces every structural
//! parenthesis with a [`DepthTag`] naming its nesting level. Tag characters
//! already present in the source are escaped so they never read as tags;
//! [`restore_reserved`] puts them back.

use np_ast::DepthTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LineComment,
    BlockComment,
    Str,
    Rune,
    RawStr,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    /// `:=`
    Define,
    /// Identifier or number: a run of alphanumerics and `_`.
    Word,
    Whitespace,
    Punct,
}

/// A token with its byte span and the 1-based line it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Whitespace and comments: tokens that never carry structure.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// Fatal scanning errors. Each carries the 1-based line where the offending
/// construct starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },
    #[error("line {line}: unterminated rune literal")]
    UnterminatedRune { line: usize },
    #[error("line {line}: unterminated raw string literal")]
    UnterminatedRawString { line: usize },
    #[error("line {line}: unterminated block comment")]
    UnterminatedComment { line: usize },
    #[error("line {line}: unexpected `)` with no matching `(`")]
    UnexpectedCloseParen { line: usize },
    #[error("line {line}: `(` is never closed")]
    UnclosedParen { line: usize },
    #[error("line {line}: parentheses nested deeper than {limit} levels")]
    NestingTooDeep { line: usize, limit: usize },
}

/// Deepest parenthesis nesting accepted by [`tag_depths`] and by callers
/// that walk groups recursively.
pub const MAX_NESTING: usize = 512;

struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    /// Char index.
    i: usize,
    /// Byte offset of `chars[i]`.
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

/// Split `source` into tokens covering every byte exactly once.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer {
        source,
        chars: source.chars().collect(),
        i: 0,
        pos: 0,
        line: 1,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl Lexer<'_> {
    fn run(&mut self) -> Result<(), LexError> {
        while self.i < self.chars.len() {
            let start = self.pos;
            let line = self.line;
            let c = self.chars[self.i];

            let kind = match c {
                '/' if self.peek(1) == Some('/') => {
                    while self.i < self.chars.len() && self.chars[self.i] != '\n' {
                        self.bump();
                    }
                    TokenKind::LineComment
                }
                '/' if self.peek(1) == Some('*') => {
                    self.bump();
                    self.bump();
                    loop {
                        if self.i >= self.chars.len() {
                            return Err(LexError::UnterminatedComment { line });
                        }
                        if self.chars[self.i] == '*' && self.peek(1) == Some('/') {
                            self.bump();
                            self.bump();
                            break;
                        }
                        self.bump();
                    }
                    TokenKind::BlockComment
                }
                '"' => {
                    self.quoted('"', LexError::UnterminatedString { line })?;
                    TokenKind::Str
                }
                '\'' => {
                    self.quoted('\'', LexError::UnterminatedRune { line })?;
                    TokenKind::Rune
                }
                '`' => {
                    self.bump();
                    loop {
                        match self.chars.get(self.i).copied() {
                            None => return Err(LexError::UnterminatedRawString { line }),
                            Some('`') => {
                                self.bump();
                                break;
                            }
                            Some(_) => self.bump(),
                        }
                    }
                    TokenKind::RawStr
                }
                ':' if self.peek(1) == Some('=') => {
                    self.bump();
                    self.bump();
                    TokenKind::Define
                }
                c if c.is_whitespace() => {
                    while self.i < self.chars.len() && self.chars[self.i].is_whitespace() {
                        self.bump();
                    }
                    TokenKind::Whitespace
                }
                c if is_word_char(c) => {
                    while self.i < self.chars.len() && is_word_char(self.chars[self.i]) {
                        self.bump();
                    }
                    TokenKind::Word
                }
                c => {
                    self.bump();
                    match c {
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        ',' => TokenKind::Comma,
                        ':' => TokenKind::Colon,
                        _ => TokenKind::Punct,
                    }
                }
            };

            self.tokens.push(Token {
                kind,
                start,
                end: self.pos,
                line,
            });
        }
        debug_assert_eq!(self.pos, self.source.len());
        Ok(())
    }

    /// Consume a `"` or `'` literal through its unescaped closing quote.
    /// Interpreted literals cannot span lines.
    fn quoted(&mut self, quote: char, unterminated: LexError) -> Result<(), LexError> {
        self.bump();
        loop {
            match self.chars.get(self.i).copied() {
                None | Some('\n') => return Err(unterminated),
                Some('\\') => {
                    self.bump();
                    match self.chars.get(self.i).copied() {
                        None | Some('\n') => return Err(unterminated),
                        Some(_) => self.bump(),
                    }
                }
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => self.bump(),
            }
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.i + ahead).copied()
    }

    fn bump(&mut self) {
        let c = self.chars[self.i];
        if c == '\n' {
            self.line += 1;
        }
        self.pos += c.len_utf8();
        self.i += 1;
    }
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Source text with structural parentheses replaced by depth tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthTagged {
    pub text: String,
    /// Deepest nesting reached; `0` when the text has no parentheses.
    pub max_depth: usize,
}

/// Replace every structural `(` with `Open(depth)` (then descend) and every
/// `)` with `Close(depth)` (after ascending), so a matching pair carries the
/// same number. Parentheses inside comments and literals are left alone.
pub fn tag_depths(source: &str) -> Result<DepthTagged, LexError> {
    let tokens = tokenize(source)?;
    let mut text = String::with_capacity(source.len() + source.len() / 8);
    let mut open_lines: Vec<usize> = Vec::new();
    let mut max_depth = 0;

    for token in &tokens {
        match token.kind {
            TokenKind::LParen => {
                let depth = open_lines.len();
                if depth >= MAX_NESTING {
                    return Err(LexError::NestingTooDeep {
                        line: token.line,
                        limit: MAX_NESTING,
                    });
                }
                text.push_str(&DepthTag::Open(depth).to_string());
                open_lines.push(token.line);
                max_depth = max_depth.max(open_lines.len());
            }
            TokenKind::RParen => {
                if open_lines.pop().is_none() {
                    return Err(LexError::UnexpectedCloseParen { line: token.line });
                }
                text.push_str(&DepthTag::Close(open_lines.len()).to_string());
            }
            _ => push_escaped(&mut text, token.text(source)),
        }
    }

    if let Some(&line) = open_lines.last() {
        return Err(LexError::UnclosedParen { line });
    }

    Ok(DepthTagged { text, max_depth })
}

/// Second character of an escaped tag character, after [`DepthTag::END`].
/// None of them is a word character, bracket or digit.
const ESCAPES: [(char, char); 3] = [
    (DepthTag::OPEN, '<'),
    (DepthTag::CLOSE, '>'),
    (DepthTag::END, '~'),
];

fn push_escaped(out: &mut String, text: &str) {
    if !text.chars().any(DepthTag::is_reserved) {
        out.push_str(text);
        return;
    }
    for c in text.chars() {
        match ESCAPES.iter().find(|&&(raw, _)| raw == c) {
            Some(&(_, code)) => {
                out.push(DepthTag::END);
                out.push(code);
            }
            None => out.push(c),
        }
    }
}

/// Undo the escaping applied by [`tag_depths`]. Only valid once every tag
/// has been turned back into a parenthesis.
pub fn restore_reserved(text: &str) -> String {
    if !text.contains(DepthTag::END) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != DepthTag::END {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(code) => match ESCAPES.iter().find(|&&(_, esc)| esc == code) {
                Some(&(raw, _)) => out.push(raw),
                None => {
                    out.push(c);
                    out.push(code);
                }
            },
            None => out.push(c),
        }
    }
    out
}
