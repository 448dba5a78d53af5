//! PGN tokenizer.

use crate::error::PgnError;

/// A lexical unit of PGN text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    TagOpen,
    TagClose,
    /// Tag value with escapes resolved.
    Str(String),
    /// Tag name or move text.
    Symbol(String),
    /// `12.` or `12...`; the dots are consumed.
    MoveNumber(u32),
    /// `$n`
    Nag(u32),
    /// Run of `!` and `?`.
    Suffix(String),
    Comment(String),
    VariationOpen,
    VariationClose,
    /// `1-0`, `0-1`, `1/2-1/2` or `*`.
    Result(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub line: usize,
}

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '#' | '=' | ':' | '-' | '/')
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Lexer<'a> {
        Lexer {
            chars: text.chars().peekable(),
            line: 1,
            at_line_start: true,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.at_line_start = true;
        } else {
            self.at_line_start = false;
        }
        Some(c)
    }

    fn skip_line(&mut self) -> String {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn take_while(&mut self, mut text: String, pred: impl Fn(char) -> bool) -> String {
        while let Some(&c) = self.chars.peek() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn brace_comment(&mut self, line: usize) -> Result<Token, PgnError> {
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('}') => return Ok(Token::Comment(text.trim().to_string())),
                Some(c) => text.push(c),
                None => return Err(PgnError::UnterminatedComment { line }),
            }
        }
    }

    fn string(&mut self, line: usize) -> Result<Token, PgnError> {
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::Str(text)),
                Some('\\') => match self.bump() {
                    Some(c @ ('"' | '\\')) => text.push(c),
                    Some(c) => {
                        text.push('\\');
                        text.push(c);
                    }
                    None => return Err(PgnError::UnterminatedString { line }),
                },
                Some(c) => text.push(c),
                None => return Err(PgnError::UnterminatedString { line }),
            }
        }
    }

    /// Symbols that start with a digit: move numbers, results, `0-0` castling.
    fn numeric(&mut self, first: char) -> Token {
        let text = self.take_while(first.to_string(), is_symbol_char);
        if RESULTS.contains(&text.as_str()) {
            return Token::Result(text);
        }
        if let Ok(number) = text.parse::<u32>() {
            while self.chars.peek() == Some(&'.') {
                self.bump();
            }
            return Token::MoveNumber(number);
        }
        if text.starts_with("0-0") {
            return Token::Symbol(text.replace('0', "O"));
        }
        Token::Symbol(text)
    }

    fn next_token(&mut self) -> Result<Option<Spanned>, PgnError> {
        loop {
            let escape_line = self.at_line_start;
            let line = self.line;
            let Some(c) = self.bump() else {
                return Ok(None);
            };
            let token = match c {
                c if c.is_whitespace() => continue,
                '%' if escape_line => {
                    self.skip_line();
                    continue;
                }
                '.' => continue,
                '[' => Token::TagOpen,
                ']' => Token::TagClose,
                '(' => Token::VariationOpen,
                ')' => Token::VariationClose,
                '{' => self.brace_comment(line)?,
                ';' => Token::Comment(self.skip_line().trim().to_string()),
                '"' => self.string(line)?,
                '*' => Token::Result("*".to_string()),
                '-' if self.chars.peek() == Some(&'-') => {
                    Token::Symbol(self.take_while(c.to_string(), |c| c == '-'))
                }
                '$' => {
                    let digits = self.take_while(String::new(), |c| c.is_ascii_digit());
                    let nag = digits
                        .parse()
                        .map_err(|_| PgnError::UnexpectedChar { line, character: '$' })?;
                    Token::Nag(nag)
                }
                '!' | '?' => {
                    Token::Suffix(self.take_while(c.to_string(), |c| matches!(c, '!' | '?')))
                }
                c if c.is_ascii_digit() => self.numeric(c),
                c if c.is_ascii_alphabetic() => {
                    Token::Symbol(self.take_while(c.to_string(), is_symbol_char))
                }
                character => return Err(PgnError::UnexpectedChar { line, character }),
            };
            return Ok(Some(Spanned { token, line }));
        }
    }
}

/// Split `text` into tokens, each tagged with the line it starts on.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Spanned>, PgnError> {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}
