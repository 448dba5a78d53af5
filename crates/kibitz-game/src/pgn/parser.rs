//! Tag pairs and movetext into a [`PgnNode`] tree.

use crate::error::PgnError;
use crate::headers::Headers;
use crate::pgn::PgnNode;
use crate::pgn::lexer::{Spanned, Token, tokenize};

/// A parsed game: tags, move tree and termination marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPgn {
    pub headers: Headers,
    /// Root node; it carries no move, only the comment before the first one.
    pub root: PgnNode,
    /// `1-0`, `0-1`, `1/2-1/2` or `*`, if the movetext ends with one.
    pub result: Option<String>,
}

/// A move on a flat line with the sidelines that replace it.
struct LineMove {
    node: PgnNode,
    variations: Vec<Vec<LineMove>>,
}

struct Parser {
    tokens: std::vec::IntoIter<Spanned>,
    pending: Option<Spanned>,
    last_line: usize,
    result: Option<String>,
}

fn append_comment(slot: &mut Option<String>, text: String) {
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(&text);
        }
        None => *slot = Some(text),
    }
}

impl Parser {
    fn next(&mut self) -> Option<Spanned> {
        let next = self.pending.take().or_else(|| self.tokens.next())?;
        self.last_line = next.line;
        Some(next)
    }

    fn peek(&mut self) -> Option<&Token> {
        if self.pending.is_none() {
            self.pending = self.tokens.next();
        }
        self.pending.as_ref().map(|s| &s.token)
    }

    fn headers(&mut self) -> Result<Headers, PgnError> {
        let mut headers = Headers::new();
        while self.peek() == Some(&Token::TagOpen) {
            let line = self.next().map_or(self.last_line, |s| s.line);
            let malformed = PgnError::MalformedTag { line };
            let Some(Token::Symbol(name)) = self.next().map(|s| s.token) else {
                return Err(malformed);
            };
            let Some(Token::Str(value)) = self.next().map(|s| s.token) else {
                return Err(malformed);
            };
            if self.next().map(|s| s.token) != Some(Token::TagClose) {
                return Err(malformed);
            }
            headers.set(name, value);
        }
        Ok(headers)
    }

    /// Read moves until the end of the current line.
    ///
    /// Returns the moves and any comment that came before the first of them.
    /// At `depth` 0 the line ends at a result token or end of input; deeper
    /// lines end at their closing parenthesis.
    fn line(
        &mut self,
        depth: usize,
        open_line: usize,
    ) -> Result<(Vec<LineMove>, Option<String>), PgnError> {
        let mut moves: Vec<LineMove> = Vec::new();
        let mut leading: Option<String> = None;

        while let Some(Spanned { token, line }) = self.next() {
            match token {
                Token::MoveNumber(_) => {}
                Token::Symbol(san) => {
                    let mut node = PgnNode::new(san);
                    if depth > 0 && moves.is_empty() {
                        node.starting_comment = leading.take();
                    }
                    moves.push(LineMove {
                        node,
                        variations: Vec::new(),
                    });
                }
                Token::Suffix(glyphs) => {
                    if let Some(last) = moves.last_mut() {
                        last.node.suffix = Some(glyphs.chars().take(2).collect());
                    }
                }
                Token::Nag(nag) => {
                    if let Some(last) = moves.last_mut() {
                        last.node.nags.push(nag);
                    }
                }
                Token::Comment(text) => match moves.last_mut() {
                    Some(last) => append_comment(&mut last.node.comment, text),
                    None => append_comment(&mut leading, text),
                },
                Token::VariationOpen => {
                    if moves.is_empty() {
                        return Err(PgnError::UnbalancedVariation { line });
                    }
                    let (variation, _) = self.line(depth + 1, line)?;
                    if let Some(last) = moves.last_mut()
                        && !variation.is_empty()
                    {
                        last.variations.push(variation);
                    }
                }
                Token::VariationClose if depth > 0 => return Ok((moves, leading)),
                Token::VariationClose => return Err(PgnError::UnbalancedVariation { line }),
                Token::Result(_) if depth > 0 => {
                    return Err(PgnError::UnbalancedVariation { line: open_line });
                }
                Token::Result(result) => {
                    self.result = Some(result);
                    break;
                }
                Token::TagOpen | Token::TagClose | Token::Str(_) => {
                    return Err(PgnError::MalformedTag { line });
                }
            }
        }

        if depth > 0 {
            return Err(PgnError::UnbalancedVariation { line: open_line });
        }
        Ok((moves, leading))
    }
}

/// Hang `line` under `children`: its first move, then the sidelines that
/// replace that move, with the rest of the line nested under the first move.
fn attach(children: &mut Vec<PgnNode>, mut line: std::vec::IntoIter<LineMove>) {
    let Some(LineMove {
        mut node,
        variations,
    }) = line.next()
    else {
        return;
    };
    attach(&mut node.children, line);
    children.push(node);
    for variation in variations {
        attach(children, variation.into_iter());
    }
}

/// Parse a single PGN game.
///
/// Anything after the termination marker is ignored.
pub fn parse(text: &str) -> Result<ParsedPgn, PgnError> {
    let mut parser = Parser {
        tokens: tokenize(text)?.into_iter(),
        pending: None,
        last_line: 1,
        result: None,
    };
    let headers = parser.headers()?;
    let (mainline, leading) = parser.line(0, parser.last_line)?;

    let mut root = PgnNode {
        comment: leading,
        ..PgnNode::default()
    };
    attach(&mut root.children, mainline.into_iter());

    Ok(ParsedPgn {
        headers,
        root,
        result: parser.result,
    })
}
