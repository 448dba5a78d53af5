//! Portable Game Notation: tokenizer, tree parser and writer.

mod lexer;
mod parser;
pub(crate) mod writer;

pub use parser::{ParsedPgn, parse};

/// One node of a parsed move tree.
///
/// `children[0]` continues the main line; later children are sidelines that
/// replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgnNode {
    /// Move text as written; `None` only for the root.
    pub san: Option<String>,
    /// `!`, `?`, `!!`, `??`, `!?` or `?!`.
    pub suffix: Option<String>,
    pub nags: Vec<u32>,
    /// Comment following the move.
    pub comment: Option<String>,
    /// Comment opening a variation, before its first move.
    pub starting_comment: Option<String>,
    pub children: Vec<PgnNode>,
}

impl PgnNode {
    pub(crate) fn new(san: String) -> PgnNode {
        PgnNode {
            san: Some(san),
            ..PgnNode::default()
        }
    }

    /// Nodes along the main line below this one.
    pub fn mainline(&self) -> impl Iterator<Item = &PgnNode> {
        std::iter::successors(self.children.first(), |node| node.children.first())
    }

    /// Sidelines branching from this node.
    pub fn variations(&self) -> &[PgnNode] {
        self.children.get(1..).unwrap_or(&[])
    }
}

/// Options for [`Game::load_pgn`](crate::Game::load_pgn).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PgnOptions {
    /// Require `SetUp "1"` with `FEN` and read moves as strict SAN.
    pub strict: bool,
}

/// Options for [`Game::pgn`](crate::Game::pgn).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnWriteOptions {
    pub newline: String,
    /// Wrap movetext at this column; 0 disables wrapping.
    pub max_width: usize,
}

impl Default for PgnWriteOptions {
    fn default() -> PgnWriteOptions {
        PgnWriteOptions {
            newline: "\n".to_string(),
            max_width: 0,
        }
    }
}
