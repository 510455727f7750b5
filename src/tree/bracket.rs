//! Bracketed tree reader
//!
//! Reads the usual serialized form of an already-parsed tree:
//!   (S (NP (D the) (N dog)) (VP (V barked)))
//! A bare token with no parentheses is a single-leaf tree.

use super::{NodeId, NodeKind, ParseTree, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Word(&'a str),
}

/// Splits input into parentheses and whitespace-delimited words
#[derive(Debug)]
struct Lexer<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let input: &'a str = self.input;
        let rest = &input[self.cursor..];
        let skipped = rest.len() - rest.trim_start().len();
        self.cursor += skipped;

        let rest = &input[self.cursor..];
        let start = self.cursor;
        let first = rest.chars().next()?;

        match first {
            '(' => {
                self.cursor += 1;
                Some((start, Token::Open))
            }
            ')' => {
                self.cursor += 1;
                Some((start, Token::Close))
            }
            _ => {
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                    .unwrap_or(rest.len());
                self.cursor += len;
                Some((start, Token::Word(&rest[..len])))
            }
        }
    }
}

fn syntax(offset: usize, reason: &str) -> TreeError {
    TreeError::Syntax {
        offset,
        reason: reason.to_string(),
    }
}

/// Build a `ParseTree` from bracketed notation without recursion
pub(super) fn read_bracketed(input: &str) -> Result<ParseTree, TreeError> {
    let mut tree = ParseTree::new();
    let mut open: Vec<NodeId> = Vec::new();
    let mut finished = false;
    let mut lexer = Lexer::new(input).peekable();

    while let Some((offset, token)) = lexer.next() {
        if finished {
            return Err(syntax(offset, "trailing input after tree"));
        }

        match token {
            Token::Open => {
                let label = match lexer.peek().copied() {
                    Some((_, Token::Word(word))) => {
                        lexer.next();
                        word
                    }
                    // Treebank files wrap each tree in an unlabeled root: `( (S ...))`
                    Some((_, Token::Open)) if open.is_empty() => "",
                    Some((at, _)) => return Err(syntax(at, "expected label after '('")),
                    None => return Err(syntax(input.len(), "unexpected end of input")),
                };
                let id = match open.last() {
                    Some(&parent) => tree.add_internal(parent, label)?,
                    None => tree.set_root(NodeKind::Internal, label)?,
                };
                open.push(id);
            }
            Token::Close => {
                open.pop().ok_or_else(|| syntax(offset, "unbalanced ')'"))?;
                if open.is_empty() {
                    finished = true;
                }
            }
            Token::Word(word) => match open.last() {
                Some(&parent) => {
                    tree.add_leaf(parent, word)?;
                }
                None => {
                    tree.set_root(NodeKind::Leaf, word)?;
                    finished = true;
                }
            },
        }
    }

    if !open.is_empty() {
        return Err(syntax(input.len(), "unclosed '('"));
    }
    if tree.is_empty() {
        return Err(syntax(0, "empty input"));
    }

    Ok(tree)
}
