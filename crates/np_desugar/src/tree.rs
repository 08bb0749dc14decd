//! Parenthesis tree over the token stream.
//!
//! Everything outside structural parentheses stays as opaque text runs, so
//! comments and literals never influence the shape of the tree. Nesting is
//! capped at [`MAX_NESTING`] so the recursive walks stay within the stack.

use std::ops::Range;

use np_lexer::{LexError, Token, TokenKind, MAX_NESTING};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Verbatim source bytes.
    Text(Range<usize>),
    /// A parenthesized group; `line` is where its `(` sits.
    Group { line: usize, children: Vec<Node> },
}

/// Build the group tree for `tokens`.
pub fn build(tokens: &[Token]) -> Result<Vec<Node>, LexError> {
    let mut pos = 0;
    let nodes = parse_seq(tokens, &mut pos, None, 0)?;
    debug_assert_eq!(pos, tokens.len());
    Ok(nodes)
}

/// Parse nodes until the `)` closing a group opened on `open_line`, or the
/// end of input at the top level. `level` counts the enclosing groups.
fn parse_seq(
    tokens: &[Token],
    pos: &mut usize,
    open_line: Option<usize>,
    level: usize,
) -> Result<Vec<Node>, LexError> {
    let mut nodes = Vec::new();
    let mut text: Option<Range<usize>> = None;

    while *pos < tokens.len() {
        let token = tokens[*pos];
        match token.kind {
            TokenKind::LParen => {
                if level >= MAX_NESTING {
                    return Err(LexError::NestingTooDeep {
                        line: token.line,
                        limit: MAX_NESTING,
                    });
                }
                flush(&mut nodes, &mut text);
                *pos += 1;
                let children = parse_seq(tokens, pos, Some(token.line), level + 1)?;
                nodes.push(Node::Group {
                    line: token.line,
                    children,
                });
            }
            TokenKind::RParen => {
                if open_line.is_none() {
                    return Err(LexError::UnexpectedCloseParen { line: token.line });
                }
                flush(&mut nodes, &mut text);
                *pos += 1;
                return Ok(nodes);
            }
            _ => {
                text = Some(match text {
                    Some(run) => run.start..token.end,
                    None => token.start..token.end,
                });
                *pos += 1;
            }
        }
    }

    if let Some(line) = open_line {
        return Err(LexError::UnclosedParen { line });
    }
    flush(&mut nodes, &mut text);
    Ok(nodes)
}

fn flush(nodes: &mut Vec<Node>, text: &mut Option<Range<usize>>) {
    if let Some(run) = text.take() {
        nodes.push(Node::Text(run));
    }
}

/// Deepest group nesting in `nodes`.
pub fn depth(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            Node::Text(_) => 0,
            Node::Group { children, .. } => 1 + depth(children),
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_lexer::tokenize;

    fn tree(source: &str) -> Result<Vec<Node>, LexError> {
        build(&tokenize(source).unwrap())
    }

    #[test]
    fn groups_nest() {
        let nodes = tree("f(a, g(b))").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text(0..1),
                Node::Group {
                    line: 1,
                    children: vec![
                        Node::Text(2..6),
                        Node::Group {
                            line: 1,
                            children: vec![Node::Text(7..8)],
                        },
                    ],
                },
            ]
        );
        assert_eq!(depth(&nodes), 2);
    }

    #[test]
    fn literal_parens_stay_in_text() {
        let nodes = tree("x := \"(\" // )").unwrap();
        assert_eq!(nodes, vec![Node::Text(0..13)]);
        assert_eq!(depth(&nodes), 0);
    }

    #[test]
    fn unbalanced_input_is_fatal() {
        assert_eq!(
            tree("a\n)").unwrap_err(),
            LexError::UnexpectedCloseParen { line: 2 }
        );
        assert_eq!(
            tree("f(\ng(x)").unwrap_err(),
            LexError::UnclosedParen { line: 1 }
        );
    }

    #[test]
    fn nesting_past_the_limit_is_an_error() {
        let ok = format!("{}{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(depth(&tree(&ok).unwrap()), MAX_NESTING);

        let deep = format!("{}{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert_eq!(
            tree(&deep).unwrap_err(),
            LexError::NestingTooDeep {
                line: 1,
                limit: MAX_NESTING
            }
        );
    }
}
