//! Bottom-up rewriting of the group tree.
//!
//! Children are rendered before their parent, so by the time a group is
//! inspected its interior is already positional and free of `name:`
//! markers from nested calls.

use np_lexer::LexError;
use np_parser::preprocess::{callee_start, rewrite_call};

use crate::tree::Node;

/// Render `nodes` back to text with every named call rewritten.
pub fn render(source: &str, nodes: &[Node]) -> Result<String, LexError> {
    let mut out = String::with_capacity(source.len());
    render_into(&mut out, source, nodes)?;
    Ok(out)
}

fn render_into(out: &mut String, source: &str, nodes: &[Node]) -> Result<(), LexError> {
    for node in nodes {
        match node {
            Node::Text(range) => out.push_str(&source[range.clone()]),
            Node::Group { children, .. } => {
                let interior = render(source, children)?;
                let callee_from = callee_start(out);
                let callee = out[callee_from..].to_string();
                match rewrite_call(&callee, &interior)? {
                    Some(call) => {
                        out.truncate(callee_from);
                        out.push_str(&call);
                    }
                    None => {
                        out.push('(');
                        out.push_str(&interior);
                        out.push(')');
                    }
                }
            }
        }
    }
    Ok(())
}
