//! Call site rewriting pass.
//!
//! Works on depth-tagged text (see [`np_lexer::tag_depths`]). For each depth
//! from the deepest level up to zero, every span
//! `callee? Open(d) interior Close(d)` is replaced either by a positional
//! call (`named(a: 1, b: 2)` -> `named_a_b(1, 2)`) or, when the interior has
//! no `name:` markers, by the same text with plain parentheses. A callee is
//! an identifier with optional type arguments (`Map[int](xs: a)` ->
//! `Map_xs[int](a)`).
//!
//! Rewriting a level turns its tags back into `(` and `)`, so by the time
//! depth `d` is processed every span at that depth has a tag-free interior
//! and a flat pattern is enough to match it.

use std::sync::LazyLock;

use anyhow::Result;
use np_ast::{mangle, DepthTag};
use np_lexer::{restore_reserved, tag_depths, LexError};
use regex::Regex;

use super::util::{callee_start, is_keyword, split_type_args};
use crate::params::parse_invocation;

/// An innermost tagged span: open depth, interior, close depth.
static SPAN: LazyLock<Regex> = LazyLock::new(|| {
    let (open, close, end) = (DepthTag::OPEN, DepthTag::CLOSE, DepthTag::END);
    Regex::new(&format!(
        r"{open}(\d+){end}([^{open}{close}]*){close}(\d+){end}"
    ))
    .unwrap()
});

/// Rewrite `callee(interior)` into a positional call when the interior is a
/// named argument list. Returns `None` when the span must be kept as is.
pub fn rewrite_call(callee: &str, interior: &str) -> Result<Option<String>, LexError> {
    let (word, type_args) = split_type_args(callee);
    if word.is_empty() || word.starts_with(|c: char| c.is_ascii_digit()) || is_keyword(word) {
        return Ok(None);
    }

    let args = parse_invocation(interior)?;
    if args.is_empty() {
        return Ok(None);
    }

    let mangled = mangle(word, args.names());
    tracing::debug!(callee, mangled = %mangled, args = args.len(), "rewrote call");
    Ok(Some(format!(
        "{mangled}{type_args}({})",
        args.render_arguments()
    )))
}

/// Rewrite every named call site in `source`, innermost first.
pub fn rewrite_invocations(source: &str) -> Result<String> {
    let tagged = tag_depths(source)?;
    let mut text = tagged.text;

    for depth in (0..=tagged.max_depth).rev() {
        text = rewrite_depth(&text, depth)?;
    }

    Ok(restore_reserved(&text))
}

fn rewrite_depth(text: &str, depth: usize) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    let mut spans = 0usize;

    for caps in SPAN.captures_iter(text) {
        let (Some(whole), Some(open), Some(interior), Some(close)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        // Innermost spans at shallower depths wait for their own pass.
        if open.as_str().parse::<usize>().ok() != Some(depth) {
            continue;
        }
        debug_assert_eq!(open.as_str(), close.as_str());

        let callee_from = last + callee_start(&text[last..whole.start()]);
        let callee = &text[callee_from..whole.start()];
        let interior = interior.as_str();
        let replacement = match rewrite_call(callee, interior)? {
            Some(call) => call,
            None => format!("{callee}({interior})"),
        };

        result.push_str(&text[last..callee_from]);
        result.push_str(&replacement);
        last = whole.end();
        spans += 1;
    }

    tracing::trace!(depth, spans, "depth pass");
    result.push_str(&text[last..]);
    Ok(result)
}
