//! Shared utilities for preprocessing passes.

use np_lexer::{is_word_char, Token, TokenKind};

/// Go keywords. A keyword in front of `(` is never a callee, so
/// `func(a: int)` literals and `if (x)` stay as written.
const KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Byte offset where the run of identifier characters ending `text` starts.
pub(crate) fn trailing_word_start(text: &str) -> usize {
    text.char_indices()
        .rev()
        .take_while(|&(_, c)| is_word_char(c))
        .last()
        .map_or(text.len(), |(i, _)| i)
}

/// Byte offset where the callee ending `text` starts: an identifier,
/// optionally followed by one bracketed type argument list (`Map[int]`).
/// Returns `text.len()` when the text does not end in a callee.
///
/// Type arguments may only hold identifiers, nested brackets, `,` `.` `*`
/// and blanks, so the scan never crosses a literal, a comment or a group.
pub fn callee_start(text: &str) -> usize {
    let Some(inner) = text.strip_suffix(']') else {
        return trailing_word_start(text);
    };
    let mut depth = 1usize;
    for (i, c) in inner.char_indices().rev() {
        match c {
            ']' => depth += 1,
            '[' => {
                depth -= 1;
                if depth == 0 {
                    let word = trailing_word_start(&text[..i]);
                    return if word < i { word } else { text.len() };
                }
            }
            c if is_word_char(c) || matches!(c, ',' | '.' | '*' | ' ' | '\t') => {}
            _ => break,
        }
    }
    text.len()
}

/// Split a callee into its identifier and any type argument list.
pub(crate) fn split_type_args(callee: &str) -> (&str, &str) {
    callee.split_at(callee.find('[').unwrap_or(callee.len()))
}

/// Index of the next token at or after `from` that is not whitespace or a
/// comment.
pub(super) fn next_significant(tokens: &[Token], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !tokens[i].is_trivia())
}

/// Index of the token closing the bracket opened at `open`.
pub(super) fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let (opener, closer) = match tokens[open].kind {
        TokenKind::LParen => (TokenKind::LParen, TokenKind::RParen),
        TokenKind::LBracket => (TokenKind::LBracket, TokenKind::RBracket),
        TokenKind::LBrace => (TokenKind::LBrace, TokenKind::RBrace),
        _ => return None,
    };
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.kind == opener {
            depth += 1;
        } else if token.kind == closer {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// A byte range of the source and the text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Apply non-overlapping edits. Edits may arrive in any order.
pub(super) fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| e.start);

    let mut result = String::with_capacity(source.len());
    let mut last = 0;
    for edit in edits {
        debug_assert!(edit.start >= last, "overlapping edits");
        result.push_str(&source[last..edit.start]);
        result.push_str(&edit.replacement);
        last = edit.end;
    }
    result.push_str(&source[last..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_lexer::tokenize;

    #[test]
    fn trailing_word() {
        assert_eq!(trailing_word_start("x = obj.method"), 8);
        assert_eq!(trailing_word_start("x = "), 4);
        assert_eq!(trailing_word_start("größe"), 0);
    }

    #[test]
    fn callee_may_carry_type_arguments() {
        assert_eq!(callee_start("x := Map[int]"), 5);
        assert_eq!(callee_start("x := pkg.Pair[K, map[K][]V]"), 9);
        assert_eq!(callee_start("x := s.Push"), 7);
        assert_eq!(split_type_args("Map[int]"), ("Map", "[int]"));
        assert_eq!(split_type_args("Map"), ("Map", ""));
    }

    #[test]
    fn bare_or_unscannable_brackets_are_not_callees() {
        assert_eq!(callee_start("x := (a)[0]"), 11);
        assert_eq!(callee_start("x := []"), 7);
        assert_eq!(callee_start("F[func(int)]"), 12);
        assert_eq!(callee_start(r#"m["k"]"#), 6);
        assert_eq!(callee_start("x := "), 5);
    }

    #[test]
    fn matching_close_skips_nested_pairs() {
        let tokens = tokenize("(a(b)[c])d").unwrap();
        assert_eq!(matching_close(&tokens, 0), Some(8));
        assert_eq!(matching_close(&tokens, 2), Some(4));
        assert_eq!(matching_close(&tokens, 1), None);
    }

    #[test]
    fn edits_apply_in_position_order() {
        let edits = vec![
            Edit {
                start: 4,
                end: 5,
                replacement: "B".into(),
            },
            Edit {
                start: 0,
                end: 1,
                replacement: "A".into(),
            },
        ];
        assert_eq!(apply_edits("a = b", edits), "A = B");
    }
}
