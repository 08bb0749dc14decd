//! Parameter list parsing for the text between a pair of parentheses.
//!
//! Two modes:
//!
//! - Definition: `a, b: int, c: string` -> `a int`, `b int`, `c string`.
//!   Bare names share the type of the next `name: type` item.
//! - Invocation: `a: f(x, y), b: "s"` -> `a = f(x, y)`, `b = "s"`. A value
//!   runs up to the next top-level `, name:` or the end of the list, so
//!   `nums: 1, 2, 3` passes all three values to a variadic `nums`.
//!
//! Only top-level tokens count: separators inside `()`, `[]`, `{}`, string
//! literals or comments never split the list. Anything that does not fit the
//! named shape yields an empty [`NamedList`], which callers treat as "leave
//! unchanged".
//!
//! Each entry remembers the whitespace around it so rendering can keep line
//! breaks where the input had them.

use np_ast::{Parameter, ParameterList};
use np_lexer::{tokenize, LexError, Token, TokenKind};

/// One parameter plus the text that surrounded it in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub param: Parameter,
    /// Between the preceding comma (or the open paren) and the name.
    pub lead: String,
    /// Between the name and its colon. Rendered ahead of the name so a line
    /// break never ends up right after an identifier.
    pub before_colon: String,
    /// Between the colon and the detail.
    pub gap: String,
    /// Between the detail and the next comma (or the close paren).
    pub trail: String,
}

/// A parsed named-parameter list. Empty when the text is not one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedList {
    pub segments: Vec<Segment>,
    /// Text after a trailing comma, if the list ends with one.
    pub trailing_comma: Option<String>,
}

impl NamedList {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.param.name.as_str())
    }

    pub fn params(&self) -> ParameterList {
        self.segments.iter().map(|s| s.param.clone()).collect()
    }

    /// `name type, name type` for a positional definition.
    pub fn render_definition(&self) -> String {
        self.render(true)
    }

    /// `value, value` for a positional call.
    pub fn render_arguments(&self) -> String {
        self.render(false)
    }

    fn render(&self, with_names: bool) -> String {
        let mut out = String::new();
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_layout(&mut out, &seg.lead, if i > 0 { " " } else { "" });
            push_layout(&mut out, &seg.before_colon, "");
            if with_names {
                out.push_str(&seg.param.name);
                out.push(' ');
            }
            push_layout(&mut out, &seg.gap, "");
            out.push_str(&seg.param.detail);
            push_layout(&mut out, &seg.trail, "");
        }
        if let Some(rest) = &self.trailing_comma {
            out.push(',');
            push_layout(&mut out, rest, "");
        }
        out
    }
}

/// Keep `text` when it holds a line break, otherwise use `fallback`.
fn push_layout(out: &mut String, text: &str, fallback: &str) {
    if text.contains('\n') {
        out.push_str(text);
    } else {
        out.push_str(fallback);
    }
}

/// Tokens of one parameter list with their bracket nesting.
struct Scan<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    /// Nesting level of each token; `0` is the list itself.
    levels: Vec<usize>,
}

impl<'a> Scan<'a> {
    fn new(text: &'a str) -> Result<Self, LexError> {
        let tokens = tokenize(text)?;
        let mut levels = Vec::with_capacity(tokens.len());
        let mut level: usize = 0;
        for token in &tokens {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    levels.push(level);
                    level += 1;
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    level = level.saturating_sub(1);
                    levels.push(level);
                }
                _ => levels.push(level),
            }
        }
        Ok(Self {
            text,
            tokens,
            levels,
        })
    }

    fn top(&self, i: usize, kind: TokenKind) -> bool {
        self.levels[i] == 0 && self.tokens[i].kind == kind
    }

    fn next_significant(&self, from: usize, end: usize) -> Option<usize> {
        (from..end).find(|&i| !self.tokens[i].is_trivia())
    }

    fn prev_significant(&self, before: usize) -> Option<usize> {
        (0..before).rev().find(|&i| !self.tokens[i].is_trivia())
    }

    /// A parameter name: a word not starting with a digit.
    fn is_name(&self, i: usize) -> bool {
        self.tokens[i].kind == TokenKind::Word
            && !self.word(i).starts_with(|c: char| c.is_ascii_digit())
    }

    /// Index of the `:` when token `i` starts a top-level `name:` marker.
    fn colon_after_name(&self, i: usize, end: usize) -> Option<usize> {
        if self.levels[i] != 0 || !self.is_name(i) {
            return None;
        }
        let mut j = i + 1;
        while j < end && self.tokens[j].kind == TokenKind::Whitespace {
            j += 1;
        }
        (j < end && self.top(j, TokenKind::Colon)).then_some(j)
    }

    fn word(&self, i: usize) -> &'a str {
        self.tokens[i].text(self.text)
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }
}

/// Split `body` (the text after a colon) into gap, trimmed detail and trail.
fn split_detail(body: &str) -> (String, String, String) {
    let detail = body.trim();
    let gap_len = body.len() - body.trim_start().len();
    let trail_start = gap_len + detail.len();
    (
        body[..gap_len].to_string(),
        detail.to_string(),
        body[trail_start..].to_string(),
    )
}

/// Parse a definition parameter list such as `a, b: int, c: string`.
pub fn parse_definition(text: &str) -> Result<NamedList, LexError> {
    let scan = Scan::new(text)?;
    let n = scan.tokens.len();

    // Items are the token ranges between top-level commas.
    let mut items: Vec<(usize, usize)> = Vec::new();
    let mut item_start = 0;
    for i in 0..n {
        if scan.top(i, TokenKind::Comma) {
            items.push((item_start, i));
            item_start = i + 1;
        }
    }
    items.push((item_start, n));

    let byte_start = |tok: usize| scan.tokens.get(tok).map_or(text.len(), |t| t.start);

    let mut list = NamedList::default();
    // Bare names waiting for the type of the next typed item.
    let mut pending: Vec<(String, String, String)> = Vec::new();
    let item_count = items.len();

    for (index, &(start, end)) in items.iter().enumerate() {
        let Some(first) = scan.next_significant(start, end) else {
            let is_trailing = index + 1 == item_count && index > 0;
            if is_trailing && pending.is_empty() && !list.is_empty() {
                list.trailing_comma = Some(scan.slice(byte_start(start), text.len()).to_string());
                continue;
            }
            return Ok(NamedList::default());
        };
        if !scan.is_name(first) {
            return Ok(NamedList::default());
        }

        let name = scan.word(first).to_string();
        let lead = scan.slice(byte_start(start), scan.tokens[first].start).to_string();
        let item_end = byte_start(end);

        if let Some(colon) = scan.colon_after_name(first, end) {
            if scan.next_significant(colon + 1, end).is_none() {
                return Ok(NamedList::default());
            }
            let body = scan.slice(scan.tokens[colon].end, item_end);
            let (gap, detail, trail) = split_detail(body);
            let before_colon = scan
                .slice(scan.tokens[first].end, scan.tokens[colon].start)
                .to_string();

            for (pending_name, pending_lead, pending_trail) in pending.drain(..) {
                list.segments.push(Segment {
                    param: Parameter::new(pending_name, detail.clone()),
                    lead: pending_lead,
                    before_colon: String::new(),
                    gap: String::new(),
                    trail: pending_trail,
                });
            }
            list.segments.push(Segment {
                param: Parameter::new(name, detail),
                lead,
                before_colon,
                gap,
                trail,
            });
        } else if scan.next_significant(first + 1, end).is_none() {
            let trail = scan.slice(scan.tokens[first].end, item_end).to_string();
            pending.push((name, lead, trail));
        } else {
            return Ok(NamedList::default());
        }
    }

    if !pending.is_empty() {
        return Ok(NamedList::default());
    }
    Ok(list)
}

/// Parse a call argument list such as `a: 3, b: g(x, y)`.
pub fn parse_invocation(text: &str) -> Result<NamedList, LexError> {
    let scan = Scan::new(text)?;
    let n = scan.tokens.len();

    // (comma before the marker, name token, colon token)
    let mut markers: Vec<(Option<usize>, usize, usize)> = Vec::new();
    for i in 0..n {
        let Some(colon) = scan.colon_after_name(i, n) else {
            continue;
        };
        match scan.prev_significant(i) {
            None => markers.push((None, i, colon)),
            Some(p) if scan.top(p, TokenKind::Comma) => markers.push((Some(p), i, colon)),
            Some(_) => {}
        }
    }

    // The list must open with a marker; `f(x, a: 1)` is not a named call.
    if !matches!(markers.first(), Some((None, _, _))) {
        return Ok(NamedList::default());
    }

    let mut list = NamedList::default();
    for (m, &(comma, name, colon)) in markers.iter().enumerate() {
        let lead_start = comma.map_or(0, |c| scan.tokens[c].end);
        let lead = scan.slice(lead_start, scan.tokens[name].start).to_string();

        let mut body_end = match markers.get(m + 1) {
            Some(&(Some(next_comma), _, _)) => next_comma,
            _ => n,
        };

        // Commas inside a value belong to it (`nums: 1, 2, 3`); only a comma
        // closing the whole list is a trailing comma.
        if body_end == n {
            let last_comma = (colon + 1..n).rev().find(|&i| scan.top(i, TokenKind::Comma));
            if let Some(i) = last_comma {
                if scan.next_significant(i + 1, n).is_none() {
                    list.trailing_comma =
                        Some(scan.slice(scan.tokens[i].end, text.len()).to_string());
                    body_end = i;
                }
            }
        }

        let body_end_byte = scan.tokens.get(body_end).map_or(text.len(), |t| t.start);
        let body = scan.slice(scan.tokens[colon].end, body_end_byte);
        let (gap, detail, trail) = split_detail(body);
        if detail.is_empty() {
            return Ok(NamedList::default());
        }

        list.segments.push(Segment {
            param: Parameter::new(scan.word(name), detail),
            lead,
            before_colon: scan
                .slice(scan.tokens[name].end, scan.tokens[colon].start)
                .to_string(),
            gap,
            trail,
        });
    }

    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &NamedList) -> Vec<(String, String)> {
        list.segments
            .iter()
            .map(|s| (s.param.name.clone(), s.param.detail.clone()))
            .collect()
    }

    fn p(name: &str, detail: &str) -> (String, String) {
        (name.to_string(), detail.to_string())
    }

    #[test]
    fn definition_with_distinct_types() {
        let list = parse_definition("a: int, b: string").unwrap();
        assert_eq!(pairs(&list), vec![p("a", "int"), p("b", "string")]);
        assert_eq!(list.render_definition(), "a int, b string");
    }

    #[test]
    fn definition_grouped_names_share_a_type() {
        let list = parse_definition("a, b: int, c: string").unwrap();
        assert_eq!(
            pairs(&list),
            vec![p("a", "int"), p("b", "int"), p("c", "string")]
        );
        assert_eq!(list.render_definition(), "a int, b int, c string");
    }

    #[test]
    fn definition_types_may_contain_commas_and_parens() {
        let list = parse_definition("f: func(int, int) int, m: map[string][]int").unwrap();
        assert_eq!(
            pairs(&list),
            vec![p("f", "func(int, int) int"), p("m", "map[string][]int")]
        );
    }

    #[test]
    fn positional_definitions_are_not_named() {
        assert!(parse_definition("a int, b int").unwrap().is_empty());
        assert!(parse_definition("a, b int").unwrap().is_empty());
        assert!(parse_definition("").unwrap().is_empty());
        assert!(parse_definition("a: int, b int").unwrap().is_empty());
        assert!(parse_definition("a: int, b").unwrap().is_empty());
        assert!(parse_definition("a:").unwrap().is_empty());
    }

    #[test]
    fn definition_keeps_line_breaks() {
        let list = parse_definition("\n\ta: int,\n\tb: string,\n").unwrap();
        assert_eq!(list.render_definition(), "\n\ta int,\n\tb string,\n");
    }

    #[test]
    fn invocation_values_run_to_the_next_marker() {
        let list = parse_invocation("a: g(x, y), b: s[1:2], c: T{x: 1}").unwrap();
        assert_eq!(
            pairs(&list),
            vec![p("a", "g(x, y)"), p("b", "s[1:2]"), p("c", "T{x: 1}")]
        );
        assert_eq!(list.render_arguments(), "g(x, y), s[1:2], T{x: 1}");
    }

    #[test]
    fn invocation_ignores_markers_inside_literals_and_comments() {
        let list = parse_invocation(r#"a: "b: c, d: e", e: 'x' /* f: 1 */"#).unwrap();
        assert_eq!(
            pairs(&list),
            vec![p("a", r#""b: c, d: e""#), p("e", "'x' /* f: 1 */")]
        );
    }

    #[test]
    fn invocation_requires_a_leading_marker() {
        assert!(parse_invocation("x, a: 1").unwrap().is_empty());
        assert!(parse_invocation("5 * 2").unwrap().is_empty());
        assert!(parse_invocation("").unwrap().is_empty());
        assert!(parse_invocation("a := 1").unwrap().is_empty());
    }

    #[test]
    fn invocation_values_absorb_positional_commas() {
        let list = parse_invocation("nums: 1, 2, 3").unwrap();
        assert_eq!(pairs(&list), vec![p("nums", "1, 2, 3")]);
        assert_eq!(list.render_arguments(), "1, 2, 3");

        let list = parse_invocation("a: 1, 2, b: 3").unwrap();
        assert_eq!(pairs(&list), vec![p("a", "1, 2"), p("b", "3")]);
        assert_eq!(list.render_arguments(), "1, 2, 3");
    }

    #[test]
    fn invocation_variadic_trailing_comma_is_not_a_value() {
        let list = parse_invocation("\n\tnums: 1,\n\t2,\n").unwrap();
        assert_eq!(pairs(&list), vec![p("nums", "1,\n\t2")]);
        assert_eq!(list.render_arguments(), "\n\t1,\n\t2,\n");
    }

    #[test]
    fn invocation_rejects_empty_arguments() {
        assert!(parse_invocation("a: , b: 2").unwrap().is_empty());
        assert!(parse_invocation("a:").unwrap().is_empty());
        assert!(parse_invocation("a: 1, b:").unwrap().is_empty());
    }

    #[test]
    fn line_break_before_the_colon_is_kept() {
        let list = parse_invocation("a\n: 1").unwrap();
        assert_eq!(list.render_arguments(), "\n1");

        let list = parse_definition("a\n: int, b: string").unwrap();
        assert_eq!(list.render_definition(), "\na int, b string");
    }

    #[test]
    fn invocation_trailing_comma_is_kept() {
        let list = parse_invocation("\n  a: 1,\n  b: 2,\n").unwrap();
        assert_eq!(pairs(&list), vec![p("a", "1"), p("b", "2")]);
        assert_eq!(list.render_arguments(), "\n  1,\n  2,\n");
    }

    #[test]
    fn single_line_whitespace_is_normalized() {
        let list = parse_invocation("  a:   3 ,b:2  ").unwrap();
        assert_eq!(list.render_arguments(), "3, 2");
    }
}
