//! Function definition rewriting pass.
//!
//! `func named(a, b: int, c: string) int` becomes
//! `func named_a_b_c(a int, b int, c string) int`. Receivers and type
//! parameter lists are allowed between `func` and the parameter list.
//! Definitions without any `name:` marker are left untouched.

use np_ast::Signature;
use np_lexer::{tokenize, LexError, Token, TokenKind};

use super::util::{apply_edits, matching_close, next_significant, Edit};
use crate::params::{parse_definition, NamedList};

/// A named-parameter definition found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSite {
    pub signature: Signature,
    /// Byte range of the function name.
    pub name_start: usize,
    pub name_end: usize,
    /// Byte range of the text between the parameter list's parentheses.
    pub list_start: usize,
    pub list_end: usize,
    pub list: NamedList,
}

/// Find every named-parameter definition outside comments and literals.
pub fn find_definitions(source: &str) -> Result<Vec<DefinitionSite>, LexError> {
    let tokens = tokenize(source)?;
    let mut sites = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if !is_func_keyword(source, &tokens[i]) {
            i += 1;
            continue;
        }
        match definition_at(source, &tokens, i)? {
            Some((site, close)) => {
                sites.push(site);
                i = close + 1;
            }
            None => i += 1,
        }
    }

    Ok(sites)
}

fn is_func_keyword(source: &str, token: &Token) -> bool {
    token.kind == TokenKind::Word && token.text(source) == "func"
}

/// Match `func [(recv)] name [[T any]] (params)` starting at token `func_idx`.
/// Returns the site and the index of the closing parenthesis.
fn definition_at(
    source: &str,
    tokens: &[Token],
    func_idx: usize,
) -> Result<Option<(DefinitionSite, usize)>, LexError> {
    let Some(mut j) = next_significant(tokens, func_idx + 1) else {
        return Ok(None);
    };

    // Method receiver.
    if tokens[j].kind == TokenKind::LParen {
        let Some(close) = matching_close(tokens, j) else {
            return Ok(None);
        };
        let Some(next) = next_significant(tokens, close + 1) else {
            return Ok(None);
        };
        j = next;
    }

    if tokens[j].kind != TokenKind::Word {
        return Ok(None);
    }
    let name = tokens[j];

    let Some(mut k) = next_significant(tokens, j + 1) else {
        return Ok(None);
    };

    // Type parameters.
    if tokens[k].kind == TokenKind::LBracket {
        let Some(close) = matching_close(tokens, k) else {
            return Ok(None);
        };
        let Some(next) = next_significant(tokens, close + 1) else {
            return Ok(None);
        };
        k = next;
    }

    if tokens[k].kind != TokenKind::LParen {
        return Ok(None);
    }
    let Some(close) = matching_close(tokens, k) else {
        return Ok(None);
    };

    let list_start = tokens[k].end;
    let list_end = tokens[close].start;
    let list = parse_definition(&source[list_start..list_end])?;
    if list.is_empty() {
        return Ok(None);
    }

    let site = DefinitionSite {
        signature: Signature {
            base_name: name.text(source).to_string(),
            params: list.params(),
            line: name.line,
        },
        name_start: name.start,
        name_end: name.end,
        list_start,
        list_end,
        list,
    };
    Ok(Some((site, close)))
}

/// Rewrite every named-parameter definition into its positional form.
pub fn rewrite_definitions(source: &str) -> Result<String, LexError> {
    let sites = find_definitions(source)?;
    if sites.is_empty() {
        return Ok(source.to_string());
    }

    let mut edits = Vec::with_capacity(sites.len() * 2);
    for site in sites {
        let mangled = site.signature.mangled_name();
        tracing::debug!(
            line = site.signature.line,
            name = %site.signature.base_name,
            mangled = %mangled,
            "rewrote definition"
        );
        edits.push(Edit {
            start: site.name_start,
            end: site.name_end,
            replacement: mangled,
        });
        edits.push(Edit {
            start: site.list_start,
            end: site.list_end,
            replacement: site.list.render_definition(),
        });
    }

    Ok(apply_edits(source, edits))
}
