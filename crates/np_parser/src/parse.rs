use anyhow::{Context, Result};
use np_ast::{NpSyntax, Signature};

use crate::preprocess;

/// Result of rewriting a named-parameter source file.
#[derive(Debug, Clone)]
pub struct RewriteResult {
    /// The positional Go source.
    pub output: String,
    /// Named-parameter definitions found in the input, in source order.
    pub definitions: Vec<Signature>,
}

/// Rewrite a named-parameter Go source string into standard Go.
///
/// Any structural error (unterminated literal or comment, unbalanced
/// parentheses) aborts the whole file; nothing is returned for it.
pub fn rewrite_source(source: &str, filename: &str, syntax: &NpSyntax) -> Result<RewriteResult> {
    let output = preprocess::preprocess(source, syntax)
        .with_context(|| format!("failed to rewrite {filename}"))?;

    let definitions = preprocess::find_definitions(source)
        .with_context(|| format!("failed to scan {filename}"))?
        .into_iter()
        .map(|site| site.signature)
        .collect();

    Ok(RewriteResult {
        output,
        definitions,
    })
}
