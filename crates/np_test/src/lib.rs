//! Shared entry points for the golden-file harness in `tests/harness.rs`.

use anyhow::Result;
use np_ast::NpSyntax;

/// Rewrite with the depth-tag engine.
pub fn run_tags(source: &str, filename: &str) -> Result<String> {
    Ok(np_parser::rewrite_source(source, filename, &NpSyntax::default())?.output)
}

/// Rewrite with the group-tree engine.
pub fn run_tree(source: &str, filename: &str) -> Result<String> {
    np_desugar::desugar_source(source, filename, &NpSyntax::default())
}

pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}
