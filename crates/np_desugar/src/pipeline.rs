//! Full rewrite using the group tree for call sites.

use anyhow::{Context, Result};
use np_ast::NpSyntax;
use np_lexer::tokenize;
use np_parser::preprocess::prepare;

use crate::{rewrite, tree};

/// Rewrite call sites in `source` by building and rendering the group tree.
pub fn rewrite_invocations(source: &str) -> Result<String> {
    let tokens = tokenize(source)?;
    let nodes = tree::build(&tokens)?;
    tracing::trace!(depth = tree::depth(&nodes), "built group tree");
    Ok(rewrite::render(source, &nodes)?)
}

/// Same contract as [`np_parser::rewrite_source`]'s output, with call sites
/// handled by the tree instead of depth tags.
pub fn desugar_source(source: &str, filename: &str, syntax: &NpSyntax) -> Result<String> {
    let run = || -> Result<String> {
        let mut result = prepare(source, syntax)?;
        if syntax.invocations {
            result = rewrite_invocations(&result)?;
        }
        Ok(result)
    };
    run().with_context(|| format!("failed to rewrite {filename}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_depth_tag_engine() {
        let input = "//go:generate np $GOFILE\nfunc named(a: int, b: int) int { return a + b }\n\
                     x := named(a: named(a: 7, b: 4), b: (2))\n";
        let tree = desugar_source(input, "t.go", &NpSyntax::default()).unwrap();
        let tags = np_parser::rewrite_source(input, "t.go", &NpSyntax::default())
            .unwrap()
            .output;
        assert_eq!(tree, tags);
        assert_eq!(
            tree,
            "//\nfunc named_a_b(a int, b int) int { return a + b }\n\
             x := named_a_b(named_a_b(7, 4), (2))\n"
        );
    }

    #[test]
    fn both_engines_reject_runaway_nesting() {
        let n = np_lexer::MAX_NESTING + 1;
        let input = format!("x := {}1{}\n", "(".repeat(n), ")".repeat(n));
        let syntax = NpSyntax::default();
        let tree = desugar_source(&input, "deep.go", &syntax).unwrap_err();
        let tags = np_parser::rewrite_source(&input, "deep.go", &syntax).unwrap_err();
        assert!(format!("{tree:#}").contains("nested deeper than"));
        assert!(format!("{tags:#}").contains("nested deeper than"));
    }

    #[test]
    fn reserved_characters_pass_through_both_engines() {
        let input = "func f(s: string) {}\nf(s: \"\u{E000}(\u{E001}\")\n";
        let syntax = NpSyntax::default();
        let tree = desugar_source(input, "icons.go", &syntax).unwrap();
        let tags = np_parser::rewrite_source(input, "icons.go", &syntax)
            .unwrap()
            .output;
        assert_eq!(tree, "func f_s(s string) {}\nf_s(\"\u{E000}(\u{E001}\")\n");
        assert_eq!(tags, tree);
    }

    #[test]
    fn structural_errors_are_fatal() {
        let err = desugar_source("f(a: 1\n", "bad.go", &NpSyntax::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to rewrite bad.go"));
    }
}
