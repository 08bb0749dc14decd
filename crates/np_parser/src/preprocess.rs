//! Text-level passes that rewrite named-parameter Go into positional Go.
//!
//! Processing order:
//! 1. Directives (`//go:generate`, `// +build`) - neutralized to `//`
//! 2. Definitions (`func f(a: int)`) - rewritten to `func f_a(a int)`
//! 3. Invocations (`f(a: 1)`) - rewritten to `f_a(1)`, innermost first
//!
//! Every pass keeps the number of lines unchanged.

use anyhow::Result;
use np_ast::NpSyntax;

mod definition_pass;
mod directive_pass;
mod invocation_pass;
mod util;

pub use definition_pass::{find_definitions, rewrite_definitions, DefinitionSite};
pub use directive_pass::strip_directives;
pub use invocation_pass::{rewrite_call, rewrite_invocations};
pub use util::callee_start;

/// Run the directive and definition passes, the part of the pipeline that
/// does not depend on how call sites are rewritten.
pub fn prepare(source: &str, syntax: &NpSyntax) -> Result<String> {
    let mut result = source.to_string();

    if syntax.directives {
        result = strip_directives(&result, &syntax.directive_prefixes);
    }

    if syntax.definitions {
        result = rewrite_definitions(&result)?;
    }

    Ok(result)
}

/// Preprocess a named-parameter source string into standard Go.
pub fn preprocess(source: &str, syntax: &NpSyntax) -> Result<String> {
    let mut result = prepare(source, syntax)?;

    if syntax.invocations {
        result = rewrite_invocations(&result)?;
    }

    Ok(result)
}
