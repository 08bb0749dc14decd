//! Named-parameter Go rewriter.
//!
//! Turns `f(name: value)` call sites and `func f(name: type)` definitions
//! into standard positional Go (`f_name(value)`, `func f_name(name type)`)
//! by rewriting the source text. No Go syntax tree is built: a literal-aware
//! scanner tags parentheses by depth and flat patterns rewrite one nesting
//! level at a time, innermost first.

pub mod params;
pub mod parse;
pub mod preprocess;

pub use parse::{rewrite_source, RewriteResult};
