//! Tree-based call site rewriting for named-parameter Go.
//!
//! An alternative to the depth-tag pass in `np_parser`: the token stream is
//! parsed into a tree of parenthesized groups and rewritten bottom-up.
//! Output is identical; the tree makes the innermost-first order explicit
//! instead of encoding it in tag numbers.

pub mod pipeline;
pub mod rewrite;
pub mod tree;

pub use pipeline::desugar_source;
