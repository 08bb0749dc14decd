//! Directive neutralizing pass.
//!
//! `//go:generate` and `// +build` lines tell external tools how to treat
//! the named-parameter source; they must not survive into the generated
//! file. Each such line becomes `//` so line numbers stay aligned.

/// Replace every line starting with one of `prefixes` by `//`.
pub fn strip_directives(source: &str, prefixes: &[String]) -> String {
    source
        .split('\n')
        .map(|line| {
            if !prefixes.iter().any(|p| line.starts_with(p.as_str())) {
                return line;
            }
            tracing::debug!(line, "neutralized directive");
            if line.ends_with('\r') {
                "//\r"
            } else {
                "//"
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_ast::NpSyntax;

    fn default_prefixes() -> Vec<String> {
        NpSyntax::default().directive_prefixes
    }

    #[test]
    fn directives_become_empty_comments() {
        let input = "//go:generate python compile.py $GOFILE\n// +build ignore\n\npackage main\n";
        let output = strip_directives(input, &default_prefixes());
        assert_eq!(output, "//\n//\n\npackage main\n");
    }

    #[test]
    fn only_line_starts_match() {
        let input = "x := 1 //go:generate foo\n  // +build ignore";
        assert_eq!(strip_directives(input, &default_prefixes()), input);
    }

    #[test]
    fn line_count_and_crlf_are_kept() {
        let input = "//go:generate foo\r\npackage main\r\n";
        let output = strip_directives(input, &default_prefixes());
        assert_eq!(output, "//\r\npackage main\r\n");
        assert_eq!(output.lines().count(), input.lines().count());
    }

    #[test]
    fn custom_prefixes() {
        let output = strip_directives("//go:build linux\nx", &["//go:build".to_string()]);
        assert_eq!(output, "//\nx");
    }
}
