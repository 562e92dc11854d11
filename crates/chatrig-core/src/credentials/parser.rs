//! Line-oriented parser for credential files.
//!
//! Grammar, one line at a time:
//!
//! ```text
//! line       := blank | comment | assignment
//! comment    := ws* '#' any*
//! assignment := ws* ("export" ws+)? ident ws* '=' value
//! ident      := [A-Za-z_][A-Za-z0-9_]*
//! value      := any*   (trimmed, then one layer of matching ' or " removed)
//! ```
//!
//! Anything else is `Malformed` and ignored by the loader.

/// A classified line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    Comment,
    Assignment { key: String, value: String },
    Malformed,
}

/// An assignment together with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub line: usize,
    pub key: String,
    pub value: String,
}

/// Classify a single line.
pub fn parse_line(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('#') {
        return Line::Comment;
    }

    let body = strip_export(line);
    let Some((lhs, rhs)) = body.split_once('=') else {
        return Line::Malformed;
    };

    let key = lhs.trim_end();
    if !is_identifier(key) {
        return Line::Malformed;
    }

    Line::Assignment {
        key: key.to_string(),
        value: unquote(rhs.trim()).to_string(),
    }
}

/// Parse a whole file, keeping only assignments.
pub fn parse(content: &str) -> Vec<Assignment> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| match parse_line(raw) {
            Line::Assignment { key, value } => Some(Assignment {
                line: idx + 1,
                key,
                value,
            }),
            Line::Blank | Line::Comment | Line::Malformed => None,
        })
        .collect()
}

fn strip_export(line: &str) -> &str {
    match line.strip_prefix("export") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => line,
    }
}

fn is_identifier(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(key: &str, value: &str) -> Line {
        Line::Assignment {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line(""), Line::Blank);
        assert_eq!(parse_line("   \t"), Line::Blank);
        assert_eq!(parse_line("# OPENAI_API_KEY=nope"), Line::Comment);
        assert_eq!(parse_line("   # indented"), Line::Comment);
    }

    #[test]
    fn export_marker_is_stripped() {
        assert_eq!(parse_line("export OPENAI_API_KEY=sk-1"), assignment("OPENAI_API_KEY", "sk-1"));
        assert_eq!(parse_line("export\tA=1"), assignment("A", "1"));
        // "exported" is an identifier, not the marker
        assert_eq!(parse_line("exported=1"), assignment("exported", "1"));
    }

    #[test]
    fn values_are_trimmed_and_unquoted_once() {
        assert_eq!(parse_line("A = \"sk-1\"  "), assignment("A", "sk-1"));
        assert_eq!(parse_line("A='sk-1'"), assignment("A", "sk-1"));
        assert_eq!(parse_line("A=\"'nested'\""), assignment("A", "'nested'"));
        assert_eq!(parse_line("A=\"mismatched'"), assignment("A", "\"mismatched'"));
        assert_eq!(parse_line("A=\""), assignment("A", "\""));
        assert_eq!(parse_line("A="), assignment("A", ""));
    }

    #[test]
    fn values_keep_inner_equals_signs() {
        assert_eq!(
            parse_line("OPENAI_API_BASE_URLS=https://x/v1?a=b"),
            assignment("OPENAI_API_BASE_URLS", "https://x/v1?a=b")
        );
    }

    #[test]
    fn invalid_identifiers_are_malformed() {
        assert_eq!(parse_line("1KEY=x"), Line::Malformed);
        assert_eq!(parse_line("MY-KEY=x"), Line::Malformed);
        assert_eq!(parse_line("=x"), Line::Malformed);
        assert_eq!(parse_line("just words"), Line::Malformed);
    }

    #[test]
    fn parse_keeps_line_numbers() {
        let content = "# header\n\nA=1\nbogus line\nexport B='2'\n";
        let parsed = parse(content);
        assert_eq!(
            parsed,
            vec![
                Assignment {
                    line: 3,
                    key: "A".into(),
                    value: "1".into()
                },
                Assignment {
                    line: 5,
                    key: "B".into(),
                    value: "2".into()
                },
            ]
        );
    }
}
