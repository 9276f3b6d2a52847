//! Placeholder scanning for `[TOKEN_NAME]` templates.
//!
//! Templates are split in a single left-to-right pass. Substituted values are
//! appended to the output and never scanned again, so brackets inside an
//! answer are emitted as-is.

/// A piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// Token name without its brackets.
    Token(&'a str),
}

/// Split a template into literal text and bracketed tokens.
///
/// A token is the shortest `[...]` run with a non-empty body and no nested
/// `[`. Anything else (a lone `[`, `[]`, an unclosed bracket) stays literal.
pub fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find('[') {
        let open = cursor + offset;
        let body_start = open + 1;

        match template[body_start..].find(|c: char| c == '[' || c == ']') {
            Some(len) if len > 0 && template[body_start + len..].starts_with(']') => {
                if literal_start < open {
                    segments.push(Segment::Text(&template[literal_start..open]));
                }
                segments.push(Segment::Token(&template[body_start..body_start + len]));
                literal_start = body_start + len + 1;
                cursor = literal_start;
            }
            _ => cursor = body_start,
        }
    }

    if literal_start < template.len() {
        segments.push(Segment::Text(&template[literal_start..]));
    }

    segments
}

/// Token names in order of appearance, repeats included.
pub fn tokens(template: &str) -> impl Iterator<Item = &str> {
    segments(template).into_iter().filter_map(|segment| match segment {
        Segment::Token(name) => Some(name),
        Segment::Text(_) => None,
    })
}

/// Replace every token for which `lookup` yields a value; other tokens pass
/// through verbatim, brackets included.
pub fn substitute<'v, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'v str>,
{
    let mut output = String::with_capacity(template.len());

    for segment in segments(template) {
        match segment {
            Segment::Text(text) => output.push_str(text),
            Segment::Token(name) => match lookup(name) {
                Some(value) => output.push_str(value),
                None => {
                    output.push('[');
                    output.push_str(name);
                    output.push(']');
                }
            },
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_segments_split_text_and_tokens() {
        assert_eq!(
            segments("Hi [NAME], see [DATE]."),
            vec![
                Segment::Text("Hi "),
                Segment::Token("NAME"),
                Segment::Text(", see "),
                Segment::Token("DATE"),
                Segment::Text("."),
            ]
        );
    }

    #[test]
    fn test_malformed_brackets_stay_literal() {
        assert_eq!(segments("a [ b"), vec![Segment::Text("a [ b")]);
        assert_eq!(segments("[]"), vec![Segment::Text("[]")]);
        assert_eq!(
            segments("[[NAME]"),
            vec![Segment::Text("["), Segment::Token("NAME")]
        );
        assert_eq!(segments("x ] y"), vec![Segment::Text("x ] y")]);
    }

    #[test]
    fn test_tokens_keep_repeats() {
        let found: Vec<&str> = tokens("[A] and [B] and [A]").collect();
        assert_eq!(found, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_substitute_is_single_pass() {
        let values = HashMap::from([("A", "[B]"), ("B", "b")]);
        let output = substitute("[A] [B]", |name| values.get(name).copied());
        assert_eq!(output, "[B] b");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        let output = substitute("[KNOWN] [UNKNOWN]", |name| (name == "KNOWN").then_some("k"));
        assert_eq!(output, "k [UNKNOWN]");
    }

    #[test]
    fn test_template_without_tokens_is_unchanged() {
        let template = "Plain text, no placeholders.";
        assert_eq!(substitute(template, |_| Some("x")), template);
    }
}
