//! Escaping of markup-sensitive characters.
//!
//! Only `&`, `<` and `>` are rewritten, so [`unescape`] is an exact inverse of
//! [`escape`] for every input.

const ENTITIES: [(char, &str); 3] = [('&', "&amp;"), ('<', "&lt;"), ('>', "&gt;")];

/// Escape `&`, `<` and `>` as HTML entities.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ENTITIES.iter().find(|(c, _)| *c == ch) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(ch),
        }
    }
    out
}

/// Reverse [`escape`]. Unknown `&...;` sequences are left untouched.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(_, entity)| rest.starts_with(entity)) {
            Some((ch, entity)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_three() {
        assert_eq!(escape("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_escape_leaves_quotes() {
        assert_eq!(escape(r#""x" 'y'"#), r#""x" 'y'"#);
    }

    #[test]
    fn test_unescape_inverts_escape() {
        let inputs = [
            "",
            "#include <stdio.h>",
            "&lt; already looks escaped",
            "&amp;amp;",
            "x &= y; // &&",
            "unicode → ok <>",
        ];
        for input in inputs {
            assert_eq!(unescape(&escape(input)), input, "{input:?}");
        }
    }

    #[test]
    fn test_unescape_keeps_unknown_entities() {
        assert_eq!(unescape("&quot;&lt;"), "&quot;<");
        assert_eq!(unescape("trailing &"), "trailing &");
    }
}
