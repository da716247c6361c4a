use tacscope_core::markup::escape;
use tacscope_core::types::{Span, TokenCategory};

/// Inline CSS for a category, `None` for plain text.
pub fn style_for(category: TokenCategory) -> Option<&'static str> {
    match category {
        TokenCategory::Comment => Some("color: #6A9955; font-style: italic;"),
        TokenCategory::String => Some("color: #CE9178;"),
        TokenCategory::Preprocessor => Some("color: #C586C0;"),
        TokenCategory::Keyword => Some("color: #569CD6; font-weight: 600;"),
        TokenCategory::Number => Some("color: #B5CEA8;"),
        TokenCategory::Plain => None,
    }
}

/// Render spans as escaped HTML with one styled `<span>` per non-plain span.
pub fn render_spans(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        let text = escape(&span.text);
        match style_for(span.category) {
            Some(style) => {
                out.push_str(&format!("<span style=\"{style}\">{text}</span>"));
            }
            None => out.push_str(&text),
        }
    }
    out
}

/// Wrap rendered spans in a `<pre>` block suitable for embedding.
pub fn render_block(spans: &[Span]) -> String {
    format!(
        "<pre class=\"tacscope\" style=\"background: #1e1e1e; color: #d4d4d4;\"><code>{}</code></pre>\n",
        render_spans(spans)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacscope_core::markup::unescape;
    use tacscope_core::tagger::tag;

    fn strip_tags(html: &str) -> String {
        let mut out = String::new();
        let mut in_tag = false;
        for ch in html.chars() {
            match ch {
                '<' => in_tag = true,
                '>' => in_tag = false,
                c if !in_tag => out.push(c),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_comment_rendered_italic_green() {
        let html = render_spans(&tag("// int x = 1;"));
        assert_eq!(
            html,
            "<span style=\"color: #6A9955; font-style: italic;\">// int x = 1;</span>"
        );
    }

    #[test]
    fn test_source_angle_brackets_are_escaped() {
        let html = render_spans(&tag("#include <stdio.h>\nif (a < b && c > d) {}"));
        assert!(html.contains("#include &lt;stdio.h&gt;"), "{html}");
        assert!(html.contains("a &lt; b &amp;&amp; c &gt; d"), "{html}");
    }

    #[test]
    fn test_rendering_preserves_text() {
        let sources = [
            "int main() { return 0; }",
            "char *s = \"<b>\"; /* a & b */",
            "#define MAX(a,b) ((a)>(b)?(a):(b))",
        ];
        for src in sources {
            let html = render_spans(&tag(src));
            assert_eq!(unescape(&strip_tags(&html)), src);
        }
    }

    #[test]
    fn test_plain_text_has_no_markup() {
        assert_eq!(render_spans(&tag("a + b")), "a + b");
        assert_eq!(render_spans(&[]), "");
    }

    #[test]
    fn test_render_block_wraps_pre() {
        let html = render_block(&tag("x"));
        assert!(html.starts_with("<pre class=\"tacscope\""));
        assert!(html.trim_end().ends_with("</code></pre>"));
    }
}
