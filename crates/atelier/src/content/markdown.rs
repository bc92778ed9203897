//! Splitting and rendering of markdown content files.
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// A markdown file split into its YAML frontmatter and body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SplitDocument {
    /// Raw YAML between the `---` fences. Empty when the file has none.
    pub frontmatter: String,
    /// Everything after the frontmatter block.
    pub body: String,
}

/// Split a raw markdown file into frontmatter and body.
///
/// The frontmatter is recognized the CommonMark way, as a YAML-style metadata
/// block fenced by `---` starting on the first line.
pub fn split_frontmatter(raw: &str) -> SplitDocument {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut frontmatter = String::new();
    let mut in_frontmatter = false;
    let mut body_start = 0;

    for (event, range) in Parser::new_ext(raw, options).into_offset_iter() {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => in_frontmatter = true,
            Event::End(TagEnd::MetadataBlock(_)) => {
                // The metadata block can only open the document, so everything
                // past its range is the body.
                body_start = range.end;
                break;
            }
            Event::Text(ref text) => {
                if in_frontmatter {
                    frontmatter.push_str(text);
                }
            }
            _ => {}
        }
    }

    SplitDocument {
        frontmatter,
        body: raw[body_start..].to_string(),
    }
}

/// Render a markdown body to HTML.
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
}

/// Derive a listing excerpt from the first line of a body, truncated to
/// `limit` characters.
pub fn excerpt(body: &str, limit: usize) -> String {
    let first_line = body.trim().lines().next().unwrap_or("");
    first_line.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_frontmatter() {
        let doc = split_frontmatter("---\ntitle: Hello\nyear: 2024\n---\n\nFirst paragraph.\n");
        assert_eq!(doc.frontmatter.trim(), "title: Hello\nyear: 2024");
        assert_eq!(doc.body.trim(), "First paragraph.");
    }

    #[test]
    fn test_split_without_frontmatter() {
        let doc = split_frontmatter("Just a body.\n\nWith two paragraphs.\n");
        assert_eq!(doc.frontmatter, "");
        assert_eq!(doc.body, "Just a body.\n\nWith two paragraphs.\n");
    }

    #[test]
    fn test_split_frontmatter_only() {
        let doc = split_frontmatter("---\ntitle: Hello\n---\n");
        assert_eq!(doc.frontmatter.trim(), "title: Hello");
        assert_eq!(doc.body.trim(), "");
    }

    #[test]
    fn test_fences_must_open_the_document() {
        let doc = split_frontmatter("Intro line\n\n---\ntitle: Not frontmatter\n---\n");
        assert_eq!(doc.frontmatter, "");
        assert!(doc.body.contains("Intro line"));
    }

    #[test]
    fn test_render_html() {
        let html = render_html("# Opening\n\nA *fine* paragraph.");
        assert!(html.contains("<h1>Opening</h1>"));
        assert!(html.contains("<em>fine</em>"));
    }

    #[test]
    fn test_excerpt_takes_first_line() {
        assert_eq!(excerpt("\n\nFirst line.\nSecond line.\n", 160), "First line.");
        assert_eq!(excerpt("", 160), "");
    }

    #[test]
    fn test_excerpt_truncates_by_characters() {
        let line = "ш".repeat(200);
        let cut = excerpt(&line, 160);
        assert_eq!(cut.chars().count(), 160);
        assert_eq!(cut, "ш".repeat(160));
    }
}
