//! services/cms/src/adapters/markdown.rs
//!
//! Implements the `MarkdownRenderer` port with pulldown-cmark.

use cms_core::ports::MarkdownRenderer;
use pulldown_cmark::{html, Options, Parser};

#[derive(Clone, Copy, Debug, Default)]
pub struct PulldownRenderer;

impl MarkdownRenderer for PulldownRenderer {
    fn to_html(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(markdown, options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_become_h1() {
        let out = PulldownRenderer.to_html("# Title");
        assert!(out.contains("<h1>Title</h1>"), "got {out}");
    }

    #[test]
    fn inline_html_is_passed_through() {
        let out = PulldownRenderer.to_html("<h1>An h1 header</h1>");
        assert!(out.contains("<h1>An h1 header</h1>"), "got {out}");
    }

    #[test]
    fn tables_are_enabled() {
        let out = PulldownRenderer.to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.contains("<table>"), "got {out}");
    }
}
