//! crates/cms_core/src/render.rs
//!
//! Turns stored document bytes into a response body and content type.

use crate::domain::DocumentKind;
use crate::ports::MarkdownRenderer;
use bytes::Bytes;

/// The presentable form of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Raw bytes served as `text/plain`.
    Text(Bytes),
    /// Markdown converted to an HTML fragment; the page layout wraps it.
    Html(String),
    Image {
        content_type: &'static str,
        bytes: Bytes,
    },
}

impl Rendered {
    pub fn content_type(&self) -> &'static str {
        match self {
            Rendered::Text(_) => "text/plain",
            Rendered::Html(_) => "text/html; charset=utf-8",
            Rendered::Image { content_type, .. } => content_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} cannot be displayed.")]
pub struct UnsupportedDocument(pub String);

/// Dispatches on the document kind resolved from `name`.
pub fn render(
    name: &str,
    bytes: Bytes,
    markdown: &dyn MarkdownRenderer,
) -> Result<Rendered, UnsupportedDocument> {
    match DocumentKind::from_name(name) {
        DocumentKind::PlainText => Ok(Rendered::Text(bytes)),
        DocumentKind::Markdown => {
            let source = String::from_utf8_lossy(&bytes);
            Ok(Rendered::Html(markdown.to_html(&source)))
        }
        DocumentKind::ImageJpg => Ok(Rendered::Image {
            content_type: "image/jpeg",
            bytes,
        }),
        DocumentKind::ImagePng => Ok(Rendered::Image {
            content_type: "image/png",
            bytes,
        }),
        DocumentKind::Unsupported => Err(UnsupportedDocument(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Shouting;

    impl MarkdownRenderer for Shouting {
        fn to_html(&self, markdown: &str) -> String {
            format!("<p>{}</p>", markdown.to_uppercase())
        }
    }

    #[test]
    fn text_is_passed_through() {
        let rendered = render("about.txt", Bytes::from_static(b"hello"), &Shouting).unwrap();
        assert_eq!(rendered, Rendered::Text(Bytes::from_static(b"hello")));
        assert_eq!(rendered.content_type(), "text/plain");
    }

    #[test]
    fn markdown_goes_through_the_renderer() {
        let rendered = render("notes.md", Bytes::from_static(b"hi"), &Shouting).unwrap();
        assert_eq!(rendered, Rendered::Html("<p>HI</p>".to_string()));
        assert_eq!(rendered.content_type(), "text/html; charset=utf-8");
    }

    #[test]
    fn images_get_their_content_type() {
        let png = render("logo.png", Bytes::from_static(b"\x89PNG"), &Shouting).unwrap();
        assert_eq!(png.content_type(), "image/png");
        let jpg = render("photo.jpg", Bytes::from_static(b"\xff\xd8"), &Shouting).unwrap();
        assert_eq!(jpg.content_type(), "image/jpeg");
    }

    #[test]
    fn other_extensions_are_refused() {
        let err = render("setup.exe", Bytes::new(), &Shouting).unwrap_err();
        assert_eq!(err.to_string(), "setup.exe cannot be displayed.");
    }
}
