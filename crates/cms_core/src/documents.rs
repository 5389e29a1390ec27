//! crates/cms_core/src/documents.rs
//!
//! The document service: validation and naming rules layered over a
//! `DocumentRepository`, plus rendering through a `MarkdownRenderer`.

use crate::domain::{duplicate_name, validate_image_upload, validate_new_document_name};
use crate::domain::{NameError, UploadError};
use crate::ports::{DocumentRepository, MarkdownRenderer, PortError, PortResult};
use crate::render::{render, Rendered, UnsupportedDocument};
use bytes::Bytes;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedDocument),
    #[error(transparent)]
    Port(#[from] PortError),
}

impl DocumentError {
    /// The document is absent, or its name could never refer to a stored document.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            DocumentError::Port(PortError::NotFound(_) | PortError::InvalidName(_))
        )
    }
}

#[derive(Clone)]
pub struct Documents {
    repo: Arc<dyn DocumentRepository>,
    markdown: Arc<dyn MarkdownRenderer>,
}

impl Documents {
    pub fn new(repo: Arc<dyn DocumentRepository>, markdown: Arc<dyn MarkdownRenderer>) -> Self {
        Self { repo, markdown }
    }

    pub async fn list(&self) -> PortResult<Vec<String>> {
        self.repo.list().await
    }

    pub async fn exists(&self, name: &str) -> PortResult<bool> {
        self.repo.exists(name).await
    }

    pub async fn read(&self, name: &str) -> PortResult<Bytes> {
        self.repo.read(name).await
    }

    /// Full overwrite. A name that does not exist yet is simply created.
    pub async fn write(&self, name: &str, content: &[u8]) -> PortResult<()> {
        self.repo.write(name, content).await
    }

    /// Fails with `NotFound` when there is nothing to delete.
    pub async fn delete(&self, name: &str) -> PortResult<()> {
        self.repo.delete(name).await
    }

    /// Creates an empty document and returns its (trimmed) name.
    pub async fn create(&self, raw_name: &str) -> Result<String, DocumentError> {
        let name = validate_new_document_name(raw_name)?;
        self.repo.write(name, b"").await?;
        Ok(name.to_string())
    }

    /// Copies `name` to `<stem>_copy.<ext>` and returns the new name.
    ///
    /// An existing copy is overwritten rather than suffixed again.
    pub async fn duplicate(&self, name: &str) -> Result<String, DocumentError> {
        let content = self.repo.read(name).await?;
        let copy = duplicate_name(name);
        self.repo.write(&copy, &content).await?;
        Ok(copy)
    }

    /// Stores an image attachment and returns its (trimmed) name.
    pub async fn upload_image(&self, raw_name: &str, bytes: &[u8]) -> Result<String, DocumentError> {
        let name = validate_image_upload(raw_name, bytes)?;
        self.repo.write(name, bytes).await?;
        Ok(name.to_string())
    }

    pub async fn render(&self, name: &str) -> Result<Rendered, DocumentError> {
        let bytes = self.repo.read(name).await?;
        Ok(render(name, bytes, self.markdown.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Keeps documents in insertion order, like a fresh directory would.
    #[derive(Default)]
    struct InMemoryRepository {
        docs: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl DocumentRepository for InMemoryRepository {
        async fn list(&self) -> PortResult<Vec<String>> {
            Ok(self.docs.lock().unwrap().iter().map(|(n, _)| n.clone()).collect())
        }

        async fn exists(&self, name: &str) -> PortResult<bool> {
            Ok(self.docs.lock().unwrap().iter().any(|(n, _)| n == name))
        }

        async fn read(&self, name: &str) -> PortResult<Bytes> {
            self.docs
                .lock()
                .unwrap()
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, c)| Bytes::copy_from_slice(c))
                .ok_or_else(|| PortError::NotFound(name.to_string()))
        }

        async fn write(&self, name: &str, content: &[u8]) -> PortResult<()> {
            let mut docs = self.docs.lock().unwrap();
            match docs.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => *existing = content.to_vec(),
                None => docs.push((name.to_string(), content.to_vec())),
            }
            Ok(())
        }

        async fn delete(&self, name: &str) -> PortResult<()> {
            let mut docs = self.docs.lock().unwrap();
            let before = docs.len();
            docs.retain(|(n, _)| n != name);
            if docs.len() == before {
                return Err(PortError::NotFound(name.to_string()));
            }
            Ok(())
        }
    }

    struct Heading;

    impl MarkdownRenderer for Heading {
        fn to_html(&self, markdown: &str) -> String {
            match markdown.strip_prefix("# ") {
                Some(title) => format!("<h1>{title}</h1>"),
                None => format!("<p>{markdown}</p>"),
            }
        }
    }

    fn documents() -> Documents {
        Documents::new(Arc::new(InMemoryRepository::default()), Arc::new(Heading))
    }

    #[tokio::test]
    async fn created_document_is_listed_once() {
        let docs = documents();
        assert_eq!(docs.create("story.md").await.unwrap(), "story.md");
        docs.create("story.md").await.unwrap();

        let names = docs.list().await.unwrap();
        assert_eq!(names.iter().filter(|n| *n == "story.md").count(), 1);
        assert_eq!(docs.read("story.md").await.unwrap(), Bytes::new());
    }

    #[tokio::test]
    async fn create_rejects_bad_names_without_writing() {
        let docs = documents();
        assert!(matches!(docs.create("").await, Err(DocumentError::Name(NameError::Empty))));
        assert!(matches!(
            docs.create("noext").await,
            Err(DocumentError::Name(NameError::MissingExtension))
        ));
        assert!(matches!(
            docs.create("x.exe").await,
            Err(DocumentError::Name(NameError::UnsupportedExtension))
        ));
        assert!(docs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_overwrites_the_previous_copy() {
        let docs = documents();
        docs.write("about.txt", b"hello").await.unwrap();

        assert_eq!(docs.duplicate("about.txt").await.unwrap(), "about_copy.txt");
        assert_eq!(docs.read("about_copy.txt").await.unwrap(), Bytes::from_static(b"hello"));

        docs.write("about.txt", b"changed").await.unwrap();
        docs.duplicate("about.txt").await.unwrap();

        let names = docs.list().await.unwrap();
        assert_eq!(names, vec!["about.txt".to_string(), "about_copy.txt".to_string()]);
        assert_eq!(docs.read("about_copy.txt").await.unwrap(), Bytes::from_static(b"changed"));
    }

    #[tokio::test]
    async fn duplicate_of_a_missing_document_is_reported_missing() {
        let err = documents().duplicate("ghost.txt").await.unwrap_err();
        assert!(err.is_missing());
    }

    #[tokio::test]
    async fn deleted_document_is_no_longer_listed() {
        let docs = documents();
        docs.write("test.txt", b"").await.unwrap();
        docs.delete("test.txt").await.unwrap();
        assert!(!docs.list().await.unwrap().contains(&"test.txt".to_string()));
        assert!(matches!(docs.delete("test.txt").await, Err(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn render_uses_the_markdown_renderer() {
        let docs = documents();
        docs.write("title.md", b"# Title").await.unwrap();
        assert_eq!(
            docs.render("title.md").await.unwrap(),
            Rendered::Html("<h1>Title</h1>".to_string())
        );
    }

    #[tokio::test]
    async fn upload_rejects_unknown_image_types() {
        let docs = documents();
        assert!(matches!(
            docs.upload_image("anim.gif", b"GIF89a").await,
            Err(DocumentError::Upload(UploadError::UnsupportedExtension))
        ));
        assert_eq!(docs.upload_image(" logo.png ", b"\x89PNG").await.unwrap(), "logo.png");
        assert!(docs.exists("logo.png").await.unwrap());
    }
}
