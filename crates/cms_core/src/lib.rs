pub mod credentials;
pub mod documents;
pub mod domain;
pub mod ports;
pub mod render;

pub use credentials::Credentials;
pub use documents::{DocumentError, Documents};
pub use domain::{DocumentKind, SessionContext};
pub use ports::{
    CredentialStore, DocumentRepository, MarkdownRenderer, PasswordHasher, PortError, PortResult,
};
pub use render::{Rendered, UnsupportedDocument};
