pub mod argon2_hasher;
pub mod credentials_file;
pub mod fs_documents;
pub mod markdown;

pub use argon2_hasher::Argon2Hasher;
pub use credentials_file::FileCredentialStore;
pub use fs_documents::FsDocumentRepository;
pub use markdown::PulldownRenderer;
