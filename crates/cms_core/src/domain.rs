//! crates/cms_core/src/domain.rs
//!
//! Defines the pure, core data structures and rules for the application.
//! Nothing in here touches the filesystem, the network or the clock.

use std::path::Path;

/// Extensions accepted when creating a new document.
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Appended to the stem of a duplicated document.
pub const COPY_SUFFIX: &str = "_copy";

/// Passwords must be strictly longer than this.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const WELCOME_MESSAGE: &str = "Welcome!";
pub const LOGGED_OUT_MESSAGE: &str = "You have been logged out.";
pub const MUST_LOGIN_MESSAGE: &str = "You must login.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid Credentials";

//=========================================================================================
// Document Classification
//=========================================================================================

/// How a document is presented, resolved once from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Markdown,
    ImageJpg,
    ImagePng,
    Unsupported,
}

impl DocumentKind {
    pub fn from_name(name: &str) -> Self {
        match extension_of(name) {
            Some("txt") => Self::PlainText,
            Some("md") => Self::Markdown,
            Some("jpg") => Self::ImageJpg,
            Some("png") => Self::ImagePng,
            _ => Self::Unsupported,
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, Self::ImageJpg | Self::ImagePng)
    }

    /// Documents that can be opened in the text editor.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::PlainText | Self::Markdown)
    }
}

/// Returns the extension of `name` without the leading dot.
///
/// A trailing dot (`"notes."`) and dotfiles (`".txt"`) count as having no extension.
pub fn extension_of(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}

/// True when `name` is a single path component that stays inside the data directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(&['/', '\\', '\0'][..])
}

/// Builds the name of a duplicate: `about.txt` becomes `about_copy.txt`.
///
/// The result depends only on the source name, so duplicating the same
/// document twice targets the same copy.
pub fn duplicate_name(name: &str) -> String {
    match extension_of(name) {
        Some(ext) => {
            let stem = &name[..name.len() - ext.len() - 1];
            format!("{stem}{COPY_SUFFIX}.{ext}")
        }
        None => format!("{name}{COPY_SUFFIX}"),
    }
}

//=========================================================================================
// Validation Errors
//=========================================================================================

/// Rejections for a new document name. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Please enter a document name.")]
    Empty,
    #[error("Please include an extension.")]
    MissingExtension,
    #[error("Only .md and .txt extensions are supported.")]
    UnsupportedExtension,
    #[error("Please enter a valid document name.")]
    Invalid,
}

/// Rejections for an image attachment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Please choose an image to upload.")]
    Empty,
    #[error("Only .jpg and .png images are supported.")]
    UnsupportedExtension,
    #[error("Please choose a valid image name.")]
    Invalid,
}

/// Rejections for a signup request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupError {
    #[error("Please enter a username.")]
    EmptyUsername,
    #[error("Usernames may not contain spaces or colons.")]
    InvalidUsername,
    #[error("That username is already taken.")]
    UsernameTaken,
    #[error("Please enter a password.")]
    EmptyPassword,
    #[error("Password must be longer than 6 characters.")]
    PasswordTooShort,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

/// Validates a name typed into the "new document" form and returns it trimmed.
///
/// The checks run in a fixed order: empty, missing extension, unsupported
/// extension, then path safety.
pub fn validate_new_document_name(raw: &str) -> Result<&str, NameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    let ext = extension_of(name).ok_or(NameError::MissingExtension)?;
    if !DOCUMENT_EXTENSIONS.contains(&ext) {
        return Err(NameError::UnsupportedExtension);
    }
    if !is_plain_file_name(name) {
        return Err(NameError::Invalid);
    }
    Ok(name)
}

/// Validates an uploaded image and returns its file name trimmed.
pub fn validate_image_upload<'a>(raw_name: &'a str, bytes: &[u8]) -> Result<&'a str, UploadError> {
    let name = raw_name.trim();
    if name.is_empty() || bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if !DocumentKind::from_name(name).is_image() {
        return Err(UploadError::UnsupportedExtension);
    }
    if !is_plain_file_name(name) {
        return Err(UploadError::Invalid);
    }
    Ok(name)
}

/// Checks the shape of a username. Availability is checked against the store separately.
pub fn validate_username(username: &str) -> Result<(), SignupError> {
    if username.is_empty() {
        return Err(SignupError::EmptyUsername);
    }
    if username.contains(|c: char| c == ':' || c.is_whitespace() || c.is_control()) {
        return Err(SignupError::InvalidUsername);
    }
    Ok(())
}

pub fn validate_password(password: &str, confirmation: &str) -> Result<(), SignupError> {
    if password.is_empty() {
        return Err(SignupError::EmptyPassword);
    }
    if password.chars().count() <= MIN_PASSWORD_LENGTH {
        return Err(SignupError::PasswordTooShort);
    }
    if password != confirmation {
        return Err(SignupError::PasswordMismatch);
    }
    Ok(())
}

//=========================================================================================
// Session Context
//=========================================================================================

/// Returned by [`SessionContext::require_authenticated`] when nobody is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("You must login.")]
pub struct AuthRequired;

/// Per-client state held by the server between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub username: Option<String>,
    pub flash: Option<String>,
}

impl SessionContext {
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    /// Nothing worth remembering between requests.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.flash.is_none()
    }

    pub fn login(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
        self.flash = Some(WELCOME_MESSAGE.to_string());
    }

    pub fn logout(&mut self) {
        self.username = None;
        self.flash = Some(LOGGED_OUT_MESSAGE.to_string());
    }

    /// Returns the signed-in username, or leaves a flash message and fails.
    pub fn require_authenticated(&mut self) -> Result<String, AuthRequired> {
        match &self.username {
            Some(username) => Ok(username.clone()),
            None => {
                self.flash = Some(MUST_LOGIN_MESSAGE.to_string());
                Err(AuthRequired)
            }
        }
    }

    pub fn set_flash(&mut self, message: impl Into<String>) {
        self.flash = Some(message.into());
    }

    /// Consumes the pending flash message so it is shown only once.
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }
}
