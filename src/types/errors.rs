use thiserror::Error;

// === VideoError ===

/// Errors related to video bookmark operations.
#[derive(Debug, Error)]
pub enum VideoError {
    /// Video with the given ID was not found.
    #[error("Video not found: {0}")]
    NotFound(String),
    /// Database operation failed.
    #[error("Video database error: {0}")]
    DatabaseError(String),
}

// === LinkError ===

/// Errors related to link bookmark operations.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Link with the given ID was not found.
    #[error("Link not found: {0}")]
    NotFound(String),
    /// Database operation failed.
    #[error("Link database error: {0}")]
    DatabaseError(String),
}

// === CategoryError ===

/// Errors related to video and link category operations.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Category with the given ID was not found.
    #[error("Category not found: {0}")]
    NotFound(String),
    /// The requested parent would break the one-level hierarchy.
    #[error("Invalid parent category: {0}")]
    InvalidParent(String),
    /// Database operation failed.
    #[error("Category database error: {0}")]
    DatabaseError(String),
}

// === ShareError ===

/// Errors related to public sharing of a collection.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The slug does not match the allowed format.
    #[error("Invalid public slug: {0}")]
    InvalidSlug(String),
    /// No public profile exists for the slug.
    #[error("Profile not found or is private")]
    NotFound,
    /// Database operation failed.
    #[error("Share database error: {0}")]
    DatabaseError(String),
}

// === BackupError ===

/// Errors related to exporting and importing a collection backup.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The uploaded document is not a backup file.
    #[error("Invalid backup file format: {0}")]
    InvalidFormat(String),
    #[error(transparent)]
    Video(#[from] VideoError),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Category(#[from] CategoryError),
}

// === SettingsError ===

/// Errors related to loading server settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading the settings file failed.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// The settings file is not valid JSON.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// An environment override holds an unusable value.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === AuthError ===

/// Errors related to the shared-login authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password is missing from the server settings.
    #[error("Authentication not configured")]
    NotConfigured,
    /// The supplied credentials do not match.
    #[error("Invalid username or password")]
    InvalidCredentials,
}

// === TitleFetchError ===

/// Errors related to fetching a remote page title.
#[derive(Debug, Error)]
pub enum TitleFetchError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The URL points at localhost or a private network address.
    #[error("Refusing to fetch internal address: {0}")]
    BlockedHost(String),
    /// The remote server did not answer in time.
    #[error("Request timed out")]
    Timeout,
    /// The remote server answered with a non-success status.
    #[error("Failed to fetch URL: HTTP {0}")]
    Status(u16),
    /// The page has no `<title>` element.
    #[error("No title found")]
    NoTitle,
    /// Any other transport failure.
    #[error("Failed to fetch URL: {0}")]
    Request(String),
}

// === ApiError ===

/// Errors surfaced to API callers, each mapped to an HTTP status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request used a verb other than POST.
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// A required configuration variable is absent.
    #[error("{0} not configured")]
    NotConfigured(String),
    /// The action discriminator names no known operation.
    #[error("Invalid action")]
    InvalidAction,
    /// The body does not fit the action's payload.
    #[error("{0}")]
    BadRequest(String),
    /// Credentials were rejected.
    #[error("{0}")]
    Unauthorized(String),
    /// The target record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Database or other server-side failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MethodNotAllowed => 405,
            ApiError::NotConfigured(_) => 500,
            ApiError::InvalidAction => 400,
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Internal(_) => 500,
        }
    }
}

impl From<VideoError> for ApiError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::NotFound(_) => ApiError::NotFound(err.to_string()),
            VideoError::DatabaseError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<LinkError> for ApiError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::NotFound(_) => ApiError::NotFound(err.to_string()),
            LinkError::DatabaseError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CategoryError::InvalidParent(_) => ApiError::BadRequest(err.to_string()),
            CategoryError::DatabaseError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<ShareError> for ApiError {
    fn from(err: ShareError) -> Self {
        match err {
            ShareError::InvalidSlug(_) => ApiError::BadRequest(err.to_string()),
            ShareError::NotFound => ApiError::NotFound(err.to_string()),
            ShareError::DatabaseError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<BackupError> for ApiError {
    fn from(err: BackupError) -> Self {
        match err {
            BackupError::InvalidFormat(_) => ApiError::BadRequest(err.to_string()),
            BackupError::Video(e) => e.into(),
            BackupError::Link(e) => e.into(),
            BackupError::Category(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotConfigured => ApiError::Internal(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
        }
    }
}
