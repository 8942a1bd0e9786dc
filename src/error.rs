use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the archiver
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Authentication failed: the API rejected the provided access token")]
    #[diagnostic(code(meetup_archiver::auth))]
    AuthenticationFailed,

    #[error("Group not found: {0}")]
    #[diagnostic(code(meetup_archiver::group_not_found))]
    GroupNotFound(String),

    #[error("Rate limited by the API{}", .0.as_deref().map(|h| format!(" (reset hint: {})", h)).unwrap_or_default())]
    #[diagnostic(code(meetup_archiver::rate_limited))]
    RateLimited(Option<String>),

    #[error("GraphQL error: {0}")]
    #[diagnostic(code(meetup_archiver::graphql))]
    GraphQl(String),

    #[error("Transport error: {0}")]
    #[diagnostic(code(meetup_archiver::transport))]
    Transport(String),

    #[error("Pagination did not terminate after {0} pages")]
    #[diagnostic(code(meetup_archiver::pagination_limit))]
    PaginationLimitExceeded(usize),

    #[error("Environment error: {0}")]
    #[diagnostic(code(meetup_archiver::environment))]
    Environment(String),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(meetup_archiver::serialization))]
    Serialization(String),

    #[error(transparent)]
    #[diagnostic(code(meetup_archiver::io))]
    Io(#[from] std::io::Error),
}

// Serde errors surface when reading or writing the archive document
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type ArchiveResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create transport errors
pub fn transport_error(message: &str) -> Error {
    Error::Transport(message.to_string())
}

/// Helper to create GraphQL application errors
pub fn graphql_error(message: &str) -> Error {
    Error::GraphQl(message.to_string())
}
