/// Error types for the upload-and-generate workflow
///
/// Every failure a submission can end in is one variant of `GenerateError`,
/// so the UI has to handle each kind explicitly. All of them are `Clone`
/// because they travel inside iced messages.

/// Client-side precondition failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No image selected, or the prompt is empty
    #[error("missing input")]
    MissingInput,

    /// Selected file exceeds the upload limit
    #[error("file too large")]
    FileTooLarge { size: u64, limit: u64 },

    /// A submission is still in flight
    #[error("submission already in progress")]
    SubmissionInFlight,
}

/// The response does not match the endpoint contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Content type missing or not a JSON media type
    #[error("unexpected content type")]
    UnexpectedContentType(Option<String>),

    /// Body could not be parsed as JSON
    #[error("malformed body")]
    MalformedBody(String),

    /// Successful status but no usable `imageUrl`
    #[error("missing result")]
    MissingResult,
}

/// The server reported failure with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub status: u16,
    pub message: String,
}

/// Outcome of a failed submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),

    #[error("ProtocolError: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("RemoteError: {0}")]
    Remote(#[from] RemoteError),

    /// Network unreachable, DNS failure, timeout...
    #[error("TransportError: {0}")]
    Transport(String),
}

impl GenerateError {
    /// Human-readable text for the blocking notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::MissingInput) => {
                "Please upload an image and enter a prompt".to_string()
            }
            Self::Validation(ValidationError::FileTooLarge { .. }) => {
                "Image size should be less than 5MB".to_string()
            }
            Self::Validation(ValidationError::SubmissionInFlight) => {
                "A generation is already in progress".to_string()
            }
            Self::Protocol(ProtocolError::UnexpectedContentType(_)) => failed(
                "Invalid response format from server",
            ),
            Self::Protocol(ProtocolError::MalformedBody(detail)) => {
                failed(&format!("Malformed response from server ({detail})"))
            }
            Self::Protocol(ProtocolError::MissingResult) => failed("No image URL in response"),
            Self::Remote(remote) => failed(&remote.message),
            Self::Transport(detail) => failed(detail),
        }
    }
}

fn failed(detail: &str) -> String {
    format!("Failed to generate art: {detail}. Please try again with a different image or prompt.")
}

/// Configuration could not be loaded or applied
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid endpoint address: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
