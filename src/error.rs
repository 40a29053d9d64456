/// Crate-level error types for codepeek diagnostics.
use std::path::PathBuf;

/// All errors in codepeek carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the input, URL, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate error type re-exported as codepeek::Error")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A permalink matched the structural pattern but names a host other
    /// than the configured web host.
    #[error("permalink host `{host}` is not `{expected}`")]
    ForeignHost {
        /// Host the resolver is configured for.
        expected: String,
        /// Host found in the permalink.
        host: String,
    },

    /// Transport-level failure from the HTTP client.
    #[error("http: {0}")]
    Http(
        /// The wrapped client error.
        #[from]
        reqwest::Error,
    ),

    /// A post body failed validation before it was sent.
    #[error("invalid post: {}", problems.join("; "))]
    InvalidPost {
        /// Every problem found, in field order.
        problems: Vec<String>,
    },

    /// Input is not a permalink to a line range at a pinned revision.
    #[error("invalid permalink: `{input}` ({reason})")]
    InvalidPermalink {
        /// The rejected input.
        input: String,
        /// What part of the structure did not match.
        reason: &'static str,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON encoding or decoding failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// No bearer token is available for an authenticated request.
    #[error("missing token: {source_name} is not set")]
    MissingToken {
        /// Where the token was expected to come from.
        source_name: String,
    },

    /// A response body could not be decoded as text.
    #[error("response body from {url} is not valid UTF-8 text")]
    NonTextBody {
        /// The URL whose body failed to decode.
        url: String,
    },

    /// TOML deserialization of the config file failed.
    #[error("toml deserialize: {}: {source}", path.display())]
    TomlDe {
        /// Config file that failed to parse.
        path: PathBuf,
        /// The wrapped TOML error.
        source: toml::de::Error,
    },

    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// A configured or derived URL could not be built.
    #[error("url: {0}")]
    UrlParse(
        /// The wrapped URL parse error.
        #[from]
        url::ParseError,
    ),
}

impl Error {
    /// Whether this error comes from validating the permalink itself rather
    /// than from fetching or processing it.
    pub const fn is_validation(&self) -> bool {
        return matches!(self, Self::InvalidPermalink { .. } | Self::ForeignHost { .. });
    }
}
