//! Error types for the product catalog client
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// Transport-level failure talking to the backend
    #[snafu(display("Network error calling {endpoint}: {source}"))]
    Network {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Backend answered with a non-success status
    #[snafu(display("Server error calling {endpoint}: HTTP {status}"))]
    Server { endpoint: String, status: u16 },

    /// Backend answered 2xx but the body did not match the expected shape
    #[snafu(display("Malformed response from {endpoint}: {message}"))]
    Decode { endpoint: String, message: String },

    /// IO error (file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl Error {
    /// Whether this failure happened before any response was received
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. })
    }

    /// Whether the backend responded but the response was unusable
    pub fn is_server(&self) -> bool {
        matches!(self, Error::Server { .. } | Error::Decode { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
