//! Error types with access token sanitization.
//!
//! Every error surfaced by objexport aborts the run. None of the variants
//! carry an access token, and remote error bodies are reduced to the
//! Salesforce `errorCode` and `message` fields before they are stored.

use thiserror::Error;

/// Main error type for objexport operations.
///
/// # Security
/// Access tokens are never included in error output. Use [`redact_token`]
/// when a token has to be referenced in a message.
#[derive(Debug, Error)]
pub enum ObjExportError {
    /// Org credentials are missing, unknown, or were rejected by the org
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The HTTP request never produced a response
    #[error("Connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The org answered a describe call with an error status
    #[error("Describe of {target} failed ({status}): {error_code}: {message}")]
    Describe {
        target: String,
        status: u16,
        error_code: String,
        message: String,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML or JSON encoding/decoding failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The same object name was added to a collection twice
    #[error("Object '{name}' is already present in the collection")]
    DuplicateObject { name: String },
}

/// Convenience type alias for Results with ObjExportError
pub type Result<T> = std::result::Result<T, ObjExportError>;

/// Masks an access token for logging and error messages.
///
/// Salesforce session ids start with the 15 character org id followed by
/// `!`. That prefix is kept so operators can tell orgs apart; everything
/// after it is replaced.
///
/// # Example
///
/// ```rust
/// use objexport_core::error::redact_token;
///
/// let masked = redact_token("00D5e000000abcd!AQ4AQF.secretpart");
/// assert_eq!(masked, "00D5e000000abcd!****");
/// assert!(!masked.contains("secretpart"));
/// ```
pub fn redact_token(token: &str) -> String {
    match token.split_once('!') {
        Some((org_id, _)) if !org_id.is_empty() => format!("{org_id}!****"),
        _ => "****".to_string(),
    }
}

impl ObjExportError {
    /// Creates an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a connection error with context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a describe error for the given target (`"global"` or an object name)
    pub fn describe_failed(
        target: impl Into<String>,
        status: u16,
        error_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Describe {
            target: target.into(),
            status,
            error_code: error_code.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Stable name of the error kind, used by the `--json` error envelope.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "AuthenticationError",
            Self::Connection { .. } => "ConnectionError",
            Self::Describe { .. } => "DescribeError",
            Self::Configuration { .. } => "ConfigurationError",
            Self::Io { .. } => "IoError",
            Self::Serialization { .. } => "SerializationError",
            Self::DuplicateObject { .. } => "DuplicateObjectError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_token_keeps_org_prefix() {
        let redacted = redact_token("00D000000000001!AQ0AQHsecretsecret");

        assert_eq!(redacted, "00D000000000001!****");
        assert!(!redacted.contains("secret"));
    }

    #[test]
    fn test_redact_token_without_separator() {
        assert_eq!(redact_token("plainsecret"), "****");
        assert_eq!(redact_token("!leading"), "****");
        assert_eq!(redact_token(""), "****");
    }

    #[test]
    fn test_error_creation() {
        let error = ObjExportError::configuration("Invalid API version");
        assert!(error.to_string().contains("Invalid API version"));

        let error = ObjExportError::authentication("Session expired");
        assert!(error.to_string().contains("Session expired"));
    }

    #[test]
    fn test_describe_error_display() {
        let error = ObjExportError::describe_failed(
            "Account",
            404,
            "NOT_FOUND",
            "The requested resource does not exist",
        );
        let message = error.to_string();

        assert!(message.contains("Account"));
        assert!(message.contains("404"));
        assert!(message.contains("NOT_FOUND"));
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let errors = [
            ObjExportError::authentication("a"),
            ObjExportError::describe_failed("global", 500, "X", "y"),
            ObjExportError::configuration("c"),
            ObjExportError::io("write", std::io::Error::other("disk full")),
            ObjExportError::DuplicateObject {
                name: "Account".to_string(),
            },
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(ObjExportError::kind).collect();

        assert_eq!(kinds.len(), errors.len());
        assert!(kinds.contains("AuthenticationError"));
    }
}
