use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Message shown for every request that never reached the server.
pub const CONNECTION_MESSAGE: &str = "Could not connect to the server";

/// Failure kinds surfaced by screen operations.
///
/// All variants render the same way (an inline message); the distinction
/// matters for logging and for tests that assert whether a request was made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientError {
    /// Local check failed before any request was issued.
    Validation(String),
    /// Non-2xx response. `message` comes from the `error` key of the body or
    /// a per-call fallback.
    Server { status: u16, message: String },
    /// The request could not complete.
    Network(String),
    /// The collection was fetched but the wanted record is not in it.
    NotFound(String),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn network(detail: impl Display) -> Self {
        Self::Network(detail.to_string())
    }

    /// User-facing text for the inline error line.
    pub fn message(&self) -> &str {
        match self {
            ClientError::Validation(m) | ClientError::NotFound(m) => m,
            ClientError::Server { message, .. } => message,
            ClientError::Network(_) => CONNECTION_MESSAGE,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Validation(m) => write!(f, "validation failed: {m}"),
            ClientError::Server { status, message } => write!(f, "server returned {status}: {message}"),
            ClientError::Network(detail) => write!(f, "network error: {detail}"),
            ClientError::NotFound(m) => write!(f, "not found: {m}"),
        }
    }
}

impl std::error::Error for ClientError {}

pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_hide_transport_detail() {
        let err = ClientError::network("tcp connect error: refused");
        assert_eq!(err.message(), CONNECTION_MESSAGE);
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = ClientError::Server { status: 401, message: "Credenciales incorrectas".into() };
        assert_eq!(err.message(), "Credenciales incorrectas");
        assert!(!err.is_validation());
    }

    #[test]
    fn with_ctx_wraps_source() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = res.with_ctx(|| "open log".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "open log: gone");
    }
}
