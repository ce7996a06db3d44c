use thiserror::Error;

/// The single failure kind this client surfaces.
///
/// Only hard transport failures raise: connection refused, DNS resolution,
/// TLS handshake, timeout. HTTP 4xx/5xx responses are not errors here; their
/// decoded bodies are returned to the caller and the status is reported via
/// [`crate::Client::http_code`].
#[derive(Debug, Error)]
pub enum Error {
    /// A failure below the HTTP semantic layer, carrying the last observed
    /// status code. The code is 0 when the failed exchange produced no
    /// response at all.
    #[error("transport error (http {http_code}): {message}")]
    Transport { message: String, http_code: u16 },
}

impl Error {
    pub(crate) fn transport(message: impl Into<String>, http_code: u16) -> Self {
        Error::Transport {
            message: message.into(),
            http_code,
        }
    }

    /// The last HTTP status observed before the failure, 0 if none.
    pub fn http_code(&self) -> u16 {
        match self {
            Error::Transport { http_code, .. } => *http_code,
        }
    }
}
