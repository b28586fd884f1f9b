use thiserror::Error;

/// Top-level error type for the `qmc-api` crate.
///
/// Covers every failure mode of the management REST surface: transport,
/// non-success HTTP statuses, URL construction, and response decoding.
/// `qmc-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP ────────────────────────────────────────────────────────
    /// The broker answered with a non-success status code.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status associated with this error.
    ///
    /// Connection failures and timeouts report `0`: the broker could not be
    /// reached at all. Errors that never touched the network return `None`.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) if e.is_connect() || e.is_timeout() => Some(0),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The `errorMessage` field of a JSON error body, if the broker sent one.
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            Self::Http { body, .. } | Self::Deserialization { body, .. } => body,
            _ => return None,
        };
        let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
        parsed
            .get("errorMessage")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
    }

    /// Returns `true` if the broker no longer knows the requested object.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request was rejected for lack of credentials.
    pub fn is_auth_required(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}
