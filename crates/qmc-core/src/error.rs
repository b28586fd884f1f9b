// ── Core error types ──
//
// User-facing errors from qmc-core. Transport failures from qmc-api are
// folded into these variants so callers deal with broker concepts (an
// unreachable broker, a vanished object) rather than raw HTTP.

use thiserror::Error;

use crate::report::{ErrorReport, FALLBACK_MESSAGE};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Unable to contact the Broker: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Access Forbidden")]
    AccessForbidden,

    // ── Data errors ──────────────────────────────────────────────────
    /// The object shown in a panel no longer exists on the broker.
    #[error("{category} '{name}' not found")]
    NotFound { category: String, name: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{message}")]
    ValidationFailed { message: String },

    #[error("Operation not allowed: {message}")]
    NotAllowed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The form-level failure shown when a dialog holds invalid input.
    pub fn invalid_form() -> Self {
        Self::ValidationFailed {
            message: "Form contains invalid data. Please correct first".into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ConnectionFailed { .. } => Some(0),
            Self::AuthenticationRequired => Some(401),
            Self::AccessForbidden => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<qmc_api::Error> for CoreError {
    fn from(err: qmc_api::Error) -> Self {
        let report = ErrorReport::from_api(&err);
        match report.status {
            Some(0) => CoreError::ConnectionFailed {
                reason: err.to_string(),
            },
            Some(401) => CoreError::AuthenticationRequired,
            Some(403) => CoreError::AccessForbidden,
            _ => match err {
                qmc_api::Error::InvalidUrl(e) => CoreError::Config {
                    message: format!("Invalid URL: {e}"),
                },
                qmc_api::Error::Tls(msg) => CoreError::Config {
                    message: format!("TLS error: {msg}"),
                },
                _ => CoreError::Api {
                    message: if report.message.is_empty() {
                        FALLBACK_MESSAGE.to_owned()
                    } else {
                        report.message
                    },
                    status: report.status,
                },
            },
        }
    }
}
