// ── Error reporting ──
//
// Maps failed management requests onto the messages shown to the operator.

use qmc_api::Error;

/// Shown when no more specific message can be derived.
pub const FALLBACK_MESSAGE: &str = "Unexpected error - see server logs";

/// A user-facing description of a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// HTTP status, `0` when the broker could not be reached.
    pub status: Option<u16>,
    pub message: String,
    /// The session is no longer valid and credentials must be supplied again.
    pub must_reauthenticate: bool,
}

impl ErrorReport {
    pub fn from_api(err: &Error) -> Self {
        let status = err.status();
        let message = match status {
            Some(0) => "Unable to contact the Broker".to_owned(),
            Some(401) => "Authentication required".to_owned(),
            Some(403) => "Access Forbidden".to_owned(),
            _ => error_message(err),
        };
        Self {
            status,
            message,
            must_reauthenticate: status == Some(401),
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// The broker's `errorMessage`, else the error's own message, else the
/// fallback text.
pub fn error_message(err: &Error) -> String {
    if let Some(message) = err.server_message().filter(|m| !m.is_empty()) {
        return message;
    }
    match err {
        Error::Http { message, .. } if !message.is_empty() => message.clone(),
        Error::Http { .. } => FALLBACK_MESSAGE.to_owned(),
        other => other.to_string(),
    }
}

/// Notice shown when an object displayed in a tab has gone away.
pub fn unavailable_message(category: &str, name: &str) -> String {
    format!(
        "{} '{name}' is unavailable or deleted. Tab auto-refresh is stopped.",
        capitalize(category)
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Status dispatch ──

/// Picks a value (usually a handler) by the HTTP status of an error.
#[derive(Debug, Clone)]
pub struct StatusHandlers<T> {
    handlers: Vec<(u16, T)>,
    default: T,
}

impl<T> StatusHandlers<T> {
    pub fn new(default: T) -> Self {
        Self {
            handlers: Vec::new(),
            default,
        }
    }

    /// Register `handler` for `status`; later registrations win.
    #[must_use]
    pub fn on(mut self, status: u16, handler: T) -> Self {
        self.handlers.retain(|(s, _)| *s != status);
        self.handlers.push((status, handler));
        self
    }

    pub fn select(&self, err: &Error) -> &T {
        err.status()
            .and_then(|status| self.handlers.iter().find(|(s, _)| *s == status))
            .map_or(&self.default, |(_, handler)| handler)
    }
}

/// Run the handler registered for the error's status, or `default`.
pub fn dispatch_by_status<R>(
    err: &Error,
    handlers: &[(u16, &dyn Fn(&Error) -> R)],
    default: &dyn Fn(&Error) -> R,
) -> R {
    let handler = err
        .status()
        .and_then(|status| handlers.iter().find(|(s, _)| *s == status))
        .map_or(default, |(_, handler)| *handler);
    handler(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn http(status: u16, message: &str, body: &str) -> Error {
        Error::Http {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    #[test]
    fn well_known_statuses() {
        let report = ErrorReport::from_api(&http(401, "Unauthorized", ""));
        assert_eq!(report.message, "Authentication required");
        assert!(report.must_reauthenticate);

        let report = ErrorReport::from_api(&http(403, "Forbidden", r#"{"errorMessage":"no"}"#));
        assert_eq!(report.message, "Access Forbidden");
        assert!(!report.must_reauthenticate);
    }

    #[test]
    fn server_message_wins() {
        let err = http(422, "Unprocessable Entity", r#"{"errorMessage":"Name already in use"}"#);
        assert_eq!(ErrorReport::from_api(&err).message, "Name already in use");
    }

    #[test]
    fn falls_back_to_status_text_then_generic() {
        assert_eq!(error_message(&http(500, "Internal Server Error", "oops")), "Internal Server Error");
        assert_eq!(error_message(&http(500, "", "")), FALLBACK_MESSAGE);
    }

    #[test]
    fn non_http_errors_use_their_message() {
        let err = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        assert_eq!(ErrorReport::from_api(&err).message, "Deserialization error: expected value");
        assert_eq!(ErrorReport::from_api(&err).status, None);
    }

    #[test]
    fn unavailable_notice() {
        assert_eq!(
            unavailable_message("virtualHostNode", "node1"),
            "VirtualHostNode 'node1' is unavailable or deleted. Tab auto-refresh is stopped."
        );
    }

    #[test]
    fn handlers_by_status() {
        let handlers = StatusHandlers::new("default").on(404, "gone").on(401, "login").on(404, "missing");
        assert_eq!(*handlers.select(&http(404, "", "")), "missing");
        assert_eq!(*handlers.select(&http(401, "", "")), "login");
        assert_eq!(*handlers.select(&http(500, "", "")), "default");
    }

    #[test]
    fn dispatch_calls_matching_handler() {
        let not_found = |_: &Error| "stop refresh".to_owned();
        let fallback = error_message;
        let handlers: [(u16, &dyn Fn(&Error) -> String); 1] = [(404, &not_found)];

        assert_eq!(dispatch_by_status(&http(404, "Not Found", ""), &handlers, &fallback), "stop refresh");
        assert_eq!(dispatch_by_status(&http(409, "Conflict", ""), &handlers, &fallback), "Conflict");
    }
}
