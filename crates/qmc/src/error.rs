//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use qmc_config::ConfigError;
use qmc_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Unable to contact the Broker")]
    #[diagnostic(
        code(qmc::connection_failed),
        help(
            "Check that the broker is running and its HTTP management port is reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication required")]
    #[diagnostic(
        code(qmc::auth_failed),
        help(
            "Verify the username and password for profile '{profile}'.\n\
             Pass --username/--password or set QMC_USERNAME and QMC_PASSWORD."
        )
    )]
    AuthFailed { profile: String },

    #[error("Access Forbidden")]
    #[diagnostic(
        code(qmc::forbidden),
        help("The configured user lacks the permission for this operation.")
    )]
    Forbidden,

    #[error("No password configured for user '{username}' in profile '{profile}'")]
    #[diagnostic(
        code(qmc::no_credentials),
        help(
            "Set `password_env` or `password` in the profile, pass --password,\n\
             or set the QMC_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String, username: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(qmc::not_found),
        help("Run: qmc {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Operation not allowed: {message}")]
    #[diagnostic(code(qmc::not_allowed))]
    NotAllowed { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(qmc::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(qmc::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(qmc::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: qmc config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No broker configured")]
    #[diagnostic(
        code(qmc::no_config),
        help(
            "Create a profile with: qmc config init\n\
             Or pass --broker (QMC_BROKER).\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(qmc::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(qmc::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(qmc::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Forbidden | Self::NotAllowed { .. } => exit_code::PERMISSION,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

/// `qmc` subcommand that lists objects of a broker category.
fn list_command(category: &str) -> String {
    match category {
        "GroupProvider" => "group-provider list".into(),
        "Plugin" => "jmx show".into(),
        _ => "ha show <node>".into(),
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::AuthenticationRequired => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::AccessForbidden => CliError::Forbidden,

            CoreError::NotFound { category, name } => CliError::NotFound {
                list_command: list_command(&category),
                resource_type: category,
                identifier: name,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NotAllowed { message } => CliError::NotAllowed { message },

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile, username } => {
                CliError::NoCredentials { profile, username }
            }
            other => CliError::Config(Box::new(other)),
        }
    }
}
