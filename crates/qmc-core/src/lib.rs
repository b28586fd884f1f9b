// qmc-core: Grid diffing, form handling, and console view-models between qmc-api and the CLI.

pub mod compare;
pub mod config;
pub mod console;
pub mod delete;
pub mod dialog;
pub mod error;
pub mod flatten;
pub mod form;
pub mod grid;
pub mod ha;
pub mod naming;
pub mod report;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use compare::{deep_equal, loosely_equal};
pub use config::ConsoleConfig;
pub use console::Console;
pub use delete::{DeletePlan, delete_selected};
pub use dialog::{DialogMode, GroupProviderDialog, JmxPluginDialog, Submission};
pub use error::CoreError;
pub use form::{FieldKind, FormField, form_values};
pub use grid::{GridStore, GridUpdate, Row, RowSet, plan_update};
pub use ha::{MemberActions, NodeRole, PanelRefresh, QuorumLayout, ReplicationNodePanel};
pub use report::{ErrorReport, StatusHandlers, unavailable_message};
pub use validate::FieldPattern;

// Re-export the API types consumers pass back in.
pub use qmc_api::{Credentials, LoadOptions, Metadata, ModelObject};
