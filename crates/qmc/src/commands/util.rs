//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use serde_json::Value;

use qmc_core::form::parse_assignment;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.lines().next().unwrap_or(message).to_owned(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse repeated `--set key=value` flags.
pub fn parse_assignments(raw: &[String]) -> Result<Vec<(String, Value)>, CliError> {
    raw.iter()
        .map(|item| {
            parse_assignment(item).ok_or_else(|| CliError::Validation {
                field: "--set".into(),
                reason: format!("expected KEY=VALUE, got '{item}'"),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn assignments_parse_json_values() {
        let parsed = parse_assignments(&["path=/etc/groups".into(), "port=9099".into()]).unwrap();
        assert_eq!(parsed[0], ("path".to_owned(), json!("/etc/groups")));
        assert_eq!(parsed[1], ("port".to_owned(), json!(9099)));
    }

    #[test]
    fn malformed_assignment_is_rejected() {
        assert!(matches!(
            parse_assignments(&["novalue".into()]),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Delete?", true).unwrap());
    }
}
