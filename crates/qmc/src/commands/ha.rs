//! HA replication node command handlers.

use std::time::Duration;

use chrono::DateTime;
use serde_json::Value;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use qmc_core::console::VIRTUAL_HOST_NODE;
use qmc_core::ha::{DELETE_NODE_WARNING, remove_node_prompt, transfer_master_prompt};
use qmc_core::{Console, CoreError, ReplicationNodePanel, Row, unavailable_message};

use crate::cli::{GlobalOpts, HaArgs, HaCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

const CONFIG_COLUMNS: [(&str, &str); 2] = [("Name", "id"), ("Value", "value")];

const MEMBER_COLUMNS: [(&str, &str); 5] = [
    ("Name", "name"),
    ("Role", "role"),
    ("Address", "address"),
    ("Join Time", "joinTime"),
    ("Last Txn Id", "lastKnownReplicationTransactionId"),
];

// ── Rendering ────────────────────────────────────────────────────────

/// Epoch-millisecond join times read as UTC timestamps.
fn format_join_time(value: Option<&Value>) -> Option<Value> {
    let millis = value?.as_i64()?;
    let at = DateTime::from_timestamp_millis(millis)?;
    Some(Value::String(at.format("%Y-%m-%d %H:%M:%S UTC").to_string()))
}

fn member_display_rows(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            if let Some(text) = format_join_time(row.get("joinTime")) {
                row.insert("joinTime".into(), text);
            }
            row
        })
        .collect()
}

fn panel_detail(panel: &ReplicationNodePanel, color: bool) -> String {
    let name = panel.name().unwrap_or_default();
    let role = panel.role();
    let role_text = role.map(|r| r.to_string()).unwrap_or_default();

    let mut sections = vec![
        format!(
            "{} {}",
            output::heading(name, color),
            output::paint_role(role, &format!("({role_text})"), color)
        ),
        output::detail_table(panel.fields()),
    ];

    let config_grids = [
        ("Environment Configuration", panel.environment()),
        ("Replicated Environment Configuration", panel.replicated_environment()),
    ];
    for (title, grid) in config_grids {
        if grid.is_visible() {
            sections.push(output::heading(title, color));
            sections.push(output::rows_table(grid.rows(), &CONFIG_COLUMNS));
        }
    }

    let members = panel.members();
    if members.is_visible() {
        sections.push(output::heading("Group Members", color));
        sections.push(output::rows_table(&member_display_rows(members.rows()), &MEMBER_COLUMNS));
    }

    sections.join("\n\n")
}

fn render_panel(panel: &ReplicationNodePanel, global: &GlobalOpts, color: bool) -> Result<String, CliError> {
    let data = panel.data().unwrap_or(&Value::Null);
    output::render_single(
        &global.output,
        data,
        |_| panel_detail(panel, color),
        |_| panel.name().unwrap_or_default().to_owned(),
    )
}

async fn load_panel(console: &Console, node: &str) -> Result<ReplicationNodePanel, CliError> {
    let mut panel = ReplicationNodePanel::new();
    console.refresh_panel(&mut panel, node).await?;
    Ok(panel)
}

// ── Watch ────────────────────────────────────────────────────────────

/// Redraw the panel whenever a refresh changes what it shows, until
/// interrupted or the node disappears.
async fn watch(console: &Console, node: &str, interval: Duration, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut panel = ReplicationNodePanel::new();
    let mut shown_fields = None;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!(node, "watch interrupted");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        match console.refresh_panel(&mut panel, node).await {
            Ok(refresh) => {
                let fields = panel.fields();
                if refresh.any() || shown_fields.as_ref() != Some(&fields) {
                    output::print_output(&render_panel(&panel, global, color)?, global.quiet);
                    shown_fields = Some(fields);
                }
            }
            Err(CoreError::NotFound { .. }) => {
                eprintln!("{}", unavailable_message(VIRTUAL_HOST_NODE, node));
                return Ok(());
            }
            Err(err @ (CoreError::ConnectionFailed { .. } | CoreError::Api { .. })) => {
                warn!(node, error = %err, "refresh failed, retrying");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(console: &Console, args: HaArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        HaCommand::Show { node, watch: false, .. } => {
            let panel = load_panel(console, &node).await?;
            let color = output::should_color(&global.color);
            output::print_output(&render_panel(&panel, global, color)?, global.quiet);
            Ok(())
        }

        HaCommand::Show { node, watch: true, interval } => {
            let interval = config::poll_interval(console.config(), interval);
            watch(console, &node, interval, global).await
        }

        HaCommand::TransferMaster { node, member } => {
            let panel = load_panel(console, &node).await?;
            panel.ensure_transfer_allowed(&member)?;
            if !util::confirm(&transfer_master_prompt(&member), global.yes)? {
                return Ok(());
            }
            console.transfer_mastership(&node, &member).await?;
            if !global.quiet {
                eprintln!("Mastership transfer to '{member}' requested");
            }
            Ok(())
        }

        HaCommand::RemoveNode { node, member } => {
            let panel = load_panel(console, &node).await?;
            panel.ensure_remove_allowed(&member)?;
            if !util::confirm(&remove_node_prompt(&member), global.yes)? {
                return Ok(());
            }
            console.remove_replication_node(&node, &member).await?;
            if !global.quiet {
                eprintln!("Node '{member}' removed from the group");
            }
            Ok(())
        }

        HaCommand::Delete { node } => {
            let panel = load_panel(console, &node).await?;
            panel.ensure_delete_allowed()?;
            if !util::confirm(DELETE_NODE_WARNING, global.yes)? {
                return Ok(());
            }
            console.delete_virtual_host_node(&node).await?;
            if !global.quiet {
                eprintln!("Virtual host node '{node}' deleted");
            }
            Ok(())
        }
    }
}
