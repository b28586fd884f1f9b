//! Group provider command handlers.

use tabled::Tabled;

use qmc_core::dialog::group_provider::{GROUP_PROVIDER_CATEGORY, GROUP_PROVIDER_PATH};
use qmc_core::grid::{display_value, row_str};
use qmc_core::naming::TypeOption;
use qmc_core::{Console, CoreError, GroupProviderDialog, Row, delete_selected};

use crate::cli::{GlobalOpts, GroupProviderArgs, GroupProviderCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const DELETE_PREFIX: &str = "Delete group provider";

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    provider_type: String,
    #[tabled(rename = "State")]
    state: String,
}

fn provider_row(row: &Row) -> ProviderRow {
    ProviderRow {
        name: display_value(row.get("name")),
        provider_type: display_value(row.get("type")),
        state: display_value(row.get("state")),
    }
}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    name: String,
}

fn apply_assignments(dialog: &mut GroupProviderDialog, set: &[String]) -> Result<(), CliError> {
    for (key, value) in util::parse_assignments(set)? {
        dialog.set(&key, value)?;
    }
    Ok(())
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(console: &Console, args: GroupProviderArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        GroupProviderCommand::List => {
            let rows = console.list_group_providers().await?;
            let out = output::render_list(&global.output, &rows, provider_row, |r| {
                display_value(r.get("name"))
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupProviderCommand::Types => {
            let types = console.group_provider_types().await?;
            let out = output::render_list(
                &global.output,
                &types,
                |t: &TypeOption| TypeRow { name: t.name.clone() },
                |t| t.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupProviderCommand::Add {
            name,
            provider_type,
            set,
        } => {
            let mut dialog = console.open_group_provider_add().await?;
            dialog.select_type(console.metadata().await?, &provider_type)?;
            dialog.set("name", name.clone().into())?;
            apply_assignments(&mut dialog, &set)?;

            console.submit_group_provider(&dialog).await?;
            if !global.quiet {
                eprintln!("Group provider '{name}' created");
            }
            Ok(())
        }

        GroupProviderCommand::Edit { name, set } => {
            let mut dialog = console.open_group_provider_edit(&name).await?;
            tracing::debug!(title = %dialog.title(), "editing");
            apply_assignments(&mut dialog, &set)?;

            if dialog.submit()?.values().is_empty() {
                if !global.quiet {
                    eprintln!("No changes for group provider '{name}'");
                }
                return Ok(());
            }
            let submission = console.submit_group_provider(&dialog).await?;
            if !global.quiet {
                eprintln!(
                    "Group provider '{name}' updated ({} attribute(s))",
                    submission.values().len()
                );
            }
            Ok(())
        }

        GroupProviderCommand::Delete { names } => {
            let rows = console.list_group_providers().await?;
            let selection: Vec<Row> = rows
                .into_iter()
                .filter(|row| row_str(row, "name").is_some_and(|n| names.iter().any(|want| want == n)))
                .collect();

            if let Some(missing) = names
                .iter()
                .find(|want| !selection.iter().any(|row| row_str(row, "name") == Some(want.as_str())))
            {
                return Err(CoreError::NotFound {
                    category: GROUP_PROVIDER_CATEGORY.into(),
                    name: missing.clone(),
                }
                .into());
            }

            let mut prompt = Ok(true);
            let deleted = delete_selected(
                &selection,
                DELETE_PREFIX,
                |message| {
                    prompt = util::confirm(message, global.yes);
                    matches!(prompt, Ok(true))
                },
                |plan| async move { console.delete_objects(GROUP_PROVIDER_PATH, None, &plan, None).await },
            )
            .await?;
            prompt?;

            if deleted && !global.quiet {
                eprintln!("Deleted {} group provider(s)", selection.len());
            }
            Ok(())
        }
    }
}
