//! JMX management plugin command handlers.

use serde_json::{Map, Value};

use qmc_core::form::FieldKind;
use qmc_core::grid::display_value;
use qmc_core::{Console, JmxPluginDialog};

use crate::cli::{GlobalOpts, JmxArgs, JmxCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// Editable attributes with their configured (unresolved) values.
fn detail(dialog: &JmxPluginDialog) -> String {
    let pairs = dialog.fields().iter().map(|field| {
        let value = match field.kind {
            FieldKind::Checkbox => if field.checked { "yes" } else { "no" }.to_owned(),
            FieldKind::Password => "********".to_owned(),
            FieldKind::Text | FieldKind::Radio => display_value(Some(&field.value)),
        };
        (field.name.as_str(), value)
    });
    format!("{}\n{}", dialog.title(), output::detail_table(pairs))
}

pub async fn handle(console: &Console, args: JmxArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        JmxCommand::Show { plugin } => {
            let dialog = console.open_jmx_editor(&plugin).await?;
            let out = output::render_single(
                &global.output,
                dialog.initial(),
                |_| detail(&dialog),
                |actual: &Map<String, Value>| display_value(actual.get("name")),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JmxCommand::Edit { plugin, set } => {
            let mut dialog = console.open_jmx_editor(&plugin).await?;
            for (key, value) in util::parse_assignments(&set)? {
                dialog.set(&key, value)?;
            }
            let sent = console.save_jmx(&dialog).await?;
            if !global.quiet {
                if sent.is_empty() {
                    eprintln!("No changes for plugin '{plugin}'");
                } else {
                    eprintln!("Plugin '{plugin}' updated ({} attribute(s))", sent.len());
                }
            }
            Ok(())
        }
    }
}
