//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};

use qmc_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "********";

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Replace plaintext passwords before display.
fn masked(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
    }
    cfg
}

/// Interactive prompts for one profile's connection and credentials.
fn prompt_profile() -> Result<Profile, CliError> {
    let broker: String = Input::new()
        .with_prompt("Broker management URL")
        .default("http://localhost:8080".into())
        .validate_with(|input: &String| {
            qmc_config::parse_broker_url(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let auth_choices = &[
        "Username, password from an environment variable",
        "Username, password saved in the config file (plaintext)",
        "No authentication",
    ];
    let auth_selection = Select::new()
        .with_prompt("Authentication")
        .items(auth_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        broker,
        ..Profile::default()
    };
    if auth_selection == 2 {
        return Ok(profile);
    }

    let username: String = Input::new()
        .with_prompt("Username")
        .default("admin".into())
        .interact_text()
        .map_err(prompt_err)?;
    profile.username = Some(username);

    if auth_selection == 0 {
        let env_name: String = Input::new()
            .with_prompt("Password environment variable")
            .default(qmc_config::PASSWORD_ENV.into())
            .interact_text()
            .map_err(prompt_err)?;
        profile.password_env = Some(env_name);
    } else {
        let password = Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(prompt_err)?;
        if password.is_empty() {
            return Err(CliError::Validation {
                field: "password".into(),
                reason: "password cannot be empty".into(),
            });
        }
        profile.password = Some(password);
    }
    Ok(profile)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = qmc_config::config_path();
            eprintln!("qmc configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = qmc_config::load_config_or_default();
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(config::active_profile_name(global, &cfg))
                .interact_text()
                .map_err(prompt_err)?;

            let profile = prompt_profile()?;
            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }

            let path = qmc_config::save_config(&cfg)?;
            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Test it: qmc -p {profile_name} group-provider list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = masked(qmc_config::load_config()?);
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| {
                    let default = c.default_profile.as_deref().unwrap_or("default");
                    let mut pairs = vec![
                        ("default_profile", default.to_owned()),
                        ("output", c.defaults.output.clone()),
                        ("timeout", format!("{}s", c.defaults.timeout)),
                        ("poll_interval", format!("{}s", c.defaults.poll_interval)),
                    ];
                    pairs.extend(
                        c.profiles
                            .iter()
                            .map(|(name, profile)| (name.as_str(), profile.broker.clone())),
                    );
                    output::detail_table(pairs)
                },
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", qmc_config::config_path().display());
            Ok(())
        }
    }
}
