//! Layers global CLI flags over the shared `qmc-config` profiles to
//! produce the `ConsoleConfig` handed to core.

use std::time::Duration;

use qmc_config::{Config, Profile};
use qmc_core::ConsoleConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ConsoleConfig` from the config file, profile, and CLI overrides.
pub fn build_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let cfg = qmc_config::load_config()?;
    resolve(&cfg, global)
}

/// Flag > env > profile > defaults.
fn resolve(cfg: &Config, global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        // No profile -- try to build from CLI flags / env vars alone
        None => Profile {
            broker: global.broker.clone().ok_or_else(|| CliError::NoConfig {
                path: qmc_config::config_path().display().to_string(),
            })?,
            ..Profile::default()
        },
    };

    if let Some(ref broker) = global.broker {
        profile.broker.clone_from(broker);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.password.is_some() {
        profile.password_env = None;
        profile.password.clone_from(&global.password);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }

    Ok(qmc_config::profile_to_console_config(
        &profile,
        &profile_name,
        &cfg.defaults,
    )?)
}

/// Poll interval for `--watch`, honoring `--interval`.
pub fn poll_interval(console: &ConsoleConfig, flag: Option<u64>) -> Duration {
    flag.map_or(console.poll_interval, Duration::from_secs)
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["qmc"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                broker: "http://broker:8080".into(),
                username: Some("admin".into()),
                password: Some("secret".into()),
                timeout: Some(12),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let console = resolve(
            &sample(),
            &global(&["--broker", "https://other:9090", "--timeout", "3", "-k"]),
        )
        .unwrap();
        assert_eq!(console.url.as_str(), "https://other:9090/");
        assert_eq!(console.timeout, Duration::from_secs(3));
        assert!(console.insecure);
        assert_eq!(console.credentials.unwrap().username, "admin");
    }

    #[test]
    fn password_flag_wins() {
        let console = resolve(&sample(), &global(&["--password", "flagpw"])).unwrap();
        let credentials = console.credentials.unwrap();
        assert_eq!(credentials.password.expose_secret(), "flagpw");
    }

    #[test]
    fn unknown_profile_lists_available() {
        let err = resolve(&sample(), &global(&["-p", "staging"])).unwrap_err();
        match err {
            CliError::ProfileNotFound { available, .. } => assert_eq!(available, "default"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn broker_flag_without_profile() {
        let console = resolve(&Config::default(), &global(&["--broker", "http://localhost:8080"])).unwrap();
        assert_eq!(console.url.as_str(), "http://localhost:8080/");
        assert_eq!(console.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn interval_flag_overrides_poll_interval() {
        let console = resolve(&sample(), &global(&[])).unwrap();
        assert_eq!(poll_interval(&console, None), Duration::from_secs(5));
        assert_eq!(poll_interval(&console, Some(1)), Duration::from_secs(1));
    }
}
