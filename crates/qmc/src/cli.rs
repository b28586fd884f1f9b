//! Clap derive structures for the `qmc` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// qmc -- command-line management console for message brokers
#[derive(Debug, Parser)]
#[command(
    name = "qmc",
    version,
    about = "Manage a message broker from the command line",
    long_about = "A terminal management console for brokers exposing the REST management API.\n\n\
        Inspect and operate HA replication groups, manage group providers,\n\
        and edit the JMX management plugin.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Broker profile to use
    #[arg(long, short = 'p', env = "QMC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Management URL (overrides profile)
    #[arg(long, short = 'b', env = "QMC_BROKER", global = true)]
    pub broker: Option<String>,

    /// Username for HTTP basic auth
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Password for HTTP basic auth
    #[arg(long, env = "QMC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "QMC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "QMC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "QMC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect and operate a BDB HA virtual host node
    Ha(HaArgs),

    /// Manage group providers
    #[command(alias = "gp")]
    GroupProvider(GroupProviderArgs),

    /// View and edit the JMX management plugin
    Jmx(JmxArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── HA ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HaArgs {
    #[command(subcommand)]
    pub command: HaCommand,
}

#[derive(Debug, Subcommand)]
pub enum HaCommand {
    /// Show node attributes, environment configuration, and group members
    Show {
        /// Virtual host node name
        node: String,

        /// Keep refreshing until interrupted or the node goes away
        #[arg(long, short = 'w')]
        watch: bool,

        /// Refresh interval in seconds (overrides profile)
        #[arg(long, requires = "watch")]
        interval: Option<u64>,
    },

    /// Transfer mastership of the group to a replica
    TransferMaster {
        /// Local virtual host node name
        node: String,

        /// Name of the replica to promote
        member: String,
    },

    /// Remove a node from the replication group
    RemoveNode {
        /// Local virtual host node name
        node: String,

        /// Name of the group member to remove
        member: String,
    },

    /// Delete the virtual host node, including its message data
    Delete {
        /// Virtual host node name
        node: String,
    },
}

// ── Group providers ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupProviderArgs {
    #[command(subcommand)]
    pub command: GroupProviderCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupProviderCommand {
    /// List group providers
    #[command(alias = "ls")]
    List,

    /// List supported group provider types
    Types,

    /// Create a group provider
    Add {
        /// Provider name
        name: String,

        /// Provider type (see `qmc group-provider types`)
        #[arg(long = "type", short = 't')]
        provider_type: String,

        /// Type-specific attribute, repeatable
        #[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Change attributes of a group provider
    Edit {
        /// Provider name
        name: String,

        /// Attribute to change, repeatable
        #[arg(long = "set", short = 's', value_name = "KEY=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Delete one or more group providers
    #[command(alias = "rm")]
    Delete {
        /// Provider names
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },
}

// ── JMX plugin ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct JmxArgs {
    #[command(subcommand)]
    pub command: JmxCommand,
}

#[derive(Debug, Subcommand)]
pub enum JmxCommand {
    /// Show the plugin's configured attribute values
    Show {
        /// Plugin name
        #[arg(default_value = "jmxManagement")]
        plugin: String,
    },

    /// Change plugin attributes; only changed values are sent
    Edit {
        /// Plugin name
        #[arg(default_value = "jmxManagement")]
        plugin: String,

        /// Attribute to change, repeatable
        #[arg(long = "set", short = 's', value_name = "KEY=VALUE", required = true)]
        set: Vec<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display the current configuration (passwords masked)
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
