//! Clap derive structures for the `coachdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// coachdesk -- customers and trainings from the command line
#[derive(Debug, Parser)]
#[command(
    name = "coachdesk",
    version,
    about = "Manage personal-training customers and sessions from the command line",
    long_about = "A console for a personal-training business backed by a HAL REST API.\n\n\
        Lists, adds, edits and deletes customers and trainings, and summarizes\n\
        training time per activity and as a calendar.",
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
    /// Base URL of the customers collection (overrides config)
    #[arg(long, env = "COACHDESK_CUSTOMER_URL", global = true)]
    pub customer_url: Option<String>,

    /// Base URL of the trainings collection (overrides config)
    #[arg(long, env = "COACHDESK_TRAINING_URL", global = true)]
    pub training_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, env = "COACHDESK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "COACHDESK_OUTPUT",
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "COACHDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "COACHDESK_TIMEOUT", global = true)]
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
    /// Manage customers
    #[command(alias = "c")]
    Customers(CustomersArgs),

    /// Manage trainings
    #[command(alias = "t")]
    Trainings(TrainingsArgs),

    /// Total training minutes per activity
    Stats,

    /// Trainings as calendar events
    #[command(alias = "cal")]
    Calendar(CalendarArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CUSTOMERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List all customers
    #[command(alias = "ls")]
    List,

    /// Show one customer
    Get {
        /// Customer link (`_links.self.href`)
        id: String,
    },

    /// Add a customer
    Add(CustomerFields),

    /// Change fields of a customer; omitted fields keep their value
    Edit {
        /// Customer link (`_links.self.href`)
        id: String,

        #[command(flatten)]
        fields: CustomerFields,
    },

    /// Delete a customer
    #[command(alias = "rm")]
    Delete {
        /// Customer link (`_links.self.href`)
        id: String,
    },

    /// List customers as "First Last" -> link pairs for --customer
    Options,
}

#[derive(Debug, Args)]
pub struct CustomerFields {
    #[arg(long)]
    pub firstname: Option<String>,

    #[arg(long)]
    pub lastname: Option<String>,

    /// Street address
    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub postcode: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TRAININGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TrainingsArgs {
    #[command(subcommand)]
    pub command: TrainingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TrainingsCommand {
    /// List all trainings with their customer names
    #[command(alias = "ls")]
    List,

    /// Show one training
    Get {
        /// Training link (`_links.self.href`)
        id: String,
    },

    /// Add a training
    Add {
        /// Start, e.g. "2025-10-15T10:00" or "2025-10-15"
        #[arg(long)]
        date: String,

        /// Duration in minutes
        #[arg(long)]
        duration: i64,

        #[arg(long)]
        activity: String,

        /// Customer link, or the customer's full name
        #[arg(long)]
        customer: String,
    },

    /// Change fields of a training; the customer cannot be changed
    Edit {
        /// Training link (`_links.self.href`)
        id: String,

        #[arg(long)]
        date: Option<String>,

        /// Duration in minutes
        #[arg(long)]
        duration: Option<i64>,

        #[arg(long)]
        activity: Option<String>,
    },

    /// Delete a training
    #[command(alias = "rm")]
    Delete {
        /// Training link (`_links.self.href`)
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CALENDAR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// First day to show (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day to show (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file from --customer-url/--training-url; prompts for missing ones
    Init {
        /// Records without a self link: "drop" or "content-key"
        #[arg(long)]
        missing_self_link: Option<String>,

        /// How trainings reference customers: "href" or "id"
        #[arg(long)]
        customer_reference: Option<String>,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
