//! CLI argument definitions for the Tabkeep binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Storage backend type
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Backend {
    /// redb file on disk (default)
    Redb,
    /// In-memory with JSON persistence (for development and ephemeral deployments)
    Inmemory,
}

/// Tabkeep account and tab store administration
#[derive(Parser, Debug)]
#[command(name = "tabkeep")]
#[command(about = "Tabkeep: user accounts and the tabs they own")]
#[command(version)]
pub struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the store lives and how it is bootstrapped
#[derive(clap::Args, Debug)]
pub struct StoreArgs {
    /// Storage backend to use
    #[arg(short, long, global = true, default_value = "redb", env = "TABKEEP_BACKEND")]
    pub backend: Backend,

    /// Data directory for storage files.
    /// For redb: stores tabkeep.redb
    /// For InMemory: stores tabkeep.json
    #[arg(short = 'D', long, global = true, env = "TABKEEP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Name of the administrator created on an empty store
    #[arg(long, global = true, env = "TABKEEP_ADMIN_NAME")]
    pub admin_name: Option<String>,

    /// Length of the generated administrator password
    #[arg(long, global = true, env = "TABKEEP_PASSWORD_LENGTH")]
    pub password_length: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show backend and record counts
    Info,
    /// List user accounts
    Users,
    /// List tabs
    Tabs(TabsArgs),
    /// Create a user account
    CreateUser(CreateUserArgs),
    /// Grant or revoke administrator rights
    SetAdmin(SetAdminArgs),
    /// Set a new password for a user
    Passwd(PasswdArgs),
    /// Delete a user and every tab it owns
    RemoveUser(NameArgs),
    /// Reconcile tab records with their owners' indexes
    Repair,
}

/// Arguments for the tabs command
#[derive(clap::Args, Debug)]
pub struct TabsArgs {
    /// Only list public tabs
    #[arg(long)]
    pub public: bool,
}

/// Arguments for the create-user command
#[derive(clap::Args, Debug)]
pub struct CreateUserArgs {
    /// Account name
    pub name: String,

    /// Give the account administrator rights
    #[arg(long)]
    pub admin: bool,

    /// Initial password
    #[arg(long, env = "TABKEEP_NEW_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the set-admin command
#[derive(clap::Args, Debug)]
pub struct SetAdminArgs {
    /// Account name
    pub name: String,

    /// New value of the admin flag
    #[arg(action = ArgAction::Set)]
    pub value: bool,
}

/// Arguments for the passwd command
#[derive(clap::Args, Debug)]
pub struct PasswdArgs {
    /// Account name
    pub name: String,

    /// New password
    #[arg(long, env = "TABKEEP_NEW_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// A single account name
#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// Account name
    pub name: String,
}
