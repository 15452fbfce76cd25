use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod commands {
    pub mod info;
    pub mod repair;
    pub mod tabs;
    pub mod users;
}
mod output;

use cli::{Cli, Commands};
use output::OutputFormat;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing. Logs go to stderr so --json output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tabkeep=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    // Opening runs bootstrap, which may write the first administrator.
    let manager = backend::open_manager(&cli.store)?;

    let result = match &cli.command {
        Commands::Info => commands::info::run(&manager, &cli.store, format),
        Commands::Users => commands::users::list(&manager, format),
        Commands::Tabs(args) => commands::tabs::list(&manager, args, format),
        Commands::CreateUser(args) => commands::users::create(&manager, args, format),
        Commands::SetAdmin(args) => commands::users::set_admin(&manager, args, format),
        Commands::Passwd(args) => commands::users::passwd(&manager, args, format),
        Commands::RemoveUser(args) => commands::users::remove(&manager, args, format),
        Commands::Repair => commands::repair::run(&manager, format),
    };

    backend::save_backend(manager.store(), &cli.store)?;
    result
}
