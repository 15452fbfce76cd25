//! Store info command - shows backend and record counts.

use tabkeep::LoginManager;

use crate::backend::backend_label;
use crate::cli::StoreArgs;
use crate::output::{OutputFormat, print_json};

/// Run the info command
pub fn run(
    manager: &LoginManager,
    args: &StoreArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = manager.store();
    let users = store.count_users()?;
    let admins = store.count_admin_users()?;
    let tabs = store.get_tabs()?.len();

    let backend_str = backend_label(args);

    match format {
        OutputFormat::Human => {
            println!("Backend:     {backend_str}");
            println!("Users:       {users}");
            println!("Admins:      {admins}");
            println!("Tabs:        {tabs}");
        }
        OutputFormat::Json => {
            print_json(&serde_json::json!({
                "backend": backend_str,
                "users": users,
                "admins": admins,
                "tabs": tabs,
            }))?;
        }
    }

    Ok(())
}
