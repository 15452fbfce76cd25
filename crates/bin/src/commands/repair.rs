//! Index repair command.

use tabkeep::LoginManager;

use crate::output::{OutputFormat, print_json};

/// Run the `repair` command
pub fn run(
    manager: &LoginManager,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = manager.store().repair()?;

    match format {
        OutputFormat::Human => {
            println!("Users checked:       {}", report.users_checked);
            println!("Dangling removed:    {}", report.dangling_removed);
            println!("Foreign removed:     {}", report.foreign_removed);
            println!("Duplicates removed:  {}", report.duplicates_removed);
            println!("Tabs reattached:     {}", report.reattached);
            println!("Orphans deleted:     {}", report.orphans_deleted);
            if report.is_clean() {
                println!("Store is consistent.");
            }
        }
        OutputFormat::Json => print_json(&serde_json::to_value(report)?)?,
    }

    Ok(())
}
