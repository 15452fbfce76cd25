//! Tab listing command.

use tabkeep::LoginManager;

use crate::cli::TabsArgs;
use crate::output::{OutputFormat, print_json, print_table};

/// Run the `tabs` command
pub fn list(
    manager: &LoginManager,
    args: &TabsArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let tabs = if args.public {
        manager.store().get_public_tabs()?
    } else {
        manager.store().get_tabs()?
    };

    match format {
        OutputFormat::Human => {
            if tabs.is_empty() {
                println!("No tabs found.");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = tabs
                .iter()
                .map(|tab| {
                    vec![
                        tab.id.to_string(),
                        tab.owner.clone(),
                        if tab.public { "yes" } else { "no" }.to_string(),
                        tab.contents.len().to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "OWNER", "PUBLIC", "BYTES"], &rows);
        }
        OutputFormat::Json => {
            let entries: Vec<_> = tabs
                .iter()
                .map(|tab| {
                    serde_json::json!({
                        "id": tab.id.to_string(),
                        "owner": tab.owner,
                        "public": tab.public,
                        "bytes": tab.contents.len(),
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(entries))?;
        }
    }

    Ok(())
}
