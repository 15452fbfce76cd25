//! User account commands.

use tabkeep::{LoginManager, auth::NewUser};

use crate::cli::{CreateUserArgs, NameArgs, PasswdArgs, SetAdminArgs};
use crate::output::{OutputFormat, print_json, print_table};

/// Run the `users` command
pub fn list(
    manager: &LoginManager,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let users = manager.store().get_users()?;

    match format {
        OutputFormat::Human => {
            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = users
                .iter()
                .map(|user| {
                    vec![
                        user.name.clone(),
                        if user.admin { "yes" } else { "no" }.to_string(),
                        user.tabs.len().to_string(),
                    ]
                })
                .collect();
            print_table(&["NAME", "ADMIN", "TABS"], &rows);
        }
        OutputFormat::Json => {
            let entries: Vec<_> = users
                .iter()
                .map(|user| {
                    serde_json::json!({
                        "name": user.name,
                        "admin": user.admin,
                        "tabs": user.tabs.len(),
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(entries))?;
        }
    }

    Ok(())
}

/// Run the `create-user` command
pub fn create(
    manager: &LoginManager,
    args: &CreateUserArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let new_user = NewUser::new(args.name.as_str(), args.password.as_str(), args.admin);
    manager.register(&new_user)?;
    report(format, "Created user", &args.name, Some(args.admin))
}

/// Run the `set-admin` command
pub fn set_admin(
    manager: &LoginManager,
    args: &SetAdminArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    manager.set_admin(&args.name, args.value)?;
    report(format, "Updated user", &args.name, Some(args.value))
}

/// Run the `passwd` command
pub fn passwd(
    manager: &LoginManager,
    args: &PasswdArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = manager.store().get_user(&args.name)?;
    manager.change_password(&user, &args.password)?;
    report(format, "Changed password for", &args.name, None)
}

/// Run the `remove-user` command
pub fn remove(
    manager: &LoginManager,
    args: &NameArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    manager.remove_user(&args.name)?;
    report(format, "Removed user", &args.name, None)
}

fn report(
    format: OutputFormat,
    action: &str,
    name: &str,
    admin: Option<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => match admin {
            Some(admin) => println!("{action} {name} (admin: {admin})"),
            None => println!("{action} {name}"),
        },
        OutputFormat::Json => {
            let mut value = serde_json::json!({ "name": name });
            if let Some(admin) = admin {
                value["admin"] = serde_json::Value::Bool(admin);
            }
            print_json(&value)?;
        }
    }
    Ok(())
}
