//! The fixed five-entry menu and its loop.

use anyhow::Result;
use colored::*;

use crate::prompt;
use crate::ui::prelude::*;

use super::context::MenuContext;
use super::handlers::{self, Flow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    AddAccount,
    DeleteAccount,
    AddToGroup,
    ListAccounts,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::AddAccount),
            "2" => Some(Self::DeleteAccount),
            "3" => Some(Self::AddToGroup),
            "4" => Some(Self::ListAccounts),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

fn render_menu() {
    println!();
    separator(false);
    println!(
        "  {} {}",
        char::from(NerdFont::Users),
        "User Management Menu".bold()
    );
    separator(false);
    println!("  1. Add a new account");
    println!("  2. Delete an account");
    println!("  3. Add an account to a group");
    println!("  4. List accounts");
    println!("  5. Exit");
    separator(true);
}

/// Run the menu until the user exits or interrupts. Errors raised by an
/// operation are reported and the loop continues; only returning `Err` here
/// ends the process with a failure status.
pub fn run(ctx: &MenuContext) -> Result<()> {
    loop {
        render_menu();

        let Some(input) = prompt::line("Enter your choice [1-5]")? else {
            break;
        };
        let Some(choice) = MenuChoice::parse(&input) else {
            emit(
                Level::Warn,
                "menu.invalid",
                &format!(
                    "{} Invalid choice '{input}', enter 1-5.",
                    char::from(NerdFont::Warning)
                ),
                None,
            );
            continue;
        };

        let flow = match dispatch(ctx, choice) {
            Ok(flow) => flow,
            Err(err) => {
                ctx.emit_failure("menu.operation", &format!("Unexpected failure: {err:#}"));
                Flow::Continue
            }
        };

        match flow {
            Flow::Quit => break,
            Flow::Continue => {
                if !prompt::acknowledge()? {
                    break;
                }
            }
        }
    }

    emit(
        Level::Info,
        "menu.exit",
        &format!("{} Goodbye.", char::from(NerdFont::User)),
        None,
    );
    Ok(())
}

fn dispatch(ctx: &MenuContext, choice: MenuChoice) -> Result<Flow> {
    match choice {
        MenuChoice::AddAccount => handlers::add_account(ctx),
        MenuChoice::DeleteAccount => handlers::delete_account(ctx),
        MenuChoice::AddToGroup => handlers::add_to_group(ctx),
        MenuChoice::ListAccounts => handlers::list_accounts(ctx),
        MenuChoice::Exit => Ok(Flow::Quit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognizes_all_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::AddAccount));
        assert_eq!(MenuChoice::parse("2"), Some(MenuChoice::DeleteAccount));
        assert_eq!(MenuChoice::parse("3"), Some(MenuChoice::AddToGroup));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::ListAccounts));
        assert_eq!(MenuChoice::parse("5"), Some(MenuChoice::Exit));
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        assert_eq!(MenuChoice::parse(" 3 "), Some(MenuChoice::AddToGroup));
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        assert_eq!(MenuChoice::parse(""), None);
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("exit"), None);
        assert_eq!(MenuChoice::parse("12"), None);
    }
}
