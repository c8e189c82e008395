mod privileges;
mod prompt;
mod ui;
mod users;

use clap::Parser;

use ui::prelude::*;
use users::context::MenuContext;
use users::{menu, runner};

/// Interactive menu for administering local user accounts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();
    ui::init_from_env();

    if let Err(err) = privileges::require_root() {
        emit(
            Level::Error,
            "startup.privileges",
            &format!("{} {err}", char::from(NerdFont::Cross)),
            None,
        );
        std::process::exit(1);
    }

    let missing = runner::missing_tools();
    if !missing.is_empty() {
        emit(
            Level::Warn,
            "startup.tools",
            &format!(
                "{} Account tools not found on PATH: {}",
                char::from(NerdFont::Warning),
                missing.join(", ")
            ),
            None,
        );
    }

    let ctx = MenuContext::new();
    if let Err(err) = menu::run(&ctx) {
        emit(
            Level::Error,
            "menu.fatal",
            &format!("{} {err:#}", char::from(NerdFont::Cross)),
            None,
        );
        std::process::exit(1);
    }
}
