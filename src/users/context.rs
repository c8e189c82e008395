use crate::ui::prelude::*;

use super::database::{AccountDatabase, PasswdDatabase};
use super::runner::{CommandRunner, SystemRunner};

/// Shared state for the menu handlers: the account database, the command
/// runner, and the message helpers every operation reports through.
pub struct MenuContext {
    db: Box<dyn AccountDatabase>,
    runner: Box<dyn CommandRunner>,
}

impl MenuContext {
    pub fn new() -> Self {
        Self {
            db: Box::new(PasswdDatabase::new()),
            runner: Box::new(SystemRunner),
        }
    }

    pub fn db(&self) -> &dyn AccountDatabase {
        self.db.as_ref()
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub fn emit_success(&self, code: &str, message: &str) {
        emit(
            Level::Success,
            code,
            &format!("{} {message}", char::from(NerdFont::Check)),
            None,
        );
    }

    pub fn emit_info(&self, code: &str, message: &str) {
        emit(
            Level::Info,
            code,
            &format!("{} {message}", char::from(NerdFont::Info)),
            None,
        );
    }

    pub fn emit_failure(&self, code: &str, message: &str) {
        emit(
            Level::Error,
            code,
            &format!("{} {message}", char::from(NerdFont::Cross)),
            None,
        );
    }
}

impl Default for MenuContext {
    fn default() -> Self {
        Self::new()
    }
}
