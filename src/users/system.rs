//! Gated lifecycle operations.
//!
//! Every mutation follows the same sequence: validate the name format, check
//! the database, then invoke exactly one external tool. The gates live here,
//! away from the prompts, so they are unit-testable with the in-memory
//! database and the recording runner.

use anyhow::Result;
use thiserror::Error;

use super::database::{Account, AccountDatabase};
use super::runner::{CommandError, CommandRunner, GROUPADD, PASSWD, USERADD, USERDEL, USERMOD};
use super::validate::{NameError, validate_group_name, validate_username};

#[derive(Debug, Error)]
pub enum OpError {
    #[error("invalid username: {0}")]
    InvalidUsername(NameError),
    #[error("invalid group name: {0}")]
    InvalidGroupName(NameError),
    #[error("account '{0}' already exists")]
    AccountExists(String),
    #[error("account '{0}' does not exist")]
    NoSuchAccount(String),
    #[error("group '{0}' already exists")]
    GroupExists(String),
    #[error("group '{0}' does not exist")]
    NoSuchGroup(String),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Lookup(#[from] anyhow::Error),
}

impl OpError {
    /// Whether this is an ordinary precondition rejection (reported inline,
    /// menu continues) as opposed to a command or lookup failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, OpError::Command(_) | OpError::Lookup(_))
    }
}

/// Validate a username and require the account to exist.
pub fn require_account(db: &dyn AccountDatabase, name: &str) -> Result<(), OpError> {
    validate_username(name).map_err(OpError::InvalidUsername)?;
    if !db.account_exists(name)? {
        return Err(OpError::NoSuchAccount(name.to_string()));
    }
    Ok(())
}

/// Create an account with a home directory (`useradd -m`).
pub fn create_account(
    db: &dyn AccountDatabase,
    runner: &dyn CommandRunner,
    name: &str,
) -> Result<(), OpError> {
    validate_username(name).map_err(OpError::InvalidUsername)?;
    if db.account_exists(name)? {
        return Err(OpError::AccountExists(name.to_string()));
    }
    runner.run(USERADD, &["-m", name])?;
    Ok(())
}

/// Remove an account together with its home directory (`userdel -r`).
pub fn remove_account(
    db: &dyn AccountDatabase,
    runner: &dyn CommandRunner,
    name: &str,
) -> Result<(), OpError> {
    require_account(db, name)?;
    runner.run(USERDEL, &["-r", name])?;
    Ok(())
}

/// Create a group (`groupadd`).
pub fn create_group(
    db: &dyn AccountDatabase,
    runner: &dyn CommandRunner,
    group: &str,
) -> Result<(), OpError> {
    validate_group_name(group).map_err(OpError::InvalidGroupName)?;
    if db.group_exists(group)? {
        return Err(OpError::GroupExists(group.to_string()));
    }
    runner.run(GROUPADD, &[group])?;
    Ok(())
}

/// Add an account to a supplementary group (`usermod -a -G`).
pub fn add_to_group(
    db: &dyn AccountDatabase,
    runner: &dyn CommandRunner,
    name: &str,
    group: &str,
) -> Result<(), OpError> {
    require_account(db, name)?;
    validate_group_name(group).map_err(OpError::InvalidGroupName)?;
    if !db.group_exists(group)? {
        return Err(OpError::NoSuchGroup(group.to_string()));
    }
    runner.run(USERMOD, &["-a", "-G", group, name])?;
    Ok(())
}

/// Hand the terminal to `passwd` for the given account.
pub fn set_password(runner: &dyn CommandRunner, name: &str) -> Result<(), CommandError> {
    runner.run_interactive(PASSWD, &[name])
}

/// Accounts in the regular uid range, sorted by uid.
pub fn regular_accounts(db: &dyn AccountDatabase) -> Result<Vec<Account>> {
    let mut accounts: Vec<Account> = db
        .accounts()?
        .into_iter()
        .filter(Account::is_regular)
        .collect();
    accounts.sort_by_key(|a| a.uid);
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::database::MemoryDatabase;
    use crate::users::runner::RecordingRunner;

    fn db_with(names: &[(&str, u32)], groups: Vec<(&str, u32)>) -> MemoryDatabase {
        let accounts = names
            .iter()
            .map(|(name, uid)| MemoryDatabase::account_named(name, *uid))
            .collect();
        MemoryDatabase::new(accounts, groups)
    }

    #[test]
    fn test_create_account_invokes_useradd() {
        let db = db_with(&[], vec![]);
        let runner = RecordingRunner::new();
        create_account(&db, &runner, "bob").unwrap();
        assert_eq!(runner.argv(0), vec!["useradd", "-m", "bob"]);
    }

    #[test]
    fn test_create_existing_account_aborts_before_command() {
        let db = db_with(&[("bob", 1000)], vec![]);
        let runner = RecordingRunner::new();
        let err = create_account(&db, &runner, "bob").unwrap_err();
        assert!(matches!(err, OpError::AccountExists(_)));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_create_invalid_name_skips_lookup_and_command() {
        let db = db_with(&[], vec![]);
        let runner = RecordingRunner::new();
        let err = create_account(&db, &runner, "123user").unwrap_err();
        assert!(matches!(err, OpError::InvalidUsername(_)));
        assert_eq!(db.lookup_count(), 0);
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_remove_account_invokes_userdel() {
        let db = db_with(&[("bob", 1000)], vec![]);
        let runner = RecordingRunner::new();
        remove_account(&db, &runner, "bob").unwrap();
        assert_eq!(runner.argv(0), vec!["userdel", "-r", "bob"]);
    }

    #[test]
    fn test_remove_invalid_name_skips_existence_check() {
        let db = db_with(&[("bob", 1000)], vec![]);
        let runner = RecordingRunner::new();
        let err = remove_account(&db, &runner, "user@123").unwrap_err();
        assert!(matches!(err, OpError::InvalidUsername(_)));
        assert_eq!(db.lookup_count(), 0);
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_remove_missing_account_is_rejected() {
        let db = db_with(&[], vec![]);
        let runner = RecordingRunner::new();
        let err = remove_account(&db, &runner, "ghost").unwrap_err();
        assert!(matches!(err, OpError::NoSuchAccount(_)));
        assert!(err.is_rejection());
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_add_to_group_invokes_usermod() {
        let db = db_with(&[("bob", 1000)], vec![("devs", 1001)]);
        let runner = RecordingRunner::new();
        add_to_group(&db, &runner, "bob", "devs").unwrap();
        assert_eq!(runner.argv(0), vec!["usermod", "-a", "-G", "devs", "bob"]);
    }

    #[test]
    fn test_add_to_missing_group_aborts_before_command() {
        let db = db_with(&[("bob", 1000)], vec![]);
        let runner = RecordingRunner::new();
        let err = add_to_group(&db, &runner, "bob", "devs").unwrap_err();
        assert!(matches!(err, OpError::NoSuchGroup(_)));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_create_group_gates_on_existence() {
        let db = db_with(&[], vec![("devs", 1001)]);
        let runner = RecordingRunner::new();
        assert!(matches!(
            create_group(&db, &runner, "devs").unwrap_err(),
            OpError::GroupExists(_)
        ));
        create_group(&db, &runner, "ops").unwrap();
        assert_eq!(runner.argv(0), vec!["groupadd", "ops"]);
    }

    #[test]
    fn test_command_failure_carries_stderr() {
        let db = db_with(&[], vec![]);
        let runner = RecordingRunner::new();
        runner.fail_next();
        let err = create_account(&db, &runner, "bob").unwrap_err();
        assert!(!err.is_rejection());
        assert!(err.to_string().contains("simulated failure"));
    }

    #[test]
    fn test_lookup_failure_is_not_a_rejection() {
        let db = MemoryDatabase::failing();
        let runner = RecordingRunner::new();
        let err = create_account(&db, &runner, "bob").unwrap_err();
        assert!(matches!(err, OpError::Lookup(_)));
        assert!(!err.is_rejection());
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_set_password_is_interactive() {
        let runner = RecordingRunner::new();
        set_password(&runner, "bob").unwrap();
        assert_eq!(runner.argv(0), vec!["passwd", "bob"]);
    }

    #[test]
    fn test_regular_accounts_filters_and_sorts() {
        let db = db_with(
            &[
                ("zara", 1002),
                ("root", 0),
                ("alice", 1000),
                ("nobody", 65534),
                ("daemon", 2),
            ],
            vec![],
        );
        let listed = regular_accounts(&db).unwrap();
        let names: Vec<&str> = listed.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "zara"]);
    }
}
