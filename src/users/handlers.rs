//! Interactive operation flows: prompt, gate, invoke, report.
//!
//! Precondition rejections and command failures are reported inline and the
//! menu continues; only database lookup failures bubble up to the loop as
//! unexpected errors. A `Flow::Quit` means the user interrupted a prompt.

use anyhow::Result;
use colored::*;

use crate::prompt;

use super::context::MenuContext;
use super::system::{self, OpError};
use super::validate::validate_group_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Create an account, then offer the interactive password step.
pub fn add_account(ctx: &MenuContext) -> Result<Flow> {
    let Some(username) = prompt::line("Enter new username")? else {
        return Ok(Flow::Quit);
    };
    if username.is_empty() {
        ctx.emit_info("users.create.cancelled", "Creation cancelled.");
        return Ok(Flow::Continue);
    }

    if let Err(err) = system::create_account(ctx.db(), ctx.runner(), &username) {
        return report_op_error(ctx, "users.create", err);
    }
    ctx.emit_success("users.created", &format!("Account '{username}' created."));

    let question = format!("Set a password for '{username}' now?");
    let Some(set_now) = prompt::confirm(&question, true)? else {
        return Ok(Flow::Quit);
    };
    if set_now {
        // passwd owns the terminal for its own dialog; nothing is captured
        match system::set_password(ctx.runner(), &username) {
            Ok(()) => {
                ctx.emit_success("users.password", &format!("Password set for '{username}'."))
            }
            Err(err) => ctx.emit_failure("users.password.failed", &err.to_string()),
        }
    }

    Ok(Flow::Continue)
}

/// Delete an account and its home directory after confirmation.
pub fn delete_account(ctx: &MenuContext) -> Result<Flow> {
    let Some(username) = prompt::line("Enter username to delete")? else {
        return Ok(Flow::Quit);
    };
    if username.is_empty() {
        ctx.emit_info("users.delete.cancelled", "Deletion cancelled.");
        return Ok(Flow::Continue);
    }

    // Gate before the destructive confirmation so the prompt names a real
    // account; invalid names never reach the database.
    if let Err(err) = system::require_account(ctx.db(), &username) {
        return report_op_error(ctx, "users.delete", err);
    }

    let question = format!("Delete '{username}' and its home directory?");
    let Some(confirmed) = prompt::confirm(&question, false)? else {
        return Ok(Flow::Quit);
    };
    if !confirmed {
        ctx.emit_info("users.delete.cancelled", "Deletion cancelled.");
        return Ok(Flow::Continue);
    }

    match system::remove_account(ctx.db(), ctx.runner(), &username) {
        Ok(()) => {
            ctx.emit_success("users.deleted", &format!("Account '{username}' deleted."));
            Ok(Flow::Continue)
        }
        Err(err) => report_op_error(ctx, "users.delete", err),
    }
}

/// Add an account to a supplementary group, offering to create a missing
/// group first.
pub fn add_to_group(ctx: &MenuContext) -> Result<Flow> {
    let Some(username) = prompt::line("Enter username")? else {
        return Ok(Flow::Quit);
    };
    if username.is_empty() {
        ctx.emit_info("users.groups.cancelled", "Nothing changed.");
        return Ok(Flow::Continue);
    }
    if let Err(err) = system::require_account(ctx.db(), &username) {
        return report_op_error(ctx, "users.groups", err);
    }

    let Some(group) = prompt::line("Enter group name")? else {
        return Ok(Flow::Quit);
    };
    if group.is_empty() {
        ctx.emit_info("users.groups.cancelled", "Nothing changed.");
        return Ok(Flow::Continue);
    }
    if let Err(err) = validate_group_name(&group) {
        ctx.emit_info("users.groups.invalid", &format!("Invalid group name: {err}."));
        return Ok(Flow::Continue);
    }

    if !ctx.db().group_exists(&group)? {
        let question = format!("Group '{group}' does not exist. Create it?");
        let Some(create) = prompt::confirm(&question, false)? else {
            return Ok(Flow::Quit);
        };
        if !create {
            ctx.emit_info(
                "users.groups.declined",
                &format!("Group '{group}' not created; nothing changed."),
            );
            return Ok(Flow::Continue);
        }
        if let Err(err) = system::create_group(ctx.db(), ctx.runner(), &group) {
            return report_op_error(ctx, "users.groups", err);
        }
        ctx.emit_success("users.groups.created", &format!("Group '{group}' created."));
    }

    match system::add_to_group(ctx.db(), ctx.runner(), &username, &group) {
        Ok(()) => {
            ctx.emit_success(
                "users.groups.added",
                &format!("Added '{username}' to group '{group}'."),
            );
            Ok(Flow::Continue)
        }
        Err(err) => report_op_error(ctx, "users.groups", err),
    }
}

/// Print the accounts in the regular uid range as an aligned table.
pub fn list_accounts(ctx: &MenuContext) -> Result<Flow> {
    let accounts = system::regular_accounts(ctx.db())?;
    if accounts.is_empty() {
        ctx.emit_info("users.list.empty", "No regular user accounts found.");
        return Ok(Flow::Continue);
    }

    println!();
    let header = format!(
        "{: <20} {: >6} {: >6}  {: <12} {: <24} {}",
        "Username".bold(),
        "UID".bold(),
        "GID".bold(),
        "Group".bold(),
        "Home".bold(),
        "Shell".bold()
    );
    println!("{header}");
    println!("{}", "-".repeat(80));
    for account in &accounts {
        // Best-effort name for the primary group; the raw gid stays visible
        let group = ctx
            .db()
            .group_by_id(account.gid)
            .ok()
            .flatten()
            .unwrap_or_default();
        println!(
            "{: <20} {: >6} {: >6}  {: <12} {: <24} {}",
            account.name, account.uid, account.gid, group, account.home, account.shell
        );
    }
    println!();

    Ok(Flow::Continue)
}

fn report_op_error(ctx: &MenuContext, code: &str, err: OpError) -> Result<Flow> {
    match err {
        // Lookup failures are unexpected; let the loop report them
        OpError::Lookup(err) => Err(err),
        err if err.is_rejection() => {
            ctx.emit_info(code, &format!("{err}."));
            Ok(Flow::Continue)
        }
        err => {
            ctx.emit_failure(code, &err.to_string());
            Ok(Flow::Continue)
        }
    }
}
