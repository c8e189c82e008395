//! Interactive prompt wrappers.
//!
//! All blocking reads in the program go through here. Ctrl-C during a prompt
//! surfaces from dialoguer as an `Interrupted` io error; callers receive it
//! as `Ok(None)` and treat it as a request to quit, never as a failure.

use std::io;

use anyhow::Result;
use dialoguer::{Confirm, Input};

/// Read one trimmed line of input. `Ok(None)` means the user interrupted.
pub fn line(prompt: &str) -> Result<Option<String>> {
    let answer = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text();

    match answer {
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(err) => interrupt_or_fail(err),
    }
}

/// Ask a yes/no question. `Ok(None)` means the user interrupted.
pub fn confirm(prompt: &str, default: bool) -> Result<Option<bool>> {
    let answer = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact();

    match answer {
        Ok(value) => Ok(Some(value)),
        Err(err) => interrupt_or_fail(err),
    }
}

/// Block until the user presses Enter. `Ok(false)` means they interrupted.
pub fn acknowledge() -> Result<bool> {
    let answer = Input::<String>::new()
        .with_prompt("Press Enter to return to the menu")
        .allow_empty(true)
        .interact_text();

    match answer {
        Ok(_) => Ok(true),
        Err(err) => interrupt_or_fail(err).map(|v: Option<()>| v.is_some()),
    }
}

fn interrupt_or_fail<T>(err: dialoguer::Error) -> Result<Option<T>> {
    match err {
        dialoguer::Error::IO(ref io_err) if io_err.kind() == io::ErrorKind::Interrupted => Ok(None),
        err => Err(err.into()),
    }
}
