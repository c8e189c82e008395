use thiserror::Error;

/// Longest name accepted for accounts and groups, matching the limit the
/// shadow tools enforce.
pub const MAX_NAME_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,
    #[error("name is longer than {MAX_NAME_LEN} characters")]
    TooLong,
    #[error("name must start with a letter or underscore")]
    BadFirstChar,
    #[error("name may only contain letters, digits, underscores, and hyphens")]
    BadChar,
}

/// Validate an account name: 1 to 32 characters, starting with an ASCII
/// letter or underscore, the rest ASCII letters, digits, underscore, or
/// hyphen. Pure predicate, no system lookups.
pub fn validate_username(name: &str) -> Result<(), NameError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(NameError::Empty)?;
    if name.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(NameError::BadFirstChar);
    }
    for c in chars {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
            return Err(NameError::BadChar);
        }
    }
    Ok(())
}

/// Group names follow the same format rule as account names.
pub fn validate_group_name(name: &str) -> Result<(), NameError> {
    validate_username(name)
}

pub fn is_valid_username(name: &str) -> bool {
    validate_username(name).is_ok()
}
