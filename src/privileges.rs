use sudo::RunningAs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrivilegeError {
    #[error("this program must run as root (use sudo)")]
    NeedRoot,
}

/// One-time startup gate: every menu operation mutates the system account
/// database, so the whole process must hold root before the menu is shown.
pub fn require_root() -> Result<(), PrivilegeError> {
    match sudo::check() {
        RunningAs::User => Err(PrivilegeError::NeedRoot),
        RunningAs::Root | RunningAs::Suid => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_agrees_with_effective_uid() {
        let is_root = nix::unistd::geteuid().is_root();
        assert_eq!(require_root().is_ok(), is_root);
    }
}
