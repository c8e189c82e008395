/// Curated nerd font glyphs used by the menu and status messages.
///
/// Kept to the handful of icons this tool actually renders so the set stays
/// consistent across nerd font implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerdFont {
    // Status and feedback
    Check,
    Cross,
    Warning,
    Info,
    Question,

    // Accounts
    User,
    Users,
    UserPlus,

    // Actions
    Key,
    Trash,
    List,
}

impl NerdFont {
    pub const fn unicode(self) -> char {
        match self {
            Self::Check => '\u{f00c}',    // fa-check
            Self::Cross => '\u{f00d}',    // fa-times
            Self::Warning => '\u{f071}',  // fa-exclamation-triangle
            Self::Info => '\u{f05a}',     // fa-info-circle
            Self::Question => '\u{f059}', // fa-question-circle
            Self::User => '\u{f007}',     // fa-user
            Self::Users => '\u{f0c0}',    // fa-users
            Self::UserPlus => '\u{f234}', // fa-user-plus
            Self::Key => '\u{f084}',      // fa-key
            Self::Trash => '\u{f1f8}',    // fa-trash
            Self::List => '\u{f03a}',     // fa-list
        }
    }
}

impl From<NerdFont> for char {
    fn from(icon: NerdFont) -> Self {
        icon.unicode()
    }
}

impl From<NerdFont> for String {
    fn from(icon: NerdFont) -> Self {
        icon.unicode().to_string()
    }
}
