//! Read access to the system account and group databases.
//!
//! Lookups go through libc's resolver so nsswitch sources beyond the flat
//! files are honored; enumeration for the listing reads `/etc/passwd`
//! directly. "No such entry" is `Ok(None)` / `Ok(false)`; a failed query is
//! an `Err` and is never conflated with not-found.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use nix::unistd;

/// Lowest uid the shadow tools hand out to regular accounts.
pub const UID_RANGE_START: u32 = 1000;
/// Upper bound (exclusive); 65534 is reserved for nobody.
pub const UID_RANGE_END: u32 = 65534;

const PASSWD_PATH: &str = "/etc/passwd";

/// A single passwd entry as consumed by the menu operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: String,
    pub shell: String,
}

impl Account {
    /// Regular (human) accounts occupy the conventional uid range.
    pub fn is_regular(&self) -> bool {
        (UID_RANGE_START..UID_RANGE_END).contains(&self.uid)
    }
}

pub trait AccountDatabase {
    /// Look up one account by exact name. `Ok(None)` means no such account.
    fn account(&self, name: &str) -> Result<Option<Account>>;

    /// Whether a group with this exact name exists.
    fn group_exists(&self, name: &str) -> Result<bool>;

    /// Name of the group with this numeric id, if any.
    fn group_by_id(&self, gid: u32) -> Result<Option<String>>;

    /// Enumerate every account record.
    fn accounts(&self) -> Result<Vec<Account>>;

    fn account_exists(&self, name: &str) -> Result<bool> {
        Ok(self.account(name)?.is_some())
    }
}

/// The real database, backed by libc lookups and `/etc/passwd`.
pub struct PasswdDatabase {
    passwd_path: PathBuf,
}

impl PasswdDatabase {
    pub fn new() -> Self {
        Self {
            passwd_path: PathBuf::from(PASSWD_PATH),
        }
    }

    #[cfg(test)]
    fn with_passwd_path(path: PathBuf) -> Self {
        Self { passwd_path: path }
    }
}

impl Default for PasswdDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountDatabase for PasswdDatabase {
    fn account(&self, name: &str) -> Result<Option<Account>> {
        let user = unistd::User::from_name(name)
            .with_context(|| format!("querying passwd entry for {name}"))?;
        Ok(user.map(|u| Account {
            name: u.name,
            uid: u.uid.as_raw(),
            gid: u.gid.as_raw(),
            home: u.dir.to_string_lossy().into_owned(),
            shell: u.shell.to_string_lossy().into_owned(),
        }))
    }

    fn group_exists(&self, name: &str) -> Result<bool> {
        let group = unistd::Group::from_name(name)
            .with_context(|| format!("querying group entry for {name}"))?;
        Ok(group.is_some())
    }

    fn group_by_id(&self, gid: u32) -> Result<Option<String>> {
        let group = unistd::Group::from_gid(unistd::Gid::from_raw(gid))
            .with_context(|| format!("querying group entry for gid {gid}"))?;
        Ok(group.map(|g| g.name))
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        let contents = fs::read_to_string(&self.passwd_path)
            .with_context(|| format!("reading {}", self.passwd_path.display()))?;
        Ok(parse_passwd(&contents))
    }
}

fn parse_passwd(contents: &str) -> Vec<Account> {
    contents.lines().filter_map(parse_passwd_line).collect()
}

/// Parse one `name:pw:uid:gid:gecos:home:shell` line; malformed lines are
/// skipped rather than failing the whole listing.
fn parse_passwd_line(line: &str) -> Option<Account> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() < 7 {
        return None;
    }
    Some(Account {
        name: fields[0].to_string(),
        uid: fields[2].parse().ok()?,
        gid: fields[3].parse().ok()?,
        home: fields[5].to_string(),
        shell: fields[6].to_string(),
    })
}

/// In-memory database for tests: fixed contents, a lookup counter, and an
/// injectable failure so "lookup failed" stays distinguishable from
/// "not found" in callers.
#[cfg(test)]
pub(crate) struct MemoryDatabase {
    accounts: Vec<Account>,
    groups: Vec<(String, u32)>,
    fail: bool,
    lookups: std::cell::Cell<usize>,
}

#[cfg(test)]
impl MemoryDatabase {
    pub fn new(accounts: Vec<Account>, groups: Vec<(&str, u32)>) -> Self {
        Self {
            accounts,
            groups: groups
                .into_iter()
                .map(|(name, gid)| (name.to_string(), gid))
                .collect(),
            fail: false,
            lookups: std::cell::Cell::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            accounts: Vec::new(),
            groups: Vec::new(),
            fail: true,
            lookups: std::cell::Cell::new(0),
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.get()
    }

    fn tick(&self) -> Result<()> {
        self.lookups.set(self.lookups.get() + 1);
        if self.fail {
            anyhow::bail!("account database unavailable");
        }
        Ok(())
    }

    pub fn account_named(name: &str, uid: u32) -> Account {
        Account {
            name: name.to_string(),
            uid,
            gid: uid,
            home: format!("/home/{name}"),
            shell: "/bin/bash".to_string(),
        }
    }
}

#[cfg(test)]
impl AccountDatabase for MemoryDatabase {
    fn account(&self, name: &str) -> Result<Option<Account>> {
        self.tick()?;
        Ok(self.accounts.iter().find(|a| a.name == name).cloned())
    }

    fn group_exists(&self, name: &str) -> Result<bool> {
        self.tick()?;
        Ok(self.groups.iter().any(|(g, _)| g == name))
    }

    fn group_by_id(&self, gid: u32) -> Result<Option<String>> {
        self.tick()?;
        Ok(self
            .groups
            .iter()
            .find(|(_, id)| *id == gid)
            .map(|(name, _)| name.clone()))
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        self.tick()?;
        Ok(self.accounts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_passwd_line() {
        let account = parse_passwd_line("alice:x:1000:1000:Alice:/home/alice:/bin/bash").unwrap();
        assert_eq!(account.name, "alice");
        assert_eq!(account.uid, 1000);
        assert_eq!(account.gid, 1000);
        assert_eq!(account.home, "/home/alice");
        assert_eq!(account.shell, "/bin/bash");
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        assert!(parse_passwd_line("").is_none());
        assert!(parse_passwd_line("alice:x:1000").is_none());
        assert!(parse_passwd_line("alice:x:notanumber:1000:Alice:/home/alice:/bin/bash").is_none());

        let contents = "root:x:0:0:root:/root:/bin/bash\nbroken line\n";
        assert_eq!(parse_passwd(contents).len(), 1);
    }

    #[test]
    fn test_regular_uid_range_boundaries() {
        let at = |uid| MemoryDatabase::account_named("u", uid);
        assert!(!at(999).is_regular());
        assert!(at(1000).is_regular());
        assert!(at(65533).is_regular());
        assert!(!at(65534).is_regular());
        assert!(!at(0).is_regular());
    }

    #[test]
    fn test_passwd_database_enumerates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "root:x:0:0:root:/root:/bin/bash").unwrap();
        writeln!(file, "alice:x:1000:1000::/home/alice:/bin/zsh").unwrap();
        writeln!(file, "# not a passwd line").unwrap();

        let db = PasswdDatabase::with_passwd_path(file.path().to_path_buf());
        let accounts = db.accounts().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].name, "alice");
        assert_eq!(accounts[1].shell, "/bin/zsh");
    }

    #[test]
    fn test_memory_database_distinguishes_missing_from_failed() {
        let db = MemoryDatabase::new(
            vec![MemoryDatabase::account_named("bob", 1000)],
            vec![("wheel", 998)],
        );
        assert!(db.account_exists("bob").unwrap());
        assert!(!db.account_exists("nobody-here").unwrap());
        assert_eq!(db.group_by_id(998).unwrap(), Some("wheel".to_string()));
        assert_eq!(db.group_by_id(999).unwrap(), None);

        let failing = MemoryDatabase::failing();
        assert!(failing.account_exists("bob").is_err());
        assert!(failing.group_exists("wheel").is_err());
    }
}
