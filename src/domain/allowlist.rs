use std::collections::HashSet;

/// Set of users the bot answers to, parsed from a comma-separated list of
/// numeric user ids and usernames (with or without a leading `@`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowlist {
    entries: HashSet<String>,
}

impl Allowlist {
    pub fn from_csv(raw: &str) -> Self {
        let entries = raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A user is allowed when their id or their username (either spelling)
    /// appears in the list.
    pub fn allows(&self, user_id: i64, username: Option<&str>) -> bool {
        if self.entries.contains(&user_id.to_string()) {
            return true;
        }

        if let Some(name) = username {
            if self.entries.contains(name) || self.entries.contains(&format!("@{}", name)) {
                return true;
            }
        }

        false
    }
}
