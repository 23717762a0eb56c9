/// Runtime allow/block domain lists (§4.1 steps 5-6).
#[derive(Clone, Debug, Default)]
pub struct AllowBlockPolicy {
    pub allow: Vec<String>,
    pub block: Vec<String>,
}

impl AllowBlockPolicy {
    pub fn new(allow: Vec<String>, block: Vec<String>) -> Self {
        Self { allow, block }
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        if self.allow.is_empty() {
            return true;
        }
        self.allow.iter().any(|entry| matches_entry(host, entry))
    }

    pub fn is_blocked(&self, host: &str) -> bool {
        self.block.iter().any(|entry| matches_entry(host, entry))
    }
}

/// `entry` is either an exact hostname, or `*.suffix` for a subdomain
/// suffix match (§4.1).
fn matches_entry(host: &str, entry: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let entry = entry.to_ascii_lowercase();
    if let Some(suffix) = entry.strip_prefix("*.") {
        return host == suffix || host.ends_with(&format!(".{suffix}"));
    }
    host == entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only_for_plain_entries() {
        let policy = AllowBlockPolicy::new(vec!["example.com".into()], vec![]);
        assert!(policy.is_allowed("example.com"));
        assert!(!policy.is_allowed("sub.example.com"));
    }

    #[test]
    fn wildcard_entries_match_subdomains() {
        let policy = AllowBlockPolicy::new(vec!["*.example.com".into()], vec![]);
        assert!(policy.is_allowed("foo.example.com"));
        assert!(policy.is_allowed("example.com"));
        assert!(!policy.is_allowed("notexample.com"));
    }

    #[test]
    fn empty_allow_list_permits_everything() {
        let policy = AllowBlockPolicy::default();
        assert!(policy.is_allowed("anything.test"));
    }
}
