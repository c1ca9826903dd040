//! Query field validation
//!
//! Validators are plain values built once at startup and shared read-only
//! with the dispatcher.

use super::{QUERY_ACTIONS, QUERY_RESOURCES, REQUEST_MAX_LEN};

/// A single check applied to a string field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// ASCII letters and digits, plus the `-`, `_` and `.` separators
    AlphaNum,
    /// At most this many bytes
    MaxLen(usize),
    /// Exact member of a fixed list
    InList(&'static [&'static str]),
}

impl Rule {
    fn check(&self, value: &str) -> bool {
        match self {
            Rule::AlphaNum => {
                !value.is_empty()
                    && value
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            }
            Rule::MaxLen(max) => value.len() <= *max,
            Rule::InList(list) => list.contains(&value),
        }
    }
}

/// An ordered set of rules that must all pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha_num(mut self) -> Self {
        self.rules.push(Rule::AlphaNum);
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.rules.push(Rule::MaxLen(max));
        self
    }

    pub fn in_list(mut self, list: &'static [&'static str]) -> Self {
        self.rules.push(Rule::InList(list));
        self
    }

    /// True if every rule accepts the value. An empty chain accepts nothing.
    pub fn validate(&self, value: &str) -> bool {
        !self.rules.is_empty() && self.rules.iter().all(|rule| rule.check(value))
    }
}

/// The three checks applied to inbound queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    /// Charset plus [`REQUEST_MAX_LEN`]; used for project, location, cluster and target
    pub check_len: RuleChain,
    /// Charset plus membership in [`QUERY_RESOURCES`]
    pub check_resource: RuleChain,
    /// Charset plus membership in [`QUERY_ACTIONS`]
    pub check_action: RuleChain,
}

impl Validators {
    pub fn new() -> Self {
        Self {
            check_len: RuleChain::new().alpha_num().max_len(REQUEST_MAX_LEN),
            check_resource: RuleChain::new().alpha_num().in_list(QUERY_RESOURCES),
            check_action: RuleChain::new().alpha_num().in_list(QUERY_ACTIONS),
        }
    }
}

impl Default for Validators {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len_accepts_gcp_identifiers() {
        let v = Validators::new();
        assert!(v.check_len.validate("my-project-123"));
        assert!(v.check_len.validate("us-central1-a"));
        assert!(v.check_len.validate("instances.list"));
        assert!(v.check_len.validate("gke_cluster_1"));
    }

    #[test]
    fn test_check_len_rejects_empty_and_long() {
        let v = Validators::new();
        assert!(!v.check_len.validate(""));
        assert!(v.check_len.validate(&"a".repeat(REQUEST_MAX_LEN)));
        assert!(!v.check_len.validate(&"a".repeat(REQUEST_MAX_LEN + 1)));
    }

    #[test]
    fn test_check_len_rejects_bad_charset() {
        let v = Validators::new();
        assert!(!v.check_len.validate("projects/other"));
        assert!(!v.check_len.validate("a b"));
        assert!(!v.check_len.validate("<script>"));
        assert!(!v.check_len.validate("zone?x=1"));
    }

    #[test]
    fn test_check_resource() {
        let v = Validators::new();
        for resource in QUERY_RESOURCES {
            assert!(v.check_resource.validate(resource));
        }
        assert!(!v.check_resource.validate("storage"));
        assert!(!v.check_resource.validate("GKE"));
        assert!(!v.check_resource.validate(""));
    }

    #[test]
    fn test_check_action() {
        let v = Validators::new();
        assert!(v.check_action.validate("get"));
        assert!(v.check_action.validate("ping"));
        assert!(!v.check_action.validate("delete"));
    }

    #[test]
    fn test_empty_chain_accepts_nothing() {
        assert!(!RuleChain::new().validate("anything"));
    }
}
