//! Priority rule data models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a priority rule, unique within a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    /// Creates a rule identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for RuleId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// One priority bucket: a named, ordered container of keyword tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRule {
    /// Stable identifier.
    pub id: RuleId,
    /// Display label (not used for equality of ids).
    pub name: String,
    /// Keyword tokens, case preserved, no duplicates.
    keywords: Vec<String>,
    /// Presentation tag, opaque to logic.
    pub color: String,
}

impl PriorityRule {
    /// Creates an empty rule.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: RuleId::new(id),
            name: name.into(),
            keywords: Vec::new(),
            color: color.into(),
        }
    }

    /// Sets the initial keywords. Blank and repeated tokens are dropped.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if !keyword.is_empty() {
                self.push_unique(keyword);
            }
        }
        self
    }

    /// Keyword tokens in display order.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns true if this rule holds exactly `token`.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.keywords.iter().any(|k| k == token)
    }

    /// Returns true if any keyword occurs in `text`, ignoring case.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords
            .iter()
            .any(|k| text.contains(&k.to_lowercase()))
    }

    pub(crate) fn push_unique(&mut self, token: &str) -> bool {
        if self.contains(token) {
            return false;
        }
        self.keywords.push(token.to_string());
        true
    }

    pub(crate) fn remove(&mut self, token: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != token);
        self.keywords.len() != before
    }
}

/// Ordered collection of priority buckets. First bucket = highest priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PriorityRule>", into = "Vec<PriorityRule>")]
pub struct RuleSet {
    rules: Vec<PriorityRule>,
}

impl RuleSet {
    /// Creates a rule set.
    ///
    /// Later rules reusing an earlier id are dropped, and each rule's
    /// keywords are cleaned of blanks and repeats.
    #[must_use]
    pub fn new(rules: Vec<PriorityRule>) -> Self {
        let mut unique: Vec<PriorityRule> = Vec::with_capacity(rules.len());
        for mut rule in rules {
            if unique.iter().any(|r| r.id == rule.id) {
                tracing::debug!(id = %rule.id, "Dropping rule with duplicate id");
                continue;
            }
            let keywords = std::mem::take(&mut rule.keywords);
            unique.push(rule.with_keywords(keywords));
        }
        Self { rules: unique }
    }

    /// The fixed seed rule set every new profile starts from.
    #[must_use]
    pub fn seed() -> Self {
        Self::new(vec![
            PriorityRule::new("special_care", "Special Care", "bg-fuchsia-500"),
            PriorityRule::new("critical", "Critical", "bg-red-500")
                .with_keywords(["Deadline", "Exam", "Grade", "Interview", "Offer"]),
            PriorityRule::new("major", "Major", "bg-blue-500")
                .with_keywords(["Assignment", "Seminar", "Society", "Payment"]),
            PriorityRule::new("general", "General", "bg-zinc-500")
                .with_keywords(["Newsletter", "Library", "Announcement"]),
        ])
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PriorityRule> {
        self.rules.iter().find(|r| r.id == *id)
    }

    /// Iterates over rules in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, PriorityRule> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &RuleId> {
        self.rules.iter().map(|r| &r.id)
    }

    /// Total number of keyword tokens across all rules.
    #[must_use]
    pub fn total_keywords(&self) -> usize {
        self.rules.iter().map(|r| r.keywords.len()).sum()
    }

    /// The first rule holding `token`, if any.
    #[must_use]
    pub fn rule_containing(&self, token: &str) -> Option<&PriorityRule> {
        self.rules.iter().find(|r| r.contains(token))
    }

    /// The highest-priority rule with a keyword occurring in `text`.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<&PriorityRule> {
        self.rules.iter().find(|r| r.matches(text))
    }

    /// Removes `token` from the rule. No-op if the rule or token is absent.
    pub fn remove_keyword(&mut self, rule_id: &str, token: &str) -> bool {
        self.rule_mut(rule_id).is_some_and(|rule| rule.remove(token))
    }

    /// Appends `token` (trimmed) to the rule.
    ///
    /// Blank input, a token already in that rule, or an unknown rule id is
    /// silently ignored.
    pub fn add_keyword(&mut self, rule_id: &str, token: &str) -> bool {
        let token = token.trim();
        if token.is_empty() {
            return false;
        }
        self.rule_mut(rule_id)
            .is_some_and(|rule| rule.push_unique(token))
    }

    /// Moves `token` from `source` to the end of `target`.
    ///
    /// All-or-nothing: nothing changes when the buckets are the same, either
    /// bucket is unknown, the source does not hold the token, or the target
    /// already does.
    pub fn move_keyword(&mut self, source: &str, target: &str, token: &str) -> bool {
        if source == target {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(source), self.position(target)) else {
            return false;
        };
        if !self.rules[from].contains(token) || self.rules[to].contains(token) {
            return false;
        }
        self.rules[from].remove(token);
        self.rules[to].keywords.push(token.to_string());
        true
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.id == *id)
    }

    fn rule_mut(&mut self, id: &str) -> Option<&mut PriorityRule> {
        self.rules.iter_mut().find(|r| r.id == *id)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::seed()
    }
}

impl From<Vec<PriorityRule>> for RuleSet {
    fn from(rules: Vec<PriorityRule>) -> Self {
        Self::new(rules)
    }
}

impl From<RuleSet> for Vec<PriorityRule> {
    fn from(set: RuleSet) -> Self {
        set.rules
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a PriorityRule;
    type IntoIter = std::slice::Iter<'a, PriorityRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keywords(set: &RuleSet, id: &str) -> Vec<String> {
        set.get(id).unwrap().keywords().to_vec()
    }

    #[test]
    fn test_seed_order_and_contents() {
        let seed = RuleSet::seed();
        let ids: Vec<&str> = seed.ids().map(RuleId::as_str).collect();
        assert_eq!(ids, ["special_care", "critical", "major", "general"]);
        assert!(seed.get("special_care").unwrap().keywords().is_empty());
        assert_eq!(
            keywords(&seed, "critical"),
            ["Deadline", "Exam", "Grade", "Interview", "Offer"]
        );
        assert_eq!(seed.total_keywords(), 12);
    }

    #[test]
    fn test_add_keyword_trims_and_appends() {
        let mut set = RuleSet::seed();
        assert!(set.add_keyword("special_care", "  Mom  "));
        assert_eq!(keywords(&set, "special_care"), ["Mom"]);
    }

    #[test]
    fn test_add_keyword_rejects_blank() {
        let mut set = RuleSet::seed();
        assert!(!set.add_keyword("critical", ""));
        assert!(!set.add_keyword("critical", "   "));
        assert_eq!(set, RuleSet::seed());
    }

    #[test]
    fn test_add_keyword_twice_keeps_one() {
        let mut set = RuleSet::seed();
        assert!(set.add_keyword("major", "Lab"));
        assert!(!set.add_keyword("major", "Lab"));
        let count = set
            .get("major")
            .unwrap()
            .keywords()
            .iter()
            .filter(|k| *k == "Lab")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_add_keyword_is_case_preserving() {
        let mut set = RuleSet::seed();
        assert!(set.add_keyword("critical", "exam"));
        assert!(set.get("critical").unwrap().contains("Exam"));
        assert!(set.get("critical").unwrap().contains("exam"));
    }

    #[test]
    fn test_add_keyword_unknown_rule() {
        let mut set = RuleSet::seed();
        assert!(!set.add_keyword("nope", "Thing"));
        assert_eq!(set, RuleSet::seed());
    }

    #[test]
    fn test_remove_keyword() {
        let mut set = RuleSet::seed();
        assert!(set.remove_keyword("general", "Library"));
        assert_eq!(keywords(&set, "general"), ["Newsletter", "Announcement"]);
        assert!(!set.remove_keyword("general", "Library"));
        assert!(!set.remove_keyword("missing", "Exam"));
    }

    #[test]
    fn test_move_keyword() {
        let mut set = RuleSet::seed();
        assert!(set.move_keyword("major", "critical", "Seminar"));
        assert!(!set.get("major").unwrap().contains("Seminar"));
        assert_eq!(keywords(&set, "critical").last().unwrap(), "Seminar");
        assert_eq!(set.total_keywords(), 12);
    }

    #[test]
    fn test_move_keyword_same_rule_is_noop() {
        let mut set = RuleSet::seed();
        assert!(!set.move_keyword("critical", "critical", "Exam"));
        assert_eq!(set, RuleSet::seed());
    }

    #[test]
    fn test_move_keyword_duplicate_in_target_is_atomic() {
        let mut set = RuleSet::seed();
        set.add_keyword("major", "Exam");
        let before = set.clone();
        assert!(!set.move_keyword("critical", "major", "Exam"));
        assert_eq!(set, before);
    }

    #[test]
    fn test_move_keyword_missing_token_or_rule() {
        let mut set = RuleSet::seed();
        assert!(!set.move_keyword("critical", "major", "Nonexistent"));
        assert!(!set.move_keyword("critical", "nowhere", "Exam"));
        assert!(!set.move_keyword("nowhere", "critical", "Exam"));
        assert_eq!(set, RuleSet::seed());
    }

    #[test]
    fn test_duplicate_ids_dropped() {
        let set = RuleSet::new(vec![
            PriorityRule::new("a", "First", "red"),
            PriorityRule::new("a", "Second", "blue"),
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").unwrap().name, "First");
    }

    #[test]
    fn test_deserialize_cleans_keywords() {
        let json = r#"[{"id":"a","name":"A","keywords":["x"," ","x","y"],"color":"c"}]"#;
        let set: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(keywords(&set, "a"), ["x", "y"]);
    }

    #[test]
    fn test_classify_uses_priority_order() {
        let set = RuleSet::seed();
        let rule = set.classify("Exam payment reminder").unwrap();
        assert_eq!(rule.id.as_str(), "critical");
        assert_eq!(
            set.classify("weekly NEWSLETTER").unwrap().id.as_str(),
            "general"
        );
        assert!(set.classify("hello there").is_none());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(RuleSet::seed()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[1]["id"], "critical");
        assert_eq!(json[1]["keywords"][0], "Deadline");
        let back: RuleSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, RuleSet::seed());
    }
}
