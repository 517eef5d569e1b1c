use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One issue exactly as the GitHub search API returned it.
///
/// The raw value is what gets served and cached. Accessors read the fields the
/// service cares about without requiring them to be present or well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueRecord(Value);

impl IssueRecord {
    #[must_use]
    pub const fn new(raw: Value) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    fn str_field(&self, name: &str) -> &str {
        self.0.get(name).and_then(Value::as_str).unwrap_or("")
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.str_field("title")
    }

    /// Body text, empty when the issue has none.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.str_field("body")
    }

    #[must_use]
    pub fn state(&self) -> &str {
        self.str_field("state")
    }

    #[must_use]
    pub fn html_url(&self) -> &str {
        self.str_field("html_url")
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().eq_ignore_ascii_case("open")
    }

    /// Issue number, when the upstream provided one.
    #[must_use]
    pub fn number(&self) -> Option<u64> {
        self.0.get("number").and_then(Value::as_u64)
    }

    #[must_use]
    pub fn user(&self) -> Option<IssueUser> {
        self.0
            .get("user")
            .and_then(|u| IssueUser::deserialize(u).ok())
    }

    #[must_use]
    pub fn author_login(&self) -> Option<&str> {
        self.0
            .get("user")
            .and_then(|u| u.get("login"))
            .and_then(Value::as_str)
    }

    /// Labels that could be read; malformed entries are left out.
    #[must_use]
    pub fn labels(&self) -> Vec<IssueLabel> {
        self.0
            .get("labels")
            .and_then(Value::as_array)
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(|l| IssueLabel::deserialize(l).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn label_names(&self) -> Vec<String> {
        self.labels().into_iter().map(|l| l.name).collect()
    }
}

impl From<Value> for IssueRecord {
    fn from(raw: Value) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IssueUser {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IssueLabel {
    pub id: u64,
    pub name: String,
    pub color: String,
}

/// Response body of `GET /search/issues`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<IssueRecord>,
}

impl SearchResult {
    #[must_use]
    pub fn from_items(items: Vec<IssueRecord>) -> Self {
        Self {
            total_count: u64::try_from(items.len()).unwrap_or(u64::MAX),
            incomplete_results: false,
            items,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
