use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::week::WeekKey;

/// A story URL suggested by the team for a given week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub url: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub submitted_by: String,
    #[serde(default)]
    pub timestamp: String,
}

impl Submission {
    pub fn new(url: impl Into<String>, note: impl Into<String>, submitted_by: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            note: note.into(),
            submitted_by: submitted_by.into(),
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }
}

/// Generated content for one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    pub title: String,
    pub emoji: String,
    pub content: String,
}

/// Complete briefing for one week, as cached on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Briefing {
    pub week_key: WeekKey,
    pub date_range: String,
    pub generated_at: String,
    pub sections: BTreeMap<String, SectionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top3: Option<String>,
}

impl Briefing {
    pub fn new(week_key: WeekKey) -> Self {
        Self {
            week_key,
            date_range: week_key.display_range(),
            generated_at: chrono::Local::now().to_rfc3339(),
            sections: BTreeMap::new(),
            top3: None,
        }
    }

    /// `generated_at` as "YYYY-MM-DD HH:MM"
    pub fn generated_display(&self) -> String {
        short_timestamp(&self.generated_at)
    }

    /// Highlights block, if one was generated and is not blank
    pub fn highlights(&self) -> Option<&str> {
        self.top3.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// First 16 characters of an ISO timestamp with the `T` separator replaced.
pub fn short_timestamp(timestamp: &str) -> String {
    timestamp.chars().take(16).collect::<String>().replace('T', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_timestamp() {
        assert_eq!(short_timestamp("2026-02-09T14:30:12.123+01:00"), "2026-02-09 14:30");
        assert_eq!(short_timestamp("2026-02-09"), "2026-02-09");
    }

    #[test]
    fn test_new_briefing_uses_week_range() {
        let week: WeekKey = "2026-W06".parse().unwrap();
        let briefing = Briefing::new(week);
        assert_eq!(briefing.date_range, "Feb 2, 2026 — Feb 8, 2026");
        assert!(briefing.sections.is_empty());
        assert!(briefing.highlights().is_none());
    }

    #[test]
    fn test_briefing_without_top3_still_loads() {
        let json = r#"{
            "week_key": "2026-W06",
            "date_range": "Feb 2, 2026 — Feb 8, 2026",
            "generated_at": "2026-02-09T10:00:00",
            "sections": {
                "deals_capital": {"title": "Deals & Capital", "emoji": "💰", "content": "- **A** b"}
            }
        }"#;

        let briefing: Briefing = serde_json::from_str(json).unwrap();
        assert_eq!(briefing.top3, None);
        assert_eq!(briefing.sections["deals_capital"].content, "- **A** b");
        assert_eq!(briefing.generated_display(), "2026-02-09 10:00");
    }

    #[test]
    fn test_submission_defaults_optional_fields() {
        let sub: Submission = serde_json::from_str(r#"{"url": "https://a.test"}"#).unwrap();
        assert_eq!(sub.note, "");
        assert_eq!(sub.submitted_by, "");
    }

    #[test]
    fn test_new_submission_is_timestamped() {
        let sub = Submission::new("https://a.test", "", "");
        assert!(!sub.timestamp.is_empty());
    }
}
