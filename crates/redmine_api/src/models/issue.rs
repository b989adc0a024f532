use serde::de::Deserializer;
use serde::Deserialize;

use crate::models::NamedRef;

/// Extended issue record fetched from `GET /issues/{id}.json`, the fields a
/// daily report cares about. Related records stay optional so an issue with
/// no assignee or a trimmed payload still parses.
#[derive(Debug, Deserialize, Clone)]
pub struct IssueDetail {
    pub id: u64,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub status: Option<NamedRef>,
    #[serde(default)]
    pub priority: Option<NamedRef>,
    #[serde(default)]
    pub tracker: Option<NamedRef>,
    #[serde(default)]
    pub author: Option<NamedRef>,
    #[serde(default)]
    pub assigned_to: Option<NamedRef>,
    #[serde(default, deserialize_with = "deserialize_done_ratio")]
    pub done_ratio: u8,
}

/// Envelope wrapping the single-issue endpoint response.
#[derive(Debug, Deserialize)]
pub struct IssueEnvelope {
    pub issue: IssueDetail,
}

/// Reads `done_ratio` as a percentage clamped to 0..=100. Servers have been
/// seen returning values outside the range after bulk edits.
fn deserialize_done_ratio<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<i64>::deserialize(deserializer)?;
    Ok(value.unwrap_or(0).clamp(0, 100) as u8)
}

#[cfg(test)]
mod tests {
    use super::{IssueDetail, IssueEnvelope};

    #[test]
    fn deserializes_full_issue() {
        let payload = r#"{
            "issue": {
                "id": 42,
                "subject": "Fix login redirect",
                "status": {"id": 3, "name": "Resolved"},
                "priority": {"id": 2, "name": "Normal"},
                "tracker": {"id": 1, "name": "Bug"},
                "author": {"id": 5, "name": "A. Author"},
                "assigned_to": {"id": 6, "name": "B. Assignee"},
                "done_ratio": 100
            }
        }"#;

        let envelope: IssueEnvelope = serde_json::from_str(payload).unwrap();
        let issue = envelope.issue;
        assert_eq!(issue.id, 42);
        assert_eq!(issue.subject.as_deref(), Some("Fix login redirect"));
        assert_eq!(
            issue.status.as_ref().and_then(|status| status.label()),
            Some("Resolved")
        );
        assert_eq!(issue.done_ratio, 100);
    }

    #[test]
    fn done_ratio_is_clamped_and_defaulted() {
        let over: IssueDetail =
            serde_json::from_str(r#"{"id": 1, "done_ratio": 140}"#).unwrap();
        assert_eq!(over.done_ratio, 100);

        let negative: IssueDetail =
            serde_json::from_str(r#"{"id": 2, "done_ratio": -10}"#).unwrap();
        assert_eq!(negative.done_ratio, 0);

        let missing: IssueDetail = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(missing.done_ratio, 0);
        assert!(missing.assigned_to.is_none());
    }
}
