use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A time entry. An entry with no end timestamp is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Option<Vec<String>>,
    #[serde(default)]
    pub billable: bool,
    pub time_interval: TimeInterval,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TimeEntry {
    pub fn is_running(&self) -> bool {
        self.time_interval.end.is_none()
    }

    /// Tag ids, treating a missing list as empty.
    pub fn tags(&self) -> &[String] {
        self.tag_ids.as_deref().unwrap_or(&[])
    }

    /// Elapsed time since the entry started.
    pub fn elapsed(&self) -> time::Duration {
        OffsetDateTime::now_utc() - self.time_interval.start
    }
}

/// Start/end pair of an entry. `end` is absent while the entry is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

/// Payload for starting a new entry. Omitted optional fields are left to the
/// service's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeEntryRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
}

impl CreateTimeEntryRequest {
    pub fn new(start: OffsetDateTime, description: impl Into<String>) -> Self {
        Self {
            start,
            description: description.into(),
            project_id: None,
            task_id: None,
            tag_ids: Vec::new(),
            billable: None,
        }
    }
}

/// Full-update payload for an entry. Stopping an entry is an update carrying
/// its existing fields plus an end timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeEntryRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    pub billable: bool,
}

impl UpdateTimeEntryRequest {
    /// Build the stop update for a running entry: everything kept, end set.
    pub fn stopping(entry: &TimeEntry, end: OffsetDateTime) -> Self {
        Self {
            start: entry.time_interval.start,
            end: Some(end),
            description: entry.description.clone(),
            project_id: entry.project_id.clone(),
            task_id: entry.task_id.clone(),
            tag_ids: entry.tags().to_vec(),
            billable: entry.billable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn entry_without_end_is_running() {
        let json = r#"{
            "id": "e1",
            "description": "standup",
            "projectId": "p1",
            "taskId": null,
            "tagIds": null,
            "billable": true,
            "timeInterval": { "start": "2024-04-02T08:00:00Z", "end": null }
        }"#;
        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert!(entry.is_running());
        assert!(entry.tags().is_empty());
        assert_eq!(entry.time_interval.start, datetime!(2024-04-02 08:00 UTC));
    }

    #[test]
    fn stopping_update_keeps_entry_fields() {
        let entry = TimeEntry {
            id: "e1".to_string(),
            description: "standup".to_string(),
            project_id: Some("p1".to_string()),
            task_id: Some("t1".to_string()),
            tag_ids: Some(vec!["tag1".to_string()]),
            billable: true,
            time_interval: TimeInterval {
                start: datetime!(2024-04-02 08:00 UTC),
                end: None,
            },
            workspace_id: None,
            user_id: None,
        };

        let update = UpdateTimeEntryRequest::stopping(&entry, datetime!(2024-04-02 09:30 UTC));
        assert_eq!(update.start, entry.time_interval.start);
        assert_eq!(update.end, Some(datetime!(2024-04-02 09:30 UTC)));
        assert_eq!(update.project_id.as_deref(), Some("p1"));
        assert_eq!(update.task_id.as_deref(), Some("t1"));
        assert_eq!(update.tag_ids, vec!["tag1".to_string()]);
        assert!(update.billable);
    }
}
