//! Task model

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Workflow state of a task. Sent over the wire as its index.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "EnumRepr", into = "u8")]
pub enum TaskStatus {
    #[default]
    Draft,
    Todo,
    InProgress,
    Done,
    Bug,
}

impl TaskStatus {
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Todo,
        Self::InProgress,
        Self::Done,
        Self::Bug,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Bug => "Bug",
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    fn from_name(name: &str) -> Option<Self> {
        // Older servers label the finished state "Completed".
        if squash(name) == "completed" {
            return Some(Self::Done);
        }
        lookup_by_label(&Self::ALL, name, |status| status.label())
    }
}

/// Urgency of a task. Sent over the wire as its index.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "EnumRepr", into = "u8")]
pub enum TaskPriority {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
    Critical,
    Immediate,
}

impl TaskPriority {
    pub const ALL: [Self; 6] = [
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Urgent,
        Self::Critical,
        Self::Immediate,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
            Self::Critical => "Critical",
            Self::Immediate => "Immediate",
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    fn from_name(name: &str) -> Option<Self> {
        lookup_by_label(&Self::ALL, name, |priority| priority.label())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnumRepr {
    Index(u8),
    Name(String),
}

impl From<TaskStatus> for u8 {
    fn from(value: TaskStatus) -> Self {
        value.index()
    }
}

impl From<TaskPriority> for u8 {
    fn from(value: TaskPriority) -> Self {
        value.index()
    }
}

impl TryFrom<EnumRepr> for TaskStatus {
    type Error = String;

    fn try_from(value: EnumRepr) -> Result<Self, Self::Error> {
        match value {
            EnumRepr::Index(index) => Self::ALL
                .get(usize::from(index))
                .copied()
                .ok_or_else(|| format!("unknown task status index {index}")),
            EnumRepr::Name(name) => {
                Self::from_name(&name).ok_or_else(|| format!("unknown task status '{name}'"))
            }
        }
    }
}

impl TryFrom<EnumRepr> for TaskPriority {
    type Error = String;

    fn try_from(value: EnumRepr) -> Result<Self, Self::Error> {
        match value {
            EnumRepr::Index(index) => Self::ALL
                .get(usize::from(index))
                .copied()
                .ok_or_else(|| format!("unknown task priority index {index}")),
            EnumRepr::Name(name) => {
                Self::from_name(&name).ok_or_else(|| format!("unknown task priority '{name}'"))
            }
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u8>() {
            Ok(index) => Self::try_from(EnumRepr::Index(index)),
            Err(_) => Self::try_from(EnumRepr::Name(s.to_string())),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u8>() {
            Ok(index) => Self::try_from(EnumRepr::Index(index)),
            Err(_) => Self::try_from(EnumRepr::Name(s.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn lookup_by_label<T: Copy>(all: &[T], raw: &str, label: impl Fn(T) -> &'static str) -> Option<T> {
    let wanted = squash(raw);
    all.iter().copied().find(|value| squash(label(*value)) == wanted)
}

/// A task record as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(with = "wire_date")]
    pub start_date: NaiveDate,
    #[serde(with = "wire_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub star: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
}

/// Fields for a task that does not exist yet; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(with = "wire_date")]
    pub start_date: NaiveDate,
    #[serde(with = "wire_date")]
    pub end_date: NaiveDate,
    pub star: bool,
    pub is_active: bool,
    pub user_id: String,
}

/// Partial or full replacement of a task's fields. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire_date::serialize_option"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire_date::serialize_option"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl TaskPatch {
    /// Patch that only flips the star flag.
    pub fn star(star: bool) -> Self {
        Self {
            star: Some(star),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Task {
    /// A full replacement patch carrying every field of this task.
    pub fn to_patch(&self) -> TaskPatch {
        TaskPatch {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            status: Some(self.status),
            priority: Some(self.priority),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            star: Some(self.star),
            is_active: Some(self.is_active),
            user_id: Some(self.user_id.clone()),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(text)) => text,
        Some(Id::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

/// Calendar dates travel as `YYYY-MM-DD`; a full timestamp is accepted and
/// truncated to its date part.
pub(crate) mod wire_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn format(date: NaiveDate) -> String {
        date.format(FORMAT).to_string()
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        let date_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*date))
    }

    #[allow(clippy::ref_option)]
    pub fn serialize_option<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn decodes_server_task_with_named_status_and_timestamps() {
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "title": "Buy milk",
            "description": null,
            "status": "In Progress",
            "priority": 2,
            "startDate": "2024-05-01T00:00:00",
            "endDate": "2024-05-03",
            "star": true,
            "isActive": false,
            "userId": "u1"
        }))
        .unwrap();

        assert_eq!(task.description, "");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.start_date, date("2024-05-01"));
        assert!(task.star);
        assert!(!task.is_active);
    }

    #[test]
    fn numeric_ids_are_kept_as_strings() {
        let task: Task = serde_json::from_value(json!({
            "id": 42,
            "title": "Numbered",
            "startDate": "2024-05-01",
            "endDate": "2024-05-01",
            "userId": 7
        }))
        .unwrap();
        assert_eq!(task.id, "42");
        assert_eq!(task.user_id, "7");
        assert!(task.is_active);
        assert_eq!(task.status, TaskStatus::Draft);
    }

    #[test]
    fn enums_serialize_as_indices() {
        assert_eq!(serde_json::to_value(TaskStatus::Bug).unwrap(), json!(4));
        assert_eq!(serde_json::to_value(TaskPriority::Immediate).unwrap(), json!(5));
        assert!(serde_json::from_value::<TaskPriority>(json!(6)).is_err());
    }

    #[test]
    fn status_names_parse_loosely() {
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("Completed".parse::<TaskStatus>(), Ok(TaskStatus::Done));
        assert_eq!("3".parse::<TaskPriority>(), Ok(TaskPriority::Urgent));
        assert!("someday".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn patch_skips_unset_fields() {
        let patch = TaskPatch {
            title: Some("Renamed".to_string()),
            end_date: Some(date("2024-06-01")),
            ..TaskPatch::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "title": "Renamed", "endDate": "2024-06-01" })
        );
        assert!(TaskPatch::default().is_empty());
        assert_eq!(
            serde_json::to_value(TaskPatch::star(true)).unwrap(),
            json!({ "star": true })
        );
    }
}
