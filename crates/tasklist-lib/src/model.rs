//! Core data types for tasklist-lib.
//!
//! Field names follow the on-disk format of existing `tasks.json` files, so the
//! owner is persisted as `user_id` and timestamps as snake_case keys.
//! Timestamps are written as local time with an explicit offset and
//! microsecond precision (`2024-03-01T09:30:00.000000+01:00`).

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TaskError;

/// Task priority.
///
/// Persisted as `"Low"`, `"Medium"` or `"High"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Sort weight: High=3, Medium=2, Low=1.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(TaskError::InvalidPriority {
                priority: other.to_string(),
            }),
        }
    }
}

/// Partition key derived from a self-asserted email address.
///
/// Not a credential: two people entering the same email share a task list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Derive the identity key from an email address.
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        Self(crate::util::identity_from_email(email))
    }

    /// Wrap an already derived key, e.g. one read back from the data file.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single to-do item owned by one identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Per-identity sequence number.
    pub id: u64,

    /// Owning identity.
    #[serde(rename = "user_id")]
    pub owner: Identity,

    /// Title, trimmed and non-empty.
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub completed: bool,

    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: DateTime<Utc>,

    /// Set iff `completed` is true.
    #[serde(
        default,
        serialize_with = "serialize_optional_timestamp",
        deserialize_with = "deserialize_optional_timestamp"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build a new, incomplete task stamped with `created_at`.
    #[must_use]
    pub fn new(
        id: u64,
        owner: Identity,
        title: &str,
        description: &str,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            priority,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(at);
    }

    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}

/// The signed-in user as entered on the login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub identity: Identity,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

fn format_stored(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn serialize_timestamp<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_stored(at))
}

#[allow(clippy::ref_option)]
fn serialize_optional_timestamp<S>(
    at: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match at {
        Some(at) => serializer.serialize_str(&format_stored(at)),
        None => serializer.serialize_none(),
    }
}

/// Parse RFC 3339, falling back to naive ISO-8601 read as local time.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = raw.parse::<NaiveDateTime>().ok()?;
    // A wall-clock time skipped by a DST change has no local instant.
    Some(
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map_or_else(|| naive.and_utc(), |local| local.with_timezone(&Utc)),
    )
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" Medium ".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("LOW".parse::<Priority>().unwrap(), Priority::Low);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(TaskError::InvalidPriority { .. })
        ));
    }

    #[test]
    fn test_priority_rank_orders_high_first() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_task_serializes_with_legacy_field_names() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let task = Task::new(
            1,
            Identity::new("alice_example_com"),
            "  Buy milk ",
            "",
            Priority::Low,
            created,
        );
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["user_id"], "alice_example_com");
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["priority"], "Low");
        assert_eq!(json["completed"], false);
        assert!(json["completed_at"].is_null());

        let stored = json["created_at"].as_str().unwrap();
        assert!(!stored.ends_with('Z'), "{stored}");
        assert!(stored.contains(".000000"), "{stored}");
        assert_eq!(DateTime::parse_from_rfc3339(stored).unwrap(), created);
    }

    #[test]
    fn test_task_timestamps_roundtrip() {
        let mut task = Task::new(3, Identity::new("a"), "x", "", Priority::High, Utc::now());
        task.complete(Utc::now());
        let back: Task = serde_json::from_str(&serde_json::to_string(&task).unwrap()).unwrap();
        assert_eq!(back.created_at.timestamp_micros(), task.created_at.timestamp_micros());
        assert_eq!(
            back.completed_at.map(|t| t.timestamp_micros()),
            task.completed_at.map(|t| t.timestamp_micros())
        );
    }

    #[test]
    fn test_task_reads_naive_timestamps() {
        let raw = r#"{
            "id": 2,
            "user_id": "bob_example_com",
            "title": "Old task",
            "description": "from an older file",
            "priority": "High",
            "completed": true,
            "created_at": "2024-01-05T10:20:30.123456",
            "completed_at": "2024-01-06T08:00:00"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.owner.as_str(), "bob_example_com");
        assert_eq!(task.priority, Priority::High);
        // naive values are local wall-clock times
        assert_eq!(
            task.completed_at,
            Some(Local.with_ymd_and_hms(2024, 1, 6, 8, 0, 0).unwrap().with_timezone(&Utc))
        );
    }

    #[test]
    fn test_complete_and_reopen_keep_completed_at_in_sync() {
        let now = Utc::now();
        let mut task = Task::new(1, Identity::new("a"), "x", "", Priority::Medium, now);
        task.complete(now);
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(now));
        task.reopen();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }
}
