use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Envelope returned by the direct inbox endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct InboxResponse {
    pub inbox: Inbox,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inbox {
    #[serde(default)]
    pub threads: Vec<DirectThread>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectThread {
    #[serde(rename = "thread_id")]
    pub id: String,
    #[serde(rename = "thread_title", default)]
    pub title: Option<String>,
    #[serde(default)]
    pub users: Vec<ThreadUser>,
    /// Microseconds since the Unix epoch
    #[serde(default)]
    pub last_activity_at: Option<i64>,
    #[serde(default)]
    pub is_group: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadUser {
    #[serde(deserialize_with = "string_or_number")]
    pub pk: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// User ids come back as numbers from some endpoints and strings from others
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}

impl DirectThread {
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity_at
            .and_then(DateTime::<Utc>::from_timestamp_micros)
    }

    /// Title if the thread has one, otherwise the participants' usernames.
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.participants(),
        }
    }

    pub fn participants(&self) -> String {
        self.users
            .iter()
            .map(|u| u.username.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DirectThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.display_title())?;
        if !self.users.is_empty() {
            write!(f, " ({} participants: {})", self.users.len(), self.participants())?;
        }
        if let Some(at) = self.last_activity() {
            write!(f, " - last activity {}", at.format("%Y-%m-%d %H:%M UTC"))?;
        }
        Ok(())
    }
}
