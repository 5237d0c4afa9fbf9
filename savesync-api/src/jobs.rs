use savesync_lib::ids;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use strum::{AsRefStr as StrumAsRefStr, EnumString};

use crate::Status;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    StrumAsRefStr, EnumString,
    Serialize, Deserialize
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobType {
    Backup,
    Restore,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: ids::JobId,
    #[serde(rename = "type")]
    pub type_: JobType,
    #[serde(default)]
    pub source_id: Option<ids::SourceId>,
    #[serde(default)]
    pub snapshot_id: Option<ids::SnapshotId>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|ended| ended - self.started_at)
    }
}
