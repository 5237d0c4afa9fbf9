use savesync_lib::ids;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::Status;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: ids::SnapshotId,
    pub source_id: ids::SourceId,
    pub target_id: ids::TargetId,
    pub status: Status,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub total_bytes: u64,
    #[serde(default)]
    pub delta_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// the backend only writes a manifest once the snapshot has started
    pub fn manifest_available(&self) -> bool {
        self.status != Status::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn children(&self) -> &[FileNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// a directory with at least one child
    pub fn is_expandable(&self) -> bool {
        self.is_dir && !self.children().is_empty()
    }

    /// files carry a size and never children, checked for the whole tree
    pub fn is_well_formed(&self) -> bool {
        if self.is_dir {
            self.children().iter().all(FileNode::is_well_formed)
        } else {
            self.children.is_none() && self.size.is_some()
        }
    }

    pub fn total_size(&self) -> u64 {
        if self.is_dir {
            self.children().iter().map(FileNode::total_size).sum()
        } else {
            self.size.unwrap_or(0)
        }
    }
}
