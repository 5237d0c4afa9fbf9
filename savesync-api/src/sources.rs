use savesync_lib::ids;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::{Validator, FieldErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: ids::SourceId,
    pub name: String,
    pub path: String,
    #[serde(default, deserialize_with = "crate::serde::null_as_default")]
    pub exclusions: Vec<String>,
    pub target_id: Option<ids::TargetId>,
    #[serde(default)]
    pub schedule_id: Option<ids::ScheduleId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSource {
    pub name: String,
    pub path: String,
    pub exclusions: Vec<String>,
    pub target_id: Option<ids::TargetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<ids::ScheduleId>,
}

/// updates replace the whole record, same shape as a create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSource {
    pub name: String,
    pub path: String,
    pub exclusions: Vec<String>,
    pub target_id: Option<ids::TargetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<ids::ScheduleId>,
}

fn validate_fields(name: &str, path: &str, exclusions: &[String]) -> Result<(), FieldErrors> {
    let mut invalid = FieldErrors::new();

    if name.is_empty() {
        invalid.missing("name");
    } else if !savesync_lib::validation::name_valid(name) {
        invalid.invalid("name");
    }

    if path.is_empty() {
        invalid.missing("path");
    } else if !savesync_lib::validation::path_valid(path) {
        invalid.invalid("path");
    }

    if !exclusions.iter().all(savesync_lib::validation::glob_valid) {
        invalid.invalid("exclusions");
    }

    invalid.into_result()
}

impl Validator for CreateSource {
    fn validate(&self) -> Result<(), FieldErrors> {
        validate_fields(&self.name, &self.path, &self.exclusions)
    }
}

impl Validator for UpdateSource {
    fn validate(&self) -> Result<(), FieldErrors> {
        validate_fields(&self.name, &self.path, &self.exclusions)
    }
}

impl From<&Source> for UpdateSource {
    fn from(source: &Source) -> Self {
        UpdateSource {
            name: source.name.clone(),
            path: source.path.clone(),
            exclusions: source.exclusions.clone(),
            target_id: source.target_id,
            schedule_id: source.schedule_id,
        }
    }
}

/// returned when a backup is triggered for a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupStarted {
    pub job_id: ids::JobId,
    pub status: String,
}
