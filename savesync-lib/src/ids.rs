pub type UserId = i64;
pub type SourceId = i64;
pub type TargetId = i64;
pub type ScheduleId = i64;
pub type SnapshotId = i64;
pub type JobId = i64;
