use std::fmt;

use savesync_lib::ids;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Sources,
    Targets,
    Snapshots,
    Jobs,
    Users,
    Settings,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Sources => "sources",
            Collection::Targets => "targets",
            Collection::Snapshots => "snapshots",
            Collection::Jobs => "jobs",
            Collection::Users => "users",
            Collection::Settings => "settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Files,
}

impl Qualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualifier::Files => "files",
        }
    }
}

/// `collection[/id[/qualifier]]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub collection: Collection,
    pub id: Option<i64>,
    pub qualifier: Option<Qualifier>,
}

impl CacheKey {
    pub fn list(collection: Collection) -> Self {
        CacheKey {
            collection,
            id: None,
            qualifier: None,
        }
    }

    pub fn entry(collection: Collection, id: i64) -> Self {
        CacheKey {
            collection,
            id: Some(id),
            qualifier: None,
        }
    }

    pub fn files(id: ids::SnapshotId) -> Self {
        CacheKey {
            collection: Collection::Snapshots,
            id: Some(id),
            qualifier: Some(Qualifier::Files),
        }
    }

    pub fn is_list(&self) -> bool {
        self.id.is_none() && self.qualifier.is_none()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection.as_str())?;

        if let Some(id) = self.id {
            write!(f, "/{}", id)?;
        }

        if let Some(qualifier) = &self.qualifier {
            write!(f, "/{}", qualifier.as_str())?;
        }

        Ok(())
    }
}

/// the set of keys a successful mutation makes stale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dirty {
    List(Collection),
    Entry(Collection, i64),
    Collection(Collection),
    All,
}

impl Dirty {
    pub fn matches(&self, key: &CacheKey) -> bool {
        match self {
            Dirty::List(collection) => key.collection == *collection && key.is_list(),
            Dirty::Entry(collection, id) => {
                key.collection == *collection &&
                    key.id == Some(*id) &&
                    key.qualifier.is_none()
            },
            Dirty::Collection(collection) => key.collection == *collection,
            Dirty::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateSource,
    UpdateSource(ids::SourceId),
    DeleteSource(ids::SourceId),
    RunSource(ids::SourceId),

    CreateTarget,
    UpdateTarget(ids::TargetId),
    DeleteTarget(ids::TargetId),

    RestoreSnapshot(ids::SnapshotId),

    CreateUser,
    SetAdmin(ids::UserId),
    DeleteUser(ids::UserId),

    UpdateSetting,

    Logout,
}

impl Mutation {
    pub fn dirties(&self) -> Vec<Dirty> {
        match *self {
            Mutation::CreateSource => vec![Dirty::List(Collection::Sources)],
            Mutation::UpdateSource(id) |
            Mutation::DeleteSource(id) => vec![
                Dirty::List(Collection::Sources),
                Dirty::Entry(Collection::Sources, id),
            ],
            Mutation::RunSource(_) => vec![
                Dirty::Collection(Collection::Jobs),
                Dirty::Collection(Collection::Snapshots),
            ],
            Mutation::CreateTarget => vec![Dirty::List(Collection::Targets)],
            Mutation::UpdateTarget(id) |
            Mutation::DeleteTarget(id) => vec![
                Dirty::List(Collection::Targets),
                Dirty::Entry(Collection::Targets, id),
            ],
            Mutation::RestoreSnapshot(_) => vec![Dirty::Collection(Collection::Jobs)],
            Mutation::CreateUser |
            Mutation::SetAdmin(_) |
            Mutation::DeleteUser(_) => vec![Dirty::List(Collection::Users)],
            Mutation::UpdateSetting => vec![Dirty::List(Collection::Settings)],
            Mutation::Logout => vec![Dirty::All],
        }
    }
}
