use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
}

/// server side directory browser used when picking a source path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    pub current_path: String,
    #[serde(default, deserialize_with = "crate::serde::null_as_default")]
    pub entries: Vec<DirEntry>,
}

impl DirectoryListing {
    pub fn directories(&self) -> impl Iterator<Item = &DirEntry> {
        self.entries.iter().filter(|e| e.is_dir)
    }

    /// parent of the current path, `None` when already at the root
    pub fn parent_path(&self) -> Option<String> {
        let trimmed = self.current_path.trim_end_matches('/');

        if trimmed.is_empty() {
            return None;
        }

        match trimmed.rfind('/') {
            Some(0) => Some(String::from("/")),
            Some(index) => Some(trimmed[..index].to_owned()),
            None => None,
        }
    }
}
