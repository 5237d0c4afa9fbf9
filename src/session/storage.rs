use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// persistence for the bearer token between runs
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, token: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        MemoryTokenStore {
            token: Mutex::new(None),
        }
    }

    pub fn with_token<T>(token: T) -> Self
    where
        T: Into<String>
    {
        MemoryTokenStore {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let lock = self.token.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        Ok(lock.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut lock = self.token.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        *lock = Some(token.to_owned());

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut lock = self.token.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        *lock = None;

        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
}

/// json document on disk holding the single `auth_token` key
#[derive(Debug)]
pub struct FileTokenStore {
    path: Box<Path>,
}

impl FileTokenStore {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>
    {
        FileTokenStore {
            path: path.into().into_boxed_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let file = match std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path) {
            Ok(file) => file,
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => return Ok(None),
                _ => return Err(err.into()),
            }
        };
        let reader = std::io::BufReader::new(file);

        let contents: TokenFile = serde_json::from_reader(reader)
            .map_err(Error::storage)?;

        Ok(contents.auth_token.filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = std::io::BufWriter::new(file);

        let contents = TokenFile {
            auth_token: Some(token.to_owned()),
        };

        serde_json::to_writer(&mut writer, &contents)
            .map_err(Error::storage)?;

        std::io::Write::flush(&mut writer)?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => Ok(()),
                _ => Err(err.into()),
            }
        }
    }
}
