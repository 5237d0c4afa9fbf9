use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub url: Option<String>,
    pub token_file: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}
