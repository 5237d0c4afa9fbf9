use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ArgMatches;
use savesync::api::client::{ApiClientBuilder, DEFAULT_URL};
use url::Url;

use crate::cli::error::{self, Context};

mod shape;

pub const DEFAULT_TOKEN_FILE: &str = "savesync_token.json";

#[derive(Debug)]
pub struct Settings {
    pub url: Url,
    pub token_file: PathBuf,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

impl Settings {
    fn with_cwd(cwd: &Path) -> error::Result<Self> {
        Ok(Settings {
            url: Url::parse(DEFAULT_URL)?,
            token_file: cwd.join(DEFAULT_TOKEN_FILE),
            user_agent: None,
            timeout: None,
        })
    }

    /// defaults, then each `--config` file in order, then flags
    pub fn from_matches(matches: &ArgMatches) -> error::Result<Self> {
        let cwd = std::env::current_dir()
            .context("failed to retrieve cwd for settings")?;
        let mut settings = Self::with_cwd(&cwd)?;

        if let Some(paths) = matches.get_many::<PathBuf>("config") {
            for config_path in paths {
                let full = if config_path.is_absolute() {
                    config_path.clone()
                } else {
                    cwd.join(config_path)
                };

                tracing::debug!("loading config file \"{}\"", full.display());

                let loaded = Self::load_file(&full)?;
                let parent = full.parent().context(format!(
                    "failed to retrieve parent path from config file \"{}\"", full.display()
                ))?;

                settings.merge(parent, loaded)?;
            }
        }

        if let Some(url) = matches.get_one::<String>("url") {
            settings.url = Url::parse(url)
                .context(format!("invalid server url \"{}\"", url))?;
        }

        if let Some(token_file) = matches.get_one::<PathBuf>("token-file") {
            settings.token_file = if token_file.is_absolute() {
                token_file.clone()
            } else {
                cwd.join(token_file)
            };
        }

        tracing::debug!("{settings:#?}");

        Ok(settings)
    }

    fn merge(&mut self, parent: &Path, loaded: shape::Settings) -> error::Result<()> {
        if let Some(url) = loaded.url {
            self.url = Url::parse(&url)
                .context(format!("invalid server url \"{}\"", url))?;
        }

        if let Some(token_file) = loaded.token_file {
            self.token_file = if token_file.is_absolute() {
                token_file
            } else {
                parent.join(token_file)
            };
        }

        if let Some(user_agent) = loaded.user_agent {
            self.user_agent = Some(user_agent);
        }

        if let Some(secs) = loaded.timeout_secs {
            if secs == 0 {
                return Err(error::Error::new().context(
                    "timeout_secs must be greater than 0"
                ));
            }

            self.timeout = Some(Duration::from_secs(secs));
        }

        Ok(())
    }

    fn load_file(path: &Path) -> error::Result<shape::Settings> {
        let ext = path.extension().context(format!(
            "failed to retrieve the file extension for config file: \"{}\"", path.display()
        ))?;

        let ext = ext.to_ascii_lowercase();
        let file = std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .context(format!("failed to open config file: \"{}\"", path.display()))?;
        let reader = std::io::BufReader::new(file);

        if ext.eq("yaml") || ext.eq("yml") {
            serde_yaml::from_reader(reader).context(format!(
                "failed to parse yaml config file: \"{}\"", path.display()
            ))
        } else if ext.eq("json") {
            serde_json::from_reader(reader).context(format!(
                "failed to parse json config file: \"{}\"", path.display()
            ))
        } else {
            Err(error::Error::new().context(format!(
                "unknown type of config file: \"{}\"", path.display()
            )))
        }
    }

    pub fn client_builder(&self) -> ApiClientBuilder {
        let mut builder = ApiClientBuilder::default();
        builder.url(self.url.clone());

        if let Some(user_agent) = &self.user_agent {
            builder.user_agent(user_agent.clone());
        }

        if let Some(timeout) = self.timeout {
            builder.timeout(timeout);
        }

        builder
    }
}
