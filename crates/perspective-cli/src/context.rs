//! Paths and connection settings shared by every command

use std::path::PathBuf;
use std::time::Duration;

use perspective_client::{ClientSettings, HttpClient};
use perspective_core::StateFile;
use perspective_schema::PerspectiveConfig;

use crate::cli::{Cli, ConnectionArgs};
use crate::error::{CliError, Result};

#[derive(Debug, Clone)]
pub struct Context {
    pub config_path: PathBuf,
    pub state_path: PathBuf,
    pub connection: ConnectionArgs,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            config_path: cli.config.clone(),
            state_path: cli.state.clone(),
            connection: cli.connection.clone(),
        }
    }

    /// Declared configuration with ref ids seeded from the state by position
    pub fn load_declared(&self, state: &StateFile) -> Result<PerspectiveConfig> {
        let mut config = PerspectiveConfig::load(&self.config_path)?;
        state.seed_ref_ids(&mut config.groups);
        Ok(config)
    }

    pub fn load_state(&self) -> Result<StateFile> {
        Ok(StateFile::load_or_default(&self.state_path)?)
    }

    pub fn save_state(&self, state: &StateFile) -> Result<()> {
        Ok(state.save(&self.state_path)?)
    }

    /// The recorded remote id, or a hint on how to get one
    pub fn require_id(&self, state: &StateFile) -> Result<String> {
        state.perspective_id.clone().ok_or_else(|| {
            CliError::user(format!(
                "No perspective recorded in {}. Run 'perspective apply' or 'perspective import <id>' first.",
                self.state_path.display()
            ))
        })
    }

    /// HTTP client for the configured endpoint
    pub fn client(&self) -> Result<HttpClient> {
        let api_key = self.connection.api_key.clone().ok_or_else(|| {
            CliError::user("No API key. Pass --api-key or set CLOUDHEALTH_API_KEY.")
        })?;

        let settings = ClientSettings::new(api_key)
            .with_endpoint(&self.connection.url)
            .with_timeout(Duration::from_secs(self.connection.timeout));
        Ok(HttpClient::new(settings)?)
    }
}
