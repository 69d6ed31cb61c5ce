//! Configuration management
//!
//! Everything comes from the environment. A missing variable degrades the
//! feature it backs (no replies, no tasks, no model, no log) instead of
//! refusing to start: the front desk keeps answering with whatever is left.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::{Error, Result};

/// Default chat model id
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory (SQLite database)
    pub data_dir: PathBuf,

    /// Z-API credentials; `None` disables outbound replies
    pub zapi: Option<ZapiConfig>,

    /// ClickUp credentials; `None` disables task creation
    pub clickup: Option<ClickupConfig>,

    /// Chat model credentials; `None` disables the model path entirely
    pub model: Option<ModelConfig>,
}

/// Z-API instance credentials
#[derive(Debug, Clone)]
pub struct ZapiConfig {
    pub instance_id: String,
    pub token: String,
    pub client_token: String,
}

/// ClickUp list credentials
#[derive(Debug, Clone)]
pub struct ClickupConfig {
    pub token: String,
    pub list_id: String,
}

/// Chat model credentials
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns error only when no usable data directory can be determined.
    pub fn load(data_dir_override: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir_override.or_else(|| env_var("FRONTDESK_DATA_DIR").map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let zapi = match (
            env_var("ZAPI_INSTANCE"),
            env_var("ZAPI_TOKEN"),
            env_var("ZAPI_CLIENT_TOKEN"),
        ) {
            (Some(instance_id), Some(token), Some(client_token)) => Some(ZapiConfig {
                instance_id,
                token,
                client_token,
            }),
            _ => {
                tracing::warn!("Z-API credentials missing, outbound replies disabled");
                None
            }
        };

        let clickup = match (env_var("CLICKUP_TOKEN"), env_var("CLICKUP_LIST_ID")) {
            (Some(token), Some(list_id)) => Some(ClickupConfig { token, list_id }),
            _ => {
                tracing::warn!("ClickUp credentials missing, task creation disabled");
                None
            }
        };

        let model = env_var("OPENAI_API_KEY").map_or_else(
            || {
                tracing::warn!("OPENAI_API_KEY missing, model replies disabled");
                None
            },
            |api_key| {
                Some(ModelConfig {
                    api_key,
                    model: env_var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                })
            },
        );

        Ok(Self {
            data_dir,
            zapi,
            clickup,
            model,
        })
    }
}

/// Read an environment variable, treating empty values as absent
fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("br", "sunlux", "frontdesk")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| Error::Config("could not determine a data directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_wins() {
        let config = Config::load(Some(PathBuf::from("/tmp/frontdesk-test"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/frontdesk-test"));
    }
}
