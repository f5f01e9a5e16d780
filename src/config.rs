use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::VibesError;

pub const DEFAULT_CONFIG_FILE: &str = "vibes-viz.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub bundle: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub outdir: Option<String>,
    #[serde(default)]
    pub stylesheet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub bundle: Utf8PathBuf,
    pub template: Utf8PathBuf,
    pub outdir: Utf8PathBuf,
    pub stylesheet: Option<Utf8PathBuf>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bundle: Option<Utf8PathBuf>,
    pub template: Option<Utf8PathBuf>,
    pub outdir: Option<Utf8PathBuf>,
}

impl ResolvedConfig {
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(bundle) = overrides.bundle {
            self.bundle = bundle;
        }
        if let Some(template) = overrides.template {
            self.template = template;
        }
        if let Some(outdir) = overrides.outdir {
            self.outdir = outdir;
        }
        self
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ConfigLoader::resolve_config(Config::default())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `vibes-viz.json` in the working directory when no path is
    /// given. Only an explicitly named file has to exist.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, VibesError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(ResolvedConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| VibesError::ConfigRead(config_path.clone()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|err| VibesError::ConfigParse(err.to_string()))?;
        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        ResolvedConfig {
            bundle: Utf8PathBuf::from(
                config.bundle.unwrap_or_else(|| "./vibes-soda.js".to_string()),
            ),
            template: Utf8PathBuf::from(
                config.template.unwrap_or_else(|| "./template.html".to_string()),
            ),
            outdir: Utf8PathBuf::from(config.outdir.unwrap_or_else(|| "./viz".to_string())),
            stylesheet: config.stylesheet.map(Utf8PathBuf::from),
        }
    }
}
