//! User configuration file.
//!
//! ```yaml
//! default_provider: ionq
//! passes: [transpile, merge, cancel]
//! seed: 7
//! shots: 4096
//! providers:
//!   - id: lab_device
//!     ...
//! ```
//!
//! Command-line flags win over the file; the file wins over built-in
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use qforge_compile::PassName;
use qforge_target::{DEFAULT_PROVIDER, ProviderConstraints, ProviderRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shots used when neither the flag nor the file sets them.
pub const DEFAULT_SHOTS: usize = 1024;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QforgeConfig {
    /// Provider used when `-p` is not given.
    pub default_provider: Option<String>,
    /// Pass pipeline used when `--passes` is not given.
    pub passes: Vec<String>,
    pub seed: Option<u64>,
    pub shots: Option<usize>,
    /// Profiles added to (or replacing) the built-in ones.
    pub providers: Vec<ProviderConstraints>,
}

impl QforgeConfig {
    /// `~/.qforge/config.yaml`, when a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qforge").join("config.yaml"))
    }

    /// Load an explicit file, or the default file if it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file means an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unknown pass names and out-of-range provider profiles.
    pub fn validate(&self) -> Result<()> {
        PassName::parse_all(&self.passes)?;
        for profile in &self.providers {
            profile.validate()?;
        }
        if self.shots == Some(0) {
            anyhow::bail!("shots must be positive");
        }
        Ok(())
    }

    /// Built-in profiles plus the ones declared here.
    pub fn registry(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::builtin();
        for profile in &self.providers {
            registry.insert(profile.clone());
        }
        registry
    }

    pub fn provider<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.or(self.default_provider.as_deref())
            .unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn passes<'a>(&'a self, flag: &'a [String]) -> &'a [String] {
        if flag.is_empty() { &self.passes } else { flag }
    }

    pub fn shots(&self, flag: Option<usize>) -> usize {
        flag.or(self.shots).unwrap_or(DEFAULT_SHOTS)
    }

    pub fn seed(&self, flag: Option<u64>) -> Option<u64> {
        flag.or(self.seed)
    }
}
