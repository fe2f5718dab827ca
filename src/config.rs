//! Configuration management for rangehammer.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/rangehammer/config.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Range list files to consolidate
    pub sources: Vec<RangeSource>,

    /// Where the consolidated list is written
    pub output: PathBuf,

    /// Scheduling policy for update jobs
    pub jobs: JobPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            output: PathBuf::from("consolidated.txt"),
            jobs: JobPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                anyhow::bail!("Range source with path {:?} has an empty name", source.path);
            }
            if !names.insert(source.name.as_str()) {
                anyhow::bail!("Duplicate range source name '{}'", source.name);
            }
            if source.path.as_os_str().is_empty() {
                anyhow::bail!("Range source '{}' has an empty path", source.name);
            }
        }

        if self.output.as_os_str().is_empty() {
            anyhow::bail!("Output path cannot be empty");
        }

        Ok(())
    }

    /// Save configuration to YAML file atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = serde_yaml::to_string(self).with_context(|| "Failed to serialize config")?;

        let parent_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }

    /// Sources with `enabled: true`, in file order
    pub fn enabled_sources(&self) -> Vec<&RangeSource> {
        self.sources.iter().filter(|s| s.enabled).collect()
    }

    /// Output path, resolved against the config file's directory
    pub fn output_path(&self, config_path: &Path) -> PathBuf {
        resolve_relative(config_path, &self.output)
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// One range list file feeding the consolidated output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeSource {
    pub name: String,
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RangeSource {
    /// Source path, resolved against the config file's directory
    pub fn resolved_path(&self, config_path: &Path) -> PathBuf {
        resolve_relative(config_path, &self.path)
    }
}

/// What to do when a job is started while another of the same kind runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JobPolicy {
    /// Queue behind a running job of the same kind instead of dropping
    pub allow_queue: bool,
    /// Create a lock on first use of an unknown job kind
    pub populate_new_type: bool,
    /// Return refusals as errors rather than skipping silently
    pub strict: bool,
}

impl Default for JobPolicy {
    fn default() -> Self {
        Self {
            allow_queue: true,
            populate_new_type: true,
            strict: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sources() -> Vec<RangeSource> {
    vec![
        RangeSource {
            name: "global".to_string(),
            path: PathBuf::from("global_list.txt"),
            enabled: true,
        },
        RangeSource {
            name: "enwiki".to_string(),
            path: PathBuf::from("enwiki_list.txt"),
            enabled: true,
        },
    ]
}

fn resolve_relative(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}
