//! Project configuration, keyed by project URL

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ReceiverError, Result};

/// A command as written in the configuration file: either an argument
/// list or a single shell-syntax string.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum CommandSpec {
    Argv(Vec<String>),
    Shell(String),
}

impl CommandSpec {
    /// Resolve to an argument vector template.
    /// Shell strings are split using shell quoting rules.
    pub fn into_argv(self) -> std::result::Result<Vec<String>, shell_words::ParseError> {
        match self {
            CommandSpec::Argv(argv) => Ok(argv),
            CommandSpec::Shell(line) => shell_words::split(&line),
        }
    }
}

/// One project entry as it appears in the configuration file
#[derive(Debug, Deserialize, Clone)]
pub struct ProjectEntry {
    pub gitlab_token: Option<String>,
    pub command: Option<CommandSpec>,
}

/// Resolved, immutable configuration of one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub token: Option<String>,
    pub command: Vec<String>,
}

impl ProjectConfig {
    pub fn new(token: impl Into<String>, command: Vec<String>) -> Self {
        Self {
            token: Some(token.into()),
            command,
        }
    }

    /// Returns the configured token, if a non-empty one is set.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Read-only mapping from project URL to its configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    projects: HashMap<String, ProjectConfig>,
}

impl ConfigStore {
    pub fn new(projects: HashMap<String, ProjectConfig>) -> Self {
        Self { projects }
    }

    /// Resolve raw file entries, splitting shell-syntax commands.
    pub fn from_entries(entries: HashMap<String, ProjectEntry>) -> Result<Self> {
        let mut projects = HashMap::with_capacity(entries.len());
        for (url, entry) in entries {
            let command = match entry.command {
                Some(spec) => spec
                    .into_argv()
                    .map_err(|source| ReceiverError::CommandSplit {
                        project: url.clone(),
                        source,
                    })?,
                None => Vec::new(),
            };
            if entry.gitlab_token.is_none() {
                warn!("Project '{}' has no gitlab_token configured", url);
            }
            if command.is_empty() {
                warn!("Project '{}' has no command configured", url);
            }
            debug!("Loaded project '{}' with command {:?}", url, command);
            projects.insert(
                url,
                ProjectConfig {
                    token: entry.gitlab_token,
                    command,
                },
            );
        }
        Ok(Self { projects })
    }

    pub fn get(&self, project_url: &str) -> Option<&ProjectConfig> {
        self.projects.get(project_url)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn project_urls(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }
}

/// Parse configuration text. `.toml` files use TOML, everything else YAML.
pub fn parse_config(contents: &str, path: &Path) -> Result<ConfigStore> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let entries: HashMap<String, ProjectEntry> = if is_toml {
        toml::from_str(contents)?
    } else if contents.trim().is_empty() {
        HashMap::new()
    } else {
        serde_yaml::from_str(contents)?
    };

    ConfigStore::from_entries(entries)
}

/// Load and parse the configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigStore> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ReceiverError::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents, path).map_err(|e| {
        ReceiverError::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}
