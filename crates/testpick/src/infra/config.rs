//! Configuration management utilities.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".testpick/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub runner: Runner,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub normalize: Normalize,
    #[serde(default)]
    pub workspace: Workspace,
    #[serde(default)]
    pub picker: Picker,
    #[serde(default)]
    pub prompt: Prompt,
}

/// How the test runner is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Runner {
    #[serde(default)]
    command: Option<String>,
}

impl Runner {
    fn default_command() -> &'static str {
        "python manage.py test"
    }

    /// Command line prefix placed before the dotted path.
    pub fn command(&self) -> String {
        self.command
            .clone()
            .unwrap_or_else(|| Self::default_command().to_owned())
    }
}

/// Which implementation scans the corpus for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SearchBackend {
    /// In-process walk honoring ignore files.
    #[default]
    Walk,
    /// External command producing `path:line:content` output.
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Search {
    #[serde(default)]
    backend: Option<SearchBackend>,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default)]
    pub ignore_globs: Vec<String>,
}

impl Search {
    fn default_command() -> &'static str {
        "grep -rnw"
    }

    pub fn backend(&self) -> SearchBackend {
        self.backend.unwrap_or_default()
    }

    /// External search command; the token and root are appended as arguments.
    pub fn command(&self) -> String {
        self.command
            .clone()
            .unwrap_or_else(|| Self::default_command().to_owned())
    }
}

/// Rules turning a file path into a dotted identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Normalize {
    #[serde(default)]
    extensions: Option<Vec<String>>,
    #[serde(default)]
    strip_prefixes: Option<Vec<String>>,
}

impl Normalize {
    fn default_extensions() -> Vec<String> {
        vec!["py".into()]
    }

    /// Source file extensions removed from module paths, without the leading dot.
    pub fn extensions(&self) -> Vec<String> {
        self.extensions
            .clone()
            .unwrap_or_else(Self::default_extensions)
    }

    /// Leading directory segments dropped from the path, e.g. `src`.
    pub fn strip_prefixes(&self) -> Vec<String> {
        self.strip_prefixes.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Workspace {
    #[serde(default)]
    source_dirs: Option<Vec<String>>,
}

impl Workspace {
    /// Directories entered before searching; the first one that exists wins.
    pub fn source_dirs(&self) -> Vec<String> {
        self.source_dirs.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Picker {
    #[serde(default)]
    command: Option<String>,
}

impl Picker {
    fn default_command() -> &'static str {
        "fzf"
    }

    pub fn command(&self) -> String {
        self.command
            .clone()
            .unwrap_or_else(|| Self::default_command().to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Prompt {
    #[serde(default)]
    max_attempts: Option<usize>,
}

impl Prompt {
    fn default_max_attempts() -> usize {
        3
    }

    /// How many answers a selection prompt accepts before giving up.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts.unwrap_or_else(Self::default_max_attempts)
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    runner: Option<String>,
    picker: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            runner: env::var("TESTPICK_RUNNER").ok(),
            picker: env::var("TESTPICK_PICKER").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(runner: &str, picker: &str) -> Self {
        Self {
            runner: Some(runner.to_owned()),
            picker: Some(picker.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading global config");
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            runner: Runner {
                command: other.runner.command.or(self.runner.command),
            },
            search: merge_search(self.search, other.search),
            normalize: Normalize {
                extensions: other.normalize.extensions.or(self.normalize.extensions),
                strip_prefixes: other
                    .normalize
                    .strip_prefixes
                    .or(self.normalize.strip_prefixes),
            },
            workspace: Workspace {
                source_dirs: other.workspace.source_dirs.or(self.workspace.source_dirs),
            },
            picker: Picker {
                command: other.picker.command.or(self.picker.command),
            },
            prompt: Prompt {
                max_attempts: other.prompt.max_attempts.or(self.prompt.max_attempts),
            },
        }
    }
}

fn merge_search(base: Search, overlay: Search) -> Search {
    let mut globs: BTreeSet<String> = base.ignore_globs.into_iter().collect();
    globs.extend(overlay.ignore_globs);

    Search {
        backend: overlay.backend.or(base.backend),
        command: overlay.command.or(base.command),
        show_hidden: overlay.show_hidden || base.show_hidden,
        ignore_globs: globs.into_iter().collect(),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("testpick/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(runner) = env.runner {
        config.runner.command = Some(runner);
    }
    if let Some(picker) = env.picker {
        config.picker.command = Some(picker);
    }
    config
}
