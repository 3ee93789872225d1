//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. First config file found: `$TOOL_CONFIG`, `./tool.toml`,
//!    `$XDG_CONFIG_HOME/tool/tool.toml`
//! 3. Environment variables: `TOOL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{SuiteError, SuiteResult};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TOOL_CONFIG";

/// File name looked up in the working directory and the XDG config dir.
pub const CONFIG_FILE_NAME: &str = "tool.toml";

/// Run-wide settings. Read-only once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Debug mode: unexpected failures propagate with a full trace
    pub debug: bool,
    /// Show deprecation warnings
    pub deprecation_warnings: bool,
    /// Warn when the controller runtime will soon be unsupported
    pub controller_runtime_warning: bool,
    /// Optional log file; all diagnostics are appended there
    pub log_path: Option<PathBuf>,
    /// Private per-user state directory (default: ~/.tool)
    pub state_dir: PathBuf,
    /// Config file the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            deprecation_warnings: true,
            controller_runtime_warning: true,
            log_path: None,
            state_dir: default_state_dir(),
            source: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub debug: Option<bool>,
    pub deprecation_warnings: Option<bool>,
    pub controller_runtime_warning: Option<bool>,
    pub log_path: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
}

/// Get the default state directory (~/.tool).
fn default_state_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".tool"))
        .unwrap_or_else(|| PathBuf::from("~/.tool"))
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Get the XDG config directory for tool.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tool").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Config file candidates in lookup order, without the explicit override.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    paths.extend(global_config_path());
    paths
}

/// Find the config file to load.
///
/// An explicit `$TOOL_CONFIG` must exist; the implicit locations are
/// optional and the first existing one wins.
fn find_config_file() -> SuiteResult<Option<PathBuf>> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
        let path = PathBuf::from(expand_env_vars(&explicit.to_string_lossy()));
        if !path.is_file() {
            return Err(SuiteError::options(format!(
                "config file from {} not found: {}",
                CONFIG_ENV_VAR,
                path.display()
            )));
        }
        return Ok(Some(path));
    }
    Ok(config_search_paths().into_iter().find(|p| p.is_file()))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> SuiteResult<RawSettings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SuiteError::options(format!("read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| SuiteError::options(format!("parse {}: {}", path.display(), e)))
}

impl Settings {
    /// Load settings with layered precedence (see module docs).
    pub fn load() -> SuiteResult<Self> {
        let mut current = Self::default();

        if let Some(path) = find_config_file()? {
            let raw = load_raw_settings(&path)?;
            current = current.merge_with(&raw);
            current.source = Some(path);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Load settings from one explicit file plus environment overrides.
    pub fn load_from(path: &Path) -> SuiteResult<Self> {
        let raw = load_raw_settings(path)?;
        let mut current = Self::default().merge_with(&raw);
        current.source = Some(path.to_path_buf());
        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            debug: overlay.debug.unwrap_or(self.debug),
            deprecation_warnings: overlay
                .deprecation_warnings
                .unwrap_or(self.deprecation_warnings),
            controller_runtime_warning: overlay
                .controller_runtime_warning
                .unwrap_or(self.controller_runtime_warning),
            log_path: overlay.log_path.clone().or_else(|| self.log_path.clone()),
            state_dir: overlay
                .state_dir
                .clone()
                .unwrap_or_else(|| self.state_dir.clone()),
            source: self.source.clone(),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.state_dir.to_string_lossy().as_ref());
        self.state_dir = PathBuf::from(expanded);

        if let Some(log_path) = &self.log_path {
            let expanded = expand_env_vars(log_path.to_string_lossy().as_ref());
            self.log_path = Some(PathBuf::from(expanded));
        }
    }

    /// Apply TOOL_* environment variables as explicit overrides.
    ///
    /// Unset variables are skipped; values that do not parse are errors.
    fn apply_env_overrides(settings: Self) -> SuiteResult<Self> {
        let config = Config::builder()
            .add_source(env_source())
            .build()
            .map_err(config_err)?;
        Self::apply_overrides_from(settings, &config)
    }

    fn apply_overrides_from(mut settings: Self, config: &Config) -> SuiteResult<Self> {
        if let Some(val) = optional(config.get_bool("debug"))? {
            settings.debug = val;
        }
        if let Some(val) = optional(config.get_bool("deprecation_warnings"))? {
            settings.deprecation_warnings = val;
        }
        if let Some(val) = optional(config.get_bool("controller_runtime_warning"))? {
            settings.controller_runtime_warning = val;
        }
        if let Some(val) = optional(config.get_string("log_path"))? {
            settings.log_path = Some(PathBuf::from(val));
        }
        if let Some(val) = optional(config.get_string("state_dir"))? {
            settings.state_dir = PathBuf::from(val);
        }
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> SuiteResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SuiteError::generic(format!("serialize config: {e}")))
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# tool configuration
#
# Lookup order (first file found wins):
#   $TOOL_CONFIG             (explicit path, must exist)
#   ./tool.toml              (working directory)
#   ~/.config/tool/tool.toml (global)
# TOOL_* environment variables override file values, e.g. TOOL_DEBUG=true

# Let unexpected failures propagate with a full trace
# debug = false

# Show deprecation warnings
# deprecation_warnings = true

# Warn when the controller runtime will soon be unsupported
# controller_runtime_warning = true

# Append all diagnostics to this file
# log_path = "~/.tool/tool.log"

# Private per-user state directory
# state_dir = "~/.tool"
"#
        .to_string()
    }
}

/// `TOOL_LOG_PATH` → `log_path`; `__` nests keys.
fn env_source() -> Environment {
    Environment::with_prefix("TOOL")
        .prefix_separator("_")
        .separator("__")
}

/// Treat a missing key as "not specified".
fn optional<T>(result: Result<T, ConfigError>) -> SuiteResult<Option<T>> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> SuiteError {
    SuiteError::options(format!("config error: {e}"))
}
