//! Configuration file support for profile-photo.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/profile-photo/config.toml` (lowest priority)
//! - Project-local: `.profile-photo.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::fmt;
use std::path::{Path, PathBuf};

use profile_photo_adapters::ExecutionEnvironment;
use profile_photo_core::Policy;
use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Photo acceptance policy.
    pub policy: PolicyConfig,
    /// Host site connection.
    pub site: SiteConfig,
    /// Vision backend settings.
    pub vision: VisionConfig,
    /// Profile property written on commit.
    pub profile: ProfileConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Execution environment: "local", "test" or "production".
    pub environment: Option<String>,
}

/// Photo acceptance policy configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Require a portrait.
    pub require_portrait: Option<bool>,
    /// Accept clip art.
    pub allow_clipart: Option<bool>,
    /// Accept line drawings.
    pub allow_linedrawing: Option<bool>,
    /// Accept racy content.
    pub allow_racy: Option<bool>,
    /// Accept adult content.
    pub allow_adult: Option<bool>,
    /// Accept gory content.
    pub allow_gory: Option<bool>,
    /// Semicolon-delimited forbidden keywords.
    pub forbidden_keywords: Option<String>,
}

/// Host site configuration.
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site URL.
    pub url: Option<String>,
    /// Login name of the profile owner.
    pub account: Option<String>,
    /// Bearer token for the site API.
    pub access_token: Option<String>,
}

impl fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteConfig")
            .field("url", &self.url)
            .field("account", &self.account)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Vision backend configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Analysis timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// API version path segment.
    pub api_version: Option<String>,
}

/// Profile property configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Property name.
    pub property_name: Option<String>,
    /// Property value template; `{timestamp}` is substituted.
    pub property_value: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text" or "json".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/profile-photo/config.toml`
    /// 2. Project-local: `.profile-photo.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref env) = self.general.environment {
            env.parse::<ExecutionEnvironment>()
                .map_err(|e| format!("general.environment: {e}"))?;
        }

        if let Some(ref url) = self.site.url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(format!("site.url must be an http(s) URL, got '{url}'"));
            }
        }

        if self.vision.timeout_secs == Some(0) {
            return Err("vision.timeout_secs must be greater than 0".to_string());
        }

        if let Some(ref f) = self.output.format {
            if f != "text" && f != "json" {
                return Err(format!("output.format must be 'text' or 'json', got '{f}'"));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.environment = other
            .general
            .environment
            .or_else(|| self.general.environment.take());

        // Policy
        let policy = &mut self.policy;
        policy.require_portrait = other.policy.require_portrait.or(policy.require_portrait);
        policy.allow_clipart = other.policy.allow_clipart.or(policy.allow_clipart);
        policy.allow_linedrawing = other.policy.allow_linedrawing.or(policy.allow_linedrawing);
        policy.allow_racy = other.policy.allow_racy.or(policy.allow_racy);
        policy.allow_adult = other.policy.allow_adult.or(policy.allow_adult);
        policy.allow_gory = other.policy.allow_gory.or(policy.allow_gory);
        policy.forbidden_keywords = other
            .policy
            .forbidden_keywords
            .or_else(|| policy.forbidden_keywords.take());

        // Site
        self.site.url = other.site.url.or_else(|| self.site.url.take());
        self.site.account = other.site.account.or_else(|| self.site.account.take());
        self.site.access_token = other
            .site
            .access_token
            .or_else(|| self.site.access_token.take());

        // Vision
        self.vision.timeout_secs = other.vision.timeout_secs.or(self.vision.timeout_secs);
        self.vision.api_version = other
            .vision
            .api_version
            .or_else(|| self.vision.api_version.take());

        // Profile
        self.profile.property_name = other
            .profile
            .property_name
            .or_else(|| self.profile.property_name.take());
        self.profile.property_value = other
            .profile
            .property_value
            .or_else(|| self.profile.property_value.take());

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
    }

    /// Builds the acceptance policy. Unset rules take the strictest value.
    pub fn policy(&self) -> Policy {
        let defaults = Policy::default();
        let p = &self.policy;
        Policy {
            require_portrait: p.require_portrait.unwrap_or(defaults.require_portrait),
            allow_clipart: p.allow_clipart.unwrap_or(defaults.allow_clipart),
            allow_linedrawing: p.allow_linedrawing.unwrap_or(defaults.allow_linedrawing),
            allow_racy: p.allow_racy.unwrap_or(defaults.allow_racy),
            allow_adult: p.allow_adult.unwrap_or(defaults.allow_adult),
            allow_gory: p.allow_gory.unwrap_or(defaults.allow_gory),
            forbidden_keywords: Vec::new(),
        }
        .with_forbidden_keywords(p.forbidden_keywords.as_deref().unwrap_or_default())
    }

    /// Environment from config, if set and valid.
    pub fn environment(&self) -> Option<ExecutionEnvironment> {
        self.general
            .environment
            .as_deref()
            .and_then(|e| e.parse().ok())
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("profile-photo").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.profile-photo.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".profile-photo.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
