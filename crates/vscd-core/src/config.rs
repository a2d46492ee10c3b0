use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::InstallError;
use crate::retry::RetryPolicy;

/// Vendor download for the latest stable x64 Debian package.
pub const DEFAULT_PACKAGE_URL: &str =
    "https://update.code.visualstudio.com/latest/linux-deb-x64/stable";

/// Shared libraries the editor needs at runtime.
pub const DEFAULT_DEPENDENCIES: &[&str] = &[
    "libgtk-3-0",
    "libxss1",
    "libasound2",
    "libnss3",
    "libx11-xcb1",
    "libxcb1",
    "libxcomposite1",
    "libxcursor1",
    "libxdamage1",
    "libxi6",
    "libxtst6",
];

/// Per-user state removed on uninstall.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "~/.config/Code",
    "~/.vscode",
    "~/.cache/Code",
    "~/.local/share/code",
    "~/.config/Code/Crashpad",
];

/// HTTP timeouts and retry parameters (`[fetch]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Abort a transfer that receives nothing for this many seconds.
    pub read_timeout_secs: u64,
    /// Maximum number of attempts per download (including the first).
    pub max_attempts: u32,
    /// Fixed delay between attempts in seconds.
    pub retry_delay_secs: f64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 10,
            max_attempts: 3,
            retry_delay_secs: 5.0,
        }
    }
}

impl FetchConfig {
    /// Delay between attempts, or `None` if `retry_delay_secs` is negative,
    /// not finite or too large for a `Duration`.
    pub fn retry_delay(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.retry_delay_secs).ok()
    }

    /// Rejects values that cannot be turned into timeouts and delays.
    pub fn validate(&self) -> std::result::Result<(), InstallError> {
        if self.retry_delay().is_none() {
            return Err(InstallError::Config(anyhow::anyhow!(
                "fetch.retry_delay_secs must be a non-negative number of seconds, got {}",
                self.retry_delay_secs
            )));
        }
        Ok(())
    }

    /// Retry policy for downloads. An invalid delay (see [`Self::validate`])
    /// falls back to the default delay.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            delay: self.retry_delay().unwrap_or_else(|| RetryPolicy::default().delay),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// Vendor APT repository (`[repository]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// ASCII-armoured signing key.
    pub key_url: String,
    /// Where the de-armoured key is installed.
    pub keyring_path: PathBuf,
    /// APT source list written for the repository.
    pub list_path: PathBuf,
    pub repo_url: String,
    pub suite: String,
    pub component: String,
    pub arch: String,
    /// Packages needed before the key can be processed.
    pub prerequisites: Vec<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            key_url: "https://packages.microsoft.com/keys/microsoft.asc".into(),
            keyring_path: PathBuf::from("/usr/share/keyrings/microsoft.gpg"),
            list_path: PathBuf::from("/etc/apt/sources.list.d/vscode.list"),
            repo_url: "https://packages.microsoft.com/repos/vscode".into(),
            suite: "stable".into(),
            component: "main".into(),
            arch: "amd64".into(),
            prerequisites: vec!["gpg".into()],
        }
    }
}

impl RepositoryConfig {
    /// One-line APT source entry pinned to the installed keyring.
    pub fn source_entry(&self) -> String {
        format!(
            "deb [arch={} signed-by={}] {} {} {}",
            self.arch,
            self.keyring_path.display(),
            self.repo_url,
            self.suite,
            self.component
        )
    }
}

/// Global configuration loaded from `~/.config/vscd/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VscdConfig {
    /// Direct download URL of the `.deb` package.
    pub package_url: String,
    /// Debian package name of the editor.
    pub package_name: String,
    /// Executable used to verify the installation.
    pub executable: String,
    /// Libraries installed before the package.
    pub dependencies: Vec<String>,
    /// Per-user directories removed on uninstall; `~` expands to `$HOME`.
    pub config_paths: Vec<String>,
    pub fetch: FetchConfig,
    pub repository: RepositoryConfig,
}

impl Default for VscdConfig {
    fn default() -> Self {
        Self {
            package_url: DEFAULT_PACKAGE_URL.into(),
            package_name: "code".into(),
            executable: "code".into(),
            dependencies: DEFAULT_DEPENDENCIES.iter().map(|s| s.to_string()).collect(),
            config_paths: DEFAULT_CONFIG_PATHS.iter().map(|s| s.to_string()).collect(),
            fetch: FetchConfig::default(),
            repository: RepositoryConfig::default(),
        }
    }
}

impl VscdConfig {
    /// `config_paths` with a leading `~` replaced by `home`.
    pub fn expanded_config_paths(&self, home: Option<&Path>) -> Vec<PathBuf> {
        self.config_paths
            .iter()
            .filter_map(|p| expand_tilde(p, home))
            .collect()
    }
}

/// Expands a leading `~` or `~/`. Paths that need a home directory are
/// dropped when none is known.
fn expand_tilde(path: &str, home: Option<&Path>) -> Option<PathBuf> {
    if path == "~" {
        return home.map(Path::to_path_buf);
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.map(|h| h.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vscd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the default location, creating a default file if none exists.
pub fn load_or_init() -> Result<VscdConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Load configuration from `path`, creating it with defaults if missing.
pub fn load_or_init_at(path: &Path) -> Result<VscdConfig> {
    if !path.exists() {
        let default_cfg = VscdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: VscdConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    cfg.fetch
        .validate()
        .with_context(|| format!("invalid {}", path.display()))?;
    Ok(cfg)
}
