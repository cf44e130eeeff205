// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

/// architecture whose repository caches are consulted by default.
pub const DEFAULT_ARCH: &str = "x86_64";

/// repository channels consulted by default, in lookup order.
pub const DEFAULT_CHANNELS: &[&str] = &["baseos", "appstream"];

/// Configuration for update calculation.
///
/// Library consumers can construct this directly; the CLI builds it from a
/// TOML file and command-line flags.
///
/// ```rust
/// use libupdate_calculator::Config;
///
/// let config = Config::new("/srv/mirror", "/srv/manifests")
///     .with_channels(vec!["baseos".to_string()])
///     .with_threads(4);
/// assert_eq!(config.arch, "x86_64");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the mirrored repositories (`{profile}/{arch}/{channel}` below it).
    pub mirror_dir: PathBuf,

    /// Root of the host manifests (`processed/{host_id}/latest` below it).
    pub manifests_dir: PathBuf,

    /// Architecture of the repository caches to compare against.
    pub arch: String,

    /// Channels searched for every host, in order. Updates found in an
    /// earlier channel are reported before those of later ones.
    pub channels: Vec<String>,

    /// Number of worker threads for batch runs.
    ///
    /// `None` (default) uses the number of logical CPU threads available.
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mirror_dir: PathBuf::new(),
            manifests_dir: PathBuf::new(),
            arch: DEFAULT_ARCH.to_string(),
            channels: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
            threads: None,
        }
    }
}

impl Config {
    pub fn new(mirror_dir: impl Into<PathBuf>, manifests_dir: impl Into<PathBuf>) -> Self {
        Self {
            mirror_dir: mirror_dir.into(),
            manifests_dir: manifests_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn with_channels(mut self, channels: Vec<String>) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}
