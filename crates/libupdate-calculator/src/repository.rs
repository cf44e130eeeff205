// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{
    Error, Result, paths,
    types::{PackageCache, RepoPackage},
};

/// identifies one channel cache of the mirror.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub profile: String,
    pub arch: String,
    pub channel: String,
}

impl CacheKey {
    pub fn new(profile: &str, arch: &str, channel: &str) -> Self {
        Self {
            profile: profile.to_string(),
            arch: arch.to_string(),
            channel: channel.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.profile, self.arch, self.channel)
    }
}

/// memoizing loader for the mirror's per-channel package caches.
///
/// each `(profile, arch, channel)` is read from disk at most once; later
/// loads hand out the same `Arc`. the memo lock is held while a cache file is
/// read, so concurrent callers never populate a key twice.
#[derive(Debug)]
pub struct RepositoryCache {
    mirror_dir: PathBuf,
    entries: Mutex<HashMap<CacheKey, Arc<PackageCache>>>,
}

impl RepositoryCache {
    pub fn new(mirror_dir: impl Into<PathBuf>) -> Self {
        Self {
            mirror_dir: mirror_dir.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn mirror_dir(&self) -> &Path {
        &self.mirror_dir
    }

    /// returns the available packages of one channel.
    ///
    /// a channel without a cache file yields an empty mapping and a warning.
    /// it is not memoized, so a cache written later is still picked up.
    pub fn load(&self, profile: &str, arch: &str, channel: &str) -> Result<Arc<PackageCache>> {
        let key = CacheKey::new(profile, arch, channel);
        let mut entries = self.entries.lock();

        if let Some(cached) = entries.get(&key) {
            return Ok(Arc::clone(cached));
        }

        let path = paths::package_cache_file(&self.mirror_dir, profile, arch, channel);
        if !path.exists() {
            log::warn!(target: "repository", "no package cache for {key}");
            return Ok(Arc::new(PackageCache::new()));
        }

        let content =
            fs::read_to_string(&path).map_err(|e| Error::cache_read(key.to_string(), e))?;
        let entries_on_disk: HashMap<String, Option<RepoPackage>> =
            serde_json::from_str(&content).map_err(|e| Error::cache_read(key.to_string(), e))?;

        // null entries carry nothing to compare against
        let packages: PackageCache = entries_on_disk
            .into_iter()
            .filter_map(|(name, package)| Some((name, package?)))
            .collect();

        log::debug!(
            target: "repository",
            "loaded {} package(s) for {key} from {}",
            packages.len(),
            path.display()
        );

        let packages = Arc::new(packages);
        entries.insert(key, Arc::clone(&packages));
        Ok(packages)
    }

    /// number of memoized channel caches.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// drops every memoized cache; the next load reads from disk again.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
