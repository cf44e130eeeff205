// SPDX-License-Identifier: MIT OR Apache-2.0

mod evaluation;

use rayon::prelude::*;

use crate::{
    Error, Result,
    config::Config,
    manifest,
    repository::RepositoryCache,
    types::{Manifest, UpdateResult, timestamp_now},
};

use evaluation::PackageCheckResult;

/// os ids known to share the rhel repository layout.
const RHEL_FAMILY: &[&str] = &["rhel", "centos", "rocky", "almalinux"];

/// Resolves the repository profile for an os release.
///
/// Every distribution maps to `rhel{major}`, where `major` is the part of
/// the version before the first dot.
pub fn profile_for_os(os_id: &str, os_version: &str) -> String {
    let major = os_version.split('.').next().unwrap_or(os_version);

    if !RHEL_FAMILY.contains(&os_id) {
        log::debug!(
            target: "calculator",
            "os id '{os_id}' is not rhel-family, using rhel{major} profile"
        );
    }

    format!("rhel{major}")
}

/// Computes available package updates for hosts by comparing their manifests
/// against the mirrored repository caches.
///
/// Repository caches are memoized for the lifetime of the calculator and
/// shared between hosts, including hosts processed in parallel.
#[derive(Debug)]
pub struct UpdateCalculator {
    config: Config,
    repository: RepositoryCache,
}

impl UpdateCalculator {
    pub fn new(config: Config) -> Self {
        let repository = RepositoryCache::new(config.mirror_dir.clone());
        Self { config, repository }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &RepositoryCache {
        &self.repository
    }

    pub fn load_manifest(&self, host_id: &str) -> Result<Option<Manifest>> {
        manifest::load_manifest(&self.config.manifests_dir, host_id)
    }

    /// Hosts with a manifest directory, in filesystem enumeration order.
    pub fn host_ids(&self) -> impl Iterator<Item = String> + use<> {
        manifest::host_ids(&self.config.manifests_dir)
    }

    /// Computes the available updates of one host.
    ///
    /// Never fails: missing manifests, missing caches and unparseable
    /// versions are recorded in [`UpdateResult::errors`].
    pub fn compute_for_host(&self, host_id: &str) -> UpdateResult {
        let computed_at = timestamp_now();

        let manifest = match self.load_manifest(host_id) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                return UpdateResult::unknown_host(
                    host_id,
                    computed_at,
                    format!("Manifest not found for host: {host_id}"),
                );
            }
            Err(e) => {
                log::warn!(target: "calculator", "{e}");
                return UpdateResult::unknown_host(host_id, computed_at, e.to_string());
            }
        };

        let os_release = &manifest.os_release;
        let profile = profile_for_os(&os_release.id, &os_release.version);
        let mut result = UpdateResult::new(
            host_id,
            &profile,
            &os_release.id,
            &os_release.version,
            computed_at,
        );

        if manifest.packages.is_empty() {
            result.add_error("No packages found in manifest");
            return result;
        }

        for channel in &self.config.channels {
            let available = match self.repository.load(&profile, &self.config.arch, channel) {
                Ok(available) => available,
                Err(e) => {
                    log::warn!(target: "calculator", "{host_id}: {e}");
                    result.add_error(e.to_string());
                    continue;
                }
            };

            if available.is_empty() {
                continue;
            }

            for installed in &manifest.packages {
                match evaluation::check_package(installed, &available, channel) {
                    PackageCheckResult::Update(update) => result.add_update(update),
                    PackageCheckResult::CheckFailed(reason) => result.add_error(reason),
                    PackageCheckResult::UpToDate | PackageCheckResult::NotApplicable => {}
                }
            }
        }

        log::debug!(
            target: "calculator",
            "{host_id}: {} update(s) against {profile}",
            result.update_count()
        );

        result
    }

    /// Lazily computes results for every host with a manifest directory.
    ///
    /// The sequence is finite and cannot be restarted; host order follows
    /// the filesystem and is not stable between calls.
    pub fn compute_all(&self) -> impl Iterator<Item = UpdateResult> + '_ {
        self.host_ids()
            .map(move |host_id| self.compute_for_host(&host_id))
    }

    /// Computes results for every host on a rayon pool sized by
    /// [`Config::threads`]. Results follow the host listing order.
    pub fn compute_all_parallel(&self) -> Result<Vec<UpdateResult>> {
        let hosts: Vec<String> = self.host_ids().collect();

        // 0 = rayon default = number of logical CPUs
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.unwrap_or(0))
            .build()
            .map_err(|e| Error::other(format!("failed to build thread pool: {e}")))?;

        Ok(pool.install(|| {
            hosts
                .par_iter()
                .map(|host_id| self.compute_for_host(host_id))
                .collect()
        }))
    }
}
