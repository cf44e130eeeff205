// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Version segment ordering is based on rpm's rpmvercmp (https://github.com/rpm-software-management/rpm).

pub mod calculator;
pub mod config;
pub mod error;
pub mod manifest;
pub mod nevra;
pub mod package;
pub mod repository;
pub mod summary;
pub mod types;
pub mod version;

mod paths;

pub use calculator::{UpdateCalculator, profile_for_os};
pub use config::{Config, DEFAULT_ARCH, DEFAULT_CHANNELS};
pub use error::{Error, Result};
pub use manifest::load_manifest;
pub use nevra::{
    EpochValue, PackageLine, format_evr, parse_nevra, parse_package_line, parse_package_line_with,
};
pub use package::PackageVersion;
pub use repository::{CacheKey, RepositoryCache};
pub use summary::summarize;
pub use types::{
    Evr, FleetSummary, HostSummary, InstalledPackage, Manifest, OsRelease, PackageCache,
    PackageUpdate, RepoPackage, UpdateResult,
};
pub use version::{
    compare_full_version, compare_version_strings, is_update_available, normalize_epoch,
};

/// computes update results for every host under the configured manifests directory.
pub fn compute_updates(config: &Config) -> Result<Vec<UpdateResult>> {
    UpdateCalculator::new(config.clone()).compute_all_parallel()
}

/// computes updates for every host and folds them into a fleet summary.
pub fn compute_summary(config: &Config) -> Result<FleetSummary> {
    Ok(summarize(&compute_updates(config)?))
}

/// computes the update result of a single host.
pub fn compute_host(config: &Config, host_id: &str) -> UpdateResult {
    UpdateCalculator::new(config.clone()).compute_for_host(host_id)
}
