// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cmp::Ordering;

use crate::{
    types::{InstalledPackage, PackageCache, PackageUpdate},
    version,
};

pub(crate) enum PackageCheckResult {
    Update(PackageUpdate),
    CheckFailed(String),
    UpToDate,
    /// missing name/arch, or the channel does not carry the package.
    NotApplicable,
}

/// Matches one installed package against a channel's available packages.
pub(crate) fn check_package(
    installed: &InstalledPackage,
    available_packages: &PackageCache,
    channel: &str,
) -> PackageCheckResult {
    let (Some(name), Some(arch)) = (installed.name.as_deref(), installed.arch.as_deref()) else {
        return PackageCheckResult::NotApplicable;
    };
    let Some(key) = installed.cache_key() else {
        return PackageCheckResult::NotApplicable;
    };
    let Some(available) = available_packages.get(&key).filter(|p| !p.is_empty()) else {
        return PackageCheckResult::NotApplicable;
    };

    let installed_evr = installed.evr();
    let available_evr = available.evr();

    match version::compare_full_version(&installed_evr, &available_evr) {
        Ok(Ordering::Less) => {
            log::debug!(
                target: "calculator",
                "{key}: {} -> {} ({channel})",
                installed_evr.version,
                available_evr.version
            );
            PackageCheckResult::Update(PackageUpdate::new(
                name,
                arch,
                channel,
                installed_evr,
                available_evr,
            ))
        }
        Ok(_) => PackageCheckResult::UpToDate,
        Err(e) => {
            log::warn!(target: "calculator", "cannot compare {key} in {channel}: {e}");
            PackageCheckResult::CheckFailed(format!("{key} ({channel}): {e}"))
        }
    }
}
