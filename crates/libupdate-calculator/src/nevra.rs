// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{PackageVersion, Result, types::InstalledPackage, version::normalize_epoch};

/// `name-epoch:version-release.arch`
static NEVRA_WITH_EPOCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+)-([0-9]+):([^-]+)-([^-]+)\.([^.]+)$").expect("valid nevra pattern")
});

/// `name-version-release.arch`
static NVRA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+)-([^-]+)-([^-]+)\.([^.]+)$").expect("valid nvra pattern")
});

/// default field separator of `rpm -qa --qf` inventory lines.
pub const DEFAULT_DELIMITER: char = '|';

const EPOCH_LINE_SENTINELS: &[&str] = &["(none)", "", "None"];

/// values accepted wherever an epoch may be given either as text or as a number.
pub trait EpochValue {
    fn to_epoch(&self) -> Result<u64>;
}

impl EpochValue for u64 {
    fn to_epoch(&self) -> Result<u64> {
        Ok(*self)
    }
}

impl EpochValue for u32 {
    fn to_epoch(&self) -> Result<u64> {
        Ok(u64::from(*self))
    }
}

impl EpochValue for str {
    fn to_epoch(&self) -> Result<u64> {
        normalize_epoch(self)
    }
}

impl EpochValue for String {
    fn to_epoch(&self) -> Result<u64> {
        normalize_epoch(self)
    }
}

impl<T: EpochValue + ?Sized> EpochValue for &T {
    fn to_epoch(&self) -> Result<u64> {
        (**self).to_epoch()
    }
}

pub(crate) fn render_evr(epoch: u64, version: &str, release: &str) -> String {
    if epoch > 0 {
        format!("{epoch}:{version}-{release}")
    } else {
        format!("{version}-{release}")
    }
}

/// formats an epoch-version-release string, omitting a zero epoch.
///
/// ```
/// use libupdate_calculator::format_evr;
///
/// assert_eq!(format_evr("(none)", "1.0", "1").unwrap(), "1.0-1");
/// assert_eq!(format_evr(2u64, "1.0", "1").unwrap(), "2:1.0-1");
/// ```
pub fn format_evr(epoch: impl EpochValue, version: &str, release: &str) -> Result<String> {
    Ok(render_evr(epoch.to_epoch()?, version, release))
}

/// parses `name-epoch:version-release.arch` or `name-version-release.arch`.
///
/// the arch is the text after the last dot and version and release carry no
/// hyphen, so the name keeps every other hyphen (`python3-libs` parses whole)
/// and dotted releases such as `6.el9` stay intact.
/// returns `None` when neither shape matches.
pub fn parse_nevra(text: &str) -> Option<PackageVersion> {
    if let Some(caps) = NEVRA_WITH_EPOCH.captures(text) {
        let epoch = caps[2].parse::<u64>().ok()?;
        return PackageVersion::new(&caps[1], epoch, &caps[3], &caps[4], &caps[5]).ok();
    }

    let caps = NVRA.captures(text)?;
    PackageVersion::new(&caps[1], 0, &caps[2], &caps[3], &caps[4]).ok()
}

/// one parsed `name|epoch|version|release|arch[|installtime]` inventory line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLine {
    pub name: String,
    pub epoch: String,
    pub version: String,
    pub release: String,
    pub arch: String,
    pub installtime: Option<String>,
}

impl PackageLine {
    pub fn to_package_version(&self) -> Result<PackageVersion> {
        PackageVersion::from_raw(
            &self.name,
            &self.epoch,
            &self.version,
            &self.release,
            &self.arch,
        )
    }

    pub fn into_installed(self) -> InstalledPackage {
        InstalledPackage {
            name: Some(self.name),
            arch: Some(self.arch),
            epoch: Some(self.epoch),
            version: Some(self.version),
            release: Some(self.release),
        }
    }
}

/// parses a `|`-delimited inventory line.
pub fn parse_package_line(line: &str) -> Option<PackageLine> {
    parse_package_line_with(line, DEFAULT_DELIMITER)
}

/// parses a delimited inventory line; needs at least five fields.
pub fn parse_package_line_with(line: &str, delimiter: char) -> Option<PackageLine> {
    let parts: Vec<&str> = line.trim().split(delimiter).collect();

    let [name, epoch, version, release, arch, rest @ ..] = parts.as_slice() else {
        return None;
    };

    let epoch = if EPOCH_LINE_SENTINELS.contains(epoch) {
        "0"
    } else {
        *epoch
    };

    Some(PackageLine {
        name: name.to_string(),
        epoch: epoch.to_string(),
        version: version.to_string(),
        release: release.to_string(),
        arch: arch.to_string(),
        installtime: rest.first().map(|t| t.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nevra_with_epoch() {
        let pkg = parse_nevra("openssl-1:3.0.7-27.el9.x86_64").unwrap();
        assert_eq!(pkg.name(), "openssl");
        assert_eq!(pkg.epoch(), 1);
        assert_eq!(pkg.version(), "3.0.7");
        assert_eq!(pkg.release(), "27.el9");
        assert_eq!(pkg.arch(), "x86_64");
    }

    #[test]
    fn test_parse_nevra_without_epoch() {
        let pkg = parse_nevra("bash-5.1.8-6.el9.x86_64").unwrap();
        assert_eq!(pkg.name(), "bash");
        assert_eq!(pkg.epoch(), 0);
        assert_eq!(pkg.version(), "5.1.8");
        assert_eq!(pkg.release(), "6.el9");
        assert_eq!(pkg.arch(), "x86_64");
    }

    #[test]
    fn test_parse_nevra_hyphenated_name() {
        let pkg = parse_nevra("python3-libs-3.9.18-3.el9.x86_64").unwrap();
        assert_eq!(pkg.name(), "python3-libs");
        assert_eq!(pkg.version(), "3.9.18");
        assert_eq!(pkg.release(), "3.el9");

        let pkg = parse_nevra("perl-Time-Local-2:1.300-7.el9.noarch").unwrap();
        assert_eq!(pkg.name(), "perl-Time-Local");
        assert_eq!(pkg.epoch(), 2);
    }

    #[test]
    fn test_parse_nevra_noarch() {
        let pkg = parse_nevra("tzdata-2024a-1.el9.noarch").unwrap();
        assert_eq!(pkg.name(), "tzdata");
        assert_eq!(pkg.arch(), "noarch");
    }

    #[test]
    fn test_parse_nevra_invalid() {
        assert!(parse_nevra("invalid").is_none());
        assert!(parse_nevra("").is_none());
        assert!(parse_nevra("bash-5.1.8").is_none());
        assert!(parse_nevra("bash-1-2").is_none());
    }

    #[test]
    fn test_parse_nevra_roundtrip() {
        let samples = [
            PackageVersion::new("bash", 0, "5.1.8", "6.el9", "x86_64").unwrap(),
            PackageVersion::new("openssl-libs", 1, "3.0.7", "27.el9", "x86_64").unwrap(),
            PackageVersion::new("kernel", 0, "5.14.0", "427.13.1.el9_4", "x86_64").unwrap(),
            PackageVersion::new("tzdata", 0, "2024a", "1.el9", "noarch").unwrap(),
            PackageVersion::new("glibc-langpack-en", 12, "2.34", "100.el9", "i686").unwrap(),
        ];
        for pkg in samples {
            assert_eq!(parse_nevra(&pkg.nevra()), Some(pkg.clone()), "{pkg}");
        }
    }

    #[test]
    fn test_unparseable_nevra_cannot_be_constructed() {
        // each of these would come back from parse_nevra as a different package
        assert!(PackageVersion::new("foo", 0, "1.0", "1-2", "x86_64").is_err());
        assert!(PackageVersion::new("foo", 0, "1-0", "1", "x86_64").is_err());
        assert!(PackageVersion::new("foo", 0, "", "1", "x86_64").is_err());
        assert!(PackageVersion::new("foo", 0, "1.0", "1", "x86.64").is_err());

        // odd but legal values still round trip
        for pkg in [
            PackageVersion::new("foo-1:2", 3, "1:0", "1.el9", "x86_64").unwrap(),
            PackageVersion::new("a", 0, "1~rc1", "0.1^git", "noarch").unwrap(),
        ] {
            assert_eq!(parse_nevra(&pkg.nevra()), Some(pkg.clone()), "{pkg}");
        }
    }

    #[test]
    fn test_parse_package_line() {
        let line = parse_package_line("bash|0|5.1.8|6.el9|x86_64|1705313000\n").unwrap();
        assert_eq!(line.name, "bash");
        assert_eq!(line.epoch, "0");
        assert_eq!(line.version, "5.1.8");
        assert_eq!(line.release, "6.el9");
        assert_eq!(line.arch, "x86_64");
        assert_eq!(line.installtime.as_deref(), Some("1705313000"));
    }

    #[test]
    fn test_parse_package_line_epoch_sentinels() {
        for sentinel in ["(none)", "", "None"] {
            let raw = format!("bash|{sentinel}|5.1.8|6.el9|x86_64");
            let line = parse_package_line(&raw).unwrap();
            assert_eq!(line.epoch, "0");
            assert_eq!(line.installtime, None);
        }
    }

    #[test]
    fn test_parse_package_line_invalid() {
        assert!(parse_package_line("bash|0|5.1.8|6.el9").is_none());
        assert!(parse_package_line("").is_none());
    }

    #[test]
    fn test_parse_package_line_custom_delimiter() {
        let line = parse_package_line_with("bash,1,5.1.8,6.el9,x86_64", ',').unwrap();
        assert_eq!(line.epoch, "1");
        let pkg = line.to_package_version().unwrap();
        assert_eq!(pkg.evr(), "1:5.1.8-6.el9");

        let installed = line.into_installed();
        assert_eq!(installed.cache_key().as_deref(), Some("bash.x86_64"));
    }

    #[test]
    fn test_format_evr() {
        assert_eq!(format_evr(1u64, "3.0.7", "27.el9").unwrap(), "1:3.0.7-27.el9");
        assert_eq!(format_evr(0u64, "5.1.8", "6.el9").unwrap(), "5.1.8-6.el9");
        assert_eq!(format_evr("2", "1.0", "1").unwrap(), "2:1.0-1");
        assert_eq!(format_evr("(none)", "1.0", "1").unwrap(), "1.0-1");
        assert_eq!(format_evr("", "1.0", "1").unwrap(), "1.0-1");
        assert_eq!(format_evr(String::from("0"), "1.0", "1").unwrap(), "1.0-1");
        assert!(format_evr("x", "1.0", "1").is_err());
    }
}
