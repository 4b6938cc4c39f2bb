//! Version string construction.
//!
//! A checkout sitting exactly on a tag gets a release version (the tag
//! itself); anything else gets a nightly version built from the
//! base-version file and the current date. Either form may carry a
//! build-variant suffix such as `+cpu` or `+cuda11.3`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;

use crate::git;

/// Tags are conventionally pushed as `v1.7.1`; the published version drops the `v`.
static LEADING_V: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^v").expect("leading-v pattern is valid"));

/// The base-version file historically ends in a literal `a0` marker.
/// Anchored at the end, stripped once.
static LEGACY_A0_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("a0$").expect("a0 pattern is valid"));

/// The variant uploaded to the package index, which carries no suffix.
const PUBLICATION_DEFAULT: (&str, &str) = ("cuda", "10.2");

/// A release version was requested while the checkout is not exactly on a tag.
#[derive(Debug, thiserror::Error)]
#[error("not on an exact git tag, are you sure you want a release version?")]
pub struct NoTagError;

/// Hardware/runtime variant a build artifact targets.
#[derive(Debug, Clone)]
pub struct BuildVariant {
    /// Accelerator family: cpu, cuda, rocm, ...
    pub gpu_arch_type: String,
    /// Accelerator version (e.g. "10.2", "4.0"); empty for cpu builds.
    pub gpu_arch_version: String,
    /// When false, no variant suffix is appended at all.
    pub with_suffix: bool,
}

impl BuildVariant {
    /// Variant suffix appended to the version string: `+<type><version>`.
    ///
    /// Empty when suffixes are disabled, or for the publication-default
    /// variant (cuda 10.2).
    pub fn suffix(&self) -> String {
        let arch = (self.gpu_arch_type.as_str(), self.gpu_arch_version.as_str());
        if !self.with_suffix || arch == PUBLICATION_DEFAULT {
            return String::new();
        }
        format!("+{}{}", self.gpu_arch_type, self.gpu_arch_version)
    }
}

/// Computes version strings for one checkout.
pub struct VersionResolver {
    root: PathBuf,
    version_file: PathBuf,
}

impl VersionResolver {
    /// `version_file` is resolved relative to `root` (absolute paths
    /// pass through unchanged).
    pub fn new(root: impl Into<PathBuf>, version_file: impl AsRef<Path>) -> Self {
        let root = root.into();
        let version_file = root.join(version_file);
        VersionResolver { root, version_file }
    }

    /// Tag text for the current commit, without the conventional leading `v`.
    pub fn tag(&self) -> Result<String> {
        let dirty_tag = git::describe(&self.root)?;
        Ok(LEADING_V.replace(&dirty_tag, "").into_owned())
    }

    /// Base version from the version file: whitespace-trimmed, one
    /// trailing legacy `a0` marker removed.
    pub fn base_version(&self) -> Result<String> {
        let dirty_version = fs::read_to_string(&self.version_file)
            .with_context(|| format!("failed to read {}", self.version_file.display()))?;
        Ok(LEGACY_A0_SUFFIX
            .replace(dirty_version.trim(), "")
            .into_owned())
    }

    /// Release version: the current tag plus the variant suffix.
    ///
    /// Fails with [`NoTagError`] when the checkout is not exactly on a
    /// tag; callers either propagate it or fall back to the nightly form.
    pub fn release_version(&self, variant: &BuildVariant) -> Result<String> {
        if !git::is_on_exact_tag(&self.root)? {
            return Err(NoTagError.into());
        }
        Ok(format!("{}{}", self.tag()?, variant.suffix()))
    }

    /// Nightly version for today's date.
    pub fn nightly_version(&self, variant: &BuildVariant) -> Result<String> {
        self.nightly_version_on(variant, chrono::Local::now().date_naive())
    }

    /// Nightly version for a given date: `<base>.dev+<YYYYMMDD><suffix>`.
    /// The leading `+` is part of the date field, not a separator.
    pub fn nightly_version_on(&self, variant: &BuildVariant, date: NaiveDate) -> Result<String> {
        let date_str = date.format("+%Y%m%d");
        Ok(format!(
            "{}.dev{}{}",
            self.base_version()?,
            date_str,
            variant.suffix()
        ))
    }

    /// Release when exactly on a tag, nightly otherwise.
    pub fn resolve(&self, variant: &BuildVariant) -> Result<String> {
        match self.release_version(variant) {
            Ok(version) => Ok(version),
            Err(err) if err.is::<NoTagError>() => self.nightly_version(variant),
            Err(err) => Err(err),
        }
    }
}
