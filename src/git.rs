//! Queries against the local git checkout.
//!
//! Only two questions matter here: whether the current commit sits
//! exactly on a tag, and what `git describe` calls it. Both shell out
//! to the `git` binary on PATH.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// True iff `root`'s current commit is exactly at a tag.
///
/// Probes with `git describe --tags --exact-match`, output suppressed.
/// A non-zero exit is the normal "not on a tag" answer; only failing
/// to run git at all is an error.
pub fn is_on_exact_tag(root: &Path) -> Result<bool> {
    let status = Command::new("git")
        .args(["describe", "--tags", "--exact-match"])
        .current_dir(root)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("failed to run git describe --exact-match")?;

    tracing::debug!("git describe --exact-match exited with {status}");
    Ok(status.success())
}

/// Descriptive tag for `root`'s current commit, per `git describe`.
pub fn describe(root: &Path) -> Result<String> {
    let output = Command::new("git")
        .arg("describe")
        .current_dir(root)
        .output()
        .context("failed to run git describe")?;

    if !output.status.success() {
        bail!(
            "git describe failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let tag = String::from_utf8(output.stdout).context("git describe output is not UTF-8")?;
    tracing::debug!("git describe: {}", tag.trim());
    Ok(tag.trim().to_string())
}
