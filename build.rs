use std::process::Command;

fn main() {
    // CI sets BUILDVER_BUILD; local builds fall back to the git hash.
    println!("cargo:rerun-if-env-changed=BUILDVER_BUILD");

    let build = std::env::var("BUILDVER_BUILD")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(git_short_hash)
        .unwrap_or_else(|| "dev".to_string());

    println!("cargo:rustc-env=BUILDVER_BUILD={build}");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!hash.is_empty()).then_some(hash)
}
