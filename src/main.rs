mod git;
mod version;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use version::{BuildVariant, VersionResolver};

/// Build identifier baked in at compile time by `build.rs`.
const BUILD_IDENT: &str = env!("BUILDVER_BUILD");

#[derive(Parser)]
#[command(
    name = "buildver",
    version = BUILD_IDENT,
    about = "Generate version strings for binary build artifacts"
)]
struct Cli {
    /// Skip the build-variant suffix (e.g. +cpu) entirely
    #[arg(long)]
    no_build_suffix: bool,

    /// GPU arch the artifact targets, typically (cpu, cuda, rocm).
    /// Defaults to $GPU_ARCH_TYPE, then "cpu"
    #[arg(long)]
    gpu_arch_type: Option<String>,

    /// GPU arch version, typically (10.2, 4.0); leave blank for cpu.
    /// Defaults to $GPU_ARCH_VERSION, then ""
    #[arg(long)]
    gpu_arch_version: Option<String>,

    /// Which version form to produce
    #[arg(long, value_enum, default_value_t = Channel::Auto)]
    channel: Channel,

    /// Root of the checkout to version
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Base-version file, relative to the root
    #[arg(long, default_value = "version.txt")]
    version_file: PathBuf,

    /// Log debug detail to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Channel {
    /// Release when exactly on a tag, nightly otherwise
    Auto,
    /// Release form; fails when the checkout is not on a tag
    Release,
    /// Nightly form, regardless of tag state
    Nightly,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // All diagnostics go to stderr; stdout carries only the version string.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let variant = BuildVariant {
        gpu_arch_type: cli
            .gpu_arch_type
            .or_else(|| env::var("GPU_ARCH_TYPE").ok())
            .unwrap_or_else(|| "cpu".to_string()),
        gpu_arch_version: cli
            .gpu_arch_version
            .or_else(|| env::var("GPU_ARCH_VERSION").ok())
            .unwrap_or_default(),
        with_suffix: !cli.no_build_suffix,
    };

    let resolver = VersionResolver::new(cli.root, &cli.version_file);

    let version = match cli.channel {
        Channel::Auto => resolver.resolve(&variant)?,
        Channel::Release => resolver.release_version(&variant)?,
        Channel::Nightly => resolver.nightly_version(&variant)?,
    };

    println!("{version}");
    Ok(())
}
