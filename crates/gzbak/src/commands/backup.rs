//! Backup command

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use gzbak_backup::{calculate_checksum, BackupManager, GzipTarCodec};
use gzbak_core::GzbakConfig;

use super::resolve_dir;
use crate::output;

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Directory (or single file) to back up
    pub source: Utf8PathBuf,

    /// Project name used in the archive file name
    #[arg(short, long)]
    pub project: String,

    /// Directory the archive is written to
    #[arg(short, long, env = "GZBAK_BACKUP_DIR")]
    pub output: Option<Utf8PathBuf>,

    /// Compression level (1-9)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=9))]
    pub compression: Option<u32>,
}

pub fn run(args: BackupArgs, config: &GzbakConfig) -> Result<()> {
    output::header("Backup Project");

    let output_dir = resolve_dir(args.output.as_deref(), config.backup_dir());
    let level = args
        .compression
        .unwrap_or_else(|| config.compression_level());

    output::kv("Project", &args.project);
    output::kv("Source", args.source.as_str());
    output::kv("Output", output_dir.as_str());
    output::kv("Compression", &level.to_string());
    println!();

    let manager = BackupManager::new(GzipTarCodec::new().with_compression_level(level));

    let spinner = output::spinner("Compressing...");
    let result = manager.create(&args.source, &args.project, &output_dir);
    spinner.finish_and_clear();
    let result = result.with_context(|| format!("Failed to back up {}", args.source))?;

    let checksum = calculate_checksum(&result.archive_path)
        .with_context(|| format!("Failed to checksum {}", result.archive_path))?;
    let size = std::fs::metadata(&result.archive_path)
        .with_context(|| format!("Failed to read {}", result.archive_path))?
        .len();

    output::success("Backup created successfully");
    println!();
    output::kv("Location", result.archive_path.as_str());
    output::kv("Files", &result.stats.files.to_string());
    output::kv("Directories", &result.stats.directories.to_string());
    output::kv("Content", &output::format_bytes(result.stats.bytes));
    output::kv("Archive size", &output::format_bytes(size));
    output::kv("SHA-256", &checksum);
    output::kv(
        "Duration",
        &format!("{:.1}s", result.duration.as_secs_f64()),
    );
    println!();

    output::info("Restore with:");
    println!("  gzbak restore {}", result.archive_path);

    Ok(())
}
