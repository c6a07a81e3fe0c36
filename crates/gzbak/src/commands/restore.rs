//! Restore command

use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use gzbak_backup::{BackupManager, BackupName, GzipTarCodec};
use gzbak_core::GzbakConfig;

use super::resolve_dir;
use crate::output;

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Backup archive named <project>.<YYYYMMDDHHMMSS>.tar.gz
    pub archive: Utf8PathBuf,

    /// Directory the project directory is restored into
    #[arg(short, long, env = "GZBAK_RESTORE_DIR")]
    pub destination: Option<Utf8PathBuf>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub fn run(args: RestoreArgs, config: &GzbakConfig) -> Result<()> {
    output::header("Restore Project");

    // The target is wiped before extraction, so refuse to start without a readable archive.
    if !args.archive.is_file() {
        bail!("Backup archive not found: {}", args.archive);
    }

    let name = BackupName::from_path(&args.archive).ok_or_else(|| {
        anyhow!(
            "{} is not a backup archive (expected <project>.<YYYYMMDDHHMMSS>.tar.gz)",
            args.archive
        )
    })?;
    let destination = resolve_dir(args.destination.as_deref(), config.restore_dir());
    let target = destination.join(name.project());

    output::kv("Archive", args.archive.as_str());
    output::kv("Project", name.project());
    if let Some(created) = name.created_at() {
        output::kv("Created", &created.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    output::kv("Target", target.as_str());
    println!();

    if target.exists() {
        output::warning(&format!("Existing {} will be deleted", target));
    }

    if !args.yes {
        use dialoguer::Confirm;
        if !Confirm::new()
            .with_prompt("Proceed with restore?")
            .default(false)
            .interact()?
        {
            output::info("Restore cancelled");
            return Ok(());
        }
    }

    let manager = BackupManager::new(GzipTarCodec::new());

    let spinner = output::spinner("Extracting...");
    let result = manager.restore(&args.archive, &destination);
    spinner.finish_and_clear();
    let result = result.with_context(|| format!("Failed to restore {}", args.archive))?;

    output::success("Restore completed successfully");
    println!();
    output::kv("Location", result.target.as_str());
    output::kv("Files", &result.stats.files.to_string());
    output::kv("Directories", &result.stats.directories.to_string());
    output::kv("Size", &output::format_bytes(result.stats.bytes));
    output::kv(
        "Duration",
        &format!("{:.1}s", result.duration.as_secs_f64()),
    );

    Ok(())
}
