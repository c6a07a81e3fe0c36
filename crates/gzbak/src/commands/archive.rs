//! Direct codec access: compress and uncompress without backup naming

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use gzbak_backup::{ArchiveCodec, ArchiveStats, GzipTarCodec};
use gzbak_core::GzbakConfig;
use std::time::Instant;

use crate::output;

#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Directory or file to compress
    pub source: Utf8PathBuf,

    /// Archive to create
    pub archive: Utf8PathBuf,

    /// Compression level (1-9)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=9))]
    pub compression: Option<u32>,
}

#[derive(Args, Debug)]
pub struct UncompressArgs {
    /// Archive to extract
    pub archive: Utf8PathBuf,

    /// Destination directory (or file path for single-file archives)
    pub destination: Utf8PathBuf,
}

pub fn compress(args: CompressArgs, config: &GzbakConfig) -> Result<()> {
    let level = args
        .compression
        .unwrap_or_else(|| config.compression_level());
    let codec = GzipTarCodec::new().with_compression_level(level);

    let start = Instant::now();
    let spinner = output::spinner(&format!("Compressing {}...", args.source));
    let stats = codec.compress(&args.archive, &args.source);
    spinner.finish_and_clear();
    let stats = stats.with_context(|| format!("Failed to compress {}", args.source))?;

    output::success(&format!("Created {}", args.archive));
    print_stats(&stats, start);
    Ok(())
}

pub fn uncompress(args: UncompressArgs) -> Result<()> {
    let codec = GzipTarCodec::new();

    let start = Instant::now();
    let spinner = output::spinner(&format!("Extracting {}...", args.archive));
    let stats = codec.uncompress(&args.archive, &args.destination);
    spinner.finish_and_clear();
    let stats = stats.with_context(|| format!("Failed to extract {}", args.archive))?;

    output::success(&format!("Extracted into {}", args.destination));
    print_stats(&stats, start);
    Ok(())
}

fn print_stats(stats: &ArchiveStats, start: Instant) {
    output::kv("Files", &stats.files.to_string());
    output::kv("Directories", &stats.directories.to_string());
    output::kv("Size", &output::format_bytes(stats.bytes));
    output::kv(
        "Duration",
        &format!("{:.1}s", start.elapsed().as_secs_f64()),
    );
}
