//! List command

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use gzbak_backup::{list_backups, BackupEntry};
use gzbak_core::GzbakConfig;
use serde::Serialize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use super::resolve_dir;
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory to search for backups
    #[arg(short, long, env = "GZBAK_BACKUP_DIR")]
    pub directory: Option<Utf8PathBuf>,

    /// Only show backups of this project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Tabled, Serialize)]
struct BackupRow {
    project: String,
    created: String,
    #[tabled(skip)]
    timestamp: String,
    size: String,
    #[tabled(skip)]
    size_bytes: u64,
    path: String,
}

impl From<&BackupEntry> for BackupRow {
    fn from(entry: &BackupEntry) -> Self {
        let created = entry
            .name
            .created_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| entry.name.timestamp().to_string());

        Self {
            project: entry.name.project().to_string(),
            created,
            timestamp: entry.name.timestamp().to_string(),
            size: output::format_bytes(entry.size_bytes),
            size_bytes: entry.size_bytes,
            path: entry.path.to_string(),
        }
    }
}

pub fn run(args: ListArgs, config: &GzbakConfig) -> Result<()> {
    let directory = resolve_dir(args.directory.as_deref(), config.backup_dir());

    let backups = list_backups(&directory, args.project.as_deref())
        .with_context(|| format!("Failed to list backups in {}", directory))?;
    let rows: Vec<BackupRow> = backups.iter().map(BackupRow::from).collect();

    if args.json {
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize backups")?;
        println!("{}", json);
    } else if rows.is_empty() {
        output::info(&format!("No backups found in {}", directory));
    } else {
        let table = Table::new(&rows).with(TableStyle::rounded()).to_string();
        println!("{}", table);
    }

    Ok(())
}
