//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

pub use crate::commands::archive::{CompressArgs, UncompressArgs};
pub use crate::commands::backup::BackupArgs;
pub use crate::commands::list::ListArgs;
pub use crate::commands::restore::RestoreArgs;

/// gzbak - timestamped .tar.gz backups of project directories
#[derive(Parser, Debug)]
#[command(name = "gzbak")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to gzbak.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up a project directory as <project>.<timestamp>.tar.gz
    Backup(BackupArgs),

    /// Replace a project directory with the contents of a backup
    Restore(RestoreArgs),

    /// List backups in a directory
    List(ListArgs),

    /// Compress a directory or file into a .tar.gz archive
    Compress(CompressArgs),

    /// Extract a .tar.gz archive
    Uncompress(UncompressArgs),

    /// Show version information
    Version(VersionArgs),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_backup() {
        let cli = Cli::try_parse_from([
            "gzbak", "backup", "./site", "-p", "site", "-o", "/backups", "--compression", "9",
        ])
        .unwrap();

        match cli.command {
            Commands::Backup(args) => {
                assert_eq!(args.source, "./site");
                assert_eq!(args.project, "site");
                assert_eq!(args.output.as_deref(), Some(Utf8Path::new("/backups")));
                assert_eq!(args.compression, Some(9));
            }
            other => panic!("expected backup, got {other:?}"),
        }
    }

    #[test]
    fn test_backup_requires_project() {
        assert!(Cli::try_parse_from(["gzbak", "backup", "./site"]).is_err());
    }

    #[test]
    fn test_backup_rejects_out_of_range_compression() {
        for level in ["0", "10"] {
            assert!(Cli::try_parse_from([
                "gzbak",
                "backup",
                "./site",
                "-p",
                "site",
                "--compression",
                level
            ])
            .is_err());
        }
    }

    #[test]
    fn test_parse_restore_with_global_flags() {
        let cli = Cli::try_parse_from([
            "gzbak",
            "restore",
            "site.20240101000000.tar.gz",
            "-d",
            "/srv",
            "-y",
            "-vv",
            "-c",
            "custom.yaml",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some(Utf8Path::new("custom.yaml")));
        match cli.command {
            Commands::Restore(args) => {
                assert_eq!(args.archive, "site.20240101000000.tar.gz");
                assert_eq!(args.destination.as_deref(), Some(Utf8Path::new("/srv")));
                assert!(args.yes);
            }
            other => panic!("expected restore, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_and_codec_commands() {
        let cli = Cli::try_parse_from(["gzbak", "list", "-p", "site", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List(ListArgs { json: true, .. })
        ));

        let cli = Cli::try_parse_from(["gzbak", "compress", "src", "out.tar.gz"]).unwrap();
        assert!(matches!(cli.command, Commands::Compress(_)));

        let cli = Cli::try_parse_from(["gzbak", "uncompress", "out.tar.gz", "dest"]).unwrap();
        assert!(matches!(cli.command, Commands::Uncompress(_)));
    }
}
