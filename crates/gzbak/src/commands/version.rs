//! Version command

use crate::cli::VersionArgs;
use crate::version::VersionInfo;
use anyhow::Result;

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info);
    println!("Library:     gzbak-backup {}", info.library);
    println!("Backup name: {}", info.name_format);
    if let Some(commit) = &info.commit {
        println!("Commit:      {}", commit);
    }

    Ok(())
}
