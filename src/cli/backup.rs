//! Backup CLI command
//!
//! Validates the environment, then runs the backup pipeline and reports
//! progress on stdout.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::backup::{BackupOutcome, BackupPipeline, PipelineEvent};
use crate::config::paths::DayOnePaths;
use crate::config::settings::Settings;
use crate::display::{format_entry, format_size};
use crate::error::{BackupError, BackupResult};
use crate::journal::PREVIEW_LIMIT;

/// The only operating system Day One keeps this data layout on
pub const SUPPORTED_OS: &str = "macos";

/// Arguments of a backup run
#[derive(Args, Debug, Clone, Default)]
pub struct BackupArgs {
    /// Directory of backup destination
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Directory name of backup files: $dest/$name/backup_files [default: Dayone2Backup]
    #[arg(short = 'n', long = "dir_name", value_name = "STRING")]
    pub dir_name: Option<String>,

    /// Max history backups remained [default: 5]
    #[arg(short, long = "max_backups", value_name = "NUMBER")]
    pub max_backups: Option<u32>,

    /// Skip reading the newest entries back from the copied database
    #[arg(long)]
    pub skip_preview: bool,
}

/// Run a full backup: validate, then drive the pipeline
pub fn run_backup(args: BackupArgs) -> BackupResult<BackupOutcome> {
    println!("Backup starting ...");
    println!("Backup validating ...");

    let settings = Settings::load_or_default(Settings::default_file().as_deref())?
        .with_overrides(args.dir_name, args.max_backups);
    settings.validate()?;

    let paths = DayOnePaths::new()?;
    let destination = validate(args.dest.as_deref(), std::env::consts::OS, &paths)?;

    let pipeline = BackupPipeline::new(paths, destination, settings)
        .with_preview(!args.skip_preview);
    let outcome = pipeline.run(&mut print_event)?;

    if !args.skip_preview {
        if outcome.entries.is_empty() {
            println!("No entries written this year.");
        }
        for entry in &outcome.entries {
            println!("{}", format_entry(entry));
        }
    }

    println!();
    println!("Backup complete: {}", outcome.instance.display());
    println!("Old backups deleted: {}", outcome.deleted.len());
    println!(
        "Photo archive: {} ({})",
        outcome.archive.path.display(),
        format_size(outcome.archive.size_bytes)
    );

    Ok(outcome)
}

/// Check the preconditions of a run, in order
///
/// Returns the destination directory. Nothing is written before all checks pass.
pub fn validate(dest: Option<&Path>, os: &str, paths: &DayOnePaths) -> BackupResult<PathBuf> {
    let dest = dest.ok_or_else(|| BackupError::Precondition("No destination specified!".into()))?;

    if !dest.is_dir() {
        return Err(BackupError::Precondition(format!(
            "Destination is not a directory: {}",
            dest.display()
        )));
    }

    if os != SUPPORTED_OS {
        return Err(BackupError::Precondition("Only MacOS supported!".into()));
    }

    if !paths.data_dir().is_dir() {
        return Err(BackupError::Precondition(format!(
            "No Dayone2 data found, files shall be: {}",
            paths.data_dir().display()
        )));
    }

    Ok(dest.to_path_buf())
}

fn print_event(event: PipelineEvent) {
    match event {
        PipelineEvent::PreparingDestination => println!("Preparing backup destination ..."),
        PipelineEvent::OldBackupDeleted(path) => {
            println!("Old backup deleted: {}", path.display())
        }
        PipelineEvent::InstanceCreated(path) => {
            println!("Backup destination generated: {}", path.display())
        }
        PipelineEvent::CopyingFiles => println!("Backup files ..."),
        PipelineEvent::FilesCopied(report) => println!(
            "Files copied: {} file(s), {}",
            report.files,
            format_size(report.bytes)
        ),
        PipelineEvent::Compressing(_) => {
            println!("Start packing & compressing photo files ...")
        }
        PipelineEvent::Archived(_) => {
            println!("Photo tar file done, tmp photo files cleared ...")
        }
        PipelineEvent::LoadingEntries(path) => {
            println!("Loading backup db: {}", path.display());
            println!("Read latest {} entries:", PREVIEW_LIMIT);
        }
    }
}
