use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dayone_backup::cli::{run_backup, BackupArgs};
use dayone_backup::BackupError;

#[derive(Parser)]
#[command(
    name = "dayone-backup",
    author = "Kaylee Beyene",
    version,
    about = "Dayone2 backup application, supports only MacOS & Dayone2",
    long_about = "Copies the Day One database and photo library into a timestamped \
                  folder under the destination, compresses the photos, keeps only \
                  the newest backups and previews the latest journal entries."
)]
struct Cli {
    #[command(flatten)]
    backup: BackupArgs,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Bad flags are precondition failures; --help and --version are not.
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(cli.verbose);
    install_panic_hook();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<BackupError>()
                .map_or(2, BackupError::exit_code);
            tracing::error!(error = %err, "backup failed");
            eprintln!("Error: {:#}", err);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    run_backup(cli.backup)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "unexpected panic");
        default_hook(info);
    }));
}
