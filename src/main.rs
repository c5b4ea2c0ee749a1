mod error;
mod logging;
mod registry;
mod renamer;

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Parser;
use colored::Colorize;
use log::{error, info};

use error::AppError;

const SHEET_NAME: &str = "Clients";
const ID_HEADER: &str = "ЕИК";
const NAME_HEADER: &str = "ИМЕ";
const MATCH_EXTENSION: &str = ".txt";
const VENDOR_SUBDIR: &str = "Microinvest";
const LOG_DIR: &str = "./logs";
const LOG_PREFIX: &str = "client_rename";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Client registry workbook
    #[arg(long, short = 'w', default_value = "Clients.xlsx")]
    workbook: PathBuf,

    /// Directory to scan instead of ~/Documents/Microinvest
    #[arg(long, short = 't')]
    target_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // Without the log sink there is nowhere to report, so this is the one
    // error that goes to stderr
    let log_path = match logging::init_file_logger(Path::new(LOG_DIR), LOG_PREFIX) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "{}",
        format!(
            "=== Client rename run: {} ===",
            Local::now().format("%Y-%m-%d %H:%M")
        )
        .cyan()
    );
    println!("Logging to {}", log_path.display());

    if let Err(e) = run(&args) {
        error!("{e}");
        log::logger().flush();
        std::process::exit(1);
    }

    log::logger().flush();
}

fn run(args: &Args) -> Result<(), AppError> {
    println!(
        "Step 1/2: Loading client registry from {}...",
        args.workbook.display()
    );
    let registry = registry::load_registry(&args.workbook, SHEET_NAME, ID_HEADER, NAME_HEADER)?;

    let target_dir = match &args.target_dir {
        Some(dir) => dir.clone(),
        None => dirs::home_dir()
            .ok_or(AppError::HomeDir)?
            .join("Documents")
            .join(VENDOR_SUBDIR),
    };

    println!(
        "Step 2/2: Renaming matching files in {}...",
        target_dir.display()
    );
    let report = renamer::rename_matching_files(&registry, &target_dir, MATCH_EXTENSION)?;
    renamer::print_summary(&report);

    info!(
        "File renaming completed: {} renamed, {} failed",
        report.renames.len(),
        report.failures
    );
    Ok(())
}
