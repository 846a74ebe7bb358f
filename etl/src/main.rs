use clap::{Arg, ArgAction, Command};
use common::config::Settings;
use notification::Notifier;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let matches = Command::new("Energy Usage ELT")
        .version("1.0")
        .about("Downloads gas/electricity usage files, uploads them to S3 and loads the warehouse")
        .subcommand(
            Command::new("files").about("Download, transform and upload the configured data files"),
        )
        .subcommand(Command::new("load").about("Load the processed files into the warehouse"))
        .subcommand(
            Command::new("run")
                .about("Run file processing and the warehouse load in sequence")
                .arg(
                    Arg::new("skip-load")
                        .long("skip-load")
                        .action(ArgAction::SetTrue)
                        .help("Process files only, do not load the warehouse"),
                ),
        )
        .get_matches();

    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Fatal error loading configuration, execution terminated: {e}");
            process::exit(1);
        }
    };

    init_logging();

    info!("Hello from the Energy Usage ELT app.");
    let now = chrono::Local::now();
    info!(
        "The current date and time is {}.",
        now.format("%H:%M:%S on %A %d %B %Y")
    );
    common::env::log_environment();

    if !settings.is_enabled() {
        info!("The ENABLED setting is not set to Y - exiting.");
        return;
    }

    let notifier = Notifier::new(&settings).await;

    match matches.subcommand() {
        Some(("files", _)) => {
            if !run_files(&settings, &notifier).await {
                process::exit(1);
            }
        }
        Some(("load", _)) => {
            run_load(&settings).await;
        }
        Some(("run", run_matches)) => {
            // The two failure domains are independent: a failed file batch
            // still leaves previously processed files for the loader.
            let files_ok = run_files(&settings, &notifier).await;
            if !run_matches.get_flag("skip-load") {
                run_load(&settings).await;
            }
            if files_ok {
                notifier.publish_success("File processing completed.").await;
            }
        }
        _ => {
            eprintln!("Please specify a valid subcommand: files, load or run");
            process::exit(1);
        }
    }
}

/// Returns false when the batch could not run at all (configuration defect).
async fn run_files(settings: &Settings, notifier: &Notifier) -> bool {
    match etl::run_file_pipeline(settings).await {
        Ok(summary) => {
            if summary.failed() > 0 {
                let details = format!(
                    "{} of {} files failed to process.",
                    summary.failed(),
                    summary.outcomes.len()
                );
                notifier.publish_failure(&details).await;
            }
            true
        }
        Err(e) => {
            error!(error = %e, "File processing aborted");
            notifier
                .publish_failure(&format!("File processing aborted: {e}"))
                .await;
            false
        }
    }
}

async fn run_load(settings: &Settings) {
    if let Err(e) = warehouse::run_load(settings).await {
        error!(error = %e, "Error during warehouse processing");
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    if common::env::is_running_in_container() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
