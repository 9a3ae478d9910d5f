// Entrypoint for the uploader.
// - Keeps `main` small: parse flags, set up logging and config, create an
//   API client and hand it to one of the two front-ends.
// - Returns `anyhow::Result` so any setup failure is printed with context.

use clap::{Parser, Subcommand};
use rabbithole_cli::api::ApiClient;
use rabbithole_cli::clipboard::{BestEffortClipboard, SystemClipboard};
use rabbithole_cli::config::Config;
use rabbithole_cli::logging::{self, LogTarget};
use rabbithole_cli::notification::{self, DesktopNotifier, NotificationPermission};
use rabbithole_cli::{headless, ui};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Drop a file, get a link.
#[derive(Parser, Debug)]
#[command(name = "rabbithole")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Upload API base URL (overrides RABBITHOLE_API_URL and the config file)
    #[arg(long, short = 's')]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload without the interactive screen and print the download URL
    Upload {
        /// File to upload; extra files are listed but not sent
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write progress/quit signals to stdout as JSON lines
        #[arg(long)]
        emit_signals: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let target = match args.command {
        None => LogTarget::File(logging::default_log_file()),
        Some(_) => LogTarget::Stderr,
    };
    logging::init(&args.log_level, target)?;

    let mut config = Config::load()?;
    config.apply_api_url_override(args.api_url.clone());
    ensure_notification_permission(&mut config)?;
    info!(api_url = %config.api_url, "starting");

    let api = ApiClient::from_config(&config)?;
    match args.command {
        None => ui::run_interactive(&config, api),
        Some(Command::Upload {
            files,
            emit_signals,
        }) => {
            // The link is printed anyway, so a missing clipboard is not fatal.
            let url = headless::run_upload(
                Arc::new(api),
                Box::new(BestEffortClipboard::new(SystemClipboard::new())),
                Box::new(DesktopNotifier::new(config.notification_permission)),
                headless::signal_sink(emit_signals),
                &files,
            )?;
            println!("{url}");
            Ok(())
        }
    }
}

/// Ask once, at startup, whether notifications may be shown. Only the
/// answer is written back; flag and env overrides stay out of the file.
fn ensure_notification_permission(config: &mut Config) -> anyhow::Result<()> {
    if config.notification_permission != NotificationPermission::Unset
        || !std::io::stdin().is_terminal()
    {
        return Ok(());
    }
    config.notification_permission = notification::request_permission()?;

    let mut stored = Config::load_from(&Config::default_path())?;
    stored.notification_permission = config.notification_permission;
    stored.save()?;
    Ok(())
}
