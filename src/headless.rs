// Headless front-end: `rabbithole upload <FILE>...`.
//
// Runs the same controller as the interactive screen, once, with an
// `indicatif` bar on stderr. Shell signals either go to the log or, with
// `--emit-signals`, to stdout as JSON lines for a supervising process.

use crate::api::UploadTransport;
use crate::clipboard::Clipboard;
use crate::controller::{TransferEvent, TransferReporter, UploadController, UploadState};
use crate::file::FileHandle;
use crate::notification::Notifier;
use crate::shell::{JsonLinesSink, LogSink, ShellSink};
use crate::ui::queue_label;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use tracing::{info, warn};

/// JSON lines on stdout with `--emit-signals`, otherwise the log.
pub fn signal_sink(emit_signals: bool) -> Box<dyn ShellSink> {
    if emit_signals {
        Box::new(JsonLinesSink::new(std::io::stdout()))
    } else {
        Box::new(LogSink)
    }
}

/// Upload the first of `paths` and return its download URL.
pub fn run_upload(
    transport: Arc<dyn UploadTransport>,
    clipboard: Box<dyn Clipboard>,
    notifier: Box<dyn Notifier>,
    shell: Box<dyn ShellSink>,
    paths: &[PathBuf],
) -> Result<String> {
    let files = open_selection(paths)?;

    let (tx, rx) = mpsc::channel();
    let reporter: TransferReporter = Arc::new(move |ev: TransferEvent| {
        let _ = tx.send(ev);
    });
    let mut controller = UploadController::new(transport, clipboard, notifier, shell, reporter);

    controller.start_upload(files)?;

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:30}] {pos:>3}%")?.progress_chars("=> "),
    );
    bar.set_message(queue_label(controller.queue()));

    loop {
        let event = rx
            .recv()
            .context("Transfer worker stopped without reporting")?;
        controller.handle_transfer_event(event);
        bar.set_position(u64::from(controller.progress()));

        let snapshot = controller.snapshot();
        match snapshot.state {
            UploadState::Uploading | UploadState::Cancelling => continue,
            UploadState::Idle => {
                bar.finish_and_clear();
                let url = snapshot
                    .last_download_url
                    .context("Upload finished without a download URL")?;
                info!(%url, "headless upload done");
                return Ok(url);
            }
            UploadState::Failed { reason } => {
                bar.abandon();
                anyhow::bail!(reason);
            }
        }
    }
}

/// The first path is the one transferred and must open. The others only
/// fill the queue, so one that cannot be opened is skipped with a warning.
fn open_selection(paths: &[PathBuf]) -> Result<Vec<FileHandle>> {
    let (first, rest) = paths.split_first().context("No file selected")?;
    let mut files = vec![FileHandle::open(first)?];
    for path in rest {
        match FileHandle::open(path) {
            Ok(file) => files.push(file),
            Err(e) => warn!("Skipping {}: {e:#}", path.display()),
        }
    }
    Ok(files)
}
