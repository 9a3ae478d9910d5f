// Upload lifecycle controller.
//
// The controller is owned by the front-end's event loop and is the only
// writer of upload state. A started upload runs its network steps on a
// worker thread; the worker never touches this struct and only reports
// `TransferEvent`s, which the event loop feeds back through
// `handle_transfer_event`. Rendering code reads `snapshot()`.

use crate::api::{CreateUploadRequest, UploadTransport};
use crate::clipboard::Clipboard;
use crate::file::FileHandle;
use crate::notification::Notifier;
use crate::progress::{percent_from_fraction, quantize_to_tens};
use crate::shell::{ShellSignal, ShellSink};
use anyhow::Result;
use std::sync::Arc;
use std::thread;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const SUCCESS_TITLE: &str = "Upload succeeded!";
pub const SUCCESS_BODY: &str = "The file URL was copied to your clipboard!";

/// Identifies one started upload. Events carrying an older id belong to
/// a cancelled or superseded upload and are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadId(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading,
    /// Transient while `cancel` runs; never observable between events.
    Cancelling,
    Failed { reason: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum TransferEventKind {
    Progress(f64),
    Completed { download_url: String },
    Failed(String),
    /// The worker noticed the cancellation and stopped.
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransferEvent {
    pub upload: UploadId,
    pub kind: TransferEventKind,
}

/// Where the worker sends its events; usually a channel into the event loop.
pub type TransferReporter = Arc<dyn Fn(TransferEvent) + Send + Sync>;

/// Read-only view handed to the rendering layer.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadSnapshot {
    pub state: UploadState,
    pub queue: Vec<FileHandle>,
    pub progress: u8,
    pub last_download_url: Option<String>,
}

pub struct UploadController {
    transport: Arc<dyn UploadTransport>,
    clipboard: Box<dyn Clipboard>,
    notifier: Box<dyn Notifier>,
    shell: Box<dyn ShellSink>,
    reporter: TransferReporter,

    state: UploadState,
    queue: Vec<FileHandle>,
    progress: u8,
    emitted: Option<u8>,
    cancel: Option<CancellationToken>,
    current: UploadId,
    last_download_url: Option<String>,
}

impl UploadController {
    pub fn new(
        transport: Arc<dyn UploadTransport>,
        clipboard: Box<dyn Clipboard>,
        notifier: Box<dyn Notifier>,
        shell: Box<dyn ShellSink>,
        reporter: TransferReporter,
    ) -> Self {
        UploadController {
            transport,
            clipboard,
            notifier,
            shell,
            reporter,
            state: UploadState::Idle,
            queue: Vec::new(),
            progress: 0,
            emitted: None,
            cancel: None,
            current: UploadId::default(),
            last_download_url: None,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn queue(&self) -> &[FileHandle] {
        &self.queue
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn current_upload(&self) -> UploadId {
        self.current
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        UploadSnapshot {
            state: self.state.clone(),
            queue: self.queue.clone(),
            progress: self.progress,
            last_download_url: self.last_download_url.clone(),
        }
    }

    /// Start uploading. The whole selection becomes the queue but only
    /// the first file is transferred.
    ///
    /// Fails without touching state when `files` is empty or another
    /// upload is still in flight.
    pub fn start_upload(&mut self, files: Vec<FileHandle>) -> Result<UploadId> {
        if self.state == UploadState::Uploading {
            anyhow::bail!("An upload is already in progress");
        }
        let Some(first) = files.first().cloned() else {
            anyhow::bail!("No file selected");
        };
        if files.len() > 1 {
            warn!(
                "{} files selected, only {} will be uploaded",
                files.len(),
                first.name
            );
        }

        self.current = UploadId(self.current.0 + 1);
        self.progress = 0;
        self.emitted = None;
        self.queue = files;
        self.state = UploadState::Uploading;
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        info!(upload = self.current.0, name = %first.name, size = first.size, "upload started");
        spawn_transfer(
            self.current,
            first,
            Arc::clone(&self.transport),
            token,
            Arc::clone(&self.reporter),
        );
        Ok(self.current)
    }

    /// Apply one event reported by a transfer worker.
    pub fn handle_transfer_event(&mut self, event: TransferEvent) {
        if event.upload != self.current || self.state != UploadState::Uploading {
            debug!(?event, "ignoring stale transfer event");
            return;
        }
        match event.kind {
            TransferEventKind::Progress(fraction) => self.on_progress(fraction),
            TransferEventKind::Completed { download_url } => self.on_completed(download_url),
            TransferEventKind::Failed(reason) => self.fail(reason),
            TransferEventKind::Cancelled => {
                // Only reachable if the token fired without `cancel`.
                self.fail("Upload cancelled".into());
            }
        }
    }

    fn on_progress(&mut self, fraction: f64) {
        let Some(percent) = percent_from_fraction(fraction) else {
            return;
        };
        self.progress = self.progress.max(percent);
        let tens = quantize_to_tens(self.progress);
        if self.emitted != Some(tens) {
            self.emitted = Some(tens);
            self.shell.emit(ShellSignal::Progress { progress: tens });
        }
    }

    fn on_completed(&mut self, download_url: String) {
        // The file is stored either way; keep the link even if copying fails.
        self.last_download_url = Some(download_url.clone());
        if let Err(e) = self.clipboard.write_text(&download_url) {
            self.fail(format!("{e:#} (link: {download_url})"));
            return;
        }
        info!(upload = self.current.0, %download_url, "upload finished, link copied");

        if self.notifier.permission().is_granted() {
            if let Err(e) = self.notifier.send(SUCCESS_TITLE, SUCCESS_BODY) {
                warn!("{e:#}");
            }
        }

        // Success drops the token without firing it.
        self.cancel = None;
        self.queue.clear();
        self.state = UploadState::Idle;
    }

    fn fail(&mut self, reason: String) {
        warn!(upload = self.current.0, "upload failed: {reason}");
        self.cancel = None;
        self.reset_progress();
        self.queue.clear();
        self.state = UploadState::Failed { reason };
    }

    /// Abort the in-flight upload, if any, and reset immediately without
    /// waiting for the transport to acknowledge.
    pub fn cancel(&mut self) {
        self.state = UploadState::Cancelling;
        if let Some(token) = self.cancel.take() {
            info!(upload = self.current.0, "upload cancelled");
            token.cancel();
        }
        self.reset_progress();
        self.queue.clear();
        self.state = UploadState::Idle;
    }

    fn reset_progress(&mut self) {
        self.progress = 0;
        self.emitted = Some(0);
        self.shell.emit(ShellSignal::Progress { progress: 0 });
    }

    /// Leave the `Failed` state.
    pub fn dismiss(&mut self) {
        if matches!(self.state, UploadState::Failed { .. }) {
            self.state = UploadState::Idle;
        }
    }

    /// Ask the host shell to quit. No cleanup happens here.
    pub fn quit(&mut self) {
        self.shell.emit(ShellSignal::Quit);
    }
}

fn spawn_transfer(
    upload: UploadId,
    file: FileHandle,
    transport: Arc<dyn UploadTransport>,
    cancel: CancellationToken,
    reporter: TransferReporter,
) {
    thread::spawn(move || {
        let kind = run_transfer(upload, &file, transport.as_ref(), &cancel, &reporter);
        reporter(TransferEvent { upload, kind });
    });
}

fn run_transfer(
    upload: UploadId,
    file: &FileHandle,
    transport: &dyn UploadTransport,
    cancel: &CancellationToken,
    reporter: &TransferReporter,
) -> TransferEventKind {
    let urls = match transport.create_upload_url(&CreateUploadRequest::from(file)) {
        Ok(urls) => urls,
        Err(e) => return TransferEventKind::Failed(format!("{e:#}")),
    };
    if cancel.is_cancelled() {
        return TransferEventKind::Cancelled;
    }

    let progress_reporter = Arc::clone(reporter);
    let result = transport.put_file(
        &urls.signed_url,
        file,
        cancel,
        Box::new(move |fraction: f64| {
            progress_reporter(TransferEvent {
                upload,
                kind: TransferEventKind::Progress(fraction),
            })
        }),
    );
    match result {
        _ if cancel.is_cancelled() => TransferEventKind::Cancelled,
        Ok(()) => TransferEventKind::Completed {
            download_url: urls.download_url,
        },
        Err(e) => TransferEventKind::Failed(format!("{e:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ProgressFn, UploadUrls};
    use crate::notification::NotificationPermission;
    use std::sync::mpsc::{self, Receiver};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Transport answering from fixed data. `block` makes `put_file`
    /// wait for cancellation instead of finishing; `negotiate_delay` slows
    /// down `create_upload_url`.
    struct FakeTransport {
        urls: Result<UploadUrls, String>,
        fractions: Vec<f64>,
        put_result: Result<(), String>,
        block: bool,
        negotiate_delay: Duration,
        requests: Mutex<Vec<CreateUploadRequest>>,
        puts: Mutex<Vec<(String, String)>>,
    }

    impl FakeTransport {
        fn ok(fractions: Vec<f64>) -> Self {
            FakeTransport {
                urls: Ok(UploadUrls {
                    signed_url: "https://s3/x".into(),
                    download_url: "https://cdn/y".into(),
                }),
                fractions,
                put_result: Ok(()),
                block: false,
                negotiate_delay: Duration::ZERO,
                requests: Mutex::new(Vec::new()),
                puts: Mutex::new(Vec::new()),
            }
        }
    }

    impl UploadTransport for FakeTransport {
        fn create_upload_url(&self, req: &CreateUploadRequest) -> Result<UploadUrls> {
            self.requests.lock().unwrap().push(req.clone());
            thread::sleep(self.negotiate_delay);
            self.urls.clone().map_err(|e| anyhow::anyhow!(e))
        }

        fn put_file(
            &self,
            signed_url: &str,
            file: &FileHandle,
            cancel: &CancellationToken,
            mut on_progress: ProgressFn,
        ) -> Result<()> {
            self.puts
                .lock()
                .unwrap()
                .push((signed_url.to_string(), file.name.clone()));
            for f in &self.fractions {
                on_progress(*f);
            }
            if self.block {
                while !cancel.is_cancelled() {
                    thread::sleep(Duration::from_millis(2));
                }
                anyhow::bail!("aborted");
            }
            self.put_result.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingClipboard(Arc<Mutex<Vec<String>>>);

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&mut self, _text: &str) -> Result<()> {
            anyhow::bail!("no display")
        }
    }

    #[derive(Clone)]
    struct RecordingNotifier {
        permission: Arc<Mutex<NotificationPermission>>,
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl RecordingNotifier {
        fn with(permission: NotificationPermission) -> Self {
            RecordingNotifier {
                permission: Arc::new(Mutex::new(permission)),
                sent: Arc::default(),
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn permission(&self) -> NotificationPermission {
            *self.permission.lock().unwrap()
        }

        fn send(&self, title: &str, body: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<ShellSignal>>>);

    impl ShellSink for RecordingSink {
        fn emit(&mut self, signal: ShellSignal) {
            self.0.lock().unwrap().push(signal);
        }
    }

    struct Harness {
        controller: UploadController,
        events: Receiver<TransferEvent>,
        transport: Arc<FakeTransport>,
        clipboard: RecordingClipboard,
        notifier: RecordingNotifier,
        signals: RecordingSink,
    }

    impl Harness {
        fn new(transport: FakeTransport, permission: NotificationPermission) -> Self {
            let (tx, events) = mpsc::channel();
            let reporter: TransferReporter = Arc::new(move |ev: TransferEvent| {
                let _ = tx.send(ev);
            });
            let transport = Arc::new(transport);
            let clipboard = RecordingClipboard::default();
            let notifier = RecordingNotifier::with(permission);
            let signals = RecordingSink::default();
            let controller = UploadController::new(
                transport.clone(),
                Box::new(clipboard.clone()),
                Box::new(notifier.clone()),
                Box::new(signals.clone()),
                reporter,
            );
            Harness {
                controller,
                events,
                transport,
                clipboard,
                notifier,
                signals,
            }
        }

        /// Feed worker events until the controller leaves `Uploading`.
        fn run_to_end(&mut self) {
            while *self.controller.state() == UploadState::Uploading {
                let ev = self
                    .events
                    .recv_timeout(Duration::from_secs(5))
                    .expect("transfer worker went silent");
                self.controller.handle_transfer_event(ev);
            }
        }

        fn signals(&self) -> Vec<ShellSignal> {
            self.signals.0.lock().unwrap().clone()
        }
    }

    fn file(name: &str, content_type: &str) -> FileHandle {
        FileHandle {
            path: format!("/tmp/{name}").into(),
            name: name.into(),
            content_type: content_type.into(),
            size: 100,
        }
    }

    #[test]
    fn report_pdf_scenario() {
        let mut h = Harness::new(FakeTransport::ok(vec![0.34]), NotificationPermission::Granted);
        let pdf = file("report.pdf", "application/pdf");

        h.controller.start_upload(vec![pdf.clone()]).unwrap();
        assert_eq!(*h.controller.state(), UploadState::Uploading);
        assert_eq!(h.controller.queue(), &[pdf]);

        let progress = h.events.recv_timeout(Duration::from_secs(5)).unwrap();
        h.controller.handle_transfer_event(progress);
        assert_eq!(h.controller.progress(), 34);
        assert_eq!(h.signals(), vec![ShellSignal::Progress { progress: 30 }]);

        h.run_to_end();
        assert_eq!(*h.controller.state(), UploadState::Idle);
        assert!(h.controller.queue().is_empty());
        assert_eq!(h.controller.progress(), 34);
        assert_eq!(*h.clipboard.0.lock().unwrap(), vec!["https://cdn/y".to_string()]);
        assert_eq!(
            h.controller.snapshot().last_download_url.as_deref(),
            Some("https://cdn/y")
        );

        let requests = h.transport.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![CreateUploadRequest {
                name: "report.pdf".into(),
                content_type: "application/pdf".into(),
            }]
        );
        assert_eq!(
            *h.transport.puts.lock().unwrap(),
            vec![("https://s3/x".to_string(), "report.pdf".to_string())]
        );
        assert_eq!(
            *h.notifier.sent.lock().unwrap(),
            vec![(SUCCESS_TITLE.to_string(), SUCCESS_BODY.to_string())]
        );
    }

    #[test]
    fn only_first_of_many_files_is_transferred() {
        let mut h = Harness::new(FakeTransport::ok(vec![]), NotificationPermission::Denied);
        let files = vec![file("a.txt", "text/plain"), file("b.txt", "text/plain")];

        h.controller.start_upload(files.clone()).unwrap();
        assert_eq!(h.controller.snapshot().queue, files);

        h.run_to_end();
        let puts = h.transport.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].1, "a.txt");
    }

    #[test]
    fn progress_is_monotonic_and_signals_dedupe() {
        let fractions = vec![0.0, f64::NAN, 0.05, 0.12, 0.18, 0.10, 0.25, 1.0];
        let mut h = Harness::new(FakeTransport::ok(fractions), NotificationPermission::Denied);
        h.controller.start_upload(vec![file("a.bin", "application/octet-stream")]).unwrap();

        let mut seen = Vec::new();
        while *h.controller.state() == UploadState::Uploading {
            let ev = h.events.recv_timeout(Duration::from_secs(5)).unwrap();
            h.controller.handle_transfer_event(ev);
            seen.push(h.controller.progress());
        }

        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
        assert_eq!(h.controller.progress(), 100);
        assert_eq!(
            h.signals(),
            vec![
                ShellSignal::Progress { progress: 0 },
                ShellSignal::Progress { progress: 10 },
                ShellSignal::Progress { progress: 20 },
                ShellSignal::Progress { progress: 100 },
            ]
        );
    }

    #[test]
    fn cancel_resets_without_waiting_for_transport() {
        let mut transport = FakeTransport::ok(vec![0.5]);
        transport.block = true;
        let mut h = Harness::new(transport, NotificationPermission::Granted);
        let id = h.controller.start_upload(vec![file("big.iso", "application/octet-stream")]).unwrap();

        let ev = h.events.recv_timeout(Duration::from_secs(5)).unwrap();
        h.controller.handle_transfer_event(ev);
        assert_eq!(h.controller.progress(), 50);

        h.controller.cancel();
        assert_eq!(*h.controller.state(), UploadState::Idle);
        assert!(h.controller.queue().is_empty());
        assert_eq!(h.controller.progress(), 0);
        assert_eq!(h.signals().last(), Some(&ShellSignal::Progress { progress: 0 }));

        // The worker acknowledges late; that must not change anything.
        let late = h.events.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(late.upload, id);
        assert_eq!(late.kind, TransferEventKind::Cancelled);
        h.controller.handle_transfer_event(late);
        h.controller.handle_transfer_event(TransferEvent {
            upload: id,
            kind: TransferEventKind::Completed {
                download_url: "https://cdn/late".into(),
            },
        });
        assert_eq!(*h.controller.state(), UploadState::Idle);
        assert!(h.clipboard.0.lock().unwrap().is_empty());
        assert!(h.notifier.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn cancel_while_idle_still_emits_reset() {
        let mut h = Harness::new(FakeTransport::ok(vec![]), NotificationPermission::Denied);
        h.controller.cancel();
        assert_eq!(*h.controller.state(), UploadState::Idle);
        assert_eq!(h.signals(), vec![ShellSignal::Progress { progress: 0 }]);
    }

    #[test]
    fn negotiation_failure_enters_failed_with_reset() {
        let mut transport = FakeTransport::ok(vec![]);
        transport.urls = Err("Upload url request failed: 500".into());
        let mut h = Harness::new(transport, NotificationPermission::Granted);

        h.controller.start_upload(vec![file("a.txt", "text/plain")]).unwrap();
        h.run_to_end();

        match h.controller.state() {
            UploadState::Failed { reason } => assert!(reason.contains("500"), "{reason}"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(h.controller.queue().is_empty());
        assert_eq!(h.controller.progress(), 0);
        assert_eq!(h.signals(), vec![ShellSignal::Progress { progress: 0 }]);
        assert!(h.transport.puts.lock().unwrap().is_empty());
        assert!(h.clipboard.0.lock().unwrap().is_empty());

        h.controller.dismiss();
        assert_eq!(*h.controller.state(), UploadState::Idle);
    }

    #[test]
    fn transfer_failure_enters_failed() {
        let mut transport = FakeTransport::ok(vec![0.4]);
        transport.put_result = Err("Upload failed: 403 Forbidden".into());
        let mut h = Harness::new(transport, NotificationPermission::Granted);

        h.controller.start_upload(vec![file("a.txt", "text/plain")]).unwrap();
        h.run_to_end();

        assert!(matches!(h.controller.state(), UploadState::Failed { .. }));
        assert_eq!(h.controller.progress(), 0);
        assert!(h.notifier.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn clipboard_failure_enters_failed() {
        let mut h = Harness::new(FakeTransport::ok(vec![]), NotificationPermission::Granted);
        h.controller.clipboard = Box::new(BrokenClipboard);

        h.controller.start_upload(vec![file("a.txt", "text/plain")]).unwrap();
        h.run_to_end();

        match h.controller.state() {
            UploadState::Failed { reason } => {
                assert!(reason.contains("no display"), "{reason}");
                assert!(reason.contains("https://cdn/y"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            h.controller.snapshot().last_download_url.as_deref(),
            Some("https://cdn/y")
        );
        assert!(h.notifier.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn cancel_during_negotiation_skips_the_put() {
        let mut transport = FakeTransport::ok(vec![0.5]);
        transport.negotiate_delay = Duration::from_millis(200);
        let mut h = Harness::new(transport, NotificationPermission::Granted);
        let id = h.controller.start_upload(vec![file("a.txt", "text/plain")]).unwrap();

        h.controller.cancel();
        assert_eq!(*h.controller.state(), UploadState::Idle);

        let late = h.events.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(late.upload, id);
        assert_eq!(late.kind, TransferEventKind::Cancelled);
        h.controller.handle_transfer_event(late);

        assert_eq!(*h.controller.state(), UploadState::Idle);
        assert_eq!(h.transport.requests.lock().unwrap().len(), 1);
        assert!(h.transport.puts.lock().unwrap().is_empty());
        assert!(h.clipboard.0.lock().unwrap().is_empty());
        assert_eq!(h.signals(), vec![ShellSignal::Progress { progress: 0 }]);
    }

    #[test]
    fn notification_follows_permission_at_completion() {
        let mut h = Harness::new(FakeTransport::ok(vec![]), NotificationPermission::Unset);
        h.controller.start_upload(vec![file("a.txt", "text/plain")]).unwrap();
        h.run_to_end();
        assert!(h.notifier.sent.lock().unwrap().is_empty());
        assert_eq!(h.clipboard.0.lock().unwrap().len(), 1);

        *h.notifier.permission.lock().unwrap() = NotificationPermission::Granted;
        h.controller.start_upload(vec![file("b.txt", "text/plain")]).unwrap();
        h.run_to_end();
        assert_eq!(h.notifier.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn start_rejected_while_uploading_and_for_empty_selection() {
        let mut transport = FakeTransport::ok(vec![]);
        transport.block = true;
        let mut h = Harness::new(transport, NotificationPermission::Denied);

        assert!(h.controller.start_upload(vec![]).is_err());
        assert_eq!(*h.controller.state(), UploadState::Idle);

        let first = file("first.txt", "text/plain");
        h.controller.start_upload(vec![first.clone()]).unwrap();
        assert!(h
            .controller
            .start_upload(vec![file("second.txt", "text/plain")])
            .is_err());
        assert_eq!(h.controller.queue(), &[first]);

        h.controller.cancel();
    }

    #[test]
    fn new_upload_resets_progress_and_supersedes_old_events() {
        let mut h = Harness::new(FakeTransport::ok(vec![0.8]), NotificationPermission::Denied);
        let first = h.controller.start_upload(vec![file("a.txt", "text/plain")]).unwrap();
        h.run_to_end();
        assert_eq!(h.controller.progress(), 80);

        let second = h.controller.start_upload(vec![file("b.txt", "text/plain")]).unwrap();
        assert!(second > first);
        assert_eq!(h.controller.progress(), 0);

        h.controller.handle_transfer_event(TransferEvent {
            upload: first,
            kind: TransferEventKind::Failed("old".into()),
        });
        assert_eq!(*h.controller.state(), UploadState::Uploading);
        h.run_to_end();
        assert_eq!(*h.controller.state(), UploadState::Idle);
    }

    #[test]
    fn quit_only_signals_the_shell() {
        let mut h = Harness::new(FakeTransport::ok(vec![]), NotificationPermission::Denied);
        h.controller.quit();
        assert_eq!(h.signals(), vec![ShellSignal::Quit]);
        assert_eq!(*h.controller.state(), UploadState::Idle);
    }
}
