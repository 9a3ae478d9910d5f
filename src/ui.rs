// UI layer: the interactive terminal screen.
//
// One event loop owns everything: it polls the terminal for keys and
// pastes (a file dragged onto the terminal window arrives as a paste),
// drains transfer and shell events from a channel, and redraws after
// anything changed. The loop is also the "host shell": a `progress`
// signal updates the terminal title and `quit` ends the loop.

use crate::api::ApiClient;
use crate::clipboard::SystemClipboard;
use crate::config::Config;
use crate::controller::{TransferEvent, TransferReporter, UploadController, UploadSnapshot, UploadState};
use crate::drop_target::{
    parse_dropped_paths, picker_for, DropOutcome, DropStatus, DropTarget, DropTargetOptions,
    FilePicker,
};
use crate::file::FileHandle;
use crate::menu::{Menu, MenuAction, Platform};
use crate::notification::DesktopNotifier;
use crate::progress::render_bar;
use crate::shell::{ChannelSink, ShellSignal};
use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const TICK: Duration = Duration::from_millis(50);
const ZONE_WIDTH: usize = 36;
const BAR_WIDTH: usize = 24;
const NAME_LIMIT: usize = 14;
const TITLE: &str = "Rabbithole";

/// Everything the event loop reacts to besides terminal input.
#[derive(Debug)]
pub enum AppEvent {
    Transfer(TransferEvent),
    Shell(ShellSignal),
}

impl From<ShellSignal> for AppEvent {
    fn from(signal: ShellSignal) -> Self {
        AppEvent::Shell(signal)
    }
}

/// Text shown while a queue is present.
///
/// Several files read `Uploading N file(s)...` even though only the
/// first one is sent.
pub fn queue_label(queue: &[FileHandle]) -> String {
    match queue {
        [] => String::new(),
        [only] => format!("Uploading {}", truncate_name(&only.name)),
        many => format!("Uploading {} file(s)...", many.len()),
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > NAME_LIMIT {
        let head: String = name.chars().take(NAME_LIMIT).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Run the interactive screen until the user quits.
pub fn run_interactive(config: &Config, api: ApiClient) -> Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let reporter: TransferReporter = {
        let tx = tx.clone();
        Arc::new(move |ev: TransferEvent| {
            let _ = tx.send(AppEvent::Transfer(ev));
        })
    };
    let mut controller = UploadController::new(
        Arc::new(api),
        Box::new(SystemClipboard::new()),
        Box::new(DesktopNotifier::new(config.notification_permission)),
        Box::new(ChannelSink::new(tx)),
        reporter,
    );
    let mut app = App::new(picker_for(config.picker))?;

    let mut terminal = TerminalGuard::enter()?;
    let mut out = io::stdout();
    info!("interactive session started");
    app.draw(&mut out, &controller.snapshot())?;

    loop {
        let mut dirty = false;
        while let Ok(ev) = rx.try_recv() {
            dirty = true;
            match ev {
                AppEvent::Transfer(ev) => controller.handle_transfer_event(ev),
                AppEvent::Shell(ShellSignal::Progress { progress }) => {
                    execute!(out, SetTitle(window_title(progress)))?;
                }
                AppEvent::Shell(ShellSignal::Quit) => {
                    info!("quit requested");
                    return Ok(());
                }
            }
        }

        if event::poll(TICK)? {
            let input = event::read()?;
            dirty |= app.handle_input(input, &mut controller, &mut terminal)?;
        }

        if dirty {
            app.draw(&mut out, &controller.snapshot())?;
        }
    }
}

/// Terminal title for an emitted progress value; idle at 0 and 100.
pub fn window_title(progress: u8) -> String {
    if progress == 0 || progress >= 100 {
        TITLE.to_string()
    } else {
        format!("{TITLE} {progress}%")
    }
}

struct App {
    drop_target: DropTarget,
    menu: Menu,
    platform: Platform,
    selected: usize,
    notice: Option<String>,
}

impl App {
    fn new(picker: Box<dyn FilePicker>) -> Result<Self> {
        Ok(App {
            drop_target: DropTarget::new(DropTargetOptions::default(), picker),
            menu: Menu::standard()?,
            platform: Platform::current(),
            selected: 0,
            notice: None,
        })
    }

    /// Returns whether the screen needs a redraw.
    fn handle_input(
        &mut self,
        input: Event,
        controller: &mut UploadController,
        terminal: &mut TerminalGuard,
    ) -> Result<bool> {
        match input {
            Event::Paste(text) => {
                let outcome = self.drop_target.drop_paths(parse_dropped_paths(&text));
                self.forward(outcome, controller);
                Ok(true)
            }
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.handle_key(key, controller, terminal)
            }
            Event::Resize(..) => Ok(true),
            _ => Ok(false),
        }
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        controller: &mut UploadController,
        terminal: &mut TerminalGuard,
    ) -> Result<bool> {
        if let Some(action) = self.menu.action_for_key(&key, self.platform) {
            self.dispatch(action, controller, terminal)?;
            return Ok(true);
        }

        let uploading = *controller.state() == UploadState::Uploading;
        match key.code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(self.menu.items.len().saturating_sub(1))
            }
            KeyCode::Enter => {
                if let Some(item) = self.menu.items.get(self.selected) {
                    let action = item.action;
                    self.dispatch(action, controller, terminal)?;
                }
            }
            // Raw mode swallows SIGINT; treat ctrl+c as quit.
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                controller.quit()
            }
            KeyCode::Esc | KeyCode::Char('x') if uploading => {
                self.notice = None;
                controller.cancel();
            }
            KeyCode::Char('d') if matches!(controller.state(), UploadState::Failed { .. }) => {
                controller.dismiss()
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn dispatch(
        &mut self,
        action: MenuAction,
        controller: &mut UploadController,
        terminal: &mut TerminalGuard,
    ) -> Result<()> {
        match action {
            MenuAction::SelectFile => {
                // The picker may need the terminal (prompt) or steal focus
                // (native dialog); either way give the screen back first.
                terminal.suspend()?;
                let picked = self.drop_target.open();
                terminal.resume()?;
                match picked {
                    Ok(outcome) => self.forward(outcome, controller),
                    Err(e) => {
                        warn!("file picker failed: {e:#}");
                        self.notice = Some(format!("{e:#}"));
                    }
                }
            }
            MenuAction::Quit => controller.quit(),
        }
        Ok(())
    }

    fn forward(&mut self, outcome: DropOutcome, controller: &mut UploadController) {
        self.notice = match outcome {
            DropOutcome::Accepted(files) => match controller.start_upload(files) {
                Ok(_) => None,
                Err(e) => Some(e.to_string()),
            },
            DropOutcome::Rejected(reason) => Some(reason),
            DropOutcome::Empty => return,
        };
    }

    fn lines(&self, snapshot: &UploadSnapshot) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!("╭{}╮", "─".repeat(ZONE_WIDTH)));
        match self.drop_target.status(snapshot.queue.len()) {
            DropStatus::Active => {
                lines.push(zone_line("Start upload..."));
                lines.push(zone_line(""));
            }
            DropStatus::Accept => {
                lines.push(zone_line(&format!("{}  [x]", queue_label(&snapshot.queue))));
                lines.push(zone_line(&format!(
                    "{} {:>3}%",
                    render_bar(snapshot.progress, BAR_WIDTH),
                    snapshot.progress
                )));
            }
            DropStatus::Pending => {
                lines.push(zone_line("↥ Drag files here..."));
                lines.push(zone_line(""));
            }
        }
        lines.push(format!("╰{}╯", "─".repeat(ZONE_WIDTH)));
        lines.push("─".repeat(ZONE_WIDTH + 2));

        for (i, item) in self.menu.items.iter().enumerate() {
            let marker = if i == self.selected { '›' } else { ' ' };
            let hotkey = item
                .hotkey
                .as_ref()
                .map(|h| h.menu_label(self.platform))
                .unwrap_or_default();
            lines.push(format!(
                "{marker} {:<width$}{hotkey:>14}",
                item.label,
                width = ZONE_WIDTH - 14
            ));
        }

        lines.push(String::new());
        if let UploadState::Failed { reason } = &snapshot.state {
            lines.push(format!("Upload failed: {reason}"));
            lines.push("Press d to dismiss.".into());
        } else if let Some(notice) = &self.notice {
            lines.push(notice.clone());
        } else if snapshot.state == UploadState::Uploading {
            lines.push("Esc or x cancels the upload.".into());
        } else if let Some(url) = &snapshot.last_download_url {
            lines.push(format!("Copied {url}"));
        }
        lines
    }

    fn draw(&self, out: &mut impl Write, snapshot: &UploadSnapshot) -> Result<()> {
        queue!(out, Clear(ClearType::All))?;
        for (row, line) in self.lines(snapshot).iter().enumerate() {
            queue!(out, MoveTo(0, row as u16), crossterm::style::Print(line))?;
        }
        out.flush()?;
        Ok(())
    }
}

fn zone_line(text: &str) -> String {
    let len = text.chars().count();
    let pad = ZONE_WIDTH.saturating_sub(len);
    let left = pad / 2;
    format!("│{}{}{}│", " ".repeat(left), text, " ".repeat(pad - left))
}

/// Raw mode + alternate screen + bracketed paste for as long as it lives.
struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        let mut guard = TerminalGuard { active: false };
        guard.resume()?;
        Ok(guard)
    }

    fn suspend(&mut self) -> Result<()> {
        if self.active {
            execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen, Show)?;
            terminal::disable_raw_mode()?;
            self.active = false;
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if !self.active {
            terminal::enable_raw_mode()?;
            execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste, Hide)?;
            self.active = true;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), SetTitle(""));
        if let Err(e) = self.suspend() {
            warn!("failed to restore terminal: {e:#}");
        }
    }
}
