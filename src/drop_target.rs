// Drop target: where files enter the uploader.
//
// In a terminal the drop gesture arrives as pasted text (most terminal
// emulators paste the path of a file dragged onto their window), so this
// module also knows how to turn that text back into paths. The explicit
// "Select file" menu action goes through `open`, which asks a
// `FilePicker`.

use crate::config::PickerKind;
use crate::file::FileHandle;
use anyhow::Result;
use dialoguer::Input;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropTargetOptions {
    /// Accept more than one file per interaction.
    pub multiple: bool,
    /// Ignore click-to-open.
    pub no_click: bool,
    /// Ignore keyboard-to-open.
    pub no_keyboard: bool,
}

impl Default for DropTargetOptions {
    fn default() -> Self {
        DropTargetOptions {
            multiple: false,
            no_click: true,
            no_keyboard: true,
        }
    }
}

/// What the drop zone should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropStatus {
    /// A drag is hovering and nothing was accepted yet.
    Active,
    /// A queue is present and being processed.
    Accept,
    Pending,
}

impl DropStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DropStatus::Active => "active",
            DropStatus::Accept => "accept",
            DropStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Files to forward, verbatim and in order, to the controller.
    Accepted(Vec<FileHandle>),
    Rejected(String),
    /// Nothing was selected; nothing to forward.
    Empty,
}

/// Source of paths for the programmatic "open" action.
pub trait FilePicker {
    fn pick(&mut self, multiple: bool) -> Result<Vec<PathBuf>>;
}

/// Native OS file dialog.
pub struct NativePicker;

impl FilePicker for NativePicker {
    fn pick(&mut self, multiple: bool) -> Result<Vec<PathBuf>> {
        let dialog = rfd::FileDialog::new().set_title("Select file");
        let picked = if multiple {
            dialog.pick_files().unwrap_or_default()
        } else {
            dialog.pick_file().into_iter().collect()
        };
        Ok(picked)
    }
}

/// Asks for a path on the terminal. The answer is parsed like a drop,
/// so quoting and `file://` URIs work here too.
pub struct PromptPicker;

impl FilePicker for PromptPicker {
    fn pick(&mut self, _multiple: bool) -> Result<Vec<PathBuf>> {
        let text: String = Input::new()
            .with_prompt("File path")
            .allow_empty(true)
            .interact_text()?;
        Ok(parse_dropped_paths(&text))
    }
}

pub fn picker_for(kind: PickerKind) -> Box<dyn FilePicker> {
    match kind {
        PickerKind::Native => Box::new(NativePicker),
        PickerKind::Prompt => Box::new(PromptPicker),
    }
}

pub struct DropTarget {
    options: DropTargetOptions,
    drag_active: bool,
    picker: Box<dyn FilePicker>,
}

impl DropTarget {
    pub fn new(options: DropTargetOptions, picker: Box<dyn FilePicker>) -> Self {
        DropTarget {
            options,
            drag_active: false,
            picker,
        }
    }

    pub fn options(&self) -> DropTargetOptions {
        self.options
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Resolve dropped paths. A drop ends the drag whatever its outcome.
    pub fn drop_paths(&mut self, paths: Vec<PathBuf>) -> DropOutcome {
        self.drag_active = false;

        if paths.is_empty() {
            return DropOutcome::Empty;
        }
        if !self.options.multiple && paths.len() > 1 {
            warn!("rejected drop of {} files, only one is accepted", paths.len());
            return DropOutcome::Rejected(format!(
                "Only one file can be uploaded at a time ({} dropped)",
                paths.len()
            ));
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in &paths {
            match FileHandle::open(path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    warn!("rejected drop: {e:#}");
                    return DropOutcome::Rejected(format!("{e:#}"));
                }
            }
        }
        debug!("accepted {} dropped file(s)", files.len());
        DropOutcome::Accepted(files)
    }

    /// Open the file picker and treat its selection as a drop.
    pub fn open(&mut self) -> Result<DropOutcome> {
        let paths = self.picker.pick(self.options.multiple)?;
        Ok(self.drop_paths(paths))
    }

    /// Click on the zone itself. `None` when clicks are ignored.
    pub fn click(&mut self) -> Result<Option<DropOutcome>> {
        if self.options.no_click {
            return Ok(None);
        }
        self.open().map(Some)
    }

    /// Enter/space on the focused zone. `None` when ignored.
    pub fn keyboard_activate(&mut self) -> Result<Option<DropOutcome>> {
        if self.options.no_keyboard {
            return Ok(None);
        }
        self.open().map(Some)
    }

    pub fn status(&self, queue_len: usize) -> DropStatus {
        if queue_len > 0 {
            DropStatus::Accept
        } else if self.drag_active {
            DropStatus::Active
        } else {
            DropStatus::Pending
        }
    }
}

/// Turn text pasted by a drag-and-drop into paths.
///
/// Handles one entry per line, `file://` URIs, quoted paths and
/// backslash-escaped spaces. A line naming an existing path as-is wins
/// over word splitting, so unquoted paths with spaces still work.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if Path::new(line).exists() {
            paths.push(PathBuf::from(line));
            continue;
        }
        paths.extend(
            split_words(line)
                .into_iter()
                .filter(|w| !w.is_empty())
                .map(|w| word_to_path(&w)),
        );
    }
    paths
}

fn word_to_path(word: &str) -> PathBuf {
    if word.starts_with("file://") {
        if let Some(path) = Url::parse(word).ok().and_then(|u| u.to_file_path().ok()) {
            return path;
        }
    }
    PathBuf::from(word)
}

/// Shell-style word splitting: whitespace separates, quotes group and a
/// backslash escapes the next character (not on Windows, where it is the
/// path separator).
fn split_words(line: &str) -> Vec<String> {
    let escapes = !cfg!(windows);
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if escapes && c == '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_word = true;
            }
            None if escapes && c == '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}
