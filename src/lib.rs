// Library root
// -----------
// This crate exposes the uploader core as a library. The binary
// (`main.rs`) wires these modules into either the interactive terminal
// UI or the one-shot headless upload.
//
// Module responsibilities:
// - `api`: HTTP interactions with the upload backend (negotiate a signed
//   URL, stream the file body with progress and cancellation).
// - `controller`: the upload lifecycle state machine. Owns the queue, the
//   progress and the cancellation handle.
// - `drop_target`, `menu`, `progress`: the input and presentation pieces
//   the front-ends compose.
// - `clipboard`, `notification`, `shell`: thin OS / host shims the
//   controller talks to through traits.
// - `config`, `logging`: ambient setup.
// - `ui`, `headless`: the two front-ends.
pub mod api;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod drop_target;
pub mod file;
pub mod headless;
pub mod logging;
pub mod menu;
pub mod notification;
pub mod progress;
pub mod shell;
pub mod ui;
