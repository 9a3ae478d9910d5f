// Desktop notifications.
//
// Desktop environments have no permission model of their own, so the
// uploader keeps one: the user is asked once and the answer is stored in
// the config file.

use anyhow::{Context, Result};
use dialoguer::Confirm;
use notify_rust::Notification;
use serde::{Deserialize, Serialize};
use tracing::debug;

const APP_NAME: &str = "Rabbithole";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Never asked.
    #[default]
    #[serde(rename = "default")]
    Unset,
}

impl NotificationPermission {
    pub fn is_granted(self) -> bool {
        self == NotificationPermission::Granted
    }
}

pub trait Notifier {
    /// Current permission. Queried at send time, never re-requested.
    fn permission(&self) -> NotificationPermission;
    fn send(&self, title: &str, body: &str) -> Result<()>;
}

/// Notifier backed by `notify-rust`.
pub struct DesktopNotifier {
    permission: NotificationPermission,
}

impl DesktopNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        DesktopNotifier { permission }
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn send(&self, title: &str, body: &str) -> Result<()> {
        debug!("notification: {title}");
        Notification::new()
            .summary(title)
            .body(body)
            .appname(APP_NAME)
            .show()
            .map(|_| ())
            .context("Failed to show desktop notification")
    }
}

/// Ask the user whether notifications may be shown. Only meant to run
/// once, at startup, while the permission is still `Unset`.
pub fn request_permission() -> Result<NotificationPermission> {
    let allowed = Confirm::new()
        .with_prompt("Show a desktop notification when an upload finishes?")
        .default(true)
        .interact()?;
    Ok(if allowed {
        NotificationPermission::Granted
    } else {
        NotificationPermission::Denied
    })
}
