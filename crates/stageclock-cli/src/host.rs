//! Terminal host surface.
//!
//! The toast is a line on stderr. System notifications go through the
//! desktop notification daemon and are only requested while the live
//! display is not visible, i.e. stdout is not a terminal.

use std::io::IsTerminal;

use stageclock_core::error::NotifyError;
use stageclock_core::{HostSurface, NotificationPermission};

pub struct TerminalHost {
    hidden: bool,
    permission: NotificationPermission,
}

impl TerminalHost {
    /// Inspect stdout and probe the notification daemon once.
    pub fn detect() -> Self {
        Self {
            hidden: !std::io::stdout().is_terminal(),
            permission: probe_permission(),
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn probe_permission() -> NotificationPermission {
    match notify_rust::get_server_information() {
        Ok(info) => {
            tracing::debug!(server = %info.name, version = %info.version, "notification server found");
            NotificationPermission::Granted
        }
        Err(e) => {
            tracing::debug!(error = %e, "no notification server");
            NotificationPermission::Denied
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn probe_permission() -> NotificationPermission {
    NotificationPermission::Granted
}

impl HostSurface for TerminalHost {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn notification_permission(&self) -> NotificationPermission {
        self.permission
    }

    fn show_system_notification(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .appname("stageclock")
            .icon("alarm-clock")
            .show()
            .map(drop)
            .map_err(|e| NotifyError::ShowFailed(e.to_string()))
    }

    fn show_toast(&self, title: &str, body: &str) {
        eprintln!("\n{title} {body}");
    }
}
