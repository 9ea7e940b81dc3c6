//! Best-effort local notifications. Delivery is never guaranteed and
//! failures are swallowed.

#[cfg(target_os = "macos")]
use std::process::Command;

pub trait NotificationSink {
    fn notify(&self, title: &str, body: &str);
}

/// Desktop notifications (currently only implemented on macOS)
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl NotificationSink for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        tracing::info!(title, body, "notification");

        #[cfg(target_os = "macos")]
        {
            let script = format!(
                r#"display notification "{}" with title "{}""#,
                body.replace('"', "\\\""),
                title.replace('"', "\\\"")
            );

            let _ = Command::new("osascript").arg("-e").arg(&script).output();
        }
    }
}

/// Discards everything (CLI subcommands, notifications disabled)
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl NotificationSink for SilentNotifier {
    fn notify(&self, _title: &str, _body: &str) {}
}
