// Native dialogs
//
// Blocking message boxes shown on the UI thread through `rfd`.

use crate::reload::ErrorReporter;
use rfd::{MessageButtons, MessageDialog, MessageLevel};

/// Error reporter showing a native modal message box
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDialogs;

impl ErrorReporter for NativeDialogs {
    fn show_error(&self, title: &str, message: &str) {
        tracing::debug!("Showing error dialog: {}", title);

        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
