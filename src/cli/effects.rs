//! Terminal renderings of form notices and view changes.

use dialoguer::theme::ColorfulTheme;
use tracing::debug;

use crate::cli::context::CliMode;
use crate::cli::{io, output};
use crate::forms::{Acknowledgement, Navigator, Notice, NoticeLevel, NoticeStyle, Notifier, View};

/// Prints notices; dialogs wait for Enter when a user is at the terminal.
pub struct CliNotifier<'a> {
    mode: CliMode,
    theme: &'a ColorfulTheme,
}

impl<'a> CliNotifier<'a> {
    pub fn new(mode: CliMode, theme: &'a ColorfulTheme) -> Self {
        Self { mode, theme }
    }
}

impl Notifier for CliNotifier<'_> {
    fn notify(&mut self, notice: &Notice) -> Acknowledgement {
        match notice.level {
            NoticeLevel::Success => output::success(notice),
            NoticeLevel::Error => output::error(notice),
            NoticeLevel::Info => output::info(notice),
        }
        if notice.style == NoticeStyle::Toast || self.mode == CliMode::Script {
            return Acknowledgement::Confirmed;
        }
        match io::wait_for_enter(self.theme) {
            Ok(()) => Acknowledgement::Confirmed,
            Err(err) => {
                debug!(error = %err, "notice dismissed");
                Acknowledgement::Dismissed
            }
        }
    }
}

/// Remembers the requested view; the shell switches to it once the
/// command that triggered it has finished.
#[derive(Debug, Default)]
pub struct CliNavigator {
    requested: Option<View>,
}

impl CliNavigator {
    pub fn take(&mut self) -> Option<View> {
        self.requested.take()
    }
}

impl Navigator for CliNavigator {
    fn navigate(&mut self, view: View) {
        self.requested = Some(view);
    }
}
