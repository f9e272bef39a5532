//! UI side effects triggered after a request settles.
//!
//! Rendering notices and switching views belong to the host; forms only see
//! the [`Notifier`] and [`Navigator`] traits.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// Dialogs block until acknowledged; toasts are fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    Dialog,
    Toast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub style: NoticeStyle,
    pub title: String,
    pub text: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Self::dialog(NoticeLevel::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::dialog(NoticeLevel::Error, title)
    }

    pub fn toast(level: NoticeLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            style: NoticeStyle::Toast,
            title: title.into(),
            text: None,
        }
    }

    fn dialog(level: NoticeLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            style: NoticeStyle::Dialog,
            title: title.into(),
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Generic failure shown for any unexpected status or transport error.
    pub fn generic_failure() -> Self {
        Notice::error("Oops!!").with_text("Something went wrong")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}: {}", self.title, text),
            None => f.write_str(&self.title),
        }
    }
}

/// How the user closed a dialog. Navigation follows either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    Confirmed,
    Dismissed,
}

pub trait Notifier {
    /// Shows the notice. Dialogs return once the user acknowledges them.
    fn notify(&mut self, notice: &Notice) -> Acknowledgement;
}

/// Views a form can send the user to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Login,
    AdminSignup,
    MyProducts,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let route = match self {
            View::Home => "/",
            View::Login => "/login",
            View::AdminSignup => "/adminsignup",
            View::MyProducts => "/myproducts",
        };
        f.write_str(route)
    }
}

pub trait Navigator {
    fn navigate(&mut self, view: View);
}

/// Borrowed side-effect sinks handed to a pipeline run.
pub struct Effects<'a> {
    pub notifier: &'a mut dyn Notifier,
    pub navigator: &'a mut dyn Navigator,
}

impl<'a> Effects<'a> {
    pub fn new(notifier: &'a mut dyn Notifier, navigator: &'a mut dyn Navigator) -> Self {
        Self {
            notifier,
            navigator,
        }
    }
}
