//! Utilities to tell the user what the calendar is doing

use std::fmt::{Display, Error, Formatter};

/// A notice the user interface may display
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Nothing has been loaded yet
    Idle,
    /// Events are being fetched
    Loading{ details: String },
    /// Some months must be re-rendered
    Updated{ months: Vec<usize> },
    /// An action failed. The user may retry it.
    Failed{ message: String },
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Notice::Idle => write!(f, "Idle"),
            Notice::Loading{details} => write!(f, "Loading {}...", details),
            Notice::Updated{months} => write!(f, "{} month(s) updated", months.len()),
            Notice::Failed{message} => write!(f, "Uh Oh. {}", message),
        }
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::Idle
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<Notice>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<Notice>;

/// Create a feeback channel, that can be used to retrieve the latest notice of a controller
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(Notice::default())
}



/// Logs what happens, and forwards notices to the listener (if any)
#[derive(Debug, Default)]
pub struct Notifier {
    n_errors: u32,
    feedback_channel: Option<FeedbackSender>
}
impl Notifier {
    pub fn new() -> Self {
        Self { n_errors: 0, feedback_channel: None }
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { n_errors: 0, feedback_channel: Some(channel) }
    }

    /// How many errors and warnings have been reported so far
    pub fn error_count(&self) -> u32 {
        self.n_errors
    }

    /// Log an error
    pub fn error(&mut self, text: &str) {
        log::error!("{}", text);
        self.n_errors += 1;
    }
    /// Log a warning
    pub fn warn(&mut self, text: &str) {
        log::warn!("{}", text);
        self.n_errors += 1;
    }
    /// Log an info
    pub fn info(&mut self, text: &str) {
        log::info!("{}", text);
    }
    /// Log a debug message
    pub fn debug(&mut self, text: &str) {
        log::debug!("{}", text);
    }
    /// Send a notice to the listener (if any).
    pub fn feedback(&mut self, notice: Notice) {
        if let Some(sender) = &self.feedback_channel {
            // Nobody listening anymore is fine
            let _ = sender.send(notice);
        }
    }
}
