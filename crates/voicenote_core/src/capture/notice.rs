//! User-visible notices raised by the capture surface.

use std::fmt::{Display, Formatter};

/// Outcome the host should show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Audio capture was requested but the host has no speech recognition.
    SpeechUnavailable,
    /// The recognizer refused to start.
    RecordingFailed(String),
    /// A note was saved from the surface.
    NoteCreated,
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpeechUnavailable => {
                write!(f, "Speech recognition is not available in this environment")
            }
            Self::RecordingFailed(reason) => write!(f, "Could not start recording: {reason}"),
            Self::NoteCreated => write!(f, "Note created successfully"),
        }
    }
}

/// Receives notices for display.
pub trait NoticeSink {
    fn notify(&mut self, notice: Notice);
}

/// Sink that keeps every notice in arrival order.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

impl NoticeSink for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
