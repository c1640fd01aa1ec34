//! View model: the strings a front end shows for a session state.

use crate::defaults;
use crate::session::SessionState;

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub button_label: &'static str,
    pub status_line: &'static str,
    pub transcript: String,
}

impl SessionView {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            button_label: button_label(state.listening),
            status_line: status_line(state.listening),
            transcript: state.text.clone(),
        }
    }
}

pub fn button_label(listening: bool) -> &'static str {
    if listening {
        defaults::STOP_LABEL
    } else {
        defaults::START_LABEL
    }
}

pub fn status_line(listening: bool) -> &'static str {
    if listening {
        defaults::LISTENING_STATUS
    } else {
        defaults::IDLE_STATUS
    }
}
