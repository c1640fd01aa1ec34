//! Terminal front end: renders session views and alerts, parses input lines.

use crate::engine::event::RecognitionEvent;
use crate::notify::{Alert, AlertSink};
use crate::view::SessionView;
use owo_colors::OwoColorize;

/// Shows alerts on stderr as a boxed message.
#[derive(Debug, Clone, Copy)]
pub struct StderrAlertSink {
    color: bool,
}

impl StderrAlertSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl AlertSink for StderrAlertSink {
    fn show(&self, alert: &Alert) {
        eprintln!("{}", render_alert(alert, self.color));
    }
}

pub fn render_alert(alert: &Alert, color: bool) -> String {
    let title = if color {
        alert.title.red().bold().to_string()
    } else {
        alert.title.clone()
    };
    format!("[!] {title}\n    {}", alert.message)
}

/// Three lines: button, status, transcript.
pub fn render_view(view: &SessionView, color: bool) -> String {
    let button = format!("[ {} ]", view.button_label);
    let (button, status) = if color {
        (
            button.bold().to_string(),
            view.status_line.dimmed().to_string(),
        )
    } else {
        (button, view.status_line.to_string())
    };
    format!("{button}\n{status}\n{}", view.transcript)
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Toggle,
    Quit,
    /// A JSON-encoded recognition event to inject
    Event(RecognitionEvent),
    Invalid(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" | "t" | "toggle" => Input::Toggle,
        "q" | "quit" | "exit" => Input::Quit,
        json if json.starts_with('{') => match RecognitionEvent::from_json(json) {
            Ok(event) => Input::Event(event),
            Err(e) => Input::Invalid(format!("bad event: {e}")),
        },
        other => Input::Invalid(format!("unknown command '{other}'")),
    }
}
