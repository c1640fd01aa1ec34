//! Recognition events delivered by the engine.
//!
//! One variant per engine callback: `onSpeechStart`, `onSpeechEnd`,
//! `onSpeechPartialResults`, `onSpeechResults` and `onSpeechError`.

use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified engine error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// Nothing intelligible was heard (`E_RECOG`).
    NoSpeech,
    /// Microphone hardware or permission failure (`E_MIC`).
    MicrophoneDenied,
    /// Any other engine code, kept verbatim.
    Other(String),
}

impl ErrorCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            defaults::NO_SPEECH_CODE => ErrorCode::NoSpeech,
            defaults::MICROPHONE_CODE => ErrorCode::MicrophoneDenied,
            other => ErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            ErrorCode::NoSpeech => defaults::NO_SPEECH_CODE,
            ErrorCode::MicrophoneDenied => defaults::MICROPHONE_CODE,
            ErrorCode::Other(code) => code.as_str(),
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        ErrorCode::from_code(&code)
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_code().to_string()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A single recognition event, in engine emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognitionEvent {
    /// Speech capture began
    Start,
    /// Speech capture ended without a result
    End,
    /// Provisional transcription; supersedes earlier partials
    PartialResult { words: Vec<String> },
    /// Authoritative transcription; ends the session
    FinalResult { words: Vec<String> },
    /// Engine failure; ends the session
    Error {
        code: ErrorCode,
        #[serde(default)]
        detail: String,
    },
}

impl RecognitionEvent {
    pub fn partial<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RecognitionEvent::PartialResult {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn final_result<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RecognitionEvent::FinalResult {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Build an error event from a raw engine code.
    pub fn error(code: &str, detail: impl Into<String>) -> Self {
        RecognitionEvent::Error {
            code: ErrorCode::from_code(code),
            detail: detail.into(),
        }
    }

    /// Whether this event ends a listening span.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecognitionEvent::End
                | RecognitionEvent::FinalResult { .. }
                | RecognitionEvent::Error { .. }
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
