//! Default configuration constants and fixed user-facing strings.

/// Locale handed to the recognition engine when none is configured.
///
/// Passed through unchanged; no negotiation against the engine's supported set.
pub const DEFAULT_LOCALE: &str = "fr-FR";

/// Environment variable overriding `session.locale`.
pub const LOCALE_ENV: &str = "LISTENKIT_LOCALE";

/// Environment variable overriding `session.platform`.
pub const PLATFORM_ENV: &str = "LISTENKIT_PLATFORM";

/// Separator used when joining recognized words into the transcript.
pub const WORD_SEPARATOR: &str = " ";

/// Engine error code for "no speech recognized".
pub const NO_SPEECH_CODE: &str = "E_RECOG";

/// Engine error code for microphone failures (hardware or permission).
pub const MICROPHONE_CODE: &str = "E_MIC";

pub const PERMISSION_ALERT_TITLE: &str = "Permission required";
pub const PERMISSION_ALERT_MESSAGE: &str =
    "Microphone access is required to use voice recognition.";

pub const MICROPHONE_ALERT_TITLE: &str = "Microphone Error";
pub const MICROPHONE_ALERT_MESSAGE: &str = "Please check microphone permissions.";

/// Diagnostic emitted for the soft "no speech" condition.
pub const NO_SPEECH_DIAGNOSTIC: &str = "No speech detected. Try speaking clearly.";

pub const START_LABEL: &str = "Start Listening";
pub const STOP_LABEL: &str = "Stop Listening";
pub const LISTENING_STATUS: &str = "...Listening...";
pub const IDLE_STATUS: &str = "Press Start to speak.";
