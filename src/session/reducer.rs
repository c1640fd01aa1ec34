//! Recognition event reducer.
//!
//! `reduce` is a pure function from (event, prior state) to the next state
//! plus at most one side effect. The controller applies the effect; nothing
//! here touches the outside world, so whole event sequences can be replayed
//! in tests without an engine.

use crate::defaults;
use crate::engine::event::{ErrorCode, RecognitionEvent};
use crate::notify::{Alert, Diagnostic};
use crate::session::state::SessionState;

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Alert(Alert),
    Diagnostic(Diagnostic),
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub state: SessionState,
    pub effect: Option<Effect>,
}

impl Reduction {
    fn quiet(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    fn with_effect(state: SessionState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }
}

fn join_words(words: &[String]) -> String {
    words.join(defaults::WORD_SEPARATOR)
}

pub fn reduce(event: &RecognitionEvent, prior: &SessionState) -> Reduction {
    match event {
        RecognitionEvent::Start => Reduction::quiet(prior.with_listening(true)),
        RecognitionEvent::End => Reduction::quiet(prior.with_listening(false)),
        RecognitionEvent::PartialResult { words } => {
            Reduction::quiet(SessionState::new(true, join_words(words)))
        }
        RecognitionEvent::FinalResult { words } => {
            Reduction::quiet(SessionState::new(false, join_words(words)))
        }
        RecognitionEvent::Error { code, detail } => {
            let state = prior.with_listening(false);
            let effect = match code {
                ErrorCode::NoSpeech => {
                    Effect::Diagnostic(Diagnostic::warn(defaults::NO_SPEECH_DIAGNOSTIC))
                }
                ErrorCode::MicrophoneDenied => Effect::Alert(Alert::microphone_unavailable()),
                ErrorCode::Other(raw) => {
                    let message = if detail.is_empty() {
                        format!("Speech error {raw}")
                    } else {
                        format!("Speech error {raw}: {detail}")
                    };
                    Effect::Diagnostic(Diagnostic::error(message))
                }
            };
            Reduction::with_effect(state, effect)
        }
    }
}

/// Fold a sequence of events from `initial`, discarding effects.
pub fn replay<'a, I>(events: I, initial: SessionState) -> SessionState
where
    I: IntoIterator<Item = &'a RecognitionEvent>,
{
    events
        .into_iter()
        .fold(initial, |state, event| reduce(event, &state).state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::DiagnosticLevel;

    fn listening_with(text: &str) -> SessionState {
        SessionState::new(true, text)
    }

    #[test]
    fn start_keeps_text_and_listens() {
        let next = reduce(&RecognitionEvent::Start, &SessionState::new(false, "earlier"));
        assert_eq!(next.state, SessionState::new(true, "earlier"));
        assert_eq!(next.effect, None);
    }

    #[test]
    fn end_keeps_text_and_stops() {
        let next = reduce(&RecognitionEvent::End, &listening_with("so far"));
        assert_eq!(next.state, SessionState::new(false, "so far"));
        assert_eq!(next.effect, None);
    }

    #[test]
    fn partial_replaces_text() {
        let next = reduce(
            &RecognitionEvent::partial(["hello", "world"]),
            &listening_with("stale words"),
        );
        assert_eq!(next.state, SessionState::new(true, "hello world"));
    }

    #[test]
    fn partial_sequence_keeps_only_last() {
        let events = vec![
            RecognitionEvent::partial(["one"]),
            RecognitionEvent::partial(["one", "two"]),
            RecognitionEvent::partial(["won", "too", "three"]),
        ];
        let state = replay(&events, SessionState::default());
        assert_eq!(state, SessionState::new(true, "won too three"));
    }

    #[test]
    fn empty_partial_clears_text() {
        let next = reduce(&RecognitionEvent::partial(Vec::<String>::new()), &listening_with("x"));
        assert_eq!(next.state, SessionState::new(true, ""));
    }

    #[test]
    fn final_result_ends_listening() {
        let state = replay(
            &[
                RecognitionEvent::partial(["hello", "world"]),
                RecognitionEvent::final_result(["hello", "world", "today"]),
            ],
            SessionState::default(),
        );
        assert_eq!(state, SessionState::new(false, "hello world today"));
    }

    #[test]
    fn no_speech_is_a_warning_only() {
        let next = reduce(
            &RecognitionEvent::error("E_RECOG", "timeout"),
            &listening_with("kept"),
        );
        assert_eq!(next.state, SessionState::new(false, "kept"));
        match next.effect {
            Some(Effect::Diagnostic(d)) => {
                assert_eq!(d.level, DiagnosticLevel::Warn);
                assert_eq!(d.message, "No speech detected. Try speaking clearly.");
            }
            other => panic!("expected warning diagnostic, got {other:?}"),
        }
    }

    #[test]
    fn microphone_error_alerts() {
        let next = reduce(&RecognitionEvent::error("E_MIC", ""), &listening_with("kept"));
        assert_eq!(next.state, SessionState::new(false, "kept"));
        assert_eq!(
            next.effect,
            Some(Effect::Alert(Alert::microphone_unavailable()))
        );
    }

    #[test]
    fn other_error_logs_code_and_detail() {
        let next = reduce(
            &RecognitionEvent::error("E_NETWORK", "offline"),
            &listening_with("kept"),
        );
        assert_eq!(next.state, SessionState::new(false, "kept"));
        match next.effect {
            Some(Effect::Diagnostic(d)) => {
                assert_eq!(d.level, DiagnosticLevel::Error);
                assert_eq!(d.message, "Speech error E_NETWORK: offline");
            }
            other => panic!("expected error diagnostic, got {other:?}"),
        }
    }

    #[test]
    fn listening_tracks_last_event() {
        let cases: Vec<(Vec<RecognitionEvent>, bool)> = vec![
            (vec![RecognitionEvent::Start], true),
            (vec![RecognitionEvent::Start, RecognitionEvent::partial(["a"])], true),
            (vec![RecognitionEvent::partial(["a"]), RecognitionEvent::End], false),
            (
                vec![
                    RecognitionEvent::Start,
                    RecognitionEvent::error("E_RECOG", ""),
                ],
                false,
            ),
            (
                vec![
                    RecognitionEvent::final_result(["a"]),
                    RecognitionEvent::Start,
                ],
                true,
            ),
        ];

        for (events, expected) in cases {
            let state = replay(&events, SessionState::default());
            assert_eq!(state.listening, expected, "after {events:?}");
        }
    }

    #[test]
    fn errors_never_clear_text() {
        for code in ["E_RECOG", "E_MIC", "E_OTHER"] {
            let next = reduce(&RecognitionEvent::error(code, ""), &listening_with("keep me"));
            assert_eq!(next.state.text, "keep me", "{code} cleared text");
        }
    }
}
