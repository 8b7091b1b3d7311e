//! Session state and its pure transition function.
//!
//! `transition` takes the state by value and hands back the next state plus the
//! side effects the controller must perform. It never touches a capability or
//! a timer itself, so every turn-taking rule is testable without a runtime.

use crate::session::capture::{CaptureEvent, CaptureEventKind};
use crate::session::SessionError;

/// Recorded in place of an answer when capture produced nothing usable.
pub const SENTINEL_RESPONSE: &str = "[Could not understand response]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    InProgress(usize),
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    questions: Vec<String>,
    current_index: usize,
    /// Aligned by index with `questions`; never longer than `current_index + 1`.
    responses: Vec<String>,
    live_transcript: String,
    started: bool,
}

impl SessionState {
    pub fn new(questions: Vec<String>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        Ok(Self {
            questions,
            ..Self::default()
        })
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.started {
            SessionPhase::NotStarted
        } else if self.current_index >= self.questions.len() {
            SessionPhase::Completed
        } else {
            SessionPhase::InProgress(self.current_index)
        }
    }

    pub fn is_completed(&self) -> bool {
        self.phase() == SessionPhase::Completed
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn live_transcript(&self) -> &str {
        &self.live_transcript
    }

    pub fn current_question(&self) -> Option<&str> {
        match self.phase() {
            SessionPhase::InProgress(i) => Some(&self.questions[i]),
            _ => None,
        }
    }

    /// True while `turn` is the active turn and still awaits its response.
    fn awaiting_response(&self, turn: usize) -> bool {
        self.phase() == SessionPhase::InProgress(turn) && self.responses.len() == turn
    }
}

/// Inputs to the state machine, processed one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The candidate asked to begin.
    Start,
    /// The settle delay after asking question `turn` elapsed.
    ListenDue { turn: usize },
    Capture(CaptureEvent),
    /// The delay after recording the response to `turn` elapsed.
    AdvanceDue { turn: usize },
}

/// Work the controller performs on behalf of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask a question aloud, cancelling any utterance still playing.
    Speak(String),
    /// Fire `ListenDue { turn }` after the settle delay.
    ScheduleListen { turn: usize },
    /// Begin capture for `turn`, aborting any capture still running.
    StartCapture { turn: usize },
    /// Fire `AdvanceDue { turn }` after the advance delay.
    ScheduleAdvance { turn: usize },
    /// The session reached `Completed`; release the capture capability.
    Finish,
}

pub fn transition(mut state: SessionState, event: SessionEvent) -> (SessionState, Vec<Effect>) {
    let effects = match event {
        SessionEvent::Start => {
            if state.started {
                Vec::new()
            } else {
                state.started = true;
                state.current_index = 0;
                ask_current(&state)
            }
        }
        SessionEvent::ListenDue { turn } => {
            if state.awaiting_response(turn) {
                vec![Effect::StartCapture { turn }]
            } else {
                Vec::new()
            }
        }
        SessionEvent::Capture(CaptureEvent { turn, kind }) => {
            if state.awaiting_response(turn) {
                apply_capture(&mut state, turn, kind)
            } else {
                Vec::new()
            }
        }
        SessionEvent::AdvanceDue { turn } => {
            let recorded = state.responses.len() > turn;
            if state.phase() == SessionPhase::InProgress(turn) && recorded {
                state.current_index += 1;
                state.live_transcript.clear();
                if state.is_completed() {
                    vec![Effect::Finish]
                } else {
                    ask_current(&state)
                }
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn ask_current(state: &SessionState) -> Vec<Effect> {
    match state.current_question() {
        Some(question) => vec![
            Effect::Speak(question.to_string()),
            Effect::ScheduleListen {
                turn: state.current_index,
            },
        ],
        None => vec![Effect::Finish],
    }
}

fn apply_capture(state: &mut SessionState, turn: usize, kind: CaptureEventKind) -> Vec<Effect> {
    match kind {
        CaptureEventKind::Interim(text) => {
            state.live_transcript = text;
            Vec::new()
        }
        // An empty final is no answer; the end-of-capture event records the sentinel.
        CaptureEventKind::Final(text) if text.trim().is_empty() => Vec::new(),
        CaptureEventKind::Final(text) => record(state, turn, text),
        CaptureEventKind::Error(_) | CaptureEventKind::End => {
            record(state, turn, SENTINEL_RESPONSE.to_string())
        }
    }
}

fn record(state: &mut SessionState, turn: usize, response: String) -> Vec<Effect> {
    state.responses.push(response);
    state.live_transcript.clear();
    vec![Effect::ScheduleAdvance { turn }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(questions: &[&str]) -> SessionState {
        let state =
            SessionState::new(questions.iter().map(|q| q.to_string()).collect()).unwrap();
        transition(state, SessionEvent::Start).0
    }

    fn capture(turn: usize, kind: CaptureEventKind) -> SessionEvent {
        SessionEvent::Capture(CaptureEvent { turn, kind })
    }

    #[test]
    fn test_empty_question_list_is_rejected() {
        assert_eq!(SessionState::new(vec![]), Err(SessionError::NoQuestions));
    }

    #[test]
    fn test_start_asks_first_question() {
        let state = SessionState::new(vec!["Q1".to_string(), "Q2".to_string()]).unwrap();
        assert_eq!(state.phase(), SessionPhase::NotStarted);

        let (state, effects) = transition(state, SessionEvent::Start);

        assert_eq!(state.phase(), SessionPhase::InProgress(0));
        assert_eq!(
            effects,
            vec![
                Effect::Speak("Q1".to_string()),
                Effect::ScheduleListen { turn: 0 }
            ]
        );
    }

    #[test]
    fn test_second_start_is_ignored() {
        let state = started(&["Q1"]);
        let (state, effects) = transition(state, SessionEvent::Start);
        assert!(effects.is_empty());
        assert_eq!(state.phase(), SessionPhase::InProgress(0));
    }

    #[test]
    fn test_listen_due_starts_capture_once_per_turn() {
        let state = started(&["Q1", "Q2"]);
        let (state, effects) = transition(state, SessionEvent::ListenDue { turn: 0 });
        assert_eq!(effects, vec![Effect::StartCapture { turn: 0 }]);

        // A stale timer for another turn does nothing.
        let (_, effects) = transition(state, SessionEvent::ListenDue { turn: 1 });
        assert!(effects.is_empty());
    }

    #[test]
    fn test_interim_replaces_live_transcript() {
        let state = started(&["Q1"]);
        let (state, _) = transition(state, capture(0, CaptureEventKind::Interim("I would".into())));
        let (state, _) = transition(state, capture(0, CaptureEventKind::Interim("I would use".into())));
        assert_eq!(state.live_transcript(), "I would use");
    }

    #[test]
    fn test_final_records_response_and_schedules_advance() {
        let state = started(&["Q1", "Q2"]);
        let (state, _) = transition(state, capture(0, CaptureEventKind::Interim("answer".into())));
        let (state, effects) =
            transition(state, capture(0, CaptureEventKind::Final("answer one".into())));

        assert_eq!(state.responses(), ["answer one"]);
        assert_eq!(state.live_transcript(), "");
        assert_eq!(effects, vec![Effect::ScheduleAdvance { turn: 0 }]);
        assert_eq!(state.phase(), SessionPhase::InProgress(0));
    }

    #[test]
    fn test_end_after_final_does_not_add_sentinel() {
        let state = started(&["Q1", "Q2"]);
        let (state, _) = transition(state, capture(0, CaptureEventKind::Final("yes".into())));
        let (state, effects) = transition(state, capture(0, CaptureEventKind::End));
        assert!(effects.is_empty());
        assert_eq!(state.responses(), ["yes"]);
    }

    #[test]
    fn test_error_then_end_records_single_sentinel() {
        let state = started(&["Q1"]);
        let (state, effects) =
            transition(state, capture(0, CaptureEventKind::Error("no-speech".into())));
        assert_eq!(effects, vec![Effect::ScheduleAdvance { turn: 0 }]);
        let (state, effects) = transition(state, capture(0, CaptureEventKind::End));
        assert!(effects.is_empty());
        assert_eq!(state.responses(), [SENTINEL_RESPONSE]);
    }

    #[test]
    fn test_end_without_final_records_sentinel() {
        let state = started(&["Q1"]);
        let (state, _) = transition(state, capture(0, CaptureEventKind::Final("   ".into())));
        assert!(state.responses().is_empty());
        let (state, _) = transition(state, capture(0, CaptureEventKind::End));
        assert_eq!(state.responses(), [SENTINEL_RESPONSE]);
    }

    #[test]
    fn test_advance_asks_next_question_then_completes() {
        let state = started(&["Q1", "Q2"]);
        let (state, _) = transition(state, capture(0, CaptureEventKind::Final("one".into())));
        let (state, effects) = transition(state, SessionEvent::AdvanceDue { turn: 0 });
        assert_eq!(state.phase(), SessionPhase::InProgress(1));
        assert_eq!(
            effects,
            vec![
                Effect::Speak("Q2".to_string()),
                Effect::ScheduleListen { turn: 1 }
            ]
        );

        let (state, _) = transition(state, capture(1, CaptureEventKind::Error("aborted".into())));
        let (state, effects) = transition(state, SessionEvent::AdvanceDue { turn: 1 });
        assert_eq!(state.phase(), SessionPhase::Completed);
        assert_eq!(effects, vec![Effect::Finish]);
        assert_eq!(state.responses(), ["one", SENTINEL_RESPONSE]);
    }

    #[test]
    fn test_advance_before_response_is_ignored() {
        let state = started(&["Q1", "Q2"]);
        let (state, effects) = transition(state, SessionEvent::AdvanceDue { turn: 0 });
        assert!(effects.is_empty());
        assert_eq!(state.phase(), SessionPhase::InProgress(0));
    }

    #[test]
    fn test_events_after_completion_are_no_ops() {
        let state = started(&["Q1"]);
        let (state, _) = transition(state, capture(0, CaptureEventKind::Final("done".into())));
        let (state, _) = transition(state, SessionEvent::AdvanceDue { turn: 0 });
        assert!(state.is_completed());

        let before = state.clone();
        for event in [
            SessionEvent::AdvanceDue { turn: 0 },
            SessionEvent::ListenDue { turn: 0 },
            capture(0, CaptureEventKind::Interim("late".into())),
            capture(1, CaptureEventKind::Final("late".into())),
            SessionEvent::Start,
        ] {
            let (next, effects) = transition(before.clone(), event);
            assert!(effects.is_empty());
            assert_eq!(next, before);
        }
    }

    #[test]
    fn test_stale_capture_events_from_previous_turn_are_ignored() {
        let state = started(&["Q1", "Q2"]);
        let (state, _) = transition(state, capture(0, CaptureEventKind::Final("one".into())));
        let (state, _) = transition(state, SessionEvent::AdvanceDue { turn: 0 });

        let (state, effects) = transition(state, capture(0, CaptureEventKind::End));
        assert!(effects.is_empty());
        let (state, _) = transition(state, capture(0, CaptureEventKind::Interim("stale".into())));
        assert_eq!(state.live_transcript(), "");
        assert_eq!(state.responses(), ["one"]);
    }
}
