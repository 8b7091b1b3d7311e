//! Spoken interview sessions: ask each question aloud, listen for the answer,
//! move on.
//!
//! The turn-taking rules live in `state` as a pure transition function; the
//! `controller` owns the state and is the only place that talks to the speech
//! capabilities and timers.

pub mod capture;
pub mod console;
pub mod controller;
pub mod questions;
pub mod speech;
pub mod state;

use std::fmt;

use thiserror::Error;

pub use capture::{CaptureEvent, CaptureEventKind, RecognitionResult, SpeechRecognizer, VoiceCaptureAdapter};
pub use controller::SessionController;
pub use questions::parse_questions;
pub use speech::SpeechOutput;
pub use state::{SessionPhase, SessionState, SENTINEL_RESPONSE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    SpeechOutput,
    SpeechCapture,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::SpeechOutput => write!(f, "Speech output"),
            Capability::SpeechCapture => write!(f, "Speech recognition"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{0} is not supported on this host")]
    CapabilityUnavailable(Capability),

    #[error("No valid questions generated")]
    NoQuestions,

    #[error("Speech output failed: {0}")]
    Speech(String),
}
