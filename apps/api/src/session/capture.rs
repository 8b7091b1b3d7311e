//! Voice capture — wraps a streaming speech-to-text capability and turns its
//! raw results into per-turn capture events.
//!
//! Event order for one capture session: any number of `Interim`, at most one
//! `Final`, an optional `Error`, then exactly one `End`. An aborted session
//! emits nothing further.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::session::{Capability, SessionError};

/// One raw result from the host recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionResult {
    /// Provisional text for the utterance so far.
    Partial(String),
    /// The recognizer judged the utterance complete.
    Final(String),
    /// Recognition failed; carries the platform's error code.
    Error(String),
}

/// Host-provided speech-to-text capability.
pub trait SpeechRecognizer: Send + Sync {
    fn is_available(&self) -> bool;

    /// Opens one recognition session. The stream ending means capture ended,
    /// whether by success, error or the recognizer's own silence detection.
    fn listen(&self, language: &str) -> BoxStream<'static, RecognitionResult>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEventKind {
    /// Replaces, never extends, the live transcript for the turn.
    Interim(String),
    Final(String),
    Error(String),
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEvent {
    pub turn: usize,
    pub kind: CaptureEventKind,
}

/// Drives at most one capture session at a time.
pub struct VoiceCaptureAdapter {
    recognizer: Arc<dyn SpeechRecognizer>,
    active: Option<JoinHandle<()>>,
}

impl VoiceCaptureAdapter {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            active: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_available()
    }

    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Starts capturing for `turn`, aborting any session still running.
    /// Must be called from within a tokio runtime.
    pub fn start(
        &mut self,
        turn: usize,
        language: &str,
        events: UnboundedSender<CaptureEvent>,
    ) -> Result<(), SessionError> {
        if !self.recognizer.is_available() {
            return Err(SessionError::CapabilityUnavailable(Capability::SpeechCapture));
        }

        self.abort();

        let results = self.recognizer.listen(language);
        debug!("Capture started for turn {turn}");
        self.active = Some(tokio::spawn(forward_results(turn, results, events)));
        Ok(())
    }

    /// Ends the active session, if any. No-op when idle.
    pub fn abort(&mut self) {
        if let Some(handle) = self.active.take() {
            if !handle.is_finished() {
                debug!("Aborting active capture");
            }
            handle.abort();
        }
    }
}

impl Drop for VoiceCaptureAdapter {
    fn drop(&mut self) {
        self.abort();
    }
}

async fn forward_results(
    turn: usize,
    mut results: BoxStream<'static, RecognitionResult>,
    events: UnboundedSender<CaptureEvent>,
) {
    let emit = |kind| {
        // The receiver only goes away when the session is over.
        let _ = events.send(CaptureEvent { turn, kind });
    };

    let mut finalized = false;
    while let Some(result) = results.next().await {
        match result {
            RecognitionResult::Partial(text) if !finalized => emit(CaptureEventKind::Interim(text)),
            RecognitionResult::Final(text) if !finalized => {
                finalized = true;
                emit(CaptureEventKind::Final(text));
            }
            RecognitionResult::Partial(_) | RecognitionResult::Final(_) => {
                debug!("Dropping recognition result after final for turn {turn}");
            }
            RecognitionResult::Error(code) => {
                emit(CaptureEventKind::Error(code));
                break;
            }
        }
    }

    emit(CaptureEventKind::End);
}
