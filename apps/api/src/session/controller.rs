//! Session controller — owns one interview session and executes the effects
//! of each transition.
//!
//! Events (timers firing, capture callbacks) arrive on channels and are
//! applied one at a time, so the state needs no locking. Timers cannot be
//! cancelled once scheduled; a stale one is dropped by the transition rules.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::session::capture::{CaptureEvent, CaptureEventKind, SpeechRecognizer, VoiceCaptureAdapter};
use crate::session::speech::SpeechOutput;
use crate::session::state::{transition, Effect, SessionEvent, SessionState};
use crate::session::{Capability, SessionError};

pub struct SessionController {
    state: SessionState,
    config: SessionConfig,
    speech: Arc<dyn SpeechOutput>,
    capture: VoiceCaptureAdapter,
    timer_tx: mpsc::UnboundedSender<SessionEvent>,
    timer_rx: mpsc::UnboundedReceiver<SessionEvent>,
    capture_tx: mpsc::UnboundedSender<CaptureEvent>,
    capture_rx: mpsc::UnboundedReceiver<CaptureEvent>,
    snapshots: watch::Sender<SessionState>,
}

impl SessionController {
    pub fn new(
        questions: Vec<String>,
        speech: Arc<dyn SpeechOutput>,
        recognizer: Arc<dyn SpeechRecognizer>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let state = SessionState::new(questions)?;
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (capture_tx, capture_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(state.clone());

        Ok(Self {
            state,
            config,
            speech,
            capture: VoiceCaptureAdapter::new(recognizer),
            timer_tx,
            timer_rx,
            capture_tx,
            capture_rx,
            snapshots,
        })
    }

    /// Observes the state after every applied event, e.g. to render the live transcript.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.snapshots.subscribe()
    }

    /// Runs the session to completion and returns the final state.
    ///
    /// Fails up front, before anything is spoken, if either capability is missing.
    pub async fn run(mut self) -> Result<SessionState, SessionError> {
        if !self.speech.is_available() {
            return Err(SessionError::CapabilityUnavailable(Capability::SpeechOutput));
        }
        if !self.capture.is_available() {
            return Err(SessionError::CapabilityUnavailable(Capability::SpeechCapture));
        }

        info!(
            "Starting interview session with {} questions",
            self.state.questions().len()
        );
        self.dispatch(SessionEvent::Start)?;

        while !self.state.is_completed() {
            let event = tokio::select! {
                Some(event) = self.timer_rx.recv() => event,
                Some(event) = self.capture_rx.recv() => SessionEvent::Capture(event),
                else => break,
            };
            self.dispatch(event)?;
        }

        self.capture.abort();
        info!(
            "Interview session completed with {} responses",
            self.state.responses().len()
        );
        Ok(self.state)
    }

    fn dispatch(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        if let SessionEvent::Capture(CaptureEvent {
            turn,
            kind: CaptureEventKind::Error(code),
        }) = &event
        {
            warn!("Speech recognition error on turn {turn}: {code}");
        }

        let (next, effects) = transition(std::mem::take(&mut self.state), event);
        self.state = next;
        debug!("Session phase: {:?}", self.state.phase());

        for effect in effects {
            self.execute(effect)?;
        }

        self.snapshots.send_replace(self.state.clone());
        Ok(())
    }

    fn execute(&mut self, effect: Effect) -> Result<(), SessionError> {
        match effect {
            Effect::Speak(text) => self.speech.speak(&text)?,
            Effect::ScheduleListen { turn } => {
                self.schedule(self.config.settle_delay, SessionEvent::ListenDue { turn })
            }
            Effect::StartCapture { turn } => {
                self.capture
                    .start(turn, &self.config.language, self.capture_tx.clone())?
            }
            Effect::ScheduleAdvance { turn } => {
                self.schedule(self.config.advance_delay, SessionEvent::AdvanceDue { turn })
            }
            Effect::Finish => self.capture.abort(),
        }
        Ok(())
    }

    fn schedule(&self, delay: Duration, event: SessionEvent) {
        let tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The controller may already have finished.
            let _ = tx.send(event);
        });
    }
}
