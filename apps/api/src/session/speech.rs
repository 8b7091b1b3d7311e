use crate::session::SessionError;

/// Host-provided speech synthesis.
pub trait SpeechOutput: Send + Sync {
    fn is_available(&self) -> bool;

    /// Starts speaking `text`. Any utterance still playing is cancelled first,
    /// so at most one utterance is live at a time.
    fn speak(&self, text: &str) -> Result<(), SessionError>;
}
