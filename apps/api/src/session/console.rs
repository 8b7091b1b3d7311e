//! Terminal stand-ins for the speech capabilities: questions are printed and
//! each typed line is taken as the spoken answer.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tokio::sync::{mpsc, Mutex};

use crate::session::capture::{RecognitionResult, SpeechRecognizer};
use crate::session::speech::SpeechOutput;
use crate::session::SessionError;

pub struct ConsoleSpeech;

impl SpeechOutput for ConsoleSpeech {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&self, text: &str) -> Result<(), SessionError> {
        writeln!(std::io::stdout(), "\nInterviewer: {text}")
            .map_err(|e| SessionError::Speech(e.to_string()))
    }
}

/// Reads answers from a line source. An empty line, or nothing within the
/// silence timeout, counts as no answer.
pub struct ConsoleRecognizer {
    lines: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
    silence_timeout: Duration,
}

impl ConsoleRecognizer {
    pub fn new(lines: mpsc::UnboundedReceiver<String>, silence_timeout: Duration) -> Self {
        Self {
            lines: Arc::new(Mutex::new(lines)),
            silence_timeout,
        }
    }

    /// Feeds the recognizer from stdin on a dedicated reader thread, so a
    /// pending read never holds up runtime shutdown.
    pub fn from_stdin(silence_timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self::new(rx, silence_timeout)
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn listen(&self, _language: &str) -> BoxStream<'static, RecognitionResult> {
        let lines = Arc::clone(&self.lines);
        let silence_timeout = self.silence_timeout;

        stream::once(async move {
            let mut lines = lines.lock().await;
            match tokio::time::timeout(silence_timeout, lines.recv()).await {
                Ok(Some(line)) if !line.trim().is_empty() => {
                    Some(RecognitionResult::Final(line.trim().to_string()))
                }
                Ok(Some(_)) | Err(_) => None,
                Ok(None) => Some(RecognitionResult::Error("input-closed".to_string())),
            }
        })
        .filter_map(futures::future::ready)
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(recognizer: &ConsoleRecognizer) -> Vec<RecognitionResult> {
        recognizer.listen("en-US").collect().await
    }

    #[tokio::test]
    async fn test_typed_line_is_final_transcript() {
        let (tx, rx) = mpsc::unbounded_channel();
        let recognizer = ConsoleRecognizer::new(rx, Duration::from_secs(5));
        tx.send("  I would use a trie  ".to_string()).unwrap();

        assert_eq!(
            collect(&recognizer).await,
            vec![RecognitionResult::Final("I would use a trie".into())]
        );
    }

    #[tokio::test]
    async fn test_blank_line_is_no_answer() {
        let (tx, rx) = mpsc::unbounded_channel();
        let recognizer = ConsoleRecognizer::new(rx, Duration::from_secs(5));
        tx.send("   ".to_string()).unwrap();

        assert!(collect(&recognizer).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_silence_timeout_is_no_answer() {
        let (_tx, rx) = mpsc::unbounded_channel::<String>();
        let recognizer = ConsoleRecognizer::new(rx, Duration::from_secs(5));

        assert!(collect(&recognizer).await.is_empty());
    }

    #[tokio::test]
    async fn test_closed_input_is_an_error() {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        drop(tx);
        let recognizer = ConsoleRecognizer::new(rx, Duration::from_secs(5));

        assert_eq!(
            collect(&recognizer).await,
            vec![RecognitionResult::Error("input-closed".into())]
        );
    }
}
