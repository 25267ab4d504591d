//! Speech recognition contracts consumed by the capture surface.
//!
//! # Responsibility
//! - Describe the recognizer control surface (`start`/`stop`) and its
//!   configuration.
//! - Model cumulative result sets delivered by the engine.
//! - Abstract capability detection so hosts inject what they support.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Recognizer settings applied before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizerConfig {
    /// Keep listening across pauses until explicitly stopped.
    pub continuous: bool,
    /// Number of alternatives requested per result.
    pub max_alternatives: u32,
    /// Deliver partial results while the user is still speaking.
    pub interim_results: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            max_alternatives: 1,
            interim_results: true,
        }
    }
}

/// One candidate transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionAlternative {
    pub transcript: String,
    /// Engine confidence in `0.0..=1.0`; `0.0` when unreported.
    pub confidence: f32,
}

/// One recognized segment, interim or final.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognitionResult {
    /// Ordered best-first.
    pub alternatives: Vec<RecognitionAlternative>,
    pub is_final: bool,
}

impl RecognitionResult {
    /// Builds an interim single-alternative result.
    pub fn interim(transcript: impl Into<String>) -> Self {
        Self::single(transcript, false)
    }

    /// Builds a final single-alternative result.
    pub fn finalized(transcript: impl Into<String>) -> Self {
        Self::single(transcript, true)
    }

    fn single(transcript: impl Into<String>, is_final: bool) -> Self {
        Self {
            alternatives: vec![RecognitionAlternative {
                transcript: transcript.into(),
                confidence: 0.0,
            }],
            is_final,
        }
    }

    /// Best transcript, if the engine provided any alternative.
    pub fn best_transcript(&self) -> Option<&str> {
        self.alternatives
            .first()
            .map(|alternative| alternative.transcript.as_str())
    }
}

/// Joins the best transcript of every result, in result order.
///
/// The engine delivers the full cumulative result list on each update, so
/// the returned text replaces any earlier transcription.
pub fn joined_transcript(results: &[RecognitionResult]) -> String {
    results
        .iter()
        .filter_map(RecognitionResult::best_transcript)
        .collect()
}

/// Recognition engine failure reported at start or while listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// Microphone permission denied.
    NotAllowed,
    NoSpeech,
    AudioCapture,
    Network,
    Aborted,
    Other(String),
}

impl RecognitionError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAllowed => "not_allowed",
            Self::NoSpeech => "no_speech",
            Self::AudioCapture => "audio_capture",
            Self::Network => "network",
            Self::Aborted => "aborted",
            Self::Other(_) => "other",
        }
    }
}

impl Display for RecognitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAllowed => write!(f, "microphone permission was denied"),
            Self::NoSpeech => write!(f, "no speech was detected"),
            Self::AudioCapture => write!(f, "audio capture failed"),
            Self::Network => write!(f, "recognition service is unreachable"),
            Self::Aborted => write!(f, "recognition was aborted"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for RecognitionError {}

/// Live recognizer instance controlled by the capture surface.
///
/// Results and errors are delivered by the host event loop to
/// `CaptureSurface::on_result` / `CaptureSurface::on_error`.
pub trait SpeechRecognizer {
    fn start(&mut self) -> Result<(), RecognitionError>;
    fn stop(&mut self);
}

/// Host capability for creating recognizers.
pub trait SpeechCapability {
    /// Returns a configured recognizer, or `None` when the host has no
    /// speech recognition support.
    fn create_recognizer(&self, config: RecognizerConfig) -> Option<Box<dyn SpeechRecognizer>>;
}

/// Capability provider for hosts without speech recognition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeechCapability;

impl SpeechCapability for NoSpeechCapability {
    fn create_recognizer(&self, _config: RecognizerConfig) -> Option<Box<dyn SpeechRecognizer>> {
        None
    }
}
